//! Attribute and uniform location lookup
//!
//! Resolution never fails: a name without a matching active variable maps to
//! `None`, the "absent" sentinel. Drivers routinely strip unused uniforms, so
//! this is logged at debug level and otherwise ignored.

use std::collections::HashMap;

use glow::{Context, HasContext, Program, UniformLocation};

/// Name to location mapping for one linked program
#[derive(Debug, Clone)]
pub struct LocationMap<A, U> {
    attributes: HashMap<String, Option<A>>,
    uniforms: HashMap<String, Option<U>>,
}

impl<A, U> LocationMap<A, U> {
    /// Look up every name through the given backend functions
    pub fn resolve<'a, 'b>(
        attribute_names: impl IntoIterator<Item = &'a str>,
        uniform_names: impl IntoIterator<Item = &'b str>,
        mut attribute: impl FnMut(&str) -> Option<A>,
        mut uniform: impl FnMut(&str) -> Option<U>,
    ) -> Self {
        let attributes = attribute_names
            .into_iter()
            .map(|name| (name.to_string(), attribute(name)))
            .collect();
        let uniforms = uniform_names
            .into_iter()
            .map(|name| (name.to_string(), uniform(name)))
            .collect();
        Self { attributes, uniforms }
    }

    /// Location of an attribute, `None` if absent or never requested
    pub fn attribute(&self, name: &str) -> Option<&A> {
        self.attributes.get(name).and_then(Option::as_ref)
    }

    /// Location of a uniform, `None` if absent or never requested
    pub fn uniform(&self, name: &str) -> Option<&U> {
        self.uniforms.get(name).and_then(Option::as_ref)
    }

    /// Requested uniform names that resolved to the absent sentinel
    pub fn absent_uniforms(&self) -> impl Iterator<Item = &str> {
        self.uniforms
            .iter()
            .filter(|(_, location)| location.is_none())
            .map(|(name, _)| name.as_str())
    }

    /// Number of requested uniform names
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }
}

/// Resolve names against a linked GL program
///
/// # Safety
/// Requires an active OpenGL context and a successfully linked `program`
pub unsafe fn resolve_locations(
    gl: &Context,
    program: Program,
    attribute_names: &[&str],
    uniform_names: &[String],
) -> LocationMap<u32, UniformLocation> {
    let map = LocationMap::resolve(
        attribute_names.iter().copied(),
        uniform_names.iter().map(String::as_str),
        |name| unsafe { gl.get_attrib_location(program, name) },
        |name| unsafe { gl.get_uniform_location(program, name) },
    );

    let absent = map.absent_uniforms().count();
    if absent > 0 {
        tracing::debug!(
            absent,
            total = map.uniform_count(),
            "some uniforms are inactive in the linked program"
        );
    }
    map
}
