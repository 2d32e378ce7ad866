//! Shader compilation utilities
//!
//! Compiles and links the path tracer's vertex and fragment stages and
//! prepares their sources. Slot array sizes are injected as `#define` lines
//! right after the `#version` directive so the shader and the uniform layout
//! always agree on [`Capacity`].

use glow::{Context, HasContext, Program, Shader};
use scene::Capacity;

use crate::error::{RenderError, Result, ShaderStage};

/// Vertex stage: passes the full-screen quad through in clip space
pub const VERTEX_SHADER_SOURCE: &str = include_str!("../shaders/path_trace.vert");

/// Fragment stage: per-pixel path tracing and accumulation blend
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("../shaders/path_trace.frag");

/// Insert slot-count defines for `capacity` after the `#version` line
///
/// Sources without a `#version` directive get the defines prepended.
pub fn inject_capacity(source: &str, capacity: &Capacity) -> String {
    let defines = format!(
        "#define MAX_PLANES {}\n#define MAX_SPHERES {}\n#define MAX_LIGHTS {}\n",
        capacity.max_planes, capacity.max_spheres, capacity.max_lights
    );

    let mut out = String::with_capacity(source.len() + defines.len());
    match source.find("#version") {
        Some(start) => {
            let line_end = source[start..]
                .find('\n')
                .map(|i| start + i + 1)
                .unwrap_or(source.len());
            out.push_str(&source[..line_end]);
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&defines);
            out.push_str(&source[line_end..]);
        }
        None => {
            out.push_str(&defines);
            out.push_str(source);
        }
    }
    out
}

/// Compile a shader stage from source
///
/// # Safety
/// Requires an active OpenGL context
pub unsafe fn compile_shader(gl: &Context, stage: ShaderStage, source: &str) -> Result<Shader> {
    unsafe {
        let shader = gl
            .create_shader(stage.gl_type())
            .map_err(|e| RenderError::Allocation(format!("{stage} shader: {e}")))?;

        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RenderError::ShaderCompile { stage, log });
        }

        Ok(shader)
    }
}

/// Compile both stages and link them into a program
///
/// # Safety
/// Requires an active OpenGL context
pub unsafe fn compile_and_link(
    gl: &Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<Program> {
    unsafe {
        let vertex_shader = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
        let fragment_shader = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex_shader);
                return Err(e);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex_shader);
                gl.delete_shader(fragment_shader);
                return Err(RenderError::Allocation(format!("program: {e}")));
            }
        };

        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);

        gl.detach_shader(program, vertex_shader);
        gl.detach_shader(program, fragment_shader);
        gl.delete_shader(vertex_shader);
        gl.delete_shader(fragment_shader);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::Link { log });
        }

        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_after_version_line() {
        let source = "#version 330 core\nvoid main() {}\n";
        let injected = inject_capacity(source, &Capacity::new(6, 4, 2));

        let mut lines = injected.lines();
        assert_eq!(lines.next(), Some("#version 330 core"));
        assert_eq!(lines.next(), Some("#define MAX_PLANES 6"));
        assert_eq!(lines.next(), Some("#define MAX_SPHERES 4"));
        assert_eq!(lines.next(), Some("#define MAX_LIGHTS 2"));
        assert_eq!(lines.next(), Some("void main() {}"));
    }

    #[test]
    fn test_inject_without_version_prepends() {
        let injected = inject_capacity("void main() {}", &Capacity::default());
        assert!(injected.starts_with("#define MAX_PLANES 10\n"));
        assert!(injected.ends_with("void main() {}"));
    }

    #[test]
    fn test_embedded_sources_declare_interface() {
        assert!(VERTEX_SHADER_SOURCE.contains("vertexPosition"));
        let names = [
            "camera",
            "planes",
            "spheres",
            "pointLights",
            "seed2",
            "frameIndex",
            "renderMode",
            "prevFrame",
            "randomNoise",
        ];
        for name in names {
            assert!(FRAGMENT_SHADER_SOURCE.contains(name), "fragment shader missing {name}");
        }
    }

    #[test]
    fn test_sources_avoid_later_glsl_keywords() {
        // Reserved from GLSL 4.00; some 3.30 drivers reject them as identifiers
        let reserved = ["sample", "patch", "subroutine"];
        for source in [VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE] {
            let mut words = source.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'));
            assert!(
                !words.any(|word| reserved.contains(&word)),
                "shader uses a reserved GLSL keyword"
            );
        }
    }
}
