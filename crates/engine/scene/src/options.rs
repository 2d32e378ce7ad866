/// Illumination toggles
///
/// The two flags are independent. The shader receives them packed into a
/// 2-bit render-mode code: bit 0 is direct illumination, bit 1 is global
/// illumination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    pub direct_illumination: bool,
    pub global_illumination: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            direct_illumination: true,
            global_illumination: true,
        }
    }
}

impl RenderOptions {
    /// Direct illumination bit of the render-mode code
    pub const DIRECT_BIT: i32 = 1 << 0;
    /// Global illumination bit of the render-mode code
    pub const GLOBAL_BIT: i32 = 1 << 1;

    pub fn new(direct_illumination: bool, global_illumination: bool) -> Self {
        Self {
            direct_illumination,
            global_illumination,
        }
    }

    /// Packed render-mode code for the `renderMode` uniform
    pub fn render_mode(&self) -> i32 {
        let mut mode = 0;
        if self.direct_illumination {
            mode |= Self::DIRECT_BIT;
        }
        if self.global_illumination {
            mode |= Self::GLOBAL_BIT;
        }
        mode
    }

    pub fn toggled_direct(self) -> Self {
        Self {
            direct_illumination: !self.direct_illumination,
            ..self
        }
    }

    pub fn toggled_global(self) -> Self {
        Self {
            global_illumination: !self.global_illumination,
            ..self
        }
    }
}
