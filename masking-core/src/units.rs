/// The on-screen area a canvas occupies, as measured by layout.
///
/// Sizes are in logical pixels, with `scale_factor` physical pixels per logical pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
    /// Controls the ratio of physical pixels per logical pixel.
    pub scale_factor: f32,
}
impl CanvasSize {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
        scale_factor: 1.0,
    };
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
        }
    }
    #[must_use = "returns a new size and does not modify `self`"]
    pub fn with_scale_factor(self, scale_factor: f32) -> Self {
        Self {
            scale_factor,
            ..self
        }
    }
    /// Get the size of the canvas, in rounded physical pixels.
    /// Negative and non-finite values collapse to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn size_physical_pixels(&self) -> [u32; 2] {
        let scale = if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            0.0
        };
        [self.width, self.height].map(|logical| {
            let physical = (logical * scale).round();
            if physical.is_finite() && physical > 0.0 {
                // Saturating float->int cast.
                physical as u32
            } else {
                0
            }
        })
    }
    /// True if there are no physical pixels to render into.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size_physical_pixels().contains(&0)
    }
}
impl Default for CanvasSize {
    fn default() -> Self {
        Self::ZERO
    }
}
impl std::fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}px@{}x", self.width, self.height, self.scale_factor)
    }
}
