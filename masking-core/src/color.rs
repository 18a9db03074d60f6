use crate::util::{FiniteF32, FiniteF32Error};

/// A premultiplied color, channels in `[0, 1]`.
/// All transparent values (alpha == 0) are normalized to transparent black.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Zeroable, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    /// Create a new color from premultiplied channels, clamped to `[0, 1]`.
    /// Color channels are additionally clamped to not exceed alpha.
    pub fn new_lossy(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        let a = FiniteF32::new_unit(a)?;
        if a.get() == 0.0 {
            return Ok(Self::TRANSPARENT);
        }
        let channel = |c: f32| -> Result<FiniteF32, FiniteF32Error> {
            FiniteF32::new(FiniteF32::new_unit(c)?.get().min(a.get()))
        };
        Ok(Self([channel(r)?, channel(g)?, channel(b)?, a]))
    }
    /// Create a new color from straight (non-premultiplied) channels.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        let a = FiniteF32::new_unit(a)?.get();
        Self::new_lossy(
            FiniteF32::new_unit(r)?.get() * a,
            FiniteF32::new_unit(g)?.get() * a,
            FiniteF32::new_unit(b)?.get() * a,
            a,
        )
    }
    /// Create a color from a straight-alpha 8-bit pixel. Infallible.
    #[must_use]
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = crate::util::premultiply_rgba8(rgba);
        // Every 8-bit channel maps to a finite value in range.
        Self::new_lossy(r, g, b, a).unwrap_or(Self::TRANSPARENT)
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        [
            self.0[0].get(),
            self.0[1].get(),
            self.0[2].get(),
            self.0[3].get(),
        ]
    }
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.0[3].get()
    }
    /// Scale every channel by `opacity`, clamped to `[0, 1]`.
    #[must_use = "returns a new color and does not modify `self`"]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let [r, g, b, a] = self.as_array();
        let o = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self::new_lossy(r * o, g * o, b * o, a * o).unwrap_or(Self::TRANSPARENT)
    }
}
// Safety: FiniteF32 is NoUninit, arrays have no uninit bytes of their own.
unsafe impl bytemuck::NoUninit for Color {}

#[cfg(test)]
mod test {
    use super::Color;
    #[test]
    fn transparent_normalizes() {
        assert_eq!(Color::new_lossy(1.0, 0.5, 0.2, 0.0), Ok(Color::TRANSPARENT));
        assert_eq!(Color::from_rgba8([255, 0, 0, 0]), Color::TRANSPARENT);
    }
    #[test]
    fn straight_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5).unwrap();
        assert_eq!(c.as_array(), [0.5, 0.25, 0.0, 0.5]);
    }
    #[test]
    fn channels_never_exceed_alpha() {
        let c = Color::new_lossy(1.0, 1.0, 1.0, 0.25).unwrap();
        assert_eq!(c.as_array(), [0.25; 4]);
        assert!(Color::new_lossy(f32::NAN, 0.0, 0.0, 1.0).is_err());
    }
    #[test]
    fn opacity_scales_all_channels() {
        let c = Color::from_rgba8([0, 0, 255, 255]).with_opacity(0.5);
        assert_eq!(c.as_array(), [0.0, 0.0, 0.5, 0.5]);
    }
}
