//! Utility types, used throughout the crate.

/// A float which is non-NaN and non-infinite.
// Because of the preconditions invalidating many bitpatterns, this is not Pod.
#[derive(Copy, Clone, PartialEq, PartialOrd, bytemuck::NoUninit, bytemuck::Zeroable, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    /// Create from a value, clamping it to `[0, 1]`.
    pub fn new_unit(val: f32) -> Result<Self, FiniteF32Error> {
        Self::new(val).map(|v| Self(v.0.clamp(0.0, 1.0)))
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

// No component is ever NaN, so PartialEq can act like Eq.
impl Eq for FiniteF32 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for FiniteF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl std::hash::Hash for FiniteF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.to_bits());
    }
}

/// Convert a straight-alpha 8-bit pixel into premultiplied `[0, 1]` floats.
#[must_use]
pub fn premultiply_rgba8([r, g, b, a]: [u8; 4]) -> [f32; 4] {
    let alpha = f32::from(a) / 255.0;
    [
        f32::from(r) / 255.0 * alpha,
        f32::from(g) / 255.0 * alpha,
        f32::from(b) / 255.0 * alpha,
        alpha,
    ]
}

/// Convert premultiplied `[0, 1]` floats back into a straight-alpha 8-bit pixel.
///
/// Exact inverse of [`premultiply_rgba8`] for every input it can produce.
/// Fully transparent pixels normalize to transparent black.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unpremultiply_rgba8([r, g, b, a]: [f32; 4]) -> [u8; 4] {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let alpha = to_u8(a);
    if alpha == 0 {
        return [0; 4];
    }
    // Divide by the quantized alpha, so that re-premultiplying lands on the same value.
    let a = f32::from(alpha) / 255.0;
    [to_u8(r / a), to_u8(g / a), to_u8(b / a), alpha]
}
