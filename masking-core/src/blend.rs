#[derive(
    strum::AsRefStr,
    PartialEq,
    Eq,
    strum::EnumIter,
    Copy,
    Clone,
    Hash,
    Debug,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(u8)]
pub enum BlendMode {
    /// Source-over.
    Normal,
    /// Destination-out. Removes coverage from whatever lies beneath.
    Erase,
}
impl Default for BlendMode {
    fn default() -> Self {
        Self::Normal
    }
}
impl BlendMode {
    /// Blend premultiplied `src` onto premultiplied `dst`.
    #[must_use]
    #[inline]
    pub fn apply(self, dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
        match self {
            Self::Normal => {
                let inv = 1.0 - src[3];
                [
                    src[0] + dst[0] * inv,
                    src[1] + dst[1] * inv,
                    src[2] + dst[2] * inv,
                    src[3] + dst[3] * inv,
                ]
            }
            Self::Erase => {
                let inv = 1.0 - src[3];
                [dst[0] * inv, dst[1] * inv, dst[2] * inv, dst[3] * inv]
            }
        }
    }
}
