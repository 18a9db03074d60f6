//! Pointer input, as delivered to the drawing surface.

bitflags::bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    /// Set of pointer devices.
    #[rustfmt::skip]
    pub struct PointerKinds : u8 {
        const MOUSE = 0b0000_0001;
        const TOUCH = 0b0000_0010;
        const PEN   = 0b0000_0100;
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}
impl From<PointerKind> for PointerKinds {
    fn from(value: PointerKind) -> Self {
        match value {
            PointerKind::Mouse => Self::MOUSE,
            PointerKind::Touch => Self::TOUCH,
            PointerKind::Pen => Self::PEN,
        }
    }
}

/// Which pointer devices may draw.
#[derive(
    strum::AsRefStr,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Any pointer draws.
    #[default]
    Any,
    /// Only a pen draws, leaving fingers free for other gestures.
    Pen,
}
impl InputPolicy {
    #[must_use]
    pub fn accepted(self) -> PointerKinds {
        match self {
            Self::Any => PointerKinds::all(),
            Self::Pen => PointerKinds::PEN,
        }
    }
    #[must_use]
    pub fn accepts(self, kind: PointerKind) -> bool {
        self.accepted().contains(kind.into())
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct StylusEvent {
    /// Position in logical canvas pixels.
    pub pos: (f32, f32),
    pub pressed: bool,
    /// Normalized pressure, if the device reports it.
    pub pressure: Option<f32>,
    pub kind: PointerKind,
}
impl StylusEvent {
    /// A pressureless mouse sample.
    #[must_use]
    pub fn mouse(pos: (f32, f32), pressed: bool) -> Self {
        Self {
            pos,
            pressed,
            pressure: None,
            kind: PointerKind::Mouse,
        }
    }
}

/// All the events collected over one frame, in order.
pub type StylusEventFrame = Vec<StylusEvent>;
