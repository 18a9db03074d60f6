//! # Brush
//!
//! Per-stroke brush settings, and the preset inking tools a user can pick from.

use crate::{blend::BlendMode, color::Color};

/// The inking tools offered by the tool picker.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Marker,
    Pencil,
    Eraser,
}
impl Tool {
    /// The settings a fresh pick of this tool starts with.
    #[must_use]
    pub fn default_settings(self) -> StrokeBrushSettings {
        match self {
            Self::Pen => StrokeBrushSettings {
                tool: self,
                tip: TipShape::Round,
                color: Color::BLACK,
                size: 4.0,
                min_size: 1.0,
                spacing_px: 0.5,
            },
            Self::Marker => StrokeBrushSettings {
                tool: self,
                tip: TipShape::Square,
                // Highlighter yellow, half strength.
                color: Color::from_rgba8([255, 230, 0, 255]).with_opacity(0.5),
                size: 16.0,
                min_size: 16.0,
                spacing_px: 1.0,
            },
            Self::Pencil => StrokeBrushSettings {
                tool: self,
                tip: TipShape::Round,
                color: Color::from_rgba8([60, 60, 60, 255]).with_opacity(0.8),
                size: 2.0,
                min_size: 0.5,
                spacing_px: 0.25,
            },
            Self::Eraser => StrokeBrushSettings {
                tool: self,
                tip: TipShape::Round,
                color: Color::BLACK,
                size: 24.0,
                min_size: 24.0,
                spacing_px: 1.0,
            },
        }
    }
    /// How strokes of this tool combine with the strokes beneath them.
    #[must_use]
    pub fn blend_mode(self) -> BlendMode {
        match self {
            Self::Eraser => BlendMode::Erase,
            Self::Pen | Self::Marker | Self::Pencil => BlendMode::Normal,
        }
    }
}

#[derive(strum::AsRefStr, PartialEq, Eq, Copy, Clone, Hash, Debug, Default)]
pub enum TipShape {
    /// Antialiased disc.
    #[default]
    Round,
    /// Axis-aligned square. Integer-aligned squares rasterize with hard edges.
    Square,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushSettingsError {
    #[error("brush size must be finite and positive")]
    InvalidSize,
    #[error("minimum size must be finite, non-negative and at most the full size")]
    InvalidMinSize,
    #[error("spacing must be finite and positive")]
    InvalidSpacing,
}

#[derive(Copy, Clone, PartialEq, Debug)]
/// Per-stroke settings, i.e. ones we expect the user to change frequently without counting it as a "new brush."
pub struct StrokeBrushSettings {
    pub tool: Tool,
    pub tip: TipShape,
    /// Premultiplied. Alpha is the opacity of the stroke as a whole, not per dab.
    pub color: Color,
    /// Diameter of the tip at full pressure, in logical pixels.
    pub size: f32,
    /// Diameter of the tip at zero pressure, in logical pixels.
    pub min_size: f32,
    /// Distance between successive dabs, in logical pixels.
    pub spacing_px: f32,
}
impl Default for StrokeBrushSettings {
    fn default() -> Self {
        Tool::default().default_settings()
    }
}
impl StrokeBrushSettings {
    pub fn validate(&self) -> Result<(), BrushSettingsError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(BrushSettingsError::InvalidSize);
        }
        if !self.min_size.is_finite() || self.min_size < 0.0 || self.min_size > self.size {
            return Err(BrushSettingsError::InvalidMinSize);
        }
        if !self.spacing_px.is_finite() || self.spacing_px <= 0.0 {
            return Err(BrushSettingsError::InvalidSpacing);
        }
        Ok(())
    }
    /// Tip diameter for the given normalized pressure.
    #[must_use]
    pub fn diameter_at(&self, pressure: f32) -> f32 {
        let pressure = if pressure.is_finite() {
            pressure.clamp(0.0, 1.0)
        } else {
            1.0
        };
        (self.size - self.min_size).mul_add(pressure, self.min_size)
    }
    #[must_use]
    pub fn blend_mode(&self) -> BlendMode {
        self.tool.blend_mode()
    }
}
