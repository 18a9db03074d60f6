//! Core of the masking editor: strokes, brushes, and flattening them over a background image.

pub mod blend;
pub mod brush;
pub mod color;
pub mod compositor;
pub mod raster;
pub mod stamp;
pub mod state;
pub mod stroke;
pub mod units;
pub mod util;

pub use color::Color;
pub use compositor::flatten;
pub use state::StrokeCollection;
pub use units::CanvasSize;
