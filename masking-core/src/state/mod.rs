pub mod stroke_collection;

pub use stroke_collection::StrokeCollection;
