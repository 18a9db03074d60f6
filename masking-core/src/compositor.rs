//! # Compositor
//!
//! Flattens a background image and a stroke collection into a single new image.

use crate::{
    blend::BlendMode, raster::Raster, stamp, state::StrokeCollection, units::CanvasSize,
};

/// Flatten `strokes` over `background` into a newly allocated image of `size`.
///
/// The background, if any, is stretched over the whole output and drawn first. Strokes are
/// rasterized directly at the output resolution and blended over it. Neither input is modified.
///
/// Returns `None` if `size` covers no physical pixels.
#[must_use]
pub fn flatten(
    background: Option<&image::RgbaImage>,
    strokes: &StrokeCollection,
    size: CanvasSize,
) -> Option<image::RgbaImage> {
    let [width, height] = size.size_physical_pixels();
    if width == 0 || height == 0 {
        log::debug!("not flattening into empty canvas {size}");
        return None;
    }

    let mut output = Raster::new(width, height);
    if let Some(background) = background {
        output.draw_stretched(&Raster::from_rgba8(background), BlendMode::Normal);
    }
    let strokes_layer = stamp::rasterize(strokes, [width, height], size.scale_factor);
    output.composite(&strokes_layer, BlendMode::Normal);

    log::debug!(
        "flattened {} strokes over {} background into {width}x{height}",
        strokes.len(),
        if background.is_some() { "a" } else { "no" },
    );
    Some(output.to_rgba8())
}

#[cfg(test)]
mod test {
    use super::flatten;
    use crate::{
        brush::{StrokeBrushSettings, TipShape, Tool},
        color::Color,
        state::StrokeCollection,
        stroke::Stroke,
        units::CanvasSize,
    };

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> image::RgbaImage {
        image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))
    }
    /// A single square dab of `side` logical pixels with its top-left corner at `corner`.
    fn square_stroke(corner: [f32; 2], side: f32, color: Color) -> Stroke {
        let mut stroke = Stroke::new(StrokeBrushSettings {
            tip: TipShape::Square,
            color,
            size: side,
            min_size: side,
            ..Tool::Marker.default_settings()
        });
        stroke.push([corner[0] + side / 2.0, corner[1] + side / 2.0], 1.0);
        stroke
    }
    fn collection_of(strokes: impl IntoIterator<Item = Stroke>) -> StrokeCollection {
        let mut collection = StrokeCollection::default();
        for stroke in strokes {
            collection.push_back(stroke);
        }
        collection
    }

    #[test]
    fn blue_square_over_red() {
        let background = solid(100, 100, RED);
        let strokes = collection_of([square_stroke([0.0, 0.0], 10.0, Color::from_rgba8(BLUE))]);
        let out = flatten(Some(&background), &strokes, CanvasSize::new(100.0, 100.0)).unwrap();

        assert_eq!(out.dimensions(), (100, 100));
        for (x, y, px) in out.enumerate_pixels() {
            let expected = if x < 10 && y < 10 { BLUE } else { RED };
            assert_eq!(px.0, expected, "at {x},{y}");
        }
    }
    #[test]
    fn translucent_stroke_blends() {
        let background = solid(20, 20, RED);
        let half_blue = Color::from_rgba8(BLUE).with_opacity(0.5);
        let strokes = collection_of([square_stroke([4.0, 4.0], 8.0, half_blue)]);
        let out = flatten(Some(&background), &strokes, CanvasSize::new(20.0, 20.0)).unwrap();

        assert_eq!(out.get_pixel(8, 8).0, [128, 0, 128, 255]);
        assert_eq!(out.get_pixel(0, 0).0, RED);
        assert_eq!(out.get_pixel(12, 12).0, RED);
    }
    #[test]
    fn inputs_are_untouched() {
        let background = solid(16, 16, RED);
        let background_copy = background.clone();
        let strokes = collection_of([square_stroke([2.0, 2.0], 4.0, Color::from_rgba8(BLUE))]);
        let before: Vec<Stroke> = strokes.iter_active().cloned().collect();

        let first = flatten(Some(&background), &strokes, CanvasSize::new(16.0, 16.0));
        let second = flatten(Some(&background), &strokes, CanvasSize::new(16.0, 16.0));

        assert_eq!(background, background_copy);
        assert_eq!(strokes.iter_active().cloned().collect::<Vec<_>>(), before);
        // Deterministic, too.
        assert_eq!(first, second);
    }
    #[test]
    fn absent_background_is_transparent() {
        let strokes = collection_of([square_stroke([0.0, 0.0], 5.0, Color::from_rgba8(BLUE))]);
        let out = flatten(None, &strokes, CanvasSize::new(10.0, 10.0)).unwrap();

        assert_eq!(out.dimensions(), (10, 10));
        for (x, y, px) in out.enumerate_pixels() {
            let expected = if x < 5 && y < 5 { BLUE } else { [0; 4] };
            assert_eq!(px.0, expected, "at {x},{y}");
        }
    }
    #[test]
    fn absent_background_no_strokes_is_blank() {
        let out = flatten(None, &StrokeCollection::default(), CanvasSize::new(50.0, 50.0)).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
        assert!(out.pixels().all(|px| px.0 == [0; 4]));
    }
    #[test]
    fn zero_size_yields_nothing() {
        let background = solid(8, 8, RED);
        let strokes = collection_of([square_stroke([0.0, 0.0], 4.0, Color::from_rgba8(BLUE))]);
        assert_eq!(flatten(Some(&background), &strokes, CanvasSize::ZERO), None);
        assert_eq!(flatten(None, &strokes, CanvasSize::new(0.0, 8.0)), None);
    }
    #[test]
    fn resave_without_strokes_is_identical() {
        let background = image::RgbaImage::from_fn(30, 20, |x, y| {
            image::Rgba([(x * 8) as u8, (y * 12) as u8, 77, (x * 3 + y * 5) as u8])
        });
        let strokes = collection_of([square_stroke(
            [3.0, 3.0],
            6.0,
            Color::from_rgba8([0, 200, 40, 255]).with_opacity(0.3),
        )]);
        let size = CanvasSize::new(30.0, 20.0);

        let first = flatten(Some(&background), &strokes, size).unwrap();
        let second = flatten(Some(&first), &StrokeCollection::default(), size).unwrap();
        assert_eq!(first, second);
    }
    #[test]
    fn background_is_stretched_to_canvas() {
        let background = solid(4, 4, RED);
        let out = flatten(
            Some(&background),
            &StrokeCollection::default(),
            CanvasSize::new(25.0, 10.0),
        )
        .unwrap();
        assert_eq!(out.dimensions(), (25, 10));
        assert!(out.pixels().all(|px| px.0 == RED));
    }
    #[test]
    fn scale_factor_scales_everything() {
        let background = solid(10, 10, RED);
        let strokes = collection_of([square_stroke([0.0, 0.0], 2.0, Color::from_rgba8(BLUE))]);
        let out = flatten(
            Some(&background),
            &strokes,
            CanvasSize::new(10.0, 10.0).with_scale_factor(2.0),
        )
        .unwrap();

        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(out.get_pixel(3, 3).0, BLUE);
        assert_eq!(out.get_pixel(4, 4).0, RED);
    }
}
