//! # Layers
//!
//! The on-screen stack: a background image layer beneath a transparent drawing layer, both
//! anchored to the top-left of their container and sharing one canvas size.

use masking_core::{blend::BlendMode, raster::Raster, CanvasSize};

/// Aspect-fit an image of `image` pixels into a `container` of logical pixels.
///
/// This is the layout measurement that becomes the canvas size. Empty images or containers
/// measure as [`CanvasSize::ZERO`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_size(image: (u32, u32), container: [f32; 2], scale_factor: f32) -> CanvasSize {
    let (image_w, image_h) = (image.0 as f32, image.1 as f32);
    let [container_w, container_h] = container;
    if image_w <= 0.0 || image_h <= 0.0 || !(container_w > 0.0 && container_h > 0.0) {
        return CanvasSize::ZERO;
    }
    let scale = (container_w / image_w).min(container_h / image_h);
    CanvasSize::new(image_w * scale, image_h * scale).with_scale_factor(scale_factor)
}

pub struct LayerStack {
    /// Background, pre-stretched to the canvas' physical size.
    background: Option<Raster>,
    size: CanvasSize,
}
impl LayerStack {
    #[must_use]
    pub fn new(background: Option<&image::RgbaImage>, size: CanvasSize) -> Self {
        let [width, height] = size.size_physical_pixels();
        let background = background.map(|image| {
            let mut layer = Raster::new(width, height);
            layer.draw_stretched(&Raster::from_rgba8(image), BlendMode::Normal);
            layer
        });
        Self { background, size }
    }
    #[must_use]
    pub fn size(&self) -> CanvasSize {
        self.size
    }
    /// Stack the drawing layer, if any, over the background layer.
    #[must_use]
    pub fn compose(&self, drawing: Option<&Raster>) -> Raster {
        let [width, height] = self.size.size_physical_pixels();
        let mut out = self
            .background
            .clone()
            .unwrap_or_else(|| Raster::new(width, height));
        if let Some(drawing) = drawing {
            out.draw_stretched(drawing, BlendMode::Normal);
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn fit_preserves_aspect() {
        assert_eq!(
            fit_size((200, 100), [400.0, 400.0], 1.0),
            CanvasSize::new(400.0, 200.0)
        );
        assert_eq!(
            fit_size((100, 200), [400.0, 300.0], 2.0),
            CanvasSize::new(150.0, 300.0).with_scale_factor(2.0)
        );
    }
    #[test]
    fn fit_degenerate_is_zero() {
        assert_eq!(fit_size((0, 10), [400.0, 400.0], 1.0), CanvasSize::ZERO);
        assert_eq!(fit_size((10, 10), [0.0, 400.0], 1.0), CanvasSize::ZERO);
        assert_eq!(fit_size((10, 10), [f32::NAN, 400.0], 1.0), CanvasSize::ZERO);
    }
    #[test]
    fn drawing_sits_above_background() {
        let background = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let stack = LayerStack::new(Some(&background), CanvasSize::new(4.0, 4.0));
        let mut drawing = Raster::new(4, 4);
        drawing.apply_coverage(
            [1, 1],
            &image::ImageBuffer::from_pixel(1, 1, image::Luma([1.0f32])),
            [0.0, 0.0, 1.0, 1.0],
            BlendMode::Normal,
        );

        let out = stack.compose(Some(&drawing)).to_rgba8();
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
        // Nothing drawn: just the background.
        assert_eq!(stack.compose(None).to_rgba8().get_pixel(1, 1).0, [255, 0, 0, 255]);
    }
    #[test]
    fn no_background_is_transparent() {
        let stack = LayerStack::new(None, CanvasSize::new(3.0, 3.0));
        assert_eq!(stack.compose(None), Raster::new(3, 3));
    }
}
