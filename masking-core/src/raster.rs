//! # Raster
//!
//! A CPU surface of premultiplied `f32` pixels, backed by an [`image::Rgba32FImage`].
//! Row 0 is the top of the image, matching the coordinate space strokes are recorded in.

use crate::blend::BlendMode;
use rayon::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Raster(image::Rgba32FImage);

impl Raster {
    /// Allocate a fully transparent raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self(image::Rgba32FImage::new(width, height))
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
    /// Premultiplied pixel at the given location. `None` if out-of-bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.0.get_pixel_checked(x, y).map(|px| px.0)
    }
    /// Read a straight-alpha 8-bit image.
    #[must_use]
    pub fn from_rgba8(image: &image::RgbaImage) -> Self {
        Self(image::Rgba32FImage::from_fn(
            image.width(),
            image.height(),
            |x, y| image::Rgba(crate::util::premultiply_rgba8(image.get_pixel(x, y).0)),
        ))
    }
    /// Quantize into a straight-alpha 8-bit image.
    #[must_use]
    pub fn to_rgba8(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            image::Rgba(crate::util::unpremultiply_rgba8(self.0.get_pixel(x, y).0))
        })
    }
    /// Blend `src` over the whole of `self`, stretching it to fit if the sizes differ.
    pub fn draw_stretched(&mut self, src: &Self, mode: BlendMode) {
        if src.dimensions() == self.dimensions() {
            self.composite(src, mode);
        } else if src.width() == 0 || src.height() == 0 {
            log::trace!("skipping draw of empty raster");
        } else {
            // Filtering premultiplied data keeps transparent edges from bleeding dark.
            let stretched = image::imageops::resize(
                &src.0,
                self.width(),
                self.height(),
                image::imageops::FilterType::Triangle,
            );
            self.composite(&Self(stretched), mode);
        }
    }
    /// Blend same-sized `src` over `self`, pixel-for-pixel.
    ///
    /// # Panics
    /// If the dimensions differ.
    pub fn composite(&mut self, src: &Self, mode: BlendMode) {
        assert_eq!(
            self.dimensions(),
            src.dimensions(),
            "composite requires equal dimensions"
        );
        let dst: &mut [f32] = &mut self.0;
        let src: &[f32] = &src.0;
        dst.par_chunks_exact_mut(4)
            .zip(src.par_chunks_exact(4))
            .for_each(|(dst, src)| {
                let blended = mode.apply(
                    [dst[0], dst[1], dst[2], dst[3]],
                    [src[0], src[1], src[2], src[3]],
                );
                dst.copy_from_slice(&blended);
            });
    }
    /// Blend a solid premultiplied `color`, modulated by per-pixel `coverage`, into the region
    /// whose top-left corner is at `origin`. Coverage outside of `self` is clipped.
    pub fn apply_coverage(
        &mut self,
        origin: [u32; 2],
        coverage: &image::ImageBuffer<image::Luma<f32>, Vec<f32>>,
        color: [f32; 4],
        mode: BlendMode,
    ) {
        let width = self.width() as usize;
        if width == 0 {
            return;
        }
        let [origin_x, origin_y] = origin.map(|v| v as usize);
        let cov_width = coverage.width() as usize;
        let cov_height = coverage.height() as usize;
        let rows: &mut [f32] = &mut self.0;
        rows.par_chunks_exact_mut(width * 4)
            .enumerate()
            .skip(origin_y)
            .take(cov_height)
            .for_each(|(y, row)| {
                let cov_row = y - origin_y;
                let cov_row = &coverage.as_raw()[cov_row * cov_width..(cov_row + 1) * cov_width];
                for (cov_x, &cov) in cov_row.iter().enumerate() {
                    let x = origin_x + cov_x;
                    if x >= width {
                        break;
                    }
                    if cov <= 0.0 {
                        continue;
                    }
                    let px = &mut row[x * 4..x * 4 + 4];
                    let src = color.map(|c| c * cov);
                    let blended = mode.apply([px[0], px[1], px[2], px[3]], src);
                    px.copy_from_slice(&blended);
                }
            });
    }
}
impl From<Raster> for image::Rgba32FImage {
    fn from(value: Raster) -> Self {
        value.0
    }
}
