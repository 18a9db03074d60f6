//! # Stamping
//! Strokes are rasterized by stamping the brush tip ("dabs") at even arc-length intervals along the
//! stroke's polyline. Each stroke is stamped into its own coverage mask first, taking the max of
//! overlapping dabs, so that a stroke is blended as a single group. The mask is then blended into
//! the destination with the stroke's color and blend mode.

use crate::{brush::TipShape, raster::Raster, state::StrokeCollection, stroke::Stroke};
use rayon::prelude::*;

/// Spacing floor, in logical pixels, so degenerate settings can't produce unbounded dab counts.
const MIN_SPACING: f32 = 0.05;

pub type Coverage = image::ImageBuffer<image::Luma<f32>, Vec<f32>>;

/// A single stamp of the brush tip, in physical pixels.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Dab {
    pub center: [f32; 2],
    pub diameter: f32,
}

/// Compute every dab of the stroke, scaled into physical pixels.
///
/// Dabs are placed at every multiple of the spacing along the arc length, plus one at the very
/// end so the stroke always reaches its final sample. Order is unspecified.
#[must_use]
pub fn dabs_of(stroke: &Stroke, scale_factor: f32) -> Vec<Dab> {
    dabs_within(stroke, scale_factor, None)
}

/// [`dabs_of`], leaving out dabs too far away to touch a canvas of `clip` physical pixels.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn dabs_within(stroke: &Stroke, scale_factor: f32, clip: Option<[u32; 2]>) -> Vec<Dab> {
    let spacing = stroke.brush.spacing_px.max(MIN_SPACING);
    let brush = &stroke.brush;
    let make_dab = |point: &crate::stroke::Point| Dab {
        center: [point.pos[0] * scale_factor, point.pos[1] * scale_factor],
        diameter: brush.diameter_at(point.pressure) * scale_factor,
    };
    // Farthest any dab of this brush reaches from its center, in physical pixels.
    let reach = brush.size.max(brush.min_size) * scale_factor / 2.0 + 1.0;

    let mut dabs: Vec<Dab> = stroke
        .points
        .par_windows(2)
        // flat_map_iter, as each iter is small and thus wouldn't benefit from parallelization
        .flat_map_iter(|win| -> smallvec::SmallVec<[Dab; 8]> {
            let [a, b] = win else { unreachable!() };
            let len = b.dist - a.dist;
            // Zero-length (or corrupt) segment, the neighbors cover it.
            if len <= 0.0 || !len.is_finite() {
                return smallvec::SmallVec::new();
            }
            let [enter, exit] = match clip {
                None => [0.0, 1.0],
                Some(size) => match visible_span(a.pos, b.pos, scale_factor, reach, size) {
                    Some(span) => span,
                    None => return smallvec::SmallVec::new(),
                },
            };
            // Offset from `a` of the first multiple of spacing at or after it.
            let phase = ((a.dist / spacing).ceil().mul_add(spacing, -a.dist)).max(0.0);
            // Counted per segment, never accumulated: adding spacing to a long arc length
            // eventually stops changing it.
            let first = ((enter.mul_add(len, -phase)) / spacing).ceil().max(0.0) as u64;
            let last_offset = exit * len;
            let mut dabs = smallvec::SmallVec::new();
            for index in first.. {
                let offset = (index as f32).mul_add(spacing, phase);
                // Half-open [a, b), so shared endpoints aren't stamped twice.
                if offset >= len || offset > last_offset {
                    break;
                }
                // fractional [0, 1] distance between a and b.
                dabs.push(make_dab(&a.lerp(b, offset / len)));
            }
            dabs
        })
        .collect();

    if let Some(last) = stroke.points.last() {
        dabs.push(make_dab(last));
    }
    dabs
}

/// Fraction `[enter, exit]` of the logical segment `a` to `b` that passes within `reach`
/// physical pixels of a canvas of `size`. `None` if it never does.
#[allow(clippy::cast_precision_loss)]
fn visible_span(
    a: [f32; 2],
    b: [f32; 2],
    scale_factor: f32,
    reach: f32,
    size: [u32; 2],
) -> Option<[f32; 2]> {
    let (mut enter, mut exit) = (0.0f32, 1.0f32);
    for axis in 0..2 {
        let start = a[axis] * scale_factor;
        let delta = (b[axis] - a[axis]) * scale_factor;
        let (low, high) = (-reach, size[axis] as f32 + reach);
        if delta == 0.0 {
            if start < low || start > high {
                return None;
            }
            continue;
        }
        let (t0, t1) = ((low - start) / delta, (high - start) / delta);
        enter = enter.max(t0.min(t1));
        exit = exit.min(t0.max(t1));
    }
    (enter <= exit).then_some([enter, exit])
}

/// Coverage of the pixel whose top-left corner is at `(x, y)` by the dab.
fn dab_coverage(tip: TipShape, dab: &Dab, x: f32, y: f32) -> f32 {
    let radius = dab.diameter / 2.0;
    match tip {
        TipShape::Round => {
            let dx = x + 0.5 - dab.center[0];
            let dy = y + 0.5 - dab.center[1];
            let distance = (dx * dx + dy * dy).sqrt();
            (radius + 0.5 - distance).clamp(0.0, 1.0)
        }
        TipShape::Square => {
            let overlap = |pixel: f32, center: f32| {
                ((pixel + 1.0).min(center + radius) - pixel.max(center - radius)).max(0.0)
            };
            overlap(x, dab.center[0]) * overlap(y, dab.center[1])
        }
    }
}

/// Pixel rectangle `[min, max)` touched by the dabs, clipped to `[0, size)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn touched_pixels(dabs: &[Dab], size: [u32; 2]) -> Option<[[u32; 2]; 2]> {
    let (min, max) = dabs.iter().fold(
        ([f32::INFINITY; 2], [f32::NEG_INFINITY; 2]),
        |(min, max), dab| {
            // Round tips antialias half a pixel beyond their radius.
            let reach = dab.diameter / 2.0 + 1.0;
            (
                [min[0].min(dab.center[0] - reach), min[1].min(dab.center[1] - reach)],
                [max[0].max(dab.center[0] + reach), max[1].max(dab.center[1] + reach)],
            )
        },
    );
    let clip = |v: f32, limit: u32| -> u32 {
        if v.is_nan() {
            0
        } else {
            // Saturating float->int cast.
            (v.max(0.0) as u32).min(limit)
        }
    };
    let min = [clip(min[0].floor(), size[0]), clip(min[1].floor(), size[1])];
    let max = [clip(max[0].ceil(), size[0]), clip(max[1].ceil(), size[1])];
    (min[0] < max[0] && min[1] < max[1]).then_some([min, max])
}

/// Stamp the stroke into a coverage mask spanning the pixels it touches.
/// `None` if it touches no pixels of a `size` canvas.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coverage_of(
    stroke: &Stroke,
    size: [u32; 2],
    scale_factor: f32,
) -> Option<([u32; 2], Coverage)> {
    let dabs = dabs_within(stroke, scale_factor, Some(size));
    let [min, max] = touched_pixels(&dabs, size)?;
    let mut coverage = Coverage::new(max[0] - min[0], max[1] - min[1]);
    let tip = stroke.brush.tip;

    for dab in &dabs {
        let Some([dab_min, dab_max]) = touched_pixels(std::slice::from_ref(dab), size) else {
            continue;
        };
        for y in dab_min[1]..dab_max[1] {
            for x in dab_min[0]..dab_max[0] {
                let cov = dab_coverage(tip, dab, x as f32, y as f32);
                let px = coverage.get_pixel_mut(x - min[0], y - min[1]);
                px.0[0] = px.0[0].max(cov);
            }
        }
    }
    Some((min, coverage))
}

/// Stamp a single stroke onto `layer` with its color and blend mode, scaling stroke geometry by
/// `scale_factor`.
pub fn stamp_stroke(layer: &mut Raster, stroke: &Stroke, scale_factor: f32) {
    if let Err(e) = stroke.brush.validate() {
        log::warn!("skipping stroke with invalid brush: {e}");
        return;
    }
    let size = [layer.width(), layer.height()];
    let Some((origin, coverage)) = coverage_of(stroke, size, scale_factor) else {
        return;
    };
    layer.apply_coverage(
        origin,
        &coverage,
        stroke.brush.color.as_array(),
        stroke.brush.blend_mode(),
    );
}

/// Rasterize every active stroke of the collection onto a transparent raster of `size` physical
/// pixels, scaling stroke geometry by `scale_factor`.
#[must_use]
pub fn rasterize(strokes: &StrokeCollection, size: [u32; 2], scale_factor: f32) -> Raster {
    let mut layer = Raster::new(size[0], size[1]);
    for stroke in strokes.iter_active() {
        stamp_stroke(&mut layer, stroke, scale_factor);
    }
    layer
}
