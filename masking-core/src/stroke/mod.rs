//! # Strokes
//!
//! A stroke is one continuous gesture: a polyline of sampled points plus the brush it was drawn with.

use crate::brush::StrokeBrushSettings;

#[derive(Copy, Clone, PartialEq, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Point {
    /// Position in logical canvas pixels, origin top-left.
    pub pos: [f32; 2],
    /// Normalized pressure. Devices without pressure report `1.0`.
    pub pressure: f32,
    /// Arc length of stroke from beginning to this point
    pub dist: f32,
}
impl Point {
    #[must_use]
    pub fn lerp(&self, other: &Self, factor: f32) -> Self {
        let mix = |a: f32, b: f32| (b - a).mul_add(factor, a);
        Self {
            pos: [
                mix(self.pos[0], other.pos[0]),
                mix(self.pos[1], other.pos[1]),
            ],
            pressure: mix(self.pressure, other.pressure),
            dist: mix(self.dist, other.dist),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub brush: StrokeBrushSettings,
    pub points: Vec<Point>,
}
impl Stroke {
    #[must_use]
    pub fn new(brush: StrokeBrushSettings) -> Self {
        Self {
            brush,
            points: Vec::new(),
        }
    }
    /// Append a sample, accumulating arc length from the previous sample.
    pub fn push(&mut self, pos: [f32; 2], pressure: f32) {
        // Calc cumulative distance from the start, or 0.0 if this is the first point.
        let dist = self.points.last().map_or(0.0, |last| {
            let delta = [last.pos[0] - pos[0], last.pos[1] - pos[1]];
            last.dist + (delta[0] * delta[0] + delta[1] * delta[1]).sqrt()
        });
        self.points.push(Point {
            pos,
            pressure,
            dist,
        });
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// Total arc length of the stroke.
    #[must_use]
    pub fn arc_length(&self) -> f32 {
        self.points.last().map_or(0.0, |last| last.dist)
    }
    /// Axis-aligned bounds `[min, max]` of the stroke including the tip, in logical pixels.
    #[must_use]
    pub fn bounds(&self) -> Option<[[f32; 2]; 2]> {
        let radius = self.brush.size / 2.0;
        self.points.iter().fold(None, |acc, point| {
            let [x, y] = point.pos;
            let [[min_x, min_y], [max_x, max_y]] =
                acc.unwrap_or([[f32::INFINITY; 2], [f32::NEG_INFINITY; 2]]);
            Some([
                [min_x.min(x - radius), min_y.min(y - radius)],
                [max_x.max(x + radius), max_y.max(y + radius)],
            ])
        })
    }
}
