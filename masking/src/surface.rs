//! # Drawing surface
//!
//! Owns the stroke collection and turns pointer input into strokes while attached as the active
//! input responder. Also carries the tool picker that decides what new strokes look like.

use masking_core::{
    brush::{StrokeBrushSettings, Tool},
    raster::Raster,
    stamp,
    stroke::Stroke,
    CanvasSize, StrokeCollection,
};

use crate::stylus_events::{InputPolicy, StylusEvent};

/// What the compositor and shell may read from a drawing surface.
pub trait DrawingSurface {
    /// Read-only snapshot of the committed strokes.
    fn drawing(&self) -> &StrokeCollection;
    /// Rasterize the committed strokes into a transparent image of `size`.
    /// `None` if `size` covers no physical pixels.
    fn image(&self, size: CanvasSize) -> Option<Raster> {
        let [width, height] = size.size_physical_pixels();
        if width == 0 || height == 0 {
            return None;
        }
        Some(stamp::rasterize(
            self.drawing(),
            [width, height],
            size.scale_factor,
        ))
    }
}

/// The current brush, and whether the picker is on screen.
#[derive(Clone, Debug)]
pub struct ToolPicker {
    settings: StrokeBrushSettings,
    visible: bool,
}
impl ToolPicker {
    #[must_use]
    pub fn new(tool: Tool) -> Self {
        Self {
            settings: tool.default_settings(),
            visible: false,
        }
    }
    /// Pick a tool, resetting the brush to that tool's defaults.
    pub fn select(&mut self, tool: Tool) {
        if self.settings.tool != tool {
            log::debug!("selected {}", tool.as_ref());
            self.settings = tool.default_settings();
        }
    }
    /// Replace the brush settings outright. Invalid settings are refused.
    pub fn set_settings(
        &mut self,
        settings: StrokeBrushSettings,
    ) -> Result<(), masking_core::brush::BrushSettingsError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }
    #[must_use]
    pub fn settings(&self) -> &StrokeBrushSettings {
        &self.settings
    }
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.settings.tool
    }
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

pub struct Canvas {
    strokes: StrokeCollection,
    in_progress_stroke: Option<Stroke>,
    policy: InputPolicy,
    picker: ToolPicker,
    attached: bool,
    /// Bumped on every visible change, for cheap cache invalidation.
    generation: u64,
}
impl DrawingSurface for Canvas {
    fn drawing(&self) -> &StrokeCollection {
        &self.strokes
    }
}
impl Canvas {
    #[must_use]
    pub fn new(policy: InputPolicy, tool: Tool) -> Self {
        Self {
            strokes: StrokeCollection::default(),
            in_progress_stroke: None,
            policy,
            picker: ToolPicker::new(tool),
            attached: false,
            generation: 0,
        }
    }
    /// Become the active input responder, showing the tool picker.
    pub fn attach(&mut self) {
        self.attached = true;
        self.picker.visible = true;
    }
    /// Resign the active input responder. A stroke still in progress is committed.
    pub fn detach(&mut self) {
        self.commit_in_progress();
        self.attached = false;
        self.picker.visible = false;
    }
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }
    #[must_use]
    pub fn input_policy(&self) -> InputPolicy {
        self.policy
    }
    pub fn set_input_policy(&mut self, policy: InputPolicy) {
        self.policy = policy;
    }
    #[must_use]
    pub fn tool_picker(&self) -> &ToolPicker {
        &self.picker
    }
    pub fn tool_picker_mut(&mut self) -> &mut ToolPicker {
        &mut self.picker
    }
    /// The stroke currently being drawn, not yet part of [`DrawingSurface::drawing`].
    #[must_use]
    pub fn in_progress(&self) -> Option<&Stroke> {
        self.in_progress_stroke.as_ref()
    }
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
    /// Feed a frame of pointer events. Ignored entirely while detached.
    pub fn process(&mut self, events: &[StylusEvent]) {
        if !self.attached {
            return;
        }
        for event in events {
            if !self.policy.accepts(event.kind) {
                log::trace!(
                    "{:?} input rejected by {} policy",
                    event.kind,
                    self.policy.as_ref()
                );
                continue;
            }
            if event.pressed {
                // Get stroke-in-progress or start anew.
                let brush = *self.picker.settings();
                let this_stroke = self
                    .in_progress_stroke
                    .get_or_insert_with(|| Stroke::new(brush));
                let pos = [event.pos.0, event.pos.1];
                // Holding still shouldn't pile up duplicate samples.
                if this_stroke.points.last().is_some_and(|last| last.pos == pos) {
                    continue;
                }
                this_stroke.push(pos, event.pressure.unwrap_or(1.0));
                self.generation += 1;
            } else {
                self.commit_in_progress();
            }
        }
    }
    pub fn undo(&mut self) -> bool {
        let changed = self.strokes.undo();
        self.generation += u64::from(changed);
        changed
    }
    pub fn redo(&mut self) -> bool {
        let changed = self.strokes.redo();
        self.generation += u64::from(changed);
        changed
    }
    /// Drop every stroke, including any in progress.
    pub fn clear(&mut self) {
        self.in_progress_stroke = None;
        self.strokes.clear();
        self.generation += 1;
    }
    /// Rasterize committed strokes plus the in-progress one, for on-screen preview.
    #[must_use]
    pub fn preview(&self, size: CanvasSize) -> Option<Raster> {
        let mut layer = self.image(size)?;
        if let Some(stroke) = &self.in_progress_stroke {
            stamp::stamp_stroke(&mut layer, stroke, size.scale_factor);
        }
        Some(layer)
    }
    fn commit_in_progress(&mut self) {
        if let Some(stroke) = self.in_progress_stroke.take() {
            log::trace!("committing stroke of {} points", stroke.points.len());
            self.strokes.push_back(stroke);
            self.generation += 1;
        }
    }
}
