//! The window shell: shows the background, hosts the editor over it, and wires keys and the mouse
//! to the session.

use masking_core::{brush::Tool, raster::Raster, CanvasSize};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::{
    layers::{fit_size, LayerStack},
    preferences::Preferences,
    session::{SaveOutcome, Session},
    stylus_events::StylusEvent,
};

use anyhow::Result as AnyResult;

/// Shown around and beneath the canvas. 0RGB.
const IDLE_BACKDROP: u32 = 0x00_E0_E0_E0;
const EDITING_BACKDROP: u32 = 0x00_30_30_30;

const TOOL_KEYS: [(Key, Tool); 4] = [
    (Key::Key1, Tool::Pen),
    (Key::Key2, Tool::Marker),
    (Key::Key3, Tool::Pencil),
    (Key::Key4, Tool::Eraser),
];

pub struct Shell {
    window: Window,
    session: Session,
    /// Physical framebuffer size.
    size: [usize; 2],
    scale_factor: f32,
    layers: LayerStack,
    /// Drawing layer preview, and the surface generation it was made from.
    drawing_cache: Option<(u64, Raster)>,
    frame: Vec<u32>,
    /// Last pointer position while pressed, in logical pixels.
    pressed_at: Option<(f32, f32)>,
}
impl Shell {
    pub fn new(preferences: &Preferences, session: Session) -> AnyResult<Self> {
        const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

        let [width, height] = preferences.window_size.map(|v| v as usize);
        let mut window = Window::new(
            &format!("Masking v{}", VERSION.unwrap_or("[unknown]")),
            width,
            height,
            WindowOptions::default(),
        )
        .map_err(|e| anyhow::anyhow!("failed to create window: {e}"))?;
        window.set_target_fps(60);

        let mut shell = Self {
            window,
            session,
            size: [width, height],
            scale_factor: preferences.scale_factor,
            layers: LayerStack::new(None, CanvasSize::ZERO),
            drawing_cache: None,
            frame: vec![IDLE_BACKDROP; width * height],
            pressed_at: None,
        };
        shell.measure();
        shell.update_title();
        Ok(shell)
    }
    pub fn run(mut self) -> AnyResult<()> {
        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            self.handle_keys();
            self.handle_pointer();
            self.render();
            self.window
                .update_with_buffer(&self.frame, self.size[0], self.size[1])
                .map_err(|e| anyhow::anyhow!("failed to present frame: {e}"))?;
        }
        Ok(())
    }
    /// Lay the background out in the window, and record the result as the canvas size.
    #[allow(clippy::cast_precision_loss)]
    fn measure(&mut self) {
        let container = [
            self.size[0] as f32 / self.scale_factor,
            self.size[1] as f32 / self.scale_factor,
        ];
        let size = match self.session.background() {
            Some(image) => fit_size(image.dimensions(), container, self.scale_factor),
            // Nothing to fit, so the whole window is canvas.
            None => CanvasSize::new(container[0], container[1]).with_scale_factor(self.scale_factor),
        };
        self.session.set_canvas_size(size);
        self.layers = LayerStack::new(self.session.background(), size);
        self.drawing_cache = None;
    }
    fn update_title(&mut self) {
        let title = if self.session.is_editing() {
            let tool = self.session.canvas().tool_picker().tool();
            format!(
                "Masking [{}] - draw, S to save, 1-4 pick tool, Ctrl+Z/Ctrl+Y undo/redo",
                tool.as_ref()
            )
        } else {
            "Masking - O to open the image editor".to_owned()
        };
        self.window.set_title(&title);
    }
    fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
    fn handle_keys(&mut self) {
        if !self.session.is_editing() {
            if self.key_pressed(Key::O) {
                if let Err(e) = self.session.open_editor() {
                    log::warn!("can't open editor: {e}");
                }
                self.update_title();
            }
            return;
        }

        if self.key_pressed(Key::S) {
            self.pressed_at = None;
            match self.session.save() {
                Ok(SaveOutcome::Flattened { .. }) => self.measure(),
                Ok(SaveOutcome::Unmeasured) => (),
                Err(e) => log::warn!("can't save: {e}"),
            }
            self.update_title();
            return;
        }
        for (key, tool) in TOOL_KEYS {
            if self.key_pressed(key) {
                self.session.canvas_mut().tool_picker_mut().select(tool);
                self.update_title();
            }
        }
        let ctrl = self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl);
        if ctrl && self.key_pressed(Key::Z) {
            self.session.canvas_mut().undo();
        }
        if ctrl && self.key_pressed(Key::Y) {
            self.session.canvas_mut().redo();
        }
    }
    /// Forward the mouse to the surface as pressureless pointer events.
    fn handle_pointer(&mut self) {
        if !self.session.is_editing() {
            return;
        }
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x / self.scale_factor, y / self.scale_factor));

        let event = match (down, pos, self.pressed_at) {
            (true, Some(pos), _) => {
                self.pressed_at = Some(pos);
                StylusEvent::mouse(pos, true)
            }
            // Released, or dragged out of the window.
            (_, _, Some(last)) => {
                self.pressed_at = None;
                StylusEvent::mouse(last, false)
            }
            _ => return,
        };
        self.session.canvas_mut().process(&[event]);
    }
    fn render(&mut self) {
        let composed = if self.session.is_editing() {
            let canvas = self.session.canvas();
            let generation = canvas.generation();
            let stale = self
                .drawing_cache
                .as_ref()
                .map_or(true, |(cached, _)| *cached != generation);
            if stale {
                self.drawing_cache = canvas
                    .preview(self.layers.size())
                    .map(|layer| (generation, layer));
            }
            self.layers
                .compose(self.drawing_cache.as_ref().map(|(_, layer)| layer))
        } else {
            self.layers.compose(None)
        };
        let backdrop = if self.session.is_editing() {
            EDITING_BACKDROP
        } else {
            IDLE_BACKDROP
        };
        present_onto(&mut self.frame, self.size, &composed, backdrop);
    }
}

/// Fill `frame` with `backdrop`, then draw `raster` over it anchored top-left.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn present_onto(frame: &mut [u32], size: [usize; 2], raster: &Raster, backdrop: u32) {
    const SHIFTS: [u32; 3] = [16, 8, 0];
    frame.fill(backdrop);
    let backdrop = SHIFTS.map(|shift| ((backdrop >> shift) & 0xFF) as f32 / 255.0);
    let (width, height) = raster.dimensions();
    for y in 0..height.min(size[1] as u32) {
        for x in 0..width.min(size[0] as u32) {
            let Some([r, g, b, a]) = raster.get(x, y) else {
                continue;
            };
            // Premultiplied src-over an opaque backdrop.
            let rgb = [r, g, b];
            let pixel = (0..3).fold(0u32, |pixel, channel| {
                let value = backdrop[channel].mul_add(1.0 - a, rgb[channel]);
                pixel | (((value.clamp(0.0, 1.0) * 255.0).round() as u32) << SHIFTS[channel])
            });
            frame[y as usize * size[0] + x as usize] = pixel;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use masking_core::blend::BlendMode;
    #[test]
    fn transparent_shows_backdrop() {
        let mut frame = vec![0; 4 * 3];
        present_onto(&mut frame, [4, 3], &Raster::new(2, 2), 0x00_12_34_56);
        assert!(frame.iter().all(|&pixel| pixel == 0x00_12_34_56));
    }
    #[test]
    fn opaque_covers_backdrop() {
        let mut raster = Raster::new(2, 2);
        raster.apply_coverage(
            [1, 0],
            &image::ImageBuffer::from_pixel(1, 1, image::Luma([1.0f32])),
            [1.0, 0.0, 0.0, 1.0],
            BlendMode::Normal,
        );
        let mut frame = vec![0; 3 * 3];
        present_onto(&mut frame, [3, 3], &raster, EDITING_BACKDROP);
        assert_eq!(frame[1], 0x00_FF_00_00);
        assert_eq!(frame[0], EDITING_BACKDROP);
        // Outside the raster.
        assert_eq!(frame[8], EDITING_BACKDROP);
    }
}
