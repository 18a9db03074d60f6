//! # Session
//!
//! Everything one run of the editor knows: the current background image, the measured canvas
//! size, the drawing surface, and whether the editor is showing. Passed around by reference;
//! there is no global session.

use masking_core::{compositor, CanvasSize};

use crate::surface::{Canvas, DrawingSurface};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum EditorState {
    /// Editor hidden, background showing.
    #[default]
    Idle,
    /// Editor showing, surface capturing input.
    Editing,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("the editor is already open")]
    AlreadyEditing,
    #[error("the editor is not open")]
    NotEditing,
}

/// What a save did to the background.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SaveOutcome {
    /// The background was replaced by a flattened image of this many physical pixels.
    Flattened { width: u32, height: u32 },
    /// The canvas hasn't been measured, or measured empty. The background is unchanged.
    Unmeasured,
}

pub struct Session {
    background: Option<image::RgbaImage>,
    canvas_size: Option<CanvasSize>,
    canvas: Canvas,
    editor: EditorState,
}
impl Session {
    #[must_use]
    pub fn new(background: Option<image::RgbaImage>, canvas: Canvas) -> Self {
        Self {
            background,
            canvas_size: None,
            canvas,
            editor: EditorState::Idle,
        }
    }
    #[must_use]
    pub fn background(&self) -> Option<&image::RgbaImage> {
        self.background.as_ref()
    }
    /// The size last measured by layout, if any.
    #[must_use]
    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.canvas_size
    }
    /// Record the display size of the background, as measured by layout.
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        if self.canvas_size != Some(size) {
            log::debug!("canvas measured at {size}");
            self.canvas_size = Some(size);
        }
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
    #[must_use]
    pub fn editor_state(&self) -> EditorState {
        self.editor
    }
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editor == EditorState::Editing
    }
    /// Show the editor over the background and start capturing input.
    pub fn open_editor(&mut self) -> Result<(), SessionError> {
        if self.is_editing() {
            return Err(SessionError::AlreadyEditing);
        }
        self.canvas.attach();
        self.editor = EditorState::Editing;
        log::info!("editor opened");
        Ok(())
    }
    /// Flatten the strokes onto the background, replace the background with the result, and
    /// hide the editor.
    ///
    /// Without a measured, non-empty canvas size there is nothing meaningful to flatten into:
    /// the background and strokes are kept as they are, and the editor still closes.
    pub fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }
        self.canvas.detach();

        let flattened = self.canvas_size.and_then(|size| {
            compositor::flatten(self.background.as_ref(), self.canvas.drawing(), size)
        });
        let outcome = if let Some(image) = flattened {
            let (width, height) = image.dimensions();
            self.background = Some(image);
            // The strokes live in the background now.
            self.canvas.clear();
            SaveOutcome::Flattened { width, height }
        } else {
            log::warn!(
                "canvas size {:?} can't be flattened into, keeping the current image",
                self.canvas_size
            );
            SaveOutcome::Unmeasured
        };

        self.editor = EditorState::Idle;
        log::info!("editor saved: {outcome:?}");
        Ok(outcome)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stylus_events::{InputPolicy, StylusEvent};
    use masking_core::brush::Tool;

    fn red(width: u32, height: u32) -> image::RgbaImage {
        image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]))
    }
    fn session(background: Option<image::RgbaImage>) -> Session {
        Session::new(background, Canvas::new(InputPolicy::Any, Tool::Pen))
    }
    fn scribble(session: &mut Session) {
        session.canvas_mut().process(&[
            StylusEvent::mouse((2.0, 2.0), true),
            StylusEvent::mouse((6.0, 2.0), true),
            StylusEvent::mouse((6.0, 2.0), false),
        ]);
    }

    #[test]
    fn open_then_save_returns_to_idle() {
        let mut session = session(Some(red(10, 10)));
        assert_eq!(session.editor_state(), EditorState::Idle);
        assert!(!session.canvas().is_attached());

        session.open_editor().unwrap();
        assert!(session.is_editing());
        assert!(session.canvas().is_attached());

        session.set_canvas_size(CanvasSize::new(10.0, 10.0));
        assert_eq!(
            session.save(),
            Ok(SaveOutcome::Flattened {
                width: 10,
                height: 10
            })
        );
        assert_eq!(session.editor_state(), EditorState::Idle);
        assert!(!session.canvas().is_attached());
    }
    #[test]
    fn invalid_transitions_are_refused() {
        let mut session = session(None);
        assert_eq!(session.save(), Err(SessionError::NotEditing));
        session.open_editor().unwrap();
        assert_eq!(session.open_editor(), Err(SessionError::AlreadyEditing));
        assert!(session.is_editing());
    }
    #[test]
    fn save_bakes_strokes_into_background() {
        let mut session = session(Some(red(10, 10)));
        session.set_canvas_size(CanvasSize::new(10.0, 10.0));
        session.open_editor().unwrap();
        scribble(&mut session);
        assert_eq!(session.canvas().drawing().len(), 1);

        session.save().unwrap();
        let background = session.background().unwrap();
        // Pen ink over red, and red away from the stroke.
        assert_eq!(background.get_pixel(4, 2).0, [0, 0, 0, 255]);
        assert_eq!(background.get_pixel(9, 9).0, [255, 0, 0, 255]);
        // Strokes were consumed, so saving again doesn't draw them twice.
        assert!(session.canvas().drawing().is_empty());
    }
    #[test]
    fn save_without_measurement_keeps_background() {
        let mut session = session(Some(red(10, 10)));
        session.open_editor().unwrap();
        scribble(&mut session);

        assert_eq!(session.save(), Ok(SaveOutcome::Unmeasured));
        assert_eq!(session.background(), Some(&red(10, 10)));
        assert_eq!(session.canvas().drawing().len(), 1);
        assert!(!session.is_editing());

        session.set_canvas_size(CanvasSize::ZERO);
        session.open_editor().unwrap();
        assert_eq!(session.save(), Ok(SaveOutcome::Unmeasured));
        assert_eq!(session.background(), Some(&red(10, 10)));
    }
    #[test]
    fn save_without_background_keeps_only_strokes() {
        let mut session = session(None);
        session.set_canvas_size(CanvasSize::new(8.0, 8.0));
        session.open_editor().unwrap();
        scribble(&mut session);
        session.save().unwrap();

        let background = session.background().unwrap();
        assert_eq!(background.dimensions(), (8, 8));
        assert_eq!(background.get_pixel(4, 2).0, [0, 0, 0, 255]);
        assert_eq!(background.get_pixel(7, 7).0, [0, 0, 0, 0]);
    }
}
