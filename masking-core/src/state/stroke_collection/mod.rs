//! # Strokes
//!
//! The ordered collection of strokes drawn on a surface, along with their undo state.
//! Undone strokes are kept at the tail so they can be redone, until a new stroke replaces them.

use crate::stroke::Stroke;

#[derive(Clone, Debug, Default)]
pub struct StrokeCollection {
    strokes: Vec<Stroke>,
    /// Flags to determine which strokes are active/not "Undone".
    /// Invariant: every inactive stroke comes after every active one.
    strokes_active: bitvec::vec::BitVec,
}
// Public methods for readers
impl StrokeCollection {
    /// Iterate the strokes that have not been undone, in draw order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes_active
            .iter_ones()
            // Short circuit iteration if we reach out-of-bounds (that'd be weird)
            .map_while(|index| self.strokes.get(index))
    }
    /// Number of active strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes_active.count_ones()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.strokes_active.any()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.strokes_active.not_all()
    }
}
// Mutation, owned by the drawing surface.
impl StrokeCollection {
    /// Insert a new stroke at the end, defaulting to active.
    /// Any undone strokes are discarded, as they can no longer be redone. Empty strokes are ignored.
    pub fn push_back(&mut self, stroke: Stroke) {
        if stroke.is_empty() {
            log::trace!("ignoring empty stroke");
            return;
        }
        let active = self.len();
        self.strokes.truncate(active);
        self.strokes_active.truncate(active);

        self.strokes.push(stroke);
        self.strokes_active.push(true);
    }
    /// Deactivate the most recent active stroke. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(last) = self.strokes_active.last_one() else {
            return false;
        };
        self.strokes_active.set(last, false);
        true
    }
    /// Reactivate the earliest undone stroke. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(first) = self.strokes_active.first_zero() else {
            return false;
        };
        self.strokes_active.set(first, true);
        true
    }
    /// Remove every stroke, including the redo history.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.strokes_active.clear();
    }
}

#[cfg(test)]
mod test {
    use super::StrokeCollection;
    use crate::stroke::Stroke;

    fn stroke_at(x: f32) -> Stroke {
        let mut stroke = Stroke::new(crate::brush::StrokeBrushSettings::default());
        stroke.push([x, 0.0], 1.0);
        stroke
    }
    fn active_xs(collection: &StrokeCollection) -> Vec<f32> {
        collection
            .iter_active()
            .map(|stroke| stroke.points[0].pos[0])
            .collect()
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut collection = StrokeCollection::default();
        assert!(!collection.undo());
        assert!(!collection.redo());

        collection.push_back(stroke_at(1.0));
        collection.push_back(stroke_at(2.0));
        collection.push_back(stroke_at(3.0));
        assert_eq!(collection.len(), 3);

        assert!(collection.undo());
        assert!(collection.undo());
        assert_eq!(active_xs(&collection), [1.0]);
        assert!(collection.can_redo());

        assert!(collection.redo());
        assert_eq!(active_xs(&collection), [1.0, 2.0]);
    }
    #[test]
    fn push_discards_redo_tail() {
        let mut collection = StrokeCollection::default();
        collection.push_back(stroke_at(1.0));
        collection.push_back(stroke_at(2.0));
        collection.undo();
        collection.push_back(stroke_at(3.0));

        assert_eq!(active_xs(&collection), [1.0, 3.0]);
        assert!(!collection.can_redo());
        assert!(!collection.redo());
    }
    #[test]
    fn empty_strokes_are_not_committed() {
        let mut collection = StrokeCollection::default();
        collection.push_back(Stroke::new(crate::brush::StrokeBrushSettings::default()));
        assert!(collection.is_empty());
        assert!(!collection.can_undo());
    }
    #[test]
    fn clear_drops_history() {
        let mut collection = StrokeCollection::default();
        collection.push_back(stroke_at(1.0));
        collection.undo();
        collection.clear();
        assert!(collection.is_empty());
        assert!(!collection.can_redo());
    }
}
