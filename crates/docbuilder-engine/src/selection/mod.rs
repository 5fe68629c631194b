//! # Block selection
//!
//! Multi-block selection over the visible block sequence:
//!
//! - **Rubber-band**: a primary pointer-down on block chrome starts a drag.
//!   Moves are coalesced into one pending point that is applied on the
//!   next [`SelectionEngine::animation_frame`]. Every frame re-runs the hit
//!   test and replaces the selection. Nothing reaches history until the
//!   gesture ends.
//! - **Keyboard and click**: toggle, range and clear work without a drag.
//! - **History**: [`SelectionEngine::select_blocks`] is the only path that
//!   records a snapshot; undo/redo move the cursor.
//!
//! The engine never mutates blocks. Keyboard shortcuts that would change
//! the document come out of [`SelectionEngine::handle_key`] as [`Intent`]s.

pub mod geometry;
pub mod history;
pub mod input;
pub mod intent;

pub use geometry::{LayoutIndex, Point, Rect, SpatialIndex};
pub use history::SelectionHistory;
pub use input::{FocusTarget, Key, KeyInput, Modifiers, PointerButton, PointerDown};
pub use intent::Intent;

use crate::editing::reorder::Direction;
use crate::models::BlockId;

/// Drags smaller than this in both axes are clicks, not selections
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Observable selection state
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionState {
    pub selected_ids: Vec<BlockId>,
    pub is_selecting: bool,
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub history: SelectionHistory,
}

#[derive(Debug, Default)]
pub struct SelectionEngine {
    state: SelectionState,
    /// Latest pointer position not yet applied by a frame
    pending_point: Option<Point>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_ids(&self) -> &[BlockId] {
        &self.state.selected_ids
    }

    pub fn is_selected(&self, id: BlockId) -> bool {
        self.state.selected_ids.contains(&id)
    }

    pub fn is_selecting(&self) -> bool {
        self.state.is_selecting
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.state.history
    }

    /// Replace the selection and record it in history
    pub fn select_blocks(&mut self, ids: Vec<BlockId>) {
        log::debug!("Selection committed: {} blocks", ids.len());
        self.state.history.push(ids.clone());
        self.state.selected_ids = ids;
    }

    pub fn toggle_selection(&mut self, id: BlockId) {
        let mut ids = self.state.selected_ids.clone();
        match ids.iter().position(|selected| *selected == id) {
            Some(index) => {
                ids.remove(index);
            }
            None => ids.push(id),
        }
        self.select_blocks(ids);
    }

    /// Select the inclusive span between two blocks of `visible_order`
    ///
    /// Either endpoint may come first. Returns false, leaving the selection
    /// alone, if either id is not in `visible_order`.
    pub fn select_range(
        &mut self,
        anchor: BlockId,
        target: BlockId,
        visible_order: &[BlockId],
    ) -> bool {
        let position = |id: BlockId| visible_order.iter().position(|candidate| *candidate == id);
        let (Some(a), Some(b)) = (position(anchor), position(target)) else {
            return false;
        };

        let (start, end) = (a.min(b), a.max(b));
        self.select_blocks(visible_order[start..=end].to_vec());
        true
    }

    /// Pointer-down on a block itself
    ///
    /// Shift extends from the first selected block, Ctrl/Cmd toggles, and
    /// a plain click adds the block if it is not already selected.
    pub fn click_block(&mut self, id: BlockId, modifiers: Modifiers, visible_order: &[BlockId]) {
        if modifiers.shift {
            if let Some(anchor) = self.state.selected_ids.first().copied() {
                self.select_range(anchor, id, visible_order);
            }
        } else if modifiers.command() || !self.is_selected(id) {
            self.toggle_selection(id);
        }
    }

    /// Drop the selection and any drag in progress. Not recorded in history.
    pub fn clear_selection(&mut self) {
        self.state.selected_ids.clear();
        self.reset_drag();
    }

    pub fn undo(&mut self) -> bool {
        match self.state.history.undo() {
            Some(ids) => {
                self.state.selected_ids = ids.to_vec();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.state.history.redo() {
            Some(ids) => {
                self.state.selected_ids = ids.to_vec();
                true
            }
            None => false,
        }
    }

    /// Start a rubber-band drag. Returns false when the press belongs to
    /// the content editor (editable target, modifier held, non-primary).
    pub fn pointer_down(&mut self, point: Point, event: PointerDown) -> bool {
        if event.button != PointerButton::Primary
            || event.modifiers.any()
            || event.target == FocusTarget::EditableContent
        {
            return false;
        }

        self.state.is_selecting = true;
        self.state.selected_ids.clear();
        self.state.start_point = Some(point);
        self.state.end_point = Some(point);
        self.pending_point = None;
        true
    }

    /// Queue a pointer position for the next frame
    pub fn pointer_move(&mut self, point: Point) {
        if !self.state.is_selecting {
            return;
        }
        if self.pending_point.is_none() && self.state.end_point == Some(point) {
            return;
        }
        self.pending_point = Some(point);
    }

    /// Apply the pending pointer position and re-run the hit test
    ///
    /// Returns false when there was nothing to apply.
    pub fn animation_frame(&mut self, index: &dyn SpatialIndex) -> bool {
        let Some(point) = self.pending_point.take() else {
            return false;
        };
        if !self.state.is_selecting {
            return false;
        }

        self.state.end_point = Some(point);
        self.state.selected_ids = match self.visible_rect() {
            Some(rect) => index.query_blocks_intersecting(&rect),
            None => Vec::new(),
        };
        true
    }

    /// Finish the drag and commit its result to history
    ///
    /// A drag under [`DRAG_THRESHOLD`] in both axes is a click-through and
    /// leaves nothing selected. An empty hit set is not recorded.
    pub fn pointer_up(&mut self, index: &dyn SpatialIndex) -> &[BlockId] {
        if !self.state.is_selecting {
            return &self.state.selected_ids;
        }

        if let Some(point) = self.pending_point.take() {
            self.state.end_point = Some(point);
        }

        let hits = match self.visible_rect() {
            Some(rect) => index.query_blocks_intersecting(&rect),
            None => Vec::new(),
        };
        self.reset_drag();

        if hits.is_empty() {
            self.state.selected_ids.clear();
        } else {
            self.select_blocks(hits);
        }
        &self.state.selected_ids
    }

    /// The rubber-band rectangle, whatever its size
    pub fn selection_rect(&self) -> Option<Rect> {
        if !self.state.is_selecting {
            return None;
        }
        match (self.state.start_point, self.state.end_point) {
            (Some(start), Some(end)) => Some(Rect::from_points(start, end)),
            _ => None,
        }
    }

    /// The rectangle to draw: `None` until the drag passes the threshold
    pub fn visible_rect(&self) -> Option<Rect> {
        self.selection_rect()
            .filter(|rect| rect.width() >= DRAG_THRESHOLD || rect.height() >= DRAG_THRESHOLD)
    }

    /// Map a key press to selection changes or a block intent
    ///
    /// Keys pressed inside editable content belong to the editor and are
    /// ignored here.
    pub fn handle_key(&mut self, input: KeyInput) -> Option<Intent> {
        if input.focus == FocusTarget::EditableContent {
            return None;
        }

        let has_selection = !self.state.selected_ids.is_empty();
        let modifiers = input.modifiers;
        match input.key {
            Key::ArrowUp | Key::ArrowDown if modifiers.alt && has_selection => {
                let direction = if input.key == Key::ArrowUp {
                    Direction::Up
                } else {
                    Direction::Down
                };
                Some(Intent::MoveSelected {
                    ids: self.state.selected_ids.clone(),
                    direction,
                })
            }
            Key::Char(c) if modifiers.command() => match c.to_ascii_lowercase() {
                'c' if has_selection => Some(Intent::CopySelected(self.state.selected_ids.clone())),
                'v' => Some(Intent::Paste),
                'z' => {
                    if modifiers.shift {
                        self.redo();
                    } else {
                        self.undo();
                    }
                    None
                }
                _ => None,
            },
            Key::Escape => {
                self.clear_selection();
                None
            }
            Key::Delete | Key::Backspace if has_selection => {
                let ids = std::mem::take(&mut self.state.selected_ids);
                self.reset_drag();
                Some(Intent::DeleteSelected(ids))
            }
            _ => None,
        }
    }

    /// Forget selected ids that no longer exist in the document
    pub fn retain_existing(&mut self, existing: &[BlockId]) {
        self.state
            .selected_ids
            .retain(|id| existing.contains(id));
    }

    fn reset_drag(&mut self) {
        self.state.is_selecting = false;
        self.state.start_point = None;
        self.state.end_point = None;
        self.pending_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Five blocks stacked 40px tall with 10px gaps, 200px wide
    fn layout() -> (Vec<BlockId>, LayoutIndex) {
        let ids: Vec<BlockId> = (0..5).map(|_| BlockId::new()).collect();
        let index = LayoutIndex::stacked(&ids, 200.0, 40.0, 10.0);
        (ids, index)
    }

    fn drag(
        engine: &mut SelectionEngine,
        index: &LayoutIndex,
        from: Point,
        to: Point,
    ) -> Vec<BlockId> {
        engine.pointer_down(from, PointerDown::primary());
        engine.pointer_move(to);
        engine.animation_frame(index);
        engine.pointer_up(index).to_vec()
    }

    #[test]
    fn test_drag_selects_intersecting_blocks() {
        let (ids, index) = layout();
        let mut engine = SelectionEngine::new();

        // Given a drag from inside block 1 down into block 3
        let selected = drag(&mut engine, &index, Point::new(20.0, 60.0), Point::new(80.0, 160.0));

        // Then blocks 1..=3 are selected and recorded once
        assert_eq!(selected, ids[1..=3].to_vec());
        assert_eq!(engine.history().len(), 1);
        assert!(!engine.is_selecting());
        assert_eq!(engine.selection_rect(), None);
    }

    #[test]
    fn test_drag_direction_does_not_matter() {
        let (_, index) = layout();
        let a = Point::new(150.0, 190.0);
        let b = Point::new(10.0, 45.0);

        let forward = drag(&mut SelectionEngine::new(), &index, a, b);
        let backward = drag(&mut SelectionEngine::new(), &index, b, a);

        assert_eq!(forward, backward);
        assert!(!forward.is_empty());
    }

    #[rstest]
    #[case(Point::new(102.0, 103.0))]
    #[case(Point::new(96.0, 104.9))]
    #[case(Point::new(100.0, 100.0))]
    fn test_short_drag_selects_nothing(#[case] end: Point) {
        let (_, index) = layout();
        let mut engine = SelectionEngine::new();

        let selected = drag(&mut engine, &index, Point::new(100.0, 100.0), end);

        assert!(selected.is_empty());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_short_drag_shows_no_box_while_dragging() {
        let (_, index) = layout();
        let mut engine = SelectionEngine::new();

        engine.pointer_down(Point::new(10.0, 10.0), PointerDown::primary());
        engine.pointer_move(Point::new(13.0, 12.0));
        engine.animation_frame(&index);

        assert!(engine.selection_rect().is_some());
        assert_eq!(engine.visible_rect(), None);
        assert!(engine.selected_ids().is_empty());
    }

    #[test]
    fn test_frames_update_selection_without_history() {
        let (ids, index) = layout();
        let mut engine = SelectionEngine::new();

        engine.pointer_down(Point::new(10.0, 10.0), PointerDown::primary());
        engine.pointer_move(Point::new(10.0, 60.0));
        assert!(engine.animation_frame(&index));
        assert_eq!(engine.selected_ids(), &ids[0..=1]);

        engine.pointer_move(Point::new(10.0, 210.0));
        engine.animation_frame(&index);
        assert_eq!(engine.selected_ids(), &ids[..]);

        // Moving back shrinks rather than merges
        engine.pointer_move(Point::new(10.0, 20.0));
        engine.animation_frame(&index);
        assert_eq!(engine.selected_ids(), &ids[0..=0]);

        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_moves_within_a_frame_are_coalesced() {
        let (ids, index) = layout();
        let mut engine = SelectionEngine::new();

        engine.pointer_down(Point::new(10.0, 10.0), PointerDown::primary());
        engine.pointer_move(Point::new(10.0, 60.0));
        engine.pointer_move(Point::new(10.0, 110.0));

        assert!(engine.animation_frame(&index));
        assert!(!engine.animation_frame(&index));
        assert_eq!(engine.state().end_point, Some(Point::new(10.0, 110.0)));
        assert_eq!(engine.selected_ids(), &ids[0..=2]);
    }

    #[test]
    fn test_repeated_point_is_not_queued() {
        let (_, index) = layout();
        let mut engine = SelectionEngine::new();

        engine.pointer_down(Point::new(10.0, 10.0), PointerDown::primary());
        engine.pointer_move(Point::new(10.0, 10.0));

        assert!(!engine.animation_frame(&index));
    }

    #[rstest]
    #[case(PointerDown { target: FocusTarget::EditableContent, ..PointerDown::primary() })]
    #[case(PointerDown { modifiers: Modifiers::shift(), ..PointerDown::primary() })]
    #[case(PointerDown { modifiers: Modifiers::ctrl(), ..PointerDown::primary() })]
    #[case(PointerDown { modifiers: Modifiers::alt(), ..PointerDown::primary() })]
    #[case(PointerDown { button: PointerButton::Secondary, ..PointerDown::primary() })]
    fn test_pointer_down_delegated_to_editor(#[case] event: PointerDown) {
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![BlockId::new()]);

        assert!(!engine.pointer_down(Point::new(0.0, 0.0), event));
        assert!(!engine.is_selecting());
        assert_eq!(engine.selected_ids().len(), 1);
    }

    #[test]
    fn test_drag_over_empty_space_clears() {
        let (ids, index) = layout();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![ids[0]]);

        let selected = drag(&mut engine, &index, Point::new(300.0, 0.0), Point::new(400.0, 100.0));

        assert!(selected.is_empty());
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let id = BlockId::new();
        let mut engine = SelectionEngine::new();

        engine.toggle_selection(id);
        assert!(engine.is_selected(id));
        engine.toggle_selection(id);
        assert!(!engine.is_selected(id));
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_select_range_either_direction() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();

        assert!(engine.select_range(ids[3], ids[1], &ids));
        assert_eq!(engine.selected_ids(), &ids[1..=3]);

        assert!(engine.select_range(ids[1], ids[3], &ids));
        assert_eq!(engine.selected_ids(), &ids[1..=3]);
    }

    #[test]
    fn test_select_range_with_unknown_id_is_ignored() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();

        assert!(!engine.select_range(ids[0], BlockId::new(), &ids));
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_click_gestures() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();

        // Plain click adds
        engine.click_block(ids[1], Modifiers::NONE, &ids);
        assert_eq!(engine.selected_ids(), &[ids[1]]);

        // Plain click on a selected block keeps it
        engine.click_block(ids[1], Modifiers::NONE, &ids);
        assert_eq!(engine.selected_ids(), &[ids[1]]);

        // Shift extends from the first selected block
        engine.click_block(ids[3], Modifiers::shift(), &ids);
        assert_eq!(engine.selected_ids(), &ids[1..=3]);

        // Ctrl toggles
        engine.click_block(ids[2], Modifiers::ctrl(), &ids);
        assert_eq!(engine.selected_ids(), &[ids[1], ids[3]]);
    }

    #[test]
    fn test_undo_redo_replays_snapshots() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();
        let snapshots: Vec<Vec<BlockId>> = vec![
            vec![ids[0]],
            vec![ids[0], ids[1]],
            vec![ids[4]],
            ids[1..=3].to_vec(),
        ];
        for snapshot in &snapshots {
            engine.select_blocks(snapshot.clone());
        }

        // Undo back to the first snapshot
        for expected in snapshots.iter().rev().skip(1) {
            assert!(engine.undo());
            assert_eq!(engine.selected_ids(), expected.as_slice());
        }
        assert!(!engine.undo());

        // Redo forward reproduces the same sequence
        for expected in snapshots.iter().skip(1) {
            assert!(engine.redo());
            assert_eq!(engine.selected_ids(), expected.as_slice());
        }
        assert!(!engine.redo());
        assert_eq!(engine.history().len(), snapshots.len());
    }

    #[test]
    fn test_new_selection_after_undo_discards_future() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![ids[0]]);
        engine.select_blocks(vec![ids[1]]);

        engine.undo();
        engine.select_blocks(vec![ids[2]]);

        assert!(!engine.redo());
        insta::assert_debug_snapshot!(engine.history().index(), @r"
        Some(
            1,
        )
        ");
    }

    #[test]
    fn test_clear_is_not_recorded() {
        let id = BlockId::new();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![id]);

        engine.clear_selection();

        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_keyboard_intents() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![ids[1], ids[2]]);

        let move_up = engine.handle_key(KeyInput::new(Key::ArrowUp, Modifiers::alt()));
        assert_eq!(
            move_up,
            Some(Intent::MoveSelected {
                ids: vec![ids[1], ids[2]],
                direction: Direction::Up,
            })
        );

        let copy = engine.handle_key(KeyInput::new(Key::Char('c'), Modifiers::ctrl()));
        assert_eq!(copy, Some(Intent::CopySelected(vec![ids[1], ids[2]])));

        let paste = engine.handle_key(KeyInput::new(Key::Char('v'), Modifiers::ctrl()));
        assert_eq!(paste, Some(Intent::Paste));

        let delete = engine.handle_key(KeyInput::new(Key::Delete, Modifiers::NONE));
        assert_eq!(delete, Some(Intent::DeleteSelected(vec![ids[1], ids[2]])));
        assert!(engine.selected_ids().is_empty());
    }

    #[test]
    fn test_keys_in_editable_content_are_ignored() {
        let id = BlockId::new();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![id]);

        let intent =
            engine.handle_key(KeyInput::new(Key::Backspace, Modifiers::NONE).in_editable());

        assert_eq!(intent, None);
        assert_eq!(engine.selected_ids(), &[id]);
    }

    #[test]
    fn test_keyboard_undo_redo_and_escape() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![ids[0]]);
        engine.select_blocks(vec![ids[1]]);

        engine.handle_key(KeyInput::new(Key::Char('z'), Modifiers::ctrl()));
        assert_eq!(engine.selected_ids(), &[ids[0]]);

        let redo = Modifiers {
            shift: true,
            meta: true,
            ..Modifiers::NONE
        };
        engine.handle_key(KeyInput::new(Key::Char('Z'), redo));
        assert_eq!(engine.selected_ids(), &[ids[1]]);

        engine.handle_key(KeyInput::new(Key::Escape, Modifiers::NONE));
        assert!(engine.selected_ids().is_empty());
    }

    #[test]
    fn test_delete_without_selection_is_ignored() {
        let mut engine = SelectionEngine::new();
        assert_eq!(engine.handle_key(KeyInput::new(Key::Delete, Modifiers::NONE)), None);
    }

    #[test]
    fn test_retain_existing_prunes_deleted_ids() {
        let (ids, _) = layout();
        let mut engine = SelectionEngine::new();
        engine.select_blocks(vec![ids[0], ids[1]]);

        engine.retain_existing(&ids[1..]);

        assert_eq!(engine.selected_ids(), &[ids[1]]);
    }
}
