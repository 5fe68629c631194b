use crate::editing::reorder::Direction;
use crate::models::BlockId;

/// Named action the selection layer asks the block store to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    DeleteSelected(Vec<BlockId>),
    CopySelected(Vec<BlockId>),
    Paste,
    MoveSelected {
        ids: Vec<BlockId>,
        direction: Direction,
    },
}
