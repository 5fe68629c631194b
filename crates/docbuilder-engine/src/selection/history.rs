use crate::models::BlockId;

/// Linear undo/redo history of selection snapshots
///
/// `index` is `None` while the history is empty and otherwise points at the
/// active snapshot. Pushing after an undo drops the abandoned future.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionHistory {
    entries: Vec<Vec<BlockId>>,
    index: Option<usize>,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ids: Vec<BlockId>) {
        let keep = self.index.map_or(0, |index| index + 1);
        self.entries.truncate(keep);
        self.entries.push(ids);
        self.index = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot. No-op at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&[BlockId]> {
        match self.index {
            Some(index) if index > 0 => {
                self.index = Some(index - 1);
                Some(&self.entries[index - 1])
            }
            _ => None,
        }
    }

    /// Step forward one snapshot. No-op at the newest snapshot.
    pub fn redo(&mut self) -> Option<&[BlockId]> {
        match self.index {
            Some(index) if index + 1 < self.entries.len() => {
                self.index = Some(index + 1);
                Some(&self.entries[index + 1])
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&[BlockId]> {
        self.index.map(|index| self.entries[index].as_slice())
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn entries(&self) -> &[Vec<BlockId>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|index| index > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|index| index + 1 < self.entries.len())
    }
}
