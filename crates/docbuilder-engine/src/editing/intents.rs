use crate::editing::clipboard::{self, TransientStore};
use crate::editing::store::{BlockStore, StoreError};
use crate::selection::Intent;

/// What executing an intent did to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Deleted(usize),
    Copied(usize),
    Pasted(usize),
    Moved,
    /// The move was refused because a block sits at the edge
    Unmoved,
}

/// Carry out a selection intent against the store
pub fn execute(
    store: &mut BlockStore,
    clipboard: &mut dyn TransientStore,
    intent: Intent,
) -> Result<IntentOutcome, StoreError> {
    match intent {
        Intent::DeleteSelected(ids) => {
            let mut deleted = 0;
            for id in ids {
                if store.delete(id)?.is_some() {
                    deleted += 1;
                }
            }
            store.normalize_order()?;
            Ok(IntentOutcome::Deleted(deleted))
        }
        Intent::CopySelected(ids) => {
            let copied = clipboard::copy_blocks(store, &ids, clipboard)?;
            Ok(IntentOutcome::Copied(copied))
        }
        Intent::Paste => {
            let pasted = clipboard::paste_blocks(store, clipboard)?;
            Ok(IntentOutcome::Pasted(pasted.len()))
        }
        Intent::MoveSelected { ids, direction } => {
            if store.move_selected(&ids, direction)? {
                Ok(IntentOutcome::Moved)
            } else {
                Ok(IntentOutcome::Unmoved)
            }
        }
    }
}
