use std::collections::HashMap;

use crate::editing::store::{BlockStore, StoreError};
use crate::models::{Block, BlockId};

/// Well-known key the copied blocks are stored under
pub const CLIPBOARD_KEY: &str = "copied-blocks";

/// String key/value store for transient data such as copied blocks
pub trait TransientStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryTransientStore {
    entries: HashMap<String, String>,
}

impl MemoryTransientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransientStore for MemoryTransientStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Serialize the blocks named by `ids` (in store order) into the clipboard
///
/// Returns how many blocks were copied. Unknown ids are skipped.
pub fn copy_blocks(
    store: &BlockStore,
    ids: &[BlockId],
    clipboard: &mut dyn TransientStore,
) -> Result<usize, StoreError> {
    let copied: Vec<&Block> = store
        .blocks()
        .iter()
        .filter(|block| ids.contains(&block.id))
        .collect();

    let json = serde_json::to_string(&copied).map_err(|e| StoreError::Clipboard(e.to_string()))?;
    clipboard.set(CLIPBOARD_KEY, json);
    log::debug!("Copied {} blocks", copied.len());
    Ok(copied.len())
}

/// Append the clipboard's blocks to the end of the store under fresh ids
///
/// An empty clipboard pastes nothing.
pub fn paste_blocks(
    store: &mut BlockStore,
    clipboard: &dyn TransientStore,
) -> Result<Vec<Block>, StoreError> {
    let Some(json) = clipboard.get(CLIPBOARD_KEY) else {
        return Ok(Vec::new());
    };

    let blocks: Vec<Block> =
        serde_json::from_str(&json).map_err(|e| StoreError::Clipboard(e.to_string()))?;
    let pasted = store.append_copies(blocks)?;
    log::debug!("Pasted {} blocks", pasted.len());
    Ok(pasted)
}
