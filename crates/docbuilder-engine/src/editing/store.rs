use std::collections::HashSet;

use crate::editing::events::{BlockChanges, BlockEvent, EventBus, ReorderGesture};
use crate::editing::reorder::{self, Direction};
use crate::editing::validation::{ValidationErrors, ensure_valid};
use crate::models::{Block, BlockId, BlockKind, NewBlock};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("Block observer failed: {0}")]
    Observer(anyhow::Error),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Canonical ordered block sequence of the one open document
///
/// All mutations go through this type and are announced on its
/// [`EventBus`]. Mutations by id against an unknown id are no-ops and
/// return `Ok(None)`; validation failures leave the store untouched.
///
/// If an observer fails, the mutation has already been applied and the
/// observer's error comes back as [`StoreError::Observer`].
#[derive(Debug, Default)]
pub struct BlockStore {
    blocks: Vec<Block>,
    events: EventBus,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted blocks (see [`BlockStore::replace_all`])
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut store = Self::new();
        store.replace_all(blocks);
        store
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Store-wide rewrite from a persisted or replaced block list
    ///
    /// Sorts by order stamp, re-stamps order densely and gives fresh ids
    /// to any duplicates. Emits nothing: this is how a document is opened.
    pub fn replace_all(&mut self, mut blocks: Vec<Block>) {
        let mut seen = HashSet::new();
        for block in &mut blocks {
            if !seen.insert(block.id) {
                let fresh = BlockId::new();
                log::warn!("Duplicate block id {} replaced with {}", block.id, fresh);
                block.id = fresh;
                seen.insert(fresh);
            }
        }
        reorder::normalize(&mut blocks);
        self.blocks = blocks;
    }

    /// Append a new block built from `request`
    pub fn create(&mut self, request: NewBlock) -> Result<Block, StoreError> {
        let block = Block {
            id: BlockId::new(),
            kind: request.kind,
            content: request
                .content
                .unwrap_or_else(|| request.kind.default_content().to_string()),
            order: self.blocks.len(),
            language: request.language,
        };

        if let Err(errors) = ensure_valid(&block) {
            log::warn!("Rejected new {} block: {}", block.kind, errors);
            return Err(errors.into());
        }

        log::debug!("Created {} block {}", block.kind, block.id);
        self.blocks.push(block.clone());
        self.emit(BlockEvent::Create {
            block: block.clone(),
        })?;
        Ok(block)
    }

    /// Replace a block's content and, when given, its language
    ///
    /// `language: None` keeps the existing language; `Some("")` clears it.
    pub fn update(
        &mut self,
        id: BlockId,
        content: impl Into<String>,
        language: Option<String>,
    ) -> Result<Option<Block>, StoreError> {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            log::debug!("Update ignored for unknown block {id}");
            return Ok(None);
        };

        let content = content.into();
        block.content = content.clone();
        if let Some(language) = &language {
            block.language = if language.is_empty() {
                None
            } else {
                Some(language.clone())
            };
        }
        let updated = block.clone();

        self.emit(BlockEvent::Update {
            block: updated.clone(),
            changes: BlockChanges { content, language },
        })?;
        Ok(Some(updated))
    }

    /// Change a block's kind in place, keeping its id and order
    ///
    /// Content and language are replaced only when supplied. The result is
    /// validated against the new kind; on failure the block is unchanged.
    pub fn transform(
        &mut self,
        id: BlockId,
        kind: BlockKind,
        content: Option<String>,
        language: Option<String>,
    ) -> Result<Option<Block>, StoreError> {
        let Some(index) = self.index_of(id) else {
            log::debug!("Transform ignored for unknown block {id}");
            return Ok(None);
        };

        let current = &self.blocks[index];
        let previous_kind = current.kind;
        let transformed = Block {
            id: current.id,
            kind,
            content: content.unwrap_or_else(|| current.content.clone()),
            order: current.order,
            language: language.or_else(|| current.language.clone()),
        };

        if let Err(errors) = ensure_valid(&transformed) {
            log::warn!("Rejected transform of {id} from {previous_kind} to {kind}: {errors}");
            return Err(errors.into());
        }

        log::debug!("Transformed block {id} from {previous_kind} to {kind}");
        self.blocks[index] = transformed.clone();
        self.emit(BlockEvent::Transform {
            block: transformed.clone(),
            previous_kind,
        })?;
        Ok(Some(transformed))
    }

    /// Remove a block. Does not renumber the remaining blocks; callers
    /// follow up with [`BlockStore::normalize_order`].
    pub fn delete(&mut self, id: BlockId) -> Result<Option<Block>, StoreError> {
        let Some(index) = self.index_of(id) else {
            return Ok(None);
        };

        let removed = self.blocks.remove(index);
        log::debug!("Deleted block {id}");
        self.emit(BlockEvent::Delete {
            block: removed.clone(),
        })?;
        Ok(Some(removed))
    }

    /// Re-stamp order to 0..n-1, emitting a renumber event if anything changed
    pub fn normalize_order(&mut self) -> Result<(), StoreError> {
        let dense = self
            .blocks
            .iter()
            .enumerate()
            .all(|(index, block)| block.order == index);
        if dense {
            return Ok(());
        }

        reorder::renumber(&mut self.blocks);
        self.emit(BlockEvent::Reorder {
            blocks: self.blocks.clone(),
            gesture: ReorderGesture::Renumber,
        })
    }

    /// Apply a drag-and-drop move
    pub fn reorder(
        &mut self,
        source_index: usize,
        destination_index: usize,
    ) -> Result<(), StoreError> {
        self.blocks = reorder::reorder(&self.blocks, source_index, destination_index);
        self.emit(BlockEvent::Reorder {
            blocks: self.blocks.clone(),
            gesture: ReorderGesture::Drag {
                source_index,
                destination_index,
            },
        })
    }

    /// Move a multi-selection one step. Returns false when the move was
    /// refused because a selected block sits at the edge.
    pub fn move_selected(
        &mut self,
        ids: &[BlockId],
        direction: Direction,
    ) -> Result<bool, StoreError> {
        let Some(moved) = reorder::move_selected(&self.blocks, ids, direction) else {
            return Ok(false);
        };

        self.blocks = moved;
        self.emit(BlockEvent::Reorder {
            blocks: self.blocks.clone(),
            gesture: ReorderGesture::Move { direction },
        })?;
        Ok(true)
    }

    /// Append blocks that arrive from outside (paste), giving them fresh ids
    ///
    /// Every block is validated before any is inserted.
    pub fn append_copies(&mut self, blocks: Vec<Block>) -> Result<Vec<Block>, StoreError> {
        let mut copies = Vec::with_capacity(blocks.len());
        for (offset, block) in blocks.into_iter().enumerate() {
            let copy = Block {
                id: BlockId::new(),
                order: self.blocks.len() + offset,
                ..block
            };
            ensure_valid(&copy)?;
            copies.push(copy);
        }

        self.blocks.extend(copies.iter().cloned());
        for copy in &copies {
            self.emit(BlockEvent::Create {
                block: copy.clone(),
            })?;
        }
        self.normalize_order()?;
        Ok(copies)
    }

    fn emit(&mut self, event: BlockEvent) -> Result<(), StoreError> {
        self.events.emit(&event).map_err(StoreError::Observer)
    }
}
