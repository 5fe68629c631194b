use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::export::file_name;
use crate::models::{Block, BlockId};

/// Unique identifier for a document, distinct from its slug
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit of persistence: a titled, ordered list of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create an empty document whose slug is derived from the title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        let slug = slug_for(&title);
        Self {
            id: DocumentId::new(),
            slug,
            title,
            description: String::new(),
            tags: Vec::new(),
            blocks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Blocks in display order (sorted by order stamp)
    pub fn sorted_blocks(&self) -> Vec<Block> {
        let mut blocks = self.blocks.clone();
        blocks.sort_by_key(|block| block.order);
        blocks
    }

    /// Replace a block with the same id, or append it when absent
    pub fn upsert_block(&mut self, block: Block) {
        match self.blocks.iter_mut().find(|b| b.id == block.id) {
            Some(existing) => *existing = block,
            None => self.blocks.push(block),
        }
    }

    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(index))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn slug_for(title: &str) -> String {
    let slug = file_name::normalize(title);
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Derive a slug for `title` that is not already in `taken`
///
/// Collisions get a numeric `-N` suffix, starting at 1.
pub fn unique_slug<'a>(title: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.into_iter().collect();
    let base = slug_for(title);
    let mut candidate = base.clone();
    let mut counter = 1;
    while taken.contains(&candidate.as_str()) {
        candidate = format!("{base}-{counter}");
        counter += 1;
    }
    candidate
}
