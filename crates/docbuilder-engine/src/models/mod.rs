pub mod block;
pub mod document;

pub use block::{Block, BlockId, BlockKind, NewBlock};
pub use document::{Document, DocumentId, unique_slug};
