pub mod editing;
pub mod export;
pub mod models;
pub mod selection;
pub mod storage;

// Re-export key types for easier usage
pub use editing::{BlockEvent, BlockEventKind, BlockStore, StoreError};
pub use export::{ExportError, ExportFile, ExportFormat};
pub use models::{Block, BlockId, BlockKind, Document, DocumentId, NewBlock};
pub use selection::{Intent, SelectionEngine};
pub use storage::{DocumentStorage, JsonFileStorage, MemoryStorage, StorageError};
