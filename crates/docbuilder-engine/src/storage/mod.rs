//! Document persistence
//!
//! Storage keeps whole documents. The block store of an open document
//! reaches it only through [`attach_persistence`], which mirrors bus events
//! into a document copy and writes it back after every mutation.

pub mod json_file;
pub mod memory;
pub mod persistence;

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::Document;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use persistence::{attach_persistence, open_document};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document store: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Called with the updated document after a notifying write
pub type DocumentListener = Box<dyn FnMut(&Document)>;

pub trait DocumentStorage {
    fn get(&self) -> Result<Vec<Document>, StorageError>;

    /// Replace every stored document
    fn save(&mut self, documents: &[Document], notify: bool) -> Result<(), StorageError>;

    /// Insert or replace one document by id
    ///
    /// With `notify` set, listeners run before this returns. Storage shared
    /// through a `RefCell` should go through [`update_and_notify`] so listeners
    /// can read it back.
    fn update(&mut self, document: &Document, notify: bool) -> Result<(), StorageError>;

    /// Handle to this storage's listener list
    fn listeners(&self) -> Listeners;

    fn subscribe(&self, listener: DocumentListener) {
        self.listeners().push(listener);
    }

    fn find(&self, id: crate::models::DocumentId) -> Result<Option<Document>, StorageError> {
        Ok(self.get()?.into_iter().find(|doc| doc.id == id))
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Document>, StorageError> {
        Ok(self.get()?.into_iter().find(|doc| doc.slug == slug))
    }
}

/// Shared handle to a storage's listeners
///
/// Clones refer to the same list. Listeners may subscribe others while being
/// notified; those hear the next notification.
#[derive(Clone, Default)]
pub struct Listeners(Rc<RefCell<Vec<DocumentListener>>>);

impl Listeners {
    pub fn push(&self, listener: DocumentListener) {
        self.0.borrow_mut().push(listener);
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, document: &Document) {
        let mut current = std::mem::take(&mut *self.0.borrow_mut());
        for listener in &mut current {
            listener(document);
        }
        let mut slot = self.0.borrow_mut();
        current.append(&mut slot);
        *slot = current;
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listeners({})", self.len())
    }
}

/// Write one document, then notify listeners after the borrow is released
pub fn update_and_notify<S>(storage: &RefCell<S>, document: &Document) -> Result<(), StorageError>
where
    S: DocumentStorage + ?Sized,
{
    let listeners = {
        let mut storage = storage.borrow_mut();
        storage.update(document, false)?;
        storage.listeners()
    };
    listeners.notify(document);
    Ok(())
}

pub(crate) fn upsert(documents: &mut Vec<Document>, document: &Document) {
    match documents.iter_mut().find(|doc| doc.id == document.id) {
        Some(existing) => *existing = document.clone(),
        None => documents.push(document.clone()),
    }
}
