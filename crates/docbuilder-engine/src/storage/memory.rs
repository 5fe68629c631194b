use crate::models::Document;
use crate::storage::{DocumentStorage, Listeners, StorageError, upsert};

/// Storage held in memory, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Vec<Document>,
    listeners: Listeners,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            listeners: Listeners::default(),
        }
    }
}

impl DocumentStorage for MemoryStorage {
    fn get(&self) -> Result<Vec<Document>, StorageError> {
        Ok(self.documents.clone())
    }

    fn save(&mut self, documents: &[Document], notify: bool) -> Result<(), StorageError> {
        self.documents = documents.to_vec();
        if notify {
            for doc in documents {
                self.listeners.notify(doc);
            }
        }
        Ok(())
    }

    fn update(&mut self, document: &Document, notify: bool) -> Result<(), StorageError> {
        upsert(&mut self.documents, document);
        if notify {
            self.listeners.notify(document);
        }
        Ok(())
    }

    fn listeners(&self) -> Listeners {
        self.listeners.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_update_upserts_by_id() {
        let mut storage = MemoryStorage::new();
        let mut doc = Document::new("Guide");

        storage.update(&doc, false).unwrap();
        doc.title = "Guide v2".to_string();
        storage.update(&doc, false).unwrap();

        let stored = storage.get().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Guide v2");
    }

    #[test]
    fn test_listeners_only_hear_notifying_writes() {
        // Given a storage with a listener
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();
        let mut storage = MemoryStorage::new();
        storage.subscribe(Box::new(move |doc| sink.borrow_mut().push(doc.title.clone())));

        // When writing with and without notify
        storage.update(&Document::new("quiet"), false).unwrap();
        storage.update(&Document::new("loud"), true).unwrap();
        storage
            .save(&[Document::new("a"), Document::new("b")], true)
            .unwrap();

        // Then only notifying writes were broadcast
        assert_eq!(*heard.borrow(), vec!["loud", "a", "b"]);
        assert_eq!(storage.get().unwrap().len(), 2);
    }

    #[test]
    fn test_find_by_slug() {
        let doc = Document::new("Getting Started");
        let storage = MemoryStorage::with_documents(vec![doc.clone()]);

        assert_eq!(storage.find_by_slug("getting-started").unwrap(), Some(doc.clone()));
        assert_eq!(storage.find(doc.id).unwrap().map(|d| d.title), Some(doc.title));
        assert_eq!(storage.find_by_slug("missing").unwrap(), None);
    }
}
