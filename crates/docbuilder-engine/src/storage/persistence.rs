use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::editing::{BlockEvent, BlockStore, SubscriptionId};
use crate::models::{Document, DocumentId};
use crate::storage::{DocumentStorage, StorageError, update_and_notify};

fn apply_event(document: &mut Document, event: &BlockEvent) {
    match event {
        BlockEvent::Create { block }
        | BlockEvent::Update { block, .. }
        | BlockEvent::Transform { block, .. } => document.upsert_block(block.clone()),
        BlockEvent::Delete { block } => {
            document.remove_block(block.id);
        }
        BlockEvent::Reorder { blocks, .. } => document.blocks = blocks.clone(),
    }
}

/// Keep `document` in storage in step with the store
///
/// Every bus event is applied to a private copy of the document, which is
/// touched and written with notification. Listeners run after the storage
/// borrow is released, so they may read storage back. A failed write
/// surfaces to the mutating caller as an observer error.
pub fn attach_persistence<S>(
    store: &mut BlockStore,
    storage: Rc<RefCell<S>>,
    mut document: Document,
) -> SubscriptionId
where
    S: DocumentStorage + ?Sized + 'static,
{
    document.blocks = store.blocks().to_vec();
    store.events_mut().on_any(move |event| {
        apply_event(&mut document, event);
        document.touch();
        debug!("Persisting {} after {:?}", document.id, event.kind());
        update_and_notify(&*storage, &document)?;
        Ok(())
    })
}

/// Load a stored document into a new store with persistence attached
///
/// Returns `Ok(None)` for an unknown id.
pub fn open_document<S>(
    storage: &Rc<RefCell<S>>,
    id: DocumentId,
) -> Result<Option<BlockStore>, StorageError>
where
    S: DocumentStorage + ?Sized + 'static,
{
    let Some(document) = storage.borrow().find(id)? else {
        return Ok(None);
    };
    let mut store = BlockStore::from_blocks(document.blocks.clone());
    attach_persistence(&mut store, storage.clone(), document);
    Ok(Some(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::StoreError;
    use crate::models::{Block, BlockKind, NewBlock};
    use crate::storage::{DocumentListener, Listeners, MemoryStorage};
    use pretty_assertions::assert_eq;

    fn stored_blocks(storage: &Rc<RefCell<MemoryStorage>>, id: DocumentId) -> Vec<Block> {
        storage.borrow().find(id).unwrap().unwrap().blocks
    }

    #[test]
    fn test_mutations_are_written_through() {
        // Given an opened document
        let doc = Document::new("Guide");
        let id = doc.id;
        let storage = Rc::new(RefCell::new(MemoryStorage::with_documents(vec![doc])));
        let mut store = open_document(&storage, id).unwrap().unwrap();

        // When creating, transforming and reordering blocks
        let a = store.create(NewBlock::text("a")).unwrap();
        let b = store.create(NewBlock::text("")).unwrap();
        store
            .transform(b.id, BlockKind::Code, Some("print(1)".into()), Some("python".into()))
            .unwrap();
        store.reorder(1, 0).unwrap();

        // Then storage holds the same sequence as the store
        assert_eq!(stored_blocks(&storage, id), store.blocks().to_vec());
        assert_eq!(stored_blocks(&storage, id)[1].id, a.id);
    }

    #[test]
    fn test_delete_then_normalize_is_persisted() {
        let doc = Document::new("Guide");
        let id = doc.id;
        let storage = Rc::new(RefCell::new(MemoryStorage::with_documents(vec![doc])));
        let mut store = open_document(&storage, id).unwrap().unwrap();
        let first = store.create(NewBlock::text("a")).unwrap();
        store.create(NewBlock::text("b")).unwrap();

        store.delete(first.id).unwrap();
        store.normalize_order().unwrap();

        let blocks = stored_blocks(&storage, id);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].order, 0);
    }

    #[test]
    fn test_writes_notify_and_bump_updated_at() {
        let doc = Document::new("Guide");
        let id = doc.id;
        let created = doc.updated_at;
        let storage = Rc::new(RefCell::new(MemoryStorage::with_documents(vec![doc])));
        let notified = Rc::new(RefCell::new(0));
        let counter = notified.clone();
        let listener: DocumentListener = Box::new(move |_| *counter.borrow_mut() += 1);
        storage.borrow_mut().subscribe(listener);
        let mut store = open_document(&storage, id).unwrap().unwrap();

        store.create(NewBlock::text("a")).unwrap();

        assert_eq!(*notified.borrow(), 1);
        assert!(storage.borrow().find(id).unwrap().unwrap().updated_at >= created);
    }

    #[test]
    fn test_listener_can_read_storage_back() {
        // Given a listener that reads the shared storage when notified
        let doc = Document::new("Guide");
        let id = doc.id;
        let storage = Rc::new(RefCell::new(MemoryStorage::with_documents(vec![doc])));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let weak = Rc::downgrade(&storage);
        let sink = seen.clone();
        storage.borrow().subscribe(Box::new(move |changed| {
            let storage = weak.upgrade().unwrap();
            let stored = storage.borrow().find(changed.id).unwrap().unwrap();
            sink.borrow_mut().push(stored.blocks.len());
        }));
        let mut store = open_document(&storage, id).unwrap().unwrap();

        // When the store mutates twice
        store.create(NewBlock::text("a")).unwrap();
        store.create(NewBlock::text("b")).unwrap();

        // Then the listener saw each write already applied
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unknown_document_is_none() {
        let storage = Rc::new(RefCell::new(MemoryStorage::new()));
        assert!(open_document(&storage, DocumentId::new()).unwrap().is_none());
    }

    struct FailingStorage;

    impl DocumentStorage for FailingStorage {
        fn get(&self) -> Result<Vec<Document>, StorageError> {
            Ok(Vec::new())
        }

        fn save(&mut self, _: &[Document], _: bool) -> Result<(), StorageError> {
            Ok(())
        }

        fn update(&mut self, _: &Document, _: bool) -> Result<(), StorageError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn listeners(&self) -> Listeners {
            Listeners::default()
        }
    }

    #[test]
    fn test_failed_write_surfaces_as_observer_error() {
        let mut store = BlockStore::new();
        attach_persistence(
            &mut store,
            Rc::new(RefCell::new(FailingStorage)),
            Document::new("Guide"),
        );

        let result = store.create(NewBlock::text("a"));

        assert!(
            matches!(result, Err(StoreError::Observer(e)) if e.to_string().contains("disk full"))
        );
        assert_eq!(store.len(), 1);
    }
}
