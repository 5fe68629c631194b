use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::models::Document;
use crate::storage::{DocumentStorage, Listeners, StorageError, upsert};

/// All documents as one JSON array in a single file
///
/// A missing file reads as an empty store. Writes create parent directories.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    listeners: Listeners,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            listeners: Listeners::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, documents: &[Document]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(documents)?;
        fs::write(&self.path, json)?;
        debug!("Wrote {} documents to {}", documents.len(), self.path.display());
        Ok(())
    }
}

impl DocumentStorage for JsonFileStorage {
    fn get(&self) -> Result<Vec<Document>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&mut self, documents: &[Document], notify: bool) -> Result<(), StorageError> {
        self.write(documents)?;
        if notify {
            for doc in documents {
                self.listeners.notify(doc);
            }
        }
        Ok(())
    }

    fn update(&mut self, document: &Document, notify: bool) -> Result<(), StorageError> {
        let mut documents = self.get()?;
        upsert(&mut documents, document);
        self.write(&documents)?;
        if notify {
            self.listeners.notify(document);
        }
        Ok(())
    }

    fn listeners(&self) -> Listeners {
        self.listeners.clone()
    }
}
