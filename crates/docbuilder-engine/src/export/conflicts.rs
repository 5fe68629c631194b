use std::collections::HashMap;

use log::{debug, warn};

use crate::export::file_name::entry_stem;
use crate::export::{ExportError, ExportFile};
use crate::models::DocumentId;

fn is_blank(title: &str) -> bool {
    title.trim().is_empty()
}

/// Names collide when their archive entry stems match ignoring case
fn name_key(title: &str) -> String {
    entry_stem(title).to_lowercase()
}

/// Every file whose title is blank or maps to the same archive entry as
/// another title, ignoring case
///
/// All participants are returned, in input order, so any of them can be
/// renamed.
pub fn find_conflicts(files: &[ExportFile]) -> Vec<&ExportFile> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        *counts.entry(name_key(&file.title)).or_default() += 1;
    }

    files
        .iter()
        .filter(|file| is_blank(&file.title) || counts[&name_key(&file.title)] > 1)
        .collect()
}

/// First of `title`, `title-1`, `title-2`, ... whose archive entry is not
/// already taken (ignoring case). Blank titles start from `document`.
pub fn suggest_unique_name<'a>(title: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: Vec<String> = taken.into_iter().map(name_key).collect();
    let base = if is_blank(title) { "document" } else { title };
    let is_taken = |name: &str| taken.contains(&name_key(name));

    if !is_taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Candidate titles during the rename loop
///
/// Conflicts are recomputed after every rename. The set only leaves the loop
/// through [`ConflictResolver::finish`], which refuses while any conflict
/// remains. Dropping the resolver is the cancel path.
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    files: Vec<ExportFile>,
}

impl ConflictResolver {
    pub fn new(files: Vec<ExportFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[ExportFile] {
        &self.files
    }

    pub fn conflicts(&self) -> Vec<&ExportFile> {
        find_conflicts(&self.files)
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts().is_empty()
    }

    pub fn is_conflicting(&self, document_id: DocumentId) -> bool {
        self.conflicts().iter().any(|file| file.document_id == document_id)
    }

    /// Returns false for an unknown document.
    pub fn rename(&mut self, document_id: DocumentId, title: impl Into<String>) -> bool {
        let Some(file) = self.files.iter_mut().find(|f| f.document_id == document_id) else {
            return false;
        };
        file.title = title.into();
        debug!("Renamed export file for {document_id} to {:?}", file.title);
        true
    }

    /// A unique name for one file, computed against all the other titles
    pub fn suggest(&self, document_id: DocumentId) -> Option<String> {
        let file = self.files.iter().find(|f| f.document_id == document_id)?;
        let others = self
            .files
            .iter()
            .filter(|f| f.document_id != document_id)
            .map(|f| f.title.as_str());
        Some(suggest_unique_name(&file.title, others))
    }

    pub fn accept_suggestion(&mut self, document_id: DocumentId) -> Option<String> {
        let suggestion = self.suggest(document_id)?;
        self.rename(document_id, suggestion.clone());
        Some(suggestion)
    }

    pub fn finish(self) -> Result<Vec<ExportFile>, ExportError> {
        let conflicts: Vec<String> = self.conflicts().iter().map(|f| f.title.clone()).collect();
        if conflicts.is_empty() {
            Ok(self.files)
        } else {
            warn!("Export blocked by {} conflicting names", conflicts.len());
            Err(ExportError::Conflict(conflicts))
        }
    }
}
