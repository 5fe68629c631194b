/*!
 * # Export Pipeline
 *
 * Turns documents into textual artifacts and packages them into a single
 * archive once every output name is unique.
 *
 * ## Architecture Overview
 *
 * ### 1. Converters
 * - One [`Converter`] per [`ExportFormat`]: markdown, html and jsx
 * - Converters sort blocks by `order` themselves, so callers may pass the
 *   stored sequence as is
 *
 * ### 2. Conflict Resolution
 * - [`find_conflicts`] reports every file that shares a case-insensitive
 *   title with another file, plus every blank title
 * - [`ConflictResolver`] holds the candidate titles while the user renames;
 *   it never renames on its own
 *
 * ### 3. Packaging
 * - [`build_archive`] writes all files into an in-memory zip and reports
 *   staged progress (0-40 adding, 40-80 compressing, 80-100 finishing)
 * - Nothing reaches the destination unless the whole archive was built
 *
 * ## Module Structure
 *
 * - **`markdown`**, **`html`**, **`jsx`**: format converters
 * - **`conflicts`**: conflict detection and the rename loop state
 * - **`archive`**: zip packaging and size estimates
 * - **`file_name`**: name normalization and size formatting
 */

pub mod archive;
pub mod conflicts;
pub mod file_name;
pub mod html;
pub mod jsx;
pub mod markdown;

use std::fmt;
use std::str::FromStr;

use crate::models::{Block, Document, DocumentId};

pub use archive::{build_archive, estimate_size, export_to_archive};
pub use conflicts::{ConflictResolver, find_conflicts, suggest_unique_name};
pub use html::HtmlConverter;
pub use jsx::JsxConverter;
pub use markdown::MarkdownConverter;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Conflicting export names: {}", .0.join(", "))]
    Conflict(Vec<String>),
    #[error("Conversion failed: {0}")]
    Converter(String),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns an ordered block list into one artifact
pub trait Converter {
    fn convert(&self, blocks: &[Block]) -> Result<String, ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Html,
    Jsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Markdown, Self::Html, Self::Jsx];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Jsx => "jsx",
        }
    }

    pub fn converter(&self) -> &'static dyn Converter {
        match self {
            Self::Markdown => &MarkdownConverter,
            Self::Html => &HtmlConverter,
            Self::Jsx => &JsxConverter,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "jsx" => Ok(Self::Jsx),
            other => Err(format!("Unknown export format: {other}")),
        }
    }
}

/// An artifact candidate before packaging. `title` is the prospective file
/// stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub document_id: DocumentId,
    pub title: String,
    pub content: String,
}

impl ExportFile {
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", file_name::entry_stem(&self.title), format.extension())
    }
}

pub fn prepare_files(
    documents: &[Document],
    format: ExportFormat,
) -> Result<Vec<ExportFile>, ExportError> {
    prepare_files_with(documents, format.converter())
}

/// Any converter failure aborts the whole batch.
pub fn prepare_files_with(
    documents: &[Document],
    converter: &dyn Converter,
) -> Result<Vec<ExportFile>, ExportError> {
    documents
        .iter()
        .map(|doc| {
            Ok(ExportFile {
                document_id: doc.id,
                title: doc.title.clone(),
                content: converter.convert(&doc.blocks)?,
            })
        })
        .collect()
}

/// Export one document as `(file name, content)`, naming the file after the
/// normalized title.
pub fn export_document(
    document: &Document,
    format: ExportFormat,
) -> Result<(String, String), ExportError> {
    let content = format.converter().convert(&document.blocks)?;
    let mut stem = file_name::normalize(&document.title);
    if stem.is_empty() {
        stem = "document".to_string();
    }
    Ok((format!("{stem}.{}", format.extension()), content))
}
