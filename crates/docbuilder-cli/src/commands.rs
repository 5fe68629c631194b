use anyhow::{Context, Result, bail};
use docbuilder_engine::editing::{MemoryTransientStore, intents};
use docbuilder_engine::export::{
    self, ConflictResolver, ExportFile, file_name::format_size, prepare_files,
};
use docbuilder_engine::models::unique_slug;
use docbuilder_engine::storage::{self, DocumentStorage};
use docbuilder_engine::{
    BlockKind, BlockStore, Document, DocumentId, ExportFormat, Intent, NewBlock,
};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::rc::Rc;

type Storage<S> = Rc<RefCell<S>>;

/// Look a document up by slug or id
fn find_document<S: DocumentStorage>(storage: &Storage<S>, key: &str) -> Result<Document> {
    storage
        .borrow()
        .get()?
        .into_iter()
        .find(|doc| doc.slug == key || doc.id.to_string() == key)
        .with_context(|| format!("No document matching '{key}'"))
}

fn open<S: DocumentStorage + 'static>(storage: &Storage<S>, key: &str) -> Result<BlockStore> {
    let id = find_document(storage, key)?.id;
    storage::open_document(storage, id)?.with_context(|| format!("Document '{key}' disappeared"))
}

fn block_at(store: &BlockStore, index: usize) -> Result<docbuilder_engine::BlockId> {
    match store.blocks().get(index) {
        Some(block) => Ok(block.id),
        None => bail!("No block at position {index} (document has {})", store.len()),
    }
}

pub fn list<S: DocumentStorage>(storage: &Storage<S>, out: &mut impl Write) -> Result<()> {
    let documents = storage.borrow().get()?;
    if documents.is_empty() {
        writeln!(out, "No documents")?;
    }
    for doc in documents {
        writeln!(
            out,
            "{}\t{}\t{} blocks\t{}",
            doc.slug,
            doc.title,
            doc.blocks.len(),
            doc.updated_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(())
}

pub fn new_document<S: DocumentStorage>(
    storage: &Storage<S>,
    title: &str,
    out: &mut impl Write,
) -> Result<()> {
    let existing = storage.borrow().get()?;
    let mut doc = Document::new(title);
    doc.slug = unique_slug(title, existing.iter().map(|d| d.slug.as_str()));
    storage::update_and_notify(&**storage, &doc)?;
    log::info!("Created document {} ({})", doc.slug, doc.id);
    writeln!(out, "{}", doc.slug)?;
    Ok(())
}

pub fn show<S: DocumentStorage>(
    storage: &Storage<S>,
    key: &str,
    out: &mut impl Write,
) -> Result<()> {
    let doc = find_document(storage, key)?;
    writeln!(out, "# {}", doc.title)?;
    for (index, block) in doc.sorted_blocks().iter().enumerate() {
        let label = match block.language() {
            Some(language) => format!("{}:{language}", block.kind),
            None => block.kind.to_string(),
        };
        let first_line = block.content.lines().next().unwrap_or("");
        writeln!(out, "{index}. [{label}] {first_line}")?;
    }
    Ok(())
}

pub fn add<S: DocumentStorage + 'static>(
    storage: &Storage<S>,
    key: &str,
    kind: BlockKind,
    content: String,
    language: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let mut store = open(storage, key)?;
    let request = NewBlock {
        kind,
        content: Some(content),
        language,
    };
    let block = store.create(request)?;
    writeln!(out, "{}", block.order)?;
    Ok(())
}

pub fn edit<S: DocumentStorage + 'static>(
    storage: &Storage<S>,
    key: &str,
    index: usize,
    content: String,
    language: Option<String>,
) -> Result<()> {
    let mut store = open(storage, key)?;
    let id = block_at(&store, index)?;
    store.update(id, content, language)?;
    Ok(())
}

pub fn transform<S: DocumentStorage + 'static>(
    storage: &Storage<S>,
    key: &str,
    index: usize,
    kind: BlockKind,
    content: Option<String>,
    language: Option<String>,
) -> Result<()> {
    let mut store = open(storage, key)?;
    let id = block_at(&store, index)?;
    store.transform(id, kind, content, language)?;
    Ok(())
}

pub fn move_block<S: DocumentStorage + 'static>(
    storage: &Storage<S>,
    key: &str,
    from: usize,
    to: usize,
) -> Result<()> {
    let mut store = open(storage, key)?;
    block_at(&store, from)?;
    block_at(&store, to)?;
    store.reorder(from, to)?;
    Ok(())
}

pub fn delete<S: DocumentStorage + 'static>(
    storage: &Storage<S>,
    key: &str,
    indices: &[usize],
    out: &mut impl Write,
) -> Result<()> {
    let mut store = open(storage, key)?;
    let ids = indices
        .iter()
        .map(|&index| block_at(&store, index))
        .collect::<Result<Vec<_>>>()?;
    let outcome = intents::execute(
        &mut store,
        &mut MemoryTransientStore::new(),
        Intent::DeleteSelected(ids),
    )?;
    writeln!(out, "{outcome:?}")?;
    Ok(())
}

/// Prompt for new names until no conflict remains
///
/// An empty answer accepts the suggested name. `q` or end of input cancels
/// and returns `None`.
fn resolve_conflicts(
    mut resolver: ConflictResolver,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<Vec<ExportFile>>> {
    while resolver.has_conflicts() {
        let conflicting: Vec<(DocumentId, String)> = resolver
            .conflicts()
            .iter()
            .map(|f| (f.document_id, f.title.clone()))
            .collect();
        writeln!(out, "{} files have conflicting names", conflicting.len())?;

        for (id, title) in conflicting {
            if !resolver.is_conflicting(id) {
                continue;
            }
            let suggestion = resolver.suggest(id).unwrap_or_default();
            write!(out, "Rename \"{title}\" [{suggestion}] (q to cancel): ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim() {
                "q" => return Ok(None),
                "" => {
                    resolver.accept_suggestion(id);
                }
                answer => {
                    resolver.rename(id, answer);
                }
            }
        }
    }
    Ok(Some(resolver.finish()?))
}

pub fn export_documents<S: DocumentStorage>(
    storage: &Storage<S>,
    keys: &[String],
    format: ExportFormat,
    output: &Path,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let documents = if keys.is_empty() {
        storage.borrow().get()?
    } else {
        keys.iter()
            .map(|key| find_document(storage, key))
            .collect::<Result<Vec<_>>>()?
    };
    if documents.is_empty() {
        bail!("No documents to export");
    }

    let files = prepare_files(&documents, format)?;
    let Some(files) = resolve_conflicts(ConflictResolver::new(files), input, out)? else {
        writeln!(out, "Export cancelled")?;
        return Ok(());
    };

    let estimate = export::estimate_size(&files, format)?;
    writeln!(out, "Estimated size: {}", format_size(estimate))?;

    let written = export::export_to_archive(&files, format, output, |progress| {
        log::debug!("Export progress: {progress:.0}%");
    })?;
    writeln!(
        out,
        "Exported {} documents to {} ({})",
        files.len(),
        output.display(),
        format_size(written)
    )?;
    Ok(())
}
