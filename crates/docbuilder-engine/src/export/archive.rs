use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use log::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::{ExportError, ExportFile, ExportFormat, find_conflicts};

const ADDING_END: f64 = 40.0;
const COMPRESSION_END: f64 = 80.0;
const WRITE_START: f64 = 90.0;
const DONE: f64 = 100.0;

fn zip_files<'a>(
    entries: impl ExactSizeIterator<Item = (String, &'a str)>,
    mut on_compressed: impl FnMut(usize, usize),
) -> Result<Vec<u8>, ExportError> {
    let total = entries.len();
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (i, (name, content)) in entries.enumerate() {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
        on_compressed(i + 1, total);
    }

    Ok(writer.finish()?.into_inner())
}

/// Size in bytes of the archive these files would produce
pub fn estimate_size(files: &[ExportFile], format: ExportFormat) -> Result<u64, ExportError> {
    let entries = files.iter().map(|f| (f.file_name(format), f.content.as_str()));
    let bytes = zip_files(entries, |_, _| {})?;
    Ok(bytes.len() as u64)
}

/// Package files into an in-memory zip, one entry per file
///
/// Refuses while any name conflict remains. `on_progress` receives values in
/// 0..=100 that never decrease and ends with exactly 100.
pub fn build_archive(
    files: &[ExportFile],
    format: ExportFormat,
    mut on_progress: impl FnMut(f64),
) -> Result<Vec<u8>, ExportError> {
    let conflicts = find_conflicts(files);
    if !conflicts.is_empty() {
        warn!("Refusing export with {} conflicting names", conflicts.len());
        return Err(ExportError::Conflict(
            conflicts.iter().map(|f| f.title.clone()).collect(),
        ));
    }

    let total = files.len();
    let mut entries = Vec::with_capacity(total);
    for (i, file) in files.iter().enumerate() {
        entries.push((file.file_name(format), file.content.as_str()));
        on_progress(i as f64 / total as f64 * ADDING_END);
    }
    on_progress(ADDING_END);

    let bytes = zip_files(entries.into_iter(), |done, total| {
        on_progress(ADDING_END + done as f64 / total as f64 * (COMPRESSION_END - ADDING_END));
    })?;
    on_progress(COMPRESSION_END);

    info!("Built {format} archive with {total} files ({} bytes)", bytes.len());
    on_progress(DONE);
    Ok(bytes)
}

/// Build the archive and write it to `path`
///
/// The file is only created once the archive is complete. Returns the number
/// of bytes written.
pub fn export_to_archive(
    files: &[ExportFile],
    format: ExportFormat,
    path: &Path,
    mut on_progress: impl FnMut(f64),
) -> Result<u64, ExportError> {
    let bytes = build_archive(files, format, |value| {
        if value < DONE {
            on_progress(value);
        }
    })?;

    on_progress(WRITE_START);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    info!("Exported archive to {}", path.display());
    on_progress(DONE);

    Ok(bytes.len() as u64)
}
