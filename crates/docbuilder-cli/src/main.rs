//! Command-line frontend for docbuilder.
//!
//! Usage:
//!   docbuilder-cli new "Getting Started"
//!   docbuilder-cli add getting-started --kind code --language python "print(1)"
//!   docbuilder-cli export --format md

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docbuilder_config::Config;
use docbuilder_engine::{BlockKind, ExportFormat, JsonFileStorage};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "docbuilder-cli")]
#[command(about = "Edit and export block-based documents")]
struct Args {
    /// Document store to use instead of the configured one
    #[arg(long, global = true)]
    documents: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored documents
    List,
    /// Create an empty document
    New { title: String },
    /// Print a document's blocks
    Show { document: String },
    /// Append a block
    Add {
        document: String,
        #[arg(long, default_value = "text")]
        kind: BlockKind,
        #[arg(long)]
        language: Option<String>,
        #[arg(default_value = "")]
        content: String,
    },
    /// Replace a block's content
    Edit {
        document: String,
        index: usize,
        content: String,
        /// Pass an empty string to clear the language
        #[arg(long)]
        language: Option<String>,
    },
    /// Change a block's kind
    Transform {
        document: String,
        index: usize,
        kind: BlockKind,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
    /// Move a block from one position to another
    Move {
        document: String,
        from: usize,
        to: usize,
    },
    /// Delete blocks by position
    Delete {
        document: String,
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Export documents into a zip archive
    Export {
        /// Slugs or ids; every document when empty
        documents: Vec<String>,
        #[arg(long)]
        format: Option<ExportFormat>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let config_path = Config::config_path();
    log::debug!("Config path: {}", config_path.display());
    let config = match Config::load_or_create() {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            None
        }
    };

    let documents_path = args
        .documents
        .or_else(|| config.as_ref().map(|c| c.documents_path.clone()))
        .unwrap_or_else(Config::default_documents_path);
    log::debug!("Document store: {}", documents_path.display());
    let storage = Rc::new(RefCell::new(JsonFileStorage::new(documents_path)));

    let mut out = io::stdout().lock();
    match args.command {
        Command::List => commands::list(&storage, &mut out),
        Command::New { title } => commands::new_document(&storage, &title, &mut out),
        Command::Show { document } => commands::show(&storage, &document, &mut out),
        Command::Add {
            document,
            kind,
            language,
            content,
        } => commands::add(&storage, &document, kind, content, language, &mut out),
        Command::Edit {
            document,
            index,
            content,
            language,
        } => commands::edit(&storage, &document, index, content, language),
        Command::Transform {
            document,
            index,
            kind,
            content,
            language,
        } => commands::transform(&storage, &document, index, kind, content, language),
        Command::Move { document, from, to } => {
            commands::move_block(&storage, &document, from, to)
        }
        Command::Delete { document, indices } => {
            commands::delete(&storage, &document, &indices, &mut out)
        }
        Command::Export {
            documents,
            format,
            output,
        } => {
            let format = match format {
                Some(format) => format,
                None => config
                    .as_ref()
                    .and_then(|c| c.default_format.as_deref())
                    .map(str::parse::<ExportFormat>)
                    .transpose()
                    .map_err(anyhow::Error::msg)?
                    .unwrap_or_default(),
            };
            let output = output.unwrap_or_else(|| {
                config
                    .as_ref()
                    .and_then(|c| c.export_dir.clone())
                    .unwrap_or_default()
                    .join("documents.zip")
            });
            let mut input = io::stdin().lock();
            commands::export_documents(&storage, &documents, format, &output, &mut input, &mut out)
        }
    }
}
