//! Tree walk and the conversion run.
//!
//! [`run`] is the whole program minus argument parsing:
//!
//! ```text
//! create input/, output/, output/assets/      (fatal on failure)
//! walk input/, skipping _resources/           (fatal on walk error)
//!   for each *.md:
//!     read → replace keywords → transform → flatten path → write
//!     (any failure: log, count, skip the file, keep going)
//! ```
//!
//! A file whose conversion fails is not written at all, so a page in the
//! output is always a complete conversion. Notes that are not valid UTF-8
//! are still converted, with each invalid byte sequence replaced by U+FFFD.

use crate::assets::AssetOutcome;
use crate::config::ConvertConfig;
use crate::pages::{self, PageRegistry};
use crate::transform::{self, ConvertError, TransformOptions};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Errors that stop the whole run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to create directory {}: {source}", path.display())]
    Startup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk through directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Errors that skip a single note.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to get relative path for {}", path.display())]
    RelativePath { path: PathBuf },
    #[error("Failed to convert {}: {source}", path.display())]
    Convert {
        path: PathBuf,
        source: ConvertError,
    },
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub pages_written: usize,
    pub files_failed: usize,
    pub assets_copied: usize,
    pub assets_missing: usize,
    pub assets_rejected: usize,
    pub collisions: usize,
}

/// Result of converting one note that made it to disk.
#[derive(Debug)]
struct WrittenPage {
    output: PathBuf,
    assets: Vec<AssetOutcome>,
}

pub fn run(config: &ConvertConfig, options: TransformOptions) -> Result<RunSummary, RunError> {
    for dir in [
        config.input_root.clone(),
        config.output_root.clone(),
        config.output_assets_dir(),
    ] {
        fs::create_dir_all(&dir).map_err(|e| RunError::Startup {
            path: dir.clone(),
            source: e,
        })?;
    }

    let mut summary = RunSummary::default();
    let mut registry = PageRegistry::new();

    for note in markdown_files(config) {
        let note = note?;
        match convert_file(&note, config, options) {
            Ok(page) => {
                if let Some(previous) = registry.claim(&page.output, &note) {
                    warn!(
                        "{} from {} replaced the page written from {}",
                        page.output.display(),
                        note.display(),
                        previous.display()
                    );
                    summary.collisions += 1;
                }
                for asset in &page.assets {
                    match asset {
                        AssetOutcome::Copied { .. } => summary.assets_copied += 1,
                        AssetOutcome::Missing { .. } => summary.assets_missing += 1,
                        AssetOutcome::OutsideRoot { .. } => summary.assets_rejected += 1,
                    }
                }
                summary.pages_written += 1;
            }
            Err(e) => {
                error!("{e}");
                summary.files_failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Markdown files below the input root, sorted by name, resource folder
/// excluded at any depth.
fn markdown_files(config: &ConvertConfig) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> {
    let resource_dir = config.resource_dir.clone();
    let extension = config.markdown_extension.clone();
    WalkDir::new(&config.input_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| !is_resource_dir(entry, &resource_dir))
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let is_note = !entry.file_type().is_dir()
                    && entry.file_name().to_string_lossy().ends_with(&extension);
                is_note.then(|| Ok(entry.into_path()))
            }
            Err(e) => Some(Err(e)),
        })
}

fn is_resource_dir(entry: &DirEntry, resource_dir: &str) -> bool {
    entry.file_type().is_dir() && entry.file_name() == resource_dir
}

fn convert_file(
    path: &Path,
    config: &ConvertConfig,
    options: TransformOptions,
) -> Result<WrittenPage, FileError> {
    let bytes = fs::read(path).map_err(|e| FileError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                "{} is not valid UTF-8 ({}), invalid bytes replaced",
                path.display(),
                e.utf8_error()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let content = transform::apply_keyword_replacements(&content, config);
    let conversion =
        transform::transform(&content, options, config).map_err(|e| FileError::Convert {
            path: path.to_path_buf(),
            source: e,
        })?;

    let relative = path
        .strip_prefix(&config.input_root)
        .map_err(|_| FileError::RelativePath {
            path: path.to_path_buf(),
        })?;
    let output = pages::page_path(relative, &config.output_pages_dir(), &config.separator);
    info!("Output file path: {}", output.display());

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| FileError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(&output, conversion.text).map_err(|e| FileError::Write {
        path: output.clone(),
        source: e,
    })?;

    Ok(WrittenPage {
        output,
        assets: conversion.assets,
    })
}
