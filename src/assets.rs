//! Asset reference detection and copying.
//!
//! Joplin links attachments as `[label](../_resources/<file>)`. After the
//! document-wide keyword replacement these read `../assets/<file>`, which is
//! where Logseq expects them relative to `pages/`. For every body line that
//! mentions the asset marker, the referenced file is located under the Joplin
//! resource folder and copied into the Logseq assets folder.
//!
//! ## Link Matching
//!
//! Detection is deliberately line-local and simple:
//!
//! - the line must contain the marker substring (`../assets/`), and
//! - the line must contain a `[label](target)` link.
//!
//! The target of the **first** link on the line is used as-is, even when the
//! marker sits in a different link or in plain text. Not recognised: links
//! spanning several lines, nested brackets in the label, parentheses inside the
//! target, and any link after the first on a line.
//!
//! ## Path Resolution
//!
//! ```text
//! target:       ../assets/pic.png
//! source:       <input_root>/_resources/pic.png
//! destination:  <output_root>/assets/pic.png
//! ```
//!
//! The target is read relative to the assets folder. For the source, every
//! `assets` occurrence in that relative part is swapped for the resource
//! folder name; the input root itself is never rewritten. Both paths are then
//! resolved lexically. Root and drive components of the target are dropped,
//! so `/abs/a.png` is looked up as `_resources/abs/a.png`. A target whose
//! `..` segments climb out of the resource folder or the assets folder is
//! [`AssetOutcome::OutsideRoot`] and nothing is read or written for it.

use crate::config::ConvertConfig;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, warn};

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is a valid regex")
});

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read asset file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write asset file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened to one asset reference.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome {
    /// The source existed and its bytes were written to `destination`.
    Copied {
        source: PathBuf,
        destination: PathBuf,
    },
    /// No file at the resolved source location; nothing was copied.
    Missing { source: PathBuf },
    /// The target resolves outside the resource or assets folder.
    OutsideRoot { target: String },
}

/// Return the target of the first Markdown link on `line`, provided the line
/// also contains `marker` somewhere.
pub fn find_asset_reference<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    if !line.contains(marker) {
        return None;
    }
    MARKDOWN_LINK
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Where Joplin stored the file a link target refers to, or `None` when the
/// target leaves the resource folder.
pub fn source_path(target: &str, config: &ConvertConfig) -> Option<PathBuf> {
    let relative = join_relative(&config.assets_dir, target)
        .to_string_lossy()
        .replace(&config.assets_dir, &config.resource_dir);
    let relative = normalize(Path::new(&relative))?;
    contained_in(relative, &config.resource_dir).map(|r| config.input_root.join(r))
}

/// Where the copied file lands in the Logseq graph, or `None` when the target
/// leaves the assets folder.
pub fn destination_path(target: &str, config: &ConvertConfig) -> Option<PathBuf> {
    let relative = normalize(&join_relative(&config.assets_dir, target))?;
    contained_in(relative, &config.assets_dir).map(|r| config.output_root.join(r))
}

/// `dir/target` with any root or prefix of `target` dropped.
fn join_relative(dir: &str, target: &str) -> PathBuf {
    let mut path = PathBuf::from(dir);
    path.extend(Path::new(target).components().filter(|c| {
        matches!(
            c,
            Component::Normal(_) | Component::CurDir | Component::ParentDir
        )
    }));
    path
}

/// Resolve `.` and `..` without touching the filesystem. `None` if `..`
/// climbs above the start of `path`.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(normalized)
}

/// Keep `relative` only if it names something strictly inside `dir`.
fn contained_in(relative: PathBuf, dir: &str) -> Option<PathBuf> {
    (relative.starts_with(dir) && relative != Path::new(dir)).then_some(relative)
}

/// Check one body line for an asset reference and copy the asset if present.
///
/// Returns `Ok(None)` when the line holds no reference. A reference whose
/// source file does not exist is [`AssetOutcome::Missing`], not an error.
pub fn resolve_line(
    line: &str,
    config: &ConvertConfig,
) -> Result<Option<AssetOutcome>, AssetError> {
    let Some(target) = find_asset_reference(line, &config.asset_marker) else {
        return Ok(None);
    };

    let (Some(source), Some(destination)) =
        (source_path(target, config), destination_path(target, config))
    else {
        warn!("Asset link {target} points outside the export, skipping");
        return Ok(Some(AssetOutcome::OutsideRoot {
            target: target.to_string(),
        }));
    };
    debug!(source = %source.display(), "resolved asset reference");

    if !source.is_file() {
        info!("Asset file {} does not exist", source.display());
        return Ok(Some(AssetOutcome::Missing { source }));
    }

    copy_asset(&source, &destination)?;
    info!(
        "Copied asset {} → {}",
        source.display(),
        destination.display()
    );
    Ok(Some(AssetOutcome::Copied {
        source,
        destination,
    }))
}

fn copy_asset(source: &Path, destination: &Path) -> Result<(), AssetError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let bytes = fs::read(source).map_err(|e| AssetError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    fs::write(destination, bytes).map_err(|e| AssetError::Write {
        path: destination.to_path_buf(),
        source: e,
    })
}
