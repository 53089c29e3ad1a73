//! Flattening of nested note paths into Logseq page names.
//!
//! Logseq keeps every page in one directory and renders `___` in a file name
//! as a namespace separator. Joplin notebooks therefore become name prefixes:
//!
//! - `sub/dir/note.md` → `sub___dir___note.md`
//! - `Work/Meeting.md` → `Work___Meeting.md`
//! - `Inbox.md` → `Inbox.md` (top-level notes keep their name)
//!
//! ## Collisions
//!
//! Distinct inputs can map to the same page name (`a___b.md` at the root and
//! `a/b.md`). The later write wins. The walk visits entries sorted by file
//! name, so which one wins is deterministic; [`PageRegistry`] reports each
//! collision so it can be logged.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Encode a path relative to the input root as a single flat file name.
///
/// A note directly under the input root gets no separator at all: `Inbox.md`
/// stays `Inbox.md` rather than becoming `.___Inbox.md` or `___Inbox.md`.
pub fn flatten(relative: &Path, separator: &str) -> PathBuf {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    PathBuf::from(segments.join(separator))
}

/// Full output location for a note, under `pages_dir`.
pub fn page_path(relative: &Path, pages_dir: &Path, separator: &str) -> PathBuf {
    pages_dir.join(flatten(relative, separator))
}

/// Tracks which input claimed each output page during a run.
#[derive(Debug, Default)]
pub struct PageRegistry {
    claimed: HashMap<PathBuf, PathBuf>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `input` writes `output`.
    ///
    /// Returns the input that previously claimed the same output, if any.
    pub fn claim(&mut self, output: &Path, input: &Path) -> Option<PathBuf> {
        self.claimed
            .insert(output.to_path_buf(), input.to_path_buf())
            .filter(|previous| previous != input)
    }
}
