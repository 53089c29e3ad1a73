//! # logseqify
//!
//! Converts a Joplin Markdown export into the layout and front-matter
//! conventions of a Logseq graph.
//!
//! ```text
//! joplin-input/Work/Meeting.md     →  logseq-output/pages/Work___Meeting.md
//! joplin-input/_resources/pic.png  →  logseq-output/assets/pic.png   (if linked)
//! ```
//!
//! # Pipeline
//!
//! Each note goes through the same steps, one file at a time:
//!
//! ```text
//! read → keyword replacement → front matter rewrite + asset copy → flatten path → write
//! ```
//!
//! A note that fails any step is logged and skipped; the rest of the export
//! still converts. Only failing to create the root directories or to walk the
//! input tree stops the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Directory names and tokens, optional `logseqify.toml` overrides |
//! | [`frontmatter`] | YAML front-matter parsing and serialization |
//! | [`tags`] | `tags` → `#tag` list and `note-tags` string |
//! | [`assets`] | Asset link detection, source lookup, copying |
//! | [`transform`] | Per-document conversion driving the three modules above |
//! | [`pages`] | Flattening nested paths into page names, collision tracking |
//! | [`convert`] | Directory setup, tree walk, per-file error handling |
//! | [`output`] | End-of-run summary formatting |
//!
//! # Design Decisions
//!
//! ## Single-Line Link Matching
//!
//! Asset links are found with a single-line regex, not a Markdown parser.
//! Joplin writes one attachment link per line, so the simple matcher covers
//! real exports; its limits are listed in [`assets`].
//!
//! ## Skip, Don't Truncate
//!
//! A conversion failure never produces an empty page. The failing note is
//! absent from the output and reported, so an empty page in the graph always
//! comes from an empty (or unterminated-header) note.

pub mod assets;
pub mod config;
pub mod convert;
pub mod frontmatter;
pub mod output;
pub mod pages;
pub mod tags;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
