//! Tag normalisation for Logseq.
//!
//! Joplin exports tags as a plain YAML list. Logseq recognises `#tag` as a page
//! reference, so every tag is prefixed with [`TAG_MARKER`] and the prefixed tags
//! are also joined into a single `note-tags` string:
//!
//! - `[work, ideas]` → `[#work, #ideas]`, `"#work #ideas"`
//! - `[]` → `[]`, `""`
//!
//! Order is preserved. Tags are neither deduplicated nor case-folded.

/// Character prepended to each tag.
pub const TAG_MARKER: char = '#';

/// Result of normalising a tag list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTags {
    /// Each input tag with the marker prepended.
    pub tags: Vec<String>,
    /// The prefixed tags joined by a single space.
    pub note_tags: String,
}

pub fn normalize_tags(tags: &[String]) -> NormalizedTags {
    let tags: Vec<String> = tags.iter().map(|t| format!("{TAG_MARKER}{t}")).collect();
    let note_tags = tags.join(" ");
    NormalizedTags { tags, note_tags }
}
