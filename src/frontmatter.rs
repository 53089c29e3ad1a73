//! YAML front-matter codec.
//!
//! Joplin writes note metadata as a YAML block between two `---` lines at the
//! top of each exported note:
//!
//! ```text
//! ---
//! title: Meeting notes
//! updated: 2023-04-01 09:15:00Z
//! created: 2023-03-30 18:02:11Z
//! latitude: 52.52000000
//! longitude: 13.40500000
//! altitude: 0.0000
//! tags:
//!   - work
//!   - q2
//! completed?: no
//! ---
//! ```
//!
//! [`parse`] maps the lines between the delimiters onto [`FrontMatter`].
//! The mapping is tolerant: unknown keys are dropped, missing keys and explicit
//! nulls fall back to the field default. [`serialize`] writes the record back,
//! omitting every field that is still at its default, wrapped in delimiters.

use crate::tags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("failed to parse front matter: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("failed to serialize front matter: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Recognised front-matter fields, in the order they are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub updated: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub created: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub author: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero"
    )]
    pub latitude: f64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero"
    )]
    pub longitude: f64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero"
    )]
    pub altitude: f64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    /// Always derived from `tags`; an incoming `note-tags` key is ignored.
    #[serde(rename = "note-tags", skip_deserializing, skip_serializing_if = "String::is_empty")]
    pub note_tags: String,
    #[serde(
        rename = "completed?",
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "is_false"
    )]
    pub completed: bool,
}

impl FrontMatter {
    /// True when every field is at its default, so nothing would be written.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Prefix every tag for Logseq and recompute `note_tags` from them.
    pub fn normalize_tags(&mut self) {
        let normalized = tags::normalize_tags(&self.tags);
        self.tags = normalized.tags;
        self.note_tags = normalized.note_tags;
    }

    /// Drop the fields Logseq has no use for. `note_tags`, the dates and
    /// `completed` survive.
    pub fn strip_for_cleanup(&mut self) {
        self.title.clear();
        self.author.clear();
        self.tags.clear();
        self.latitude = 0.0;
        self.longitude = 0.0;
        self.altitude = 0.0;
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Joplin writes `completed?: yes|no`, which YAML 1.2 reads as strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(false),
        Some(serde_yaml::Value::Bool(b)) => Ok(b),
        Some(serde_yaml::Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "yes" | "y" | "on" | "true" => Ok(true),
            "no" | "n" | "off" | "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean: {other:?}"))),
        },
        Some(other) => Err(D::Error::custom(format!("invalid boolean: {other:?}"))),
    }
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Parse the lines strictly between the opening and closing delimiters.
///
/// A block that is blank yields the default record.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<FrontMatter, FrontMatterError> {
    let text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    if text.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(&text).map_err(FrontMatterError::Parse)
}

/// Serialize the record between two `delimiter` lines.
///
/// Each line, including the closing delimiter, ends with `\n`. An empty record
/// produces just the two delimiter lines.
pub fn serialize(front_matter: &FrontMatter, delimiter: &str) -> Result<String, FrontMatterError> {
    let mut out = String::new();
    out.push_str(delimiter);
    out.push('\n');
    if !front_matter.is_empty() {
        let yaml = serde_yaml::to_string(front_matter).map_err(FrontMatterError::Serialize)?;
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str(delimiter);
    out.push('\n');
    Ok(out)
}
