//! Conversion configuration.
//!
//! Every directory name and token the pipeline relies on lives in a single
//! [`ConvertConfig`] that is passed explicitly into each stage. The defaults
//! reproduce the fixed Joplin → Logseq layout:
//!
//! ```text
//! joplin-input/                 # input_root
//! ├── _resources/               # resource_dir (attachments, never walked)
//! │   └── pic.png
//! ├── Work/
//! │   └── Meeting.md            # → logseq-output/pages/Work___Meeting.md
//! └── Inbox.md                  # → logseq-output/pages/Inbox.md
//!
//! logseq-output/                # output_root
//! ├── assets/                   # assets_dir (copied attachments)
//! └── pages/                    # pages_dir (flattened notes)
//! ```
//!
//! ## Config File
//!
//! An optional `logseqify.toml` in the working directory may override any
//! field. The file is sparse; unknown keys are rejected to catch typos early.
//!
//! ```toml
//! input_root = "export"
//! output_root = "graph"
//!
//! [keyword_replacements]
//! "_resources" = "assets"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "logseqify.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Layout and token settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Root of the Joplin export.
    pub input_root: PathBuf,
    /// Root of the Logseq graph to produce.
    pub output_root: PathBuf,
    /// Joplin's attachment folder. Excluded from the walk and substituted
    /// back in when locating a referenced asset.
    pub resource_dir: String,
    /// Logseq's attachment folder, created under `output_root`.
    pub assets_dir: String,
    /// Folder under `output_root` that receives the flattened pages.
    pub pages_dir: String,
    /// Substring a body line must contain to be checked for an asset link.
    pub asset_marker: String,
    /// Joins directory segments into a single flat page name.
    pub separator: String,
    /// Line that opens and closes the front-matter block.
    pub delimiter: String,
    /// Suffix that selects which files are converted.
    pub markdown_extension: String,
    /// Textual replacements applied to the whole document before conversion.
    pub keyword_replacements: BTreeMap<String, String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("joplin-input"),
            output_root: PathBuf::from("logseq-output"),
            resource_dir: "_resources".to_string(),
            assets_dir: "assets".to_string(),
            pages_dir: "pages".to_string(),
            asset_marker: "../assets/".to_string(),
            separator: "___".to_string(),
            delimiter: "---".to_string(),
            markdown_extension: ".md".to_string(),
            keyword_replacements: BTreeMap::from([(
                "_resources".to_string(),
                "assets".to_string(),
            )]),
        }
    }
}

impl ConvertConfig {
    /// Build a config with the default tokens rooted at the given directories.
    pub fn with_roots(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    /// Directory that receives copied attachments.
    pub fn output_assets_dir(&self) -> PathBuf {
        self.output_root.join(&self.assets_dir)
    }

    /// Directory that receives converted pages.
    pub fn output_pages_dir(&self) -> PathBuf {
        self.output_root.join(&self.pages_dir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("resource_dir", &self.resource_dir),
            ("assets_dir", &self.assets_dir),
            ("pages_dir", &self.pages_dir),
            ("asset_marker", &self.asset_marker),
            ("separator", &self.separator),
            ("delimiter", &self.delimiter),
            ("markdown_extension", &self.markdown_extension),
        ];
        for (key, value) in required {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.keyword_replacements.keys().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "keyword_replacements keys must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Load `logseqify.toml` from the given directory.
///
/// Missing file means stock defaults. Fields present in the file override the
/// defaults; the result is validated before it is returned.
pub fn load_config(dir: &Path) -> Result<ConvertConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ConvertConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ConvertConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
