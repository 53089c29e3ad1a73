//! Shared test utilities for building throwaway Joplin exports.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = setup_export(tmp.path(), &[("Work/plan.md", "---\ntitle: Plan\n---\n")]);
//! run(&config, TransformOptions::default()).unwrap();
//! assert!(read_page(&config, "Work___plan.md").contains("title: Plan"));
//! ```

use std::fs;
use std::path::Path;

use crate::config::ConvertConfig;

/// Default layout rooted at `<root>/in` and `<root>/out`. Nothing is created.
pub fn test_config(root: &Path) -> ConvertConfig {
    ConvertConfig::with_roots(root.join("in"), root.join("out"))
}

/// Write `bytes` to `path`, creating parent directories.
pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// Populate `<root>/in` with notes given as `(relative path, content)`.
pub fn setup_export(root: &Path, notes: &[(&str, &str)]) -> ConvertConfig {
    let config = test_config(root);
    for (relative, content) in notes {
        write_file(&config.input_root.join(relative), content.as_bytes());
    }
    config
}

/// Read a converted page by its flattened name. Panics with the list of
/// pages that do exist.
pub fn read_page(config: &ConvertConfig, name: &str) -> String {
    let pages_dir = config.output_pages_dir();
    fs::read_to_string(pages_dir.join(name)).unwrap_or_else(|_| {
        let available: Vec<String> = fs::read_dir(&pages_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        panic!("page '{name}' not found. Available: {available:?}")
    })
}
