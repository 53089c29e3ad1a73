//! Per-document conversion.
//!
//! A document is the full text of one exported note. Conversion runs in two
//! steps:
//!
//! 1. [`apply_keyword_replacements`] rewrites every configured keyword in the
//!    raw text (`_resources` → `assets` by default). This touches prose and
//!    code blocks as well as link targets.
//! 2. [`transform`] walks the lines once. Every line that is exactly the
//!    delimiter toggles between body and front matter. Front-matter lines are
//!    collected until the closing delimiter, then parsed, normalised for
//!    Logseq and written back. Every other line is emitted unchanged and
//!    checked for an asset reference.
//!
//! ```text
//! ---                       ---
//! title: Trip               title: Trip
//! tags: [travel]      →     tags: ['#travel']
//! ---                       note-tags: '#travel'
//! ![map](../assets/m.png)   ---
//!                           ![map](../assets/m.png)      (+ m.png copied)
//! ```
//!
//! Toggling applies anywhere in the document, so a pair of `---` rules in the
//! body is read as a second header block. A block that is opened but never
//! closed swallows the rest of the document: no header is written and none of
//! its lines appear in the output.

use crate::assets::{self, AssetError, AssetOutcome};
use crate::config::ConvertConfig;
use crate::frontmatter::{self, FrontMatterError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Options that vary per run rather than per layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    /// Strip title, author, tags and coordinates from the front matter.
    pub cleanup_frontmatter: bool,
}

/// A converted document and the asset references found in its body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub text: String,
    pub assets: Vec<AssetOutcome>,
}

/// Replace every configured keyword throughout `content`.
pub fn apply_keyword_replacements(content: &str, config: &ConvertConfig) -> String {
    config
        .keyword_replacements
        .iter()
        .fold(content.to_string(), |text, (keyword, replacement)| {
            text.replace(keyword.as_str(), replacement)
        })
}

/// Convert one document.
///
/// Asset references are resolved as their lines are emitted, so a failure on
/// a late line still leaves earlier assets copied.
pub fn transform(
    content: &str,
    options: TransformOptions,
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    let mut conversion = Conversion::default();
    let mut in_front_matter = false;
    let mut header_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line == config.delimiter {
            in_front_matter = !in_front_matter;
            if !in_front_matter {
                let block = convert_front_matter(&header_lines, options, &config.delimiter)?;
                conversion.text.push_str(&block);
                header_lines.clear();
            }
            continue;
        }

        if in_front_matter {
            header_lines.push(line);
            continue;
        }

        conversion.text.push_str(line);
        conversion.text.push('\n');
        if let Some(outcome) = assets::resolve_line(line, config)? {
            conversion.assets.push(outcome);
        }
    }

    Ok(conversion)
}

fn convert_front_matter(
    lines: &[&str],
    options: TransformOptions,
    delimiter: &str,
) -> Result<String, FrontMatterError> {
    let mut front_matter = frontmatter::parse(lines)?;
    front_matter.normalize_tags();
    if options.cleanup_frontmatter {
        front_matter.strip_for_cleanup();
    }
    frontmatter::serialize(&front_matter, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FrontMatter;
    use crate::test_helpers::{test_config, write_file};
    use std::fs;
    use tempfile::TempDir;

    const CLEANUP: TransformOptions = TransformOptions {
        cleanup_frontmatter: true,
    };

    fn convert(content: &str, options: TransformOptions) -> Conversion {
        let tmp = TempDir::new().unwrap();
        transform(content, options, &test_config(tmp.path())).unwrap()
    }

    /// Parse the header block at the top of a converted document.
    fn front_matter_of(text: &str) -> FrontMatter {
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("---"));
        let header: Vec<&str> = lines.take_while(|l| *l != "---").collect();
        frontmatter::parse(&header).unwrap()
    }

    #[test]
    fn title_block_then_body() {
        let out = convert("---\ntitle: X\n---\nbody", TransformOptions::default());
        let lines: Vec<&str> = out.text.lines().collect();
        assert_eq!(lines, vec!["---", "title: X", "---", "body"]);
    }

    #[test]
    fn body_lines_get_newline_terminators() {
        let out = convert("one\r\ntwo\n\nthree", TransformOptions::default());
        assert_eq!(out.text, "one\ntwo\n\nthree\n");
    }

    #[test]
    fn document_without_front_matter_is_all_body() {
        let out = convert("# Heading\n\ntext", TransformOptions::default());
        assert_eq!(out.text, "# Heading\n\ntext\n");
    }

    #[test]
    fn empty_document_is_empty_success() {
        let out = convert("", TransformOptions::default());
        assert_eq!(out, Conversion::default());
    }

    #[test]
    fn tags_become_logseq_tags() {
        let out = convert(
            "---\ntags:\n  - a\n  - b\n---\n",
            TransformOptions::default(),
        );
        let fm = front_matter_of(&out.text);
        assert_eq!(fm.tags, vec!["#a", "#b"]);
        assert!(out.text.contains("note-tags"));
    }

    #[test]
    fn stale_note_tags_are_recomputed() {
        let out = convert(
            "---\nnote-tags: '#old'\ntags: [new]\n---\n",
            TransformOptions::default(),
        );
        assert!(out.text.contains("#new"));
        assert!(!out.text.contains("#old"));
    }

    #[test]
    fn cleanup_strips_identity_and_location_fields() {
        let doc = "---\ntitle: Trip\nauthor: Ada\nupdated: 2023-01-02 03:04:05Z\n\
                   latitude: 1.5\nlongitude: 2.5\naltitude: 3.5\ntags: [x, y]\n\
                   completed?: true\n---\nbody";
        let out = convert(doc, CLEANUP);

        for key in ["title:", "author:", "tags:", "latitude:", "longitude:", "altitude:"] {
            assert!(
                !out.text.lines().any(|l| l.starts_with(key)),
                "{key} survived cleanup:\n{}",
                out.text
            );
        }
        let fm = front_matter_of(&out.text);
        assert_eq!(fm.updated, "2023-01-02 03:04:05Z");
        assert!(fm.completed);
        assert!(out.text.contains("note-tags:"));
        assert!(out.text.ends_with("---\nbody\n"));
    }

    #[test]
    fn cleanup_of_title_only_block_leaves_bare_delimiters() {
        let out = convert("---\ntitle: X\n---\nbody", CLEANUP);
        assert_eq!(out.text, "---\n---\nbody\n");
    }

    #[test]
    fn unterminated_block_drops_everything_after_opening() {
        let out = convert(
            "---\ntitle: X\nauthor: Y\n\nstill inside",
            TransformOptions::default(),
        );
        assert_eq!(out.text, "");
    }

    #[test]
    fn rule_after_header_opens_unterminated_block() {
        let out = convert(
            "---\ntitle: X\n---\nabove\n---\nbelow",
            TransformOptions::default(),
        );
        assert_eq!(out.text, "---\ntitle: X\n---\nabove\n");
    }

    #[test]
    fn header_after_leading_blank_line_is_still_converted() {
        let out = convert("\n---\ntags: [a]\n---\nbody", TransformOptions::default());
        let lines: Vec<&str> = out.text.lines().collect();
        assert_eq!(lines.first(), Some(&""));
        assert_eq!(lines.get(1), Some(&"---"));
        assert!(out.text.contains("note-tags:"));
        assert!(out.text.ends_with("---\nbody\n"));
    }

    #[test]
    fn text_between_two_rules_is_read_as_front_matter() {
        let out = convert(
            "intro\n---\nsummary: dropped\n---\noutro",
            TransformOptions::default(),
        );
        assert_eq!(out.text, "intro\n---\n---\noutro\n");
    }

    #[test]
    fn each_block_is_parsed_on_its_own() {
        let out = convert(
            "---\ntitle: A\n---\nmiddle\n---\ntitle: B\n---\nend",
            TransformOptions::default(),
        );
        assert_eq!(
            out.text,
            "---\ntitle: A\n---\nmiddle\n---\ntitle: B\n---\nend\n"
        );
    }

    #[test]
    fn malformed_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = transform(
            "---\ntitle: [broken\n---\nbody",
            TransformOptions::default(),
            &test_config(tmp.path()),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::FrontMatter(_)));
    }

    #[test]
    fn asset_line_is_copied_and_left_unchanged() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_file(&config.input_root.join("_resources/pic.png"), b"\x01\x02\x03");

        let doc = "See [image](../assets/pic.png)";
        let out = transform(doc, TransformOptions::default(), &config).unwrap();

        assert_eq!(out.text, "See [image](../assets/pic.png)\n");
        assert_eq!(out.assets.len(), 1);
        assert_eq!(
            fs::read(config.output_root.join("assets/pic.png")).unwrap(),
            b"\x01\x02\x03"
        );
    }

    #[test]
    fn absolute_first_link_is_copied_inside_the_assets_dir() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_file(
            &config.input_root.join("_resources/abs/path/_resources/doc.txt"),
            b"doc",
        );

        let doc = "[doc](/abs/path/assets/doc.txt) next to [pic](../assets/pic.png)";
        let out = transform(doc, TransformOptions::default(), &config).unwrap();

        let destination = config.output_root.join("assets/abs/path/assets/doc.txt");
        assert_eq!(
            out.assets,
            vec![AssetOutcome::Copied {
                source: config.input_root.join("_resources/abs/path/_resources/doc.txt"),
                destination: destination.clone(),
            }]
        );
        assert_eq!(fs::read(destination).unwrap(), b"doc");
        assert!(!config.output_root.join("assets/pic.png").exists());
    }

    #[test]
    fn climbing_first_link_is_not_followed() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_file(&tmp.path().join("outside.txt"), b"private");

        let doc = "[up](../../outside.txt) beside ../assets/pic.png";
        let out = transform(doc, TransformOptions::default(), &config).unwrap();

        assert_eq!(out.text, format!("{doc}\n"));
        assert_eq!(
            out.assets,
            vec![AssetOutcome::OutsideRoot {
                target: "../../outside.txt".to_string()
            }]
        );
        assert!(!config.output_root.exists());
    }

    #[test]
    fn front_matter_lines_are_not_scanned_for_assets() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_file(&config.input_root.join("_resources/pic.png"), b"x");

        let doc = "---\ntitle: '[pic](../assets/pic.png)'\n---\n";
        let out = transform(doc, TransformOptions::default(), &config).unwrap();

        assert!(out.assets.is_empty());
        assert!(!config.output_root.join("assets/pic.png").exists());
    }

    #[test]
    fn asset_copy_failure_aborts_document() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        write_file(&config.input_root.join("_resources/pic.png"), b"x");
        write_file(&config.output_root, b"blocks directory creation");

        let err = transform(
            "[pic](../assets/pic.png)",
            TransformOptions::default(),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Asset(_)));
    }

    #[test]
    fn keyword_replacement_touches_whole_text() {
        let config = ConvertConfig::default();
        let doc = "![a](../_resources/a.png)\n```\nls _resources\n```";
        assert_eq!(
            apply_keyword_replacements(doc, &config),
            "![a](../assets/a.png)\n```\nls assets\n```"
        );
    }

    #[test]
    fn keyword_replacement_without_matches_is_identity() {
        let config = ConvertConfig::default();
        assert_eq!(apply_keyword_replacements("plain", &config), "plain");
    }
}
