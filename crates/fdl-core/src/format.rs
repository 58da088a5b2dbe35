//! Document formatting pipeline: parse → transforms → export.
//!
//! Single idempotent entry point used by `fdl fmt`.

use crate::error::ParseError;
use crate::exporter::{ExportOptions, export_document};
use crate::parser::parse_document;
use crate::transform::prune_unreachable;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for `format_document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// How ids are written back.
    pub export: ExportOptions,

    /// Drop nodes the root cannot reach before exporting. Default: **true**.
    pub prune_unreachable: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            export: ExportOptions::default(),
            prune_unreachable: true,
        }
    }
}

// ─── Pipeline ─────────────────────────────────────────────────────────────

/// Parse an FDL document, apply configured transforms, and re-export
/// canonical text.
///
/// The output is idempotent: `format_document(format_document(s, c), c) == format_document(s, c)`.
///
/// # Errors
/// Returns the `ParseError` if the input is not valid FDL.
pub fn format_document(text: &str, config: &FormatConfig) -> Result<String, ParseError> {
    let mut doc = parse_document(text)?;

    if config.prune_unreachable {
        let removed = prune_unreachable(&mut doc);
        if removed > 0 {
            log::debug!("format: pruned {removed} unreachable nodes");
        }
    }

    Ok(export_document(&doc, &config.export))
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_document_default_is_idempotent() {
        let input = r#"
# login screen
dsl:1
frame   "Login"   - w 390 h 844

  column#form - padding 24 gap {spacing.md} cross stretch
      text#title "Welcome back" - weight 700 size 24
      // inputs
      container#email - bg #ffffff r 8 border 1 h 44
      row#actions - main space-between
          use#submit "PrimaryButton"
          spacer - flex 1
"#;
        let config = FormatConfig::default();
        let first = format_document(input, &config).unwrap();
        let second = format_document(&first, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn format_document_normalizes_layout() {
        let input = "dsl:1\nframe  Home  \n\tcol - gap 8\n\t\ttext \"a\"\n";
        let out = format_document(input, &FormatConfig::default()).unwrap();
        assert_eq!(out, "dsl:1\nframe Home\n  column#n_1 - gap 8\n    text#n_2 \"a\"\n");
    }

    #[test]
    fn format_document_drops_comments() {
        let input = "dsl:1\n# note\nframe Home\n  // root\n  container#root\n";
        let out = format_document(input, &FormatConfig::default()).unwrap();
        assert_eq!(out, "dsl:1\nframe Home\n  container#root\n");
    }

    #[test]
    fn format_document_omits_generated_ids() {
        let config = FormatConfig {
            export: ExportOptions {
                include_ids: true,
                omit_generated_ids: true,
            },
            ..FormatConfig::default()
        };
        let input = "dsl:1\nframe Home\n  column\n    text#title \"a\"\n    text \"b\"\n";
        let out = format_document(input, &config).unwrap();
        assert_eq!(out, "dsl:1\nframe Home\n  column\n    text#title \"a\"\n    text \"b\"\n");
        assert_eq!(format_document(&out, &config).unwrap(), out);
    }

    #[test]
    fn format_document_propagates_parse_errors() {
        let err = format_document("dsl:1\nframe T\n  widget", &FormatConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownNodeType {
                line: 3,
                keyword: "widget".into()
            }
        );
    }
}
