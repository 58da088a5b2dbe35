pub mod error;
pub mod exporter;
pub mod format;
pub mod grammar;
pub mod id;
pub mod lint;
pub mod model;
pub mod parser;
pub mod snapshot;
pub mod transform;

pub use error::{ExportError, ParseError};
pub use exporter::{ExportOptions, export, export_document, export_frame};
pub use format::{FormatConfig, format_document};
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use parser::parse_document;
pub use transform::prune_unreachable;
