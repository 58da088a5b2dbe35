//! Error types for parsing and exporting FDL documents.

use thiserror::Error;

/// Input text that does not conform to the FDL grammar.
///
/// Line numbers are 1-based positions in the original input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty document")]
    Empty,

    #[error("missing version header (expected `dsl:<N>` as the first line)")]
    MissingVersion,

    #[error("line {line}: malformed version header `{found}`")]
    MalformedVersion { line: usize, found: String },

    #[error("line {line}: unsupported DSL version {version}")]
    UnsupportedVersion { line: usize, version: u32 },

    #[error("missing frame declaration")]
    MissingFrame,

    #[error("line {line}: malformed frame declaration: {reason}")]
    MalformedFrame { line: usize, reason: String },

    #[error("line {line}: unknown node type `{keyword}`")]
    UnknownNodeType { line: usize, keyword: String },

    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            reason: reason.into(),
        }
    }

    /// Source line the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Empty | ParseError::MissingVersion | ParseError::MissingFrame => None,
            ParseError::MalformedVersion { line, .. }
            | ParseError::UnsupportedVersion { line, .. }
            | ParseError::MalformedFrame { line, .. }
            | ParseError::UnknownNodeType { line, .. }
            | ParseError::Syntax { line, .. } => Some(*line),
        }
    }
}

/// An IR reference the exporter cannot resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("frame `{frame_id}` not found")]
    FrameNotFound { frame_id: String },
}
