use crate::grammar::GENERATED_ID_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node within one document (e.g. `#login_form`).
///
/// Ids are plain owned strings: documents parsed on different threads never
/// share an interner or counter.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids of the `n_<k>` shape the parser synthesizes.
    pub fn is_generated(&self) -> bool {
        self.0
            .strip_prefix(GENERATED_ID_PREFIX)
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::new(s)
    }
}

/// Per-parse generator for anonymous node ids (`n_1`, `n_2`, ...).
///
/// Owned by a single `parse_document` call, so concurrent parses never
/// observe each other's counters.
#[derive(Debug, Default)]
pub struct IdGen {
    counter: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next `n_<k>` id for which `taken` returns false.
    pub fn next_free(&mut self, taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            self.counter += 1;
            let id = NodeId(format!("{GENERATED_ID_PREFIX}{}", self.counter));
            if !taken(&id) {
                return id;
            }
        }
    }
}
