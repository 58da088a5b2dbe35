//! Transform passes that mutate a `Document` in place.
//!
//! Passes are applied by `format_document` in `format.rs` based on `FormatConfig`.

use crate::id::NodeId;
use crate::model::Document;
use std::collections::HashSet;

// ─── Reachability ─────────────────────────────────────────────────────────

/// Ids reachable from the frame root through `child_ids`, root included.
/// Dangling ids are not part of the result; cycles are walked once.
pub fn reachable_ids(doc: &Document) -> HashSet<NodeId> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&NodeId> = doc.frame.root_node_id.iter().collect();
    while let Some(id) = stack.pop() {
        let Some(node) = doc.get(id) else { continue };
        if seen.insert(id.clone()) {
            stack.extend(node.child_ids.iter().rev());
        }
    }
    seen
}

// ─── Prune ────────────────────────────────────────────────────────────────

/// Remove every node the root cannot reach. Returns how many were removed.
///
/// A document without a root loses all of its nodes.
pub fn prune_unreachable(doc: &mut Document) -> usize {
    let keep = reachable_ids(doc);
    let before = doc.nodes.len();
    doc.nodes.retain(|id, _| keep.contains(id));
    before - doc.nodes.len()
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frame, Node, NodeProps};

    fn doc_with(root: Option<&str>, edges: Vec<(&str, Vec<&str>)>) -> Document {
        let mut doc = Document::new(Frame {
            root_node_id: root.map(NodeId::new),
            ..Frame::default()
        });
        for (id, children) in edges {
            let mut node = Node::new(NodeId::new(id), NodeProps::default_container());
            node.child_ids = children.into_iter().map(NodeId::new).collect();
            doc.nodes.insert(node.id.clone(), node);
        }
        doc
    }

    #[test]
    fn prune_removes_orphans() {
        let mut doc = doc_with(
            Some("root"),
            vec![("root", vec!["a"]), ("a", vec![]), ("orphan", vec!["orphan_child"]), ("orphan_child", vec![])],
        );
        assert_eq!(prune_unreachable(&mut doc), 2);
        let mut left: Vec<_> = doc.nodes.keys().map(NodeId::as_str).collect();
        left.sort_unstable();
        assert_eq!(left, vec!["a", "root"]);
    }

    #[test]
    fn prune_keeps_connected_document() {
        let mut doc = doc_with(Some("root"), vec![("root", vec!["a", "b"]), ("a", vec!["c"]), ("b", vec![]), ("c", vec![])]);
        assert_eq!(prune_unreachable(&mut doc), 0);
        assert_eq!(doc.nodes.len(), 4);
    }

    #[test]
    fn prune_without_root_clears_nodes() {
        let mut doc = doc_with(None, vec![("a", vec![]), ("b", vec![])]);
        assert_eq!(prune_unreachable(&mut doc), 2);
        assert!(doc.nodes.is_empty());
    }

    #[test]
    fn reachability_survives_cycles_and_dangling_ids() {
        let doc = doc_with(Some("root"), vec![("root", vec!["a", "ghost"]), ("a", vec!["root"])]);
        let ids = reachable_ids(&doc);
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&NodeId::new("ghost")));
    }

    #[test]
    fn parsed_duplicate_ids_leave_nothing_to_prune() {
        let mut doc = crate::parser::parse_document(
            "dsl:1\nframe T\n  column#root\n    row#dup\n      text#inner \"x\"\n    row#dup\n",
        )
        .unwrap();
        assert!(doc.get(&NodeId::new("inner")).is_none());
        assert_eq!(prune_unreachable(&mut doc), 0);
    }
}
