//! Lint diagnostics for FDL documents.
//!
//! Reports structural issues in an IR without modifying it. Parsed text is
//! always well-formed; these checks matter for IRs that were edited or
//! assembled elsewhere before being exported.

use crate::grammar::{DEFAULT_OPACITY, is_valid_id};
use crate::id::NodeId;
use crate::model::Document;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed; the exporter will repair or drop something.
    Warning,
    /// Informational style suggestion.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to; `None` for frame-level findings.
    pub node_id: Option<NodeId>,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-child", "child-cycle").
    pub rule: &'static str,
}

impl LintDiagnostic {
    fn warning(node_id: Option<&NodeId>, rule: &'static str, message: String) -> Self {
        Self {
            node_id: node_id.cloned(),
            message,
            severity: LintSeverity::Warning,
            rule,
        }
    }
}

// ─── Child graph ──────────────────────────────────────────────────────────

/// The `child_ids` relation as a directed graph (parent → child). Dangling
/// child ids have no vertex.
struct ChildGraph<'a> {
    graph: DiGraph<&'a NodeId, ()>,
    index: HashMap<&'a NodeId, NodeIndex>,
}

impl<'a> ChildGraph<'a> {
    fn build(doc: &'a Document, ids: &[&'a NodeId]) -> Self {
        let mut graph = DiGraph::with_capacity(ids.len(), ids.len());
        let index: HashMap<_, _> = ids.iter().map(|id| (*id, graph.add_node(*id))).collect();
        for id in ids {
            let Some(node) = doc.get(id) else { continue };
            for child in &node.child_ids {
                if let Some(&to) = index.get(child) {
                    graph.add_edge(index[id], to, ());
                }
            }
        }
        Self { graph, index }
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics, in rule
/// order and then by node id.
#[must_use]
pub fn lint_document(doc: &Document) -> Vec<LintDiagnostic> {
    let mut ids: Vec<&NodeId> = doc.nodes.keys().collect();
    ids.sort_unstable();
    let graph = ChildGraph::build(doc, &ids);

    let mut diags = Vec::new();
    lint_missing_root(doc, &mut diags);
    lint_dangling_children(doc, &ids, &mut diags);
    lint_shared_children(doc, &ids, &mut diags);
    lint_cycles(&graph, &mut diags);
    lint_orphans(doc, &graph, &ids, &mut diags);
    lint_invalid_ids(&ids, &mut diags);
    lint_generated_ids(&ids, &mut diags);
    lint_opacity(doc, &ids, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_missing_root(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    match &doc.frame.root_node_id {
        Some(root) if doc.get(root).is_none() => diags.push(LintDiagnostic::warning(
            Some(root),
            "missing-root",
            format!("Frame `{}` names root `{root}`, which does not exist.", doc.frame.id),
        )),
        None if !doc.nodes.is_empty() => diags.push(LintDiagnostic::warning(
            None,
            "missing-root",
            format!(
                "Frame `{}` has {} nodes but no root; none of them will be exported.",
                doc.frame.id,
                doc.nodes.len()
            ),
        )),
        _ => {}
    }
}

fn lint_dangling_children(doc: &Document, ids: &[&NodeId], diags: &mut Vec<LintDiagnostic>) {
    for id in ids {
        let Some(node) = doc.get(id) else { continue };
        for child in node.child_ids.iter().filter(|c| doc.get(c).is_none()) {
            diags.push(LintDiagnostic::warning(
                Some(*id),
                "dangling-child",
                format!("`{id}` lists child `{child}`, which does not exist."),
            ));
        }
    }
}

/// A node listed more than once as a child (by one parent or several) is
/// exported only at its first position.
fn lint_shared_children(doc: &Document, ids: &[&NodeId], diags: &mut Vec<LintDiagnostic>) {
    let mut parents: HashMap<&NodeId, usize> = HashMap::new();
    for id in ids {
        let Some(node) = doc.get(id) else { continue };
        for child in &node.child_ids {
            *parents.entry(child).or_default() += 1;
        }
    }
    let mut shared: Vec<_> = parents
        .into_iter()
        .filter(|(child, count)| *count > 1 && doc.get(child).is_some())
        .collect();
    shared.sort_unstable();
    for (child, count) in shared {
        diags.push(LintDiagnostic::warning(
            Some(child),
            "shared-child",
            format!("`{child}` is listed as a child {count} times; a node has one place in the tree."),
        ));
    }
}

fn lint_cycles(graph: &ChildGraph<'_>, diags: &mut Vec<LintDiagnostic>) {
    let mut cycles: Vec<Vec<&NodeId>> = tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<&NodeId> = scc.into_iter().map(|ix| graph.graph[ix]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    cycles.sort_unstable();
    for members in cycles {
        let names: Vec<&str> = members.iter().map(|id| id.as_str()).collect();
        diags.push(LintDiagnostic::warning(
            Some(members[0]),
            "child-cycle",
            format!("Nodes [{}] contain each other through `child_ids`.", names.join(", ")),
        ));
    }
}

fn lint_orphans(doc: &Document, graph: &ChildGraph<'_>, ids: &[&NodeId], diags: &mut Vec<LintDiagnostic>) {
    // Without a root everything is unreachable; `missing-root` already says so.
    let Some(&start) = doc.frame.root_node_id.as_ref().and_then(|root| graph.index.get(root)) else {
        return;
    };
    let mut reachable = HashSet::new();
    let mut dfs = Dfs::new(&graph.graph, start);
    while let Some(ix) = dfs.next(&graph.graph) {
        reachable.insert(graph.graph[ix]);
    }
    for id in ids.iter().filter(|id| !reachable.contains(*id)) {
        diags.push(LintDiagnostic::warning(
            Some(*id),
            "orphan-node",
            format!("`{id}` is not reachable from the root and will not be exported."),
        ));
    }
}

fn lint_invalid_ids(ids: &[&NodeId], diags: &mut Vec<LintDiagnostic>) {
    for id in ids.iter().filter(|id| !is_valid_id(id.as_str())) {
        diags.push(LintDiagnostic::warning(
            Some(*id),
            "invalid-id",
            format!("Id {:?} cannot be written as `#id`; it is exported without an id.", id.as_str()),
        ));
    }
}

/// Flag ids the parser invented for anonymous nodes.
fn lint_generated_ids(ids: &[&NodeId], diags: &mut Vec<LintDiagnostic>) {
    for id in ids.iter().filter(|id| id.is_generated()) {
        diags.push(LintDiagnostic {
            node_id: Some((*id).clone()),
            message: format!("Anonymous node `#{id}`; consider giving it a semantic id like `#submit_button`."),
            severity: LintSeverity::Info,
            rule: "generated-id",
        });
    }
}

fn lint_opacity(doc: &Document, ids: &[&NodeId], diags: &mut Vec<LintDiagnostic>) {
    for id in ids {
        let Some(node) = doc.get(id) else { continue };
        let opacity = node.style.opacity;
        if !(0.0..=DEFAULT_OPACITY).contains(&opacity) {
            diags.push(LintDiagnostic::warning(
                Some(*id),
                "opacity-range",
                format!("`{id}` has opacity {opacity}; expected a value between 0 and 1."),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frame, Node, NodeProps};
    use crate::parser::parse_document;

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    fn container(id: &str, children: &[&str]) -> Node {
        let mut node = Node::new(NodeId::new(id), NodeProps::default_container());
        node.child_ids = children.iter().copied().map(NodeId::new).collect();
        node
    }

    fn doc_of(root: Option<&str>, nodes: Vec<Node>) -> Document {
        let mut doc = Document::new(Frame {
            root_node_id: root.map(NodeId::new),
            ..Frame::default()
        });
        for node in nodes {
            doc.nodes.insert(node.id.clone(), node);
        }
        doc
    }

    #[test]
    fn lint_clean_document_no_diags() {
        let doc = parse_document("dsl:1\nframe T\n  column#root\n    text#title \"Hi\"\n").unwrap();
        assert!(lint_document(&doc).is_empty());
    }

    #[test]
    fn lint_generated_ids_are_info() {
        let doc = parse_document("dsl:1\nframe T\n  column#root\n    text \"Hi\"\n").unwrap();
        let diags = lint_document(&doc);
        assert_eq!(rules(&diags), vec!["generated-id"]);
        assert_eq!(diags[0].severity, LintSeverity::Info);
        assert_eq!(diags[0].node_id, Some(NodeId::new("n_1")));
    }

    #[test]
    fn lint_missing_root() {
        let doc = doc_of(Some("gone"), vec![]);
        assert_eq!(rules(&lint_document(&doc)), vec!["missing-root"]);

        let doc = doc_of(None, vec![container("a", &[])]);
        assert_eq!(rules(&lint_document(&doc)), vec!["missing-root"]);
    }

    #[test]
    fn lint_dangling_child() {
        let doc = doc_of(Some("root"), vec![container("root", &["ghost"])]);
        let diags = lint_document(&doc);
        assert_eq!(rules(&diags), vec!["dangling-child"]);
        assert!(diags[0].message.contains("ghost"));
    }

    #[test]
    fn lint_cycle_and_shared_child() {
        let doc = doc_of(
            Some("root"),
            vec![container("root", &["a", "b"]), container("a", &["b"]), container("b", &["a"])],
        );
        let diags = lint_document(&doc);
        assert_eq!(rules(&diags), vec!["shared-child", "shared-child", "child-cycle"]);
        assert_eq!(diags[2].node_id, Some(NodeId::new("a")));
        assert!(diags[2].message.contains("a, b"));
    }

    #[test]
    fn lint_self_cycle() {
        let doc = doc_of(Some("root"), vec![container("root", &["root"])]);
        assert_eq!(rules(&lint_document(&doc)), vec!["child-cycle"]);
    }

    #[test]
    fn lint_orphans_and_bad_ids() {
        let doc = doc_of(
            Some("root"),
            vec![container("root", &[]), container("lost", &[]), container("has space", &[])],
        );
        assert_eq!(
            rules(&lint_document(&doc)),
            vec!["orphan-node", "orphan-node", "invalid-id"]
        );
    }

    #[test]
    fn lint_opacity_range() {
        let mut root = container("root", &[]);
        root.style.opacity = 1.5;
        let diags = lint_document(&doc_of(Some("root"), vec![root]));
        assert_eq!(rules(&diags), vec!["opacity-range"]);
        assert_eq!(diags[0].severity, LintSeverity::Warning);
    }
}
