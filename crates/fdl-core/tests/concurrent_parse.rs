//! Parses on different threads share no state: each call numbers its own
//! anonymous nodes from `n_1` and produces the same document.

use fdl_core::{ExportOptions, NodeId, export_document, parse_document};
use std::thread;

const SETTINGS: &str = include_str!("fixtures/settings.fdl");
const LOGIN: &str = include_str!("fixtures/login.fdl");

#[test]
fn concurrent_parses_are_independent() {
    let expected_settings = export_document(&parse_document(SETTINGS).unwrap(), &ExportOptions::default());
    let expected_login = export_document(&parse_document(LOGIN).unwrap(), &ExportOptions::default());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let input = if i % 2 == 0 { SETTINGS } else { LOGIN };
                (0..25)
                    .map(|_| {
                        let doc = parse_document(input).expect("parse failed");
                        export_document(&doc, &ExportOptions::default())
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let outputs = handle.join().expect("worker panicked");
        let expected = if i % 2 == 0 { &expected_settings } else { &expected_login };
        assert!(outputs.iter().all(|out| out == expected), "thread {i} diverged");
    }
}

#[test]
fn generated_ids_restart_per_parse() {
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| parse_document("dsl:1\nframe T\n  column\n    text \"a\"\n").expect("parse failed")))
        .collect();
    for handle in handles {
        let doc = handle.join().expect("worker panicked");
        assert_eq!(doc.frame.root_node_id, Some(NodeId::new("n_1")));
        assert!(doc.get(&NodeId::new("n_2")).is_some());
    }
}
