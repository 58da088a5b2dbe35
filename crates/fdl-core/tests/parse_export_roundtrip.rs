//! Integration tests: parse → export round-trips over fixture documents, plus
//! property tests for the round-trip laws.

use fdl_core::grammar::{DEFAULT_FONT_SIZE, Keyword, NodeKeyword};
use fdl_core::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const LOGIN: &str = include_str!("fixtures/login.fdl");
const GALLERY: &str = include_str!("fixtures/gallery.fdl");
const SETTINGS: &str = include_str!("fixtures/settings.fdl");
const SETTINGS_CANONICAL: &str = include_str!("fixtures/settings.canonical.fdl");

fn export_default(doc: &Document) -> String {
    export_document(doc, &ExportOptions::default())
}

fn parse(input: &str) -> Document {
    parse_document(input).unwrap_or_else(|e| panic!("parse failed: {e}\n{input}"))
}

/// Canonical text must survive parse → export byte for byte.
fn assert_canonical(input: &str) {
    let doc = parse(input);
    assert_eq!(export_default(&doc), input);
}

/// Parsing the exported text gives back the same IR.
fn assert_ir_roundtrip(doc: &Document) {
    let text = export_default(doc);
    let back = parse(&text);
    assert_eq!(&back, doc, "IR changed through:\n{text}");
}

// ─── Fixtures ────────────────────────────────────────────────────────────

#[test]
fn login_fixture_is_canonical() {
    assert_canonical(LOGIN);
}

#[test]
fn gallery_fixture_is_canonical() {
    assert_canonical(GALLERY);
}

#[test]
fn settings_fixture_canonicalizes() {
    let doc = parse(SETTINGS);
    assert_eq!(export_default(&doc), SETTINGS_CANONICAL);
    assert_canonical(SETTINGS_CANONICAL);
}

#[test]
fn fixtures_roundtrip_ir() {
    for input in [LOGIN, GALLERY, SETTINGS] {
        assert_ir_roundtrip(&parse(input));
    }
}

#[test]
fn fixture_structure() {
    let doc = parse(LOGIN);
    assert_eq!(doc.frame.id, "login");
    assert_eq!(doc.frame.name, "Login Screen");
    assert_eq!(doc.frame.canvas_size, CanvasSize { width: 390.0, height: 844.0 });
    let root = doc.root().expect("root");
    let children: Vec<&str> = doc.children(root).map(|n| n.id.as_str()).collect();
    assert_eq!(
        children,
        vec!["title", "subtitle", "email_field", "password_field", "actions", "bottom_space", "logo"]
    );
    assert_eq!(doc.nodes.len(), 12);
}

#[test]
fn fixture_values() {
    let doc = parse(GALLERY);
    let hero = doc.get(&NodeId::new("hero")).expect("hero");
    assert_eq!(
        hero.props,
        NodeProps::Image {
            src: "https://cdn.example.com/hero.jpg".into(),
            fit: ImageFit::Contain,
            alt: Some("Mountain \"peak\" at dawn".into()),
        }
    );
    let card = doc.get(&NodeId::new("card")).expect("card");
    assert_eq!(
        card.layout.position,
        PositionMode::Absolute { x: 10.0, y: 24.5 }
    );
    let caption = doc.get(&NodeId::new("caption")).expect("caption");
    assert_eq!(caption.props.payload(), Some("Line one\nLine two"));
    assert!(!caption.style.visible);
}

#[test]
fn exporting_twice_is_byte_identical() {
    for input in [LOGIN, GALLERY, SETTINGS] {
        let doc = parse(input);
        assert_eq!(export_default(&doc), export_default(&doc));
    }
}

#[test]
fn format_is_idempotent_on_fixtures() {
    let config = FormatConfig::default();
    for input in [LOGIN, GALLERY, SETTINGS] {
        let once = format_document(input, &config).unwrap();
        assert_eq!(format_document(&once, &config).unwrap(), once);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn single_container_scenario() {
    let doc = parse("dsl:1\nframe Test\n  container#root");
    assert_eq!(export_default(&doc), "dsl:1\nframe Test\n  container#root\n");
}

#[test]
fn white_background_exports_short_hex() {
    let doc = parse("dsl:1\nframe Test\n  container#root - bg #FFFFFF");
    assert_eq!(export_default(&doc), "dsl:1\nframe Test\n  container#root - bg #FFF\n");
}

#[test]
fn padding_forms_collapse() {
    let short = parse("dsl:1\nframe Test\n  column#root - pad 16");
    let long = parse("dsl:1\nframe Test\n  column#root - pad 16,16,16,16");
    assert_eq!(short, long);
    assert_eq!(export_default(&long), "dsl:1\nframe Test\n  column#root - pad 16\n");

    let pair = parse("dsl:1\nframe Test\n  column#root - pad 8,16");
    assert_eq!(export_default(&pair), "dsl:1\nframe Test\n  column#root - pad 8,16\n");
}

#[test]
fn text_size_and_weight_roundtrip() {
    let input = "dsl:1\nframe Test\n  text#t \"Hello\" - size 24 weight 700\n";
    let doc = parse(input);
    let NodeProps::Text {
        font_size,
        font_weight,
        text_align,
        ..
    } = &doc.get(&NodeId::new("t")).expect("t").props
    else {
        panic!("expected text");
    };
    assert_eq!((*font_size, *font_weight, *text_align), (24.0, 700, TextAlign::Left));
    assert_eq!(export_default(&doc), input);
}

#[test]
fn default_only_node_has_no_properties_clause() {
    let doc = parse("dsl:1\nframe Test\n  img#i \"a.png\" - fit cover opacity 1 visible true w hug\n");
    assert_eq!(export_default(&doc), "dsl:1\nframe Test\n  img#i \"a.png\"\n");
}

#[test]
fn unknown_property_is_dropped_on_export() {
    let doc = parse("dsl:1\nframe Test\n  container#root - shadow-blur 4 opacity 0.5\n");
    assert_eq!(export_default(&doc), "dsl:1\nframe Test\n  container#root - opacity 0.5\n");
}

#[test]
fn missing_version_header_is_an_error() {
    assert_eq!(parse_document("frame Test\n  container#root"), Err(ParseError::MissingVersion));
}

#[test]
fn duplicate_ids_survive_a_second_trip() {
    let input = concat!(
        "dsl:1\nframe T\n",
        "  column#root\n",
        "    row#dup\n",
        "      text#inner \"gone\"\n",
        "    text#dup \"kept\"\n",
        "    column#side\n",
        "      text#dup \"last\"\n",
    );
    let doc = parse(input);
    let back = parse(&export_default(&doc));
    assert_eq!(back, doc);
    assert_eq!(doc.get(&NodeId::new("dup")).and_then(|n| n.props.payload()), Some("last"));
    assert_eq!(doc.nodes.len(), 3);
}

#[test]
fn uneven_dedent_keeps_relative_depth() {
    let doc = parse("dsl:1\nframe T\n  column#a\n      row#b\n    row#c\n");
    assert_eq!(doc.get(&NodeId::new("a")).expect("a").child_ids, vec![NodeId::new("b"), NodeId::new("c")]);
    assert_eq!(export_default(&doc), "dsl:1\nframe T\n  column#a\n    row#b\n    row#c\n");
}

#[test]
fn token_solid_exports_like_token_fill() {
    let mut doc = parse("dsl:1\nframe T\n  container#c\n");
    if let Some(node) = doc.get_mut(&NodeId::new("c")) {
        node.style.fill = Some(Fill::Solid(ColorValue::TokenRef("surface".into())));
    }
    assert_eq!(export_default(&doc), "dsl:1\nframe T\n  container#c - bg {surface}\n");
    assert_ir_roundtrip(&doc);
}

#[test]
fn export_frame_from_a_frame_set() {
    let doc = parse(LOGIN);
    let other = Frame {
        id: "other".into(),
        ..Frame::default()
    };
    let frames = [other, doc.frame.clone()];
    let out = export_frame(&frames, "login", &doc.nodes, &ExportOptions::default()).unwrap();
    assert_eq!(out, LOGIN);
    assert!(matches!(
        export_frame(&frames, "signup", &doc.nodes, &ExportOptions::default()),
        Err(ExportError::FrameNotFound { .. })
    ));
}

// ─── Properties ──────────────────────────────────────────────────────────

fn text_node_doc(payload: &str) -> Document {
    let mut props = NodeKeyword::Text.default_props();
    if let Some(p) = props.payload_mut() {
        *p = payload.to_string();
    }
    let node = Node::new(NodeId::new("t"), props);
    let mut doc = Document::new(Frame {
        root_node_id: Some(node.id.clone()),
        ..Frame::default()
    });
    doc.nodes.insert(node.id.clone(), node);
    doc
}

fn container_doc(edit: impl FnOnce(&mut Node)) -> Document {
    let mut doc = text_node_doc("");
    let mut node = Node::new(NodeId::new("t"), NodeProps::default_container());
    edit(&mut node);
    doc.nodes.insert(node.id.clone(), node);
    doc
}

fn numeric() -> impl Strategy<Value = NumericValue> {
    prop_oneof![
        (-10_000i32..10_000).prop_map(|n| NumericValue::Fixed(f64::from(n) / 4.0)),
        "[a-z][a-z0-9_.]{0,12}".prop_map(NumericValue::TokenRef),
    ]
}

proptest! {
    #[test]
    fn shortest_hex_reads_back(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let rgb = Rgb::new(r, g, b);
        let hex = rgb.to_shortest_hex();
        prop_assert_eq!(Rgb::from_hex(&hex), Some(rgb));
        prop_assert_eq!(hex.len() == 4, rgb.has_short_form());
    }

    #[test]
    fn numbers_print_and_read_back(x in -1.0e9f64..1.0e9) {
        let doc = container_doc(|n| n.layout.size.width = AxisSize::Fixed(x));
        assert_ir_roundtrip(&doc);
    }

    #[test]
    fn padding_edges_roundtrip(top in numeric(), right in numeric(), bottom in numeric(), left in numeric()) {
        let doc = container_doc(|n| {
            n.layout.auto_layout = Some(AutoLayout {
                padding: Sides { top, right, bottom, left },
                ..AutoLayout::new(Direction::Vertical)
            });
        });
        assert_ir_roundtrip(&doc);
    }

    #[test]
    fn text_payload_roundtrips(payload in any::<String>()) {
        let doc = text_node_doc(&payload);
        assert_ir_roundtrip(&doc);
    }

    #[test]
    fn frame_name_roundtrips(name in any::<String>()) {
        let mut doc = text_node_doc("x");
        doc.frame.name = name;
        assert_ir_roundtrip(&doc);
    }

    #[test]
    fn font_size_roundtrips(size in 1u32..400) {
        let mut doc = text_node_doc("x");
        if let Some(node) = doc.get_mut(&NodeId::new("t"))
            && let NodeProps::Text { font_size, .. } = &mut node.props
        {
            *font_size = f64::from(size) / 2.0;
        }
        let exported = export_default(&doc);
        prop_assert_eq!(
            exported.contains(" - size "),
            f64::from(size) / 2.0 != DEFAULT_FONT_SIZE
        );
        assert_ir_roundtrip(&doc);
    }
}

#[test]
fn keyword_tables_are_exported_verbatim() {
    // Every node keyword's canonical spelling parses back to the same keyword.
    for (spelling, keyword) in NodeKeyword::TABLE {
        if *spelling == keyword.keyword() {
            let payload = if keyword.takes_payload() { " \"p\"" } else { "" };
            let input = format!("dsl:1\nframe T\n  {spelling}#n{payload}\n");
            assert_canonical(&input);
        }
    }
}
