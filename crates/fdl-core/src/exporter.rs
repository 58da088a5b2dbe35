//! Exporter: `Document` → FDL text.
//!
//! Output is canonical: fixed property order, canonical keywords, defaults
//! omitted and numbers in their shortest form. Exporting the result of
//! parsing exported text gives back the same bytes.

use crate::error::ExportError;
use crate::grammar::*;
use crate::id::NodeId;
use crate::model::*;
use std::collections::HashSet;
use std::fmt::Write;

/// Knobs for `export`. The defaults give a lossless round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write `#id` after node keywords (and on the frame line, when not the
    /// default frame id).
    pub include_ids: bool,
    /// Leave out ids of the `n_<k>` shape the parser invents for anonymous
    /// nodes. Only meaningful with `include_ids`.
    pub omit_generated_ids: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_ids: true,
            omit_generated_ids: false,
        }
    }
}

impl ExportOptions {
    fn writes_id(&self, id: &NodeId) -> bool {
        self.include_ids && !(self.omit_generated_ids && id.is_generated())
    }
}

/// Export a parsed document.
#[must_use]
pub fn export_document(doc: &Document, options: &ExportOptions) -> String {
    export(&doc.frame, &doc.nodes, options)
}

/// Export `frame` and the subtree under its root.
///
/// Never fails: a missing root yields a body-less document, a child id with
/// no node behind it is skipped, and a node reachable twice (shared child or
/// cycle) is written only the first time.
#[must_use]
pub fn export(frame: &Frame, nodes: &NodeMap, options: &ExportOptions) -> String {
    let mut out = String::with_capacity(64 + nodes.len() * 48);
    let _ = writeln!(out, "{VERSION_PREFIX}{DSL_VERSION}");
    emit_frame_line(&mut out, frame, options);

    if let Some(root_id) = &frame.root_node_id {
        match nodes.get(root_id) {
            Some(root) => {
                let mut visited = HashSet::new();
                emit_node(&mut out, nodes, root, 1, options, &mut visited);
            }
            None => log::warn!("frame `{}`: root node `{root_id}` does not exist", frame.id),
        }
    }
    out
}

/// Look a frame up by id among `frames` and export it.
pub fn export_frame<'a>(
    frames: impl IntoIterator<Item = &'a Frame>,
    frame_id: &str,
    nodes: &NodeMap,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    let frame = frames
        .into_iter()
        .find(|f| f.id == frame_id)
        .ok_or_else(|| ExportError::FrameNotFound {
            frame_id: frame_id.to_string(),
        })?;
    Ok(export(frame, nodes, options))
}

// ─── Lines ───────────────────────────────────────────────────────────────

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth * INDENT_UNIT {
        out.push(' ');
    }
}

fn emit_frame_line(out: &mut String, frame: &Frame, options: &ExportOptions) {
    out.push_str(FRAME_KEYWORD);
    if options.include_ids && frame.id != DEFAULT_FRAME_ID && is_valid_id(&frame.id) {
        out.push(ID_MARKER);
        out.push_str(&frame.id);
    }
    if !frame.name.is_empty() {
        out.push(' ');
        if is_bare_name(&frame.name) {
            out.push_str(&frame.name);
        } else {
            push_quoted(out, &frame.name);
        }
    }
    if frame.canvas_size != DEFAULT_CANVAS {
        match (num_str(frame.canvas_size.width), num_str(frame.canvas_size.height)) {
            (Some(width), Some(height)) => {
                let _ = write!(
                    out,
                    " {PROPS_SEPARATOR} {} {width} {} {height}",
                    Prop::Width.keyword(),
                    Prop::Height.keyword(),
                );
            }
            _ => log::warn!("frame `{}`: canvas size is not finite; left at the default", frame.id),
        }
    }
    out.push('\n');
}

fn emit_node<'a>(
    out: &mut String,
    nodes: &'a NodeMap,
    node: &'a Node,
    depth: usize,
    options: &ExportOptions,
    visited: &mut HashSet<&'a NodeId>,
) {
    visited.insert(&node.id);

    indent(out, depth);
    out.push_str(NodeKeyword::for_node(node).keyword());
    if options.writes_id(&node.id) {
        if is_valid_id(node.id.as_str()) {
            out.push(ID_MARKER);
            out.push_str(node.id.as_str());
        } else {
            log::warn!("node id {:?} cannot be written as `#id`; exported without it", node.id.as_str());
        }
    }
    if let Some(payload) = node.props.payload() {
        out.push(' ');
        push_quoted(out, payload);
    }

    let props = node_properties(node);
    if !props.is_empty() {
        out.push(' ');
        out.push_str(PROPS_SEPARATOR);
        out.push(' ');
        out.push_str(&props.text);
    }
    out.push('\n');

    for child_id in &node.child_ids {
        match nodes.get(child_id) {
            Some(_) if visited.contains(child_id) => {
                log::warn!("node `{child_id}` is reachable more than once; exported at its first position only");
            }
            Some(child) => emit_node(out, nodes, child, depth + 1, options, visited),
            None => log::warn!("node `{}` lists missing child `{child_id}`; skipped", node.id),
        }
    }
}

// ─── Properties ──────────────────────────────────────────────────────────

/// Space-separated `keyword value` pairs of one node line.
#[derive(Default)]
struct Props {
    text: String,
    /// Properties whose value has no text form (non-finite number, unwritable
    /// token path, gradient without stops).
    dropped: Vec<Prop>,
}

impl Props {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push(&mut self, prop: Prop, value: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(prop.keyword());
        if !value.is_empty() {
            self.text.push(' ');
            self.text.push_str(value);
        }
    }

    fn flag(&mut self, prop: Prop) {
        self.push(prop, "");
    }

    fn value(&mut self, prop: Prop, value: Option<String>) {
        match value {
            Some(value) => self.push(prop, &value),
            None => self.dropped.push(prop),
        }
    }
}

fn node_properties(node: &Node) -> Props {
    let mut props = Props::default();
    let layout = &node.layout;

    if layout.size.width != DEFAULT_AXIS_SIZE {
        props.value(Prop::Width, axis_str(layout.size.width));
    }
    if layout.size.height != DEFAULT_AXIS_SIZE {
        props.value(Prop::Height, axis_str(layout.size.height));
    }
    if layout.position != DEFAULT_POSITION {
        props.value(Prop::Pos, position_str(&layout.position));
    }

    match (&node.props, &layout.auto_layout) {
        (NodeProps::Container { .. }, Some(al)) => {
            if let Some(gap) = &al.gap {
                props.value(Prop::Gap, numeric_str(gap));
            }
            if al.padding != Sides::default() {
                props.value(Prop::Pad, edges_str(&al.padding.to_array()));
            }
            if al.main_align != DEFAULT_MAIN_ALIGN {
                props.push(Prop::Main, al.main_align.keyword());
            }
            if al.cross_align != DEFAULT_CROSS_ALIGN {
                props.push(Prop::Cross, al.cross_align.keyword());
            }
        }
        (_, Some(_)) => log::debug!(
            "auto-layout on {:?} `{}` has no text form; dropped",
            node.node_type(),
            node.id
        ),
        (_, None) => {}
    }

    match &node.props {
        NodeProps::Container {
            clip,
            scroll_direction,
        } => {
            if *clip != DEFAULT_CLIP {
                props.flag(Prop::Clip);
            }
            if let Some(direction) = scroll_direction {
                props.push(Prop::Scroll, &word_or_quoted(direction));
            }
        }
        NodeProps::Text {
            font_size,
            font_weight,
            color,
            text_align,
            font_family,
            ..
        } => {
            if *font_size != DEFAULT_FONT_SIZE {
                props.value(Prop::Size, num_str(*font_size));
            }
            if *font_weight != DEFAULT_FONT_WEIGHT {
                props.push(Prop::Weight, &font_weight.to_string());
            }
            if let Some(color) = color {
                props.value(Prop::Color, color_str(color));
            }
            if *text_align != DEFAULT_TEXT_ALIGN {
                props.push(Prop::Align, text_align.keyword());
            }
            if let Some(family) = font_family {
                props.push(Prop::Font, &word_or_quoted(family));
            }
        }
        NodeProps::Icon {
            icon_set,
            size,
            color,
            ..
        } => {
            if icon_set != DEFAULT_ICON_SET {
                props.push(Prop::Set, &word_or_quoted(icon_set));
            }
            if *size != DEFAULT_ICON_SIZE {
                props.value(Prop::Size, num_str(*size));
            }
            if let Some(color) = color {
                props.value(Prop::Color, color_str(color));
            }
        }
        NodeProps::Image { fit, alt, .. } => {
            if *fit != DEFAULT_IMAGE_FIT {
                props.push(Prop::Fit, fit.keyword());
            }
            if let Some(alt) = alt {
                props.push(Prop::Alt, &quoted(alt));
            }
        }
        NodeProps::Spacer { flex } => {
            if *flex != DEFAULT_SPACER_FLEX {
                props.value(Prop::Flex, num_str(*flex));
            }
        }
        NodeProps::Instance { .. } | NodeProps::Slot { .. } => {}
    }

    let style = &node.style;
    if let Some(fill) = &style.fill {
        props.value(Prop::Bg, fill_str(fill));
    }
    if let Some(radius) = &style.corner_radius {
        props.value(Prop::Radius, edges_str(&radius.to_array()));
    }
    if let Some(stroke) = &style.stroke {
        if stroke.color != ColorValue::Hex(DEFAULT_STROKE_COLOR) {
            log::debug!("stroke color of `{}` has no text form; written as width only", node.id);
        }
        props.value(Prop::Border, num_str(stroke.width));
    }
    if style.opacity != DEFAULT_OPACITY {
        props.value(Prop::Opacity, num_str(style.opacity));
    }
    if style.visible != DEFAULT_VISIBLE {
        props.push(Prop::Visible, style.visible.keyword());
    }

    for prop in &props.dropped {
        log::warn!("`{}` of `{}` has no text form; dropped", prop.keyword(), node.id);
    }
    props
}

// ─── Values ──────────────────────────────────────────────────────────────
//
// Each returns `None` for a value the parser could not read back.

/// Shortest decimal that reads back as the same `f64`; `-0` prints as `0`.
fn format_num(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    format!("{n}")
}

fn num_str(n: f64) -> Option<String> {
    n.is_finite().then(|| format_num(n))
}

fn token_str(path: &str) -> Option<String> {
    is_valid_token_path(path).then(|| format!("{{{path}}}"))
}

fn numeric_str(value: &NumericValue) -> Option<String> {
    match value {
        NumericValue::Fixed(n) => num_str(*n),
        NumericValue::TokenRef(path) => token_str(path),
    }
}

fn color_str(value: &ColorValue) -> Option<String> {
    match value {
        ColorValue::Hex(rgb) => Some(rgb.to_shortest_hex()),
        ColorValue::TokenRef(path) => token_str(path),
    }
}

fn axis_str(size: AxisSize) -> Option<String> {
    match size {
        AxisSize::Fixed(n) => num_str(n),
        AxisSize::Fill => Some(AxisKeyword::Fill.keyword().to_string()),
        AxisSize::Hug => Some(AxisKeyword::Hug.keyword().to_string()),
    }
}

fn position_str(position: &PositionMode) -> Option<String> {
    match position {
        PositionMode::Relative => Some(PositionKeyword::Relative.keyword().to_string()),
        PositionMode::Absolute { x, y } => Some(format!(
            "{} {POS_X} {} {POS_Y} {}",
            PositionKeyword::Absolute.keyword(),
            num_str(*x)?,
            num_str(*y)?
        )),
    }
}

fn edges_str(edges: &[NumericValue; 4]) -> Option<String> {
    let parts = collapse_edges(edges)
        .iter()
        .map(numeric_str)
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(","))
}

fn fill_str(fill: &Fill) -> Option<String> {
    match fill {
        Fill::Solid(color) => color_str(color),
        Fill::TokenFill(path) => token_str(path),
        Fill::Gradient(gradient) => gradient_str(gradient),
    }
}

fn gradient_str(gradient: &Gradient) -> Option<String> {
    if gradient.stops.is_empty() {
        return None;
    }
    let mut args = Vec::with_capacity(gradient.stops.len() + 1);
    if gradient.kind == GradientKind::Linear {
        match &gradient.angle {
            Some(NumericValue::Fixed(a)) if *a != DEFAULT_GRADIENT_ANGLE => args.push(num_str(*a)?),
            Some(NumericValue::TokenRef(path)) => args.push(format!("{}{ANGLE_SUFFIX}", token_str(path)?)),
            _ => {}
        }
    }
    let count = gradient.stops.len();
    for (index, stop) in gradient.stops.iter().enumerate() {
        let mut arg = color_str(&stop.color)?;
        if stop.position != default_stop_position(index, count) {
            arg.push(' ');
            arg.push_str(&num_str(stop.position)?);
        }
        args.push(arg);
    }
    Some(format!("{}({})", gradient.kind.keyword(), args.join(",")))
}

// ─── Strings ─────────────────────────────────────────────────────────────

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    push_quoted(&mut out, text);
    out
}

fn word_or_quoted(text: &str) -> String {
    if is_bare_word(text) {
        text.to_string()
    } else {
        quoted(text)
    }
}
