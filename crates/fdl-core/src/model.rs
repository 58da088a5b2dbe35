//! Intermediate representation of an FDL document.
//!
//! A document is one `Frame` plus a flat map of `Node` values. Hierarchy is
//! carried by each node's ordered `child_ids`; sibling order is render order.
//! Values that may defer to a design token (`{color.primary}`) keep the token
//! path verbatim; resolution against a theme happens outside this crate.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Colors ──────────────────────────────────────────────────────────────

/// 24-bit RGB color. Always held in full form; `#RGB` input is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (case-insensitive, `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// True when every channel's two hex digits are equal (`#AABBCC`).
    pub fn has_short_form(&self) -> bool {
        [self.r, self.g, self.b]
            .into_iter()
            .all(|c| c >> 4 == c & 0xF)
    }

    /// Canonical `#RRGGBB`, uppercase.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(7);
        out.push('#');
        for c in [self.r, self.g, self.b] {
            out.push(char::from(HEX_CHARS[(c >> 4) as usize]));
            out.push(char::from(HEX_CHARS[(c & 0xF) as usize]));
        }
        out
    }

    /// Shortest form that parses back to the same color: `#RGB` when
    /// possible, `#RRGGBB` otherwise.
    pub fn to_shortest_hex(&self) -> String {
        if !self.has_short_form() {
            return self.to_hex();
        }
        let mut out = String::with_capacity(4);
        out.push('#');
        for c in [self.r, self.g, self.b] {
            out.push(char::from(HEX_CHARS[(c & 0xF) as usize]));
        }
        out
    }
}

// ─── Values ──────────────────────────────────────────────────────────────

/// A literal number or a deferred design-token lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumericValue {
    Fixed(f64),
    TokenRef(String),
}

impl NumericValue {
    pub fn token(path: impl Into<String>) -> Self {
        NumericValue::TokenRef(path.into())
    }
}

impl From<f64> for NumericValue {
    fn from(v: f64) -> Self {
        NumericValue::Fixed(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorValue {
    Hex(Rgb),
    TokenRef(String),
}

impl ColorValue {
    pub fn hex(hex: &str) -> Option<Self> {
        Rgb::from_hex(hex).map(ColorValue::Hex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: ColorValue,
    /// 0.0 ..= 1.0
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub kind: GradientKind,
    /// Degrees. Linear only; `None` means the grammar default.
    pub angle: Option<NumericValue>,
    pub stops: SmallVec<[GradientStop; 4]>,
}

/// Background paint of a node.
///
/// `Solid(TokenRef(p))` and `TokenFill(p)` describe the same fill and compare
/// equal; the parser always produces the latter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Fill {
    Solid(ColorValue),
    TokenFill(String),
    Gradient(Gradient),
}

impl Fill {
    /// The canonical spelling of this fill: token solids become `TokenFill`,
    /// a linear gradient without an angle gets the default one.
    pub fn normalized(&self) -> Fill {
        match self {
            Fill::Solid(ColorValue::TokenRef(path)) => Fill::TokenFill(path.clone()),
            Fill::Gradient(g) if g.kind == GradientKind::Linear && g.angle.is_none() => {
                Fill::Gradient(Gradient {
                    angle: Some(NumericValue::Fixed(crate::grammar::DEFAULT_GRADIENT_ANGLE)),
                    ..g.clone()
                })
            }
            other => other.clone(),
        }
    }
}

impl PartialEq for Fill {
    fn eq(&self, other: &Self) -> bool {
        match (self.normalized(), other.normalized()) {
            (Fill::Solid(a), Fill::Solid(b)) => a == b,
            (Fill::TokenFill(a), Fill::TokenFill(b)) => a == b,
            (Fill::Gradient(a), Fill::Gradient(b)) => a == b,
            _ => false,
        }
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisSize {
    Fixed(f64),
    Fill,
    /// Size to content.
    Hug,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: AxisSize,
    pub height: AxisSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionMode {
    /// Flows in the parent's auto-layout.
    Relative,
    /// Pinned to parent coordinates. Never token-referenced.
    Absolute { x: f64, y: f64 },
}

/// Expand a 1, 2 or 4 element list into four edge values.
///
/// Two values pair up as `[a, b, a, b]`: vertical/horizontal for sides,
/// the two diagonals for corners.
pub fn expand_edges(values: Vec<NumericValue>) -> Option<[NumericValue; 4]> {
    match <[NumericValue; 4]>::try_from(values) {
        Ok(all) => Some(all),
        Err(values) => match values.as_slice() {
            [v] => Some([v.clone(), v.clone(), v.clone(), v.clone()]),
            [a, b] => Some([a.clone(), b.clone(), a.clone(), b.clone()]),
            _ => None,
        },
    }
}

/// Shortest list that `expand_edges` maps back to `edges`.
pub fn collapse_edges(edges: &[NumericValue; 4]) -> &[NumericValue] {
    let [a, b, c, d] = edges;
    if a == b && a == c && a == d {
        &edges[..1]
    } else if a == c && b == d {
        &edges[..2]
    } else {
        &edges[..]
    }
}

/// Per-side values, `top, right, bottom, left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    pub top: NumericValue,
    pub right: NumericValue,
    pub bottom: NumericValue,
    pub left: NumericValue,
}

impl Sides {
    pub fn uniform(v: NumericValue) -> Self {
        Self::from_array([v.clone(), v.clone(), v.clone(), v])
    }

    pub fn from_array([top, right, bottom, left]: [NumericValue; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn to_array(&self) -> [NumericValue; 4] {
        [
            self.top.clone(),
            self.right.clone(),
            self.bottom.clone(),
            self.left.clone(),
        ]
    }
}

/// Per-corner values, `top_left, top_right, bottom_right, bottom_left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: NumericValue,
    pub top_right: NumericValue,
    pub bottom_right: NumericValue,
    pub bottom_left: NumericValue,
}

impl Corners {
    pub fn uniform(v: NumericValue) -> Self {
        Self::from_array([v.clone(), v.clone(), v.clone(), v])
    }

    pub fn from_array([top_left, top_right, bottom_right, bottom_left]: [NumericValue; 4]) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub fn to_array(&self) -> [NumericValue; 4] {
        [
            self.top_left.clone(),
            self.top_right.clone(),
            self.bottom_right.clone(),
            self.bottom_left.clone(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainAlign {
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossAlign {
    Start,
    Center,
    End,
    Stretch,
}

/// Flex-like row/column arrangement of a container's children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLayout {
    pub direction: Direction,
    pub gap: Option<NumericValue>,
    pub padding: Sides,
    pub main_align: MainAlign,
    pub cross_align: CrossAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub size: Size,
    pub position: PositionMode,
    /// Only on `row`/`column` containers.
    pub auto_layout: Option<AutoLayout>,
}

// ─── Styling ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: ColorValue,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: Option<Fill>,
    pub corner_radius: Option<Corners>,
    pub stroke: Option<Stroke>,
    /// Not range-checked here; see `lint`.
    pub opacity: f64,
    pub visible: bool,
}

// ─── Node payloads ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFit {
    Cover,
    Contain,
    Fill,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Container,
    Text,
    Image,
    Icon,
    Spacer,
    Instance,
    Slot,
}

/// Type-specific properties; the variant is the node's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeProps {
    Container {
        clip: bool,
        scroll_direction: Option<String>,
    },
    Text {
        text: String,
        font_size: f64,
        font_weight: u16,
        color: Option<ColorValue>,
        text_align: TextAlign,
        font_family: Option<String>,
    },
    Icon {
        icon: String,
        icon_set: String,
        size: f64,
        color: Option<ColorValue>,
    },
    Image {
        src: String,
        fit: ImageFit,
        alt: Option<String>,
    },
    Spacer {
        flex: f64,
    },
    Instance {
        component_id: String,
    },
    Slot {
        slot_name: String,
    },
}

impl NodeProps {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeProps::Container { .. } => NodeType::Container,
            NodeProps::Text { .. } => NodeType::Text,
            NodeProps::Icon { .. } => NodeType::Icon,
            NodeProps::Image { .. } => NodeType::Image,
            NodeProps::Spacer { .. } => NodeType::Spacer,
            NodeProps::Instance { .. } => NodeType::Instance,
            NodeProps::Slot { .. } => NodeType::Slot,
        }
    }

    /// The quoted primary string (`text`, `src`, `icon`, component or slot name).
    pub fn payload(&self) -> Option<&str> {
        match self {
            NodeProps::Text { text, .. } => Some(text),
            NodeProps::Image { src, .. } => Some(src),
            NodeProps::Icon { icon, .. } => Some(icon),
            NodeProps::Instance { component_id } => Some(component_id),
            NodeProps::Slot { slot_name } => Some(slot_name),
            NodeProps::Container { .. } | NodeProps::Spacer { .. } => None,
        }
    }

    pub fn payload_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeProps::Text { text, .. } => Some(text),
            NodeProps::Image { src, .. } => Some(src),
            NodeProps::Icon { icon, .. } => Some(icon),
            NodeProps::Instance { component_id } => Some(component_id),
            NodeProps::Slot { slot_name } => Some(slot_name),
            NodeProps::Container { .. } | NodeProps::Spacer { .. } => None,
        }
    }
}

// ─── Nodes & documents ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub props: NodeProps,
    pub layout: NodeLayout,
    pub style: NodeStyle,
    /// Ordered; sibling render/traversal order.
    pub child_ids: Vec<NodeId>,
}

impl Node {
    /// A node with grammar-default layout and style.
    pub fn new(id: NodeId, props: NodeProps) -> Self {
        Self {
            id,
            props,
            layout: NodeLayout::default(),
            style: NodeStyle::default(),
            child_ids: Vec::new(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.props.node_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    /// May be empty or contain spaces.
    pub name: String,
    pub canvas_size: CanvasSize,
    /// `None` only for a frame without a body.
    pub root_node_id: Option<NodeId>,
}

pub type NodeMap = HashMap<NodeId, Node>;

/// One parsed frame and the nodes it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub frame: Frame,
    pub nodes: NodeMap,
}

impl Document {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            nodes: NodeMap::new(),
        }
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.frame.root_node_id.as_ref().and_then(|id| self.nodes.get(id))
    }

    /// Children of `node` in order, skipping ids with no node behind them.
    pub fn children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.child_ids.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn into_parts(self) -> (Frame, NodeMap) {
        (self.frame, self.nodes)
    }
}
