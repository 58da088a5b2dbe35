//! Grammar table: keyword spellings, enum value names and property defaults.
//!
//! The parser and the exporter both read from here. Neither side spells a
//! keyword or a default on its own, so a change made here moves both
//! directions at once.

use crate::model::*;

// ─── Document structure ──────────────────────────────────────────────────

pub const DSL_VERSION: u32 = 1;
pub const VERSION_PREFIX: &str = "dsl:";
pub const FRAME_KEYWORD: &str = "frame";
/// Standalone token that opens a properties clause.
pub const PROPS_SEPARATOR: &str = "-";
pub const ID_MARKER: char = '#';
/// Spaces per nesting level in exported text.
pub const INDENT_UNIT: usize = 2;
pub const LINE_COMMENT_PREFIXES: &[&str] = &["#", "//"];

pub const DEFAULT_FRAME_ID: &str = "frame";
pub const GENERATED_ID_PREFIX: &str = "n_";

/// Node and frame ids: letters, digits, `_`, `-`, `.` and `:`.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

/// Whether `value` can be written as a single bare word rather than quoted.
pub fn is_bare_word(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | '(' | ')'))
}

/// Whether a frame name survives the unquoted `frame <words...>` form:
/// single-space separated bare words, none of them the `-` separator.
pub fn is_bare_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .split(' ')
            .all(|word| is_bare_word(word) && word != PROPS_SEPARATOR)
}

/// Characters allowed in a `{token.path}`. Whitespace, braces, commas,
/// parentheses, quotes and backslashes would split or end the value.
pub fn is_token_path_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | ',' | '(' | ')' | '"' | '\\')
}

pub fn is_valid_token_path(path: &str) -> bool {
    !path.is_empty() && path.chars().all(is_token_path_char)
}

// ─── Defaults ────────────────────────────────────────────────────────────

pub const DEFAULT_CANVAS: CanvasSize = CanvasSize {
    width: 375.0,
    height: 812.0,
};
pub const DEFAULT_AXIS_SIZE: AxisSize = AxisSize::Hug;
pub const DEFAULT_POSITION: PositionMode = PositionMode::Relative;
pub const DEFAULT_PADDING: f64 = 0.0;
pub const DEFAULT_MAIN_ALIGN: MainAlign = MainAlign::Start;
pub const DEFAULT_CROSS_ALIGN: CrossAlign = CrossAlign::Start;
pub const DEFAULT_CLIP: bool = false;

pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_VISIBLE: bool = true;
/// `border` only carries a width; the color is always this one.
pub const DEFAULT_STROKE_COLOR: Rgb = Rgb::BLACK;

pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
pub const DEFAULT_TEXT_ALIGN: TextAlign = TextAlign::Left;
pub const DEFAULT_ICON_SET: &str = "material";
pub const DEFAULT_ICON_SIZE: f64 = 24.0;
pub const DEFAULT_IMAGE_FIT: ImageFit = ImageFit::Cover;
pub const DEFAULT_SPACER_FLEX: f64 = 1.0;

/// Degrees; CSS `to bottom`.
pub const DEFAULT_GRADIENT_ANGLE: f64 = 180.0;
pub const ANGLE_SUFFIX: &str = "deg";

/// Position of stop `index` out of `count` when none is written.
pub fn default_stop_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

// ─── Keyword tables ──────────────────────────────────────────────────────

/// A closed set of values spelled by keywords. The first spelling listed for
/// a value is its canonical (exported) form; later ones are input aliases.
pub trait Keyword: Copy + PartialEq + 'static {
    const TABLE: &'static [(&'static str, Self)];

    fn from_keyword(word: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(k, _)| *k == word)
            .map(|(_, v)| *v)
    }

    fn keyword(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, v)| *v == self)
            .map_or("", |(k, _)| *k)
    }
}

/// Node-type keyword at the start of a body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKeyword {
    Container,
    Row,
    Column,
    Text,
    Image,
    Icon,
    Use,
    Spacer,
    Slot,
}

impl Keyword for NodeKeyword {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("container", NodeKeyword::Container),
        ("row", NodeKeyword::Row),
        ("column", NodeKeyword::Column),
        ("col", NodeKeyword::Column),
        ("text", NodeKeyword::Text),
        ("img", NodeKeyword::Image),
        ("image", NodeKeyword::Image),
        ("icon", NodeKeyword::Icon),
        ("use", NodeKeyword::Use),
        ("spacer", NodeKeyword::Spacer),
        ("slot", NodeKeyword::Slot),
    ];
}

impl NodeKeyword {
    /// Keyword the exporter writes for `node`. Container direction is carried
    /// by the keyword choice, never by a property.
    pub fn for_node(node: &Node) -> Self {
        match &node.props {
            NodeProps::Container { .. } => match node.layout.auto_layout.as_ref().map(|a| a.direction) {
                Some(Direction::Horizontal) => NodeKeyword::Row,
                Some(Direction::Vertical) => NodeKeyword::Column,
                None => NodeKeyword::Container,
            },
            NodeProps::Text { .. } => NodeKeyword::Text,
            NodeProps::Image { .. } => NodeKeyword::Image,
            NodeProps::Icon { .. } => NodeKeyword::Icon,
            NodeProps::Instance { .. } => NodeKeyword::Use,
            NodeProps::Spacer { .. } => NodeKeyword::Spacer,
            NodeProps::Slot { .. } => NodeKeyword::Slot,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            NodeKeyword::Row => Some(Direction::Horizontal),
            NodeKeyword::Column => Some(Direction::Vertical),
            _ => None,
        }
    }

    /// Whether the keyword accepts a quoted primary payload.
    pub fn takes_payload(self) -> bool {
        matches!(
            self,
            NodeKeyword::Text
                | NodeKeyword::Image
                | NodeKeyword::Icon
                | NodeKeyword::Use
                | NodeKeyword::Slot
        )
    }

    /// Props with every field at its default and an empty payload.
    pub fn default_props(self) -> NodeProps {
        match self {
            NodeKeyword::Container | NodeKeyword::Row | NodeKeyword::Column => {
                NodeProps::default_container()
            }
            NodeKeyword::Text => NodeProps::Text {
                text: String::new(),
                font_size: DEFAULT_FONT_SIZE,
                font_weight: DEFAULT_FONT_WEIGHT,
                color: None,
                text_align: DEFAULT_TEXT_ALIGN,
                font_family: None,
            },
            NodeKeyword::Image => NodeProps::Image {
                src: String::new(),
                fit: DEFAULT_IMAGE_FIT,
                alt: None,
            },
            NodeKeyword::Icon => NodeProps::Icon {
                icon: String::new(),
                icon_set: DEFAULT_ICON_SET.to_string(),
                size: DEFAULT_ICON_SIZE,
                color: None,
            },
            NodeKeyword::Use => NodeProps::Instance {
                component_id: String::new(),
            },
            NodeKeyword::Spacer => NodeProps::Spacer {
                flex: DEFAULT_SPACER_FLEX,
            },
            NodeKeyword::Slot => NodeProps::Slot {
                slot_name: String::new(),
            },
        }
    }
}

/// Property keyword inside a `- ...` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    Width,
    Height,
    Pos,
    Gap,
    Pad,
    Main,
    Cross,
    Clip,
    Scroll,
    Bg,
    Radius,
    Border,
    Opacity,
    Visible,
    Size,
    Weight,
    Color,
    Align,
    Font,
    Set,
    Fit,
    Alt,
    Flex,
}

impl Keyword for Prop {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("w", Prop::Width),
        ("h", Prop::Height),
        ("pos", Prop::Pos),
        ("gap", Prop::Gap),
        ("pad", Prop::Pad),
        ("padding", Prop::Pad),
        ("main", Prop::Main),
        ("cross", Prop::Cross),
        ("clip", Prop::Clip),
        ("scroll", Prop::Scroll),
        ("bg", Prop::Bg),
        ("r", Prop::Radius),
        ("radius", Prop::Radius),
        ("border", Prop::Border),
        ("opacity", Prop::Opacity),
        ("visible", Prop::Visible),
        ("size", Prop::Size),
        ("weight", Prop::Weight),
        ("color", Prop::Color),
        ("align", Prop::Align),
        ("font", Prop::Font),
        ("set", Prop::Set),
        ("fit", Prop::Fit),
        ("alt", Prop::Alt),
        ("flex", Prop::Flex),
    ];
}

/// Keywords accepted after `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKeyword {
    Absolute,
    Relative,
}

impl Keyword for PositionKeyword {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("abs", PositionKeyword::Absolute),
        ("absolute", PositionKeyword::Absolute),
        ("rel", PositionKeyword::Relative),
        ("relative", PositionKeyword::Relative),
    ];
}

pub const POS_X: &str = "x";
pub const POS_Y: &str = "y";

/// Non-numeric spellings of an axis size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKeyword {
    Fill,
    Hug,
}

impl Keyword for AxisKeyword {
    const TABLE: &'static [(&'static str, Self)] = &[("fill", AxisKeyword::Fill), ("hug", AxisKeyword::Hug)];
}

impl Keyword for bool {
    const TABLE: &'static [(&'static str, Self)] = &[("true", true), ("false", false)];
}

impl Keyword for GradientKind {
    const TABLE: &'static [(&'static str, Self)] =
        &[("linear", GradientKind::Linear), ("radial", GradientKind::Radial)];
}

impl Keyword for MainAlign {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("start", MainAlign::Start),
        ("center", MainAlign::Center),
        ("end", MainAlign::End),
        ("between", MainAlign::SpaceBetween),
        ("space-between", MainAlign::SpaceBetween),
        ("spaceBetween", MainAlign::SpaceBetween),
        ("around", MainAlign::SpaceAround),
        ("space-around", MainAlign::SpaceAround),
        ("spaceAround", MainAlign::SpaceAround),
        ("evenly", MainAlign::SpaceEvenly),
        ("space-evenly", MainAlign::SpaceEvenly),
        ("spaceEvenly", MainAlign::SpaceEvenly),
    ];
}

impl Keyword for CrossAlign {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("start", CrossAlign::Start),
        ("center", CrossAlign::Center),
        ("end", CrossAlign::End),
        ("stretch", CrossAlign::Stretch),
    ];
}

impl Keyword for TextAlign {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("left", TextAlign::Left),
        ("center", TextAlign::Center),
        ("right", TextAlign::Right),
        ("justify", TextAlign::Justify),
    ];
}

impl Keyword for ImageFit {
    const TABLE: &'static [(&'static str, Self)] = &[
        ("cover", ImageFit::Cover),
        ("contain", ImageFit::Contain),
        ("fill", ImageFit::Fill),
        ("none", ImageFit::None),
    ];
}

// ─── Default values of IR types ──────────────────────────────────────────

impl Default for CanvasSize {
    fn default() -> Self {
        DEFAULT_CANVAS
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            id: DEFAULT_FRAME_ID.to_string(),
            name: String::new(),
            canvas_size: CanvasSize::default(),
            root_node_id: None,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_AXIS_SIZE,
            height: DEFAULT_AXIS_SIZE,
        }
    }
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            size: Size::default(),
            position: DEFAULT_POSITION,
            auto_layout: None,
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            corner_radius: None,
            stroke: None,
            opacity: DEFAULT_OPACITY,
            visible: DEFAULT_VISIBLE,
        }
    }
}

impl Default for Sides {
    fn default() -> Self {
        Sides::uniform(NumericValue::Fixed(DEFAULT_PADDING))
    }
}

impl AutoLayout {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            gap: None,
            padding: Sides::default(),
            main_align: DEFAULT_MAIN_ALIGN,
            cross_align: DEFAULT_CROSS_ALIGN,
        }
    }
}

impl Stroke {
    /// Stroke as `border <width>` produces it.
    pub fn with_width(width: f64) -> Self {
        Self {
            color: ColorValue::Hex(DEFAULT_STROKE_COLOR),
            width,
        }
    }
}

impl NodeProps {
    pub fn default_container() -> Self {
        NodeProps::Container {
            clip: DEFAULT_CLIP,
            scroll_direction: None,
        }
    }
}
