//! Parser for FDL text → `Document`.
//!
//! The format is line-oriented: a `dsl:<N>` header, one `frame` line, then
//! one node per line with nesting given by indentation. Words, quoted
//! strings and property values are lexed with `winnow` 0.7.

use crate::error::ParseError;
use crate::grammar::*;
use crate::id::{IdGen, NodeId};
use crate::model::*;
use crate::transform::prune_unreachable;
use smallvec::SmallVec;
use winnow::combinator::{alt, delimited, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_while};

/// Parse an FDL document string into a `Document`.
///
/// Every call owns its own id generator, so parses on different threads are
/// fully independent.
#[must_use = "parsing result should be used"]
pub fn parse_document(input: &str) -> Result<Document, ParseError> {
    let source = normalize_newlines(input);
    let mut lines = significant_lines(&source);

    let Some(version_line) = lines.next() else {
        return Err(ParseError::Empty);
    };
    parse_version_line(&version_line)?;

    let frame_line = lines.next().ok_or(ParseError::MissingFrame)?;
    let frame = parse_frame_line(&frame_line)?;

    let mut doc = Document::new(frame);
    let mut ids = IdGen::new();
    // Open ancestors, outermost first: (indent, id).
    let mut stack: Vec<(usize, NodeId)> = Vec::new();
    let mut root_indent: Option<usize> = None;
    let mut replaced_any = false;

    for line in lines {
        let node = parse_node_line(&line, &mut ids, &doc.nodes)?;
        let id = node.id.clone();

        match root_indent {
            None => {
                root_indent = Some(line.indent);
                doc.frame.root_node_id = Some(id.clone());
            }
            Some(root) if line.indent <= root => {
                return Err(ParseError::syntax(
                    line.number,
                    format!("`{id}` would be a second root node; a frame has exactly one root"),
                ));
            }
            Some(_) => {
                // Close every open level at or deeper than this line; the
                // remaining top is the parent, however far the dedent went.
                while stack.last().is_some_and(|(level, _)| *level >= line.indent) {
                    stack.pop();
                }
                if doc.nodes.contains_key(&id) {
                    log::warn!("line {}: duplicate node id `{id}`; the later node wins", line.number);
                    replaced_any = true;
                    for other in doc.nodes.values_mut() {
                        other.child_ids.retain(|child| *child != id);
                    }
                }
                // The root sits at the bottom of the stack and is never popped here.
                if let Some((_, parent_id)) = stack.last()
                    && let Some(parent) = doc.nodes.get_mut(parent_id)
                {
                    parent.child_ids.push(id.clone());
                }
            }
        }

        doc.nodes.insert(id.clone(), node);
        stack.push((line.indent, id));
    }

    if replaced_any {
        let dropped = prune_unreachable(&mut doc);
        log::debug!("dropped {dropped} nodes left behind by replaced ids");
    }

    log::debug!(
        "parsed frame `{}` ({:?}): {} nodes",
        doc.frame.id,
        doc.frame.name,
        doc.nodes.len()
    );
    Ok(doc)
}

// ─── Lines ───────────────────────────────────────────────────────────────

/// One non-blank, non-comment line of input.
struct SourceLine<'a> {
    /// 1-based.
    number: usize,
    /// Leading whitespace, in characters.
    indent: usize,
    /// Trimmed on both ends.
    text: &'a str,
}

fn normalize_newlines(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn significant_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source.split('\n').enumerate().filter_map(|(i, raw)| {
        let line = raw.trim_end();
        let text = line.trim_start();
        if text.is_empty() || is_comment(text) {
            return None;
        }
        Some(SourceLine {
            number: i + 1,
            indent: line.chars().count() - text.chars().count(),
            text,
        })
    })
}

fn is_comment(text: &str) -> bool {
    LINE_COMMENT_PREFIXES.iter().any(|p| text.starts_with(p))
}

// ─── Header ──────────────────────────────────────────────────────────────

fn parse_version_line(line: &SourceLine<'_>) -> Result<u32, ParseError> {
    let Some(rest) = line.text.strip_prefix(VERSION_PREFIX) else {
        return Err(ParseError::MissingVersion);
    };
    let version = complete(rest.trim(), parse_uint).ok_or_else(|| ParseError::MalformedVersion {
        line: line.number,
        found: line.text.to_string(),
    })?;
    if version != DSL_VERSION {
        return Err(ParseError::UnsupportedVersion {
            line: line.number,
            version,
        });
    }
    Ok(version)
}

fn parse_frame_line(line: &SourceLine<'_>) -> Result<Frame, ParseError> {
    let malformed = |reason: String| ParseError::MalformedFrame {
        line: line.number,
        reason,
    };

    let tokens = tokenize(line.text).map_err(malformed)?;
    let mut cursor = Cursor::new(line.number, tokens);

    let Some(Token::Word(head)) = cursor.next() else {
        return Err(malformed(format!("expected `{FRAME_KEYWORD}`")));
    };
    let (keyword, id) = split_head(head).map_err(malformed)?;
    if keyword != FRAME_KEYWORD {
        return Err(malformed(format!("expected `{FRAME_KEYWORD}`, found `{keyword}`")));
    }

    let mut frame = Frame {
        id: id.map_or_else(|| DEFAULT_FRAME_ID.to_string(), |id| id.as_str().to_string()),
        ..Frame::default()
    };

    match cursor.peek() {
        Some(Token::Quoted(name)) => {
            if name.is_empty() {
                return Err(malformed("frame name must not be empty".into()));
            }
            frame.name = name.clone();
            cursor.next();
            match cursor.next() {
                None => return Ok(frame),
                Some(Token::Word(PROPS_SEPARATOR)) => {}
                Some(other) => {
                    return Err(malformed(format!("unexpected {} after frame name", other.describe())));
                }
            }
        }
        _ => {
            let mut words = Vec::new();
            loop {
                match cursor.next() {
                    None => {
                        frame.name = words.join(" ");
                        return Ok(frame);
                    }
                    Some(Token::Word(PROPS_SEPARATOR)) => break,
                    Some(Token::Word(word)) => words.push(word),
                    Some(Token::Quoted(_)) => {
                        return Err(malformed("quoted text inside an unquoted frame name".into()));
                    }
                }
            }
            frame.name = words.join(" ");
        }
    }

    // Only the canvas size is meaningful after `-`; anything else is skipped.
    while let Some(token) = cursor.next() {
        let prop = match &token {
            Token::Word(word) => Prop::from_keyword(word),
            Token::Quoted(_) => None,
        };
        match prop {
            Some(Prop::Width) => {
                frame.canvas_size.width = number(&mut cursor, Prop::Width).map_err(frame_reason)?;
            }
            Some(Prop::Height) => {
                frame.canvas_size.height = number(&mut cursor, Prop::Height).map_err(frame_reason)?;
            }
            _ => log::trace!("line {}: ignoring frame token {}", line.number, token.describe()),
        }
    }
    Ok(frame)
}

/// Re-tag a value error raised while reading the frame line.
fn frame_reason(err: ParseError) -> ParseError {
    match err {
        ParseError::Syntax { line, reason } => ParseError::MalformedFrame { line, reason },
        other => other,
    }
}

// ─── Node lines ──────────────────────────────────────────────────────────

fn parse_node_line(line: &SourceLine<'_>, ids: &mut IdGen, nodes: &NodeMap) -> Result<Node, ParseError> {
    let tokens = tokenize(line.text).map_err(|reason| ParseError::syntax(line.number, reason))?;
    let mut cursor = Cursor::new(line.number, tokens);

    let head = match cursor.next() {
        Some(Token::Word(head)) => head,
        Some(other) => {
            return Err(cursor.error(format!("expected a node keyword, found {}", other.describe())));
        }
        None => return Err(cursor.error("expected a node keyword")),
    };
    let (word, explicit_id) = split_head(head).map_err(|reason| cursor.error(reason))?;
    let keyword = NodeKeyword::from_keyword(word).ok_or_else(|| ParseError::UnknownNodeType {
        line: line.number,
        keyword: word.to_string(),
    })?;

    let id = explicit_id.unwrap_or_else(|| ids.next_free(|id| nodes.contains_key(id)));
    let mut node = Node::new(id, keyword.default_props());
    if let Some(direction) = keyword.direction() {
        node.layout.auto_layout = Some(AutoLayout::new(direction));
    }

    if let Some(text) = cursor.next_quoted() {
        match node.props.payload_mut() {
            Some(payload) => *payload = text,
            None => {
                return Err(cursor.error(format!("`{}` does not take a quoted value", keyword.keyword())));
            }
        }
    }

    match cursor.next() {
        None => {}
        Some(Token::Word(PROPS_SEPARATOR)) => parse_properties(&mut cursor, &mut node)?,
        Some(other) => {
            return Err(cursor.error(format!(
                "unexpected {} (properties start after a standalone `{PROPS_SEPARATOR}`)",
                other.describe()
            )));
        }
    }

    log::trace!("line {}: {:?} {}", line.number, node.node_type(), node.id);
    Ok(node)
}

/// Split `keyword#id` into its keyword and optional id.
fn split_head(head: &str) -> Result<(&str, Option<NodeId>), String> {
    match head.split_once(ID_MARKER) {
        None => Ok((head, None)),
        Some((keyword, id)) if is_valid_id(id) => Ok((keyword, Some(NodeId::new(id)))),
        Some((_, id)) => Err(format!("invalid id `{id}`")),
    }
}

fn parse_properties(cursor: &mut Cursor<'_>, node: &mut Node) -> Result<(), ParseError> {
    while let Some(token) = cursor.next() {
        match token {
            Token::Word(word) => match Prop::from_keyword(word) {
                Some(prop) => apply_property(prop, cursor, node)?,
                // Unknown keywords (and their values) are skipped token by token.
                None => log::trace!("line {}: ignoring unknown property `{word}`", cursor.line),
            },
            Token::Quoted(text) => log::trace!("line {}: ignoring stray string {text:?}", cursor.line),
        }
    }
    Ok(())
}

fn apply_property(prop: Prop, cursor: &mut Cursor<'_>, node: &mut Node) -> Result<(), ParseError> {
    let applied = match prop {
        Prop::Width => {
            node.layout.size.width = axis_size(cursor, prop)?;
            true
        }
        Prop::Height => {
            node.layout.size.height = axis_size(cursor, prop)?;
            true
        }
        Prop::Pos => {
            node.layout.position = position(cursor)?;
            true
        }
        Prop::Gap => {
            let gap = numeric(cursor, prop)?;
            if let Some(al) = node.layout.auto_layout.as_mut() {
                al.gap = Some(gap);
            }
            node.layout.auto_layout.is_some()
        }
        Prop::Pad => {
            let edges = edges(cursor, prop)?;
            if let Some(al) = node.layout.auto_layout.as_mut() {
                al.padding = Sides::from_array(edges);
            }
            node.layout.auto_layout.is_some()
        }
        Prop::Main => {
            let align = keyword_value::<MainAlign>(cursor, prop)?;
            if let Some(al) = node.layout.auto_layout.as_mut() {
                al.main_align = align;
            }
            node.layout.auto_layout.is_some()
        }
        Prop::Cross => {
            let align = keyword_value::<CrossAlign>(cursor, prop)?;
            if let Some(al) = node.layout.auto_layout.as_mut() {
                al.cross_align = align;
            }
            node.layout.auto_layout.is_some()
        }
        Prop::Clip => match &mut node.props {
            NodeProps::Container { clip, .. } => {
                *clip = true;
                true
            }
            _ => false,
        },
        Prop::Scroll => {
            let direction = cursor.text(prop)?;
            match &mut node.props {
                NodeProps::Container { scroll_direction, .. } => {
                    *scroll_direction = Some(direction);
                    true
                }
                _ => false,
            }
        }
        Prop::Bg => {
            let word = cursor.word(prop)?;
            let fill = parse_fill(word).map_err(|reason| cursor.error(reason))?;
            node.style.fill = Some(fill);
            true
        }
        Prop::Radius => {
            node.style.corner_radius = Some(Corners::from_array(edges(cursor, prop)?));
            true
        }
        Prop::Border => {
            // Width only; whatever follows is read as the next property.
            node.style.stroke = Some(Stroke::with_width(number(cursor, prop)?));
            true
        }
        Prop::Opacity => {
            node.style.opacity = number(cursor, prop)?;
            true
        }
        Prop::Visible => {
            node.style.visible = keyword_value::<bool>(cursor, prop)?;
            true
        }
        Prop::Size => {
            let value = number(cursor, prop)?;
            match &mut node.props {
                NodeProps::Text { font_size: size, .. } | NodeProps::Icon { size, .. } => {
                    *size = value;
                    true
                }
                _ => false,
            }
        }
        Prop::Weight => {
            let weight = font_weight(cursor)?;
            match &mut node.props {
                NodeProps::Text { font_weight, .. } => {
                    *font_weight = weight;
                    true
                }
                _ => false,
            }
        }
        Prop::Color => {
            let value = color(cursor, prop)?;
            match &mut node.props {
                NodeProps::Text { color, .. } | NodeProps::Icon { color, .. } => {
                    *color = Some(value);
                    true
                }
                _ => false,
            }
        }
        Prop::Align => {
            let align = keyword_value::<TextAlign>(cursor, prop)?;
            match &mut node.props {
                NodeProps::Text { text_align, .. } => {
                    *text_align = align;
                    true
                }
                _ => false,
            }
        }
        Prop::Font => {
            let family = cursor.text(prop)?;
            match &mut node.props {
                NodeProps::Text { font_family, .. } => {
                    *font_family = Some(family);
                    true
                }
                _ => false,
            }
        }
        Prop::Set => {
            let set = cursor.text(prop)?;
            match &mut node.props {
                NodeProps::Icon { icon_set, .. } => {
                    *icon_set = set;
                    true
                }
                _ => false,
            }
        }
        Prop::Fit => {
            let value = keyword_value::<ImageFit>(cursor, prop)?;
            match &mut node.props {
                NodeProps::Image { fit, .. } => {
                    *fit = value;
                    true
                }
                _ => false,
            }
        }
        Prop::Alt => {
            let text = cursor.text(prop)?;
            match &mut node.props {
                NodeProps::Image { alt, .. } => {
                    *alt = Some(text);
                    true
                }
                _ => false,
            }
        }
        Prop::Flex => {
            let value = number(cursor, prop)?;
            match &mut node.props {
                NodeProps::Spacer { flex } => {
                    *flex = value;
                    true
                }
                _ => false,
            }
        }
    };

    if !applied {
        log::trace!(
            "line {}: `{}` does not apply to {:?} `{}`; ignored",
            cursor.line,
            prop.keyword(),
            node.node_type(),
            node.id
        );
    }
    Ok(())
}

// ─── Property values ─────────────────────────────────────────────────────

fn number(cursor: &mut Cursor<'_>, prop: Prop) -> Result<f64, ParseError> {
    let word = cursor.word(prop)?;
    complete(word, parse_number)
        .ok_or_else(|| cursor.error(format!("`{}` expects a number, found `{word}`", prop.keyword())))
}

fn numeric(cursor: &mut Cursor<'_>, prop: Prop) -> Result<NumericValue, ParseError> {
    let word = cursor.word(prop)?;
    complete(word, numeric_value).ok_or_else(|| {
        cursor.error(format!(
            "`{}` expects a number or token reference, found `{word}`",
            prop.keyword()
        ))
    })
}

fn color(cursor: &mut Cursor<'_>, prop: Prop) -> Result<ColorValue, ParseError> {
    let word = cursor.word(prop)?;
    complete(word, color_value)
        .ok_or_else(|| cursor.error(format!("`{}` expects a color, found `{word}`", prop.keyword())))
}

fn keyword_value<K: Keyword>(cursor: &mut Cursor<'_>, prop: Prop) -> Result<K, ParseError> {
    let word = cursor.word(prop)?;
    K::from_keyword(word).ok_or_else(|| cursor.error(format!("unknown `{}` value `{word}`", prop.keyword())))
}

fn axis_size(cursor: &mut Cursor<'_>, prop: Prop) -> Result<AxisSize, ParseError> {
    let word = cursor.word(prop)?;
    if let Some(keyword) = AxisKeyword::from_keyword(word) {
        return Ok(match keyword {
            AxisKeyword::Fill => AxisSize::Fill,
            AxisKeyword::Hug => AxisSize::Hug,
        });
    }
    complete(word, parse_number).map(AxisSize::Fixed).ok_or_else(|| {
        cursor.error(format!(
            "`{}` expects a number, `fill` or `hug`, found `{word}`",
            prop.keyword()
        ))
    })
}

fn position(cursor: &mut Cursor<'_>) -> Result<PositionMode, ParseError> {
    match keyword_value::<PositionKeyword>(cursor, Prop::Pos)? {
        PositionKeyword::Relative => Ok(PositionMode::Relative),
        PositionKeyword::Absolute => {
            let x = labelled_coordinate(cursor, POS_X)?;
            let y = labelled_coordinate(cursor, POS_Y)?;
            Ok(PositionMode::Absolute { x, y })
        }
    }
}

/// `x <n>` or `y <n>` inside `pos abs ...`.
fn labelled_coordinate(cursor: &mut Cursor<'_>, label: &str) -> Result<f64, ParseError> {
    match cursor.word(Prop::Pos)? {
        word if word == label => number(cursor, Prop::Pos),
        word => Err(cursor.error(format!("`pos abs` expects `{label}`, found `{word}`"))),
    }
}

fn font_weight(cursor: &mut Cursor<'_>) -> Result<u16, ParseError> {
    let word = cursor.word(Prop::Weight)?;
    complete(word, parse_uint)
        .and_then(|w| u16::try_from(w).ok())
        .ok_or_else(|| cursor.error(format!("`weight` expects a whole number, found `{word}`")))
}

/// One, two or four edge values (`8`, `8,16`, `1,2,3,4`).
fn edges(cursor: &mut Cursor<'_>, prop: Prop) -> Result<[NumericValue; 4], ParseError> {
    let parts = cursor.list(prop)?;
    let values = parts
        .into_iter()
        .map(|part| {
            complete(part, numeric_value).ok_or_else(|| {
                cursor.error(format!(
                    "`{}` expects numbers or token references, found `{part}`",
                    prop.keyword()
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let count = values.len();
    expand_edges(values).ok_or_else(|| {
        cursor.error(format!(
            "`{}` takes 1, 2 or 4 values, found {count}",
            prop.keyword()
        ))
    })
}

fn parse_fill(word: &str) -> Result<Fill, String> {
    if let Some(rgb) = complete(word, parse_hex_color) {
        return Ok(Fill::Solid(ColorValue::Hex(rgb)));
    }
    if let Some(path) = complete(word, parse_token_ref) {
        return Ok(Fill::TokenFill(path));
    }
    if let Some((kind, args)) = complete(word, parse_gradient_call) {
        return gradient(kind, args).map(Fill::Gradient);
    }
    Err(format!("`bg` expects a color, token or gradient, found `{word}`"))
}

/// Build a gradient from the comma-separated arguments inside its parentheses.
fn gradient(kind: GradientKind, args: &str) -> Result<Gradient, String> {
    let mut parts: Vec<&str> = args.split(',').map(str::trim).collect();

    let mut angle = None;
    if kind == GradientKind::Linear {
        if let Some(first) = parts.first()
            && let Some(a) = parse_angle(first)
        {
            angle = Some(a);
            parts.remove(0);
        }
        angle.get_or_insert(NumericValue::Fixed(DEFAULT_GRADIENT_ANGLE));
    }

    if parts.is_empty() {
        return Err("gradient needs at least one color stop".into());
    }
    let count = parts.len();
    let stops = parts
        .iter()
        .enumerate()
        .map(|(index, part)| gradient_stop(part, index, count))
        .collect::<Result<SmallVec<[GradientStop; 4]>, _>>()?;

    Ok(Gradient { kind, angle, stops })
}

/// `<color>` or `<color> <position>`.
fn gradient_stop(part: &str, index: usize, count: usize) -> Result<GradientStop, String> {
    let mut pieces = part.split_whitespace();
    let Some(color_word) = pieces.next() else {
        return Err("empty gradient stop".into());
    };
    let color = complete(color_word, color_value)
        .ok_or_else(|| format!("gradient stop expects a color, found `{color_word}`"))?;
    let position = match pieces.next() {
        Some(word) => complete(word, parse_number)
            .ok_or_else(|| format!("gradient stop position must be a number, found `{word}`"))?,
        None => default_stop_position(index, count),
    };
    if let Some(extra) = pieces.next() {
        return Err(format!("unexpected `{extra}` in gradient stop"));
    }
    Ok(GradientStop { color, position })
}

/// `90`, `90deg` or `{angle.path}deg`.
fn parse_angle(arg: &str) -> Option<NumericValue> {
    let (body, suffixed) = match arg.strip_suffix(ANGLE_SUFFIX) {
        Some(body) => (body, true),
        None => (arg, false),
    };
    if let Some(n) = complete(body, parse_number) {
        return Some(NumericValue::Fixed(n));
    }
    if suffixed {
        complete(body, parse_token_ref).map(NumericValue::TokenRef)
    } else {
        None
    }
}

// ─── Tokens ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    /// Unescaped contents of a `"..."` string.
    Quoted(String),
}

impl Token<'_> {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("`{w}`"),
            Token::Quoted(s) => format!("quoted string {s:?}"),
        }
    }
}

/// Split a trimmed line into words and quoted strings. Parenthesized groups
/// stay in one word, so `linear(90, #F00, #00F)` is a single token.
fn tokenize(text: &str) -> Result<Vec<Token<'_>>, String> {
    let mut rest = text;
    let mut tokens = Vec::new();
    loop {
        skip_space(&mut rest);
        if rest.is_empty() {
            return Ok(tokens);
        }
        if rest.starts_with('"') {
            let quoted = parse_quoted_string
                .parse_next(&mut rest)
                .map_err(|_| "unterminated quoted string".to_string())?;
            tokens.push(Token::Quoted(quoted));
        } else {
            tokens.push(Token::Word(bare_word(&mut rest)?));
        }
    }
}

/// A run of non-whitespace, except that whitespace inside `( )` is kept.
fn bare_word<'a>(input: &mut &'a str) -> Result<&'a str, String> {
    let mut depth = 0usize;
    let mut end = input.len();
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(format!("unclosed `(` in `{}`", input.trim_end()));
    }
    let (word, rest) = input.split_at(end);
    *input = rest;
    Ok(word)
}

/// Tokens of one line with a read position.
struct Cursor<'a> {
    line: usize,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: usize, tokens: Vec<Token<'a>>) -> Self {
        Self { line, tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn next_quoted(&mut self) -> Option<String> {
        match self.tokens.get(self.pos) {
            Some(Token::Quoted(text)) => {
                self.pos += 1;
                Some(text.clone())
            }
            _ => None,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::syntax(self.line, reason)
    }

    /// The bare word that is the value of `prop`.
    fn word(&mut self, prop: Prop) -> Result<&'a str, ParseError> {
        match self.next() {
            Some(Token::Word(word)) => Ok(word),
            Some(other) => Err(self.error(format!(
                "`{}` expects a bare value, found {}",
                prop.keyword(),
                other.describe()
            ))),
            None => Err(self.error(format!("`{}` is missing its value", prop.keyword()))),
        }
    }

    /// A bare word or a quoted string.
    fn text(&mut self, prop: Prop) -> Result<String, ParseError> {
        match self.next() {
            Some(Token::Word(word)) => Ok(word.to_string()),
            Some(Token::Quoted(text)) => Ok(text),
            None => Err(self.error(format!("`{}` is missing its value", prop.keyword()))),
        }
    }

    /// Comma-separated values; `8, 16` spans two tokens.
    fn list(&mut self, prop: Prop) -> Result<Vec<&'a str>, ParseError> {
        let mut parts = Vec::new();
        loop {
            let word = self.word(prop)?;
            parts.extend(word.split(',').filter(|p| !p.is_empty()));
            let continues = word.ends_with(',')
                || matches!(self.peek(), Some(Token::Word(next)) if next.starts_with(','));
            if !continues {
                return Ok(parts);
            }
        }
    }
}

// ─── Low-level parsers ───────────────────────────────────────────────────

/// Run `parser` over all of `text`; `None` unless it consumes everything.
fn complete<'a, O>(text: &'a str, mut parser: impl FnMut(&mut &'a str) -> ModalResult<O>) -> Option<O> {
    let mut input = text;
    let out = parser(&mut input).ok()?;
    input.is_empty().then_some(out)
}

fn skip_space(input: &mut &str) {
    let _ = take_while::<_, _, ContextError>(0.., |c: char| c.is_whitespace()).parse_next(input);
}

fn digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn parse_uint(input: &mut &str) -> ModalResult<u32> {
    let text = digits(input)?;
    text.parse::<u32>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

/// `-?\d+(\.\d*)?`
fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if let Some(rest) = input.strip_prefix('-') {
        *input = rest;
    }
    digits(input)?;
    if let Some(rest) = input.strip_prefix('.') {
        *input = rest;
        let _ = take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

fn hex_digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1..=6, |c: char| c.is_ascii_hexdigit()).parse_next(input)
}

/// `#RGB` or `#RRGGBB`.
fn parse_hex_color(input: &mut &str) -> ModalResult<Rgb> {
    let hex = preceded(ID_MARKER, hex_digits).parse_next(input)?;
    Rgb::from_hex(hex).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))
}

fn token_path<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_token_path_char).parse_next(input)
}

/// `{color.primary}` → `color.primary`.
fn parse_token_ref(input: &mut &str) -> ModalResult<String> {
    delimited('{', token_path, '}')
        .map(|path: &str| path.to_string())
        .parse_next(input)
}

fn color_value(input: &mut &str) -> ModalResult<ColorValue> {
    alt((
        parse_hex_color.map(ColorValue::Hex),
        parse_token_ref.map(ColorValue::TokenRef),
    ))
    .parse_next(input)
}

fn numeric_value(input: &mut &str) -> ModalResult<NumericValue> {
    alt((
        parse_number.map(NumericValue::Fixed),
        parse_token_ref.map(NumericValue::TokenRef),
    ))
    .parse_next(input)
}

fn gradient_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)
}

fn paren_args<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited('(', take_till(0.., ')'), ')').parse_next(input)
}

/// `linear(...)` / `radial(...)` → kind and the raw argument text.
fn parse_gradient_call<'a>(input: &mut &'a str) -> ModalResult<(GradientKind, &'a str)> {
    let name = gradient_name(input)?;
    let kind = GradientKind::from_keyword(name).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
    let args = paren_args(input)?;
    Ok((kind, args))
}

fn quoted_chunk<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(0.., ['"', '\\']).parse_next(input)
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

/// Body of a quoted string after the opening quote, up to and including the
/// closing one. Understands `\"`, `\\`, `\n`, `\r` and `\t`.
fn quoted_body(input: &mut &str) -> ModalResult<String> {
    let mut out = String::new();
    loop {
        out.push_str(quoted_chunk(input)?);
        if next_char(input)? == '"' {
            return Ok(out);
        }
        match next_char(input)? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            other => out.push(other),
        }
    }
}

fn parse_quoted_string(input: &mut &str) -> ModalResult<String> {
    preceded('"', quoted_body).parse_next(input)
}
