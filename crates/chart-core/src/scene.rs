// File: crates/chart-core/src/scene.rs
// Summary: Render-agnostic scene graph: positioned rect/path/text/group primitives with style attributes.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Point, Rect};

/// Fill or stroke paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Color(Color),
    /// Inherit the renderer's foreground color.
    CurrentColor,
    None,
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::Color(c) => write!(f, "{c}"),
            Paint::CurrentColor => f.write_str("currentColor"),
            Paint::None => f.write_str("none"),
        }
    }
}

impl Serialize for Paint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self { Paint::Color(c) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

/// Paint attributes; unset fields inherit from the enclosing group.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_linecap: Option<LineCap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_linejoin: Option<LineJoin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Style {
    pub fn fill(paint: impl Into<Paint>) -> Self {
        Self { fill: Some(paint.into()), ..Self::default() }
    }
    pub fn stroke(paint: impl Into<Paint>) -> Self {
        Self { stroke: Some(paint.into()), ..Self::default() }
    }
    pub fn with_fill_opacity(mut self, o: f64) -> Self {
        self.fill_opacity = Some(o);
        self
    }
    pub fn with_stroke_opacity(mut self, o: f64) -> Self {
        self.stroke_opacity = Some(o);
        self
    }
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Font attributes; unset fields inherit.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<FontStyle>,
}

impl Font {
    pub fn sans_serif(size: f64) -> Self {
        Self { family: Some("sans-serif".into()), size: Some(size), ..Self::default() }
    }
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One step of a path outline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    HorizontalTo { x: f64 },
    VerticalTo { y: f64 },
    Close,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RectMark {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathMark {
    pub commands: Vec<PathCommand>,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

impl PathMark {
    /// Number of `MoveTo` commands, i.e. disconnected pieces.
    pub fn subpath_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, PathCommand::MoveTo { .. })).count()
    }

    /// Vertices of each subpath (`MoveTo`/`LineTo` only).
    pub fn subpaths(&self) -> Vec<Vec<Point>> {
        let mut out: Vec<Vec<Point>> = Vec::new();
        for c in &self.commands {
            match *c {
                PathCommand::MoveTo { x, y } => out.push(vec![Point::new(x, y)]),
                PathCommand::LineTo { x, y } => {
                    if let Some(last) = out.last_mut() {
                        last.push(Point::new(x, y));
                    }
                }
                _ => {}
            }
        }
        out
    }
}

/// Single line of text; `y` is the baseline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextMark {
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<TextAnchor>,
    #[serde(skip_serializing_if = "Font::is_empty")]
    pub font: Font,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

impl TextMark {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self { x, y, text: text.into(), anchor: None, font: Font::default(), style: Style::default() }
    }
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Container translating and optionally clipping its children.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct GroupMark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<Point>,
    /// Clip rectangle in the group's local coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Rect>,
    #[serde(skip_serializing_if = "Font::is_empty")]
    pub font: Font,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    pub children: Vec<Primitive>,
}

impl GroupMark {
    pub fn translated(x: f64, y: f64) -> Self {
        Self { translate: Some(Point::new(x, y)), ..Self::default() }
    }
    pub fn push(&mut self, p: impl Into<Primitive>) {
        self.children.push(p.into());
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Rect(RectMark),
    Path(PathMark),
    Text(TextMark),
    Group(GroupMark),
}

impl From<RectMark> for Primitive {
    fn from(m: RectMark) -> Self { Primitive::Rect(m) }
}
impl From<PathMark> for Primitive {
    fn from(m: PathMark) -> Self { Primitive::Path(m) }
}
impl From<TextMark> for Primitive {
    fn from(m: TextMark) -> Self { Primitive::Text(m) }
}
impl From<GroupMark> for Primitive {
    fn from(m: GroupMark) -> Self { Primitive::Group(m) }
}

/// Output of a chart builder: an ordered list of primitives in a
/// `width` x `height` viewport.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Visible region as `[min_x, min_y, width, height]`.
    pub view_box: [f64; 4],
    #[serde(skip_serializing_if = "Font::is_empty")]
    pub font: Font,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, view_box: [0.0, 0.0, width, height], font: Font::default(), primitives: Vec::new() }
    }

    pub fn push(&mut self, p: impl Into<Primitive>) {
        self.primitives.push(p.into());
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Depth-first walk handing each primitive its accumulated group offset.
    pub fn visit<'a>(&'a self, mut f: impl FnMut(Point, &'a Primitive)) {
        fn walk<'a>(items: &'a [Primitive], at: Point, f: &mut impl FnMut(Point, &'a Primitive)) {
            for p in items {
                f(at, p);
                if let Primitive::Group(g) = p {
                    let t = g.translate.unwrap_or_default();
                    walk(&g.children, Point::new(at.x + t.x, at.y + t.y), f);
                }
            }
        }
        walk(&self.primitives, Point::default(), &mut f);
    }

    /// Every rect with its absolute position, in document order.
    pub fn rects(&self) -> Vec<(Rect, &RectMark)> {
        let mut out = Vec::new();
        self.visit(|at, p| {
            if let Primitive::Rect(r) = p {
                out.push((Rect::from_xywh(at.x + r.x, at.y + r.y, r.width, r.height), r));
            }
        });
        out
    }

    pub fn paths(&self) -> Vec<&PathMark> {
        let mut out = Vec::new();
        self.visit(|_, p| {
            if let Primitive::Path(m) = p {
                out.push(m);
            }
        });
        out
    }

    pub fn texts(&self) -> Vec<&TextMark> {
        let mut out = Vec::new();
        self.visit(|_, p| {
            if let Primitive::Text(t) = p {
                out.push(t);
            }
        });
        out
    }
}
