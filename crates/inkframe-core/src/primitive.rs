//! Primitive drawable elements.
//!
//! A [`Primitive`] is the atomic unit of a compiled scene: a bounded shape
//! (rectangle, ellipse, diamond, text) positioned by its top-left corner, or a
//! path (line, arrow, freehand stroke) positioned by its origin with vertices
//! given as offsets from that origin.
//!
//! Primitives are generic over their style so the type tells whether defaults
//! have been applied:
//!
//! - [`Draft`] carries a [`Style`] whose attributes may be unset.
//! - [`Element`] carries a [`ResolvedStyle`]; only
//!   [`apply_defaults`](crate::defaults::apply_defaults) builds one.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::CompileError,
    geometry::{self, Bounds, Point, Size},
    style::{ResolvedStyle, Style},
};

/// Width of one character relative to the font size, used to size text.
const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Line height relative to the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.25;

/// The drawable type of a primitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum PrimitiveKind {
    Rectangle,
    Ellipse,
    Diamond,
    Line,
    /// A line carrying arrowheads and endpoint bindings; emitted for connectors.
    Arrow,
    Freehand,
    Text,
    /// Any other literal type, passed through verbatim and treated as a
    /// bounded shape.
    Custom(String),
}

impl PrimitiveKind {
    /// Returns the type tag of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Freehand => "freehand",
            Self::Text => "text",
            Self::Custom(tag) => tag,
        }
    }

    /// Returns true for kinds positioned by an origin plus point offsets.
    pub fn is_path(&self) -> bool {
        matches!(self, Self::Line | Self::Arrow | Self::Freehand)
    }
}

impl FromStr for PrimitiveKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "rectangle" => Self::Rectangle,
            "ellipse" => Self::Ellipse,
            "diamond" => Self::Diamond,
            "line" => Self::Line,
            "arrow" => Self::Arrow,
            "freehand" | "freedraw" => Self::Freehand,
            "text" => Self::Text,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PrimitiveKind> for String {
    fn from(kind: PrimitiveKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Marker drawn at one end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Arrow,
    Bar,
    Dot,
    Triangle,
}

/// A side of a bounded element where a connector attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Returns the side facing this one across a gap.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Returns the side a path leaves through when heading along `direction`.
    ///
    /// Horizontal wins ties.
    pub fn facing(direction: Point) -> Self {
        let distance = direction.abs();
        if distance.x() >= distance.y() {
            if direction.x() >= 0.0 { Self::Right } else { Self::Left }
        } else if direction.y() >= 0.0 {
            Self::Bottom
        } else {
            Self::Top
        }
    }

    /// Returns true for the left and right sides.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Returns the attachment point as a fraction of the element's box.
    pub fn fixed_point(self) -> Point {
        match self {
            Self::Top => Point::new(0.5, 0.0),
            Self::Right => Point::new(1.0, 0.5),
            Self::Bottom => Point::new(0.5, 1.0),
            Self::Left => Point::new(0.0, 0.5),
        }
    }

    /// Returns the midpoint of this side of `bounds`.
    pub fn anchor_on(self, bounds: Bounds) -> Point {
        let center = bounds.center();
        match self {
            Self::Top => Point::new(center.x(), bounds.min_y()),
            Self::Right => Point::new(bounds.max_x(), center.y()),
            Self::Bottom => Point::new(center.x(), bounds.max_y()),
            Self::Left => Point::new(bounds.min_x(), center.y()),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        })
    }
}

/// Attachment of a connector end to a placed element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    element_id: String,
    side: Side,
    fixed_point: Point,
}

impl Binding {
    pub fn new(element_id: impl Into<String>, side: Side) -> Self {
        Self {
            element_id: element_id.into(),
            side,
            fixed_point: side.fixed_point(),
        }
    }

    /// Returns the id of the element this end is attached to.
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Returns the side of the element this end is attached to.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns a copy of this binding pointing at a renamed element.
    pub fn with_element_id(&self, element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            ..self.clone()
        }
    }
}

/// Connector-specific attributes of an arrow or line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorInfo {
    pub start_binding: Option<Binding>,
    pub end_binding: Option<Binding>,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
    pub elbowed: bool,
}

/// An atomic drawable with geometry and style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive<S> {
    id: String,
    #[serde(rename = "type")]
    kind: PrimitiveKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    points: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,
    #[serde(flatten)]
    connector: Option<ConnectorInfo>,
    #[serde(flatten)]
    style: S,
}

/// A primitive whose style attributes may still be unset.
pub type Draft = Primitive<Style>;

/// A primitive with every style attribute resolved.
pub type Element = Primitive<ResolvedStyle>;

impl<S> Primitive<S> {
    /// Returns the identifier, unique within a scene.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    /// Returns the top-left corner (bounded kinds) or the path origin.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the stored size; for paths this is the extent of the points.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the path vertices as offsets from the origin.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the id of the semantic composite this primitive belongs to.
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn connector(&self) -> Option<&ConnectorInfo> {
        self.connector.as_ref()
    }

    pub fn style(&self) -> &S {
        &self.style
    }

    /// Returns the bounding box of this primitive.
    ///
    /// Bounded kinds return the stored box; paths return the extent of
    /// `origin + points`.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedGeometry` error when any coordinate is not finite.
    pub fn bounds(&self) -> Result<Bounds, CompileError> {
        let what = format!("primitive `{}`", self.id);
        geometry::ensure_finite(&what, &[self.x, self.y])?;
        if self.kind.is_path() {
            for point in &self.points {
                geometry::ensure_finite(&what, &[point.x(), point.y()])?;
            }
            Ok(Bounds::from_offsets(self.origin(), &self.points))
        } else {
            geometry::ensure_size(&what, self.size())?;
            Ok(Bounds::new_from_top_left(self.origin(), self.size()))
        }
    }

    /// Sets the label (builder style).
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Marks this primitive as part of a semantic composite (builder style).
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Attaches connector attributes (builder style).
    pub fn with_connector(mut self, connector: ConnectorInfo) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Replaces the origin and vertices of a path (builder style); the size
    /// follows the new extent.
    pub fn with_path(mut self, origin: Point, points: Vec<Point>) -> Self {
        let extent = Bounds::from_offsets(Point::default(), &points).to_size();
        self.x = origin.x();
        self.y = origin.y();
        self.width = extent.width();
        self.height = extent.height();
        self.points = points;
        self
    }

    /// Replaces the style, keeping everything else.
    pub fn map_style<T>(self, f: impl FnOnce(S) -> T) -> Primitive<T> {
        Primitive {
            id: self.id,
            kind: self.kind,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            points: self.points,
            label: self.label,
            group_id: self.group_id,
            connector: self.connector,
            style: f(self.style),
        }
    }

    /// Moves the primitive by `offset`; path offsets are relative and stay put.
    pub fn translate(&mut self, offset: Point) {
        self.x += offset.x();
        self.y += offset.y();
    }

    /// Prefixes this primitive's id and group id.
    ///
    /// Bindings are prefixed only when `is_local` accepts the id they point
    /// at, so references to elements outside the scene are left alone.
    pub fn prefix_ids(&mut self, prefix: &str, is_local: impl Fn(&str) -> bool) {
        self.id = format!("{prefix}{}", self.id);
        if let Some(group_id) = &self.group_id {
            self.group_id = Some(format!("{prefix}{group_id}"));
        }
        if let Some(connector) = &mut self.connector {
            for binding in [&mut connector.start_binding, &mut connector.end_binding]
                .into_iter()
                .flatten()
                .filter(|binding| is_local(binding.element_id()))
            {
                *binding = binding.with_element_id(format!("{prefix}{}", binding.element_id()));
            }
        }
    }
}

impl Primitive<Style> {
    /// Creates a bounded primitive positioned by its top-left corner.
    pub fn bounded(id: impl Into<String>, kind: PrimitiveKind, top_left: Point, size: Size) -> Self {
        Self {
            id: id.into(),
            kind,
            x: top_left.x(),
            y: top_left.y(),
            width: size.width(),
            height: size.height(),
            points: Vec::new(),
            label: None,
            group_id: None,
            connector: None,
            style: Style::default(),
        }
    }

    /// Creates a path primitive; its size is the extent of `points`.
    pub fn path(id: impl Into<String>, kind: PrimitiveKind, origin: Point, points: Vec<Point>) -> Self {
        let extent = Bounds::from_offsets(Point::default(), &points).to_size();
        Self {
            id: id.into(),
            kind,
            x: origin.x(),
            y: origin.y(),
            width: extent.width(),
            height: extent.height(),
            points,
            label: None,
            group_id: None,
            connector: None,
            style: Style::default(),
        }
    }

    /// Sets the style (builder style).
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Primitive<ResolvedStyle> {
    /// Turns a resolved element back into a draft with every attribute set.
    pub fn into_draft(self) -> Draft {
        self.map_style(Style::from)
    }
}

/// Estimates the box needed to render `text` at `font_size`.
///
/// # Examples
///
/// ```
/// # use inkframe_core::primitive::estimate_text_size;
/// let size = estimate_text_size("Users DB", 20.0);
/// assert_eq!(size.width(), 96.0);
/// assert_eq!(size.height(), 25.0);
/// ```
pub fn estimate_text_size(text: &str, font_size: f32) -> Size {
    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    Size::new(
        longest as f32 * font_size * CHAR_WIDTH_FACTOR,
        lines.len() as f32 * font_size * LINE_HEIGHT_FACTOR,
    )
}
