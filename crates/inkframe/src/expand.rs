//! The semantic shape expander.
//!
//! # Overview
//!
//! A shape request names a type tag. Tags in the alias table are semantic
//! shapes and expand into a composite of primitives; every other tag passes
//! through as a single primitive of that literal type.
//!
//! | Aliases | Expands to |
//! |---------|------------|
//! | `cylinder`, `database`, `db` | body rectangle, lid ellipse, base arc |
//! | `cloud` | base ellipse plus three overlapping bumps |
//! | `actor`, `person`, `user` | head ellipse, torso, arms, two legs, caption |
//! | `note`, `sticky` | rectangle with a folded top-right corner |
//!
//! The primary sub-element of a composite keeps the request id (and the label,
//! except for actors); decorations get `<id>__<part>` ids. Every sub-element
//! carries the request id as its group id so the composite can be routed and
//! moved as one entity.
//!
//! Expansion is a pure function of the request.

use std::fmt;

use log::debug;

use inkframe_core::{
    color::Color,
    error::{CompileError, ErrorKind},
    geometry::{self, Point, Size},
    ir::ShapeSpec,
    primitive::{Draft, PrimitiveKind, estimate_text_size},
    style::{FillStyle, SceneDefaults, Style},
};

mod actor;
mod cloud;
mod cylinder;
mod note;

/// Size of a bounded primitive whose request gives none.
const DEFAULT_BOX: Size = Size::new(100.0, 50.0);

/// Font size assumed when sizing text whose style gives none.
const DEFAULT_TEXT_FONT_SIZE: f32 = 20.0;

/// Canonical semantic shape types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticKind {
    Cylinder,
    Cloud,
    Actor,
    Note,
}

impl SemanticKind {
    /// Canonicalises a type tag, returning `None` for non-semantic tags.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inkframe::expand::SemanticKind;
    /// assert_eq!(SemanticKind::from_alias("db"), Some(SemanticKind::Cylinder));
    /// assert_eq!(SemanticKind::from_alias("Person"), Some(SemanticKind::Actor));
    /// assert_eq!(SemanticKind::from_alias("rectangle"), None);
    /// ```
    pub fn from_alias(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "cylinder" | "database" | "db" => Some(Self::Cylinder),
            "cloud" => Some(Self::Cloud),
            "actor" | "person" | "user" => Some(Self::Actor),
            "note" | "sticky" => Some(Self::Note),
            _ => None,
        }
    }

    /// Returns the size used when a request omits its width or height.
    pub fn default_size(self) -> Size {
        match self {
            Self::Cylinder => Size::new(120.0, 100.0),
            Self::Cloud => Size::new(180.0, 110.0),
            Self::Actor => Size::new(50.0, 110.0),
            Self::Note => Size::new(160.0, 120.0),
        }
    }

    fn expand(
        self,
        request: &SemanticShapeRequest,
        defaults: &SceneDefaults,
    ) -> Result<Vec<Draft>, CompileError> {
        match self {
            Self::Cylinder => cylinder::expand(request, defaults.background_color()),
            Self::Cloud => cloud::expand(request, defaults.background_color()),
            Self::Actor => actor::expand(request),
            Self::Note => note::expand(request),
        }
    }
}

impl fmt::Display for SemanticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cylinder => "cylinder",
            Self::Cloud => "cloud",
            Self::Actor => "actor",
            Self::Note => "note",
        })
    }
}

/// The type of a shape request after canonicalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeType {
    Semantic(SemanticKind),
    Primitive(PrimitiveKind),
}

impl ShapeType {
    pub fn from_tag(tag: &str) -> Self {
        match SemanticKind::from_alias(tag) {
            Some(kind) => Self::Semantic(kind),
            None => match tag.parse::<PrimitiveKind>() {
                Ok(kind) => Self::Primitive(kind),
                Err(never) => match never {},
            },
        }
    }
}

/// A shape request with identity, position and size decided.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticShapeRequest {
    id: String,
    shape_type: ShapeType,
    top_left: Point,
    size: Size,
    points: Vec<Point>,
    label: Option<String>,
    style: Style,
}

impl SemanticShapeRequest {
    /// Builds a request from a shape spec placed at `position`.
    ///
    /// Omitted sizes fall back to the type's default size; text is sized from
    /// its content, paths from their points.
    ///
    /// # Errors
    ///
    /// - `MalformedGeometry` for non-finite coordinates or negative sizes.
    /// - `MalformedInput` for a text shape without text, or out of range style
    ///   values.
    pub fn new(id: impl Into<String>, spec: &ShapeSpec, position: Point) -> Result<Self, CompileError> {
        let id = id.into();
        let what = format!("shape `{id}`");

        geometry::ensure_finite(&what, &[position.x(), position.y()])?;
        for value in [spec.width, spec.height].into_iter().flatten() {
            geometry::ensure_finite(&what, &[value])?;
        }
        spec.style.validate(&what)?;

        let shape_type = ShapeType::from_tag(spec.kind_tag());
        let label = spec.label().map(str::to_string);

        let mut top_left = position;
        let mut points = Vec::new();
        let default_size = match &shape_type {
            ShapeType::Semantic(kind) => kind.default_size(),
            ShapeType::Primitive(PrimitiveKind::Text) => {
                let text = label.as_deref().ok_or_else(|| {
                    CompileError::new(ErrorKind::MalformedInput, format!("{what} is a text shape without text"))
                })?;
                estimate_text_size(
                    text,
                    spec.style.font_size.unwrap_or(DEFAULT_TEXT_FONT_SIZE),
                )
            }
            ShapeType::Primitive(kind) if kind.is_path() => {
                let raw = spec.points.clone().unwrap_or_else(|| {
                    vec![
                        Point::default(),
                        Point::new(spec.width.unwrap_or(DEFAULT_BOX.width()), spec.height.unwrap_or(0.0)),
                    ]
                });
                for point in &raw {
                    geometry::ensure_finite(&what, &[point.x(), point.y()])?;
                }
                let (origin, normalized) = normalize_path(position, raw);
                top_left = origin;
                points = normalized;
                geometry::Bounds::from_offsets(Point::default(), &points).to_size()
            }
            ShapeType::Primitive(_) => DEFAULT_BOX,
        };

        let size = match &shape_type {
            ShapeType::Primitive(kind) if kind.is_path() => default_size,
            _ => Size::new(
                spec.width.unwrap_or(default_size.width()),
                spec.height.unwrap_or(default_size.height()),
            ),
        };
        geometry::ensure_size(&what, size)?;

        Ok(Self {
            id,
            shape_type,
            top_left,
            size,
            points,
            label,
            style: spec.style.clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape_type(&self) -> &ShapeType {
        &self.shape_type
    }

    /// Returns the top-left corner of the requested box.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Returns the bounded primary element of a composite, which keeps the
    /// request id and label.
    fn primary(&self, kind: PrimitiveKind, top_left: Point, size: Size, style: Style) -> Draft {
        Draft::bounded(self.id.clone(), kind, top_left, size)
            .with_label(self.label.clone())
            .with_group(self.id.clone())
            .with_style(style)
    }

    /// Returns a bounded decoration of a composite.
    fn part(&self, suffix: &str, kind: PrimitiveKind, top_left: Point, size: Size, style: Style) -> Draft {
        Draft::bounded(self.part_id(suffix), kind, top_left, size)
            .with_group(self.id.clone())
            .with_style(style)
    }

    /// Returns a path decoration of a composite.
    fn path_part(&self, suffix: &str, origin: Point, points: Vec<Point>, style: Style) -> Draft {
        Draft::path(self.part_id(suffix), PrimitiveKind::Line, origin, points)
            .with_group(self.id.clone())
            .with_style(style)
    }

    fn part_id(&self, suffix: &str) -> String {
        format!("{}__{suffix}", self.id)
    }

    /// Returns the request style with a background and fill applied unless
    /// the request sets its own.
    fn filled_style(&self, background: &Color, fill: FillStyle) -> Style {
        self.style.clone().with_fill_fallback(background, fill)
    }

    /// Fails with `ExpansionFailure` when either side of the box is zero.
    fn ensure_not_degenerate(&self, kind: SemanticKind) -> Result<(), CompileError> {
        if self.size.is_degenerate() {
            return Err(CompileError::new(
                ErrorKind::ExpansionFailure,
                format!(
                    "{kind} `{}` needs a non-zero box, got {} x {}",
                    self.id,
                    self.size.width(),
                    self.size.height()
                ),
            ));
        }
        Ok(())
    }
}

/// Expands a request into the primitives that draw it.
///
/// Cylinders and clouds without a background of their own take the accent
/// color of `defaults`.
///
/// # Errors
///
/// Returns `ExpansionFailure` when a semantic shape's box is too small for its
/// composite.
pub fn expand(
    request: &SemanticShapeRequest,
    defaults: &SceneDefaults,
) -> Result<Vec<Draft>, CompileError> {
    let parts = match &request.shape_type {
        ShapeType::Semantic(kind) => kind.expand(request, defaults)?,
        ShapeType::Primitive(kind) if kind.is_path() => vec![
            Draft::path(
                request.id.clone(),
                kind.clone(),
                request.top_left,
                request.points.clone(),
            )
            .with_label(request.label.clone())
            .with_style(request.style.clone()),
        ],
        ShapeType::Primitive(kind) => vec![
            Draft::bounded(request.id.clone(), kind.clone(), request.top_left, request.size)
                .with_label(request.label.clone())
                .with_style(request.style.clone()),
        ],
    };
    debug!(id = request.id.as_str(), parts = parts.len(); "Expanded shape");
    Ok(parts)
}

/// Moves a path's origin onto its first vertex so the first offset is (0, 0).
pub(crate) fn normalize_path(origin: Point, points: Vec<Point>) -> (Point, Vec<Point>) {
    let Some(first) = points.first().copied() else {
        return (origin, vec![Point::default()]);
    };
    if first.is_zero() {
        return (origin, points);
    }
    let points = points.into_iter().map(|p| p.sub_point(first)).collect();
    (origin.add_point(first), points)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn spec(json: &str) -> ShapeSpec {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_alias_table() {
        for (tag, kind) in [
            ("cylinder", SemanticKind::Cylinder),
            ("database", SemanticKind::Cylinder),
            ("db", SemanticKind::Cylinder),
            ("cloud", SemanticKind::Cloud),
            ("actor", SemanticKind::Actor),
            ("person", SemanticKind::Actor),
            ("user", SemanticKind::Actor),
            ("note", SemanticKind::Note),
            ("sticky", SemanticKind::Note),
        ] {
            assert_eq!(SemanticKind::from_alias(tag), Some(kind), "{tag}");
        }
        assert_eq!(SemanticKind::from_alias("diamond"), None);
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let request = SemanticShapeRequest::new(
            "h",
            &spec(r#"{"type": "hexagon", "width": 80, "height": 40}"#),
            Point::new(5.0, 6.0),
        )
        .unwrap();
        let parts = expand(&request, &SceneDefaults::default()).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].kind(), &PrimitiveKind::Custom("hexagon".to_string()));
        assert_eq!(parts[0].origin(), Point::new(5.0, 6.0));
        assert!(parts[0].group_id().is_none());
    }

    #[test]
    fn test_primitive_identity_keeps_style_and_label() {
        let request = SemanticShapeRequest::new(
            "d",
            &spec(r##"{"type": "diamond", "label": "ok?", "strokeColor": "#e03131"}"##),
            Point::default(),
        )
        .unwrap();
        let parts = expand(&request, &SceneDefaults::default()).unwrap();

        assert_eq!(parts[0].kind(), &PrimitiveKind::Diamond);
        assert_eq!(parts[0].label(), Some("ok?"));
        assert_eq!(parts[0].size(), DEFAULT_BOX);
        assert_eq!(
            parts[0].style().stroke_color.as_ref().map(Color::as_str),
            Some("#e03131")
        );
    }

    #[test]
    fn test_text_sized_from_content() {
        let request = SemanticShapeRequest::new(
            "t",
            &spec(r#"{"type": "text", "text": "Hello", "fontSize": 10}"#),
            Point::default(),
        )
        .unwrap();

        assert_approx_eq!(f32, request.size().width(), 30.0);
        assert_approx_eq!(f32, request.size().height(), 12.5);
    }

    #[test]
    fn test_text_without_content_is_malformed() {
        let err = SemanticShapeRequest::new("t", &spec(r#"{"type": "text"}"#), Point::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_path_origin_moves_to_first_point() {
        let request = SemanticShapeRequest::new(
            "l",
            &spec(r#"{"type": "line", "points": [[10, 10], [60, 30]]}"#),
            Point::new(100.0, 100.0),
        )
        .unwrap();
        let parts = expand(&request, &SceneDefaults::default()).unwrap();

        assert_eq!(parts[0].origin(), Point::new(110.0, 110.0));
        assert_eq!(parts[0].points(), &[Point::new(0.0, 0.0), Point::new(50.0, 20.0)]);
    }

    #[test]
    fn test_negative_size_is_malformed_geometry() {
        let err = SemanticShapeRequest::new(
            "r",
            &spec(r#"{"width": -5, "height": 10}"#),
            Point::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedGeometry);
    }

    #[test]
    fn test_non_finite_position_is_malformed_geometry() {
        let err = SemanticShapeRequest::new("r", &ShapeSpec::default(), Point::new(f32::NAN, 0.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedGeometry);
    }

    #[test]
    fn test_semantic_default_sizes() {
        let request = SemanticShapeRequest::new(
            "c",
            &spec(r#"{"type": "cloud", "width": 300}"#),
            Point::default(),
        )
        .unwrap();
        assert_eq!(request.size(), Size::new(300.0, 110.0));
    }
}
