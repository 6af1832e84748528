//! The frame IR: the sparse, partially specified input of the compiler.
//!
//! # Overview
//!
//! A frame is an ordered list of shape requests followed by an ordered list of
//! connector requests. Shapes name a type (a primitive kind, a semantic alias
//! such as `database`, or any literal type string) or reference a vocabulary
//! entity. Connectors name their endpoints by id instead of coordinates.
//!
//! ```json
//! {
//!   "shapes": [
//!     {"id": "api", "type": "rectangle", "x": 100, "y": 200, "label": "API"},
//!     {"id": "db", "entity": "users_db", "x": 500, "y": 200}
//!   ],
//!   "connectors": [
//!     {"from": "api", "to": "db", "label": "queries"}
//!   ]
//! }
//! ```
//!
//! Field names are camelCase and every style attribute of [`Style`] may
//! appear directly on a shape or connector.

use serde::{Deserialize, Deserializer};

use crate::{geometry::Point, primitive::Arrowhead, style::Style};

/// Type tag used when a shape names no type.
pub const DEFAULT_SHAPE_TYPE: &str = "rectangle";

/// One frame of a storyboard, or a standalone scene.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrameIr {
    pub shapes: Vec<ShapeRequest>,
    pub connectors: Vec<ConnectorRequest>,
}

/// A shape description without identity.
///
/// This is what a vocabulary entry holds, and the inline part of a
/// [`ShapeRequest`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSpec {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub points: Option<Vec<Point>>,
    pub label: Option<String>,
    /// Content of a text shape; an alias for `label`.
    pub text: Option<String>,
    #[serde(flatten)]
    pub style: Style,
}

impl ShapeSpec {
    /// Returns the type tag, falling back to a rectangle.
    pub fn kind_tag(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_SHAPE_TYPE)
    }

    /// Returns the label, or the text content for text shapes.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().or(self.text.as_deref())
    }

    /// Returns true if anything besides the position is set.
    pub fn has_content(&self) -> bool {
        self.kind.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.points.is_some()
            || self.label.is_some()
            || self.text.is_some()
            || self.style != Style::default()
    }
}

/// A shape placed in a frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShapeRequest {
    /// Identifier within the frame; defaults to the entity key.
    pub id: Option<String>,
    /// Vocabulary key this shape instantiates.
    pub entity: Option<String>,
    #[serde(flatten)]
    pub spec: ShapeSpec,
}

impl ShapeRequest {
    /// Returns the effective id: the explicit one, else the entity key.
    pub fn effective_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.entity.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Whether a connector draws as an arrow or a plain line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    #[default]
    Arrow,
    Line,
}

/// A link between two placed shapes, or a freeform path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorRequest {
    pub id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Origin of a freeform path.
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Vertices of a freeform path, as offsets from its origin.
    pub points: Option<Vec<Point>>,
    pub label: Option<String>,
    #[serde(default)]
    pub elbowed: bool,
    /// `None` when absent, `Some(None)` when explicitly `null`.
    #[serde(default, deserialize_with = "explicit_null")]
    pub start_arrowhead: Option<Option<Arrowhead>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub end_arrowhead: Option<Option<Arrowhead>>,
    #[serde(default, rename = "type")]
    pub kind: ConnectorKind,
    #[serde(flatten)]
    pub style: Style,
}

impl ConnectorRequest {
    /// Returns the start and end arrowheads after applying the defaults:
    /// arrows end with an arrowhead, lines carry none.
    pub fn arrowheads(&self) -> (Option<Arrowhead>, Option<Arrowhead>) {
        let default_end = match self.kind {
            ConnectorKind::Arrow => Some(Arrowhead::Arrow),
            ConnectorKind::Line => None,
        };
        (
            self.start_arrowhead.unwrap_or(None),
            self.end_arrowhead.unwrap_or(default_end),
        )
    }
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FillStyle;

    #[test]
    fn test_frame_parses_shapes_and_connectors() {
        let frame: FrameIr = serde_json::from_str(
            r##"{
                "shapes": [
                    {"id": "a", "type": "database", "x": 600, "y": 200, "width": 120,
                     "height": 90, "label": "Users DB", "fillStyle": "solid"},
                    {"id": "b", "entity": "cache"}
                ],
                "connectors": [{"from": "a", "to": "b", "elbowed": true}]
            }"##,
        )
        .unwrap();

        assert_eq!(frame.shapes.len(), 2);
        let db = &frame.shapes[0];
        assert_eq!(db.spec.kind_tag(), "database");
        assert_eq!(db.spec.width, Some(120.0));
        assert_eq!(db.spec.label(), Some("Users DB"));
        assert_eq!(db.spec.style.fill_style, Some(FillStyle::Solid));
        assert!(db.entity.is_none());

        let cache = &frame.shapes[1];
        assert_eq!(cache.effective_id(), Some("cache"));
        assert!(!cache.spec.has_content());

        assert!(frame.connectors[0].elbowed);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let frame: FrameIr = serde_json::from_str("{}").unwrap();
        assert!(frame.shapes.is_empty());
        assert!(frame.connectors.is_empty());
    }

    #[test]
    fn test_text_is_label_alias() {
        let spec: ShapeSpec = serde_json::from_str(r#"{"type": "text", "text": "hello"}"#).unwrap();
        assert_eq!(spec.label(), Some("hello"));
        assert!(spec.has_content());
    }

    #[test]
    fn test_shape_type_defaults_to_rectangle() {
        let spec = ShapeSpec::default();
        assert_eq!(spec.kind_tag(), "rectangle");
    }

    #[test]
    fn test_arrowhead_defaults() {
        let plain: ConnectorRequest = serde_json::from_str(r#"{"from": "a", "to": "b"}"#).unwrap();
        assert_eq!(plain.arrowheads(), (None, Some(Arrowhead::Arrow)));

        let nulled: ConnectorRequest = serde_json::from_str(
            r#"{"from": "a", "to": "b", "endArrowhead": null, "startArrowhead": "dot"}"#,
        )
        .unwrap();
        assert_eq!(nulled.arrowheads(), (Some(Arrowhead::Dot), None));

        let line: ConnectorRequest =
            serde_json::from_str(r#"{"from": "a", "to": "b", "type": "line"}"#).unwrap();
        assert_eq!(line.arrowheads(), (None, None));
    }

    #[test]
    fn test_invalid_style_value_is_rejected() {
        let result: Result<ShapeRequest, _> =
            serde_json::from_str(r#"{"id": "a", "strokeColor": "not-a-color"}"#);
        assert!(result.is_err());
    }
}
