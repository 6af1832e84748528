//! The Mermaid bridge.
//!
//! Some storyboard frames carry Mermaid text instead of (or besides) a
//! coordinate IR. An external converter service lays the Mermaid text out and
//! returns a list of elements. The converter is optional: when it is down,
//! slow, or rejects the text, the frame is compiled from its coordinate IR
//! instead, so a [`BridgeError`] is never fatal.
//!
//! The service exposes two operations:
//!
//! - `GET /health`: 200 when the converter is ready.
//! - `POST /convert` with `{"mermaid": "<text>"}`: `{"elements": [...]}`, or a
//!   4xx status for text it cannot convert.

use serde::Deserialize;
use thiserror::Error;

use inkframe_core::{
    geometry::{Point, Size},
    primitive::{Arrowhead, Binding, ConnectorInfo, Draft, PrimitiveKind, Side},
    style::Style,
};

#[cfg(feature = "http-bridge")]
pub use http::HttpBridge;

/// Why a Mermaid conversion did not produce elements.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Mermaid bridge is unavailable: {0}")]
    Unavailable(String),

    #[error("Mermaid bridge timed out")]
    Timeout,

    #[error("Mermaid bridge rejected the diagram ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Mermaid bridge transport error: {0}")]
    Transport(String),

    #[error("Mermaid bridge returned an unreadable response: {0}")]
    Decode(String),
}

/// A converter from Mermaid text to scene elements.
pub trait MermaidBridge: Send + Sync {
    /// Returns true if the converter can take requests.
    fn health(&self) -> bool;

    /// Converts Mermaid text into draft elements.
    fn convert(&self, mermaid: &str) -> Result<Vec<Draft>, BridgeError>;
}

/// A bridge that is never available, forcing the coordinate path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBridge;

impl MermaidBridge for NoBridge {
    fn health(&self) -> bool {
        false
    }

    fn convert(&self, _mermaid: &str) -> Result<Vec<Draft>, BridgeError> {
        Err(BridgeError::Unavailable("no bridge configured".to_string()))
    }
}

/// Body of a successful conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertResponse {
    #[serde(default)]
    pub elements: Vec<BridgedElement>,
}

impl ConvertResponse {
    /// Turns the converted elements into drafts.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if an element has no usable type.
    pub fn into_drafts(self) -> Result<Vec<Draft>, BridgeError> {
        self.elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| element.into_draft(index))
            .collect()
    }
}

/// Text of a label, either inline or wrapped as `{"text": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BridgedLabel {
    Text(String),
    Wrapped { text: String },
}

impl BridgedLabel {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Wrapped { text } => text,
        }
    }
}

/// Reference from a converted arrow to the element it is attached to.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedBinding {
    pub element_id: String,
}

/// One element as the converter emits it.
///
/// Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedElement {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub points: Vec<Point>,
    pub text: Option<String>,
    pub label: Option<BridgedLabel>,
    pub start_binding: Option<BridgedBinding>,
    pub end_binding: Option<BridgedBinding>,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
    #[serde(default)]
    pub elbowed: bool,
    #[serde(flatten)]
    pub style: Style,
}

impl BridgedElement {
    /// Converts this element into a draft; `index` names elements without
    /// an id.
    ///
    /// # Errors
    ///
    /// Returns `Decode` for an element with an empty type.
    pub fn into_draft(self, index: usize) -> Result<Draft, BridgeError> {
        if self.kind.is_empty() {
            return Err(BridgeError::Decode(format!("element #{index} has no type")));
        }
        let kind = match self.kind.parse::<PrimitiveKind>() {
            Ok(kind) => kind,
            Err(never) => match never {},
        };
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("bridged__{index}"));
        let label = self.label.map(BridgedLabel::into_text).or(self.text);
        let origin = Point::new(self.x, self.y);

        let draft = if kind.is_path() {
            let points = if self.points.is_empty() {
                vec![Point::default(), Point::new(self.width, self.height)]
            } else {
                self.points
            };
            let start_side = points
                .windows(2)
                .next()
                .map(|segment| Side::facing(segment[1].sub_point(segment[0])))
                .unwrap_or(Side::Right);
            let end_side = points
                .windows(2)
                .last()
                .map(|segment| Side::facing(segment[1].sub_point(segment[0])).opposite())
                .unwrap_or(Side::Left);
            let connector = ConnectorInfo {
                start_binding: self
                    .start_binding
                    .map(|binding| Binding::new(binding.element_id, start_side)),
                end_binding: self
                    .end_binding
                    .map(|binding| Binding::new(binding.element_id, end_side)),
                start_arrowhead: self.start_arrowhead,
                end_arrowhead: self.end_arrowhead,
                elbowed: self.elbowed,
            };
            Draft::path(id, kind, origin, points).with_connector(connector)
        } else {
            Draft::bounded(id, kind, origin, Size::new(self.width, self.height))
        };

        Ok(draft.with_label(label).with_style(self.style))
    }
}

#[cfg(feature = "http-bridge")]
mod http {
    use log::{debug, warn};
    use reqwest::{StatusCode, blocking::Client};
    use serde::Serialize;

    use inkframe_core::primitive::Draft;

    use super::{BridgeError, ConvertResponse, MermaidBridge};
    use crate::config::BridgeConfig;

    #[derive(Serialize)]
    struct ConvertRequest<'a> {
        mermaid: &'a str,
    }

    /// Bridge to a converter service over HTTP.
    #[derive(Debug, Clone)]
    pub struct HttpBridge {
        client: Client,
        config: BridgeConfig,
    }

    impl HttpBridge {
        /// Creates a bridge to the service described by `config`.
        ///
        /// # Errors
        ///
        /// Returns `Transport` if the HTTP client cannot be built.
        pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
            let client = Client::builder()
                .build()
                .map_err(|err| BridgeError::Transport(err.to_string()))?;
            Ok(Self { client, config })
        }
    }

    impl MermaidBridge for HttpBridge {
        fn health(&self) -> bool {
            let url = format!("{}/health", self.config.url());
            match self
                .client
                .get(&url)
                .timeout(self.config.health_timeout())
                .send()
            {
                Ok(response) => {
                    debug!(url = url.as_str(), status = response.status().as_u16(); "Bridge health check");
                    response.status() == StatusCode::OK
                }
                Err(err) => {
                    warn!(url = url.as_str(), err:% = err; "Bridge health check failed");
                    false
                }
            }
        }

        fn convert(&self, mermaid: &str) -> Result<Vec<Draft>, BridgeError> {
            let url = format!("{}/convert", self.config.url());
            let response = self
                .client
                .post(&url)
                .timeout(self.config.convert_timeout())
                .json(&ConvertRequest { mermaid })
                .send()
                .map_err(request_error)?;

            let status = response.status();
            if status.is_client_error() {
                let message = response.text().unwrap_or_default();
                return Err(BridgeError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            if !status.is_success() {
                return Err(BridgeError::Transport(format!(
                    "unexpected status {status}"
                )));
            }

            let body: ConvertResponse = response
                .json()
                .map_err(|err| BridgeError::Decode(err.to_string()))?;
            debug!(elements = body.elements.len(); "Bridge converted diagram");
            body.into_drafts()
        }
    }

    fn request_error(err: reqwest::Error) -> BridgeError {
        if err.is_timeout() {
            BridgeError::Timeout
        } else if err.is_connect() {
            BridgeError::Unavailable(err.to_string())
        } else {
            BridgeError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkframe_core::style::FillStyle;

    #[test]
    fn test_no_bridge_is_unhealthy() {
        assert!(!NoBridge.health());
        assert!(matches!(
            NoBridge.convert("graph LR; a-->b"),
            Err(BridgeError::Unavailable(_))
        ));
    }

    #[test]
    fn test_decode_converted_elements() {
        let response: ConvertResponse = serde_json::from_str(
            r##"{
                "elements": [
                    {"id": "A", "type": "rectangle", "x": 0, "y": 0, "width": 120, "height": 60,
                     "label": {"text": "Client"}, "backgroundColor": "#a5d8ff", "fillStyle": "solid",
                     "roundness": {"type": 3}},
                    {"id": "B", "type": "text", "x": 10, "y": 10, "width": 40, "height": 25, "text": "hello"},
                    {"type": "arrow", "x": 120, "y": 30, "points": [[0, 0], [80, 0]],
                     "startBinding": {"elementId": "A", "focus": 0}, "endBinding": {"elementId": "C"},
                     "endArrowhead": "arrow", "startArrowhead": null}
                ]
            }"##,
        )
        .unwrap();
        let drafts = response.into_drafts().unwrap();

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].label(), Some("Client"));
        assert_eq!(drafts[0].style().fill_style, Some(FillStyle::Solid));
        assert_eq!(drafts[1].label(), Some("hello"));

        let arrow = &drafts[2];
        assert_eq!(arrow.id(), "bridged__2");
        assert_eq!(arrow.kind(), &PrimitiveKind::Arrow);
        let connector = arrow.connector().unwrap();
        let start = connector.start_binding.as_ref().unwrap();
        let end = connector.end_binding.as_ref().unwrap();
        assert_eq!((start.element_id(), start.side()), ("A", Side::Right));
        assert_eq!((end.element_id(), end.side()), ("C", Side::Left));
        assert_eq!(connector.end_arrowhead, Some(Arrowhead::Arrow));
        assert!(connector.start_arrowhead.is_none());
    }

    #[test]
    fn test_missing_elements_is_empty() {
        let response: ConvertResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_drafts().unwrap().is_empty());
    }

    #[test]
    fn test_empty_type_is_a_decode_error() {
        let response: ConvertResponse =
            serde_json::from_str(r#"{"elements": [{"type": ""}]}"#).unwrap();
        assert!(matches!(
            response.into_drafts(),
            Err(BridgeError::Decode(_))
        ));
    }
}
