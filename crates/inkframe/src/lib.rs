//! inkframe - compiles sparse diagram IR into fully specified scenes.
//!
//! A caller describes a frame with a handful of shapes and connectors, using
//! semantic shape types (`database`, `cloud`, `actor`, `note`) and leaving
//! most visual attributes unset. The compiler expands semantic shapes into
//! primitive groups, routes connectors between them, fills in every style
//! attribute and returns a flat list of renderable primitives.
//!
//! Storyboards compile several frames against one shared entity vocabulary,
//! in parallel, and lay them out side by side.

pub mod bridge;
pub mod compile;
pub mod config;
pub mod expand;
pub mod export;
pub mod route;
pub mod storyboard;
pub mod vocabulary;

mod error;

pub use inkframe_core::{color, defaults, geometry, ir, primitive, style};

pub use compile::{Scene, SceneCompiler};
pub use error::InkframeError;

use std::sync::Arc;

use log::{debug, info, trace};

use bridge::{MermaidBridge, NoBridge};
use config::AppConfig;
use ir::FrameIr;
use storyboard::{Storyboard, StoryboardCompiler};
use vocabulary::Vocabulary;

/// A decoded compiler input.
#[derive(Debug, Clone)]
pub enum Input {
    /// A single frame: `{"shapes": [...], "connectors": [...]}`.
    Frame(FrameIr),
    /// Several frames sharing a vocabulary: `{"vocabulary": {...}, "frames": [...]}`.
    Storyboard(Storyboard),
}

/// Builder for compiling frames and storyboards.
///
/// # Examples
///
/// ```rust
/// use inkframe::{SceneBuilder, config::AppConfig};
///
/// let input = r#"{
///     "shapes": [
///         {"id": "api", "type": "rectangle", "x": 0, "y": 0, "width": 160, "height": 80},
///         {"id": "db", "type": "database", "x": 400, "y": 0, "width": 120, "height": 90}
///     ],
///     "connectors": [{"from": "api", "to": "db"}]
/// }"#;
///
/// let builder = SceneBuilder::new(AppConfig::default());
/// let scene = builder.compile_json(input).expect("Failed to compile");
/// assert_eq!(scene.connectors().len(), 1);
///
/// let json = builder.to_json(&scene).expect("Failed to serialise");
/// assert!(json.starts_with('['));
/// ```
pub struct SceneBuilder {
    config: AppConfig,
    bridge: Arc<dyn MermaidBridge>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SceneBuilder {
    /// Creates a builder that never contacts the Mermaid bridge.
    ///
    /// # Arguments
    ///
    /// * `config` - Style, routing, storyboard and bridge settings
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            bridge: Arc::new(NoBridge),
        }
    }

    /// Routes storyboard frames with Mermaid text through `bridge` (builder
    /// style).
    pub fn with_bridge(mut self, bridge: impl MermaidBridge + 'static) -> Self {
        self.bridge = Arc::new(bridge);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Decodes a frame or storyboard.
    ///
    /// An object with a `frames` member is a storyboard; anything else is a
    /// single frame.
    ///
    /// # Errors
    ///
    /// Returns `InkframeError::Json` for input that is not valid JSON or does
    /// not match either shape.
    pub fn parse(&self, json: &str) -> Result<Input, InkframeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let input = if value.get("frames").is_some() {
            Input::Storyboard(serde_json::from_value(value)?)
        } else {
            Input::Frame(serde_json::from_value(value)?)
        };
        trace!(input:?; "Decoded input");
        Ok(input)
    }

    /// Decodes and compiles a frame or storyboard.
    ///
    /// # Errors
    ///
    /// Returns `InkframeError::Json` for undecodable input,
    /// `InkframeError::Config` for an invalid configuration and
    /// `InkframeError::Compile` when the input does not compile.
    pub fn compile_json(&self, json: &str) -> Result<Scene, InkframeError> {
        match self.parse(json)? {
            Input::Frame(frame) => self.compile_frame(&frame, &Vocabulary::empty()),
            Input::Storyboard(storyboard) => self.compile_storyboard(&storyboard),
        }
    }

    /// Compiles one frame against `vocabulary`.
    ///
    /// # Errors
    ///
    /// Returns `InkframeError::Config` for an invalid configuration and
    /// `InkframeError::Compile` when the frame does not compile.
    pub fn compile_frame(&self, frame: &FrameIr, vocabulary: &Vocabulary) -> Result<Scene, InkframeError> {
        debug!(entities = vocabulary.len(); "Compiling single frame");
        Ok(self.scene_compiler()?.compile(frame, vocabulary)?)
    }

    /// Compiles every frame of a storyboard and combines them into one scene.
    ///
    /// # Errors
    ///
    /// Returns `InkframeError::Config` for an invalid configuration and
    /// `InkframeError::Compile` with the failing frame's index in the detail.
    pub fn compile_storyboard(&self, storyboard: &Storyboard) -> Result<Scene, InkframeError> {
        let compiler = StoryboardCompiler::new(self.scene_compiler()?, *self.config.storyboard())
            .with_bridge(Arc::clone(&self.bridge));
        let scene = compiler.compile(storyboard)?;
        info!(frames = storyboard.frames().len(), elements = scene.len(); "Storyboard compiled");
        Ok(scene)
    }

    /// Renders an SVG preview of a compiled scene.
    pub fn render_svg(&self, scene: &Scene) -> String {
        export::svg::render(scene)
    }

    /// Serialises a compiled scene as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns `InkframeError::Json` if serialisation fails.
    pub fn to_json(&self, scene: &Scene) -> Result<String, InkframeError> {
        Ok(serde_json::to_string_pretty(scene)?)
    }

    fn scene_compiler(&self) -> Result<SceneCompiler, InkframeError> {
        self.config.validate().map_err(InkframeError::Config)?;
        let defaults = self
            .config
            .style()
            .scene_defaults()
            .map_err(InkframeError::Config)?;
        Ok(SceneCompiler::new(defaults, self.config.routing()))
    }
}

#[cfg(test)]
mod tests {
    use inkframe_core::error::ErrorKind;

    use super::*;
    use crate::config::StyleConfig;

    #[test]
    fn test_parse_detects_storyboards() {
        let builder = SceneBuilder::default();

        assert!(matches!(
            builder.parse(r#"{"shapes": []}"#).unwrap(),
            Input::Frame(_)
        ));
        assert!(matches!(
            builder.parse(r#"{"frames": []}"#).unwrap(),
            Input::Storyboard(_)
        ));
        assert!(matches!(
            builder.parse("[1, 2]"),
            Err(InkframeError::Json(_))
        ));
    }

    #[test]
    fn test_compile_error_is_structured() {
        let err = SceneBuilder::default()
            .compile_json(r#"{"shapes": [{"id": "a"}], "connectors": [{"from": "a", "to": "z"}]}"#)
            .unwrap_err();

        let compile = err.as_compile_error().unwrap();
        assert_eq!(compile.kind(), ErrorKind::UnresolvedReference);
    }

    #[test]
    fn test_invalid_style_config() {
        let config = AppConfig::new(
            StyleConfig::new("not-a-color", "#a5d8ff", 1),
            Default::default(),
            Default::default(),
            Default::default(),
        );
        let err = SceneBuilder::new(config)
            .compile_json(r#"{"shapes": []}"#)
            .unwrap_err();

        assert!(matches!(err, InkframeError::Config(_)));
    }

    #[test]
    fn test_to_json_is_flat_array() {
        let builder = SceneBuilder::default();
        let scene = builder
            .compile_json(r#"{"shapes": [{"id": "a", "type": "ellipse"}]}"#)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&builder.to_json(&scene).unwrap()).unwrap();

        assert_eq!(value[0]["id"], "a");
        assert_eq!(value[0]["type"], "ellipse");
        assert_eq!(value[0]["strokeColor"], "#1e1e1e");
    }
}
