//! Configuration types for scene compilation.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`StyleConfig`] - The storyboard's shared style.
//! - [`RoutingConfig`] - Connector routing tunables.
//! - [`StoryboardConfig`] - How compiled frames are laid out side by side.
//! - [`BridgeConfig`] - Where the Mermaid bridge lives and how long to wait.
//!
//! # Example
//!
//! ```
//! # use inkframe::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.style().scene_defaults().unwrap().stroke_color().as_str(), "#1e1e1e");
//! ```

use std::time::Duration;

use serde::Deserialize;

use inkframe_core::{
    color::Color,
    style::{Roughness, SceneDefaults},
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    routing: RoutingConfig,

    #[serde(default)]
    storyboard: StoryboardConfig,

    #[serde(default)]
    bridge: BridgeConfig,
}

impl AppConfig {
    pub fn new(
        style: StyleConfig,
        routing: RoutingConfig,
        storyboard: StoryboardConfig,
        bridge: BridgeConfig,
    ) -> Self {
        Self {
            style,
            routing,
            storyboard,
            bridge,
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    pub fn storyboard(&self) -> &StoryboardConfig {
        &self.storyboard
    }

    pub fn bridge(&self) -> &BridgeConfig {
        &self.bridge
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.style.scene_defaults()?;
        RoutingConfig::new(self.routing.tie_tolerance)?;
        self.storyboard.validate()?;
        Ok(())
    }
}

/// The style shared by every frame.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    /// Stroke color of every primitive that sets none.
    #[serde(default = "default_stroke_color")]
    stroke_color: String,

    /// Accent background color for key shapes.
    #[serde(default = "default_background_color")]
    background_color: String,

    /// Roughness (0, 1 or 2) of every primitive that sets none.
    #[serde(default = "default_roughness")]
    roughness: u8,
}

fn default_stroke_color() -> String {
    "#1e1e1e".to_string()
}

fn default_background_color() -> String {
    "#a5d8ff".to_string()
}

fn default_roughness() -> u8 {
    1
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stroke_color: default_stroke_color(),
            background_color: default_background_color(),
            roughness: default_roughness(),
        }
    }
}

impl StyleConfig {
    pub fn new(stroke_color: impl Into<String>, background_color: impl Into<String>, roughness: u8) -> Self {
        Self {
            stroke_color: stroke_color.into(),
            background_color: background_color.into(),
            roughness,
        }
    }

    /// Returns the parsed shared style.
    ///
    /// # Errors
    ///
    /// Returns an error if a color cannot be parsed or the roughness is out
    /// of range.
    pub fn scene_defaults(&self) -> Result<SceneDefaults, String> {
        let stroke = Color::new(&self.stroke_color)
            .map_err(|err| format!("Invalid stroke color in config: {err}"))?;
        let background = Color::new(&self.background_color)
            .map_err(|err| format!("Invalid background color in config: {err}"))?;
        let roughness = Roughness::try_from(self.roughness)
            .map_err(|err| format!("Invalid roughness in config: {err}"))?;
        Ok(SceneDefaults::new(stroke, background, roughness))
    }
}

/// Connector routing tunables.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoutingConfig {
    /// Relative difference between horizontal and vertical separation below
    /// which a connector routes horizontally.
    #[serde(default = "default_tie_tolerance")]
    tie_tolerance: f32,
}

fn default_tie_tolerance() -> f32 {
    0.05
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            tie_tolerance: default_tie_tolerance(),
        }
    }
}

impl RoutingConfig {
    /// Creates a routing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error unless `tie_tolerance` is within `0.0..=1.0`.
    pub fn new(tie_tolerance: f32) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&tie_tolerance) {
            return Err(format!(
                "Invalid tie tolerance in config: {tie_tolerance}, expected a value between 0 and 1"
            ));
        }
        Ok(Self { tie_tolerance })
    }

    pub fn tie_tolerance(&self) -> f32 {
        self.tie_tolerance
    }
}

/// Layout of combined storyboard frames.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StoryboardConfig {
    /// Horizontal space reserved for each frame.
    #[serde(default = "default_slot_width")]
    slot_width: f32,

    /// Gap between two frame slots.
    #[serde(default = "default_gap")]
    gap: f32,

    /// Distance from a frame's bottom edge to its caption.
    #[serde(default = "default_caption_offset")]
    caption_offset: f32,

    #[serde(default = "default_caption_font_size")]
    caption_font_size: f32,
}

fn default_slot_width() -> f32 {
    1400.0
}

fn default_gap() -> f32 {
    200.0
}

fn default_caption_offset() -> f32 {
    60.0
}

fn default_caption_font_size() -> f32 {
    20.0
}

impl Default for StoryboardConfig {
    fn default() -> Self {
        Self {
            slot_width: default_slot_width(),
            gap: default_gap(),
            caption_offset: default_caption_offset(),
            caption_font_size: default_caption_font_size(),
        }
    }
}

impl StoryboardConfig {
    pub fn slot_width(&self) -> f32 {
        self.slot_width
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Returns the horizontal distance between the origins of two
    /// consecutive frames.
    pub fn stride(&self) -> f32 {
        self.slot_width + self.gap
    }

    pub fn caption_offset(&self) -> f32 {
        self.caption_offset
    }

    pub fn caption_font_size(&self) -> f32 {
        self.caption_font_size
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("slot_width", self.slot_width),
            ("gap", self.gap),
            ("caption_offset", self.caption_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("Invalid storyboard {name} in config: {value}"));
            }
        }
        if !self.caption_font_size.is_finite() || self.caption_font_size <= 0.0 {
            return Err(format!(
                "Invalid storyboard caption_font_size in config: {}",
                self.caption_font_size
            ));
        }
        Ok(())
    }
}

/// Location and timeouts of the Mermaid bridge service.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_url")]
    url: String,

    #[serde(default = "default_health_timeout_ms")]
    health_timeout_ms: u64,

    #[serde(default = "default_convert_timeout_ms")]
    convert_timeout_ms: u64,
}

fn default_bridge_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_health_timeout_ms() -> u64 {
    2000
}

fn default_convert_timeout_ms() -> u64 {
    15000
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: default_bridge_url(),
            health_timeout_ms: default_health_timeout_ms(),
            convert_timeout_ms: default_convert_timeout_ms(),
        }
    }
}

impl BridgeConfig {
    pub fn new(url: impl Into<String>, health_timeout: Duration, convert_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            health_timeout_ms: health_timeout.as_millis() as u64,
            convert_timeout_ms: convert_timeout.as_millis() as u64,
        }
    }

    /// Returns the base URL, without a trailing slash.
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn convert_timeout(&self) -> Duration {
        Duration::from_millis(self.convert_timeout_ms)
    }
}
