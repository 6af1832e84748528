//! Visual style attributes for primitives.
//!
//! Styles come in two flavours:
//!
//! - [`Style`]: every attribute optional. This is what the frame IR carries and
//!   what the semantic shape expander produces.
//! - [`ResolvedStyle`]: every attribute concrete. Only the style defaulter
//!   (see [`crate::defaults`]) produces it, so a compiled element can never
//!   leave an attribute unset.
//!
//! The enumerations follow Excalidraw's vocabulary, which is also what the
//! rendering layer downstream of the compiler expects.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    error::{CompileError, ErrorKind},
};

/// How the interior of a shape with a background color is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    /// Sketchy parallel strokes
    Hachure,
    /// Two crossing hachure layers
    CrossHatch,
    /// Flat fill
    Solid,
    /// Continuous zig-zag stroke
    Zigzag,
}

impl FromStr for FillStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hachure" => Ok(Self::Hachure),
            "cross-hatch" | "crosshatch" => Ok(Self::CrossHatch),
            "solid" => Ok(Self::Solid),
            "zigzag" => Ok(Self::Zigzag),
            _ => Err(format!(
                "invalid fill style `{s}`, valid values: hachure, cross-hatch, solid, zigzag"
            )),
        }
    }
}

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_dasharray(self, width: f32) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(format!("{},{}", 8.0 * width, 6.0 * width)),
            Self::Dotted => Some(format!("{},{}", 1.5 * width, 6.0 * width)),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

/// How hand-drawn a primitive looks, from crisp (0) to sketchy (2).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Roughness {
    Architect,
    #[default]
    Artist,
    Cartoonist,
}

impl TryFrom<u8> for Roughness {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Architect),
            1 => Ok(Self::Artist),
            2 => Ok(Self::Cartoonist),
            _ => Err(format!("invalid roughness `{value}`, valid values: 0, 1, 2")),
        }
    }
}

impl From<Roughness> for u8 {
    fn from(roughness: Roughness) -> Self {
        match roughness {
            Roughness::Architect => 0,
            Roughness::Artist => 1,
            Roughness::Cartoonist => 2,
        }
    }
}

impl fmt::Display for Roughness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Partially specified visual attributes.
///
/// `None` means "not provided"; the style defaulter decides the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<FillStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<Roughness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl Style {
    /// Returns the stroke-related attributes of this style only.
    ///
    /// Decorations of a semantic shape (a cylinder's lid, an actor's limbs)
    /// inherit these from the request so the composite reads as one entity,
    /// while fills and text sizes are decided per sub-element.
    pub fn stroke_only(&self) -> Self {
        Self {
            stroke_color: self.stroke_color.clone(),
            stroke_style: self.stroke_style,
            stroke_width: self.stroke_width,
            roughness: self.roughness,
            opacity: self.opacity,
            ..Self::default()
        }
    }

    /// Sets the background color and fill style, keeping explicit values.
    pub fn with_fill_fallback(mut self, background: &Color, fill: FillStyle) -> Self {
        if self.background_color.is_none() {
            self.background_color = Some(background.clone());
        }
        if self.fill_style.is_none() {
            self.fill_style = Some(fill);
        }
        self
    }

    /// Checks that the numeric attributes are in range.
    pub fn validate(&self, what: &str) -> Result<(), CompileError> {
        for (name, value) in [
            ("strokeWidth", self.stroke_width),
            ("angle", self.angle),
            ("fontSize", self.font_size),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(CompileError::new(
                    ErrorKind::MalformedGeometry,
                    format!("{what} has a non-finite {name}"),
                ));
            }
        }
        if self.stroke_width.is_some_and(|w| w < 0.0) {
            return Err(CompileError::new(
                ErrorKind::MalformedGeometry,
                format!("{what} has a negative strokeWidth"),
            ));
        }
        if self.font_size.is_some_and(|s| s <= 0.0) {
            return Err(CompileError::new(
                ErrorKind::MalformedInput,
                format!("{what} has a non-positive fontSize"),
            ));
        }
        if let Some(opacity) = self.opacity.filter(|o| *o > 100) {
            return Err(CompileError::new(
                ErrorKind::MalformedInput,
                format!("{what} has opacity {opacity}, expected 0..=100"),
            ));
        }
        Ok(())
    }
}

/// Fully specified visual attributes of a compiled element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub stroke_color: Color,
    pub background_color: Color,
    pub fill_style: FillStyle,
    pub stroke_style: StrokeStyle,
    pub stroke_width: f32,
    pub roughness: Roughness,
    pub opacity: u8,
    pub angle: f32,
    pub font_size: f32,
    pub seed: u32,
}

impl From<ResolvedStyle> for Style {
    fn from(style: ResolvedStyle) -> Self {
        Self {
            stroke_color: Some(style.stroke_color),
            background_color: Some(style.background_color),
            fill_style: Some(style.fill_style),
            stroke_style: Some(style.stroke_style),
            stroke_width: Some(style.stroke_width),
            roughness: Some(style.roughness),
            opacity: Some(style.opacity),
            angle: Some(style.angle),
            font_size: Some(style.font_size),
            seed: Some(style.seed),
        }
    }
}

/// The style shared by every frame of a storyboard.
///
/// Stroke color and roughness are the scene-wide fallbacks used by the style
/// defaulter; the background color is the accent the storyboard uses for its
/// key shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDefaults {
    stroke_color: Color,
    background_color: Color,
    roughness: Roughness,
}

impl SceneDefaults {
    pub fn new(stroke_color: Color, background_color: Color, roughness: Roughness) -> Self {
        Self {
            stroke_color,
            background_color,
            roughness,
        }
    }

    /// Returns the shared stroke color.
    pub fn stroke_color(&self) -> &Color {
        &self.stroke_color
    }

    /// Returns the accent background color for key shapes.
    pub fn background_color(&self) -> &Color {
        &self.background_color
    }

    /// Returns the shared roughness.
    pub fn roughness(&self) -> Roughness {
        self.roughness
    }
}

impl Default for SceneDefaults {
    fn default() -> Self {
        Self {
            stroke_color: Color::default(),
            background_color: Color::new("#a5d8ff").expect("'#a5d8ff' is a valid CSS color"),
            roughness: Roughness::default(),
        }
    }
}
