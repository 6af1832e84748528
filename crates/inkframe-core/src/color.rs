//! Color handling for inkframe scenes
//!
//! This module provides the [`Color`] type. Colors are validated with the
//! `DynamicColor` parser from the color crate but keep their source token
//! verbatim, so a color written as `#a5d8ff` in the input is emitted as
//! `#a5d8ff` in every compiled frame.

use std::{fmt, str::FromStr};

use color::DynamicColor;
use serde::{Deserialize, Serialize};

/// Token for a fully transparent color.
pub const TRANSPARENT: &str = "transparent";

/// A validated CSS color that remembers how it was written.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    token: String,
    alpha: f32,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use inkframe_core::color::Color;
    ///
    /// let stroke = Color::new("#1e1e1e").unwrap();
    /// assert_eq!(stroke.as_str(), "#1e1e1e");
    ///
    /// assert!(Color::new("transparent").unwrap().is_transparent());
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let token = color_str.trim();
        if token.eq_ignore_ascii_case(TRANSPARENT) {
            return Ok(Self::transparent());
        }
        match DynamicColor::from_str(token) {
            Ok(color) => Ok(Self {
                token: token.to_string(),
                alpha: color.components[3],
            }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// The fully transparent color.
    pub fn transparent() -> Self {
        Self {
            token: TRANSPARENT.to_string(),
            alpha: 0.0,
        }
    }

    /// Returns the color exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Returns the alpha (transparency) component of this color, between
    /// 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns true if nothing would be painted with this color.
    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("#1e1e1e").expect("'#1e1e1e' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.token
    }
}
