//! Export of compiled scenes.
//!
//! The compiler's real output is the JSON element array; the exporters here
//! produce human-viewable previews of the same scene.
//!
//! # Available Backends
//!
//! - [`svg`]: an SVG preview via [`svg::Svg`] and [`svg::SvgFile`]
//!
//! Export operations return [`Error`], which converts into
//! [`InkframeError::Export`](crate::InkframeError::Export) at the crate
//! boundary.

pub mod svg;

use thiserror::Error;

use crate::compile::Scene;

/// Abstraction for scene export backends.
pub trait Exporter {
    /// Exports a compiled scene to the backend's output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing the output fails.
    fn export_scene(&mut self, scene: &Scene) -> Result<(), Error>;
}

/// Errors that can occur during scene export.
#[derive(Debug, Error)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error encountered while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
