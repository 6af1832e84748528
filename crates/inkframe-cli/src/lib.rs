//! CLI logic for the inkframe scene compiler.
//!
//! Reads a frame or storyboard, compiles it and writes either the element
//! array or an SVG preview.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, warn};

use inkframe::{
    InkframeError, SceneBuilder,
    config::AppConfig,
    export::{Exporter, svg::SvgFile},
};

/// Run the inkframe CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `InkframeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input JSON
/// - Compile errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), InkframeError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        format:? = args.format;
        "Processing input"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let builder = builder(app_config, args.bridge);
    let scene = builder.compile_json(&source)?;

    match args.format {
        OutputFormat::Json => fs::write(&args.output, builder.to_json(&scene)?)?,
        OutputFormat::Svg => SvgFile::new(&args.output)?.export_scene(&scene)?,
    }

    info!(output_file = args.output, elements = scene.len(); "Scene exported successfully");

    Ok(())
}

#[cfg(feature = "http-bridge")]
fn builder(config: AppConfig, use_bridge: bool) -> SceneBuilder {
    use inkframe::bridge::HttpBridge;

    if !use_bridge {
        return SceneBuilder::new(config);
    }
    match HttpBridge::new(config.bridge().clone()) {
        Ok(bridge) => {
            info!(url = config.bridge().url(); "Mermaid bridge enabled");
            SceneBuilder::new(config).with_bridge(bridge)
        }
        Err(err) => {
            warn!(err:% = err; "Could not set up the Mermaid bridge, compiling from coordinates");
            SceneBuilder::new(config)
        }
    }
}

#[cfg(not(feature = "http-bridge"))]
fn builder(config: AppConfig, use_bridge: bool) -> SceneBuilder {
    if use_bridge {
        warn!("Built without the `http-bridge` feature, compiling from coordinates");
    }
    SceneBuilder::new(config)
}
