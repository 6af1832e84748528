//! Storyboards: several frames sharing one vocabulary.
//!
//! # Overview
//!
//! A storyboard declares its entity vocabulary once and lists frames that
//! reference it. [`StoryboardCompiler`] compiles every frame in parallel
//! against the same read-only [`Vocabulary`], then [`StoryboardCompiler::combine`]
//! lays the frames out side by side in one scene:
//!
//! ```text
//!   frame 0  | gap |  frame 1  | gap |  frame 2
//!  caption 0       caption 1        caption 2
//! ```
//!
//! Ids are prefixed with `f<index>_` so frames never collide, and every
//! connector of every frame is still drawn after every shape.
//!
//! Frames may carry Mermaid text. When the bridge reports healthy, those
//! frames are converted by the bridge; any bridge failure falls back to the
//! frame's coordinate IR.

use std::{collections::HashSet, sync::Arc};

use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Deserialize;

use inkframe_core::{
    defaults::apply_defaults,
    error::CompileError,
    geometry::Point,
    ir::{FrameIr, ShapeSpec},
    primitive::{Draft, Element, PrimitiveKind, estimate_text_size},
    style::Style,
};

use crate::{
    bridge::{MermaidBridge, NoBridge},
    compile::{Scene, SceneCompiler},
    config::StoryboardConfig,
    vocabulary::Vocabulary,
};

/// A multi-frame storyboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storyboard {
    #[serde(default)]
    vocabulary: IndexMap<String, ShapeSpec>,
    frames: Vec<FramePlan>,
}

impl Storyboard {
    pub fn new(vocabulary: IndexMap<String, ShapeSpec>, frames: Vec<FramePlan>) -> Self {
        Self { vocabulary, frames }
    }

    pub fn frames(&self) -> &[FramePlan] {
        &self.frames
    }

    /// Freezes the declared entities into a [`Vocabulary`].
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for an empty key.
    pub fn vocabulary(&self) -> Result<Vocabulary, CompileError> {
        Vocabulary::from_entries(
            self.vocabulary
                .iter()
                .map(|(key, spec)| (key.clone(), spec.clone())),
        )
    }
}

/// One planned frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FramePlan {
    /// Text shown below the frame in the combined scene.
    #[serde(default)]
    pub caption: Option<String>,

    /// Mermaid text to convert through the bridge, if any.
    #[serde(default)]
    pub mermaid: Option<String>,

    /// Coordinate IR; also the fallback for Mermaid frames.
    #[serde(flatten)]
    pub ir: FrameIr,
}

/// Compiles storyboards.
pub struct StoryboardCompiler {
    compiler: SceneCompiler,
    config: StoryboardConfig,
    bridge: Arc<dyn MermaidBridge>,
}

impl StoryboardCompiler {
    /// Creates a compiler that never uses the Mermaid bridge.
    pub fn new(compiler: SceneCompiler, config: StoryboardConfig) -> Self {
        Self {
            compiler,
            config,
            bridge: Arc::new(NoBridge),
        }
    }

    /// Routes Mermaid frames through `bridge` (builder style).
    pub fn with_bridge(mut self, bridge: Arc<dyn MermaidBridge>) -> Self {
        self.bridge = bridge;
        self
    }

    /// Compiles every frame and combines them into one scene.
    ///
    /// # Errors
    ///
    /// Returns the error of a failing frame, with its index in the detail.
    pub fn compile(&self, storyboard: &Storyboard) -> Result<Scene, CompileError> {
        let scenes = self.compile_frames(storyboard)?;
        let captions: Vec<Option<&str>> = storyboard
            .frames
            .iter()
            .map(|frame| frame.caption.as_deref())
            .collect();
        Ok(self.combine(scenes, &captions))
    }

    /// Compiles every frame in parallel, returning scenes in frame order.
    ///
    /// # Errors
    ///
    /// Returns the error of a failing frame, with its index in the detail. No
    /// scenes are returned when any frame fails.
    pub fn compile_frames(&self, storyboard: &Storyboard) -> Result<Vec<Scene>, CompileError> {
        let vocabulary = storyboard.vocabulary()?;
        info!(
            frames = storyboard.frames.len(),
            entities = vocabulary.len();
            "Compiling storyboard"
        );

        let wants_bridge = storyboard.frames.iter().any(|frame| frame.mermaid.is_some());
        let bridge_ready = wants_bridge && self.bridge.health();
        if wants_bridge && !bridge_ready {
            warn!("Mermaid bridge is unavailable, compiling every frame from its coordinate IR");
        }

        storyboard
            .frames
            .par_iter()
            .enumerate()
            .map(|(index, frame)| {
                self.compile_frame(index, frame, &vocabulary, bridge_ready)
                    .map_err(|err| err.context(format!("frame {index}")))
            })
            .collect()
    }

    fn compile_frame(
        &self,
        index: usize,
        frame: &FramePlan,
        vocabulary: &Vocabulary,
        bridge_ready: bool,
    ) -> Result<Scene, CompileError> {
        if let Some(mermaid) = frame.mermaid.as_deref().filter(|_| bridge_ready) {
            match self.bridge.convert(mermaid) {
                Ok(drafts) => match self.compiler.compile_bridged(drafts) {
                    Ok(scene) => {
                        debug!(frame = index; "Frame converted by the Mermaid bridge");
                        return Ok(scene);
                    }
                    Err(err) => {
                        warn!(frame = index, err:% = err; "Bridged elements are invalid, falling back");
                    }
                },
                Err(err) => {
                    warn!(frame = index, err:% = err; "Mermaid conversion failed, falling back");
                }
            }
        }
        self.compiler.compile(&frame.ir, vocabulary)
    }

    /// Lays compiled frames out side by side in one scene.
    ///
    /// Frame `i` has its ids prefixed with `f{i}_`, is moved so its bounding
    /// box starts at `(i * stride, 0)`, and gets its caption centred in its
    /// slot below the frame.
    pub fn combine(&self, scenes: Vec<Scene>, captions: &[Option<&str>]) -> Scene {
        info!(frames = scenes.len(); "Combining frames");

        let mut shapes = Vec::new();
        let mut connectors = Vec::new();
        for (index, scene) in scenes.into_iter().enumerate() {
            let prefix = format!("f{index}_");
            let slot_x = index as f32 * self.config.stride();
            let bounds = scene.bounds();
            let offset = match bounds {
                Some(bounds) => Point::new(slot_x - bounds.min_x(), -bounds.min_y()),
                None => Point::new(slot_x, 0.0),
            };
            let frame_height = bounds.map(|bounds| bounds.height()).unwrap_or_default();

            let local: HashSet<String> = scene.elements().map(|e| e.id().to_string()).collect();
            let (frame_shapes, frame_connectors) = scene.into_parts();
            for (target, elements) in [(&mut shapes, frame_shapes), (&mut connectors, frame_connectors)] {
                for mut element in elements {
                    element.prefix_ids(&prefix, |id| local.contains(id));
                    element.translate(offset);
                    target.push(element);
                }
            }

            if let Some(caption) = captions.get(index).copied().flatten().filter(|c| !c.is_empty()) {
                shapes.push(self.caption(index, caption, slot_x, frame_height));
            }
        }
        Scene::from_parts(shapes, connectors)
    }

    fn caption(&self, index: usize, text: &str, slot_x: f32, frame_height: f32) -> Element {
        let font_size = self.config.caption_font_size();
        let size = estimate_text_size(text, font_size);
        let top_left = Point::new(
            slot_x + (self.config.slot_width() - size.width()) / 2.0,
            frame_height + self.config.caption_offset(),
        );
        let draft = Draft::bounded(format!("f{index}__caption"), PrimitiveKind::Text, top_left, size)
            .with_label(Some(text.to_string()))
            .with_style(Style {
                font_size: Some(font_size),
                ..Style::default()
            });
        apply_defaults(draft, self.compiler.defaults())
    }
}
