//! The scene compiler.
//!
//! # Overview
//!
//! [`SceneCompiler::compile`] turns one frame's IR into a [`Scene`]:
//!
//! 1. Each shape request is resolved, through the vocabulary when it
//!    references an entity, into a [`SemanticShapeRequest`].
//! 2. Each request is expanded into primitives and every primitive gets its
//!    style defaults.
//! 3. The placed shapes are indexed and every connector is routed against
//!    that index.
//! 4. Shapes are emitted in declaration order, then connectors in
//!    declaration order.
//!
//! Connectors are only routed against the shape index, so a connector can
//! never refer to something emitted after it.

use std::collections::HashSet;

use log::{debug, info, trace, warn};
use serde::{Serialize, Serializer, ser::SerializeSeq};

use inkframe_core::{
    defaults::apply_defaults,
    error::{CompileError, ErrorKind},
    geometry::{self, Bounds, Point},
    ir::{ConnectorKind, ConnectorRequest, FrameIr, ShapeRequest},
    primitive::{Binding, ConnectorInfo, Draft, Element, PrimitiveKind},
    style::SceneDefaults,
};

use crate::{
    config::RoutingConfig,
    expand::{self, SemanticShapeRequest, normalize_path},
    route::{ElementIndex, Router},
    vocabulary::Vocabulary,
};

/// Length of a freeform connector that gives no points.
const DEFAULT_PATH_LENGTH: f32 = 100.0;

/// One compiled frame: fully specified primitives in draw order.
///
/// Shapes and connectors are kept apart so that every connector is drawn
/// after every shape. The scene serialises as one flat array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    shapes: Vec<Element>,
    connectors: Vec<Element>,
}

impl Scene {
    pub(crate) fn from_parts(shapes: Vec<Element>, connectors: Vec<Element>) -> Self {
        Self { shapes, connectors }
    }

    pub(crate) fn into_parts(self) -> (Vec<Element>, Vec<Element>) {
        (self.shapes, self.connectors)
    }

    /// Returns the non-connector primitives in declaration order.
    pub fn shapes(&self) -> &[Element] {
        &self.shapes
    }

    /// Returns the connector primitives in declaration order.
    pub fn connectors(&self) -> &[Element] {
        &self.connectors
    }

    /// Iterates every primitive in draw order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.shapes.iter().chain(&self.connectors)
    }

    /// Returns every primitive in draw order.
    pub fn into_elements(self) -> Vec<Element> {
        let mut elements = self.shapes;
        elements.extend(self.connectors);
        elements
    }

    pub fn len(&self) -> usize {
        self.shapes.len() + self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds a primitive by id.
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements().find(|element| element.id() == id)
    }

    /// Returns the box enclosing every primitive, or `None` for an empty
    /// scene.
    pub fn bounds(&self) -> Option<Bounds> {
        self.elements()
            .filter_map(|element| element.bounds().ok())
            .reduce(|union, bounds| union.merge(&bounds))
    }
}

impl Serialize for Scene {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.elements() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

/// Compiles frames against a shared style and routing configuration.
///
/// A compiler holds no mutable state; one instance can compile any number of
/// frames, concurrently.
#[derive(Debug, Clone)]
pub struct SceneCompiler {
    defaults: SceneDefaults,
    router: Router,
}

impl Default for SceneCompiler {
    fn default() -> Self {
        Self::new(SceneDefaults::default(), &RoutingConfig::default())
    }
}

impl SceneCompiler {
    pub fn new(defaults: SceneDefaults, routing: &RoutingConfig) -> Self {
        Self {
            defaults,
            router: Router::new(routing),
        }
    }

    pub fn defaults(&self) -> &SceneDefaults {
        &self.defaults
    }

    /// Compiles one frame.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] met; no partial scene is produced.
    pub fn compile(&self, frame: &FrameIr, vocabulary: &Vocabulary) -> Result<Scene, CompileError> {
        info!(
            shapes = frame.shapes.len(),
            connectors = frame.connectors.len();
            "Compiling frame"
        );

        let mut ids = IdSet::default();

        let mut shapes = Vec::new();
        for (position, request) in frame.shapes.iter().enumerate() {
            let request = self.resolve_shape(position, request, vocabulary)?;
            for draft in expand::expand(&request, &self.defaults)? {
                ids.claim(draft.id())?;
                shapes.push(apply_defaults(draft, &self.defaults));
            }
        }

        let index = ElementIndex::from_elements(&shapes)?;

        let mut connectors = Vec::with_capacity(frame.connectors.len());
        for (position, request) in frame.connectors.iter().enumerate() {
            let draft = self.connector(position, request, &index)?;
            ids.claim(draft.id())?;
            connectors.push(apply_defaults(draft, &self.defaults));
        }

        let scene = Scene::from_parts(shapes, connectors);
        info!(elements = scene.len(); "Frame compiled");
        trace!(scene:?; "Compiled scene");
        Ok(scene)
    }

    /// Builds a scene from a pre-converted element list.
    ///
    /// Paths are rebased so their first vertex is the origin, defaults are
    /// applied to every element and path elements are moved after the
    /// others, keeping their relative order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` or `MalformedGeometry` for invalid elements and
    /// `UnresolvedReference` for a binding to an element that is not a shape
    /// of this list.
    pub fn compile_bridged(&self, drafts: Vec<Draft>) -> Result<Scene, CompileError> {
        info!(elements = drafts.len(); "Compiling bridged elements");

        let mut ids = IdSet::default();
        let mut shapes = Vec::new();
        let mut connectors = Vec::new();
        for draft in drafts {
            ids.claim(draft.id())?;
            let draft = if draft.kind().is_path() {
                let (origin, points) = normalize_path(draft.origin(), draft.points().to_vec());
                draft.with_path(origin, points)
            } else {
                draft
            };
            draft.bounds()?;
            draft.style().validate(&format!("element `{}`", draft.id()))?;
            let element = apply_defaults(draft, &self.defaults);
            if element.kind().is_path() {
                connectors.push(element);
            } else {
                shapes.push(element);
            }
        }

        let targets: HashSet<&str> = shapes.iter().map(|shape| shape.id()).collect();
        for element in shapes.iter().chain(&connectors) {
            let Some(connector) = element.connector() else {
                continue;
            };
            for binding in [&connector.start_binding, &connector.end_binding]
                .into_iter()
                .flatten()
            {
                if !targets.contains(binding.element_id()) {
                    return Err(CompileError::new(
                        ErrorKind::UnresolvedReference,
                        format!(
                            "bridged element `{}` is bound to unknown id `{}`",
                            element.id(),
                            binding.element_id()
                        ),
                    ));
                }
            }
        }

        Ok(Scene::from_parts(shapes, connectors))
    }

    /// Resolves a shape request, through the vocabulary if it references an
    /// entity.
    ///
    /// A request references an entity when it names one with `entity`, or
    /// when it gives no type and its id is a declared key.
    fn resolve_shape(
        &self,
        position: usize,
        request: &ShapeRequest,
        vocabulary: &Vocabulary,
    ) -> Result<SemanticShapeRequest, CompileError> {
        let id = request.effective_id().ok_or_else(|| {
            CompileError::new(
                ErrorKind::MalformedInput,
                format!("shape #{position} has neither an id nor an entity"),
            )
        })?;

        let key = request.entity.as_deref().or_else(|| {
            request
                .spec
                .kind
                .is_none()
                .then_some(id)
                .filter(|id| vocabulary.contains(id))
        });

        let Some(key) = key else {
            let origin = Point::new(
                request.spec.x.unwrap_or_default(),
                request.spec.y.unwrap_or_default(),
            );
            return SemanticShapeRequest::new(id, &request.spec, origin);
        };

        let entry = vocabulary.resolve(key)?;
        if request.spec.has_content() {
            warn!(id, entity = key; "Ignoring inline fields on a vocabulary reference");
        }
        let origin = Point::new(
            request.spec.x.or(entry.x).unwrap_or_default(),
            request.spec.y.or(entry.y).unwrap_or_default(),
        );
        debug!(id, entity = key, kind = entry.kind_tag(); "Resolved vocabulary entity");
        SemanticShapeRequest::new(id, entry, origin)
    }

    fn connector(
        &self,
        position: usize,
        request: &ConnectorRequest,
        index: &ElementIndex,
    ) -> Result<Draft, CompileError> {
        let kind = match request.kind {
            ConnectorKind::Arrow => PrimitiveKind::Arrow,
            ConnectorKind::Line => PrimitiveKind::Line,
        };
        let (start_arrowhead, end_arrowhead) = request.arrowheads();

        let (id, draft, bindings) = match (&request.from, &request.to) {
            (Some(from), Some(to)) => {
                let id = request
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{from}__{to}__{position}"));
                let route = self
                    .router
                    .route(index, from, to, request.elbowed)
                    .map_err(|err| err.context(format!("connector `{id}`")))?;
                let bindings = (
                    Some(Binding::new(from.as_str(), route.start_side())),
                    Some(Binding::new(to.as_str(), route.end_side())),
                );
                let start = route.start();
                let draft = Draft::path(id.clone(), kind, start, route.into_points());
                (id, draft, bindings)
            }
            (None, None) => {
                let id = request
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("path__{position}"));
                let what = format!("connector `{id}`");
                let origin = Point::new(request.x.unwrap_or_default(), request.y.unwrap_or_default());
                geometry::ensure_finite(&what, &[origin.x(), origin.y()])?;

                let points = request.points.clone().unwrap_or_else(|| {
                    vec![Point::default(), Point::new(DEFAULT_PATH_LENGTH, 0.0)]
                });
                for point in &points {
                    geometry::ensure_finite(&what, &[point.x(), point.y()])?;
                }
                let (origin, points) = normalize_path(origin, points);
                (id.clone(), Draft::path(id, kind, origin, points), (None, None))
            }
            (from, to) => {
                let named = from.as_deref().or(to.as_deref()).unwrap_or_default();
                return Err(CompileError::new(
                    ErrorKind::MalformedInput,
                    format!(
                        "connector #{position} names only one endpoint (`{named}`), expected both `from` and `to` or neither"
                    ),
                ));
            }
        };

        request.style.validate(&format!("connector `{id}`"))?;

        Ok(draft
            .with_label(request.label.clone())
            .with_connector(ConnectorInfo {
                start_binding: bindings.0,
                end_binding: bindings.1,
                start_arrowhead,
                end_arrowhead,
                elbowed: request.elbowed,
            })
            .with_style(request.style.clone()))
    }
}

/// Ids already emitted in one scene.
#[derive(Default)]
struct IdSet(HashSet<String>);

impl IdSet {
    fn claim(&mut self, id: &str) -> Result<(), CompileError> {
        if id.is_empty() {
            return Err(CompileError::new(
                ErrorKind::MalformedInput,
                "primitive ids must not be empty",
            ));
        }
        if !self.0.insert(id.to_string()) {
            return Err(CompileError::new(
                ErrorKind::DuplicateId,
                format!("id `{id}` is used by more than one primitive"),
            ));
        }
        Ok(())
    }
}
