//! SVG preview of a compiled scene.
//!
//! This is a preview, not a pixel-exact renderer: sketchy fills are drawn as
//! translucent flat fills and roughness is ignored. Everything else that
//! affects layout is honoured: geometry, stroke color/width/pattern, fill,
//! opacity, rotation, labels and arrowheads.
//!
//! ```
//! # use inkframe::{SceneCompiler, vocabulary::Vocabulary, ir::FrameIr};
//! # use inkframe::export::svg;
//! let frame: FrameIr = serde_json::from_str(
//!     r#"{"shapes": [{"id": "a", "type": "rectangle", "width": 100, "height": 50}]}"#,
//! ).unwrap();
//! let scene = SceneCompiler::default().compile(&frame, &Vocabulary::empty()).unwrap();
//!
//! let document = svg::render(&scene);
//! assert!(document.starts_with("<svg"));
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use svg::{self, node::Text as SvgText, node::element as svg_element};

use inkframe_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    primitive::{Arrowhead, Element, PrimitiveKind},
    style::{FillStyle, ResolvedStyle},
};

use super::{Error, Exporter};
use crate::compile::Scene;

const FONT_FAMILY: &str = "Virgil, Segoe UI Emoji, sans-serif";

/// Opacity of the flat fill standing in for hachure, cross-hatch and zigzag.
const SKETCH_FILL_OPACITY: f32 = 0.35;

const LINE_HEIGHT_FACTOR: f32 = 1.25;

/// Renders `scene` with the default margin and background.
pub fn render(scene: &Scene) -> String {
    Svg::default().render(scene).to_string()
}

/// SVG renderer settings.
#[derive(Debug, Clone)]
pub struct Svg {
    margin: f32,
    background: Color,
}

impl Default for Svg {
    fn default() -> Self {
        Self {
            margin: 20.0,
            background: Color::new("#ffffff").expect("'#ffffff' is a valid CSS color"),
        }
    }
}

impl Svg {
    /// Renders the scene to an SVG document.
    ///
    /// Elements are drawn in scene order, so connectors end up above every
    /// shape.
    pub fn render(&self, scene: &Scene) -> svg::Document {
        let content = scene
            .bounds()
            .unwrap_or_else(|| Bounds::new_from_top_left(Point::default(), Size::default()));
        let width = content.width() + 2.0 * self.margin;
        let height = content.height() + 2.0 * self.margin;
        info!(elements = scene.len(), width, height; "Rendering SVG preview");

        let mut doc = svg::Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if !self.background.is_transparent() {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", self.background.as_str()),
            );
        }

        let mut markers = MarkerSet::default();
        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                self.margin - content.min_x(),
                self.margin - content.min_y()
            ),
        );
        for element in scene.elements() {
            main_group = main_group.add(render_element(element, &mut markers));
        }

        doc.add(markers.into_definitions()).add(main_group)
    }
}

/// Writes SVG previews to a file.
#[derive(Debug, Clone)]
pub struct SvgFile {
    path: PathBuf,
    svg: Svg,
}

impl SvgFile {
    /// Creates an exporter writing to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] for an empty path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::Render("output path is empty".to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            svg: Svg::default(),
        })
    }
}

impl Exporter for SvgFile {
    fn export_scene(&mut self, scene: &Scene) -> Result<(), Error> {
        let document = self.svg.render(scene);
        svg::save(&self.path, &document)?;
        info!(path = self.path.display().to_string(); "SVG preview written");
        Ok(())
    }
}

fn render_element(element: &Element, markers: &mut MarkerSet) -> svg_element::Group {
    let style = element.style();
    let mut group = svg_element::Group::new()
        .set("id", element.id())
        .set("opacity", f32::from(style.opacity) / 100.0);

    let center = element_center(element);
    if style.angle != 0.0 {
        group = group.set(
            "transform",
            format!(
                "rotate({} {} {})",
                style.angle.to_degrees(),
                center.x(),
                center.y()
            ),
        );
    }

    let origin = element.origin();
    let size = element.size();
    match element.kind() {
        PrimitiveKind::Ellipse => {
            let shape = svg_element::Ellipse::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("rx", size.width() / 2.0)
                .set("ry", size.height() / 2.0);
            group = group.add(filled(stroked(shape, style), style));
        }
        PrimitiveKind::Diamond => {
            let (x, y, w, h) = (origin.x(), origin.y(), size.width(), size.height());
            let shape = svg_element::Polygon::new().set(
                "points",
                format!(
                    "{},{} {},{} {},{} {},{}",
                    x + w / 2.0,
                    y,
                    x + w,
                    y + h / 2.0,
                    x + w / 2.0,
                    y + h,
                    x,
                    y + h / 2.0
                ),
            );
            group = group.add(filled(stroked(shape, style), style));
        }
        PrimitiveKind::Text => {
            if let Some(text) = element.label() {
                group = group.add(text_block(text, origin, style, false));
            }
            return group;
        }
        PrimitiveKind::Line | PrimitiveKind::Arrow | PrimitiveKind::Freehand => {
            let points = element
                .points()
                .iter()
                .map(|point| {
                    let absolute = origin.add_point(*point);
                    format!("{},{}", absolute.x(), absolute.y())
                })
                .collect::<Vec<_>>()
                .join(" ");
            let mut path = stroked(svg_element::Polyline::new().set("points", points), style)
                .set("fill", "none")
                .set("stroke-linejoin", "round")
                .set("stroke-linecap", "round");
            if let Some(connector) = element.connector() {
                if let Some(head) = connector.start_arrowhead {
                    path = path.set("marker-start", markers.reference(head, &style.stroke_color));
                }
                if let Some(head) = connector.end_arrowhead {
                    path = path.set("marker-end", markers.reference(head, &style.stroke_color));
                }
            }
            group = group.add(path);
        }
        PrimitiveKind::Rectangle | PrimitiveKind::Custom(_) => {
            let shape = svg_element::Rectangle::new()
                .set("x", origin.x())
                .set("y", origin.y())
                .set("width", size.width())
                .set("height", size.height());
            group = group.add(filled(stroked(shape, style), style));
        }
    }

    if let Some(label) = element.label() {
        group = group.add(text_block(label, center, style, true));
    }
    group
}

/// Returns where a label of `element` is centred.
///
/// Bounded shapes use their centre; paths use the middle of their middle
/// segment.
fn element_center(element: &Element) -> Point {
    let origin = element.origin();
    if element.kind().is_path() {
        let points = element.points();
        let middle = points.len() / 2;
        return match (points.get(middle.saturating_sub(1)), points.get(middle)) {
            (Some(a), Some(b)) if points.len() % 2 == 0 => origin.add_point(a.midpoint(*b)),
            (_, Some(b)) => origin.add_point(*b),
            _ => origin,
        };
    }
    Bounds::new_from_top_left(origin, element.size()).center()
}

fn stroked<T: SetAttr>(node: T, style: &ResolvedStyle) -> T {
    let node = node
        .set_attr("stroke", style.stroke_color.as_str())
        .set_attr("stroke-width", style.stroke_width.to_string());
    match style.stroke_style.to_svg_dasharray(style.stroke_width) {
        Some(dasharray) => node.set_attr("stroke-dasharray", dasharray),
        None => node,
    }
}

fn filled<T: SetAttr>(node: T, style: &ResolvedStyle) -> T {
    if style.background_color.is_transparent() {
        return node.set_attr("fill", "none".to_string());
    }
    let node = node.set_attr("fill", style.background_color.as_str());
    match style.fill_style {
        FillStyle::Solid => node,
        FillStyle::Hachure | FillStyle::CrossHatch | FillStyle::Zigzag => {
            node.set_attr("fill-opacity", SKETCH_FILL_OPACITY.to_string())
        }
    }
}

/// Sets an attribute on any SVG element type, builder style.
trait SetAttr: Sized {
    fn set_attr(self, name: &str, value: impl Into<String>) -> Self;
}

macro_rules! impl_set_attr {
    ($($element:ty),*) => {
        $(impl SetAttr for $element {
            fn set_attr(self, name: &str, value: impl Into<String>) -> Self {
                self.set(name, value.into())
            }
        })*
    };
}

impl_set_attr!(
    svg_element::Rectangle,
    svg_element::Ellipse,
    svg_element::Polygon,
    svg_element::Polyline
);

/// Renders possibly multi-line text.
///
/// With `centered` the block is centred on `anchor`; otherwise `anchor` is its
/// top-left corner.
fn text_block(text: &str, anchor: Point, style: &ResolvedStyle, centered: bool) -> svg_element::Text {
    let lines: Vec<&str> = text.split('\n').collect();
    let line_height = style.font_size * LINE_HEIGHT_FACTOR;
    let top = if centered {
        anchor.y() - lines.len() as f32 * line_height / 2.0
    } else {
        anchor.y()
    };

    let mut rendered = svg_element::Text::new("")
        .set("text-anchor", if centered { "middle" } else { "start" })
        .set("dominant-baseline", "central")
        .set("font-family", FONT_FAMILY)
        .set("font-size", style.font_size)
        .set("fill", style.stroke_color.as_str())
        .set("fill-opacity", style.stroke_color.alpha());

    for (index, line) in lines.into_iter().enumerate() {
        let tspan = svg_element::TSpan::new("")
            .set("x", anchor.x())
            .set("y", top + (index as f32 + 0.5) * line_height)
            .add(SvgText::new(line));
        rendered = rendered.add(tspan);
    }
    rendered
}

/// Arrowhead markers used by the scene, one per head shape and color.
#[derive(Default)]
struct MarkerSet {
    markers: IndexMap<String, svg_element::Marker>,
}

impl MarkerSet {
    /// Registers the marker for `head` drawn in `color` and returns a
    /// `url(#..)` reference to it.
    fn reference(&mut self, head: Arrowhead, color: &Color) -> String {
        let id = format!("arrowhead-{}-{}", head_name(head), id_safe(color));
        if !self.markers.contains_key(&id) {
            debug!(marker = id.as_str(); "Registering arrowhead marker");
            let marker = create_marker(&id, head, color);
            self.markers.insert(id.clone(), marker);
        }
        format!("url(#{id})")
    }

    fn into_definitions(self) -> svg_element::Definitions {
        self.markers
            .into_values()
            .fold(svg_element::Definitions::new(), |defs, marker| defs.add(marker))
    }
}

fn head_name(head: Arrowhead) -> &'static str {
    match head {
        Arrowhead::Arrow => "arrow",
        Arrowhead::Bar => "bar",
        Arrowhead::Dot => "dot",
        Arrowhead::Triangle => "triangle",
    }
}

fn id_safe(color: &Color) -> String {
    color
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Creates a marker drawn pointing along the path at its end and reversed at
/// its start.
fn create_marker(id: &str, head: Arrowhead, color: &Color) -> svg_element::Marker {
    let marker = svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerWidth", 8)
        .set("markerHeight", 8)
        .set("orient", "auto-start-reverse");

    let color_str = color.as_str();
    match head {
        Arrowhead::Arrow => marker.add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10")
                .set("fill", "none")
                .set("stroke", color_str)
                .set("stroke-width", 1.5),
        ),
        Arrowhead::Triangle => marker.add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color_str),
        ),
        Arrowhead::Bar => marker.add(
            svg_element::Path::new()
                .set("d", "M 9 0 L 9 10")
                .set("stroke", color_str)
                .set("stroke-width", 1.5),
        ),
        Arrowhead::Dot => marker.add(
            svg_element::Circle::new()
                .set("cx", 5)
                .set("cy", 5)
                .set("r", 4)
                .set("fill", color_str),
        ),
    }
}
