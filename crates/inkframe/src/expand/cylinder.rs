//! Cylinder (database) expansion.

use inkframe_core::{
    color::Color,
    error::{CompileError, ErrorKind},
    geometry::{Point, Size},
    primitive::{Draft, PrimitiveKind},
    style::{FillStyle, Style},
};

use super::{SemanticKind, SemanticShapeRequest};

/// Smallest lid height; also the smallest cylinder height.
const MIN_LID_HEIGHT: f32 = 16.0;

/// Lid height relative to the cylinder height.
const LID_RATIO: f32 = 0.28;

/// Returns the height of the lid ellipse for a cylinder of `height`.
pub(super) fn lid_height(height: f32) -> f32 {
    (height * LID_RATIO).floor().max(MIN_LID_HEIGHT)
}

/// Body rectangle below half the lid, a full-width lid ellipse on top and a
/// base arc along the bottom edge.
///
/// The lid and the base share the body's horizontal extent, and together the
/// three parts span exactly the requested height. Without a background of
/// its own the cylinder is filled with `accent`.
pub(super) fn expand(request: &SemanticShapeRequest, accent: &Color) -> Result<Vec<Draft>, CompileError> {
    let (x, y) = (request.top_left().x(), request.top_left().y());
    let (w, h) = (request.size().width(), request.size().height());

    if h < MIN_LID_HEIGHT || w <= 0.0 {
        return Err(CompileError::new(
            ErrorKind::ExpansionFailure,
            format!(
                "{} `{}` is {w} x {h}, needs a positive width and a height of at least {MIN_LID_HEIGHT}",
                SemanticKind::Cylinder,
                request.id()
            ),
        ));
    }

    let lid = lid_height(h);
    let half_lid = lid / 2.0;
    let body_style = request.filled_style(accent, FillStyle::Hachure);
    let lid_style = Style {
        background_color: body_style.background_color.clone(),
        fill_style: body_style.fill_style,
        ..request.style().stroke_only()
    };

    let body = request.primary(
        PrimitiveKind::Rectangle,
        Point::new(x, y + half_lid),
        Size::new(w, h - half_lid),
        body_style,
    );
    let top = request.part(
        "lid",
        PrimitiveKind::Ellipse,
        Point::new(x, y),
        Size::new(w, lid),
        lid_style,
    );
    let base = request.path_part(
        "base",
        Point::new(x, y + h - half_lid),
        vec![
            Point::new(0.0, 0.0),
            Point::new(w / 2.0, half_lid),
            Point::new(w, 0.0),
        ],
        request.style().stroke_only(),
    );

    Ok(vec![body, top, base])
}
