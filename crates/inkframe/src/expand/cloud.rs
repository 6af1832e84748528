//! Cloud expansion.

use inkframe_core::{
    color::Color,
    error::CompileError,
    geometry::{Point, Size},
    primitive::{Draft, PrimitiveKind},
    style::FillStyle,
};

use super::{SemanticKind, SemanticShapeRequest};

/// Bumps as `(x, y, width, height)` fractions of the cloud's box.
const BUMPS: [(f32, f32, f32, f32); 3] = [
    (0.00, 0.26, 0.38, 0.50),
    (0.22, 0.00, 0.40, 0.52),
    (0.55, 0.14, 0.40, 0.50),
];

/// Wide base ellipse along the bottom plus three overlapping bumps.
///
/// All four ellipses share the same solid fill so their overlaps merge into
/// one outline. Without a background of its own the cloud is filled with
/// `accent`.
pub(super) fn expand(request: &SemanticShapeRequest, accent: &Color) -> Result<Vec<Draft>, CompileError> {
    request.ensure_not_degenerate(SemanticKind::Cloud)?;

    let origin = request.top_left();
    let size = request.size();
    let (w, h) = (size.width(), size.height());
    let style = request.filled_style(accent, FillStyle::Solid);

    let mut parts = Vec::with_capacity(BUMPS.len() + 1);
    parts.push(request.primary(
        PrimitiveKind::Ellipse,
        origin.add_point(Point::new(0.12 * w, 0.42 * h)),
        Size::new(0.76 * w, 0.58 * h),
        style.clone(),
    ));
    for (i, (fx, fy, fw, fh)) in BUMPS.iter().enumerate() {
        parts.push(request.part(
            &format!("bump{}", i + 1),
            PrimitiveKind::Ellipse,
            origin.add_point(Point::new(fx * w, fy * h)),
            Size::new(fw * w, fh * h),
            style.clone(),
        ));
    }
    Ok(parts)
}
