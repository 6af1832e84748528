//! Actor (stick figure) expansion.

use inkframe_core::{
    color::Color,
    error::{CompileError, ErrorKind},
    geometry::{Point, Size},
    primitive::{Draft, PrimitiveKind, estimate_text_size},
    style::Style,
};

use super::{SemanticKind, SemanticShapeRequest};

const HEAD_RATIO: f32 = 0.32;
/// How far the head may be wider than the box.
const MAX_HEAD_OVERFLOW: f32 = 2.0;
const TORSO_RATIO: f32 = 0.30;
/// Arm height as a fraction of the torso, measured from the neck.
const ARM_DROP: f32 = 0.3;
const ARM_SPAN: f32 = 0.8;
const LEG_SPREAD: f32 = 0.3;

const CAPTION_FONT_SIZE: f32 = 14.0;
const CAPTION_GAP: f32 = 6.0;

/// Returns the narrowest box that fits an actor of `height`.
pub(super) fn min_width(height: f32) -> f32 {
    height * HEAD_RATIO / MAX_HEAD_OVERFLOW
}

/// Head ellipse, torso, arms and two legs, with the label as a caption
/// below the figure.
///
/// The head is always a fixed share of the height and the figure is
/// centred in the box, so in a narrow box the head overflows its sides.
/// The head keeps the request id so connectors attach to the figure; the
/// label moves to the caption because it would not fit inside the head.
pub(super) fn expand(request: &SemanticShapeRequest) -> Result<Vec<Draft>, CompileError> {
    request.ensure_not_degenerate(SemanticKind::Actor)?;

    let (x, y) = (request.top_left().x(), request.top_left().y());
    let (w, h) = (request.size().width(), request.size().height());
    if w < min_width(h) {
        return Err(CompileError::new(
            ErrorKind::ExpansionFailure,
            format!(
                "{} `{}` is {w} x {h}, needs a width of at least {} for its head",
                SemanticKind::Actor,
                request.id(),
                min_width(h)
            ),
        ));
    }
    let cx = x + w / 2.0;

    let head = h * HEAD_RATIO;
    let neck_y = y + head;
    let torso = h * TORSO_RATIO;
    let arm_y = neck_y + torso * ARM_DROP;
    let hip_y = neck_y + torso;
    let leg = h - head - torso;

    let limb = request.style().stroke_only();
    let head_style = Style {
        background_color: Some(Color::transparent()),
        ..request.style().clone()
    };

    let mut parts = vec![
        request
            .primary(
                PrimitiveKind::Ellipse,
                Point::new(cx - head / 2.0, y),
                Size::new(head, head),
                head_style,
            )
            .with_label(None),
        request.path_part(
            "torso",
            Point::new(cx, neck_y),
            vec![Point::new(0.0, 0.0), Point::new(0.0, torso)],
            limb.clone(),
        ),
        request.path_part(
            "arms",
            Point::new(cx - w * ARM_SPAN / 2.0, arm_y),
            vec![Point::new(0.0, 0.0), Point::new(w * ARM_SPAN, 0.0)],
            limb.clone(),
        ),
        request.path_part(
            "leg_left",
            Point::new(cx, hip_y),
            vec![Point::new(0.0, 0.0), Point::new(-w * LEG_SPREAD, leg)],
            limb.clone(),
        ),
        request.path_part(
            "leg_right",
            Point::new(cx, hip_y),
            vec![Point::new(0.0, 0.0), Point::new(w * LEG_SPREAD, leg)],
            limb.clone(),
        ),
    ];

    if let Some(label) = request.label() {
        let size = estimate_text_size(label, CAPTION_FONT_SIZE);
        let caption_style = Style {
            font_size: Some(CAPTION_FONT_SIZE),
            ..limb
        };
        parts.push(
            request
                .part(
                    "caption",
                    PrimitiveKind::Text,
                    Point::new(cx - size.width() / 2.0, y + h + CAPTION_GAP),
                    size,
                    caption_style,
                )
                .with_label(Some(label.to_string())),
        );
    }

    Ok(parts)
}
