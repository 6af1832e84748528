//! Sticky note expansion.

use inkframe_core::{
    color::Color,
    error::{CompileError, ErrorKind},
    geometry::{Point, Size},
    primitive::{Draft, PrimitiveKind},
    style::{FillStyle, Style},
};

use super::{SemanticKind, SemanticShapeRequest};

const BACKGROUND: &str = "#ffec99";

/// Fold size relative to the note's width.
const FOLD_WIDTH_RATIO: f32 = 0.18;
/// Largest fold relative to the note's height.
const FOLD_HEIGHT_RATIO: f32 = 0.22;
const MAX_FOLD: f32 = 28.0;

/// Returns the side of the folded corner for a note of `size`.
fn fold_size(size: Size) -> f32 {
    (FOLD_WIDTH_RATIO * size.width())
        .min(FOLD_HEIGHT_RATIO * size.height())
        .min(MAX_FOLD)
}

/// Rectangle with a folded flap drawn over its top-right corner.
pub(super) fn expand(request: &SemanticShapeRequest) -> Result<Vec<Draft>, CompileError> {
    request.ensure_not_degenerate(SemanticKind::Note)?;

    let top_left = request.top_left();
    let size = request.size();
    let fold = fold_size(size);
    let corner = top_left.add_point(Point::new(size.width() - fold, 0.0));

    let paper = request.filled_style(&palette_color(BACKGROUND)?, FillStyle::Hachure);
    let flap = Style {
        background_color: Some(palette_color("#ffffff")?),
        fill_style: Some(FillStyle::Solid),
        ..request.style().stroke_only()
    };

    Ok(vec![
        request.primary(PrimitiveKind::Rectangle, top_left, size, paper),
        request.path_part(
            "fold",
            corner,
            vec![Point::new(0.0, 0.0), Point::new(fold, fold)],
            request.style().stroke_only(),
        ),
        request.path_part(
            "crease",
            corner,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, fold),
                Point::new(fold, fold),
            ],
            flap,
        ),
    ])
}

fn palette_color(token: &str) -> Result<Color, CompileError> {
    Color::new(token).map_err(|err| CompileError::new(ErrorKind::MalformedInput, err))
}
