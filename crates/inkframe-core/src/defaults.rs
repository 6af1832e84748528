//! The style defaulter.
//!
//! [`apply_defaults`] turns a [`Draft`] into an [`Element`] by filling every
//! omitted style attribute from a fixed table and the scene's shared style.
//! Explicit values always win, and the result is a fixed point: feeding an
//! element back through the defaulter changes nothing.

use log::trace;

use crate::{
    color::Color,
    primitive::{Draft, Element},
    style::{FillStyle, ResolvedStyle, SceneDefaults, StrokeStyle, Style},
};

pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;
pub const DEFAULT_OPACITY: u8 = 100;
pub const DEFAULT_ANGLE: f32 = 0.0;
pub const DEFAULT_FONT_SIZE: f32 = 20.0;

/// Fills every unset style attribute of `draft`.
///
/// | Attribute | Default |
/// |-----------|---------|
/// | `strokeColor` | the scene's shared stroke color |
/// | `backgroundColor` | `transparent` |
/// | `fillStyle` | `hachure` if a visible background was provided, else `solid` |
/// | `strokeStyle` | `solid` |
/// | `strokeWidth` | 1 |
/// | `roughness` | the scene's shared roughness |
/// | `opacity` | 100 |
/// | `angle` | 0 |
/// | `fontSize` | 20 |
/// | `seed` | hash of the primitive's shape, label and provided style |
///
/// # Examples
///
/// ```
/// # use inkframe_core::{
/// #     color::Color,
/// #     defaults::apply_defaults,
/// #     geometry::{Point, Size},
/// #     primitive::{Draft, PrimitiveKind},
/// #     style::{FillStyle, SceneDefaults, Style},
/// # };
/// let draft = Draft::bounded("box", PrimitiveKind::Rectangle, Point::default(), Size::new(100.0, 50.0))
///     .with_style(Style {
///         background_color: Some(Color::new("#a5d8ff").unwrap()),
///         ..Style::default()
///     });
///
/// let element = apply_defaults(draft, &SceneDefaults::default());
/// assert_eq!(element.style().fill_style, FillStyle::Hachure);
/// assert_eq!(element.style().stroke_width, 1.0);
/// ```
pub fn apply_defaults(draft: Draft, defaults: &SceneDefaults) -> Element {
    let seed = draft.style().seed.unwrap_or_else(|| content_seed(&draft));
    let element = draft.map_style(|style| resolve(style, defaults, seed));
    trace!(id = element.id(), seed; "Applied style defaults");
    element
}

fn resolve(style: Style, defaults: &SceneDefaults, seed: u32) -> ResolvedStyle {
    let fill_style = style.fill_style.unwrap_or(match &style.background_color {
        Some(background) if !background.is_transparent() => FillStyle::Hachure,
        _ => FillStyle::Solid,
    });

    ResolvedStyle {
        stroke_color: style
            .stroke_color
            .unwrap_or_else(|| defaults.stroke_color().clone()),
        background_color: style.background_color.unwrap_or_else(Color::transparent),
        fill_style,
        stroke_style: style.stroke_style.unwrap_or(StrokeStyle::Solid),
        stroke_width: style.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
        roughness: style.roughness.unwrap_or(defaults.roughness()),
        opacity: style.opacity.unwrap_or(DEFAULT_OPACITY),
        angle: style.angle.unwrap_or(DEFAULT_ANGLE),
        font_size: style.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        seed,
    }
}

/// Derives a rendering seed from everything that makes a primitive look the
/// way it does, except its id and position.
///
/// The same entity placed anywhere, in any frame, gets the same seed and so
/// the same hand-drawn jitter.
fn content_seed(draft: &Draft) -> u32 {
    let size = draft.size();
    let fingerprint = format!(
        "{}|{}|{}|{:?}|{:?}|{:?}",
        draft.kind(),
        size.width().to_bits(),
        size.height().to_bits(),
        draft.points(),
        draft.label(),
        draft.style(),
    );
    fnv1a(fingerprint.as_bytes())
}

fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        geometry::{Point, Size},
        primitive::PrimitiveKind,
        style::Roughness,
    };

    fn rect(style: Style) -> Draft {
        Draft::bounded(
            "r",
            PrimitiveKind::Rectangle,
            Point::new(10.0, 10.0),
            Size::new(100.0, 60.0),
        )
        .with_style(style)
    }

    fn shared() -> SceneDefaults {
        SceneDefaults::new(
            Color::new("#343a40").unwrap(),
            Color::new("#a5d8ff").unwrap(),
            Roughness::Cartoonist,
        )
    }

    #[test]
    fn test_empty_style_gets_every_default() {
        let element = apply_defaults(rect(Style::default()), &shared());
        let style = element.style();

        assert_eq!(style.stroke_color.as_str(), "#343a40");
        assert!(style.background_color.is_transparent());
        assert_eq!(style.fill_style, FillStyle::Solid);
        assert_eq!(style.stroke_style, StrokeStyle::Solid);
        assert_approx_eq!(f32, style.stroke_width, 1.0);
        assert_eq!(style.roughness, Roughness::Cartoonist);
        assert_eq!(style.opacity, 100);
        assert_approx_eq!(f32, style.angle, 0.0);
        assert_approx_eq!(f32, style.font_size, 20.0);
    }

    #[test]
    fn test_background_switches_fill_to_hachure() {
        let style = Style {
            background_color: Some(Color::new("#ffec99").unwrap()),
            ..Style::default()
        };
        let element = apply_defaults(rect(style), &shared());
        assert_eq!(element.style().fill_style, FillStyle::Hachure);
    }

    #[test]
    fn test_transparent_background_keeps_solid_fill() {
        let style = Style {
            background_color: Some(Color::transparent()),
            ..Style::default()
        };
        let element = apply_defaults(rect(style), &shared());
        assert_eq!(element.style().fill_style, FillStyle::Solid);
    }

    #[test]
    fn test_explicit_values_win() {
        let style = Style {
            stroke_color: Some(Color::new("#e03131").unwrap()),
            background_color: Some(Color::new("#ffec99").unwrap()),
            fill_style: Some(FillStyle::CrossHatch),
            roughness: Some(Roughness::Architect),
            stroke_width: Some(4.0),
            opacity: Some(40),
            seed: Some(7),
            ..Style::default()
        };
        let element = apply_defaults(rect(style), &shared());
        let style = element.style();

        assert_eq!(style.stroke_color.as_str(), "#e03131");
        assert_eq!(style.fill_style, FillStyle::CrossHatch);
        assert_eq!(style.roughness, Roughness::Architect);
        assert_approx_eq!(f32, style.stroke_width, 4.0);
        assert_eq!(style.opacity, 40);
        assert_eq!(style.seed, 7);
    }

    #[test]
    fn test_seed_ignores_id_and_position() {
        let a = Draft::bounded(
            "a",
            PrimitiveKind::Ellipse,
            Point::new(0.0, 0.0),
            Size::new(40.0, 40.0),
        );
        let b = Draft::bounded(
            "b",
            PrimitiveKind::Ellipse,
            Point::new(500.0, 300.0),
            Size::new(40.0, 40.0),
        );
        let c = Draft::bounded(
            "c",
            PrimitiveKind::Ellipse,
            Point::new(0.0, 0.0),
            Size::new(41.0, 40.0),
        );

        let seed_a = apply_defaults(a, &shared()).style().seed;
        let seed_b = apply_defaults(b, &shared()).style().seed;
        let seed_c = apply_defaults(c, &shared()).style().seed;

        assert_eq!(seed_a, seed_b);
        assert_ne!(seed_a, seed_c);
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
    }
}
