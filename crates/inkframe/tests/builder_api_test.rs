//! Integration tests for the SceneBuilder API

use float_cmp::assert_approx_eq;
use inkframe::{
    InkframeError, SceneBuilder,
    color::Color,
    config::{AppConfig, StyleConfig},
    geometry::Point,
    primitive::{PrimitiveKind, Side},
    style::FillStyle,
};
use inkframe_core::error::ErrorKind;

fn compile_error_kind(result: Result<inkframe::Scene, InkframeError>) -> ErrorKind {
    match result {
        Err(InkframeError::Compile(err)) => err.kind(),
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn test_builder_api_exists() {
    let _builder = SceneBuilder::default();
    let _builder = SceneBuilder::new(AppConfig::default());
}

#[test]
fn test_users_db_cylinder() {
    let scene = SceneBuilder::default()
        .compile_json(
            r#"{"shapes": [{"id": "users", "type": "cylinder", "x": 600, "y": 200,
                            "width": 120, "height": 90, "label": "Users DB"}]}"#,
        )
        .expect("Failed to compile cylinder");

    assert_eq!(scene.len(), 3);
    let body = scene.get("users").unwrap();
    let lid = scene.get("users__lid").unwrap();
    let base = scene.get("users__base").unwrap();

    assert_eq!(body.kind(), &PrimitiveKind::Rectangle);
    assert_eq!(lid.kind(), &PrimitiveKind::Ellipse);
    assert_eq!(body.label(), Some("Users DB"));
    assert_eq!(lid.label(), None);
    assert_eq!(base.label(), None);

    let span = scene.bounds().unwrap();
    assert_approx_eq!(f32, span.width(), 120.0);
    assert_approx_eq!(f32, span.height(), 90.0);
    assert_approx_eq!(f32, span.min_y(), 200.0);
    for element in scene.elements() {
        assert_approx_eq!(f32, element.size().width(), 120.0);
    }
}

#[test]
fn test_connector_between_side_by_side_boxes() {
    let scene = SceneBuilder::default()
        .compile_json(
            r#"{
                "shapes": [
                    {"id": "a", "type": "rectangle", "x": 100, "y": 100, "width": 100, "height": 50},
                    {"id": "b", "type": "rectangle", "x": 500, "y": 100, "width": 100, "height": 50}
                ],
                "connectors": [{"from": "a", "to": "b"}]
            }"#,
        )
        .expect("Failed to compile connector");

    let arrow = &scene.connectors()[0];
    let connector = arrow.connector().unwrap();
    assert_eq!(connector.start_binding.as_ref().unwrap().side(), Side::Right);
    assert_eq!(connector.end_binding.as_ref().unwrap().side(), Side::Left);
    assert!(!connector.elbowed);

    assert_eq!(arrow.origin(), Point::new(200.0, 125.0));
    assert_eq!(arrow.points(), &[Point::new(0.0, 0.0), Point::new(300.0, 0.0)]);
}

#[test]
fn test_configured_accent_fills_semantic_shapes() {
    let config = AppConfig::new(
        StyleConfig::new("#1e1e1e", "#ff0000", 1),
        Default::default(),
        Default::default(),
        Default::default(),
    );
    let scene = SceneBuilder::new(config)
        .compile_json(
            r#"{"shapes": [
                {"id": "db", "type": "database", "x": 0, "y": 0},
                {"id": "net", "type": "cloud", "x": 300, "y": 0},
                {"id": "memo", "type": "note", "x": 600, "y": 0}
            ]}"#,
        )
        .unwrap();

    let background = |id: &str| scene.get(id).unwrap().style().background_color.clone();
    assert_eq!(background("db"), Color::new("#ff0000").unwrap());
    assert_eq!(background("db__lid"), Color::new("#ff0000").unwrap());
    assert_eq!(background("net__bump2"), Color::new("#ff0000").unwrap());
    // Notes keep their own paper color.
    assert_eq!(background("memo"), Color::new("#ffec99").unwrap());
}

#[test]
fn test_unresolved_reference() {
    let result = SceneBuilder::default().compile_json(
        r#"{"shapes": [{"id": "a"}], "connectors": [{"from": "a", "to": "z"}]}"#,
    );
    assert_eq!(compile_error_kind(result), ErrorKind::UnresolvedReference);
}

#[test]
fn test_every_attribute_is_emitted() {
    let builder = SceneBuilder::default();
    let scene = builder
        .compile_json(
            r##"{
                "shapes": [{"id": "a", "type": "diamond", "backgroundColor": "#ffc9c9"}],
                "connectors": [{"type": "line", "points": [[0, 0], [40, 40]]}]
            }"##,
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&builder.to_json(&scene).unwrap()).unwrap();

    for element in value.as_array().unwrap() {
        for key in [
            "strokeColor",
            "backgroundColor",
            "fillStyle",
            "strokeWidth",
            "strokeStyle",
            "roughness",
            "opacity",
            "angle",
            "seed",
        ] {
            assert!(element.get(key).is_some(), "{key} missing from {element}");
        }
    }
    assert_eq!(scene.get("a").unwrap().style().fill_style, FillStyle::Hachure);
}

#[test]
fn test_render_svg() {
    let builder = SceneBuilder::default();
    let scene = builder
        .compile_json(r#"{"shapes": [{"id": "c", "type": "cloud", "label": "Internet"}]}"#)
        .unwrap();
    let svg = builder.render_svg(&scene);

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("Internet"));
}

#[test]
fn test_invalid_json_returns_error() {
    let result = SceneBuilder::default().compile_json("{not json");
    assert!(matches!(result, Err(InkframeError::Json(_))));
}

#[test]
fn test_builder_reusability() {
    let builder = SceneBuilder::default();
    let first = builder.compile_json(r#"{"shapes": [{"id": "a"}]}"#).unwrap();
    let second = builder.compile_json(r#"{"shapes": [{"id": "a"}]}"#).unwrap();
    assert_eq!(first, second);
}
