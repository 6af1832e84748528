//! Integration tests for storyboard compilation

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use inkframe::{
    InkframeError, SceneBuilder, SceneCompiler,
    bridge::{BridgeError, ConvertResponse, MermaidBridge},
    config::StoryboardConfig,
    primitive::Draft,
    storyboard::{Storyboard, StoryboardCompiler},
};
use inkframe_core::error::ErrorKind;

const STORYBOARD: &str = r#"{
    "vocabulary": {
        "client": {"type": "actor", "label": "Client"},
        "api": {"type": "rectangle", "width": 160, "height": 80, "label": "API"},
        "users_db": {"type": "database", "width": 120, "height": 90, "label": "Users DB"}
    },
    "frames": [
        {
            "caption": "1. The client calls the API",
            "shapes": [
                {"entity": "client", "x": 0, "y": 100},
                {"entity": "api", "x": 300, "y": 115}
            ],
            "connectors": [{"from": "client", "to": "api", "label": "GET /users"}]
        },
        {
            "caption": "2. The API queries the database",
            "shapes": [
                {"entity": "client", "x": 0, "y": 100},
                {"entity": "api", "x": 300, "y": 115},
                {"entity": "users_db", "x": 650, "y": 110}
            ],
            "connectors": [
                {"from": "client", "to": "api"},
                {"from": "api", "to": "users_db", "label": "SELECT", "elbowed": true}
            ]
        },
        {
            "caption": "3. Rows come back",
            "shapes": [
                {"id": "api"},
                {"id": "users_db"}
            ],
            "connectors": [{"from": "users_db", "to": "api", "type": "line"}]
        }
    ]
}"#;

fn storyboard() -> Storyboard {
    serde_json::from_str(STORYBOARD).expect("Failed to decode storyboard")
}

fn compiler() -> StoryboardCompiler {
    StoryboardCompiler::new(SceneCompiler::default(), StoryboardConfig::default())
}

#[test]
fn test_vocabulary_entities_are_identical_across_frames() {
    let scenes = compiler().compile_frames(&storyboard()).unwrap();

    for id in ["client", "client__torso", "client__caption", "api"] {
        let first = serde_json::to_string(scenes[0].get(id).unwrap()).unwrap();
        let second = serde_json::to_string(scenes[1].get(id).unwrap()).unwrap();
        assert_eq!(first, second, "{id} differs between frames");
    }
}

#[test]
fn test_bare_id_references_an_entity() {
    let scenes = compiler().compile_frames(&storyboard()).unwrap();

    // Frame 3 names entities by id only and uses their declared shape.
    assert!(scenes[2].get("users_db__lid").is_some());
    assert_eq!(scenes[2].get("api").unwrap().label(), Some("API"));
}

#[test]
fn test_combined_scene_keeps_shapes_before_connectors() {
    let scene = SceneBuilder::default().compile_json(STORYBOARD).unwrap();

    let first_connector = scene
        .elements()
        .position(|element| element.kind().is_path() && element.connector().is_some())
        .unwrap();
    assert!(scene.elements().skip(first_connector).all(|e| e.connector().is_some()));
    assert_eq!(scene.connectors().len(), 4);

    let ids: Vec<&str> = scene.elements().map(|element| element.id()).collect();
    assert!(ids.iter().all(|id| id.starts_with('f')));
    assert!(ids.contains(&"f2_users_db__api__0"));
}

#[test]
fn test_frames_do_not_overlap() {
    let scene = SceneBuilder::default().compile_json(STORYBOARD).unwrap();
    let right_edge = |prefix: &str| {
        scene
            .elements()
            .filter(|element| element.id().starts_with(prefix))
            .filter_map(|element| element.bounds().ok())
            .map(|bounds| bounds.max_x())
            .fold(f32::MIN, f32::max)
    };
    let left_edge = |prefix: &str| {
        scene
            .elements()
            .filter(|element| element.id().starts_with(prefix))
            .filter_map(|element| element.bounds().ok())
            .map(|bounds| bounds.min_x())
            .fold(f32::MAX, f32::min)
    };

    assert!(right_edge("f0_") < left_edge("f1_"));
    assert!(right_edge("f1_") < left_edge("f2_"));
}

#[test]
fn test_unknown_entity_aborts_storyboard() {
    let result = SceneBuilder::default().compile_json(
        r#"{"vocabulary": {}, "frames": [{"shapes": [{"entity": "router"}]}]}"#,
    );
    match result {
        Err(InkframeError::Compile(err)) => {
            assert_eq!(err.kind(), ErrorKind::UnknownVocabularyKey);
            assert!(err.detail().contains("frame 0"));
        }
        other => panic!("expected UnknownVocabularyKey, got {other:?}"),
    }
}

/// A converter that answers with a fixed element list.
struct CannedBridge {
    response: &'static str,
    called: Arc<AtomicBool>,
}

impl MermaidBridge for CannedBridge {
    fn health(&self) -> bool {
        true
    }

    fn convert(&self, _mermaid: &str) -> Result<Vec<Draft>, BridgeError> {
        self.called.store(true, Ordering::SeqCst);
        let response: ConvertResponse =
            serde_json::from_str(self.response).map_err(|err| BridgeError::Decode(err.to_string()))?;
        response.into_drafts()
    }
}

#[test]
fn test_mermaid_frame_uses_bridge_output() {
    let called = Arc::new(AtomicBool::new(false));
    let builder = SceneBuilder::default().with_bridge(CannedBridge {
        response: r#"{"elements": [
            {"id": "A", "type": "rectangle", "x": 0, "y": 0, "width": 100, "height": 40},
            {"id": "B", "type": "rectangle", "x": 200, "y": 0, "width": 100, "height": 40},
            {"id": "A_B", "type": "arrow", "x": 100, "y": 20, "points": [[0, 0], [100, 0]],
             "startBinding": {"elementId": "A"}, "endBinding": {"elementId": "B"}}
        ]}"#,
        called: Arc::clone(&called),
    });

    let scene = builder
        .compile_json(r#"{"frames": [{"mermaid": "graph LR; A-->B", "shapes": [{"id": "fallback"}]}]}"#)
        .unwrap();

    assert!(called.load(Ordering::SeqCst));
    assert!(scene.get("f0_fallback").is_none());
    let arrow = scene.get("f0_A_B").unwrap();
    let binding = arrow.connector().unwrap().end_binding.as_ref().unwrap();
    assert_eq!(binding.element_id(), "f0_B");
    // Bridged paths come after bridged shapes.
    assert_eq!(scene.elements().last().unwrap().id(), "f0_A_B");
}

#[test]
fn test_undecodable_bridge_output_falls_back() {
    let builder = SceneBuilder::default().with_bridge(CannedBridge {
        response: "{\"elements\": 7}",
        called: Arc::new(AtomicBool::new(false)),
    });

    let scene = builder
        .compile_json(r#"{"frames": [{"mermaid": "graph LR; A-->B", "shapes": [{"id": "fallback"}]}]}"#)
        .unwrap();
    assert!(scene.get("f0_fallback").is_some());
}
