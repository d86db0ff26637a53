//! Flat steps survive a trip through the tree document
//!
//! Only the fields the flat format defines are compared; anything that
//! exists only in the tree is dropped by the forward direction.

use funnel_document::{IdGenerator, NodeKind, NodeType};
use funnel_legacy::{
    create_legacy_editor_document, derive_legacy_payload_from_document, parse_legacy_steps,
    LegacyContent, LegacySnapshotPayload, LegacyStep,
};
use funnel_editor::EditorStore;
use serde_json::json;

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn sample_steps() -> Vec<LegacyStep> {
    vec![
        LegacyStep {
            id: "step-welcome".to_string(),
            order_index: 0,
            step_type: "welcome".to_string(),
            content: LegacyContent {
                headline: text("Grow your practice"),
                subheadline: text("Three questions, two minutes"),
                media_url: text("https://videos.example.com/intro.mp4"),
                button_label: text("Start"),
                ..Default::default()
            },
        },
        LegacyStep {
            id: "step-question".to_string(),
            order_index: 1,
            step_type: "question".to_string(),
            content: LegacyContent {
                headline: text("About you"),
                question: text("How many clients do you see per week?"),
                options: vec!["Under 10".to_string(), "10-30".to_string(), "Over 30".to_string()],
                button_label: text("Next"),
                ..Default::default()
            },
        },
        LegacyStep {
            id: "step-question-2".to_string(),
            order_index: 2,
            step_type: "question".to_string(),
            content: LegacyContent {
                subheadline: text("Pick all that apply"),
                options: vec!["Email".to_string()],
                ..Default::default()
            },
        },
        LegacyStep {
            id: "step-booking".to_string(),
            order_index: 3,
            step_type: "booking".to_string(),
            content: LegacyContent {
                headline: text("Book a call"),
                calendar_url: text("https://cal.example.com/team"),
                ..Default::default()
            },
        },
        LegacyStep {
            id: "step-thanks".to_string(),
            order_index: 4,
            step_type: "thank_you".to_string(),
            content: LegacyContent {
                headline: text("Thanks!"),
                button_label: text("Back to site"),
                ..Default::default()
            },
        },
    ]
}

#[test]
fn test_steps_round_trip_field_for_field() {
    let steps = sample_steps();
    let mut ids = IdGenerator::from_seed("rt");

    let doc = create_legacy_editor_document(&steps, &mut ids);
    let payload = derive_legacy_payload_from_document(&doc).unwrap();

    assert_eq!(payload, LegacySnapshotPayload::new(steps));
}

#[test]
fn test_one_based_legacy_funnel_round_trips() {
    let steps: Vec<LegacyStep> = sample_steps()
        .into_iter()
        .map(|step| LegacyStep {
            order_index: step.order_index + 1,
            ..step
        })
        .collect();
    let mut ids = IdGenerator::from_seed("rt");

    let doc = create_legacy_editor_document(&steps, &mut ids);
    let payload = derive_legacy_payload_from_document(&doc).unwrap();

    assert_eq!(payload, LegacySnapshotPayload::new(steps));
}

#[test]
fn test_aliased_step_types_round_trip_through_store() {
    let json = r#"[
        {"id":"s1","order_index":10,"step_type":"landing","content":{"headline":"Hi"}},
        {"id":"s2","order_index":20,"step_type":"capture","content":{"question":"Why?","options":["A","B"]}},
        {"id":"s3","order_index":30,"step_type":"appointment","content":{"calendar_url":"https://cal.example.com"}},
        {"id":"s4","order_index":40,"step_type":"thank-you","content":{}}
    ]"#;
    let steps = parse_legacy_steps(json).unwrap();
    let mut ids = IdGenerator::from_seed("rt");

    let store = EditorStore::from_document(create_legacy_editor_document(&steps, &mut ids));
    let saved = serde_json::to_string(&store.extract_document()).unwrap();
    let reloaded = serde_json::from_str(&saved).unwrap();
    let payload = derive_legacy_payload_from_document(&reloaded).unwrap();

    assert_eq!(payload.into_steps(), steps);
}

#[test]
fn test_hydrated_document_is_valid() {
    let mut ids = IdGenerator::from_seed("rt");
    let doc = create_legacy_editor_document(&sample_steps(), &mut ids);

    assert!(doc.validate().is_ok());
    assert_eq!(doc.pages.len(), 5);
}

#[test]
fn test_tree_only_props_are_dropped_by_forward_direction() {
    let mut ids = IdGenerator::from_seed("rt");
    let doc = create_legacy_editor_document(&sample_steps(), &mut ids);
    let mut store = EditorStore::from_document(doc);

    let heading_id = store
        .active_page()
        .and_then(|page| page.canvas_root.find_first(NodeType::Heading))
        .map(|node| node.id.clone())
        .unwrap();

    let mut props = serde_json::Map::new();
    props.insert("level".to_string(), json!(3));
    props.insert("color".to_string(), json!("#ff0000"));
    store.update_node_props(&heading_id, props).unwrap();

    let heading = store.find_node(&heading_id).unwrap();
    match &heading.kind {
        NodeKind::Heading(props) => assert_eq!(props.extra.get("color"), Some(&json!("#ff0000"))),
        other => panic!("unexpected kind {:?}", other),
    }

    let payload = derive_legacy_payload_from_document(&store.extract_document()).unwrap();
    assert_eq!(payload, LegacySnapshotPayload::new(sample_steps()));
}

#[test]
fn test_payload_serializes_as_flat_array() {
    let payload = LegacySnapshotPayload::new(sample_steps()[..1].to_vec());
    let value = serde_json::to_value(&payload).unwrap();

    assert_eq!(value[0]["step_type"], json!("welcome"));
    assert_eq!(value[0]["order_index"], json!(0));
    assert_eq!(value[0]["content"]["media_url"], json!("https://videos.example.com/intro.mp4"));
}
