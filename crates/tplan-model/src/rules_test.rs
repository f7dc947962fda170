use super::{Event, NamedRule, Rules};
use crate::rule::Rule;
use serde_json::json;

#[test]
fn trait_lists_do_not_populate_singular_slots() {
    let rules: Rules = serde_json::from_value(json!({
        "identify_traits": [
            {"name": "email", "rules": {"type": "string"}}
        ],
        "group_traits": [
            {"name": "plan", "rules": {"type": ["string", "null"]}}
        ]
    }))
    .expect("must decode");

    assert!(rules.identify.is_none());
    assert!(rules.group.is_none());
    assert_eq!(rules.identify_traits.len(), 1);
    assert_eq!(rules.group_traits[0].name, "plan");
    assert!(rules.uses_trait_lists());
}

#[test]
fn singular_slots_do_not_populate_trait_lists() {
    let rules: Rules = serde_json::from_value(json!({
        "identify": {
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": {"traits": {"type": "object"}}
        },
        "group": {}
    }))
    .expect("must decode");

    assert!(rules.identify_traits.is_empty());
    assert!(rules.group_traits.is_empty());
    assert!(!rules.uses_trait_lists());
    assert_eq!(rules.group, Some(Rule::default()));
    assert!(rules.identify.as_ref().expect("identify set").property("traits").is_some());
}

#[test]
fn wildcard_slot_is_kept_apart_from_missing_slot() {
    let rules: Rules = serde_json::from_value(json!({"global": {}})).expect("must decode");
    assert_eq!(rules.global, Some(Rule::default()));
    assert!(rules.identify.is_none());
    assert_eq!(
        serde_json::to_value(&rules).expect("must encode"),
        json!({"global": {}})
    );
}

#[test]
fn events_keep_their_order_and_default_version() {
    let rules: Rules = serde_json::from_value(json!({
        "events": [
            {"name": "Order Completed", "version": 3, "rules": {"type": "object"}},
            {"name": "Cart Viewed", "description": "viewed cart"}
        ]
    }))
    .expect("must decode");

    let names = rules.events.iter().map(|event| event.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Order Completed", "Cart Viewed"]);
    assert_eq!(rules.events[0].version, 3);
    assert_eq!(rules.events[1].version, 1);
    assert!(rules.events[1].rules.is_wildcard());
    assert_eq!(
        rules.event("Cart Viewed").map(|event| event.description.as_str()),
        Some("viewed cart")
    );
}

#[test]
fn full_bundle_roundtrips() {
    let rules = Rules {
        identify: Some(Rule::object().with_required("traits")),
        group: None,
        global: Some(Rule::object().with_schema("http://json-schema.org/draft-07/schema#")),
        events: vec![
            Event::new("Signed Up", Rule::object().with_required("properties"))
                .with_description("account created")
                .with_version(2),
        ],
        identify_traits: vec![NamedRule::new("email", Rule::default().with_type("string"))],
        group_traits: Vec::new(),
    };
    let encoded = serde_json::to_vec(&rules).expect("must encode");
    let decoded: Rules = serde_json::from_slice(&encoded).expect("must decode");
    assert_eq!(decoded, rules);
    assert!(Rules::default().is_empty());
    assert!(!decoded.is_empty());
}
