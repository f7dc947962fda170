use super::{short_id, ResourceNameError, SourceName, TrackingPlanName};

#[test]
fn short_id_is_last_segment() {
    assert_eq!(short_id("workspaces/myworkspace/tracking-plans/rs_123"), "rs_123");
    assert_eq!(short_id("workspace/myworkspace/tracking-plans/rs_123"), "rs_123");
    assert_eq!(short_id("rs_123"), "rs_123");
    assert_eq!(short_id("workspaces/myworkspace/tracking-plans/"), "");
}

#[test]
fn tracking_plan_name_roundtrip() {
    let name = "workspaces/myworkspace/tracking-plans/rs_123"
        .parse::<TrackingPlanName>()
        .expect("must parse");
    assert_eq!(name.workspace, "myworkspace");
    assert_eq!(name.id, "rs_123");
    assert_eq!(name.to_string(), "workspaces/myworkspace/tracking-plans/rs_123");
}

#[test]
fn source_name_is_built_from_workspace_and_short_name() {
    let name = SourceName::new("myworkspace", "js");
    assert_eq!(name.to_string(), "workspaces/myworkspace/sources/js");
    assert_eq!(
        name.to_string().parse::<SourceName>().expect("must parse"),
        name
    );
}

#[test]
fn wrong_collection_is_rejected() {
    let err = "workspaces/myworkspace/sources/js"
        .parse::<TrackingPlanName>()
        .expect_err("must reject");
    assert!(matches!(err, ResourceNameError::Malformed { .. }));
}

#[test]
fn empty_segments_are_rejected() {
    let err = "workspaces//tracking-plans/rs_1"
        .parse::<TrackingPlanName>()
        .expect_err("must reject");
    assert_eq!(
        err,
        ResourceNameError::EmptySegment {
            name: "workspaces//tracking-plans/rs_1".to_string(),
            segment: "workspace",
        }
    );
}
