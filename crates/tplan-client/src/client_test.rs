use super::TrackingPlanClient;
use crate::error::ClientError;
use crate::transport::{Method, Transport, TransportError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tplan_model::{Rule, RuleType, Rules, TrackingPlan};

#[derive(Debug, Clone, PartialEq)]
struct RecordedRequest {
    method: Method,
    path: String,
    body: Option<Value>,
}

struct ScriptedTransport {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
}

impl Transport for ScriptedTransport {
    fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().expect("must lock").push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.map(|bytes| serde_json::from_slice(bytes).expect("body must be json")),
        });
        self.responses
            .lock()
            .expect("must lock")
            .pop_front()
            .unwrap_or_else(|| Ok(b"{}".to_vec()))
    }
}

fn client_with(
    responses: Vec<Result<Vec<u8>, TransportError>>,
) -> (TrackingPlanClient, Arc<Mutex<Vec<RecordedRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport {
        requests: requests.clone(),
        responses: Mutex::new(responses.into()),
    };
    (TrackingPlanClient::new(Box::new(transport)), requests)
}

fn ok_json(value: Value) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(&value).expect("fixture must encode"))
}

fn not_found(method: Method, path: &str) -> Result<Vec<u8>, TransportError> {
    Err(TransportError::Status {
        method,
        path: path.to_string(),
        status: 404,
        body: r#"{"error":"not found"}"#.to_string(),
    })
}

#[test]
fn list_tracking_plans_decodes_single_plan_and_derives_short_id() {
    let (client, requests) = client_with(vec![ok_json(json!({
        "tracking_plans": [
            {
                "name": "workspaces/myworkspace/tracking-plans/rs_123",
                "display_name": "Kicks App",
                "rules": {"events": []},
                "create_time": "2019-02-05T00:28:31Z",
                "update_time": "2019-02-05T00:28:31Z"
            }
        ]
    }))]);

    let plans = client
        .list_tracking_plans("myworkspace")
        .expect("list must succeed");

    assert_eq!(plans.len(), 1);
    assert_eq!(plans.tracking_plans[0].id(), "rs_123");
    assert_eq!(plans.tracking_plans[0].display_name, "Kicks App");

    let requests = requests.lock().expect("must lock");
    assert_eq!(
        requests.as_slice(),
        &[RecordedRequest {
            method: Method::Get,
            path: "/workspaces/myworkspace/tracking-plans".to_string(),
            body: None,
        }]
    );
}

#[test]
fn get_tracking_plan_uses_item_path() {
    let (client, requests) = client_with(vec![ok_json(json!({
        "name": "workspaces/myworkspace/tracking-plans/rs_123",
        "display_name": "Kicks App",
        "rules": {
            "global": {"type": ["object", "null"]}
        }
    }))]);

    let plan = client
        .get_tracking_plan("myworkspace", "rs_123")
        .expect("get must succeed");
    assert_eq!(
        plan.rules.global.and_then(|rule| rule.rule_type.clone()),
        Some(RuleType::Many(vec!["object".to_string(), "null".to_string()]))
    );
    assert_eq!(
        requests.lock().expect("must lock")[0].path,
        "/workspaces/myworkspace/tracking-plans/rs_123"
    );
}

#[test]
fn get_tracking_plan_surfaces_not_found() {
    let path = "/workspaces/myworkspace/tracking-plans/rs_missing";
    let (client, _) = client_with(vec![not_found(Method::Get, path)]);

    let error = client
        .get_tracking_plan("myworkspace", "rs_missing")
        .expect_err("must fail");
    assert!(error.is_not_found());
    assert!(matches!(error, ClientError::Transport(TransportError::Status { status: 404, .. })));
}

#[test]
fn create_tracking_plan_posts_envelope_and_decodes_server_plan() {
    let (client, requests) = client_with(vec![ok_json(json!({
        "name": "workspaces/myworkspace/tracking-plans/rs_new",
        "display_name": "Kicks App",
        "rules": {"identify": {"type": "object"}},
        "create_time": "2023-01-01T10:00:00Z",
        "update_time": "2023-01-01T10:00:00Z"
    }))]);

    let rules = Rules {
        identify: Some(Rule::object()),
        ..Rules::default()
    };
    let plan = client
        .create_tracking_plan("myworkspace", "Kicks App", rules)
        .expect("create must succeed");
    assert_eq!(plan.id(), "rs_new");
    assert!(plan.create_time.is_some());

    let requests = requests.lock().expect("must lock");
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/workspaces/myworkspace/tracking-plans");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "tracking_plan": {
                "display_name": "Kicks App",
                "rules": {"identify": {"type": "object"}}
            }
        }))
    );
}

#[test]
fn update_tracking_plan_sends_mask_exactly_as_given() {
    let (client, requests) = client_with(vec![ok_json(json!({
        "name": "workspaces/myworkspace/tracking-plans/rs_123",
        "display_name": "Renamed"
    }))]);

    let plan = TrackingPlan {
        name: "workspaces/myworkspace/tracking-plans/rs_123".to_string(),
        display_name: "Renamed".to_string(),
        rules: Rules {
            global: Some(Rule::object().with_required("context")),
            events: vec![tplan_model::Event::new("Order Completed", Rule::object())],
            ..Rules::default()
        },
        ..TrackingPlan::default()
    };
    let updated = client
        .update_tracking_plan(
            "myworkspace",
            "rs_123",
            vec!["tracking_plan.display_name".to_string()],
            plan,
        )
        .expect("update must succeed");
    assert_eq!(updated.display_name, "Renamed");

    let requests = requests.lock().expect("must lock");
    assert_eq!(requests[0].method, Method::Put);
    assert_eq!(requests[0].path, "/workspaces/myworkspace/tracking-plans/rs_123");
    let body = requests[0].body.as_ref().expect("body must be sent");
    assert_eq!(
        body["update_mask"]["paths"],
        json!(["tracking_plan.display_name"])
    );
    assert_eq!(body["tracking_plan"]["rules"]["events"][0]["name"], json!("Order Completed"));
}

#[test]
fn delete_tracking_plan_ignores_response_body() {
    let (client, requests) = client_with(vec![Ok(Vec::new())]);

    client
        .delete_tracking_plan("myworkspace", "rs_123")
        .expect("delete must succeed");
    let requests = requests.lock().expect("must lock");
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(requests[0].body, None);
}

#[test]
fn delete_of_missing_plan_is_not_a_silent_success() {
    let path = "/workspaces/myworkspace/tracking-plans/rs_gone";
    let (client, _) = client_with(vec![not_found(Method::Delete, path)]);

    let error = client
        .delete_tracking_plan("myworkspace", "rs_gone")
        .expect_err("must fail");
    assert!(error.is_not_found());
}

#[test]
fn create_source_connection_qualifies_short_source_name() {
    let (client, requests) = client_with(vec![ok_json(json!({
        "source_name": "workspaces/myworkspace/sources/js",
        "tracking_plan_id": "rs_123"
    }))]);

    let connection = client
        .create_source_connection("myworkspace", "rs_123", "js")
        .expect("connect must succeed");
    assert_eq!(connection.source(), "js");
    assert_eq!(connection.tracking_plan_id, "rs_123");

    let requests = requests.lock().expect("must lock");
    assert_eq!(
        requests[0].path,
        "/workspaces/myworkspace/tracking-plans/rs_123/source-connections"
    );
    assert_eq!(
        requests[0].body,
        Some(json!({"source_name": "workspaces/myworkspace/sources/js"}))
    );
}

#[test]
fn create_source_connection_keeps_qualified_source_name() {
    let (client, requests) = client_with(vec![ok_json(json!({
        "source_name": "workspaces/other/sources/ios",
        "tracking_plan_id": "rs_123"
    }))]);

    client
        .create_source_connection("myworkspace", "rs_123", "workspaces/other/sources/ios")
        .expect("connect must succeed");
    assert_eq!(
        requests.lock().expect("must lock")[0].body,
        Some(json!({"source_name": "workspaces/other/sources/ios"}))
    );
}

#[test]
fn list_source_connections_decodes_connections() {
    let (client, _) = client_with(vec![ok_json(json!({
        "connections": [
            {"source_name": "workspaces/myworkspace/sources/js", "tracking_plan_id": "rs_123"},
            {"source_name": "workspaces/myworkspace/sources/ios", "tracking_plan_id": "rs_123"}
        ]
    }))]);

    let connections = client
        .list_source_connections("myworkspace", "rs_123")
        .expect("list must succeed");
    assert_eq!(connections.sources(), vec!["js", "ios"]);
}

#[test]
fn delete_source_connection_addresses_sub_item() {
    let (client, requests) = client_with(vec![Ok(b"{}".to_vec())]);

    client
        .delete_source_connection("myworkspace", "rs_123", "workspaces/myworkspace/sources/js")
        .expect("disconnect must succeed");
    let requests = requests.lock().expect("must lock");
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(
        requests[0].path,
        "/workspaces/myworkspace/tracking-plans/rs_123/source-connections/js"
    );
}

#[test]
fn delete_source_connection_surfaces_not_found() {
    let path = "/workspaces/myworkspace/tracking-plans/rs_123/source-connections/js";
    let (client, _) = client_with(vec![not_found(Method::Delete, path)]);

    let error = client
        .delete_source_connection("myworkspace", "rs_123", "js")
        .expect_err("must fail");
    assert!(error.is_not_found());
}

#[test]
fn decode_failure_names_operation_target_and_field() {
    let (client, _) = client_with(vec![ok_json(json!({
        "name": "workspaces/myworkspace/tracking-plans/rs_123",
        "rules": {"identify": {"required": "email"}}
    }))]);

    let error = client
        .get_tracking_plan("myworkspace", "rs_123")
        .expect_err("must fail");
    match &error {
        ClientError::Decode {
            operation,
            target,
            path,
            ..
        } => {
            assert_eq!(*operation, "get_tracking_plan");
            assert_eq!(*target, "tracking plan");
            assert_eq!(path.to_string(), "$.rules.identify.required");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
    assert_eq!(error.operation(), Some("get_tracking_plan"));
    assert!(error.to_string().starts_with("get_tracking_plan: failed to decode tracking plan"));
}

#[test]
fn transport_errors_pass_through_unchanged() {
    let timeout = TransportError::Timeout {
        method: Method::Get,
        path: "/workspaces/myworkspace/tracking-plans".to_string(),
        timeout_ms: 50,
    };
    let (client, _) = client_with(vec![Err(timeout.clone())]);

    let error = client
        .list_tracking_plans("myworkspace")
        .expect_err("must fail");
    match error {
        ClientError::Transport(inner) => assert_eq!(inner, timeout),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn empty_identifiers_fail_before_any_request() {
    let (client, requests) = client_with(Vec::new());

    let error = client
        .get_tracking_plan("myworkspace", "")
        .expect_err("must fail");
    assert!(matches!(
        error,
        ClientError::Precondition {
            operation: "get_tracking_plan",
            field: "id"
        }
    ));
    let error = client
        .create_source_connection("myworkspace", "rs_123", " ")
        .expect_err("must fail");
    assert!(matches!(
        error,
        ClientError::Precondition {
            field: "source_name",
            ..
        }
    ));
    assert!(client.list_tracking_plans("").is_err());
    assert!(requests.lock().expect("must lock").is_empty());
}

#[test]
fn full_plan_name_is_reduced_to_short_id() {
    let (client, requests) = client_with(vec![
        ok_json(json!({"name": "workspaces/myworkspace/tracking-plans/rs_123"})),
        Ok(Vec::new()),
    ]);

    let plan = client
        .get_tracking_plan("myworkspace", "workspaces/myworkspace/tracking-plans/rs_123")
        .expect("get must succeed");
    client
        .delete_tracking_plan("myworkspace", &plan.name)
        .expect("delete must succeed");

    let requests = requests.lock().expect("must lock");
    assert_eq!(requests[0].path, "/workspaces/myworkspace/tracking-plans/rs_123");
    assert_eq!(requests[1].path, "/workspaces/myworkspace/tracking-plans/rs_123");
}

#[test]
fn identifiers_with_path_separators_are_rejected() {
    let (client, requests) = client_with(Vec::new());

    for id in ["rs_1/source-connections", "rs_1?x=1", "rs_1#top", "tracking-plans/rs_1"] {
        let error = client
            .get_tracking_plan("myworkspace", id)
            .expect_err("must fail");
        assert!(
            matches!(error, ClientError::Precondition { field: "id", .. }),
            "unexpected error for `{id}`: {error:?}"
        );
    }
    assert!(matches!(
        client.list_tracking_plans("workspaces/myworkspace"),
        Err(ClientError::Precondition {
            field: "workspace",
            ..
        })
    ));
    assert!(matches!(
        client.create_source_connection("myworkspace", "rs_1", "js?x"),
        Err(ClientError::Precondition {
            field: "source_name",
            ..
        })
    ));
    assert!(matches!(
        client.delete_source_connection("myworkspace", "rs_1", "sources/js"),
        Err(ClientError::Precondition {
            field: "source_name",
            ..
        })
    ));
    assert!(requests.lock().expect("must lock").is_empty());
}

struct BodySizeTransport {
    body_len: Arc<Mutex<Option<usize>>>,
}

impl Transport for BodySizeTransport {
    fn do_request(
        &self,
        _method: Method,
        _path: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, TransportError> {
        *self.body_len.lock().expect("must lock") = body.map(<[u8]>::len);
        Ok(br#"{"name": "workspaces/myworkspace/tracking-plans/rs_deep"}"#.to_vec())
    }
}

#[test]
fn create_tracking_plan_sends_very_deep_rules() {
    let body_len = Arc::new(Mutex::new(None));
    let client = TrackingPlanClient::new(Box::new(BodySizeTransport {
        body_len: body_len.clone(),
    }));

    let mut global = Rule::default();
    for _ in 0..20_000 {
        global = Rule::default().with_property("a", global);
    }
    let rules = Rules {
        global: Some(global),
        ..Rules::default()
    };

    let plan = client
        .create_tracking_plan("myworkspace", "Deep", rules)
        .expect("create must succeed");
    assert_eq!(plan.id(), "rs_deep");
    let sent = body_len.lock().expect("must lock").expect("body must be sent");
    assert!(sent > 20_000 * r#"{"properties":{"a":"#.len());
}
