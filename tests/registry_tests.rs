use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpmock::prelude::*;
use restaurants_mcp::tools::{GET_RESTAURANTS, SEARCH_LOCATIONS};
use restaurants_mcp::{
    CallError, CallErrorKind, Gateway, GatewayOptions, LocationResult, RapidApiGateway,
    ToolOutput, ToolRegistry,
};
use serde_json::{json, Map, Value};

#[derive(Clone, Default)]
struct MockGateway {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    failure: Option<CallError>,
}

impl MockGateway {
    fn failing(error: CallError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &str, arg: &str) -> Result<(), CallError> {
        self.calls
            .lock()
            .unwrap()
            .push((op.to_string(), arg.to_string()));
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn search_locations(&self, query: &str) -> Result<ToolOutput, CallError> {
        self.record("search_locations", query)?;
        Ok(ToolOutput::Locations(vec![LocationResult::new(
            "1", query, "Somewhere",
        )]))
    }

    async fn get_restaurants(&self, location_id: &str) -> Result<ToolOutput, CallError> {
        self.record("get_restaurants", location_id)?;
        Ok(ToolOutput::empty("No restaurants found for this location."))
    }
}

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_dispatches_by_name_with_trimmed_argument() {
    let gateway = MockGateway::default();
    let registry = ToolRegistry::new(gateway.clone());

    let output = registry
        .invoke(SEARCH_LOCATIONS, &args(json!({ "query": "  Paris " })))
        .await
        .unwrap();
    assert_eq!(output.locations()[0].name, "Paris");

    registry
        .invoke(GET_RESTAURANTS, &args(json!({ "location_id": "187147" })))
        .await
        .unwrap();

    assert_eq!(
        gateway.calls(),
        vec![
            ("search_locations".to_string(), "Paris".to_string()),
            ("get_restaurants".to_string(), "187147".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unknown_tool_is_rejected_without_calls() {
    let gateway = MockGateway::default();
    let registry = ToolRegistry::new(gateway.clone());

    let err = registry
        .invoke("book_table", &args(json!({ "query": "Paris" })))
        .await
        .unwrap_err();

    assert_eq!(err.kind, CallErrorKind::InvalidArgument);
    assert!(err.message.contains("book_table"));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_arguments_name_the_parameter() {
    let gateway = MockGateway::default();
    let registry = ToolRegistry::new(gateway.clone());

    for bad in [json!({}), json!({ "location_id": 187147 }), json!({ "location_id": "" })] {
        let err = registry
            .invoke(GET_RESTAURANTS, &args(bad))
            .await
            .unwrap_err();
        assert_eq!(err.kind, CallErrorKind::InvalidArgument);
        assert!(err.message.contains("location_id"));
    }
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_gateway_errors_pass_through_unchanged() {
    let error = CallError::auth_failure("upstream rejected the configured API key (HTTP 401)");
    let registry = ToolRegistry::new(MockGateway::failing(error.clone()));

    let err = registry
        .invoke(GET_RESTAURANTS, &args(json!({ "location_id": "187147" })))
        .await
        .unwrap_err();

    assert_eq!(err, error);
}

#[tokio::test]
async fn test_missing_location_id_issues_no_http_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let options = GatewayOptions::new("test-key", "test.p.rapidapi.com")
        .with_base_url(server.base_url());
    let registry = ToolRegistry::new(RapidApiGateway::new(options).unwrap());

    let err = registry
        .invoke(GET_RESTAURANTS, &args(json!({ "query": "Paris" })))
        .await
        .unwrap_err();

    assert_eq!(err.kind, CallErrorKind::InvalidArgument);
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_list_tools_is_static() {
    let registry = ToolRegistry::new(MockGateway::default());
    let names: Vec<&str> = registry.list_tools().iter().map(|t| t.name).collect();
    assert_eq!(names, vec![SEARCH_LOCATIONS, GET_RESTAURANTS]);
    assert_eq!(registry.list_tools(), registry.list_tools());
}
