use httpmock::prelude::*;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent};
use rmcp::ServiceExt;
use restaurants_mcp::api::rapidapi::SEARCH_RESTAURANTS_PATH;
use restaurants_mcp::{GatewayOptions, RapidApiGateway, RestaurantsServer};
use serde_json::json;

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_mcp_round_trip() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path(SEARCH_RESTAURANTS_PATH)
                .query_param("locationId", "187147");
            then.status(401).json_body(json!({ "message": "Invalid API key" }));
        })
        .await;

    let options =
        GatewayOptions::new("bad-key", "test.p.rapidapi.com").with_base_url(upstream.base_url());
    let server = RestaurantsServer::new(RapidApiGateway::new(options).unwrap());

    // In-memory transport between the MCP client and our server.
    let (client_transport, server_transport) = tokio::io::duplex(4096);
    tokio::spawn(async move {
        let service = server
            .serve(server_transport)
            .await
            .expect("Failed to start server");
        service.waiting().await.expect("Server error");
    });

    let client = ().serve(client_transport).await.unwrap();

    let tools = client.list_tools(None).await.unwrap().tools;
    let names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
    assert_eq!(names, vec!["search_locations", "get_restaurants"]);

    // Upstream auth failure arrives as an error result, not a protocol fault.
    let result = client
        .call_tool(CallToolRequestParam {
            name: "get_restaurants".into(),
            arguments: json!({ "location_id": "187147" }).as_object().cloned(),
        })
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).starts_with("AuthFailure:"));

    let result = client
        .call_tool(CallToolRequestParam {
            name: "get_restaurants".into(),
            arguments: None,
        })
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    assert!(text_of(&result).contains("location_id"));

    client.cancel().await.unwrap();
}
