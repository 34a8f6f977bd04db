//! MCP server handler exposing the tool registry over `rmcp`.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::Map;

use crate::gateway::{CallError, Gateway};
use crate::model::ToolOutput;
use crate::tools::{Tool, ToolRegistry};

pub const SERVER_NAME: &str = "restaurants";

/// `rmcp` handler answering `tools/list` and `tools/call`.
///
/// Tool failures are reported as tool results with `is_error` set, never as
/// JSON-RPC errors, so the agent always receives something it can read.
#[derive(Debug, Clone)]
pub struct RestaurantsServer<G> {
    registry: ToolRegistry<G>,
}

impl<G: Gateway> RestaurantsServer<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            registry: ToolRegistry::new(gateway),
        }
    }

    /// The catalogue in `rmcp` form.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry.list_tools().iter().map(Tool::from).collect()
    }

    /// Run one invocation and render the outcome for the protocol.
    pub async fn call(&self, name: &str, args: &Map<String, serde_json::Value>) -> CallToolResult {
        render(self.registry.invoke(name, args).await)
    }
}

/// Turn a tool outcome into protocol content.
pub fn render(result: Result<ToolOutput, CallError>) -> CallToolResult {
    match result {
        Ok(output) => CallToolResult::success(vec![Content::text(output.render())]),
        Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
    }
}

impl<G: Gateway + 'static> ServerHandler for RestaurantsServer<G> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Call search_locations to find a place, then get_restaurants with its location_id."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let args = request.arguments.unwrap_or_default();
        Ok(self.call(&request.name, &args).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

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

    #[test]
    fn test_render_error_sets_flag() {
        let result = render(Err(CallError::auth_failure("HTTP 401")));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "AuthFailure: HTTP 401");
    }

    #[test]
    fn test_render_empty_is_success() {
        let result = render(Ok(ToolOutput::empty("No locations found matching your query.")));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "No locations found matching your query.");
    }
}
