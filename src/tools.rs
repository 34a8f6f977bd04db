//! Tool registry: the static catalogue of callable tools and invocation dispatch.
//!
//! Each tool is declared once as a [`ToolDescriptor`] whose [`ParamSpec`] table
//! drives both the advertised JSON Schema and argument validation, so the two
//! can never disagree.

use std::sync::Arc;

pub use rmcp::model::Tool;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::gateway::{CallError, Gateway};
use crate::model::ToolOutput;

pub const SEARCH_LOCATIONS: &str = "search_locations";
pub const GET_RESTAURANTS: &str = "get_restaurants";

/// Primitive JSON type a parameter must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
}

impl ParamKind {
    /// JSON Schema `type` keyword.
    pub fn json_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
        }
    }
}

/// One parameter of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

/// Name, description and parameter table of a callable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

static TOOLS: [ToolDescriptor; 2] = [
    ToolDescriptor {
        name: SEARCH_LOCATIONS,
        description: "Search for restaurant locations by name. Returns matching places \
                      with the location id to pass to get_restaurants.",
        params: &[ParamSpec {
            name: "query",
            kind: ParamKind::String,
            required: true,
            description: "The location to search for, for example \"Paris\" or \"Las Vegas\"",
        }],
    },
    ToolDescriptor {
        name: GET_RESTAURANTS,
        description: "Get restaurants for a specific location: name, rating, cuisines, \
                      price level and address.",
        params: &[ParamSpec {
            name: "location_id",
            kind: ParamKind::String,
            required: true,
            description: "The location id returned by search_locations",
        }],
    },
];

/// The full tool catalogue. Always the same two descriptors, in the same order.
pub fn list_tools() -> &'static [ToolDescriptor] {
    &TOOLS
}

/// Look up a descriptor by tool name.
pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|tool| tool.name == name)
}

impl ToolDescriptor {
    /// JSON Schema object describing the tool's arguments.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({ "type": p.kind.json_type(), "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema
    }

    /// Check `args` against the parameter table.
    ///
    /// Required parameters must be present and non-null, every supplied
    /// parameter must have the declared type, and required strings must not
    /// be blank. Unknown extra arguments are ignored.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<(), CallError> {
        for param in self.params {
            match args.get(param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(CallError::invalid_argument(format!(
                        "missing required parameter `{}` for tool `{}`",
                        param.name, self.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.kind.matches(value) => {
                    return Err(CallError::invalid_argument(format!(
                        "parameter `{}` must be a {}",
                        param.name,
                        param.kind.json_type()
                    )));
                }
                Some(Value::String(s)) if param.required && s.trim().is_empty() => {
                    return Err(CallError::invalid_argument(format!(
                        "parameter `{}` must not be empty",
                        param.name
                    )));
                }
                Some(_) => {}
            }
        }

        for key in args.keys() {
            if !self.params.iter().any(|p| p.name == key) {
                debug!("Ignoring unknown argument `{}` for tool `{}`", key, self.name);
            }
        }
        Ok(())
    }
}

impl From<&ToolDescriptor> for Tool {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Tool::new(
            descriptor.name,
            descriptor.description,
            Arc::new(descriptor.input_schema()),
        )
    }
}

/// Routes invocations to the matching [`Gateway`] operation.
#[derive(Debug, Clone)]
pub struct ToolRegistry<G> {
    gateway: G,
}

impl<G: Gateway> ToolRegistry<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// The tool catalogue; see [`list_tools`].
    pub fn list_tools(&self) -> &'static [ToolDescriptor] {
        list_tools()
    }

    /// Validate and dispatch one invocation.
    ///
    /// Unknown tools and bad arguments are rejected with
    /// `InvalidArgument` before the gateway is touched.
    pub async fn invoke(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<ToolOutput, CallError> {
        let descriptor = find_tool(name).ok_or_else(|| {
            warn!("Rejected call to unknown tool `{}`", name);
            CallError::invalid_argument(format!("unknown tool `{name}`"))
        })?;

        if let Err(e) = descriptor.validate(args) {
            warn!("Rejected call to `{}`: {}", name, e.message);
            return Err(e);
        }

        info!("Invoking tool `{}`", name);
        let result = match descriptor.name {
            SEARCH_LOCATIONS => {
                self.gateway
                    .search_locations(string_arg(args, "query")?)
                    .await
            }
            GET_RESTAURANTS => {
                self.gateway
                    .get_restaurants(string_arg(args, "location_id")?)
                    .await
            }
            other => Err(CallError::invalid_argument(format!("unknown tool `{other}`"))),
        };

        match &result {
            Ok(output) => info!("Tool `{}` returned {} result(s)", name, output.len()),
            Err(e) => warn!("Tool `{}` failed: {}", name, e),
        }
        result
    }
}

fn string_arg<'a>(args: &'a Map<String, Value>, name: &str) -> Result<&'a str, CallError> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or_else(|| CallError::invalid_argument(format!("parameter `{name}` must be a string")))
}
