//! # restaurants-mcp
//!
//! An MCP server that lets a language-model agent look up places and the
//! restaurants in them through a RapidAPI-hosted search service.
//!
//! ## Architecture
//!
//! Every tool call flows through three layers:
//!
//! 1. **[`server::RestaurantsServer`]** implements `rmcp::ServerHandler` and
//!    renders outcomes as tool results.
//! 2. **[`tools::ToolRegistry`]** owns the static tool catalogue, validates
//!    arguments against each tool's parameter table and dispatches by name.
//! 3. **[`Gateway`]** performs the outbound HTTP call, normalizes the payload
//!    and maps every failure to a [`CallError`]. [`RapidApiGateway`] is the
//!    production implementation.
//!
//! Nothing is cached or shared between calls apart from the pooled HTTP client.
//!
//! ## Example
//! ```no_run
//! use restaurants_mcp::{GatewayOptions, RapidApiGateway, ToolRegistry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = GatewayOptions::new("your-rapidapi-key", "tripadvisor16.p.rapidapi.com");
//!     let registry = ToolRegistry::new(RapidApiGateway::new(options)?);
//!
//!     let args = json!({ "query": "Paris" });
//!     let args = args.as_object().cloned().unwrap_or_default();
//!     match registry.invoke("search_locations", &args).await {
//!         Ok(output) => println!("{}", output.render()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod gateway;
pub mod http;
pub mod model;
pub mod options;
pub mod server;
pub mod tools;

pub use api::RapidApiGateway;
pub use gateway::{CallError, CallErrorKind, Gateway};
pub use model::{LocationResult, RestaurantResult, ToolOutput};
pub use options::{ConfigError, GatewayOptions, TransportOptions};
pub use server::RestaurantsServer;
pub use tools::{ParamKind, ParamSpec, ToolDescriptor, ToolRegistry};

// Re-export rmcp for convenience
pub use rmcp;
