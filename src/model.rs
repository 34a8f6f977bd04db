//! Normalized records handed back to the calling model.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::gateway::CallErrorKind;

/// A place returned by `search_locations`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub location_id: String,
    pub name: String,
    /// Region or country, e.g. "France". Empty when the upstream omits it.
    pub secondary_label: String,
    pub place_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationResult {
    pub fn new(
        location_id: impl Into<String>,
        name: impl Into<String>,
        secondary_label: impl Into<String>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            name: name.into(),
            secondary_label: secondary_label.into(),
            place_type: None,
            latitude: None,
            longitude: None,
        }
    }
}

/// A restaurant returned by `get_restaurants`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantResult {
    pub name: String,
    pub rating: Option<f64>,
    #[serde(default)]
    pub cuisine: Vec<String>,
    pub price_level: Option<String>,
    pub address: Option<String>,
    pub review_count: Option<u64>,
    pub menu_url: Option<String>,
    pub open_status: Option<String>,
    pub is_premium: Option<bool>,
}

/// Successful outcome of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutput {
    Locations(Vec<LocationResult>),
    Restaurants(Vec<RestaurantResult>),
    /// The upstream had nothing to return. Not a failure.
    Empty { message: String },
}

impl ToolOutput {
    pub fn empty(message: impl Into<String>) -> Self {
        ToolOutput::Empty {
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ToolOutput::Locations(items) => items.is_empty(),
            ToolOutput::Restaurants(items) => items.is_empty(),
            ToolOutput::Empty { .. } => true,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ToolOutput::Locations(items) => items.len(),
            ToolOutput::Restaurants(items) => items.len(),
            ToolOutput::Empty { .. } => 0,
        }
    }

    /// Presentation tag for the empty outcome.
    pub fn kind(&self) -> Option<CallErrorKind> {
        match self {
            ToolOutput::Empty { .. } => Some(CallErrorKind::EmptyResult),
            _ => None,
        }
    }

    pub fn locations(&self) -> &[LocationResult] {
        match self {
            ToolOutput::Locations(items) => items,
            _ => &[],
        }
    }

    pub fn restaurants(&self) -> &[RestaurantResult] {
        match self {
            ToolOutput::Restaurants(items) => items,
            _ => &[],
        }
    }

    /// Text handed to the model: pretty JSON for records, the plain message
    /// for an empty outcome.
    pub fn render(&self) -> String {
        let rendered = match self {
            ToolOutput::Locations(items) => serde_json::to_string_pretty(items),
            ToolOutput::Restaurants(items) => serde_json::to_string_pretty(items),
            ToolOutput::Empty { message } => return message.clone(),
        };
        // Plain structs of strings and numbers always serialize.
        rendered.unwrap_or_else(|e| format!("failed to render result: {e}"))
    }
}
