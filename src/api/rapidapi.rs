//! RapidAPI restaurant search gateway.
//!
//! Issues one GET per tool call against the restaurant endpoints, maps HTTP
//! and transport failures onto [`CallError`], and flattens the upstream
//! records into [`LocationResult`] / [`RestaurantResult`].
//!
//! The upstream is loose about field presence and types (ids arrive as
//! strings or numbers, ratings sometimes as strings), so every record field is
//! decoded with `DefaultOnError` and missing data is defaulted rather than
//! failing the whole call.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};
use tracing::{error, info, warn};

use crate::gateway::{CallError, Gateway};
use crate::http::{add_extra_headers, build_http_client, excerpt, ResponseExt};
use crate::model::{LocationResult, RestaurantResult, ToolOutput};
use crate::options::{ConfigError, GatewayOptions};

pub const SEARCH_LOCATION_PATH: &str = "/api/v1/restaurant/searchLocation";
pub const SEARCH_RESTAURANTS_PATH: &str = "/api/v1/restaurant/searchRestaurants";

pub const KEY_HEADER: &str = "X-RapidAPI-Key";
pub const HOST_HEADER: &str = "X-RapidAPI-Host";

pub const NO_LOCATIONS: &str = "No locations found matching your query.";
pub const NO_RESTAURANTS: &str = "No restaurants found for this location.";

/// Gateway backed by the RapidAPI restaurant search service.
#[derive(Debug, Clone)]
pub struct RapidApiGateway {
    options: GatewayOptions,
    http: reqwest::Client,
    api_key: HeaderValue,
    host: HeaderValue,
}

impl RapidApiGateway {
    /// Build the gateway and its pooled HTTP client.
    ///
    /// Fails if the credential cannot be sent as a header or the client cannot
    /// be constructed; both are startup problems, not per-call ones.
    pub fn new(options: GatewayOptions) -> Result<Self, ConfigError> {
        let mut api_key = HeaderValue::from_str(&options.api_key).map_err(|_| ConfigError::Invalid {
            name: "KEY",
            reason: "not a valid header value".to_string(),
        })?;
        api_key.set_sensitive(true);

        let host = HeaderValue::from_str(&options.host).map_err(|_| ConfigError::Invalid {
            name: "HOST",
            reason: "not a valid header value".to_string(),
        })?;

        let http = build_http_client(&options.transport)?;

        Ok(Self {
            options,
            http,
            api_key,
            host,
        })
    }

    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Payload, CallError> {
        let url = format!("{}{}", self.options.origin(), path);
        info!("Calling API request to {} with params: {:?}", path, params);

        let mut req = self
            .http
            .get(&url)
            .header(KEY_HEADER, self.api_key.clone())
            .header(HOST_HEADER, self.host.clone())
            .query(params);
        req = add_extra_headers(req, &self.options.transport);

        let response = req.send().await.map_err(|e| {
            error!("API request to {} failed: {}", path, e);
            CallError::from(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            return Err(Self::handle_error_response(path, status, &body));
        }

        let raw = response.text_logged().await.map_err(|e| {
            error!("Reading response body from {} failed: {}", path, e);
            CallError::from(e)
        })?;

        match serde_json::from_str::<Value>(&raw) {
            Ok(json) => {
                info!("API request to {} successful", path);
                Ok(Payload { json, raw })
            }
            Err(e) => {
                warn!(
                    "Response from {} is not JSON ({}): {}",
                    path,
                    e,
                    excerpt(&raw)
                );
                Err(CallError::malformed("upstream returned a body that is not JSON"))
            }
        }
    }

    fn handle_error_response(path: &str, status: StatusCode, body: &str) -> CallError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("API request to {} rejected credentials: HTTP {}", path, status);
                let mut message = format!(
                    "upstream rejected the configured API key (HTTP {})",
                    status.as_u16()
                );
                if let Some(detail) = upstream_message(body) {
                    message.push_str(": ");
                    message.push_str(&detail);
                }
                CallError::auth_failure(message)
            }
            _ => {
                error!("API request to {} failed: HTTP {}: {}", path, status, excerpt(body));
                CallError::unavailable(format!("upstream returned HTTP {}", status))
            }
        }
    }
}

#[async_trait]
impl Gateway for RapidApiGateway {
    async fn search_locations(&self, query: &str) -> Result<ToolOutput, CallError> {
        info!("Searching for locations with query: {}", query);
        let payload = self
            .fetch(SEARCH_LOCATION_PATH, &[("query", query)])
            .await?;

        let records = payload.records(|json| json.get("data"))?;
        info!("Found {} locations for query: {}", records.len(), query);
        if records.is_empty() {
            return Ok(ToolOutput::empty(NO_LOCATIONS));
        }

        let locations: Vec<LocationResult> = records
            .iter()
            .filter_map(|record| {
                let raw: RawLocation = serde_json::from_value(record.clone()).unwrap_or_default();
                let location = raw.normalize();
                if location.is_none() {
                    warn!("Dropping location without an id: {}", excerpt(&record.to_string()));
                }
                location
            })
            .collect();

        if locations.is_empty() {
            return Err(payload.malformed("no location record carried a location id"));
        }
        Ok(ToolOutput::Locations(locations))
    }

    async fn get_restaurants(&self, location_id: &str) -> Result<ToolOutput, CallError> {
        info!("Getting restaurants for location_id: {}", location_id);
        let payload = self
            .fetch(SEARCH_RESTAURANTS_PATH, &[("locationId", location_id)])
            .await?;

        // Some plans wrap the list one level deeper as `data.data`.
        let records = payload.records(|json| {
            json.get("data").and_then(|data| match data {
                Value::Object(inner) => inner.get("data"),
                other => Some(other),
            })
        })?;
        info!("Found {} restaurants for location: {}", records.len(), location_id);
        if records.is_empty() {
            return Ok(ToolOutput::empty(NO_RESTAURANTS));
        }

        let restaurants: Vec<RestaurantResult> = records
            .iter()
            .filter(|record| {
                if !record.is_object() {
                    warn!(
                        "Dropping restaurant record that is not an object: {}",
                        excerpt(&record.to_string())
                    );
                }
                record.is_object()
            })
            .take(self.options.max_restaurants)
            .map(|record| {
                serde_json::from_value::<RawRestaurant>(record.clone())
                    .unwrap_or_default()
                    .normalize()
            })
            .collect();

        if restaurants.is_empty() {
            return Err(payload.malformed("no restaurant record was an object"));
        }
        Ok(ToolOutput::Restaurants(restaurants))
    }
}

/// A successfully parsed upstream body, kept alongside its raw text for
/// diagnostics.
struct Payload {
    json: Value,
    raw: String,
}

impl Payload {
    fn records<'a, F>(&'a self, locate: F) -> Result<&'a [Value], CallError>
    where
        F: FnOnce(&'a Value) -> Option<&'a Value>,
    {
        match locate(&self.json).and_then(Value::as_array) {
            Some(items) => Ok(items),
            None => {
                let detail = match self.json.get("message").and_then(Value::as_str) {
                    Some(message) => format!("expected a result array (upstream said: {message})"),
                    None => "expected a result array under `data`".to_string(),
                };
                Err(self.malformed(&detail))
            }
        }
    }

    fn malformed(&self, detail: &str) -> CallError {
        warn!("Unexpected response format from API ({}): {}", detail, excerpt(&self.raw));
        CallError::malformed(format!("unexpected response format from the API: {detail}"))
    }
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTag {
    Text(String),
    Named { name: String },
}

impl From<RawTag> for String {
    fn from(tag: RawTag) -> Self {
        match tag {
            RawTag::Text(s) => s,
            RawTag::Named { name } => name,
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdditionalNames {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    long_only_hierarchy: Option<String>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    location_id: Option<RawId>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    localized_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    secondary_label: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    localized_additional_names: Option<RawAdditionalNames>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    place_type: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    latitude: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    longitude: Option<f64>,
}

impl RawLocation {
    /// `None` when the record has no usable id.
    fn normalize(self) -> Option<LocationResult> {
        let location_id = self
            .location_id
            .map(RawId::into_string)
            .filter(|id| !id.is_empty())?;

        let name = self
            .name
            .or(self.localized_name)
            .unwrap_or_else(|| "Unknown".to_string());
        let secondary_label = self
            .secondary_label
            .or_else(|| {
                self.localized_additional_names
                    .and_then(|names| names.long_only_hierarchy)
            })
            .unwrap_or_default();

        Some(LocationResult {
            location_id,
            name,
            secondary_label,
            place_type: self.place_type,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRestaurant {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    average_rating: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    rating: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    establishment_type_and_cuisine_tags: Option<Vec<RawTag>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    cuisine: Option<Vec<RawTag>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    price_tag: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    price_level: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    address: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    parent_geo_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    user_review_count: Option<u64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    menu_url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    current_open_status_category: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    is_premium: Option<bool>,
}

impl RawRestaurant {
    fn normalize(self) -> RestaurantResult {
        let cuisine = self
            .establishment_type_and_cuisine_tags
            .or(self.cuisine)
            .unwrap_or_default()
            .into_iter()
            .map(String::from)
            .filter(|tag| !tag.trim().is_empty())
            .collect();

        RestaurantResult {
            name: non_blank(self.name).unwrap_or_else(|| "Unknown".to_string()),
            rating: self.average_rating.or(self.rating),
            cuisine,
            price_level: non_blank(self.price_tag).or_else(|| non_blank(self.price_level)),
            address: non_blank(self.address).or_else(|| non_blank(self.parent_geo_name)),
            review_count: self.user_review_count,
            menu_url: non_blank(self.menu_url),
            open_status: non_blank(self.current_open_status_category),
            is_premium: self.is_premium,
        }
    }
}

/// The upstream's own explanation: the `message` field of a JSON error body,
/// or an excerpt of a plain-text one.
fn upstream_message(body: &str) -> Option<String> {
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(json) => json.get("message").and_then(Value::as_str)?.trim().to_string(),
        Err(_) => excerpt(body.trim()).to_string(),
    };
    (!detail.is_empty()).then_some(detail)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
