//! Gateway and transport configuration.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// Default RapidAPI host serving the restaurant endpoints.
pub const DEFAULT_HOST: &str = "tripadvisor16.p.rapidapi.com";

/// Default number of restaurants returned per call.
pub const DEFAULT_MAX_RESTAURANTS: usize = 10;

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while assembling configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Transport configuration options.
///
/// Controls how requests are sent over the network.
#[derive(Debug, Clone)]
pub enum TransportOptions {
    /// HTTP transport configuration
    Http {
        /// Request timeout. If None, [`DEFAULT_TIMEOUT`] is used.
        timeout: Option<Duration>,
        /// HTTP proxy URL.
        proxy: Option<String>,
        /// Additional HTTP headers to send with every request.
        headers: Option<HashMap<String, String>>,
    },
}

impl Default for TransportOptions {
    fn default() -> Self {
        TransportOptions::Http {
            timeout: None,
            proxy: None,
            headers: None,
        }
    }
}

impl TransportOptions {
    /// Create new default HTTP transport options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, duration: Duration) -> Self {
        match &mut self {
            TransportOptions::Http { timeout, .. } => *timeout = Some(duration),
        }
        self
    }

    /// Set the proxy.
    pub fn with_proxy(mut self, proxy_url: String) -> Self {
        match &mut self {
            TransportOptions::Http { proxy, .. } => *proxy = Some(proxy_url),
        }
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        match &mut self {
            TransportOptions::Http { headers, .. } => {
                headers.get_or_insert_with(HashMap::new).insert(key, value);
            }
        }
        self
    }

    /// The effective request timeout.
    pub fn timeout(&self) -> Duration {
        match self {
            TransportOptions::Http { timeout, .. } => timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

/// Everything the upstream gateway needs, built once at startup.
///
/// The API key and host are mandatory; the rest has defaults. Use
/// [`GatewayOptions::from_env`] in a binary and [`GatewayOptions::new`] plus
/// the `with_*` builders elsewhere.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// RapidAPI subscription key, sent as `X-RapidAPI-Key`.
    pub api_key: String,
    /// RapidAPI host identifier, sent as `X-RapidAPI-Host`.
    pub host: String,
    /// Overrides `https://{host}` as the request origin.
    pub base_url: Option<String>,
    /// Upper bound on restaurants returned per call.
    pub max_restaurants: usize,
    pub transport: TransportOptions,
}

impl GatewayOptions {
    pub fn new(api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: host.into(),
            base_url: None,
            max_restaurants: DEFAULT_MAX_RESTAURANTS,
            transport: TransportOptions::default(),
        }
    }

    /// Read `KEY`, `HOST`, `BASE_URL`, `MAX_RESTAURANTS` and `TIMEOUT_SECS`
    /// from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`GatewayOptions::from_env`] but with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = read("KEY").ok_or(ConfigError::MissingVar("KEY"))?;
        let host = read("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let mut options = Self::new(api_key, host);

        if let Some(base_url) = read("BASE_URL") {
            options = options.with_base_url(base_url);
        }
        if let Some(raw) = read("MAX_RESTAURANTS") {
            options = options.with_max_restaurants(parse_positive("MAX_RESTAURANTS", &raw)?);
        }
        if let Some(raw) = read("TIMEOUT_SECS") {
            let secs = parse_positive("TIMEOUT_SECS", &raw)?;
            options.transport = options
                .transport
                .with_timeout(Duration::from_secs(secs as u64));
        }

        Ok(options)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_max_restaurants(mut self, max: usize) -> Self {
        self.max_restaurants = max;
        self
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Origin every endpoint path is appended to, without a trailing slash.
    pub fn origin(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host),
        }
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(0) => Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}
