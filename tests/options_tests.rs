use std::collections::HashMap;
use std::time::Duration;

use restaurants_mcp::options::{DEFAULT_HOST, DEFAULT_MAX_RESTAURANTS, DEFAULT_TIMEOUT};
use restaurants_mcp::{ConfigError, GatewayOptions, TransportOptions};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_missing_key_is_config_error() {
    let err = GatewayOptions::from_lookup(env(&[("HOST", "h")])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVar("KEY")));

    let err = GatewayOptions::from_lookup(env(&[("KEY", "   ")])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVar("KEY")));
}

#[test]
fn test_defaults() {
    let options = GatewayOptions::from_lookup(env(&[("KEY", "secret")])).unwrap();
    assert_eq!(options.api_key, "secret");
    assert_eq!(options.host, DEFAULT_HOST);
    assert_eq!(options.max_restaurants, DEFAULT_MAX_RESTAURANTS);
    assert_eq!(options.transport.timeout(), DEFAULT_TIMEOUT);
    assert_eq!(options.origin(), format!("https://{}", DEFAULT_HOST));
}

#[test]
fn test_overrides() {
    let options = GatewayOptions::from_lookup(env(&[
        ("KEY", "secret"),
        ("HOST", "example.p.rapidapi.com"),
        ("BASE_URL", "http://127.0.0.1:9999/"),
        ("MAX_RESTAURANTS", "3"),
        ("TIMEOUT_SECS", "5"),
    ]))
    .unwrap();

    assert_eq!(options.host, "example.p.rapidapi.com");
    assert_eq!(options.origin(), "http://127.0.0.1:9999");
    assert_eq!(options.max_restaurants, 3);
    assert_eq!(options.transport.timeout(), Duration::from_secs(5));
}

#[test]
fn test_invalid_numbers() {
    let err = GatewayOptions::from_lookup(env(&[("KEY", "k"), ("MAX_RESTAURANTS", "0")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "MAX_RESTAURANTS", .. }));

    let err = GatewayOptions::from_lookup(env(&[("KEY", "k"), ("TIMEOUT_SECS", "soon")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "TIMEOUT_SECS", .. }));
}

#[test]
fn test_transport_options_builder() {
    let options = TransportOptions::new()
        .with_timeout(Duration::from_secs(12))
        .with_proxy("http://proxy.example.com".to_string())
        .with_header("X-Custom-Header".to_string(), "Value".to_string());

    match options {
        TransportOptions::Http {
            timeout,
            proxy,
            headers,
        } => {
            assert_eq!(timeout, Some(Duration::from_secs(12)));
            assert_eq!(proxy, Some("http://proxy.example.com".to_string()));
            let headers = headers.unwrap();
            assert_eq!(headers.get("X-Custom-Header"), Some(&"Value".to_string()));
        }
    }
}
