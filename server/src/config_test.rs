use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.socket_addr().to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.function_base_path, DEFAULT_FUNCTION_BASE_PATH);
    assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
}

#[test]
fn parses_overrides() {
    let cfg = ServerConfig::from_lookup(lookup_from(&[
        ("BIND_ADDR", "127.0.0.1"),
        ("PORT", "8080"),
        ("FUNCTION_BASE_PATH", "fn/api/"),
        ("MAX_BODY_BYTES", "1024"),
    ]))
    .unwrap();
    assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.function_base_path, "/fn/api");
    assert_eq!(cfg.max_body_bytes, 1024);
}

#[test]
fn invalid_port_errors() {
    let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
    assert!(err.to_string().contains("PORT"));
}

#[test]
fn invalid_bind_addr_errors() {
    let err = ServerConfig::from_lookup(lookup_from(&[("BIND_ADDR", "localhost:1")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));
}

#[test]
fn root_function_base_path_is_rejected() {
    let err = ServerConfig::from_lookup(lookup_from(&[("FUNCTION_BASE_PATH", "/")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "FUNCTION_BASE_PATH", .. }));
}

#[test]
fn wildcard_function_base_path_is_rejected() {
    let err = ServerConfig::from_lookup(lookup_from(&[("FUNCTION_BASE_PATH", "/fn/{*x}")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "FUNCTION_BASE_PATH", .. }));
}

#[test]
fn base_path_under_api_prefix_is_rejected() {
    for raw in ["/api", "api/", "/api/fn"] {
        let err = ServerConfig::from_lookup(lookup_from(&[("FUNCTION_BASE_PATH", raw)])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "FUNCTION_BASE_PATH", .. }), "{raw}");
    }
}
