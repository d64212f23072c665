use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_variants() {
    for val in ["1", "true", "YES", " on "] {
        assert_eq!(parse_bool(val), Some(true), "{val:?}");
    }
    for val in ["0", "False", "no", "OFF"] {
        assert_eq!(parse_bool(val), Some(false), "{val:?}");
    }
    assert_eq!(parse_bool("maybe"), None);
}

// =============================================================================
// validate_api_url
// =============================================================================

#[test]
fn https_url_is_accepted_and_trimmed() {
    assert_eq!(
        validate_api_url("https://clinic.example.com/api/", false),
        Ok("https://clinic.example.com/api".to_owned())
    );
}

#[test]
fn local_http_is_accepted() {
    assert!(validate_api_url("http://localhost:8000/api", false).is_ok());
    assert!(validate_api_url("http://127.0.0.1/api", false).is_ok());
}

#[test]
fn remote_http_requires_opt_in() {
    assert_eq!(
        validate_api_url("http://clinic.example.com/api", false),
        Err(ConfigError::InsecureHttp("clinic.example.com".to_owned()))
    );
    assert!(validate_api_url("http://clinic.example.com/api", true).is_ok());
}

#[test]
fn non_http_scheme_is_rejected() {
    assert!(matches!(validate_api_url("ftp://x", true), Err(ConfigError::InvalidScheme(_))));
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn defaults_apply_when_unset() {
    let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.api_base_url, DEFAULT_API_URL);
    assert!(config.session_file.ends_with(".eyeclinic/session.json"));
    assert!(!config.allow_insecure_http);
}

#[test]
fn lookup_overrides_defaults() {
    let config = ClientConfig::from_lookup(lookup_from(&[
        (API_URL_VAR, "http://10.0.0.5/api"),
        (INSECURE_HTTP_VAR, "1"),
        (SESSION_FILE_VAR, "/tmp/clinic.json"),
    ]))
    .unwrap();
    assert_eq!(config.api_base_url, "http://10.0.0.5/api");
    assert_eq!(config.session_file, PathBuf::from("/tmp/clinic.json"));
    assert!(config.allow_insecure_http);
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = ClientConfig::from_lookup(lookup_from(&[(API_URL_VAR, "  ")])).unwrap();
    assert_eq!(config.api_base_url, DEFAULT_API_URL);
}

#[test]
fn insecure_remote_url_fails_to_load() {
    let res = ClientConfig::from_lookup(lookup_from(&[(API_URL_VAR, "http://clinic.example.com")]));
    assert!(res.is_err());
}
