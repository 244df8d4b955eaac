//! Configuration loading at composition time.
//!
//! The core never reads files or the environment; the binary (or any other
//! host) loads a [`Config`] here and hands it to `Pipeline::from_config`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::reply::templates::TemplateSet;
use crate::types::{Config, LookupProviderKind};

pub const ENV_API_KEY: &str = "LOADREPLY_API_KEY";
pub const ENV_BASE_URL: &str = "LOADREPLY_BASE_URL";

/// Get the canonical config file path (~/.loadreply/config.json)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir()
        .ok_or_else(|| ConfigError::Invalid("Could not find home directory".into()))?;
    Ok(home.join(".loadreply").join("config.json"))
}

/// Load configuration from ~/.loadreply/config.json.
///
/// A missing file isn't an error here: a fresh install runs on defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config_from(&path)
}

/// Load configuration from an explicit path, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    // Reject bad template overrides now rather than on the first email.
    if let Some(overrides) = &config.templates {
        TemplateSet::with_overrides(overrides)?;
    }

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Apply `LOADREPLY_API_KEY` / `LOADREPLY_BASE_URL` from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_with(config, |name| std::env::var(name).ok());
}

/// Apply overrides from any variable source. A base URL with no provider
/// configured switches lookups to the HTTP provider.
pub fn apply_overrides_with(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(ENV_API_KEY) {
        log::debug!("Using lookup API key from {}", ENV_API_KEY);
        config.lookup.api_key = Some(key);
    }
    if let Some(url) = non_empty(ENV_BASE_URL) {
        log::debug!("Using lookup base URL from {}", ENV_BASE_URL);
        config.lookup.base_url = Some(url);
        if config.lookup.provider == LookupProviderKind::None {
            config.lookup.provider = LookupProviderKind::Http;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_from_file() {
        let file = write_config(
            r#"{
                "companyName": "Acme Logistics",
                "signature": { "name": "Sam Rivera", "phone": "555-0100" },
                "lookup": { "provider": "http", "baseUrl": "https://loads.example.com", "timeoutSecs": 500 }
            }"#,
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.company_name, "Acme Logistics");
        assert_eq!(config.signature.name.as_deref(), Some("Sam Rivera"));
        assert_eq!(config.follow_up_window, "within the next hour");
        assert_eq!(config.lookup.provider, LookupProviderKind::Http);
        assert_eq!(config.lookup.timeout().as_secs(), 90);
    }

    #[test]
    fn test_empty_object_is_default() {
        let file = write_config("{}");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.company_name, "Our Brokerage");
        assert_eq!(config.lookup.provider, LookupProviderKind::None);
        assert_eq!(config.lookup.timeout().as_secs(), 30);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let result = load_config_from(Path::new("/nonexistent/loadreply.json"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_config("{ companyName: ");
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_template_override_rejected_at_load() {
        let file = write_config(
            r#"{ "templates": { "loadPending": { "body": "{{GREETING}} {{ETA}}" } } }"#,
        );
        match load_config_from(file.path()) {
            Err(ConfigError::Invalid(message)) => assert!(message.contains("{{ETA}}")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides_enable_http_provider() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_KEY, "secret"),
            (ENV_BASE_URL, "https://loads.example.com"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        apply_overrides_with(&mut config, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.lookup.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.lookup.base_url.as_deref(),
            Some("https://loads.example.com")
        );
        assert_eq!(config.lookup.provider, LookupProviderKind::Http);
    }

    #[test]
    fn test_overrides_keep_explicit_provider_and_ignore_blank() {
        let mut config = Config::default();
        config.lookup.provider = LookupProviderKind::Fixture;
        config.lookup.api_key = Some("from-file".into());
        apply_overrides_with(&mut config, |name| match name {
            ENV_API_KEY => Some("  ".to_string()),
            ENV_BASE_URL => Some("https://loads.example.com".to_string()),
            _ => None,
        });

        assert_eq!(config.lookup.provider, LookupProviderKind::Fixture);
        assert_eq!(config.lookup.api_key.as_deref(), Some("from-file"));
    }
}
