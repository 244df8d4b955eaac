//! HTTP API lookup provider.
//!
//! `GET {base_url}/loads/{reference}` with optional Bearer token auth.
//! 200 with a JSON `LoadRecord` body is a hit, 404 is not found, and
//! everything else is an error outcome.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::{ConfigError, LookupError};
use crate::types::{LoadRecord, LookupOutcome};

use super::LoadLookupProvider;

pub struct HttpLookupProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpLookupProvider {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ConfigError::Invalid(format!("lookup.baseUrl '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "lookup.baseUrl '{}' cannot have a path",
                base_url
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
        })
    }

    fn endpoint(&self, reference: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::NotConfigured("base URL cannot have a path".into()))?
            .pop_if_empty()
            .push("loads")
            .push(reference);
        Ok(url)
    }

    async fn fetch(
        &self,
        reference: &str,
        timeout: Duration,
    ) -> Result<Option<LoadRecord>, LookupError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(LookupError::InvalidReference("empty reference".into()));
        }

        let mut request = self
            .client
            .get(self.endpoint(reference)?)
            .timeout(timeout)
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout(timeout.as_secs())
            } else {
                LookupError::Network(e.to_string())
            }
        })?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LookupError::Unauthorized)
            }
            status if !status.is_success() => {
                let text = resp.text().await.unwrap_or_default();
                return Err(LookupError::UnexpectedResponse(format!(
                    "HTTP {}: {}",
                    status,
                    crate::util::truncate_chars(&text, 200)
                )));
            }
            _ => {}
        }

        let mut record: LoadRecord = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout(timeout.as_secs())
            } else {
                LookupError::UnexpectedResponse(format!("invalid load record: {}", e))
            }
        })?;
        if record.reference.trim().is_empty() {
            record.reference = reference.to_string();
        }
        Ok(Some(record))
    }
}

#[async_trait]
impl LoadLookupProvider for HttpLookupProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn lookup(&self, reference: &str, timeout: Duration) -> LookupOutcome {
        match self.fetch(reference, timeout).await {
            Ok(Some(data)) => LookupOutcome::Success { data },
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => {
                log::warn!(
                    "lookup: http provider failed for {} (retryable={}): {}",
                    reference,
                    e.is_retryable(),
                    e
                );
                e.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn record_json() -> serde_json::Value {
        serde_json::json!({
            "reference": "302734",
            "status": "available",
            "pickup": [{ "place": "Chicago, IL", "date": "10/18/2026", "time": "08:00" }],
            "delivery": [{ "place": "Dallas, TX", "date": "10/20/2026" }],
            "commodity": { "description": "Paper rolls", "weight": "40,000 lbs", "hazmat": false },
            "rate": { "amount": 1250.0, "formatted": "$1,250.00" },
            "equipment": "53' Dry Van"
        })
    }

    #[tokio::test]
    async fn test_success_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loads/302734"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
            .mount(&server)
            .await;

        let provider = HttpLookupProvider::new(&server.uri(), Some("secret")).unwrap();
        match provider.lookup("302734", TIMEOUT).await {
            LookupOutcome::Success { data } => {
                assert_eq!(data.reference, "302734");
                assert_eq!(data.rate.display().as_deref(), Some("$1,250.00"));
                assert!(data.is_complete());
            }
            other => panic!("Expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_base_url_path_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/loads/QF-98765"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "reference": "",
                "status": "covered"
            })))
            .mount(&server)
            .await;

        let base = format!("{}/api/v2/", server.uri());
        let provider = HttpLookupProvider::new(&base, None).unwrap();
        match provider.lookup("QF-98765", TIMEOUT).await {
            LookupOutcome::Success { data } => {
                assert_eq!(data.reference, "QF-98765");
                assert!(!data.is_complete());
            }
            other => panic!("Expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = HttpLookupProvider::new(&server.uri(), None).unwrap();
        assert_eq!(
            provider.lookup("302734", TIMEOUT).await,
            LookupOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_auth_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = HttpLookupProvider::new(&server.uri(), Some("wrong")).unwrap();
        match provider.lookup("302734", TIMEOUT).await {
            LookupOutcome::Error { message } => assert!(message.contains("credentials")),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_and_bad_body_are_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loads/500500"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/loads/200200"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let provider = HttpLookupProvider::new(&server.uri(), None).unwrap();
        assert_eq!(provider.lookup("500500", TIMEOUT).await.kind(), "error");
        assert_eq!(provider.lookup("200200", TIMEOUT).await.kind(), "error");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(record_json())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = HttpLookupProvider::new(&server.uri(), None).unwrap();
        let outcome = provider
            .lookup("302734", Duration::from_millis(200))
            .await;
        assert_eq!(outcome.kind(), "error");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpLookupProvider::new("not a url", None).is_err());
        assert!(HttpLookupProvider::new("mailto:loads@example.com", None).is_err());
    }
}
