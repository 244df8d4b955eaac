//! Load lookup providers.
//!
//! A provider turns a load reference into a [`LookupOutcome`]. Providers never
//! return `Err`: transport, auth, and timeout failures come back as
//! `LookupOutcome::Error`, and an unknown reference as `LookupOutcome::NotFound`.
//! The pipeline doesn't retry; retry policy belongs to the provider.

pub mod fixture;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ConfigError, LookupError};
use crate::types::{LookupConfig, LookupOutcome, LookupProviderKind};

pub use fixture::FixtureLookupProvider;
pub use http::HttpLookupProvider;

/// Lookup contract. New load sources only need to implement this trait.
#[async_trait]
pub trait LoadLookupProvider: Send + Sync {
    /// Stable provider identifier for logs (e.g. `http`, `fixture`).
    fn name(&self) -> &'static str;

    /// Look up one reference. `timeout` is the provider's own per-request
    /// budget; callers also enforce it with [`lookup_with_ceiling`].
    async fn lookup(&self, reference: &str, timeout: Duration) -> LookupOutcome;
}

/// Run a provider lookup under a hard duration ceiling.
///
/// Exceeding the ceiling drops the in-flight call and yields an error outcome.
pub async fn lookup_with_ceiling(
    provider: &dyn LoadLookupProvider,
    reference: &str,
    ceiling: Duration,
) -> LookupOutcome {
    match tokio::time::timeout(ceiling, provider.lookup(reference, ceiling)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            log::warn!(
                "lookup: {} exceeded {}s ceiling for {}",
                provider.name(),
                ceiling.as_secs(),
                reference
            );
            LookupError::Timeout(ceiling.as_secs()).into()
        }
    }
}

/// Build the provider named in config, or `None` when lookups are disabled.
pub fn build_provider(
    config: &LookupConfig,
) -> Result<Option<Arc<dyn LoadLookupProvider>>, ConfigError> {
    match config.provider {
        LookupProviderKind::None => Ok(None),
        LookupProviderKind::Http => {
            let base_url = config
                .base_url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| {
                    ConfigError::Invalid("lookup.baseUrl is required for the http provider".into())
                })?;
            let provider = HttpLookupProvider::new(base_url, config.api_key.as_deref())?;
            Ok(Some(Arc::new(provider)))
        }
        LookupProviderKind::Fixture => {
            let path = config.fixture_path.as_deref().ok_or_else(|| {
                ConfigError::Invalid(
                    "lookup.fixturePath is required for the fixture provider".into(),
                )
            })?;
            let provider = FixtureLookupProvider::load(std::path::Path::new(path))?;
            Ok(Some(Arc::new(provider)))
        }
    }
}
