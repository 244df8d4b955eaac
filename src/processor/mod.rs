//! Inbound email processing pipeline.
//!
//! Orchestrates: extract reference → look it up (if a provider is wired in)
//! → classify → format the reply.
//!
//! `Pipeline::process` always produces a reply. Lookup failures become the
//! ERROR scenario. A template failure becomes the generic fallback
//! acknowledgment, and a panic while extracting or formatting also reports
//! the ERROR scenario.

pub mod classifier;
pub mod extract;
pub mod patterns;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lookup::{build_provider, lookup_with_ceiling, LoadLookupProvider};
use crate::reply::{ReplyContext, ResponseFormatter};
use crate::types::{
    Config, EmailContent, ExtractionResult, LookupConfig, LookupOutcome, Reply, Scenario,
};
use crate::util::extract_email_address;

use classifier::classify;
use extract::extract_from_email;

/// Everything decided about one inbound email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingReport {
    pub request_id: String,
    pub processed_at: DateTime<Utc>,
    pub extraction: ExtractionResult,
    pub outcome: LookupOutcome,
    pub scenario: Scenario,
    pub reply: Reply,
}

pub struct Pipeline {
    formatter: ResponseFormatter,
    provider: Option<Arc<dyn LoadLookupProvider>>,
    timeout: Duration,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(
            ResponseFormatter::default(),
            None,
            LookupConfig::default().timeout(),
        )
    }
}

impl Pipeline {
    pub fn new(
        formatter: ResponseFormatter,
        provider: Option<Arc<dyn LoadLookupProvider>>,
        timeout: Duration,
    ) -> Self {
        Self {
            formatter,
            provider,
            timeout,
        }
    }

    /// Compose a pipeline from config: formatter with validated templates,
    /// provider per `lookup.provider`, and the clamped lookup timeout.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let formatter = ResponseFormatter::new(config)?;
        let provider = build_provider(&config.lookup)?;
        Ok(Self::new(formatter, provider, config.lookup.timeout()))
    }

    pub fn with_provider(mut self, provider: Arc<dyn LoadLookupProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Process one email end to end. Never fails.
    pub async fn process(&self, email: &EmailContent) -> ProcessingReport {
        let request_id = uuid::Uuid::new_v4().to_string();
        let processed_at = Utc::now();
        if let Some(from) = email.from.as_deref() {
            log::info!(
                "[{}] processing email from {}",
                request_id,
                extract_email_address(from)
            );
        }

        let extraction = match catch_unwind(AssertUnwindSafe(|| extract_from_email(email))) {
            Ok(extraction) => extraction,
            Err(_) => {
                log::error!("[{}] extractor panicked", request_id);
                let extraction = ExtractionResult::not_found("internal extractor failure");
                let reply = self.formatter.fallback_reply(&email.subject, None);
                return ProcessingReport {
                    request_id,
                    processed_at,
                    extraction,
                    outcome: LookupOutcome::Skipped,
                    scenario: Scenario::Error,
                    reply,
                };
            }
        };

        for rejected in &extraction.rejected {
            log::debug!(
                "[{}] rejected '{}' from {}: {}",
                request_id,
                rejected.candidate,
                rejected.pattern_id,
                rejected.reason
            );
        }
        log::info!(
            "[{}] extracted: found={} reference={:?} confidence={} ({})",
            request_id,
            extraction.found,
            extraction.reference,
            extraction.confidence,
            extraction.reason
        );

        let outcome = self.lookup(&request_id, &extraction).await;
        if let LookupOutcome::Error { message } = &outcome {
            log::warn!("[{}] lookup failed: {}", request_id, message);
        } else {
            log::info!("[{}] lookup outcome: {}", request_id, outcome.kind());
        }

        let scenario = classify(&extraction, &outcome);
        log::info!("[{}] scenario: {}", request_id, scenario);

        let ctx = ReplyContext {
            extraction: &extraction,
            outcome: &outcome,
            original_subject: &email.subject,
            from: email.from.as_deref(),
        };
        let (scenario, reply) = self.guard_reply(&request_id, scenario, &ctx, || {
            self.formatter.format(scenario, &ctx)
        });

        ProcessingReport {
            request_id,
            processed_at,
            extraction,
            outcome,
            scenario,
            reply,
        }
    }

    /// Run `render`, turning a panic into the fallback reply under `Scenario::Error`.
    fn guard_reply(
        &self,
        request_id: &str,
        scenario: Scenario,
        ctx: &ReplyContext<'_>,
        render: impl FnOnce() -> Reply,
    ) -> (Scenario, Reply) {
        match catch_unwind(AssertUnwindSafe(render)) {
            Ok(reply) => (scenario, reply),
            Err(_) => {
                log::warn!(
                    "[{}] formatter panicked on {}, sending fallback reply",
                    request_id,
                    scenario
                );
                let reply = self
                    .formatter
                    .fallback_reply(ctx.original_subject, ctx.extraction.reference());
                (Scenario::Error, reply)
            }
        }
    }

    async fn lookup(&self, request_id: &str, extraction: &ExtractionResult) -> LookupOutcome {
        let Some(reference) = extraction.reference() else {
            return LookupOutcome::Skipped;
        };
        let Some(provider) = &self.provider else {
            log::debug!("[{}] no lookup provider configured", request_id);
            return LookupOutcome::Skipped;
        };
        log::info!(
            "[{}] looking up {} via {} ({}s ceiling)",
            request_id,
            reference,
            provider.name(),
            self.timeout.as_secs()
        );
        lookup_with_ceiling(provider.as_ref(), reference, self.timeout).await
    }
}
