//! Freight-broker email triage.
//!
//! Finds the load reference in an inbound carrier email, optionally looks
//! the load up, decides which reply to send, and renders it.

pub mod error;
pub mod lookup;
pub mod processor;
pub mod reply;
pub mod state;
pub mod types;
pub mod util;

pub use error::{ConfigError, FormatError, LookupError};
pub use lookup::{
    lookup_with_ceiling, FixtureLookupProvider, HttpLookupProvider, LoadLookupProvider,
};
pub use processor::classifier::classify;
pub use processor::extract::{extract_from_email, extract_reference};
pub use processor::{Pipeline, ProcessingReport};
pub use reply::{ReplyContext, ResponseFormatter};
pub use types::{
    Config, EmailContent, ExtractionResult, LoadRecord, LookupOutcome, Reply, Scenario,
};
