//! Data model shared by the extractor, classifier, lookup providers, and formatter.
//!
//! Every entity here is transient: built for one inbound email and dropped once
//! the reply has been produced.

use serde::{Deserialize, Serialize};

/// Values that mean "we don't know yet" when they show up in a load record.
pub const PLACEHOLDER_VALUES: &[&str] = &["tbd", "n/a", "na", "unknown", "-"];

/// Inbound email as handed to us by the mail integration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    #[serde(default)]
    pub subject: String,
    /// Plain text or HTML; the extractor copes with both.
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl EmailContent {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Text scanned for a reference: subject first, then body.
    pub fn searchable_text(&self) -> String {
        match (self.subject.trim().is_empty(), self.body.trim().is_empty()) {
            (true, _) => self.body.clone(),
            (false, true) => self.subject.clone(),
            (false, false) => format!("{}\n{}", self.subject, self.body),
        }
    }
}

/// A candidate that matched a pattern but failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedCandidate {
    pub pattern_id: String,
    pub candidate: String,
    pub reason: String,
}

/// Outcome of scanning an email for a load reference.
///
/// `found` is true exactly when `reference` is `Some`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub found: bool,
    pub reference: Option<String>,
    /// Heuristic score in `0..=100`.
    pub confidence: u8,
    pub matched_pattern_id: Option<String>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedCandidate>,
}

impl ExtractionResult {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self {
            found: false,
            reference: None,
            confidence: 0,
            matched_pattern_id: None,
            reason: reason.into(),
            rejected: Vec::new(),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// A pickup or delivery stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationTime {
    pub place: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl LocationTime {
    pub fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            date: None,
            time: None,
        }
    }

    pub fn at(mut self, date: impl Into<String>, time: Option<&str>) -> Self {
        self.date = Some(date.into());
        self.time = time.map(str::to_string);
        self
    }

    /// "10/18/2026 08:00", "10/18/2026", or `None` when no date is known.
    pub fn when(&self) -> Option<String> {
        let date = self.date.as_deref().filter(|d| is_known(d))?;
        match self.time.as_deref().filter(|t| is_known(t)) {
            Some(time) => Some(format!("{} {}", date, time)),
            None => Some(date.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commodity {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub hazmat: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub formatted: String,
}

impl Rate {
    pub fn from_amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            formatted: crate::util::format_usd(amount),
        }
    }

    /// Display string: the provider's own formatting wins, then the amount.
    pub fn display(&self) -> Option<String> {
        if is_known(&self.formatted) {
            return Some(self.formatted.trim().to_string());
        }
        self.amount.map(crate::util::format_usd)
    }
}

/// Load details returned by a lookup provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRecord {
    pub reference: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pickup: Vec<LocationTime>,
    #[serde(default)]
    pub delivery: Vec<LocationTime>,
    #[serde(default)]
    pub commodity: Commodity,
    #[serde(default)]
    pub rate: Rate,
    #[serde(default)]
    pub equipment: String,
}

impl LoadRecord {
    /// Pickup, delivery, weight, and rate are all present and not placeholders.
    pub fn is_complete(&self) -> bool {
        has_known_stop(&self.pickup)
            && has_known_stop(&self.delivery)
            && self.commodity.weight.as_deref().is_some_and(is_known)
            && self.rate.display().is_some()
    }
}

fn has_known_stop(stops: &[LocationTime]) -> bool {
    stops.first().is_some_and(|s| is_known(&s.place))
}

/// True for non-empty values that aren't "TBD"/"N/A" style placeholders.
pub fn is_known(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !PLACEHOLDER_VALUES.contains(&trimmed.to_lowercase().as_str())
}

/// Result of asking a provider about one reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LookupOutcome {
    Success { data: LoadRecord },
    NotFound,
    /// Internal detail for logs. Never rendered into a reply.
    Error { message: String },
    /// No attempt was made (no provider configured, or no reference).
    Skipped,
}

impl LookupOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NotFound => "notFound",
            Self::Error { .. } => "error",
            Self::Skipped => "skipped",
        }
    }

    pub fn record(&self) -> Option<&LoadRecord> {
        match self {
            Self::Success { data } => Some(data),
            _ => None,
        }
    }
}

/// Which reply we send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    LoadFound,
    LoadPending,
    NoReference,
    Error,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::LoadFound,
        Scenario::LoadPending,
        Scenario::NoReference,
        Scenario::Error,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::LoadFound => "LOAD_FOUND",
            Self::LoadPending => "LOAD_PENDING",
            Self::NoReference => "NO_REFERENCE",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rendered reply, ready for the mail integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub subject: String,
    pub body: String,
    pub body_html: String,
}

// =============================================================================
// Configuration
// =============================================================================

/// Composition-time configuration for the formatter and lookup provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default)]
    pub signature: SignatureConfig,
    /// How soon a LOAD_PENDING reply promises a follow-up.
    #[serde(default = "default_follow_up_window")]
    pub follow_up_window: String,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<TemplateOverrides>,
}

fn default_company_name() -> String {
    "Our Brokerage".to_string()
}

fn default_follow_up_window() -> String {
    "within the next hour".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            signature: SignatureConfig::default(),
            follow_up_window: default_follow_up_window(),
            lookup: LookupConfig::default(),
            templates: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupProviderKind {
    #[default]
    None,
    Http,
    Fixture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupConfig {
    #[serde(default)]
    pub provider: LookupProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<String>,
}

/// Bounds for the per-lookup timeout, in seconds.
pub const MIN_LOOKUP_TIMEOUT_SECS: u64 = 5;
pub const MAX_LOOKUP_TIMEOUT_SECS: u64 = 90;

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            provider: LookupProviderKind::None,
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            fixture_path: None,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.timeout_secs
                .clamp(MIN_LOOKUP_TIMEOUT_SECS, MAX_LOOKUP_TIMEOUT_SECS),
        )
    }
}

/// Per-scenario template overrides. Missing entries keep the built-in text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_found: Option<TemplateOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_pending: Option<TemplateOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_reference: Option<TemplateOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TemplateOverride>,
}

impl TemplateOverrides {
    pub fn for_scenario(&self, scenario: Scenario) -> Option<&TemplateOverride> {
        match scenario {
            Scenario::LoadFound => self.load_found.as_ref(),
            Scenario::LoadPending => self.load_pending.as_ref(),
            Scenario::NoReference => self.no_reference.as_ref(),
            Scenario::Error => self.error.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
