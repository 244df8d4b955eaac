//! Response formatter: scenario + extraction + lookup outcome → reply.
//!
//! Formatting never fails from the caller's point of view. A template that
//! can't be rendered degrades to a short generic acknowledgment, and internal
//! lookup error text is never placed in a reply.

pub mod html;
pub mod render;
pub mod subject;
pub mod templates;

use crate::error::FormatError;
use crate::types::{
    is_known, Config, ExtractionResult, LoadRecord, LocationTime, LookupOutcome, Reply, Scenario,
    SignatureConfig,
};
use crate::util::{collapse_whitespace, greeting_name};

use render::{render, PlaceholderValues};
use templates::TemplateSet;

/// Body used when a template can't be rendered at all.
pub const FALLBACK_BODY: &str =
    "Thank you for your email. We are processing your inquiry and will respond shortly.";

const HAZMAT_LINE: &str = "⚠️ Hazmat: Yes - placards and hazmat endorsement required";
const PARTIAL_NOTE: &str =
    "Some details are still being confirmed. We'll send the rest as soon as we have them.";

/// Everything the formatter needs to know about one email.
#[derive(Debug, Clone, Copy)]
pub struct ReplyContext<'a> {
    pub extraction: &'a ExtractionResult,
    pub outcome: &'a LookupOutcome,
    pub original_subject: &'a str,
    pub from: Option<&'a str>,
}

/// Renders replies from a validated [`TemplateSet`] and the sender-facing
/// parts of [`Config`].
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    company_name: String,
    signature: SignatureConfig,
    follow_up_window: String,
    templates: TemplateSet,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::with_templates(&Config::default(), TemplateSet::builtin())
    }
}

impl ResponseFormatter {
    /// Build from config, applying and validating any template overrides.
    pub fn new(config: &Config) -> Result<Self, FormatError> {
        let templates = match &config.templates {
            Some(overrides) => TemplateSet::with_overrides(overrides)?,
            None => TemplateSet::builtin(),
        };
        Ok(Self::with_templates(config, templates))
    }

    /// Build with an explicit template set. The set is used as given.
    pub fn with_templates(config: &Config, templates: TemplateSet) -> Self {
        Self {
            company_name: config.company_name.clone(),
            signature: config.signature.clone(),
            follow_up_window: config.follow_up_window.clone(),
            templates,
        }
    }

    /// Render the reply for `scenario`, falling back to a generic
    /// acknowledgment if the template can't be rendered.
    pub fn format(&self, scenario: Scenario, ctx: &ReplyContext<'_>) -> Reply {
        match self.try_format(scenario, ctx) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("format: {} template failed, using fallback: {}", scenario, e);
                self.fallback_reply(ctx.original_subject, ctx.extraction.reference())
            }
        }
    }

    pub fn try_format(
        &self,
        scenario: Scenario,
        ctx: &ReplyContext<'_>,
    ) -> Result<Reply, FormatError> {
        let template = self.templates.get(scenario);
        let reference = ctx.extraction.reference();
        let base_subject = subject::reply_subject(ctx.original_subject, reference);

        let mut values = self.placeholder_values(scenario, ctx);
        values.insert("SUBJECT", base_subject.clone());

        let rendered_subject =
            collapse_whitespace(&render(scenario.label(), &template.subject, &values)?);
        let subject = if rendered_subject.is_empty() {
            base_subject
        } else {
            rendered_subject
        };

        let main = render(scenario.label(), &template.body, &values)?;
        let main = main.trim();
        if main.is_empty() {
            return Err(FormatError::EmptyTemplate(scenario.label().to_string()));
        }

        let body = format!("{}\n\n{}", main, self.signature_block());
        let body_html = html::body_to_html(&body);

        Ok(Reply {
            subject,
            body,
            body_html,
        })
    }

    /// Minimal reply that doesn't depend on any template.
    pub fn fallback_reply(&self, original_subject: &str, reference: Option<&str>) -> Reply {
        let body = format!("{}\n\n{}", FALLBACK_BODY, self.signature_block());
        Reply {
            subject: subject::reply_subject(original_subject, reference),
            body_html: html::body_to_html(&body),
            body,
        }
    }

    /// "Best regards," followed by whichever signature lines are configured.
    pub fn signature_block(&self) -> String {
        let mut lines = vec!["Best regards,".to_string()];
        let name = known(self.signature.name.as_deref());
        match name {
            Some(name) => {
                lines.push(name);
                if let Some(title) = known(self.signature.title.as_deref()) {
                    lines.push(title);
                }
                lines.push(self.company_name.clone());
            }
            None => lines.push(format!("The {} Team", self.company_name)),
        }
        if let Some(phone) = known(self.signature.phone.as_deref()) {
            lines.push(phone);
        }
        if let Some(email) = known(self.signature.email.as_deref()) {
            lines.push(email);
        }
        lines.join("\n")
    }

    fn placeholder_values(&self, scenario: Scenario, ctx: &ReplyContext<'_>) -> PlaceholderValues {
        let mut values = PlaceholderValues::new();

        let greeting = match ctx.from.and_then(greeting_name) {
            Some(first) => format!("Hi {},", first),
            None => "Hello,".to_string(),
        };
        values.insert("GREETING", greeting);
        values.insert("COMPANY_NAME", self.company_name.clone());
        values.insert("FOLLOW_UP_WINDOW", self.follow_up_window.clone());

        if let Some(reference) = ctx.extraction.reference() {
            values.insert("LOAD_REFERENCE", reference.to_string());
        }

        if scenario == Scenario::LoadFound {
            if let Some(record) = ctx.outcome.record() {
                record_values(record, &mut values);
            }
        }

        values
    }
}

fn known(value: Option<&str>) -> Option<String> {
    value.filter(|v| is_known(v)).map(|v| v.trim().to_string())
}

/// Placeholder values taken from a load record. Unknown fields are left out
/// so the renderer shows "TBD".
fn record_values(record: &LoadRecord, values: &mut PlaceholderValues) {
    if let Some(status) = known(Some(record.status.as_str())) {
        values.insert("STATUS", status);
    }

    if let Some(first) = record.pickup.first() {
        insert_stop(values, "PICKUP_LOCATION", "PICKUP_DATE", first);
    }
    if let Some(first) = record.delivery.first() {
        insert_stop(values, "DELIVERY_LOCATION", "DELIVERY_DATE", first);
    }

    let extra: Vec<String> = record
        .pickup
        .iter()
        .skip(1)
        .map(|stop| extra_stop_line("📍 Additional pickup", stop))
        .chain(
            record
                .delivery
                .iter()
                .skip(1)
                .map(|stop| extra_stop_line("🏁 Additional delivery", stop)),
        )
        .collect();
    if !extra.is_empty() {
        values.insert("ADDITIONAL_STOPS", extra.join("\n"));
    }

    if let Some(description) = known(record.commodity.description.as_deref()) {
        values.insert("COMMODITY", description);
    }
    if let Some(weight) = known(record.commodity.weight.as_deref()) {
        values.insert("WEIGHT", weight);
    }
    if record.commodity.hazmat {
        values.insert("HAZMAT_LINE", HAZMAT_LINE.to_string());
    }
    if let Some(rate) = record.rate.display() {
        values.insert("RATE", rate);
    }
    if let Some(equipment) = known(Some(record.equipment.as_str())) {
        values.insert("EQUIPMENT", equipment);
    }
    if !record.is_complete() {
        values.insert("PARTIAL_NOTE", PARTIAL_NOTE.to_string());
    }
}

fn insert_stop(
    values: &mut PlaceholderValues,
    place_key: &'static str,
    date_key: &'static str,
    stop: &LocationTime,
) {
    if let Some(place) = known(Some(stop.place.as_str())) {
        values.insert(place_key, place);
    }
    if let Some(when) = stop.when() {
        values.insert(date_key, when);
    }
}

fn extra_stop_line(label: &str, stop: &LocationTime) -> String {
    let place = known(Some(stop.place.as_str()))
        .unwrap_or_else(|| render::MISSING_VALUE.to_string());
    let when = stop
        .when()
        .unwrap_or_else(|| render::MISSING_VALUE.to_string());
    format!("{}: {} ({})", label, place, when)
}
