//! Reply templates: built-in defaults plus per-scenario overrides from config.

use crate::error::FormatError;
use crate::types::{Scenario, TemplateOverrides};

use super::render::validate_template;

const LOAD_FOUND_BODY: &str = include_str!("../../templates/load_found.txt");
const LOAD_PENDING_BODY: &str = include_str!("../../templates/load_pending.txt");
const NO_REFERENCE_BODY: &str = include_str!("../../templates/no_reference.txt");
const ERROR_BODY: &str = include_str!("../../templates/error.txt");

/// Subject template shared by most scenarios; `{{SUBJECT}}` is the
/// already-built reply subject.
const DEFAULT_SUBJECT: &str = "{{SUBJECT}}";
const NO_REFERENCE_SUBJECT: &str = "{{SUBJECT}} - Reference Number Needed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyTemplate {
    pub subject: String,
    pub body: String,
}

impl ReplyTemplate {
    pub fn new(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }
}

/// One template per scenario.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    load_found: ReplyTemplate,
    load_pending: ReplyTemplate,
    no_reference: ReplyTemplate,
    error: ReplyTemplate,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateSet {
    pub fn builtin() -> Self {
        Self {
            load_found: ReplyTemplate::new(DEFAULT_SUBJECT, LOAD_FOUND_BODY),
            load_pending: ReplyTemplate::new(DEFAULT_SUBJECT, LOAD_PENDING_BODY),
            no_reference: ReplyTemplate::new(NO_REFERENCE_SUBJECT, NO_REFERENCE_BODY),
            error: ReplyTemplate::new(DEFAULT_SUBJECT, ERROR_BODY),
        }
    }

    /// Built-in templates with config overrides applied, validated.
    pub fn with_overrides(overrides: &TemplateOverrides) -> Result<Self, FormatError> {
        let mut set = Self::builtin();
        for scenario in Scenario::ALL {
            if let Some(over) = overrides.for_scenario(scenario) {
                let mut template = set.get(scenario).clone();
                if let Some(subject) = &over.subject {
                    template.subject = subject.clone();
                }
                if let Some(body) = &over.body {
                    template.body = body.clone();
                }
                set.set(scenario, template);
            }
        }
        set.validate()?;
        Ok(set)
    }

    pub fn get(&self, scenario: Scenario) -> &ReplyTemplate {
        match scenario {
            Scenario::LoadFound => &self.load_found,
            Scenario::LoadPending => &self.load_pending,
            Scenario::NoReference => &self.no_reference,
            Scenario::Error => &self.error,
        }
    }

    /// Replace one scenario's template. Not validated; call [`Self::validate`].
    pub fn set(&mut self, scenario: Scenario, template: ReplyTemplate) {
        let slot = match scenario {
            Scenario::LoadFound => &mut self.load_found,
            Scenario::LoadPending => &mut self.load_pending,
            Scenario::NoReference => &mut self.no_reference,
            Scenario::Error => &mut self.error,
        };
        *slot = template;
    }

    /// Every template parses and uses only known placeholders.
    pub fn validate(&self) -> Result<(), FormatError> {
        for scenario in Scenario::ALL {
            let template = self.get(scenario);
            validate_template(scenario.label(), &template.subject)?;
            validate_template(scenario.label(), &template.body)?;
            if template.body.trim().is_empty() {
                return Err(FormatError::EmptyTemplate(scenario.label().to_string()));
            }
        }
        Ok(())
    }
}
