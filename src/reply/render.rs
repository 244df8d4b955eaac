//! `{{PLACEHOLDER}}` substitution for reply templates.
//!
//! Line-oriented: a line holding nothing but a placeholder that renders empty
//! is dropped, so optional blocks (hazmat, extra stops) leave no blank gap.

use std::collections::HashMap;

use crate::error::FormatError;

/// Every placeholder a template may use.
pub const KNOWN_PLACEHOLDERS: &[&str] = &[
    "SUBJECT",
    "GREETING",
    "COMPANY_NAME",
    "LOAD_REFERENCE",
    "STATUS",
    "PICKUP_LOCATION",
    "PICKUP_DATE",
    "DELIVERY_LOCATION",
    "DELIVERY_DATE",
    "ADDITIONAL_STOPS",
    "COMMODITY",
    "WEIGHT",
    "HAZMAT_LINE",
    "RATE",
    "EQUIPMENT",
    "PARTIAL_NOTE",
    "FOLLOW_UP_WINDOW",
];

/// Placeholders that render empty (not "TBD") when there is no value.
pub const CONDITIONAL_PLACEHOLDERS: &[&str] = &["ADDITIONAL_STOPS", "HAZMAT_LINE", "PARTIAL_NOTE"];

/// Rendered for a known field with no value.
pub const MISSING_VALUE: &str = "TBD";

pub type PlaceholderValues = HashMap<&'static str, String>;

/// A `{{NAME}}` occurrence within one line: byte span and trimmed name.
#[derive(Debug, PartialEq, Eq)]
struct Token<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

fn tokens<'a>(
    template_name: &str,
    line_no: usize,
    line: &'a str,
) -> Result<Vec<Token<'a>>, FormatError> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(rel) = line[cursor..].find("{{") {
        let start = cursor + rel;
        let close = line[start + 2..].find("}}").ok_or_else(|| {
            FormatError::UnterminatedPlaceholder {
                template: template_name.to_string(),
                line: line_no,
            }
        })?;
        let end = start + 2 + close + 2;
        found.push(Token {
            start,
            end,
            name: line[start + 2..end - 2].trim(),
        });
        cursor = end;
    }
    Ok(found)
}

/// Check a template is well formed and only uses known placeholders.
pub fn validate_template(template_name: &str, text: &str) -> Result<(), FormatError> {
    for (idx, line) in text.lines().enumerate() {
        for token in tokens(template_name, idx + 1, line)? {
            if !KNOWN_PLACEHOLDERS.contains(&token.name) {
                return Err(FormatError::UnknownPlaceholder {
                    template: template_name.to_string(),
                    name: token.name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Substitute placeholders line by line.
///
/// Known placeholders with no value become "TBD" (or nothing, for the
/// conditional ones). Unknown names render empty rather than failing.
pub fn render(
    template_name: &str,
    text: &str,
    values: &PlaceholderValues,
) -> Result<String, FormatError> {
    let mut lines = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_tokens = tokens(template_name, idx + 1, line)?;
        if line_tokens.is_empty() {
            lines.push(line.to_string());
            continue;
        }

        let mut rendered = String::with_capacity(line.len());
        let mut cursor = 0;
        for token in &line_tokens {
            rendered.push_str(&line[cursor..token.start]);
            rendered.push_str(&value_for(token.name, values));
            cursor = token.end;
        }
        rendered.push_str(&line[cursor..]);

        let only = &line_tokens[0];
        let bare = line_tokens.len() == 1 && line.trim().len() == only.end - only.start;
        if bare && rendered.trim().is_empty() {
            continue;
        }
        lines.push(rendered);
    }

    Ok(lines.join("\n"))
}

fn value_for(name: &str, values: &PlaceholderValues) -> String {
    if let Some(value) = values.get(name) {
        return value.clone();
    }
    if CONDITIONAL_PLACEHOLDERS.contains(&name) {
        return String::new();
    }
    if KNOWN_PLACEHOLDERS.contains(&name) {
        return MISSING_VALUE.to_string();
    }
    log::debug!("render: unknown placeholder {{{{{}}}}} left empty", name);
    String::new()
}
