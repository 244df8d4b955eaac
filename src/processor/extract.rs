//! Load reference extraction from free-text email content.
//!
//! Pure and total: the same input always yields the same [`ExtractionResult`],
//! and malformed or empty input yields `found: false` rather than an error.
//!
//! Pipeline: truncate → strip HTML → collapse whitespace → blank out
//! exclusions → scan candidate patterns in priority order → validate.

use crate::types::{EmailContent, ExtractionResult, RejectedCandidate};
use crate::util::{collapse_whitespace, truncate_chars};

use super::patterns::{
    candidate_patterns, exclusion_patterns, re_html_tag, re_script_style, BANNED_PREFIXES,
};

/// Input is cut to this many characters before any regex runs.
pub const MAX_SCAN_CHARS: usize = 5000;

pub const MIN_REFERENCE_LEN: usize = 4;
pub const MAX_REFERENCE_LEN: usize = 20;

/// Words in the matched text that earn a confidence bonus.
const CONTEXT_KEYWORDS: &[&str] = &["load", "quote", "reference"];
const CONTEXT_BONUS: u8 = 20;
/// Penalty for the least specific patterns, and the floor it can't push below.
const LOW_SPECIFICITY_PENALTY: u8 = 30;
const LOW_SPECIFICITY_FLOOR: u8 = 50;
/// How many of the lowest-priority patterns take the penalty.
const LOW_SPECIFICITY_PATTERNS: usize = 2;

/// Extract a load reference from an email, scanning the subject then the body.
pub fn extract_from_email(email: &EmailContent) -> ExtractionResult {
    extract_reference(&email.searchable_text())
}

/// Extract a load reference from raw text (plain or HTML).
pub fn extract_reference(content: &str) -> ExtractionResult {
    let text = prepare_text(content);
    if text.is_empty() {
        return ExtractionResult::not_found("no content to scan");
    }

    let patterns = candidate_patterns();
    let mut rejected = Vec::new();

    for (index, pattern) in patterns.iter().enumerate() {
        for caps in pattern.regex.captures_iter(&text) {
            let Some(raw) = caps.get(1) else { continue };
            match validate_reference(raw.as_str()) {
                Ok(reference) => {
                    let matched_text = caps.get(0).map_or(raw.as_str(), |m| m.as_str());
                    let confidence = score(index, patterns.len(), matched_text);
                    return ExtractionResult {
                        found: true,
                        reason: format!(
                            "matched {} on '{}'",
                            pattern.id,
                            matched_text.trim()
                        ),
                        reference: Some(reference),
                        confidence,
                        matched_pattern_id: Some(pattern.id.to_string()),
                        rejected,
                    };
                }
                Err(why) => rejected.push(RejectedCandidate {
                    pattern_id: pattern.id.to_string(),
                    candidate: raw.as_str().to_string(),
                    reason: why.to_string(),
                }),
            }
        }
    }

    let reason = if rejected.is_empty() {
        "no reference pattern matched".to_string()
    } else {
        format!("no valid reference; {} candidate(s) rejected", rejected.len())
    };
    ExtractionResult {
        rejected,
        ..ExtractionResult::not_found(reason)
    }
}

/// Truncate, strip markup, collapse whitespace, and blank out exclusions.
fn prepare_text(content: &str) -> String {
    let bounded = truncate_chars(content, MAX_SCAN_CHARS);
    let without_blocks = re_script_style().replace_all(bounded, " ");
    let without_tags = re_html_tag().replace_all(&without_blocks, " ");
    let decoded = decode_entities(&without_tags);
    let mut text = collapse_whitespace(&decoded);

    for exclusion in exclusion_patterns() {
        if exclusion.regex.is_match(&text) {
            text = exclusion.regex.replace_all(&text, " ").into_owned();
        }
    }

    collapse_whitespace(&text)
}

/// The handful of entities that show up around reference numbers in HTML mail.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#35;", "#")
        .replace("&num;", "#")
        .replace("&colon;", ":")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Trim, uppercase, and keep only `[A-Z0-9-]`; stray edge hyphens are dropped.
pub fn normalize_reference(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .trim_matches('-')
        .to_ascii_uppercase()
}

/// Normalize a candidate and check it could be a load reference.
pub fn validate_reference(raw: &str) -> Result<String, &'static str> {
    let reference = normalize_reference(raw);
    if reference.len() < MIN_REFERENCE_LEN {
        return Err("shorter than 4 characters");
    }
    if reference.len() > MAX_REFERENCE_LEN {
        return Err("longer than 20 characters");
    }
    if !reference.chars().any(|c| c.is_ascii_digit()) {
        return Err("contains no digit");
    }
    if BANNED_PREFIXES.iter().any(|p| reference.starts_with(p)) {
        return Err("starts with a non-load prefix");
    }
    Ok(reference)
}

/// Confidence for a match from the pattern at `index` of `pattern_count`.
fn score(index: usize, pattern_count: usize, matched_text: &str) -> u8 {
    let mut confidence = 100u8.saturating_sub((index as u8).saturating_mul(10));

    let lower = matched_text.to_lowercase();
    if CONTEXT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        confidence = confidence.saturating_add(CONTEXT_BONUS).min(100);
    }

    if index + LOW_SPECIFICITY_PATTERNS >= pattern_count {
        confidence = confidence
            .saturating_sub(LOW_SPECIFICITY_PENALTY)
            .max(LOW_SPECIFICITY_FLOOR);
    }

    confidence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number() {
        let result = extract_reference("Please quote order #302734 ASAP");
        assert!(result.found);
        assert_eq!(result.reference.as_deref(), Some("302734"));
        assert_eq!(
            result.matched_pattern_id.as_deref(),
            Some("order_or_reference_number")
        );
        assert_eq!(result.confidence, 90);
    }

    #[test]
    fn test_labeled_load_reference_gets_full_confidence() {
        let result = extract_reference("Can you cover Load #: qf-98765 tomorrow?");
        assert_eq!(result.reference.as_deref(), Some("QF-98765"));
        assert_eq!(
            result.matched_pattern_id.as_deref(),
            Some("labeled_load_reference")
        );
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_load_keyword_without_label_word() {
        for (input, expected) in [
            ("Load: 12345 still open?", "12345"),
            ("Re: Load 12345", "12345"),
            ("Load 44556 rate?", "44556"),
            ("Quote: 12345", "12345"),
        ] {
            let result = extract_reference(input);
            assert_eq!(result.reference.as_deref(), Some(expected), "input: {input}");
            assert_eq!(
                result.matched_pattern_id.as_deref(),
                Some("labeled_load_reference"),
                "input: {input}"
            );
            assert_eq!(result.confidence, 100, "input: {input}");
        }
    }

    #[test]
    fn test_reply_subject_reference_is_found_again() {
        let subject = crate::reply::subject::reply_subject("Truck needed", Some("12345"));
        assert_eq!(extract_reference(&subject).reference.as_deref(), Some("12345"));
    }

    #[test]
    fn test_load_followed_by_word_is_not_a_reference() {
        let result = extract_reference("We can load tomorrow morning");
        assert!(!result.found);
        assert_eq!(result.rejected[0].candidate, "tomorrow");
        assert_eq!(result.rejected[0].reason, "contains no digit");
    }

    #[test]
    fn test_reference_keyword_bonus_on_second_pattern() {
        let result = extract_reference("Reference Number: 4455667");
        assert_eq!(result.reference.as_deref(), Some("4455667"));
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_exclusion_precedence() {
        let result = extract_reference("MC123456 order #445566");
        assert_eq!(result.reference.as_deref(), Some("445566"));
    }

    #[test]
    fn test_mc_number_alone_is_never_returned() {
        let result = extract_reference("Carrier MC123456 checking in");
        assert!(!result.found);
        assert!(result.reference.is_none());
    }

    #[test]
    fn test_phone_and_invoice_ignored() {
        let result = extract_reference("Call 312-555-0199 about invoice #889231, thanks");
        assert!(!result.found);
    }

    #[test]
    fn test_company_code_is_penalized() {
        let result = extract_reference("Checking on TQL4455-B for Friday");
        assert_eq!(result.reference.as_deref(), Some("TQL4455-B"));
        assert_eq!(
            result.matched_pattern_id.as_deref(),
            Some("company_prefixed_code")
        );
        assert_eq!(result.confidence, 50);
    }

    #[test]
    fn test_bare_six_digit_floor() {
        let result = extract_reference("Is 302734 still open?");
        assert_eq!(result.reference.as_deref(), Some("302734"));
        assert_eq!(result.matched_pattern_id.as_deref(), Some("bare_six_digit"));
        assert_eq!(result.confidence, 50);
    }

    #[test]
    fn test_higher_priority_pattern_wins_over_earlier_position() {
        let result = extract_reference("Saw 111222 on the board; Load # QF-777 is ours");
        assert_eq!(result.reference.as_deref(), Some("QF-777"));
    }

    #[test]
    fn test_leftmost_match_wins_within_pattern() {
        let result = extract_reference("order #111111 or order #222222");
        assert_eq!(result.reference.as_deref(), Some("111111"));
    }

    #[test]
    fn test_invalid_candidate_falls_through() {
        // "load # 12" fails the length floor; the bare number still counts.
        let result = extract_reference("load # 12 / 654321");
        assert_eq!(result.reference.as_deref(), Some("654321"));
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].pattern_id, "labeled_load_reference");
        assert_eq!(result.rejected[0].candidate, "12");
    }

    #[test]
    fn test_only_short_candidates_is_not_found() {
        let result = extract_reference("load # 12");
        assert!(!result.found);
        assert_eq!(result.confidence, 0);
        assert!(result.reason.contains("rejected"));
    }

    #[test]
    fn test_banned_prefix_rejected() {
        // "MCX" slips past the MC-number exclusion but not the prefix check.
        let result = extract_reference("Load # MCX12345");
        assert!(!result.found);
        assert_eq!(result.rejected[0].reason, "starts with a non-load prefix");
    }

    #[test]
    fn test_html_body() {
        let html = "<html><body><p>Hi team,</p>\
                    <p>Load&nbsp;Ref: <strong>AB-20931</strong></p></body></html>";
        let result = extract_reference(html);
        assert_eq!(result.reference.as_deref(), Some("AB-20931"));
    }

    #[test]
    fn test_no_reference() {
        let result = extract_reference("Hi, do you have a truck available?");
        assert!(!result.found);
        assert!(result.matched_pattern_id.is_none());
        assert_eq!(result.reason, "no reference pattern matched");
    }

    #[test]
    fn test_empty_input() {
        let result = extract_reference("   ");
        assert!(!result.found);
        assert_eq!(result.reason, "no content to scan");
    }

    #[test]
    fn test_truncation_bounds_scan() {
        let mut content = "x ".repeat(MAX_SCAN_CHARS);
        content.push_str("order #302734");
        assert!(!extract_reference(&content).found);
    }

    #[test]
    fn test_idempotent() {
        let input = "Re: quote ref QF-98765 <br> MC 445566";
        assert_eq!(extract_reference(input), extract_reference(input));
    }

    #[test]
    fn test_found_iff_reference() {
        for input in ["", "order #302734", "MC123456", "load # 12", "QF-98765"] {
            let result = extract_reference(input);
            assert_eq!(result.found, result.reference.is_some(), "input: {input}");
        }
    }

    #[test]
    fn test_normalize_reference() {
        assert_eq!(normalize_reference("  qf-98765 "), "QF-98765");
        assert_eq!(normalize_reference("ab#123."), "AB123");
        assert_eq!(normalize_reference("-123456-"), "123456");
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("12").is_err());
        assert!(validate_reference("ABCDE").is_err());
        assert!(validate_reference("123456789012345678901").is_err());
        assert!(validate_reference("USDOT12345").is_err());
        assert!(validate_reference("inv-5521").is_err());
        assert_eq!(validate_reference("qf-98765"), Ok("QF-98765".to_string()));
    }

    #[test]
    fn test_extract_from_email_uses_subject() {
        let email = EmailContent::new("Load # 556677 rate?", "See subject");
        assert_eq!(
            extract_from_email(&email).reference.as_deref(),
            Some("556677")
        );
    }
}
