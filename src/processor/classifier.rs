//! Scenario classification: which reply an email gets.
//!
//! Pure function of the extraction result and the lookup outcome.
//! Priority (first match wins):
//!   1. No reference found       → NoReference
//!   2. Lookup failed            → Error
//!   3. Lookup returned a record → LoadFound (complete or partial)
//!   4. Not found / not attempted → LoadPending

use crate::types::{ExtractionResult, LookupOutcome, Scenario};

/// Classify one processed email.
///
/// Record completeness does not change the scenario: a partial record is
/// still `LoadFound`, and the formatter marks the missing fields.
pub fn classify(extraction: &ExtractionResult, outcome: &LookupOutcome) -> Scenario {
    if !extraction.found {
        return Scenario::NoReference;
    }

    match outcome {
        LookupOutcome::Error { .. } => Scenario::Error,
        LookupOutcome::Success { .. } => Scenario::LoadFound,
        LookupOutcome::NotFound | LookupOutcome::Skipped => Scenario::LoadPending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoadRecord;

    fn found() -> ExtractionResult {
        ExtractionResult {
            found: true,
            reference: Some("302734".to_string()),
            confidence: 90,
            matched_pattern_id: Some("order_or_reference_number".to_string()),
            reason: "test".to_string(),
            rejected: Vec::new(),
        }
    }

    fn outcomes() -> Vec<LookupOutcome> {
        vec![
            LookupOutcome::Success {
                data: LoadRecord::default(),
            },
            LookupOutcome::NotFound,
            LookupOutcome::Error {
                message: "timeout".to_string(),
            },
            LookupOutcome::Skipped,
        ]
    }

    #[test]
    fn test_no_reference_always_wins() {
        let none = ExtractionResult::not_found("nothing");
        for outcome in outcomes() {
            assert_eq!(classify(&none, &outcome), Scenario::NoReference);
        }
    }

    #[test]
    fn test_found_matrix() {
        let expected = [
            Scenario::LoadFound,
            Scenario::LoadPending,
            Scenario::Error,
            Scenario::LoadPending,
        ];
        for (outcome, want) in outcomes().iter().zip(expected) {
            assert_eq!(classify(&found(), outcome), want, "outcome: {}", outcome.kind());
        }
    }

    #[test]
    fn test_partial_record_is_still_found() {
        let partial = LookupOutcome::Success {
            data: LoadRecord {
                reference: "302734".to_string(),
                ..Default::default()
            },
        };
        assert!(!partial.record().unwrap().is_complete());
        assert_eq!(classify(&found(), &partial), Scenario::LoadFound);
    }
}
