//! Compile-once regex patterns for reference extraction.
//!
//! Two ordered sets:
//! - exclusions: identifiers that look like load references but aren't
//!   (MC/DOT numbers, invoices, POs, phone numbers). Removed before any
//!   candidate search.
//! - candidates: most explicit first, bare 6-digit numbers last. The index in
//!   [`candidate_patterns`] is the pattern's priority rank.

use std::sync::OnceLock;

use regex::Regex;

/// A named candidate pattern. Capture group 1 is the reference.
pub struct CandidatePattern {
    pub id: &'static str,
    pub regex: Regex,
}

/// A named exclusion pattern. The whole match is blanked out.
pub struct ExclusionPattern {
    pub id: &'static str,
    pub regex: Regex,
}

/// Optional "#", "No.", "Number" label between a keyword and its digits.
const LABEL: &str = r"[ \t]*(?:#|no\.?|num\.?|number)?[ \t]*[:#\-]?[ \t]*";

/// Candidate patterns in priority order.
pub fn candidate_patterns() -> &'static [CandidatePattern] {
    static PATTERNS: OnceLock<Vec<CandidatePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            // "Load #: QF-98765", "quote ref 12345", "Load Reference Number: 445566",
            // "Load: 12345", "Load 44556". The keyword is followed by labels,
            // a ":"/"-" separator, or plain whitespace.
            CandidatePattern {
                id: "labeled_load_reference",
                regex: Regex::new(concat!(
                    r"(?i)\b(?:load|quote)\b",
                    r"(?:[ \t]*(?:(?:reference|ref|number|num|no|id)\b\.?[ \t]*|#[ \t]*)+[:#\-]?[ \t]*",
                    r"|[ \t]*[:\-][ \t]*",
                    r"|[ \t]+)",
                    r"([A-Z0-9][A-Z0-9\-]*)",
                ))
                .unwrap(),
            },
            // "order #302734", "Reference Number: 4455667", "ref: 123456"
            CandidatePattern {
                id: "order_or_reference_number",
                regex: Regex::new(
                    r"(?i)\b(?:order|reference|ref)(?:[ \t]*(?:number|num|no)\b\.?)?[ \t]*[:#]?[ \t]*#?[ \t]*(\d{6,8})\b",
                )
                .unwrap(),
            },
            // "QF-98765", "ABC123456", "TQL4455-B"
            CandidatePattern {
                id: "company_prefixed_code",
                regex: Regex::new(r"(?i)\b([A-Z]{2,4}-?\d{3,8}(?:-?[A-Z0-9]+)?)\b").unwrap(),
            },
            CandidatePattern {
                id: "bare_six_digit",
                regex: Regex::new(r"\b(\d{6})\b").unwrap(),
            },
        ]
    })
}

/// Exclusion patterns, applied in order.
pub fn exclusion_patterns() -> &'static [ExclusionPattern] {
    static PATTERNS: OnceLock<Vec<ExclusionPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            ExclusionPattern {
                id: "mc_number",
                regex: Regex::new(&format!(r"(?i)\bMC{LABEL}\d+")).unwrap(),
            },
            ExclusionPattern {
                id: "dot_number",
                regex: Regex::new(&format!(r"(?i)\b(?:US[ \t]*)?DOT{LABEL}\d+")).unwrap(),
            },
            ExclusionPattern {
                id: "invoice_number",
                regex: Regex::new(&format!(
                    r"(?i)\binv(?:oice)?\d[A-Z0-9\-]*|\binv(?:oice)?\b\.?{LABEL}[A-Z0-9\-]*\d[A-Z0-9\-]*"
                ))
                .unwrap(),
            },
            ExclusionPattern {
                id: "po_number",
                regex: Regex::new(&format!(
                    r"(?i)\bPO\d[A-Z0-9\-]*|(?:\bP\.O\.|\bPO\b|\bpurchase[ \t]+order\b){LABEL}[A-Z0-9\-]*\d[A-Z0-9\-]*"
                ))
                .unwrap(),
            },
            ExclusionPattern {
                id: "labeled_phone",
                regex: Regex::new(&format!(
                    r"(?i)\b(?:phone|ph|tel|telephone|fax|cell|mobile|call)\b\.?{LABEL}\+?[\d(][\d ().\-]{{5,}}\d"
                ))
                .unwrap(),
            },
            ExclusionPattern {
                id: "phone_shape",
                regex: Regex::new(r"(?:\+?1[ .\-]?)?\(?\b\d{3}\)?[ .\-]\d{3}[ .\-]\d{4}\b").unwrap(),
            },
        ]
    })
}

/// `<script>`/`<style>` blocks, dropped whole before tag stripping.
pub fn re_script_style() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").unwrap()
    })
}

pub fn re_html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Reference prefixes that always denote something other than a load.
pub const BANNED_PREFIXES: &[&str] = &["USDOT", "DOT", "MC", "PO", "INV"];
