//! Reply subject lines.

/// Reply prefixes stripped from the original subject before re-prefixing.
const REPLY_PREFIXES: &[&str] = &["re:", "fwd:", "fw:"];

/// Strip any run of leading "Re:"/"Fwd:"/"Fw:" prefixes (case-insensitive).
pub fn strip_reply_prefixes(subject: &str) -> &str {
    let mut rest = subject.trim();
    loop {
        let lower = rest.to_ascii_lowercase();
        match REPLY_PREFIXES.iter().find(|p| lower.starts_with(*p)) {
            Some(prefix) => rest = rest[prefix.len()..].trim_start(),
            None => return rest,
        }
    }
}

/// Build the reply subject.
///
/// "Fwd: Truck needed" + Some("302734") → "Re: Truck needed - Load 302734".
/// A subject that already mentions the reference isn't extended again, so
/// reformatting a reply subject is stable.
pub fn reply_subject(original: &str, reference: Option<&str>) -> String {
    let base = strip_reply_prefixes(original);

    if base.is_empty() {
        return match reference {
            Some(reference) => format!("Load {} - Quote Details", reference),
            None => "Load Inquiry Response".to_string(),
        };
    }

    match reference {
        Some(reference) if !contains_ignore_case(base, reference) => {
            format!("Re: {} - Load {}", base, reference)
        }
        _ => format!("Re: {}", base),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
