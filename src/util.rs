/// Truncate text to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Collapse whitespace runs (including newlines) into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract bare email from a "From" header like "Name <email@example.com>".
pub fn extract_email_address(from_field: &str) -> String {
    if let Some(start) = from_field.find('<') {
        if let Some(end) = from_field.find('>') {
            if end > start {
                return from_field[start + 1..end].trim().to_lowercase();
            }
        }
    }
    from_field.trim().to_lowercase()
}

/// Extract the display name from a "From" header like "Jane Doe <jane@shipper.com>".
///
/// Returns `None` for bare addresses or when the "name" is itself an address.
/// Handles quoted display names: `"Doe, Jane" <jane@shipper.com>`.
pub fn extract_display_name(from_field: &str) -> Option<String> {
    let trimmed = from_field.trim();
    let angle_start = trimmed.find('<')?;
    if angle_start == 0 {
        return None;
    }

    let name = trimmed[..angle_start].trim().trim_matches('"').trim();
    if name.is_empty() || name.contains('@') {
        return None;
    }

    Some(name.to_string())
}

/// First name for a greeting, from the display name in a "From" header.
///
/// "Jane Doe <...>" → "Jane", "Doe, Jane <...>" → "Jane".
/// Role names like "Dispatch" come back as-is; a name with no letters yields `None`.
pub fn greeting_name(from_field: &str) -> Option<String> {
    let name = extract_display_name(from_field)?;
    let first = match name.split_once(',') {
        Some((_, given)) if !given.trim().is_empty() => given.trim().split_whitespace().next(),
        _ => name.split_whitespace().next(),
    }?;
    if !first.chars().any(char::is_alphabetic) {
        return None;
    }
    Some(first.to_string())
}

/// Format a dollar amount as "$1,250.00".
pub fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}
