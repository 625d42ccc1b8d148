/// Lowercase, strip whitespace and underscores, keep the last dotted segment
/// and drop a trailing `[]`.
///
/// `Data.Account_Id` and `accountid` normalize to the same key.
pub fn normalize_name(raw: &str) -> String {
    let cleaned = raw.replace('\u{a0}', " ");
    let segment = cleaned.rsplit('.').next().unwrap_or("");
    let segment = segment.trim();
    let segment = segment.strip_suffix("[]").unwrap_or(segment);
    segment
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase and collapse runs of whitespace (including NBSP) to one space.
pub fn norm_text(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Alphanumeric-only lowercase key; `Backend - Input` and `backend-input` share one.
pub fn marker_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
