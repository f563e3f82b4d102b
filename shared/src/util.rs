/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `true` when the string is empty or whitespace only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
