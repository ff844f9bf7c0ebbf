use chrono::NaiveDate;

pub const SIM_PROVIDERS: &[&str] = &["VODACOM", "MTN", "CELL C", "TELKOM", "RAIN"];
pub const SIM_CODES: &[&str] = &["STD", "M2M", "APN"];
pub const SOLD_BY_CHANNELS: &[&str] = &["DIRECT", "DEALER", "AGENT", "ONLINE"];

const MONTHS: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

pub fn parse_date_safe(date_str: &str) -> Option<NaiveDate> {
    if date_str.trim().is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_str, "%Y%m%d"))
        .ok()
}

/// Billing month codes look like "EXP JAN 24".
pub fn is_month_code(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("EXP ") else {
        return false;
    };
    let mut parts = rest.splitn(2, ' ');
    let month = parts.next().unwrap_or("");
    let year = parts.next().unwrap_or("");
    MONTHS.contains(&month) && year.len() == 2 && year.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || value.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

pub fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase())
}
