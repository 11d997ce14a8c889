//! Display helpers for classes, sessions, and profiles.
//!
//! Malformed input never errors: date helpers return an empty string and
//! `format_time` hands the input back unchanged.

use time::Date;
use time::macros::format_description;

/// Parse `yyyy-MM-dd`, ignoring any `T...` or ` ...` time suffix.
#[must_use]
pub fn parse_api_date(raw: &str) -> Option<Date> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
}

/// `2025-01-05` → `Jan 05, 2025`.
#[must_use]
pub fn format_date(raw: &str) -> String {
    parse_api_date(raw)
        .and_then(|date| date.format(format_description!("[month repr:short] [day], [year]")).ok())
        .unwrap_or_default()
}

/// Normalize any ISO date (with or without time) to `yyyy-MM-dd`.
#[must_use]
pub fn format_date_for_api(raw: &str) -> String {
    parse_api_date(raw)
        .and_then(|date| date.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_default()
}

/// `18:30` or `18:30:00` → `6:30 PM`.
#[must_use]
pub fn format_time(raw: &str) -> String {
    let mut parts = raw.trim().split(':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return raw.to_owned();
    };
    let Ok(hour) = hours.parse::<u8>() else {
        return raw.to_owned();
    };
    if hour > 23 || minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_owned();
    }
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minutes} {suffix}")
}

/// GBP with thousands separators: `1234.5` → `£1,234.50`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return format!("£{price}");
    }
    let pence = (price.abs() * 100.0).round() as u64;
    let pounds = group_thousands(pence / 100);
    let sign = if price < 0.0 && pence > 0 { "-" } else { "" };
    format!("{sign}£{pounds}.{:02}", pence % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Remaining capacity.
#[must_use]
pub fn spots_left(current: u32, max: u32) -> u32 {
    max.saturating_sub(current)
}

/// Percentage of capacity still free, rounded; 0 when `max` is 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_availability(current: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let free = f64::from(spots_left(current, max));
    (free / f64::from(max) * 100.0).round() as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailabilityStatus {
    Full,
    AlmostFull,
    Available,
}

impl AvailabilityStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::AlmostFull => "Almost Full",
            Self::Available => "Available",
        }
    }
}

#[must_use]
pub fn availability_status(current: u32, max: u32) -> AvailabilityStatus {
    match calculate_availability(current, max) {
        0 => AvailabilityStatus::Full,
        a if a < 30 => AvailabilityStatus::AlmostFull,
        _ => AvailabilityStatus::Available,
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Uppercased first letters of first and last name.
#[must_use]
pub fn initials(first_name: &str, last_name: &str) -> String {
    [first_name, last_name]
        .iter()
        .filter_map(|name| name.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
