use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::model::Cell;
use crate::parsing::normalize::strip_quotes;
use crate::parsing::values::leading_number;

/// Serial day numbers at or below this are not treated as dates.
pub const SERIAL_DATE_MIN: f64 = 30000.0;
/// Upper bound for serial numbers rendered as dates for display.
pub const SERIAL_DISPLAY_MAX: f64 = 60000.0;

const DISPLAY_FORMAT: &str = "%d/%m/%Y";
const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";
const NOT_AVAILABLE: &str = "N/A";

/// Convert a spreadsheet serial day number (epoch 1899-12-30) to a
/// date-time. The fractional part is the time of day.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    let offset = TimeDelta::try_milliseconds(millis as i64)?;
    epoch.checked_add_signed(offset)
}

/// Parse a promised-delivery value.
///
/// Accepted encodings:
/// - `DD/MM/YYYY HH:MM[:SS]`
/// - `YYYY-MM-DD`, optionally followed by ` HH:MM[:SS]` or `THH:MM[:SS]`
/// - a spreadsheet serial day number above 30000
///
/// Returns `None` for anything else.
pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.contains('/') && s.contains(':') {
        parse_day_first(s)
    } else if s.contains('-') {
        parse_iso_like(s)
    } else {
        leading_number(s)
            .filter(|n| *n > SERIAL_DATE_MIN)
            .and_then(serial_to_datetime)
    }
}

/// Parse a user-supplied reference timestamp. Same encodings as
/// [`parse_deadline`], plus a bare `DD/MM/YYYY` (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_deadline(raw).or_else(|| {
        NaiveDate::parse_from_str(raw.trim(), DISPLAY_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let mut parts = s.split_whitespace();
    let date_part = parts.next()?;
    let time_part = parts.next()?;

    let mut dmy = date_part.split('/');
    let day: u32 = dmy.next()?.parse().ok()?;
    let month: u32 = dmy.next()?.parse().ok()?;
    let year: i32 = dmy.next()?.parse().ok()?;
    if dmy.next().is_some() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = parse_time(time_part)?;
    Some(date.and_time(time))
}

fn parse_iso_like(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let normalised = s.replacen(' ', "T", 1);
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalised, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(&normalised, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Render a date-bearing cell as `DD/MM/YYYY`.
///
/// Blank and "not applicable" markers render as `N/A`. Serial numbers and
/// ISO-like dates are converted; anything else is cut to its first ten
/// characters instead of failing.
pub fn format_display_date(cell: Option<&Cell>) -> String {
    let Some(cell) = cell.filter(|c| c.is_truthy()) else {
        return NOT_AVAILABLE.to_string();
    };

    let s = strip_quotes(cell.to_text().trim());
    if matches!(
        s.as_str(),
        "" | "N/A" | "0" | "NAO APLICAVEL" | "NÃO APLICÁVEL"
    ) {
        return NOT_AVAILABLE.to_string();
    }

    if let Some(n) = leading_number(&s) {
        if n > SERIAL_DATE_MIN && n < SERIAL_DISPLAY_MAX {
            return match serial_to_datetime(n) {
                Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
                None => s,
            };
        }
    }

    if s.contains('-') {
        let date_token = s.split(' ').next().unwrap_or_default();
        let parts: Vec<&str> = date_token.split('-').collect();
        if parts.len() == 3 {
            return parts.iter().rev().copied().collect::<Vec<_>>().join("/");
        }
    }

    s.chars().take(10).collect()
}

/// Render a date-time cell for the detail view, keeping text as exported.
///
/// Serial numbers are converted to `DD/MM/YYYY HH:MM`; blank cells render
/// as `fallback`.
pub fn format_display_datetime(cell: Option<&Cell>, fallback: &str) -> String {
    match cell.filter(|c| c.is_truthy()) {
        None => fallback.to_string(),
        Some(Cell::Number(n)) if *n > SERIAL_DATE_MIN => serial_to_datetime(*n)
            .map(|dt| dt.format(DISPLAY_DATETIME_FORMAT).to_string())
            .unwrap_or_else(|| n.to_string()),
        Some(c) => {
            let s = strip_quotes(c.to_text().trim());
            if s.is_empty() {
                fallback.to_string()
            } else {
                s
            }
        }
    }
}
