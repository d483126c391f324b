//! Flexible time specifications.
//!
//! Accepted forms:
//! - `""` - no bound
//! - `now`
//! - relative offsets into the past: `-1h`, `-30m`, `-2h30m`, `-7d`, `-1.5h`
//! - `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS` (local time)
//! - RFC 3339 timestamps

use crate::model::{TimeRange, TimeSpecError};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

const LOCAL_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Resolve a time specification relative to the current time.
///
/// # Errors
///
/// Returns `TimeSpecError` when the value matches none of the accepted forms.
pub fn resolve(spec: &str) -> Result<Option<DateTime<Utc>>, TimeSpecError> {
    resolve_at(spec, Utc::now())
}

/// Resolve both bounds of a range. The first failure wins.
///
/// # Errors
///
/// Returns the error of the first bound that fails to resolve.
pub fn resolve_range(start: &str, end: &str) -> Result<TimeRange, TimeSpecError> {
    let now = Utc::now();
    Ok(TimeRange {
        start: resolve_at(start, now)?,
        end: resolve_at(end, now)?,
    })
}

/// Resolve a time specification against an explicit `now`.
///
/// # Errors
///
/// Returns `TimeSpecError` when the value matches none of the accepted forms.
pub fn resolve_at(spec: &str, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, TimeSpecError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(None);
    }
    if spec.eq_ignore_ascii_case("now") {
        return Ok(Some(now));
    }
    if let Some(offset) = spec.strip_prefix('-') {
        return parse_duration_millis(offset)
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|delta| now.checked_sub_signed(delta))
            .map(Some)
            .ok_or_else(|| TimeSpecError::InvalidDuration(spec.to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(spec) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    let naive = LOCAL_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(spec, layout).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(spec, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });

    naive
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| Some(local.with_timezone(&Utc)))
        .ok_or_else(|| TimeSpecError::Unrecognized(spec.to_string()))
}

/// Parse `1h30m`-style durations into milliseconds.
///
/// Totals that do not fit in an `i64` are rejected rather than saturated.
fn parse_duration_millis(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }

    let mut total = 0f64;
    let mut rest = text;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let value: f64 = number.parse().ok()?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = match unit {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            "d" => 86_400_000.0,
            _ => return None,
        };

        total += value * scale;
        rest = tail;
    }

    let total = total.round();
    if !total.is_finite() || total >= i64::MAX as f64 {
        return None;
    }
    Some(total as i64)
}
