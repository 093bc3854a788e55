//! Field-level parsing helpers shared by the table definitions.

use crate::Result;
use chrono::NaiveDate;
use compact_str::CompactString;
use core::str::FromStr;
use ohno::{IntoAppError, app_err};

/// Marker the dataset uses for SQL NULL.
pub const NULL_MARKER: &str = "\\N";

#[must_use]
pub fn is_null(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == NULL_MARKER
}

pub fn parse_num<T>(s: &str, field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: core::error::Error + Send + Sync + 'static,
{
    s.trim()
        .parse::<T>()
        .into_app_err_with(|| format!("unable to parse {field} from '{s}'"))
}

pub fn parse_optional_num<T>(s: &str, field: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: core::error::Error + Send + Sync + 'static,
{
    if is_null(s) {
        return Ok(None);
    }

    parse_num(s, field).map(Some)
}

/// Parses a position where `0` means "no position" (e.g. a pit-lane start on the grid).
pub fn parse_optional_position(s: &str, field: &str) -> Result<Option<u8>> {
    Ok(parse_optional_num::<u8>(s, field)?.filter(|&p| p > 0))
}

pub fn parse_date(s: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").into_app_err_with(|| format!("unable to parse {field} from '{s}'"))
}

pub fn parse_optional_date(s: &str, field: &str) -> Result<Option<NaiveDate>> {
    if is_null(s) {
        return Ok(None);
    }

    parse_date(s, field).map(Some)
}

/// Parses a session lap time written as `m:ss.fff` or `ss.fff` into seconds.
pub fn parse_optional_lap_time(s: &str, field: &str) -> Result<Option<f64>> {
    if is_null(s) {
        return Ok(None);
    }

    let s = s.trim();
    let seconds = match s.split_once(':') {
        Some((minutes, rest)) => {
            let minutes: u32 = parse_num(minutes, field)?;
            let rest: f64 = parse_num(rest, field)?;
            f64::from(minutes) * 60.0 + rest
        }
        None => parse_num(s, field)?,
    };

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(app_err!("{field} out of range: '{s}'"));
    }

    Ok(Some(seconds))
}

#[must_use]
pub fn parse_text(s: &str) -> CompactString {
    CompactString::new(s.trim())
}

#[must_use]
pub fn parse_optional_text(s: &str) -> Option<CompactString> {
    if is_null(s) { None } else { Some(parse_text(s)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_marker_and_empty_are_null() {
        assert!(is_null("\\N"));
        assert!(is_null(""));
        assert!(is_null("  "));
        assert!(!is_null("0"));
    }

    #[test]
    fn parse_optional_num_handles_null() {
        assert_eq!(parse_optional_num::<u32>("\\N", "grid").unwrap(), None);
        assert_eq!(parse_optional_num::<u32>("12", "grid").unwrap(), Some(12));
        assert!(parse_optional_num::<u32>("R", "grid").is_err());
    }

    #[test]
    fn zero_position_is_none() {
        assert_eq!(parse_optional_position("0", "grid").unwrap(), None);
        assert_eq!(parse_optional_position("3", "grid").unwrap(), Some(3));
    }

    #[test]
    fn lap_time_with_minutes() {
        let t = parse_optional_lap_time("1:23.456", "q1").unwrap().unwrap();
        assert!((t - 83.456).abs() < 1e-9);
    }

    #[test]
    fn lap_time_without_minutes() {
        let t = parse_optional_lap_time("59.5", "q1").unwrap().unwrap();
        assert!((t - 59.5).abs() < 1e-9);
    }

    #[test]
    fn lap_time_rejects_garbage() {
        assert!(parse_optional_lap_time("x:12", "q1").is_err());
        assert_eq!(parse_optional_lap_time("\\N", "q1").unwrap(), None);
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2021-03-28", "date").unwrap(), NaiveDate::from_ymd_opt(2021, 3, 28).unwrap());
        assert!(parse_date("28/03/2021", "date").is_err());
        assert_eq!(parse_optional_date("\\N", "dob").unwrap(), None);
    }
}
