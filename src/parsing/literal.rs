//! # Date and Timestamp Literal Parsing
//!
//! This module parses SQL temporal literals into the engine's canonical
//! representations: days since the Unix epoch for dates, microseconds since
//! the Unix epoch (UTC) for timestamps.
//!
//! ## Accepted Formats
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Date | `YYYY-MM-DD` | `2024-01-15` |
//! | Timestamp | `YYYY-MM-DD` | midnight UTC |
//! | Timestamp | `YYYY-MM-DD HH:MM:SS[.ffffff]` | `2024-01-15 13:45:30` |
//! | Timestamp | RFC-3339 | `2024-01-15T13:45:30.250Z`, `...+02:00` |
//!
//! ## Calendar Arithmetic
//!
//! Conversion between civil dates and day numbers uses the standard
//! proleptic-Gregorian era decomposition, valid far beyond any plausible
//! SQL input range. Leap years follow the usual 4/100/400 rule.

use eyre::{bail, Result, WrapErr};
use std::time::{SystemTime, UNIX_EPOCH};

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Current wall clock, microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_micros() as i64,
        Err(_) => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = month as i64 + if month > 2 { -3 } else { 9 };
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    ((y + if month <= 2 { 1 } else { 0 }) as i32, month, day)
}

/// Parses `YYYY-MM-DD` into days since the Unix epoch.
pub fn parse_date(s: &str) -> Result<i32> {
    let s = s.trim();
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        bail!("invalid date format '{}': expected YYYY-MM-DD", s);
    }

    let year: i32 = parts[0]
        .parse()
        .wrap_err_with(|| format!("invalid year in date '{}'", s))?;
    let month: u32 = parts[1]
        .parse()
        .wrap_err_with(|| format!("invalid month in date '{}'", s))?;
    let day: u32 = parts[2]
        .parse()
        .wrap_err_with(|| format!("invalid day in date '{}'", s))?;

    if !(1..=12).contains(&month) {
        bail!("invalid month {} in date '{}': must be 1-12", month, s);
    }
    let dim = days_in_month(year, month);
    if day < 1 || day > dim {
        bail!("invalid day {} in date '{}': month has {} days", day, s, dim);
    }

    Ok(days_from_civil(year, month, day) as i32)
}

/// Parses a time-of-day `HH:MM:SS[.ffffff]` into microseconds since midnight.
fn parse_time_of_day(s: &str) -> Result<i64> {
    let (clock, fraction) = match s.find('.') {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        bail!("invalid time format '{}': expected HH:MM:SS", s);
    }
    let hour: i64 = parts[0]
        .parse()
        .wrap_err_with(|| format!("invalid hour in time '{}'", s))?;
    let minute: i64 = parts[1]
        .parse()
        .wrap_err_with(|| format!("invalid minute in time '{}'", s))?;
    let second: i64 = parts[2]
        .parse()
        .wrap_err_with(|| format!("invalid second in time '{}'", s))?;

    if !(0..24).contains(&hour) || !(0..60).contains(&minute) || !(0..60).contains(&second) {
        bail!("time '{}' out of range", s);
    }

    let mut micros = (hour * 3600 + minute * 60 + second) * MICROS_PER_SECOND;
    if let Some(frac) = fraction {
        if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            bail!("invalid fractional seconds in time '{}'", s);
        }
        let mut padded = frac.to_string();
        while padded.len() < 6 {
            padded.push('0');
        }
        micros += padded.parse::<i64>().unwrap_or(0);
    }
    Ok(micros)
}

/// Parses a timestamp literal into microseconds since the Unix epoch (UTC).
///
/// Accepts a bare date (midnight UTC), `date time` with a space separator,
/// and RFC-3339 with a `T` separator and optional `Z` / `±HH:MM` offset.
pub fn parse_timestamp(s: &str) -> Result<i64> {
    let s = s.trim();

    let split_at = s
        .char_indices()
        .find(|(_, c)| *c == 'T' || *c == 't' || *c == ' ')
        .map(|(i, _)| i);

    let (date_part, time_part) = match split_at {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let days = parse_date(date_part)? as i64;
    let mut micros = days * MICROS_PER_DAY;

    if let Some(time_str) = time_part {
        // Peel off a trailing timezone designator before reading the clock.
        let (clock_str, offset_micros) = split_timezone(time_str)?;
        micros += parse_time_of_day(clock_str)?;
        micros -= offset_micros;
    }

    Ok(micros)
}

/// Splits `13:45:30+02:00` into the clock part and the UTC offset in
/// microseconds. `Z` and a missing designator both mean UTC.
fn split_timezone(time_str: &str) -> Result<(&str, i64)> {
    if let Some(stripped) = time_str
        .strip_suffix('Z')
        .or_else(|| time_str.strip_suffix('z'))
    {
        return Ok((stripped, 0));
    }

    for (idx, c) in time_str.char_indices() {
        if (c == '+' || c == '-') && idx > 0 {
            let clock = &time_str[..idx];
            let sign = if c == '-' { -1 } else { 1 };
            let offset_str = &time_str[idx + 1..];
            let parts: Vec<&str> = offset_str.split(':').collect();
            let hours: i64 = parts[0]
                .parse()
                .wrap_err_with(|| format!("invalid timezone offset '{}'", offset_str))?;
            let minutes: i64 = if parts.len() > 1 {
                parts[1]
                    .parse()
                    .wrap_err_with(|| format!("invalid timezone offset '{}'", offset_str))?
            } else {
                0
            };
            let offset = sign * (hours * 3600 + minutes * 60) * MICROS_PER_SECOND;
            return Ok((clock, offset));
        }
    }

    Ok((time_str, 0))
}

/// Formats days since the Unix epoch as `YYYY-MM-DD`.
pub fn format_date(days: i32) -> String {
    let (y, m, d) = civil_from_days(days as i64);
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Formats microseconds since the Unix epoch as
/// `YYYY-MM-DD HH:MM:SS[.ffffff]`.
pub fn format_timestamp(micros: i64) -> String {
    let days = micros.div_euclid(MICROS_PER_DAY);
    let in_day = micros.rem_euclid(MICROS_PER_DAY);
    let (y, m, d) = civil_from_days(days);

    let secs = in_day / MICROS_PER_SECOND;
    let frac = in_day % MICROS_PER_SECOND;
    let (hour, minute, second) = (secs / 3600, (secs / 60) % 60, secs % 60);

    if frac == 0 {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            y, m, d, hour, minute, second
        )
    } else {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
            y, m, d, hour, minute, second, frac
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_epoch() {
        assert_eq!(parse_date("1970-01-01").unwrap(), 0);
        assert_eq!(parse_date("1970-01-02").unwrap(), 1);
        assert_eq!(parse_date("1969-12-31").unwrap(), -1);
    }

    #[test]
    fn parse_date_rejects_bad_day() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn parse_timestamp_space_and_t_agree() {
        let a = parse_timestamp("2024-01-15 13:45:30").unwrap();
        let b = parse_timestamp("2024-01-15T13:45:30").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_timestamp_offset_normalizes_to_utc() {
        let utc = parse_timestamp("2024-01-15T12:00:00Z").unwrap();
        let plus2 = parse_timestamp("2024-01-15T14:00:00+02:00").unwrap();
        assert_eq!(utc, plus2);
    }

    #[test]
    fn parse_timestamp_fractional_seconds() {
        let us = parse_timestamp("1970-01-01T00:00:00.000250Z").unwrap();
        assert_eq!(us, 250);
        let ms = parse_timestamp("1970-01-01T00:00:00.25Z").unwrap();
        assert_eq!(ms, 250_000);
    }

    #[test]
    fn parse_timestamp_bare_date_is_midnight() {
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), 86_400_000_000);
    }

    #[test]
    fn format_round_trips() {
        let us = parse_timestamp("2024-02-29 23:59:59").unwrap();
        assert_eq!(format_timestamp(us), "2024-02-29 23:59:59");
        let days = parse_date("2001-09-09").unwrap();
        assert_eq!(format_date(days), "2001-09-09");
    }

    #[test]
    fn format_pre_epoch_timestamp() {
        let us = parse_timestamp("1969-12-31 23:00:00").unwrap();
        assert!(us < 0);
        assert_eq!(format_timestamp(us), "1969-12-31 23:00:00");
    }
}
