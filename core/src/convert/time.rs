//! ISO-8601 durations and offset date-times.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone};

use super::ValueConverter;
use crate::error::ConversionError;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// ISO-8601 durations of the form `PnDTnHnMn.nS`, with an optional leading
/// sign. Printed as hours, minutes and seconds, e.g. `PT1H5M19S`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationConverter;

impl ValueConverter for DurationConverter {
    type Value = Duration;

    fn parse(&self, text: &str) -> Result<Duration, ConversionError> {
        parse_duration(text)
    }

    fn print(&self, value: &Duration) -> String {
        print_duration(value)
    }

    fn example(&self) -> Duration {
        Duration::seconds(3919)
    }

    fn syntax(&self) -> String {
        "PnDTnHnMn.nS (ISO 8601)".to_string()
    }
}

fn print_duration(value: &Duration) -> String {
    let seconds = value.num_seconds();
    let nanos = value.subsec_nanos();
    let negative = seconds < 0 || nanos < 0;
    let seconds = seconds.unsigned_abs();
    let nanos = nanos.unsigned_abs();

    if seconds == 0 && nanos == 0 {
        return "PT0S".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut out = String::with_capacity(24);
    if negative {
        out.push('-');
    }
    out.push_str("PT");
    if hours != 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes != 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if secs != 0 || nanos != 0 {
        out.push_str(&secs.to_string());
        if nanos != 0 {
            let fraction = format!("{nanos:09}");
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}

fn parse_duration(text: &str) -> Result<Duration, ConversionError> {
    let fail = |reason| ConversionError::Duration {
        input: text.to_string(),
        reason,
    };

    let upper = text.to_ascii_uppercase();
    let (negative, rest) = match upper.as_bytes().first() {
        Some(b'-') => (true, &upper[1..]),
        Some(b'+') => (false, &upper[1..]),
        _ => (false, upper.as_str()),
    };
    let rest = rest.strip_prefix('P').ok_or_else(|| fail("missing 'P' designator"))?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => {
            if time.is_empty() {
                return Err(fail("empty time section"));
            }
            (date, Some(time))
        }
        None => (rest, None),
    };
    if date.is_empty() && time.is_none() {
        return Err(fail("no components"));
    }

    let mut total: i128 = 0;

    if !date.is_empty() {
        let days = date.strip_suffix('D').ok_or_else(|| fail("expected days ('nD')"))?;
        total += parse_whole(days).ok_or_else(|| fail("invalid day count"))? * 86_400 * NANOS_PER_SECOND;
    }

    if let Some(mut time) = time {
        let mut last_unit = 0;
        while !time.is_empty() {
            let end = time
                .find(['H', 'M', 'S'])
                .ok_or_else(|| fail("component without unit"))?;
            let (number, unit) = (&time[..end], &time[end..=end]);
            let order = match unit {
                "H" => 1,
                "M" => 2,
                _ => 3,
            };
            if order <= last_unit {
                return Err(fail("components out of order"));
            }
            last_unit = order;

            total += match unit {
                "H" => parse_whole(number).ok_or_else(|| fail("invalid hours"))? * 3600 * NANOS_PER_SECOND,
                "M" => parse_whole(number).ok_or_else(|| fail("invalid minutes"))? * 60 * NANOS_PER_SECOND,
                _ => parse_seconds(number).ok_or_else(|| fail("invalid seconds"))?,
            };
            time = &time[end + 1..];
        }
    }

    let seconds = i64::try_from(total / NANOS_PER_SECOND).map_err(|_| fail("out of range"))?;
    let nanos = u32::try_from(total % NANOS_PER_SECOND).map_err(|_| fail("out of range"))?;
    let magnitude = Duration::new(seconds, nanos).ok_or_else(|| fail("out of range"))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_whole(text: &str) -> Option<i128> {
    if text.is_empty() || text.len() > 20 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_seconds(text: &str) -> Option<i128> {
    let Some((whole, fraction)) = text.split_once(['.', ',']) else {
        return Some(parse_whole(text)? * NANOS_PER_SECOND);
    };
    if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{fraction:0<9}");
    Some(parse_whole(whole)? * NANOS_PER_SECOND + padded.parse::<i128>().ok()?)
}

/// ISO-8601 offset date-times, e.g. `2000-01-01T00:03:00+00:00`. Seconds
/// are optional on input. Offsets that are not a whole number of minutes
/// are written `+hh:mm:ss`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl ValueConverter for DateTimeConverter {
    type Value = DateTime<FixedOffset>;

    fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
        let first = match DateTime::parse_from_rfc3339(text) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        if let Ok(value) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z") {
            return Ok(value);
        }
        parse_with_second_offset(text).ok_or(ConversionError::DateTime(first))
    }

    fn print(&self, value: &DateTime<FixedOffset>) -> String {
        if value.offset().local_minus_utc() % 60 == 0 {
            value.to_rfc3339_opts(SecondsFormat::AutoSi, false)
        } else {
            value.format("%Y-%m-%dT%H:%M:%S%.f%::z").to_string()
        }
    }

    fn example(&self) -> DateTime<FixedOffset> {
        DateTime::from_timestamp(946_684_800, 0)
            .unwrap_or_default()
            .fixed_offset()
    }

    fn syntax(&self) -> String {
        "yyyy-mm-ddThh:mm:ss+zz:zz (ISO 8601)".to_string()
    }
}

/// `yyyy-mm-ddThh:mm:ss[.f]±hh:mm:ss`.
fn parse_with_second_offset(text: &str) -> Option<DateTime<FixedOffset>> {
    let split = text.len().checked_sub(9)?;
    let (local, offset) = (text.get(..split)?, text.get(split..)?);
    let sign = match offset.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let mut fields = offset[1..].split(':');
    let mut field = || {
        fields
            .next()
            .filter(|f| f.len() == 2 && f.bytes().all(|b| b.is_ascii_digit()))?
            .parse::<i32>()
            .ok()
    };
    let (hours, minutes, seconds) = (field()?, field()?, field()?);
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60 + seconds))?;
    let local = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    offset.from_local_datetime(&local).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_example_prints_hours_minutes_seconds() {
        let c = DurationConverter;
        assert_eq!(c.print(&c.example()), "PT1H5M19S");
    }

    #[test]
    fn test_duration_zero() {
        let c = DurationConverter;
        assert_eq!(c.print(&Duration::zero()), "PT0S");
        assert_eq!(c.parse("PT0S").unwrap(), Duration::zero());
    }

    #[test]
    fn test_duration_parses_days_and_fractions() {
        let c = DurationConverter;
        assert_eq!(c.parse("P2D").unwrap(), Duration::days(2));
        assert_eq!(c.parse("P1DT1H").unwrap(), Duration::hours(25));
        assert_eq!(c.parse("PT1.5S").unwrap(), Duration::milliseconds(1500));
        assert_eq!(c.parse("pt20m").unwrap(), Duration::minutes(20));
        assert_eq!(c.parse("-PT1M").unwrap(), Duration::minutes(-1));
    }

    #[test]
    fn test_duration_prints_fraction_and_sign() {
        let c = DurationConverter;
        assert_eq!(c.print(&Duration::milliseconds(1500)), "PT1.5S");
        assert_eq!(c.print(&Duration::milliseconds(-500)), "-PT0.5S");
        assert_eq!(c.print(&Duration::days(1)), "PT24H");
    }

    #[test]
    fn test_duration_rejects_malformed() {
        let c = DurationConverter;
        for bad in ["", "P", "PT", "1H", "PT1X", "PTH", "PT1S1M", "P1H", "PT1.1234567891S"] {
            assert!(c.parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_datetime_accepts_with_and_without_seconds() {
        let c = DateTimeConverter;
        let with = c.parse("2000-01-01T00:03:00+00:00").unwrap();
        let without = c.parse("2000-01-01T00:03+00:00").unwrap();
        assert_eq!(with, without);
        assert_eq!(c.print(&with), "2000-01-01T00:03:00+00:00");
    }

    #[test]
    fn test_datetime_keeps_offset() {
        let c = DateTimeConverter;
        let value = c.parse("2020-06-01T12:00:00.25+02:00").unwrap();
        assert_eq!(value.offset().local_minus_utc(), 7200);
        assert_eq!(c.print(&value), "2020-06-01T12:00:00.250+02:00");
        assert_eq!(c.parse(&c.print(&value)).unwrap(), value);
    }

    #[test]
    fn test_datetime_offset_with_seconds_roundtrips() {
        let c = DateTimeConverter;
        let offset = FixedOffset::east_opt(1).unwrap();
        let value = DateTime::from_timestamp(0, 0).unwrap().with_timezone(&offset);
        assert_eq!(c.print(&value), "1970-01-01T00:00:01+00:00:01");
        assert_eq!(c.parse(&c.print(&value)).unwrap(), value);
        assert_eq!(c.parse(&c.print(&value)).unwrap().offset(), value.offset());

        let west = FixedOffset::west_opt(3 * 3600 + 30 * 60 + 15).unwrap();
        let value = DateTime::from_timestamp(1_000_000, 250_000_000).unwrap().with_timezone(&west);
        assert_eq!(c.print(&value), "1970-01-12T10:16:25.250-03:30:15");
        assert_eq!(c.parse(&c.print(&value)).unwrap().offset(), &west);
    }

    #[test]
    fn test_datetime_rejects_garbage() {
        assert!(DateTimeConverter.parse("yesterday").is_err());
    }
}
