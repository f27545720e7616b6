//! Canonical string forms for scalar values written into request bodies and
//! query parameters.
//!
//! Every function here is pure. Values that cannot be rendered in the
//! canonical form fail with [`Error::InvalidInput`] instead of producing
//! malformed output.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::duration::{IsoDuration, MICROS_PER_SECOND};
use crate::error::{Error, Result};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Years representable with the four-digit ISO-8601 year.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

pub fn boolean_to_string(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Render `value` as an ISO-8601 duration such as `P1DT11S` or `-P1D`.
///
/// Zero components are omitted. A zero duration renders as `PT0S` and never
/// carries a sign.
pub fn duration_to_string(value: &IsoDuration) -> Result<String> {
    if value.microseconds >= MICROS_PER_SECOND {
        return Err(Error::invalid_input(format!(
            "duration fractional seconds out of range: {} microseconds",
            value.microseconds
        )));
    }
    if value.is_zero() {
        return Ok("PT0S".to_string());
    }

    let mut out = String::new();
    if value.inverted {
        out.push('-');
    }
    out.push('P');
    push_component(&mut out, value.years, 'Y');
    push_component(&mut out, value.months, 'M');
    push_component(&mut out, value.days, 'D');

    if value.hours > 0 || value.minutes > 0 || value.seconds > 0 || value.microseconds > 0 {
        out.push('T');
        push_component(&mut out, value.hours, 'H');
        push_component(&mut out, value.minutes, 'M');
        if value.microseconds > 0 {
            let fraction = format!("{:06}", value.microseconds);
            out.push_str(&format!(
                "{}.{}S",
                value.seconds,
                fraction.trim_end_matches('0')
            ));
        } else {
            push_component(&mut out, value.seconds, 'S');
        }
    }
    Ok(out)
}

fn push_component(out: &mut String, amount: u64, designator: char) {
    if amount > 0 {
        out.push_str(&format!("{amount}{designator}"));
    }
}

/// Render `value` as `YYYY-MM-DDTHH:MM:SS±HH:MM`, keeping its offset.
/// Sub-second precision is dropped.
pub fn date_time_to_string<Tz: TimeZone>(value: &DateTime<Tz>) -> Result<String> {
    let fixed = value.with_timezone(&value.offset().fix());
    check_year(fixed.year())?;
    Ok(fixed.format(DATE_TIME_FORMAT).to_string())
}

/// Like [`date_time_to_string`] for a value without an offset, which is
/// taken to be UTC.
pub fn naive_date_time_to_string(value: &NaiveDateTime) -> Result<String> {
    date_time_to_string(&Utc.from_utc_datetime(value))
}

/// Render `value` as `YYYY-MM-DD`.
pub fn date_to_string(value: &NaiveDate) -> Result<String> {
    check_year(value.year())?;
    Ok(value.format(DATE_FORMAT).to_string())
}

/// Render `value` as `HH:MM:SS`.
pub fn time_to_string(value: &NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

fn check_year(year: i32) -> Result<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "year {year} cannot be written as a four-digit ISO-8601 year"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn booleans() {
        assert_eq!(boolean_to_string(true), "true");
        assert_eq!(boolean_to_string(false), "false");
    }

    #[test]
    fn inverted_one_day() {
        let d = IsoDuration::days(1).negated();
        assert_eq!(duration_to_string(&d).unwrap(), "-P1D");
    }

    #[test]
    fn one_day_eleven_seconds() {
        let d = IsoDuration {
            days: 1,
            seconds: 11,
            ..IsoDuration::default()
        };
        assert_eq!(duration_to_string(&d).unwrap(), "P1DT11S");
    }

    #[test]
    fn every_component() {
        let d = IsoDuration {
            inverted: false,
            years: 1,
            months: 2,
            days: 3,
            hours: 4,
            minutes: 5,
            seconds: 6,
            microseconds: 0,
        };
        assert_eq!(duration_to_string(&d).unwrap(), "P1Y2M3DT4H5M6S");
    }

    #[test]
    fn minutes_only_uses_time_designator() {
        let d = IsoDuration {
            minutes: 30,
            ..IsoDuration::default()
        };
        assert_eq!(duration_to_string(&d).unwrap(), "PT30M");
    }

    #[test]
    fn fractional_seconds_trim_trailing_zeros() {
        let d = IsoDuration {
            seconds: 1,
            microseconds: 500_000,
            ..IsoDuration::default()
        };
        assert_eq!(duration_to_string(&d).unwrap(), "PT1.5S");

        let d = IsoDuration {
            microseconds: 1_250,
            ..IsoDuration::default()
        };
        assert_eq!(duration_to_string(&d).unwrap(), "PT0.00125S");
    }

    #[test]
    fn zero_duration_keeps_one_component() {
        assert_eq!(duration_to_string(&IsoDuration::default()).unwrap(), "PT0S");
        assert_eq!(
            duration_to_string(&IsoDuration::default().negated()).unwrap(),
            "PT0S"
        );
    }

    #[test]
    fn out_of_range_fraction_is_rejected() {
        let d = IsoDuration {
            microseconds: MICROS_PER_SECOND,
            ..IsoDuration::default()
        };
        assert!(matches!(duration_to_string(&d), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn naive_date_time_defaults_to_utc() {
        let t = naive(2024, 4, 29, 15, 12, 0);
        assert_eq!(
            naive_date_time_to_string(&t).unwrap(),
            "2024-04-29T15:12:00+00:00"
        );
    }

    #[test]
    fn date_time_keeps_its_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = offset
            .from_local_datetime(&naive(2024, 4, 29, 15, 12, 7))
            .unwrap();
        assert_eq!(date_time_to_string(&t).unwrap(), "2024-04-29T15:12:07+02:00");

        let offset = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
        let t = offset
            .from_local_datetime(&naive(2024, 1, 2, 3, 4, 5))
            .unwrap();
        assert_eq!(date_time_to_string(&t).unwrap(), "2024-01-02T03:04:05-05:30");
    }

    #[test]
    fn utc_date_time_drops_fraction() {
        let t = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 4, 29)
                .unwrap()
                .and_hms_milli_opt(15, 12, 0, 999)
                .unwrap(),
        );
        assert_eq!(date_time_to_string(&t).unwrap(), "2024-04-29T15:12:00+00:00");
    }

    #[test]
    fn five_digit_year_is_rejected() {
        let t = naive(10_000, 1, 1, 0, 0, 0);
        assert!(matches!(
            naive_date_time_to_string(&t),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn date_and_time_only() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 9).unwrap();
        assert_eq!(date_to_string(&date).unwrap(), "2024-04-09");
        let time = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(time_to_string(&time), "07:05:00");
    }
}
