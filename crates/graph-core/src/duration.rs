//! ISO 8601 durations as they appear on the wire (`P1DT2H30M`).

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SerializationError};

const KIND: &str = "duration";

/// A calendar-aware duration in ISO 8601 form.
///
/// Components are kept as written so that `P1M` re-encodes as `P1M` and not
/// as some number of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IsoDuration {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Fractional seconds, in nanoseconds.
    pub nanos: u32,
}

impl IsoDuration {
    /// Builds a duration from days, hours, minutes and seconds.
    pub fn from_dhms(days: u32, hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
            ..Self::default()
        }
    }

    /// Parses an ISO 8601 duration such as `P3W`, `PT1.5S` or `-P1DT2H`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let body = rest
            .strip_prefix('P')
            .ok_or_else(|| SerializationError::invalid(KIND, input, "missing 'P' designator"))?;

        let (date_part, time_part) = match body.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (body, None),
        };
        if date_part.is_empty() && time_part.is_none() {
            return Err(SerializationError::invalid(KIND, input, "no components"));
        }
        if time_part == Some("") {
            return Err(SerializationError::invalid(KIND, input, "empty time section"));
        }

        let mut out = Self {
            negative,
            ..Self::default()
        };

        parse_section(input, date_part, &['Y', 'M', 'W', 'D'], |unit, whole, _| {
            match unit {
                'Y' => out.years = whole,
                'M' => out.months = whole,
                'W' => out.weeks = whole,
                _ => out.days = whole,
            }
        })?;

        if let Some(time) = time_part {
            parse_section(input, time, &['H', 'M', 'S'], |unit, whole, nanos| match unit {
                'H' => out.hours = whole,
                'M' => out.minutes = whole,
                _ => {
                    out.seconds = whole;
                    out.nanos = nanos;
                }
            })?;
        }

        Ok(out)
    }

    /// Returns `true` when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.weeks == 0
            && self.days == 0
            && !self.has_time()
    }

    fn has_time(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.nanos != 0
    }

    /// Converts to a fixed-length delta, counting a year as 365 days and a
    /// month as 30 days.
    ///
    /// Returns `None` when the result is outside the range of [`TimeDelta`].
    pub fn to_chrono(&self) -> Option<TimeDelta> {
        let days = [
            (self.years, 365),
            (self.months, 30),
            (self.weeks, 7),
            (self.days, 1),
        ]
        .into_iter()
        .try_fold(0i64, |acc, (n, factor)| acc.checked_add(i64::from(n).checked_mul(factor)?))?;
        let secs = days.checked_mul(86_400)?.checked_add(
            i64::from(self.hours) * 3_600 + i64::from(self.minutes) * 60 + i64::from(self.seconds),
        )?;
        let delta = TimeDelta::try_seconds(secs)?
            .checked_add(&TimeDelta::nanoseconds(i64::from(self.nanos)))?;
        Some(if self.negative { -delta } else { delta })
    }

    /// Builds a day/hour/minute/second duration from a fixed-length delta.
    pub fn from_chrono(delta: TimeDelta) -> Self {
        let negative = delta < TimeDelta::zero();
        let delta = delta.abs();
        let total = delta.num_seconds();
        let nanos = delta.subsec_nanos().unsigned_abs();
        Self {
            negative,
            days: (total / 86_400) as u32,
            hours: ((total % 86_400) / 3_600) as u32,
            minutes: ((total % 3_600) / 60) as u32,
            seconds: (total % 60) as u32,
            nanos,
            ..Self::default()
        }
    }
}

/// Parses one section (date or time) of a duration body.
///
/// `units` lists the allowed designators in their required order; only the
/// final unit of the time section (`S`) may carry a fraction.
fn parse_section(
    input: &str,
    section: &str,
    units: &[char],
    mut apply: impl FnMut(char, u32, u32),
) -> Result<()> {
    let mut next_unit = 0;
    let mut number = String::new();

    for ch in section.chars() {
        if ch.is_ascii_digit() || ch == '.' || ch == ',' {
            number.push(ch);
            continue;
        }
        let position = units[next_unit..]
            .iter()
            .position(|&u| u == ch)
            .map(|p| p + next_unit)
            .ok_or_else(|| {
                SerializationError::invalid(KIND, input, format!("unexpected designator '{ch}'"))
            })?;
        if number.is_empty() {
            return Err(SerializationError::invalid(
                KIND,
                input,
                format!("missing value before '{ch}'"),
            ));
        }
        let fractional_allowed = ch == 'S';
        let (whole, nanos) = parse_number(input, &number, fractional_allowed)?;
        apply(ch, whole, nanos);
        number.clear();
        next_unit = position + 1;
    }

    if !number.is_empty() {
        return Err(SerializationError::invalid(
            KIND,
            input,
            "trailing number without designator",
        ));
    }
    Ok(())
}

fn parse_number(input: &str, number: &str, fractional_allowed: bool) -> Result<(u32, u32)> {
    let normalized = number.replace(',', ".");
    let (whole, fraction) = match normalized.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (normalized.as_str(), None),
    };
    if fraction.is_some() && !fractional_allowed {
        return Err(SerializationError::invalid(
            KIND,
            input,
            "fractions are only supported on seconds",
        ));
    }
    let whole_value: u32 = whole
        .parse()
        .map_err(|_| SerializationError::invalid(KIND, input, format!("bad number '{number}'")))?;

    let nanos = match fraction {
        None => 0,
        Some(f) if f.is_empty() || !f.chars().all(|c| c.is_ascii_digit()) => {
            return Err(SerializationError::invalid(
                KIND,
                input,
                format!("bad fraction '{number}'"),
            ));
        }
        Some(f) => {
            let mut digits: String = f.chars().take(9).collect();
            while digits.len() < 9 {
                digits.push('0');
            }
            digits.parse().unwrap_or(0)
        }
    };
    Ok((whole_value, nanos))
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative && !self.is_zero() {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        if self.is_zero() {
            return f.write_str("T0S");
        }
        for (value, unit) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value != 0 {
                write!(f, "{value}{unit}")?;
            }
        }
        if self.has_time() {
            f.write_str("T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.nanos != 0 {
                let fraction = format!("{:09}", self.nanos);
                write!(f, "{}.{}S", self.seconds, fraction.trim_end_matches('0'))?;
            } else if self.seconds != 0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

impl FromStr for IsoDuration {
    type Err = SerializationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for IsoDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_form() {
        let d = IsoDuration::parse("P1Y2M3W4DT5H6M7.25S").unwrap();
        assert_eq!(d.years, 1);
        assert_eq!(d.months, 2);
        assert_eq!(d.weeks, 3);
        assert_eq!(d.days, 4);
        assert_eq!(d.hours, 5);
        assert_eq!(d.minutes, 6);
        assert_eq!(d.seconds, 7);
        assert_eq!(d.nanos, 250_000_000);
        assert!(!d.negative);
    }

    #[test]
    fn month_and_minute_share_designator() {
        let d = IsoDuration::parse("P1MT1M").unwrap();
        assert_eq!(d.months, 1);
        assert_eq!(d.minutes, 1);
    }

    #[test]
    fn negative_durations() {
        let d = IsoDuration::parse("-P2D").unwrap();
        assert!(d.negative);
        assert_eq!(d.to_chrono(), Some(-TimeDelta::days(2)));
        assert_eq!(d.to_string(), "-P2D");
    }

    #[test]
    fn display_is_canonical() {
        let rendered: Vec<String> = ["P14D", "PT0S", "P0D", "PT1H30M", "PT0.5S", "P1W", "PT36H"]
            .iter()
            .map(|s| IsoDuration::parse(s).unwrap().to_string())
            .collect();
        insta::assert_snapshot!(rendered.join(" "), @"P14D PT0S PT0S PT1H30M PT0.5S P1W PT36H");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "P", "PT", "1D", "PD", "P1H", "PT1D", "P1.5D", "P1D2", "PT1S1M", "P-1D"] {
            assert!(IsoDuration::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn chrono_conversion_counts_calendar_units() {
        let d = IsoDuration::parse("P1Y1M1W1DT1H1M1S").unwrap();
        let expected = TimeDelta::days(365 + 30 + 7 + 1)
            + TimeDelta::hours(1)
            + TimeDelta::minutes(1)
            + TimeDelta::seconds(1);
        assert_eq!(d.to_chrono(), Some(expected));
    }

    #[test]
    fn chrono_conversion_fails_outside_the_delta_range() {
        let d = IsoDuration::parse("P4000000000Y").unwrap();
        assert_eq!(d.to_chrono(), None);
        let d = IsoDuration::parse("-P4000000000Y").unwrap();
        assert_eq!(d.to_chrono(), None);
    }

    #[test]
    fn from_chrono_normalizes_to_days() {
        let d = IsoDuration::from_chrono(TimeDelta::hours(49) + TimeDelta::milliseconds(500));
        assert_eq!(d.to_string(), "P2DT1H0.5S");
    }

    #[test]
    fn serde_uses_wire_string() {
        let d = IsoDuration::from_dhms(0, 2, 0, 0);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"PT2H\"");
        let back: IsoDuration = serde_json::from_str("\"PT2H\"").unwrap();
        assert_eq!(back, d);
    }
}
