//! ISO 8601 date and time fragment values.
//!
//! `DateValue` holds CCYYMMDD, `TimeValue` HH:MM:SS with an optional
//! ±HH:MM zone offset. Integer conversion yields UNIX calendar
//! seconds for dates and seconds-in-day (zone applied) for times.

use chrono::{NaiveDate, NaiveDateTime};

/// Calendar date without a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct DateValue {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl DateValue {
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Parse `CCYYMMDD` or `CCYY-MM-DD`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_end_matches('\0');
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 8 {
            return None;
        }
        let year = digits[0..4].parse().ok()?;
        let month = digits[4..6].parse().ok()?;
        let day = digits[6..8].parse().ok()?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// UNIX seconds at midnight UTC of this date.
    pub fn to_i64(self) -> Option<i64> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)?;
        let dt: NaiveDateTime = date.and_hms_opt(0, 0, 0)?;
        Some(dt.and_utc().timestamp())
    }
}

impl std::fmt::Display for DateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Time of day with zone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct TimeValue {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Zone hours, signed; 0 with `tz_minute` 0 means UTC.
    pub tz_hour: i8,
    pub tz_minute: i8,
}

impl TimeValue {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            tz_hour: 0,
            tz_minute: 0,
        }
    }

    /// Parse `HHMMSS`, `HH:MM:SS`, optionally followed by `±HH:MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_end_matches('\0');
        let (base, zone) = match s.find(['+', '-']) {
            Some(pos) => (&s[..pos], Some(&s[pos..])),
            None => (s, None),
        };
        let digits: String = base.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 6 {
            return None;
        }
        let hour: u8 = digits[0..2].parse().ok()?;
        let minute: u8 = digits[2..4].parse().ok()?;
        let second: u8 = digits[4..6].parse().ok()?;
        if hour > 23 || minute > 59 || second > 60 {
            return None;
        }

        let (tz_hour, tz_minute) = match zone {
            Some(z) => {
                let sign: i8 = if z.starts_with('-') { -1 } else { 1 };
                let zdigits: String = z.chars().filter(|c| c.is_ascii_digit()).collect();
                if zdigits.len() < 4 {
                    return None;
                }
                let zh: i8 = zdigits[0..2].parse().ok()?;
                let zm: i8 = zdigits[2..4].parse().ok()?;
                (sign * zh, sign * zm)
            }
            None => (0, 0),
        };

        Some(Self {
            hour,
            minute,
            second,
            tz_hour,
            tz_minute,
        })
    }

    /// Seconds since midnight UTC (zone offset applied).
    pub fn to_i64(self) -> i64 {
        let local =
            self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64;
        let zone = self.tz_hour as i64 * 3600 + self.tz_minute as i64 * 60;
        local - zone
    }
}

impl std::fmt::Display for TimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.tz_hour < 0 || self.tz_minute < 0 {
            '-'
        } else {
            '+'
        };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}:{:02}",
            self.hour,
            self.minute,
            self.second,
            sign,
            self.tz_hour.unsigned_abs(),
            self.tz_minute.unsigned_abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_forms() {
        let d = DateValue::parse("20240115").unwrap();
        assert_eq!((d.year, d.month, d.day), (2024, 1, 15));
        let d = DateValue::parse("2024-01-15").unwrap();
        assert_eq!((d.year, d.month, d.day), (2024, 1, 15));
        assert!(DateValue::parse("2024").is_none());
        assert!(DateValue::parse("20241315").is_none());
    }

    #[test]
    fn date_to_unix() {
        let d = DateValue::new(1970, 1, 1);
        assert_eq!(d.to_i64(), Some(0));
        let d = DateValue::new(1970, 1, 2);
        assert_eq!(d.to_i64(), Some(86400));
    }

    #[test]
    fn parse_time_with_zone() {
        let t = TimeValue::parse("10:30:00+02:00").unwrap();
        assert_eq!((t.hour, t.minute, t.second), (10, 30, 0));
        assert_eq!((t.tz_hour, t.tz_minute), (2, 0));
        assert_eq!(t.to_i64(), 10 * 3600 + 30 * 60 - 2 * 3600);

        let t = TimeValue::parse("235959-0130").unwrap();
        assert_eq!((t.tz_hour, t.tz_minute), (-1, -30));
    }

    #[test]
    fn display_round_trip() {
        let t = TimeValue::parse("08:05:09+05:30").unwrap();
        assert_eq!(t.to_string(), "08:05:09+05:30");
        let d = DateValue::new(2023, 12, 31);
        assert_eq!(d.to_string(), "2023-12-31");
    }
}
