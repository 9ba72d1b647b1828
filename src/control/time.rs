//! date window resolution for the hide-by-date rule
//!
//! supports formats:
//! - "2024-01-01T09:30:00", "2024-01-01T09:30:00.250" (site timezone)
//! - "2024-01-01T09:30", "2024-01-01 09:30", "2024-01-01 09:30:00"
//! - "2024-01-01" (midnight in the site timezone)
//! - "2024-01-01T09:30:00Z", "2024-01-01T09:30:00+02:00" (own offset wins)
//!
//! the site timezone is a named zone when one is configured, otherwise a
//! numeric UTC offset, otherwise UTC.

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

/// errors raised while resolving a date window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
    #[error("unknown timezone: {0:?}")]
    InvalidTimezone(String),
    #[error("invalid UTC offset: {0:?}")]
    InvalidOffset(String),
}

/// site timezone settings as stored by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteTimezone {
    /// IANA zone name, e.g. "Europe/Berlin"
    pub timezone_string: Option<String>,
    /// numeric offset in hours, e.g. "2", "-5", "5.5", "+05:30"
    pub gmt_offset: Option<String>,
}

impl SiteTimezone {
    /// a site configured with a named zone
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            timezone_string: Some(name.into()),
            gmt_offset: None,
        }
    }

    /// a site configured with a numeric offset
    pub fn offset(offset: impl Into<String>) -> Self {
        Self {
            timezone_string: None,
            gmt_offset: Some(offset.into()),
        }
    }

    /// resolve the settings to a concrete zone
    pub fn resolve(&self) -> Result<SiteZone, TimeError> {
        // a configured zone name takes priority over the offset
        if let Some(name) = non_empty(self.timezone_string.as_deref()) {
            return name
                .parse::<Tz>()
                .map(SiteZone::Named)
                .map_err(|_| TimeError::InvalidTimezone(name.to_string()));
        }

        match non_empty(self.gmt_offset.as_deref()) {
            Some(offset) => parse_offset(offset).map(SiteZone::Fixed),
            None => Ok(SiteZone::utc()),
        }
    }
}

/// a resolved site timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl SiteZone {
    pub fn utc() -> Self {
        SiteZone::Fixed(Utc.fix())
    }

    /// interpret a wall-clock time in this zone
    ///
    /// ambiguous times (DST fall-back) take the earlier instant; times inside
    /// a DST gap are moved forward by an hour.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            SiteZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            SiteZone::Named(tz) => match tz.from_local_datetime(&naive) {
                LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
                LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
                LocalResult::None => tz
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc)),
            },
        }
    }
}

/// parse a numeric UTC offset
///
/// bare numbers count as positive. accepts fractional hours ("5.5"),
/// "+HH:MM", and a leading "UTC"/"GMT".
pub fn parse_offset(s: &str) -> Result<FixedOffset, TimeError> {
    let invalid = || TimeError::InvalidOffset(s.to_string());
    let trimmed = s.trim();

    let body = strip_prefix_ignore_case(trimmed, "UTC")
        .or_else(|| strip_prefix_ignore_case(trimmed, "GMT"))
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() || body.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }

    let (sign, magnitude) = match body.as_bytes()[0] {
        b'-' => (-1, &body[1..]),
        b'+' => (1, &body[1..]),
        _ => (1, body),
    };

    // offsets are bounded to less than a day before any arithmetic
    let seconds = if let Some((hours, minutes)) = magnitude.split_once(':') {
        let h: i32 = hours.parse().map_err(|_| invalid())?;
        let m: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..24).contains(&h) || !(0..60).contains(&m) {
            return Err(invalid());
        }
        h * 3600 + m * 60
    } else {
        let hours: f64 = magnitude.parse().map_err(|_| invalid())?;
        if !(0.0..24.0).contains(&hours) {
            return Err(invalid());
        }
        (hours * 3600.0).round() as i32
    };

    FixedOffset::east_opt(sign * seconds).ok_or_else(invalid)
}

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// parse a date attribute to an absolute instant
///
/// strings without an offset are read as wall-clock time in `zone`.
pub fn parse_datetime(s: &str, zone: &SiteZone) -> Result<DateTime<Utc>, TimeError> {
    let s = s.trim();
    let invalid = || TimeError::InvalidDate(s.to_string());

    if s.is_empty() {
        return Err(invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    zone.localize(naive).ok_or_else(invalid)
}

/// the half-open interval `[start, end)` during which a block is hidden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HideWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl HideWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// resolve the stored start/end strings; empty strings count as unset
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        timezone: &SiteTimezone,
    ) -> Result<Self, TimeError> {
        let start = non_empty(start);
        let end = non_empty(end);

        if start.is_none() && end.is_none() {
            return Ok(Self::default());
        }

        let zone = timezone.resolve()?;
        let start = start.map(|s| parse_datetime(s, &zone)).transpose()?;
        let end = end.map(|s| parse_datetime(s, &zone)).transpose()?;

        Ok(Self { start, end })
    }

    /// check if `now` falls inside the window
    ///
    /// a window without bounds, a zero-width window and an inverted window
    /// (start after end) never contain anything.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (None, None) => false,
            (Some(start), Some(end)) if start >= end => false,
            (start, end) => {
                start.map_or(true, |s| now >= s) && end.map_or(true, |e| now < e)
            }
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
