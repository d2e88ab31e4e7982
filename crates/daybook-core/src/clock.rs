use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Source of local wall-clock time. Timestamps are stored without a zone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant. Used by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
        Self(date.and_time(time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn date_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// `2026-10-18T09:30:00.000000`
pub fn iso_timestamp(at: NaiveDateTime) -> String {
    at.format(ISO_TIMESTAMP_FORMAT).to_string()
}

/// `2026-10-18 09:30:00.000000`
pub fn display_timestamp(at: NaiveDateTime) -> String {
    at.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}

/// Accepts naive ISO timestamps (fraction optional, minutes-only allowed),
/// RFC 3339 timestamps with an offset, and bare dates.
pub fn parse_iso_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    parse_date(raw).map(|date| date.and_time(NaiveTime::default()))
}
