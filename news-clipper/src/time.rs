//! Display-time conversion for feed timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

pub const DISPLAY_FORMAT: &str = "%m-%d %H:%M";

/// Korea Standard Time, UTC+09:00 with no daylight saving.
pub const KST_OFFSET_HOURS: i32 = 9;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y.%m.%d %H:%M:%S %z",
    "%a, %d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Converts free-form published timestamps into a fixed display zone.
#[derive(Debug, Clone, Copy)]
pub struct TimeNormalizer {
    offset: FixedOffset,
}

impl TimeNormalizer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when `hours` is outside the valid UTC offset range.
    pub fn from_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Lenient parse. Values without an offset are taken as UTC.
    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(raw).map(|dt| dt.with_timezone(&self.offset))
    }

    /// `MM-DD HH:MM` in the display zone; the current time when `raw` is empty or unparseable.
    pub fn to_display_time(&self, raw: &str) -> String {
        self.to_display_time_or(raw, Utc::now())
    }

    pub fn to_display_time_or(&self, raw: &str, fallback: DateTime<Utc>) -> String {
        let local = match self.parse(raw) {
            Some(dt) => dt,
            None => {
                if !raw.trim().is_empty() {
                    debug!("Unparseable timestamp `{}`, using current time", raw);
                }
                fallback.with_timezone(&self.offset)
            }
        };
        local.format(DISPLAY_FORMAT).to_string()
    }
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self::from_offset_hours(KST_OFFSET_HOURS).expect("+09:00 is a valid UTC offset")
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    let utc = FixedOffset::east_opt(0)?;
    Some(Utc.from_utc_datetime(&naive).with_timezone(&utc))
}
