//! Calendar month value type and acquisition-date parsing.
//!
//! # Responsibility
//! - Represent a concrete `(year, month)` pair with 1-based months.
//! - Step months forward/backward with correct year rollover.
//! - Turn raw catalog date strings into an acquisition month, or nothing.
//!
//! # Invariants
//! - `YearMonth::month()` is always in `1..=12`.
//! - Date parsing never fails loudly; unknown shapes yield `None`.

use chrono::{DateTime, Datelike, Local, Locale, NaiveDate, NaiveDateTime};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Locale used when the configured one is unknown to the formatter.
pub const FALLBACK_LOCALE: &str = "en_US";

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("valid year-month regex"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Month value errors for user/config provided input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthError {
    /// Month number outside `1..=12`.
    MonthOutOfRange(u32),
    /// Year outside the supported calendar range.
    YearOutOfRange(i32),
    /// Text is not a `YYYY-MM` value.
    InvalidFormat(String),
    /// Navigation delta other than `-1` or `+1`.
    InvalidStep(i32),
}

impl Display for MonthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MonthOutOfRange(value) => write!(f, "month must be in 1..=12, got {value}"),
            Self::YearOutOfRange(value) => write!(f, "year is out of supported range: {value}"),
            Self::InvalidFormat(value) => write!(f, "expected `YYYY-MM`, got `{value}`"),
            Self::InvalidStep(value) => {
                write!(f, "month step must be -1 or +1, got {value}")
            }
        }
    }
}

impl Error for MonthError {}

/// Direction of one month-navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthStep {
    Backward,
    Forward,
}

impl MonthStep {
    /// Signed month delta for this step.
    pub fn delta(self) -> i32 {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }

    /// Maps a raw `-1`/`+1` delta onto a step.
    pub fn from_delta(delta: i32) -> Result<Self, MonthError> {
        match delta {
            -1 => Ok(Self::Backward),
            1 => Ok(Self::Forward),
            other => Err(MonthError::InvalidStep(other)),
        }
    }
}

/// Concrete calendar month.
///
/// Ordering is chronological. Serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Builds a month from a year and a 1-based month number.
    ///
    /// # Errors
    /// - `MonthOutOfRange` when `month` is not in `1..=12`.
    /// - `YearOutOfRange` when the first day of the month is not representable.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) {
            return Err(MonthError::MonthOutOfRange(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(MonthError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    /// Month containing the given calendar date.
    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month containing today's local date.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(self) -> u32 {
        self.month
    }

    /// Moves exactly one calendar month in the given direction.
    ///
    /// Saturates at the first and last supported months.
    pub fn shifted(self, step: MonthStep) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(step.delta());
        let month = index.rem_euclid(12) as u32 + 1;
        i32::try_from(index.div_euclid(12))
            .ok()
            .and_then(|year| Self::new(year, month).ok())
            .unwrap_or(self)
    }

    pub fn previous(self) -> Self {
        self.shifted(MonthStep::Backward)
    }

    pub fn next(self) -> Self {
        self.shifted(MonthStep::Forward)
    }

    /// First calendar day of the month, when representable.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Long month name and numeric year for `locale` (e.g. `April 2024`).
    ///
    /// Unknown locale names fall back to [`FALLBACK_LOCALE`].
    pub fn label(self, locale: &str) -> String {
        let locale = resolve_locale(locale);
        match self.first_day().and_then(|day| day.and_hms_opt(0, 0, 0)) {
            Some(midnight) => midnight
                .and_utc()
                .format_localized("%B %Y", locale)
                .to_string(),
            None => self.to_string(),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let caps = YEAR_MONTH_RE
            .captures(trimmed)
            .ok_or_else(|| MonthError::InvalidFormat(trimmed.to_string()))?;
        let year = caps[1]
            .parse::<i32>()
            .map_err(|_| MonthError::InvalidFormat(trimmed.to_string()))?;
        let month = caps[2]
            .parse::<u32>()
            .map_err(|_| MonthError::InvalidFormat(trimmed.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = MonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Extracts the acquisition month from a raw catalog date.
///
/// Accepts ISO dates, RFC 3339 and naive date-times, `MM/DD/YYYY`,
/// `Month D, YYYY` and bare `YYYY-MM`. Date-times are taken at their written
/// calendar date; no timezone shifting is applied. Anything else yields
/// `None` so the book simply matches no month.
pub fn parse_acquisition_month(raw: &str) -> Option<YearMonth> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(month) = trimmed.parse::<YearMonth>() {
        return Some(month);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(YearMonth::from_date(stamp.date_naive()));
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(YearMonth::from_date(date));
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(YearMonth::from_date(stamp.date()));
        }
    }
    None
}

/// Resolves a locale name such as `fr_FR` or `de-DE`.
pub fn resolve_locale(name: &str) -> Locale {
    let normalized = name.trim().replace('-', "_");
    match Locale::try_from(normalized.as_str()) {
        Ok(locale) => locale,
        Err(_) => {
            warn!(
                "event=locale_fallback module=month status=error requested={} fallback={}",
                normalized, FALLBACK_LOCALE
            );
            Locale::en_US
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_acquisition_month, MonthError, MonthStep, YearMonth};
    use chrono::NaiveDate;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).expect("valid month")
    }

    #[test]
    fn new_rejects_out_of_range_month() {
        assert_eq!(
            YearMonth::new(2024, 13).unwrap_err(),
            MonthError::MonthOutOfRange(13)
        );
        assert_eq!(
            YearMonth::new(2024, 0).unwrap_err(),
            MonthError::MonthOutOfRange(0)
        );
    }

    #[test]
    fn shifting_rolls_over_year_boundaries() {
        assert_eq!(ym(2024, 1).previous(), ym(2023, 12));
        assert_eq!(ym(2023, 12).next(), ym(2024, 1));
        assert_eq!(ym(2024, 6).shifted(MonthStep::Forward), ym(2024, 7));
    }

    #[test]
    fn shifting_saturates_at_calendar_range_edges() {
        let last = YearMonth::from_date(NaiveDate::MAX);
        let first = YearMonth::from_date(NaiveDate::MIN);

        assert_eq!(last.next(), last);
        assert_eq!(first.previous(), first);
        assert!(YearMonth::new(last.next().year(), last.next().month()).is_ok());
    }

    #[test]
    fn step_from_delta_only_accepts_unit_steps() {
        assert_eq!(MonthStep::from_delta(-1).unwrap(), MonthStep::Backward);
        assert_eq!(MonthStep::from_delta(1).unwrap(), MonthStep::Forward);
        assert_eq!(
            MonthStep::from_delta(2).unwrap_err(),
            MonthError::InvalidStep(2)
        );
    }

    #[test]
    fn parses_and_displays_year_month_text() {
        let month: YearMonth = " 2024-4 ".parse().expect("parse");
        assert_eq!(month, ym(2024, 4));
        assert_eq!(month.to_string(), "2024-04");
        assert!(matches!(
            "April 2024".parse::<YearMonth>(),
            Err(MonthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn acquisition_month_accepts_common_date_shapes() {
        let expected = Some(ym(2024, 3));
        assert_eq!(parse_acquisition_month("2024-03-15"), expected);
        assert_eq!(parse_acquisition_month("2024-03-15T10:00:00Z"), expected);
        assert_eq!(parse_acquisition_month("2024-03-15 08:30:00"), expected);
        assert_eq!(parse_acquisition_month("03/15/2024"), expected);
        assert_eq!(parse_acquisition_month("March 15, 2024"), expected);
        assert_eq!(parse_acquisition_month("2024-03"), expected);
    }

    #[test]
    fn acquisition_month_ignores_malformed_values() {
        assert_eq!(parse_acquisition_month(""), None);
        assert_eq!(parse_acquisition_month("soon"), None);
        assert_eq!(parse_acquisition_month("2024-13-01"), None);
    }

    #[test]
    fn label_uses_long_month_name() {
        assert_eq!(ym(2024, 4).label("en_US"), "April 2024");
        assert_eq!(ym(2024, 4).label("not-a-locale"), "April 2024");
    }

    #[test]
    fn label_follows_configured_locale() {
        assert_eq!(ym(2024, 4).label("fr_FR"), "avril 2024");
        assert_eq!(ym(2024, 3).label("de-DE"), "März 2024");
        assert_eq!(ym(2024, 4).label("de-DE"), "April 2024");
    }

    #[test]
    fn serializes_as_year_month_text() {
        let json = serde_json::to_value(ym(2023, 12)).unwrap();
        assert_eq!(json, "2023-12");
        let decoded: YearMonth = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, ym(2023, 12));
    }
}
