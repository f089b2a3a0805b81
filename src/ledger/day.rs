use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, Duration, OffsetDateTime,
    UtcOffset,
};

use crate::error::LedgerError;

/// A calendar day exchanged as a zero-padded `YYYY-MM-DD` string.
///
/// Ordering on `Day` matches lexicographic ordering of that string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(Date);

impl Day {
    pub fn today(offset: UtcOffset) -> Self {
        Self(OffsetDateTime::now_utc().to_offset(offset).date())
    }

    /// The day `days` before this one.
    pub fn days_before(self, days: i64) -> Self {
        Self(self.0.saturating_sub(Duration::days(days)))
    }

    /// Day named by an optional request field. Absent or blank means `today`;
    /// an RFC 3339 timestamp is moved into `offset` before taking its date.
    pub fn from_request(raw: Option<&str>, today: Day, offset: UtcOffset) -> Result<Self, LedgerError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(today),
            Some(s) if s.contains('T') => OffsetDateTime::parse(s, &Rfc3339)
                .map(|at| Self(at.to_offset(offset).date()))
                .map_err(|_| LedgerError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(format_description!("[year]-[month]-[day]")).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Day {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
            .map(Day)
            .map_err(|_| LedgerError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
