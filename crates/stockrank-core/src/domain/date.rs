use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date a metric snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotDate(Date);

impl SnapshotDate {
    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    /// Parse an ISO `YYYY-MM-DD` date.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn to_iso_string(self) -> String {
        self.to_string()
    }
}

impl Display for SnapshotDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for SnapshotDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for SnapshotDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for SnapshotDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_iso_text() {
        let parsed = SnapshotDate::parse("2026-02-05").expect("must parse");
        assert_eq!(parsed.to_string(), "2026-02-05");
    }

    #[test]
    fn orders_chronologically() {
        let earlier = SnapshotDate::parse("2025-12-31").expect("valid");
        let later = SnapshotDate::parse("2026-01-01").expect("valid");
        assert!(earlier < later);
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let parsed = SnapshotDate::parse(" 2026-02-20\n").expect("must parse");
        assert_eq!(parsed.to_iso_string(), "2026-02-20");
    }

    #[test]
    fn rejects_other_layouts() {
        for input in ["02/20/2026", "2026-13-01", "2026-02-30", ""] {
            let err = SnapshotDate::parse(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{input}");
        }
    }
}
