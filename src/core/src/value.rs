//! Scope values
//!
//! A [`ScopeValue`] is one enumerable value of a categorical dimension
//! (a department code, a role name) or one breakpoint of a range dimension
//! (a salary threshold, a hire date).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value a scope predicate can reference
///
/// Values are totally ordered so range breakpoints can be sorted. Values of
/// different variants order by variant first (`Bool < Integer < Date < Text`),
/// which only matters for schemas that mix kinds inside one dimension.
///
/// The wire form is untagged except for dates: JSON `true`, `42`,
/// `{"date": "2024-01-31"}` and `"engineering"` become `Bool`, `Integer`,
/// `Date` and `Text` respectively. A bare string is always `Text`, even when
/// it looks like a date, so every value reads back as the variant it was
/// written from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeValue {
    Bool(bool),
    Integer(i64),
    #[serde(with = "tagged_date")]
    Date(NaiveDate),
    Text(String),
}

/// `NaiveDate` as `{"date": "YYYY-MM-DD"}`
mod tagged_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tagged {
        date: NaiveDate,
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged { date: *date }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        Tagged::deserialize(deserializer).map(|tagged| tagged.date)
    }
}

impl ScopeValue {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        ScopeValue::Text(s.into())
    }

    /// Returns the text payload, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScopeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScopeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeValue::Bool(b) => write!(f, "{}", b),
            ScopeValue::Integer(i) => write!(f, "{}", i),
            ScopeValue::Date(d) => write!(f, "{}", d),
            ScopeValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for ScopeValue {
    fn from(b: bool) -> Self {
        ScopeValue::Bool(b)
    }
}

impl From<i64> for ScopeValue {
    fn from(i: i64) -> Self {
        ScopeValue::Integer(i)
    }
}

impl From<i32> for ScopeValue {
    fn from(i: i32) -> Self {
        ScopeValue::Integer(i64::from(i))
    }
}

impl From<NaiveDate> for ScopeValue {
    fn from(d: NaiveDate) -> Self {
        ScopeValue::Date(d)
    }
}

impl From<&str> for ScopeValue {
    fn from(s: &str) -> Self {
        ScopeValue::Text(s.to_string())
    }
}

impl From<String> for ScopeValue {
    fn from(s: String) -> Self {
        ScopeValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_within_variant() {
        assert!(ScopeValue::from(10) < ScopeValue::from(20));
        assert!(ScopeValue::from("a") < ScopeValue::from("b"));

        let earlier = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(ScopeValue::from(earlier) < ScopeValue::from(later));
    }

    #[test]
    fn test_wire_form() {
        let values: Vec<ScopeValue> = serde_json::from_str(
            r#"[true, 42, {"date": "2024-01-31"}, "engineering", "2024-01-31"]"#,
        )
        .unwrap();

        assert_eq!(values[0], ScopeValue::Bool(true));
        assert_eq!(values[1], ScopeValue::Integer(42));
        assert_eq!(
            values[2],
            ScopeValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );
        assert_eq!(values[3], ScopeValue::text("engineering"));
        assert_eq!(values[4], ScopeValue::text("2024-01-31"));
    }

    #[test]
    fn test_date_like_text_keeps_its_variant() {
        let text = ScopeValue::text("2024-01-31");
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#""2024-01-31""#);
        assert_eq!(serde_json::from_str::<ScopeValue>(&json).unwrap(), text);

        let date = ScopeValue::from(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-31"}"#);
        assert_eq!(serde_json::from_str::<ScopeValue>(&json).unwrap(), date);
    }

    #[test]
    fn test_malformed_tagged_date_is_rejected() {
        assert!(serde_json::from_str::<ScopeValue>(r#"{"date": "2024-13-40"}"#).is_err());
        assert!(serde_json::from_str::<ScopeValue>(r#"{"date": "2024-01-31", "x": 1}"#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ScopeValue::from(7).to_string(), "7");
        assert_eq!(ScopeValue::from("hr").to_string(), "\"hr\"");
    }
}
