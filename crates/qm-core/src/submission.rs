use crate::scoring::{AnswerSet, Scorecard};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wire format of submission timestamps, e.g. `24.09.2025, 14:30:00`.
pub const WIRE_TIMESTAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// One completed evaluation of one employee by one evaluator against one
/// catalog at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Email-shaped opaque identifier of the evaluated employee.
    pub employee: String,
    /// Email-shaped opaque identifier of the evaluator.
    pub evaluator: String,
    /// Free-text team name; no referential integrity with any team entity.
    pub team: String,
    /// Catalog name as it was at submission time. Resolving it to a
    /// schema may require the name map, and may legitimately fail.
    pub catalog: String,
    /// Parsed submission time; `None` when the wire value was missing or
    /// unparsable. Call sites decide the fallback.
    pub submitted_at: Option<NaiveDateTime>,
    pub answers: AnswerSet,
    /// Derived, never independently authored; recomputed in full on
    /// every (re)submission.
    pub computed: Scorecard,
}

impl Submission {
    pub fn submitted_on(&self) -> Option<NaiveDate> {
        self.submitted_at.map(|dt| dt.date())
    }
}

/// Parses the locale-formatted wire timestamp. Invalid or empty input
/// yields `None` rather than an error; broken dates are a normal
/// condition in historical data.
pub fn parse_wire_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, WIRE_TIMESTAMP_FORMAT).ok()
}

/// Renders a timestamp back into the wire format.
pub fn format_wire_timestamp(value: &NaiveDateTime) -> String {
    value.format(WIRE_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn wire_timestamps_round_trip() {
        let parsed = parse_wire_timestamp("24.09.2025, 14:30:00").expect("valid timestamp");
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2025, 9, 24)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );
        assert_eq!(format_wire_timestamp(&parsed), "24.09.2025, 14:30:00");
    }

    #[test]
    fn broken_timestamps_parse_to_none() {
        assert!(parse_wire_timestamp("").is_none());
        assert!(parse_wire_timestamp("  ").is_none());
        assert!(parse_wire_timestamp("2025-09-24T14:30:00").is_none());
        assert!(parse_wire_timestamp("32.13.2025, 99:99:99").is_none());
    }
}
