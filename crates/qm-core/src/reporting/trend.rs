use crate::scoring::round1;
use crate::submission::Submission;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day on the trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub avg_percent: f64,
    pub count: usize,
}

/// Average percent per calendar day, chronologically sorted.
///
/// Timestamps are truncated to the day in their original timezone-naive
/// representation; submissions without a parseable timestamp cannot be
/// placed on the time axis and are left out.
pub fn daily_trend<'a, I>(submissions: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for submission in submissions {
        let Some(date) = submission.submitted_on() else {
            continue;
        };
        let (sum, count) = days.entry(date).or_insert((0.0, 0));
        *sum += submission.computed.percent;
        *count += 1;
    }

    days.into_iter()
        .map(|(date, (sum, count))| TrendPoint {
            date,
            avg_percent: round1(sum / count as f64),
            count,
        })
        .collect()
}
