use super::identity::is_anonymized;
use crate::scoring::round1;
use crate::submission::Submission;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which submission field a grouped-stats run partitions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Team,
    Evaluator,
    Employee,
}

impl GroupBy {
    fn key<'a>(self, submission: &'a Submission) -> &'a str {
        match self {
            GroupBy::Team => &submission.team,
            GroupBy::Evaluator => &submission.evaluator,
            GroupBy::Employee => &submission.employee,
        }
    }

    /// Person-level groupings drop anonymized identities entirely; team
    /// names are not identities and never filtered.
    fn drops_anonymized(self) -> bool {
        matches!(self, GroupBy::Evaluator | GroupBy::Employee)
    }
}

/// Count/average/recency summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub key: String,
    pub count: usize,
    /// One decimal, averaged over the group's percent values.
    pub avg_percent: f64,
    pub oldest: Option<NaiveDate>,
    pub newest: Option<NaiveDate>,
    pub days_since_newest: Option<i64>,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    percent_sum: f64,
    oldest: Option<NaiveDate>,
    newest: Option<NaiveDate>,
}

/// Partitions submissions by `group_by` and summarizes each group.
///
/// `today` is passed explicitly so recency is deterministic. Groups keyed
/// by an anonymized identity are removed before anything is counted;
/// they appear nowhere, not even in other groups' totals. Result order:
/// newest date descending, dateless groups last, ties broken by key
/// ascending.
pub fn grouped_stats<'a, I>(submissions: I, group_by: GroupBy, today: NaiveDate) -> Vec<GroupStats>
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut groups: HashMap<&str, Accumulator> = HashMap::new();

    for submission in submissions {
        let key = group_by.key(submission);
        if group_by.drops_anonymized() && is_anonymized(key) {
            continue;
        }
        let acc = groups.entry(key).or_default();
        acc.count += 1;
        acc.percent_sum += submission.computed.percent;
        if let Some(date) = submission.submitted_on() {
            acc.oldest = Some(acc.oldest.map_or(date, |d| d.min(date)));
            acc.newest = Some(acc.newest.map_or(date, |d| d.max(date)));
        }
    }

    let mut stats: Vec<GroupStats> = groups
        .into_iter()
        .map(|(key, acc)| GroupStats {
            key: key.to_string(),
            count: acc.count,
            avg_percent: if acc.count > 0 {
                round1(acc.percent_sum / acc.count as f64)
            } else {
                0.0
            },
            oldest: acc.oldest,
            newest: acc.newest,
            days_since_newest: acc.newest.map(|newest| (today - newest).num_days()),
        })
        .collect();

    stats.sort_by(|a, b| match (b.newest, a.newest) {
        (Some(b_date), Some(a_date)) => b_date.cmp(&a_date).then_with(|| a.key.cmp(&b.key)),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.key.cmp(&b.key),
    });

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{AnswerSet, Scorecard};
    use crate::submission::parse_wire_timestamp;

    fn submission(employee: &str, team: &str, percent: f64, datum: &str) -> Submission {
        Submission {
            employee: employee.to_string(),
            evaluator: "eva.luator@verbaneum.de".to_string(),
            team: team.to_string(),
            catalog: "Servicequalität".to_string(),
            submitted_at: parse_wire_timestamp(datum),
            answers: AnswerSet::new(),
            computed: Scorecard {
                points: 0.0,
                max_points: 0.0,
                percent,
            },
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn groups_carry_count_average_and_recency() {
        let submissions = vec![
            submission("jane.doe@verbaneum.de", "A", 80.0, "01.03.2025, 10:00:00"),
            submission("jane.doe@verbaneum.de", "A", 90.0, "05.03.2025, 10:00:00"),
        ];

        let stats = grouped_stats(&submissions, GroupBy::Employee, today());
        assert_eq!(stats.len(), 1);
        let group = &stats[0];
        assert_eq!(group.count, 2);
        assert_eq!(group.avg_percent, 85.0);
        assert_eq!(group.oldest, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(group.newest, NaiveDate::from_ymd_opt(2025, 3, 5));
        assert_eq!(group.days_since_newest, Some(5));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let submissions = vec![
            submission("jane.doe@verbaneum.de", "A", 80.0, "01.03.2025, 10:00:00"),
            submission("jane.doe@verbaneum.de", "A", 85.0, "02.03.2025, 10:00:00"),
            submission("jane.doe@verbaneum.de", "A", 92.0, "03.03.2025, 10:00:00"),
        ];

        let stats = grouped_stats(&submissions, GroupBy::Employee, today());
        assert_eq!(stats[0].avg_percent, 85.7);
    }

    #[test]
    fn anonymized_identities_vanish_from_person_groupings() {
        let submissions = vec![
            submission("jane.doe@verbaneum.de", "A", 80.0, "01.03.2025, 10:00:00"),
            submission("123456@verbaneum.de", "A", 10.0, "01.03.2025, 10:00:00"),
        ];

        let by_employee = grouped_stats(&submissions, GroupBy::Employee, today());
        assert_eq!(by_employee.len(), 1);
        assert_eq!(by_employee[0].key, "jane.doe@verbaneum.de");
        // The dropped submission does not leak into any other average.
        assert_eq!(by_employee[0].avg_percent, 80.0);

        // Team grouping keeps everything; teams are not identities.
        let by_team = grouped_stats(&submissions, GroupBy::Team, today());
        assert_eq!(by_team[0].count, 2);
    }

    #[test]
    fn ordering_is_newest_first_with_key_tiebreak() {
        let submissions = vec![
            submission("b.b@verbaneum.de", "A", 80.0, "05.03.2025, 10:00:00"),
            submission("a.a@verbaneum.de", "A", 80.0, "05.03.2025, 10:00:00"),
            submission("c.c@verbaneum.de", "A", 80.0, "07.03.2025, 10:00:00"),
            submission("d.d@verbaneum.de", "A", 80.0, "kaputt"),
        ];

        let stats = grouped_stats(&submissions, GroupBy::Employee, today());
        let keys: Vec<&str> = stats.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "c.c@verbaneum.de",
                "a.a@verbaneum.de",
                "b.b@verbaneum.de",
                "d.d@verbaneum.de",
            ]
        );
        assert_eq!(stats[3].newest, None);
        assert_eq!(stats[3].days_since_newest, None);
    }

    #[test]
    fn empty_input_yields_empty_stats() {
        let stats = grouped_stats(&[], GroupBy::Team, today());
        assert!(stats.is_empty());
    }
}
