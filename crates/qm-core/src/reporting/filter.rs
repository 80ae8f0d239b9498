use crate::submission::Submission;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel meaning "no filter" for single-value fields, as sent by the
/// dashboard's select boxes.
fn is_all_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("all")
        || trimmed.eq_ignore_ascii_case("alle")
}

/// Conjunction of predicates applied to the submission list before any
/// aggregation runs. Every report view shares this one filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionFilter {
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Inclusive; extends to the end of the given calendar day.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// OR-matched when non-empty, otherwise no team restriction.
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub evaluator: Option<String>,
    #[serde(default)]
    pub employee: Option<String>,
}

impl SubmissionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams = teams.into_iter().map(Into::into).collect();
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn evaluator(mut self, evaluator: impl Into<String>) -> Self {
        self.evaluator = Some(evaluator.into());
        self
    }

    pub fn employee(mut self, employee: impl Into<String>) -> Self {
        self.employee = Some(employee.into());
        self
    }

    /// Whether the filter narrows by team or catalog. Per-question
    /// breakdowns are only meaningful under such a narrowing.
    pub fn narrows_by_team_or_catalog(&self) -> bool {
        let has_teams = !self.teams.iter().all(|team| is_all_sentinel(team));
        let has_catalog = self
            .catalog
            .as_deref()
            .map(|catalog| !is_all_sentinel(catalog))
            .unwrap_or(false);
        has_teams || has_catalog
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        if self.date_from.is_some() || self.date_to.is_some() {
            // Date bounds require a parseable timestamp.
            let Some(date) = submission.submitted_on() else {
                return false;
            };
            if let Some(from) = self.date_from {
                if date < from {
                    return false;
                }
            }
            if let Some(to) = self.date_to {
                if date > to {
                    return false;
                }
            }
        }

        let active_teams: Vec<&String> = self
            .teams
            .iter()
            .filter(|team| !is_all_sentinel(team))
            .collect();
        if !active_teams.is_empty() && !active_teams.iter().any(|team| **team == submission.team) {
            return false;
        }

        for (wanted, actual) in [
            (self.catalog.as_deref(), submission.catalog.as_str()),
            (self.evaluator.as_deref(), submission.evaluator.as_str()),
            (self.employee.as_deref(), submission.employee.as_str()),
        ] {
            if let Some(wanted) = wanted {
                if !is_all_sentinel(wanted) && wanted != actual {
                    return false;
                }
            }
        }

        true
    }

    pub fn apply<'a>(&self, submissions: &'a [Submission]) -> Vec<&'a Submission> {
        submissions.iter().filter(|s| self.matches(s)).collect()
    }
}
