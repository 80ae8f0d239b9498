use super::dimensions::DimensionMap;
use crate::catalog::{CatalogNameMap, SchemaIndex};
use crate::scoring::AnswerValue;
use crate::submission::Submission;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis of a radar chart: a label plus its average percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarEntry {
    pub subject: String,
    /// `round(sum/count)` over all contributing answers, each clamped to
    /// [0, 100] before accumulation.
    pub value: f64,
    pub count: usize,
}

/// How radar axes are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarGrouping {
    /// Raw category (page) labels; used when a catalog filter narrows the
    /// view to one schema.
    Category,
    /// Mapped dimension names with the "Other" fallback; used for the
    /// cross-catalog view.
    Dimension,
}

/// Shared lookup context for the profile computations.
pub struct ProfileContext<'a> {
    pub index: &'a SchemaIndex,
    pub names: &'a CatalogNameMap,
    pub dimensions: &'a DimensionMap,
}

#[derive(Default)]
struct Running {
    sum: f64,
    count: usize,
}

impl<'a> ProfileContext<'a> {
    /// Average percent per category or dimension across all submissions.
    ///
    /// Every answered question whose scoring kind contributes to profiles
    /// (rating, boolean, radiogroup; wider than the headline score) adds
    /// `value/max*100`, clamped to [0, 100] to absorb legacy drift.
    /// Submissions whose catalog has no schema, and answers that resolve
    /// to no question or no usable value, are skipped silently.
    pub fn radar_profile<I>(&self, submissions: I, grouping: RadarGrouping) -> Vec<RadarEntry>
    where
        I: IntoIterator<Item = &'a Submission>,
    {
        self.accumulate(submissions, |category, _| match grouping {
            RadarGrouping::Category => category.to_string(),
            RadarGrouping::Dimension => self.dimensions.label_for(category).to_string(),
        })
    }

    /// Average percent per individual question. Only meaningful when the
    /// caller narrowed by team or catalog; the service layer refuses to
    /// offer it otherwise.
    pub fn question_profile<I>(&self, submissions: I) -> Vec<RadarEntry>
    where
        I: IntoIterator<Item = &'a Submission>,
    {
        self.accumulate(submissions, |_, question| question.to_string())
    }

    fn accumulate<I, K>(&self, submissions: I, key_of: K) -> Vec<RadarEntry>
    where
        I: IntoIterator<Item = &'a Submission>,
        K: Fn(&str, &str) -> String,
    {
        let mut running: BTreeMap<String, Running> = BTreeMap::new();

        for submission in submissions {
            let resolved = self.names.resolve(&submission.catalog);
            let Some(questions) = self.index.catalog(resolved) else {
                continue;
            };

            for (name, entry) in questions {
                if !entry.scoring.counts_toward_profile() || entry.max_score == 0 {
                    continue;
                }
                let Some(value) = submission
                    .answers
                    .resolve(name)
                    .and_then(AnswerValue::as_score)
                else {
                    continue;
                };

                let percent = (value / f64::from(entry.max_score) * 100.0).clamp(0.0, 100.0);
                let acc = running.entry(key_of(&entry.category, name)).or_default();
                acc.sum += percent;
                acc.count += 1;
            }
        }

        running
            .into_iter()
            .map(|(subject, acc)| RadarEntry {
                subject,
                value: (acc.sum / acc.count as f64).round(),
                count: acc.count,
            })
            .collect()
    }
}
