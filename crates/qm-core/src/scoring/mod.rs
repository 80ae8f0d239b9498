//! Headline score computation for one submitted answer set.
//!
//! Only `rating` questions count here: their numeric answers sum into
//! `points` and their declared maxima into `max_points`. Boolean and
//! radiogroup answers feed the category/dimension rollups in
//! `reporting` but deliberately not the headline percent: the two
//! scoring universes are kept asymmetric on purpose (see the pinning
//! test at the bottom).

pub mod answers;
pub mod normalize;

pub use answers::{AnswerSet, AnswerValue};
pub use normalize::{normalize, NormalizedAnswers, ResolvedAnswer};

use crate::catalog::{CatalogNameMap, CatalogQuestions, SchemaIndex, ScoringKind};
use serde::{Deserialize, Serialize};

/// Computed score of one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub points: f64,
    pub max_points: f64,
    /// 0–100, two decimals. May exceed 100 when catalog definitions
    /// drifted after the submission; display layers cap it.
    pub percent: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    /// The submission's catalog (after name-map resolution) has no schema.
    /// Distinct from a legitimate zero score: the caller reports this as
    /// "catalog not found", never as 0%.
    #[error("no catalog schema found under '{name}'")]
    CatalogNotFound { name: String },
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scores an answer set against a catalog's question definitions.
///
/// `visible` reproduces the survey widget's conditional visibility:
/// questions it rejects contribute to neither numerator nor denominator.
/// A denominator of zero yields 0%, never NaN. Deterministic: question
/// iteration follows the index's sorted order, and identical inputs
/// always produce identical output.
pub fn score_answers<F>(questions: &CatalogQuestions, answers: &AnswerSet, visible: F) -> Scorecard
where
    F: Fn(&str) -> bool,
{
    let mut points = 0.0;
    let mut max_points = 0.0;

    for (name, entry) in questions {
        if entry.scoring != ScoringKind::Rating || !visible(name) {
            continue;
        }
        max_points += f64::from(entry.max_score);
        if let Some(value) = answers.resolve(name).and_then(AnswerValue::as_number) {
            points += value;
        }
    }

    let percent = if max_points > 0.0 {
        round2(points / max_points * 100.0)
    } else {
        0.0
    };

    Scorecard {
        points,
        max_points,
        percent,
    }
}

/// Scores a submission identified by catalog name, resolving historical
/// names through the name map first.
pub fn score_submission<F>(
    index: &SchemaIndex,
    names: &CatalogNameMap,
    catalog: &str,
    answers: &AnswerSet,
    visible: F,
) -> Result<Scorecard, ScoreError>
where
    F: Fn(&str) -> bool,
{
    let resolved = names.resolve(catalog);
    let questions = index
        .catalog(resolved)
        .ok_or_else(|| ScoreError::CatalogNotFound {
            name: resolved.to_string(),
        })?;
    Ok(score_answers(questions, answers, visible))
}
