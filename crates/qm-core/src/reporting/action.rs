use crate::submission::Submission;
use serde::{Deserialize, Serialize};

/// Field-name fragments that mark an "action required" flag, matched
/// case-insensitively against raw answer keys. Covers the German survey
/// field and its sanitized/translated variants found in historical data.
const ACTION_FIELD_FRAGMENTS: &[&str] = &["handlungsbedarf", "action required", "action_required"];

/// Yes/no split of the action-required flag across submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequiredRatio {
    pub yes: usize,
    pub no: usize,
}

impl ActionRequiredRatio {
    /// Submissions that carry the flag at all; submissions without it
    /// stay out of the denominator entirely.
    pub fn total(&self) -> usize {
        self.yes + self.no
    }
}

/// Scans each submission's raw answer keys for an action-required field
/// and tallies affirmative against non-affirmative values.
pub fn action_required_ratio<'a, I>(submissions: I) -> ActionRequiredRatio
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut ratio = ActionRequiredRatio::default();

    for submission in submissions {
        let flag = submission.answers.iter().find(|(key, _)| {
            let lowered = key.to_lowercase();
            ACTION_FIELD_FRAGMENTS
                .iter()
                .any(|fragment| lowered.contains(fragment))
        });

        if let Some((_, value)) = flag {
            if value.is_truthy() {
                ratio.yes += 1;
            } else {
                ratio.no += 1;
            }
        }
    }

    ratio
}
