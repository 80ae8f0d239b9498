use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw answer value as it appears in a stored submission.
///
/// Submissions carry numbers, numeric strings, booleans, free text, and
/// (for labels that went through the survey widget's localization)
/// locale objects. The tagged union replaces the original system's
/// scattered `typeof` checks with one place that decides what a value
/// means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(f64),
    Localized(BTreeMap<String, String>),
    Text(String),
}

/// Word forms accepted as "yes" in boolean-ish answers, matched
/// case-insensitively.
const TRUTHY_WORDS: &[&str] = &["ja", "yes", "true", "wahr"];
const FALSY_WORDS: &[&str] = &["nein", "no", "false", "falsch"];

impl AnswerValue {
    /// Strict numeric reading: numbers, and strings that fully parse as
    /// numbers (German decimal comma tolerated). Used by the headline
    /// score, which ignores everything non-numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            AnswerValue::Text(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Wider reading used by category/dimension rollups: numeric values,
    /// booleans as 1/0, and the fixed yes/no word vocabulary.
    pub fn as_score(&self) -> Option<f64> {
        if let Some(number) = self.as_number() {
            return Some(number);
        }
        match self {
            AnswerValue::Flag(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            AnswerValue::Text(text) => {
                let lowered = text.trim().to_lowercase();
                if TRUTHY_WORDS.contains(&lowered.as_str()) {
                    Some(1.0)
                } else if FALSY_WORDS.contains(&lowered.as_str()) {
                    Some(0.0)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Whether this value reads as an affirmative answer. Used by the
    /// action-required scan.
    pub fn is_truthy(&self) -> bool {
        match self {
            AnswerValue::Flag(flag) => *flag,
            AnswerValue::Number(value) => *value != 0.0,
            AnswerValue::Text(text) => {
                let lowered = text.trim().to_lowercase();
                TRUTHY_WORDS.contains(&lowered.as_str()) || lowered == "1" || lowered == "x"
            }
            AnswerValue::Localized(_) => false,
        }
    }

}

/// The flat answer map of one submission.
///
/// Keys may be sanitized relative to the schema (spaces stored as
/// underscores), so lookups by question name try the exact key first and
/// then both sanitization directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(pub BTreeMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.0.insert(key.into(), value);
    }

    /// Resolves a schema question name against possibly-sanitized keys.
    /// First match wins: exact, underscores for spaces, spaces for
    /// underscores.
    pub fn resolve(&self, question_name: &str) -> Option<&AnswerValue> {
        if let Some(value) = self.0.get(question_name) {
            return Some(value);
        }
        let underscored = question_name.replace(' ', "_");
        if underscored != question_name {
            if let Some(value) = self.0.get(&underscored) {
                return Some(value);
            }
        }
        let spaced = question_name.replace('_', " ");
        if spaced != question_name {
            if let Some(value) = self.0.get(&spaced) {
                return Some(value);
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
