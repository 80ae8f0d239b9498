use super::answers::{AnswerSet, AnswerValue};
use crate::catalog::CatalogQuestions;

/// An answer value matched back to its schema question.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnswer<'a> {
    pub question: &'a str,
    pub value: &'a AnswerValue,
}

/// Result of matching a raw answer map against a catalog's question set.
#[derive(Debug, Default)]
pub struct NormalizedAnswers<'a> {
    pub resolved: Vec<ResolvedAnswer<'a>>,
    /// Raw keys with no corresponding schema question. Diagnostic only;
    /// these are excluded from scoring, never an error.
    pub unresolved_keys: Vec<String>,
}

/// Matches raw answer keys to schema questions, tolerating the key
/// sanitization submissions went through (spaces stored as underscores).
pub fn normalize<'a>(
    answers: &'a AnswerSet,
    questions: &'a CatalogQuestions,
) -> NormalizedAnswers<'a> {
    let mut resolved = Vec::new();
    for name in questions.keys() {
        if let Some(value) = answers.resolve(name) {
            resolved.push(ResolvedAnswer {
                question: name.as_str(),
                value,
            });
        }
    }

    let unresolved_keys = answers
        .iter()
        .filter(|(key, _)| {
            !questions.contains_key(key.as_str())
                && !questions.contains_key(&key.replace('_', " "))
                && !questions.contains_key(&key.replace(' ', "_"))
        })
        .map(|(key, _)| key.clone())
        .collect();

    NormalizedAnswers {
        resolved,
        unresolved_keys,
    }
}
