use super::parse::{parse_catalog, CatalogDocument, ScoringKind};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Everything the scoring and aggregation paths need to know about one
/// question, detached from the page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEntry {
    pub category: String,
    pub scoring: ScoringKind,
    pub max_score: u32,
}

/// Flattened question set of one catalog, keyed by question name.
/// BTreeMap so iteration (and therefore scoring) is deterministic.
pub type CatalogQuestions = BTreeMap<String, QuestionEntry>;

/// Fast lookup from catalog name to its flattened question definitions.
///
/// Built once from the raw catalog documents; catalogs whose survey
/// definition fails to parse contribute nothing and are recorded in
/// `skipped`; a bad catalog never fails the whole build.
#[derive(Debug, Default, Clone)]
pub struct SchemaIndex {
    catalogs: HashMap<String, CatalogQuestions>,
    skipped: Vec<String>,
}

impl SchemaIndex {
    pub fn build(documents: &[CatalogDocument]) -> Self {
        let mut catalogs: HashMap<String, CatalogQuestions> = HashMap::new();
        let mut skipped = Vec::new();

        for document in documents {
            let schema = match parse_catalog(document) {
                Ok(schema) => schema,
                Err(err) => {
                    warn!(catalog = %document.name, error = %err, "skipping unparsable catalog");
                    skipped.push(document.name.clone());
                    continue;
                }
            };

            let questions = catalogs.entry(schema.name.clone()).or_default();
            for (category, question) in schema.questions() {
                questions.insert(
                    question.name.clone(),
                    QuestionEntry {
                        category: category.to_string(),
                        scoring: question.scoring,
                        max_score: question.max_score,
                    },
                );
            }
        }

        Self { catalogs, skipped }
    }

    pub fn catalog(&self, name: &str) -> Option<&CatalogQuestions> {
        self.catalogs.get(name)
    }

    pub fn question(&self, catalog: &str, question: &str) -> Option<&QuestionEntry> {
        self.catalogs.get(catalog).and_then(|c| c.get(question))
    }

    pub fn contains(&self, catalog: &str) -> bool {
        self.catalogs.contains_key(catalog)
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Names of catalogs that could not be parsed during the build.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}
