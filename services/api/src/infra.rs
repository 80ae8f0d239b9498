use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use qm_core::cache::TtlCache;
use qm_core::catalog::{CatalogDocument, CatalogNameMap, SchemaIndex};
use qm_core::reporting::{Dimension, DimensionMap};
use qm_core::scoring::{normalize, score_submission, AnswerSet, Scorecard, ScoreError};
use qm_core::store::{CatalogStore, DimensionStore, StoreError, SubmissionStore};
use qm_core::submission::Submission;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SCHEMA_INDEX_TTL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the stores, the catalog name map and the cached schema index
/// together behind one handle the route layer can clone freely.
pub(crate) struct Engine {
    pub(crate) catalogs: Arc<dyn CatalogStore>,
    pub(crate) submissions: Arc<dyn SubmissionStore>,
    pub(crate) dimensions: Arc<dyn DimensionStore>,
    pub(crate) names: CatalogNameMap,
    index_cache: TtlCache<Arc<SchemaIndex>>,
}

impl Engine {
    pub(crate) fn new(
        catalogs: Arc<dyn CatalogStore>,
        submissions: Arc<dyn SubmissionStore>,
        dimensions: Arc<dyn DimensionStore>,
        names: CatalogNameMap,
    ) -> Self {
        Self {
            catalogs,
            submissions,
            dimensions,
            names,
            index_cache: TtlCache::new(SCHEMA_INDEX_TTL),
        }
    }

    /// The parsed question index for all stored catalogs. Rebuilt lazily
    /// after a catalog write or cache expiry.
    pub(crate) fn schema_index(&self) -> Arc<SchemaIndex> {
        self.index_cache
            .get_or_insert_with(|| Arc::new(SchemaIndex::build(&self.catalogs.list())))
    }

    pub(crate) fn invalidate_schema(&self) {
        self.index_cache.invalidate();
    }

    /// Recomputes the scorecard for a set of answers. A question counts
    /// as visible when the widget recorded any answer for it; questions
    /// the widget hid never appear in the answer set.
    pub(crate) fn score(
        &self,
        catalog: &str,
        answers: &AnswerSet,
    ) -> Result<Scorecard, ScoreError> {
        let index = self.schema_index();
        let card = score_submission(&index, &self.names, catalog, answers, |name| {
            answers.resolve(name).is_some()
        })?;

        if let Some(questions) = index.catalog(self.names.resolve(catalog)) {
            let normalized = normalize(answers, questions);
            if !normalized.unresolved_keys.is_empty() {
                tracing::warn!(
                    catalog,
                    keys = ?normalized.unresolved_keys,
                    "submission carries answers with no schema question"
                );
            }
        }

        Ok(card)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryCatalogStore {
    documents: Mutex<Vec<CatalogDocument>>,
}

impl CatalogStore for InMemoryCatalogStore {
    fn list(&self) -> Vec<CatalogDocument> {
        self.documents.lock().expect("catalog mutex poisoned").clone()
    }

    fn insert(&self, document: CatalogDocument) -> Result<(), StoreError> {
        let mut guard = self.documents.lock().expect("catalog mutex poisoned");
        let duplicate = guard
            .iter()
            .any(|existing| existing.name == document.name && existing.version == document.version);
        if duplicate {
            return Err(StoreError::Conflict {
                id: format!("{} v{}", document.name, document.version),
            });
        }
        guard.push(document);
        Ok(())
    }

    fn modify(&self, mutate: &mut dyn FnMut(&mut Vec<CatalogDocument>)) {
        let mut guard = self.documents.lock().expect("catalog mutex poisoned");
        mutate(&mut guard);
    }
}

#[derive(Default)]
pub(crate) struct InMemorySubmissionStore {
    records: Mutex<HashMap<String, Submission>>,
    next_id: AtomicU64,
}

impl SubmissionStore for InMemorySubmissionStore {
    fn list(&self) -> Vec<(String, Submission)> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        let mut rows: Vec<_> = guard
            .iter()
            .map(|(id, submission)| (id.clone(), submission.clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    fn insert(&self, submission: Submission) -> String {
        let id = format!("eval-{:06}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let mut guard = self.records.lock().expect("submission mutex poisoned");
        guard.insert(id.clone(), submission);
        id
    }

    fn update(&self, id: &str, submission: Submission) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("submission mutex poisoned");
        if guard.contains_key(id) {
            guard.insert(id.to_string(), submission);
            Ok(())
        } else {
            Err(StoreError::NotFound { id: id.to_string() })
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("submission mutex poisoned");
        if guard.remove(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound { id: id.to_string() })
        }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryDimensionStore {
    map: Mutex<DimensionMap>,
}

impl InMemoryDimensionStore {
    pub(crate) fn seeded(map: DimensionMap) -> Self {
        Self { map: Mutex::new(map) }
    }
}

impl DimensionStore for InMemoryDimensionStore {
    fn snapshot(&self) -> DimensionMap {
        self.map.lock().expect("dimension mutex poisoned").clone()
    }

    fn upsert_dimension(&self, dimension: Dimension) {
        self.map
            .lock()
            .expect("dimension mutex poisoned")
            .upsert_dimension(dimension);
    }

    fn upsert_assignment(&self, category: String, dimension_id: Option<String>) {
        self.map
            .lock()
            .expect("dimension mutex poisoned")
            .upsert_assignment(category, dimension_id);
    }
}

/// The dimension palette the dashboard ships with. Deployments extend
/// it through the dimension endpoints.
pub(crate) fn seed_dimension_map() -> DimensionMap {
    let mut map = DimensionMap::new();
    for (id, name, color) in [
        ("dim-fachlich", "Fachliches & Prozesse", "#2196f3"),
        ("dim-system", "System & Datenpflege", "#4caf50"),
        ("dim-kommunikation", "Kommunikation", "#ff9800"),
        ("dim-struktur", "Gesprächsstruktur", "#9c27b0"),
        ("dim-doku", "Dokumentation & Aktivitäten", "#f44336"),
    ] {
        map.upsert_dimension(Dimension {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        });
    }
    map
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
