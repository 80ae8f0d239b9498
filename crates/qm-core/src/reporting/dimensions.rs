use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bucket name for categories without a dimension assignment.
pub const OTHER_DIMENSION: &str = "Other";

/// A cross-catalog grouping of categories for higher-level reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    /// Chart color, e.g. `#2196f3`. Passed through to presentation.
    pub color: String,
}

/// Category→dimension assignments, upsert-by-category semantics.
///
/// A category maps to at most one dimension at a time; re-mapping a
/// category overwrites the previous assignment (last write wins).
/// Categories without an assignment fall back to [`OTHER_DIMENSION`].
#[derive(Debug, Default, Clone)]
pub struct DimensionMap {
    dimensions: HashMap<String, Dimension>,
    assignments: HashMap<String, String>,
}

impl DimensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_dimension(&mut self, dimension: Dimension) {
        self.dimensions.insert(dimension.id.clone(), dimension);
    }

    /// Assigns a category to a dimension, replacing any prior assignment.
    /// A `None` dimension clears the assignment back to the fallback.
    pub fn upsert_assignment(&mut self, category: impl Into<String>, dimension_id: Option<String>) {
        let category = category.into();
        match dimension_id {
            Some(id) => {
                self.assignments.insert(category, id);
            }
            None => {
                self.assignments.remove(&category);
            }
        }
    }

    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.get(id)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.values()
    }

    /// Current category→dimension-id assignments.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assignments
            .iter()
            .map(|(category, id)| (category.as_str(), id.as_str()))
    }

    /// The dimension a category belongs to, if assigned to a known one.
    pub fn dimension_for(&self, category: &str) -> Option<&Dimension> {
        self.assignments
            .get(category)
            .and_then(|id| self.dimensions.get(id))
    }

    /// Reporting label for a category: its dimension's name, or the
    /// synthetic fallback bucket.
    pub fn label_for(&self, category: &str) -> &str {
        self.dimension_for(category)
            .map(|dimension| dimension.name.as_str())
            .unwrap_or(OTHER_DIMENSION)
    }
}
