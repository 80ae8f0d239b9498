//! Persistence seams for the service layer.
//!
//! The engine itself never touches storage; these traits describe what it
//! needs from the surrounding application. The service crate provides
//! in-memory implementations; a production deployment would back them
//! with a document store without the engine noticing.

use crate::catalog::CatalogDocument;
use crate::reporting::{Dimension, DimensionMap};
use crate::submission::Submission;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record '{id}' not found")]
    NotFound { id: String },
    #[error("record '{id}' already exists")]
    Conflict { id: String },
}

/// Read/write access to catalog schema documents.
pub trait CatalogStore: Send + Sync {
    fn list(&self) -> Vec<CatalogDocument>;
    fn insert(&self, document: CatalogDocument) -> Result<(), StoreError>;
    /// Runs `mutate` against the full document set under the store's
    /// write lock, so read-modify-write sequences cannot interleave.
    fn modify(&self, mutate: &mut dyn FnMut(&mut Vec<CatalogDocument>));
}

/// Read/write access to stored submissions, keyed by an opaque id.
pub trait SubmissionStore: Send + Sync {
    fn list(&self) -> Vec<(String, Submission)>;
    fn insert(&self, submission: Submission) -> String;
    fn update(&self, id: &str, submission: Submission) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Read/write access to the dimension and category-mapping tables.
pub trait DimensionStore: Send + Sync {
    fn snapshot(&self) -> DimensionMap;
    fn upsert_dimension(&self, dimension: Dimension);
    fn upsert_assignment(&self, category: String, dimension_id: Option<String>);
}
