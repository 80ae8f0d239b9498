mod index;
mod naming;
mod parse;
pub mod text;
mod version;

pub use index::{CatalogQuestions, QuestionEntry, SchemaIndex};
pub use naming::CatalogNameMap;
pub use parse::{
    parse_catalog, CatalogDocument, CatalogSchema, SchemaPage, SchemaParseError, SchemaQuestion,
    ScoringKind, DEFAULT_RATING_MAX, UNNAMED_CATEGORY,
};
pub use version::{publish_new_version, VersionError};
