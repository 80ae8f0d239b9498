use super::text::display_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback rating maximum when a rating element does not declare one.
/// Matches the survey widget's built-in default.
pub const DEFAULT_RATING_MAX: u32 = 5;

/// Category label used when a page carries neither a name nor a title.
pub const UNNAMED_CATEGORY: &str = "Other";

/// A catalog as handed over by the catalog store: identification plus the
/// survey definition as raw JSON. `json_data` may be the survey object
/// itself or that object double-encoded as a JSON string; both occur in
/// stored data and both must parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub root_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub teams: Vec<String>,
    pub json_data: Value,
}

fn default_version() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

/// How a question contributes to scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringKind {
    Rating,
    Boolean,
    Radiogroup,
    Unscored,
}

impl ScoringKind {
    fn from_element_type(element_type: &str) -> Self {
        match element_type {
            "rating" => Self::Rating,
            "boolean" => Self::Boolean,
            "radiogroup" => Self::Radiogroup,
            _ => Self::Unscored,
        }
    }

    /// Scoring kinds that feed category/dimension rollups. Wider than the
    /// headline score, which sums ratings only.
    pub fn counts_toward_profile(self) -> bool {
        !matches!(self, Self::Unscored)
    }
}

/// Normalized question definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaQuestion {
    pub name: String,
    pub title: String,
    pub scoring: ScoringKind,
    /// Maximum achievable value; zero for unscored questions.
    pub max_score: u32,
}

/// Normalized page: a category label plus its questions in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPage {
    pub category: String,
    pub questions: Vec<SchemaQuestion>,
}

/// The validated internal form of a catalog. Produced by one defensive
/// parse at the boundary; everything downstream consumes only this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSchema {
    pub name: String,
    pub version: u32,
    pub root_id: String,
    pub is_active: bool,
    pub teams: Vec<String>,
    pub pages: Vec<SchemaPage>,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    #[error("catalog '{catalog}' carries a double-encoded survey definition that is not valid JSON")]
    InvalidJson {
        catalog: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog '{catalog}' has no 'pages' array in its survey definition")]
    MissingPages { catalog: String },
}

/// Parses and normalizes one stored catalog document.
///
/// Tolerates double-encoded `json_data`, locale-object page labels, and
/// elements without names (skipped). Fails only when the survey
/// definition itself is unusable; the schema index treats that as a
/// per-catalog condition, never a batch failure.
pub fn parse_catalog(document: &CatalogDocument) -> Result<CatalogSchema, SchemaParseError> {
    let survey: Value = match &document.json_data {
        Value::String(encoded) => {
            serde_json::from_str(encoded).map_err(|source| SchemaParseError::InvalidJson {
                catalog: document.name.clone(),
                source,
            })?
        }
        other => other.clone(),
    };

    let Some(raw_pages) = survey.get("pages").and_then(Value::as_array) else {
        return Err(SchemaParseError::MissingPages {
            catalog: document.name.clone(),
        });
    };

    let mut pages = Vec::with_capacity(raw_pages.len());
    for raw_page in raw_pages {
        let category = raw_page
            .get("name")
            .and_then(display_string)
            .or_else(|| raw_page.get("title").and_then(display_string))
            .unwrap_or_else(|| UNNAMED_CATEGORY.to_string());

        let mut questions = Vec::new();
        if let Some(elements) = raw_page.get("elements").and_then(Value::as_array) {
            for element in elements {
                let Some(name) = element.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let element_type = element.get("type").and_then(Value::as_str).unwrap_or("");
                let scoring = ScoringKind::from_element_type(element_type);
                let max_score = match scoring {
                    ScoringKind::Rating => element
                        .get("rateMax")
                        .and_then(Value::as_u64)
                        .map(|max| max as u32)
                        .unwrap_or(DEFAULT_RATING_MAX),
                    ScoringKind::Boolean | ScoringKind::Radiogroup => 1,
                    ScoringKind::Unscored => 0,
                };
                let title = element
                    .get("title")
                    .and_then(display_string)
                    .unwrap_or_else(|| name.to_string());

                questions.push(SchemaQuestion {
                    name: name.to_string(),
                    title,
                    scoring,
                    max_score,
                });
            }
        }

        pages.push(SchemaPage {
            category,
            questions,
        });
    }

    Ok(CatalogSchema {
        name: document.name.clone(),
        version: document.version,
        root_id: if document.root_id.is_empty() {
            document.name.clone()
        } else {
            document.root_id.clone()
        },
        is_active: document.is_active,
        teams: document.teams.clone(),
        pages,
    })
}

impl CatalogSchema {
    /// Flattened view over all questions, page order preserved.
    pub fn questions(&self) -> impl Iterator<Item = (&str, &SchemaQuestion)> {
        self.pages
            .iter()
            .flat_map(|page| page.questions.iter().map(move |q| (page.category.as_str(), q)))
    }
}
