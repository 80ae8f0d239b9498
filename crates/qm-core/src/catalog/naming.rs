use std::collections::HashMap;

/// Translates historical catalog names to their current names.
///
/// Catalog names drift over time while submissions keep the name that was
/// active when they were filled out; schema lookups go through this table
/// so a rename does not silently orphan old submissions. The table is
/// external configuration; names absent from it resolve to themselves.
#[derive(Debug, Default, Clone)]
pub struct CatalogNameMap {
    entries: HashMap<String, String>,
}

impl CatalogNameMap {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(historical, current)| (historical.into(), current.into()))
                .collect(),
        }
    }

    /// The name to use for schema index lookups. Unmapped names pass
    /// through unchanged.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
