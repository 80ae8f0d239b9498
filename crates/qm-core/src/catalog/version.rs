use super::parse::CatalogDocument;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("no catalog version found for lineage '{root_id}'")]
    UnknownLineage { root_id: String },
}

/// Archives the currently active version of a lineage and appends a clone
/// under the next version number.
///
/// Every prior version of the lineage is deactivated, so exactly one
/// version per lineage is active afterwards: a hard invariant here, not
/// the advisory one the stored data historically had. Team assignments
/// and the `root_id` carry over; an optional rename applies to the new
/// version only.
pub fn publish_new_version(
    catalogs: &mut Vec<CatalogDocument>,
    root_id: &str,
    rename_to: Option<&str>,
) -> Result<usize, VersionError> {
    let lineage: Vec<usize> = catalogs
        .iter()
        .enumerate()
        .filter(|(_, doc)| doc.root_id == root_id)
        .map(|(i, _)| i)
        .collect();

    if lineage.is_empty() {
        return Err(VersionError::UnknownLineage {
            root_id: root_id.to_string(),
        });
    }

    let latest = lineage
        .iter()
        .copied()
        .max_by_key(|&i| catalogs[i].version)
        .expect("non-empty lineage has a latest version");

    let mut next = catalogs[latest].clone();
    next.version = catalogs[latest].version + 1;
    next.is_active = true;
    if let Some(name) = rename_to {
        next.name = name.to_string();
    }

    for index in lineage {
        catalogs[index].is_active = false;
    }

    catalogs.push(next);
    Ok(catalogs.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(name: &str, version: u32, active: bool) -> CatalogDocument {
        CatalogDocument {
            name: name.to_string(),
            version,
            root_id: "lineage-1".to_string(),
            is_active: active,
            teams: vec!["SDK Inbound".to_string()],
            json_data: json!({"pages": []}),
        }
    }

    #[test]
    fn publishing_archives_all_prior_versions() {
        let mut catalogs = vec![document("Bogen", 1, true)];
        let new = publish_new_version(&mut catalogs, "lineage-1", None).expect("publishes");

        assert_eq!(catalogs[new].version, 2);
        assert!(catalogs[new].is_active);
        assert!(!catalogs[0].is_active);
        assert_eq!(catalogs[new].root_id, "lineage-1");
        assert_eq!(catalogs[new].teams, catalogs[0].teams);
    }

    #[test]
    fn publishing_repairs_lax_multi_active_lineages() {
        // Historically more than one version could be left active.
        let mut catalogs = vec![document("Bogen", 1, true), document("Bogen", 2, true)];
        let new = publish_new_version(&mut catalogs, "lineage-1", Some("Bogen neu"))
            .expect("publishes");

        assert_eq!(catalogs[new].version, 3);
        assert_eq!(catalogs[new].name, "Bogen neu");
        let active: Vec<_> = catalogs.iter().filter(|c| c.is_active).collect();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn unknown_lineage_is_rejected() {
        let mut catalogs = vec![document("Bogen", 1, true)];
        let err = publish_new_version(&mut catalogs, "missing", None).expect_err("rejected");
        assert!(matches!(err, VersionError::UnknownLineage { .. }));
        assert_eq!(catalogs.len(), 1);
    }
}
