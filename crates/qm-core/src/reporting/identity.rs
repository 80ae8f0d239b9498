/// Tenant email domain under which placeholder/test identities occur.
pub const ANONYMIZED_DOMAIN: &str = "verbaneum.de";

/// Detects placeholder identities that must not surface in per-person
/// reporting.
///
/// Regular identities are `first.last@verbaneum.de`; anonymized and test
/// identities carry a bare local part without a `.` separator (typically
/// numeric). Identities under any other domain are never considered
/// anonymized. The heuristic silently removes rows from evaluator and
/// employee groupings, so it is reproduced exactly as deployed.
pub fn is_anonymized(identity: &str) -> bool {
    let Some((local, domain)) = identity.trim().rsplit_once('@') else {
        return false;
    };
    domain.eq_ignore_ascii_case(ANONYMIZED_DOMAIN) && !local.is_empty() && !local.contains('.')
}
