use ledgerguard_types::Finding;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - rule_id
/// - finding title
/// - evidence `source:reference` pairs, in emitted order
pub fn fingerprint_for_finding(rule_id: &str, finding: &Finding) -> String {
    let mut parts = vec![rule_id.to_string(), finding.title.clone()];
    parts.extend(
        finding
            .evidence
            .iter()
            .map(|e| format!("{}:{}", e.source, e.reference)),
    );
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
