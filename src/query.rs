//! Term splitting and substring matching over the file index.

/// Maximum number of matches collected per query.
pub const MATCH_CAP: usize = 1000;

/// Returns the positions of paths matching every whitespace-delimited term
/// of `query` as a case-insensitive substring (AND semantics, no ordering
/// requirement between terms).
///
/// The scan preserves index order and stops once [`MATCH_CAP`] matches have
/// been collected. An empty term set matches nothing, not everything.
pub fn match_paths(files: &[String], query: &str) -> Vec<usize> {
    let lowered = query.to_lowercase();
    let terms: Vec<&str> = lowered.split_whitespace().collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (index, path) in files.iter().enumerate() {
        let candidate = path.to_lowercase();
        if terms.iter().all(|term| candidate.contains(term)) {
            matches.push(index);
            if matches.len() >= MATCH_CAP {
                break;
            }
        }
    }
    matches
}
