//! Merge order resolution.
//!
//! An explicit order names sources; an empty order means "everything,
//! alphabetically, ignoring case".

use std::collections::HashMap;

use tracing::warn;

use super::source::{DocumentSource, SkipReason, SkippedEntry};

/// Sources in the order they will be merged, plus the entries left out.
#[derive(Debug)]
pub struct ResolvedOrder<'a> {
    pub sources: Vec<&'a DocumentSource>,
    pub skipped: Vec<SkippedEntry>,
}

/// Resolve `order` against `sources`.
///
/// With a non-empty `order`, each name is matched exactly. The k-th
/// occurrence of a name maps to the k-th source carrying that name, so two
/// uploads that share a name both take part; occurrences beyond the number of
/// same-named sources reuse the first match. Names with no source are skipped
/// with a warning.
///
/// With an empty `order`, every source is used, sorted by lowercased name
/// (exact name breaks ties).
pub fn resolve_order<'a>(sources: &'a [DocumentSource], order: &[String]) -> ResolvedOrder<'a> {
    if order.is_empty() {
        let mut named: Vec<(String, &DocumentSource)> =
            sources.iter().map(|s| (s.name(), s)).collect();
        named.sort_by_cached_key(|(name, _)| (name.to_lowercase(), name.clone()));

        return ResolvedOrder {
            sources: named.into_iter().map(|(_, s)| s).collect(),
            skipped: Vec::new(),
        };
    }

    let mut by_name: HashMap<String, Vec<&DocumentSource>> = HashMap::new();
    for source in sources {
        by_name.entry(source.name()).or_default().push(source);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(order.len());
    let mut skipped = Vec::new();

    for name in order {
        let Some(candidates) = by_name.get(name) else {
            warn!("Skipping '{}': not among the provided files", name);
            skipped.push(SkippedEntry {
                name: name.clone(),
                reason: SkipReason::NotFound,
            });
            continue;
        };

        let occurrence = seen.entry(name.as_str()).or_insert(0);
        let source = candidates.get(*occurrence).unwrap_or(&candidates[0]);
        *occurrence += 1;
        resolved.push(*source);
    }

    ResolvedOrder {
        sources: resolved,
        skipped,
    }
}
