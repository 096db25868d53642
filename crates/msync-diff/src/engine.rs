use std::collections::{HashMap, HashSet};

use msync_schemas::{CatalogItem, UnifiedDelta};

use crate::{AvailabilityChange, DiffSummary, PriceChange};

fn push_replacement(
    item: &CatalogItem,
    delta: &mut UnifiedDelta,
    summary: &mut DiffSummary,
) {
    delta.updated_items.push(item.clone());
    summary.updated.push(item.id.clone());
}

fn compare_items(
    canonical: &CatalogItem,
    remote: &CatalogItem,
    delta: &mut UnifiedDelta,
    summary: &mut DiffSummary,
) {
    // Price
    if canonical.price != remote.price {
        delta
            .price_updates
            .insert(canonical.id.clone(), canonical.price);
        summary
            .price_changed
            .push(PriceChange::new(&canonical.id, remote.price, canonical.price));
    }

    // Availability (sold-out is its negation)
    if canonical.available != remote.available {
        delta
            .toggled_items
            .insert(canonical.id.clone(), canonical.available);
        delta
            .sold_out_items
            .insert(canonical.id.clone(), !canonical.available);
        summary.availability_changed.push(AvailabilityChange::new(
            &canonical.id,
            remote.available,
            canonical.available,
        ));
    }

    // Text drift: full replacement, on top of the targeted updates above.
    if canonical.name != remote.name || canonical.description != remote.description {
        push_replacement(canonical, delta, summary);
    }
}

/// Deterministic catalog diff, O(n + m):
/// - canonical item unknown remotely => full replacement
/// - price / availability drift => targeted updates + summary evidence
/// - name / description drift => full replacement
/// - remote-only items => not represented (no deletions)
///
/// Output order follows `canonical` order only. Ids are unique by contract;
/// if a canonical id repeats, its first occurrence is the one diffed.
pub fn compute_delta(
    canonical: &[CatalogItem],
    remote: &[CatalogItem],
) -> (UnifiedDelta, DiffSummary) {
    let remote_index: HashMap<&str, &CatalogItem> =
        remote.iter().map(|i| (i.id.as_str(), i)).collect();

    let mut delta = UnifiedDelta::default();
    let mut summary = DiffSummary::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(canonical.len());

    for item in canonical {
        if !seen.insert(item.id.as_str()) {
            continue;
        }
        match remote_index.get(item.id.as_str()) {
            None => push_replacement(item, &mut delta, &mut summary),
            Some(remote_item) => compare_items(item, remote_item, &mut delta, &mut summary),
        }
    }

    // Remote-only ids are never visited; deletions are not propagated.
    (delta, summary)
}
