//! Catalog delta computation
//!
//! # Invariants under test
//!
//! 1. Identical catalogs produce an empty delta and an empty summary.
//! 2. Price and availability drift produce targeted updates, never a full
//!    replacement, and sold-out is always the negation of availability.
//! 3. Items unknown to the marketplace are sent whole.
//! 4. Remote-only items are never represented (no deletion propagation).
//! 5. Output follows canonical order, independent of remote order.

use msync_diff::*;
use msync_schemas::CatalogItem;

fn item(id: &str, name: &str, price: i64) -> CatalogItem {
    CatalogItem::new(id, "cat-1", name, "house special", price)
}

#[test]
fn scenario_identical_catalogs_yield_empty_delta() {
    let canonical = vec![item("I1", "Bulgogi", 9000), item("I2", "Bibimbap", 8000)];
    let remote = canonical.clone();

    let (delta, summary) = compute_delta(&canonical, &remote);
    assert!(delta.is_empty());
    assert!(summary.is_empty());
    assert_eq!(summary.change_count(), 0);
}

#[test]
fn scenario_price_and_availability_drift_are_targeted() {
    let canonical = vec![item("I1", "Bulgogi", 9000)];
    let remote = vec![item("I1", "Bulgogi", 8500).with_available(false)];

    let (delta, summary) = compute_delta(&canonical, &remote);

    assert!(delta.updated_items.is_empty(), "no full replacement expected");
    assert_eq!(delta.price_updates.get("I1"), Some(&9000));
    assert_eq!(delta.toggled_items.get("I1"), Some(&true));
    assert_eq!(delta.sold_out_items.get("I1"), Some(&false));

    assert_eq!(summary.price_changed, vec![PriceChange::new("I1", 8500, 9000)]);
    assert_eq!(
        summary.availability_changed,
        vec![AvailabilityChange::new("I1", false, true)]
    );
    assert!(summary.updated.is_empty());
}

#[test]
fn scenario_sold_out_is_negation_of_toggle() {
    let canonical = vec![
        item("I1", "Bulgogi", 9000).with_available(false),
        item("I2", "Bibimbap", 8000),
    ];
    let remote = vec![
        item("I1", "Bulgogi", 9000),
        item("I2", "Bibimbap", 8000).with_available(false),
    ];

    let (delta, _) = compute_delta(&canonical, &remote);
    assert_eq!(delta.toggled_items.len(), 2);
    for (id, available) in &delta.toggled_items {
        assert_eq!(delta.sold_out_items.get(id), Some(&!available));
    }
}

#[test]
fn scenario_unknown_remote_item_sent_whole() {
    let canonical = vec![item("I1", "Bulgogi", 9000), item("I9", "Japchae", 11000)];
    let remote = vec![item("I1", "Bulgogi", 9000)];

    let (delta, summary) = compute_delta(&canonical, &remote);
    assert_eq!(delta.updated_items, vec![canonical[1].clone()]);
    assert_eq!(summary.updated, vec!["I9".to_string()]);
    assert!(delta.price_updates.is_empty());
    assert!(delta.toggled_items.is_empty());
}

#[test]
fn scenario_text_drift_replaces_and_keeps_targeted_updates() {
    let canonical = vec![item("I1", "Spicy Bulgogi", 9500)];
    let remote = vec![item("I1", "Bulgogi", 9000)];

    let (delta, summary) = compute_delta(&canonical, &remote);
    assert_eq!(delta.updated_items.len(), 1);
    assert_eq!(delta.updated_items[0].name, "Spicy Bulgogi");
    assert_eq!(delta.price_updates.get("I1"), Some(&9500));
    assert_eq!(summary.updated, vec!["I1".to_string()]);
    assert_eq!(summary.price_changed.len(), 1);
}

#[test]
fn scenario_description_drift_replaces() {
    let canonical = vec![item("I1", "Bulgogi", 9000)];
    let mut stale = item("I1", "Bulgogi", 9000);
    stale.description = "old copy".to_string();

    let (delta, _) = compute_delta(&canonical, &[stale]);
    assert_eq!(delta.updated_items.len(), 1);
    assert!(delta.price_updates.is_empty());
}

#[test]
fn scenario_remote_only_items_never_deleted() {
    let canonical = vec![item("I1", "Bulgogi", 9000)];
    let remote = vec![item("I1", "Bulgogi", 9000), item("GHOST", "Old dish", 5000)];

    let (delta, summary) = compute_delta(&canonical, &remote);
    assert!(delta.is_empty());
    assert!(summary.is_empty());
    assert!(!delta.references("GHOST"));
}

#[test]
fn scenario_empty_canonical_is_empty_delta() {
    let remote = vec![item("I1", "Bulgogi", 9000)];
    let (delta, summary) = compute_delta(&[], &remote);
    assert!(delta.is_empty());
    assert!(summary.is_empty());
}

#[test]
fn scenario_output_follows_canonical_order() {
    let canonical = vec![
        item("C", "Three", 3000),
        item("A", "One", 1000),
        item("B", "Two", 2000),
    ];
    let remote_fwd = vec![item("A", "One", 1), item("B", "Two", 2)];
    let remote_rev = vec![item("B", "Two", 2), item("A", "One", 1)];

    let (d1, s1) = compute_delta(&canonical, &remote_fwd);
    let (d2, s2) = compute_delta(&canonical, &remote_rev);

    assert_eq!(d1, d2);
    assert_eq!(s1, s2);

    let ids: Vec<&str> = s1.price_changed.iter().map(|c| c.item_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(s1.updated, vec!["C".to_string()]);
}

#[test]
fn scenario_duplicate_canonical_id_first_occurrence_wins() {
    let canonical = vec![item("I1", "Bulgogi", 9500), item("I1", "Bulgogi", 7000)];
    let remote = vec![item("I1", "Bulgogi", 9000)];

    let (delta, summary) = compute_delta(&canonical, &remote);
    assert_eq!(delta.price_updates.get("I1"), Some(&9500));
    assert_eq!(summary.price_changed.len(), 1);
}

#[test]
fn scenario_summary_serializes_for_audit() {
    let canonical = vec![item("I1", "Bulgogi", 9000)];
    let remote = vec![item("I1", "Bulgogi", 8500)];
    let (_, summary) = compute_delta(&canonical, &remote);

    let v = serde_json::to_value(&summary).unwrap();
    assert_eq!(v["price_changed"][0]["item_id"], "I1");
    assert_eq!(v["price_changed"][0]["old_price"], 8500);
    assert_eq!(v["price_changed"][0]["new_price"], 9000);
    assert!(v["updated"].as_array().unwrap().is_empty());
}
