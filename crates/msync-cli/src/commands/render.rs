//! Console rendering of outcomes, `key=value` per line.

use msync_errors::ErrorDescriptor;
use msync_orchestrator::{CommandOutcome, SyncOutcome};
use msync_schemas::ApplyResult;

fn status(result: &ApplyResult, blocked: bool, cancelled: bool) -> &'static str {
    if result.success {
        "APPLIED"
    } else if cancelled {
        "CANCELLED"
    } else if blocked {
        "BLOCKED"
    } else if result.is_partial() {
        "PARTIAL"
    } else {
        "FAILED"
    }
}

fn print_descriptor(d: &ErrorDescriptor) {
    println!("  code={} severity={} recovery={}", d.code, d.severity, d.recovery);
    println!("  hint={}", d.user_hint);
}

pub fn print_sync_outcome(o: &SyncOutcome) {
    println!(
        "marketplace={} shop_id={} status={} message={:?}",
        o.marketplace,
        o.shop_id,
        status(&o.result, !o.validation_issues.is_empty(), o.is_cancelled()),
        o.result.message
    );

    for id in &o.summary.updated {
        println!("  updated={id}");
    }
    for c in &o.summary.price_changed {
        println!("  price item={} {} -> {}", c.item_id, c.old_price, c.new_price);
    }
    for c in &o.summary.availability_changed {
        let state = if c.new_available { "available" } else { "sold_out" };
        println!("  availability item={} -> {state}", c.item_id);
    }

    if o.validation_issues.is_empty() {
        for e in &o.result.errors {
            println!("  error={e}");
        }
    } else {
        for issue in &o.validation_issues {
            println!("  issue={issue}");
        }
    }

    if let Some(d) = o.descriptor() {
        print_descriptor(d);
    }
}

pub fn print_command_outcome(o: &CommandOutcome) {
    println!(
        "marketplace={} shop_id={} status={} message={:?}",
        o.marketplace,
        o.shop_id,
        status(&o.result, false, o.is_cancelled()),
        o.result.message
    );
    for e in &o.result.errors {
        println!("  error={e}");
    }
    if let Some(d) = o.descriptor() {
        print_descriptor(d);
    }
}
