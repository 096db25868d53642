//! `msync sync`, `msync pause`, `msync hours`.

use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use msync_schemas::{HoursCommand, OperatingHours, PauseCommand};

use super::render::{print_command_outcome, print_sync_outcome};
use super::{bootstrap, load_config, read_store_document, ConfigArgs};

pub fn run_sync(args: &ConfigArgs) -> Result<()> {
    let cfg = load_config(args)?;
    let document = read_store_document(&cfg)?;
    let mut orch = bootstrap(&cfg, &document)?;

    let outcomes = orch.sync_store(&document.store, &document.items, &cfg.console.actor)?;
    for o in &outcomes {
        print_sync_outcome(o);
    }

    let applied = outcomes.iter().filter(|o| o.applied).count();
    println!("store_id={} applied={} total={}", document.store.id, applied, outcomes.len());
    Ok(())
}

pub fn run_pause(
    args: &ConfigArgs,
    paused: bool,
    reason: Option<String>,
    until: Option<DateTime<Utc>>,
) -> Result<()> {
    let cfg = load_config(args)?;
    let document = read_store_document(&cfg)?;
    let mut orch = bootstrap(&cfg, &document)?;

    let command = PauseCommand {
        store_id: document.store.id.clone(),
        paused,
        reason,
        until,
    };
    let outcomes = orch.toggle_pause(&document.store, &command, &cfg.console.actor)?;
    for o in &outcomes {
        print_command_outcome(o);
    }
    println!("store_id={} paused={}", document.store.id, paused);
    Ok(())
}

pub fn run_hours(args: &ConfigArgs, open: NaiveTime, close: NaiveTime) -> Result<()> {
    let cfg = load_config(args)?;
    let document = read_store_document(&cfg)?;
    let mut orch = bootstrap(&cfg, &document)?;

    let command = HoursCommand {
        store_id: document.store.id.clone(),
        hours: OperatingHours::every_day(&document.store.id, open, close),
    };
    let outcomes = orch.update_hours(&document.store, &command, &cfg.console.actor)?;
    for o in &outcomes {
        print_command_outcome(o);
    }
    println!(
        "store_id={} open={} close={}",
        document.store.id,
        open.format("%H:%M"),
        close.format("%H:%M")
    );
    Ok(())
}
