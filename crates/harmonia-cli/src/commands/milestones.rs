use std::path::PathBuf;

use chrono::Utc;
use clap::Args;

use crate::commands::{effective_offset, report_diagnostics};
use crate::store::{store_path, CliConfig, EventStore};
use harmonia_core::calendar;
use harmonia_core::milestones::{self, MilestoneStatus};
use harmonia_core::snapshot::StatsSnapshotBuilder;

#[derive(Args)]
pub struct MilestonesArgs {
    /// Client UTC offset in minutes; defines "today" for streaks
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i32>,
    /// Evaluate a custom catalog (JSON) instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Only show achieved milestones
    #[arg(long)]
    pub achieved: bool,
}

pub fn run(args: MilestonesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load();
    let path = store_path(&config)?;
    let mut store = EventStore::load(&path)?;

    let (ledger, diagnostics) = store.ledger();
    report_diagnostics(&diagnostics);

    let catalog = match &args.catalog {
        Some(catalog_path) => {
            milestones::catalog_from_json(&std::fs::read_to_string(catalog_path)?)?
        }
        None => milestones::builtin_catalog(),
    };

    let offset = effective_offset(args.offset, config.offset_minutes);
    let snapshot = StatsSnapshotBuilder::new(&ledger).build(calendar::today(offset));

    let report = milestones::evaluate(&catalog, &snapshot, &mut store.achievements, Utc::now());
    report_diagnostics(&report.diagnostics);

    // Persist any newly stamped first crossings
    store.save(&path)?;

    let summaries: Vec<_> = report
        .summaries
        .iter()
        .filter(|summary| !args.achieved || summary.status == MilestoneStatus::Achieved)
        .collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
