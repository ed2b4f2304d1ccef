use clap::Args;

use crate::commands::{effective_offset, report_diagnostics};
use crate::store::{store_path, CliConfig, EventStore};
use harmonia_core::calendar;
use harmonia_core::snapshot::StatsSnapshotBuilder;

#[derive(Args)]
pub struct StatsArgs {
    /// Client UTC offset in minutes; defines "today" for streaks
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i32>,
    /// Trailing window for the consistency ratio, in days
    #[arg(long, default_value_t = 30)]
    pub window: u32,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load();
    let path = store_path(&config)?;
    let store = EventStore::load(&path)?;

    let (ledger, diagnostics) = store.ledger();
    report_diagnostics(&diagnostics);

    let offset = effective_offset(args.offset, config.offset_minutes);
    let snapshot = StatsSnapshotBuilder::new(&ledger)
        .with_consistency_window(args.window)
        .build(calendar::today(offset));

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
