use clap::Args;

use crate::commands::report_diagnostics;
use crate::store::{store_path, CliConfig, EventStore};

#[derive(Args)]
pub struct ProgressArgs {
    /// Only show the record for one date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<harmonia_core::LocalDate>,
}

pub fn run(args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load();
    let path = store_path(&config)?;
    let store = EventStore::load(&path)?;

    let (ledger, diagnostics) = store.ledger();
    report_diagnostics(&diagnostics);

    match args.date {
        Some(date) => match ledger.record_for(date) {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("no progress recorded on {date}"),
        },
        None => println!("{}", serde_json::to_string_pretty(&ledger.records())?),
    }
    Ok(())
}
