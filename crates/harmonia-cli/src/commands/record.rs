use chrono::{DateTime, Utc};
use clap::Args;
use uuid::Uuid;

use crate::commands::{report_diagnostics, CategoryArg};
use crate::store::{store_path, CliConfig, EventStore, StoredEvent};
use harmonia_core::progress::CompletionEvent;

#[derive(Args)]
pub struct RecordArgs {
    /// Category of the completed routine
    #[arg(value_enum)]
    pub category: CategoryArg,
    /// Routine id; a fresh one is generated if omitted
    #[arg(long)]
    pub routine: Option<Uuid>,
    /// Client UTC offset in minutes at the time of the action
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i32>,
    /// Completion instant (RFC 3339); defaults to now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

pub fn run(args: RecordArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load();
    let path = store_path(&config)?;
    let mut store = EventStore::load(&path)?;

    let event = CompletionEvent {
        user_id: store.user_id.clone(),
        category: args.category.into(),
        occurred_at: args.at.unwrap_or_else(Utc::now),
        routine_id: args.routine.unwrap_or_else(Uuid::new_v4),
    };
    let offset_minutes = args.offset.or(config.offset_minutes);

    // Rebuild from the raw event set rather than patching counters
    let (mut ledger, diagnostics) = store.ledger();
    report_diagnostics(&diagnostics);
    let outcome = ledger.record_completion(&event, offset_minutes)?;
    if let Some(diagnostic) = &outcome.diagnostic {
        report_diagnostics(std::slice::from_ref(diagnostic));
    }

    store.events.push(StoredEvent {
        event,
        offset_minutes,
    });
    store.save(&path)?;
    println!("{}", serde_json::to_string_pretty(&outcome.record)?);
    Ok(())
}
