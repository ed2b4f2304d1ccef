use clap::Args;

use crate::store::{store_path, CliConfig, EventStore};

#[derive(Args)]
pub struct ResetArgs {
    /// Skip the safety flag check and wipe immediately
    #[arg(long)]
    pub yes: bool,
}

/// Full data reset: discard all events and achievement stamps. The
/// engine has no reset path of its own; an empty event set simply
/// re-derives empty aggregates.
pub fn run(args: ResetArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes {
        return Err("refusing to wipe data without --yes".into());
    }

    let config = CliConfig::load();
    let path = store_path(&config)?;
    let store = EventStore::load(&path)?;
    let removed = store.events.len();

    EventStore {
        user_id: store.user_id,
        ..EventStore::default()
    }
    .save(&path)?;

    println!("removed {removed} events and all achievement stamps");
    Ok(())
}
