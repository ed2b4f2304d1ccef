use clap::{Parser, Subcommand};

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "harmonia-cli", version, about = "Harmonia progress & milestones CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a routine completion
    Record(commands::record::RecordArgs),
    /// Show daily progress records
    Progress(commands::progress::ProgressArgs),
    /// Show the derived stats snapshot
    Stats(commands::stats::StatsArgs),
    /// Evaluate the milestone catalog
    Milestones(commands::milestones::MilestonesArgs),
    /// Discard all recorded data
    Reset(commands::reset::ResetArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Record(args) => commands::record::run(args),
        Commands::Progress(args) => commands::progress::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Milestones(args) => commands::milestones::run(args),
        Commands::Reset(args) => commands::reset::run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
