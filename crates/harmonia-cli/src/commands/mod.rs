//! CLI command implementations.

pub mod milestones;
pub mod progress;
pub mod record;
pub mod reset;
pub mod stats;

use clap::ValueEnum;

use harmonia_core::calendar::UtcOffset;
use harmonia_core::progress::Category;
use harmonia_core::Diagnostic;

/// Category argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Mind,
    Body,
    Soul,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Mind => Category::Mind,
            CategoryArg::Body => Category::Body,
            CategoryArg::Soul => Category::Soul,
        }
    }
}

/// Pick the offset for date resolution: `--offset` wins, then the
/// config value. Falls back to UTC with a warning when neither is a
/// valid offset -- never a silent server-side default.
pub fn effective_offset(cli: Option<i32>, config: Option<i32>) -> UtcOffset {
    let raw = cli.or(config);
    match raw.and_then(UtcOffset::from_minutes) {
        Some(offset) => offset,
        None => {
            if let Some(minutes) = raw {
                eprintln!("warning: offset {minutes} out of range, using UTC");
            } else {
                eprintln!("warning: no UTC offset configured, using UTC");
            }
            UtcOffset::UTC
        }
    }
}

/// Print engine diagnostics to stderr.
pub fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("[{}] {}", diagnostic.code, diagnostic.message);
    }
}
