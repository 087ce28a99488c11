use clap::{Parser, Subcommand};

use dosetick_core::DayOfWeek;

#[derive(Debug, Parser)]
#[command(name = "dosetick", about = "Personal medication dose reminders")]
pub struct Cli {
    /// Config file path (defaults to ~/.dosetick/dosetick.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a medication to the list.
    Add {
        /// Display name.
        name: String,
        /// Scheduled time of day, HH:MM 24-hour.
        time: String,
        /// Restrict to weekdays (comma-separated: mon,tue,…). Every day
        /// when omitted.
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<DayOfWeek>>,
    },
    /// List all medications.
    List,
    /// Remove a medication by id.
    Remove {
        id: String,
    },
    /// Record a dose as taken right now, without running the loop.
    Take {
        id: String,
    },
    /// Run the reminder loop (the default when no subcommand is given).
    Run,
}
