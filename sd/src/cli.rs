//! CLI argument parsing for stagehand

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nodestore::ScheduleAction;

#[derive(Parser, Debug)]
#[command(name = "sd")]
#[command(author, version, about = "Scheduled publishing and unpublishing of content nodes", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the lightweight cron once: publish then unpublish everything due
    Cron {
        /// Suppress the cron start/completion log entries
        #[arg(long)]
        nolog: bool,
    },

    /// List node ids currently due for an action, without processing them
    Due {
        /// Action to check
        action: ScheduleAction,

        /// Reference timestamp (default: now)
        #[arg(long)]
        now: Option<i64>,
    },

    /// Show the resolved scheduling policy for a content type
    Policy {
        /// Content type name
        #[arg(required = true)]
        node_type: String,
    },
}
