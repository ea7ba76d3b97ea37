//! CLI argument parsing for nodestore

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::node::{NodeId, ScheduleAction};

#[derive(Parser, Debug)]
#[command(name = "nodestore")]
#[command(author, version, about = "Revisioned multi-language content node store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert a new node (or a new translation of an existing node)
    Add {
        /// Content type of the node
        #[arg(long = "type")]
        node_type: String,

        /// Title of the variant
        #[arg(required = true)]
        title: String,

        /// Language code (default from config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Attach to an existing node id as a translation
        #[arg(long)]
        nid: Option<NodeId>,

        /// Epoch seconds at which to publish
        #[arg(long)]
        publish_on: Option<i64>,

        /// Epoch seconds at which to unpublish
        #[arg(long)]
        unpublish_on: Option<i64>,
    },

    /// Show the current revision of a node
    Show {
        /// Node id
        #[arg(required = true)]
        nid: NodeId,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List all nodes
    List,

    /// List node ids due for an action
    Due {
        /// Action to check
        action: ScheduleAction,

        /// Reference timestamp (default: now)
        #[arg(long)]
        now: Option<i64>,

        /// Content types to include
        #[arg(long, required = true, value_delimiter = ',')]
        types: Vec<String>,
    },

    /// List revision ids of a node
    Revisions {
        /// Node id
        #[arg(required = true)]
        nid: NodeId,
    },
}
