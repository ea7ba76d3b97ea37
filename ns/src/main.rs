use clap::Parser;
use colored::*;
use eyre::{Context, Result};

use nodestore::cli::{Cli, Command, OutputFormat};
use nodestore::config::Config;
use nodestore::{NodeStorage, NodeVariant, SqliteNodeStore};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store = SqliteNodeStore::open(&config.db_path).context("Failed to open node store")?;

    match cli.command {
        Command::Add {
            node_type,
            title,
            lang,
            nid,
            publish_on,
            unpublish_on,
        } => {
            let langcode = lang.unwrap_or(config.default_langcode);
            let now = chrono::Utc::now().timestamp();
            let mut variant = NodeVariant::new(node_type, title, langcode, now);
            variant.nid = nid.unwrap_or(0);
            variant.publish_on = publish_on;
            variant.unpublish_on = unpublish_on;
            let nid = store.insert(&variant)?;
            println!("{} Added node: {}", "✓".green(), nid.to_string().cyan());
        }
        Command::Show { nid, format } => {
            let Some(node) = store.load(nid)? else {
                eyre::bail!("node {nid} not found");
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&node)?),
                OutputFormat::Text => {
                    println!(
                        "node {} ({}) revision {}",
                        node.nid.to_string().cyan(),
                        node.node_type,
                        node.vid
                    );
                    for v in &node.variants {
                        let state = if v.status { "published".green() } else { "unpublished".dimmed() };
                        println!(
                            "  [{}] {} - {} (publish_on: {:?}, unpublish_on: {:?})",
                            v.langcode.yellow(),
                            v.title,
                            state,
                            v.publish_on,
                            v.unpublish_on
                        );
                    }
                }
            }
        }
        Command::List => {
            for nid in store.node_ids()? {
                if let Some(node) = store.load(nid)? {
                    println!(
                        "{} {} ({} variants)",
                        node.nid.to_string().cyan(),
                        node.node_type,
                        node.variants.len()
                    );
                }
            }
        }
        Command::Due { action, now, types } => {
            let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());
            for nid in store.due(action, now, &types)? {
                println!("{nid}");
            }
        }
        Command::Revisions { nid } => {
            for vid in store.revision_ids(nid)? {
                println!("{vid}");
            }
        }
    }

    Ok(())
}
