//! Stagehand CLI entry point

use clap::Parser;
use colored::*;
use eyre::{Context, Result};

use stagehand::cli::{Cli, Command};
use stagehand::config::Config;
use stagehand::manager::{CronOptions, CronTrigger, SchedulerManager};
use stagehand::{NodeStorage, SqliteNodeStore};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let settings = config.settings();

    match cli.command {
        Command::Cron { nolog } => {
            let store = SqliteNodeStore::open(&config.store.db_path).context("Failed to open node store")?;
            let manager = SchedulerManager::new(Box::new(store), settings);
            manager.run_lightweight_cron(CronOptions {
                nolog,
                trigger: CronTrigger::CommandLine,
            })?;
            println!("{} cron run completed", "✓".green());
        }
        Command::Due { action, now } => {
            let store = SqliteNodeStore::open(&config.store.db_path).context("Failed to open node store")?;
            let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());
            let types = settings.enabled_types(action);
            for nid in store.due(action, now, &types)? {
                println!("{nid}");
            }
        }
        Command::Policy { node_type } => {
            let policy = settings.policy(&node_type);
            println!("{}", node_type.cyan());
            println!("  publish-enable:            {}", policy.publish_enable);
            println!("  unpublish-enable:          {}", policy.unpublish_enable);
            println!("  publish-touch:             {}", policy.publish_touch);
            println!("  publish-past-date-created: {}", policy.publish_past_date_created);
            println!("  publish-revision:          {}", policy.publish_revision);
            println!("  unpublish-revision:        {}", policy.unpublish_revision);
            println!("  require-revision-log:      {}", policy.require_revision_log);
        }
    }

    Ok(())
}
