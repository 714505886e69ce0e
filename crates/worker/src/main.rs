mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing::{error, info, warn};

use courtwatch_core::{Config, SlotIdentity};
use courtwatch_notify::Dispatcher;
use courtwatch_rules::{load_rules, PreferenceRule};
use courtwatch_source::SlotSource;
use courtwatch_storage::{open_store, NotificationStore, RecordFilter, StoreHandle};
use courtwatch_worker::{build_formatter, build_notifier, run_cycle, CycleSummary};

use crate::cli::{CliArgs, Command, ListArgs};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    courtwatch_core::config::load_dotenv();
    let args = CliArgs::parse();

    let mut config = Config::from_env();
    if let Some(rules) = &args.rules {
        config.rules.rules_file = rules.clone();
    }
    if let Some(source) = &args.source {
        config.source.location = source.clone();
    }
    if let Command::Run { interval: Some(secs) } = &args.command {
        config.poll.interval_secs = *secs;
    }
    config.log_summary();

    match args.command {
        Command::Run { .. } => run_loop(&config).await,
        Command::Once => {
            let watcher = Watcher::build(&config)?;
            let store = open(&config).await?;
            let summary = watcher.cycle(store.as_ref()).await?;
            println!("{summary}");
            Ok(())
        }
        Command::Status => status(open(&config).await?.as_ref()).await,
        Command::List(list) => list_records(open(&config).await?.as_ref(), &list).await,
        Command::MarkViewed { identity, all } => {
            let store = open(&config).await?;
            if all {
                let changed = store.mark_all_viewed().await?;
                println!("marked {changed} record(s) viewed");
            } else if let Some(identity) = identity {
                if store.mark_viewed(&SlotIdentity::from_raw(identity.clone())).await? {
                    println!("marked {identity} viewed");
                } else {
                    println!("no record for {identity}");
                }
            }
            Ok(())
        }
        Command::Purge { days } => {
            let store = open(&config).await?;
            let days = days.unwrap_or(config.store.retention_days);
            let deleted = store.purge_older_than(days).await?;
            println!("deleted {deleted} record(s) older than {days} day(s)");
            Ok(())
        }
    }
}

/// One-shot commands fail fast when the store is down.
async fn open(config: &Config) -> Result<Arc<dyn NotificationStore>> {
    open_store(&config.store)
        .await
        .context("failed to open notification store")
}

/// Everything a cycle needs besides the store.
struct Watcher {
    rules: Vec<PreferenceRule>,
    source: Box<dyn SlotSource>,
    dispatcher: Dispatcher,
    sender: courtwatch_notify::FanoutNotifier,
}

impl Watcher {
    fn build(config: &Config) -> Result<Self> {
        let rules = load_rules(&config.rules.rules_file).with_context(|| {
            format!("failed to load rules from {}", config.rules.rules_file.display())
        })?;
        info!(rules = rules.len(), "preference rules loaded");

        Ok(Self {
            rules,
            source: courtwatch_source::from_config(&config.source)
                .context("failed to set up slot source")?,
            dispatcher: Dispatcher::new(
                build_formatter(&config.notify).context("invalid notification template")?,
            ),
            sender: build_notifier(&config.notify).context("failed to set up notifiers")?,
        })
    }

    async fn cycle(&self, store: &dyn NotificationStore) -> Result<CycleSummary> {
        let summary = run_cycle(
            &self.rules,
            self.source.as_ref(),
            store,
            &self.dispatcher,
            &self.sender,
            Local::now().naive_local(),
        )
        .await?;
        Ok(summary)
    }
}

async fn run_loop(config: &Config) -> Result<()> {
    let watcher = Watcher::build(config)?;
    let mut store = StoreHandle::new(config.store.clone());
    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll.interval_secs.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!(interval_secs = config.poll.interval_secs, "watcher started");
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                return Ok(());
            }
        }

        let outcome = match store.get().await {
            Ok(store) => watcher.cycle(store.as_ref()).await,
            Err(e) => Err(anyhow::Error::new(e).context("failed to open notification store")),
        };
        match outcome {
            Ok(summary) => info!(%summary, "cycle complete"),
            Err(e) => error!(error = %format!("{e:#}"), "cycle aborted"),
        }
    }
}

async fn status(store: &dyn NotificationStore) -> Result<()> {
    let reachable = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "store ping failed");
            false
        }
    };
    let stats = store.stats().await?;
    println!("backend:   {} ({})", stats.backend, if reachable { "reachable" } else { "unreachable" });
    println!("total:     {}", stats.total);
    println!("viewed:    {}", stats.viewed);
    println!("unviewed:  {}", stats.unviewed);
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!("oldest:    {}", oldest.to_rfc3339());
        println!("newest:    {}", newest.to_rfc3339());
    }

    let sample = store.list(&RecordFilter::all()).await?;
    for record in sample.iter().take(5) {
        println!("  {} (viewed: {})", record.identity, record.viewed);
    }
    Ok(())
}

async fn list_records(store: &dyn NotificationStore, args: &ListArgs) -> Result<()> {
    let mut filter = match (args.unviewed, args.viewed) {
        (true, _) => RecordFilter::unviewed(),
        (_, true) => RecordFilter::viewed(),
        _ => RecordFilter::all(),
    };
    if let Some(days) = args.older_than_days {
        filter = filter.older_than_days(days, Utc::now());
    }

    let records = store.list(&filter).await?;
    for record in &records {
        if args.json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!(
                "{}  {}  {} {} ({} min){}",
                record.notified_at.format("%Y-%m-%d %H:%M"),
                record.court,
                record.date,
                record.time.format("%H:%M"),
                record.duration,
                if record.viewed { "  [viewed]" } else { "" }
            );
        }
    }
    info!(count = records.len(), "records listed");
    Ok(())
}
