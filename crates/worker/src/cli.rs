use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Watches court booking pages and notifies once per newly available slot.
#[derive(Parser, Debug)]
#[command(name = "courtwatch", version, about)]
pub struct CliArgs {
    /// Preference rules file (YAML, court name → rule)
    #[arg(long, global = true, env = "RULES_FILE")]
    pub rules: Option<PathBuf>,

    /// Slot source: `file:<path>` or an http(s) remote browser endpoint
    #[arg(long, global = true, env = "SLOTS_SOURCE")]
    pub source: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll forever, one cycle per interval. Ctrl-C stops between cycles.
    Run {
        /// Seconds between cycles
        #[arg(long, env = "POLL_INTERVAL_SECS")]
        interval: Option<u64>,
    },
    /// Run a single cycle and print its summary
    Once,
    /// Print notification store statistics
    Status,
    /// List notification records
    List(ListArgs),
    /// Mark a notified slot (or all of them) as viewed
    MarkViewed {
        /// Slot identity, e.g. `riverside:2026-10-17T18:00:60`
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        identity: Option<String>,

        #[arg(long)]
        all: bool,
    },
    /// Delete records older than the retention window
    Purge {
        /// Age threshold in days (defaults to RETENTION_DAYS)
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only records not yet viewed
    #[arg(long, conflicts_with = "viewed")]
    pub unviewed: bool,

    /// Only records already viewed
    #[arg(long)]
    pub viewed: bool,

    /// Only records notified more than N days ago
    #[arg(long)]
    pub older_than_days: Option<u32>,

    /// Print records as JSON lines
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mark_viewed_forms() {
        let args = CliArgs::try_parse_from(["courtwatch", "mark-viewed", "riverside:2026-10-17T18:00:60"]).unwrap();
        assert!(matches!(args.command, Command::MarkViewed { identity: Some(_), all: false }));

        let args = CliArgs::try_parse_from(["courtwatch", "mark-viewed", "--all"]).unwrap();
        assert!(matches!(args.command, Command::MarkViewed { identity: None, all: true }));

        assert!(CliArgs::try_parse_from(["courtwatch", "mark-viewed"]).is_err());
    }

    #[test]
    fn list_filters_are_exclusive() {
        assert!(CliArgs::try_parse_from(["courtwatch", "list", "--viewed", "--unviewed"]).is_err());
        let args = CliArgs::try_parse_from(["courtwatch", "list", "--unviewed", "--older-than-days", "3"]).unwrap();
        match args.command {
            Command::List(list) => {
                assert!(list.unviewed);
                assert_eq!(list.older_than_days, Some(3));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }
}
