//! The watcher cycle and the wiring the `courtwatch` binary needs.

pub mod cycle;
pub mod wiring;

pub use cycle::{run_cycle, CycleError, CycleSummary};
pub use wiring::{build_formatter, build_notifier};
