//! Court preference rules and the slot matcher.
//!
//! This crate provides:
//! - `PreferenceRule` schema with YAML deserialization
//! - Rule-file loader with validation
//! - Slot matcher filtering raw scraped slots against a rule

pub mod error;
pub mod loader;
pub mod matcher;
pub mod schema;

pub use error::{Result, RuleError};
pub use loader::{load_rules, parse_rules};
pub use matcher::{evaluate, match_report, match_slots, MatchReport, Rejection};
pub use schema::{BookingTimes, PreferenceRule};
