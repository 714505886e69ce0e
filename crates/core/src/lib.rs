pub mod config;
pub mod error;
pub mod identity;
pub mod parse;
pub mod slot;

pub use config::Config;
pub use error::*;
pub use identity::{identity, normalize};
pub use slot::*;
