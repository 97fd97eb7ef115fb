//! Configuration for jobstamp: environment switches and `jobstamp.toml`.
//!
//! Process-wide switches are read once into a [`Switches`] value at the
//! engine boundary. The optional configuration file supplies defaults for
//! the cache directory and stamp method, and may turn switches on as well.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod switches;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use switches::Switches;
pub use types::*;
