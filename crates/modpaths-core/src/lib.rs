//! modpaths Core Components
//!
//! Configuration shared by the modpaths daemon and its tooling.

mod config;
mod error;

pub use config::ServerConfig;
pub use error::ConfigError;
