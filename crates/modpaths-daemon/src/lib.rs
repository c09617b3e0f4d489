//! modpaths Daemon
//!
//! Background process that indexes Go source roots and answers
//! import-path and directory queries over HTTP.

mod args;
mod daemon;
mod handler;
mod signals;

pub use args::Args;
pub use daemon::Daemon;
pub use handler::DaemonHandler;
