//! modpaths HTTP Protocol and Client/Server
//!
//! This crate maps request paths onto index queries and provides the
//! HTTP server and client used to talk to the modpaths daemon.

mod client;
mod error;
mod protocol;
mod server;

pub use client::HttpClient;
pub use error::HttpError;
pub use protocol::*;
pub use server::{router, HttpServer, RequestHandler};
