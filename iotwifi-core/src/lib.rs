//! Core library for the iotwifi station / access-point supervisor.
//! This crate drives `wpa_cli` and `hostapd_cli` through their textual
//! control interfaces, parses what they print into typed data, and runs the
//! network join sequence. A thin axum shell over the same capabilities lives
//! in [`web_server`].

pub mod backends;
pub mod config;
pub mod parsing;
pub mod runner;
pub mod structs;
pub mod traits;
pub mod web_server;

// Define a shared Error and Result type for the entire crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A control tool exited non-zero or could not be spawned.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Config error: {0}")]
    Config(String),

    /// The connection attempt was aborted through `cancel_connect`.
    #[error("Connection attempt cancelled")]
    Cancelled,
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;

pub use backends::wpa_cli::WpaCliBackend;
pub use config::WifiConfig;
pub use runner::ProcessRunner;
pub use structs::{
    ApStatusMap, ConfiguredNetwork, ConnectionResult, ConnectionState, NetworkCredentials,
    ScanResults, ScannedNetwork, StatusMap,
};
pub use traits::{CommandRunner, WifiControl};
