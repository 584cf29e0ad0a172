//! Configuration Module
//!
//! Command-line arguments and environment-driven settings.

use std::env;

use clap::Parser;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "cache_proxy", about = "Caching HTTP forward proxy")]
pub struct Cli {
    /// TCP port to accept client connections on
    pub port: u16,
}

/// Server configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Proxy listen port
    pub port: u16,
    /// Admin API port; the admin API is disabled when None
    pub admin_port: Option<u16>,
}

impl Config {
    /// Builds the configuration from parsed arguments and the environment.
    ///
    /// # Environment Variables
    /// - `PROXY_ADMIN_PORT` - Admin API port (default: disabled)
    pub fn from_env(cli: &Cli) -> Self {
        Self {
            port: cli.port,
            admin_port: env::var("PROXY_ADMIN_PORT")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}
