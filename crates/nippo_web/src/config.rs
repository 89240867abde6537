//! Runtime configuration.
//!
//! Values come from flags, then `NIPPO_*` environment variables (a `.env`
//! file is loaded first by the binary), then defaults.

use clap::Parser;
use nippo_core::{default_log_level, LogTarget};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Daily report web service.
#[derive(Debug, Clone, Parser)]
#[command(name = "nippo-web", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "NIPPO_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "NIPPO_PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database file; created and migrated on start.
    #[arg(long, env = "NIPPO_DB_PATH", default_value = "nippo.sqlite3")]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "NIPPO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "NIPPO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Resolves the log target, anchoring a relative directory at the
    /// working directory.
    pub fn log_target(&self) -> std::io::Result<LogTarget> {
        match &self.log_dir {
            None => Ok(LogTarget::Stderr),
            Some(dir) if dir.is_absolute() => Ok(LogTarget::Directory(dir.clone())),
            Some(dir) => Ok(LogTarget::Directory(std::env::current_dir()?.join(dir))),
        }
    }
}
