//! Runtime configuration, resolved from CLI flags with environment fallbacks.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::db::Database;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";
pub const DEFAULT_STEP_MS: u64 = 800;

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Port for HTTP API
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Duration of each simulated automation task, in milliseconds
    #[arg(long = "step-ms", env = "PMKIT_SIMULATION_STEP_MS", default_value_t = DEFAULT_STEP_MS)]
    pub step_ms: u64,
}

#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseArgs {
    /// SQLite database path (defaults to the platform data directory)
    #[arg(long = "db", env = "PMKIT_DB")]
    pub path: Option<PathBuf>,
}

impl DatabaseArgs {
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Database::default_path(),
        }
    }

    /// Opens the database and brings its schema up to date.
    pub fn open(&self) -> Result<Database> {
        let path = self.resolve()?;
        tracing::debug!(path = %path.display(), "Using database");
        let db = Database::open(&path)?;
        db.migrate()?;
        Ok(db)
    }
}

#[derive(Debug, Clone, Args)]
pub struct RemoteArgs {
    /// Base URL of a running pmkit server
    #[arg(long, env = "PMKIT_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Email of the acting user
    #[arg(long, env = "PMKIT_USER_EMAIL")]
    pub email: Option<String>,
}

/// Settings the HTTP server needs once the CLI has been parsed.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub simulation_step: Duration,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            simulation_step: Duration::from_millis(DEFAULT_STEP_MS),
        }
    }
}

impl From<&ServeArgs> for ServerConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            bind: args.bind.clone(),
            port: args.port,
            simulation_step: Duration::from_millis(args.step_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_follows_serve_args() {
        let args = ServeArgs {
            port: 8080,
            bind: "0.0.0.0".into(),
            database: DatabaseArgs::default(),
            step_ms: 25,
        };
        let config = ServerConfig::from(&args);
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.simulation_step, Duration::from_millis(25));
    }

    #[test]
    fn explicit_database_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("pmkit.db");
        let args = DatabaseArgs {
            path: Some(path.clone()),
        };
        assert_eq!(args.resolve().unwrap(), path);

        let db = args.open().unwrap();
        assert!(db.list_cohorts(uuid::Uuid::new_v4()).unwrap().is_empty());
        assert!(path.exists());
    }
}
