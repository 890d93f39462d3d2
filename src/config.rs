//! Runtime configuration: where to listen and where the database lives.
//!
//! Every setting can come from a command-line flag or an environment
//! variable; flags win.

use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9001;

/// Database location shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Path to SQLite database file
    #[arg(long = "db", env = "CANOPY_DB_PATH")]
    pub db_path: Option<PathBuf>,
}

impl StoreConfig {
    /// The configured path, or the per-user default
    pub fn resolve(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "CANOPY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on (0 picks a free port)
    #[arg(long, env = "CANOPY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[command(flatten)]
    pub store: StoreConfig,
}

impl ServerConfig {
    /// `host:port`, suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn db_path(&self) -> PathBuf {
        self.store.resolve()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            store: StoreConfig { db_path: None },
        }
    }
}

/// Get the default database path (~/.local/share/canopy/canopy.db)
///
/// The directory is created when the store is opened, not here.
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("canopy").join("canopy.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:9001");
        assert!(config.db_path().ends_with("canopy/canopy.db"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "canopy", "--host", "0.0.0.0", "--port", "8080", "--db", "/tmp/trees.db",
        ]);
        assert_eq!(cli.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cli.server.db_path(), PathBuf::from("/tmp/trees.db"));
    }

    #[test]
    fn test_rejects_out_of_range_port() {
        let result = TestCli::try_parse_from(["canopy", "--port", "70000"]);
        assert!(result.is_err());
    }
}
