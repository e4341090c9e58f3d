//! Runtime server configuration.
//!
//! Layers, lowest precedence first: built-in defaults, the optional TOML file,
//! then `SILSILAH_*` environment variables (e.g. `SILSILAH_PORT=9000`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded by the binary.
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080_i64)?
      .set_default("store_path", "silsilah.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SILSILAH"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
