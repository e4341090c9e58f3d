//! silsilah server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the profile forms over HTTP.
//!
//! # Creating a login
//!
//! Placeholder relatives are created through the forms; people who log in
//! are created from the command line:
//!
//! ```
//! cargo run -p silsilah-web --bin server -- add-user --username budi --nickname Budi --gender male
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use silsilah_core::{
  store::FamilyStore,
  user::{Gender, NewUser},
};
use silsilah_store_sqlite::SqliteStore;
use silsilah_web::{AppState, ServerConfig, auth::hash_password};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Silsilah family graph server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve HTTP (the default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Create a user who can log in; the password is read from stdin.
  AddUser {
    #[arg(long)]
    username: String,
    #[arg(long)]
    nickname: String,
    #[arg(long, value_enum)]
    gender:   GenderArg,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
  Male,
  Female,
}

impl From<GenderArg> for Gender {
  fn from(g: GenderArg) -> Self {
    match g {
      GenderArg::Male => Gender::Male,
      GenderArg::Female => Gender::Female,
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Serve) {
    Command::HashPassword => {
      let password = read_password()?;
      println!("{}", hash(&password)?);
      Ok(())
    }
    Command::AddUser { username, nickname, gender } => {
      let server_cfg = load_config(&cli.config)?;
      let store = open_store(&server_cfg).await?;
      let password = read_password()?;
      let user = store
        .register_user(NewUser::with_login(nickname, gender.into(), username, hash(&password)?))
        .await
        .context("failed to create user")?;
      tracing::info!(user_id = user.id, "user created");
      println!("{}", user.id);
      Ok(())
    }
    Command::Serve => serve(&cli.config).await,
  }
}

async fn serve(config_path: &Path) -> anyhow::Result<()> {
  let server_cfg = load_config(config_path)?;
  let store = open_store(&server_cfg).await?;

  let state = AppState { store: Arc::new(store) };
  let app = silsilah_web::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  ServerConfig::load(path).context("failed to load configuration")
}

async fn open_store(server_cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))
}

fn hash(password: &str) -> anyhow::Result<String> {
  hash_password(password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\n', '\r']).to_string();
  anyhow::ensure!(!password.is_empty(), "password must not be empty");
  Ok(password)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
