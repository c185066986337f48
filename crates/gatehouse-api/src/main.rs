//! gatehouse server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `GATEHOUSE_*` environment variables, opens the SQLite store and serves the
//! API over HTTP.
//!
//! # Helpers
//!
//! Print the argon2 hash for a password read from stdin:
//!
//! ```sh
//! cargo run -p gatehouse-api --bin server -- --hash-password
//! ```
//!
//! Promote an existing account to `admin`:
//!
//! ```sh
//! cargo run -p gatehouse-api --bin server -- --grant-admin alice@example.com
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use gatehouse_api::{AppState, ServerConfig, services::accounts};
use gatehouse_auth::PasswordVault;
use gatehouse_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Gatehouse API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Give the account with this email the admin role and exit.
  #[arg(long, value_name = "EMAIL")]
  grant_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let hash = PasswordVault::new()
      .hash(&password)
      .context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GATEHOUSE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(email) = cli.grant_admin {
    let user = accounts::grant_admin(&store, &email)
      .await
      .with_context(|| format!("failed to grant admin to {email}"))?;
    println!("{} ({}) is now an admin", user.email, user.id);
    return Ok(());
  }

  let state = AppState::new(store, &server_cfg).context("invalid credential settings")?;

  let app = gatehouse_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
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
