//! `licita` — management commands for the licitaciones account store.
//!
//! Reads `licita.toml` (or the path given with `--config`), opens the SQLite
//! store it names and runs one command against it.
//!
//! ```text
//! licita createsuperuser --email admin@empresa.pe
//! licita addperfil --email ana@empresa.pe --rol cliente --file perfil.json
//! ```

mod commands;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use licita_core::{manager::UsuarioManager, perfil::Rol};
use licita_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::AdminConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Licitaciones account administration")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "licita.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create a regular account; the password is read from stdin.
  #[command(name = "createuser")]
  CreateUser {
    #[arg(long)]
    email:       String,
    #[arg(long)]
    first_name:  Option<String>,
    #[arg(long)]
    last_name:   Option<String>,
    /// Grant staff status.
    #[arg(long)]
    staff:       bool,
    /// Leave the account with an unusable password.
    #[arg(long)]
    no_password: bool,
  },

  /// Create an account with staff and superuser status.
  #[command(name = "createsuperuser")]
  CreateSuperuser {
    #[arg(long)]
    email:       String,
    #[arg(long)]
    no_password: bool,
  },

  /// Replace an account's password.
  #[command(name = "changepassword")]
  ChangePassword {
    #[arg(long)]
    email: String,
  },

  /// Delete an account together with its profiles.
  #[command(name = "deleteuser")]
  DeleteUser {
    #[arg(long)]
    email: String,
  },

  /// Print every account as JSON.
  #[command(name = "listusers")]
  ListUsers,

  /// Attach a role profile read from a JSON file.
  #[command(name = "addperfil")]
  AddPerfil {
    #[arg(long)]
    email: String,
    /// `cliente` or `proveedor`.
    #[arg(long)]
    rol:   Rol,
    #[arg(long)]
    file:  PathBuf,
  },

  /// Print an account's role profile as JSON.
  #[command(name = "showperfil")]
  ShowPerfil {
    #[arg(long)]
    email: String,
    #[arg(long)]
    rol:   Rol,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries command output.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let cfg = AdminConfig::load(&cli.config)?;
  let store_path = cfg.resolved_store_path();

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(?store_path, "store opened");

  let manager = UsuarioManager::new(Arc::new(store));
  commands::run(&manager, cli.command).await
}
