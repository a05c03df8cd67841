//! Error type for `licita-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] licita_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A UNIQUE constraint rejected the write. Carries the `table.column`
  /// reported by SQLite, e.g. `usuarios.email` or `clientes.ruc`.
  #[error("duplicate value for {0}")]
  Duplicate(String),

  /// A profile referenced an account that does not exist.
  #[error("referenced usuario does not exist")]
  MissingUsuario,

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Sort a raw database error into the constraint variants where possible.
  pub(crate) fn classify(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      code,
      Some(msg),
    )) = &err
      && code.code == rusqlite::ErrorCode::ConstraintViolation
    {
      if let Some(target) = msg.strip_prefix("UNIQUE constraint failed: ") {
        return Self::Duplicate(target.to_owned());
      }
      if msg.starts_with("FOREIGN KEY constraint failed") {
        return Self::MissingUsuario;
      }
    }
    Self::Database(err)
  }

  /// `true` for uniqueness violations.
  pub fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
