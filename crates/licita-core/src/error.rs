//! Error types for `licita-core`.

use thiserror::Error;
use uuid::Uuid;

/// Fixed, user-facing message for a RUC that fails the format check.
pub const RUC_INVALID_MESSAGE: &str =
  "El RUC debe contener exactamente 11 dígitos numéricos.";

#[derive(Debug, Error)]
pub enum Error {
  /// `create_user` was called with an empty email.
  #[error("No se encontró ningún email")]
  MissingEmail,

  #[error("{}", RUC_INVALID_MESSAGE)]
  InvalidRuc,

  #[error("Introduzca una dirección de correo electrónico válida.")]
  InvalidEmail,

  #[error("{field}: Este campo no puede estar en blanco.")]
  BlankField { field: &'static str },

  #[error(
    "{field}: Asegúrese de que este valor tenga como máximo {max} caracteres \
     (tiene {len})."
  )]
  FieldTooLong {
    field: &'static str,
    max:   usize,
    len:   usize,
  },

  #[error("unknown role: {0:?}")]
  UnknownRol(String),

  #[error("usuario not found: {0}")]
  UsuarioNotFound(Uuid),

  #[error("password hashing error: {0}")]
  PasswordHash(String),

  /// Anything raised by the storage backend, uniqueness violations included.
  /// Passed through untranslated.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
