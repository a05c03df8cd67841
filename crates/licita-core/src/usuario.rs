//! Usuario — the authentication identity.
//!
//! An account is identified by its email address; there is no separate
//! username. Role profiles attach to it one-to-one and are deleted with it.

use std::{fmt, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern")
});

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
  pub usuario_id:    Uuid,
  /// Normalized login identifier; unique across all accounts.
  pub email:         String,
  /// Argon2 PHC string. `None` marks an unusable password: the account exists
  /// but can never log in with a password.
  #[serde(skip_serializing)]
  pub password_hash: Option<String>,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub is_active:     bool,
  /// Grants access to the administrative tooling.
  pub is_staff:      bool,
  /// Holds every permission without it being granted explicitly.
  pub is_superuser:  bool,
  pub last_login:    Option<DateTime<Utc>>,
}

impl Usuario {
  /// Maximum length of an email address, in characters.
  pub const EMAIL_MAX_LENGTH: usize = 254;

  /// Check an email before it is offered to the account manager: not blank,
  /// at most [`Self::EMAIL_MAX_LENGTH`] characters, and shaped like
  /// `local@domain.tld`.
  ///
  /// `UsuarioManager::create_user` does not call this; the interactive
  /// commands do.
  pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
      return Err(Error::MissingEmail);
    }
    let len = email.chars().count();
    if len > Self::EMAIL_MAX_LENGTH {
      return Err(Error::FieldTooLong {
        field: "email",
        max: Self::EMAIL_MAX_LENGTH,
        len,
      });
    }
    if !EMAIL_RE.is_match(email) {
      return Err(Error::InvalidEmail);
    }
    Ok(())
  }

  pub fn has_usable_password(&self) -> bool { self.password_hash.is_some() }

  /// `first_name last_name`, trimmed; empty when neither is set.
  pub fn full_name(&self) -> String {
    let first = self.first_name.as_deref().unwrap_or_default();
    let last = self.last_name.as_deref().unwrap_or_default();
    format!("{first} {last}").trim().to_owned()
  }
}

impl fmt::Display for Usuario {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.email)
  }
}

/// Optional fields accepted by the account manager on top of email and
/// password. Unset flags fall back to the account defaults
/// (`is_active = true`, `is_staff = false`, `is_superuser = false`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFields {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub is_active:    Option<bool>,
  pub is_staff:     Option<bool>,
  pub is_superuser: Option<bool>,
}

impl ExtraFields {
  /// Build an unsaved [`Usuario`] from these fields.
  pub(crate) fn into_usuario(
    self,
    email: String,
    password_hash: Option<String>,
  ) -> Usuario {
    Usuario {
      usuario_id: Uuid::new_v4(),
      email,
      password_hash,
      first_name: self.first_name,
      last_name: self.last_name,
      is_active: self.is_active.unwrap_or(true),
      is_staff: self.is_staff.unwrap_or(false),
      is_superuser: self.is_superuser.unwrap_or(false),
      last_login: None,
    }
  }
}
