//! The `UsuarioStore` trait.
//!
//! Implemented by storage backends (e.g. `licita-store-sqlite`). The store is
//! where the persistence invariants live: unique email, unique RUC per role,
//! one profile per account per role, and profiles deleted with their account.
//! Violations surface as the backend's own error type.

use std::future::Future;

use uuid::Uuid;

use crate::{
  perfil::{Perfil, Ruc},
  usuario::Usuario,
};

/// Abstraction over an account/profile storage backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded runtimes.
pub trait UsuarioStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Persist a new account. Fails if the email is already taken.
  fn insert_usuario(
    &self,
    usuario: Usuario,
  ) -> impl Future<Output = Result<Usuario, Self::Error>> + Send + '_;

  /// Overwrite every mutable column of an existing account.
  /// Returns `false` if no account has that id.
  fn update_usuario(
    &self,
    usuario: Usuario,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_usuario(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Usuario>, Self::Error>> + Send + '_;

  /// Exact match on the stored (already normalized) email.
  fn get_usuario_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Usuario>, Self::Error>> + Send + 'a;

  /// All accounts, ordered by email.
  fn list_usuarios(
    &self,
  ) -> impl Future<Output = Result<Vec<Usuario>, Self::Error>> + Send + '_;

  /// Delete an account and, through the cascade, every profile attached to
  /// it. Returns `false` if no account has that id.
  fn delete_usuario(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Persist a role profile. Fails if the account already has a profile of
  /// this role, if the RUC is taken within the role, or if the account does
  /// not exist.
  fn insert_perfil<P: Perfil>(
    &self,
    perfil: P,
  ) -> impl Future<Output = Result<P, Self::Error>> + Send + '_;

  /// The account's profile for role `P`, if any.
  fn get_perfil<P: Perfil>(
    &self,
    usuario_id: Uuid,
  ) -> impl Future<Output = Result<Option<P>, Self::Error>> + Send + '_;

  fn get_perfil_by_ruc<'a, P: Perfil>(
    &'a self,
    ruc: &'a Ruc,
  ) -> impl Future<Output = Result<Option<P>, Self::Error>> + Send + 'a;

  /// All profiles of role `P`, ordered by RUC.
  fn list_perfiles<P: Perfil>(
    &self,
  ) -> impl Future<Output = Result<Vec<P>, Self::Error>> + Send + '_;

  /// Detach and delete the account's profile for role `P`.
  fn delete_perfil<P: Perfil>(
    &self,
    usuario_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
