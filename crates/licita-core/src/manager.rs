//! [`UsuarioManager`] — builds account records and attaches profiles.
//!
//! The manager centralises email normalisation, password hashing and the
//! privilege defaults. It holds no state of its own beyond a handle to the
//! store, so construct one wherever accounts are created and pass it around.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  password::{hash_password, verify_password},
  perfil::{BasePerfil, Perfil},
  store::UsuarioStore,
  usuario::{ExtraFields, Usuario},
};

/// Canonicalise an email: strip surrounding whitespace and lowercase the
/// domain part. The local part is case-sensitive and kept as is. Input
/// without an `@` is returned unchanged.
pub fn normalize_email(email: &str) -> String {
  match email.trim().rsplit_once('@') {
    Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
    None => email.to_owned(),
  }
}

/// Account factory over a [`UsuarioStore`].
pub struct UsuarioManager<S> {
  store: Arc<S>,
}

impl<S> Clone for UsuarioManager<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: UsuarioStore> UsuarioManager<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  fn hash(password: Option<&str>) -> Result<Option<String>> {
    password.map(hash_password).transpose()
  }

  // ── Account creation ──────────────────────────────────────────────────

  /// Create a regular account.
  ///
  /// A `None` password leaves the account with an unusable password.
  pub async fn create_user(
    &self,
    email: &str,
    password: Option<&str>,
    extra: ExtraFields,
  ) -> Result<Usuario> {
    if email.is_empty() {
      return Err(Error::MissingEmail);
    }
    let email = normalize_email(email);
    debug!(%email, "normalized email");

    let usuario = extra.into_usuario(email, Self::hash(password)?);
    let usuario = self
      .store
      .insert_usuario(usuario)
      .await
      .map_err(Error::store)?;

    info!(
      usuario_id = %usuario.usuario_id,
      email = %usuario.email,
      is_staff = usuario.is_staff,
      is_superuser = usuario.is_superuser,
      "usuario created"
    );
    Ok(usuario)
  }

  /// Create an administrator account. `is_staff` and `is_superuser` default
  /// to `true`; values supplied by the caller are kept.
  pub async fn create_superuser(
    &self,
    email: &str,
    password: Option<&str>,
    mut extra: ExtraFields,
  ) -> Result<Usuario> {
    extra.is_staff.get_or_insert(true);
    extra.is_superuser.get_or_insert(true);
    self.create_user(email, password, extra).await
  }

  // ── Credentials ───────────────────────────────────────────────────────

  async fn require(&self, usuario_id: Uuid) -> Result<Usuario> {
    self
      .store
      .get_usuario(usuario_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UsuarioNotFound(usuario_id))
  }

  async fn save(&self, usuario: Usuario) -> Result<Usuario> {
    let id = usuario.usuario_id;
    let found = self
      .store
      .update_usuario(usuario.clone())
      .await
      .map_err(Error::store)?;
    if !found {
      return Err(Error::UsuarioNotFound(id));
    }
    Ok(usuario)
  }

  /// Replace the account's password. `None` makes it unusable.
  pub async fn set_password(
    &self,
    usuario_id: Uuid,
    password: Option<&str>,
  ) -> Result<Usuario> {
    let mut usuario = self.require(usuario_id).await?;
    usuario.password_hash = Self::hash(password)?;
    let usuario = self.save(usuario).await?;
    info!(%usuario_id, usable = usuario.has_usable_password(), "password changed");
    Ok(usuario)
  }

  /// Check credentials. Returns the account (with `last_login` updated) only
  /// if it exists, is active, has a usable password and the password
  /// matches.
  pub async fn authenticate(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Option<Usuario>> {
    let email = normalize_email(email);
    let Some(mut usuario) = self
      .store
      .get_usuario_by_email(&email)
      .await
      .map_err(Error::store)?
    else {
      warn!(%email, "authentication failed: unknown email");
      return Ok(None);
    };

    let verified = usuario
      .password_hash
      .as_deref()
      .is_some_and(|hash| verify_password(password, hash));
    if !verified {
      warn!(%email, "authentication failed: bad credentials");
      return Ok(None);
    }
    if !usuario.is_active {
      warn!(%email, "authentication failed: inactive account");
      return Ok(None);
    }

    usuario.last_login = Some(Utc::now());
    let usuario = self.save(usuario).await?;
    info!(usuario_id = %usuario.usuario_id, "usuario logged in");
    Ok(Some(usuario))
  }

  /// Delete an account; its profiles go with it.
  pub async fn delete_usuario(&self, usuario_id: Uuid) -> Result<bool> {
    let deleted = self
      .store
      .delete_usuario(usuario_id)
      .await
      .map_err(Error::store)?;
    if deleted {
      info!(%usuario_id, "usuario deleted");
    }
    Ok(deleted)
  }

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Validate `datos` and attach it to the account as a profile of role `P`.
  pub async fn add_perfil<P: Perfil>(
    &self,
    usuario_id: Uuid,
    datos: BasePerfil,
  ) -> Result<P> {
    datos.validate()?;
    self.require(usuario_id).await?;

    let perfil = P::from_parts(Uuid::new_v4(), usuario_id, datos);
    let perfil = self
      .store
      .insert_perfil(perfil)
      .await
      .map_err(Error::store)?;

    info!(
      %usuario_id,
      rol = %P::ROL,
      ruc = %perfil.datos().ruc,
      "perfil attached"
    );
    Ok(perfil)
  }
}
