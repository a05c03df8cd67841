//! [`SqliteStore`] — the SQLite implementation of [`UsuarioStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use licita_core::{
  perfil::{Perfil, Ruc},
  store::UsuarioStore,
  usuario::Usuario,
};

use crate::{
  Error, Result,
  encode::{RawPerfil, RawUsuario, encode_uuid},
  schema::{PERFIL_COLUMNS, USUARIO_COLUMNS, schema},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An account store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let sql = schema();
    self
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, sorting constraint failures into
  /// [`Error::Duplicate`] / [`Error::MissingUsuario`].
  async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R>
      + Send
      + 'static,
    R: Send + 'static,
  {
    self.conn.call(f).await.map_err(Error::classify)
  }
}

// ─── UsuarioStore impl ───────────────────────────────────────────────────────

impl UsuarioStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn insert_usuario(&self, usuario: Usuario) -> Result<Usuario> {
    let raw = RawUsuario::from_usuario(&usuario);

    self
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO usuarios ({USUARIO_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
          ),
          rusqlite::params![
            raw.usuario_id,
            raw.email,
            raw.password_hash,
            raw.first_name,
            raw.last_name,
            raw.is_active,
            raw.is_staff,
            raw.is_superuser,
            raw.last_login,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(usuario)
  }

  async fn update_usuario(&self, usuario: Usuario) -> Result<bool> {
    let raw = RawUsuario::from_usuario(&usuario);

    let changed = self
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE usuarios SET
             email = ?2, password_hash = ?3, first_name = ?4, last_name = ?5,
             is_active = ?6, is_staff = ?7, is_superuser = ?8, last_login = ?9
           WHERE usuario_id = ?1",
          rusqlite::params![
            raw.usuario_id,
            raw.email,
            raw.password_hash,
            raw.first_name,
            raw.last_name,
            raw.is_active,
            raw.is_staff,
            raw.is_superuser,
            raw.last_login,
          ],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn get_usuario(&self, id: Uuid) -> Result<Option<Usuario>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUsuario> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USUARIO_COLUMNS} FROM usuarios WHERE usuario_id = ?1"),
              rusqlite::params![id_str],
              RawUsuario::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUsuario::into_usuario).transpose()
  }

  async fn get_usuario_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> Result<Option<Usuario>> {
    let email = email.to_owned();

    let raw: Option<RawUsuario> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USUARIO_COLUMNS} FROM usuarios WHERE email = ?1"),
              rusqlite::params![email],
              RawUsuario::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUsuario::into_usuario).transpose()
  }

  async fn list_usuarios(&self) -> Result<Vec<Usuario>> {
    let raws: Vec<RawUsuario> = self
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {USUARIO_COLUMNS} FROM usuarios ORDER BY email"))?;
        let rows = stmt
          .query_map([], RawUsuario::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUsuario::into_usuario).collect()
  }

  async fn delete_usuario(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM usuarios WHERE usuario_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn insert_perfil<P: Perfil>(&self, perfil: P) -> Result<P> {
    let table = P::ROL.table();
    let raw = RawPerfil::from_perfil(&perfil);

    self
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} ({PERFIL_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
          ),
          rusqlite::params![
            raw.perfil_id,
            raw.usuario_id,
            raw.ruc,
            raw.pais,
            raw.departamento,
            raw.provincia,
            raw.direccion_comercial,
            raw.razon_social,
            raw.actividad_comercial,
            raw.nombre_comercial,
            raw.nombre_contacto,
            raw.telefono_movil,
            raw.cargo,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(perfil)
  }

  async fn get_perfil<P: Perfil>(&self, usuario_id: Uuid) -> Result<Option<P>> {
    let table = P::ROL.table();
    let id_str = encode_uuid(usuario_id);

    let raw: Option<RawPerfil> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERFIL_COLUMNS} FROM {table} WHERE usuario_id = ?1"),
              rusqlite::params![id_str],
              RawPerfil::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerfil::into_perfil).transpose()
  }

  async fn get_perfil_by_ruc<'a, P: Perfil>(
    &'a self,
    ruc: &'a Ruc,
  ) -> Result<Option<P>> {
    let table = P::ROL.table();
    let ruc = ruc.to_string();

    let raw: Option<RawPerfil> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERFIL_COLUMNS} FROM {table} WHERE ruc = ?1"),
              rusqlite::params![ruc],
              RawPerfil::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerfil::into_perfil).transpose()
  }

  async fn list_perfiles<P: Perfil>(&self) -> Result<Vec<P>> {
    let table = P::ROL.table();

    let raws: Vec<RawPerfil> = self
      .call(move |conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PERFIL_COLUMNS} FROM {table} ORDER BY ruc"))?;
        let rows = stmt
          .query_map([], RawPerfil::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerfil::into_perfil).collect()
  }

  async fn delete_perfil<P: Perfil>(&self, usuario_id: Uuid) -> Result<bool> {
    let table = P::ROL.table();
    let id_str = encode_uuid(usuario_id);

    let deleted = self
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE usuario_id = ?1"),
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
