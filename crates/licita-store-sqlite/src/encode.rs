//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings and booleans as `0`/`1` integers.

use chrono::{DateTime, Utc};
use licita_core::{
  perfil::{BasePerfil, Perfil, Ruc},
  usuario::Usuario,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for a `usuarios` row, in `USUARIO_COLUMNS` order.
pub struct RawUsuario {
  pub usuario_id:    String,
  pub email:         String,
  pub password_hash: Option<String>,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub is_active:     bool,
  pub is_staff:      bool,
  pub is_superuser:  bool,
  pub last_login:    Option<String>,
}

impl RawUsuario {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      usuario_id:    row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      first_name:    row.get(3)?,
      last_name:     row.get(4)?,
      is_active:     row.get(5)?,
      is_staff:      row.get(6)?,
      is_superuser:  row.get(7)?,
      last_login:    row.get(8)?,
    })
  }

  pub fn from_usuario(u: &Usuario) -> Self {
    Self {
      usuario_id:    encode_uuid(u.usuario_id),
      email:         u.email.clone(),
      password_hash: u.password_hash.clone(),
      first_name:    u.first_name.clone(),
      last_name:     u.last_name.clone(),
      is_active:     u.is_active,
      is_staff:      u.is_staff,
      is_superuser:  u.is_superuser,
      last_login:    u.last_login.map(encode_dt),
    }
  }

  pub fn into_usuario(self) -> Result<Usuario> {
    Ok(Usuario {
      usuario_id:    decode_uuid(&self.usuario_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      first_name:    self.first_name,
      last_name:     self.last_name,
      is_active:     self.is_active,
      is_staff:      self.is_staff,
      is_superuser:  self.is_superuser,
      last_login:    self.last_login.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Column values for a profile row, in `PERFIL_COLUMNS` order. Identical for
/// every role table.
pub struct RawPerfil {
  pub perfil_id:           String,
  pub usuario_id:          String,
  pub ruc:                 String,
  pub pais:                String,
  pub departamento:        String,
  pub provincia:           String,
  pub direccion_comercial: String,
  pub razon_social:        String,
  pub actividad_comercial: String,
  pub nombre_comercial:    String,
  pub nombre_contacto:     String,
  pub telefono_movil:      String,
  pub cargo:               String,
}

impl RawPerfil {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      perfil_id:           row.get(0)?,
      usuario_id:          row.get(1)?,
      ruc:                 row.get(2)?,
      pais:                row.get(3)?,
      departamento:        row.get(4)?,
      provincia:           row.get(5)?,
      direccion_comercial: row.get(6)?,
      razon_social:        row.get(7)?,
      actividad_comercial: row.get(8)?,
      nombre_comercial:    row.get(9)?,
      nombre_contacto:     row.get(10)?,
      telefono_movil:      row.get(11)?,
      cargo:               row.get(12)?,
    })
  }

  pub fn from_perfil<P: Perfil>(p: &P) -> Self {
    let d = p.datos();
    Self {
      perfil_id:           encode_uuid(p.perfil_id()),
      usuario_id:          encode_uuid(p.usuario_id()),
      ruc:                 d.ruc.to_string(),
      pais:                d.pais.clone(),
      departamento:        d.departamento.clone(),
      provincia:           d.provincia.clone(),
      direccion_comercial: d.direccion_comercial.clone(),
      razon_social:        d.razon_social.clone(),
      actividad_comercial: d.actividad_comercial.clone(),
      nombre_comercial:    d.nombre_comercial.clone(),
      nombre_contacto:     d.nombre_contacto.clone(),
      telefono_movil:      d.telefono_movil.clone(),
      cargo:               d.cargo.clone(),
    }
  }

  pub fn into_perfil<P: Perfil>(self) -> Result<P> {
    let datos = BasePerfil {
      ruc:                 Ruc::parse(self.ruc)?,
      pais:                self.pais,
      departamento:        self.departamento,
      provincia:           self.provincia,
      direccion_comercial: self.direccion_comercial,
      razon_social:        self.razon_social,
      actividad_comercial: self.actividad_comercial,
      nombre_comercial:    self.nombre_comercial,
      nombre_contacto:     self.nombre_contacto,
      telefono_movil:      self.telefono_movil,
      cargo:               self.cargo,
    };
    Ok(P::from_parts(
      decode_uuid(&self.perfil_id)?,
      decode_uuid(&self.usuario_id)?,
      datos,
    ))
  }
}
