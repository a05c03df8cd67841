//! SQL schema for the licitaciones SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use licita_core::perfil::Rol;

/// Account table DDL plus connection pragmas; idempotent.
const USUARIOS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS usuarios (
    usuario_id    TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE CHECK (email != ''),
    password_hash TEXT,              -- argon2 PHC string; NULL = unusable
    first_name    TEXT,
    last_name     TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    is_staff      INTEGER NOT NULL DEFAULT 0,
    is_superuser  INTEGER NOT NULL DEFAULT 0,
    last_login    TEXT               -- RFC 3339 UTC
);
";

/// DDL for one role's profile table. Every role gets the same columns.
fn perfil_table(rol: Rol) -> String {
  let table = rol.table();
  format!(
    "
CREATE TABLE IF NOT EXISTS {table} (
    perfil_id           TEXT PRIMARY KEY,
    usuario_id          TEXT NOT NULL UNIQUE
                          REFERENCES usuarios(usuario_id) ON DELETE CASCADE,
    ruc                 TEXT NOT NULL UNIQUE CHECK (length(ruc) = 11),
    pais                TEXT NOT NULL,
    departamento        TEXT NOT NULL,
    provincia           TEXT NOT NULL,
    direccion_comercial TEXT NOT NULL,
    razon_social        TEXT NOT NULL,
    actividad_comercial TEXT NOT NULL,
    nombre_comercial    TEXT NOT NULL,
    nombre_contacto     TEXT NOT NULL,
    telefono_movil      TEXT NOT NULL,
    cargo               TEXT NOT NULL
);
"
  )
}

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub fn schema() -> String {
  let mut sql = String::from(USUARIOS);
  for rol in [Rol::Cliente, Rol::Proveedor] {
    sql.push_str(&perfil_table(rol));
  }
  sql.push_str("\nPRAGMA user_version = 1;\n");
  sql
}

/// Column list shared by every profile `SELECT`, in [`crate::encode::RawPerfil`]
/// field order.
pub const PERFIL_COLUMNS: &str = "perfil_id, usuario_id, ruc, pais, departamento, \
  provincia, direccion_comercial, razon_social, actividad_comercial, \
  nombre_comercial, nombre_contacto, telefono_movil, cargo";

/// Column list shared by every account `SELECT`.
pub const USUARIO_COLUMNS: &str = "usuario_id, email, password_hash, first_name, \
  last_name, is_active, is_staff, is_superuser, last_login";
