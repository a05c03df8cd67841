//! Role profiles and the fields they share.
//!
//! [`BasePerfil`] is never stored on its own. Each role type embeds it by
//! value, owns its own table, and links to exactly one [`Usuario`] account.
//!
//! [`Usuario`]: crate::usuario::Usuario

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── RUC ─────────────────────────────────────────────────────────────────────

static RUC_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[0-9]{11}$").expect("static RUC pattern"));

/// A Registro Único de Contribuyentes: exactly 11 ASCII digits.
///
/// Only constructible through [`Ruc::parse`], so a `Ruc` in hand is always
/// well-formed. Deserialising runs the same check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ruc(String);

impl Ruc {
  pub fn parse(value: impl Into<String>) -> Result<Self> {
    let value = value.into();
    if RUC_RE.is_match(&value) {
      Ok(Self(value))
    } else {
      Err(Error::InvalidRuc)
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for Ruc {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::parse(value) }
}

impl From<Ruc> for String {
  fn from(ruc: Ruc) -> Self { ruc.0 }
}

impl FromStr for Ruc {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl AsRef<str> for Ruc {
  fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for Ruc {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Shared fields ───────────────────────────────────────────────────────────

/// Commercial and contact data shared by every role profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePerfil {
  /// Unique within each role's table.
  pub ruc:                 Ruc,
  pub pais:                String,
  /// Department, state or region.
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

impl BasePerfil {
  /// Maximum length, in characters, of each text field.
  pub const MAX_LENGTHS: [(&'static str, usize); 10] = [
    ("pais", 100),
    ("departamento", 100),
    ("provincia", 100),
    ("direccion_comercial", 255),
    ("razon_social", 255),
    ("actividad_comercial", 255),
    ("nombre_comercial", 255),
    ("nombre_contacto", 150),
    ("telefono_movil", 20),
    ("cargo", 100),
  ];

  fn text_fields(&self) -> [&str; 10] {
    [
      self.pais.as_str(),
      self.departamento.as_str(),
      self.provincia.as_str(),
      self.direccion_comercial.as_str(),
      self.razon_social.as_str(),
      self.actividad_comercial.as_str(),
      self.nombre_comercial.as_str(),
      self.nombre_contacto.as_str(),
      self.telefono_movil.as_str(),
      self.cargo.as_str(),
    ]
  }

  /// Check the text fields before persistence. The RUC was already checked
  /// when it was parsed. Reports the first failure in declaration order.
  pub fn validate(&self) -> Result<()> {
    for (&(field, max), value) in Self::MAX_LENGTHS.iter().zip(self.text_fields())
    {
      if value.trim().is_empty() {
        return Err(Error::BlankField { field });
      }
      let len = value.chars().count();
      if len > max {
        return Err(Error::FieldTooLong { field, max, len });
      }
    }
    Ok(())
  }
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// The role a profile plays in the procurement process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
  Cliente,
  Proveedor,
}

impl Rol {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Cliente => "cliente",
      Self::Proveedor => "proveedor",
    }
  }

  /// Storage table holding this role's profiles.
  pub fn table(self) -> &'static str {
    match self {
      Self::Cliente => "clientes",
      Self::Proveedor => "proveedores",
    }
  }

  /// Name of the account's back-reference to this role's profile.
  pub fn related_name(self) -> String { format!("{}_profile", self.as_str()) }
}

impl fmt::Display for Rol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Rol {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "cliente" => Ok(Self::Cliente),
      "proveedor" => Ok(Self::Proveedor),
      other => Err(Error::UnknownRol(other.to_owned())),
    }
  }
}

// ─── Profile trait ───────────────────────────────────────────────────────────

/// A concrete role profile: shared fields plus its identity and owning
/// account.
pub trait Perfil:
  fmt::Debug + Clone + Send + Sync + Serialize + 'static
{
  const ROL: Rol;

  fn from_parts(perfil_id: Uuid, usuario_id: Uuid, datos: BasePerfil) -> Self;

  fn perfil_id(&self) -> Uuid;
  fn usuario_id(&self) -> Uuid;
  fn datos(&self) -> &BasePerfil;
}

/// Client profile. Adds nothing to [`BasePerfil`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
  pub perfil_id:  Uuid,
  pub usuario_id: Uuid,
  #[serde(flatten)]
  pub datos:      BasePerfil,
}

/// Provider profile. Adds nothing to [`BasePerfil`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proveedor {
  pub perfil_id:  Uuid,
  pub usuario_id: Uuid,
  #[serde(flatten)]
  pub datos:      BasePerfil,
}

impl Perfil for Cliente {
  const ROL: Rol = Rol::Cliente;

  fn from_parts(perfil_id: Uuid, usuario_id: Uuid, datos: BasePerfil) -> Self {
    Self { perfil_id, usuario_id, datos }
  }

  fn perfil_id(&self) -> Uuid { self.perfil_id }
  fn usuario_id(&self) -> Uuid { self.usuario_id }
  fn datos(&self) -> &BasePerfil { &self.datos }
}

impl Perfil for Proveedor {
  const ROL: Rol = Rol::Proveedor;

  fn from_parts(perfil_id: Uuid, usuario_id: Uuid, datos: BasePerfil) -> Self {
    Self { perfil_id, usuario_id, datos }
  }

  fn perfil_id(&self) -> Uuid { self.perfil_id }
  fn usuario_id(&self) -> Uuid { self.usuario_id }
  fn datos(&self) -> &BasePerfil { &self.datos }
}
