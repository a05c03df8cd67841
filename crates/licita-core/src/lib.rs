//! Core types and trait definitions for the licitaciones participant registry.
//!
//! Accounts (`Usuario`) own credentials and login flags; role profiles
//! (`Cliente`, `Proveedor`) embed the shared [`perfil::BasePerfil`] fields and
//! hang off an account one-to-one.
//!
//! This crate is free of database dependencies. Storage backends implement
//! [`store::UsuarioStore`]; [`manager::UsuarioManager`] builds records on top
//! of any of them.

pub mod error;
pub mod manager;
pub mod password;
pub mod perfil;
pub mod store;
pub mod usuario;

pub use error::{Error, Result};
