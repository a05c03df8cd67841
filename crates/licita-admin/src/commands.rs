//! The management commands. Each one resolves accounts by normalized email.
//! Stdout carries only JSON results; prompts and status lines go to stderr.

use std::path::Path;

use anyhow::{Context as _, bail};
use licita_core::{
  manager::{UsuarioManager, normalize_email},
  perfil::{BasePerfil, Cliente, Perfil, Proveedor, Rol},
  store::UsuarioStore,
  usuario::{ExtraFields, Usuario},
};
use serde::Serialize;

use crate::Command;

pub async fn run<S>(manager: &UsuarioManager<S>, command: Command) -> anyhow::Result<()>
where
  S: UsuarioStore,
{
  match command {
    Command::CreateUser { email, first_name, last_name, staff, no_password } => {
      check_email(&email)?;
      let password = if no_password { None } else { Some(prompt_new_password()?) };
      let extra = ExtraFields {
        first_name,
        last_name,
        is_staff: staff.then_some(true),
        ..Default::default()
      };
      let usuario = manager
        .create_user(&email, password.as_deref(), extra)
        .await
        .context("could not create usuario")?;
      print_json(&usuario)
    }

    Command::CreateSuperuser { email, no_password } => {
      check_email(&email)?;
      let password = if no_password { None } else { Some(prompt_new_password()?) };
      let usuario = manager
        .create_superuser(&email, password.as_deref(), ExtraFields::default())
        .await
        .context("could not create superuser")?;
      print_json(&usuario)
    }

    Command::ChangePassword { email } => {
      let usuario = lookup(manager, &email).await?;
      let password = prompt_new_password()?;
      manager
        .set_password(usuario.usuario_id, Some(&password))
        .await
        .context("could not change password")?;
      eprintln!("Password changed successfully for usuario '{usuario}'");
      Ok(())
    }

    Command::DeleteUser { email } => {
      let usuario = lookup(manager, &email).await?;
      if !manager.delete_usuario(usuario.usuario_id).await? {
        bail!("usuario '{usuario}' was already deleted");
      }
      eprintln!("Deleted usuario '{usuario}' and its profiles");
      Ok(())
    }

    Command::ListUsers => {
      let usuarios = manager
        .store()
        .list_usuarios()
        .await
        .map_err(anyhow::Error::new)?;
      print_json(&usuarios)
    }

    Command::AddPerfil { email, rol, file } => {
      let usuario = lookup(manager, &email).await?;
      let datos = read_perfil(&file)?;
      match rol {
        Rol::Cliente => {
          print_json(&manager.add_perfil::<Cliente>(usuario.usuario_id, datos).await?)
        }
        Rol::Proveedor => {
          print_json(&manager.add_perfil::<Proveedor>(usuario.usuario_id, datos).await?)
        }
      }
    }

    Command::ShowPerfil { email, rol } => {
      let usuario = lookup(manager, &email).await?;
      match rol {
        Rol::Cliente => show::<Cliente, S>(manager, &usuario).await,
        Rol::Proveedor => show::<Proveedor, S>(manager, &usuario).await,
      }
    }
  }
}

/// Reject a malformed address before any password is asked for.
fn check_email(email: &str) -> anyhow::Result<()> {
  Usuario::validate_email(&normalize_email(email))
    .with_context(|| format!("invalid email {email:?}"))
}

async fn lookup<S: UsuarioStore>(
  manager: &UsuarioManager<S>,
  email: &str,
) -> anyhow::Result<Usuario> {
  let email = normalize_email(email);
  manager
    .store()
    .get_usuario_by_email(&email)
    .await
    .map_err(anyhow::Error::new)?
    .with_context(|| format!("no usuario with email {email:?}"))
}

async fn show<P: Perfil, S: UsuarioStore>(
  manager: &UsuarioManager<S>,
  usuario: &Usuario,
) -> anyhow::Result<()> {
  let perfil = manager
    .store()
    .get_perfil::<P>(usuario.usuario_id)
    .await
    .map_err(anyhow::Error::new)?
    .with_context(|| format!("usuario '{usuario}' has no {} profile", P::ROL))?;
  print_json(&perfil)
}

fn read_perfil(path: &Path) -> anyhow::Result<BasePerfil> {
  let text = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {path:?}"))?;
  serde_json::from_str(&text).with_context(|| format!("invalid perfil in {path:?}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Ask for a password twice; both entries must match.
fn prompt_new_password() -> anyhow::Result<String> {
  let first = read_line("Password: ")?;
  let second = read_line("Password (again): ")?;
  if first != second {
    bail!("passwords do not match");
  }
  if first.is_empty() {
    bail!("blank passwords are not allowed; use --no-password instead");
  }
  Ok(first)
}

/// Prompt on stderr and read one line from stdin (no echo suppression).
fn read_line(prompt: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  eprint!("{prompt}");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
