//! Integration tests for `SqliteStore` and `UsuarioManager` against an
//! in-memory database.

use std::sync::Arc;

use licita_core::{
  manager::UsuarioManager,
  perfil::{BasePerfil, Cliente, Perfil, Proveedor, Ruc},
  store::UsuarioStore,
  usuario::ExtraFields,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn manager() -> UsuarioManager<SqliteStore> {
  UsuarioManager::new(Arc::new(store().await))
}

fn datos(ruc: &str) -> BasePerfil {
  BasePerfil {
    ruc:                 Ruc::parse(ruc).unwrap(),
    pais:                "Perú".into(),
    departamento:        "Arequipa".into(),
    provincia:           "Arequipa".into(),
    direccion_comercial: "Calle Mercaderes 210".into(),
    razon_social:        "Suministros del Sur E.I.R.L.".into(),
    actividad_comercial: "Venta al por mayor de materiales".into(),
    nombre_comercial:    "SurSum".into(),
    nombre_contacto:     "Luis Condori".into(),
    telefono_movil:      "+51 954 123 456".into(),
    cargo:               "Jefe de Compras".into(),
  }
}

/// Unwrap a store error that the manager boxed on the way through.
fn store_error(err: licita_core::Error) -> Error {
  match err {
    licita_core::Error::Store(e) => *e
      .downcast::<Error>()
      .expect("boxed error is a sqlite store error"),
    other => panic!("expected a store error, got {other:?}"),
  }
}

// ─── Account creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_normalizes_and_defaults() {
  let m = manager().await;

  let u = m
    .create_user("Rosa.H@Andina.PE", Some("s3creta"), ExtraFields::default())
    .await
    .unwrap();

  assert_eq!(u.email, "Rosa.H@andina.pe");
  assert!(u.is_active);
  assert!(!u.is_staff);
  assert!(!u.is_superuser);
  assert!(u.has_usable_password());
  assert_ne!(u.password_hash.as_deref(), Some("s3creta"));

  let stored = m.store().get_usuario(u.usuario_id).await.unwrap().unwrap();
  assert_eq!(stored, u);
}

#[tokio::test]
async fn create_user_writes_extra_fields_verbatim() {
  let m = manager().await;

  let u = m
    .create_user(
      "ana@empresa.pe",
      None,
      ExtraFields {
        first_name: Some("Ana".into()),
        last_name:  Some("Quispe".into()),
        is_active:  Some(false),
        is_staff:   Some(true),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  let stored = m.store().get_usuario(u.usuario_id).await.unwrap().unwrap();
  assert_eq!(stored.full_name(), "Ana Quispe");
  assert!(!stored.is_active);
  assert!(stored.is_staff);
  assert!(!stored.is_superuser);
  assert!(!stored.has_usable_password());
}

#[tokio::test]
async fn create_user_empty_email_fails() {
  let m = manager().await;

  for password in [None, Some(""), Some("x")] {
    let err = m
      .create_user("", password, ExtraFields::default())
      .await
      .unwrap_err();
    assert!(matches!(err, licita_core::Error::MissingEmail));
    assert_eq!(err.to_string(), "No se encontró ningún email");
  }
  assert!(m.store().list_usuarios().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_superuser_sets_privileges() {
  let m = manager().await;

  let u = m
    .create_superuser("admin@licita.pe", Some("root"), ExtraFields::default())
    .await
    .unwrap();

  assert!(u.is_staff);
  assert!(u.is_superuser);
  assert!(u.is_active);
}

#[tokio::test]
async fn create_superuser_keeps_explicit_values() {
  let m = manager().await;

  let u = m
    .create_superuser(
      "ops@licita.pe",
      None,
      ExtraFields { is_superuser: Some(false), ..Default::default() },
    )
    .await
    .unwrap();

  assert!(u.is_staff);
  assert!(!u.is_superuser);
}

#[tokio::test]
async fn duplicate_email_rejected() {
  let m = manager().await;
  m.create_user("dup@empresa.pe", None, ExtraFields::default())
    .await
    .unwrap();

  // Same address after domain normalisation.
  let err = m
    .create_user("dup@EMPRESA.pe", None, ExtraFields::default())
    .await
    .unwrap_err();

  let err = store_error(err);
  assert!(err.is_duplicate());
  assert!(matches!(err, Error::Duplicate(ref col) if col == "usuarios.email"));
  assert_eq!(m.store().list_usuarios().await.unwrap().len(), 1);
}

#[tokio::test]
async fn email_local_part_is_case_sensitive() {
  let m = manager().await;
  m.create_user("Dup@empresa.pe", None, ExtraFields::default())
    .await
    .unwrap();
  m.create_user("dup@empresa.pe", None, ExtraFields::default())
    .await
    .unwrap();

  assert_eq!(m.store().list_usuarios().await.unwrap().len(), 2);
}

// ─── Credentials ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn authenticate_checks_password_and_records_login() {
  let m = manager().await;
  let u = m
    .create_user("login@empresa.pe", Some("correcta"), ExtraFields::default())
    .await
    .unwrap();
  assert!(u.last_login.is_none());

  assert!(m.authenticate("login@empresa.pe", "mala").await.unwrap().is_none());
  assert!(m.authenticate("otro@empresa.pe", "correcta").await.unwrap().is_none());

  let logged = m
    .authenticate("login@EMPRESA.PE", "correcta")
    .await
    .unwrap()
    .expect("valid credentials");
  assert_eq!(logged.usuario_id, u.usuario_id);
  assert!(logged.last_login.is_some());

  let stored = m.store().get_usuario(u.usuario_id).await.unwrap().unwrap();
  assert_eq!(stored.last_login, logged.last_login);
}

#[tokio::test]
async fn inactive_or_unusable_never_authenticates() {
  let m = manager().await;
  m.create_user(
    "baja@empresa.pe",
    Some("clave"),
    ExtraFields { is_active: Some(false), ..Default::default() },
  )
  .await
  .unwrap();
  m.create_user("sinclave@empresa.pe", None, ExtraFields::default())
    .await
    .unwrap();

  assert!(m.authenticate("baja@empresa.pe", "clave").await.unwrap().is_none());
  assert!(m.authenticate("sinclave@empresa.pe", "").await.unwrap().is_none());
}

#[tokio::test]
async fn set_password_rehashes() {
  let m = manager().await;
  let u = m
    .create_user("cambio@empresa.pe", Some("vieja"), ExtraFields::default())
    .await
    .unwrap();

  m.set_password(u.usuario_id, Some("nueva")).await.unwrap();
  assert!(m.authenticate("cambio@empresa.pe", "vieja").await.unwrap().is_none());
  assert!(m.authenticate("cambio@empresa.pe", "nueva").await.unwrap().is_some());

  let u = m.set_password(u.usuario_id, None).await.unwrap();
  assert!(!u.has_usable_password());
  assert!(m.authenticate("cambio@empresa.pe", "nueva").await.unwrap().is_none());
}

#[tokio::test]
async fn set_password_unknown_usuario() {
  let m = manager().await;
  let id = Uuid::new_v4();
  let err = m.set_password(id, Some("x")).await.unwrap_err();
  assert!(matches!(err, licita_core::Error::UsuarioNotFound(missing) if missing == id));
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_cliente_and_read_back() {
  let m = manager().await;
  let u = m
    .create_user("cliente@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();

  let c: Cliente = m.add_perfil(u.usuario_id, datos("20600011122")).await.unwrap();
  assert_eq!(c.usuario_id, u.usuario_id);

  let by_owner: Cliente = m.store().get_perfil(u.usuario_id).await.unwrap().unwrap();
  assert_eq!(by_owner, c);

  let ruc = Ruc::parse("20600011122").unwrap();
  let by_ruc: Cliente = m.store().get_perfil_by_ruc(&ruc).await.unwrap().unwrap();
  assert_eq!(by_ruc.perfil_id, c.perfil_id);

  // Roles live in separate tables.
  let none: Option<Proveedor> = m.store().get_perfil(u.usuario_id).await.unwrap();
  assert!(none.is_none());
}

#[tokio::test]
async fn one_profile_per_role_per_account() {
  let m = manager().await;
  let u = m
    .create_user("doble@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();

  m.add_perfil::<Cliente>(u.usuario_id, datos("20600011122"))
    .await
    .unwrap();
  let err = m
    .add_perfil::<Cliente>(u.usuario_id, datos("20600011133"))
    .await
    .unwrap_err();
  assert!(matches!(store_error(err), Error::Duplicate(ref col) if col == "clientes.usuario_id"));

  // A different role is a different link.
  m.add_perfil::<Proveedor>(u.usuario_id, datos("20600011144"))
    .await
    .unwrap();
}

#[tokio::test]
async fn duplicate_ruc_rejected_within_role() {
  let m = manager().await;
  let a = m
    .create_user("a@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();
  let b = m
    .create_user("b@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();

  m.add_perfil::<Cliente>(a.usuario_id, datos("20600011122"))
    .await
    .unwrap();
  let err = m
    .add_perfil::<Cliente>(b.usuario_id, datos("20600011122"))
    .await
    .unwrap_err();
  assert!(matches!(store_error(err), Error::Duplicate(ref col) if col == "clientes.ruc"));

  // The same RUC may appear once per role table.
  m.add_perfil::<Proveedor>(b.usuario_id, datos("20600011122"))
    .await
    .unwrap();
}

#[tokio::test]
async fn invalid_perfil_never_reaches_store() {
  let m = manager().await;
  let u = m
    .create_user("vacio@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();

  let mut d = datos("20600011122");
  d.nombre_contacto = String::new();
  let err = m.add_perfil::<Cliente>(u.usuario_id, d).await.unwrap_err();
  assert!(matches!(
    err,
    licita_core::Error::BlankField { field: "nombre_contacto" }
  ));
  assert!(m.store().list_perfiles::<Cliente>().await.unwrap().is_empty());
}

#[tokio::test]
async fn perfil_for_unknown_usuario() {
  let m = manager().await;
  let id = Uuid::new_v4();
  let err = m
    .add_perfil::<Cliente>(id, datos("20600011122"))
    .await
    .unwrap_err();
  assert!(matches!(err, licita_core::Error::UsuarioNotFound(_)));

  // Bypassing the manager, the foreign key still holds.
  let err = store()
    .await
    .insert_perfil(Cliente::from_parts(Uuid::new_v4(), id, datos("20600011122")))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::MissingUsuario));
}

#[tokio::test]
async fn list_perfiles_ordered_by_ruc() {
  let m = manager().await;
  for (email, ruc) in [
    ("c@sursum.pe", "20600000003"),
    ("a@sursum.pe", "20600000001"),
    ("b@sursum.pe", "20600000002"),
  ] {
    let u = m.create_user(email, None, ExtraFields::default()).await.unwrap();
    m.add_perfil::<Proveedor>(u.usuario_id, datos(ruc)).await.unwrap();
  }

  let rucs: Vec<String> = m
    .store()
    .list_perfiles::<Proveedor>()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.datos().ruc.to_string())
    .collect();
  assert_eq!(rucs, ["20600000001", "20600000002", "20600000003"]);
}

#[tokio::test]
async fn delete_perfil_keeps_account() {
  let m = manager().await;
  let u = m
    .create_user("solo@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();
  m.add_perfil::<Cliente>(u.usuario_id, datos("20600011122"))
    .await
    .unwrap();

  assert!(m.store().delete_perfil::<Cliente>(u.usuario_id).await.unwrap());
  assert!(!m.store().delete_perfil::<Cliente>(u.usuario_id).await.unwrap());
  assert!(m.store().get_usuario(u.usuario_id).await.unwrap().is_some());
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_usuario_cascades_to_profiles() {
  let m = manager().await;
  let u = m
    .create_user("borrar@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();
  let keep = m
    .create_user("queda@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();
  m.add_perfil::<Cliente>(u.usuario_id, datos("20600011122"))
    .await
    .unwrap();
  m.add_perfil::<Proveedor>(u.usuario_id, datos("20600011133"))
    .await
    .unwrap();
  m.add_perfil::<Cliente>(keep.usuario_id, datos("20600011144"))
    .await
    .unwrap();

  assert!(m.delete_usuario(u.usuario_id).await.unwrap());

  assert!(m.store().get_usuario(u.usuario_id).await.unwrap().is_none());
  assert!(
    m.store()
      .get_perfil::<Cliente>(u.usuario_id)
      .await
      .unwrap()
      .is_none()
  );
  assert!(m.store().list_perfiles::<Proveedor>().await.unwrap().is_empty());
  assert_eq!(m.store().list_perfiles::<Cliente>().await.unwrap().len(), 1);

  // The freed RUC can be registered again.
  let again = m
    .create_user("nuevo@sursum.pe", None, ExtraFields::default())
    .await
    .unwrap();
  m.add_perfil::<Cliente>(again.usuario_id, datos("20600011122"))
    .await
    .unwrap();
}

#[tokio::test]
async fn delete_missing_usuario_returns_false() {
  let m = manager().await;
  assert!(!m.delete_usuario(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn list_usuarios_ordered_by_email() {
  let s = store().await;
  let m = UsuarioManager::new(Arc::new(s.clone()));
  for email in ["zeta@x.pe", "alfa@x.pe", "medio@x.pe"] {
    m.create_user(email, None, ExtraFields::default()).await.unwrap();
  }

  let emails: Vec<String> = s
    .list_usuarios()
    .await
    .unwrap()
    .into_iter()
    .map(|u| u.email)
    .collect();
  assert_eq!(emails, ["alfa@x.pe", "medio@x.pe", "zeta@x.pe"]);
}

#[tokio::test]
async fn reopening_file_store_is_idempotent() {
  let dir = std::env::temp_dir().join(format!("licita-{}", Uuid::new_v4()));
  std::fs::create_dir(&dir).unwrap();
  let path = dir.join("licita.db");

  let s = SqliteStore::open(&path).await.unwrap();
  let m = UsuarioManager::new(Arc::new(s));
  let u = m
    .create_user("persist@x.pe", None, ExtraFields::default())
    .await
    .unwrap();
  drop(m);

  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.get_usuario(u.usuario_id).await.unwrap().is_some());

  // WAL mode leaves -wal/-shm files next to the database.
  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
