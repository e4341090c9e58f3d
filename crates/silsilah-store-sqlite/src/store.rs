//! [`SqliteStore`] — the SQLite implementation of [`FamilyStore`].

use std::path::Path;

use silsilah_core::{
  input::{NewChild, Relative},
  profile::FamilyProfile,
  store::FamilyStore,
  user::{Credentials, Gender, Id, Marriage, NewUser, User},
};

use crate::{
  Result,
  ops::{self, Lineage},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A family graph backed by a single SQLite file.
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
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread outside of an explicit transaction.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside one transaction; it is committed only if `f` succeeds.
  async fn transact<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let outcome = f(&tx);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register_user(&self, input: NewUser) -> Result<User> {
    let user = self
      .transact(move |tx| ops::insert_user(tx, &input, Lineage::default()))
      .await?;
    tracing::debug!(user_id = user.id, placeholder = user.is_placeholder(), "user registered");
    Ok(user)
  }

  async fn get_user(&self, id: Id) -> Result<Option<User>> {
    self.read(move |conn| ops::find_user(conn, id)).await
  }

  async fn list_users(&self, gender: Option<Gender>) -> Result<Vec<User>> {
    self.read(move |conn| ops::list_users(conn, gender)).await
  }

  async fn credentials(&self, username: &str) -> Result<Option<Credentials>> {
    let username = username.to_owned();
    self.read(move |conn| ops::credentials(conn, &username)).await
  }

  // ── Parents ───────────────────────────────────────────────────────────────

  async fn set_father(&self, acting_user_id: Id, father: Relative) -> Result<User> {
    let user = self
      .transact(move |tx| ops::set_parent(tx, acting_user_id, father, Gender::Male))
      .await?;
    tracing::debug!(user_id = user.id, father_id = ?user.father_id, "father set");
    Ok(user)
  }

  async fn set_mother(&self, acting_user_id: Id, mother: Relative) -> Result<User> {
    let user = self
      .transact(move |tx| ops::set_parent(tx, acting_user_id, mother, Gender::Female))
      .await?;
    tracing::debug!(user_id = user.id, mother_id = ?user.mother_id, "mother set");
    Ok(user)
  }

  // ── Spouses ───────────────────────────────────────────────────────────────

  async fn set_wife(&self, acting_user_id: Id, wife: Relative) -> Result<Marriage> {
    let marriage = self
      .transact(move |tx| ops::set_spouse(tx, acting_user_id, wife, Gender::Male))
      .await?;
    tracing::debug!(marriage_id = marriage.id, wife_id = marriage.wife_id, "wife set");
    Ok(marriage)
  }

  async fn set_husband(&self, acting_user_id: Id, husband: Relative) -> Result<Marriage> {
    let marriage = self
      .transact(move |tx| ops::set_spouse(tx, acting_user_id, husband, Gender::Female))
      .await?;
    tracing::debug!(
      marriage_id = marriage.id,
      husband_id = marriage.husband_id,
      "husband set"
    );
    Ok(marriage)
  }

  // ── Children ──────────────────────────────────────────────────────────────

  async fn add_child(&self, acting_user_id: Id, child: NewChild) -> Result<User> {
    let child = self
      .transact(move |tx| ops::add_child(tx, acting_user_id, child))
      .await?;
    tracing::debug!(child_id = child.id, parent_id = ?child.parent_id, "child added");
    Ok(child)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_marriage(&self, id: Id) -> Result<Option<Marriage>> {
    self.read(move |conn| ops::find_marriage(conn, id)).await
  }

  async fn marriages_of(&self, user_id: Id) -> Result<Vec<Marriage>> {
    self.read(move |conn| ops::marriages_of(conn, user_id)).await
  }

  async fn profile(&self, user_id: Id) -> Result<Option<FamilyProfile>> {
    // One transaction so the view is a consistent snapshot.
    self.transact(move |tx| ops::profile(tx, user_id)).await
  }
}
