//! Integration tests for `SqliteStore` against an in-memory database.

use silsilah_core::{
  Error as FamilyError,
  error::StoreError as _,
  input::{NewChild, Relative},
  store::FamilyStore,
  user::{Gender, NewUser, User},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, nickname: &str, gender: Gender) -> User {
  s.register_user(NewUser::placeholder(nickname, gender))
    .await
    .unwrap()
}

fn family_err(err: Error) -> FamilyError {
  match err {
    Error::Family(e) => e,
    other => panic!("expected a family error, got {other:?}"),
  }
}

fn child(nickname: &str, gender: Gender, marriage_id: Option<i64>) -> NewChild {
  NewChild {
    nickname: nickname.into(),
    gender,
    marriage_id,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_get_user() {
  let s = store().await;
  let u = user(&s, "Budi", Gender::Male).await;

  let fetched = s.get_user(u.id).await.unwrap().unwrap();
  assert_eq!(fetched, u);
  assert!(fetched.is_placeholder());
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(404).await.unwrap().is_none());
}

#[tokio::test]
async fn list_users_filtered_by_gender() {
  let s = store().await;
  user(&s, "A", Gender::Male).await;
  user(&s, "B", Gender::Female).await;
  user(&s, "C", Gender::Male).await;

  assert_eq!(s.list_users(None).await.unwrap().len(), 3);

  let men = s.list_users(Some(Gender::Male)).await.unwrap();
  assert_eq!(
    men.iter().map(|u| u.nickname.as_str()).collect::<Vec<_>>(),
    ["A", "C"]
  );
}

#[tokio::test]
async fn credentials_only_for_login_users() {
  let s = store().await;
  let login = s
    .register_user(NewUser::with_login("Budi", Gender::Male, "budi", "$argon2id$fake"))
    .await
    .unwrap();
  user(&s, "Placeholder", Gender::Male).await;

  let creds = s.credentials("budi").await.unwrap().unwrap();
  assert_eq!(creds.user_id, login.id);
  assert_eq!(creds.password_hash, "$argon2id$fake");
  assert!(s.credentials("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.register_user(NewUser::with_login("A", Gender::Male, "same", "h"))
    .await
    .unwrap();
  let err = s
    .register_user(NewUser::with_login("B", Gender::Female, "same", "h"))
    .await
    .unwrap_err();
  assert!(err.as_family().is_none());
}

// ─── Father / mother ─────────────────────────────────────────────────────────

#[tokio::test]
async fn set_father_by_name_creates_male_placeholder() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;

  let updated = s
    .set_father(me.id, Relative::New("Nama Ayah".into()))
    .await
    .unwrap();

  let father = s.get_user(updated.father_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(father.nickname, "Nama Ayah");
  assert_eq!(father.gender, Gender::Male);
  assert!(father.is_placeholder());
  assert_eq!(updated.mother_id, None);
}

#[tokio::test]
async fn set_mother_by_name_creates_female_placeholder() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Female).await;

  let updated = s
    .set_mother(me.id, Relative::New("Nama Ibu".into()))
    .await
    .unwrap();

  let mother = s.get_user(updated.mother_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(mother.nickname, "Nama Ibu");
  assert_eq!(mother.gender, Gender::Female);
}

#[tokio::test]
async fn set_father_by_existing_id_creates_no_row() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;
  let father = user(&s, "Pak Harjo", Gender::Male).await;

  let updated = s
    .set_father(me.id, Relative::Existing(father.id))
    .await
    .unwrap();

  assert_eq!(updated.father_id, Some(father.id));
  assert_eq!(s.list_users(None).await.unwrap().len(), 2);

  let profile = s.profile(me.id).await.unwrap().unwrap();
  assert_eq!(profile.father.unwrap().nickname, "Pak Harjo");
}

#[tokio::test]
async fn set_father_twice_with_same_id_is_noop() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;
  let father = user(&s, "Ayah", Gender::Male).await;

  let first = s.set_father(me.id, Relative::Existing(father.id)).await.unwrap();
  let second = s.set_father(me.id, Relative::Existing(father.id)).await.unwrap();

  assert_eq!(first, second);
  assert_eq!(s.list_users(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn set_father_replaces_previous_father() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;
  s.set_father(me.id, Relative::New("Salah".into())).await.unwrap();

  let right = user(&s, "Benar", Gender::Male).await;
  let updated = s.set_father(me.id, Relative::Existing(right.id)).await.unwrap();
  assert_eq!(updated.father_id, Some(right.id));
}

#[tokio::test]
async fn set_father_with_female_id_is_gender_mismatch() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;
  let woman = user(&s, "Siti", Gender::Female).await;

  let err = family_err(
    s.set_father(me.id, Relative::Existing(woman.id)).await.unwrap_err(),
  );
  assert_eq!(err, FamilyError::GenderMismatch {
    user_id:  woman.id,
    expected: Gender::Male,
  });
  assert!(err.is_validation());
  assert_eq!(s.get_user(me.id).await.unwrap().unwrap().father_id, None);
}

#[tokio::test]
async fn set_mother_with_missing_id_is_not_found() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;

  let err = family_err(s.set_mother(me.id, Relative::Existing(99)).await.unwrap_err());
  assert_eq!(err, FamilyError::UserNotFound(99));
  assert!(err.is_not_found());
}

#[tokio::test]
async fn set_father_to_self_is_rejected() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;

  let err = family_err(s.set_father(me.id, Relative::Existing(me.id)).await.unwrap_err());
  assert_eq!(err, FamilyError::SelfReference);
}

#[tokio::test]
async fn unknown_acting_user_is_not_found_and_writes_nothing() {
  let s = store().await;

  let err = family_err(s.set_father(42, Relative::New("Ayah".into())).await.unwrap_err());
  assert_eq!(err, FamilyError::UserNotFound(42));
  assert!(s.list_users(None).await.unwrap().is_empty());
}

// ─── Wife / husband ──────────────────────────────────────────────────────────

#[tokio::test]
async fn set_wife_by_name_creates_female_and_couple() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;

  let marriage = s.set_wife(me.id, Relative::New("Nama Istri".into())).await.unwrap();
  assert_eq!(marriage.husband_id, me.id);

  let wife = s.get_user(marriage.wife_id).await.unwrap().unwrap();
  assert_eq!(wife.nickname, "Nama Istri");
  assert_eq!(wife.gender, Gender::Female);

  let stored = s.get_marriage(marriage.id).await.unwrap().unwrap();
  assert_eq!(stored, marriage);
}

#[tokio::test]
async fn set_husband_by_name_creates_male_and_couple() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Female).await;

  let marriage = s.set_husband(me.id, Relative::New("Nama Suami".into())).await.unwrap();
  assert_eq!(marriage.wife_id, me.id);

  let husband = s.get_user(marriage.husband_id).await.unwrap().unwrap();
  assert_eq!(husband.nickname, "Nama Suami");
  assert_eq!(husband.gender, Gender::Male);
}

#[tokio::test]
async fn set_wife_from_existing_user() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;
  let wife = user(&s, "Siti", Gender::Female).await;

  let marriage = s.set_wife(me.id, Relative::Existing(wife.id)).await.unwrap();
  assert_eq!((marriage.husband_id, marriage.wife_id), (me.id, wife.id));
  assert_eq!(s.list_users(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn set_husband_from_existing_user() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Female).await;
  let husband = user(&s, "Budi", Gender::Male).await;

  let marriage = s.set_husband(me.id, Relative::Existing(husband.id)).await.unwrap();
  assert_eq!((marriage.husband_id, marriage.wife_id), (husband.id, me.id));
}

#[tokio::test]
async fn relinking_same_wife_reuses_marriage() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;
  let wife = user(&s, "Siti", Gender::Female).await;

  let first = s.set_wife(me.id, Relative::Existing(wife.id)).await.unwrap();
  let second = s.set_wife(me.id, Relative::Existing(wife.id)).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(s.marriages_of(me.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn female_cannot_set_wife() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Female).await;

  let err = family_err(s.set_wife(me.id, Relative::New("Istri".into())).await.unwrap_err());
  assert_eq!(err, FamilyError::ActingGender { expected: Gender::Male });
  // No placeholder left behind.
  assert_eq!(s.list_users(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn set_husband_with_female_id_rolls_back() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Female).await;
  let other = user(&s, "Ani", Gender::Female).await;

  let err = family_err(
    s.set_husband(me.id, Relative::Existing(other.id)).await.unwrap_err(),
  );
  assert!(matches!(err, FamilyError::GenderMismatch { .. }));
  assert!(s.marriages_of(me.id).await.unwrap().is_empty());
}

// ─── Children ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_child_without_marriage_attributes_to_father() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;

  let c = s
    .add_child(me.id, child("Nama Anak 1", Gender::Male, None))
    .await
    .unwrap();

  let stored = s.get_user(c.id).await.unwrap().unwrap();
  assert_eq!(stored.nickname, "Nama Anak 1");
  assert_eq!(stored.gender.id(), 1);
  assert_eq!(stored.father_id, Some(me.id));
  assert_eq!(stored.mother_id, None);
  assert_eq!(stored.parent_id, None);
}

#[tokio::test]
async fn add_child_with_marriage_uses_both_parents() {
  let s = store().await;
  let husband = user(&s, "Budi", Gender::Male).await;
  let wife = user(&s, "Siti", Gender::Female).await;
  let marriage = s.set_wife(husband.id, Relative::Existing(wife.id)).await.unwrap();

  let c = s
    .add_child(husband.id, child("Nama Anak 1", Gender::Male, Some(marriage.id)))
    .await
    .unwrap();

  assert_eq!(c.father_id, Some(husband.id));
  assert_eq!(c.mother_id, Some(wife.id));
  assert_eq!(c.parent_id, Some(marriage.id));
  assert_eq!(s.get_user(c.id).await.unwrap().unwrap(), c);
}

#[tokio::test]
async fn wife_can_add_child_to_her_marriage() {
  let s = store().await;
  let wife = user(&s, "Siti", Gender::Female).await;
  let marriage = s.set_husband(wife.id, Relative::New("Budi".into())).await.unwrap();

  let c = s
    .add_child(wife.id, child("Anak", Gender::Female, Some(marriage.id)))
    .await
    .unwrap();
  assert_eq!(c.father_id, Some(marriage.husband_id));
  assert_eq!(c.mother_id, Some(wife.id));
}

#[tokio::test]
async fn add_child_with_unknown_marriage_is_not_found() {
  let s = store().await;
  let me = user(&s, "Saya", Gender::Male).await;

  let err = family_err(
    s.add_child(me.id, child("Anak", Gender::Male, Some(77))).await.unwrap_err(),
  );
  assert_eq!(err, FamilyError::MarriageNotFound(77));
  assert_eq!(s.list_users(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_child_to_someone_elses_marriage_is_rejected() {
  let s = store().await;
  let husband = user(&s, "Budi", Gender::Male).await;
  let marriage = s.set_wife(husband.id, Relative::New("Siti".into())).await.unwrap();
  let stranger = user(&s, "Joko", Gender::Male).await;

  let err = family_err(
    s.add_child(stranger.id, child("Anak", Gender::Male, Some(marriage.id)))
      .await
      .unwrap_err(),
  );
  assert_eq!(err, FamilyError::NotPartOfMarriage {
    marriage_id: marriage.id,
    user_id:     stranger.id,
  });
}

#[tokio::test]
async fn female_without_marriage_must_pick_one() {
  let s = store().await;
  let me = user(&s, "Siti", Gender::Female).await;

  let err = family_err(
    s.add_child(me.id, child("Anak", Gender::Male, None)).await.unwrap_err(),
  );
  assert_eq!(err, FamilyError::MarriageRequired);
}

#[tokio::test]
async fn replacing_father_of_married_couples_child_clears_parent_marriage() {
  let s = store().await;
  let budi = user(&s, "Budi", Gender::Male).await;
  let marriage = s.set_wife(budi.id, Relative::New("Siti".into())).await.unwrap();
  let c = s
    .add_child(budi.id, child("Anak", Gender::Male, Some(marriage.id)))
    .await
    .unwrap();

  let updated = s.set_father(c.id, Relative::New("Orang Lain".into())).await.unwrap();
  assert_ne!(updated.father_id, Some(budi.id));
  assert_eq!(updated.mother_id, Some(marriage.wife_id));
  assert_eq!(updated.parent_id, None);
  assert_eq!(s.get_user(c.id).await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn replacing_mother_of_married_couples_child_clears_parent_marriage() {
  let s = store().await;
  let budi = user(&s, "Budi", Gender::Male).await;
  let marriage = s.set_wife(budi.id, Relative::New("Siti".into())).await.unwrap();
  let c = s
    .add_child(budi.id, child("Anak", Gender::Female, Some(marriage.id)))
    .await
    .unwrap();

  let updated = s.set_mother(c.id, Relative::New("Ibu Lain".into())).await.unwrap();
  assert_eq!(updated.father_id, Some(budi.id));
  assert_eq!(updated.parent_id, None);
}

#[tokio::test]
async fn relinking_same_father_keeps_parent_marriage() {
  let s = store().await;
  let budi = user(&s, "Budi", Gender::Male).await;
  let marriage = s.set_wife(budi.id, Relative::New("Siti".into())).await.unwrap();
  let c = s
    .add_child(budi.id, child("Anak", Gender::Male, Some(marriage.id)))
    .await
    .unwrap();

  let same = s.set_father(c.id, Relative::Existing(budi.id)).await.unwrap();
  assert_eq!(same.parent_id, Some(marriage.id));
  assert_eq!(same.updated_at, c.updated_at);
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_assembles_family() {
  let s = store().await;
  let me = user(&s, "Budi", Gender::Male).await;
  s.set_father(me.id, Relative::New("Ayah".into())).await.unwrap();
  s.set_mother(me.id, Relative::New("Ibu".into())).await.unwrap();
  let first = s.set_wife(me.id, Relative::New("Siti".into())).await.unwrap();
  let second = s.set_wife(me.id, Relative::New("Ani".into())).await.unwrap();
  s.add_child(me.id, child("Anak Siti", Gender::Male, Some(first.id)))
    .await
    .unwrap();
  s.add_child(me.id, child("Anak Ani", Gender::Female, Some(second.id)))
    .await
    .unwrap();
  s.add_child(me.id, child("Anak Saja", Gender::Male, None))
    .await
    .unwrap();

  let p = s.profile(me.id).await.unwrap().unwrap();
  assert_eq!(p.user.id, me.id);
  assert_eq!(p.father.as_ref().unwrap().nickname, "Ayah");
  assert_eq!(p.mother.as_ref().unwrap().nickname, "Ibu");
  assert_eq!(
    p.spouses.iter().map(|sp| sp.partner.nickname.as_str()).collect::<Vec<_>>(),
    ["Siti", "Ani"]
  );
  assert_eq!(p.children.len(), 3);
  assert_eq!(
    p.children_of(first.id).map(|c| c.nickname.as_str()).collect::<Vec<_>>(),
    ["Anak Siti"]
  );
}

#[tokio::test]
async fn profile_of_mother_lists_her_children() {
  let s = store().await;
  let wife = user(&s, "Siti", Gender::Female).await;
  let m = s.set_husband(wife.id, Relative::New("Budi".into())).await.unwrap();
  s.add_child(wife.id, child("Anak", Gender::Male, Some(m.id))).await.unwrap();

  let p = s.profile(wife.id).await.unwrap().unwrap();
  assert_eq!(p.children.len(), 1);
  assert_eq!(p.spouses[0].partner.id, m.husband_id);
}

#[tokio::test]
async fn profile_missing_user_is_none() {
  let s = store().await;
  assert!(s.profile(1).await.unwrap().is_none());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_file_store_keeps_rows() {
  let path = std::env::temp_dir().join(format!(
    "silsilah-test-{}-{}.db",
    std::process::id(),
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
  ));

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    let me = user(&s, "Saya", Gender::Male).await;
    s.set_father(me.id, Relative::New("Ayah".into())).await.unwrap();
    me.id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let me = s.get_user(id).await.unwrap().unwrap();
  assert!(me.father_id.is_some());

  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}
