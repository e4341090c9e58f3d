//! Operation inputs, parsed from the raw strings a profile form submits.

use crate::{
  Error, Result,
  user::{Gender, Id},
};

/// Who to link as a father, mother, wife or husband.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relative {
  /// Link a user that already exists.
  Existing(Id),
  /// Create a placeholder user with this nickname.
  New(String),
}

impl Relative {
  /// Build from the `set_x` / `set_x_id` field pair.
  ///
  /// A non-blank id takes precedence over the name.
  pub fn from_fields(name: Option<&str>, id: Option<&str>) -> Result<Self> {
    if let Some(id) = non_blank(id) {
      return parse_id(id).map(Self::Existing);
    }
    non_blank(name)
      .map(|n| Self::New(n.to_owned()))
      .ok_or(Error::MissingName)
  }
}

/// Input to [`crate::store::FamilyStore::add_child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChild {
  pub nickname:    String,
  pub gender:      Gender,
  /// The marriage that produced the child; `None` attributes the child to
  /// the acting user alone.
  pub marriage_id: Option<Id>,
}

impl NewChild {
  /// Build from `add_child_name`, `add_child_gender_id` and
  /// `add_child_parent_id`.
  pub fn from_fields(
    name: Option<&str>,
    gender_id: Option<&str>,
    marriage_id: Option<&str>,
  ) -> Result<Self> {
    let nickname = non_blank(name).ok_or(Error::MissingName)?.to_owned();
    let gender = Gender::from_field(gender_id.unwrap_or_default())?;
    let marriage_id = non_blank(marriage_id).map(parse_id).transpose()?;
    Ok(Self { nickname, gender, marriage_id })
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_id(raw: &str) -> Result<Id> {
  match raw.parse::<Id>() {
    Ok(id) if id > 0 => Ok(id),
    _ => Err(Error::MalformedId(raw.to_owned())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_only_creates_new() {
    let r = Relative::from_fields(Some("  Nama Ayah "), None).unwrap();
    assert_eq!(r, Relative::New("Nama Ayah".into()));
  }

  #[test]
  fn blank_name_with_id_links_existing() {
    let r = Relative::from_fields(Some(""), Some("12")).unwrap();
    assert_eq!(r, Relative::Existing(12));
  }

  #[test]
  fn id_wins_over_name() {
    let r = Relative::from_fields(Some("Someone"), Some("3")).unwrap();
    assert_eq!(r, Relative::Existing(3));
  }

  #[test]
  fn nothing_given_is_missing_name() {
    assert_eq!(
      Relative::from_fields(Some("   "), Some("")),
      Err(Error::MissingName)
    );
    assert_eq!(Relative::from_fields(None, None), Err(Error::MissingName));
  }

  #[test]
  fn garbage_id_is_malformed() {
    assert_eq!(
      Relative::from_fields(None, Some("abc")),
      Err(Error::MalformedId("abc".into()))
    );
    assert_eq!(
      Relative::from_fields(None, Some("-4")),
      Err(Error::MalformedId("-4".into()))
    );
  }

  #[test]
  fn child_without_marriage() {
    let c = NewChild::from_fields(Some("Nama Anak 1"), Some("1"), Some(""))
      .unwrap();
    assert_eq!(c, NewChild {
      nickname:    "Nama Anak 1".into(),
      gender:      Gender::Male,
      marriage_id: None,
    });
  }

  #[test]
  fn child_with_marriage() {
    let c = NewChild::from_fields(Some("Anak"), Some("2"), Some("9")).unwrap();
    assert_eq!(c.gender, Gender::Female);
    assert_eq!(c.marriage_id, Some(9));
  }

  #[test]
  fn child_requires_name_and_gender() {
    assert_eq!(
      NewChild::from_fields(Some(""), Some("1"), None),
      Err(Error::MissingName)
    );
    assert!(matches!(
      NewChild::from_fields(Some("Anak"), None, None),
      Err(Error::UnknownGender(_))
    ));
  }
}
