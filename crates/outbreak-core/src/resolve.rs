//! Id-or-name dispatch for free-text search tokens.
//!
//! Every "search by id or name" lookup uses the same rule: a token that
//! parses as an `i64` is a numeric key, anything else is a case-insensitive
//! name fragment. Which column each branch compares against belongs to the
//! caller; the rule itself must not vary per resource.
//!
//! A name made only of digits cannot be reached through the name branch.

/// The two interpretations of a search token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrName {
  Id(i64),
  /// A substring to match case-insensitively. Empty matches everything.
  Name(String),
}

/// Classify `token`. Never fails: unparseable input is a name fragment.
pub fn resolve(token: &str) -> IdOrName {
  match token.parse::<i64>() {
    Ok(id) => IdOrName::Id(id),
    Err(_) => IdOrName::Name(token.to_owned()),
  }
}

impl IdOrName {
  /// Route to the lookup matching this variant.
  ///
  /// Both closures return the same type, so async lookups work by returning
  /// their futures and awaiting the result.
  pub fn dispatch<T>(
    &self,
    by_id: impl FnOnce(i64) -> T,
    by_name: impl FnOnce(&str) -> T,
  ) -> T {
    match self {
      Self::Id(id) => by_id(*id),
      Self::Name(fragment) => by_name(fragment),
    }
  }
}
