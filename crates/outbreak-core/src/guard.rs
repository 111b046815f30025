//! Composite-key uniqueness enforced ahead of insert and update.
//!
//! [`check_and_insert`] looks for an existing row with the candidate's key and
//! then inserts; [`check_and_update`] does the same while ignoring the row
//! being replaced. A concurrent writer can still slip in between the two
//! steps; the store's unique index then rejects the write, and that
//! rejection is reported as the same [`Error::DuplicateKey`] as the
//! pre-check.

use std::future::Future;

use crate::{
  Error,
  error::KeyField,
  store::{RecordStore, StoreError},
};

/// A candidate record whose uniqueness is defined by a subset of its fields.
pub trait CompositeKey {
  /// The key value the store looks up.
  type Key: Send + Sync;
  /// What the store returns once the candidate is persisted.
  type Stored;

  const RESOURCE: &'static str;

  fn composite_key(&self) -> Self::Key;

  /// Named key components, reported back on conflict.
  fn key_fields(&self) -> Vec<KeyField>;
}

/// Storage for one keyed record type.
///
/// `insert_unchecked` performs no existence check of its own; callers go
/// through [`check_and_insert`].
pub trait GuardedInsert<R: CompositeKey>: RecordStore {
  fn key_exists(
    &self,
    key: &R::Key,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  fn insert_unchecked(
    &self,
    candidate: R,
  ) -> impl Future<Output = Result<R::Stored, Self::Error>> + Send;
}

/// Storage for replacing one keyed record in place.
pub trait GuardedUpdate<R: CompositeKey>: RecordStore {
  /// True when a row other than `id` already holds `key`.
  fn key_taken(
    &self,
    key: &R::Key,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// Overwrite row `id` with `candidate`. Fails with
  /// [`Error::ReferenceNotFound`] when the row does not exist.
  fn update_unchecked(
    &self,
    id: i64,
    candidate: R,
  ) -> impl Future<Output = Result<R::Stored, Self::Error>> + Send;
}

/// Insert `candidate` unless a record with the same composite key exists.
pub async fn check_and_insert<S, R>(
  store: &S,
  candidate: R,
) -> Result<R::Stored, S::Error>
where
  S: GuardedInsert<R>,
  R: CompositeKey + Send,
{
  let taken = store.key_exists(&candidate.composite_key()).await?;
  guarded_write(taken, candidate, |candidate| store.insert_unchecked(candidate)).await
}

/// Replace record `id` with `candidate` unless another record already holds
/// the candidate's composite key. Keeping a record's own key is allowed.
pub async fn check_and_update<S, R>(
  store: &S,
  id: i64,
  candidate: R,
) -> Result<R::Stored, S::Error>
where
  S: GuardedUpdate<R>,
  R: CompositeKey + Send,
{
  let taken = store.key_taken(&candidate.composite_key(), id).await?;
  guarded_write(taken, candidate, |candidate| store.update_unchecked(id, candidate)).await
}

/// Run `write` unless the pre-check found the key taken, reporting a unique
/// violation from the write itself as the same duplicate.
async fn guarded_write<R, E, F, W>(taken: bool, candidate: R, write: W) -> Result<R::Stored, E>
where
  R: CompositeKey,
  E: StoreError,
  F: Future<Output = Result<R::Stored, E>>,
  W: FnOnce(R) -> F,
{
  let fields = candidate.key_fields();
  if taken {
    return Err(duplicate::<R>(fields).into());
  }

  match write(candidate).await {
    Ok(stored) => Ok(stored),
    Err(e) if e.is_unique_violation() => Err(duplicate::<R>(fields).into()),
    Err(e) => Err(e),
  }
}

fn duplicate<R: CompositeKey>(fields: Vec<KeyField>) -> Error {
  Error::DuplicateKey { resource: R::RESOURCE, fields }
}
