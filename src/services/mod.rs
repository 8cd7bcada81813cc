pub mod games;
pub mod leaderboard;
pub mod players;

use crate::error::AppError;
use crate::store::{DocumentStore, StoreError, VersionToken};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Attempts per read-transform-write cycle before a conflict surfaces to
/// the caller as a 409.
pub(crate) const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Read a JSON array document, or start an empty collection if it has not
/// been created yet.
pub(crate) async fn read_collection<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    path: &str,
) -> Result<(Vec<T>, Option<VersionToken>), AppError> {
    match store.read(path).await? {
        Some(doc) => {
            let items = serde_json::from_slice(&doc.bytes).map_err(|e| {
                AppError::Internal(format!("malformed document {}: {}", path, e))
            })?;
            Ok((items, Some(doc.version)))
        }
        None => Ok((Vec::new(), None)),
    }
}

/// Documents are pretty-printed on every write so the site repository
/// stays human-diffable.
pub(crate) fn to_pretty_json<T: Serialize>(items: &[T]) -> Result<Vec<u8>, AppError> {
    serde_json::to_vec_pretty(items)
        .map_err(|e| AppError::Internal(format!("failed to serialize document: {e}")))
}

/// Read-transform-write a single document with bounded retry on version
/// conflicts. The transformation is re-applied to a fresh read after every
/// conflict, so it must be pure with respect to the collection.
pub(crate) async fn update_collection<T, R, F>(
    store: &dyn DocumentStore,
    path: &str,
    message: &str,
    mut transform: F,
) -> Result<R, AppError>
where
    T: DeserializeOwned + Serialize,
    F: FnMut(Vec<T>) -> Result<(Vec<T>, R), AppError>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let (items, version) = read_collection(store, path).await?;
        let (updated, outcome) = transform(items)?;
        let bytes = to_pretty_json(&updated)?;
        match store.write(path, &bytes, version.as_ref(), message).await {
            Ok(()) => return Ok(outcome),
            Err(StoreError::Conflict { .. }) if attempt < MAX_WRITE_ATTEMPTS => {
                warn!(path, attempt, "write conflict, retrying from a fresh read");
            }
            Err(e) => return Err(e.into()),
        }
    }
}
