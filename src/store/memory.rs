//! In-memory document store used by the test suite. Version tokens are the
//! SHA-256 of the stored bytes, so a token goes stale exactly when the
//! content changes, matching the remote store's behavior.

use crate::store::{CommitFile, Document, DocumentStore, StoreError, VersionToken};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

pub struct MemoryStore {
    docs: Mutex<HashMap<String, Vec<u8>>>,
    conflicts_to_inject: AtomicU32,
    fail_commits: AtomicBool,
}

fn token_for(bytes: &[u8]) -> VersionToken {
    VersionToken::new(hex::encode(Sha256::digest(bytes)))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            conflicts_to_inject: AtomicU32::new(0),
            fail_commits: AtomicBool::new(false),
        }
    }

    /// Make the next `n` writes or multi-file commits fail with a conflict
    /// without touching any document.
    pub fn inject_conflicts(&self, n: u32) {
        self.conflicts_to_inject.store(n, Ordering::SeqCst);
    }

    /// Make every multi-file commit fail outright without touching any
    /// document, so atomicity is observable.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn take_injected_conflict(&self) -> bool {
        self.conflicts_to_inject
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.lock().unwrap();
        Ok(docs.get(path).map(|bytes| Document {
            bytes: bytes.clone(),
            version: token_for(bytes),
        }))
    }

    async fn write(
        &self,
        path: &str,
        bytes: &[u8],
        version: Option<&VersionToken>,
        _message: &str,
    ) -> Result<(), StoreError> {
        if self.take_injected_conflict() {
            return Err(StoreError::Conflict { path: path.to_string() });
        }

        let mut docs = self.docs.lock().unwrap();
        let current = docs.get(path);
        let stale = match (current, version) {
            (Some(existing), Some(token)) => token_for(existing) != *token,
            // Creating a document that already exists, or updating one that
            // was deleted, are both concurrent-modification races.
            (Some(_), None) | (None, Some(_)) => true,
            (None, None) => false,
        };
        if stale {
            return Err(StoreError::Conflict { path: path.to_string() });
        }

        docs.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn commit_many(&self, files: &[CommitFile], _message: &str) -> Result<(), StoreError> {
        if self.take_injected_conflict() {
            return Err(StoreError::Conflict {
                path: files.first().map(|f| f.path.clone()).unwrap_or_default(),
            });
        }
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 500,
                message: "commit failure injected by test".to_string(),
            });
        }

        let mut docs = self.docs.lock().unwrap();
        for file in files {
            docs.insert(file.path.clone(), file.bytes.clone());
        }
        Ok(())
    }
}
