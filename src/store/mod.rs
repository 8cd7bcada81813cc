//! Remote document store: named JSON documents in a version-controlled
//! repository, read and written with optimistic concurrency, plus an atomic
//! multi-document commit path.

pub mod github;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

/// Opaque token identifying a document's stored state at read time. A
/// conditional write supplying a token that no longer matches is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A document's bytes together with the version token they were read at.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub version: VersionToken,
}

/// One file of an atomic multi-document commit.
#[derive(Debug, Clone)]
pub struct CommitFile {
    pub path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The document (or the branch, for multi-file commits) moved under us.
    /// Callers retry from a fresh read.
    #[error("document {path} was modified concurrently")]
    Conflict { path: String },

    #[error("store request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed store response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document and its current version token. `Ok(None)` means the
    /// document has not been created yet; callers start from an empty
    /// collection.
    async fn read(&self, path: &str) -> Result<Option<Document>, StoreError>;

    /// Write a document's new bytes. `version: Some` performs a conditional
    /// update rejected with `Conflict` when the token is stale; `None`
    /// creates the document.
    async fn write(
        &self,
        path: &str,
        bytes: &[u8],
        version: Option<&VersionToken>,
        message: &str,
    ) -> Result<(), StoreError>;

    /// Commit several documents in one indivisible step: either every file
    /// in `files` becomes visible together or the store is left untouched.
    async fn commit_many(&self, files: &[CommitFile], message: &str) -> Result<(), StoreError>;
}
