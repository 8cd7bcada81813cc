//! GitHub-backed document store. Single-document reads and conditional
//! writes go through the contents API; the atomic multi-document commit is
//! built from the git data API (ref, commit, blobs, tree, ref update).

use crate::config::Config;
use crate::store::{CommitFile, Document, DocumentStore, StoreError, VersionToken};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

const API_BASE: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github+json";

pub struct GitHubStore {
    client: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
    branch: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    tree: TreeRef,
}

#[derive(Deserialize)]
struct TreeRef {
    sha: String,
}

#[derive(Deserialize)]
struct ShaResponse {
    sha: String,
}

impl GitHubStore {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            token: config.github_token.clone(),
            owner: config.repo_owner.clone(),
            repo: config.repo_name.clone(),
            branch: config.repo_branch.clone(),
        }
    }

    fn repo_url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", API_BASE, self.owner, self.repo, tail)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, StoreError> {
        let resp = self.request(reqwest::Method::GET, url).send().await?;
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }
        resp.json().await.map_err(StoreError::from)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<T, StoreError> {
        let resp = self
            .request(reqwest::Method::POST, url)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }
        resp.json().await.map_err(StoreError::from)
    }

    async fn create_blob(&self, bytes: &[u8]) -> Result<String, StoreError> {
        let body = json!({
            "content": base64::engine::general_purpose::STANDARD.encode(bytes),
            "encoding": "base64",
        });
        let blob: ShaResponse = self.post_json(self.repo_url("git/blobs"), body).await?;
        Ok(blob.sha)
    }
}

#[async_trait]
impl DocumentStore for GitHubStore {
    async fn read(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let resp = self
            .request(reqwest::Method::GET, self.repo_url(&format!("contents/{path}")))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        let file: ContentsResponse = resp.json().await?;
        // The API wraps base64 payloads with newlines.
        let packed: String = file.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(packed)
            .map_err(|e| StoreError::InvalidResponse(format!("bad base64 for {path}: {e}")))?;

        Ok(Some(Document {
            bytes,
            version: VersionToken::new(file.sha),
        }))
    }

    async fn write(
        &self,
        path: &str,
        bytes: &[u8],
        version: Option<&VersionToken>,
        message: &str,
    ) -> Result<(), StoreError> {
        let mut body = json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(bytes),
            "branch": self.branch,
        });
        if let Some(token) = version {
            body["sha"] = json!(token.as_str());
        }

        let resp = self
            .request(reqwest::Method::PUT, self.repo_url(&format!("contents/{path}")))
            .json(&body)
            .send()
            .await?;

        match resp.status().as_u16() {
            // 409 is a stale sha; 422 covers a create racing an existing
            // file. Both mean: re-read and try again.
            409 | 422 => Err(StoreError::Conflict { path: path.to_string() }),
            s if (200..300).contains(&s) => Ok(()),
            _ => Err(api_error(resp).await),
        }
    }

    async fn commit_many(&self, files: &[CommitFile], message: &str) -> Result<(), StoreError> {
        // Resolve the branch head and its tree.
        let head: RefResponse = self
            .get_json(self.repo_url(&format!("git/ref/heads/{}", self.branch)))
            .await?;
        let head_sha = head.object.sha;
        let commit: CommitResponse = self
            .get_json(self.repo_url(&format!("git/commits/{head_sha}")))
            .await?;

        // Blobs for every new document, built before anything moves.
        let mut tree_entries = Vec::with_capacity(files.len());
        for file in files {
            let blob_sha = self.create_blob(&file.bytes).await?;
            tree_entries.push(json!({
                "path": file.path,
                "mode": "100644",
                "type": "blob",
                "sha": blob_sha,
            }));
        }

        // One tree layering the changed paths over the base tree, one commit
        // with the prior head as parent.
        let tree: ShaResponse = self
            .post_json(
                self.repo_url("git/trees"),
                json!({ "base_tree": commit.tree.sha, "tree": tree_entries }),
            )
            .await?;
        let new_commit: ShaResponse = self
            .post_json(
                self.repo_url("git/commits"),
                json!({ "message": message, "tree": tree.sha, "parents": [head_sha] }),
            )
            .await?;

        // Advancing the ref is the single visible step. A non-fast-forward
        // rejection means another commit landed first.
        let resp = self
            .request(
                reqwest::Method::PATCH,
                self.repo_url(&format!("git/refs/heads/{}", self.branch)),
            )
            .json(&json!({ "sha": new_commit.sha }))
            .send()
            .await?;

        match resp.status().as_u16() {
            409 | 422 => Err(StoreError::Conflict {
                path: format!("heads/{}", self.branch),
            }),
            s if (200..300).contains(&s) => Ok(()),
            _ => Err(api_error(resp).await),
        }
    }
}

async fn api_error(resp: reqwest::Response) -> StoreError {
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .unwrap_or_else(|_| "unreadable response body".to_string());
    // GitHub error bodies carry a "message" field; fall back to raw text.
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or(text);
    StoreError::Api { status, message }
}
