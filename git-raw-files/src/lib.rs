//! Raw file content for the file-summary endpoint.
//!
//! [`FileSource`] is the seam the HTTP layer depends on; [`GitHubClient`] is
//! the production implementation backed by GitHub's contents API.

mod errors;
pub mod github;

use async_trait::async_trait;

pub use errors::{GitRawFilesError, GitRawFilesResult};
pub use github::{GitHubClient, GitHubConfig};

/// Anything that can return the text of a file in a repository.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Returns the file at `path` in `owner/repo`, decoded as UTF-8 (lossily).
    async fn fetch_raw(&self, owner: &str, repo: &str, path: &str) -> GitRawFilesResult<String>;
}
