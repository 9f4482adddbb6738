//! Remote service abstraction used by the tree downloader.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::api::types::{EntityHeader, EntityKind};
use crate::config::CollisionPolicy;
use crate::error::Result;

/// Authenticated connection to the remote service.
#[derive(Clone)]
pub struct Session {
    access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Outcome of a single file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Content was written to this path.
    Downloaded(PathBuf),
    /// A local file existed and the collision policy kept it.
    KeptLocal(PathBuf),
}

/// Operations the downloader needs from the repository service.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Log in and return a session.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;

    /// Fetch entity metadata without downloading any content.
    async fn get_entity(&self, session: &Session, entity_id: &str) -> Result<EntityHeader>;

    /// List the immediate children of a container, in service order,
    /// restricted to the given kinds.
    async fn list_children(
        &self,
        session: &Session,
        parent_id: &str,
        include: &[EntityKind],
    ) -> Result<Vec<EntityHeader>>;

    /// Download a file entity's content as `dest_dir/name`.
    async fn download_file(
        &self,
        session: &Session,
        entity_id: &str,
        name: &str,
        dest_dir: &Path,
        policy: CollisionPolicy,
    ) -> Result<FetchOutcome>;
}
