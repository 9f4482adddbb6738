//! Synapse REST API HTTP client.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use url::Url;

use crate::api::service::{FetchOutcome, RemoteService, Session};
use crate::api::types::*;
use crate::config::{CollisionPolicy, ServiceConfig};
use crate::download::file::save_response;
use crate::error::{Error, Result};
use crate::fs::resolve_target;

/// Synapse API client.
///
/// Holds no session state of its own; every authenticated call takes the
/// [`Session`] returned by [`RemoteService::login`].
pub struct SynapseClient {
    client: Client,
    repo_endpoint: String,
    auth_endpoint: String,
    show_progress: bool,
}

impl SynapseClient {
    /// Create a new client for the configured endpoints.
    pub fn new(service: &ServiceConfig) -> Result<Self> {
        Url::parse(&service.repo_endpoint)?;
        Url::parse(&service.auth_endpoint)?;

        let mut builder = Client::builder().user_agent(&service.user_agent);
        if let Some(timeout) = service.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            repo_endpoint: service.repo_endpoint.trim_end_matches('/').to_string(),
            auth_endpoint: service.auth_endpoint.trim_end_matches('/').to_string(),
            show_progress: false,
        })
    }

    /// Show a progress bar for large downloads.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}{}", self.repo_endpoint, path)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}{}", self.auth_endpoint, path)
    }

    /// Fetch the pre-signed URL for a file entity's content.
    async fn file_url(&self, session: &Session, entity_id: &str) -> Result<String> {
        let url = self.repo_url(&format!("/entity/{}/file", entity_id));
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("redirect", "false")])
            .bearer_auth(session.access_token())
            .send()
            .await?;
        let response = check_status(response, entity_id).await?;

        let presigned = response.text().await?.trim().to_string();
        if presigned.is_empty() {
            return Err(Error::Download(format!(
                "No download URL returned for {}",
                entity_id
            )));
        }

        Ok(presigned)
    }
}

#[async_trait]
impl RemoteService for SynapseClient {
    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let url = self.auth_url("/login2");
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let response = check_status(response, username).await?;

        let login: LoginResponse = response.json().await?;
        Ok(Session::new(login.access_token))
    }

    async fn get_entity(&self, session: &Session, entity_id: &str) -> Result<EntityHeader> {
        let url = self.repo_url(&format!("/entity/{}", entity_id));
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(session.access_token())
            .send()
            .await?;
        let response = check_status(response, entity_id).await?;

        let text = response.text().await?;
        let entity: EntityResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse entity {}: {} - Response: {}",
                entity_id, e, text
            ))
        })?;

        Ok(entity.into())
    }

    async fn list_children(
        &self,
        session: &Session,
        parent_id: &str,
        include: &[EntityKind],
    ) -> Result<Vec<EntityHeader>> {
        let url = self.repo_url("/entity/children");
        let include_types: Vec<&'static str> =
            include.iter().filter_map(EntityKind::include_type).collect();

        let mut children = Vec::new();
        let mut next_page_token = None;

        loop {
            tracing::debug!("POST {} (parent {})", url, parent_id);

            let request = EntityChildrenRequest {
                parent_id,
                include_types: include_types.clone(),
                next_page_token: next_page_token.take(),
            };

            let response = self
                .client
                .post(&url)
                .bearer_auth(session.access_token())
                .json(&request)
                .send()
                .await?;
            let response = check_status(response, parent_id).await?;

            let text = response.text().await?;
            let page: EntityChildrenResponse = serde_json::from_str(&text).map_err(|e| {
                Error::Api(format!(
                    "Failed to parse children of {}: {} - Response: {}",
                    parent_id, e, text
                ))
            })?;

            children.extend(page.page.into_iter().map(EntityHeader::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => next_page_token = Some(token),
                _ => break,
            }
        }

        Ok(children)
    }

    async fn download_file(
        &self,
        session: &Session,
        entity_id: &str,
        name: &str,
        dest_dir: &Path,
        policy: CollisionPolicy,
    ) -> Result<FetchOutcome> {
        let Some(target) = resolve_target(dest_dir, name, policy)? else {
            return Ok(FetchOutcome::KeptLocal(dest_dir.join(name)));
        };

        let presigned = self.file_url(session, entity_id).await?;

        // Pre-signed storage URLs reject an extra Authorization header.
        let response = self
            .client
            .get(&presigned)
            .header(header::ACCEPT, "*/*")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download {}: HTTP {}",
                entity_id,
                response.status()
            )));
        }

        tokio::fs::create_dir_all(dest_dir).await?;
        save_response(response, &target, self.show_progress).await?;

        Ok(FetchOutcome::Downloaded(target))
    }
}

/// Map non-success responses onto the error type.
async fn check_status(response: Response, subject: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.reason)
        .unwrap_or(body);
    tracing::debug!("HTTP {} for {}: {}", status, subject, reason);

    match status.as_u16() {
        401 | 403 => Err(Error::Authentication(format!("HTTP {}: {}", status, reason))),
        404 => Err(Error::EntityNotFound(subject.to_string())),
        _ => Err(Error::Api(format!("HTTP {}: {}", status, reason))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn client_for(server: &MockServer) -> SynapseClient {
        let service = ServiceConfig {
            repo_endpoint: server.url("/repo/v1"),
            auth_endpoint: server.url("/auth/v1"),
            ..ServiceConfig::default()
        };
        SynapseClient::new(&service).unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/v1/login2")
                    .json_body(json!({"username": "alice", "password": "secret"}));
                then.status(200)
                    .json_body(json!({"accessToken": "tok-123", "acceptsTermsOfUse": true}));
            })
            .await;

        let session = client_for(&server).login("alice", "secret").await.unwrap();
        assert_eq!(session.access_token(), "tok-123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/v1/login2");
                then.status(401)
                    .json_body(json!({"reason": "Invalid username or password"}));
            })
            .await;

        let err = client_for(&server).login("alice", "wrong").await.unwrap_err();
        match err {
            Error::Authentication(msg) => assert!(msg.contains("Invalid username or password")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_entity() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repo/v1/entity/syn1")
                    .header("authorization", "Bearer tok");
                then.status(200).json_body(json!({
                    "id": "syn1",
                    "name": "P1",
                    "concreteType": "org.sagebionetworks.repo.model.Project"
                }));
            })
            .await;

        let entity = client_for(&server)
            .get_entity(&Session::new("tok"), "syn1")
            .await
            .unwrap();
        assert_eq!(entity, EntityHeader::new("syn1", "P1", EntityKind::Project));
    }

    #[tokio::test]
    async fn test_get_entity_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repo/v1/entity/syn404");
                then.status(404).json_body(json!({"reason": "missing"}));
            })
            .await;

        let err = client_for(&server)
            .get_entity(&Session::new("tok"), "syn404")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EntityNotFound(id) if id == "syn404"));
    }

    #[tokio::test]
    async fn test_list_children_follows_pages() {
        let server = MockServer::start_async().await;
        let second = server
            .mock_async(|when, then| {
                when.method(POST).path("/repo/v1/entity/children").json_body(json!({
                    "parentId": "syn1",
                    "includeTypes": ["folder", "file"],
                    "nextPageToken": "page2"
                }));
                then.status(200).json_body(json!({
                    "page": [{"id": "syn4", "name": "F1", "type": "org.sagebionetworks.repo.model.Folder"}]
                }));
            })
            .await;
        let first = server
            .mock_async(|when, then| {
                when.method(POST).path("/repo/v1/entity/children").json_body(json!({
                    "parentId": "syn1",
                    "includeTypes": ["folder", "file"]
                }));
                then.status(200).json_body(json!({
                    "page": [
                        {"id": "syn2", "name": "a.txt", "type": "org.sagebionetworks.repo.model.FileEntity"},
                        {"id": "syn3", "name": "b.txt", "type": "org.sagebionetworks.repo.model.FileEntity"}
                    ],
                    "nextPageToken": "page2"
                }));
            })
            .await;

        let children = client_for(&server)
            .list_children(
                &Session::new("tok"),
                "syn1",
                &[EntityKind::Folder, EntityKind::File],
            )
            .await
            .unwrap();

        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "F1"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_file_overwrites() {
        let server = MockServer::start_async().await;
        let content_url = server.url("/storage/a.txt");
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repo/v1/entity/syn2/file")
                    .query_param("redirect", "false");
                then.status(200).body(content_url.clone());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/storage/a.txt");
                then.status(200).body("remote content");
            })
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "old local content that is longer").unwrap();

        let outcome = client_for(&server)
            .download_file(
                &Session::new("tok"),
                "syn2",
                "a.txt",
                dir.path(),
                CollisionPolicy::OverwriteLocal,
            )
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded(dir.path().join("a.txt")));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
            "remote content"
        );
    }

    #[tokio::test]
    async fn test_storage_request_has_no_bearer_token() {
        let server = MockServer::start_async().await;
        let content_url = server.url("/storage/b.txt");
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repo/v1/entity/syn3/file")
                    .header("authorization", "Bearer tok");
                then.status(200).body(content_url.clone());
            })
            .await;
        let storage = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/storage/b.txt")
                    .header_missing("authorization");
                then.status(200).body("signed content");
            })
            .await;

        let dir = TempDir::new().unwrap();
        client_for(&server)
            .download_file(
                &Session::new("tok"),
                "syn3",
                "b.txt",
                dir.path(),
                CollisionPolicy::OverwriteLocal,
            )
            .await
            .unwrap();

        storage.assert_async().await;
        assert_eq!(
            std::fs::read_to_string(dir.path().join("b.txt")).unwrap(),
            "signed content"
        );
    }

    #[tokio::test]
    async fn test_storage_error_is_download_error() {
        let server = MockServer::start_async().await;
        let content_url = server.url("/storage/c.txt");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repo/v1/entity/syn5/file");
                then.status(200).body(content_url.clone());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/storage/c.txt");
                then.status(403).body("<Error>AccessDenied</Error>");
            })
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("c.txt"), "local").unwrap();

        let err = client_for(&server)
            .download_file(
                &Session::new("tok"),
                "syn5",
                "c.txt",
                dir.path(),
                CollisionPolicy::OverwriteLocal,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Download(msg) if msg.contains("403")));
        assert_eq!(std::fs::read_to_string(dir.path().join("c.txt")).unwrap(), "local");
    }

    #[tokio::test]
    async fn test_download_file_keep_local_skips_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/repo/v1/entity/syn2/file");
                then.status(200).body("unused");
            })
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "local").unwrap();

        let outcome = client_for(&server)
            .download_file(
                &Session::new("tok"),
                "syn2",
                "a.txt",
                dir.path(),
                CollisionPolicy::KeepLocal,
            )
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::KeptLocal(dir.path().join("a.txt")));
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "local");
        mock.assert_hits_async(0).await;
    }
}
