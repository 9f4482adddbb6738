//! Recursive mirroring of a remote container into a local directory.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::api::{
    CredentialPrompt, Credentials, EntityKind, FetchOutcome, RemoteService, Session, TermPrompt,
};
use crate::config::CollisionPolicy;
use crate::download::state::{format_elapsed, DownloadTask, ItemKind, MirrorReport};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, expand_path, local_path, validate_entity_name};

/// Entity kinds requested when listing a container.
const CHILD_KINDS: [EntityKind; 2] = [EntityKind::Folder, EntityKind::File];

/// Mirrors a remote project or folder onto local disk.
///
/// Traversal is depth-first and sequential. At every level all files are
/// fetched before any subfolder is descended into. A failed file, folder or
/// listing is logged and recorded in the [`MirrorReport`]; its siblings are
/// still processed.
pub struct TreeDownloader<S: RemoteService> {
    service: S,
    starting_entity_id: String,
    download_path: PathBuf,
    credentials: Credentials,
    prompt: Box<dyn CredentialPrompt>,
    policy: CollisionPolicy,
    session: Option<Session>,
}

impl<S: RemoteService> TreeDownloader<S> {
    /// Create a downloader and make sure the local root exists.
    ///
    /// Environment variables and a leading `~` in `download_path` are
    /// expanded first.
    pub fn new(
        service: S,
        starting_entity_id: impl Into<String>,
        download_path: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        let download_path = expand_path(download_path);
        ensure_dir(&download_path)?;

        Ok(Self {
            service,
            starting_entity_id: starting_entity_id.into(),
            download_path,
            credentials,
            prompt: Box::new(TermPrompt),
            policy: CollisionPolicy::default(),
            session: None,
        })
    }

    /// Use a different source for interactively entered credentials.
    pub fn with_prompt(mut self, prompt: Box<dyn CredentialPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The expanded local root directory.
    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Resolve credentials and log in.
    ///
    /// Failures are logged and leave the session unset; they are never
    /// returned as errors.
    pub async fn authenticate(&mut self) -> bool {
        tracing::info!("Logging into Synapse...");

        let result = match self.credentials.resolve(self.prompt.as_ref()) {
            Ok((username, password)) => self.service.login(&username, &password).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                self.session = Some(session);
                true
            }
            Err(e) => {
                self.session = None;
                tracing::error!("Synapse login failed: {}", e);
                false
            }
        }
    }

    /// Authenticate, validate the starting entity and mirror it.
    ///
    /// A failed login does not stop the run here; the metadata fetch that
    /// follows fails with [`Error::NotAuthenticated`] instead.
    pub async fn run(&mut self) -> Result<MirrorReport> {
        let started_at = Local::now();

        if !self.authenticate().await {
            tracing::debug!("Continuing without a session");
        }

        let session = self.session()?;
        let parent = self
            .service
            .get_entity(session, &self.starting_entity_id)
            .await?;

        if !parent.kind.is_container() {
            return Err(Error::Validation(format!(
                "Starting entity must be a Project or Folder, {} ({}) is a {}",
                parent.name, parent.id, parent.kind
            )));
        }

        tracing::info!("Starting entity: {} ({})", parent.name, parent.id);
        tracing::info!("Downloading to: {}", self.download_path.display());
        tracing::info!("");

        let mut report = self.mirror(&parent.id, &self.download_path).await;

        report.started_at = Some(started_at);
        report.finished_at = Some(Local::now());

        tracing::info!("");
        if let Some(elapsed) = report.elapsed() {
            tracing::info!("Run time: {}", format_elapsed(elapsed));
        }

        Ok(report)
    }

    /// Mirror the descendants of a container into `local_dir`.
    pub async fn mirror(&self, container_id: &str, local_dir: &Path) -> MirrorReport {
        let mut report = MirrorReport::default();
        let mut pending = Vec::new();

        self.mirror_level(container_id, local_dir, &mut pending, &mut report)
            .await;

        // Folders are pushed in reverse so the first listed is popped first.
        while let Some(folder) = pending.pop() {
            self.descend_folder(&folder, &mut pending, &mut report)
                .await;
        }

        report
    }

    /// Fetch one container's files and queue its folders.
    async fn mirror_level(
        &self,
        container_id: &str,
        local_dir: &Path,
        pending: &mut Vec<DownloadTask>,
        report: &mut MirrorReport,
    ) {
        let (files, folders) = match self.list_tasks(container_id, local_dir).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!("Failed to list children of {}: {:?}", container_id, e);
                report.record_failure(ItemKind::Listing, container_id, local_dir, &e);
                return;
            }
        };

        for file in &files {
            self.fetch_file(file, report).await;
        }

        pending.extend(folders.into_iter().rev());
    }

    /// List a container's children and split them into files and folders,
    /// each in listing order.
    async fn list_tasks(
        &self,
        container_id: &str,
        local_dir: &Path,
    ) -> Result<(Vec<DownloadTask>, Vec<DownloadTask>)> {
        let children = self
            .service
            .list_children(self.session()?, container_id, &CHILD_KINDS)
            .await?;

        let mut files = Vec::new();
        let mut folders = Vec::new();

        for child in children {
            let task = DownloadTask::new(child.id, child.name, local_dir);
            match child.kind {
                EntityKind::Folder => folders.push(task),
                EntityKind::File => files.push(task),
                other => tracing::debug!("Skipping {} ({})", task.id, other),
            }
        }

        Ok((files, folders))
    }

    async fn descend_folder(
        &self,
        task: &DownloadTask,
        pending: &mut Vec<DownloadTask>,
        report: &mut MirrorReport,
    ) {
        let full_path = local_path(&task.local_dir, &task.name);
        tracing::info!("Folder: {} -> {}", task.id, full_path.display());

        let prepared = validate_entity_name(&task.name).and_then(|_| ensure_dir(&full_path));
        if let Err(e) = prepared {
            tracing::error!("Failed to create folder {}: {:?}", full_path.display(), e);
            report.record_failure(ItemKind::Folder, &task.id, &full_path, &e);
            return;
        }

        report.folders.push(full_path.clone());
        self.mirror_level(&task.id, &full_path, pending, report)
            .await;
    }

    async fn fetch_file(&self, task: &DownloadTask, report: &mut MirrorReport) {
        let full_path = local_path(&task.local_dir, &task.name);
        tracing::info!("File  : {} -> {}", task.id, full_path.display());

        let result = match self.session() {
            Ok(session) => {
                self.service
                    .download_file(session, &task.id, &task.name, &task.local_dir, self.policy)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(FetchOutcome::Downloaded(path)) => report.downloaded.push(path),
            Ok(FetchOutcome::KeptLocal(path)) => {
                tracing::info!("Kept local file: {}", path.display());
                report.kept_local.push(path);
            }
            Err(e) => {
                tracing::error!("Failed to download {}: {:?}", task.id, e);
                report.record_failure(ItemKind::File, &task.id, &full_path, &e);
            }
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotAuthenticated)
    }
}
