//! Synapse Downloader - mirror Synapse projects and folders to local disk.
//!
//! The downloader logs in once, checks that the starting entity is a project
//! or folder, and then walks the remote tree depth-first. At every level all
//! files are fetched before any subfolder is entered. Local files with the
//! same name are overwritten by default.
//!
//! # Example
//!
//! ```no_run
//! use synapse_downloader::{Config, Credentials, SynapseClient, TreeDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = SynapseClient::new(&config.service)?;
//!     let mut downloader =
//!         TreeDownloader::new(client, "syn123456", "~/synapse", Credentials::default())?;
//!
//!     let report = downloader.run().await?;
//!     println!("{} files downloaded", report.downloaded.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;

// Re-exports for convenience
pub use api::{Credentials, EntityHeader, EntityKind, RemoteService, Session, SynapseClient};
pub use config::{CollisionPolicy, Config};
pub use download::{MirrorReport, TreeDownloader};
pub use error::{Error, Result};
