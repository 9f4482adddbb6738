//! Synapse API module.
//!
//! This module provides:
//! - The `RemoteService` seam used by the tree downloader
//! - HTTP client for the Synapse REST API
//! - Credential resolution
//! - API request/response types

pub mod auth;
pub mod client;
pub mod service;
pub mod types;

pub use auth::{CredentialPrompt, Credentials, TermPrompt};
pub use client::SynapseClient;
pub use service::{FetchOutcome, RemoteService, Session};
pub use types::{EntityHeader, EntityKind};
