//! Configuration module for the synapse-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Collision policy definitions
//! - Configuration validation

pub mod collision;
pub mod loader;
pub mod validation;

pub use collision::CollisionPolicy;
pub use loader::{AccountConfig, Config, OptionsConfig, ServiceConfig};
pub use validation::{validate_config, validate_entity_id};
