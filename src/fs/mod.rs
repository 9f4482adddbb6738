//! Filesystem module.
//!
//! Provides:
//! - Path expansion and directory management
//! - Entity name checks and collision handling

pub mod naming;
pub mod paths;

pub use naming::{make_unique_filename, resolve_target, validate_entity_name};
pub use paths::{ensure_dir, expand_path, local_path};
