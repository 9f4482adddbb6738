//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    let entity_id = config
        .options
        .entity_id
        .as_deref()
        .ok_or_else(|| Error::MissingConfig("entity_id".to_string()))?;
    validate_entity_id(entity_id)?;

    if config
        .options
        .download_directory
        .as_deref()
        .map_or(true, |d| d.trim().is_empty())
    {
        return Err(Error::MissingConfig("download_directory".to_string()));
    }

    validate_endpoint("repo_endpoint", &config.service.repo_endpoint)?;
    validate_endpoint("auth_endpoint", &config.service.auth_endpoint)?;

    Ok(())
}

/// Validate a Synapse entity ID such as `syn123456`.
pub fn validate_entity_id(entity_id: &str) -> Result<()> {
    let id_pattern = Regex::new(r"(?i)^syn\d+$").unwrap();

    if !id_pattern.is_match(entity_id.trim()) {
        return Err(Error::ConfigValidation {
            field: "entity_id".to_string(),
            message: format!(
                "Invalid Synapse ID: '{}'. Expected something like 'syn123456'.",
                entity_id
            ),
        });
    }

    Ok(())
}

/// Validate a service endpoint URL.
fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", endpoint, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' must use http or https", endpoint),
        });
    }

    Ok(())
}
