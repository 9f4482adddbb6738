//! Synapse API request and response types.

use std::fmt;

use serde::{Deserialize, Serialize};

const PROJECT_TYPE: &str = "org.sagebionetworks.repo.model.Project";
const FOLDER_TYPE: &str = "org.sagebionetworks.repo.model.Folder";
const FILE_TYPE: &str = "org.sagebionetworks.repo.model.FileEntity";

/// Type tag of a remote entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Folder,
    File,
    /// Any other entity type, keeping its concrete type name.
    Other(String),
}

impl EntityKind {
    /// Map a Synapse concrete type name to an entity kind.
    pub fn from_concrete_type(concrete_type: &str) -> Self {
        match concrete_type {
            PROJECT_TYPE => EntityKind::Project,
            FOLDER_TYPE => EntityKind::Folder,
            FILE_TYPE => EntityKind::File,
            other => EntityKind::Other(other.to_string()),
        }
    }

    /// Name used in the `includeTypes` filter of a children listing.
    pub fn include_type(&self) -> Option<&'static str> {
        match self {
            EntityKind::Project => Some("project"),
            EntityKind::Folder => Some("folder"),
            EntityKind::File => Some("file"),
            EntityKind::Other(_) => None,
        }
    }

    /// Whether entities of this kind can hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, EntityKind::Project | EntityKind::Folder)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Project => write!(f, "Project"),
            EntityKind::Folder => write!(f, "Folder"),
            EntityKind::File => write!(f, "File"),
            EntityKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Metadata of a remote entity: id, display name and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHeader {
    pub id: String,
    pub name: String,
    pub kind: EntityKind,
}

impl EntityHeader {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Login request for `/login2`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// Entity returned by `GET /entity/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityResponse {
    pub id: String,
    pub name: String,
    pub concrete_type: String,
}

impl From<EntityResponse> for EntityHeader {
    fn from(entity: EntityResponse) -> Self {
        Self {
            kind: EntityKind::from_concrete_type(&entity.concrete_type),
            id: entity.id,
            name: entity.name,
        }
    }
}

/// Request body for `POST /entity/children`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityChildrenRequest<'a> {
    pub parent_id: &'a str,
    pub include_types: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// One page of a children listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityChildrenResponse {
    #[serde(default)]
    pub page: Vec<ChildHeader>,
    pub next_page_token: Option<String>,
}

/// Child entry inside a listing page.
#[derive(Debug, Deserialize)]
pub struct ChildHeader {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl From<ChildHeader> for EntityHeader {
    fn from(child: ChildHeader) -> Self {
        Self {
            kind: EntityKind::from_concrete_type(&child.entity_type),
            id: child.id,
            name: child.name,
        }
    }
}

/// Error body returned by the Synapse services.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub reason: String,
}
