//! Model payload: the entity-type catalogue twiglets draw from.

use crate::model::document::{DocumentKind, DocumentPayload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display definition of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Serialized as `type` to match the external schema.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl EntityDefinition {
    pub fn new(class: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            color: None,
            image: image.into(),
            size: None,
            kind: None,
        }
    }
}

/// Payload of a model document, keyed by entity-type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPayload {
    #[serde(default)]
    pub entities: BTreeMap<String, EntityDefinition>,
}

impl DocumentPayload for ModelPayload {
    const KIND: DocumentKind = DocumentKind::Model;
}
