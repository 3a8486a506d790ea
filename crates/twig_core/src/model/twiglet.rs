//! Twiglet payload: a graph drawn against one model.

use crate::model::document::{DocumentKind, DocumentPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a twiglet document.
///
/// Nodes and links are free-form JSON objects; the core never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwigletPayload {
    #[serde(default)]
    pub description: String,
    /// Name of the model this twiglet was seeded from.
    pub model: String,
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub links: Vec<Value>,
}

impl TwigletPayload {
    /// Empty graph bound to `model`.
    pub fn seeded(model: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            model: model.into(),
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl DocumentPayload for TwigletPayload {
    const KIND: DocumentKind = DocumentKind::Twiglet;
}
