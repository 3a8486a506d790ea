//! Response shapes. `commitMessage` is write-only and never echoed.

use crate::url::UrlBuilder;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use twig_core::{
    ChangelogEntry, Document, DocumentKind, DocumentSummary, EntityDefinition, ModelPayload,
    Revision, TwigletPayload,
};

#[derive(Debug, Serialize)]
pub struct ModelView {
    pub name: String,
    pub entities: BTreeMap<String, EntityDefinition>,
    #[serde(rename = "_rev")]
    pub revision: Revision,
    pub url: String,
    pub changelog_url: String,
}

impl ModelView {
    pub fn new(document: Document<ModelPayload>, urls: &UrlBuilder) -> Self {
        Self {
            url: urls.document(DocumentKind::Model, &document.name),
            changelog_url: urls.changelog(DocumentKind::Model, &document.name),
            name: document.name,
            entities: document.payload.entities,
            revision: document.revision,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TwigletView {
    pub name: String,
    pub description: String,
    pub model: String,
    pub nodes: Vec<Value>,
    pub links: Vec<Value>,
    #[serde(rename = "_rev")]
    pub revision: Revision,
    pub url: String,
    pub model_url: String,
    pub changelog_url: String,
}

impl TwigletView {
    pub fn new(document: Document<TwigletPayload>, urls: &UrlBuilder) -> Self {
        let TwigletPayload {
            description,
            model,
            nodes,
            links,
        } = document.payload;
        Self {
            url: urls.document(DocumentKind::Twiglet, &document.name),
            model_url: urls.document(DocumentKind::Model, &model),
            changelog_url: urls.changelog(DocumentKind::Twiglet, &document.name),
            name: document.name,
            description,
            model,
            nodes,
            links,
            revision: document.revision,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub name: String,
    pub url: String,
}

impl SummaryView {
    pub fn list(kind: DocumentKind, summaries: Vec<DocumentSummary>, urls: &UrlBuilder) -> Vec<Self> {
        summaries
            .into_iter()
            .map(|summary| Self {
                url: urls.document(kind, &summary.name),
                name: summary.name,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ChangelogView {
    pub changelog: Vec<ChangelogEntry>,
}

#[derive(Debug, Serialize)]
pub struct PingView {
    pub ping: &'static str,
    pub version: &'static str,
}
