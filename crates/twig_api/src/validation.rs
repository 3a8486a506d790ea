//! Request payloads and shape checks.
//!
//! The core trusts that names, payload fields and revisions are present and
//! well-formed; everything here runs before the core is invoked.

use crate::error::{ApiError, ApiResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use twig_core::EntityDefinition;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,127}$").expect("valid name regex"));

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelCreateBody {
    pub name: String,
    pub entities: BTreeMap<String, EntityDefinition>,
    #[serde(rename = "commitMessage")]
    pub commit_message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelUpdateBody {
    pub name: String,
    pub entities: BTreeMap<String, EntityDefinition>,
    #[serde(rename = "_rev", alias = "revision")]
    pub revision: String,
    #[serde(rename = "commitMessage")]
    pub commit_message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwigletCreateBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Required unless `cloneTwiglet` is given.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(rename = "cloneTwiglet", default)]
    pub clone_twiglet: Option<String>,
    #[serde(rename = "commitMessage")]
    pub commit_message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwigletUpdateBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Keeps the stored model reference when absent.
    #[serde(default)]
    pub model: Option<String>,
    pub nodes: Vec<Value>,
    pub links: Vec<Value>,
    #[serde(rename = "_rev", alias = "revision")]
    pub revision: String,
    #[serde(rename = "commitMessage")]
    pub commit_message: String,
}

impl ModelCreateBody {
    pub fn validate(&self) -> ApiResult<()> {
        check_name("name", &self.name)?;
        check_entities(&self.entities)?;
        check_present("commitMessage", &self.commit_message)
    }
}

impl ModelUpdateBody {
    pub fn validate(&self) -> ApiResult<()> {
        check_name("name", &self.name)?;
        check_entities(&self.entities)?;
        check_present("_rev", &self.revision)?;
        check_present("commitMessage", &self.commit_message)
    }
}

impl TwigletCreateBody {
    pub fn validate(&self) -> ApiResult<()> {
        check_name("name", &self.name)?;
        match (&self.model, &self.clone_twiglet) {
            (_, Some(source)) => check_name("cloneTwiglet", source)?,
            (Some(model), None) => check_name("model", model)?,
            (None, None) => {
                return Err(ApiError::Validation(
                    "one of `model` or `cloneTwiglet` is required".to_string(),
                ))
            }
        }
        check_present("commitMessage", &self.commit_message)
    }
}

impl TwigletUpdateBody {
    pub fn validate(&self) -> ApiResult<()> {
        check_name("name", &self.name)?;
        if let Some(model) = &self.model {
            check_name("model", model)?;
        }
        check_graph_items("nodes", &self.nodes)?;
        check_graph_items("links", &self.links)?;
        check_present("_rev", &self.revision)?;
        check_present("commitMessage", &self.commit_message)
    }
}

/// Names double as path segments, so they stay URL-safe.
pub fn check_name(field: &str, value: &str) -> ApiResult<()> {
    if NAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "`{field}` must be 1-128 characters of letters, digits, `_`, `.` or `-`"
        )))
    }
}

fn check_present(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("`{field}` cannot be empty")))
    } else {
        Ok(())
    }
}

fn check_entities(entities: &BTreeMap<String, EntityDefinition>) -> ApiResult<()> {
    for (key, entity) in entities {
        check_present("entities key", key)?;
        check_present(&format!("entities.{key}.class"), &entity.class)?;
    }
    Ok(())
}

fn check_graph_items(field: &str, items: &[Value]) -> ApiResult<()> {
    match items.iter().position(|item| !item.is_object()) {
        Some(index) => Err(ApiError::Validation(format!(
            "`{field}[{index}]` must be an object"
        ))),
        None => Ok(()),
    }
}
