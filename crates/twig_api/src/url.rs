//! Canonical resource URLs for responses.

use twig_core::DocumentKind;

/// `buildUrl(path)` helper bound to the configured public base.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Joins `path` (which must start with `/`) onto the public base.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn document(&self, kind: DocumentKind, name: &str) -> String {
        self.build_url(&format!("/{}/{name}", kind.collection()))
    }

    pub fn changelog(&self, kind: DocumentKind, name: &str) -> String {
        self.build_url(&format!("/{}/{name}/changelog", kind.collection()))
    }
}
