//! Template Service - template listing and lookup.
//!
//! Separated from GenerateService for single responsibility.

use std::sync::Arc;

use crate::{
    application::ports::TemplateStore,
    domain::{Template, TemplateId},
    error::PrimerResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub required_sections: usize,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.metadata.name.clone(),
            version: t.metadata.version.clone(),
            description: t.metadata.description.clone(),
            required_sections: t.required_sections.len(),
        }
    }
}

/// Service for template operations.
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Get a template by ID.
    pub fn get(&self, id: &TemplateId) -> PrimerResult<Template> {
        self.store.get(id)
    }

    /// List all templates, ordered by id.
    pub fn list(&self) -> PrimerResult<Vec<TemplateInfo>> {
        Ok(self.store.list()?.iter().map(TemplateInfo::from).collect())
    }
}
