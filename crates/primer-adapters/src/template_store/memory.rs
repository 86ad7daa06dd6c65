//! In-memory template store with built-in templates.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};

use primer_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainValidator as validator, Template, TemplateId},
    error::{PrimerError, PrimerResult},
};
use tracing::{debug, info};

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Thread-safe in-memory template store.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<HashMap<TemplateId, Template>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store with built-in templates loaded.
    pub fn with_builtin() -> PrimerResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Load built-in templates.
    pub fn load_builtin(&self) -> PrimerResult<()> {
        for template in builtin_templates::all_templates()? {
            self.insert(template)?;
        }
        Ok(())
    }

    /// Load user templates from `dir`, replacing built-ins with the same id.
    ///
    /// Returns the number of templates loaded.
    pub fn load_dir(&self, dir: &Path) -> PrimerResult<usize> {
        let templates = FilesystemTemplateLoader::new(dir).load_all()?;
        let count = templates.len();
        for template in templates {
            if self.contains(&template.id) {
                debug!(id = %template.id, "User template overrides built-in");
            }
            self.insert(template)?;
        }
        info!(count, dir = %dir.display(), "Loaded user templates");
        Ok(count)
    }

    /// Get the number of templates.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a template, returning it if present.
    pub fn remove(&self, id: &TemplateId) -> PrimerResult<Option<Template>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(id))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, id: &TemplateId) -> PrimerResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateResolution {
                reason: format!("Template not found: {}", id),
            }
            .into()
        })
    }

    fn contains(&self, id: &TemplateId) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains_key(id))
            .unwrap_or(false)
    }

    fn list(&self) -> PrimerResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut templates: Vec<Template> = inner.values().cloned().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(templates)
    }

    fn insert(&self, template: Template) -> PrimerResult<()> {
        // Validate before insertion
        validator::validate_template(&template).map_err(PrimerError::Domain)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(template.id.clone(), template);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn template(id: &str, body: &str) -> Template {
        Template::builder().id(id).body(body).build().unwrap()
    }

    #[test]
    fn builtin_store_has_every_selectable_template() {
        let store = InMemoryStore::with_builtin().unwrap();
        for id in ["generic", "nextjs", "react", "fastapi", "django", "go", "conventions"] {
            assert!(store.contains(&TemplateId::new(id)), "missing {id}");
        }
    }

    #[test]
    fn insert_replaces_same_id() {
        let store = InMemoryStore::new();
        store.insert(template("go", "# one\n")).unwrap();
        store.insert(template("go", "# two\n")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&TemplateId::new("go")).unwrap().body, "# two\n");
    }

    #[test]
    fn list_is_sorted() {
        let store = InMemoryStore::new();
        store.insert(template("react", "# r\n")).unwrap();
        store.insert(template("django", "# d\n")).unwrap();

        let ids: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["django", "react"]);
    }

    #[test]
    fn missing_template_is_resolution_error() {
        let err = InMemoryStore::new().get(&TemplateId::generic()).unwrap_err();
        assert!(err.to_string().contains("Template not found: generic"));
    }

    #[test]
    fn user_templates_override_builtins() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("go");
        fs::create_dir(&slot).unwrap();
        fs::write(
            slot.join("template.toml"),
            "[template]\nid = \"go\"\n\n[metadata]\nname = \"House Go\"\n",
        )
        .unwrap();
        fs::write(slot.join("body.md"), "# {{PROJECT_NAME}} (house style)\n").unwrap();

        let store = InMemoryStore::with_builtin().unwrap();
        let before = store.len();
        assert_eq!(store.load_dir(temp.path()).unwrap(), 1);

        assert_eq!(store.len(), before);
        let go = store.get(&TemplateId::new("go")).unwrap();
        assert_eq!(go.metadata.name, "House Go");
    }
}
