//! Template domain aggregate.
//!
//! A template is a Markdown body with `{{VAR}}` placeholders and
//! `{{#IF VAR}}...{{/IF}}` blocks, plus the section headings a rendered
//! document must still contain.
//!
//! ```text
//! Template (Aggregate Root)
//! ├── TemplateId        - lookup key ("nextjs", "generic", ...)
//! ├── TemplateMetadata  - display name, version, description
//! ├── body              - primary document text
//! └── required_sections - heading lines that must survive rendering
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::error::DomainError;

// ============================================================================
// TemplateId
// ============================================================================

/// Template lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub const GENERIC: &'static str = "generic";
    pub const CONVENTIONS: &'static str = "conventions";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The fallback template every installation must have.
    pub fn generic() -> Self {
        Self::new(Self::GENERIC)
    }

    /// The template rendered into the secondary output.
    pub fn conventions() -> Self {
        Self::new(Self::CONVENTIONS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this template produces the secondary output.
    pub fn is_secondary(&self) -> bool {
        self.0 == Self::CONVENTIONS
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ============================================================================
// Template Metadata
// ============================================================================

/// Human-readable information about a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Short display name (e.g., "Next.js")
    pub name: String,
    pub version: String,
    pub description: String,
}

impl TemplateMetadata {
    /// Create new metadata with required name.
    ///
    /// `version` defaults to "1.0.0" and `description` to an empty string.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0.0".to_string(),
            description: String::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }
}

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// A context-document blueprint.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `id` is non-empty
/// 2. `metadata.name` is non-empty
/// 3. `body` is not blank
/// 4. `required_sections` has no duplicates
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    pub body: String,
    pub required_sections: Vec<String>,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidTemplate(
                "Template id cannot be empty".into(),
            ));
        }

        if self.metadata.name.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "Template '{}' has no display name",
                self.id
            )));
        }

        if self.body.trim().is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for section in &self.required_sections {
            if !seen.insert(section.as_str()) {
                return Err(DomainError::InvalidTemplate(format!(
                    "Template '{}' lists required section '{}' twice",
                    self.id, section
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    body: Option<String>,
    required_sections: Vec<String>,
}

impl TemplateBuilder {
    pub fn id(mut self, id: impl Into<TemplateId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn metadata(mut self, metadata: TemplateMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a required heading line (accumulates).
    pub fn require_section(mut self, heading: impl Into<String>) -> Self {
        self.required_sections.push(heading.into());
        self
    }

    pub fn required_sections<I, S>(mut self, headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_sections = headings.into_iter().map(Into::into).collect();
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<Template, DomainError> {
        let id = self
            .id
            .ok_or_else(|| DomainError::InvalidTemplate("missing template id".into()))?;
        let metadata = self
            .metadata
            .unwrap_or_else(|| TemplateMetadata::new(id.as_str()));
        let template = Template {
            id,
            metadata,
            body: self.body.unwrap_or_default(),
            required_sections: self.required_sections,
        };
        template.validate()?;
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_success() {
        let t = Template::builder()
            .id("nextjs")
            .metadata(TemplateMetadata::new("Next.js").version("2.1.0"))
            .body("# {{PROJECT_NAME}}\n")
            .require_section("## Commands")
            .build()
            .unwrap();

        assert_eq!(t.id.as_str(), "nextjs");
        assert_eq!(t.metadata.version, "2.1.0");
        assert_eq!(t.required_sections, vec!["## Commands"]);
    }

    #[test]
    fn builder_rejects_blank_body() {
        let err = Template::builder().id("x").body("   \n").build().unwrap_err();
        assert!(matches!(err, DomainError::EmptyTemplate { .. }));
    }

    #[test]
    fn builder_rejects_missing_id() {
        assert!(Template::builder().body("text").build().is_err());
    }

    #[test]
    fn duplicate_sections_are_invalid() {
        let result = Template::builder()
            .id("x")
            .body("text")
            .required_sections(["## A", "## A"])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn metadata_defaults_to_id() {
        let t = Template::builder().id("go").body("x").build().unwrap();
        assert_eq!(t.metadata.name, "go");
        assert_eq!(t.metadata.version, "1.0.0");
    }

    #[test]
    fn conventions_id_is_secondary() {
        assert!(TemplateId::conventions().is_secondary());
        assert!(!TemplateId::generic().is_secondary());
    }
}
