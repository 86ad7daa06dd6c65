//! Values handed from one pipeline stage to the next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::descriptor::ProjectDescriptor;
use super::template::TemplateId;
use super::variables::Variables;
use crate::domain::value_objects::ProjectType;

/// Output of the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub template_id: TemplateId,
    pub variables: Variables,
    pub descriptor: ProjectDescriptor,
    /// Fallback notices.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderMetadata {
    pub template_id: TemplateId,
    pub generated_at: DateTime<Utc>,
    pub framework_name: Option<String>,
    pub framework_version: Option<String>,
    pub confidence: f64,
    pub variables: Variables,
    /// Headings the primary text must contain.
    pub required_sections: Vec<String>,
    /// Headings the secondary text must contain, when it was rendered.
    pub secondary_required_sections: Vec<String>,
}

/// Rendered document text, ready for validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedContent {
    pub primary: String,
    pub secondary: Option<String>,
    pub metadata: RenderMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub content: RenderedContent,
}

impl ValidationResult {
    pub fn new(content: RenderedContent, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            content,
        }
    }
}

/// Outcome of persisting a validated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResult {
    pub success: bool,
    pub written_files: Vec<String>,
    pub backup_files: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub ignore_updated: bool,
    pub timestamp: DateTime<Utc>,
}

impl WriteResult {
    pub fn empty() -> Self {
        Self {
            success: false,
            written_files: Vec::new(),
            backup_files: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            ignore_updated: false,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::empty()
        }
    }
}

/// Everything a caller needs to know about one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub success: bool,
    pub run_id: Uuid,
    pub project_type: ProjectType,
    pub template_id: TemplateId,
    pub dry_run: bool,
    /// False when validation rejected the content and nothing was attempted.
    pub validated: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub written_files: Vec<String>,
    pub backup_files: Vec<String>,
    pub ignore_updated: bool,
    pub timestamp: DateTime<Utc>,
    /// Rendered primary text, only for dry runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}
