//! Generate Service - main application orchestrator.
//!
//! This service coordinates the whole pipeline:
//! 1. Scan the target directory
//! 2. Select a template and build scan-derived variables
//! 3. Merge user preferences
//! 4. Render primary (and optionally secondary) text
//! 5. Validate the result
//! 6. Persist it behind backups (skipped on dry runs)
//!
//! Fatal conditions (missing directory, no templates) are errors. Validation
//! and write failures come back as a report with `success == false`.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Filesystem, TemplateRenderer, TemplateStore},
        services::{
            scanner::ProjectScanner,
            selector::TemplateSelector,
            validator::{ContentValidator, ValidationOptions},
            writer::{OutputNames, OutputWriter},
        },
    },
    domain::{
        GenerationReport, PathGuard, PathPolicy, Preferences, ProjectDescriptor, RenderMetadata,
        RenderedContent, SecretGuard, SelectionResult, TemplateId, ValidationResult, Variables,
    },
    error::PrimerResult,
};

/// Input for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub target_dir: PathBuf,
    pub preferences: Preferences,
    pub dry_run: bool,
    pub validation: ValidationOptions,
}

impl GenerationRequest {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            preferences: Preferences::default(),
            dry_run: false,
            validation: ValidationOptions::default(),
        }
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.validation.strict = strict;
        self
    }
}

/// Main generation service.
pub struct GenerateService {
    scanner: ProjectScanner,
    selector: TemplateSelector,
    store: Arc<dyn TemplateStore>,
    renderer: Arc<dyn TemplateRenderer>,
    secrets: SecretGuard,
    writer: OutputWriter,
}

impl GenerateService {
    /// Create a service with the built-in guard configuration.
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        store: Arc<dyn TemplateStore>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> PrimerResult<Self> {
        let names = OutputNames::default();
        let guard = Arc::new(PathGuard::new(&PathPolicy::for_outputs(&names.all()))?);
        Ok(Self::with_guards(
            filesystem,
            store,
            renderer,
            guard,
            SecretGuard::default(),
        ))
    }

    pub fn with_guards(
        filesystem: Arc<dyn Filesystem>,
        store: Arc<dyn TemplateStore>,
        renderer: Arc<dyn TemplateRenderer>,
        guard: Arc<PathGuard>,
        secrets: SecretGuard,
    ) -> Self {
        Self {
            scanner: ProjectScanner::new(Arc::clone(&filesystem), Arc::clone(&guard)),
            selector: TemplateSelector::new(Arc::clone(&store)),
            store,
            renderer,
            secrets,
            writer: OutputWriter::new(filesystem, guard),
        }
    }

    pub fn output_names(&self) -> OutputNames {
        self.writer.names()
    }

    /// Scan only.
    pub fn scan(&self, path: &Path) -> PrimerResult<ProjectDescriptor> {
        self.scanner.scan(path)
    }

    /// Run the full pipeline.
    #[instrument(skip_all, fields(target_dir = %request.target_dir.display(), dry_run = request.dry_run))]
    pub fn run(&self, request: GenerationRequest) -> PrimerResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        info!(%run_id, "Generation started");

        let descriptor = self.scanner.scan(&request.target_dir)?;
        let selection = self.selector.select(&descriptor)?;
        let variables = request
            .preferences
            .merge_into(&selection.variables, &descriptor);

        let mut warnings = descriptor.warnings.clone();
        warnings.extend(selection.warnings.iter().cloned());

        let rendered = self.render(&selection, &variables, &mut warnings)?;
        let validation = ContentValidator::new(self.secrets.clone(), request.validation)
            .validate(rendered);
        warnings.extend(validation.warnings.iter().cloned());

        let mut report = GenerationReport {
            success: false,
            run_id,
            project_type: descriptor.project_type,
            template_id: selection.template_id.clone(),
            dry_run: request.dry_run,
            validated: validation.is_valid,
            errors: Vec::new(),
            warnings,
            written_files: Vec::new(),
            backup_files: Vec::new(),
            ignore_updated: false,
            timestamp: Utc::now(),
            preview: None,
        };

        if !validation.is_valid {
            warn!(errors = validation.errors.len(), "Validation failed, nothing written");
            report.errors = validation.errors;
            return Ok(report);
        }

        if request.dry_run {
            info!("Dry run, skipping write");
            report.success = true;
            report.preview = Some(validation.content.primary);
            return Ok(report);
        }

        Ok(self.persist(report, &validation, &request.target_dir))
    }

    fn render(
        &self,
        selection: &SelectionResult,
        variables: &Variables,
        warnings: &mut Vec<String>,
    ) -> PrimerResult<RenderedContent> {
        let template = self.store.get(&selection.template_id)?;
        let primary = self.renderer.render(&template.body, variables);

        let conventions = TemplateId::conventions();
        let (secondary, secondary_required_sections) =
            if !variables.is_truthy("GENERATE_SECONDARY") {
                (None, Vec::new())
            } else if self.store.contains(&conventions) {
                let secondary_template = self.store.get(&conventions)?;
                let text = self.renderer.render(&secondary_template.body, variables);
                (Some(text), secondary_template.required_sections)
            } else {
                warnings.push(format!(
                    "Template '{}' is not available; skipping {}",
                    conventions,
                    self.writer.names().secondary
                ));
                (None, Vec::new())
            };

        let framework = &selection.descriptor.framework;
        Ok(RenderedContent {
            primary,
            secondary,
            metadata: RenderMetadata {
                template_id: template.id.clone(),
                generated_at: Utc::now(),
                framework_name: framework.name.clone(),
                framework_version: framework.version.clone(),
                confidence: selection.descriptor.confidence,
                variables: variables.clone(),
                required_sections: template.required_sections,
                secondary_required_sections,
            },
        })
    }

    fn persist(
        &self,
        mut report: GenerationReport,
        validation: &ValidationResult,
        target_dir: &Path,
    ) -> GenerationReport {
        let written = self.writer.write(validation, target_dir);
        report.success = written.success;
        report.errors = written.errors;
        report.warnings.extend(written.warnings);
        report.written_files = written.written_files;
        report.backup_files = written.backup_files;
        report.ignore_updated = written.ignore_updated;
        report.timestamp = written.timestamp;
        info!(success = report.success, "Generation finished");
        report
    }
}
