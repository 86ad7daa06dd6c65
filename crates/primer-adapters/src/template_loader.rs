//! Filesystem-based template loader.
//!
//! Parses `template.toml` manifests and their body files into domain
//! [`Template`] objects. The same manifest format backs the built-in
//! templates (embedded at compile time) and user templates on disk.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── nextjs/
//! │   ├── template.toml        ← manifest (required)
//! │   └── body.md              ← document body (required)
//! └── my-team/
//!     ├── template.toml
//!     └── agents.md            ← body file named in the manifest
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "nextjs"             # unique identifier; same id overrides a built-in
//! version = "1.0.0"              # optional, default "1.0.0"
//! body    = "body.md"            # optional, default "body.md"
//!
//! [metadata]
//! name        = "Next.js"
//! description = "App and pages router projects"   # optional
//!
//! [validation]
//! required_sections = ["## Commands", "## Testing"] # optional
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use primer_core::domain::{
    DomainError, Template, TemplateBuilder, TemplateMetadata, security::has_path_traversal,
};

/// Manifest file name inside every template directory.
pub const MANIFEST_FILE: &str = "template.toml";

const DEFAULT_BODY_FILE: &str = "body.md";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub metadata: MetadataSection,
    #[serde(default)]
    pub validation: ValidationSection,
}

/// `[template]` section — identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    /// Unique slug, e.g. `"nextjs"`.
    pub id: String,
    pub version: Option<String>,
    /// Body file relative to the template directory.
    pub body: Option<String>,
}

/// `[metadata]` section — human-facing information about the template.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    /// Display name shown in `primer list`.
    pub name: String,
    pub description: Option<String>,
}

/// `[validation]` section.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ValidationSection {
    /// Headings that must appear as whole lines in the rendered document.
    #[serde(default)]
    pub required_sections: Vec<String>,
}

impl TemplateManifest {
    /// Parse manifest text.
    pub fn parse(raw: &str, origin: &str) -> Result<Self, DomainError> {
        toml::from_str(raw).map_err(|e| {
            DomainError::InvalidTemplate(format!("failed to parse '{origin}': {e}"))
        })
    }

    /// Body file name, relative to the template directory.
    pub fn body_file(&self) -> &str {
        self.template.body.as_deref().unwrap_or(DEFAULT_BODY_FILE)
    }

    /// Combine the manifest with its body text into a validated template.
    pub fn into_template(self, body: impl Into<String>) -> Result<Template, DomainError> {
        let mut metadata = TemplateMetadata::new(self.metadata.name)
            .description(self.metadata.description.unwrap_or_default());
        if let Some(version) = self.template.version {
            metadata = metadata.version(version);
        }

        TemplateBuilder::default()
            .id(self.template.id)
            .metadata(metadata)
            .body(body)
            .required_sections(self.validation.required_sections)
            .build()
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`Template`] objects from a directory tree of `template.toml` manifests.
///
/// Each immediate subdirectory of `templates_dir` that contains a valid
/// `template.toml` is treated as one template. Subdirectories that are missing
/// `template.toml`, or whose manifest or body is invalid, emit a `WARN` log
/// and are skipped; they do not prevent other templates from loading.
///
/// # Example
///
/// ```no_run
/// use primer_adapters::template_loader::FilesystemTemplateLoader;
///
/// let loader = FilesystemTemplateLoader::new("./templates");
/// let templates = loader.load_all()?;
/// println!("Loaded {} templates", templates.len());
/// # Ok::<(), primer_core::domain::DomainError>(())
/// ```
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    /// Create a loader pointed at `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load every valid template found under the templates directory,
    /// ordered by directory name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTemplate`] if the directory does not
    /// exist or cannot be read.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<Template>, DomainError> {
        if !self.templates_dir.is_dir() {
            return Err(DomainError::InvalidTemplate(format!(
                "templates directory not found: {}",
                self.templates_dir.display()
            )));
        }

        let mut templates = Vec::new();
        let walker = WalkDir::new(&self.templates_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                DomainError::InvalidTemplate(format!(
                    "failed to read templates directory '{}': {e}",
                    self.templates_dir.display()
                ))
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            match load_template_from_dir(entry.path()) {
                Ok(template) => {
                    debug!(id = %template.id, version = %template.metadata.version, "Loaded template");
                    templates.push(template);
                }
                Err(e) => {
                    warn!(
                        dir   = %entry.path().display(),
                        error = %e,
                        "Skipping template directory due to load error"
                    );
                }
            }
        }

        debug!(count = templates.len(), "Finished loading templates");
        Ok(templates)
    }
}

/// Load a single template from one directory.
///
/// # Errors
///
/// Returns an error if `template.toml` is missing or unparseable, the body
/// file cannot be read, or the resulting template fails validation.
pub fn load_template_from_dir(dir: &Path) -> Result<Template, DomainError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(DomainError::InvalidTemplate(format!(
            "missing {MANIFEST_FILE} in '{}'",
            dir.display()
        )));
    }

    let raw = fs::read_to_string(&manifest_path).map_err(|e| {
        DomainError::InvalidTemplate(format!("failed to read '{}': {e}", manifest_path.display()))
    })?;
    let manifest = TemplateManifest::parse(&raw, &manifest_path.display().to_string())?;

    let body_file = normalize_path(manifest.body_file());
    if has_path_traversal(&body_file) || Path::new(&body_file).is_absolute() {
        return Err(DomainError::InvalidTemplate(format!(
            "body file '{body_file}' must stay inside '{}'",
            dir.display()
        )));
    }
    let body_path = dir.join(&body_file);
    let body = fs::read_to_string(&body_path).map_err(|e| {
        DomainError::InvalidTemplate(format!("failed to read '{}': {e}", body_path.display()))
    })?;

    manifest.into_template(body)
}

/// Normalise a filesystem path to forward slashes.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Minimal valid manifest shared across many tests.
    const MINIMAL_MANIFEST: &str = r#"
[template]
id = "tpl"

[metadata]
name = "Test Template"
"#;

    fn seed(root: &Path, slot: &str, manifest: &str, files: &[(&str, &str)]) {
        let dir = root.join(slot);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    #[test]
    fn load_all_returns_error_for_missing_dir() {
        let loader = FilesystemTemplateLoader::new("/absolutely/does/not/exist");
        assert!(matches!(
            loader.load_all(),
            Err(DomainError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn load_all_skips_files_at_top_level() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "hi").unwrap();
        seed(temp.path(), "tpl", MINIMAL_MANIFEST, &[("body.md", "# Doc\n")]);

        let templates = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(templates.len(), 1);
    }

    #[test]
    fn load_all_continues_when_one_template_is_invalid() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("bad")).unwrap();
        seed(temp.path(), "no-body", MINIMAL_MANIFEST, &[]);
        seed(temp.path(), "good", MINIMAL_MANIFEST, &[("body.md", "# Doc\n")]);

        let templates = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(templates.len(), 1, "bad templates should be skipped");
    }

    #[test]
    fn loads_full_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = r###"
[template]
id      = "team"
version = "2.3.4"
body    = "agents.md"

[metadata]
name        = "Team Template"
description = "House rules"

[validation]
required_sections = ["## Commands", "## Testing"]
"###;
        seed(
            temp.path(),
            "team",
            manifest,
            &[("agents.md", "# {{PROJECT_NAME}}\n## Commands\n## Testing\n")],
        );

        let templates = FilesystemTemplateLoader::new(temp.path()).load_all().unwrap();
        let t = &templates[0];
        assert_eq!(t.id.as_str(), "team");
        assert_eq!(t.metadata.name, "Team Template");
        assert_eq!(t.metadata.version, "2.3.4");
        assert_eq!(t.metadata.description, "House rules");
        assert_eq!(t.required_sections, vec!["## Commands", "## Testing"]);
        assert!(t.body.starts_with("# {{PROJECT_NAME}}"));
    }

    #[test]
    fn empty_body_is_rejected() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), "tpl", MINIMAL_MANIFEST, &[("body.md", "  \n")]);

        let err = load_template_from_dir(&temp.path().join("tpl")).unwrap_err();
        assert!(matches!(err, DomainError::EmptyTemplate { .. }));
    }

    #[test]
    fn body_file_cannot_escape_directory() {
        let temp = TempDir::new().unwrap();
        let manifest = r#"
[template]
id   = "tpl"
body = "../secret.md"

[metadata]
name = "Escape"
"#;
        seed(temp.path(), "tpl", manifest, &[]);

        let err = load_template_from_dir(&temp.path().join("tpl")).unwrap_err();
        assert!(err.to_string().contains("must stay inside"));
    }

    #[test]
    fn encoded_body_path_cannot_escape_directory() {
        let temp = TempDir::new().unwrap();
        let manifest = r#"
[template]
id   = "tpl"
body = "..%2fsecret.md"

[metadata]
name = "Escape"
"#;
        seed(temp.path(), "tpl", manifest, &[]);

        let err = load_template_from_dir(&temp.path().join("tpl")).unwrap_err();
        assert!(err.to_string().contains("must stay inside"));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let err = TemplateManifest::parse("[template]\nid = ", "inline").unwrap_err();
        assert!(err.to_string().contains("failed to parse 'inline'"));
    }

    #[test]
    fn normalize_path_replaces_backslashes() {
        assert_eq!(normalize_path("a\\b\\c.md"), "a/b/c.md");
    }
}
