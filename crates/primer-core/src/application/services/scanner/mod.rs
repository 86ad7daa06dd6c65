//! Project Scanner - detects what kind of project lives in a directory.
//!
//! The scanner runs an ordered list of ecosystem probes (Node, Python, Go,
//! Rust). A probe runs only when one of its marker files exists. The first
//! probe that classifies the project decides its type and confidence; any
//! later probe whose markers are present is only recorded in
//! `secondary_ecosystems`.
//!
//! Inside a probe, classification is an ordered rule table. The first rule
//! whose predicate holds wins and its confidence is final.

mod go;
mod node;
mod python;
mod rust;

pub use go::GoProbe;
pub use node::NodeProbe;
pub use python::PythonProbe;
pub use rust::RustProbe;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        Dependencies, FrameworkInfo, PathGuard, PathOperation, ProjectDescriptor, ProjectType,
        Router,
    },
    error::PrimerResult,
};

// ── Classification rules ─────────────────────────────────────────────────────

/// One row of a probe's classification table.
pub struct ClassificationRule<F> {
    pub project_type: ProjectType,
    pub confidence: f64,
    pub router: Option<Router>,
    /// Display name of the framework, if the rule implies one.
    pub framework: Option<&'static str>,
    /// Dependency whose version becomes the framework version.
    pub version_from: Option<&'static str>,
    pub matches: fn(&F) -> bool,
}

/// First matching rule, in table order.
pub fn classify<'r, F>(
    rules: &'r [ClassificationRule<F>],
    facts: &F,
) -> Option<&'r ClassificationRule<F>> {
    rules.iter().find(|rule| (rule.matches)(facts))
}

/// Strip a version range prefix such as `^`, `~`, `>=` or `==`.
pub fn strip_range_prefix(version: &str) -> String {
    version
        .trim()
        .trim_start_matches(|c: char| matches!(c, '^' | '~' | '>' | '<' | '=' | '!' | 'v' | ' '))
        .to_string()
}

/// False for wildcards and empty constraints, which pin nothing.
fn is_concrete_version(version: &str) -> bool {
    !version.is_empty() && version != "*" && version != "x"
}

// ── Detection ────────────────────────────────────────────────────────────────

/// What a probe concluded about a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub project_type: ProjectType,
    pub confidence: f64,
    pub framework: FrameworkInfo,
    pub dependencies: Dependencies,
    pub test_framework: Option<String>,
    pub package_manager: Option<String>,
}

impl Detection {
    /// Build a detection from the winning rule.
    pub fn from_rule<F>(rule: &ClassificationRule<F>, dependencies: Dependencies) -> Self {
        let version = rule
            .version_from
            .and_then(|dep| dependencies.get(dep))
            .map(strip_range_prefix)
            .filter(|v| is_concrete_version(v));
        let mut framework = rule
            .framework
            .map(|name| FrameworkInfo::named(name).with_version(version))
            .unwrap_or_default();
        if let Some(router) = rule.router {
            framework = framework.with_router(router);
        }
        Self {
            project_type: rule.project_type,
            confidence: rule.confidence,
            framework,
            dependencies,
            test_framework: None,
            package_manager: None,
        }
    }
}

// ── Scan context ─────────────────────────────────────────────────────────────

/// Read access to the project being scanned.
///
/// Every content read is checked against the read policy. Denied or failed
/// reads are logged, recorded as warnings, and reported as absent.
pub struct ScanContext<'a> {
    root: &'a Path,
    filesystem: &'a dyn Filesystem,
    guard: &'a PathGuard,
    warnings: Vec<String>,
}

impl<'a> ScanContext<'a> {
    pub fn new(root: &'a Path, filesystem: &'a dyn Filesystem, guard: &'a PathGuard) -> Self {
        Self {
            root,
            filesystem,
            guard,
            warnings: Vec::new(),
        }
    }

    pub fn has_file(&self, relative: &str) -> bool {
        self.filesystem.is_file(&self.root.join(relative))
    }

    pub fn has_dir(&self, relative: &str) -> bool {
        self.filesystem.is_dir(&self.root.join(relative))
    }

    /// Read a project file, or `None` if it is missing, denied or unreadable.
    pub fn read(&mut self, relative: &str) -> Option<String> {
        if !self.has_file(relative) {
            return None;
        }
        if !self.guard.is_path_allowed(relative, PathOperation::Read) {
            warn!(file = relative, "Read denied by path policy");
            self.warnings
                .push(format!("Skipped {}: reading it is not allowed", relative));
            return None;
        }
        match self.filesystem.read_to_string(&self.root.join(relative)) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(file = relative, error = %e, "Failed to read manifest");
                self.warnings
                    .push(format!("Could not read {}: {}", relative, e));
                None
            }
        }
    }

    /// Record a soft failure, such as a manifest that does not parse.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Files under `relative` (project root when empty), bounded by depth.
    pub fn files_under(&self, relative: &str, max_depth: usize) -> Vec<PathBuf> {
        let dir = if relative.is_empty() {
            self.root.to_path_buf()
        } else {
            self.root.join(relative)
        };
        if !self.filesystem.is_dir(&dir) {
            return Vec::new();
        }
        self.filesystem
            .list_files(&dir, max_depth)
            .unwrap_or_else(|e| {
                debug!(dir = %dir.display(), error = %e, "Listing failed");
                Vec::new()
            })
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

// ── Ecosystem probes ─────────────────────────────────────────────────────────

/// Scanner unit for one family of marker files.
pub trait EcosystemProbe: Send + Sync {
    fn name(&self) -> &'static str;

    fn markers(&self) -> &'static [&'static str];

    fn is_present(&self, ctx: &ScanContext<'_>) -> bool {
        self.markers().iter().any(|m| ctx.has_file(m))
    }

    /// Classify the project, or `None` when the manifests are unusable.
    fn probe(&self, ctx: &mut ScanContext<'_>) -> Option<Detection>;
}

/// Probes in precedence order.
pub fn default_probes() -> Vec<Box<dyn EcosystemProbe>> {
    vec![
        Box::new(NodeProbe),
        Box::new(PythonProbe),
        Box::new(GoProbe),
        Box::new(RustProbe),
    ]
}

// ── Scanner ──────────────────────────────────────────────────────────────────

pub struct ProjectScanner {
    filesystem: Arc<dyn Filesystem>,
    guard: Arc<PathGuard>,
    probes: Vec<Box<dyn EcosystemProbe>>,
}

impl ProjectScanner {
    pub fn new(filesystem: Arc<dyn Filesystem>, guard: Arc<PathGuard>) -> Self {
        Self::with_probes(filesystem, guard, default_probes())
    }

    pub fn with_probes(
        filesystem: Arc<dyn Filesystem>,
        guard: Arc<PathGuard>,
        probes: Vec<Box<dyn EcosystemProbe>>,
    ) -> Self {
        Self {
            filesystem,
            guard,
            probes,
        }
    }

    /// Scan a directory. Read-only.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn scan(&self, path: &Path) -> PrimerResult<ProjectDescriptor> {
        if !self.filesystem.is_dir(path) {
            return Err(ApplicationError::PathNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let mut ctx = ScanContext::new(path, self.filesystem.as_ref(), self.guard.as_ref());
        let mut descriptor = ProjectDescriptor::unknown(path);
        let mut decided_by: Option<&'static str> = None;

        for probe in &self.probes {
            if !probe.is_present(&ctx) {
                continue;
            }
            if decided_by.is_some() {
                descriptor.secondary_ecosystems.push(probe.name().to_string());
                continue;
            }
            match probe.probe(&mut ctx) {
                Some(detection) => {
                    apply(&mut descriptor, detection);
                    decided_by = Some(probe.name());
                }
                None => {
                    debug!(probe = probe.name(), "Markers present but not classified");
                    descriptor.secondary_ecosystems.push(probe.name().to_string());
                }
            }
        }

        if decided_by.is_none() {
            descriptor.confidence = fallback_confidence(&ctx);
        }
        descriptor.warnings = ctx.into_warnings();

        info!(
            project_type = %descriptor.project_type,
            confidence = descriptor.confidence,
            ecosystem = decided_by.unwrap_or("none"),
            "Scan complete"
        );
        Ok(descriptor)
    }
}

fn apply(descriptor: &mut ProjectDescriptor, detection: Detection) {
    descriptor.project_type = detection.project_type;
    descriptor.confidence = detection.confidence;
    descriptor.framework = detection.framework;
    descriptor.dependencies = detection.dependencies;
    descriptor.has_tests = detection.test_framework.is_some();
    descriptor.test_framework = detection.test_framework;
    descriptor.package_manager = detection.package_manager;
}

fn fallback_confidence(ctx: &ScanContext<'_>) -> f64 {
    let mut confidence: f64 = 0.0;
    if ctx.has_dir("src") {
        confidence = confidence.max(0.30);
    }
    if ctx.has_dir(".git") {
        confidence = confidence.max(0.20);
    }
    confidence
}
