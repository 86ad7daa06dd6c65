//! The scanner's view of a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::value_objects::{ProjectType, Router};

// ── Dependencies ─────────────────────────────────────────────────────────────

/// Dependency name to version, in manifest order.
///
/// Keys are unique. Inserting an existing key replaces its version without
/// moving it, so the first-seen position is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dependencies(Vec<(String, String)>);

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        let name = name.into();
        let version = version.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = version,
            None => self.0.push((name, version)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Dependencies {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut deps = Self::new();
        for (n, v) in iter {
            deps.insert(n, v);
        }
        deps
    }
}

// ── FrameworkInfo ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameworkInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Only set for Next.js projects.
    pub router: Option<Router>,
}

impl FrameworkInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }
}

// ── ProjectDescriptor ────────────────────────────────────────────────────────

/// Everything the scanner learned about a directory.
///
/// `confidence` is set by the single classification rule that decided
/// `project_type` and is never revised afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub project_type: ProjectType,
    pub framework: FrameworkInfo,
    pub dependencies: Dependencies,
    pub has_tests: bool,
    pub test_framework: Option<String>,
    pub package_manager: Option<String>,
    pub confidence: f64,
    pub project_path: PathBuf,
    pub scanned_at: DateTime<Utc>,
    /// Ecosystems whose marker files were present but lost on precedence.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_ecosystems: Vec<String>,
    /// Soft failures hit while scanning (malformed or unreadable manifests).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ProjectDescriptor {
    /// A descriptor for a directory nothing recognised.
    pub fn unknown(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_type: ProjectType::Unknown,
            framework: FrameworkInfo::default(),
            dependencies: Dependencies::new(),
            has_tests: false,
            test_framework: None,
            package_manager: None,
            confidence: 0.0,
            project_path: project_path.into(),
            scanned_at: Utc::now(),
            secondary_ecosystems: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Last path segment, or the full path when there is none.
    pub fn project_name(&self) -> String {
        self.project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.project_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_keep_first_position_on_overwrite() {
        let mut deps = Dependencies::new();
        deps.insert("react", "^18.0.0");
        deps.insert("vite", "^5.0.0");
        deps.insert("react", "^18.2.0");

        let names: Vec<_> = deps.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["react", "vite"]);
        assert_eq!(deps.get("react"), Some("^18.2.0"));
    }

    #[test]
    fn project_name_is_last_segment() {
        let d = ProjectDescriptor::unknown("/work/acme-web");
        assert_eq!(d.project_name(), "acme-web");
    }

    #[test]
    fn descriptor_serializes_dependencies_in_order() {
        let mut d = ProjectDescriptor::unknown("/p");
        d.dependencies = [("zeta", "1"), ("alpha", "2")].into_iter().collect();
        let json = serde_json::to_value(&d).unwrap();
        let first = &json["dependencies"][0];
        assert_eq!(first[0], "zeta");
    }
}
