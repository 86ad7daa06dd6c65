//! Python ecosystem probe.
//!
//! Manifests are matched as raw text: every marker file that can be read is
//! concatenated and searched with case-sensitive substrings.

use regex::Regex;

use super::{ClassificationRule, Detection, EcosystemProbe, ScanContext, classify};
use crate::domain::{Dependencies, ProjectType};

const MARKERS: &[&str] = &["pyproject.toml", "requirements.txt", "setup.py", "Pipfile"];

const LOCKFILES: &[(&str, &str)] = &[
    ("uv.lock", "uv"),
    ("poetry.lock", "poetry"),
    ("Pipfile.lock", "pipenv"),
    ("requirements.txt", "pip"),
];

pub struct PythonFacts {
    pub text: String,
    pub has_apps_dir: bool,
}

impl PythonFacts {
    fn mentions(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

pub fn python_rules() -> Vec<ClassificationRule<PythonFacts>> {
    vec![
        ClassificationRule {
            project_type: ProjectType::Fastapi,
            confidence: 0.90,
            router: None,
            framework: Some("FastAPI"),
            version_from: Some("fastapi"),
            matches: |f| f.mentions("fastapi"),
        },
        ClassificationRule {
            project_type: ProjectType::Django,
            confidence: 0.95,
            router: None,
            framework: Some("Django"),
            version_from: Some("django"),
            matches: |f| f.mentions("django") && f.has_apps_dir,
        },
        ClassificationRule {
            project_type: ProjectType::Django,
            confidence: 0.90,
            router: None,
            framework: Some("Django"),
            version_from: Some("django"),
            matches: |f| f.mentions("django"),
        },
        ClassificationRule {
            project_type: ProjectType::Flask,
            confidence: 0.85,
            router: None,
            framework: Some("Flask"),
            version_from: Some("flask"),
            matches: |f| f.mentions("flask"),
        },
        ClassificationRule {
            project_type: ProjectType::Python,
            confidence: 0.70,
            router: None,
            framework: Some("Python"),
            version_from: None,
            matches: |_| true,
        },
    ]
}

/// Loose version constraint after a package name, e.g. `fastapi>=0.110`,
/// `fastapi = "^0.110.0"` or `fastapi[all]==0.110.1`.
pub fn constraint_version(text: &str, package: &str) -> Option<String> {
    let pattern = format!(
        r#"(?m)\b{}(?:\[[^\]]*\])?\s*(?:==|>=|~=|<=|=|>|<|\^|~)?\s*["']?[\^~>=<]*\s*v?([0-9]+(?:\.[0-9A-Za-z]+)*)"#,
        regex::escape(package)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `name==version` lines of a requirements file, in order.
fn requirements(text: &str) -> Dependencies {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .map(|line| {
            let split = line
                .find(|c: char| matches!(c, '=' | '>' | '<' | '~' | '!' | '[' | ';' | ' '))
                .unwrap_or(line.len());
            let (name, rest) = line.split_at(split);
            let version = constraint_version(line, name).unwrap_or_else(|| {
                if rest.trim().is_empty() { "*".to_string() } else { rest.trim().to_string() }
            });
            (name.to_string(), version)
        })
        .collect()
}

pub struct PythonProbe;

impl EcosystemProbe for PythonProbe {
    fn name(&self) -> &'static str {
        "python"
    }

    fn markers(&self) -> &'static [&'static str] {
        MARKERS
    }

    fn probe(&self, ctx: &mut ScanContext<'_>) -> Option<Detection> {
        let mut text = String::new();
        let mut dependencies = Dependencies::new();
        let mut read_any = false;

        for marker in MARKERS {
            if let Some(content) = ctx.read(marker) {
                if *marker == "requirements.txt" {
                    dependencies = requirements(&content);
                }
                text.push_str(&content);
                text.push('\n');
                read_any = true;
            }
        }
        if !read_any {
            return None;
        }

        let facts = PythonFacts {
            text,
            has_apps_dir: ctx.has_dir("apps"),
        };
        let rules = python_rules();
        let rule = classify(&rules, &facts)?;

        let mut detection = Detection::from_rule(rule, dependencies);
        if let Some(package) = rule.version_from {
            if detection.framework.version.is_none() {
                detection.framework.version = constraint_version(&facts.text, package);
            }
        }
        detection.test_framework = if facts.mentions("pytest") {
            Some("pytest".to_string())
        } else if facts.mentions("unittest") {
            Some("unittest".to_string())
        } else {
            None
        };
        detection.package_manager = Some(
            LOCKFILES
                .iter()
                .find(|(file, _)| ctx.has_file(file))
                .map_or("pip", |(_, pm)| *pm)
                .to_string(),
        );
        Some(detection)
    }
}
