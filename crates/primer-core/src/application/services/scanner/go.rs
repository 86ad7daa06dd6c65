//! Go ecosystem probe (`go.mod`).

use regex::Regex;
use std::sync::LazyLock;

use super::{Detection, EcosystemProbe, ScanContext};
use crate::domain::{Dependencies, FrameworkInfo, ProjectType};

static GO_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^go\s+([0-9][0-9A-Za-z.\-]*)\s*$").expect("valid regex literal")
});

/// `require` entries, single-line and block form, in file order.
pub fn go_requirements(go_mod: &str) -> Dependencies {
    let mut deps = Dependencies::new();
    let mut in_block = false;

    for raw in go_mod.lines() {
        let line = raw.split("//").next().unwrap_or("").trim();
        if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            push_requirement(&mut deps, line);
        } else if line == "require (" || line == "require(" {
            in_block = true;
        } else if let Some(rest) = line.strip_prefix("require ") {
            push_requirement(&mut deps, rest);
        }
    }
    deps
}

fn push_requirement(deps: &mut Dependencies, entry: &str) {
    let mut parts = entry.split_whitespace();
    if let (Some(module), Some(version)) = (parts.next(), parts.next()) {
        deps.insert(module, version);
    }
}

pub struct GoProbe;

impl EcosystemProbe for GoProbe {
    fn name(&self) -> &'static str {
        "go"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["go.mod"]
    }

    fn probe(&self, ctx: &mut ScanContext<'_>) -> Option<Detection> {
        let go_mod = ctx.read("go.mod")?;
        let version = GO_DIRECTIVE
            .captures(&go_mod)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let has_tests = ctx.files_under("", 6).iter().any(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with("_test.go"))
        });

        Some(Detection {
            project_type: ProjectType::Go,
            confidence: 0.85,
            framework: FrameworkInfo::named("Go").with_version(version),
            dependencies: go_requirements(&go_mod),
            test_framework: has_tests.then(|| "go test".to_string()),
            package_manager: Some("go modules".to_string()),
        })
    }
}
