//! Node ecosystem probe (`package.json`).

use serde_json::Value as Json;

use super::{ClassificationRule, Detection, EcosystemProbe, ScanContext, classify};
use crate::domain::{Dependencies, ProjectType, Router};

pub struct NodeFacts {
    pub dependencies: Dependencies,
    pub has_app_dir: bool,
    pub has_pages_dir: bool,
}

impl NodeFacts {
    fn has(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }
}

pub fn node_rules() -> Vec<ClassificationRule<NodeFacts>> {
    vec![
        ClassificationRule {
            project_type: ProjectType::Nextjs,
            confidence: 0.95,
            router: Some(Router::App),
            framework: Some("Next.js"),
            version_from: Some("next"),
            matches: |f| f.has("next") && f.has_app_dir,
        },
        ClassificationRule {
            project_type: ProjectType::Nextjs,
            confidence: 0.90,
            router: Some(Router::Pages),
            framework: Some("Next.js"),
            version_from: Some("next"),
            matches: |f| f.has("next") && f.has_pages_dir,
        },
        ClassificationRule {
            project_type: ProjectType::Nextjs,
            confidence: 0.85,
            router: Some(Router::Unknown),
            framework: Some("Next.js"),
            version_from: Some("next"),
            matches: |f| f.has("next"),
        },
        ClassificationRule {
            project_type: ProjectType::ReactVite,
            confidence: 0.90,
            router: None,
            framework: Some("React"),
            version_from: Some("react"),
            matches: |f| f.has("react") && (f.has("vite") || f.has("@vitejs/plugin-react")),
        },
        ClassificationRule {
            project_type: ProjectType::React,
            confidence: 0.85,
            router: None,
            framework: Some("React"),
            version_from: Some("react"),
            matches: |f| f.has("react") && f.has("react-scripts"),
        },
        ClassificationRule {
            project_type: ProjectType::Vite,
            confidence: 0.70,
            router: None,
            framework: Some("Vite"),
            version_from: Some("vite"),
            matches: |f| f.has("vite"),
        },
        ClassificationRule {
            project_type: ProjectType::Nodejs,
            confidence: 0.60,
            router: None,
            framework: None,
            version_from: None,
            matches: |_| true,
        },
    ]
}

const LOCKFILES: &[(&str, &str)] = &[
    ("pnpm-lock.yaml", "pnpm"),
    ("yarn.lock", "yarn"),
    ("bun.lockb", "bun"),
    ("bun.lock", "bun"),
    ("package-lock.json", "npm"),
];

const TEST_DEPENDENCIES: &[(&str, &str)] = &[
    ("vitest", "vitest"),
    ("jest", "jest"),
    ("@playwright/test", "playwright"),
];

pub struct NodeProbe;

impl NodeProbe {
    /// `dependencies` then `devDependencies`, in manifest order.
    fn dependencies(manifest: &Json) -> Dependencies {
        let mut deps = Dependencies::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(table) = manifest.get(section).and_then(Json::as_object) {
                for (name, version) in table {
                    let version = version.as_str().unwrap_or("*");
                    deps.insert(name.as_str(), version);
                }
            }
        }
        deps
    }

    fn test_framework(ctx: &ScanContext<'_>, deps: &Dependencies) -> Option<String> {
        if let Some((_, name)) = TEST_DEPENDENCIES.iter().find(|(dep, _)| deps.contains(dep)) {
            return Some((*name).to_string());
        }
        let has_test_files = ctx.files_under("tests", 8).iter().any(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy())
                .is_some_and(|n| n.contains(".test.") || n.contains(".spec."))
        });
        has_test_files.then(|| "custom".to_string())
    }

    fn package_manager(ctx: &ScanContext<'_>) -> String {
        LOCKFILES
            .iter()
            .find(|(file, _)| ctx.has_file(file))
            .map_or("npm", |(_, pm)| *pm)
            .to_string()
    }
}

impl EcosystemProbe for NodeProbe {
    fn name(&self) -> &'static str {
        "node"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["package.json"]
    }

    fn probe(&self, ctx: &mut ScanContext<'_>) -> Option<Detection> {
        let raw = ctx.read("package.json")?;
        let manifest: Json = match serde_json::from_str(&raw) {
            Ok(json) => json,
            Err(e) => {
                ctx.warn(format!("package.json is not valid JSON: {}", e));
                return None;
            }
        };

        let facts = NodeFacts {
            dependencies: Self::dependencies(&manifest),
            has_app_dir: ctx.has_dir("app") || ctx.has_dir("src/app"),
            has_pages_dir: ctx.has_dir("pages") || ctx.has_dir("src/pages"),
        };

        let rules = node_rules();
        let rule = classify(&rules, &facts)?;
        let test_framework = Self::test_framework(ctx, &facts.dependencies);
        let mut detection = Detection::from_rule(rule, facts.dependencies);
        detection.test_framework = test_framework;
        detection.package_manager = Some(Self::package_manager(ctx));
        Some(detection)
    }
}
