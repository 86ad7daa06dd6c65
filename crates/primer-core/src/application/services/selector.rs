//! Template Selector - maps a scanned project to a template and its
//! initial placeholder values.

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{ProjectDescriptor, ProjectType, Router, SelectionResult, TemplateId, Value, Variables},
    error::PrimerResult,
};

const MAX_LISTED_DEPENDENCIES: usize = 10;

/// Substrings of dependency names left out of the `DEPENDENCIES` list.
const TOOLING_MARKERS: &[&str] = &["@types/", "eslint", "prettier", "typescript"];

/// Default Vite dev server port.
const VITE_HMR_PORT: u16 = 5173;

/// Template for each project type.
pub fn template_for(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Nextjs => "nextjs",
        ProjectType::ReactVite | ProjectType::React | ProjectType::Vite => "react",
        ProjectType::Fastapi | ProjectType::Python => "fastapi",
        ProjectType::Django | ProjectType::Flask => "django",
        ProjectType::Go | ProjectType::Rust => "go",
        ProjectType::Nodejs | ProjectType::Unknown => TemplateId::GENERIC,
    }
}

/// `name (version)` for the first ten non-tooling dependencies.
pub fn dependency_summary(descriptor: &ProjectDescriptor) -> String {
    descriptor
        .dependencies
        .iter()
        .filter(|(name, _)| !TOOLING_MARKERS.iter().any(|m| name.contains(m)))
        .take(MAX_LISTED_DEPENDENCIES)
        .map(|(name, version)| format!("{} ({})", name, version))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct TemplateSelector {
    store: Arc<dyn TemplateStore>,
}

impl TemplateSelector {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Pick a template and build the scan-derived variables.
    ///
    /// Falls back to `generic` with a warning when the mapped template is
    /// missing; fails with `TemplatesMissing` when `generic` is missing too.
    #[instrument(skip_all, fields(project_type = %descriptor.project_type))]
    pub fn select(&self, descriptor: &ProjectDescriptor) -> PrimerResult<SelectionResult> {
        let requested = TemplateId::new(template_for(descriptor.project_type));
        let mut warnings = Vec::new();

        let template_id = if self.store.contains(&requested) {
            requested
        } else if self.store.contains(&TemplateId::generic()) {
            warn!(template = %requested, "Template not found, using generic");
            warnings.push(format!(
                "Template '{}' is not available; using '{}' instead",
                requested,
                TemplateId::GENERIC
            ));
            TemplateId::generic()
        } else {
            return Err(ApplicationError::TemplatesMissing {
                requested: requested.to_string(),
            }
            .into());
        };

        let variables = Self::variables(descriptor);
        debug!(template = %template_id, count = variables.len(), "Template selected");

        Ok(SelectionResult {
            template_id,
            variables,
            descriptor: descriptor.clone(),
            warnings,
        })
    }

    fn variables(descriptor: &ProjectDescriptor) -> Variables {
        let mut vars = Variables::new();
        let framework = &descriptor.framework;

        vars.set("PROJECT_NAME", descriptor.project_name());
        vars.set("PROJECT_TYPE", descriptor.project_type.as_str());
        vars.set("FRAMEWORK_NAME", Value::opt_string(framework.name.clone()));
        vars.set("FRAMEWORK_VERSION", Value::opt_string(framework.version.clone()));
        vars.set(
            "PACKAGE_MANAGER",
            Value::opt_string(descriptor.package_manager.clone()),
        );
        vars.set(
            "TEST_FRAMEWORK",
            Value::opt_string(descriptor.test_framework.clone()),
        );
        vars.set("ROUTER", Value::opt_string(framework.router.map(|r| r.as_str())));
        vars.set(
            "PROJECT_PATH",
            descriptor.project_path.display().to_string(),
        );
        vars.set(
            "GENERATION_DATE",
            Local::now().format("%Y-%m-%d").to_string(),
        );
        vars.set("HAS_TESTS", descriptor.has_tests);
        vars.set("CONFIDENCE", descriptor.confidence);
        vars.set("DEPENDENCIES", dependency_summary(descriptor));

        match descriptor.project_type {
            ProjectType::Nextjs => {
                vars.set("SUPPORTS_SSR", true);
                vars.set("APP_ROUTER", framework.router == Some(Router::App));
            }
            ty if ty.uses_vite() => {
                vars.set("HMR_PORT", VITE_HMR_PORT);
            }
            ProjectType::Fastapi | ProjectType::Python => {
                vars.set("ASYNC_FIRST", true);
            }
            _ => {}
        }

        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateStore;
    use crate::domain::{Dependencies, FrameworkInfo};
    use mockall::predicate::eq;

    fn nextjs_descriptor() -> ProjectDescriptor {
        let mut d = ProjectDescriptor::unknown("/work/shop");
        d.project_type = ProjectType::Nextjs;
        d.confidence = 0.95;
        d.framework = FrameworkInfo::named("Next.js")
            .with_version(Some("14.1.0".into()))
            .with_router(Router::App);
        d.package_manager = Some("pnpm".into());
        d
    }

    fn store_with(ids: &'static [&'static str]) -> Arc<dyn TemplateStore> {
        let mut store = MockTemplateStore::new();
        store
            .expect_contains()
            .returning(move |id| ids.iter().any(|known| *known == id.as_str()));
        Arc::new(store)
    }

    #[test]
    fn template_table() {
        assert_eq!(template_for(ProjectType::ReactVite), "react");
        assert_eq!(template_for(ProjectType::Vite), "react");
        assert_eq!(template_for(ProjectType::Python), "fastapi");
        assert_eq!(template_for(ProjectType::Flask), "django");
        assert_eq!(template_for(ProjectType::Rust), "go");
        assert_eq!(template_for(ProjectType::Nodejs), "generic");
        assert_eq!(template_for(ProjectType::Unknown), "generic");
    }

    #[test]
    fn nextjs_variables() {
        let selector = TemplateSelector::new(store_with(&["nextjs", "generic"]));
        let result = selector.select(&nextjs_descriptor()).unwrap();

        assert_eq!(result.template_id.as_str(), "nextjs");
        assert!(result.warnings.is_empty());
        let v = &result.variables;
        assert_eq!(v.get("PROJECT_NAME"), Some(&Value::from("shop")));
        assert_eq!(v.get("FRAMEWORK_VERSION"), Some(&Value::from("14.1.0")));
        assert_eq!(v.get("ROUTER"), Some(&Value::from("app")));
        assert_eq!(v.get("TEST_FRAMEWORK"), Some(&Value::Null));
        assert_eq!(v.get("CONFIDENCE").map(Value::to_text), Some("0.95".into()));
        assert!(v.is_truthy("SUPPORTS_SSR"));
        assert!(v.is_truthy("APP_ROUTER"));
        assert!(!v.contains("HMR_PORT"));
    }

    #[test]
    fn vite_gets_hmr_port() {
        let mut d = ProjectDescriptor::unknown("/p");
        d.project_type = ProjectType::ReactVite;
        let selector = TemplateSelector::new(store_with(&["react"]));
        let result = selector.select(&d).unwrap();
        assert_eq!(
            result.variables.get("HMR_PORT").map(Value::to_text),
            Some("5173".into())
        );
    }

    #[test]
    fn falls_back_to_generic_with_warning() {
        let selector = TemplateSelector::new(store_with(&["generic"]));
        let result = selector.select(&nextjs_descriptor()).unwrap();
        assert_eq!(result.template_id, TemplateId::generic());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("nextjs"));
    }

    #[test]
    fn no_templates_is_fatal() {
        let selector = TemplateSelector::new(store_with(&[]));
        let err = selector.select(&nextjs_descriptor()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PrimerError::Application(ApplicationError::TemplatesMissing { .. })
        ));
    }

    #[test]
    fn dependency_summary_filters_and_caps() {
        let mut d = ProjectDescriptor::unknown("/p");
        let mut deps = Dependencies::new();
        deps.insert("@types/node", "^20");
        deps.insert("eslint-config-next", "14");
        for i in 0..12 {
            deps.insert(format!("dep{}", i), format!("{}.0.0", i));
        }
        deps.insert("typescript", "^5");
        d.dependencies = deps;

        let summary = dependency_summary(&d);
        assert!(summary.starts_with("dep0 (0.0.0), dep1 (1.0.0)"));
        assert!(summary.ends_with("dep9 (9.0.0)"));
        assert!(!summary.contains("eslint"));
        assert!(!summary.contains("dep10"));
        assert_eq!(summary.matches(", ").count(), 9);
    }

    #[test]
    fn lookups_use_requested_id() {
        let mut store = MockTemplateStore::new();
        store
            .expect_contains()
            .with(eq(TemplateId::new("go")))
            .times(1)
            .return_const(true);
        let mut d = ProjectDescriptor::unknown("/p");
        d.project_type = ProjectType::Rust;

        let result = TemplateSelector::new(Arc::new(store)).select(&d).unwrap();
        assert_eq!(result.template_id.as_str(), "go");
    }
}
