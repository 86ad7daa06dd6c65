//! `primer scan` — print the detected project descriptor.

use std::sync::Arc;

use tracing::instrument;

use primer_adapters::{InMemoryStore, LocalFilesystem, MarkerRenderer};
use primer_core::{application::GenerateService, domain::ProjectDescriptor};

use crate::{cli::ScanArgs, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: ScanArgs, output: OutputManager) -> CliResult<()> {
    // Scanning never consults templates, so an empty store suffices.
    let service = GenerateService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(InMemoryStore::new()),
        Arc::new(MarkerRenderer::new()),
    )?;
    let descriptor = service.scan(&super::resolve_dir(&args.path))?;

    if output.is_json() {
        output.json(&descriptor)?;
    } else {
        print_descriptor(&descriptor, &output)?;
    }
    Ok(())
}

fn print_descriptor(descriptor: &ProjectDescriptor, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Project '{}'", descriptor.project_name()))?;
    output.field("Path", &descriptor.project_path.display().to_string())?;
    output.field("Type", descriptor.project_type.as_str())?;
    output.field("Confidence", &format!("{:.2}", descriptor.confidence))?;

    if let Some(name) = &descriptor.framework.name {
        output.field("Framework", name)?;
    }
    if let Some(version) = &descriptor.framework.version {
        output.field("Version", version)?;
    }
    if let Some(router) = descriptor.framework.router {
        output.field("Router", router.as_str())?;
    }
    if let Some(manager) = &descriptor.package_manager {
        output.field("Package manager", manager)?;
    }

    let tests = match (&descriptor.test_framework, descriptor.has_tests) {
        (Some(framework), _) => framework.clone(),
        (None, true) => "yes".into(),
        (None, false) => "none detected".into(),
    };
    output.field("Tests", &tests)?;

    if !descriptor.dependencies.is_empty() {
        let names: Vec<&str> = descriptor.dependencies.iter().map(|(name, _)| name).collect();
        output.field("Dependencies", &names.join(", "))?;
    }
    if !descriptor.secondary_ecosystems.is_empty() {
        output.field("Also found", &descriptor.secondary_ecosystems.join(", "))?;
    }
    for warning in &descriptor.warnings {
        output.warning(warning)?;
    }
    Ok(())
}
