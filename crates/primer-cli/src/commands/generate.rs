//! Implementation of the `primer generate` command.
//!
//! Responsibility: translate CLI arguments and config defaults into a
//! `GenerationRequest`, run the core pipeline, and display the report. No
//! business logic lives here.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use primer_adapters::{LocalFilesystem, MarkerRenderer};
use primer_core::{
    application::{GenerateService, GenerationRequest},
    domain::{GenerationReport, Preferences, ProjectDescriptor, Variables},
};

use crate::{
    cli::GenerateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `primer generate`.
///
/// 1. Merge config defaults with flags into `Preferences`
/// 2. Show what was detected and confirm (unless `--yes`, `--dry-run`,
///    `--quiet`, JSON output, or no terminal)
/// 3. Run the pipeline
/// 4. Report, mapping an unsuccessful report to an error exit
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: GenerateArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let target_dir = super::resolve_dir(&args.path);
    let preferences = build_preferences(&args, &config)?;
    let strict = args.strict || config.security.strict;

    let store = super::template_store(&config)?;
    let service = GenerateService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(store),
        Arc::new(MarkerRenderer::new()),
    )?;

    if needs_confirmation(&args, &output) {
        let descriptor = service.scan(&target_dir)?;
        show_detection(&descriptor, &output)?;
        if !confirm(&service, &args)? {
            return Err(CliError::Cancelled);
        }
    }

    let request = GenerationRequest::new(&target_dir)
        .preferences(preferences)
        .dry_run(args.dry_run)
        .strict(strict);

    let spinner = output.spinner("Generating context documents...");
    let result = service.run(request);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let report = result?;

    info!(run_id = %report.run_id, success = report.success, "Generation finished");

    if output.is_json() {
        output.json(&report)?;
    } else {
        show_report(&report, &output)?;
    }

    if report.success {
        Ok(())
    } else if !report.validated {
        Err(CliError::ValidationFailed {
            errors: report.errors,
        })
    } else {
        Err(CliError::WriteFailed {
            errors: report.errors,
        })
    }
}

/// Config defaults first, then every flag the user passed.
fn build_preferences(args: &GenerateArgs, config: &AppConfig) -> CliResult<Preferences> {
    let mut preferences = config.preferences();

    if let Some(description) = &args.description {
        preferences = preferences.with_description(description.clone());
    }
    if let Some(style) = args.style {
        preferences = preferences.with_code_style(style.into());
    }
    if let Some(focus) = args.focus {
        preferences = preferences.with_focus(focus.into());
    }
    if args.no_secondary {
        preferences = preferences.with_secondary(false);
    }
    if !args.deps.is_empty() {
        let deps = args
            .deps
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        preferences = preferences.with_dependencies(deps);
    }

    if !args.vars.is_empty() {
        let mut extra = Variables::new();
        for (key, value) in &args.vars {
            extra
                .try_set(key.clone(), value.as_str())
                .map_err(|e| CliError::InvalidInput {
                    message: format!("--var {key}: {e}"),
                    source: Some(Box::new(e)),
                })?;
        }
        preferences = preferences.with_extra(extra);
    }

    debug!(?preferences, "Preferences resolved");
    Ok(preferences)
}

fn needs_confirmation(args: &GenerateArgs, output: &OutputManager) -> bool {
    use std::io::IsTerminal as _;

    !args.yes
        && !args.dry_run
        && !output.is_quiet()
        && !output.is_json()
        && std::io::stdin().is_terminal()
}

fn show_detection(descriptor: &ProjectDescriptor, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Project '{}'", descriptor.project_name()))?;
    output.field("Type", descriptor.project_type.as_str())?;
    if let Some(name) = &descriptor.framework.name {
        let version = descriptor.framework.version.as_deref().unwrap_or("unknown");
        output.field("Framework", &format!("{name} {version}"))?;
    }
    output.field("Confidence", &format!("{:.2}", descriptor.confidence))?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm(service: &GenerateService, args: &GenerateArgs) -> CliResult<bool> {
    let names = service.output_names();
    let prompt = format!(
        "Write {} into {}? Existing files are backed up first",
        names.primary,
        args.path.display()
    );
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "Confirmation prompt failed".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_service: &GenerateService, _args: &GenerateArgs) -> CliResult<bool> {
    debug!("Built without the interactive feature; proceeding without a prompt");
    Ok(true)
}

fn show_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    for warning in &report.warnings {
        output.warning(warning)?;
    }

    if !report.success {
        for error in &report.errors {
            output.error(error)?;
        }
        return Ok(());
    }

    if report.dry_run {
        output.info(&format!(
            "Dry run: template '{}' for a {} project; nothing was written",
            report.template_id, report.project_type
        ))?;
        if let Some(preview) = &report.preview {
            output.print("")?;
            output.print(preview)?;
        }
        return Ok(());
    }

    for file in &report.written_files {
        output.success(&format!("Wrote {file}"))?;
    }
    for backup in &report.backup_files {
        output.info(&format!("Backed up previous version to {backup}"))?;
    }
    if report.ignore_updated {
        output.info("Added backup patterns to .gitignore")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use primer_core::domain::{CodeStyle, Focus, Value};

    fn parse(extra: &[&str]) -> GenerateArgs {
        let mut argv = vec!["primer", "generate"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Generate(args) => args,
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn flags_override_config_defaults() {
        let mut config = AppConfig::default();
        config.defaults.focus = Focus::Security;
        config.defaults.code_style = CodeStyle::Mixed;

        let prefs = build_preferences(&parse(&["--style", "oop"]), &config).unwrap();
        assert_eq!(prefs.code_style, CodeStyle::Oop);
        assert_eq!(prefs.focus, Focus::Security);
        assert!(prefs.generate_secondary);
    }

    #[test]
    fn deps_and_vars_become_preferences() {
        let args = parse(&[
            "--deps",
            "react, zod,",
            "--var",
            "TEAM=platform",
            "--no-secondary",
        ]);
        let prefs = build_preferences(&args, &AppConfig::default()).unwrap();
        assert_eq!(
            prefs.dependencies_override,
            Some(vec!["react".to_string(), "zod".to_string()])
        );
        assert_eq!(prefs.extra.get("TEAM"), Some(&Value::from("platform")));
        assert!(!prefs.generate_secondary);
    }

    #[test]
    fn invalid_variable_name_is_user_error() {
        let args = parse(&["--var", "team-name=x"]);
        let err = build_preferences(&args, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn yes_and_dry_run_skip_confirmation() {
        let global = crate::cli::GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: true,
            config: None,
            output_format: crate::cli::OutputFormat::Plain,
        };
        let output = OutputManager::new(&global, &AppConfig::default());
        assert!(!needs_confirmation(&parse(&["--yes"]), &output));
        assert!(!needs_confirmation(&parse(&["--dry-run"]), &output));
    }
}
