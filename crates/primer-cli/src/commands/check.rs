//! `primer check` — run the secret detector over any file.
//!
//! Critical and High findings fail the command (exit 2). Medium findings,
//! reported only with `--strict`, are warnings. With `--redact` the cleaned
//! text goes to stdout and the command succeeds.

use std::fs;

use serde::Serialize;
use tracing::{info, instrument};

use primer_core::domain::{SecretFinding, SecretGuard};

use crate::{
    cli::CheckArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    file: String,
    blocking: usize,
    findings: &'a [SecretFinding],
}

#[instrument(skip_all, fields(file = %args.file.display(), strict = args.strict))]
pub fn execute(args: CheckArgs, output: OutputManager) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CliError::PathNotFound { path: args.file });
    }
    let content = fs::read_to_string(&args.file)
        .with_cli_context(|| format!("Failed to read '{}'", args.file.display()))?;

    let guard = SecretGuard::default();

    if args.redact {
        output.raw(&guard.redact_secrets(&content))?;
        return Ok(());
    }

    let findings = guard.detect_secrets(&content, args.strict);
    let blocking = findings.iter().filter(|f| f.severity.is_blocking()).count();
    info!(findings = findings.len(), blocking, "Secret scan finished");

    if output.is_json() {
        output.json(&CheckReport {
            file: args.file.display().to_string(),
            blocking,
            findings: &findings,
        })?;
    } else if findings.is_empty() {
        output.success(&format!("No secrets found in {}", args.file.display()))?;
    } else {
        for finding in &findings {
            if finding.severity.is_blocking() {
                output.error(&finding.describe())?;
            } else {
                output.warning(&finding.describe())?;
            }
        }
    }

    if blocking > 0 {
        return Err(CliError::SecretsFound {
            path: args.file,
            count: blocking,
        });
    }
    Ok(())
}
