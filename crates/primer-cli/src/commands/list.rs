//! Implementation of the `primer list` command.

use std::sync::Arc;

use primer_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = super::template_store(&config)?;
    let service = TemplateService::new(Arc::new(store));
    let templates = service.list()?;

    // A global `--output-format json` means JSON regardless of `--format`.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for t in &templates {
                output.print(&format!(
                    "  {:<12} {:<20} {:<8} {}",
                    t.id, t.name, t.version, t.description
                ))?;
            }
        }
        ListFormat::Json => output.json(&templates)?,
        ListFormat::List => {
            for t in &templates {
                output.print(t.id.as_str())?;
            }
        }
        ListFormat::Csv => {
            output.print("id,name,version,required_sections")?;
            for t in &templates {
                output.print(&csv_row(t))?;
            }
        }
    }

    Ok(())
}

fn csv_row(t: &TemplateInfo) -> String {
    format!(
        "{},{},{},{}",
        csv_field(t.id.as_str()),
        csv_field(&t.name),
        csv_field(&t.version),
        t.required_sections
    )
}

/// Quote a field when it contains a separator, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
