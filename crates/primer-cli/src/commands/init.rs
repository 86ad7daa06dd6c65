//! `primer init` — create a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let config_path = target_path(&args, &global);

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = render_default()?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(&config_path, &toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    Ok(())
}

/// `--config` wins, then `--local`, then the user config directory.
fn target_path(args: &InitArgs, global: &GlobalArgs) -> PathBuf {
    match (&global.config, args.local) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from(LOCAL_CONFIG_FILE),
        (None, false) => AppConfig::config_path(),
    }
}

fn render_default() -> CliResult<String> {
    let body = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })?;
    Ok(format!(
        "# Primer configuration. Environment variables such as\n\
         # PRIMER__SECURITY__STRICT=true override these values.\n\n{body}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config,
            output_format: OutputFormat::Plain,
        }
    }

    #[test]
    fn explicit_config_path_wins() {
        let args = InitArgs {
            local: true,
            force: false,
        };
        let path = target_path(&args, &global(Some(PathBuf::from("/tmp/p.toml"))));
        assert_eq!(path, PathBuf::from("/tmp/p.toml"));
        assert_eq!(
            target_path(&args, &global(None)),
            PathBuf::from(LOCAL_CONFIG_FILE)
        );
    }

    #[test]
    fn default_file_parses_back() {
        let raw = render_default().unwrap();
        assert!(raw.starts_with("# Primer configuration"));
        let parsed: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
