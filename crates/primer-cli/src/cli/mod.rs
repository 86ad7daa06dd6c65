//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use primer_core::domain::{CodeStyle, Focus};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "primer",
    bin_name = "primer",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate agent context documents for an existing project",
    long_about = "Primer inspects a project's manifests, picks a matching template, \
                  and writes AGENTS.md (and CONVENTIONS.md) with secret scanning \
                  and automatic backups.",
    after_help = "EXAMPLES:\n\
        \x20 primer generate\n\
        \x20 primer generate ./web --focus security --dry-run\n\
        \x20 primer scan ./api --output-format json\n\
        \x20 primer check AGENTS.md --redact",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a project and write its context documents.
    #[command(
        visible_alias = "g",
        about = "Generate AGENTS.md for a project",
        after_help = "EXAMPLES:\n\
            \x20 primer generate\n\
            \x20 primer generate ../api --style oop --no-secondary\n\
            \x20 primer generate --deps react,zod --var TEAM=platform --yes"
    )]
    Generate(GenerateArgs),

    /// Print what the scanner detects.
    #[command(
        about = "Detect the project type without writing anything",
        after_help = "EXAMPLES:\n\
            \x20 primer scan\n\
            \x20 primer scan ./service --output-format json"
    )]
    Scan(ScanArgs),

    /// Run the secret detector over a file.
    #[command(
        about = "Check a file for secrets",
        after_help = "EXAMPLES:\n\
            \x20 primer check AGENTS.md\n\
            \x20 primer check notes.md --strict --redact > notes.clean.md"
    )]
    Check(CheckArgs),

    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 primer list\n\
            \x20 primer list --format json"
    )]
    List(ListArgs),

    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 primer init           # user config directory\n\
            \x20 primer init --local   # .primer.toml in the current directory"
    )]
    Init(InitArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 primer completions bash > ~/.local/share/bash-completion/completions/primer\n\
            \x20 primer completions zsh  > ~/.zfunc/_primer\n\
            \x20 primer completions fish > ~/.config/fish/completions/primer.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 primer config get defaults.code_style\n\
            \x20 primer config set security.strict true\n\
            \x20 primer config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project directory.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    #[arg(
        short = 'd',
        long = "description",
        value_name = "TEXT",
        help = "One-line project description"
    )]
    pub description: Option<String>,

    #[arg(long = "style", value_enum, help = "Preferred code style")]
    pub style: Option<StyleArg>,

    #[arg(long = "focus", value_enum, help = "Area to emphasise")]
    pub focus: Option<FocusArg>,

    /// Only write AGENTS.md.
    #[arg(long = "no-secondary", help = "Do not write CONVENTIONS.md")]
    pub no_secondary: bool,

    /// Replaces the detected dependency list.
    #[arg(
        long = "deps",
        value_name = "LIST",
        value_delimiter = ',',
        help = "Comma-separated dependency list"
    )]
    pub deps: Vec<String>,

    /// Extra template variables.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_key_val,
        help = "Set a template variable (repeatable)"
    )]
    pub vars: Vec<(String, String)>,

    /// Medium-severity secret findings become warnings.
    #[arg(long = "strict", help = "Also report medium-severity findings")]
    pub strict: bool,

    #[arg(long = "dry-run", help = "Render and validate without writing")]
    pub dry_run: bool,

    #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
    pub yes: bool,
}

/// Split `KEY=VALUE` at the first `=`.
fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

// ── scan / check ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(value_name = "FILE", help = "File to scan")]
    pub file: PathBuf,

    #[arg(long = "strict", help = "Also report medium-severity findings")]
    pub strict: bool,

    /// Print the file with every finding replaced by a redaction token.
    #[arg(long = "redact", help = "Print a redacted copy to stdout")]
    pub redact: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.primer.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.focus`.
        key: String,
    },
    /// Set a configuration key and save the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StyleArg {
    #[value(alias = "fp")]
    Functional,
    Oop,
    Mixed,
}

impl From<StyleArg> for CodeStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Functional => Self::Functional,
            StyleArg::Oop => Self::Oop,
            StyleArg::Mixed => Self::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FocusArg {
    None,
    Security,
    #[value(alias = "perf")]
    Performance,
    #[value(alias = "a11y")]
    Accessibility,
}

impl From<FocusArg> for Focus {
    fn from(arg: FocusArg) -> Self {
        match arg {
            FocusArg::None => Self::None,
            FocusArg::Security => Self::Security,
            FocusArg::Performance => Self::Performance,
            FocusArg::Accessibility => Self::Accessibility,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_with_every_flag() {
        let cli = Cli::parse_from([
            "primer",
            "generate",
            "./web",
            "--description",
            "Storefront",
            "--style",
            "oop",
            "--focus",
            "a11y",
            "--no-secondary",
            "--deps",
            "react,zod",
            "--var",
            "TEAM=web=platform",
            "--strict",
            "--dry-run",
            "--yes",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.path, PathBuf::from("./web"));
        assert_eq!(args.style, Some(StyleArg::Oop));
        assert_eq!(args.focus, Some(FocusArg::Accessibility));
        assert_eq!(args.deps, vec!["react", "zod"]);
        assert_eq!(args.vars, vec![("TEAM".into(), "web=platform".into())]);
        assert!(args.no_secondary && args.strict && args.dry_run && args.yes);
    }

    #[test]
    fn generate_defaults_to_current_dir() {
        let cli = Cli::parse_from(["primer", "g"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.deps.is_empty());
    }

    #[test]
    fn var_without_equals_is_rejected() {
        let result = Cli::try_parse_from(["primer", "generate", "--var", "TEAM"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_key_val_rejects_empty_key() {
        assert!(parse_key_val("=x").is_err());
        assert_eq!(parse_key_val("A=").unwrap(), ("A".into(), String::new()));
    }

    #[test]
    fn style_and_focus_map_to_domain() {
        assert_eq!(CodeStyle::from(StyleArg::Mixed), CodeStyle::Mixed);
        assert_eq!(Focus::from(FocusArg::Performance), Focus::Performance);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["primer", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
