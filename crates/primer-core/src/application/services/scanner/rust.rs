//! Rust ecosystem probe (`Cargo.toml`).

use toml::{Table, Value as Toml};

use super::{Detection, EcosystemProbe, ScanContext};
use crate::domain::{Dependencies, FrameworkInfo, ProjectType};

/// `[dependencies]` entries in manifest order.
pub fn cargo_dependencies(manifest: &Table) -> Dependencies {
    let mut deps = Dependencies::new();
    let Some(table) = manifest.get("dependencies").and_then(Toml::as_table) else {
        return deps;
    };
    for (name, spec) in table {
        let version = match spec {
            Toml::String(v) => v.clone(),
            Toml::Table(t) => t
                .get("version")
                .and_then(Toml::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    if t.contains_key("path") {
                        "path".to_string()
                    } else if t.contains_key("git") {
                        "git".to_string()
                    } else {
                        "*".to_string()
                    }
                }),
            _ => "*".to_string(),
        };
        deps.insert(name.as_str(), version);
    }
    deps
}

fn rust_version(manifest: &Table) -> Option<String> {
    manifest
        .get("package")
        .and_then(|p| p.get("rust-version"))
        .and_then(Toml::as_str)
        .map(str::to_string)
}

pub struct RustProbe;

impl EcosystemProbe for RustProbe {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn markers(&self) -> &'static [&'static str] {
        &["Cargo.toml"]
    }

    fn probe(&self, ctx: &mut ScanContext<'_>) -> Option<Detection> {
        let raw = ctx.read("Cargo.toml")?;
        let manifest: Table = match toml::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                ctx.warn(format!("Cargo.toml is not valid TOML: {}", e));
                return None;
            }
        };

        Some(Detection {
            project_type: ProjectType::Rust,
            confidence: 0.85,
            framework: FrameworkInfo::named("Rust").with_version(rust_version(&manifest)),
            dependencies: cargo_dependencies(&manifest),
            test_framework: ctx.has_dir("tests").then(|| "cargo test".to_string()),
            package_manager: Some("cargo".to_string()),
        })
    }
}
