//! Domain value objects: ProjectType, Router, CodeStyle, Focus, Severity.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Each carries its canonical string form (`as_str`), a `Display` impl that
//! writes exactly that form, and a `FromStr` parser for CLI and config input.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Wire it into the scanner rule tables and the selector's template table

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProjectType ──────────────────────────────────────────────────────────────

/// The kind of project the scanner recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Nextjs,
    ReactVite,
    React,
    Vite,
    Fastapi,
    Django,
    Flask,
    Python,
    Go,
    Rust,
    Nodejs,
    Unknown,
}

impl ProjectType {
    pub const ALL: [ProjectType; 12] = [
        Self::Nextjs,
        Self::ReactVite,
        Self::React,
        Self::Vite,
        Self::Fastapi,
        Self::Django,
        Self::Flask,
        Self::Python,
        Self::Go,
        Self::Rust,
        Self::Nodejs,
        Self::Unknown,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nextjs => "nextjs",
            Self::ReactVite => "react-vite",
            Self::React => "react",
            Self::Vite => "vite",
            Self::Fastapi => "fastapi",
            Self::Django => "django",
            Self::Flask => "flask",
            Self::Python => "python",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Nodejs => "nodejs",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the project runs on the Vite dev server.
    pub const fn uses_vite(self) -> bool {
        matches!(self, Self::ReactVite | Self::Vite)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or(DomainError::UnknownValue {
                field: "project type",
                value: s.to_string(),
            })
    }
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Next.js routing flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Router {
    App,
    Pages,
    Unknown,
}

impl Router {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Pages => "pages",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CodeStyle ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStyle {
    #[default]
    Functional,
    Oop,
    Mixed,
}

impl CodeStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::Oop => "oop",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for CodeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "functional" | "fp" => Ok(Self::Functional),
            "oop" | "object-oriented" => Ok(Self::Oop),
            "mixed" => Ok(Self::Mixed),
            _ => Err(DomainError::UnknownValue {
                field: "code style",
                value: s.to_string(),
            }),
        }
    }
}

// ── Focus ────────────────────────────────────────────────────────────────────

/// Area the generated context document should emphasise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    #[default]
    None,
    Security,
    Performance,
    Accessibility,
}

impl Focus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Accessibility => "accessibility",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Focus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "security" => Ok(Self::Security),
            "performance" | "perf" => Ok(Self::Performance),
            "accessibility" | "a11y" => Ok(Self::Accessibility),
            _ => Err(DomainError::UnknownValue {
                field: "focus",
                value: s.to_string(),
            }),
        }
    }
}

// ── Severity ─────────────────────────────────────────────────────────────────

/// Severity of a secret finding. Ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
        }
    }

    /// Critical and High findings block output.
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PathOperation ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathOperation {
    Read,
    Write,
}

impl PathOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}
