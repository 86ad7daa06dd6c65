//! Primer Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Primer, which
//! inspects a project directory, works out its toolchain and writes context
//! documents (`AGENTS.md`, `CONVENTIONS.md`) for coding assistants.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            primer-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (GenerateService, TemplateService)    │
//! │  scan → select → merge → render →       │
//! │  validate → write                       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Store, Filesystem, Render)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     primer-adapters (Infrastructure)    │
//! │ (LocalFilesystem, MarkerRenderer, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProjectDescriptor, Template, Guards)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use primer_core::prelude::*;
//!
//! // Adapters come from primer-adapters (or your own implementations).
//! let service = GenerateService::new(filesystem, store, renderer)?;
//! let report = service.run(GenerationRequest::new("./my-project").dry_run(true))?;
//! println!("{}", report.preview.unwrap_or_default());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService, GenerationRequest, TemplateInfo, TemplateService, ValidationOptions,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        CodeStyle, Focus, GenerationReport, PathGuard, PathPolicy, Preferences,
        ProjectDescriptor, ProjectType, SecretGuard, Template, TemplateId, TemplateMetadata,
        Value, Variables,
    };
    pub use crate::error::{PrimerError, PrimerResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
