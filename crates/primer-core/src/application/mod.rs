//! Application layer for Primer.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, TemplateService)
//!   and the pipeline stages (scanner, selector, validator, writer)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Guards, entities and value types live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ContentValidator, GenerateService, GenerationRequest, OutputNames, OutputWriter,
    ProjectScanner, TemplateInfo, TemplateSelector, TemplateService, ValidationOptions,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
