// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Primer.
//!
//! This module contains pure logic with no I/O. Filesystem access, template
//! storage and rendering are reached through ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable configuration**: Guards take their pattern tables at construction
//! - **Value semantics**: All domain objects are Clone + PartialEq where it makes sense

pub mod entities;
pub mod error;
pub mod security;
pub mod value_objects;

mod validation;

pub use entities::{
    Dependencies, FrameworkInfo, GenerationReport, Preferences, ProjectDescriptor,
    RenderMetadata, RenderedContent, SelectionResult, Template, TemplateBuilder, TemplateId,
    TemplateMetadata, ValidationResult, Value, Variables, WriteResult,
};

pub use error::{DomainError, ErrorCategory};

pub use security::{PathGuard, PathPolicy, SecretFinding, SecretGuard, SecretPattern};

pub use value_objects::{CodeStyle, Focus, PathOperation, ProjectType, Router, Severity};

pub use validation::DomainValidator;
