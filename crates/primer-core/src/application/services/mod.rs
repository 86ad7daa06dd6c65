//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "scan a project" or "generate its context
//! document".

pub mod generate_service;
pub mod scanner;
pub mod selector;
pub mod template_service;
pub mod validator;
pub mod writer;

pub use generate_service::{GenerateService, GenerationRequest};
pub use scanner::{EcosystemProbe, ProjectScanner};
pub use selector::TemplateSelector;
pub use template_service::{TemplateInfo, TemplateService};
pub use validator::{ContentValidator, ValidationOptions};
pub use writer::{OutputNames, OutputWriter, PendingBackup};
