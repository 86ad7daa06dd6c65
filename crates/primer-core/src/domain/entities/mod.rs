pub mod descriptor;
pub mod preferences;
pub mod results;
pub mod template;
pub mod variables;

pub use crate::domain::DomainError;
pub use descriptor::{Dependencies, FrameworkInfo, ProjectDescriptor};
pub use preferences::Preferences;
pub use results::{
    GenerationReport, RenderMetadata, RenderedContent, SelectionResult, ValidationResult,
    WriteResult,
};
pub use template::{Template, TemplateBuilder, TemplateId, TemplateMetadata};
pub use variables::{Value, Variables};
