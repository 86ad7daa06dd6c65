use crate::domain::{
    entities::{Template, Variables},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across callers.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_variable_name(name: &str) -> Result<(), DomainError> {
        if Variables::is_valid_name(name) {
            Ok(())
        } else {
            Err(DomainError::InvalidVariableName {
                name: name.to_string(),
            })
        }
    }
}
