use crate::domain::{
    entities::{Archetype, ProjectStructure},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across callers.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_archetype(archetype: &Archetype) -> Result<(), DomainError> {
        archetype.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
