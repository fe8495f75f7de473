use super::{CreateRecipeRequest, ValidationError, ValidationResult};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Presence only: an empty string counts as missing, whitespace does not.
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.is_empty()).unwrap_or(false)
}

impl Validate for CreateRecipeRequest {
    fn validate(&self) -> ValidationResult<()> {
        if !is_present(self.name.as_deref()) || !is_present(self.image.as_deref()) {
            return Err(ValidationError::NameAndImageRequired);
        }
        Ok(())
    }
}
