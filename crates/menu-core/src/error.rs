//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Image upload failed: {0}")]
    UploadFailed(String),

    #[error("Document store error: {0}")]
    DocumentStoreError(String),

    #[error("Object store error: {0}")]
    ObjectStoreError(String),

    #[error("Another change to menu item {0} is still in progress")]
    MutationInProgress(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Auth provider error: {0}")]
    AuthProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Errors raised before any store was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::ValidationError(_)
                | DomainError::InvalidCategory(_)
                | DomainError::InvalidImage(_)
        )
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
