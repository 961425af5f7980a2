//! Image file supplied with a create or update request

use bytes::Bytes;

use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type guessed from the file extension.
    pub fn content_type(&self) -> Option<&'static str> {
        mime_guess::from_path(self.filename.trim()).first_raw()
    }

    /// Checks the file and returns the filename used in the storage path.
    pub fn validate(&self, max_bytes: usize) -> Result<String, DomainError> {
        let filename = self.filename.trim();

        if filename.is_empty() {
            return Err(DomainError::InvalidImage("filename is required".to_string()));
        }
        if filename == "." || filename == ".." || filename.contains(['/', '\\']) {
            return Err(DomainError::InvalidImage(format!(
                "filename '{}' must not contain a path",
                filename
            )));
        }
        match self.content_type() {
            Some(mime) if mime.starts_with("image/") => {}
            other => {
                return Err(DomainError::InvalidImage(format!(
                    "'{}' is not an image ({})",
                    filename,
                    other.unwrap_or("unknown type")
                )))
            }
        }
        if self.is_empty() {
            return Err(DomainError::InvalidImage(format!("'{}' is empty", filename)));
        }
        if self.len() > max_bytes {
            return Err(DomainError::InvalidImage(format!(
                "'{}' is {} bytes, limit is {}",
                filename,
                self.len(),
                max_bytes
            )));
        }

        Ok(filename.to_string())
    }
}
