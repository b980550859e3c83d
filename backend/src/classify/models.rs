use std::time::Duration;

use super::error::ClassifyError;

/// Ceiling for an upload held in memory and for the classifier's reply.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One uploaded image, alive for the duration of a single request.
#[derive(Debug, Clone, Default)]
pub struct ClassificationRequest {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl ClassificationRequest {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>, file_name: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
            file_name,
        }
    }

    /// Checks run in order and stop at the first failure. Returns the media type.
    pub fn validate(&self) -> Result<&str, ClassifyError> {
        if self.bytes.is_empty() {
            return Err(ClassifyError::missing_file());
        }
        let media_type = match self.content_type.as_deref() {
            Some(media_type) if media_type.starts_with("image/") => media_type,
            _ => return Err(ClassifyError::not_an_image()),
        };
        if self.bytes.len() > MAX_BODY_BYTES {
            return Err(ClassifyError::file_too_large());
        }
        Ok(media_type)
    }
}
