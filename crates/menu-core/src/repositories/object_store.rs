//! Object store trait (port)

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use menu_shared::utils::percent_of;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_transferred: usize,
    pub total_bytes: usize,
}

impl UploadProgress {
    pub fn new(bytes_transferred: usize, total_bytes: usize) -> Self {
        Self { bytes_transferred, total_bytes }
    }

    /// Completion in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        percent_of(self.bytes_transferred, self.total_bytes)
    }
}

/// Callback handed to [`ObjectStore::upload`], invoked after each chunk.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    sink: Option<Arc<dyn Fn(UploadProgress) + Send + Sync>>,
}

impl ProgressReporter {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(UploadProgress) + Send + Sync + 'static,
    {
        Self { sink: Some(Arc::new(sink)) }
    }

    pub fn noop() -> Self {
        Self::default()
    }

    pub fn report(&self, progress: UploadProgress) {
        if let Some(sink) = &self.sink {
            sink(progress);
        }
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("attached", &self.sink.is_some())
            .finish()
    }
}

/// Handle to a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
    pub size: usize,
}

/// Hosted binary storage addressed by path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `bytes` to `path`, overwriting any object already there.
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        progress: ProgressReporter,
    ) -> Result<StoredObject, DomainError>;
    async fn resolve_url(&self, object: &StoredObject) -> Result<String, DomainError>;
    async fn delete(&self, path: &str) -> Result<(), DomainError>;
    async fn fetch(&self, path: &str) -> Result<Option<Bytes>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_percent() {
        assert_eq!(UploadProgress::new(0, 200).percent(), 0.0);
        assert_eq!(UploadProgress::new(50, 200).percent(), 25.0);
        assert_eq!(UploadProgress::new(0, 0).percent(), 100.0);
    }

    #[test]
    fn test_reporter_forwards_to_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = ProgressReporter::new(move |p| sink.lock().unwrap().push(p.percent()));

        reporter.report(UploadProgress::new(1, 2));
        reporter.clone().report(UploadProgress::new(2, 2));
        ProgressReporter::noop().report(UploadProgress::new(2, 2));

        assert_eq!(*seen.lock().unwrap(), vec![50.0, 100.0]);
    }
}
