//! In-memory publisher for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::artifact::ArtifactSet;
use crate::publisher::{PublishError, Publisher};

/// Publisher that records the artifact names of every publish.
///
/// Can be switched into a failing mode to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    published: Mutex<Vec<Vec<String>>>,
    failing: AtomicBool,
}

impl MemoryPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a publisher that rejects every publish.
    #[must_use]
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.set_failing(true);
        publisher
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Artifact names of each successful publish, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<Vec<String>> {
        self.published.lock().unwrap().clone()
    }
}

impl Publisher for MemoryPublisher {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn publish(&self, artifacts: &ArtifactSet) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Rejected("memory publisher set to fail".to_owned()));
        }
        let names = artifacts.names().into_iter().map(str::to_owned).collect();
        self.published.lock().unwrap().push(names);
        Ok(())
    }
}
