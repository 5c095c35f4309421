//! Test narrators — `Narrator` doubles for the generative-text port.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use questforge_core::error::DomainError;
use questforge_core::narrator::{NarrationRequest, Narrator};

/// Returns a fixed reply and records every request it receives.
#[derive(Debug)]
pub struct ScriptedNarrator {
    reply: String,
    requests: Mutex<Vec<NarrationRequest>>,
}

impl ScriptedNarrator {
    /// Create a narrator that always answers `reply`.
    #[must_use]
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<NarrationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn narrate(&self, request: &NarrationRequest) -> Result<String, DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

/// Always fails as if the service returned an error status.
#[derive(Debug)]
pub struct FailingNarrator;

#[async_trait]
impl Narrator for FailingNarrator {
    async fn narrate(&self, _request: &NarrationRequest) -> Result<String, DomainError> {
        Err(DomainError::ExternalServiceFailure("503 service unavailable".into()))
    }
}

/// Sleeps before answering, to exercise the timeout path.
#[derive(Debug)]
pub struct SlowNarrator(pub Duration);

#[async_trait]
impl Narrator for SlowNarrator {
    async fn narrate(&self, _request: &NarrationRequest) -> Result<String, DomainError> {
        tokio::time::sleep(self.0).await;
        Ok("far too late".to_owned())
    }
}
