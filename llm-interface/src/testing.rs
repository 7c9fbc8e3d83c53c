//! Recording test double for code that drives an [`LlmBackend`].

use crate::backend::{Invocation, LlmBackend};
use async_trait::async_trait;
use socialarch_core::CoreError;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Refused(String),
}

/// Answers from a script (falling back to a default reply) and remembers
/// every invocation it received.
pub struct RecordingBackend {
    script: Mutex<VecDeque<Reply>>,
    default_reply: Reply,
    calls: Mutex<Vec<Invocation>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingBackend {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_default(Reply::Text(text.into()))
    }

    /// Every call fails as if the connection had been refused.
    pub fn refusing(message: impl Into<String>) -> Self {
        Self::with_default(Reply::Refused(message.into()))
    }

    fn with_default(default_reply: Reply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply,
            calls: Mutex::new(Vec::new()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Queues a one-off reply used before the default.
    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.lock_script().push_back(Reply::Text(text.into()));
        self
    }

    pub fn then_refuse(self, message: impl Into<String>) -> Self {
        self.lock_script().push_back(Reply::Refused(message.into()));
        self
    }

    /// Each call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.lock_calls().clone()
    }

    pub fn last_call(&self) -> Option<Invocation> {
        self.lock_calls().last().cloned()
    }

    /// Highest number of calls observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<Invocation>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LlmBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    async fn invoke(&self, invocation: &Invocation) -> Result<String, CoreError> {
        self.lock_calls().push(invocation.clone());
        let reply = self
            .lock_script()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Refused(message) => Err(CoreError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message,
            ))),
        }
    }
}
