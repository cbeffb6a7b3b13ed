//! One-at-a-time generation orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use ultranote_types::{GenerateError, GenerationRequest, Mode, Sink, SubmitError};

use crate::client::NotesClient;

/// How a generation that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The stream ended normally, with or without the `[DONE]` sentinel.
    Completed {
        /// Increments forwarded to the sink.
        increments: usize,
    },
    /// The generation was cancelled; partial output was discarded.
    Cancelled,
}

/// Runs generations against a [`NotesClient`], one at a time, into a [`Sink`].
///
/// Each orchestrator owns its client, sink and in-flight flag. Independent
/// orchestrators share nothing, so their generations cannot interleave.
/// Dropping the orchestrator cancels any generation it started.
pub struct Orchestrator {
    client: Arc<NotesClient>,
    sink: Arc<dyn Sink>,
    active: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Orchestrator {
    /// Create an orchestrator writing into `sink`.
    pub fn new(client: NotesClient, sink: Arc<dyn Sink>) -> Self {
        Self {
            client: Arc::new(client),
            sink,
            active: Arc::new(AtomicBool::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Whether a generation is currently streaming.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Start a generation and return immediately.
    ///
    /// Fails without side effects if the prompt is empty after trimming or a
    /// generation is already active. Otherwise the sink is reset before the
    /// request is sent. Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        prompt: impl Into<String>,
        mode: Mode,
    ) -> Result<Generation, SubmitError> {
        let request = GenerationRequest::new(prompt, mode)?;

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("rejecting submission while a generation is active");
            return Err(SubmitError::Busy);
        }
        let guard = ActiveGuard(Arc::clone(&self.active));

        self.sink.reset();

        let cancel = self.shutdown.child_token();
        let task = tokio::spawn(run_generation(
            Arc::clone(&self.client),
            Arc::clone(&self.sink),
            request,
            cancel.clone(),
            guard,
        ));

        Ok(Generation { cancel, task })
    }

    /// Cancel any active generation and every later one.
    ///
    /// Use when whatever renders the sink is going away.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Handle to a running generation.
///
/// Dropping the handle detaches it; the generation keeps running.
#[derive(Debug)]
pub struct Generation {
    cancel: CancellationToken,
    task: JoinHandle<Result<GenerationOutcome, GenerateError>>,
}

impl Generation {
    /// Abandon the stream. The sink is reset and no error is reported.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this generation when triggered.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the generation to end.
    pub async fn wait(self) -> Result<GenerationOutcome, GenerateError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(GenerateError::Task(e.to_string())),
        }
    }
}

/// Clears the in-flight flag however the generation task ends.
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn run_generation(
    client: Arc<NotesClient>,
    sink: Arc<dyn Sink>,
    request: GenerationRequest,
    cancel: CancellationToken,
    guard: ActiveGuard,
) -> Result<GenerationOutcome, GenerateError> {
    let _guard = guard;

    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = forward_increments(&client, sink.as_ref(), &request) => Some(result),
    };

    match result {
        None => {
            tracing::info!(mode = %request.mode, "generation cancelled");
            sink.reset();
            Ok(GenerationOutcome::Cancelled)
        }
        Some(Ok(increments)) => {
            tracing::info!(mode = %request.mode, increments, "generation completed");
            sink.completed();
            Ok(GenerationOutcome::Completed { increments })
        }
        Some(Err(err)) => {
            tracing::warn!(mode = %request.mode, error = %err, "generation failed");
            sink.failed(&err);
            Err(err)
        }
    }
}

async fn forward_increments(
    client: &NotesClient,
    sink: &dyn Sink,
    request: &GenerationRequest,
) -> Result<usize, GenerateError> {
    let mut stream = client.open_stream(request).await?;
    let mut increments = 0;
    while let Some(item) = stream.receiver.next().await {
        let text = item?;
        sink.append(&text);
        increments += 1;
    }
    Ok(increments)
}
