//! Streaming response coordination.
//!
//! One request moves through `Idle -> Uploading -> Requesting -> Streaming`
//! and ends in exactly one of `Completed` or `Failed`. A worker task drives
//! the remote stream and only talks to the consumer through an unbounded
//! channel of [`StreamChunk`]s; the consumer polls that channel on a fixed
//! interval, animates a pending indicator until text arrives, and publishes
//! the growing buffer to a [`DisplaySurface`].

use crate::pending::PendingIndicator;
use crate::upload::{AssetUploader, UploadPolicy};
use explorer_core::{
    ConversationTurn, GenerateRequest, GenerationParameters, StreamChunk, UploadedAsset,
};
use explorer_error::{GenerationError, GenerationErrorKind};
use explorer_interface::{DisplaySurface, FileStore, GenerativeDriver};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Message reported when the caller cancels a request.
pub const CANCELLED_MESSAGE: &str = "request cancelled";

/// Message reported when the worker stops without finishing its stream.
pub const WORKER_LOST_MESSAGE: &str = "generation worker stopped unexpectedly";

/// Lifecycle of one request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum RequestState {
    /// Accepted, nothing sent yet
    #[display("idle")]
    Idle,
    /// Transferring attachments
    #[display("uploading")]
    Uploading,
    /// Issuing the generation call
    #[display("requesting")]
    Requesting,
    /// Receiving chunks
    #[display("streaming")]
    Streaming,
    /// Answer finished
    #[display("completed")]
    Completed,
    /// Request ended with an error
    #[display("failed")]
    Failed,
}

impl RequestState {
    /// Whether no further chunk processing happens in this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Completed | RequestState::Failed)
    }
}

/// What happens to text received before a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialResponsePolicy {
    /// Keep it in the outcome (never in history)
    #[default]
    Retain,
    /// Drop it
    Discard,
}

/// Tuning for the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(default)]
pub struct CoordinatorConfig {
    /// Bound on each channel poll; also the pending animation rate
    poll_interval: Duration,
    /// Attachment activation bounds
    upload: UploadPolicy,
    /// Fate of partial text on failure
    partial_response: PartialResponsePolicy,
    /// Longest wait for the next chunk before the request times out
    stream_idle_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            upload: UploadPolicy::default(),
            partial_response: PartialResponsePolicy::default(),
            stream_idle_timeout: Duration::from_secs(60),
        }
    }
}

impl CoordinatorConfig {
    /// Returns a builder seeded with the defaults.
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::default()
    }
}

/// Inputs for one request, after the prompt has been built.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct PreparedRequest {
    /// Earlier turns sent as context
    history: Vec<ConversationTurn>,
    /// Fully built instruction text
    prompt: String,
    /// Attachments to transfer first
    attachments: Vec<UploadedAsset>,
    /// Sampling controls
    parameters: GenerationParameters,
}

impl PreparedRequest {
    /// Creates a request from its parts.
    pub fn new(
        history: Vec<ConversationTurn>,
        prompt: impl Into<String>,
        attachments: Vec<UploadedAsset>,
        parameters: GenerationParameters,
    ) -> Self {
        Self {
            history,
            prompt: prompt.into(),
            attachments,
            parameters,
        }
    }
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The stream finished normally
    Completed,
    /// Upload, generation or cancellation ended the request
    Failed {
        /// User-facing reason
        message: String,
    },
}

/// Result of driving one request to its terminal state.
///
/// On failure `text` holds the partial answer when the policy is
/// [`PartialResponsePolicy::Retain`], otherwise it is empty.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ResponseOutcome {
    /// Terminal status
    status: OutcomeStatus,
    /// Final (or partial) answer text
    text: String,
    /// Wall-clock time from acceptance to the terminal signal
    elapsed: Duration,
    /// States visited, in order
    transitions: Vec<RequestState>,
}

impl ResponseOutcome {
    /// Whether the request completed.
    pub fn is_completed(&self) -> bool {
        self.status == OutcomeStatus::Completed
    }

    /// Failure message, if the request failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { message } => Some(message),
            OutcomeStatus::Completed => None,
        }
    }

    /// Terminal state reached.
    pub fn final_state(&self) -> RequestState {
        match self.status {
            OutcomeStatus::Completed => RequestState::Completed,
            OutcomeStatus::Failed { .. } => RequestState::Failed,
        }
    }

    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Text to show in place of the answer: the answer itself, or the error.
    pub fn display_text(&self) -> String {
        match &self.status {
            OutcomeStatus::Completed => self.text.clone(),
            OutcomeStatus::Failed { message } => format!("An error occurred: {}", message),
        }
    }

    /// `(display text, elapsed seconds)`.
    pub fn into_parts(self) -> (String, f64) {
        let secs = self.elapsed_secs();
        match self.status {
            OutcomeStatus::Completed => (self.text, secs),
            OutcomeStatus::Failed { message } => (format!("An error occurred: {}", message), secs),
        }
    }
}

/// Records the state path of one request.
#[derive(Debug)]
struct StateTracker {
    started: Instant,
    transitions: Vec<RequestState>,
}

impl StateTracker {
    fn start() -> Self {
        Self {
            started: Instant::now(),
            transitions: vec![RequestState::Idle],
        }
    }

    fn enter(&mut self, state: RequestState) {
        debug!(from = ?self.transitions.last(), to = %state, "State transition");
        self.transitions.push(state);
    }

    fn finish(mut self, status: OutcomeStatus, text: String) -> ResponseOutcome {
        let elapsed = self.started.elapsed();
        self.enter(match status {
            OutcomeStatus::Completed => RequestState::Completed,
            OutcomeStatus::Failed { .. } => RequestState::Failed,
        });
        ResponseOutcome {
            status,
            text,
            elapsed,
            transitions: self.transitions,
        }
    }
}

/// Sends the terminal `Done` when dropped, on every exit path of the worker.
///
/// If the worker never called [`TerminalGuard::finish`] (a panic inside the
/// driver, for instance) an `Error` precedes the `Done`.
struct TerminalGuard {
    tx: mpsc::UnboundedSender<StreamChunk>,
    finished: bool,
}

impl TerminalGuard {
    fn new(tx: mpsc::UnboundedSender<StreamChunk>) -> Self {
        Self {
            tx,
            finished: false,
        }
    }

    /// Returns false once the consumer has gone away.
    fn send(&self, chunk: StreamChunk) -> bool {
        self.tx.send(chunk).is_ok()
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self
                .tx
                .send(StreamChunk::Error(WORKER_LOST_MESSAGE.to_string()));
        }
        let _ = self.tx.send(StreamChunk::Done);
    }
}

/// Worker body: forward the remote stream into the channel.
///
/// Waiting longer than `idle_timeout` for the stream to open or for its next
/// chunk fails the request with a timeout.
async fn stream_worker<D>(
    driver: Arc<D>,
    request: GenerateRequest,
    tx: mpsc::UnboundedSender<StreamChunk>,
    cancel: CancellationToken,
    idle_timeout: Duration,
) where
    D: GenerativeDriver + ?Sized,
{
    let guard = TerminalGuard::new(tx);
    let timed_out = || {
        warn!(idle_secs = idle_timeout.as_secs(), "No data from the generation stream");
        GenerationError::new(GenerationErrorKind::Timeout(idle_timeout.as_secs()))
    };

    let result: Result<(), GenerationError> = async {
        let mut stream =
            match tokio::time::timeout(idle_timeout, driver.generate_stream(&request)).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(timed_out()),
            };
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Worker observed cancellation");
                    return Ok(());
                }
                item = tokio::time::timeout(idle_timeout, stream.next()) => match item {
                    Ok(Some(Ok(text))) => {
                        if !text.is_empty() && !guard.send(StreamChunk::Data(text)) {
                            debug!("Consumer gone; stopping worker");
                            return Ok(());
                        }
                    }
                    Ok(Some(Err(e))) => return Err(e),
                    Ok(None) => return Ok(()),
                    Err(_) => return Err(timed_out()),
                },
            }
        }
    }
    .await;

    if let Err(e) = result {
        error!(error = %e, "Generation failed");
        guard.send(StreamChunk::Error(e.kind().user_message()));
    }
    guard.finish();
}

/// Drives requests from submission to a terminal state.
///
/// Holds no per-request state: every call to [`StreamCoordinator::run`]
/// creates its own worker and channel.
pub struct StreamCoordinator<D: ?Sized, F: ?Sized> {
    driver: Arc<D>,
    files: Arc<F>,
    config: CoordinatorConfig,
}

impl<D, F> StreamCoordinator<D, F>
where
    D: GenerativeDriver + ?Sized + 'static,
    F: FileStore + ?Sized,
{
    /// Creates a coordinator over a driver and a file store.
    pub fn new(driver: Arc<D>, files: Arc<F>, config: CoordinatorConfig) -> Self {
        Self {
            driver,
            files,
            config,
        }
    }

    /// Coordinator settings.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Drive one streaming request to completion or failure.
    ///
    /// Never returns an error: upload failures, remote errors and
    /// cancellation all become a [`OutcomeStatus::Failed`] outcome.
    #[instrument(
        skip_all,
        fields(
            provider = self.driver.provider_name(),
            model = %self.driver.model_name(),
            attachments = request.attachments().len()
        )
    )]
    pub async fn run(
        &self,
        request: PreparedRequest,
        surface: &mut dyn DisplaySurface,
        cancel: &CancellationToken,
    ) -> ResponseOutcome {
        let mut tracker = StateTracker::start();

        let generate_request = match self.prepare(request, &mut tracker, surface).await {
            Ok(generate_request) => generate_request,
            Err(message) => return self.fail(tracker, message, String::new(), surface),
        };

        // The worker stops with this call, even when the caller drops it.
        let worker_cancel = cancel.child_token();
        let _stop_worker = worker_cancel.clone().drop_guard();

        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(stream_worker(
            Arc::clone(&self.driver),
            generate_request,
            tx,
            worker_cancel,
            self.config.stream_idle_timeout,
        ));
        tracker.enter(RequestState::Streaming);

        let (buffer, failure) = self.consume(&mut rx, surface, cancel).await;
        if failure.is_some() {
            // Closing the channel stops a worker that is still producing.
            rx.close();
        }

        match failure {
            None => {
                let outcome = tracker.finish(OutcomeStatus::Completed, buffer);
                info!(
                    chars = outcome.text().len(),
                    elapsed_ms = outcome.elapsed().as_millis(),
                    "Response completed"
                );
                surface.completed(outcome.text(), *outcome.elapsed());
                outcome
            }
            Some(message) => self.fail(tracker, message, buffer, surface),
        }
    }

    /// Drive one request through the single-shot generation call.
    ///
    /// Same upload and terminal rules as [`StreamCoordinator::run`], but the
    /// answer arrives whole; the pending indicator runs until it does. The
    /// call runs on its own task, so a panicking driver ends the request
    /// with [`WORKER_LOST_MESSAGE`].
    #[instrument(
        skip_all,
        fields(
            provider = self.driver.provider_name(),
            model = %self.driver.model_name(),
            attachments = request.attachments().len()
        )
    )]
    pub async fn run_blocking(
        &self,
        request: PreparedRequest,
        surface: &mut dyn DisplaySurface,
        cancel: &CancellationToken,
    ) -> ResponseOutcome {
        let mut tracker = StateTracker::start();

        let generate_request = match self.prepare(request, &mut tracker, surface).await {
            Ok(generate_request) => generate_request,
            Err(message) => return self.fail(tracker, message, String::new(), surface),
        };

        let call_cancel = cancel.child_token();
        let _stop_call = call_cancel.clone().drop_guard();
        let driver = Arc::clone(&self.driver);
        let mut call = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = call_cancel.cancelled() => None,
                result = driver.generate(&generate_request) => Some(result),
            }
        });

        let mut indicator = PendingIndicator::default();
        let result = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Request cancelled by caller");
                    break Err(CANCELLED_MESSAGE.to_string());
                }
                joined = &mut call => break match joined {
                    Ok(Some(Ok(text))) => Ok(text),
                    Ok(Some(Err(e))) => {
                        error!(error = %e, "Generation failed");
                        Err(e.kind().user_message())
                    }
                    Ok(None) => Err(CANCELLED_MESSAGE.to_string()),
                    Err(e) => {
                        error!(error = %e, "Generation task failed");
                        Err(WORKER_LOST_MESSAGE.to_string())
                    }
                },
                _ = tokio::time::sleep(self.config.poll_interval) => {
                    surface.pending(&indicator.advance());
                }
            }
        };

        match result {
            Ok(text) => {
                surface.update(&text);
                let outcome = tracker.finish(OutcomeStatus::Completed, text);
                info!(
                    chars = outcome.text().len(),
                    elapsed_ms = outcome.elapsed().as_millis(),
                    "Response completed"
                );
                surface.completed(outcome.text(), *outcome.elapsed());
                outcome
            }
            Err(message) => self.fail(tracker, message, String::new(), surface),
        }
    }

    /// Upload attachments (if any) and assemble the wire-level request.
    async fn prepare(
        &self,
        request: PreparedRequest,
        tracker: &mut StateTracker,
        surface: &mut dyn DisplaySurface,
    ) -> Result<GenerateRequest, String> {
        let PreparedRequest {
            history,
            prompt,
            attachments,
            parameters,
        } = request;

        let files = if attachments.is_empty() {
            Vec::new()
        } else {
            tracker.enter(RequestState::Uploading);
            surface.uploading(attachments.len());
            let uploader = AssetUploader::new(self.files.as_ref(), self.config.upload);
            uploader.upload_assets(&attachments).await.map_err(|e| {
                error!(error = %e, "Attachment upload failed");
                e.kind().to_string()
            })?
        };

        tracker.enter(RequestState::Requesting);
        Ok(GenerateRequest::new(history, prompt, files, parameters))
    }

    /// Poll the channel until a terminal signal, returning the buffer and
    /// the failure message if the request failed.
    async fn consume(
        &self,
        rx: &mut mpsc::UnboundedReceiver<StreamChunk>,
        surface: &mut dyn DisplaySurface,
        cancel: &CancellationToken,
    ) -> (String, Option<String>) {
        let mut buffer = String::new();
        let mut indicator = PendingIndicator::default();
        let mut received_text = false;

        loop {
            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Request cancelled by caller");
                    return (buffer, Some(CANCELLED_MESSAGE.to_string()));
                }
                polled = tokio::time::timeout(self.config.poll_interval, rx.recv()) => polled,
            };

            match polled {
                Err(_) => {
                    if !received_text {
                        surface.pending(&indicator.advance());
                    }
                }
                Ok(Some(StreamChunk::Data(text))) => {
                    received_text = true;
                    buffer.push_str(&text);
                    surface.update(&buffer);
                }
                Ok(Some(StreamChunk::Error(message))) => return (buffer, Some(message)),
                Ok(Some(StreamChunk::Done)) => return (buffer, None),
                Ok(None) => return (buffer, Some(WORKER_LOST_MESSAGE.to_string())),
            }
        }
    }

    fn fail(
        &self,
        tracker: StateTracker,
        message: String,
        partial: String,
        surface: &mut dyn DisplaySurface,
    ) -> ResponseOutcome {
        let partial = match self.config.partial_response {
            PartialResponsePolicy::Retain => partial,
            PartialResponsePolicy::Discard => String::new(),
        };
        surface.failed(&message);
        let outcome = tracker.finish(
            OutcomeStatus::Failed {
                message: message.clone(),
            },
            partial,
        );
        warn!(
            error = %message,
            partial_chars = outcome.text().len(),
            elapsed_ms = outcome.elapsed().as_millis(),
            "Response failed"
        );
        outcome
    }
}
