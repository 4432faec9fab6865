//! Chat session: the invocation surface over the coordinator.

use crate::coordinator::{PreparedRequest, ResponseOutcome, StreamCoordinator};
use crate::prompt::build_prompt;
use crate::relevance::check_relevance;
use explorer_core::{ConversationTurn, GenerationParameters, UploadedAsset};
use explorer_error::{ExplorerResult, SessionError, SessionErrorKind};
use explorer_interface::{DisplaySurface, FileStore, GenerativeDriver, NullSurface};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Heading placed above the attachment list in a recorded user turn.
pub const ATTACHMENT_HEADING: &str = "**Uploaded file(s):**";

/// Clears the in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| SessionError::new(SessionErrorKind::Busy))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// How the answer is requested from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Streaming,
    Blocking,
}

/// One user conversation.
///
/// Owns the transcript and admits one request at a time. The transcript is
/// only appended to after a request reaches its terminal state: the user
/// turn is always recorded, the assistant turn only when the answer
/// completed.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use explorer::{ChatSession, CoordinatorConfig, StreamCoordinator};
/// # use explorer_core::GenerationParameters;
/// # async fn demo(client: Arc<explorer_models::GeminiClient>) -> explorer_error::ExplorerResult<()> {
/// let coordinator = StreamCoordinator::new(client.clone(), client, CoordinatorConfig::default());
/// let session = ChatSession::new(coordinator);
///
/// let outcome = session
///     .submit_question("Finance", "What is inflation?", Vec::new(), GenerationParameters::default())
///     .await?;
/// let (text, secs) = outcome.into_parts();
/// println!("{text}\n({secs:.2}s)");
/// # Ok(())
/// # }
/// ```
pub struct ChatSession<D: ?Sized, F: ?Sized> {
    coordinator: StreamCoordinator<D, F>,
    history: Mutex<Vec<ConversationTurn>>,
    in_flight: AtomicBool,
    enforce_topic_relevance: bool,
}

impl<D, F> ChatSession<D, F>
where
    D: GenerativeDriver + ?Sized + 'static,
    F: FileStore + ?Sized,
{
    /// Creates an empty session.
    pub fn new(coordinator: StreamCoordinator<D, F>) -> Self {
        Self {
            coordinator,
            history: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            enforce_topic_relevance: false,
        }
    }

    /// Reject Space questions that mention no space keyword.
    pub fn with_topic_relevance(mut self, enforce: bool) -> Self {
        self.enforce_topic_relevance = enforce;
        self
    }

    /// Snapshot of the transcript.
    pub fn history(&self) -> Vec<ConversationTurn> {
        self.history.lock().clone()
    }

    /// Drop every recorded turn.
    ///
    /// # Errors
    ///
    /// Refused with [`SessionErrorKind::Busy`] while a request is in flight.
    pub fn clear_history(&self) -> Result<(), SessionError> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let mut history = self.history.lock();
        debug!(turns = history.len(), "Clearing history");
        history.clear();
        Ok(())
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Ask a question and wait for the whole streamed answer.
    ///
    /// # Errors
    ///
    /// Only submission rejections are errors (empty question, invalid
    /// parameters, off-topic question, request already in flight). Upload
    /// and generation failures are reported through the returned outcome.
    pub async fn submit_question(
        &self,
        topic: &str,
        question: &str,
        attachments: Vec<UploadedAsset>,
        parameters: GenerationParameters,
    ) -> ExplorerResult<ResponseOutcome> {
        let mut surface = NullSurface;
        self.submit(
            Mode::Streaming,
            topic,
            question,
            attachments,
            parameters,
            &mut surface,
            &CancellationToken::new(),
        )
        .await
    }

    /// Ask a question, publishing progress to `surface` as text arrives.
    ///
    /// Cancelling `cancel` ends the request with a failed outcome.
    ///
    /// # Errors
    ///
    /// Same as [`ChatSession::submit_question`].
    pub async fn submit_question_streaming(
        &self,
        topic: &str,
        question: &str,
        attachments: Vec<UploadedAsset>,
        parameters: GenerationParameters,
        surface: &mut dyn DisplaySurface,
        cancel: &CancellationToken,
    ) -> ExplorerResult<ResponseOutcome> {
        self.submit(
            Mode::Streaming,
            topic,
            question,
            attachments,
            parameters,
            surface,
            cancel,
        )
        .await
    }

    /// Ask a question with a single non-streaming generation call.
    ///
    /// # Errors
    ///
    /// Same as [`ChatSession::submit_question`].
    pub async fn ask(
        &self,
        topic: &str,
        question: &str,
        attachments: Vec<UploadedAsset>,
        parameters: GenerationParameters,
        surface: &mut dyn DisplaySurface,
        cancel: &CancellationToken,
    ) -> ExplorerResult<ResponseOutcome> {
        self.submit(
            Mode::Blocking,
            topic,
            question,
            attachments,
            parameters,
            surface,
            cancel,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all, fields(topic = %topic, mode = ?mode, attachments = attachments.len()))]
    async fn submit(
        &self,
        mode: Mode,
        topic: &str,
        question: &str,
        attachments: Vec<UploadedAsset>,
        parameters: GenerationParameters,
        surface: &mut dyn DisplaySurface,
        cancel: &CancellationToken,
    ) -> ExplorerResult<ResponseOutcome> {
        if question.trim().is_empty() {
            return Err(SessionError::new(SessionErrorKind::EmptyQuestion).into());
        }
        parameters.validate()?;
        if self.enforce_topic_relevance {
            check_relevance(topic, question)?;
        }

        let _guard = InFlight::acquire(&self.in_flight)?;

        let context = self.history.lock().clone();
        let user_turn = ConversationTurn::user(user_turn_content(question, &attachments));
        let prompt = build_prompt(topic, question);
        let request = PreparedRequest::new(context, prompt, attachments, parameters);

        let outcome = match mode {
            Mode::Streaming => self.coordinator.run(request, surface, cancel).await,
            Mode::Blocking => self.coordinator.run_blocking(request, surface, cancel).await,
        };

        // A failed request leaves its question unanswered; the wire
        // conversion folds it into the next user turn.
        let mut history = self.history.lock();
        history.push(user_turn);
        if outcome.is_completed() {
            history.push(ConversationTurn::assistant(outcome.text().clone()));
        }
        info!(
            state = %outcome.final_state(),
            turns = history.len(),
            elapsed_ms = outcome.elapsed().as_millis(),
            "Question answered"
        );

        Ok(outcome)
    }
}

/// Text recorded for the user's turn: the question, plus the names of any
/// attachments.
pub fn user_turn_content(question: &str, attachments: &[UploadedAsset]) -> String {
    if attachments.is_empty() {
        return question.to_string();
    }
    let mut content = format!("{}\n\n{}\n", question, ATTACHMENT_HEADING);
    let names: Vec<String> = attachments
        .iter()
        .map(|asset| format!("- 📎 {}", asset.name()))
        .collect();
    content.push_str(&names.join("\n"));
    content
}
