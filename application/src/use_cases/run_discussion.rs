//! Run Discussion use case
//!
//! Drives one user query through the two-persona debate:
//!
//! ```text
//! user turn → Cognito opening
//!           → loop { Muse reply → [Cognito reply] }   (fixed count or agreement)
//!           → Cognito final synthesis                  (the deliverable)
//! ```
//!
//! Calls are strictly sequential. After every gateway call the run polls its
//! cancellation token before committing anything, and the check and the
//! commit happen under the same state lock so a concurrent
//! [`clear_conversation`](DiscussionOrchestrator::clear_conversation) can
//! never be overwritten by a late result.

use crate::config::RunSettings;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::discussion_observer::{DiscussionObserver, NoObserver};
use crate::ports::model_gateway::{GatewayError, GenerationRequest, ModelGateway};
use crate::use_cases::shared::{check_cancelled, lock};
use duet_domain::discussion::protocol::WELCOME_NOTICE;
use duet_domain::{
    Attachment, AttachmentError, ConversationRun, DuetPromptTemplate, InlineAttachment,
    ParsedReply, Persona, SharedDocument, Transcript, TurnPurpose, TurnRecord, UserQuery,
    parse_reply,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can end or reject a discussion run
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    #[error("Query must contain text or an attachment")]
    EmptyInput,

    #[error("A discussion is already running")]
    AlreadyRunning,

    #[error("API credentials are missing or invalid; fix them before starting a new discussion")]
    CredentialsMissing,

    #[error("Could not process attachment: {0}")]
    Attachment(#[from] AttachmentError),

    #[error("{persona} could not authenticate with the model backend: {source}")]
    InvalidCredentials {
        persona: Persona,
        source: GatewayError,
    },

    #[error("{persona} failed to respond: {source}")]
    Gateway {
        persona: Persona,
        source: GatewayError,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunDiscussionError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDiscussionError::Cancelled)
    }

    /// Rejected before the run started; nothing was recorded
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RunDiscussionError::EmptyInput
                | RunDiscussionError::AlreadyRunning
                | RunDiscussionError::CredentialsMissing
        )
    }
}

/// Input for one `send_message` call
#[derive(Debug, Clone, Default)]
pub struct SendMessageInput {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl SendMessageInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct DiscussionSummary {
    /// Cognito's final answer to the user
    pub final_answer: String,
    /// Persona turns recorded during this run, final synthesis included
    pub ai_turns: usize,
    pub model_calls: usize,
    pub consensus_reached: bool,
    pub elapsed: Duration,
    pub notepad: SharedDocument,
}

/// How an accepted run ended without error
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(DiscussionSummary),
    /// Stopped by [`DiscussionOrchestrator::request_cancel`] or
    /// [`DiscussionOrchestrator::clear_conversation`]
    Cancelled,
}

impl RunOutcome {
    pub fn summary(&self) -> Option<&DiscussionSummary> {
        match self {
            RunOutcome::Completed(summary) => Some(summary),
            RunOutcome::Cancelled => None,
        }
    }
}

/// Transcript and notepad of the current conversation
#[derive(Debug, Default)]
struct ConversationState {
    transcript: Transcript,
    notepad: SharedDocument,
}

/// Everything a turn needs that stays fixed for the whole run
struct TurnContext<'a> {
    query: &'a UserQuery,
    settings: &'a RunSettings,
    token: &'a CancellationToken,
    attachment: Option<Arc<InlineAttachment>>,
}

/// Clears the active flag and reports the run's end on every exit path
struct ActiveRunGuard<'a> {
    active: &'a AtomicBool,
    observer: &'a dyn DiscussionObserver,
    started: Instant,
}

impl Drop for ActiveRunGuard<'_> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.observer.on_run_finished(self.started.elapsed());
    }
}

/// Use case for running a two-persona discussion
///
/// Owns the conversation's transcript and notepad. Methods take `&self` so a
/// UI can cancel or clear while a run is awaiting the gateway.
pub struct DiscussionOrchestrator<G: ModelGateway + 'static> {
    gateway: Arc<G>,
    observer: Arc<dyn DiscussionObserver>,
    logger: Arc<dyn ConversationLogger>,
    state: Mutex<ConversationState>,
    active: AtomicBool,
    cancellation: Mutex<CancellationToken>,
    credentials_missing: AtomicBool,
}

impl<G: ModelGateway + 'static> DiscussionOrchestrator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            observer: Arc::new(NoObserver),
            logger: Arc::new(NoConversationLogger),
            state: Mutex::new(ConversationState::default()),
            active: AtomicBool::new(false),
            cancellation: Mutex::new(CancellationToken::new()),
            credentials_missing: AtomicBool::new(false),
        }
    }

    /// Set the observer receiving live transcript/notepad events
    pub fn with_observer(mut self, observer: Arc<dyn DiscussionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the structured conversation logger
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    // ==================== Queries ====================

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn credentials_missing(&self) -> bool {
        self.credentials_missing.load(Ordering::Acquire)
    }

    /// Snapshot of the transcript
    pub fn transcript(&self) -> Transcript {
        lock(&self.state).transcript.clone()
    }

    /// Snapshot of the notepad
    pub fn notepad(&self) -> SharedDocument {
        lock(&self.state).notepad.clone()
    }

    // ==================== Commands ====================

    /// Ask the active run (if any) to stop at its next check.
    pub fn request_cancel(&self) {
        lock(&self.cancellation).cancel();
        debug!("Cancellation requested");
    }

    /// Cancel any active run and reset the conversation.
    pub fn clear_conversation(&self) {
        self.request_cancel();

        let notepad = {
            let mut state = lock(&self.state);
            state.transcript.clear();
            state.notepad.reset();
            state.notepad.clone()
        };

        info!("Conversation cleared");
        self.logger
            .log(ConversationEvent::new("conversation_cleared", json!({})));
        self.observer.on_notepad_updated(&notepad);
        self.observer.on_conversation_cleared(WELCOME_NOTICE);
    }

    /// Allow runs again after credentials have been fixed.
    pub fn clear_credentials_flag(&self) {
        self.credentials_missing.store(false, Ordering::Release);
    }

    /// Run one full discussion for a user message.
    ///
    /// Rejections (empty input, a run already active, missing credentials)
    /// change nothing. Other failures are also recorded as System entries in
    /// the transcript. Cancellation is not an error: it yields
    /// [`RunOutcome::Cancelled`] and records nothing further.
    pub async fn send_message(
        &self,
        input: SendMessageInput,
        settings: RunSettings,
    ) -> Result<RunOutcome, RunDiscussionError> {
        let query = UserQuery::try_new(input.text, input.attachment)
            .ok_or(RunDiscussionError::EmptyInput)?;

        if self.credentials_missing() {
            return Err(RunDiscussionError::CredentialsMissing);
        }

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RunDiscussionError::AlreadyRunning);
        }

        let _guard = ActiveRunGuard {
            active: &self.active,
            observer: self.observer.as_ref(),
            started: Instant::now(),
        };

        let token = self.reset_cancellation();
        let mut run = ConversationRun::new(settings.mode, settings.fixed_turns);

        info!(
            "Starting discussion ({}, {} pair budget)",
            settings.mode,
            run.budget().pairs()
        );
        self.logger.log(ConversationEvent::new(
            "run_started",
            json!({
                "query": query.text(),
                "attachment": query.attachment().map(|a| a.filename.as_str()),
                "settings": &settings,
            }),
        ));
        self.observer.on_run_started();

        let result = self.drive(&query, &settings, &token, &mut run).await;

        match result {
            Ok(summary) => {
                run.finish();
                info!(
                    "Discussion complete: {} model calls, consensus {}",
                    summary.model_calls,
                    run.consensus()
                );
                self.log_run_finished("completed", &run);
                Ok(RunOutcome::Completed(summary))
            }
            Err(e) if e.is_cancelled() => {
                run.abort();
                info!("Discussion cancelled during {}", run.phase());
                self.log_run_finished("cancelled", &run);
                Ok(RunOutcome::Cancelled)
            }
            Err(e) => {
                run.abort();
                warn!("Discussion aborted: {}", e);
                if matches!(e, RunDiscussionError::InvalidCredentials { .. }) {
                    self.credentials_missing.store(true, Ordering::Release);
                }
                // A cancel that lands after the failure only suppresses the entry.
                let _ = self.commit(&token, TurnRecord::system_error(e.to_string()), None);
                self.log_run_finished("failed", &run);
                Err(e)
            }
        }
    }

    // ==================== Turn sequencing ====================

    async fn drive(
        &self,
        query: &UserQuery,
        settings: &RunSettings,
        token: &CancellationToken,
        run: &mut ConversationRun,
    ) -> Result<DiscussionSummary, RunDiscussionError> {
        let user_turn = TurnRecord::user(
            query.display_text(),
            query.attachment().map(|a| a.filename.clone()),
        );
        self.commit(token, user_turn, None)?;

        let attachment = query
            .attachment()
            .map(Attachment::encode)
            .transpose()?
            .map(Arc::new);

        let ctx = TurnContext {
            query,
            settings,
            token,
            attachment,
        };

        // Opening analysis
        let notepad = self.notepad();
        let prompt = DuetPromptTemplate::opening_prompt(query, notepad.content(), settings.mode);
        run.begin_turn(Persona::Logical);
        let opening = self
            .take_turn(&ctx, run, Persona::Logical, TurnPurpose::Opening, prompt)
            .await?;
        run.record_signal(Persona::Logical, opening.stop_signaled);
        check_cancelled(token)?;

        // Exchange pairs
        while run.start_pair() {
            debug!("Exchange pair {}", run.pairs_started());

            let reply = self.reply_turn(&ctx, run, Persona::Creative).await?;
            run.record_signal(Persona::Creative, reply.stop_signaled);
            if run.ends_after_creative_turn() {
                break;
            }

            let reply = self.reply_turn(&ctx, run, Persona::Logical).await?;
            run.record_signal(Persona::Logical, reply.stop_signaled);
        }

        if run.consensus().is_reached() {
            info!("Personas agreed after {} exchange pairs", run.pairs_started());
        }

        // Final synthesis
        let (transcript, notepad) = self.snapshot();
        let prompt = DuetPromptTemplate::final_prompt(query, &transcript.render(), notepad.content());
        run.begin_final_synthesis();
        let final_reply = self
            .take_turn(&ctx, run, Persona::Logical, TurnPurpose::Final, prompt)
            .await?;

        Ok(DiscussionSummary {
            final_answer: final_reply.spoken_text,
            ai_turns: run.persona_turns(),
            model_calls: run.model_calls(),
            consensus_reached: run.consensus().is_reached(),
            elapsed: run.elapsed(),
            notepad: self.notepad(),
        })
    }

    /// A debate reply: the full transcript plus the other persona's last line
    async fn reply_turn(
        &self,
        ctx: &TurnContext<'_>,
        run: &mut ConversationRun,
        persona: Persona,
    ) -> Result<ParsedReply, RunDiscussionError> {
        let (transcript, notepad) = self.snapshot();
        let last_spoken = transcript
            .records()
            .iter()
            .rev()
            .find(|r| r.is_persona_turn())
            .map(|r| r.text.as_str())
            .unwrap_or_else(|| ctx.query.display_text());

        let prompt = DuetPromptTemplate::reply_prompt(
            persona,
            ctx.query,
            &transcript.render(),
            last_spoken,
            notepad.content(),
            ctx.settings.mode,
        );

        run.begin_turn(persona);
        self.take_turn(ctx, run, persona, TurnPurpose::Reply, prompt)
            .await
    }

    /// Call the gateway as `persona`, then parse and commit the reply.
    async fn take_turn(
        &self,
        ctx: &TurnContext<'_>,
        run: &mut ConversationRun,
        persona: Persona,
        purpose: TurnPurpose,
        prompt: String,
    ) -> Result<ParsedReply, RunDiscussionError> {
        check_cancelled(ctx.token)?;

        let model = ctx.settings.model_for(persona).clone();
        let request = GenerationRequest::new(prompt, model.clone())
            .with_system_preamble(persona.system_preamble())
            .with_reasoning_suppressed(ctx.settings.suppress_extended_reasoning)
            .with_attachment(ctx.attachment.clone());

        self.observer.on_turn_started(persona, purpose);
        debug!("{} ({}) turn: calling {}", persona, purpose, model);

        let response = self.gateway.generate(&request).await;
        run.record_call(response.elapsed_ms);
        self.logger.log(ConversationEvent::new(
            "model_call",
            json!({
                "persona": persona.as_str(),
                "purpose": purpose.as_str(),
                "model": model.as_str(),
                "prompt_bytes": request.prompt.len(),
                "elapsed_ms": response.elapsed_ms,
                "error": response.error.as_ref().map(|e| e.to_string()),
            }),
        ));

        // A cancel issued while the call was in flight discards its result.
        check_cancelled(ctx.token)?;

        if let Some(error) = response.error {
            warn!("{} call to {} failed: {}", persona, model, error);
            return Err(if error.is_credential_error() {
                RunDiscussionError::InvalidCredentials {
                    persona,
                    source: error,
                }
            } else {
                RunDiscussionError::Gateway {
                    persona,
                    source: error,
                }
            });
        }

        let parsed = parse_reply(&response.text);
        debug!(
            "{} replied in {}ms (notepad update: {}, stop: {})",
            persona,
            response.elapsed_ms,
            parsed.notepad_replacement.is_some(),
            parsed.stop_signaled
        );

        let record = TurnRecord::persona(
            persona,
            purpose,
            parsed.spoken_text.clone(),
            model.as_str(),
            response.elapsed_ms,
        );
        self.commit(
            ctx.token,
            record,
            parsed
                .notepad_replacement
                .as_deref()
                .map(|content| (content, persona)),
        )?;
        run.record_turn();

        Ok(parsed)
    }

    // ==================== State helpers ====================

    /// Install a fresh token for a new run; stale cancels stay on the old one.
    fn reset_cancellation(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *lock(&self.cancellation) = token.clone();
        token
    }

    fn snapshot(&self) -> (Transcript, SharedDocument) {
        let state = lock(&self.state);
        (state.transcript.clone(), state.notepad.clone())
    }

    /// Apply a turn's side effects unless the run was cancelled.
    ///
    /// The notepad write happens before the transcript append. Observers are
    /// notified after the lock is released.
    fn commit(
        &self,
        token: &CancellationToken,
        record: TurnRecord,
        notepad_write: Option<(&str, Persona)>,
    ) -> Result<(), RunDiscussionError> {
        let notepad = {
            let mut state = lock(&self.state);
            check_cancelled(token)?;

            let notepad = notepad_write.map(|(content, writer)| {
                state.notepad.replace(content, writer);
                state.notepad.clone()
            });
            state.transcript.push(record.clone());
            notepad
        };

        if let Some(notepad) = notepad {
            self.logger.log(ConversationEvent::new(
                "notepad_update",
                json!({
                    "writer": notepad.last_writer().map(|p| p.as_str()),
                    "content": notepad.content(),
                }),
            ));
            self.observer.on_notepad_updated(&notepad);
        }

        self.logger.log(ConversationEvent::new(
            "turn",
            json!({
                "speaker": record.speaker.display_name(),
                "purpose": record.purpose.as_str(),
                "text": &record.text,
                "elapsed_ms": record.elapsed_ms,
            }),
        ));
        self.observer.on_turn_appended(&record);
        Ok(())
    }

    fn log_run_finished(&self, outcome: &str, run: &ConversationRun) {
        self.logger.log(ConversationEvent::new(
            "run_finished",
            json!({
                "outcome": outcome,
                "phase": run.phase().as_str(),
                "model_calls": run.model_calls(),
                "pairs": run.pairs_started(),
                "consensus": run.consensus().to_string(),
                "elapsed_ms": run.elapsed().as_millis() as u64,
            }),
        ));
    }
}
