//! The conversation session state machine.
//!
//! A session owns the append-only message log and the submission lifecycle.
//! One submission at a time: `begin` hands out a single-use
//! [`PendingSubmission`] token and moves the session to `Submitting`, and
//! `resolve` consumes the token together with the analyze outcome. Success
//! appends the user/assistant message pair atomically; failure records a
//! generic error and leaves the log untouched. Callers that do not need to
//! interleave other work can use [`ConversationSession::submit`], which runs
//! the whole cycle in one call.

use quarry_analyze_client::AnalyzeBackend;
use quarry_analyze_client::AnalyzeResponse;
use quarry_analyze_client::PageRef;

use crate::document::Document;
use crate::quick_prompts::QuickPrompt;

/// What the user sees when an analyze call fails. The failure detail goes to
/// the diagnostic log only, never to the transcript.
pub const REQUEST_FAILED_MESSAGE: &str =
    "An error occurred while processing your request. Please try again.";

/// Submission lifecycle phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Errored(String),
}

/// Sender plus payload of one transcript entry. The sender is encoded in the
/// variant, so it can never disagree with the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageContent {
    UserText(String),
    AssistantAnswer {
        document: Document,
        central_pages: Vec<PageRef>,
    },
}

/// One transcript entry. `order` is assigned by the session and strictly
/// increases across the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationMessage {
    pub order: u64,
    pub content: MessageContent,
}

impl ConversationMessage {
    pub fn is_user(&self) -> bool {
        matches!(self.content, MessageContent::UserText(_))
    }
}

/// Why `begin` refused a submission. The session state is unchanged in
/// either case.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    InFlight,
    #[error("question is empty")]
    EmptyQuestion,
}

/// Proof that a submission was accepted. Minted only by
/// [`ConversationSession::begin`] and consumed by
/// [`ConversationSession::resolve`]; holding one means the session is in
/// `Submitting` and will stay there until the token is resolved.
#[derive(Debug)]
pub struct PendingSubmission {
    question: String,
}

impl PendingSubmission {
    /// The question to send to the analyze backend, exactly as submitted.
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// Outcome of `resolve`, telling the caller what to do with its input draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The message pair was appended; the draft that produced it should be
    /// cleared.
    Appended,
    /// The call failed; the draft is kept so the user can retry it.
    Failed,
}

/// The state machine owning the message log and submission lifecycle. One
/// instance per app run; the conversation dies with it.
#[derive(Default)]
pub struct ConversationSession {
    messages: Vec<ConversationMessage>,
    phase: SessionPhase,
    next_order: u64,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SessionPhase::Submitting)
    }

    /// The user-facing error text, while the session is `Errored`.
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// Accept a submission. Rejects outright while another submission is in
    /// flight and rejects questions that are empty after trimming; otherwise
    /// moves to `Submitting` (clearing any prior error) and returns the
    /// token to resolve later. The question is carried exactly as passed;
    /// only the emptiness check trims.
    pub fn begin(&mut self, question: &str) -> Result<PendingSubmission, SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        if question.trim().is_empty() {
            return Err(SubmitRejected::EmptyQuestion);
        }
        self.phase = SessionPhase::Submitting;
        Ok(PendingSubmission {
            question: question.to_string(),
        })
    }

    /// Accept a submission of one of the fixed quick prompts. Identical
    /// contract to [`ConversationSession::begin`]; the prompt texts are never
    /// empty, so only an in-flight submission can reject this.
    pub fn begin_quick(&mut self, prompt: QuickPrompt) -> Result<PendingSubmission, SubmitRejected> {
        self.begin(prompt.prompt_text())
    }

    /// Finish the submission the token was minted for. On success the user
    /// message and the segmented assistant answer are appended as one pair
    /// and the session returns to `Idle`. On failure nothing is appended,
    /// the session moves to `Errored` with the generic message, and the full
    /// error detail is traced for operators.
    pub fn resolve(
        &mut self,
        pending: PendingSubmission,
        outcome: quarry_analyze_client::Result<AnalyzeResponse>,
    ) -> ResolveOutcome {
        match outcome {
            Ok(response) => {
                let document = Document::segment(&response.summary);
                self.push_message(MessageContent::UserText(pending.question));
                self.push_message(MessageContent::AssistantAnswer {
                    document,
                    central_pages: response.central_pages,
                });
                self.phase = SessionPhase::Idle;
                ResolveOutcome::Appended
            }
            Err(e) => {
                tracing::error!("analyze request failed: {e}");
                self.phase = SessionPhase::Errored(REQUEST_FAILED_MESSAGE.to_string());
                ResolveOutcome::Failed
            }
        }
    }

    /// Run a whole submission in one call: `begin`, the backend round trip,
    /// `resolve`. The TUI uses the split form so its event loop keeps
    /// handling input during the round trip; tests and one-shot callers use
    /// this.
    pub async fn submit(
        &mut self,
        backend: &dyn AnalyzeBackend,
        question: &str,
    ) -> Result<ResolveOutcome, SubmitRejected> {
        let pending = self.begin(question)?;
        let outcome = backend.analyze(pending.question()).await;
        Ok(self.resolve(pending, outcome))
    }

    fn push_message(&mut self, content: MessageContent) {
        let order = self.next_order;
        self.next_order += 1;
        self.messages.push(ConversationMessage { order, content });
    }
}
