#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Domain logic for the quarry client: segmentation of answer text into a
//! typed document, the conversation session state machine, and the catalog of
//! quick prompts. Everything here is UI-free and transport-free.

pub mod document;
pub mod quick_prompts;
pub mod session;

pub use document::Block;
pub use document::Document;
pub use document::Section;
pub use quick_prompts::QuickPrompt;
pub use session::ConversationMessage;
pub use session::ConversationSession;
pub use session::MessageContent;
pub use session::PendingSubmission;
pub use session::ResolveOutcome;
pub use session::SessionPhase;
pub use session::SubmitRejected;
