use quarry_analyze_client::AnalyzeResponse;
use quarry_core::ConversationSession;
use quarry_core::PendingSubmission;
use quarry_core::QuickPrompt;
use quarry_core::quick_prompts::all_quick_prompts;
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use crate::composer::Composer;
use crate::typing::TypingDebouncer;

/// Events delivered to the UI loop from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// An analyze round trip finished; `pending` is the submission the
    /// result belongs to.
    AnalyzeFinished {
        pending: PendingSubmission,
        result: quarry_analyze_client::Result<AnalyzeResponse>,
    },
    /// The typing debounce window for `epoch` elapsed.
    TypingTimerFired { epoch: u64 },
}

pub type AppEventTx = UnboundedSender<AppEvent>;

pub struct App {
    pub session: ConversationSession,
    pub composer: Composer,
    pub typing: TypingDebouncer,
    pub throbber: ThrobberState,
    /// Index into [`all_quick_prompts`] of the highlighted starter card.
    pub selected_card: usize,
    /// Transcript scroll offset in rendered lines.
    pub scroll: u16,
    /// When set, the transcript sticks to its bottom as answers arrive.
    pub follow: bool,
    pub status: String,
}

impl App {
    pub fn new(app_tx: AppEventTx) -> Self {
        Self {
            session: ConversationSession::new(),
            composer: Composer::new(),
            typing: TypingDebouncer::new(app_tx),
            throbber: ThrobberState::default(),
            selected_card: 0,
            scroll: 0,
            follow: true,
            status: "Ready".to_string(),
        }
    }

    /// The starter cards are shown until the first message lands.
    pub fn cards_visible(&self) -> bool {
        self.session.messages().is_empty()
    }

    /// Arrow keys drive card selection only while the composer is empty;
    /// once a draft exists they move the cursor instead.
    pub fn card_selection_active(&self) -> bool {
        self.cards_visible() && self.composer.is_empty()
    }

    pub fn selected_prompt(&self) -> QuickPrompt {
        let prompts = all_quick_prompts();
        prompts[self.selected_card % prompts.len()]
    }

    pub fn select_next_card(&mut self) {
        let len = all_quick_prompts().len();
        self.selected_card = (self.selected_card + 1) % len;
    }

    pub fn select_prev_card(&mut self) {
        let len = all_quick_prompts().len();
        self.selected_card = (self.selected_card + len - 1) % len;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// The offset is clamped to the rendered transcript during drawing,
    /// which also turns `follow` back on at the bottom.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// True while the footer spinner should animate.
    pub fn spinner_active(&self) -> bool {
        self.session.is_submitting() || self.typing.is_typing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn app() -> App {
        let (tx, _rx) = unbounded_channel();
        App::new(tx)
    }

    #[test]
    fn starts_idle_on_the_first_card_and_following() {
        let app = app();
        assert!(app.cards_visible());
        assert!(app.card_selection_active());
        assert_eq!(app.selected_prompt(), QuickPrompt::Illustration);
        assert!(app.follow);
        assert!(!app.spinner_active());
    }

    #[test]
    fn card_selection_wraps_both_ways() {
        let mut app = app();
        app.select_prev_card();
        assert_eq!(app.selected_prompt(), QuickPrompt::Explain);
        app.select_next_card();
        assert_eq!(app.selected_prompt(), QuickPrompt::Illustration);
        for _ in 0..4 {
            app.select_next_card();
        }
        assert_eq!(app.selected_prompt(), QuickPrompt::Illustration);
    }

    #[test]
    fn scrolling_up_leaves_follow_mode_and_saturates() {
        let mut app = app();
        app.scroll = 3;
        app.scroll_up(10);
        assert_eq!(app.scroll, 0);
        assert!(!app.follow);
    }
}
