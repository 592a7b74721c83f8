//! Tracks whether the user is actively typing in the composer.
//!
//! Every text-changing keystroke opens (or extends) a fixed window; while the
//! window is open the footer shows the activity spinner. Each keystroke bumps
//! an epoch and schedules a timer task that reports back through the app event
//! channel, so a timer that was outrun by a newer keystroke identifies itself
//! as stale and is ignored.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::app::AppEvent;
use crate::app::AppEventTx;

const TYPING_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct TypingDebouncer {
    app_tx: AppEventTx,
    typing: bool,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

impl TypingDebouncer {
    pub fn new(app_tx: AppEventTx) -> Self {
        Self {
            app_tx,
            typing: false,
            epoch: 0,
            timer: None,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Marks the user as typing and restarts the debounce window.
    pub fn on_keystroke(&mut self) {
        self.typing = true;
        self.epoch += 1;
        let epoch = self.epoch;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        let app_tx = self.app_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(TYPING_WINDOW).await;
            let _ = app_tx.send(AppEvent::TypingTimerFired { epoch });
        }));
    }

    /// Handles an elapsed window. Returns true when the indicator actually
    /// turned off; a stale epoch means a newer keystroke already restarted
    /// the window and the event is ignored.
    pub fn on_timer_fired(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch || !self.typing {
            return false;
        }
        self.typing = false;
        self.timer = None;
        true
    }

    /// Clears the indicator immediately and cancels any pending window.
    pub fn stop(&mut self) {
        self.typing = false;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
