#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Interactive terminal UI for the quarry analyze service.
//!
//! One screen: the conversation transcript (or the starter cards while it is
//! empty), a single-line question box, and a two-line footer with key hints,
//! an activity spinner and a status/error row. All network work happens on
//! background tasks that report back through an app event channel, so the UI
//! loop never blocks.

mod app;
mod cli;
mod composer;
mod markdown;
mod typing;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use quarry_analyze_client::AnalyzeBackend;
use quarry_analyze_client::HttpClient;
use quarry_analyze_client::MockClient;
use quarry_core::PendingSubmission;
use quarry_core::ResolveOutcome;
use tracing::debug;
use tracing::error;
use tracing::info;

pub use cli::Cli;

use crate::app::App;
use crate::app::AppEvent;
use crate::app::AppEventTx;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let log_guard = init_logging();

    // Default to online unless explicitly configured to use mock.
    let use_mock = cli.mock
        || matches!(
            std::env::var("QUARRY_MODE").ok().as_deref(),
            Some("mock") | Some("MOCK")
        );
    let backend: Arc<dyn AnalyzeBackend> = if use_mock {
        info!("answering from the canned mock backend");
        Arc::new(MockClient::default())
    } else {
        info!("analyze service at {}", cli.base_url);
        Arc::new(HttpClient::new(cli.base_url)?)
    };

    // Terminal setup
    use crossterm::ExecutableCommand;
    use crossterm::terminal::EnterAlternateScreen;
    use crossterm::terminal::LeaveAlternateScreen;
    use crossterm::terminal::disable_raw_mode;
    use crossterm::terminal::enable_raw_mode;
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;
    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend_ui = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_ui)?;
    terminal.clear()?;

    // Event stream
    use crossterm::event::Event;
    use crossterm::event::EventStream;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyModifiers;
    use tokio_stream::StreamExt;
    let mut events = EventStream::new();

    // Channel for background analyze results and typing timers
    use tokio::sync::mpsc::unbounded_channel;
    let (tx, mut rx) = unbounded_channel::<AppEvent>();

    let mut app = App::new(tx.clone());

    // Event-driven redraws with a tiny coalescing scheduler (snappy UI, no fixed tick).
    let mut needs_redraw = true;
    use std::time::Instant;
    use tokio::time::Instant as TokioInstant;
    use tokio::time::sleep_until;
    let (frame_tx, mut frame_rx) = tokio::sync::mpsc::unbounded_channel::<Instant>();
    let (redraw_tx, mut redraw_rx) = tokio::sync::mpsc::unbounded_channel::<()>();

    // Coalesce frame requests to the earliest deadline; emit a single redraw signal.
    tokio::spawn(async move {
        let mut next_deadline: Option<Instant> = None;
        loop {
            let target =
                next_deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(24 * 60 * 60));
            let sleeper = sleep_until(TokioInstant::from_std(target));
            tokio::pin!(sleeper);
            tokio::select! {
                recv = frame_rx.recv() => {
                    match recv {
                        Some(at) => {
                            if next_deadline.is_none_or(|cur| at < cur) {
                                next_deadline = Some(at);
                            }
                            continue; // recompute sleep target
                        }
                        None => break,
                    }
                }
                _ = &mut sleeper => {
                    if next_deadline.take().is_some() {
                        let _ = redraw_tx.send(());
                    }
                }
            }
        }
    });
    // Kick an initial draw so the UI appears immediately.
    let _ = frame_tx.send(Instant::now());

    // A question given on the command line goes out before the first frame.
    if let Some(question) = cli.question
        && start_submission(&mut app, &backend, &tx, &question)
    {
        let _ = frame_tx.send(Instant::now() + Duration::from_millis(100));
    }

    // Render helper to centralize immediate redraws after handling events.
    let render_if_needed = |terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
                            app: &mut App,
                            needs_redraw: &mut bool|
     -> anyhow::Result<()> {
        if *needs_redraw {
            terminal.draw(|f| ui::draw(f, app))?;
            *needs_redraw = false;
        }
        Ok(())
    };

    let exit_code = loop {
        tokio::select! {
            // Coalesced redraw requests drive the spinner animation.
            Some(()) = redraw_rx.recv() => {
                if app.spinner_active() {
                    app.throbber.calc_next();
                    needs_redraw = true;
                    let _ = frame_tx.send(Instant::now() + Duration::from_millis(100));
                }
                render_if_needed(&mut terminal, &mut app, &mut needs_redraw)?;
            }
            maybe_app_event = rx.recv() => {
                if let Some(ev) = maybe_app_event {
                    match ev {
                        AppEvent::AnalyzeFinished { pending, result } => {
                            match app.session.resolve(pending, result) {
                                ResolveOutcome::Appended => {
                                    app.composer.clear();
                                    app.follow = true;
                                    app.status = "Ready".to_string();
                                }
                                ResolveOutcome::Failed => {
                                    // The session keeps the error; the footer shows it.
                                    app.status.clear();
                                }
                            }
                            needs_redraw = true;
                            let _ = frame_tx.send(Instant::now());
                        }
                        AppEvent::TypingTimerFired { epoch } => {
                            if app.typing.on_timer_fired(epoch) {
                                needs_redraw = true;
                                let _ = frame_tx.send(Instant::now());
                            }
                        }
                    }
                }
                render_if_needed(&mut terminal, &mut app, &mut needs_redraw)?;
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                        {
                            break 0;
                        }
                        if app.session.is_submitting() {
                            // Only scrolling stays live while a question is in flight.
                            match key.code {
                                KeyCode::Up => app.scroll_up(1),
                                KeyCode::Down => app.scroll_down(1),
                                KeyCode::PageUp => app.scroll_up(10),
                                KeyCode::PageDown => app.scroll_down(10),
                                _ => {}
                            }
                            needs_redraw = true;
                        } else {
                            match key.code {
                                KeyCode::Enter => {
                                    let started = if app.card_selection_active() {
                                        start_quick_submission(&mut app, &backend, &tx)
                                    } else {
                                        let draft = app.composer.text().to_string();
                                        start_submission(&mut app, &backend, &tx, &draft)
                                    };
                                    if started {
                                        // Animate the spinner while the answer is prepared.
                                        let _ = frame_tx.send(Instant::now() + Duration::from_millis(100));
                                    }
                                }
                                KeyCode::Left if app.card_selection_active() => app.select_prev_card(),
                                KeyCode::Right if app.card_selection_active() => app.select_next_card(),
                                KeyCode::Up => app.scroll_up(1),
                                KeyCode::Down => app.scroll_down(1),
                                KeyCode::PageUp => app.scroll_up(10),
                                KeyCode::PageDown => app.scroll_down(10),
                                KeyCode::Esc => {
                                    if app.composer.is_empty() {
                                        break 0;
                                    }
                                    app.composer.clear();
                                }
                                _ => {
                                    if app.composer.handle_key(key) {
                                        app.typing.on_keystroke();
                                        let _ = frame_tx.send(Instant::now() + Duration::from_millis(100));
                                    }
                                }
                            }
                            needs_redraw = true;
                        }
                        // Render after handling a key event (when not quitting).
                        render_if_needed(&mut terminal, &mut app, &mut needs_redraw)?;
                    }
                    Some(Ok(Event::Resize(_, _))) => {
                        needs_redraw = true;
                        render_if_needed(&mut terminal, &mut app, &mut needs_redraw)?;
                    }
                    Some(Err(e)) => {
                        error!("terminal event stream failed: {e}");
                        break 1;
                    }
                    None => break 0,
                    _ => {}
                }
                render_if_needed(&mut terminal, &mut app, &mut needs_redraw)?;
            }
        }
    };

    // Restore terminal
    disable_raw_mode().ok();
    terminal.show_cursor().ok();
    let _ = crossterm::execute!(std::io::stdout(), LeaveAlternateScreen);

    if exit_code != 0 {
        // Flush the file logger before bailing out.
        drop(log_guard);
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Starts an analyze round trip for `question`. Returns false when the
/// session rejected the submission (blank question, or one already in
/// flight).
fn start_submission(
    app: &mut App,
    backend: &Arc<dyn AnalyzeBackend>,
    tx: &AppEventTx,
    question: &str,
) -> bool {
    match app.session.begin(question) {
        Ok(pending) => {
            spawn_analyze(backend, tx, pending);
            app.typing.stop();
            app.status = "Analyzing…".to_string();
            true
        }
        Err(rejected) => {
            debug!("submission rejected: {rejected}");
            false
        }
    }
}

fn start_quick_submission(
    app: &mut App,
    backend: &Arc<dyn AnalyzeBackend>,
    tx: &AppEventTx,
) -> bool {
    let prompt = app.selected_prompt();
    match app.session.begin_quick(prompt) {
        Ok(pending) => {
            spawn_analyze(backend, tx, pending);
            app.typing.stop();
            app.status = "Analyzing…".to_string();
            true
        }
        Err(rejected) => {
            debug!("quick submission rejected: {rejected}");
            false
        }
    }
}

fn spawn_analyze(backend: &Arc<dyn AnalyzeBackend>, tx: &AppEventTx, pending: PendingSubmission) {
    let backend = backend.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = backend.analyze(pending.question()).await;
        let _ = tx.send(AppEvent::AnalyzeFinished { pending, result });
    });
}

/// Diagnostics go to a file under the user state dir; the terminal itself
/// belongs to the UI. Returns the guard keeping the background writer alive.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use std::io::IsTerminal;

    use tracing_subscriber::EnvFilter;

    const DEFAULT_LOG_LEVEL: &str = "error";
    let make_filter = || {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };

    let log_dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| base.join("quarry").join("log"));
    if let Some(dir) = log_dir
        && std::fs::create_dir_all(&dir).is_ok()
    {
        let appender = tracing_appender::rolling::never(dir, "quarry-tui.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .with_ansi(false)
            .with_writer(writer)
            .try_init();
        return Some(guard);
    }

    // No usable state dir: stderr is better than dropping errors outright.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(make_filter())
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
    None
}
