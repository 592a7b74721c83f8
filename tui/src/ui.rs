use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::prelude::*;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::app::App;
use crate::markdown;
use quarry_core::QuickPrompt;
use quarry_core::quick_prompts::all_quick_prompts;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // transcript or starter cards
            Constraint::Length(3), // question box
            Constraint::Length(2), // two-line footer (help + status)
        ])
        .split(area);
    if app.cards_visible() {
        draw_quick_prompts(frame, chunks[0], app);
    } else {
        draw_transcript(frame, chunks[0], app);
    }
    draw_composer(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &mut App) {
    let lines = markdown::transcript_lines(&app.session);
    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);

    // Clamp the scroll offset against the wrapped line count so the last
    // page stays reachable; follow mode pins it to the bottom.
    let total = paragraph
        .line_count(inner.width)
        .min(u16::MAX as usize) as u16;
    let max_scroll = total.saturating_sub(inner.height);
    if app.follow {
        app.scroll = max_scroll;
    } else {
        app.scroll = app.scroll.min(max_scroll);
        if app.scroll == max_scroll {
            app.follow = true;
        }
    }

    // Percent scrolled (0% at top, 100% at bottom).
    let percent_span = if max_scroll == 0 {
        "  • 100%".dim()
    } else {
        let p = ((app.scroll as f32) / (max_scroll as f32) * 100.0).round() as i32;
        format!("  • {}%", p.clamp(0, 100)).dim()
    };
    let title_line = Line::from(vec!["Quarry".magenta().bold(), percent_span]);
    let block = block.title(title_line);

    frame.render_widget(paragraph.block(block).scroll((app.scroll, 0)), area);
}

fn draw_quick_prompts(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(Line::from(vec![
        "Quarry".magenta().bold(),
        "  • ".into(),
        "web research from your terminal".dim(),
    ]));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1), // hint
            Constraint::Length(1), // spacer
            Constraint::Length(6), // cards
            Constraint::Fill(2),
        ])
        .split(inner);
    let hint = Paragraph::new(Line::from("Ask anything, or start from a card:".dim()))
        .alignment(Alignment::Center);
    frame.render_widget(hint, rows[1]);

    let prompts = all_quick_prompts();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, prompts.len() as u32);
            prompts.len()
        ])
        .split(rows[3]);
    for (idx, (prompt, column)) in prompts.iter().zip(columns.iter()).enumerate() {
        draw_prompt_card(frame, *column, *prompt, idx == app.selected_card);
    }
}

fn draw_prompt_card(frame: &mut Frame, area: Rect, prompt: QuickPrompt, selected: bool) {
    let card = area.inner(Margin::new(1, 0));
    let border_style = if selected {
        Style::default().magenta()
    } else {
        Style::default().dim()
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);

    let caption = prompt.prompt_text().to_string();
    let lines = vec![
        Line::from(card_glyph(prompt)).alignment(Alignment::Center),
        Line::from(""),
        Line::from(caption).alignment(Alignment::Center),
    ];
    let text_style = if selected {
        Style::default().bold()
    } else {
        Style::default().dim()
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block)
        .style(text_style);
    frame.render_widget(paragraph, card);
}

fn card_glyph(prompt: QuickPrompt) -> &'static str {
    match prompt.icon_key() {
        "image" => "🖼",
        "document" => "📄",
        "pen" => "✏",
        "school" => "🎓",
        _ => "•",
    }
}

fn draw_composer(frame: &mut Frame, area: Rect, app: &App) {
    let submitting = app.session.is_submitting();
    let mut title_spans: Vec<Span> = vec!["Question".magenta().bold()];
    if submitting {
        title_spans.push("  • ".into());
        title_spans.push("waiting for the analyze service".dim());
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title_spans));
    let inner = block.inner(area);

    // Keep the cursor in view when the draft outgrows the box.
    let visible = inner.width.saturating_sub(1);
    let overflow = app.composer.cursor_col().saturating_sub(visible);

    let content = if app.composer.is_empty() && !submitting {
        Line::from("Enter your question".dim())
    } else if submitting {
        Line::from(app.composer.text().to_string().dim())
    } else {
        Line::from(app.composer.text().to_string())
    };
    frame.render_widget(
        Paragraph::new(content).block(block).scroll((0, overflow)),
        area,
    );

    if !submitting {
        let col = inner
            .x
            .saturating_add(app.composer.cursor_col().saturating_sub(overflow));
        frame.set_cursor_position((col, inner.y));
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &mut App) {
    let mut help: Vec<Span> = Vec::new();
    if app.card_selection_active() {
        help.extend(vec![
            "←/→".dim(),
            ": Choose  ".dim(),
            "Enter".dim(),
            ": Ask  ".dim(),
        ]);
    } else {
        help.extend(vec!["Enter".dim(), ": Send  ".dim()]);
    }
    help.extend(vec![
        "↑/↓".dim(),
        ": Scroll  ".dim(),
        "Ctrl+C".dim(),
        ": Quit".dim(),
    ]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    // Top row: help text + spinner at right.
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(18)])
        .split(rows[0]);
    frame.render_widget(Paragraph::new(Line::from(help)), top[0]);
    if app.spinner_active() {
        let label = if app.session.is_submitting() {
            "Analyzing…"
        } else {
            "Typing…"
        };
        draw_inline_spinner(frame, top[1], &mut app.throbber, label);
    } else {
        // Clear the spinner slot when idle to prevent stale glyphs.
        frame.render_widget(Clear, top[1]);
    }

    // Bottom row: error banner or status text (single line; sanitize newlines).
    let status_line = if let Some(error) = app.session.error_message() {
        Line::from(error.to_string().red())
    } else {
        let status: String = app
            .status
            .replace(['\n', '\r'], " ")
            .chars()
            .take(200)
            .collect();
        Line::from(status.dim())
    };
    frame.render_widget(Paragraph::new(status_line), rows[1]);
}

fn draw_inline_spinner(
    frame: &mut Frame,
    area: Rect,
    state: &mut throbber_widgets_tui::ThrobberState,
    label: &str,
) {
    use throbber_widgets_tui::BRAILLE_EIGHT;
    use throbber_widgets_tui::Throbber;
    use throbber_widgets_tui::WhichUse;
    let w = Throbber::default()
        .label(label)
        .style(Style::default().cyan())
        .throbber_style(Style::default().magenta().bold())
        .throbber_set(BRAILLE_EIGHT)
        .use_type(WhichUse::Spin);
    frame.render_stateful_widget(w, area, state);
}
