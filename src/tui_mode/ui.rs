use super::app::App;
use super::helpers::{highlight_expression, wrap_text};
use crate::format::{format_number, format_step, format_with_spaces};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => handle_mouse_event(app, event),
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc | KeyCode::F(1) => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => app.should_quit = true,
        KeyCode::Char('u') | KeyCode::Char('U') if ctrl => app.clear_input(),
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left if ctrl => app.move_cursor_by_words(-1),
        KeyCode::Right if ctrl => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => app.move_cursor_to_start(),
        KeyCode::End => app.move_cursor_to_end(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::Enter => app.submit(),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: MouseEvent) {
    let scroll = if app.show_help { &mut app.help_scroll } else { &mut app.history_scroll };
    match event.kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let area = frame.size();

    app.terminal_too_small = area.width < MIN_TERMINAL_WIDTH || area.height < MIN_TERMINAL_HEIGHT;
    if app.terminal_too_small {
        render_resize_message(frame, app, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_input(frame, app, layout[0]);
    render_status(frame, app, layout[1]);
    render_history(frame, app, layout[2]);
    app.list_height = layout[2].height as usize;
}

fn render_resize_message(frame: &mut Frame, app: &App, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
    );

    let text = vec![
        Line::from(Span::styled(message, app.theme.error())),
        Line::from(""),
        Line::from(Span::styled("Please resize your terminal window", app.theme.warning())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.error())
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// Each history entry becomes one or more list rows; item_start_indices maps entry -> first row.
fn history_rows(
    app: &mut App,
    wrap_width: usize,
    separator_width: usize,
) -> Vec<ListItem<'static>> {
    let theme = app.theme;
    let mut items = Vec::new();
    app.item_start_indices.clear();

    let last = app.history.len().saturating_sub(1);
    for (i, entry) in app.history.iter().enumerate() {
        app.item_start_indices.push(items.len());

        let input = format_with_spaces(&entry.input);
        for (line_idx, line) in wrap_text(&input, wrap_width).into_iter().enumerate() {
            let mut spans = if line_idx == 0 {
                vec![Span::styled("> ", theme.entry(i == app.cursor_history))]
            } else {
                vec![Span::raw("  ")]
            };
            spans.extend(highlight_expression(&line, &theme));

            if line_idx == 0 {
                spans.push(Span::styled(" = ", theme.muted()));
                match &entry.result {
                    Ok(value) => spans.push(Span::styled(format_number(*value), theme.result())),
                    Err(e) => spans.push(Span::styled(format!("Error: {}", e), theme.error())),
                }
            }
            items.push(ListItem::new(Line::from(spans)));
        }

        if entry.detailed_mode {
            let mut detail_lines: Vec<(String, Style)> = entry
                .detailed_steps
                .iter()
                .enumerate()
                .map(|(j, step)| {
                    let text = format!(
                        "Step {}: {} = {}",
                        j + 1,
                        format_step(step),
                        format_number(step.result)
                    );
                    (text, theme.muted())
                })
                .collect();
            if let Err(e) = &entry.result {
                detail_lines.push((format!("Error: {}", e), theme.error()));
            }
            detail_lines.push((
                format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0),
                theme.timing(),
            ));

            for (text, style) in detail_lines {
                let lines = wrap_text(&text, wrap_width.saturating_sub(6));
                for (k, line) in lines.into_iter().enumerate() {
                    let prefix = if k == 0 { "    - " } else { "      " };
                    let span = Span::styled(format!("{}{}", prefix, line), style);
                    items.push(ListItem::new(Line::from(span)));
                }
            }
        }

        if i < last {
            let separator = Span::styled("-".repeat(separator_width), theme.muted());
            items.push(ListItem::new(Line::from(separator)));
        }
    }
    items
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.muted())
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg =
            Paragraph::new("No calculations yet. Enter an expression to see results here.")
                .style(app.theme.muted())
                .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let items = history_rows(
        app,
        inner_area.width.saturating_sub(4) as usize,
        inner_area.width as usize,
    );

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }
    app.history_scroll = app.history_scroll.min(items.len().saturating_sub(1));

    let selected = app.item_start_indices.get(app.cursor_history).copied();
    let list = List::new(items).highlight_style(app.theme.selection());
    let mut state = ListState::default()
        .with_selected(selected)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let keys = [
        ("Enter", "Calculate"),
        ("Up/Down or PgUp/PgDn", "Navigate"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear Input"),
        ("Ctrl+C", "Quit"),
    ];

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, app.theme.key()),
                Span::styled(format!(" {} ", desc), app.theme.muted()),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.muted())
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner_area.width.saturating_sub(2) as usize;
    let total_chars = app.input.chars().count();
    app.adjust_input_scroll(visible_width);

    let visible_input: String = app
        .input
        .chars()
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    let mut spans = vec![Span::styled("> ", app.theme.prompt())];
    spans.extend(highlight_expression(&visible_input, &app.theme));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner_area);

    let visible_cursor = app.cursor_position.saturating_sub(app.input_scroll);
    let visible_prefix: String = visible_input.chars().take(visible_cursor).collect();
    frame.set_cursor(inner_area.x + 2 + visible_prefix.width() as u16, inner_area.y);

    if app.input_scroll > 0 {
        let left_indicator = Paragraph::new("<").style(app.theme.muted());
        frame.render_widget(left_indicator, Rect::new(inner_area.x, inner_area.y, 1, 1));
    }

    if total_chars > app.input_scroll + visible_width {
        let right_indicator = Paragraph::new(">").style(app.theme.muted());
        frame.render_widget(
            right_indicator,
            Rect::new(inner_area.x + inner_area.width - 1, inner_area.y, 1, 1),
        );
    }
}
