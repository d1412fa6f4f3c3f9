use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_help(frame: &mut Frame, app: &App) {
    let theme = app.theme;
    let heading = |text: &'static str| Line::from(Span::styled(text, theme.heading()));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(theme.warning())
        .title(" termcalc Help ")
        .title_alignment(Alignment::Center);

    let help_text = vec![
        Line::from(Span::styled("termcalc - terminal arithmetic calculator", theme.title())),
        Line::from(""),
        heading("Operators:"),
        Line::from("  + : Addition        (e.g., 5 + 3 = 8)"),
        Line::from("  - : Subtraction     (e.g., 10 - 4 = 6)"),
        Line::from("  * : Multiplication  (e.g., 6 * 7 = 42)"),
        Line::from("  / : Division        (e.g., 15 / 3 = 5)"),
        Line::from("  ( ) : Grouping      (e.g., (2 + 3) * 4 = 20)"),
        Line::from(""),
        heading("Rules:"),
        Line::from("  * and / bind tighter than + and -"),
        Line::from("  Equal operators group left to right (6 - 3 - 2 = 1)"),
        Line::from("  Numbers are non-negative decimals: 12, 0.5, 12.34"),
        Line::from("  There is no unary minus: write 0 - 5 instead of -5"),
        Line::from(""),
        heading("Commands:"),
        Line::from("  details <expression> : Show every folding step with time"),
        Line::from("  clear : Clear calculation history"),
        Line::from("  help  : Show this help screen"),
        Line::from("  quit  : Exit the calculator"),
        Line::from(""),
        heading("Keys:"),
        Line::from("  ← → : Move cursor left/right"),
        Line::from("  Ctrl+←/→ : Move cursor by numbers and operators"),
        Line::from("  Home/End : Move to start/end of line"),
        Line::from("  ↑ ↓ : Navigate calculation history"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  Ctrl+U : Clear current input"),
        Line::from("  Mouse wheel : Scroll through history"),
        Line::from("  Esc / F1 : Close this screen"),
        Line::from(""),
        heading("Examples:"),
        Line::from("  2 + 3 * 4"),
        Line::from("  (2 + 3) * 4"),
        Line::from("  12.34 + 0.66"),
        Line::from("  details 100 / (4 - 2) / 5"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
