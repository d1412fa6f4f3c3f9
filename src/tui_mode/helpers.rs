use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Styles for every UI element. With colours off only modifiers remain.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colored: bool,
}

impl Theme {
    pub fn new(colored: bool) -> Self {
        Theme { colored }
    }

    fn fg(&self, color: Color) -> Style {
        if self.colored {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }

    pub fn prompt(&self) -> Style {
        self.fg(Color::Green)
    }

    pub fn number(&self) -> Style {
        self.fg(Color::LightGreen)
    }

    pub fn operator(&self) -> Style {
        self.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub fn paren(&self) -> Style {
        self.fg(Color::LightBlue)
    }

    pub fn invalid(&self) -> Style {
        self.fg(Color::Red).add_modifier(Modifier::UNDERLINED)
    }

    pub fn entry(&self, selected: bool) -> Style {
        self.fg(if selected { Color::Yellow } else { Color::Cyan })
    }

    pub fn result(&self) -> Style {
        self.fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        self.fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        self.fg(Color::DarkGray)
    }

    pub fn timing(&self) -> Style {
        self.fg(Color::Magenta)
    }

    pub fn key(&self) -> Style {
        self.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        self.fg(Color::Green).add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        self.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
    }

    pub fn warning(&self) -> Style {
        self.fg(Color::Yellow)
    }

    pub fn selection(&self) -> Style {
        if self.colored {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }
}

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // hard-break words wider than the line
        for c in word.chars() {
            let char_width = c.width().unwrap_or(1);
            if current.width() + char_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Clone, Copy, PartialEq)]
enum Class {
    Number,
    Operator,
    Paren,
    Space,
    Invalid,
}

fn classify(c: char) -> Class {
    match c {
        '0'..='9' | '.' => Class::Number,
        '+' | '-' | '*' | '/' => Class::Operator,
        '(' | ')' => Class::Paren,
        _ if c.is_whitespace() => Class::Space,
        _ => Class::Invalid,
    }
}

/// Splits an expression into styled runs; characters the engine rejects are flagged.
pub fn highlight_expression(expr: &str, theme: &Theme) -> Vec<Span<'static>> {
    let style_for = |class: Class| match class {
        Class::Number => theme.number(),
        Class::Operator => theme.operator(),
        Class::Paren => theme.paren(),
        Class::Space => Style::default(),
        Class::Invalid => theme.invalid(),
    };

    let mut spans = Vec::new();
    let mut current = String::new();
    let mut current_class = None;

    for c in expr.chars() {
        let class = classify(c);
        if current_class != Some(class) {
            if let Some(prev) = current_class {
                spans.push(Span::styled(std::mem::take(&mut current), style_for(prev)));
            }
            current_class = Some(class);
        }
        current.push(c);
    }

    if let Some(prev) = current_class {
        spans.push(Span::styled(current, style_for(prev)));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_text("2 + 3 * 4", 5), vec!["2 + 3", "* 4"]);
        assert_eq!(wrap_text("", 5), Vec::<String>::new());
        assert_eq!(wrap_text("abc", 0), vec![""]);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap_text("1234567", 3), vec!["123", "456", "7"]);
        assert_eq!(wrap_text("1 1234", 3), vec!["1", "123", "4"]);
    }

    #[test]
    fn highlight_groups_runs() {
        let theme = Theme::new(true);
        let spans = highlight_expression("12.5+(x)", &theme);
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["12.5", "+", "(", "x", ")"]);
        assert_eq!(spans[3].style, theme.invalid());
        assert_eq!(spans[0].style, theme.number());
    }

    #[test]
    fn monochrome_theme_has_no_colors() {
        let theme = Theme::new(false);
        assert_eq!(theme.number().fg, None);
        assert_eq!(theme.error().fg, None);
        assert!(theme.error().add_modifier.contains(Modifier::BOLD));
    }
}
