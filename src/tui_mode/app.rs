use super::helpers::Theme;
use crate::calc_engine::{EvalError, EvaluationTrace, Step};
use crate::repl::{is_quit_command, split_details};
use crate::session::Session;
use std::time::{Duration, Instant};
use unicode_segmentation::UnicodeSegmentation;

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<f64, EvalError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

pub struct App {
    pub session: Session,
    pub theme: Theme,
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub history: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let theme = Theme::new(session.ansicolors());
        App {
            session,
            theme,
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            history: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();

        if self.cursor_position < self.input_scroll {
            self.input_scroll = self.cursor_position;
        } else if self.cursor_position >= self.input_scroll + visible_width {
            self.input_scroll = self.cursor_position + 1 - visible_width.max(1);
        }

        self.input_scroll = self.input_scroll.min(total_chars.saturating_sub(visible_width));
    }

    pub fn submit(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        if is_quit_command(&input) {
            self.should_quit = true;
            return;
        }
        match input.to_lowercase().as_str() {
            "clear" | "reset" => {
                self.history.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.clear_input();
                return;
            }
            "help" => {
                self.show_help = true;
                self.help_scroll = 0;
                self.clear_input();
                return;
            }
            _ => {}
        }

        let (detailed_mode, processed_input) = split_details(&input);

        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed_mode);
        let result = self.session.evaluate(processed_input, &mut trace);
        let duration = start_time.elapsed();

        self.history.push(HistoryEntry {
            input: processed_input.to_string(),
            result,
            detailed_steps: trace.steps,
            detailed_mode,
            duration,
        });

        self.cursor_history = self.history.len().saturating_sub(1);
        self.clear_input();
        self.scroll_to_bottom = true;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_at_cursor();
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let byte_idx = Self::char_index_to_byte_index(&self.input, self.cursor_position);
        if byte_idx < self.input.len() {
            self.input.remove(byte_idx);
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    // Char offsets where a non-blank word segment starts (numbers, operators, parens).
    fn word_starts(&self) -> Vec<usize> {
        self.input
            .split_word_bound_indices()
            .filter(|(_, segment)| !segment.trim().is_empty())
            .map(|(byte_idx, _)| self.input[..byte_idx].chars().count())
            .collect()
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let starts = self.word_starts();
        let pos = self.cursor_position;

        self.cursor_position = if direction < 0 {
            starts.into_iter().rev().find(|&s| s < pos).unwrap_or(0)
        } else {
            starts
                .into_iter()
                .find(|&s| s > pos)
                .unwrap_or_else(|| self.input.chars().count())
        };
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.history.len().saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.load_selected_entry();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.history.len().saturating_sub(1));
        }
        self.load_selected_entry();
    }

    fn load_selected_entry(&mut self) {
        match self.history.get(self.cursor_history) {
            Some(entry) => self.input = entry.input.clone(),
            None => self.input.clear(),
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn app() -> App {
        App::new(Session::with_history(Config::default(), None))
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn submit_records_results_and_errors() {
        let mut app = app();
        type_line(&mut app, "(2+3)*4");
        app.submit();
        type_line(&mut app, "  5/0 ");
        app.submit();

        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history[0].result, Ok(20.0));
        assert_eq!(app.history[1].input, "5/0");
        assert_eq!(app.history[1].result, Err(EvalError::DivisionByZero));
        assert_eq!(app.cursor_history, 1);
        assert!(app.input.is_empty());
        assert!(app.scroll_to_bottom);
    }

    #[test]
    fn details_keeps_fold_steps() {
        let mut app = app();
        type_line(&mut app, "details 6-3-2");
        app.submit();

        let entry = &app.history[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.input, "6-3-2");
        assert_eq!(entry.result, Ok(1.0));
        assert_eq!(entry.detailed_steps.len(), 2);
    }

    #[test]
    fn commands_do_not_evaluate() {
        let mut app = app();
        type_line(&mut app, "1+1");
        app.submit();

        type_line(&mut app, "help");
        app.submit();
        assert!(app.show_help);

        type_line(&mut app, "CLEAR");
        app.submit();
        assert!(app.history.is_empty());

        type_line(&mut app, "q");
        app.submit();
        assert!(app.should_quit);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut app = app();
        type_line(&mut app, "   ");
        app.submit();
        assert!(app.history.is_empty());
    }

    #[test]
    fn editing_keys() {
        let mut app = app();
        type_line(&mut app, "2+4");
        app.move_cursor(-1);
        type_line(&mut app, "3*");
        assert_eq!(app.input, "2+3*4");

        app.move_cursor_to_start();
        app.delete_at_cursor();
        app.delete_before_cursor();
        assert_eq!(app.input, "+3*4");

        app.move_cursor_to_end();
        app.delete_before_cursor();
        assert_eq!(app.input, "+3*");
    }

    #[test]
    fn word_jumps_follow_tokens() {
        let mut app = app();
        type_line(&mut app, "10 + 20");

        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 5);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 3);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 0);
        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 0);

        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 3);
        app.move_cursor_by_words(1);
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 7);
    }

    #[test]
    fn history_navigation_loads_inputs() {
        let mut app = app();
        for line in ["1+1", "2+2", "3+3"] {
            type_line(&mut app, line);
            app.submit();
        }

        app.navigate_history(-1);
        assert_eq!(app.input, "2+2");
        app.navigate_history(-1);
        app.navigate_history(-1);
        assert_eq!(app.input, "1+1");
        app.navigate_history(1);
        assert_eq!(app.input, "2+2");
        assert_eq!(app.cursor_position, 3);
    }

    #[test]
    fn input_scroll_follows_cursor() {
        let mut app = app();
        type_line(&mut app, "123456789");
        app.adjust_input_scroll(4);
        assert_eq!(app.input_scroll, 5);

        app.move_cursor_to_start();
        app.adjust_input_scroll(4);
        assert_eq!(app.input_scroll, 0);
    }
}
