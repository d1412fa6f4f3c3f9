use crate::calc_engine::EvaluationTrace;
use crate::console::{banner, render_outcome};
use crate::format::{format_number, format_step};
use crate::repl::{is_quit_command, split_details};
use crate::session::Session;
use anyhow::Result;
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = ">>> ";

// Преобразование позиции символа в байтовую позицию
fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Default)]
struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    fn insert(&mut self, c: char) {
        let byte_idx = char_index_to_byte_index(&self.buffer, self.cursor);
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.delete();
        }
    }

    fn delete(&mut self) {
        let byte_idx = char_index_to_byte_index(&self.buffer, self.cursor);
        if byte_idx < self.buffer.len() {
            self.buffer.remove(byte_idx);
        }
    }

    fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    fn home(&mut self) {
        self.cursor = 0;
    }

    fn end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    fn replace(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.end();
    }

    // Terminal column (1-based) of the cursor after the prompt.
    fn cursor_column(&self) -> u16 {
        let byte_idx = char_index_to_byte_index(&self.buffer, self.cursor);
        (PROMPT.width() + self.buffer[..byte_idx].width() + 1) as u16
    }
}

/// Recall list for Up/Down. `index == entries.len()` means "new line".
#[derive(Default)]
struct Recall {
    entries: Vec<String>,
    index: usize,
}

impl Recall {
    fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.index = self.entries.len();
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    fn previous(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index).map(String::as_str)
    }

    fn next(&mut self) -> &str {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            &self.entries[self.index]
        } else {
            self.index = self.entries.len();
            ""
        }
    }
}

pub fn run_line(session: &mut Session) -> Result<()> {
    let ansicolors = session.ansicolors();
    println!("{}\n", banner(ansicolors));
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Commands: 'quit' to exit, 'clear' to reset history, 'details <expr>' for steps\n");

    let mut stdout = stdout().into_raw_mode()?;
    let mut keys = stdin().keys();
    let mut recall = Recall::default();

    loop {
        write!(stdout, "\r{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;
        let (_, row) = stdout.cursor_pos()?;
        let mut editor = LineEditor::default();

        loop {
            write!(
                stdout,
                "{}{}{}{}{}",
                Goto(1, row),
                ClearLine,
                PROMPT,
                editor.buffer,
                Goto(editor.cursor_column(), row)
            )?;
            stdout.flush()?;

            let Some(key) = keys.next() else {
                write!(stdout, "\r\n")?;
                return Ok(());
            };
            match key? {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                Key::Char(c) => editor.insert(c),
                Key::Backspace => editor.backspace(),
                Key::Delete => editor.delete(),
                Key::Left => editor.left(),
                Key::Right => editor.right(),
                Key::Home => editor.home(),
                Key::End => editor.end(),
                Key::Up => {
                    if let Some(line) = recall.previous() {
                        editor.replace(line);
                    }
                }
                Key::Down => {
                    let line = recall.next().to_string();
                    editor.replace(&line);
                }
                _ => {}
            }
        }

        write!(stdout, "\r\n")?;
        let expression = editor.buffer;
        if expression.is_empty() {
            continue;
        }
        let input = expression.trim();

        if is_quit_command(input) {
            return Ok(());
        }
        if matches!(input.to_lowercase().as_str(), "clear" | "reset") {
            recall.clear();
            write!(stdout, "History cleared\r\n")?;
            continue;
        }
        recall.push(input);

        let (detailed_mode, processed) = split_details(input);
        let mut trace = EvaluationTrace::new(detailed_mode);
        let result = session.evaluate(processed, &mut trace);
        write!(stdout, "{}\r\n", render_outcome(&result, ansicolors))?;

        if detailed_mode && !trace.steps.is_empty() {
            for (i, step) in trace.steps.iter().enumerate() {
                write!(
                    stdout,
                    "  Step {}: {} = {}\r\n",
                    i + 1,
                    format_step(step),
                    format_number(step.result)
                )?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_inside_the_line() {
        let mut editor = LineEditor::default();
        for c in "2+4".chars() {
            editor.insert(c);
        }
        editor.left();
        editor.insert('3');
        editor.insert('*');
        assert_eq!(editor.buffer, "2+3*4");

        editor.home();
        editor.delete();
        editor.backspace();
        assert_eq!(editor.buffer, "+3*4");
        assert_eq!(editor.cursor, 0);

        editor.end();
        editor.backspace();
        assert_eq!(editor.buffer, "+3*");
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut editor = LineEditor::default();
        assert_eq!(editor.cursor_column(), 5);
        editor.replace("1+1");
        assert_eq!(editor.cursor_column(), 8);
        editor.home();
        editor.right();
        assert_eq!(editor.cursor_column(), 6);
    }

    #[test]
    fn recall_walks_back_and_forth() {
        let mut recall = Recall::default();
        assert_eq!(recall.previous(), None);

        recall.push("1+1");
        recall.push("2*2");
        assert_eq!(recall.previous(), Some("2*2"));
        assert_eq!(recall.previous(), Some("1+1"));
        assert_eq!(recall.previous(), None);
        assert_eq!(recall.next(), "2*2");
        assert_eq!(recall.next(), "");

        recall.clear();
        assert_eq!(recall.previous(), None);
    }
}
