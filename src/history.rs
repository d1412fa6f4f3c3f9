use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only log of successful evaluations.
///
/// The date line is written lazily, right before the first entry of a session,
/// so sessions without results leave the file untouched.
pub struct HistoryLog {
    path: PathBuf,
    date: String,
    date_written: bool,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_date(path, Local::now().format("%-d.%-m.%Y").to_string())
    }

    pub fn with_date(path: impl Into<PathBuf>, date: String) -> Self {
        HistoryLog {
            path: path.into(),
            date,
            date_written: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, expression: &str, result: f64) -> Result<()> {
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history file {}", self.path.display()))?;

        if !self.date_written {
            writeln!(out, "{}", self.date)?;
            self.date_written = true;
            info!("history session started in {}", self.path.display());
        }
        writeln!(out, "{}", entry_line(expression, result))?;
        Ok(())
    }
}

fn entry_line(expression: &str, result: f64) -> String {
    format!("ex: {}    re: {:.6}", expression, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn date_is_written_once_per_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");

        let mut log = HistoryLog::with_date(&path, "19.10.2026".to_string());
        log.record("2+3*4", 14.0).unwrap();
        log.record("12.34+0.66", 13.0).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "19.10.2026\nex: 2+3*4    re: 14.000000\nex: 12.34+0.66    re: 13.000000\n"
        );
    }

    #[test]
    fn new_session_appends_its_own_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");

        HistoryLog::with_date(&path, "1.2.2026".to_string()).record("1+1", 2.0).unwrap();
        HistoryLog::with_date(&path, "2.2.2026".to_string()).record("7/2", 3.5).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec!["1.2.2026", "ex: 1+1    re: 2.000000", "2.2.2026", "ex: 7/2    re: 3.500000"]
        );
    }

    #[test]
    fn date_stamp_has_no_padding() {
        let log = HistoryLog::new("unused.txt");
        let parts: Vec<&str> = log.date.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(!parts[0].starts_with('0'));
        assert!(!parts[1].starts_with('0'));
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = HistoryLog::new(dir.path());
        assert!(log.record("1", 1.0).is_err());
    }
}
