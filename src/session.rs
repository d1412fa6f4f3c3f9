use crate::calc_engine::{evaluate_traced, EvalError, EvaluationTrace};
use crate::config::Config;
use crate::history::HistoryLog;
use log::warn;

/// Everything a front-end needs between two submitted lines.
pub struct Session {
    config: Config,
    history: Option<HistoryLog>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let history = config.history_file.clone().map(HistoryLog::new);
        Self::with_history(config, history)
    }

    pub fn with_history(config: Config, history: Option<HistoryLog>) -> Self {
        Session { config, history }
    }

    pub fn ansicolors(&self) -> bool {
        self.config.ansicolors
    }

    pub fn evaluate(
        &mut self,
        expression: &str,
        trace: &mut EvaluationTrace,
    ) -> Result<f64, EvalError> {
        let result = evaluate_traced(expression, trace);

        if let (Ok(value), Some(history)) = (&result, self.history.as_mut()) {
            if let Err(e) = history.record(expression, *value) {
                warn!("history not written to {}: {:#}", history.path().display(), e);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn only_successes_reach_the_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.txt");
        let log = HistoryLog::with_date(&path, "5.5.2026".to_string());
        let mut session = Session::with_history(Config::default(), Some(log));

        assert_eq!(session.evaluate("6-3-2", &mut EvaluationTrace::new(false)), Ok(1.0));
        assert_eq!(
            session.evaluate("5/0", &mut EvaluationTrace::new(false)),
            Err(EvalError::DivisionByZero)
        );

        assert_eq!(fs::read_to_string(&path).unwrap(), "5.5.2026\nex: 6-3-2    re: 1.000000\n");
    }

    #[test]
    fn history_failures_do_not_fail_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::with_date(dir.path(), "5.5.2026".to_string());
        let mut session = Session::with_history(Config::default(), Some(log));

        assert_eq!(session.evaluate("2*21", &mut EvaluationTrace::new(false)), Ok(42.0));
    }

    #[test]
    fn disabled_history_from_config() {
        let config = Config::parse("history=\nansicolors=true");
        let session = Session::new(config);
        assert!(session.history.is_none());
        assert!(session.ansicolors());
    }
}
