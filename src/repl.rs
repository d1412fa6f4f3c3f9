use crate::calc_engine::EvaluationTrace;
use crate::console::{banner, render_outcome};
use crate::session::Session;
use anyhow::Result;
use std::io::{BufRead, Write};

pub fn is_quit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "quit" | "exit" | "q")
}

/// Splits off a leading `details ` or trailing ` details` marker.
pub fn split_details(input: &str) -> (bool, &str) {
    let lower = input.to_ascii_lowercase();
    if lower.starts_with("details ") {
        (true, input[8..].trim())
    } else if lower.ends_with(" details") {
        (true, input[..input.len() - 8].trim())
    } else {
        (false, input)
    }
}

pub fn run_plain<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    output: &mut W,
) -> Result<()> {
    let ansicolors = session.ansicolors();
    writeln!(output, "{}\n", banner(ansicolors))?;

    let mut lines = input.lines();
    loop {
        write!(output, ">>> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let expression = line.trim_end_matches('\r');

        if expression.is_empty() {
            continue;
        }
        if is_quit_command(expression) {
            break;
        }

        let result = session.evaluate(expression, &mut EvaluationTrace::new(false));
        writeln!(output, "{}", render_outcome(&result, ansicolors))?;
    }
    Ok(())
}
