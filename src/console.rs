use crate::calc_engine::EvalError;
use crate::format::format_number;
use colored::Colorize;

pub fn banner(ansicolors: bool) -> String {
    if ansicolors {
        format!("welcome to {}!", "termcalc".cyan().bold())
    } else {
        "welcome to termcalc!".to_string()
    }
}

pub fn render_outcome(result: &Result<f64, EvalError>, ansicolors: bool) -> String {
    match result {
        Ok(value) => {
            let text = format!("> {} <", format_number(*value));
            if ansicolors {
                text.green().bold().to_string()
            } else {
                text
            }
        }
        Err(e) => {
            let text = format!("> E - {} <", e);
            if ansicolors {
                text.red().bold().to_string()
            } else {
                text
            }
        }
    }
}
