//! Terminal calculator for `+ - * /` expressions with parentheses.
//!
//! [`calc_engine::evaluate`] is the engine entry point; the remaining modules
//! are the interactive front-ends and the files they read and write.

pub mod calc_engine;
pub mod config;
pub mod console;
pub mod format;
pub mod history;
#[cfg(feature = "line")]
pub mod line_mode;
#[cfg(feature = "tui")]
pub mod render_help;
pub mod repl;
pub mod session;
#[cfg(feature = "tui")]
pub mod tui_mode;
