use anyhow::Result;
use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use std::io;
use std::path::PathBuf;
use std::process;
use termcalc::config::{Config, DEFAULT_CONFIG_FILE};
use termcalc::repl;
use termcalc::session::Session;

#[derive(Debug, PartialEq)]
struct Args {
    plain: bool,
    line: bool,
    config: PathBuf,
    log_level: Option<LevelFilter>,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            plain: false,
            line: false,
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            log_level: None,
        }
    }
}

enum Command {
    Run(Args),
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut parsed = Args::default();

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--plain" => parsed.plain = true,
            "--line" => parsed.line = true,
            _ => {
                if let Some(path) = arg.strip_prefix("--config=") {
                    parsed.config = PathBuf::from(path);
                } else if let Some(level) = arg.strip_prefix("--log-level=") {
                    let level = level
                        .parse::<LevelFilter>()
                        .map_err(|_| format!("unknown log level: {}", level))?;
                    parsed.log_level = Some(level);
                } else {
                    return Err(format!("unknown argument: {}", arg));
                }
            }
        }
    }
    Ok(Command::Run(parsed))
}

fn print_usage() {
    println!(
        "Usage: termcalc [OPTIONS]

Options:
    --plain                  Plain line-by-line prompt (no raw terminal)
    --line                   Line editor with history recall (needs the `line` feature)
    --config=PATH            Configuration file (default: config.ini)
    --log-level=LEVEL        Set log level (off/error/warn/info/debug/trace)
    --help, -h               Show this help"
    );
}

fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp_secs().try_init().ok();
}

fn run_plain(mut session: Session) -> Result<()> {
    info!("starting plain prompt");
    let stdin = io::stdin();
    repl::run_plain(&mut session, stdin.lock(), &mut io::stdout())
}

#[cfg(feature = "tui")]
fn run_interactive(session: Session) -> Result<()> {
    info!("starting terminal UI");
    termcalc::tui_mode::run_tui(session)
}

#[cfg(all(feature = "line", not(feature = "tui")))]
fn run_interactive(mut session: Session) -> Result<()> {
    info!("starting line editor");
    termcalc::line_mode::run_line(&mut session)
}

#[cfg(not(any(feature = "tui", feature = "line")))]
fn run_interactive(session: Session) -> Result<()> {
    run_plain(session)
}

fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            process::exit(2);
        }
    };

    init_logger(args.log_level);
    let config = Config::load(&args.config)?;
    let session = Session::new(config);

    if args.plain {
        return run_plain(session);
    }
    if args.line {
        #[cfg(feature = "line")]
        {
            let mut session = session;
            info!("starting line editor");
            return termcalc::line_mode::run_line(&mut session);
        }
        #[cfg(not(feature = "line"))]
        log::warn!("line editor not compiled in, using the default front-end");
    }
    run_interactive(session)
}
