use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_HISTORY_FILE: &str = "history.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ansicolors: bool,
    /// `None` turns history logging off.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ansicolors: false,
            history_file: Some(PathBuf::from(DEFAULT_HISTORY_FILE)),
        }
    }
}

impl Config {
    /// Reads `key=value` settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("unable to open config file {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e)
                .with_context(|| format!("failed to read config file {}", path.display())),
        }
    }

    pub fn parse(contents: &str) -> Self {
        let mut config = Self::default();

        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("config line {}: expected key=value, got {:?}", number + 1, line);
                continue;
            };

            match key.trim() {
                "ansicolors" => config.ansicolors = parse_bool(value.trim()),
                "history" => {
                    let value = value.trim();
                    config.history_file = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                other => debug!("ignoring unknown config key {:?}", other),
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> bool {
    value == "true"
}
