//! Configuration loader.
//!
//! * Looks for `block-blast.toml` in the cwd unless overridden by `--config`.
//! * Every field has a default, so the file is optional.
//! * Command-line flags win over the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::core::SessionTiming;
use crate::types::{CLEAR_DELAY_MS, COMBO_POPUP_DELAY_MS, POPUP_TTL_MS, REFILL_DELAY_MS};

pub const DEFAULT_CONFIG_FILE: &str = "block-blast.toml";
pub const DEFAULT_HIGH_SCORE_FILE: &str = "block-blast-highscore.json";

#[derive(Debug, Parser)]
#[command(name = "block-blast", version, about = "8x8 block placement puzzle for the terminal")]
pub struct Cli {
    #[arg(short, long, help = "Path to the TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Seed for the shape generator (default: clock)")]
    pub seed: Option<u32>,

    #[arg(long, help = "Where the high score is kept")]
    pub high_score_file: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file (RUST_LOG sets the level)")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generator seed; taken from the clock when unset.
    pub seed: Option<u32>,
    pub high_score_file: PathBuf,
    /// Logging is off unless a file is given; the terminal belongs to the game.
    pub log_file: Option<PathBuf>,
    pub clear_delay_ms: u32,
    pub refill_delay_ms: u32,
    pub popup_ttl_ms: u32,
    pub combo_popup_delay_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            log_file: None,
            clear_delay_ms: CLEAR_DELAY_MS,
            refill_delay_ms: REFILL_DELAY_MS,
            popup_ttl_ms: POPUP_TTL_MS,
            combo_popup_delay_ms: COMBO_POPUP_DELAY_MS,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    /// Load from a TOML file.
    ///
    /// A missing file is only an error when `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text).with_context(|| format!("in {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read config {}", path.display())),
        }
    }

    /// Config file (explicit or default) with the command-line overrides applied.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path, true)?,
            None => Self::load(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(path) = &cli.high_score_file {
            self.high_score_file = path.clone();
        }
        if let Some(path) = &cli.log_file {
            self.log_file = Some(path.clone());
        }
    }

    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            clear_delay_ms: self.clear_delay_ms,
            refill_delay_ms: self.refill_delay_ms,
            popup_ttl_ms: self.popup_ttl_ms,
            combo_popup_delay_ms: self.combo_popup_delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timing(), SessionTiming::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str("seed = 7\nclear_delay_ms = 0\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.clear_delay_ms, 0);
        assert_eq!(config.refill_delay_ms, REFILL_DELAY_MS);
        assert_eq!(config.high_score_file, PathBuf::from(DEFAULT_HIGH_SCORE_FILE));
    }

    #[test]
    fn bad_value_is_an_error() {
        assert!(Config::from_toml_str("seed = \"abc\"").is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let mut config = Config::from_toml_str("seed = 7\nhigh_score_file = \"a.json\"").unwrap();
        let cli = Cli::parse_from(["block-blast", "--seed", "9", "--log-file", "game.log"]);
        config.apply_cli(&cli);

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.high_score_file, PathBuf::from("a.json"));
        assert_eq!(config.log_file, Some(PathBuf::from("game.log")));
    }

    #[test]
    fn missing_optional_file_is_default() {
        let path = std::env::temp_dir().join("block-blast-no-such-config.toml");
        assert_eq!(Config::load(&path, false).unwrap(), Config::default());
        assert!(Config::load(&path, true).is_err());
    }
}
