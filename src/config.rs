//! Runtime configuration.
//!
//! [`Config`] is the command-line surface of the terminal front-end;
//! [`SessionConfig`] is the plain value the library consumes.

use std::path::PathBuf;

use anyhow::{anyhow, ensure, Result};
use clap::Parser;
use log::LevelFilter;

use crate::catalog::max_template_size;
use crate::difficulty::DEFAULT_BASE_INTERVAL_MS;
use crate::entities::Field;

pub const DEFAULT_STEP_MS: u64 = 20;
pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Player sprite size, which the field must also fit.
const PLAYER_SIZE: (f64, f64) = (125.0, 46.0);

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub field: Field,
    pub base_interval_ms: u64,
    pub step_ms: u64,
    pub countdown_secs: u32,
    /// `None` seeds the RNG from entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            field: Field::default(),
            base_interval_ms: DEFAULT_BASE_INTERVAL_MS,
            step_ms: DEFAULT_STEP_MS,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.base_interval_ms > 0, "base interval must be positive");
        ensure!(self.step_ms > 0, "movement step period must be positive");
        ensure!(self.countdown_secs > 0, "countdown must be at least one second");

        ensure!(
            self.field.width.is_finite() && self.field.height.is_finite(),
            "play field {}x{} must be finite",
            self.field.width,
            self.field.height
        );

        let (tw, th) = max_template_size();
        let need_w = tw.max(PLAYER_SIZE.0);
        let need_h = th.max(PLAYER_SIZE.1);
        ensure!(
            self.field.width >= need_w && self.field.height >= need_h,
            "play field {}x{} is smaller than the largest sprite ({}x{})",
            self.field.width,
            self.field.height,
            need_w,
            need_h
        );
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(name = "meadow_run")]
#[command(about = "Catch the animals, dodge the trash")]
pub struct Config {
    /// Seed for obstacle spawning (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Main loop period at level 0; each level takes one millisecond off
    #[arg(long, default_value_t = DEFAULT_BASE_INTERVAL_MS)]
    pub base_interval_ms: u64,

    /// Period of one smoothed-movement sub-step
    #[arg(long, default_value_t = DEFAULT_STEP_MS)]
    pub step_ms: u64,

    /// Length of a timed game
    #[arg(long, default_value_t = DEFAULT_COUNTDOWN_SECS)]
    pub countdown_secs: u32,

    #[arg(long, default_value_t = 600.0)]
    pub field_width: f64,

    #[arg(long, default_value_t = 300.0)]
    pub field_height: f64,

    /// Do not ring the terminal bell on damage
    #[arg(long)]
    pub mute: bool,

    /// Write logs here; logging is off without it
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Overridden by RUST_LOG when set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn log_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|e| anyhow!("bad --log-level {:?}: {}", self.log_level, e))
    }

    pub fn session(&self) -> Result<SessionConfig> {
        let session = SessionConfig {
            field: Field {
                width: self.field_width,
                height: self.field_height,
            },
            base_interval_ms: self.base_interval_ms,
            step_ms: self.step_ms,
            countdown_secs: self.countdown_secs,
            seed: self.seed,
        };
        session.validate()?;
        Ok(session)
    }
}
