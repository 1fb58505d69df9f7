use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::GridInt;

/// Largest board the terminal front end is willing to lay out.
pub const MAX_GRID_SIZE: GridInt = 100;

/// Tunables for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Cells per row and per column.
    pub grid_size: GridInt,
    /// Tick interval a new game starts with, in milliseconds.
    pub initial_speed_ms: f64,
    /// Multiplier applied to the tick interval every time food is eaten.
    pub speed_factor: f64,
    /// Lower bound for the tick interval.
    pub min_interval_ms: f64,
    pub initial_snake_length: GridInt,
    /// Side of the square drawing surface, in pixels.
    pub canvas_size: f64,
    pub food_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: 20,
            initial_speed_ms: 200.0,
            speed_factor: 0.9,
            min_interval_ms: 40.0,
            initial_snake_length: 3,
            canvas_size: 400.0,
            food_score: 10,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 4 || self.grid_size > MAX_GRID_SIZE {
            bail!("grid size must be between 4 and {}, got {}", MAX_GRID_SIZE, self.grid_size);
        }
        if !(self.initial_speed_ms > 0.0) {
            bail!("initial speed must be positive, got {}", self.initial_speed_ms);
        }
        if !(self.speed_factor > 0.0 && self.speed_factor <= 1.0) {
            bail!("speed factor must be in (0, 1], got {}", self.speed_factor);
        }
        if !(self.min_interval_ms > 0.0) {
            bail!("minimum interval must be positive, got {}", self.min_interval_ms);
        }
        if self.initial_snake_length < 1 || self.initial_snake_length > self.grid_size / 2 {
            bail!(
                "initial snake length must be between 1 and {}, got {}",
                self.grid_size / 2,
                self.initial_snake_length
            );
        }
        if !(self.canvas_size > 0.0) {
            bail!("canvas size must be positive, got {}", self.canvas_size);
        }
        Ok(())
    }

    pub fn cell_size(&self) -> f64 {
        self.canvas_size / self.grid_size as f64
    }
}
