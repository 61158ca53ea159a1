use std::time::Duration;

use anyhow::ensure;
use clap::Parser;

use crate::game::{Game, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH};
use crate::gravity::GameLoop;
use crate::piece::{PieceProvider, RandomPieceProvider};

pub const MAX_BOARD_SIDE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Board width in cells
    #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH)]
    pub width: usize,

    /// Board height in cells
    #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT)]
    pub height: usize,

    /// Milliseconds between gravity ticks
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Seed for the piece generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Spawn from the six-kind pool that never yields J
    #[arg(long)]
    pub legacy_spawn: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            interval_ms: 500,
            seed: None,
            legacy_spawn: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (MIN_BOARD_WIDTH..=MAX_BOARD_SIDE).contains(&self.width),
            "width must be between {MIN_BOARD_WIDTH} and {MAX_BOARD_SIDE}, got {}",
            self.width
        );
        ensure!(
            (MIN_BOARD_HEIGHT..=MAX_BOARD_SIDE).contains(&self.height),
            "height must be between {MIN_BOARD_HEIGHT} and {MAX_BOARD_SIDE}, got {}",
            self.height
        );
        ensure!(self.interval_ms > 0, "gravity interval must be at least 1 ms");
        Ok(())
    }

    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn piece_provider(&self) -> Box<dyn PieceProvider> {
        let provider = match self.seed {
            Some(seed) => RandomPieceProvider::seeded(seed),
            None => RandomPieceProvider::new(),
        };
        if self.legacy_spawn {
            Box::new(provider.legacy())
        } else {
            Box::new(provider)
        }
    }

    /// A game loop for this configuration, with gravity stopped.
    pub fn build(&self) -> anyhow::Result<GameLoop> {
        self.validate()?;
        let game = Game::with_provider(self.width, self.height, self.piece_provider());
        Ok(GameLoop::new(game, self.gravity_interval()))
    }
}
