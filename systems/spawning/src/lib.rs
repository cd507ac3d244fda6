#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for emitting wave spawn commands.

mod region;

use lone_tower_core::{Command, SessionStatus};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

pub use region::{SpawnRegion, SpawnRegionError};

const DEFAULT_SEED: u64 = 0x4c6f_6e65_546f_7772;

/// Policy deciding when the next wave arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WavePacing {
    /// Wait until the field is empty, then pause before the next wave.
    ClearAndPause {
        /// Frames between the field emptying and the next wave.
        pause_ticks: u32,
    },
    /// Spawn a wave at a fixed cadence regardless of survivors.
    Interval {
        /// Frames between consecutive waves.
        interval_ticks: u32,
    },
}

impl Default for WavePacing {
    fn default() -> Self {
        Self::ClearAndPause { pause_ticks: 120 }
    }
}

/// Parameters shaping wave size, cadence and placement.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// When waves are spawned.
    pub pacing: WavePacing,
    /// Enemy count before the per-wave increment is added.
    pub base_count: u32,
    /// Additional enemies per wave number.
    pub increment: u32,
    /// No enemy spawns within this distance of the tower.
    pub exclusion_radius: f32,
    /// Fraction of the screen size added to each side of the sampling box.
    pub margin: f32,
    /// Seed of the placement random stream.
    pub seed: u64,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            pacing: WavePacing::default(),
            base_count: 20,
            increment: 5,
            exclusion_radius: 400.0,
            margin: 0.5,
            seed: DEFAULT_SEED,
        }
    }
}

impl WaveTuning {
    /// Number of enemies in wave `wave`, counting from one.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.base_count
            .saturating_add(self.increment.saturating_mul(wave))
    }
}

/// Wave director that paces waves and samples spawn positions.
#[derive(Debug)]
pub struct WaveDirector {
    tuning: WaveTuning,
    region: SpawnRegion,
    rng: ChaCha8Rng,
    pause_elapsed: Option<u32>,
    since_last_wave: u32,
}

impl WaveDirector {
    /// Creates a new director seeded from `tuning.seed`.
    #[must_use]
    pub fn new(tuning: WaveTuning, region: SpawnRegion) -> Self {
        Self {
            tuning,
            region,
            rng: ChaCha8Rng::seed_from_u64(tuning.seed),
            pause_elapsed: None,
            since_last_wave: 0,
        }
    }

    /// Observes one simulated frame and emits `Command::SpawnWave` when the
    /// pacing policy says the next wave is due.
    pub fn handle(&mut self, status: &SessionStatus, active_enemies: usize, out: &mut Vec<Command>) {
        if !status.is_running() {
            return;
        }

        let due = match self.tuning.pacing {
            WavePacing::ClearAndPause { pause_ticks } => {
                if active_enemies > 0 {
                    self.pause_elapsed = None;
                    false
                } else {
                    let elapsed = self
                        .pause_elapsed
                        .map_or(0, |elapsed| elapsed.saturating_add(1));
                    let due = elapsed >= pause_ticks;
                    self.pause_elapsed = (!due).then_some(elapsed);
                    due
                }
            }
            WavePacing::Interval { interval_ticks } => {
                self.since_last_wave = self.since_last_wave.saturating_add(1);
                let due = self.since_last_wave >= interval_ticks.max(1);
                if due {
                    self.since_last_wave = 0;
                }
                due
            }
        };

        if !due {
            return;
        }

        let count = self.tuning.enemy_count(status.wave.saturating_add(1));
        let positions = (0..count)
            .map(|_| self.region.sample(&mut self.rng))
            .collect();
        out.push(Command::SpawnWave { positions });
    }

    /// Forgets pacing progress. The random stream keeps advancing so a reset
    /// session does not replay the previous one.
    pub fn reset(&mut self) {
        self.pause_elapsed = None;
        self.since_last_wave = 0;
    }
}
