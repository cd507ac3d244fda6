//! Session configuration loaded from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use lone_tower_system_spawning::{SpawnRegion, SpawnRegionError, WaveTuning};
use lone_tower_world::WorldTuning;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// The simulation cannot run at zero frames per second.
    #[error("arena.fps must be positive")]
    ZeroFrameRate,
    /// Projectiles would never reach their target.
    #[error("projectile.speed must be positive, got {speed}")]
    ProjectileSpeed {
        /// Configured speed.
        speed: f32,
    },
    /// Enemies would never touch the tower.
    #[error("tower.radius must be positive, got {radius}")]
    ContactRadius {
        /// Configured radius.
        radius: f32,
    },
    /// Projectiles would never strike their target.
    #[error("projectile.hit_radius must be positive, got {radius}")]
    HitRadius {
        /// Configured radius.
        radius: f32,
    },
    /// Enemies would spawn already dead.
    #[error("enemy.health must be positive, got {health}")]
    EnemyHealth {
        /// Configured health.
        health: i32,
    },
    /// Enemies would move away from the tower or teleport.
    #[error("enemy.speed must be finite and non-negative, got {speed}")]
    EnemySpeed {
        /// Configured speed.
        speed: f32,
    },
    /// Waves could never be placed.
    #[error("invalid spawn region")]
    SpawnRegion(#[from] SpawnRegionError),
}

/// Everything needed to start a session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// World tuning: arena, tower, enemies, projectiles and economy.
    pub world: WorldTuning,
    /// Wave pacing, size and placement.
    pub waves: WaveTuning,
}

impl SessionConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document cannot be parsed or validated.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects tunings the simulation cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.arena.fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        let speed = self.world.projectile.speed;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::ProjectileSpeed { speed });
        }

        let radius = self.world.tower.radius;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::ContactRadius { radius });
        }

        let radius = self.world.projectile.hit_radius;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::HitRadius { radius });
        }

        let health = self.world.enemy.health;
        if health <= 0 {
            return Err(ConfigError::EnemyHealth { health });
        }

        let speed = self.world.enemy.speed;
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(ConfigError::EnemySpeed { speed });
        }

        let _ = self.spawn_region()?;
        Ok(())
    }

    /// Builds the spawn region for the configured arena.
    ///
    /// # Errors
    ///
    /// Fails when the exclusion radius leaves nowhere to spawn.
    pub fn spawn_region(&self) -> Result<SpawnRegion, SpawnRegionError> {
        let arena = &self.world.arena;
        SpawnRegion::new(
            arena.width,
            arena.height,
            self.waves.margin,
            arena.center(),
            self.waves.exclusion_radius,
        )
    }

    /// Wall-clock length of one simulated frame.
    #[must_use]
    pub fn tick_length(&self) -> Duration {
        Duration::from_secs(1) / self.world.arena.fps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lone_tower_system_spawning::WavePacing;
    use lone_tower_world::ContactDamage;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.world.arena.fps, 60);
        assert_eq!(config.waves.pacing, WavePacing::ClearAndPause { pause_ticks: 120 });
    }

    #[test]
    fn partial_documents_override_only_named_values() {
        let config = SessionConfig::from_toml_str(
            r#"
            [world]
            contact_damage = "per_frame"

            [world.tower]
            damage = 40

            [waves]
            seed = 99

            [waves.pacing]
            mode = "interval"
            interval_ticks = 600
            "#,
        )
        .expect("valid document");

        assert_eq!(config.world.tower.damage, 40);
        assert_eq!(config.world.tower.range, 150.0);
        assert_eq!(config.world.contact_damage, ContactDamage::PerFrame);
        assert_eq!(config.waves.seed, 99);
        assert_eq!(
            config.waves.pacing,
            WavePacing::Interval {
                interval_ticks: 600
            }
        );
        assert_eq!(config.waves.base_count, 20);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = SessionConfig::from_toml_str("").expect("empty document");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let error = SessionConfig::from_toml_str("[world.arena]\nfps = 0\n")
            .expect_err("zero fps is invalid");
        assert!(matches!(error, ConfigError::ZeroFrameRate));
    }

    #[test]
    fn non_positive_hit_radius_is_rejected() {
        let error = SessionConfig::from_toml_str(
            "[world.projectile]\nhit_radius = 0.0\n[world.tower]\nrange = 5000.0\n",
        )
        .expect_err("projectiles could never hit");
        assert!(matches!(error, ConfigError::HitRadius { radius } if radius == 0.0));

        let mut config = SessionConfig::default();
        config.world.projectile.hit_radius = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::HitRadius { .. })));
    }

    #[test]
    fn enemies_must_spawn_alive() {
        let error = SessionConfig::from_toml_str("[world.enemy]\nhealth = 0\n")
            .expect_err("enemies would spawn dead");
        assert!(matches!(error, ConfigError::EnemyHealth { health: 0 }));

        let mut config = SessionConfig::default();
        config.world.enemy.health = -3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EnemyHealth { health: -3 })
        ));
    }

    #[test]
    fn enemy_speed_must_be_finite_and_non_negative() {
        let error = SessionConfig::from_toml_str("[world.enemy]\nspeed = -1.0\n")
            .expect_err("enemies would retreat");
        assert!(matches!(error, ConfigError::EnemySpeed { .. }));

        let mut config = SessionConfig::default();
        config.world.enemy.speed = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::EnemySpeed { .. })));

        config.world.enemy.speed = 0.0;
        config.validate().expect("stationary enemies are allowed");
    }

    #[test]
    fn unsatisfiable_exclusion_is_rejected() {
        let error = SessionConfig::from_toml_str("[waves]\nexclusion_radius = 100000.0\n")
            .expect_err("nowhere to spawn");
        assert!(matches!(
            error,
            ConfigError::SpawnRegion(SpawnRegionError::Unsatisfiable { .. })
        ));
    }

    #[test]
    fn unknown_pacing_mode_fails_to_parse() {
        let error = SessionConfig::from_toml_str("[waves.pacing]\nmode = \"sometimes\"\n")
            .expect_err("unknown mode");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("/nonexistent/lone-tower.toml");
        let error = SessionConfig::load(path).expect_err("file does not exist");
        assert!(error.to_string().contains("lone-tower.toml"));
    }

    #[test]
    fn tick_length_follows_the_frame_rate() {
        let config = SessionConfig::default();
        assert_eq!(config.tick_length(), Duration::from_secs(1) / 60);
    }
}
