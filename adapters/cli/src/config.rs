use std::{fs, path::Path, time::Duration};

use alien_creep_core::PLAYABLE_WIDTH_UNITS;
use alien_creep_system_enemy_group::Config as GroupConfig;
use alien_creep_system_shooting::Config as ShootingConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Complete session configuration loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    pub(crate) group: GroupSection,
    pub(crate) shooting: ShootingSection,
    pub(crate) session: SessionSection,
}

impl SimulationConfig {
    /// Reads and parses the configuration file, or falls back to defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse simulation config toml contents")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GroupSection {
    rows: u32,
    columns: u32,
    speed: f32,
    start_y: f32,
    ground_threshold: f32,
    descent_distance: f32,
}

impl GroupSection {
    pub(crate) fn to_config(&self) -> GroupConfig {
        GroupConfig::new(
            self.rows,
            self.columns,
            self.speed,
            self.start_y,
            self.ground_threshold,
            self.descent_distance,
        )
    }
}

impl Default for GroupSection {
    fn default() -> Self {
        let defaults = GroupConfig::default();
        let dimensions = defaults.dimensions();
        Self {
            rows: dimensions.rows(),
            columns: dimensions.columns(),
            speed: defaults.speed(),
            start_y: defaults.start_y(),
            ground_threshold: defaults.ground_threshold(),
            descent_distance: defaults.descent_distance(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ShootingSection {
    shot_interval_ms: u64,
    bullet_speed: f32,
    gun_y: f32,
    ceiling_y: f32,
    points_per_enemy: u32,
}

impl ShootingSection {
    pub(crate) fn to_config(&self) -> ShootingConfig {
        ShootingConfig::new(
            Duration::from_millis(self.shot_interval_ms),
            self.bullet_speed,
            PLAYABLE_WIDTH_UNITS as f32 / 2.0,
            self.gun_y,
            self.ceiling_y,
            self.points_per_enemy,
        )
    }
}

impl Default for ShootingSection {
    fn default() -> Self {
        Self {
            shot_interval_ms: 250,
            bullet_speed: 12.0,
            gun_y: 0.0,
            ceiling_y: 16.0,
            points_per_enemy: ShootingConfig::default().points_per_enemy(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionSection {
    pub(crate) frame_ms: u64,
    pub(crate) max_frames: u64,
    pub(crate) seed: u64,
}

impl SessionSection {
    pub(crate) fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            max_frames: 200_000,
            seed: 7,
        }
    }
}
