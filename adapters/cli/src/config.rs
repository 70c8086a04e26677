use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use scorch_system_generation::GenerationTuning;
use serde::Deserialize;

/// Settings read from the optional `--config` TOML file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    /// Generator tuning, see [`GenerationTuning`].
    pub(crate) generation: GenerationTuning,
    /// Random barrage fired at the terrain after generation.
    pub(crate) barrage: BarrageConfig,
}

/// Controls the random shots fired by `--barrage`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct BarrageConfig {
    /// Shots fired when `--barrage` is not given on the command line.
    pub(crate) shots: u32,
    /// Smallest blast radius.
    pub(crate) min_radius: f32,
    /// Largest blast radius.
    pub(crate) max_radius: f32,
    /// Sixtieth-of-a-second ticks simulated between shots.
    pub(crate) ticks_between_shots: u32,
}

impl Default for BarrageConfig {
    fn default() -> Self {
        Self {
            shots: 0,
            min_radius: 20.0,
            max_radius: 70.0,
            ticks_between_shots: 30,
        }
    }
}

/// Reads and validates the config file at `path`.
pub(crate) fn load(path: &Path) -> Result<CliConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

fn parse(contents: &str) -> Result<CliConfig> {
    let config: CliConfig =
        toml::from_str(contents).context("failed to parse config toml contents")?;

    let chance = config.generation.feature_chance;
    if !(0.0..=1.0).contains(&chance) {
        bail!("generation.feature_chance must lie in [0, 1], got {chance}");
    }
    let barrage = &config.barrage;
    if !(barrage.min_radius > 0.0 && barrage.max_radius >= barrage.min_radius) {
        bail!(
            "barrage radii must satisfy 0 < min_radius <= max_radius, got {} and {}",
            barrage.min_radius,
            barrage.max_radius
        );
    }
    Ok(config)
}
