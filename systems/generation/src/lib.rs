#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural terrain generation.
//!
//! The generator is a pure system: it owns no world state and reads nothing
//! but its tuning, the requested parameters, and the random stream it is
//! handed. It produces a [`GeneratedTerrain`] which converts into the
//! [`Command::InstallTerrain`] that hands the heightmap to the world.
//!
//! Generation runs in a fixed order: base archetype, edge fade, optional
//! feature overlay, spawn fairness, band clamp, and finally the separation
//! validator so that the installed terrain never shows a floor crossing its
//! ceiling.

use log::info;
use rand::Rng;
use scorch_core::{BaseStyle, Command, Heightmap, TerrainStyle};
use thiserror::Error;

mod base;
mod draft;
mod feature;
mod finish;
mod seed;
mod tuning;

pub use feature::compatible_features;
pub use seed::seed_stream;
pub use tuning::{FairnessTuning, GenerationTuning, StyleWeights};

use draft::Draft;

/// Edge fade margin used when callers do not supply one.
pub const DEFAULT_EDGE_MARGIN: f32 = 60.0;

/// Spawn positions, as fractions of the width, assumed when none are given.
pub const LEGACY_SPAWN_FRACTIONS: [f32; 2] = [0.2, 0.8];

/// Parameters describing the terrain a round needs.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    /// Number of columns.
    pub width: u32,
    /// Canvas height bound; the legal floor band derives from it.
    pub height_bound: f32,
    /// Horizontal spawn positions that should end up on comparable ground.
    pub spawn_xs: Vec<f32>,
    /// Width of the edge fade on each side.
    pub edge_margin: f32,
}

impl GenerationParams {
    /// Creates parameters with no explicit spawns and the default edge margin.
    #[must_use]
    pub fn new(width: u32, height_bound: f32) -> Self {
        Self {
            width,
            height_bound,
            spawn_xs: Vec::new(),
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }

    /// Replaces the spawn positions.
    #[must_use]
    pub fn with_spawns(mut self, spawn_xs: Vec<f32>) -> Self {
        self.spawn_xs = spawn_xs;
        self
    }

    /// Replaces the edge fade margin.
    #[must_use]
    pub fn with_edge_margin(mut self, edge_margin: f32) -> Self {
        self.edge_margin = edge_margin;
        self
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 {
            return Err(GenerationError::ZeroWidth);
        }
        if !self.height_bound.is_finite() || self.height_bound <= 0.0 {
            return Err(GenerationError::InvalidHeightBound(self.height_bound));
        }
        if !self.edge_margin.is_finite() || self.edge_margin < 0.0 {
            return Err(GenerationError::InvalidEdgeMargin(self.edge_margin));
        }
        if let Some(spawn) = self.spawn_xs.iter().find(|spawn| !spawn.is_finite()) {
            return Err(GenerationError::NonFiniteSpawn(*spawn));
        }
        Ok(())
    }

    /// Spawn positions clamped into the map, or the legacy pair when empty.
    fn resolved_spawns(&self) -> Vec<f32> {
        let last = self.width.saturating_sub(1) as f32;
        if self.spawn_xs.is_empty() {
            return LEGACY_SPAWN_FRACTIONS
                .iter()
                .map(|fraction| self.width as f32 * fraction)
                .collect();
        }
        self.spawn_xs
            .iter()
            .map(|spawn| spawn.clamp(0.0, last))
            .collect()
    }
}

/// Reasons generation refuses a request.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// The terrain would have no columns.
    #[error("terrain width must be at least one column")]
    ZeroWidth,
    /// The height bound is not a positive finite value.
    #[error("height bound must be positive and finite, got {0}")]
    InvalidHeightBound(f32),
    /// The edge margin is negative or not finite.
    #[error("edge margin must be finite and non-negative, got {0}")]
    InvalidEdgeMargin(f32),
    /// A spawn position is NaN or infinite.
    #[error("spawn position {0} is not finite")]
    NonFiniteSpawn(f32),
    /// Every archetype weight is zero.
    #[error("style weights sum to zero")]
    NoStyleWeight,
}

/// Heightmap and style produced by one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTerrain {
    /// Finished elevation store.
    pub heightmap: Heightmap,
    /// Archetype and overlay that produced it.
    pub style: TerrainStyle,
}

impl GeneratedTerrain {
    /// Wraps the terrain into the command that installs it into a world.
    #[must_use]
    pub fn into_command(self) -> Command {
        Command::InstallTerrain {
            heightmap: self.heightmap,
            style: self.style,
        }
    }
}

/// Pure system that generates terrain from a random stream.
#[derive(Clone, Debug, Default)]
pub struct Generation {
    tuning: GenerationTuning,
}

impl Generation {
    /// Creates a generator with the provided tuning.
    #[must_use]
    pub fn new(tuning: GenerationTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the generator runs with.
    #[must_use]
    pub fn tuning(&self) -> &GenerationTuning {
        &self.tuning
    }

    /// Generates a terrain, drawing the archetype and overlay from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        params: &GenerationParams,
        rng: &mut R,
    ) -> Result<GeneratedTerrain, GenerationError> {
        params.validate()?;
        let base = self.pick_base(rng)?;
        let feature = feature::choose(base, self.tuning.feature_chance, rng);
        Ok(self.build(params, TerrainStyle::new(base, feature), rng))
    }

    /// Generates a terrain of a fixed style.
    ///
    /// The overlay is applied as given even when it is not in the base's
    /// compatibility list.
    pub fn generate_style<R: Rng + ?Sized>(
        &self,
        params: &GenerationParams,
        style: TerrainStyle,
        rng: &mut R,
    ) -> Result<GeneratedTerrain, GenerationError> {
        params.validate()?;
        Ok(self.build(params, style, rng))
    }

    /// Weighted draw: the first archetype whose cumulative weight exceeds a
    /// uniform sample wins.
    fn pick_base<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BaseStyle, GenerationError> {
        let weights = &self.tuning.style_weights;
        let total = weights.total();
        if total == 0 {
            return Err(GenerationError::NoStyleWeight);
        }
        let sample = rng.gen_range(0..total);
        let mut cumulative = 0;
        for style in BaseStyle::ALL {
            cumulative += u64::from(weights.weight(style));
            if sample < cumulative {
                return Ok(style);
            }
        }
        Err(GenerationError::NoStyleWeight)
    }

    fn build<R: Rng + ?Sized>(
        &self,
        params: &GenerationParams,
        style: TerrainStyle,
        rng: &mut R,
    ) -> GeneratedTerrain {
        let spawns = params.resolved_spawns();
        let mut draft = Draft::new(params.width as usize, params.height_bound);

        base::lay_down(&mut draft, style.base, &self.tuning, rng);
        finish::fade_edges(
            &mut draft,
            params.edge_margin,
            self.tuning.edge_baseline_offset,
        );
        if let Some(overlay) = style.feature {
            feature::apply(&mut draft, overlay, &spawns, rng);
        }
        finish::level_spawns(&mut draft, &spawns, &self.tuning.fairness);
        let heightmap = finish::seal(draft);

        info!(
            "generated {style} terrain: {} columns, {} ceiling regions",
            heightmap.width(),
            heightmap.ceiling_regions().len()
        );
        GeneratedTerrain { heightmap, style }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::mock::StepRng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn weighted_pick_follows_cumulative_buckets() {
        let generation = Generation::new(GenerationTuning {
            style_weights: StyleWeights {
                rolling_hills: 0,
                canyon: 0,
                plateau: 5,
                islands: 0,
                caves: 0,
            },
            ..GenerationTuning::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..20 {
            assert_eq!(generation.pick_base(&mut rng), Ok(BaseStyle::Plateau));
        }
    }

    #[test]
    fn zero_weights_are_rejected() {
        let generation = Generation::new(GenerationTuning {
            style_weights: StyleWeights {
                rolling_hills: 0,
                canyon: 0,
                plateau: 0,
                islands: 0,
                caves: 0,
            },
            ..GenerationTuning::default()
        });
        let params = GenerationParams::new(100, 900.0);
        let result = generation.generate(&params, &mut StepRng::new(0, 1));
        assert_eq!(result, Err(GenerationError::NoStyleWeight));
    }

    #[test]
    fn legacy_spawns_used_when_none_given() {
        let params = GenerationParams::new(1_000, 900.0);
        assert_eq!(params.resolved_spawns(), vec![200.0, 800.0]);
        let clamped = params.with_spawns(vec![-20.0, 5_000.0]);
        assert_eq!(clamped.resolved_spawns(), vec![0.0, 999.0]);
    }
}
