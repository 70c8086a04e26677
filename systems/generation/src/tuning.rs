use scorch_core::BaseStyle;
use serde::{Deserialize, Serialize};

/// Aggregated knobs controlling every adjustable aspect of terrain generation.
///
/// Missing fields fall back to their defaults when deserialised, so a tuning
/// file only needs to mention the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    /// Relative odds of each base archetype.
    pub style_weights: StyleWeights,
    /// Probability in `[0, 1]` that a feature overlay is applied.
    pub feature_chance: f32,
    /// Probability in `[0, 1]` that Caves produce a full-width tunnel.
    pub tunnel_chance: f32,
    /// Depth below the height bound that the edge fade blends toward.
    pub edge_baseline_offset: f32,
    /// Spawn fairness knobs.
    pub fairness: FairnessTuning,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            style_weights: StyleWeights::default(),
            feature_chance: 0.75,
            tunnel_chance: 0.3,
            edge_baseline_offset: 80.0,
            fairness: FairnessTuning::default(),
        }
    }
}

/// Relative weight of each base archetype in the weighted draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleWeights {
    /// Weight of [`BaseStyle::RollingHills`].
    pub rolling_hills: u32,
    /// Weight of [`BaseStyle::Canyon`].
    pub canyon: u32,
    /// Weight of [`BaseStyle::Plateau`].
    pub plateau: u32,
    /// Weight of [`BaseStyle::Islands`].
    pub islands: u32,
    /// Weight of [`BaseStyle::Caves`].
    pub caves: u32,
}

impl StyleWeights {
    /// Weight assigned to the archetype.
    #[must_use]
    pub const fn weight(&self, style: BaseStyle) -> u32 {
        match style {
            BaseStyle::RollingHills => self.rolling_hills,
            BaseStyle::Canyon => self.canyon,
            BaseStyle::Plateau => self.plateau,
            BaseStyle::Islands => self.islands,
            BaseStyle::Caves => self.caves,
        }
    }

    /// Sum of every weight.
    #[must_use]
    pub fn total(&self) -> u64 {
        BaseStyle::ALL
            .iter()
            .map(|style| u64::from(self.weight(*style)))
            .sum()
    }
}

impl Default for StyleWeights {
    fn default() -> Self {
        Self {
            rolling_hills: 30,
            canyon: 20,
            plateau: 20,
            islands: 15,
            caves: 15,
        }
    }
}

/// Controls how spawn areas are levelled against each other.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessTuning {
    /// Width in columns of the window averaged around each spawn.
    pub window: usize,
    /// Largest spread between spawn averages still treated as fair.
    pub threshold: f32,
    /// Radius of the local smoothing applied when spawns are already fair.
    pub smoothing_radius: f32,
    /// Radius of the cubic blend toward the shared mean otherwise.
    pub blend_radius: f32,
}

impl Default for FairnessTuning {
    fn default() -> Self {
        Self {
            window: 40,
            threshold: 25.0,
            smoothing_radius: 30.0,
            blend_radius: 80.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_favour_rolling_hills() {
        let weights = StyleWeights::default();
        assert_eq!(weights.total(), 100);
        assert_eq!(weights.weight(BaseStyle::RollingHills), 30);
        assert_eq!(weights.weight(BaseStyle::Caves), 15);
    }
}
