#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scorch terrain engine.
//!
//! This crate defines the message surface that connects the procedural
//! generator, the authoritative world, and adapters. Producers submit
//! [`Command`] values describing desired terrain mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what actually changed. The [`Heightmap`] elevation store
//! lives here as well so that the generator and the world agree on a single
//! representation of the floor/ceiling layers and on the invariant that keeps
//! them apart.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod elevation;

pub use elevation::{Ceiling, CeilingLayer, Heightmap};

/// Minimum vertical distance that must separate a ceiling from the floor below it.
pub const MIN_CEILING_GAP: f32 = 60.0;

/// Narrowest run of ceiling columns kept as a region; narrower runs are noise.
pub const MIN_CEILING_REGION_WIDTH: usize = 5;

/// Distance below the height bound at which void gap columns are written.
pub const VOID_GAP_OFFSET: f32 = 2_000.0;

/// Fraction of the height bound that marks the highest legal ground.
pub const BAND_TOP_RATIO: f32 = 0.2;

/// Extra depth below the height bound that marks the lowest legal ground.
pub const BAND_BOTTOM_MARGIN: f32 = 100.0;

/// Maximum number of crater heat entries retained at once.
pub const CRATER_HEAT_CAPACITY: usize = 32;

/// Multiplicative heat decay applied per reference frame.
pub const CRATER_HEAT_DECAY: f32 = 0.96;

/// Heat below which a crater entry is dropped.
pub const CRATER_HEAT_THRESHOLD: f32 = 0.02;

/// Commands that express all permissible terrain mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the world's terrain with a freshly generated heightmap.
    InstallTerrain {
        /// Elevation store produced by the generator.
        heightmap: Heightmap,
        /// Archetype and overlay that produced the heightmap.
        style: TerrainStyle,
    },
    /// Advances the cosmetic clock, decaying crater heat.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Blasts a circular crater into whichever layer is nearest the center.
    DestroyCircle {
        /// Center of the explosion in world units.
        center: Vec2,
        /// Radius of the explosion.
        radius: f32,
    },
    /// Blasts a crater whose silhouette follows the provided shape.
    DestroyShape {
        /// Center of the explosion in world units.
        center: Vec2,
        /// Circumscribed radius of the shape.
        radius: f32,
        /// Silhouette of the crater.
        shape: CraterShape,
    },
    /// Piles a semicircular mound of earth on top of the floor.
    RaiseMound {
        /// Base center of the mound.
        center: Vec2,
        /// Radius of the mound.
        radius: f32,
    },
    /// Raises an irregular rocky peak from the floor.
    RaiseJaggedPeak {
        /// Base center of the peak.
        center: Vec2,
        /// Half-width and nominal height of the peak.
        radius: f32,
    },
    /// Digs an irregular crater that may reach the void threshold.
    DigJaggedCrater {
        /// Center of the crater.
        center: Vec2,
        /// Half-width and nominal depth of the crater.
        radius: f32,
        /// Deepest y the crater may reach.
        void_y: f32,
    },
    /// Cuts a vertical beam through the floor down to the void threshold.
    CarveToVoid {
        /// Horizontal center of the beam.
        x: f32,
        /// Full width of the beam.
        width: f32,
        /// Depth reached by the beam core.
        void_y: f32,
    },
    /// Traces a tapered crack through the floor.
    CarveFissure {
        /// Start of the crack.
        origin: Vec2,
        /// Length of the crack along its direction.
        length: f32,
        /// Depth added at the origin; tapers toward the far end.
        depth: f32,
        /// Direction of the crack in radians, measured in canvas space.
        angle: f32,
    },
    /// Erodes the floor uniformly, used for lingering fire damage.
    Burn {
        /// Horizontal center of the burning area.
        x: f32,
        /// Half-width of the burning area.
        radius: f32,
        /// Depth removed from every affected column.
        amount: f32,
    },
    /// Overrides the floor height of a single column.
    SetHeight {
        /// Column to override.
        column: u32,
        /// New floor y for the column.
        height: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a freshly generated terrain replaced the previous one.
    TerrainInstalled {
        /// Style of the installed terrain.
        style: TerrainStyle,
        /// Number of columns in the installed terrain.
        width: u32,
    },
    /// Reports the columns touched by a mutation.
    TerrainChanged {
        /// Inclusive column range the mutation visited.
        span: ColumnSpan,
    },
    /// Reports ceiling columns cleared because the floor closed the gap beneath them.
    SkylightOpened {
        /// Inclusive column range that lost its ceiling.
        span: ColumnSpan,
    },
    /// Reports the points sampled while tracing a fissure.
    FissureTraced {
        /// Jittered points along the crack, origin first.
        points: Vec<Vec2>,
    },
    /// Reports that a destructive mutation left a glowing crater.
    CraterRecorded {
        /// Heat entry pushed onto the crater heat list.
        heat: CraterHeat,
    },
    /// Indicates that the cosmetic clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that a mutation was ignored without touching the terrain.
    MutationSkipped {
        /// Reason the mutation was ignored.
        reason: SkipReason,
    },
}

/// Reasons a mutation may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// No terrain has been installed yet.
    Uninitialized,
    /// The mutation's footprint lies entirely outside the world.
    OutOfBounds,
}

/// Inclusive range of columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpan {
    start: usize,
    end: usize,
}

impl ColumnSpan {
    /// Creates a span covering `start..=end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// First column of the span.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Last column of the span.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of columns covered by the span.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// Reports whether the column falls within the span.
    #[must_use]
    pub const fn contains(&self, column: usize) -> bool {
        column >= self.start && column <= self.end
    }
}

/// Silhouette used when blasting a shaped crater.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CraterShape {
    /// Plain semicircular profile.
    Circle,
    /// Equilateral triangle with its apex pointing up.
    Triangle,
    /// Five-pointed star with its top point pointing up.
    Star,
    /// Diamond whose depth falls off linearly from the radius to zero.
    Diamond,
    /// Arbitrary regular polygon.
    Polygon {
        /// Number of sides; fewer than three falls back to a circle.
        sides: u32,
        /// Rotation of the first vertex in radians.
        rotation: f32,
    },
}

/// Base archetypes the generator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseStyle {
    /// Overlapping sine hills with light noise.
    RollingHills,
    /// Plateau shoulders separated by a tiered trench.
    Canyon,
    /// Flat mesas joined by steep cliffs.
    Plateau,
    /// Floating segments separated by void gaps.
    Islands,
    /// Hilly floor under a mandatory ceiling.
    Caves,
}

impl BaseStyle {
    /// Every archetype in declaration order.
    pub const ALL: [BaseStyle; 5] = [
        Self::RollingHills,
        Self::Canyon,
        Self::Plateau,
        Self::Islands,
        Self::Caves,
    ];

    /// Human readable archetype name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RollingHills => "Rolling Hills",
            Self::Canyon => "Canyon",
            Self::Plateau => "Plateau",
            Self::Islands => "Islands",
            Self::Caves => "Caves",
        }
    }
}

/// Optional overlays applied on top of a base archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureOverlay {
    /// Narrow rock spikes rising from the floor.
    Pillars,
    /// Walkable span with a true gap beneath it.
    Bridge,
    /// Additional overhang regions.
    Cavern,
    /// Pointed drips hanging from existing ceilings.
    Stalactites,
}

impl FeatureOverlay {
    /// Human readable overlay name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pillars => "Pillars",
            Self::Bridge => "Bridge",
            Self::Cavern => "Cavern",
            Self::Stalactites => "Stalactites",
        }
    }
}

/// Archetype and optional overlay chosen for a generated terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainStyle {
    /// Base archetype.
    pub base: BaseStyle,
    /// Overlay applied after the edge fade, if any.
    pub feature: Option<FeatureOverlay>,
}

impl TerrainStyle {
    /// Creates a style descriptor.
    #[must_use]
    pub const fn new(base: BaseStyle, feature: Option<FeatureOverlay>) -> Self {
        Self { base, feature }
    }
}

impl fmt::Display for TerrainStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.feature {
            Some(feature) => write!(f, "{} + {}", self.base.name(), feature.name()),
            None => f.write_str(self.base.name()),
        }
    }
}

/// Cosmetic glow left behind by a recent destructive mutation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraterHeat {
    /// Horizontal center of the crater.
    pub x: f32,
    /// Vertical center of the crater.
    pub y: f32,
    /// Radius of the crater.
    pub radius: f32,
    /// Remaining intensity in `(0, 1]`.
    pub heat: f32,
}

impl CraterHeat {
    /// Creates a fresh entry at full intensity.
    #[must_use]
    pub const fn fresh(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            heat: 1.0,
        }
    }
}
