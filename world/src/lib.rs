#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative terrain state for Scorch.
//!
//! The world owns the installed [`Heightmap`] and is its only writer once the
//! generator hands it over. Every mutation arrives as a [`Command`] through
//! [`apply`], which runs the requested operator, re-establishes the
//! floor/ceiling separation invariant, and reports what changed as [`Event`]
//! values. Read access goes through the [`query`] module.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;
use scorch_core::{
    ColumnSpan, Command, CraterHeat, Event, Heightmap, SkipReason, TerrainStyle,
};

mod heat;
mod mutation;
pub mod query;
mod shape;

use heat::CraterHeatList;

/// Height bound reported by queries before any terrain is installed.
pub const DEFAULT_HEIGHT_BOUND: f32 = 900.0;

/// Represents the authoritative terrain of a single match.
#[derive(Debug, Default)]
pub struct World {
    terrain: Option<Terrain>,
    heat: CraterHeatList,
}

impl World {
    /// Creates a world with no terrain installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
struct Terrain {
    heightmap: Heightmap,
    style: TerrainStyle,
}

/// Applies the provided command to the world, mutating state in place.
///
/// `rng` feeds the operators that jitter their profiles; every other command
/// ignores it. Mutations issued before any terrain is installed are skipped
/// and reported through [`Event::MutationSkipped`].
pub fn apply<R: Rng + ?Sized>(
    world: &mut World,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    match command {
        Command::InstallTerrain {
            mut heightmap,
            style,
        } => {
            let skylights = heightmap.sync_ceiling();
            if !skylights.is_empty() {
                debug!("installed terrain opened {} skylight spans", skylights.len());
            }
            let width = u32::try_from(heightmap.width()).unwrap_or(u32::MAX);
            info!("installing {style} terrain ({width} columns)");
            world.heat.clear();
            world.terrain = Some(Terrain { heightmap, style });
            out_events.push(Event::TerrainInstalled { style, width });
        }
        Command::Tick { dt } => {
            world.heat.decay(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::DestroyCircle { center, radius } => mutate(
            world,
            Some(CraterHeat::fresh(center.x, center.y, radius)),
            out_events,
            |map| mutation::destroy_circle(map, center, radius),
        ),
        Command::DestroyShape {
            center,
            radius,
            shape,
        } => mutate(
            world,
            Some(CraterHeat::fresh(center.x, center.y, radius)),
            out_events,
            |map| mutation::destroy_shape(map, center, radius, shape),
        ),
        Command::RaiseMound { center, radius } => mutate(world, None, out_events, |map| {
            mutation::raise_mound(map, center, radius)
        }),
        Command::RaiseJaggedPeak { center, radius } => {
            mutate(world, None, out_events, |map| {
                mutation::raise_jagged_peak(map, center, radius, rng)
            });
        }
        Command::DigJaggedCrater {
            center,
            radius,
            void_y,
        } => mutate(
            world,
            Some(CraterHeat::fresh(center.x, center.y, radius)),
            out_events,
            |map| mutation::dig_jagged_crater(map, center, radius, void_y, rng),
        ),
        Command::CarveToVoid { x, width, void_y } => mutate(
            world,
            Some(CraterHeat::fresh(x, void_y, width * 0.5)),
            out_events,
            |map| mutation::carve_to_void(map, x, width, void_y, rng),
        ),
        Command::CarveFissure {
            origin,
            length,
            depth,
            angle,
        } => {
            let midpoint = origin + Vec2::new(angle.cos(), angle.sin()) * (length * 0.5);
            let heat = CraterHeat::fresh(midpoint.x, midpoint.y, length * 0.5);
            let mut traced: Vec<Vec2> = Vec::new();
            mutate(world, Some(heat), out_events, |map| {
                let (span, points) =
                    mutation::carve_fissure(map, origin, length, depth, angle, rng);
                traced = points;
                span
            });
            if !traced.is_empty() {
                out_events.push(Event::FissureTraced { points: traced });
            }
        }
        Command::Burn { x, radius, amount } => {
            let heat = CraterHeat::fresh(x, query::height_at(world, x), radius);
            mutate(world, Some(heat), out_events, |map| {
                mutation::burn(map, x, radius, amount)
            });
        }
        Command::SetHeight { column, height } => mutate(world, None, out_events, |map| {
            let column = usize::try_from(column).ok()?;
            mutation::set_height(map, column, height)
        }),
    }
}

fn mutate(
    world: &mut World,
    crater: Option<CraterHeat>,
    out_events: &mut Vec<Event>,
    operator: impl FnOnce(&mut Heightmap) -> Option<ColumnSpan>,
) {
    let Some(terrain) = world.terrain.as_mut() else {
        debug!("terrain mutation ignored before installation");
        out_events.push(Event::MutationSkipped {
            reason: SkipReason::Uninitialized,
        });
        return;
    };

    let Some(span) = operator(&mut terrain.heightmap) else {
        out_events.push(Event::MutationSkipped {
            reason: SkipReason::OutOfBounds,
        });
        return;
    };

    let skylights = terrain.heightmap.sync_ceiling();
    out_events.push(Event::TerrainChanged { span });
    for skylight in skylights {
        debug!(
            "skylight opened over columns {}..={}",
            skylight.start(),
            skylight.end()
        );
        out_events.push(Event::SkylightOpened { span: skylight });
    }

    if let Some(heat) = crater {
        world.heat.push(heat);
        out_events.push(Event::CraterRecorded { heat });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use scorch_core::{BaseStyle, MIN_CEILING_GAP};

    fn installed(heightmap: Heightmap) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::InstallTerrain {
                heightmap,
                style: TerrainStyle::new(BaseStyle::RollingHills, None),
            },
            &mut StepRng::new(0, 1),
            &mut events,
        );
        world
    }

    #[test]
    fn install_syncs_ceiling_and_reports_style() {
        let heightmap = Heightmap::flat(40, 900.0, 600.0).with_ceiling(vec![580.0; 40]);
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::InstallTerrain {
                heightmap,
                style: TerrainStyle::new(BaseStyle::Caves, None),
            },
            &mut StepRng::new(0, 1),
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TerrainInstalled {
                style: TerrainStyle::new(BaseStyle::Caves, None),
                width: 40,
            }]
        );
        assert!(query::ceiling_regions(&world).is_empty());
    }

    #[test]
    fn out_of_bounds_mutation_is_reported() {
        let mut world = installed(Heightmap::flat(100, 900.0, 500.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::DestroyCircle {
                center: Vec2::new(-500.0, 400.0),
                radius: 20.0,
            },
            &mut StepRng::new(0, 1),
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MutationSkipped {
                reason: SkipReason::OutOfBounds,
            }]
        );
        assert!(query::crater_heat(&world).is_empty());
    }

    #[test]
    fn floor_explosion_under_ceiling_reports_skylight() {
        let heightmap = Heightmap::flat(60, 900.0, 600.0).with_ceiling(vec![450.0; 60]);
        let mut world = installed(heightmap);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetHeight {
                column: 30,
                height: 470.0,
            },
            &mut StepRng::new(0, 1),
            &mut events,
        );

        assert!(events.contains(&Event::SkylightOpened {
            span: ColumnSpan::new(30, 30),
        }));
        let map = query::heightmap(&world).expect("terrain installed");
        assert!(map.min_separation().unwrap_or(f32::MAX) >= MIN_CEILING_GAP);
    }
}
