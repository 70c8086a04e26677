use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use scorch_core::{Command, CraterShape};
use scorch_world::{query, World};

use crate::config::BarrageConfig;

/// Picks a random weapon effect aimed at the current ground surface.
pub(crate) fn random_shot<R: Rng + ?Sized>(
    world: &World,
    config: &BarrageConfig,
    rng: &mut R,
) -> Command {
    let width = query::heightmap(world).map_or(0, |map| map.width()) as f32;
    let x = if width > 0.0 {
        rng.gen_range(0.0..width)
    } else {
        0.0
    };
    let ground = query::height_at(world, x);
    let radius = if config.max_radius > config.min_radius {
        rng.gen_range(config.min_radius..=config.max_radius)
    } else {
        config.min_radius
    };
    let center = Vec2::new(x, ground);
    let void_y = query::height_bound(world) + 300.0;

    match rng.gen_range(0..8) {
        0 => Command::DestroyCircle { center, radius },
        1 => Command::DestroyShape {
            center,
            radius,
            shape: random_shape(rng),
        },
        2 => Command::RaiseMound { center, radius },
        3 => Command::RaiseJaggedPeak { center, radius },
        4 => Command::DigJaggedCrater {
            center,
            radius,
            void_y,
        },
        5 => Command::CarveToVoid {
            x,
            width: radius,
            void_y,
        },
        6 => Command::CarveFissure {
            origin: center,
            length: radius * 2.5,
            depth: radius * 0.6,
            angle: rng.gen_range(PI * 0.1..PI * 0.9),
        },
        _ => Command::Burn {
            x,
            radius,
            amount: radius * 0.2,
        },
    }
}

fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> CraterShape {
    match rng.gen_range(0..5) {
        0 => CraterShape::Circle,
        1 => CraterShape::Triangle,
        2 => CraterShape::Star,
        3 => CraterShape::Diamond,
        _ => CraterShape::Polygon {
            sides: rng.gen_range(3..=8),
            rotation: rng.gen_range(0.0..TAU),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shots_on_empty_world_still_build_commands() {
        let world = World::new();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let command = random_shot(&world, &BarrageConfig::default(), &mut rng);
            assert!(!matches!(command, Command::InstallTerrain { .. } | Command::Tick { .. }));
        }
    }
}
