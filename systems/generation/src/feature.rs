//! Optional overlays layered on top of a base archetype.

use std::f32::consts::PI;

use log::debug;
use rand::{seq::SliceRandom, Rng};
use scorch_core::{BaseStyle, FeatureOverlay, MIN_CEILING_GAP};

use crate::draft::{clamp_column, uniform, uniform_count, Draft};

const PILLAR_ATTEMPTS: usize = 30;
const PILLAR_SPAWN_CLEARANCE: f32 = 60.0;
const CAVERN_ATTEMPTS: usize = 12;

/// Overlays that read well on top of the archetype.
#[must_use]
pub fn compatible_features(base: BaseStyle) -> &'static [FeatureOverlay] {
    use FeatureOverlay::{Bridge, Cavern, Pillars, Stalactites};
    match base {
        BaseStyle::RollingHills => &[Pillars, Bridge, Cavern, Stalactites],
        BaseStyle::Canyon => &[Bridge, Pillars, Stalactites],
        BaseStyle::Plateau => &[Pillars, Cavern, Bridge],
        BaseStyle::Islands => &[Pillars, Cavern],
        BaseStyle::Caves => &[Stalactites, Pillars],
    }
}

/// Rolls for an overlay compatible with `base`.
pub(crate) fn choose<R: Rng + ?Sized>(
    base: BaseStyle,
    chance: f32,
    rng: &mut R,
) -> Option<FeatureOverlay> {
    if rng.gen::<f32>() >= chance.clamp(0.0, 1.0) {
        return None;
    }
    compatible_features(base).choose(rng).copied()
}

pub(crate) fn apply<R: Rng + ?Sized>(
    draft: &mut Draft,
    feature: FeatureOverlay,
    spawns: &[f32],
    rng: &mut R,
) {
    match feature {
        FeatureOverlay::Pillars => pillars(draft, spawns, rng),
        FeatureOverlay::Bridge => bridge(draft, spawns, rng),
        FeatureOverlay::Cavern => {
            let _ = caverns(draft, rng);
        }
        FeatureOverlay::Stalactites => stalactites(draft, rng),
    }
}

fn pillars<R: Rng + ?Sized>(draft: &mut Draft, spawns: &[f32], rng: &mut R) {
    let width = draft.width() as f32;
    let height_bound = draft.height_bound();
    let mut placed: Vec<(f32, f32)> = Vec::new();

    for _ in 0..uniform_count(rng, 2, 4) {
        let half_width = uniform(rng, 4.0, 8.0);
        let height = height_bound * uniform(rng, 0.12, 0.22);
        let spot = (0..PILLAR_ATTEMPTS).find_map(|_| {
            let x = uniform(rng, width * 0.08, width * 0.92);
            let near_spawn = spawns
                .iter()
                .any(|spawn| (spawn - x).abs() < PILLAR_SPAWN_CLEARANCE + half_width);
            let crowded = placed.iter().any(|(other, other_half)| {
                (other - x).abs() < 2.0 * (half_width + other_half) + 40.0
            });
            let over_void = draft.void[clamp_column(x, draft.width())];
            (!near_spawn && !crowded && !over_void).then_some(x)
        });
        let Some(x) = spot else {
            debug!("pillar placement gave up after {PILLAR_ATTEMPTS} attempts");
            continue;
        };
        placed.push((x, half_width));
        raise_pillar(draft, x, half_width, height);
    }
}

fn raise_pillar(draft: &mut Draft, x: f32, half_width: f32, height: f32) {
    let width = draft.width();
    let base = draft.map.floor()[clamp_column(x, width)];
    let first = (x - half_width).ceil().max(0.0) as usize;
    let last = ((x + half_width).floor().max(0.0) as usize).min(width.saturating_sub(1));
    for column in first..=last {
        if draft.void[column] {
            continue;
        }
        let reach = 1.0 - (column as f32 - x).abs() / half_width;
        if reach <= 0.0 {
            continue;
        }
        let mut top = base - height * reach.sqrt();
        let ceiling = draft.map.ceiling_at_column(column);
        if ceiling > 0.0 {
            top = top.max(ceiling + MIN_CEILING_GAP);
        }
        let floor = &mut draft.map.floor_mut()[column];
        *floor = floor.min(top);
    }
}

/// Roof span over a trench: the deck keeps the old surface, the ground
/// beneath it drops away.
fn bridge<R: Rng + ?Sized>(draft: &mut Draft, spawns: &[f32], rng: &mut R) {
    let width = draft.width() as f32;
    let height_bound = draft.height_bound();
    let span = uniform(rng, width * 0.12, width * 0.2);
    let start = (0..PILLAR_ATTEMPTS)
        .map(|_| uniform(rng, width * 0.1, (width * 0.9 - span).max(width * 0.1)))
        .find(|start| {
            let left = start - PILLAR_SPAWN_CLEARANCE;
            let right = start + span + PILLAR_SPAWN_CLEARANCE;
            !spawns.iter().any(|spawn| (left..=right).contains(spawn))
        });
    let Some(start) = start else {
        debug!("bridge placement found no span clear of spawns");
        return;
    };

    let thickness = uniform(rng, 18.0, 28.0);
    let drop = height_bound * uniform(rng, 0.25, 0.35);
    let ramp = (span * 0.1).max(1.0);
    // One unit of slack keeps float rounding from closing the gap at the ramps.
    let clearance = MIN_CEILING_GAP + 1.0;
    let first = start.ceil().max(0.0) as usize;
    let last = ((start + span).floor().max(0.0) as usize).min(draft.width().saturating_sub(1));
    for column in first..=last {
        if draft.void[column] {
            continue;
        }
        let offset = column as f32 - start;
        let edge = offset.min(span - offset);
        let deck = draft.map.floor()[column];
        draft.merge_ceiling(column, deck + thickness);
        let sink = drop * (edge / ramp).clamp(0.0, 1.0);
        draft.map.floor_mut()[column] = deck + thickness + clearance.max(sink);
    }
}

/// Adds one or two overhangs. Returns how many were placed.
fn caverns<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) -> usize {
    let width = draft.width() as f32;
    let mut placed = 0;
    for _ in 0..uniform_count(rng, 1, 2) {
        let region_width = uniform(rng, width * 0.1, width * 0.2);
        let spot = (0..CAVERN_ATTEMPTS).find_map(|_| {
            let latest = (width * 0.95 - region_width).max(width * 0.05);
            let start = uniform(rng, width * 0.05, latest);
            let middle = clamp_column(start + region_width * 0.5, draft.width());
            (!draft.void[middle]).then_some((start, middle))
        });
        let Some((start, middle)) = spot else {
            debug!("cavern placement kept landing over void");
            continue;
        };
        let underside = draft.map.floor()[middle] - uniform(rng, 150.0, 230.0);
        if underside - 40.0 <= 0.0 {
            debug!("cavern at column {middle} would breach the world top");
            continue;
        }
        let first = start.ceil().max(0.0) as usize;
        let last = ((start + region_width) as usize).min(draft.width());
        for column in first..last {
            if draft.void[column] {
                continue;
            }
            let u = (column as f32 - start) / region_width.max(1.0);
            draft.merge_ceiling(column, underside - 40.0 * (1.0 - (PI * u).sin()));
        }
        placed += 1;
    }
    placed
}

fn stalactites<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let mut regions = draft.ceiling_regions();
    if regions.is_empty() {
        debug!("no ceiling for stalactites, carving a cavern first");
        if caverns(draft, rng) == 0 {
            return;
        }
        regions = draft.ceiling_regions();
    }
    if regions.is_empty() {
        return;
    }

    for _ in 0..uniform_count(rng, 8, 15) {
        let Some(region) = regions.choose(rng).copied() else {
            return;
        };
        let x = uniform(rng, region.start() as f32, region.end() as f32);
        let half_width = uniform(rng, 6.0, 14.0);
        let length = uniform(rng, 20.0, 50.0);
        let first = (x - half_width).ceil().max(region.start() as f32) as usize;
        let last = ((x + half_width).floor() as usize).min(region.end());
        let Some(heights) = draft.map.ceiling_heights_mut() else {
            return;
        };
        for column in first..=last {
            let reach = 1.0 - (column as f32 - x).abs() / half_width;
            if reach <= 0.0 || heights[column] <= 0.0 {
                continue;
            }
            heights[column] += length * reach * reach;
        }
    }
}
