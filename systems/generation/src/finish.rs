//! Passes that run after the base shape: edge fade, spawn fairness, and the
//! final clamp/validate sweep.

use scorch_core::Heightmap;

use crate::{
    draft::{cubic_falloff, Draft},
    tuning::FairnessTuning,
};

/// Blends columns near either edge toward a deep baseline.
///
/// The blend weight grows cubically toward the edge, so the terrain rolls off
/// gently at first and then drops. Void gap columns are left untouched.
pub(crate) fn fade_edges(draft: &mut Draft, margin: f32, baseline_offset: f32) {
    if margin <= 0.0 {
        return;
    }
    let baseline = draft.height_bound() + baseline_offset;
    let last = draft.width().saturating_sub(1) as f32;
    let Draft { map, void } = draft;
    for (column, y) in map.floor_mut().iter_mut().enumerate() {
        if void[column] {
            continue;
        }
        let distance = (column as f32).min(last - column as f32);
        if distance >= margin {
            continue;
        }
        let closeness = 1.0 - distance / margin;
        let weight = closeness * closeness * closeness;
        *y += (baseline - *y) * weight;
    }
}

/// Levels the ground around spawn positions.
///
/// When every spawn already sits within `threshold` of the others, each one
/// is only smoothed toward its own neighbourhood average. Otherwise every
/// spawn area is pulled toward the shared mean.
pub(crate) fn level_spawns(draft: &mut Draft, spawns: &[f32], tuning: &FairnessTuning) {
    if spawns.is_empty() || draft.width() == 0 {
        return;
    }
    let averages: Vec<f32> = spawns
        .iter()
        .map(|spawn| local_average(draft, *spawn, tuning.window))
        .collect();
    let lowest = averages.iter().copied().fold(f32::INFINITY, f32::min);
    let highest = averages.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if highest - lowest <= tuning.threshold {
        for (spawn, average) in spawns.iter().zip(&averages) {
            blend_toward(draft, *spawn, *average, tuning.smoothing_radius);
        }
    } else {
        let target = averages.iter().sum::<f32>() / averages.len() as f32;
        for spawn in spawns {
            blend_toward(draft, *spawn, target, tuning.blend_radius);
        }
    }
}

fn local_average(draft: &Draft, x: f32, window: usize) -> f32 {
    let half = (window / 2) as f32;
    let width = draft.width();
    let first = (x - half).ceil().max(0.0) as usize;
    let last = ((x + half).floor().max(0.0) as usize).min(width - 1);
    let (sum, count) = (first..=last)
        .filter(|column| !draft.void[*column])
        .map(|column| draft.map.floor()[column])
        .fold((0.0, 0_u32), |(sum, count), y| (sum + y, count + 1));
    if count == 0 {
        return draft.height_bound() * 0.6;
    }
    sum / count as f32
}

fn blend_toward(draft: &mut Draft, x: f32, target: f32, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let width = draft.width();
    let first = (x - radius).ceil().max(0.0) as usize;
    let last = ((x + radius).floor().max(0.0) as usize).min(width - 1);
    let Draft { map, void } = draft;
    let floor = map.floor_mut();
    for column in first..=last {
        if void[column] {
            continue;
        }
        let weight = cubic_falloff((column as f32 - x).abs() / radius);
        floor[column] += (target - floor[column]) * weight;
    }
}

/// Clamps non-void columns into the legal band and restores the ceiling gap.
pub(crate) fn seal(draft: Draft) -> Heightmap {
    let void = draft.void.clone();
    let mut map = draft.into_heightmap();
    map.clamp_to_band(&void);
    map.validate_separation();
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_sink_toward_baseline() {
        let mut draft = Draft::new(400, 900.0);
        fade_edges(&mut draft, 50.0, 80.0);

        let floor = draft.map.floor();
        assert!((floor[0] - 980.0).abs() < 1e-3);
        assert!((floor[399] - 980.0).abs() < 1e-3);
        assert_eq!(floor[200], 540.0);
        assert!(floor[10] > floor[30]);
    }

    #[test]
    fn edge_fade_skips_void_gaps() {
        let mut draft = Draft::new(100, 900.0);
        draft.open_void(0);
        let void_floor = draft.map.floor()[0];
        fade_edges(&mut draft, 20.0, 80.0);
        assert_eq!(draft.map.floor()[0], void_floor);
    }

    #[test]
    fn unfair_spawns_converge_on_shared_mean() {
        let mut draft = Draft::new(1_000, 900.0);
        for column in 500..1_000 {
            draft.map.floor_mut()[column] = 700.0;
        }
        let spawns = [200.0, 800.0];
        let tuning = FairnessTuning::default();

        level_spawns(&mut draft, &spawns, &tuning);

        let floor = draft.map.floor();
        assert!((floor[200] - 620.0).abs() < 1e-3);
        assert!((floor[800] - 620.0).abs() < 1e-3);
    }

    #[test]
    fn fair_spawns_keep_their_own_level() {
        let mut draft = Draft::new(1_000, 900.0);
        draft.map.floor_mut()[800] = 560.0;
        let spawns = [200.0, 800.0];

        level_spawns(&mut draft, &spawns, &FairnessTuning::default());

        let floor = draft.map.floor();
        assert_eq!(floor[200], 540.0);
        assert!(floor[800] < 560.0);
    }
}
