//! Base archetypes that lay down the initial floor (and, for caves, ceiling).

use std::f32::consts::{PI, TAU};

use rand::{seq::SliceRandom, Rng};
use scorch_core::BaseStyle;

use crate::{
    draft::{clamp_column, smootherstep, uniform, uniform_count, Draft},
    tuning::GenerationTuning,
};

/// Fills the draft with the chosen archetype.
pub(crate) fn lay_down<R: Rng + ?Sized>(
    draft: &mut Draft,
    style: BaseStyle,
    tuning: &GenerationTuning,
    rng: &mut R,
) {
    match style {
        BaseStyle::RollingHills => rolling_hills(draft, rng),
        BaseStyle::Canyon => canyon(draft, rng),
        BaseStyle::Plateau => plateau(draft, rng),
        BaseStyle::Islands => islands(draft, rng),
        BaseStyle::Caves => caves(draft, tuning.tunnel_chance, rng),
    }
}

#[derive(Clone, Copy, Debug)]
struct Wave {
    amplitude: f32,
    cycles: f32,
    phase: f32,
}

impl Wave {
    fn sample(&self, u: f32) -> f32 {
        self.amplitude * (TAU * self.cycles * u + self.phase).sin()
    }
}

fn rolling_hills<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let height_bound = draft.height_bound();
    hills(draft, height_bound * 0.6, 1.0, rng);
}

/// Three randomised sine waves plus light multi-frequency noise.
fn hills<R: Rng + ?Sized>(draft: &mut Draft, baseline: f32, scale: f32, rng: &mut R) {
    let height_bound = draft.height_bound();
    let width = draft.width().max(1) as f32;
    let octaves = [(0.5, 1.5, 0.10), (1.5, 3.5, 0.05), (3.5, 7.0, 0.025)];
    let waves = octaves.map(|(low, high, amplitude)| Wave {
        amplitude: height_bound * amplitude * uniform(rng, 0.5, 1.0) * scale,
        cycles: uniform(rng, low, high),
        phase: uniform(rng, 0.0, TAU),
    });
    let ripples = [
        (uniform(rng, 0.04, 0.07), uniform(rng, 3.0, 6.0), uniform(rng, 0.0, TAU)),
        (uniform(rng, 0.11, 0.17), uniform(rng, 1.5, 3.0), uniform(rng, 0.0, TAU)),
    ];

    let low = height_bound * 0.35;
    let high = height_bound * 0.9;
    for (column, y) in draft.map.floor_mut().iter_mut().enumerate() {
        let u = column as f32 / width;
        let mut value = baseline + waves.iter().map(|wave| wave.sample(u)).sum::<f32>();
        for (frequency, amplitude, phase) in ripples {
            value += amplitude * (column as f32 * frequency + phase).sin();
        }
        value += uniform(rng, -1.5, 1.5);
        *y = value.clamp(low, high);
    }
}

#[derive(Clone, Copy, Debug)]
struct Ledge {
    from_left: bool,
    depth: f32,
    width: usize,
}

fn canyon<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let height_bound = draft.height_bound();
    let width = draft.width();
    let shoulder = height_bound * uniform(rng, 0.35, 0.5);
    let bottom = height_bound * uniform(rng, 0.8, 0.92);
    let left = (width as f32 * uniform(rng, 0.28, 0.38)) as usize;
    let right = ((width as f32 * uniform(rng, 0.62, 0.72)) as usize).min(width);
    let tiers = uniform_count(rng, 2, 4) as f32;
    let ledges: Vec<Ledge> = (0..uniform_count(rng, 1, 3))
        .map(|_| Ledge {
            from_left: rng.gen_bool(0.5),
            depth: uniform(rng, 0.25, 0.7),
            width: uniform_count(rng, 12, 40),
        })
        .collect();

    let span = right.saturating_sub(left).max(1) as f32;
    let mut fractions = vec![0.0_f32; width];
    for column in left..right {
        let u = (column - left) as f32 / span;
        let raw = (PI * u).sin().max(0.0).powf(0.35);
        fractions[column] = (raw * tiers).floor() / tiers;
    }

    for ledge in &ledges {
        let mut trench: Vec<usize> = (left..right).collect();
        if !ledge.from_left {
            trench.reverse();
        }
        let Some(start) = trench
            .iter()
            .position(|column| fractions[*column] >= ledge.depth)
        else {
            continue;
        };
        for column in trench.iter().skip(start).take(ledge.width) {
            fractions[*column] = fractions[*column].min(ledge.depth);
        }
    }

    let shoulder_ripple = uniform(rng, 0.0, TAU);
    for (column, y) in draft.map.floor_mut().iter_mut().enumerate() {
        let fraction = fractions[column];
        let jitter = if fraction > 0.0 && fraction < 1.0 {
            uniform(rng, -6.0, 6.0)
        } else {
            uniform(rng, -1.5, 1.5)
        };
        let ripple = if fraction == 0.0 {
            8.0 * (column as f32 * 0.02 + shoulder_ripple).sin()
        } else {
            0.0
        };
        *y = shoulder + (bottom - shoulder) * fraction + jitter + ripple;
    }
}

fn plateau<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let height_bound = draft.height_bound();
    let width = draft.width() as f32;
    let mut levels = [0.38, 0.48, 0.58, 0.68, 0.78];
    levels.shuffle(rng);
    let count = uniform_count(rng, 3, 4);
    let elevations: Vec<f32> = levels[..count]
        .iter()
        .map(|level| height_bound * level + uniform(rng, -12.0, 12.0))
        .collect();
    let cliffs: Vec<(f32, f32)> = (1..count)
        .map(|index| {
            let centre = width * index as f32 / count as f32
                + uniform(rng, -width * 0.05, width * 0.05);
            (centre, uniform(rng, 15.0, 35.0))
        })
        .collect();

    for (column, y) in draft.map.floor_mut().iter_mut().enumerate() {
        let x = column as f32;
        let mut value = elevations[0];
        let mut on_cliff = false;
        for (index, (centre, cliff_width)) in cliffs.iter().enumerate() {
            let t = (x - (centre - cliff_width * 0.5)) / cliff_width;
            on_cliff |= t > 0.0 && t < 1.0;
            value += (elevations[index + 1] - elevations[index]) * smootherstep(t);
        }
        value += if on_cliff {
            uniform(rng, -3.0, 3.0)
        } else {
            uniform(rng, -1.0, 1.0)
        };
        *y = value;
    }
}

fn islands<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    const TIERS: [f32; 3] = [0.45, 0.55, 0.65];
    const SHOULDER: f32 = 14.0;

    let height_bound = draft.height_bound();
    let width = draft.width() as f32;
    let count = uniform_count(rng, 3, 5);
    let mut gaps: Vec<f32> = (1..count).map(|_| uniform(rng, 40.0, 90.0)).collect();
    let total_gap: f32 = gaps.iter().sum();
    if total_gap > width * 0.4 {
        let shrink = width * 0.4 / total_gap;
        for gap in &mut gaps {
            *gap *= shrink;
        }
    }
    let land = width - gaps.iter().sum::<f32>();
    let weights: Vec<f32> = (0..count).map(|_| uniform(rng, 0.7, 1.3)).collect();
    let total_weight: f32 = weights.iter().sum();

    let mut cursor = 0.0;
    for index in 0..count {
        let start = cursor;
        let end = if index + 1 == count {
            width
        } else {
            start + land * weights[index] / total_weight
        };
        let tier = TIERS[rng.gen_range(0..TIERS.len())];
        let level = height_bound * tier + uniform(rng, -20.0, 20.0);
        let bumps = Wave {
            amplitude: uniform(rng, 6.0, 18.0),
            cycles: uniform(rng, 0.5, 2.0),
            phase: uniform(rng, 0.0, TAU),
        };
        for column in column_span(start, end, draft.width()) {
            let x = column as f32;
            let edge = (x - start).min(end - 1.0 - x).max(0.0);
            let droop = if edge < SHOULDER {
                35.0 * (1.0 - edge / SHOULDER).powi(2)
            } else {
                0.0
            };
            let u = (x - start) / (end - start).max(1.0);
            draft.map.floor_mut()[column] = level + bumps.sample(u) + droop;
        }

        cursor = end;
        if let Some(gap) = gaps.get(index) {
            for column in column_span(cursor, cursor + gap, draft.width()) {
                draft.open_void(column);
            }
            cursor += gap;
        }
    }
}

/// Columns whose position falls in `[start, end)`.
fn column_span(start: f32, end: f32, width: usize) -> std::ops::Range<usize> {
    let first = start.max(0.0).ceil() as usize;
    let last = end.max(0.0).ceil() as usize;
    first.min(width)..last.min(width)
}

fn caves<R: Rng + ?Sized>(draft: &mut Draft, tunnel_chance: f32, rng: &mut R) {
    let height_bound = draft.height_bound();
    hills(draft, height_bound * 0.72, 0.5, rng);

    if rng.gen::<f32>() < tunnel_chance {
        tunnel(draft, rng);
    } else {
        overhangs(draft, rng);
    }

    draft.map.validate_separation();
}

fn tunnel<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let height_bound = draft.height_bound();
    let width = draft.width() as f32;
    let roof = height_bound * uniform(rng, 0.3, 0.38);
    let sway = Wave {
        amplitude: 18.0,
        cycles: uniform(rng, 1.0, 3.0),
        phase: uniform(rng, 0.0, TAU),
    };
    for column in column_span(width * 0.04, width * 0.96, draft.width()) {
        let u = column as f32 / width;
        draft.merge_ceiling(column, roof + sway.sample(u));
    }

    for _ in 0..uniform_count(rng, 3, 6) {
        let centre = uniform(rng, width * 0.1, width * 0.9);
        stalagmite(draft, centre, uniform(rng, 15.0, 35.0), uniform(rng, 40.0, 90.0));
    }
}

fn overhangs<R: Rng + ?Sized>(draft: &mut Draft, rng: &mut R) {
    let width = draft.width() as f32;
    let count = uniform_count(rng, 2, 4);
    let slot = width / count as f32;
    for index in 0..count {
        let region_width = uniform(rng, slot * 0.5, slot * 0.8);
        let start = slot * index as f32 + uniform(rng, 0.0, slot - region_width);
        let end = start + region_width;
        let middle = clamp_column((start + end) * 0.5, draft.width());
        let underside = draft.map.floor()[middle] - uniform(rng, 150.0, 230.0);
        for column in column_span(start, end, draft.width()) {
            let u = (column as f32 - start) / region_width.max(1.0);
            let thinning = 40.0 * (1.0 - (PI * u).sin());
            draft.merge_ceiling(column, underside - thinning);
        }
        for _ in 0..uniform_count(rng, 1, 2) {
            let centre = uniform(rng, start, end);
            stalagmite(draft, centre, uniform(rng, 10.0, 25.0), uniform(rng, 30.0, 60.0));
        }
    }
}

/// Triangular floor intrusion pointing up from the ground at `centre`.
fn stalagmite(draft: &mut Draft, centre: f32, half_width: f32, height: f32) {
    let width = draft.width();
    let base = draft.map.floor()[clamp_column(centre, width)];
    for column in column_span(centre - half_width, centre + half_width, width) {
        let reach = 1.0 - (column as f32 - centre).abs() / half_width;
        if reach <= 0.0 {
            continue;
        }
        let floor = &mut draft.map.floor_mut()[column];
        *floor = floor.min(base - height * reach);
    }
}
