//! Terrain mutation operators.
//!
//! Every operator visits only the columns inside its footprint and returns the
//! inclusive span it visited, or `None` when the footprint misses the world or
//! the parameters are unusable. Callers are responsible for re-running the
//! separation sync afterwards.

use glam::Vec2;
use rand::Rng;
use scorch_core::{ColumnSpan, CraterShape, Heightmap, MIN_CEILING_GAP};

use crate::shape::{Extent, Silhouette};

/// Fraction of a void beam's half-width that is cut to full depth.
const BEAM_CORE_FRACTION: f32 = 0.6;
/// Columns on either side of a fissure sample that share its deepening.
const FISSURE_SPREAD: i64 = 2;
/// Sideways jitter of fissure samples relative to the crack length.
const FISSURE_JITTER: f32 = 0.04;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Floor,
    Ceiling,
}

/// Picks whichever layer's surface lies closer to `y`; ties go to the floor.
fn nearest_layer(map: &Heightmap, column: usize, y: f32) -> Layer {
    let ceiling = map.ceiling_at_column(column);
    if ceiling <= 0.0 {
        return Layer::Floor;
    }
    let floor = map.floor()[column];
    if (ceiling - y).abs() < (floor - y).abs() {
        Layer::Ceiling
    } else {
        Layer::Floor
    }
}

fn column_range(map: &Heightmap, left: f32, right: f32) -> Option<(usize, usize)> {
    if !left.is_finite() || !right.is_finite() || map.width() == 0 {
        return None;
    }
    let first = left.ceil().max(0.0);
    let last = right.floor().min((map.width() - 1) as f32);
    if first > last {
        return None;
    }
    Some((first as usize, last as usize))
}

fn lower_floor(map: &mut Heightmap, column: usize, target: f32) {
    let floor = &mut map.floor_mut()[column];
    if target > *floor {
        *floor = target;
    }
}

fn raise_floor(map: &mut Heightmap, column: usize, target: f32) {
    let top = map.band().0;
    let ceiling = map.ceiling_at_column(column);
    let mut target = target.max(top);
    if ceiling > 0.0 {
        target = target.max(ceiling + MIN_CEILING_GAP);
    }
    let floor = &mut map.floor_mut()[column];
    if target < *floor {
        *floor = target;
    }
}

fn retract_ceiling(map: &mut Heightmap, column: usize, target: f32) {
    let Some(heights) = map.ceiling_heights_mut() else {
        return;
    };
    let ceiling = &mut heights[column];
    if *ceiling > 0.0 && target < *ceiling {
        *ceiling = if target > 0.0 { target } else { 0.0 };
    }
}

fn blast_column(map: &mut Heightmap, column: usize, center_y: f32, extent: Extent) {
    match nearest_layer(map, column, center_y) {
        Layer::Floor => lower_floor(map, column, center_y + extent.below),
        Layer::Ceiling => retract_ceiling(map, column, center_y - extent.above),
    }
}

fn usable(center: Vec2, radius: f32) -> bool {
    center.is_finite() && radius.is_finite() && radius > 0.0
}

pub(crate) fn destroy_circle(map: &mut Heightmap, center: Vec2, radius: f32) -> Option<ColumnSpan> {
    destroy_shape(map, center, radius, CraterShape::Circle)
}

pub(crate) fn destroy_shape(
    map: &mut Heightmap,
    center: Vec2,
    radius: f32,
    shape: CraterShape,
) -> Option<ColumnSpan> {
    if !usable(center, radius) {
        return None;
    }
    let (first, last) = column_range(map, center.x - radius, center.x + radius)?;
    let silhouette = Silhouette::new(shape, radius);
    for column in first..=last {
        if let Some(extent) = silhouette.extent(column as f32 - center.x) {
            blast_column(map, column, center.y, extent);
        }
    }
    Some(ColumnSpan::new(first, last))
}

pub(crate) fn raise_mound(map: &mut Heightmap, center: Vec2, radius: f32) -> Option<ColumnSpan> {
    if !usable(center, radius) {
        return None;
    }
    let (first, last) = column_range(map, center.x - radius, center.x + radius)?;
    for column in first..=last {
        let dx = column as f32 - center.x;
        let reach = radius * radius - dx * dx;
        if reach < 0.0 {
            continue;
        }
        raise_floor(map, column, center.y - reach.sqrt());
    }
    Some(ColumnSpan::new(first, last))
}

/// Irregular envelope sampled at 5 to 8 control points.
///
/// Points are `(t, scale)` pairs where `t` runs from 0 to 1 across the
/// footprint and `scale` jitters around a triangular envelope that is zero at
/// both ends. Interior jitter stays under half the spacing so `t` is sorted.
fn jagged_envelope<R: Rng + ?Sized>(rng: &mut R) -> Vec<(f32, f32)> {
    let count: usize = rng.gen_range(5..=8);
    let spacing = 1.0 / (count - 1) as f32;
    (0..count)
        .map(|index| {
            if index == 0 || index == count - 1 {
                return (index as f32 * spacing, 0.0);
            }
            let t = index as f32 * spacing + rng.gen_range(-0.35..0.35) * spacing;
            let envelope = 1.0 - (2.0 * t - 1.0).abs();
            (t, envelope * rng.gen_range(0.55..1.25))
        })
        .collect()
}

fn sample_envelope(points: &[(f32, f32)], t: f32) -> f32 {
    for pair in points.windows(2) {
        let (t0, s0) = pair[0];
        let (t1, s1) = pair[1];
        if t <= t1 {
            let span = (t1 - t0).max(f32::EPSILON);
            let local = ((t - t0) / span).clamp(0.0, 1.0);
            return s0 + (s1 - s0) * local;
        }
    }
    0.0
}

pub(crate) fn raise_jagged_peak<R: Rng + ?Sized>(
    map: &mut Heightmap,
    center: Vec2,
    radius: f32,
    rng: &mut R,
) -> Option<ColumnSpan> {
    if !usable(center, radius) {
        return None;
    }
    let (first, last) = column_range(map, center.x - radius, center.x + radius)?;
    let envelope = jagged_envelope(rng);
    let left = center.x - radius;
    for column in first..=last {
        let t = (column as f32 - left) / (2.0 * radius);
        let height = radius * sample_envelope(&envelope, t);
        raise_floor(map, column, center.y - height);
    }
    Some(ColumnSpan::new(first, last))
}

pub(crate) fn dig_jagged_crater<R: Rng + ?Sized>(
    map: &mut Heightmap,
    center: Vec2,
    radius: f32,
    void_y: f32,
    rng: &mut R,
) -> Option<ColumnSpan> {
    if !usable(center, radius) {
        return None;
    }
    let void_y = if void_y.is_finite() {
        void_y
    } else {
        map.void_floor()
    };
    let (first, last) = column_range(map, center.x - radius, center.x + radius)?;
    let envelope = jagged_envelope(rng);
    let left = center.x - radius;
    for column in first..=last {
        let t = (column as f32 - left) / (2.0 * radius);
        let depth = radius * sample_envelope(&envelope, t);
        match nearest_layer(map, column, center.y) {
            Layer::Floor => lower_floor(map, column, (center.y + depth).min(void_y)),
            Layer::Ceiling => retract_ceiling(map, column, center.y - depth),
        }
    }
    Some(ColumnSpan::new(first, last))
}

pub(crate) fn carve_to_void<R: Rng + ?Sized>(
    map: &mut Heightmap,
    x: f32,
    width: f32,
    void_y: f32,
    rng: &mut R,
) -> Option<ColumnSpan> {
    let half = width * 0.5;
    if !x.is_finite() || !void_y.is_finite() || !half.is_finite() || half <= 0.0 {
        return None;
    }
    let (first, last) = column_range(map, x - half, x + half)?;
    let core = half * BEAM_CORE_FRACTION;
    for column in first..=last {
        let distance = (column as f32 - x).abs();
        if distance >= half {
            continue;
        }
        if distance <= core {
            lower_floor(map, column, void_y);
            continue;
        }
        let floor = map.floor()[column];
        let falloff = 1.0 - (distance - core) / (half - core);
        let fraction = (falloff * rng.gen_range(0.8..1.2)).clamp(0.0, 1.0);
        lower_floor(map, column, floor + (void_y - floor) * fraction);
    }
    Some(ColumnSpan::new(first, last))
}

pub(crate) fn carve_fissure<R: Rng + ?Sized>(
    map: &mut Heightmap,
    origin: Vec2,
    length: f32,
    depth: f32,
    angle: f32,
    rng: &mut R,
) -> (Option<ColumnSpan>, Vec<Vec2>) {
    if !origin.is_finite()
        || !angle.is_finite()
        || !length.is_finite()
        || !depth.is_finite()
        || length <= 0.0
        || depth <= 0.0
    {
        return (None, Vec::new());
    }

    let count: usize = rng.gen_range(12..=20);
    let direction = Vec2::new(angle.cos(), angle.sin());
    let normal = direction.perp();
    let jitter = length * FISSURE_JITTER;
    let points: Vec<Vec2> = (0..count)
        .map(|index| {
            let t = index as f32 / (count - 1) as f32;
            let offset = if index == 0 {
                0.0
            } else {
                rng.gen_range(-jitter..=jitter)
            };
            origin + direction * (length * t) + normal * offset
        })
        .collect();

    let (min_x, max_x) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), point| {
            (lo.min(point.x), hi.max(point.x))
        });
    let spread = FISSURE_SPREAD as f32;
    let Some((first, last)) = column_range(map, min_x - spread, max_x + spread) else {
        return (None, points);
    };

    let mut deepening = vec![0.0_f32; last - first + 1];
    for (index, point) in points.iter().enumerate() {
        let t = index as f32 / (count - 1) as f32;
        let taper = (1.0 - t) * (1.0 - t);
        let amount = depth * taper;
        let sample = point.x.round() as i64;
        for offset in -FISSURE_SPREAD..=FISSURE_SPREAD {
            let column = sample + offset;
            let Ok(column) = usize::try_from(column) else {
                continue;
            };
            if column < first || column > last {
                continue;
            }
            let share = 1.0 - offset.unsigned_abs() as f32 / (spread + 1.0);
            let slot = &mut deepening[column - first];
            *slot = slot.max(amount * share);
        }
    }

    for (offset, amount) in deepening.into_iter().enumerate() {
        if amount > 0.0 {
            let column = first + offset;
            let target = map.floor()[column] + amount;
            lower_floor(map, column, target);
        }
    }

    (Some(ColumnSpan::new(first, last)), points)
}

pub(crate) fn burn(map: &mut Heightmap, x: f32, radius: f32, amount: f32) -> Option<ColumnSpan> {
    if !radius.is_finite() || radius < 0.0 || !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    let (first, last) = column_range(map, x - radius, x + radius)?;
    let bottom = map.band().1;
    for floor in &mut map.floor_mut()[first..=last] {
        if *floor < bottom {
            *floor = (*floor + amount).min(bottom);
        }
    }
    Some(ColumnSpan::new(first, last))
}

/// Overwrites one floor column. Heights above the band top are clamped to it;
/// deeper values stay open so void gaps can be written.
pub(crate) fn set_height(map: &mut Heightmap, column: usize, height: f32) -> Option<ColumnSpan> {
    if column >= map.width() || !height.is_finite() {
        return None;
    }
    let top = map.band().0;
    map.floor_mut()[column] = height.max(top);
    Some(ColumnSpan::new(column, column))
}
