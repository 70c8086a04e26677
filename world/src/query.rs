//! Read-only queries over the installed terrain.
//!
//! Every query tolerates a world with no terrain installed and coordinates
//! outside the map; both report the height bound as the ground level so that
//! callers treat them as open sky over bottomless ground.

use scorch_core::{Ceiling, ColumnSpan, CraterHeat, Heightmap, TerrainStyle};

use crate::{World, DEFAULT_HEIGHT_BOUND};

/// Horizontal distance sampled on each side when estimating ceiling slope.
const SLOPE_SAMPLE_OFFSET: f32 = 10.0;

/// Reports whether terrain has been installed.
#[must_use]
pub fn is_initialized(world: &World) -> bool {
    world.terrain.is_some()
}

/// Provides read-only access to the installed heightmap.
#[must_use]
pub fn heightmap(world: &World) -> Option<&Heightmap> {
    world.terrain.as_ref().map(|terrain| &terrain.heightmap)
}

/// Canvas height bound of the installed terrain, or the default before install.
#[must_use]
pub fn height_bound(world: &World) -> f32 {
    heightmap(world).map_or(DEFAULT_HEIGHT_BOUND, Heightmap::height_bound)
}

/// Style of the installed terrain.
#[must_use]
pub fn style(world: &World) -> Option<TerrainStyle> {
    world.terrain.as_ref().map(|terrain| terrain.style)
}

/// Human readable style name such as `"Canyon + Bridge"`.
#[must_use]
pub fn style_name(world: &World) -> Option<String> {
    style(world).map(|style| style.to_string())
}

/// Floor height at `x`, linearly interpolated between adjacent columns.
///
/// Returns the height bound for non-finite or out-of-range `x`.
#[must_use]
pub fn height_at(world: &World, x: f32) -> f32 {
    let Some(map) = heightmap(world) else {
        return DEFAULT_HEIGHT_BOUND;
    };
    interpolate(map.floor(), x).unwrap_or_else(|| map.height_bound())
}

/// Reports whether the point lies at or below the floor surface.
#[must_use]
pub fn is_below_floor(world: &World, x: f32, y: f32) -> bool {
    y >= height_at(world, x)
}

/// Reports whether the point lies inside overhang rock, between the world top
/// and the ceiling underside.
///
/// The column under `x` is checked first; when it carries no ceiling the two
/// neighbouring columns are tried so that thin edges still register hits.
#[must_use]
pub fn is_inside_ceiling(world: &World, x: f32, y: f32) -> bool {
    let Some(map) = heightmap(world) else {
        return false;
    };
    if !x.is_finite() || !y.is_finite() || map.ceiling_regions().is_empty() {
        return false;
    }
    let Some(column) = nearest_column(map, x) else {
        return false;
    };

    let candidates = [Some(column), column.checked_sub(1), column.checked_add(1)];
    candidates
        .into_iter()
        .flatten()
        .filter(|candidate| *candidate < map.width())
        .any(|candidate| {
            let ceiling = map.ceiling_at_column(candidate);
            ceiling > 0.0 && (0.0..=ceiling).contains(&y) && region_of(map, candidate).is_some()
        })
}

/// Ceiling underside at `x`, zero where no ceiling exists.
///
/// Interpolates between the surrounding columns when both carry a ceiling and
/// otherwise reports the nearest column's value.
#[must_use]
pub fn ceiling_at(world: &World, x: f32) -> f32 {
    let Some(map) = heightmap(world) else {
        return 0.0;
    };
    let Some(heights) = map.ceiling_heights() else {
        return 0.0;
    };
    if !x.is_finite() || x < 0.0 || x > (map.width().saturating_sub(1)) as f32 {
        return 0.0;
    }

    let left = x.floor() as usize;
    let right = (left + 1).min(map.width() - 1);
    let (a, b) = (heights[left], heights[right]);
    if a > 0.0 && b > 0.0 {
        let t = x - left as f32;
        return a + (b - a) * t;
    }
    nearest_column(map, x).map_or(0.0, |column| heights[column])
}

/// Reports whether the column under `x` carries a ceiling.
#[must_use]
pub fn has_ceiling_at(world: &World, x: f32) -> bool {
    ceiling_at(world, x) > 0.0
}

/// Approximate slope of the ceiling underside at `x`.
///
/// Samples ten units to each side; a side without ceiling falls back to the
/// value at `x`. Returns zero where no ceiling exists.
#[must_use]
pub fn ceiling_slope_at(world: &World, x: f32) -> f32 {
    let center = ceiling_at(world, x);
    if center <= 0.0 {
        return 0.0;
    }
    let sample = |offset: f32| {
        let value = ceiling_at(world, x + offset);
        if value > 0.0 {
            value
        } else {
            center
        }
    };
    let left = sample(-SLOPE_SAMPLE_OFFSET);
    let right = sample(SLOPE_SAMPLE_OFFSET);
    (right - left) / (2.0 * SLOPE_SAMPLE_OFFSET)
}

/// Contiguous ceiling regions, ordered left to right.
#[must_use]
pub fn ceiling_regions(world: &World) -> Vec<ColumnSpan> {
    heightmap(world).map_or_else(Vec::new, |map| map.ceiling_regions().to_vec())
}

/// Snapshot of the crater heat list, oldest entry first.
#[must_use]
pub fn crater_heat(world: &World) -> Vec<CraterHeat> {
    world.heat.snapshot()
}

fn nearest_column(map: &Heightmap, x: f32) -> Option<usize> {
    if !x.is_finite() || map.width() == 0 {
        return None;
    }
    let rounded = x.round();
    if rounded < 0.0 || rounded > (map.width() - 1) as f32 {
        return None;
    }
    Some(rounded as usize)
}

fn region_of(map: &Heightmap, column: usize) -> Option<ColumnSpan> {
    match map.ceiling() {
        Ceiling::Present(layer) => layer.region_containing(column),
        Ceiling::Absent => None,
    }
}

fn interpolate(values: &[f32], x: f32) -> Option<f32> {
    if !x.is_finite() || values.is_empty() || x < 0.0 {
        return None;
    }
    let last = values.len() - 1;
    if x > last as f32 {
        return None;
    }
    let left = x.floor() as usize;
    let right = (left + 1).min(last);
    let t = x - left as f32;
    Some(values[left] + (values[right] - values[left]) * t)
}
