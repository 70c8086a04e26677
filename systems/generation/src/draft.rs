use rand::Rng;
use scorch_core::{ColumnSpan, Heightmap};

/// Heightmap under construction together with its void gap mask.
#[derive(Debug)]
pub(crate) struct Draft {
    pub(crate) map: Heightmap,
    pub(crate) void: Vec<bool>,
}

impl Draft {
    pub(crate) fn new(width: usize, height_bound: f32) -> Self {
        Self {
            map: Heightmap::flat(width, height_bound, height_bound * 0.6),
            void: vec![false; width],
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.map.width()
    }

    pub(crate) fn height_bound(&self) -> f32 {
        self.map.height_bound()
    }

    /// Marks the column as a void gap and drops its floor out of sight.
    pub(crate) fn open_void(&mut self, column: usize) {
        let void_floor = self.map.void_floor();
        self.map.floor_mut()[column] = void_floor;
        self.void[column] = true;
    }

    /// Writes ceiling heights, keeping the larger underside where one exists.
    pub(crate) fn merge_ceiling(&mut self, column: usize, underside: f32) {
        if underside <= 0.0 || column >= self.width() {
            return;
        }
        let heights = self.map.ensure_ceiling_mut();
        let current = &mut heights[column];
        *current = current.max(underside);
    }

    pub(crate) fn ceiling_regions(&mut self) -> Vec<ColumnSpan> {
        self.map.rebuild_regions();
        self.map.ceiling_regions().to_vec()
    }

    pub(crate) fn into_heightmap(self) -> Heightmap {
        self.map
    }
}

/// Uniform draw in `[low, high)` that degrades to `low` for empty ranges.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Uniform draw in `[low, high]` that degrades to `low` for empty ranges.
pub(crate) fn uniform_count<R: Rng + ?Sized>(rng: &mut R, low: usize, high: usize) -> usize {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Column index nearest to `x`, clamped into the map.
pub(crate) fn clamp_column(x: f32, width: usize) -> usize {
    if width == 0 || !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x.round() as usize).min(width - 1)
}

/// Quintic ease used for steep but continuous transitions.
pub(crate) fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Cubic falloff kernel: one at the centre, zero at `u >= 1`.
pub(crate) fn cubic_falloff(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    1.0 - u * u * (3.0 - 2.0 * u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn degenerate_ranges_collapse_to_lower_bound() {
        let mut rng = StepRng::new(0, 1);
        assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(uniform_count(&mut rng, 4, 2), 4);
    }

    #[test]
    fn kernels_hit_their_endpoints() {
        assert_eq!(cubic_falloff(0.0), 1.0);
        assert_eq!(cubic_falloff(1.0), 0.0);
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert_eq!(clamp_column(-3.0, 10), 0);
        assert_eq!(clamp_column(42.4, 10), 9);
    }

    #[test]
    fn void_columns_are_flagged() {
        let mut draft = Draft::new(10, 900.0);
        draft.open_void(4);
        assert!(draft.void[4]);
        assert!(draft.map.is_void(draft.map.floor()[4]));
    }
}
