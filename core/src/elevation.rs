use serde::{Deserialize, Serialize};

use crate::{
    ColumnSpan, BAND_BOTTOM_MARGIN, BAND_TOP_RATIO, MIN_CEILING_GAP, MIN_CEILING_REGION_WIDTH,
    VOID_GAP_OFFSET,
};

/// Per-column elevation store holding the floor and the optional ceiling.
///
/// Heights are canvas y coordinates: smaller values are higher ground. The
/// floor always spans the full width. The ceiling, when present, shares the
/// same indexing and marks the underside of overhang rock; a value of zero
/// means the column has no ceiling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heightmap {
    floor: Vec<f32>,
    ceiling: Ceiling,
    height_bound: f32,
}

/// Optional overhang layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Ceiling {
    /// No column carries overhang geometry.
    Absent,
    /// At least one region of overhang geometry exists.
    Present(CeilingLayer),
}

/// Ceiling heights together with the index of contiguous regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CeilingLayer {
    heights: Vec<f32>,
    regions: Vec<ColumnSpan>,
}

impl CeilingLayer {
    /// Underside y of every column, zero where no ceiling exists.
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Maximal runs of ceiling columns, ordered left to right.
    #[must_use]
    pub fn regions(&self) -> &[ColumnSpan] {
        &self.regions
    }

    /// Returns the region containing the column, if any.
    #[must_use]
    pub fn region_containing(&self, column: usize) -> Option<ColumnSpan> {
        self.regions
            .iter()
            .copied()
            .find(|region| region.contains(column))
    }
}

impl Heightmap {
    /// Creates a heightmap with a level floor and no ceiling.
    #[must_use]
    pub fn flat(width: usize, height_bound: f32, y: f32) -> Self {
        Self::from_floor(vec![y; width], height_bound)
    }

    /// Creates a heightmap from explicit floor heights and no ceiling.
    #[must_use]
    pub fn from_floor(floor: Vec<f32>, height_bound: f32) -> Self {
        Self {
            floor,
            ceiling: Ceiling::Absent,
            height_bound,
        }
    }

    /// Attaches ceiling heights, padding or truncating them to the floor width.
    ///
    /// Regions are rebuilt immediately; the separation invariant is not
    /// enforced here so callers can choose between [`Self::sync_ceiling`] and
    /// [`Self::validate_separation`].
    #[must_use]
    pub fn with_ceiling(mut self, mut heights: Vec<f32>) -> Self {
        heights.resize(self.floor.len(), 0.0);
        self.ceiling = Ceiling::Present(CeilingLayer {
            heights,
            regions: Vec::new(),
        });
        self.rebuild_regions();
        self
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.floor.len()
    }

    /// Canvas height bound supplied at generation time.
    #[must_use]
    pub fn height_bound(&self) -> f32 {
        self.height_bound
    }

    /// Floor heights of every column.
    #[must_use]
    pub fn floor(&self) -> &[f32] {
        &self.floor
    }

    /// Mutable access to the floor heights.
    pub fn floor_mut(&mut self) -> &mut [f32] {
        &mut self.floor
    }

    /// The ceiling layer.
    #[must_use]
    pub fn ceiling(&self) -> &Ceiling {
        &self.ceiling
    }

    /// Ceiling heights, or `None` when no ceiling exists.
    #[must_use]
    pub fn ceiling_heights(&self) -> Option<&[f32]> {
        match &self.ceiling {
            Ceiling::Absent => None,
            Ceiling::Present(layer) => Some(layer.heights()),
        }
    }

    /// Mutable ceiling heights, or `None` when no ceiling exists.
    ///
    /// Edits leave the region index stale until the next rebuild.
    pub fn ceiling_heights_mut(&mut self) -> Option<&mut [f32]> {
        match &mut self.ceiling {
            Ceiling::Absent => None,
            Ceiling::Present(layer) => Some(&mut layer.heights),
        }
    }

    /// Mutable ceiling heights, creating an empty layer first when absent.
    ///
    /// Edits leave the region index stale until the next rebuild.
    pub fn ensure_ceiling_mut(&mut self) -> &mut [f32] {
        if matches!(self.ceiling, Ceiling::Absent) {
            self.ceiling = Ceiling::Present(CeilingLayer {
                heights: vec![0.0; self.floor.len()],
                regions: Vec::new(),
            });
        }
        match &mut self.ceiling {
            Ceiling::Present(layer) => &mut layer.heights,
            Ceiling::Absent => &mut [],
        }
    }

    /// Ceiling regions, empty when no ceiling exists.
    #[must_use]
    pub fn ceiling_regions(&self) -> &[ColumnSpan] {
        match &self.ceiling {
            Ceiling::Absent => &[],
            Ceiling::Present(layer) => layer.regions(),
        }
    }

    /// Ceiling underside at the column, zero when the column has none.
    #[must_use]
    pub fn ceiling_at_column(&self, column: usize) -> f32 {
        self.ceiling_heights()
            .and_then(|heights| heights.get(column).copied())
            .unwrap_or(0.0)
    }

    /// Legal floor range `(highest, lowest)` as canvas y values.
    #[must_use]
    pub fn band(&self) -> (f32, f32) {
        (
            self.height_bound * BAND_TOP_RATIO,
            self.height_bound + BAND_BOTTOM_MARGIN,
        )
    }

    /// Floor y used for intentional void gap columns.
    #[must_use]
    pub fn void_floor(&self) -> f32 {
        self.height_bound + VOID_GAP_OFFSET
    }

    /// Reports whether the height lies below the legal band, i.e. in the void.
    #[must_use]
    pub fn is_void(&self, y: f32) -> bool {
        y > self.band().1
    }

    /// Clamps every floor column into the legal band.
    ///
    /// Columns flagged in `void_mask` are intentional void gaps and are left
    /// untouched; a mask shorter than the floor exempts nothing past its end.
    pub fn clamp_to_band(&mut self, void_mask: &[bool]) {
        let (top, bottom) = self.band();
        for (column, y) in self.floor.iter_mut().enumerate() {
            if void_mask.get(column).copied().unwrap_or(false) {
                continue;
            }
            *y = y.clamp(top, bottom);
        }
    }

    /// Smallest floor-to-ceiling distance over all ceiling columns.
    #[must_use]
    pub fn min_separation(&self) -> Option<f32> {
        let heights = self.ceiling_heights()?;
        heights
            .iter()
            .zip(&self.floor)
            .filter(|(ceiling, _)| **ceiling > 0.0)
            .map(|(ceiling, floor)| floor - ceiling)
            .reduce(f32::min)
    }

    /// Rebuilds the region index from scratch.
    ///
    /// Ceiling heights are first padded or truncated to the floor width.
    /// Runs narrower than [`MIN_CEILING_REGION_WIDTH`] are cleared. A ceiling
    /// left without any region collapses to [`Ceiling::Absent`].
    pub fn rebuild_regions(&mut self) {
        let width = self.floor.len();
        let Ceiling::Present(layer) = &mut self.ceiling else {
            return;
        };

        layer.heights.resize(width, 0.0);
        layer.regions.clear();
        let mut run_start = None;
        for column in 0..=layer.heights.len() {
            let solid = layer
                .heights
                .get(column)
                .is_some_and(|height| *height > 0.0);
            match (run_start, solid) {
                (None, true) => run_start = Some(column),
                (Some(start), false) => {
                    if column - start >= MIN_CEILING_REGION_WIDTH {
                        layer.regions.push(ColumnSpan::new(start, column - 1));
                    } else {
                        layer.heights[start..column].fill(0.0);
                    }
                    run_start = None;
                }
                _ => {}
            }
        }

        if layer.regions.is_empty() {
            self.ceiling = Ceiling::Absent;
        }
    }

    /// Clears ceiling columns whose gap to the floor fell below the minimum.
    ///
    /// Returns the spans that turned into skylights, then rebuilds regions.
    pub fn sync_ceiling(&mut self) -> Vec<ColumnSpan> {
        let mut cleared = Vec::new();
        if let Ceiling::Present(layer) = &mut self.ceiling {
            for (column, (ceiling, floor)) in
                layer.heights.iter_mut().zip(&self.floor).enumerate()
            {
                if *ceiling > 0.0 && floor - *ceiling < MIN_CEILING_GAP {
                    *ceiling = 0.0;
                    cleared.push(column);
                }
            }
        }
        self.rebuild_regions();
        collect_spans(&cleared)
    }

    /// Pushes the ceiling up to restore the minimum gap.
    ///
    /// Columns whose restored ceiling would sit at or above the world top are
    /// removed. Regions are rebuilt afterwards.
    pub fn validate_separation(&mut self) {
        if let Ceiling::Present(layer) = &mut self.ceiling {
            for (ceiling, floor) in layer.heights.iter_mut().zip(&self.floor) {
                if *ceiling <= 0.0 || floor - *ceiling >= MIN_CEILING_GAP {
                    continue;
                }
                let raised = floor - MIN_CEILING_GAP;
                *ceiling = if raised > 0.0 { raised } else { 0.0 };
            }
        }
        self.rebuild_regions();
    }
}

fn collect_spans(columns: &[usize]) -> Vec<ColumnSpan> {
    let mut spans: Vec<ColumnSpan> = Vec::new();
    for &column in columns {
        match spans.last_mut() {
            Some(last) if last.end() + 1 == column => *last = ColumnSpan::new(last.start(), column),
            _ => spans.push(ColumnSpan::new(column, column)),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caved(floor_y: f32, ceiling: Vec<f32>) -> Heightmap {
        Heightmap::flat(ceiling.len(), 900.0, floor_y).with_ceiling(ceiling)
    }

    #[test]
    fn rebuild_discards_narrow_fragments() {
        let mut heights = vec![0.0; 30];
        heights[2..5].fill(300.0);
        heights[10..20].fill(300.0);
        let map = caved(600.0, heights);

        assert_eq!(map.ceiling_regions(), &[ColumnSpan::new(10, 19)]);
        assert_eq!(map.ceiling_at_column(3), 0.0);
        assert_eq!(map.ceiling_at_column(12), 300.0);
    }

    #[test]
    fn ceiling_without_regions_collapses_to_absent() {
        let mut heights = vec![0.0; 12];
        heights[0..3].fill(200.0);
        let map = caved(600.0, heights);

        assert_eq!(map.ceiling(), &Ceiling::Absent);
        assert!(map.ceiling_regions().is_empty());
    }

    #[test]
    fn sync_opens_skylight_where_gap_closed() {
        let mut map = caved(600.0, vec![400.0; 20]);
        for column in 5..9 {
            map.floor_mut()[column] = 430.0;
        }

        let skylights = map.sync_ceiling();

        assert_eq!(skylights, vec![ColumnSpan::new(5, 8)]);
        assert_eq!(
            map.ceiling_regions(),
            &[ColumnSpan::new(0, 4), ColumnSpan::new(9, 19)]
        );
        assert!(map.min_separation().unwrap_or(f32::MAX) >= MIN_CEILING_GAP);
    }

    #[test]
    fn validate_pushes_ceiling_up_or_removes_it() {
        let mut heights = vec![580.0; 20];
        heights[15..].fill(40.0);
        let mut map = caved(600.0, heights);
        for column in 15..20 {
            map.floor_mut()[column] = 50.0;
        }

        map.validate_separation();

        assert!((map.ceiling_at_column(3) - (600.0 - MIN_CEILING_GAP)).abs() < 1e-4);
        assert_eq!(map.ceiling_at_column(17), 0.0);
        assert_eq!(map.ceiling_regions(), &[ColumnSpan::new(0, 14)]);
    }

    #[test]
    fn clamp_leaves_void_columns_alone() {
        let mut map = Heightmap::from_floor(vec![10.0, 500.0, 2_900.0, 1_400.0], 900.0);
        map.clamp_to_band(&[false, false, true]);

        assert_eq!(map.floor(), &[180.0, 500.0, 2_900.0, 1_000.0]);
        assert!(map.is_void(map.void_floor()));
    }

    #[test]
    fn heightmap_round_trips_through_bincode() {
        let map = caved(620.0, vec![420.0; 8]);
        let bytes = bincode::serialize(&map).expect("serialize");
        let restored: Heightmap = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, map);
    }

    #[test]
    fn decoded_ceiling_is_fitted_to_floor_on_sync() {
        let short = caved(700.0, vec![300.0; 10]).ceiling().clone();
        let bytes = bincode::serialize(&(vec![700.0_f32; 100], short, 900.0_f32))
            .expect("serialize");
        let mut map: Heightmap = bincode::deserialize(&bytes).expect("deserialize");

        let skylights = map.sync_ceiling();

        assert!(skylights.is_empty());
        assert_eq!(map.ceiling_heights().map(<[f32]>::len), Some(100));
        assert_eq!(map.ceiling_regions(), &[ColumnSpan::new(0, 9)]);
        assert_eq!(map.ceiling_at_column(50), 0.0);
    }
}
