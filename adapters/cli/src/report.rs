use std::fmt::Write as _;

use scorch_core::Event;
use scorch_world::{query, World};

/// Running totals of the events a session produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EventTally {
    pub(crate) mutations: usize,
    pub(crate) skipped: usize,
    pub(crate) skylights: usize,
    pub(crate) craters: usize,
    pub(crate) fissure_points: usize,
}

impl EventTally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TerrainChanged { .. } => self.mutations += 1,
                Event::MutationSkipped { .. } => self.skipped += 1,
                Event::SkylightOpened { .. } => self.skylights += 1,
                Event::CraterRecorded { .. } => self.craters += 1,
                Event::FissureTraced { points } => self.fissure_points += points.len(),
                Event::TerrainInstalled { .. } | Event::TimeAdvanced { .. } => {}
            }
        }
    }
}

/// Renders the summary block and an ASCII side view of the terrain.
///
/// `#` is ground, `=` is overhang rock, `v` marks void gap columns.
pub(crate) fn render(world: &World, tally: &EventTally, columns: usize, rows: usize) -> String {
    let mut out = String::new();
    let Some(map) = query::heightmap(world) else {
        let _ = writeln!(out, "no terrain installed");
        return out;
    };

    let solid: Vec<f32> = map
        .floor()
        .iter()
        .copied()
        .filter(|y| !map.is_void(*y))
        .collect();
    let highest = solid.iter().copied().fold(f32::INFINITY, f32::min);
    let lowest = solid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let void_columns = map.width() - solid.len();

    let _ = writeln!(
        out,
        "style: {}",
        query::style_name(world).unwrap_or_else(|| String::from("unknown"))
    );
    let _ = writeln!(
        out,
        "width: {} columns, height bound: {}",
        map.width(),
        map.height_bound()
    );
    if solid.is_empty() {
        let _ = writeln!(out, "floor: entirely void");
    } else {
        let _ = writeln!(out, "floor: y {highest:.1} to {lowest:.1}, {void_columns} void columns");
    }
    let regions = query::ceiling_regions(world);
    if regions.is_empty() {
        let _ = writeln!(out, "ceiling: none");
    } else {
        let spans = regions
            .iter()
            .map(|region| format!("{}..={}", region.start(), region.end()))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "ceiling: {} regions ({spans})", regions.len());
    }
    let _ = writeln!(
        out,
        "mutations: {}, skipped: {}, skylights: {}, craters: {} ({} still hot), fissure points: {}",
        tally.mutations,
        tally.skipped,
        tally.skylights,
        tally.craters,
        query::crater_heat(world).len(),
        tally.fissure_points
    );

    if columns == 0 || rows == 0 {
        return out;
    }
    let (_, bottom) = map.band();
    let last = map.width().saturating_sub(1) as f32;
    let samples: Vec<f32> = (0..columns)
        .map(|index| {
            if columns == 1 {
                0.0
            } else {
                last * index as f32 / (columns - 1) as f32
            }
        })
        .collect();

    for row in 0..rows {
        let y = bottom * (row as f32 + 0.5) / rows as f32;
        let line: String = samples
            .iter()
            .map(|x| {
                if query::is_below_floor(world, *x, y) {
                    '#'
                } else if query::is_inside_ceiling(world, *x, y) {
                    '='
                } else if row + 1 == rows && map.is_void(query::height_at(world, *x)) {
                    'v'
                } else {
                    ' '
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use scorch_core::{BaseStyle, Command, Heightmap, TerrainStyle};

    fn installed(heightmap: Heightmap) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        scorch_world::apply(
            &mut world,
            Command::InstallTerrain {
                heightmap,
                style: TerrainStyle::new(BaseStyle::Plateau, None),
            },
            &mut StepRng::new(0, 1),
            &mut events,
        );
        world
    }

    #[test]
    fn empty_world_is_reported() {
        let report = render(&World::new(), &EventTally::default(), 10, 4);
        assert_eq!(report, "no terrain installed\n");
    }

    #[test]
    fn flat_ground_fills_lower_rows() {
        let world = installed(Heightmap::flat(100, 900.0, 500.0));
        let report = render(&world, &EventTally::default(), 10, 4);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "style: Plateau");
        assert!(lines.contains(&"ceiling: none"));
        let picture = &lines[lines.len() - 4..];
        assert_eq!(picture[0], "");
        assert_eq!(picture[1], "");
        assert_eq!(picture[2], "##########");
        assert_eq!(picture[3], "##########");
    }

    #[test]
    fn tally_counts_each_event_kind() {
        let mut tally = EventTally::default();
        tally.record(&[
            Event::TerrainChanged {
                span: scorch_core::ColumnSpan::new(0, 3),
            },
            Event::FissureTraced {
                points: vec![glam::Vec2::ZERO; 14],
            },
            Event::MutationSkipped {
                reason: scorch_core::SkipReason::OutOfBounds,
            },
        ]);
        assert_eq!(tally.mutations, 1);
        assert_eq!(tally.fissure_points, 14);
        assert_eq!(tally.skipped, 1);
    }
}
