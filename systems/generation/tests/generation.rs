use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scorch_core::{
    BaseStyle, ColumnSpan, Command, CraterShape, Event, FeatureOverlay, Heightmap, TerrainStyle,
    MIN_CEILING_GAP,
};
use scorch_system_generation::{
    compatible_features, seed_stream, GenerationError, GenerationParams, GenerationTuning,
    Generation,
};
use scorch_world::{self as world, query, World};

fn every_style() -> Vec<TerrainStyle> {
    let mut styles = Vec::new();
    for base in BaseStyle::ALL {
        styles.push(TerrainStyle::new(base, None));
        for feature in compatible_features(base) {
            styles.push(TerrainStyle::new(base, Some(*feature)));
        }
    }
    styles
}

#[test]
fn canyon_stays_inside_the_band() {
    let generation = Generation::default();
    let params = GenerationParams::new(2_000, 900.0);

    for seed in 0..10 {
        for feature in [None, Some(FeatureOverlay::Bridge), Some(FeatureOverlay::Pillars)] {
            let style = TerrainStyle::new(BaseStyle::Canyon, feature);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let terrain = generation
                .generate_style(&params, style, &mut rng)
                .expect("valid parameters");

            assert_eq!(terrain.heightmap.width(), 2_000);
            assert!(
                terrain
                    .heightmap
                    .floor()
                    .iter()
                    .all(|y| (180.0..=1_000.0).contains(y)),
                "seed {seed} {style} escaped the band"
            );
        }
    }
}

#[test]
fn same_seed_reproduces_terrain() {
    let generation = Generation::default();
    let params = GenerationParams::new(1_200, 700.0).with_spawns(vec![150.0, 1_050.0]);

    let first = generation
        .generate(&params, &mut seed_stream(77, "terrain"))
        .expect("valid parameters");
    let second = generation
        .generate(&params, &mut seed_stream(77, "terrain"))
        .expect("valid parameters");

    assert_eq!(first, second);
}

#[test]
fn islands_keep_unclamped_void_gaps() {
    let generation = Generation::default();
    let params = GenerationParams::new(2_000, 900.0);
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let terrain = generation
        .generate_style(&params, TerrainStyle::new(BaseStyle::Islands, None), &mut rng)
        .expect("valid parameters");

    let map = &terrain.heightmap;
    let (top, bottom) = map.band();
    let void_columns = map.floor().iter().filter(|y| map.is_void(**y)).count();
    assert!(void_columns > 0);
    assert!(map
        .floor()
        .iter()
        .filter(|y| !map.is_void(**y))
        .all(|y| (top..=bottom).contains(y)));
    assert!(map.floor().iter().any(|y| *y >= map.void_floor()));
}

#[test]
fn caves_always_carry_a_valid_ceiling() {
    let generation = Generation::default();
    let params = GenerationParams::new(2_000, 900.0);

    for seed in 0..12 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let terrain = generation
            .generate_style(&params, TerrainStyle::new(BaseStyle::Caves, None), &mut rng)
            .expect("valid parameters");

        let map = &terrain.heightmap;
        assert!(!map.ceiling_regions().is_empty(), "seed {seed} lost its ceiling");
        let gap = map.min_separation().expect("ceiling present");
        assert!(gap >= MIN_CEILING_GAP, "seed {seed} gap {gap}");
    }
}

#[test]
fn every_style_installs_with_separation_intact() {
    let generation = Generation::default();
    let params = GenerationParams::new(900, 600.0);

    for (index, style) in every_style().into_iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(index as u64);
        let terrain = generation
            .generate_style(&params, style, &mut rng)
            .expect("valid parameters");

        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, terrain.into_command(), &mut rng, &mut events);

        assert!(matches!(
            events.first(),
            Some(Event::TerrainInstalled { width: 900, .. })
        ));
        assert_eq!(query::style(&world), Some(style));
        let map = query::heightmap(&world).expect("terrain installed");
        if let Some(gap) = map.min_separation() {
            assert!(gap >= MIN_CEILING_GAP, "{style} gap {gap}");
        }
    }
}

#[test]
fn narrow_worlds_do_not_panic() {
    let generation = Generation::default();
    for width in [1, 2, 5, 17] {
        let params = GenerationParams::new(width, 300.0);
        for style in every_style() {
            let mut rng = ChaCha8Rng::seed_from_u64(u64::from(width));
            let terrain = generation
                .generate_style(&params, style, &mut rng)
                .expect("valid parameters");
            assert_eq!(terrain.heightmap.width(), width as usize);
        }
    }
}

#[test]
fn invalid_parameters_are_rejected() {
    let generation = Generation::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let cases = [
        (GenerationParams::new(0, 900.0), GenerationError::ZeroWidth),
        (
            GenerationParams::new(100, -5.0),
            GenerationError::InvalidHeightBound(-5.0),
        ),
        (
            GenerationParams::new(100, 900.0).with_edge_margin(-1.0),
            GenerationError::InvalidEdgeMargin(-1.0),
        ),
        (
            GenerationParams::new(100, 900.0).with_spawns(vec![10.0, f32::INFINITY]),
            GenerationError::NonFiniteSpawn(f32::INFINITY),
        ),
    ];

    for (params, expected) in cases {
        assert_eq!(generation.generate(&params, &mut rng), Err(expected));
    }
}

#[test]
fn partial_tuning_file_keeps_defaults() {
    let tuning: GenerationTuning = toml::from_str(
        r#"
        feature_chance = 0.0

        [style_weights]
        islands = 0
        "#,
    )
    .expect("tuning parses");

    assert_eq!(tuning.feature_chance, 0.0);
    assert_eq!(tuning.style_weights.islands, 0);
    assert_eq!(tuning.style_weights.rolling_hills, 30);
    assert_eq!(tuning.fairness, GenerationTuning::default().fairness);

    let generation = Generation::new(tuning);
    let params = GenerationParams::new(600, 500.0);
    for seed in 0..30 {
        let terrain = generation
            .generate(&params, &mut ChaCha8Rng::seed_from_u64(seed))
            .expect("valid parameters");
        assert_ne!(terrain.style.base, BaseStyle::Islands);
        assert!(terrain.style.feature.is_none());
    }
}

fn maximal_runs(map: &Heightmap) -> Vec<ColumnSpan> {
    let Some(heights) = map.ceiling_heights() else {
        return Vec::new();
    };
    let mut runs = Vec::new();
    let mut start = None;
    for (column, height) in heights.iter().chain(std::iter::once(&0.0)).enumerate() {
        match (start, *height > 0.0) {
            (None, true) => start = Some(column),
            (Some(first), false) => {
                runs.push(ColumnSpan::new(first, column - 1));
                start = None;
            }
            _ => {}
        }
    }
    runs
}

fn random_shot<R: Rng>(world: &World, rng: &mut R) -> Command {
    let x = rng.gen_range(0.0..900.0);
    let ceiling = query::ceiling_at(world, x);
    let y = if ceiling > 0.0 && rng.gen_bool(0.5) {
        ceiling + rng.gen_range(-20.0..20.0)
    } else {
        query::height_at(world, x) + rng.gen_range(-30.0..30.0)
    };
    let center = Vec2::new(x, y);
    let radius = rng.gen_range(8.0..90.0);
    match rng.gen_range(0..9) {
        0 => Command::DestroyCircle { center, radius },
        1 => Command::DestroyShape {
            center,
            radius,
            shape: CraterShape::Star,
        },
        2 => Command::RaiseMound { center, radius },
        3 => Command::RaiseJaggedPeak { center, radius },
        4 => Command::DigJaggedCrater {
            center,
            radius,
            void_y: 1_200.0,
        },
        5 => Command::CarveToVoid {
            x,
            width: radius,
            void_y: 1_200.0,
        },
        6 => Command::CarveFissure {
            origin: center,
            length: radius * 2.0,
            depth: radius * 0.5,
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
        },
        7 => Command::Burn {
            x,
            radius,
            amount: 25.0,
        },
        _ => Command::SetHeight {
            column: rng.gen_range(0..900),
            height: y,
        },
    }
}

#[test]
fn barrage_on_generated_ceilings_keeps_separation() {
    let mut styles = vec![
        TerrainStyle::new(BaseStyle::Caves, None),
        TerrainStyle::new(BaseStyle::Caves, Some(FeatureOverlay::Stalactites)),
        TerrainStyle::new(BaseStyle::Caves, Some(FeatureOverlay::Pillars)),
    ];
    for base in BaseStyle::ALL {
        for feature in compatible_features(base) {
            if matches!(
                feature,
                FeatureOverlay::Bridge | FeatureOverlay::Cavern | FeatureOverlay::Stalactites
            ) {
                styles.push(TerrainStyle::new(base, Some(*feature)));
            }
        }
    }
    let params = GenerationParams::new(900, 600.0);

    for tunnel_chance in [0.0, 1.0] {
        let generation = Generation::new(GenerationTuning {
            tunnel_chance,
            ..GenerationTuning::default()
        });
        for style in &styles {
            for seed in 0..4 {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let terrain = generation
                    .generate_style(&params, *style, &mut rng)
                    .expect("valid parameters");
                let mut world = World::new();
                let mut events = Vec::new();
                world::apply(&mut world, terrain.into_command(), &mut rng, &mut events);

                for shot in 0..60 {
                    let command = random_shot(&world, &mut rng);
                    events.clear();
                    world::apply(&mut world, command, &mut rng, &mut events);

                    let map = query::heightmap(&world).expect("terrain installed");
                    if let Some(gap) = map.min_separation() {
                        assert!(
                            gap >= MIN_CEILING_GAP,
                            "{style} seed {seed} shot {shot}: gap closed to {gap}"
                        );
                    }
                    assert_eq!(map.ceiling_regions(), maximal_runs(map).as_slice());
                    for region in map.ceiling_regions() {
                        let x = region.start() as f32;
                        assert!(!query::is_inside_ceiling(&world, x, -10.0));
                    }
                }
            }
        }
    }
}
