//! Crater silhouettes used by shaped explosions.
//!
//! A silhouette answers one question: for a horizontal offset from the blast
//! center, how far does the crater reach above and below the center line.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use scorch_core::CraterShape;

/// Inner radius of the star's concave vertices relative to its points.
const STAR_INNER_RATIO: f32 = 0.45;
const STAR_POINTS: usize = 5;
/// Polygons with more sides than this are treated as malformed.
const MAX_POLYGON_SIDES: u32 = 64;

/// Vertical reach of a crater at one horizontal offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Extent {
    /// Distance the crater reaches upward from the center.
    pub(crate) above: f32,
    /// Distance the crater reaches downward from the center.
    pub(crate) below: f32,
}

#[derive(Clone, Debug)]
pub(crate) enum Silhouette {
    Circle { radius: f32 },
    Diamond { radius: f32 },
    Outline { vertices: Vec<Vec2>, inscribed: f32 },
}

impl Silhouette {
    /// Builds the silhouette for the shape; malformed requests become circles.
    pub(crate) fn new(shape: CraterShape, radius: f32) -> Self {
        match shape {
            CraterShape::Circle => Self::Circle { radius },
            CraterShape::Diamond => Self::Diamond { radius },
            CraterShape::Triangle => Self::outline(regular_polygon(3, -FRAC_PI_2, radius)),
            CraterShape::Star => Self::outline(star(radius)),
            CraterShape::Polygon { sides, rotation } => {
                if !(3..=MAX_POLYGON_SIDES).contains(&sides) || !rotation.is_finite() {
                    return Self::Circle { radius };
                }
                let Ok(sides) = usize::try_from(sides) else {
                    return Self::Circle { radius };
                };
                Self::outline(regular_polygon(sides, rotation, radius))
            }
        }
    }

    fn outline(vertices: Vec<Vec2>) -> Self {
        let inscribed = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(a, b)| line_distance_from_origin(*a, *b))
            .fold(f32::INFINITY, f32::min);
        Self::Outline {
            vertices,
            inscribed: if inscribed.is_finite() { inscribed } else { 0.0 },
        }
    }

    /// Vertical reach at horizontal offset `dx`, or `None` outside the shape.
    pub(crate) fn extent(&self, dx: f32) -> Option<Extent> {
        match self {
            Self::Circle { radius } => {
                let depth = circle_reach(*radius, dx)?;
                Some(Extent {
                    above: depth,
                    below: depth,
                })
            }
            Self::Diamond { radius } => {
                let depth = radius - dx.abs();
                (depth >= 0.0).then_some(Extent {
                    above: depth,
                    below: depth,
                })
            }
            Self::Outline {
                vertices,
                inscribed,
            } => outline_extent(vertices, *inscribed, dx),
        }
    }
}

fn circle_reach(radius: f32, dx: f32) -> Option<f32> {
    let reach = radius * radius - dx * dx;
    (reach >= 0.0).then(|| reach.sqrt())
}

fn outline_extent(vertices: &[Vec2], inscribed: f32, dx: f32) -> Option<Extent> {
    let mut top = f32::INFINITY;
    let mut bottom = f32::NEG_INFINITY;

    for (a, b) in vertices.iter().zip(vertices.iter().cycle().skip(1)) {
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        if dx < left.x || dx > right.x {
            continue;
        }
        let span = right.x - left.x;
        if span <= f32::EPSILON {
            top = top.min(left.y.min(right.y));
            bottom = bottom.max(left.y.max(right.y));
            continue;
        }
        let t = (dx - left.x) / span;
        let y = left.y + (right.y - left.y) * t;
        top = top.min(y);
        bottom = bottom.max(y);
    }

    // Polygon edges can leave hairline seams at vertices; the inscribed
    // circle always covers them.
    if let Some(reach) = circle_reach(inscribed, dx) {
        top = top.min(-reach);
        bottom = bottom.max(reach);
    }

    if !top.is_finite() || !bottom.is_finite() {
        return None;
    }

    Some(Extent {
        above: (-top).max(0.0),
        below: bottom.max(0.0),
    })
}

fn regular_polygon(sides: usize, rotation: f32, radius: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|index| {
            let angle = rotation + TAU * index as f32 / sides as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn star(radius: f32) -> Vec<Vec2> {
    (0..STAR_POINTS * 2)
        .map(|index| {
            let angle = -FRAC_PI_2 + PI * index as f32 / STAR_POINTS as f32;
            let length = if index % 2 == 0 {
                radius
            } else {
                radius * STAR_INNER_RATIO
            };
            Vec2::new(angle.cos(), angle.sin()) * length
        })
        .collect()
}

fn line_distance_from_origin(a: Vec2, b: Vec2) -> f32 {
    let edge = b - a;
    let length = edge.length();
    if length <= f32::EPSILON {
        return a.length();
    }
    a.perp_dot(b).abs() / length
}
