// Ray/wall intersection used to measure the distance from a shape to the next wall.
use crate::model::Point;

/// Parameters of the ray `center -> border` crossing the line `wall_a -> wall_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayParams {
    /// Along the ray, 1.0 at `border`.
    pub t: f64,
    /// Along the wall, 0.0 at `wall_a`.
    pub u: f64,
}

/// `None` only when the ray and the wall are exactly parallel.
pub fn ray_wall_params(center: Point, border: Point, wall_a: Point, wall_b: Point) -> Option<RayParams> {
    let denom = (center.x - border.x) * (wall_a.y - wall_b.y) - (center.y - border.y) * (wall_a.x - wall_b.x);
    if denom == 0.0 {
        return None;
    }
    let t = ((center.x - wall_a.x) * (wall_a.y - wall_b.y) - (center.y - wall_a.y) * (wall_a.x - wall_b.x)) / denom;
    let u = ((center.x - wall_a.x) * (center.y - border.y) - (center.y - wall_a.y) * (center.x - border.x)) / denom;
    Some(RayParams { t, u })
}

/// Point where the ray from `center` through `border` hits the wall segment,
/// only reported when the hit lies beyond `border`.
pub fn segment_intersection(center: Point, border: Point, wall_a: Point, wall_b: Point) -> Option<Point> {
    let RayParams { t, u } = ray_wall_params(center, border, wall_a, wall_b)?;
    if t > 1.0 && (0.0..=1.0).contains(&u) {
        Some(Point {
            x: center.x + t * (border.x - center.x),
            y: center.y + t * (border.y - center.y),
        })
    } else {
        None
    }
}
