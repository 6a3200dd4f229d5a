use super::tolerance::{safe_div, EPS_FACE_AREA, EPS_LEN};
use crate::model::{Dim, Point};

#[inline] pub fn to_rad(deg: f64) -> f64 { std::f64::consts::PI * deg / 180.0 }
#[inline] pub fn to_deg(rad: f64) -> f64 { 180.0 * rad / std::f64::consts::PI }

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Rotates `p` about `c` by `angle` degrees (clockwise on a y-down canvas).
pub fn rotate(c: Point, p: Point, angle: f64) -> Point {
    let (s, co) = to_rad(angle).sin_cos();
    Point {
        x: co * (p.x - c.x) - s * (p.y - c.y) + c.x,
        y: s * (p.x - c.x) + co * (p.y - c.y) + c.y,
    }
}

/// Signed angle in degrees from ray pivot->from to ray pivot->to. Not normalized.
pub fn angle_between(pivot: Point, from: Point, to: Point) -> f64 {
    to_deg((to.y - pivot.y).atan2(to.x - pivot.x) - (from.y - pivot.y).atan2(from.x - pivot.x))
}

// Half-way values round toward +inf, matching the editor's integer grid.
#[inline]
pub fn round_half_up(v: f64) -> f64 { (v + 0.5).floor() }

pub fn to_next_number(p: Point) -> Point {
    Point { x: round_half_up(p.x), y: round_half_up(p.y) }
}

pub fn translate(p: Point, dim: Dim, sc: f64) -> Point {
    Point { x: p.x + dim.w / sc, y: p.y + dim.h / sc }
}

#[inline]
pub fn point_in_circle(c: Point, r: f64, p: Point) -> bool { distance(c, p) <= r }

#[inline]
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) }
}

#[inline]
pub fn trapezoid_area(p1: Point, p2: Point) -> f64 { (p1.x - p2.x) * (p1.y + p2.y) / 2.0 }

/// Signed area of a closed walk (first point repeated at the end).
pub fn polygon_area(walk: &[Point]) -> f64 {
    walk.windows(2).map(|w| trapezoid_area(w[0], w[1])).sum()
}

/// Area-weighted centroid of a closed walk, `None` when the area is degenerate.
pub fn polygon_centroid(walk: &[Point]) -> Option<Point> {
    let area = polygon_area(walk);
    if area.abs() < EPS_FACE_AREA {
        return None;
    }
    let mut mid = Point::default();
    for w in walk.windows(2) {
        let (a, b) = (w[0], w[1]);
        let cross = a.x * b.y - b.x * a.y;
        mid.x += (a.x + b.x) * cross;
        mid.y += (a.y + b.y) * cross;
    }
    Some(Point { x: mid.x / (6.0 * area), y: mid.y / (6.0 * area) })
}

/// Projection of a point onto the line through a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// Parameter along `a -> b`, unclamped.
    pub t: f64,
    /// Perpendicular distance, negative on one side of the wall.
    pub signed_dist: f64,
    pub point: Point,
}

/// `None` for a zero-length segment.
pub fn project_on_segment(p: Point, a: Point, b: Point) -> Option<SegmentProjection> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let len = len2.sqrt();
    if len <= EPS_LEN {
        return None;
    }
    let t = (dx * (p.x - a.x) + dy * (p.y - a.y)) / len2;
    let signed_dist = (dx * (a.y - p.y) - (a.x - p.x) * dy) / len;
    Some(SegmentProjection { t, signed_dist, point: lerp(a, b, t) })
}

/// Wall direction in degrees, 0 when the wall is degenerate.
pub fn wall_angle(a: Point, b: Point) -> f64 {
    to_deg((b.y - a.y).atan2(b.x - a.x))
}

/// True when `angle` lies within `diff` of a multiple of `value`.
#[inline]
pub fn snaps_to(angle: f64, value: f64, diff: f64) -> bool {
    let m = angle % value;
    m < diff || m > value - diff
}

/// Rescales `pos` from `[from, to]` into `[0, 1]`; a collapsed range maps to 0.
#[inline]
pub fn rescale(pos: f64, from: f64, to: f64) -> f64 { safe_div(pos - from, to - from, 0.0) }
