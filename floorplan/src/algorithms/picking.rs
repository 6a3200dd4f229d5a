use crate::geometry::intersect::segment_intersection;
use crate::geometry::math::distance;
use crate::model::{NodeId, Point};
use crate::RoomGraph;

/// Nearest corner to `p` (world), ties resolved by the lowest id.
pub fn closest_node(g: &RoomGraph, p: Point) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for n in g.nodes.values() {
        let d = distance(p, n.p);
        if best.map_or(true, |(_, bd)| d < bd) { best = Some((n.id, d)); }
    }
    best.map(|(id, _)| id)
}

/// Closest wall hit along the ray from `center` through `p`, measured from `p`.
/// Used to annotate the free space between a shape and the next wall.
pub fn next_edge_to_segment(g: &RoomGraph, center: Point, p: Point) -> Option<Point> {
    let mut best: Option<(Point, f64)> = None;
    for key in g.edges.keys() {
        let (Some(a), Some(b)) = (g.nodes.get(&key.id1), g.nodes.get(&key.id2)) else { continue };
        if let Some(hit) = segment_intersection(center, p, a.p, b.p) {
            let d = distance(hit, p);
            if best.map_or(true, |(_, bd)| d < bd) { best = Some((hit, d)); }
        }
    }
    best.map(|(hit, _)| hit)
}
