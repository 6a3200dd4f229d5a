//! Snap pipeline for a dragged corner.
//!
//! Priority: another corner, then a wall (optionally refined to line up with a
//! third corner), then axis alignment with any corner, then free placement on
//! the integer millimeter grid. With `extend` set the dragged corner stays put
//! and only `delta`/`snap` describe where the new corner would go.

use crate::geometry::math::{distance, project_on_segment, to_next_number};
use crate::geometry::tolerance::safe_div;
use crate::model::{EdgeKey, NodeId, NodeSnap, Point};
use crate::projection::View;
use crate::RoomGraph;

/// Best per-axis alignment distances found by [`neighbor`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisDist {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

pub fn handle_node_snap(g: &mut RoomGraph, id: NodeId, cursor: Point, view: &View, extend: bool) {
    match g.nodes.get_mut(&id) {
        Some(n) => n.snap = NodeSnap::default(),
        None => return,
    }
    if node_to_node(g, id, cursor, view, extend) {
        return;
    }
    if node_to_edge(g, id, cursor, view, extend) {
        return;
    }
    let min = neighbor(g, id, cursor, view, extend, true);

    let pr = view.projection;
    let Some(node) = g.nodes.get_mut(&id) else {
        return;
    };
    let proj = to_next_number(Point::new(
        node.p.x + (cursor.x - node.delta.x) / pr.scale,
        node.p.y + (cursor.y - node.delta.y) / pr.scale,
    ));
    let screen = pr.from(proj);
    if min.x.is_none() {
        node.snap.x = None;
        if extend {
            node.delta.x = cursor.x;
        } else {
            node.p.x = proj.x;
            node.delta.x = screen.x;
        }
    }
    if min.y.is_none() {
        node.snap.y = None;
        if extend {
            node.delta.y = cursor.y;
        } else {
            node.p.y = proj.y;
            node.delta.y = screen.y;
        }
    }
}

/// Snaps onto the nearest corner within `node_extend_size`.
pub fn node_to_node(g: &mut RoomGraph, id: NodeId, cursor: Point, view: &View, extend: bool) -> bool {
    let click = view.projection.to(cursor);
    let mut best: Option<(f64, NodeId, Point)> = None;
    for other in g.nodes.values() {
        if !extend && other.id == id {
            continue;
        }
        let d = distance(other.p, click);
        if d < view.settings.node_extend_size && best.map_or(true, |b| d < b.0) {
            best = Some((d, other.id, other.p));
        }
    }
    let Some((_, other, p)) = best else {
        return false;
    };
    let Some(node) = g.nodes.get_mut(&id) else {
        return false;
    };
    node.delta = view.projection.from(p);
    node.snap.x = Some(other);
    node.snap.y = Some(other);
    if !extend {
        node.p = p;
    }
    true
}

/// Snaps onto the nearest wall (perpendicular foot inside the segment), then
/// slides along it to line up with a corner found by [`neighbor`].
pub fn node_to_edge(g: &mut RoomGraph, id: NodeId, cursor: Point, view: &View, extend: bool) -> bool {
    let click = view.projection.to(cursor);
    let mut best: Option<(f64, EdgeKey, f64, Point)> = None;
    for key in g.edges.keys() {
        if !extend && key.contains(id) {
            continue;
        }
        let (Some(n1), Some(n2)) = (g.nodes.get(&key.id1), g.nodes.get(&key.id2)) else {
            continue;
        };
        // zero-length walls cannot be snapped to
        let Some(proj) = project_on_segment(click, n1.p, n2.p) else {
            continue;
        };
        if !(0.0..=1.0).contains(&proj.t) {
            continue;
        }
        let d = proj.signed_dist.abs();
        if d < view.settings.node_extend_size && best.map_or(true, |b| d < b.0) {
            best = Some((d, *key, proj.t, to_next_number(proj.point)));
        }
    }
    let Some((_, key, t, proj)) = best else {
        return false;
    };
    place(g, id, view, extend, proj, |snap| {
        snap.edge = Some(key);
        snap.pos = Some(t);
    });

    let axis = neighbor(g, id, cursor, view, extend, false);
    let (Some(p1), Some(p2)) = (g.nodes.get(&key.id1).map(|n| n.p), g.nodes.get(&key.id2).map(|n| n.p)) else {
        return true;
    };
    let Some(snap) = g.nodes.get(&id).map(|n| n.snap) else {
        return true;
    };
    let on_wall = |o: Option<NodeId>| o.map_or(false, |o| key.contains(o));
    let off_wall = |o: Option<NodeId>| o.filter(|o| !key.contains(*o));

    let x_target = off_wall(snap.x).filter(|_| {
        snap.y.is_none() || matches!((axis.x, axis.y), (Some(dx), Some(dy)) if dx <= dy) || on_wall(snap.y)
    });
    let y_target = off_wall(snap.y).filter(|_| {
        snap.x.is_none() || matches!((axis.x, axis.y), (Some(dx), Some(dy)) if dy < dx) || on_wall(snap.x)
    });

    if let Some(other) = x_target {
        let Some(o) = g.nodes.get(&other).map(|n| n.p) else {
            return true;
        };
        let pos = safe_div(o.x - p1.x, p2.x - p1.x, -1.0);
        if pos > 0.0 && pos < 1.0 {
            let proj = to_next_number(Point::new(o.x, p1.y + pos * (p2.y - p1.y)));
            place(g, id, view, extend, proj, |snap| snap.pos = Some(pos));
        }
    } else if let Some(other) = y_target {
        let Some(o) = g.nodes.get(&other).map(|n| n.p) else {
            return true;
        };
        let pos = safe_div(o.y - p1.y, p2.y - p1.y, -1.0);
        if pos > 0.0 && pos < 1.0 {
            let proj = to_next_number(Point::new(p1.x + pos * (p2.x - p1.x), o.y));
            place(g, id, view, extend, proj, |snap| snap.pos = Some(pos));
        }
    } else if let Some(node) = g.nodes.get_mut(&id) {
        node.snap.x = None;
        node.snap.y = None;
    }
    true
}

/// Axis alignment: a corner whose x (or y) is within `node_extend_size` of the
/// cursor. With `change` unset only `snap.x`/`snap.y` are recorded.
pub fn neighbor(g: &mut RoomGraph, id: NodeId, cursor: Point, view: &View, extend: bool, change: bool) -> AxisDist {
    let click = view.projection.to(cursor);
    let size = view.settings.node_extend_size;
    let mut best_x: Option<(f64, NodeId, Point)> = None;
    let mut best_y: Option<(f64, NodeId, Point)> = None;
    for other in g.nodes.values() {
        if !extend && other.id == id {
            continue;
        }
        let dx = (other.p.x - click.x).abs();
        let dy = (other.p.y - click.y).abs();
        if dx < size && dx <= dy && best_x.map_or(true, |b| dx < b.0) {
            best_x = Some((dx, other.id, other.p));
        } else if dy < size && dy < dx && best_y.map_or(true, |b| dy < b.0) {
            best_y = Some((dy, other.id, other.p));
        }
    }
    let pr = view.projection;
    if let Some(node) = g.nodes.get_mut(&id) {
        if let Some((_, other, p)) = best_x {
            if change {
                node.delta.x = pr.from(p).x;
                if !extend {
                    node.p.x = p.x;
                }
            }
            node.snap.x = Some(other);
        }
        if let Some((_, other, p)) = best_y {
            if change {
                node.delta.y = pr.from(p).y;
                if !extend {
                    node.p.y = p.y;
                }
            }
            node.snap.y = Some(other);
        }
    }
    AxisDist { x: best_x.map(|b| b.0), y: best_y.map(|b| b.0) }
}

fn place(g: &mut RoomGraph, id: NodeId, view: &View, extend: bool, proj: Point, update: impl FnOnce(&mut NodeSnap)) {
    if let Some(node) = g.nodes.get_mut(&id) {
        update(&mut node.snap);
        node.delta = view.projection.from(proj);
        if !extend {
            node.p = proj;
        }
    }
}
