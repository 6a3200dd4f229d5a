pub mod error;
pub mod floorplan_image;
pub mod model;
pub mod movable;
pub mod openable;
pub mod projection;
pub mod scene;
pub mod settings;
pub mod geometry {
    pub mod intersect;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod faces;
    pub mod picking;
    pub mod snapping;
}
mod json;

pub use error::{Result, SceneError};
pub use scene::Scene;

use geometry::limits::MAX_NODE_ID;
use geometry::math::{distance, polygon_area, polygon_centroid, rescale, to_next_number};
use geometry::tolerance::EPS_FACE_AREA;
use model::{CornerNode, Edge, EdgeKey, NodeId, OpenableId, Point, Room};
use openable::Openable;
use projection::View;
use std::collections::BTreeMap;
use tracing::debug;

/// Planar wall graph plus the openables bound to its walls.
///
/// Node ids come from a monotonically increasing counter and are never reused
/// within a session. Every edge endpoint exists, no edge is a self-loop, and an
/// openable is bound to a wall iff that wall lists it.
#[derive(Clone, Debug, Default)]
pub struct RoomGraph {
    pub(crate) count: NodeId,
    pub(crate) nodes: BTreeMap<NodeId, CornerNode>,
    pub(crate) edges: BTreeMap<EdgeKey, Edge>,
    pub(crate) openables: BTreeMap<OpenableId, Openable>,
    pub(crate) next_openable: OpenableId,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything and restarts both id counters.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `None` once the id space up to `MAX_NODE_ID` is used up.
    pub fn add_node(&mut self, p: Point) -> Option<NodeId> {
        let id = self.count;
        self.count = id.checked_add(1).filter(|&next| next <= MAX_NODE_ID)?;
        self.nodes.insert(id, CornerNode::new(id, p));
        debug!(id, x = p.x, y = p.y, "node added");
        Some(id)
    }

    // Used by scene loading, which restores persisted ids.
    pub(crate) fn insert_node_with_id(&mut self, id: NodeId, p: Point) {
        self.nodes.insert(id, CornerNode::new(id, p));
        self.count = self.count.max(id.saturating_add(1));
    }

    /// Moves a corner and drags the openables of its walls along.
    pub fn move_node(&mut self, id: NodeId, p: Point) -> bool {
        if !p.is_finite() {
            return false;
        }
        match self.nodes.get_mut(&id) {
            Some(n) => n.p = p,
            None => return false,
        }
        for key in self.incident_edges(id) {
            self.reproject_edge(key);
        }
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&CornerNode> {
        self.nodes.get(&id)
    }
    pub fn nodes(&self) -> impl Iterator<Item = &CornerNode> + '_ {
        self.nodes.values()
    }
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    /// Id the next `add_node` will hand out.
    pub fn next_node_id(&self) -> NodeId {
        self.count
    }

    /// Removes a corner and every wall touching it. Idempotent.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        for key in self.incident_edges(id) {
            self.remove_edge(key.id1, key.id2);
        }
        debug!(id, "node removed");
        true
    }

    /// `None` for self-loops and missing endpoints. Adding an existing wall
    /// returns its key unchanged.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Option<EdgeKey> {
        let key = EdgeKey::new(a, b)?;
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return None;
        }
        if !self.edges.contains_key(&key) {
            self.edges.insert(key, Edge::new(key));
            debug!(id1 = key.id1, id2 = key.id2, "edge added");
        }
        Some(key)
    }

    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b)?)
    }
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn incident_edges(&self, id: NodeId) -> Vec<EdgeKey> {
        self.edges.keys().filter(|k| k.contains(id)).copied().collect()
    }

    /// Unbinds the wall's openables, then deletes it.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let Some(key) = EdgeKey::new(a, b) else {
            return false;
        };
        let Some(edge) = self.edges.remove(&key) else {
            return false;
        };
        for id in edge.snap_openables {
            if let Some(o) = self.openables.get_mut(&id) {
                o.snap = openable::OpenableSnap::default();
            }
        }
        debug!(id1 = key.id1, id2 = key.id2, "edge removed");
        true
    }

    /// Folds `from` into `to`: walls of `from` are redirected to `to` (parallel
    /// walls collapse), bound openables keep their physical position, then
    /// `from` is removed together with any `from`-`to` wall.
    pub fn merge_nodes(&mut self, from: NodeId, to: NodeId) -> bool {
        if from == to || !self.nodes.contains_key(&from) || !self.nodes.contains_key(&to) {
            return false;
        }
        for old in self.incident_edges(from) {
            let Some(other) = old.other(from) else {
                continue;
            };
            if other == to {
                continue;
            }
            let Some(new) = self.add_edge(to, other) else {
                continue;
            };
            let moved = match self.edges.get_mut(&old) {
                Some(e) => std::mem::take(&mut e.snap_openables),
                None => continue,
            };
            // pos is measured from id1; flip when that end changed sides
            let flip = (old.id1 == from) != (new.id1 == to);
            for id in moved {
                if let Some(o) = self.openables.get_mut(&id) {
                    o.snap.edge = Some(new);
                    if flip {
                        o.snap.flip();
                    }
                }
                self.attach(id, new);
            }
        }
        self.remove_node(from);
        for key in self.incident_edges(to) {
            self.reproject_edge(key);
        }
        debug!(from, to, "nodes merged");
        true
    }

    /// Splits wall `key` at parametric `pos` through `new_id`, handing each
    /// bound openable to the half that contains it.
    pub fn bisect(&mut self, new_id: NodeId, key: EdgeKey, pos: f64) -> bool {
        if key.contains(new_id) || !self.nodes.contains_key(&new_id) || !self.edges.contains_key(&key) {
            return false;
        }
        let (Some(first), Some(second)) = (self.add_edge(new_id, key.id1), self.add_edge(new_id, key.id2)) else {
            return false;
        };
        let moved = match self.edges.get_mut(&key) {
            Some(e) => std::mem::take(&mut e.snap_openables),
            None => return false,
        };
        for id in moved {
            let Some(o) = self.openables.get_mut(&id) else {
                continue;
            };
            let pos_o = o.snap.pos.unwrap_or(0.0);
            let (target, new_pos, flip) = if pos_o <= pos {
                (first, rescale(pos_o, 0.0, pos), first.id2 != new_id)
            } else {
                (second, rescale(pos_o, pos, 1.0), second.id1 != new_id)
            };
            o.snap.edge = Some(target);
            o.snap.pos = Some(new_pos);
            if flip {
                o.snap.flip();
            }
            self.attach(id, target);
        }
        self.remove_edge(key.id1, key.id2);
        self.reproject_edge(first);
        self.reproject_edge(second);
        debug!(new_id, id1 = key.id1, id2 = key.id2, pos, "edge bisected");
        true
    }
}

// Rooms
impl RoomGraph {
    /// Closed walks of the planar embedding, start node repeated at the end.
    /// Includes the outer face of every component and zero-area walks along
    /// dangling walls.
    pub fn get_faces(&self) -> Vec<Vec<NodeId>> {
        algorithms::faces::trace_faces(self)
    }

    /// Signed area of a face walk in mm²; positive for rooms.
    pub fn face_area(&self, face: &[NodeId]) -> f64 {
        polygon_area(&self.face_points(face))
    }

    fn face_points(&self, face: &[NodeId]) -> Vec<Point> {
        face.iter().filter_map(|id| self.nodes.get(id).map(|n| n.p)).collect()
    }

    /// Interior faces only.
    pub fn rooms(&self) -> Vec<Room> {
        self.get_faces()
            .into_iter()
            .filter_map(|face| {
                let pts = self.face_points(&face);
                let area = polygon_area(&pts);
                if area <= EPS_FACE_AREA {
                    return None;
                }
                let centroid = polygon_centroid(&pts)?;
                Some(Room { nodes: face, area_mm2: area, centroid })
            })
            .collect()
    }
}

// Picking
impl RoomGraph {
    pub fn closest_node_to_click(&self, p: Point) -> Option<NodeId> {
        algorithms::picking::closest_node(self, p)
    }

    /// Nearest wall hit by the ray `center -> p` beyond `p`.
    pub fn next_edge_to_segment(&self, center: Point, p: Point) -> Option<Point> {
        algorithms::picking::next_edge_to_segment(self, center, p)
    }
}

// Corner interaction
impl RoomGraph {
    /// Selects the nearest corner: inner ring translates, outer ring extends.
    pub fn handle_click(&mut self, e: Point, view: &View) -> bool {
        let world = view.projection.to(e);
        let Some(id) = self.closest_node_to_click(world) else {
            return false;
        };
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let d = distance(node.p, world);
        if d <= view.settings.node_trans_size {
            node.translate = true;
        } else if d <= view.settings.node_extend_size {
            node.extend = true;
        } else {
            return false;
        }
        node.delta = e;
        true
    }

    pub fn handle_move(&mut self, e: Point, view: &View) -> bool {
        let active: Vec<(NodeId, bool)> =
            self.nodes.values().filter(|n| n.translate || n.extend).map(|n| (n.id, n.translate)).collect();
        for &(id, translating) in &active {
            algorithms::snapping::handle_node_snap(self, id, e, view, !translating);
            if translating {
                for key in self.incident_edges(id) {
                    self.reproject_edge(key);
                }
            }
            if let Some(n) = self.nodes.get_mut(&id) {
                n.remove = view.will_remove(e);
            }
        }
        !active.is_empty()
    }

    /// Commits the drag of every active corner: delete, merge, split a wall or
    /// draw a new wall, depending on what the snap pipeline found.
    pub fn handle_unclick(&mut self, e: Point, view: &View) {
        let active: Vec<CornerNode> =
            self.nodes.values().filter(|n| n.translate || n.extend || n.remove).cloned().collect();
        for node in active {
            let id = node.id;
            let snap = node.snap;
            if node.remove && node.translate {
                self.remove_node(id);
            } else if node.translate {
                if let Some(other) = snap.is_merge_with() {
                    if other != id {
                        self.merge_nodes(id, other);
                    }
                } else if let (Some(key), Some(pos)) = (snap.edge, snap.pos) {
                    self.bisect(id, key, pos);
                }
            } else if node.extend && !node.remove {
                if let Some(other) = snap.is_merge_with() {
                    if other != id {
                        self.add_edge(id, other);
                    }
                } else {
                    let free = snap.edge.is_none();
                    let target = Point::new(
                        if snap.x.is_none() && free { e.x } else { node.delta.x },
                        if snap.y.is_none() && free { e.y } else { node.delta.y },
                    );
                    if let Some(new_id) = self.add_node(to_next_number(view.projection.to(target))) {
                        self.add_edge(id, new_id);
                        if let (Some(key), Some(pos)) = (snap.edge, snap.pos) {
                            self.bisect(new_id, key, pos);
                        }
                    }
                }
            }
            if let Some(n) = self.nodes.get_mut(&id) {
                n.reset_interaction();
            }
        }
    }

    pub fn is_removing(&self) -> bool {
        self.nodes.values().any(|n| n.remove) || self.openables.values().any(|o| o.state.remove)
    }
}
