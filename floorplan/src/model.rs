use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

pub type NodeId = u32;
pub type OpenableId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, s: f64) -> Point {
        Point::new(self.x * s, self.y * s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dim {
    pub w: f64,
    pub h: f64,
}

impl Dim {
    pub const fn new(w: f64, h: f64) -> Self {
        Dim { w, h }
    }
}

/// Canonical wall key, always `id1 < id2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub id1: NodeId,
    pub id2: NodeId,
}

impl EdgeKey {
    /// `None` for a self-loop.
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        if a == b {
            return None;
        }
        Some(EdgeKey {
            id1: a.min(b),
            id2: a.max(b),
        })
    }
    pub fn contains(&self, id: NodeId) -> bool {
        self.id1 == id || self.id2 == id
    }
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.id1 == id {
            Some(self.id2)
        } else if self.id2 == id {
            Some(self.id1)
        } else {
            None
        }
    }
}

/// Result of the drag snap pipeline. `x == y == Some(other)` marks a merge candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeSnap {
    pub x: Option<NodeId>,
    pub y: Option<NodeId>,
    pub edge: Option<EdgeKey>,
    pub pos: Option<f64>,
}

impl NodeSnap {
    pub fn is_merge_with(&self) -> Option<NodeId> {
        match (self.x, self.y) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CornerNode {
    pub id: NodeId,
    pub p: Point,
    pub translate: bool,
    pub extend: bool,
    pub remove: bool,
    pub delta: Point,
    pub snap: NodeSnap,
}

impl CornerNode {
    pub fn new(id: NodeId, p: Point) -> Self {
        CornerNode {
            id,
            p,
            translate: false,
            extend: false,
            remove: false,
            delta: Point::default(),
            snap: NodeSnap::default(),
        }
    }
    pub fn reset_interaction(&mut self) {
        self.translate = false;
        self.extend = false;
        self.remove = false;
        self.delta = Point::default();
        self.snap = NodeSnap::default();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id1: NodeId,
    pub id2: NodeId,
    pub stroke: String,
    // Non-owning: the graph's openable map is authoritative.
    pub snap_openables: Vec<OpenableId>,
}

impl Edge {
    pub fn new(key: EdgeKey) -> Self {
        Edge {
            id1: key.id1,
            id2: key.id2,
            stroke: "black".to_string(),
            snap_openables: Vec::new(),
        }
    }
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            id1: self.id1,
            id2: self.id2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Floorplan,
    #[default]
    Room,
    Furniture,
    Presentation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovableKind {
    Openable,
    Rectangle,
    Ellipse,
    Circle,
    L,
    U,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenableType {
    #[default]
    Left,
    Right,
    Double,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FurnitureType {
    #[default]
    Rectangle,
    Circle,
    L,
    U,
}

/// A closed room extracted from the wall graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Room {
    pub nodes: Vec<NodeId>,
    pub area_mm2: f64,
    pub centroid: Point,
}

impl Room {
    pub fn area_m2(&self) -> f64 {
        self.area_mm2 / crate::geometry::tolerance::MM2_PER_M2
    }
}
