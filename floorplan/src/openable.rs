//! Doors and windows and their binding to walls.
//!
//! A bound openable stores its wall as an [`EdgeKey`] plus a parametric
//! position measured from `id1`; the wall keeps the matching id in
//! `snap_openables`. Every mutation below keeps both sides in step.

use crate::geometry::math::{lerp, point_in_circle, project_on_segment, rotate, translate, wall_angle};
use crate::model::{Dim, EdgeKey, MovableKind, OpenableId, OpenableType, Point};
use crate::movable::{Movable, MovableState};
use crate::projection::View;
use crate::settings::Settings;
use crate::RoomGraph;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpenableSnap {
    pub edge: Option<EdgeKey>,
    pub pos: Option<f64>,
    /// 0 or 1; selects which side of the wall the leaf swings to.
    pub orientation: Option<u8>,
}

impl OpenableSnap {
    /// Re-expresses the binding after the wall's canonical direction reversed.
    pub fn flip(&mut self) {
        self.pos = self.pos.map(|p| 1.0 - p);
        self.orientation = self.orientation.map(|o| (o + 1) % 2);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Openable {
    pub state: MovableState,
    pub openable_type: OpenableType,
    /// Bottom-left corner of the frame; the wall runs through `p.y`.
    pub p: Point,
    pub dim: Dim,
    pub angle: f64,
    pub snap: OpenableSnap,
}

impl Openable {
    pub fn new(openable_type: OpenableType, p: Point, dim: Dim) -> Self {
        Openable {
            state: MovableState::new(MovableKind::Openable),
            openable_type,
            p,
            dim,
            angle: 0.0,
            snap: OpenableSnap::default(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.snap.edge.is_some()
    }

    /// Top-left corner of the frame, unrotated.
    pub fn handle(&self) -> Point {
        Point::new(self.p.x, self.p.y - self.dim.h)
    }

    pub fn point_in_rot_circle(&self, other: Point, radius: f64) -> bool {
        let q = rotate(self.center(), other, -self.angle);
        point_in_circle(translate(self.handle(), Dim::new(radius, radius), 1.0), radius, q)
    }

    pub fn point_in_rot_rectangle(&self, other: Point) -> bool {
        let q = rotate(self.center(), other, -self.angle);
        let h = self.handle();
        h.x <= q.x && h.x + self.dim.w >= q.x && h.y <= q.y && h.y + self.dim.h >= q.y
    }

    /// Centers the frame on `lerp(a, b, pos)` and aligns it with the wall.
    pub fn place_on_wall(&mut self, a: Point, b: Point, pos: f64, orientation: u8) {
        let proj = lerp(a, b, pos);
        self.p = Point::new(proj.x - self.dim.w / 2.0, proj.y);
        self.angle = wall_angle(a, b) + f64::from(orientation) * 180.0;
    }
}

impl Movable for Openable {
    fn state(&self) -> &MovableState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut MovableState {
        &mut self.state
    }
    fn center(&self) -> Point {
        Point::new(self.p.x + self.dim.w / 2.0, self.p.y)
    }
    fn hit_test(&self, world: Point) -> bool {
        self.point_in_rot_rectangle(world)
    }
    fn rotate_size(&self, settings: &Settings) -> f64 {
        let cap = settings.furniture_rotate_size;
        if self.dim.w / 2.0 <= cap || self.dim.h / 2.0 <= cap {
            self.dim.w.min(self.dim.h) / 2.0
        } else {
            cap
        }
    }
    // Bound openables follow their wall and cannot be rotated by hand.
    fn rotate_handle_hit_test(&self, world: Point, settings: &Settings) -> bool {
        !self.is_bound() && self.point_in_rot_circle(world, self.rotate_size(settings) / 2.0)
    }
    fn translate_by(&mut self, d: Point) {
        self.p = self.p + d;
    }
    fn angle(&self) -> f64 {
        self.angle
    }
    fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }
    fn angle_snap_point(&self) -> Point {
        self.handle()
    }
}

// ---- Binding maintenance ----
impl RoomGraph {
    /// Inserts an openable. A binding to a missing wall is dropped.
    pub fn add_openable(&mut self, mut openable: Openable) -> OpenableId {
        let id = self.next_openable;
        self.next_openable += 1;
        let key = openable.snap.edge.filter(|k| self.edges.contains_key(k));
        if key.is_none() {
            openable.snap = OpenableSnap::default();
        }
        self.openables.insert(id, openable);
        if let Some(key) = key {
            self.attach(id, key);
            self.reproject_openable(id);
        }
        id
    }

    pub fn openable(&self, id: OpenableId) -> Option<&Openable> {
        self.openables.get(&id)
    }

    pub fn openable_mut(&mut self, id: OpenableId) -> Option<&mut Openable> {
        self.openables.get_mut(&id)
    }

    /// Openables in insertion order.
    pub fn openables(&self) -> impl Iterator<Item = (OpenableId, &Openable)> + '_ {
        self.openables.iter().map(|(id, o)| (*id, o))
    }

    pub fn openable_count(&self) -> usize {
        self.openables.len()
    }

    /// Unbinds, then deletes.
    pub fn remove_openable(&mut self, id: OpenableId) -> Option<Openable> {
        self.unbind_openable(id);
        self.openables.remove(&id)
    }

    /// Binds to `key` at `pos` and snaps the frame onto the wall.
    pub fn bind_openable(&mut self, id: OpenableId, key: EdgeKey, pos: f64, orientation: u8) -> bool {
        if !self.openables.contains_key(&id) || !self.edges.contains_key(&key) || !pos.is_finite() {
            return false;
        }
        if self.openables.get(&id).and_then(|o| o.snap.edge) != Some(key) {
            self.detach(id);
            self.attach(id, key);
        }
        if let Some(o) = self.openables.get_mut(&id) {
            o.snap = OpenableSnap { edge: Some(key), pos: Some(pos.clamp(0.0, 1.0)), orientation: Some(orientation % 2) };
        }
        self.reproject_openable(id);
        true
    }

    pub fn unbind_openable(&mut self, id: OpenableId) -> bool {
        self.detach(id);
        match self.openables.get_mut(&id) {
            Some(o) => {
                o.snap = OpenableSnap::default();
                true
            }
            None => false,
        }
    }

    pub(crate) fn attach(&mut self, id: OpenableId, key: EdgeKey) {
        if let Some(edge) = self.edges.get_mut(&key) {
            if !edge.snap_openables.contains(&id) {
                edge.snap_openables.push(id);
            }
        }
        if let Some(o) = self.openables.get_mut(&id) {
            o.snap.edge = Some(key);
        }
    }

    // Removes the back-reference only; the caller decides what the snap becomes.
    pub(crate) fn detach(&mut self, id: OpenableId) {
        let Some(key) = self.openables.get(&id).and_then(|o| o.snap.edge) else {
            return;
        };
        if let Some(edge) = self.edges.get_mut(&key) {
            edge.snap_openables.retain(|o| *o != id);
        }
    }

    pub fn reproject_openable(&mut self, id: OpenableId) -> bool {
        let Some(o) = self.openables.get(&id) else {
            return false;
        };
        let (Some(key), Some(pos)) = (o.snap.edge, o.snap.pos) else {
            return false;
        };
        let (Some(a), Some(b)) = (self.nodes.get(&key.id1), self.nodes.get(&key.id2)) else {
            return false;
        };
        let (a, b) = (a.p, b.p);
        let orientation = o.snap.orientation.unwrap_or(0);
        match self.openables.get_mut(&id) {
            Some(o) => {
                o.place_on_wall(a, b, pos, orientation);
                true
            }
            None => false,
        }
    }

    /// Re-projects every openable bound to `key`.
    pub(crate) fn reproject_edge(&mut self, key: EdgeKey) {
        let ids = match self.edges.get(&key) {
            Some(e) => e.snap_openables.clone(),
            None => return,
        };
        for id in ids {
            self.reproject_openable(id);
        }
    }
}

// ---- Interaction ----
impl RoomGraph {
    /// Snaps a dragged openable to the nearest wall under the cursor, or
    /// releases it and moves it freely by the screen delta.
    pub fn openable_edge_snap(&mut self, id: OpenableId, cursor: Point, view: &View) -> bool {
        if !self.openables.contains_key(&id) {
            return false;
        }
        let click = view.projection.to(cursor);
        let size = view.settings.node_extend_size;

        let mut best: Option<(f64, EdgeKey, f64, u8, Point, Point)> = None;
        for key in self.edges.keys() {
            let (Some(n1), Some(n2)) = (self.nodes.get(&key.id1), self.nodes.get(&key.id2)) else {
                continue;
            };
            let Some(proj) = project_on_segment(click, n1.p, n2.p) else {
                continue;
            };
            if !(0.0..=1.0).contains(&proj.t) {
                continue;
            }
            let dist = proj.signed_dist.abs();
            if dist < size && best.map_or(true, |b| dist < b.0) {
                let orientation = if proj.signed_dist < 0.0 { 1 } else { 0 };
                best = Some((dist, *key, proj.t, orientation, n1.p, n2.p));
            }
        }

        match best {
            Some((_, key, t, orientation, a, b)) => {
                let old = self.openables.get(&id).and_then(|o| o.snap.edge);
                if old != Some(key) {
                    self.detach(id);
                    self.attach(id, key);
                    debug!(openable = id, id1 = key.id1, id2 = key.id2, "openable bound to wall");
                }
                if let Some(o) = self.openables.get_mut(&id) {
                    o.snap = OpenableSnap { edge: Some(key), pos: Some(t), orientation: Some(orientation) };
                    o.place_on_wall(a, b, t, orientation);
                    o.state.delta = view.projection.from(lerp(a, b, t));
                }
            }
            None => {
                self.detach(id);
                if let Some(o) = self.openables.get_mut(&id) {
                    o.snap = OpenableSnap::default();
                    let scale = view.projection.scale;
                    let d = o.state.delta;
                    o.p = o.p + Point::new((cursor.x - d.x) / scale, (cursor.y - d.y) / scale);
                    o.state.delta = cursor;
                }
            }
        }
        true
    }

    /// First openable (in insertion order) accepting the click.
    pub fn openable_click(&mut self, e: Point, view: &View) -> Option<OpenableId> {
        self.openables.iter_mut().find_map(|(id, o)| o.handle_click(e, view).then_some(*id))
    }

    pub fn openable_move(&mut self, e: Point, view: &View) -> bool {
        let active: Vec<(OpenableId, bool)> =
            self.openables.iter().filter(|(_, o)| o.state.is_active()).map(|(id, o)| (*id, o.state.translate)).collect();
        for &(id, translating) in &active {
            if translating {
                self.openable_edge_snap(id, e, view);
                if let Some(o) = self.openables.get_mut(&id) {
                    o.state.remove = view.will_remove(e);
                }
            } else if let Some(o) = self.openables.get_mut(&id) {
                o.rotate_towards(e, view);
            }
        }
        !active.is_empty()
    }

    /// Pointer-up: deletes openables dropped on the deletion zone, resets the rest.
    pub fn release_openables(&mut self) -> usize {
        let ids: Vec<OpenableId> = self.openables.keys().rev().copied().collect();
        let mut removed = 0;
        for id in ids {
            let remove = self.openables.get(&id).map_or(false, |o| o.state.remove);
            if remove {
                self.remove_openable(id);
                removed += 1;
            } else if let Some(o) = self.openables.get_mut(&id) {
                o.state.reset();
            }
        }
        removed
    }
}
