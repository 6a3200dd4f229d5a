//! Movable shapes: furniture, labels and the interaction protocol they share
//! with openables (pointer-down hit test, drag/rotate, pointer-up commit).

use crate::geometry::math::{angle_between, distance, point_in_circle, rotate, snaps_to, translate};
use crate::model::{Dim, MovableKind, Point};
use crate::projection::View;
use crate::settings::Settings;

// Tested in this order; 360 also catches angles just below a full turn.
const SNAP_ANGLES: [f64; 4] = [360.0, 270.0, 180.0, 90.0];

#[derive(Clone, Debug, PartialEq)]
pub struct MovableState {
    pub kind: MovableKind,
    pub delta: Point,
    pub translate: bool,
    pub rotate: bool,
    pub remove: bool,
    pub stroke: String,
    pub fill: String,
}

impl MovableState {
    pub fn new(kind: MovableKind) -> Self {
        MovableState {
            kind,
            delta: Point::default(),
            translate: false,
            rotate: false,
            remove: false,
            stroke: "black".to_string(),
            fill: String::new(),
        }
    }
    pub fn is_active(&self) -> bool {
        self.translate || self.rotate
    }
    pub fn reset(&mut self) {
        self.translate = false;
        self.rotate = false;
        self.delta = Point::default();
    }
}

/// Capability interface shared by every draggable entity.
///
/// All geometric predicates take world coordinates; the provided handlers take
/// screen coordinates and map them through the [`View`].
pub trait Movable {
    fn state(&self) -> &MovableState;
    fn state_mut(&mut self) -> &mut MovableState;

    fn center(&self) -> Point;
    fn hit_test(&self, world: Point) -> bool;
    fn rotate_size(&self, settings: &Settings) -> f64;
    /// `false` for shapes without a rotation handle.
    fn rotate_handle_hit_test(&self, world: Point, settings: &Settings) -> bool;
    fn translate_by(&mut self, d: Point);

    fn angle(&self) -> f64 {
        0.0
    }
    fn set_angle(&mut self, _angle: f64) {}
    /// Point that follows the pointer after an angle snap.
    fn angle_snap_point(&self) -> Point {
        self.center()
    }
    /// Border points used to measure the distance to the next wall.
    fn wall_probes(&self) -> Vec<Point> {
        Vec::new()
    }

    fn handle_click(&mut self, e: Point, view: &View) -> bool {
        let world = view.projection.to(e);
        if self.rotate_handle_hit_test(world, view.settings) {
            let s = self.state_mut();
            s.rotate = true;
            s.delta = e;
            true
        } else if self.hit_test(world) {
            let s = self.state_mut();
            s.translate = true;
            s.delta = e;
            true
        } else {
            false
        }
    }

    fn handle_move(&mut self, e: Point, view: &View) -> bool {
        if self.state().translate {
            let scale = view.projection.scale;
            let d = self.state().delta;
            self.translate_by(Point::new((e.x - d.x) / scale, (e.y - d.y) / scale));
            let s = self.state_mut();
            s.delta = e;
            s.remove = view.will_remove(e);
            true
        } else if self.state().rotate {
            self.rotate_towards(e, view);
            true
        } else {
            false
        }
    }

    /// Rotates by the pointer's angular motion around the center, snapping to
    /// quarter turns within `furniture_snap_angle`.
    fn rotate_towards(&mut self, e: Point, view: &View) {
        let pr = view.projection;
        let a = angle_between(pr.from(self.center()), self.state().delta, e);
        let candidate = ((self.angle() + a + 360.0) % 360.0).abs();
        for value in SNAP_ANGLES {
            if snaps_to(candidate, value, view.settings.furniture_snap_angle) {
                let snapped = value % 360.0;
                self.set_angle(snapped);
                let anchor = rotate(self.center(), self.angle_snap_point(), snapped);
                self.state_mut().delta = pr.from(anchor);
                return;
            }
        }
        let angle = self.angle() + a;
        self.set_angle(angle);
        self.state_mut().delta = e;
    }
}

/// Handle radius shared by rectangular shapes: half the smaller side when the
/// shape is small, otherwise the configured cap.
fn box_rotate_size(dim: Dim, cap: f64) -> f64 {
    if dim.w / 2.0 <= cap || dim.h / 2.0 <= cap {
        dim.w.min(dim.h) / 2.0
    } else {
        cap
    }
}

/// Plain, L- or U-shaped footprint built from side-by-side segments that share
/// a top edge. Also used for room labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Rectangle {
    pub state: MovableState,
    pub name: String,
    pub p: Point,
    pub dims: Vec<Dim>,
    pub angle: f64,
}

impl Rectangle {
    pub fn new(name: impl Into<String>, kind: MovableKind, p: Point, dim: Dim) -> Self {
        Rectangle {
            state: MovableState::new(kind),
            name: name.into(),
            p,
            dims: vec![dim],
            angle: 0.0,
        }
    }

    pub fn l_shape(name: impl Into<String>, p: Point, first: Dim, second: Dim) -> Self {
        let mut r = Rectangle::new(name, MovableKind::L, p, first);
        r.dims.push(second);
        r
    }

    pub fn u_shape(name: impl Into<String>, p: Point, dims: [Dim; 3]) -> Self {
        let mut r = Rectangle::new(name, MovableKind::U, p, dims[0]);
        r.dims.extend_from_slice(&dims[1..]);
        r
    }

    /// Total width and tallest segment.
    pub fn max_dim(&self) -> Dim {
        self.dims.iter().fold(Dim::new(0.0, 0.0), |acc, d| Dim::new(acc.w + d.w, acc.h.max(d.h)))
    }

    /// Total width and shortest segment.
    pub fn min_dim(&self) -> Dim {
        let folded = self.dims.iter().fold(Dim::new(0.0, f64::MAX), |acc, d| Dim::new(acc.w + d.w, acc.h.min(d.h)));
        if self.dims.is_empty() { Dim::new(0.0, 0.0) } else { folded }
    }
}

impl Movable for Rectangle {
    fn state(&self) -> &MovableState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut MovableState {
        &mut self.state
    }
    fn center(&self) -> Point {
        let m = self.max_dim();
        Point::new(self.p.x + m.w / 2.0, self.p.y + m.h / 2.0)
    }
    fn hit_test(&self, world: Point) -> bool {
        let q = rotate(self.center(), world, -self.angle);
        let mut x = self.p.x;
        for d in &self.dims {
            if x <= q.x && x + d.w >= q.x && self.p.y <= q.y && self.p.y + d.h >= q.y {
                return true;
            }
            x += d.w;
        }
        false
    }
    fn rotate_size(&self, settings: &Settings) -> f64 {
        box_rotate_size(self.min_dim(), settings.furniture_rotate_size)
    }
    fn rotate_handle_hit_test(&self, world: Point, settings: &Settings) -> bool {
        let r = self.rotate_size(settings) / 2.0;
        let q = rotate(self.center(), world, -self.angle);
        point_in_circle(translate(self.p, Dim::new(r, r), 1.0), r, q)
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
        self.p
    }
    fn wall_probes(&self) -> Vec<Point> {
        let c = self.center();
        let m = self.max_dim();
        [
            Point::new(c.x + m.w / 2.0, c.y),
            Point::new(c.x - m.w / 2.0, c.y),
            Point::new(c.x, c.y - m.h / 2.0),
            Point::new(c.x, c.y + m.h / 2.0),
        ]
        .into_iter()
        .map(|q| rotate(c, q, self.angle))
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    pub state: MovableState,
    pub name: String,
    pub c: Point,
    pub r: f64,
}

impl Circle {
    pub fn new(name: impl Into<String>, c: Point, r: f64) -> Self {
        Circle { state: MovableState::new(MovableKind::Circle), name: name.into(), c, r }
    }
}

impl Movable for Circle {
    fn state(&self) -> &MovableState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut MovableState {
        &mut self.state
    }
    fn center(&self) -> Point {
        self.c
    }
    fn hit_test(&self, world: Point) -> bool {
        point_in_circle(self.c, self.r, world)
    }
    fn rotate_size(&self, settings: &Settings) -> f64 {
        self.r.min(settings.furniture_rotate_size)
    }
    fn rotate_handle_hit_test(&self, _world: Point, _settings: &Settings) -> bool {
        false
    }
    fn translate_by(&mut self, d: Point) {
        self.c = self.c + d;
    }
    fn wall_probes(&self) -> Vec<Point> {
        let (c, r) = (self.c, self.r);
        vec![
            Point::new(c.x + r, c.y),
            Point::new(c.x - r, c.y),
            Point::new(c.x, c.y - r),
            Point::new(c.x, c.y + r),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub state: MovableState,
    pub name: String,
    pub c: Point,
    pub r_x: f64,
    pub r_y: f64,
    pub angle: f64,
}

impl Ellipse {
    pub fn new(name: impl Into<String>, c: Point, r_x: f64, r_y: f64) -> Self {
        Ellipse { state: MovableState::new(MovableKind::Ellipse), name: name.into(), c, r_x, r_y, angle: 0.0 }
    }

    /// Focal distance from the center.
    pub fn f(&self) -> f64 {
        (self.r_x.max(self.r_y).powi(2) - self.r_x.min(self.r_y).powi(2)).sqrt()
    }

    /// Semi-latus rectum, used to size the rotation handle at the focus.
    pub fn z(&self) -> f64 {
        self.r_x.min(self.r_y).powi(2) / self.r_x.max(self.r_y)
    }

    pub fn f1(&self) -> Point {
        let f = self.f();
        if self.r_x < self.r_y { Point::new(self.c.x, self.c.y - f) } else { Point::new(self.c.x - f, self.c.y) }
    }

    pub fn f2(&self) -> Point {
        let f = self.f();
        if self.r_x < self.r_y { Point::new(self.c.x, self.c.y + f) } else { Point::new(self.c.x + f, self.c.y) }
    }

    /// Membership of an unrotated point.
    pub fn contains(&self, p: Point) -> bool {
        distance(p, self.f1()) + distance(p, self.f2()) <= 2.0 * self.r_x.max(self.r_y)
    }
}

impl Movable for Ellipse {
    fn state(&self) -> &MovableState {
        &self.state
    }
    fn state_mut(&mut self) -> &mut MovableState {
        &mut self.state
    }
    fn center(&self) -> Point {
        self.c
    }
    fn hit_test(&self, world: Point) -> bool {
        self.contains(rotate(self.c, world, -self.angle))
    }
    fn rotate_size(&self, settings: &Settings) -> f64 {
        self.z().min(settings.furniture_rotate_size)
    }
    fn rotate_handle_hit_test(&self, world: Point, settings: &Settings) -> bool {
        if self.r_x == self.r_y {
            return false;
        }
        let q = rotate(self.c, world, -self.angle);
        point_in_circle(self.f2(), self.rotate_size(settings) / 2.0, q)
    }
    fn translate_by(&mut self, d: Point) {
        self.c = self.c + d;
    }
    fn angle(&self) -> f64 {
        self.angle
    }
    fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }
    fn angle_snap_point(&self) -> Point {
        self.f2()
    }
    fn wall_probes(&self) -> Vec<Point> {
        let c = self.c;
        [
            Point::new(c.x + self.r_x, c.y),
            Point::new(c.x - self.r_x, c.y),
            Point::new(c.x, c.y - self.r_y),
            Point::new(c.x, c.y + self.r_y),
        ]
        .into_iter()
        .map(|q| rotate(c, q, self.angle))
        .collect()
    }
}

/// A piece of furniture.
#[derive(Clone, Debug, PartialEq)]
pub enum Furniture {
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
}

impl Furniture {
    pub fn kind(&self) -> MovableKind {
        self.state().kind
    }
    pub fn name(&self) -> &str {
        match self {
            Furniture::Rectangle(r) => &r.name,
            Furniture::Circle(c) => &c.name,
            Furniture::Ellipse(e) => &e.name,
        }
    }
    fn inner(&self) -> &dyn Movable {
        match self {
            Furniture::Rectangle(r) => r,
            Furniture::Circle(c) => c,
            Furniture::Ellipse(e) => e,
        }
    }
    fn inner_mut(&mut self) -> &mut dyn Movable {
        match self {
            Furniture::Rectangle(r) => r,
            Furniture::Circle(c) => c,
            Furniture::Ellipse(e) => e,
        }
    }
}

impl Movable for Furniture {
    fn state(&self) -> &MovableState {
        self.inner().state()
    }
    fn state_mut(&mut self) -> &mut MovableState {
        self.inner_mut().state_mut()
    }
    fn center(&self) -> Point {
        self.inner().center()
    }
    fn hit_test(&self, world: Point) -> bool {
        self.inner().hit_test(world)
    }
    fn rotate_size(&self, settings: &Settings) -> f64 {
        self.inner().rotate_size(settings)
    }
    fn rotate_handle_hit_test(&self, world: Point, settings: &Settings) -> bool {
        self.inner().rotate_handle_hit_test(world, settings)
    }
    fn translate_by(&mut self, d: Point) {
        self.inner_mut().translate_by(d)
    }
    fn angle(&self) -> f64 {
        self.inner().angle()
    }
    fn set_angle(&mut self, angle: f64) {
        self.inner_mut().set_angle(angle)
    }
    fn angle_snap_point(&self) -> Point {
        self.inner().angle_snap_point()
    }
    fn wall_probes(&self) -> Vec<Point> {
        self.inner().wall_probes()
    }
}

/// Pointer-up for a list of movables: drops the ones marked for removal (in
/// reverse order) and resets the rest. Returns the removed items.
pub fn release_movables<T: Movable>(items: &mut Vec<T>) -> Vec<T> {
    let mut removed = Vec::new();
    for i in (0..items.len()).rev() {
        if items[i].state().remove {
            removed.push(items.remove(i));
        } else {
            items[i].state_mut().reset();
        }
    }
    removed
}
