use crate::model::{Dim, Point};
use crate::settings::Settings;

/// Affine screen <-> world mapping: `screen = p + world * scale`.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub p: Point,
    pub drag: bool,
    pub delta: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Default for Projection {
    fn default() -> Self {
        Projection::new(0.1)
    }
}

impl Projection {
    pub fn new(scale: f64) -> Self {
        Projection { scale, p: Point::default(), drag: false, delta: Point::default() }
    }

    /// Screen to world.
    pub fn to(&self, q: Point) -> Point {
        Point { x: (q.x - self.p.x) / self.scale, y: (q.y - self.p.y) / self.scale }
    }

    /// World to screen.
    pub fn from(&self, q: Point) -> Point {
        Point { x: self.p.x + q.x * self.scale, y: self.p.y + q.y * self.scale }
    }

    /// Zooms around the screen point `pin`. Returns false when the new scale
    /// would leave the open interval `(min_zoom, max_zoom)`.
    pub fn zoom(&mut self, pin: Point, factor: f64, min_zoom: f64, max_zoom: f64) -> bool {
        let new_scale = self.scale * factor;
        if !(new_scale > min_zoom && new_scale < max_zoom) {
            return false;
        }
        self.scale = new_scale;
        self.p.x = pin.x - (pin.x - self.p.x) * factor;
        self.p.y = pin.y - (pin.y - self.p.y) * factor;
        true
    }

    pub fn start_drag(&mut self, e: Point) {
        self.drag = true;
        self.delta = e;
    }

    pub fn drag_to(&mut self, e: Point) -> bool {
        if !self.drag {
            return false;
        }
        self.p.x += e.x - self.delta.x;
        self.p.y += e.y - self.delta.y;
        self.delta = e;
        true
    }

    pub fn end_drag(&mut self) {
        self.drag = false;
        self.delta = Point::default();
    }

    /// Pans by a twentieth of the viewport.
    pub fn move_by(&mut self, direction: Direction, viewport: Dim) {
        match direction {
            Direction::Up => self.p.y -= viewport.h / 20.0,
            Direction::Down => self.p.y += viewport.h / 20.0,
            Direction::Left => self.p.x -= viewport.w / 20.0,
            Direction::Right => self.p.x += viewport.w / 20.0,
        }
    }

    /// Fits `bounds` into the viewport with a 20% margin, then centers on it.
    pub fn center_on(&mut self, bounds: &Bounds, viewport: Dim, min_zoom: f64, max_zoom: f64) -> bool {
        let Some((min, max)) = bounds.get() else {
            return false;
        };
        let a = self.to(Point::default());
        let b = self.to(Point::new(viewport.w, viewport.h));
        let factor = ((b.x - a.x) / ((max.x - min.x) * 1.2)).min((b.y - a.y) / ((max.y - min.y) * 1.2));
        let pin = self.p;
        self.zoom(pin, factor, min_zoom, max_zoom);

        let a = self.to(Point::default());
        let b = self.to(Point::new(viewport.w, viewport.h));
        let new_p = self.from(Point::new(
            (min.x + max.x) / 2.0 - (b.x - a.x) / 2.0,
            (min.y + max.y) / 2.0 - (b.y - a.y) / 2.0,
        ));
        self.p = self.p - new_p;
        true
    }
}

/// What an input handler needs to interpret a screen-space pointer position.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    pub projection: &'a Projection,
    pub settings: &'a Settings,
    pub viewport: Dim,
}

impl<'a> View<'a> {
    pub fn new(projection: &'a Projection, settings: &'a Settings, viewport: Dim) -> Self {
        View { projection, settings, viewport }
    }

    /// Deletion zone in the top-right corner of the viewport.
    pub fn will_remove(&self, e: Point) -> bool {
        let d = self.settings.delete_dim;
        e.x >= self.viewport.w - d.w && e.x <= self.viewport.w && e.y >= 0.0 && e.y <= d.h
    }
}

/// Running axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    min: Option<Point>,
    max: Option<Point>,
}

impl Bounds {
    pub fn update(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        self.min = Some(match self.min {
            Some(m) => Point::new(m.x.min(p.x), m.y.min(p.y)),
            None => p,
        });
        self.max = Some(match self.max {
            Some(m) => Point::new(m.x.max(p.x), m.y.max(p.y)),
            None => p,
        });
    }

    pub fn get(&self) -> Option<(Point, Point)> {
        Some((self.min?, self.max?))
    }
}
