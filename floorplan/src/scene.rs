//! The editor context: owns every entity plus the view state, and routes
//! pointer events according to the current [`Mode`].

use crate::error::{Result, SceneError};
use crate::floorplan_image::FloorplanImage;
use crate::geometry::math::to_next_number;
use crate::json;
use crate::model::{Dim, FurnitureType, Mode, MovableKind, NodeId, OpenableId, Point};
use crate::movable::{release_movables, Circle, Ellipse, Furniture, Movable, Rectangle};
use crate::openable::Openable;
use crate::projection::{Bounds, Direction, Projection, View};
use crate::settings::Settings;
use crate::RoomGraph;
use serde_json::Value;
use tracing::{debug, info};

/// Screen position new elements are dropped at.
const SPAWN_SCREEN: Point = Point::new(10.0, 100.0);
const OPENABLE_DEPTH: f64 = 180.0;

/// Category cleared by [`Scene::reset_elements`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Graph,
    Openables,
    Labels,
    Furniture,
    FloorplanImage,
}

pub struct Scene {
    pub graph: RoomGraph,
    pub labels: Vec<Rectangle>,
    pub furniture: Vec<Furniture>,
    pub floorplan_image: FloorplanImage,
    pub projection: Projection,
    pub floorplan_projection: Projection,
    pub settings: Settings,
    pub viewport: Dim,
    /// Something is being dragged over the deletion zone.
    pub is_remove: bool,
    saved: String,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new(Settings::default(), Dim::new(800.0, 600.0))
    }
}

impl Scene {
    pub fn new(settings: Settings, viewport: Dim) -> Self {
        let mut scene = Scene {
            graph: RoomGraph::new(),
            labels: Vec::new(),
            furniture: Vec::new(),
            floorplan_image: FloorplanImage::default(),
            projection: Projection::default(),
            floorplan_projection: Projection::default(),
            settings,
            viewport,
            is_remove: false,
            saved: String::new(),
        };
        scene.mark_saved();
        scene
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.settings.mode = mode;
    }

    /// Replaces the settings wholesale; rejected settings leave the old ones.
    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Dim) {
        self.viewport = viewport;
    }

    /// Projection the pointer currently acts on.
    pub fn current_projection(&self) -> &Projection {
        if self.settings.mode == Mode::Floorplan { &self.floorplan_projection } else { &self.projection }
    }

    fn current_projection_mut(&mut self) -> &mut Projection {
        if self.settings.mode == Mode::Floorplan { &mut self.floorplan_projection } else { &mut self.projection }
    }
}

// Pointer events
impl Scene {
    /// Returns whether an entity was picked; otherwise the view starts panning.
    pub fn mouse_down(&mut self, e: Point) -> bool {
        if self.settings.mode == Mode::Floorplan {
            let selected = self.floorplan_image.handle_click(e, &self.floorplan_projection, self.settings.mode);
            if !selected {
                self.floorplan_projection.start_drag(e);
            }
            return selected;
        }

        let view = View::new(&self.projection, &self.settings, self.viewport);
        let selected = match self.settings.mode {
            Mode::Furniture => self.furniture.iter_mut().any(|f| f.handle_click(e, &view)),
            Mode::Room => {
                self.graph.handle_click(e, &view)
                    || self.graph.openable_click(e, &view).is_some()
                    || self.labels.iter_mut().any(|l| l.handle_click(e, &view))
            }
            Mode::Floorplan | Mode::Presentation => false,
        };
        if !selected {
            self.projection.start_drag(e);
        }
        selected
    }

    pub fn mouse_move(&mut self, e: Point) -> bool {
        if self.settings.mode == Mode::Floorplan {
            let moved = self.floorplan_image.handle_move(e, &self.floorplan_projection, self.settings.mode);
            let panned = self.floorplan_projection.drag_to(e);
            return moved || panned;
        }

        let view = View::new(&self.projection, &self.settings, self.viewport);
        let mut changed = false;
        match self.settings.mode {
            Mode::Furniture => {
                for f in &mut self.furniture {
                    changed |= f.handle_move(e, &view);
                }
            }
            Mode::Room => {
                changed |= self.graph.handle_move(e, &view);
                changed |= self.graph.openable_move(e, &view);
                for l in &mut self.labels {
                    changed |= l.handle_move(e, &view);
                }
            }
            Mode::Floorplan | Mode::Presentation => {}
        }
        self.is_remove = self.graph.is_removing()
            || self.labels.iter().any(|l| l.state.remove)
            || self.furniture.iter().any(|f| f.state().remove);
        changed | self.projection.drag_to(e)
    }

    /// Commits drags, deletes whatever was dropped on the deletion zone and
    /// ends panning.
    pub fn mouse_up(&mut self, e: Point) {
        match self.settings.mode {
            Mode::Floorplan => self.floorplan_image.handle_unclick(),
            Mode::Furniture => {
                let removed = release_movables(&mut self.furniture);
                if !removed.is_empty() {
                    debug!(count = removed.len(), "furniture removed");
                }
            }
            Mode::Room => {
                let view = View::new(&self.projection, &self.settings, self.viewport);
                self.graph.handle_unclick(e, &view);
                self.graph.release_openables();
                release_movables(&mut self.labels);
            }
            Mode::Presentation => {}
        }
        self.floorplan_projection.end_drag();
        self.projection.end_drag();
        self.is_remove = false;
    }

    /// Adds a corner under the cursor in room mode.
    pub fn double_click(&mut self, e: Point) -> Option<NodeId> {
        if self.settings.mode != Mode::Room {
            return None;
        }
        let p = to_next_number(self.projection.to(e));
        self.graph.add_node(p)
    }
}

// View navigation
impl Scene {
    pub fn zoom(&mut self, pin: Point, factor: f64) -> bool {
        let (min, max) = (self.settings.min_zoom, self.settings.max_zoom);
        self.current_projection_mut().zoom(pin, factor, min, max)
    }

    /// Mouse wheel: scrolling down zooms out.
    pub fn zoom_at(&mut self, pin: Point, wheel_delta_y: f64) -> bool {
        let f = self.settings.zoom_factor;
        if wheel_delta_y > 0.0 {
            self.zoom(pin, 1.0 / f)
        } else if wheel_delta_y < 0.0 {
            self.zoom(pin, f)
        } else {
            false
        }
    }

    pub fn zoom_to_middle(&mut self, zoom_in: bool) -> bool {
        let step = self.settings.zoom_factor.powi(4);
        let pin = Point::new(self.viewport.w / 2.0, self.viewport.h / 2.0);
        self.zoom(pin, if zoom_in { step } else { 1.0 / step })
    }

    pub fn move_projection(&mut self, direction: Direction) {
        let viewport = self.viewport;
        self.current_projection_mut().move_by(direction, viewport);
    }

    /// Fits everything visible in the current mode into the viewport.
    pub fn center_projection(&mut self) -> bool {
        let mut bounds = Bounds::default();
        if self.settings.mode != Mode::Floorplan {
            for (_, o) in self.graph.openables() {
                bounds.update(o.p);
            }
            for l in &self.labels {
                bounds.update(l.p);
            }
            for f in &self.furniture {
                bounds.update(f.center());
            }
            for n in self.graph.nodes() {
                bounds.update(n.p);
            }
        }
        let img = &self.floorplan_image;
        if img.image.is_some() {
            bounds.update(img.node1.p);
            bounds.update(img.node2.p);
            if let (Some(size), Some(scale)) = (img.image_size, img.current_scale(self.settings.mode)) {
                bounds.update(Point::default());
                bounds.update(Point::new(size.w * scale, size.h * scale));
            }
        }
        let (viewport, min, max) = (self.viewport, self.settings.min_zoom, self.settings.max_zoom);
        self.current_projection_mut().center_on(&bounds, viewport, min, max)
    }
}

// Add actions
impl Scene {
    fn spawn_point(&self) -> Point {
        self.projection.to(SPAWN_SCREEN)
    }

    pub fn add_openable(&mut self, width: f64) -> Result<OpenableId> {
        check_sizes(&[width])?;
        let o = Openable::new(self.settings.openable_type, self.spawn_point(), Dim::new(width, OPENABLE_DEPTH));
        let id = self.graph.add_openable(o);
        info!(openable = id, kind = ?self.settings.openable_type, "openable added");
        Ok(id)
    }

    /// `text_width` is the rendered width of `name` at `height`, measured by the host.
    pub fn add_label(&mut self, name: &str, text_width: f64, height: f64) -> Result<usize> {
        if name.is_empty() {
            return Err(SceneError::InvalidInput("label name must not be empty".into()));
        }
        check_sizes(&[height])?;
        if !(text_width.is_finite() && text_width >= 0.0) {
            return Err(SceneError::NonFinite("text_width"));
        }
        let p = self.spawn_point();
        self.labels.push(Rectangle::new(name, MovableKind::Rectangle, p, Dim::new(text_width, height)));
        info!(name, "label added");
        Ok(self.labels.len() - 1)
    }

    pub fn add_rectangle(&mut self, name: &str, w: f64, h: f64) -> Result<usize> {
        check_sizes(&[w, h])?;
        let r = Rectangle::new(name, MovableKind::Rectangle, self.spawn_point(), Dim::new(w, h));
        Ok(self.push_furniture(Furniture::Rectangle(r)))
    }

    /// A circle when `w == h`, an ellipse otherwise; either way inscribed in the
    /// `w`x`h` box at the spawn point.
    pub fn add_circle_or_ellipse(&mut self, name: &str, w: f64, h: f64) -> Result<usize> {
        check_sizes(&[w, h])?;
        let start = self.spawn_point();
        let f = if w == h {
            Furniture::Circle(Circle::new(name, Point::new(start.x + w / 2.0, start.y + w / 2.0), w / 2.0))
        } else {
            Furniture::Ellipse(Ellipse::new(name, Point::new(start.x + w / 2.0, start.y + h / 2.0), w / 2.0, h / 2.0))
        };
        Ok(self.push_furniture(f))
    }

    pub fn add_l_shape(&mut self, name: &str, dims: [Dim; 2]) -> Result<usize> {
        check_sizes(&dims.iter().flat_map(|d| [d.w, d.h]).collect::<Vec<_>>())?;
        let r = Rectangle::l_shape(name, self.spawn_point(), dims[0], dims[1]);
        Ok(self.push_furniture(Furniture::Rectangle(r)))
    }

    pub fn add_u_shape(&mut self, name: &str, dims: [Dim; 3]) -> Result<usize> {
        check_sizes(&dims.iter().flat_map(|d| [d.w, d.h]).collect::<Vec<_>>())?;
        let r = Rectangle::u_shape(name, self.spawn_point(), dims);
        Ok(self.push_furniture(Furniture::Rectangle(r)))
    }

    /// Adds furniture of the type selected in the settings. `dims` holds one
    /// entry per segment (two for L, three for U).
    pub fn add_furniture(&mut self, name: &str, dims: &[Dim]) -> Result<usize> {
        let need = match self.settings.furniture_type {
            FurnitureType::Rectangle | FurnitureType::Circle => 1,
            FurnitureType::L => 2,
            FurnitureType::U => 3,
        };
        if dims.len() != need {
            return Err(SceneError::InvalidInput(format!("expected {need} dimension pairs, got {}", dims.len())));
        }
        match self.settings.furniture_type {
            FurnitureType::Rectangle => self.add_rectangle(name, dims[0].w, dims[0].h),
            FurnitureType::Circle => self.add_circle_or_ellipse(name, dims[0].w, dims[0].h),
            FurnitureType::L => self.add_l_shape(name, [dims[0], dims[1]]),
            FurnitureType::U => self.add_u_shape(name, [dims[0], dims[1], dims[2]]),
        }
    }

    /// For the furniture being dragged: each border probe paired with the wall
    /// it faces, for the free-space annotations.
    pub fn wall_gaps(&self, index: usize) -> Vec<(Point, Point)> {
        let Some(f) = self.furniture.get(index) else {
            return Vec::new();
        };
        let c = f.center();
        f.wall_probes()
            .into_iter()
            .filter_map(|probe| self.graph.next_edge_to_segment(c, probe).map(|hit| (probe, hit)))
            .collect()
    }

    fn push_furniture(&mut self, f: Furniture) -> usize {
        info!(name = f.name(), kind = ?f.kind(), "furniture added");
        self.furniture.push(f);
        self.furniture.len() - 1
    }

    pub fn reset_elements(&mut self, kind: ElementKind) {
        match kind {
            ElementKind::Graph => {
                // keep the openables, unbound
                let ids: Vec<NodeId> = self.graph.nodes().map(|n| n.id).collect();
                for id in ids {
                    self.graph.remove_node(id);
                }
            }
            ElementKind::Openables => {
                let ids: Vec<OpenableId> = self.graph.openables().map(|(id, _)| id).collect();
                for id in ids {
                    self.graph.remove_openable(id);
                }
            }
            ElementKind::Labels => self.labels.clear(),
            ElementKind::Furniture => self.furniture.clear(),
            ElementKind::FloorplanImage => self.floorplan_image.reset(),
        }
    }
}

// Persistence
impl Scene {
    pub fn to_json(&self) -> Value {
        json::to_json_impl(&self.graph, &self.labels, &self.furniture, &self.floorplan_image)
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Replaces the whole scene. On error nothing changes.
    pub fn load_json(&mut self, s: &str) -> Result<()> {
        let data = json::from_json_impl(s)?;
        self.graph = data.graph;
        self.labels = data.labels;
        self.furniture = data.furniture;
        self.floorplan_image = data.floorplan_image;
        self.is_remove = false;
        self.mark_saved();
        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            openables = self.graph.openable_count(),
            furniture = self.furniture.len(),
            "scene loaded"
        );
        Ok(())
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.to_json_string();
    }

    /// True when the scene differs from the last save or load.
    pub fn is_dirty(&self) -> bool {
        self.saved != self.to_json_string()
    }
}

fn check_sizes(values: &[f64]) -> Result<()> {
    for v in values {
        if v.is_nan() || *v < 1.0 {
            return Err(SceneError::InvalidInput("sizes must be numbers of at least 1".into()));
        }
        if !v.is_finite() {
            return Err(SceneError::NonFinite("size"));
        }
    }
    Ok(())
}
