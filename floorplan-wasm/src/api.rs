use crate::Scene;
use floorplan::model::{Dim, Mode, Point};
use floorplan::projection::Direction;
use floorplan::scene::ElementKind;
use floorplan::settings::Settings;
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{arr_f64, arr_u32, new_obj, set_kv, to_js};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn mode_from_u8(m: u8) -> Option<Mode> {
    match m {
        0 => Some(Mode::Floorplan),
        1 => Some(Mode::Room),
        2 => Some(Mode::Furniture),
        3 => Some(Mode::Presentation),
        _ => None,
    }
}

fn direction_from_u8(d: u8) -> Option<Direction> {
    match d {
        0 => Some(Direction::Up),
        1 => Some(Direction::Down),
        2 => Some(Direction::Right),
        3 => Some(Direction::Left),
        _ => None,
    }
}

fn element_kind_from_u8(k: u8) -> Option<ElementKind> {
    match k {
        0 => Some(ElementKind::Graph),
        1 => Some(ElementKind::Openables),
        2 => Some(ElementKind::Labels),
        3 => Some(ElementKind::Furniture),
        4 => Some(ElementKind::FloorplanImage),
        _ => None,
    }
}

fn finite_point(x: f64, y: f64) -> Result<Point, JsValue> {
    if !x.is_finite() {
        return Err(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Err(error::non_finite("y"));
    }
    Ok(Point::new(x, y))
}

fn index_result(r: floorplan::Result<usize>) -> JsValue {
    match r {
        Ok(i) => error::ok(JsValue::from_f64(i as f64)),
        Err(e) => error::scene(&e),
    }
}

#[wasm_bindgen]
impl Scene {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Scene {
        crate::Scene::rs_new(width, height)
    }

    // View state
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.inner.set_viewport(Dim::new(width, height));
    }
    pub fn set_mode(&mut self, mode: u8) -> bool {
        match mode_from_u8(mode) {
            Some(m) => {
                self.inner.set_mode(m);
                true
            }
            None => false,
        }
    }
    pub fn set_mode_res(&mut self, mode: u8) -> JsValue {
        if mode_from_u8(mode).is_none() {
            return error::invalid_enum("mode", mode, "0:Floorplan, 1:Room, 2:Furniture, 3:Presentation");
        }
        error::ok(JsValue::from_bool(self.set_mode(mode)))
    }
    pub fn get_settings(&self) -> JsValue {
        to_js(&self.inner.settings)
    }
    pub fn set_settings_res(&mut self, v: JsValue) -> JsValue {
        let settings: Settings = match serde_wasm_bindgen::from_value(v) {
            Ok(s) => s,
            Err(e) => return error::err("parse_error", format!("{}", e), None),
        };
        match self.inner.set_settings(settings) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::scene(&e),
        }
    }
    /// `{scale, x, y}` of the projection the current mode draws with.
    pub fn get_projection(&self) -> JsValue {
        let pr = self.inner.current_projection();
        let obj = new_obj();
        set_kv(&obj, "scale", &JsValue::from_f64(pr.scale));
        set_kv(&obj, "x", &JsValue::from_f64(pr.p.x));
        set_kv(&obj, "y", &JsValue::from_f64(pr.p.y));
        obj.into()
    }
    pub fn is_remove(&self) -> bool {
        self.inner.is_remove
    }

    // Pointer events
    pub fn mouse_down(&mut self, x: f64, y: f64) -> bool {
        self.inner.mouse_down(Point::new(x, y))
    }
    pub fn mouse_down_res(&mut self, x: f64, y: f64) -> JsValue {
        match finite_point(x, y) {
            Ok(p) => error::ok(JsValue::from_bool(self.inner.mouse_down(p))),
            Err(e) => e,
        }
    }
    pub fn mouse_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.mouse_move(Point::new(x, y))
    }
    pub fn mouse_move_res(&mut self, x: f64, y: f64) -> JsValue {
        match finite_point(x, y) {
            Ok(p) => error::ok(JsValue::from_bool(self.inner.mouse_move(p))),
            Err(e) => e,
        }
    }
    pub fn mouse_up(&mut self, x: f64, y: f64) {
        self.inner.mouse_up(Point::new(x, y));
    }
    pub fn mouse_up_res(&mut self, x: f64, y: f64) -> JsValue {
        match finite_point(x, y) {
            Ok(p) => {
                self.inner.mouse_up(p);
                error::ok(JsValue::UNDEFINED)
            }
            Err(e) => e,
        }
    }
    pub fn double_click(&mut self, x: f64, y: f64) -> Option<u32> {
        self.inner.double_click(Point::new(x, y))
    }
    pub fn double_click_res(&mut self, x: f64, y: f64) -> JsValue {
        match finite_point(x, y) {
            Ok(p) => match self.inner.double_click(p) {
                Some(id) => error::ok(JsValue::from_f64(id as f64)),
                None => error::ok(JsValue::NULL),
            },
            Err(e) => e,
        }
    }

    // Navigation
    pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        self.inner.zoom_at(Point::new(x, y), delta_y)
    }
    pub fn wheel_res(&mut self, x: f64, y: f64, delta_y: f64) -> JsValue {
        let p = match finite_point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        if !delta_y.is_finite() {
            return error::non_finite("delta_y");
        }
        error::ok(JsValue::from_bool(self.inner.zoom_at(p, delta_y)))
    }
    pub fn zoom_to_middle(&mut self, zoom_in: bool) -> bool {
        self.inner.zoom_to_middle(zoom_in)
    }
    pub fn center_projection(&mut self) -> bool {
        self.inner.center_projection()
    }
    pub fn move_projection_res(&mut self, direction: u8) -> JsValue {
        match direction_from_u8(direction) {
            Some(d) => {
                self.inner.move_projection(d);
                error::ok(JsValue::TRUE)
            }
            None => error::invalid_enum("direction", direction, "0:Up, 1:Down, 2:Right, 3:Left"),
        }
    }

    // Add actions
    pub fn add_openable_res(&mut self, width: f64) -> JsValue {
        match self.inner.add_openable(width) {
            Ok(id) => error::ok(JsValue::from_f64(id as f64)),
            Err(e) => error::scene(&e),
        }
    }
    pub fn add_label_res(&mut self, name: &str, text_width: f64, height: f64) -> JsValue {
        index_result(self.inner.add_label(name, text_width, height))
    }
    pub fn add_rectangle_res(&mut self, name: &str, w: f64, h: f64) -> JsValue {
        index_result(self.inner.add_rectangle(name, w, h))
    }
    pub fn add_circle_or_ellipse_res(&mut self, name: &str, w: f64, h: f64) -> JsValue {
        index_result(self.inner.add_circle_or_ellipse(name, w, h))
    }
    pub fn add_l_shape_res(&mut self, name: &str, w1: f64, h1: f64, w2: f64, h2: f64) -> JsValue {
        index_result(self.inner.add_l_shape(name, [Dim::new(w1, h1), Dim::new(w2, h2)]))
    }
    pub fn add_u_shape_res(&mut self, name: &str, dims: &Float64Array) -> JsValue {
        let flat = dims.to_vec();
        if flat.len() != 6 {
            return error::err("invalid_input", "U shape needs three (w, h) pairs", None);
        }
        let d = |i: usize| Dim::new(flat[2 * i], flat[2 * i + 1]);
        index_result(self.inner.add_u_shape(name, [d(0), d(1), d(2)]))
    }
    /// `dims` is a flat `[w0, h0, w1, h1, ...]` list, one pair per segment.
    pub fn add_furniture_res(&mut self, name: &str, dims: &Float64Array) -> JsValue {
        let flat = dims.to_vec();
        if flat.len() % 2 != 0 {
            return error::err("invalid_input", "dims must hold (w, h) pairs", None);
        }
        let pairs: Vec<Dim> = flat.chunks_exact(2).map(|c| Dim::new(c[0], c[1])).collect();
        index_result(self.inner.add_furniture(name, &pairs))
    }
    pub fn reset_elements_res(&mut self, kind: u8) -> JsValue {
        match element_kind_from_u8(kind) {
            Some(k) => {
                self.inner.reset_elements(k);
                error::ok(JsValue::TRUE)
            }
            None => error::invalid_enum("kind", kind, "0:Graph, 1:Openables, 2:Labels, 3:Furniture, 4:FloorplanImage"),
        }
    }
    pub fn remove_openable_res(&mut self, id: u32) -> JsValue {
        match self.inner.graph.remove_openable(id) {
            Some(_) => error::ok(JsValue::TRUE),
            None => error::invalid_id("openable", id),
        }
    }

    // Floorplan image
    pub fn set_floorplan_image_res(&mut self, data_url: String, width: f64, height: f64) -> JsValue {
        let size = if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Some(Dim::new(width, height))
        } else {
            None
        };
        match self.inner.floorplan_image.set_image(data_url, size) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::scene(&e),
        }
    }
    pub fn set_floorplan_distance_res(&mut self, distance: f64) -> JsValue {
        match self.inner.floorplan_image.set_distance(distance) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::scene(&e),
        }
    }
    /// World units per image pixel, or null while uncalibrated.
    pub fn floorplan_scale(&self) -> Option<f64> {
        self.inner.floorplan_image.current_scale(self.inner.settings.mode)
    }

    // Render data
    pub fn get_node_data(&self) -> JsValue {
        let g = &self.inner.graph;
        let ids: Vec<u32> = g.nodes().map(|n| n.id).collect();
        let pos: Vec<f64> = g.nodes().flat_map(|n| [n.p.x, n.p.y]).collect();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let endpoints: Vec<u32> = self.inner.graph.edges().flat_map(|e| [e.id1, e.id2]).collect();
        let obj = new_obj();
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        obj.into()
    }
    pub fn get_rooms(&self) -> JsValue {
        to_js(&self.inner.graph.rooms())
    }
    /// Flat `[probe.x, probe.y, wall.x, wall.y, ...]` for one piece of furniture.
    pub fn wall_gaps(&self, index: usize) -> Float64Array {
        let flat: Vec<f64> =
            self.inner.wall_gaps(index).into_iter().flat_map(|(p, w)| [p.x, p.y, w.x, w.y]).collect();
        arr_f64(&flat)
    }

    // Persistence
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json())
    }
    pub fn to_json_string(&self) -> String {
        self.inner.to_json_string()
    }
    pub fn load_json(&mut self, s: &str) -> bool {
        match self.inner.load_json(s) {
            Ok(()) => true,
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("scene not loaded: {}", e)));
                false
            }
        }
    }
    pub fn load_json_res(&mut self, s: &str) -> JsValue {
        match self.inner.load_json(s) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::scene(&e),
        }
    }
    pub fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }
    pub fn mark_saved(&mut self) {
        self.inner.mark_saved();
    }
}
