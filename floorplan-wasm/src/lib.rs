use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Scene { pub(crate) inner: floorplan::Scene }

impl Scene {
    pub fn rs_new(width: f64, height: f64) -> Scene {
        let viewport = floorplan::model::Dim::new(width, height);
        Scene { inner: floorplan::Scene::new(floorplan::settings::Settings::default(), viewport) }
    }
}
