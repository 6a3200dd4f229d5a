use crate::error::{Result, SceneError};
use crate::model::{Dim, FurnitureType, Mode, OpenableType};
use serde::{Deserialize, Serialize};

/// Editor configuration. Every field has a default so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub mode: Mode,
    pub openable_type: OpenableType,
    #[serde(rename = "type")]
    pub furniture_type: FurnitureType,

    pub zoom_factor: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub delete_dim: Dim,

    // Radius of the inner (translate) and outer (extend) corner rings, in mm.
    pub node_trans_size: f64,
    pub node_extend_size: f64,
    /// Stored for compatibility with saved settings; corner snapping uses
    /// `node_extend_size` as its radius.
    pub node_snap_dist: f64,

    pub furniture_rotate_size: f64,
    /// Degrees.
    pub furniture_snap_angle: f64,

    pub show_edge_labels: bool,
    pub show_room_size: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mode: Mode::Room,
            openable_type: OpenableType::Left,
            furniture_type: FurnitureType::Rectangle,
            zoom_factor: 1.05,
            min_zoom: 1.0 / 500.0,
            max_zoom: 100.0,
            delete_dim: Dim::new(50.0, 30.0),
            node_trans_size: 50.0,
            node_extend_size: 150.0,
            node_snap_dist: 100.0,
            furniture_rotate_size: 100.0,
            furniture_snap_angle: 5.0,
            show_edge_labels: false,
            show_room_size: false,
        }
    }
}

impl Settings {
    pub fn from_json(s: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("zoomFactor", self.zoom_factor),
            ("minZoom", self.min_zoom),
            ("maxZoom", self.max_zoom),
            ("nodeTransSize", self.node_trans_size),
            ("nodeExtendSize", self.node_extend_size),
            ("nodeSnapDist", self.node_snap_dist),
            ("furnitureRotateSize", self.furniture_rotate_size),
        ];
        for (name, v) in positive {
            if !v.is_finite() {
                return Err(SceneError::NonFinite(name));
            }
            if v <= 0.0 {
                return Err(SceneError::InvalidInput(format!("{name} must be positive")));
            }
        }
        if !(self.furniture_snap_angle.is_finite() && self.furniture_snap_angle >= 0.0) {
            return Err(SceneError::InvalidInput("furnitureSnapAngle must be >= 0".into()));
        }
        if self.min_zoom >= self.max_zoom {
            return Err(SceneError::InvalidInput("minZoom must be below maxZoom".into()));
        }
        if self.node_trans_size > self.node_extend_size {
            return Err(SceneError::InvalidInput("nodeTransSize must not exceed nodeExtendSize".into()));
        }
        Ok(())
    }

    /// Grows the extend ring if needed so it always encloses the translate ring.
    pub fn set_node_trans_size(&mut self, size: f64) -> Result<()> {
        check_ring_size(size)?;
        self.node_trans_size = size;
        self.node_extend_size = self.node_extend_size.max(size);
        Ok(())
    }

    pub fn set_node_extend_size(&mut self, size: f64) -> Result<()> {
        check_ring_size(size)?;
        self.node_extend_size = size;
        self.node_trans_size = self.node_trans_size.min(size);
        Ok(())
    }
}

fn check_ring_size(size: f64) -> Result<()> {
    if !size.is_finite() {
        return Err(SceneError::NonFinite("size"));
    }
    if size < 1.0 {
        return Err(SceneError::InvalidInput("ring size must be at least 1".into()));
    }
    Ok(())
}
