use crate::error::{Result, SceneError};
use crate::geometry::limits::MAX_IMAGE_BYTES;
use crate::geometry::math::distance;
use crate::model::{CornerNode, Dim, Mode, Point};
use crate::projection::Projection;
use tracing::info;

/// Background floorplan image with its two-point calibration.
///
/// The user drags `node1`/`node2` onto two points of the image whose real
/// distance is `distance` mm; outside floorplan mode the image is drawn scaled
/// by [`FloorplanImage::current_scale`].
#[derive(Clone, Debug, PartialEq)]
pub struct FloorplanImage {
    /// Opaque data URL; decoding is the host's job.
    pub image: Option<String>,
    pub distance: f64,
    pub node1: CornerNode,
    pub node2: CornerNode,
    pub node_size: f64,
    /// Pixel size of the decoded image, reported by the host.
    pub image_size: Option<Dim>,
}

impl Default for FloorplanImage {
    fn default() -> Self {
        FloorplanImage {
            image: None,
            distance: 1000.0,
            node1: CornerNode::new(0, Point::new(0.0, -20.0)),
            node2: CornerNode::new(1, Point::new(1000.0, -20.0)),
            node_size: 15.0,
            image_size: None,
        }
    }
}

impl FloorplanImage {
    /// Drops the image and re-seeds the calibration nodes; keeps `distance`.
    pub fn reset(&mut self) {
        self.image = None;
        self.image_size = None;
        self.node1 = CornerNode::new(0, Point::new(0.0, -20.0));
        self.node2 = CornerNode::new(1, Point::new(self.distance, -20.0));
    }

    pub fn set_image(&mut self, data_url: String, size: Option<Dim>) -> Result<()> {
        if data_url.len() > MAX_IMAGE_BYTES {
            return Err(SceneError::LimitExceeded { what: "floorplan image", limit: MAX_IMAGE_BYTES });
        }
        info!(bytes = data_url.len(), "floorplan image set");
        self.image = Some(data_url);
        self.image_size = size;
        Ok(())
    }

    pub fn set_distance(&mut self, distance: f64) -> Result<()> {
        if distance.is_nan() || distance < 1.0 {
            return Err(SceneError::InvalidInput("distance must be at least 1 mm".into()));
        }
        if !distance.is_finite() {
            return Err(SceneError::NonFinite("distance"));
        }
        self.distance = distance;
        Ok(())
    }

    /// `1` while calibrating; `None` when the calibration nodes coincide.
    pub fn current_scale(&self, mode: Mode) -> Option<f64> {
        if mode == Mode::Floorplan {
            return Some(1.0);
        }
        let d = distance(self.node1.p, self.node2.p);
        if d > 0.0 {
            Some(self.distance / d)
        } else {
            None
        }
    }

    pub fn handle_click(&mut self, e: Point, projection: &Projection, mode: Mode) -> bool {
        if self.image.is_none() || mode != Mode::Floorplan {
            return false;
        }
        let click = projection.to(e);
        let d1 = distance(click, self.node1.p);
        let d2 = distance(click, self.node2.p);
        let (node, d) = if d1 <= d2 { (&mut self.node1, d1) } else { (&mut self.node2, d2) };
        if d > self.node_size {
            return false;
        }
        node.translate = true;
        node.delta = e;
        true
    }

    pub fn handle_move(&mut self, e: Point, projection: &Projection, mode: Mode) -> bool {
        if self.image.is_none() || mode != Mode::Floorplan {
            return false;
        }
        let mut changed = false;
        for node in [&mut self.node1, &mut self.node2] {
            if node.translate {
                changed = true;
                node.p.x += (e.x - node.delta.x) / projection.scale;
                node.p.y += (e.y - node.delta.y) / projection.scale;
                node.delta = e;
            }
        }
        changed
    }

    pub fn handle_unclick(&mut self) {
        self.node1.reset_interaction();
        self.node2.reset_interaction();
    }
}
