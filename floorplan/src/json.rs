use crate::error::{Result, SceneError};
use crate::floorplan_image::FloorplanImage;
use crate::geometry::limits;
use crate::model::{CornerNode, Dim, EdgeKey, MovableKind, NodeId, OpenableType, Point};
use crate::movable::{Circle, Ellipse, Furniture, MovableState, Rectangle};
use crate::openable::{Openable, OpenableSnap};
use crate::RoomGraph;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Everything a scene file describes, built off to the side so a failed load
/// leaves the live scene untouched.
pub(crate) struct SceneData {
    pub graph: RoomGraph,
    pub labels: Vec<Rectangle>,
    pub furniture: Vec<Furniture>,
    pub floorplan_image: FloorplanImage,
}

#[derive(Serialize, Deserialize)]
struct MovSer {
    #[serde(rename = "type")]
    kind: MovableKind,
    #[serde(default = "default_stroke")]
    stroke: String,
    #[serde(default)]
    fill: String,
}

fn default_stroke() -> String {
    "black".to_string()
}

impl MovSer {
    fn from_state(s: &MovableState) -> Self {
        MovSer { kind: s.kind, stroke: s.stroke.clone(), fill: s.fill.clone() }
    }
    fn apply(self, s: &mut MovableState) {
        s.stroke = self.stroke;
        s.fill = self.fill;
    }
}

#[derive(Serialize, Deserialize)]
struct NodeSer {
    id: NodeId,
    p: Point,
}

#[derive(Serialize, Deserialize)]
struct EdgeSer {
    id1: NodeId,
    id2: NodeId,
    #[serde(default = "default_stroke")]
    stroke: String,
}

pub(crate) fn to_json_impl(
    graph: &RoomGraph,
    labels: &[Rectangle],
    furniture: &[Furniture],
    image: &FloorplanImage,
) -> Value {
    #[derive(Serialize)]
    struct GraphSer {
        nodes: BTreeMap<NodeId, NodeSer>,
        edges: BTreeMap<NodeId, BTreeMap<NodeId, EdgeSer>>,
    }
    #[derive(Serialize)]
    struct SnapSer {
        edge: Option<EdgeSer>,
        pos: Option<f64>,
        orientation: Option<u8>,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OpenableSer {
        mov: MovSer,
        openable_type: OpenableType,
        p: Point,
        dim: Dim,
        angle: f64,
        snap: SnapSer,
    }
    #[derive(Serialize)]
    struct RectangleSer<'a> {
        mov: MovSer,
        name: &'a str,
        p: Point,
        dims: &'a [Dim],
        angle: f64,
    }
    #[derive(Serialize)]
    struct CircleSer<'a> {
        mov: MovSer,
        name: &'a str,
        c: Point,
        r: f64,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct EllipseSer<'a> {
        mov: MovSer,
        name: &'a str,
        c: Point,
        r_x: f64,
        r_y: f64,
        angle: f64,
    }
    #[derive(Serialize)]
    #[serde(untagged)]
    enum FurnitureSer<'a> {
        Rectangle(RectangleSer<'a>),
        Circle(CircleSer<'a>),
        Ellipse(EllipseSer<'a>),
    }
    #[derive(Serialize)]
    #[serde(untagged)]
    enum ImageSer {
        Calibrated { image: String, distance: f64, node1: NodeSer, node2: NodeSer },
        Empty {},
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct DocSer<'a> {
        graph: GraphSer,
        labels: Vec<RectangleSer<'a>>,
        openables: Vec<OpenableSer>,
        furniture: Vec<FurnitureSer<'a>>,
        floorplan_image: ImageSer,
    }

    fn rect(r: &Rectangle) -> RectangleSer<'_> {
        RectangleSer { mov: MovSer::from_state(&r.state), name: &r.name, p: r.p, dims: &r.dims, angle: r.angle }
    }
    let edge_ser = |e: &crate::model::Edge| EdgeSer { id1: e.id1, id2: e.id2, stroke: e.stroke.clone() };

    let mut edges: BTreeMap<NodeId, BTreeMap<NodeId, EdgeSer>> = BTreeMap::new();
    for e in graph.edges.values() {
        edges.entry(e.id1).or_default().insert(e.id2, edge_ser(e));
    }
    let doc = DocSer {
        graph: GraphSer {
            nodes: graph.nodes.values().map(|n| (n.id, NodeSer { id: n.id, p: n.p })).collect(),
            edges,
        },
        labels: labels.iter().map(rect).collect(),
        openables: graph
            .openables
            .values()
            .map(|o| OpenableSer {
                mov: MovSer::from_state(&o.state),
                openable_type: o.openable_type,
                p: o.p,
                dim: o.dim,
                angle: o.angle,
                snap: SnapSer {
                    edge: o.snap.edge.and_then(|k| graph.edges.get(&k)).map(edge_ser),
                    pos: o.snap.pos,
                    orientation: o.snap.orientation,
                },
            })
            .collect(),
        furniture: furniture
            .iter()
            .map(|f| match f {
                Furniture::Rectangle(r) => FurnitureSer::Rectangle(rect(r)),
                Furniture::Circle(c) => FurnitureSer::Circle(CircleSer {
                    mov: MovSer::from_state(&c.state),
                    name: &c.name,
                    c: c.c,
                    r: c.r,
                }),
                Furniture::Ellipse(e) => FurnitureSer::Ellipse(EllipseSer {
                    mov: MovSer::from_state(&e.state),
                    name: &e.name,
                    c: e.c,
                    r_x: e.r_x,
                    r_y: e.r_y,
                    angle: e.angle,
                }),
            })
            .collect(),
        floorplan_image: match &image.image {
            Some(data) => ImageSer::Calibrated {
                image: data.clone(),
                distance: image.distance,
                node1: NodeSer { id: image.node1.id, p: image.node1.p },
                node2: NodeSer { id: image.node2.id, p: image.node2.p },
            },
            None => ImageSer::Empty {},
        },
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

pub(crate) fn from_json_impl(s: &str) -> Result<SceneData> {
    #[derive(Deserialize, Default)]
    struct GraphDe {
        #[serde(default)]
        nodes: BTreeMap<String, NodeSer>,
        #[serde(default)]
        edges: BTreeMap<String, BTreeMap<String, EdgeSer>>,
    }
    #[derive(Deserialize)]
    struct EdgeRefDe {
        id1: NodeId,
        id2: NodeId,
    }
    #[derive(Deserialize, Default)]
    struct SnapDe {
        edge: Option<EdgeRefDe>,
        pos: Option<f64>,
        orientation: Option<u8>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct OpenableDe {
        mov: Option<MovSer>,
        #[serde(default)]
        openable_type: OpenableType,
        p: Point,
        dim: Dim,
        #[serde(default)]
        angle: f64,
        #[serde(default)]
        snap: SnapDe,
    }
    // One shape for every movable; the fields that matter depend on `mov.type`.
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ShapeDe {
        mov: MovSer,
        #[serde(default)]
        name: String,
        p: Option<Point>,
        dims: Option<Vec<Dim>>,
        c: Option<Point>,
        r: Option<f64>,
        r_x: Option<f64>,
        r_y: Option<f64>,
        #[serde(default)]
        angle: f64,
    }
    #[derive(Deserialize, Default)]
    struct ImageDe {
        image: Option<String>,
        distance: Option<f64>,
        node1: Option<NodeSer>,
        node2: Option<NodeSer>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct DocDe {
        graph: Option<GraphDe>,
        labels: Option<Vec<ShapeDe>>,
        openables: Option<Vec<OpenableDe>>,
        furniture: Option<Vec<ShapeDe>>,
        floorplan_image: Option<ImageDe>,
    }

    fn build_rectangle(s: ShapeDe) -> Result<Rectangle> {
        let p = s.p.ok_or_else(|| missing("p"))?;
        let dims = s.dims.ok_or_else(|| missing("dims"))?;
        check_point(p, "p")?;
        check_angle(s.angle, "angle")?;
        if dims.is_empty() || dims.len() > limits::MAX_DIMS_PER_RECTANGLE {
            return Err(SceneError::InvalidInput(format!(
                "rectangle needs 1..={} dims",
                limits::MAX_DIMS_PER_RECTANGLE
            )));
        }
        for d in &dims {
            check_dim(*d, "dims")?;
        }
        let kind = match s.mov.kind {
            k @ (MovableKind::Rectangle | MovableKind::L | MovableKind::U) => k,
            other => return Err(SceneError::InvalidInput(format!("{other:?} is not a rectangle"))),
        };
        let mut r = Rectangle::new(s.name, kind, p, dims[0]);
        r.dims = dims;
        r.angle = s.angle;
        s.mov.apply(&mut r.state);
        Ok(r)
    }

    fn build_furniture(s: ShapeDe) -> Result<Furniture> {
        match s.mov.kind {
            MovableKind::Circle => {
                let c = s.c.ok_or_else(|| missing("c"))?;
                let r = s.r.ok_or_else(|| missing("r"))?;
                check_point(c, "c")?;
                check_size(r, "r")?;
                let mut circle = Circle::new(s.name, c, r);
                s.mov.apply(&mut circle.state);
                Ok(Furniture::Circle(circle))
            }
            MovableKind::Ellipse => {
                let c = s.c.ok_or_else(|| missing("c"))?;
                let r_x = s.r_x.ok_or_else(|| missing("rX"))?;
                let r_y = s.r_y.ok_or_else(|| missing("rY"))?;
                check_point(c, "c")?;
                check_size(r_x, "rX")?;
                check_size(r_y, "rY")?;
                check_angle(s.angle, "angle")?;
                let mut e = Ellipse::new(s.name, c, r_x, r_y);
                e.angle = s.angle;
                s.mov.apply(&mut e.state);
                Ok(Furniture::Ellipse(e))
            }
            MovableKind::Rectangle | MovableKind::L | MovableKind::U => build_rectangle(s).map(Furniture::Rectangle),
            MovableKind::Openable => Err(SceneError::InvalidInput("openable listed as furniture".into())),
        }
    }

    let doc: DocDe = serde_json::from_str(s)?;
    let graph_de = doc.graph.unwrap_or_default();
    let labels_de = doc.labels.unwrap_or_default();
    let openables_de = doc.openables.unwrap_or_default();
    let furniture_de = doc.furniture.unwrap_or_default();

    if graph_de.nodes.len() > limits::MAX_NODES {
        return Err(SceneError::LimitExceeded { what: "nodes", limit: limits::MAX_NODES });
    }
    let edge_total: usize = graph_de.edges.values().map(|m| m.len()).sum();
    if edge_total > limits::MAX_EDGES {
        return Err(SceneError::LimitExceeded { what: "edges", limit: limits::MAX_EDGES });
    }
    if openables_de.len() > limits::MAX_OPENABLES {
        return Err(SceneError::LimitExceeded { what: "openables", limit: limits::MAX_OPENABLES });
    }
    if labels_de.len() + furniture_de.len() > limits::MAX_MOVABLES {
        return Err(SceneError::LimitExceeded { what: "movables", limit: limits::MAX_MOVABLES });
    }

    let mut graph = RoomGraph::new();
    for n in graph_de.nodes.values() {
        if n.id >= limits::MAX_NODE_ID {
            return Err(SceneError::LimitExceeded { what: "node id", limit: limits::MAX_NODE_ID as usize });
        }
        check_point(n.p, "node")?;
        graph.insert_node_with_id(n.id, n.p);
    }
    for e in graph_de.edges.values().flat_map(|m| m.values()) {
        match graph.add_edge(e.id1, e.id2) {
            Some(key) => {
                if let Some(edge) = graph.edges.get_mut(&key) {
                    edge.stroke = e.stroke.clone();
                }
            }
            None => warn!(id1 = e.id1, id2 = e.id2, "dropping edge with missing or equal endpoints"),
        }
    }

    for o in openables_de {
        check_point(o.p, "openable.p")?;
        check_dim(o.dim, "openable.dim")?;
        check_angle(o.angle, "openable.angle")?;
        let mut openable = Openable::new(o.openable_type, o.p, o.dim);
        openable.angle = o.angle;
        if let Some(mov) = o.mov {
            mov.apply(&mut openable.state);
        }
        let id = graph.add_openable(openable);
        let key = o.snap.edge.and_then(|e| EdgeKey::new(e.id1, e.id2));
        match (key, o.snap.pos) {
            (Some(key), Some(pos)) if graph.edges.contains_key(&key) && pos.is_finite() => {
                graph.attach(id, key);
                if let Some(op) = graph.openables.get_mut(&id) {
                    op.snap = OpenableSnap { edge: Some(key), pos: Some(pos), orientation: Some(o.snap.orientation.unwrap_or(0) % 2) };
                }
            }
            (Some(key), _) => warn!(id1 = key.id1, id2 = key.id2, "openable binding unresolved; loaded unbound"),
            _ => {}
        }
    }

    let labels = labels_de.into_iter().map(build_rectangle).collect::<Result<Vec<_>>>()?;
    let furniture = furniture_de.into_iter().map(build_furniture).collect::<Result<Vec<_>>>()?;

    let mut floorplan_image = FloorplanImage::default();
    if let Some(img) = doc.floorplan_image {
        if let Some(data) = img.image {
            floorplan_image.set_image(data, None)?;
            if let Some(d) = img.distance {
                floorplan_image.set_distance(d)?;
            }
            if let Some(n) = img.node1 {
                check_point(n.p, "floorplanImage.node1")?;
                floorplan_image.node1 = CornerNode::new(n.id, n.p);
            }
            if let Some(n) = img.node2 {
                check_point(n.p, "floorplanImage.node2")?;
                floorplan_image.node2 = CornerNode::new(n.id, n.p);
            }
        }
    }

    Ok(SceneData { graph, labels, furniture, floorplan_image })
}

fn missing(field: &str) -> SceneError {
    SceneError::InvalidInput(format!("missing field '{field}'"))
}

fn check_point(p: Point, what: &'static str) -> Result<()> {
    if limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y) {
        Ok(())
    } else {
        Err(SceneError::NonFinite(what))
    }
}

fn check_dim(d: Dim, what: &'static str) -> Result<()> {
    if limits::in_size_bounds(d.w) && limits::in_size_bounds(d.h) {
        Ok(())
    } else {
        Err(SceneError::NonFinite(what))
    }
}

fn check_size(v: f64, what: &'static str) -> Result<()> {
    if limits::in_size_bounds(v) {
        Ok(())
    } else {
        Err(SceneError::NonFinite(what))
    }
}

fn check_angle(v: f64, what: &'static str) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NonFinite(what))
    }
}
