use floorplan::model::{Dim, EdgeKey, FurnitureType, MovableKind, OpenableType, Point};
use floorplan::movable::Movable;
use floorplan::projection::Projection;
use floorplan::settings::Settings;
use floorplan::Scene;
use serde_json::json;

fn furnished_scene() -> Scene {
    let mut s = Scene::new(Settings::default(), Dim::new(1200.0, 800.0));
    s.projection = Projection::new(1.0);
    let g = &mut s.graph;
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(4000.0, 0.0)).unwrap();
    let c = g.add_node(Point::new(4000.0, 3000.0)).unwrap();
    let d = g.add_node(Point::new(0.0, 3000.0)).unwrap();
    let ab = g.add_edge(a, b).unwrap();
    g.add_edge(b, c);
    g.add_edge(c, d);
    g.add_edge(d, a);

    s.settings.openable_type = OpenableType::Double;
    let door = s.add_openable(1200.0).unwrap();
    assert!(s.graph.bind_openable(door, ab, 0.25, 1));
    s.add_openable(900.0).unwrap();

    s.add_label("Living room", 480.0, 120.0).unwrap();
    s.add_rectangle("Bed", 1400.0, 2000.0).unwrap();
    s.add_circle_or_ellipse("Table", 900.0, 900.0).unwrap();
    s.add_circle_or_ellipse("Rug", 1600.0, 1000.0).unwrap();
    s.add_l_shape("Couch", [Dim::new(2000.0, 900.0), Dim::new(900.0, 1600.0)]).unwrap();
    s.settings.furniture_type = FurnitureType::U;
    s.add_furniture("Kitchen", &[Dim::new(600.0, 2400.0), Dim::new(1800.0, 600.0), Dim::new(600.0, 2400.0)]).unwrap();
    s.furniture[0].set_angle(90.0);

    s.floorplan_image.set_image("data:image/png;base64,iVBORw0KGgo=".into(), None).unwrap();
    s.floorplan_image.set_distance(2500.0).unwrap();
    s.floorplan_image.node2.p = Point::new(800.0, -20.0);
    s
}

#[test]
fn save_load_save_is_byte_identical() {
    let s = furnished_scene();
    let first = s.to_json_string();
    let mut loaded = Scene::default();
    loaded.load_json(&first).unwrap();
    assert_eq!(loaded.to_json_string(), first);
    assert!(!loaded.is_dirty());

    assert_eq!(loaded.graph.node_count(), 4);
    assert_eq!(loaded.graph.edge_count(), 4);
    assert_eq!(loaded.labels.len(), 1);
    let kinds: Vec<MovableKind> = loaded.furniture.iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![MovableKind::Rectangle, MovableKind::Circle, MovableKind::Ellipse, MovableKind::L, MovableKind::U]
    );
    assert_eq!(loaded.furniture[0].angle(), 90.0);
}

#[test]
fn bindings_survive_a_round_trip() {
    let s = furnished_scene();
    let mut loaded = Scene::default();
    loaded.load_json(&s.to_json_string()).unwrap();
    let (id, door) = loaded.graph.openables().next().unwrap();
    assert_eq!(door.openable_type, OpenableType::Double);
    assert_eq!(door.snap.edge, EdgeKey::new(0, 1));
    assert_eq!(door.snap.pos, Some(0.25));
    assert_eq!(door.snap.orientation, Some(1));
    assert_eq!(loaded.graph.edge(0, 1).unwrap().snap_openables, vec![id]);
    let (_, window) = loaded.graph.openables().nth(1).unwrap();
    assert!(!window.is_bound());
    // new ids continue after the loaded ones
    assert_eq!(loaded.graph.add_node(Point::new(1.0, 1.0)).unwrap(), 4);
}

#[test]
fn malformed_input_leaves_scene_unchanged() {
    let mut s = furnished_scene();
    let before = s.to_json_string();
    let bad = [
        "{ not json",
        r#"{"graph": {"nodes": {"0": {"id": 0, "p": {"x": "a", "y": 0}}}}}"#,
        r#"{"furniture": [{"mov": {"type": "Circle"}, "name": "x", "c": {"x": 0, "y": 0}}]}"#,
        r#"{"labels": [{"mov": {"type": "Ellipse"}, "c": {"x": 0, "y": 0}, "rX": 1, "rY": 2}]}"#,
    ];
    for doc in bad {
        assert!(s.load_json(doc).is_err(), "accepted {doc}");
        assert_eq!(s.to_json_string(), before);
    }
}

#[test]
fn unresolved_wall_loads_unbound() {
    let doc = json!({
        "graph": {
            "nodes": {"0": {"id": 0, "p": {"x": 0.0, "y": 0.0}}, "1": {"id": 1, "p": {"x": 1000.0, "y": 0.0}}},
            "edges": {"0": {"1": {"id1": 0, "id2": 1}, "7": {"id1": 0, "id2": 7}}}
        },
        "openables": [{
            "mov": {"type": "Openable"},
            "openableType": "Right",
            "p": {"x": 100.0, "y": 50.0},
            "dim": {"w": 800.0, "h": 180.0},
            "angle": 0.0,
            "snap": {"edge": {"id1": 3, "id2": 4}, "pos": 0.5, "orientation": 0}
        }]
    });
    let mut s = Scene::default();
    s.load_json(&doc.to_string()).unwrap();
    // edge to the missing node 7 is dropped
    assert_eq!(s.graph.edge_count(), 1);
    let (_, o) = s.graph.openables().next().unwrap();
    assert!(!o.is_bound());
    assert_eq!(o.p, Point::new(100.0, 50.0));
    assert!(s.graph.edge(0, 1).unwrap().snap_openables.is_empty());
}

#[test]
fn empty_document_clears_the_scene() {
    let mut s = furnished_scene();
    s.load_json("{}").unwrap();
    assert_eq!(s.graph.node_count(), 0);
    assert_eq!(s.graph.openable_count(), 0);
    assert!(s.furniture.is_empty() && s.labels.is_empty());
    assert!(s.floorplan_image.image.is_none());
}

#[test]
fn edits_after_load_mark_the_scene_dirty() {
    let mut s = Scene::default();
    s.load_json(&furnished_scene().to_json_string()).unwrap();
    assert!(!s.is_dirty());
    s.furniture[1].translate_by(Point::new(10.0, 0.0));
    assert!(s.is_dirty());
}
