use floorplan::model::{Dim, EdgeKey, NodeId, OpenableType, Point};
use floorplan::openable::Openable;
use floorplan::projection::{Projection, View};
use floorplan::settings::Settings;
use floorplan::RoomGraph;

#[test]
fn zero_length_wall_is_never_snapped() {
    let pr = Projection::new(1.0);
    let s = Settings::default();
    let view = View::new(&pr, &s, Dim::new(5000.0, 5000.0));
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(10.0, 10.0)).unwrap();
    let b = g.add_node(Point::new(10.0, 10.0)).unwrap();
    g.add_edge(a, b).expect("edge");
    let id = g.add_openable(Openable::new(OpenableType::Left, Point::new(0.0, 100.0), Dim::new(80.0, 18.0)));
    assert!(g.openable_edge_snap(id, Point::new(10.0, 12.0), &view));
    assert!(!g.openable(id).unwrap().is_bound());
    assert!(g.rooms().is_empty());
}

#[test]
fn bisect_at_the_wall_ends_keeps_positions_finite() {
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let key = g.add_edge(a, b).unwrap();
    let id = g.add_openable(Openable::new(OpenableType::Left, Point::default(), Dim::new(80.0, 18.0)));
    g.bind_openable(id, key, 0.0, 0);
    let m = g.add_node(Point::new(0.0, 0.0)).unwrap();
    assert!(g.bisect(m, key, 0.0));
    let o = g.openable(id).unwrap();
    assert!(o.snap.pos.unwrap().is_finite());
    assert!(o.p.is_finite());
}

#[test]
fn tiny_triangle_is_not_a_room() {
    let mut g = RoomGraph::new();
    let n1 = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let n2 = g.add_node(Point::new(0.1, 0.0)).unwrap();
    let n3 = g.add_node(Point::new(0.05, 0.0866)).unwrap();
    g.add_edge(n1, n2);
    g.add_edge(n2, n3);
    g.add_edge(n3, n1);
    assert!(g.rooms().is_empty());
}

#[test]
fn fuzz_10k_random_edits_no_panic() {
    let mut g = RoomGraph::new();
    // Simple LCG to avoid external deps
    let mut seed: u64 = 0xDEADBEEFCAFEBABE;
    let mut rnd = || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        (seed >> 16) as u32
    };

    let mut nodes: Vec<NodeId> = Vec::new();
    for _ in 0..10 {
        nodes.push(g.add_node(Point::new(f64::from(rnd() % 200) * 10.0, f64::from(rnd() % 200) * 10.0)).unwrap());
    }

    for step in 0..10_000u32 {
        if step % 750 == 0 && step != 0 {
            g.clear();
            nodes.clear();
        }
        let pick = |r: u32, v: &[NodeId]| if v.is_empty() { None } else { Some(v[r as usize % v.len()]) };
        match rnd() % 9 {
            0 | 1 => nodes.push(g.add_node(Point::new(f64::from(rnd() % 400) * 5.0, f64::from(rnd() % 400) * 5.0)).unwrap()),
            2 => {
                if let (Some(a), Some(b)) = (pick(rnd(), &nodes), pick(rnd(), &nodes)) {
                    let _ = g.add_edge(a, b);
                }
            }
            3 => {
                if let Some(a) = pick(rnd(), &nodes) {
                    g.remove_node(a);
                    nodes.retain(|n| *n != a);
                }
            }
            4 => {
                if let Some(a) = pick(rnd(), &nodes) {
                    let _ = g.move_node(a, Point::new(f64::from(rnd() % 400) * 5.0, 0.0));
                }
            }
            5 => {
                if let (Some(a), Some(b)) = (pick(rnd(), &nodes), pick(rnd(), &nodes)) {
                    if g.merge_nodes(a, b) {
                        nodes.retain(|n| *n != a);
                    }
                }
            }
            6 => {
                let keys: Vec<EdgeKey> = g.edges().map(|e| e.key()).collect();
                if let (Some(&key), Some(m)) = (keys.get(rnd() as usize % keys.len().max(1)), pick(rnd(), &nodes)) {
                    let _ = g.bisect(m, key, f64::from(rnd() % 101) / 100.0);
                }
            }
            7 => {
                let id = g.add_openable(Openable::new(OpenableType::Double, Point::default(), Dim::new(90.0, 18.0)));
                let keys: Vec<EdgeKey> = g.edges().map(|e| e.key()).collect();
                if let Some(&key) = keys.get(rnd() as usize % keys.len().max(1)) {
                    let _ = g.bind_openable(id, key, f64::from(rnd() % 101) / 100.0, (rnd() % 2) as u8);
                }
            }
            _ => {
                let ids: Vec<u32> = g.openables().map(|(id, _)| id).collect();
                if let Some(&id) = ids.get(rnd() as usize % ids.len().max(1)) {
                    g.remove_openable(id);
                }
            }
        }
        if step % 97 == 0 {
            let _ = g.rooms();
        }
    }
}
