use floorplan::geometry::tolerance::EPS_FACE_AREA;
use floorplan::model::{Dim, EdgeKey, NodeId, OpenableId, OpenableType, Point};
use floorplan::openable::Openable;
use floorplan::RoomGraph;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddNode { x: i16, y: i16 },
    MoveNode { idx: u16, dx: i8, dy: i8 },
    RemoveNode { idx: u16 },
    AddEdge { a: u16, b: u16 },
    RemoveEdge { idx: u16 },
    Merge { a: u16, b: u16 },
    Bisect { idx: u16, node: u16, pos: u8 },
    AddOpenable { edge: u16, pos: u8, flip: bool },
    RemoveOpenable { idx: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddNode { x, y }),
        (any::<u16>(), any::<i8>(), any::<i8>()).prop_map(|(idx, dx, dy)| Op::MoveNode { idx, dx, dy }),
        any::<u16>().prop_map(|idx| Op::RemoveNode { idx }),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::AddEdge { a, b }),
        any::<u16>().prop_map(|idx| Op::RemoveEdge { idx }),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::Merge { a, b }),
        (any::<u16>(), any::<u16>(), any::<u8>()).prop_map(|(idx, node, pos)| Op::Bisect { idx, node, pos }),
        (any::<u16>(), any::<u8>(), any::<bool>()).prop_map(|(edge, pos, flip)| Op::AddOpenable { edge, pos, flip }),
        any::<u16>().prop_map(|idx| Op::RemoveOpenable { idx }),
    ]
}

#[derive(Default)]
struct ModelState {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeKey>,
    openables: Vec<OpenableId>,
}

fn sync_state(g: &RoomGraph, state: &mut ModelState) {
    state.nodes = g.nodes().map(|n| n.id).collect();
    state.edges = g.edges().map(|e| e.key()).collect();
    state.openables = g.openables().map(|(id, _)| id).collect();
}

fn pick<T: Copy>(v: &[T], idx: u16) -> Option<T> {
    if v.is_empty() {
        None
    } else {
        Some(v[idx as usize % v.len()])
    }
}

fn apply_op(g: &mut RoomGraph, state: &ModelState, op: Op) {
    match op {
        Op::AddNode { x, y } => {
            g.add_node(Point::new(f64::from(x) * 10.0, f64::from(y) * 10.0)).unwrap();
        }
        Op::MoveNode { idx, dx, dy } => {
            if let Some(id) = pick(&state.nodes, idx) {
                let p = g.node(id).map(|n| n.p).unwrap_or_default();
                g.move_node(id, Point::new(p.x + f64::from(dx) * 5.0, p.y + f64::from(dy) * 5.0));
            }
        }
        Op::RemoveNode { idx } => {
            if let Some(id) = pick(&state.nodes, idx) {
                g.remove_node(id);
            }
        }
        Op::AddEdge { a, b } => {
            if let (Some(a), Some(b)) = (pick(&state.nodes, a), pick(&state.nodes, b)) {
                let _ = g.add_edge(a, b);
            }
        }
        Op::RemoveEdge { idx } => {
            if let Some(key) = pick(&state.edges, idx) {
                g.remove_edge(key.id1, key.id2);
            }
        }
        Op::Merge { a, b } => {
            if let (Some(a), Some(b)) = (pick(&state.nodes, a), pick(&state.nodes, b)) {
                g.merge_nodes(a, b);
            }
        }
        Op::Bisect { idx, node, pos } => {
            if let (Some(key), Some(n)) = (pick(&state.edges, idx), pick(&state.nodes, node)) {
                g.bisect(n, key, f64::from(pos) / 255.0);
            }
        }
        Op::AddOpenable { edge, pos, flip } => {
            let id = g.add_openable(Openable::new(OpenableType::Left, Point::default(), Dim::new(900.0, 180.0)));
            if let Some(key) = pick(&state.edges, edge) {
                g.bind_openable(id, key, f64::from(pos) / 255.0, u8::from(flip));
            }
        }
        Op::RemoveOpenable { idx } => {
            if let Some(id) = pick(&state.openables, idx) {
                g.remove_openable(id);
            }
        }
    }
}

fn assert_invariants(g: &RoomGraph) {
    // No dangling references
    for e in g.edges() {
        assert!(g.node(e.id1).is_some(), "edge {:?} missing node {}", e.key(), e.id1);
        assert!(g.node(e.id2).is_some(), "edge {:?} missing node {}", e.key(), e.id2);
        assert!(e.id1 < e.id2, "edge {:?} not canonical", e.key());
        for id in &e.snap_openables {
            let o = g.openable(*id).expect("wall lists a missing openable");
            assert_eq!(o.snap.edge, Some(e.key()), "openable {} listed by the wrong wall", id);
        }
    }

    // Bound openables are listed by their wall exactly once
    for (id, o) in g.openables() {
        if let Some(key) = o.snap.edge {
            let edge = g.edge(key.id1, key.id2).expect("openable bound to a missing wall");
            assert_eq!(edge.snap_openables.iter().filter(|x| **x == id).count(), 1);
            let pos = o.snap.pos.expect("bound openable without pos");
            assert!((0.0..=1.0).contains(&pos), "pos {} outside the wall", pos);
            assert!(o.p.is_finite());
        }
    }

    // Every half-edge belongs to exactly one face
    let faces = g.get_faces();
    let walked: usize = faces.iter().map(|f| f.len().saturating_sub(1)).sum();
    assert_eq!(walked, 2 * g.edge_count());
    for room in g.rooms() {
        assert!(room.area_mm2 > EPS_FACE_AREA);
    }

    assert!(g.nodes().all(|n| n.id < g.next_node_id()));
}

fn sequence_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 5..40)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 2_000, .. ProptestConfig::default() })]
    #[test]
    fn graph_edit_invariants(seq in sequence_strategy()) {
        let mut graph = RoomGraph::new();
        let mut state = ModelState::default();
        for op in seq {
            sync_state(&graph, &mut state);
            apply_op(&mut graph, &state, op);
        }
        assert_invariants(&graph);
    }
}
