use approx::assert_relative_eq;
use floorplan::model::{Dim, EdgeKey, OpenableType, Point};
use floorplan::openable::Openable;
use floorplan::projection::{Projection, View};
use floorplan::settings::Settings;
use floorplan::RoomGraph;

fn door(g: &mut RoomGraph) -> u32 {
    g.add_openable(Openable::new(OpenableType::Left, Point::new(0.0, 0.0), Dim::new(800.0, 180.0)))
}

fn door_center(g: &RoomGraph, id: u32) -> Point {
    let o = g.openable(id).unwrap();
    Point::new(o.p.x + o.dim.w / 2.0, o.p.y)
}

#[test]
fn merge_flips_binding_and_keeps_footprint() {
    let mut g = RoomGraph::new();
    let n0 = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let n1 = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let n2 = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let key = g.add_edge(n0, n1).unwrap();
    let d = door(&mut g);
    assert!(g.bind_openable(d, key, 0.3, 0));
    let before = g.openable(d).unwrap().clone();

    assert!(g.merge_nodes(n0, n2));

    assert!(g.node(n0).is_none());
    assert!(g.edge(n0, n1).is_none());
    let new_key = EdgeKey::new(n1, n2).unwrap();
    assert_eq!(g.edge(n1, n2).unwrap().snap_openables, vec![d]);
    let after = g.openable(d).unwrap();
    assert_eq!(after.snap.edge, Some(new_key));
    assert_relative_eq!(after.snap.pos.unwrap(), 0.7, epsilon = 1e-12);
    assert_eq!(after.snap.orientation, Some(1));
    assert_relative_eq!(after.p.x, before.p.x, epsilon = 1e-9);
    assert_relative_eq!(after.p.y, before.p.y, epsilon = 1e-9);
    assert_relative_eq!(after.angle.rem_euclid(360.0), before.angle.rem_euclid(360.0), epsilon = 1e-9);
}

#[test]
fn merging_onto_a_neighbor_drops_the_shared_wall() {
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(10.0, 0.0)).unwrap();
    let c = g.add_node(Point::new(0.0, 500.0)).unwrap();
    g.add_edge(a, c);
    g.add_edge(b, c);
    g.add_edge(a, b);
    assert!(g.merge_nodes(b, a));
    assert_eq!(g.edge_count(), 1);
    assert!(g.edge(a, c).is_some());
    assert!(!g.merge_nodes(a, a));
    assert!(!g.merge_nodes(b, a));
}

#[test]
fn bisect_hands_each_openable_to_its_half() {
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let key = g.add_edge(a, b).unwrap();
    let left = door(&mut g);
    let right = door(&mut g);
    g.bind_openable(left, key, 0.2, 0);
    g.bind_openable(right, key, 0.8, 0);
    let (lc, rc) = (door_center(&g, left), door_center(&g, right));

    let m = g.add_node(Point::new(500.0, 0.0)).unwrap();
    assert!(g.bisect(m, key, 0.5));

    assert!(g.edge(a, b).is_none());
    assert_eq!(g.edge(a, m).unwrap().snap_openables, vec![left]);
    assert_eq!(g.edge(b, m).unwrap().snap_openables, vec![right]);
    let l = g.openable(left).unwrap();
    assert_relative_eq!(l.snap.pos.unwrap(), 0.4, epsilon = 1e-12);
    assert_eq!(l.snap.orientation, Some(0));
    let r = g.openable(right).unwrap();
    // (b, m) runs from b back towards m
    assert_relative_eq!(r.snap.pos.unwrap(), 0.4, epsilon = 1e-12);
    assert_eq!(r.snap.orientation, Some(1));
    assert_relative_eq!(door_center(&g, left).x, lc.x, epsilon = 1e-9);
    assert_relative_eq!(door_center(&g, right).x, rc.x, epsilon = 1e-9);
}

#[test]
fn bisect_flips_first_half_when_new_corner_has_the_lowest_id() {
    let mut g = RoomGraph::new();
    let m = g.add_node(Point::new(600.0, 0.0)).unwrap();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let key = g.add_edge(a, b).unwrap();
    let d = door(&mut g);
    g.bind_openable(d, key, 0.2, 0);
    let before = g.openable(d).unwrap().clone();

    assert!(g.bisect(m, key, 0.6));

    // the first half is keyed (m, a) and runs from m back to a
    let first = EdgeKey::new(m, a).unwrap();
    assert_eq!(first.id1, m);
    assert_eq!(g.edge(m, a).unwrap().snap_openables, vec![d]);
    let o = g.openable(d).unwrap();
    assert_eq!(o.snap.edge, Some(first));
    assert_relative_eq!(o.snap.pos.unwrap(), 1.0 - 0.2 / 0.6, epsilon = 1e-12);
    assert_eq!(o.snap.orientation, Some(1));
    assert_relative_eq!(o.p.x, before.p.x, epsilon = 1e-9);
    assert_relative_eq!(o.p.y, before.p.y, epsilon = 1e-9);
    assert_relative_eq!(o.angle.rem_euclid(360.0), before.angle.rem_euclid(360.0), epsilon = 1e-9);
}

#[test]
fn merge_folds_a_wall_into_an_existing_one() {
    let mut g = RoomGraph::new();
    let to = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let other = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let from = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let kept = g.add_edge(to, other).unwrap();
    let folded = g.add_edge(other, from).unwrap();
    let resident = door(&mut g);
    let moved = door(&mut g);
    g.bind_openable(resident, kept, 0.2, 0);
    g.bind_openable(moved, folded, 0.3, 0);
    let before = g.openable(moved).unwrap().clone();

    assert!(g.merge_nodes(from, to));

    assert_eq!(g.edge_count(), 1);
    assert!(g.node(from).is_none());
    assert_eq!(g.edge(to, other).unwrap().snap_openables, vec![resident, moved]);
    let r = g.openable(resident).unwrap();
    assert_relative_eq!(r.snap.pos.unwrap(), 0.2, epsilon = 1e-12);
    assert_eq!(r.snap.orientation, Some(0));
    let o = g.openable(moved).unwrap();
    assert_eq!(o.snap.edge, Some(kept));
    assert_relative_eq!(o.snap.pos.unwrap(), 0.7, epsilon = 1e-12);
    assert_eq!(o.snap.orientation, Some(1));
    assert_relative_eq!(o.p.x, before.p.x, epsilon = 1e-9);
    assert_relative_eq!(o.p.y, before.p.y, epsilon = 1e-9);
    assert_relative_eq!(o.angle.rem_euclid(360.0), before.angle.rem_euclid(360.0), epsilon = 1e-9);
}

#[test]
fn bisect_rejects_bad_arguments() {
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let key = g.add_edge(a, b).unwrap();
    assert!(!g.bisect(a, key, 0.5));
    assert!(!g.bisect(99, key, 0.5));
    let c = g.add_node(Point::new(5.0, 5.0)).unwrap();
    assert!(!g.bisect(c, EdgeKey::new(a, c).unwrap(), 0.5));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn removing_a_corner_cascades_to_walls_and_unbinds() {
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let c = g.add_node(Point::new(1000.0, 1000.0)).unwrap();
    let ab = g.add_edge(a, b).unwrap();
    g.add_edge(b, c);
    let d = door(&mut g);
    g.bind_openable(d, ab, 0.5, 0);
    let p = g.openable(d).unwrap().p;

    assert!(g.remove_node(b));
    assert_eq!(g.edge_count(), 0);
    let o = g.openable(d).unwrap();
    assert!(!o.is_bound());
    assert_eq!(o.p, p);
    assert!(!g.remove_node(b));
    // ids are not reused
    assert_eq!(g.add_node(Point::new(1.0, 1.0)).unwrap(), 3);
}

#[test]
fn moving_a_corner_drags_bound_openables() {
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    let key = g.add_edge(a, b).unwrap();
    let d = door(&mut g);
    g.bind_openable(d, key, 0.5, 0);
    assert!(g.move_node(b, Point::new(2000.0, 0.0)));
    assert_relative_eq!(door_center(&g, d).x, 1000.0, epsilon = 1e-9);
    assert!(!g.move_node(b, Point::new(f64::NAN, 0.0)));
}

fn view_parts() -> (Projection, Settings) {
    (Projection::new(1.0), Settings::default())
}

#[test]
fn dragging_a_corner_onto_another_merges() {
    let (pr, s) = view_parts();
    let view = View::new(&pr, &s, Dim::new(5000.0, 5000.0));
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    g.add_edge(a, b);
    let e = g.add_node(Point::new(3000.0, 3000.0)).unwrap();
    let f = g.add_node(Point::new(3000.0, 4000.0)).unwrap();
    g.add_edge(e, f);

    assert!(g.handle_click(Point::new(3000.0, 3000.0), &view));
    assert!(g.handle_move(Point::new(1020.0, 30.0), &view));
    assert_eq!(g.node(e).unwrap().snap.is_merge_with(), Some(b));
    g.handle_unclick(Point::new(1020.0, 30.0), &view);

    assert!(g.node(e).is_none());
    assert!(g.edge(b, f).is_some());
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn extending_from_a_corner_draws_a_wall() {
    let (pr, s) = view_parts();
    let view = View::new(&pr, &s, Dim::new(5000.0, 5000.0));
    let mut g = RoomGraph::new();
    let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
    let b = g.add_node(Point::new(1000.0, 0.0)).unwrap();
    g.add_edge(a, b);

    // between the translate and extend radii of b
    assert!(g.handle_click(Point::new(1080.0, 0.0), &view));
    assert!(g.node(b).unwrap().extend);
    g.handle_move(Point::new(1500.0, 1700.0), &view);
    assert_eq!(g.node(b).unwrap().p, Point::new(1000.0, 0.0));
    g.handle_unclick(Point::new(1500.0, 1700.0), &view);

    assert_eq!(g.node_count(), 3);
    let new_id = g.next_node_id() - 1;
    assert_eq!(g.node(new_id).unwrap().p, Point::new(1500.0, 1700.0));
    assert!(g.edge(b, new_id).is_some());
    assert!(!g.node(b).unwrap().extend);
}
