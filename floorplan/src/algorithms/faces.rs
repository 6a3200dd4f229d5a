use std::collections::{BTreeMap, HashMap};

use crate::{model::NodeId, RoomGraph};

/// Face tracing over the angle-sorted rotation system.
///
/// Half-edges are enumerated in wall order, `(id1, id2)` then `(id2, id1)`.
/// Arriving at `v` from `u`, the walk leaves along the neighbor that precedes
/// `u` in `v`'s counter-clockwise order (wrapping to the last one). Every
/// half-edge is used exactly once.
pub fn trace_faces(g: &RoomGraph) -> Vec<Vec<NodeId>> {
    let mut half: Vec<(NodeId, NodeId)> = Vec::new();
    let mut adj: BTreeMap<NodeId, Vec<(NodeId, f64)>> = BTreeMap::new();
    for key in g.edges.keys() {
        let (Some(a), Some(b)) = (g.nodes.get(&key.id1), g.nodes.get(&key.id2)) else {
            continue;
        };
        half.push((key.id1, key.id2));
        half.push((key.id2, key.id1));
        adj.entry(key.id1).or_default().push((key.id2, (b.p.y - a.p.y).atan2(b.p.x - a.p.x)));
        adj.entry(key.id2).or_default().push((key.id1, (a.p.y - b.p.y).atan2(a.p.x - b.p.x)));
    }

    // (at, came_from) -> next
    let mut next: HashMap<(NodeId, NodeId), NodeId> = HashMap::new();
    for (v, lst) in &mut adj {
        lst.sort_by(|a, b| a.1.total_cmp(&b.1));
        let Some(&(last, _)) = lst.last() else {
            continue;
        };
        next.insert((*v, lst[0].0), last);
        for w in lst.windows(2) {
            next.insert((*v, w[1].0), w[0].0);
        }
    }

    let index: HashMap<(NodeId, NodeId), usize> = half.iter().enumerate().map(|(i, he)| (*he, i)).collect();
    let mut used = vec![false; half.len()];
    let mut faces = Vec::new();
    for i_start in 0..half.len() {
        if used[i_start] {
            continue;
        }
        let (start, first) = half[i_start];
        let mut face = vec![start];
        let (mut cur, mut nxt) = (start, first);
        while let Some(&i_he) = index.get(&(cur, nxt)) {
            if used[i_he] {
                break;
            }
            used[i_he] = true;
            face.push(nxt);
            let Some(&after) = next.get(&(nxt, cur)) else {
                break;
            };
            cur = nxt;
            nxt = after;
        }
        faces.push(face);
    }
    faces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn every_half_edge_walked_once() {
        let mut g = RoomGraph::new();
        let pts = [(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0), (0.0, 1000.0), (2000.0, 500.0)];
        let ids: Vec<NodeId> = pts.iter().map(|&(x, y)| g.add_node(Point::new(x, y)).unwrap()).collect();
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (1, 4), (2, 4)] {
            g.add_edge(ids[a], ids[b]);
        }
        let faces = trace_faces(&g);
        let walked: usize = faces.iter().map(|f| f.len() - 1).sum();
        assert_eq!(walked, 2 * g.edge_count());
        for f in &faces {
            assert_eq!(f.first(), f.last());
        }
        // two rooms and the outer face
        assert_eq!(faces.len(), 3);
    }

    #[test]
    fn dangling_wall_is_a_flat_walk() {
        let mut g = RoomGraph::new();
        let a = g.add_node(Point::new(0.0, 0.0)).unwrap();
        let b = g.add_node(Point::new(10.0, 0.0)).unwrap();
        g.add_edge(a, b);
        assert_eq!(trace_faces(&g), vec![vec![a, b, a]]);
    }
}
