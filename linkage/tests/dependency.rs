use linkage::{ConnectError, Connector, Drawing, EdgeRole, Rect, Shape, Task};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn tasks(d: &mut Drawing, n: usize) -> Vec<u32> {
    (0..n)
        .map(|i| {
            d.add_shape(Shape::task(
                Rect::new(i as f32 * 60.0, 0.0, 40.0, 20.0),
                Task::new(format!("t{}", i), 1.0),
            ))
        })
        .collect()
}

fn depend(d: &mut Drawing, from: u32, to: u32) -> (u32, Result<(), ConnectError>) {
    let e = d.add_edge(EdgeRole::Dependency);
    let r = d.connect(e, Connector::chop_center(from), Connector::chop_center(to));
    (e, r)
}

#[test]
fn three_task_scenario() {
    let mut d = Drawing::new();
    let ids = tasks(&mut d, 3);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    let (ab, r) = depend(&mut d, a, b);
    assert_eq!(r, Ok(()));
    let (_, r) = depend(&mut d, b, c);
    assert_eq!(r, Ok(()));
    let (ca, r) = depend(&mut d, c, a);
    assert_eq!(r, Err(ConnectError::Cycle { from: c, to: a }));
    assert!(!d.edge(ca).unwrap().is_connected());
    let (_, r) = depend(&mut d, a, c);
    assert_eq!(r, Ok(()), "a direct shortcut is neither a duplicate nor a cycle");

    assert!(d.disconnect(ab));
    assert!(!d.tracker().predecessors(b).contains(&a));
    assert!(!d.tracker().successors(a).contains(&b));
    assert_eq!(d.tracker().successors(a), vec![c]);
    assert_eq!(d.tracker().predecessors(c), vec![b, a]);
}

#[test]
fn duplicate_edge_is_rejected() {
    let mut d = Drawing::new();
    let ids = tasks(&mut d, 2);
    assert_eq!(depend(&mut d, ids[0], ids[1]).1, Ok(()));
    let (dup, r) = depend(&mut d, ids[0], ids[1]);
    assert_eq!(r, Err(ConnectError::Duplicate { from: ids[0], to: ids[1] }));
    assert_eq!(r.unwrap_err().code(), "duplicate");
    assert!(!d.edge(dup).unwrap().is_connected());
    assert_eq!(d.tracker().len(), 1);
}

#[test]
fn reverse_of_existing_edge_is_a_cycle() {
    let mut d = Drawing::new();
    let ids = tasks(&mut d, 2);
    assert!(depend(&mut d, ids[0], ids[1]).1.is_ok());
    assert!(!d.can_add_dependency(ids[1], ids[0]));
    assert!(matches!(depend(&mut d, ids[1], ids[0]).1, Err(ConnectError::Cycle { .. })));
}

#[test]
fn disconnect_touches_only_its_endpoints() {
    let mut d = Drawing::new();
    let ids = tasks(&mut d, 4);
    let (e01, _) = depend(&mut d, ids[0], ids[1]);
    let (e12, _) = depend(&mut d, ids[1], ids[2]);
    let (e23, _) = depend(&mut d, ids[2], ids[3]);
    let before: Vec<_> = ids.iter().map(|n| d.tracker().sets(*n).cloned()).collect();
    assert!(d.disconnect(e12));
    for (i, n) in ids.iter().enumerate() {
        let after = d.tracker().sets(*n).cloned();
        match i {
            1 => {
                let s = after.unwrap();
                assert!(!s.successors.contains(&e12));
                assert!(s.predecessors.contains(&e01));
            }
            2 => {
                let s = after.unwrap();
                assert!(!s.predecessors.contains(&e12));
                assert!(s.successors.contains(&e23));
            }
            _ => assert_eq!(after, before[i]),
        }
    }
}

#[derive(Clone, Debug)]
enum Op {
    Connect { a: u8, b: u8 },
    Disconnect { idx: u8 },
    Remove { idx: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::Connect { a, b }),
        1 => any::<u8>().prop_map(|idx| Op::Disconnect { idx }),
        1 => any::<u8>().prop_map(|idx| Op::Remove { idx }),
    ]
}

// Reference reachability over the edges the drawing reports as connected.
fn reachable(adj: &HashMap<u32, Vec<u32>>, from: u32, to: u32) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(n) = stack.pop() {
        if n == to {
            return true;
        }
        if seen.insert(n) {
            stack.extend(adj.get(&n).into_iter().flatten().copied());
        }
    }
    false
}

fn connected_pairs(d: &Drawing) -> Vec<(u32, u32, u32)> {
    d.edge_ids()
        .into_iter()
        .filter_map(|id| {
            let e = d.edge(id)?;
            if !e.is_connected() {
                return None;
            }
            Some((id, e.start()?.owner, e.end()?.owner))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn random_edits_keep_a_simple_dag(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        const N: usize = 7;
        let mut d = Drawing::new();
        let ids = tasks(&mut d, N);
        for op in ops {
            match op {
                Op::Connect { a, b } => {
                    let (s, t) = (ids[a as usize % N], ids[b as usize % N]);
                    let pairs = connected_pairs(&d);
                    let mut adj: HashMap<u32, Vec<u32>> = HashMap::new();
                    for (_, x, y) in &pairs { adj.entry(*x).or_default().push(*y); }
                    let dup = pairs.iter().any(|(_, x, y)| *x == s && *y == t);
                    let expect_ok = s != t && !dup && !reachable(&adj, t, s);
                    prop_assert_eq!(d.can_add_dependency(s, t), expect_ok);
                    let (_, r) = depend(&mut d, s, t);
                    prop_assert_eq!(r.is_ok(), expect_ok);
                }
                Op::Disconnect { idx } => {
                    let live = d.edge_ids();
                    if !live.is_empty() {
                        d.disconnect(live[idx as usize % live.len()]);
                    }
                }
                Op::Remove { idx } => {
                    let live = d.edge_ids();
                    if !live.is_empty() {
                        d.remove_edge(live[idx as usize % live.len()]);
                    }
                }
            }

            // The tracker mirrors exactly the connected dependency edges.
            let pairs = connected_pairs(&d);
            prop_assert_eq!(d.tracker().len(), pairs.len());
            for (id, s, t) in &pairs {
                let link = d.tracker().link(*id).unwrap();
                prop_assert_eq!((link.source, link.target), (*s, *t));
                prop_assert!(d.tracker().successor_edges(*s).contains(id));
                prop_assert!(d.tracker().predecessor_edges(*t).contains(id));
            }
            // Simple: no repeated ordered pair.
            let distinct: HashSet<(u32, u32)> = pairs.iter().map(|(_, s, t)| (*s, *t)).collect();
            prop_assert_eq!(distinct.len(), pairs.len());
            // Acyclic: a topological order covers every linked node.
            let order = d.tracker().topological_order();
            let pos: HashMap<u32, usize> = order.iter().enumerate().map(|(i, n)| (*n, i)).collect();
            for (_, s, t) in &pairs {
                prop_assert!(pos[s] < pos[t]);
            }
        }
    }
}
