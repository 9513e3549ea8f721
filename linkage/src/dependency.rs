use crate::model::{EdgeId, ShapeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Endpoints of a registered dependency edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: ShapeId,
    pub target: ShapeId,
}

/// Per-node index of incoming and outgoing dependency edges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySets {
    pub predecessors: BTreeSet<EdgeId>,
    pub successors: BTreeSet<EdgeId>,
}

impl DependencySets {
    fn is_empty(&self) -> bool {
        self.predecessors.is_empty() && self.successors.is_empty()
    }
}

/// Keeps the dependency edges of a drawing a simple directed acyclic graph.
///
/// Edges are owned by the drawing; the tracker only indexes them by id. Both
/// endpoints are updated in the same call so no edge is ever recorded on one
/// side only.
#[derive(Clone, Debug, Default)]
pub struct DependencyTracker {
    links: BTreeMap<EdgeId, Link>,
    nodes: BTreeMap<ShapeId, DependencySets>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn link(&self, edge: EdgeId) -> Option<Link> {
        self.links.get(&edge).copied()
    }

    pub fn sets(&self, node: ShapeId) -> Option<&DependencySets> {
        self.nodes.get(&node)
    }

    pub fn predecessor_edges(&self, node: ShapeId) -> Vec<EdgeId> {
        self.nodes
            .get(&node)
            .map(|s| s.predecessors.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn successor_edges(&self, node: ShapeId) -> Vec<EdgeId> {
        self.nodes
            .get(&node)
            .map(|s| s.successors.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Source nodes of the edges entering `node`.
    pub fn predecessors(&self, node: ShapeId) -> Vec<ShapeId> {
        self.predecessor_edges(node)
            .into_iter()
            .filter_map(|e| self.links.get(&e).map(|l| l.source))
            .collect()
    }

    /// Target nodes of the edges leaving `node`.
    pub fn successors(&self, node: ShapeId) -> Vec<ShapeId> {
        self.successor_edges(node)
            .into_iter()
            .filter_map(|e| self.links.get(&e).map(|l| l.target))
            .collect()
    }

    /// Whether `target` already has a direct edge from `source`.
    pub fn has_direct_edge(&self, source: ShapeId, target: ShapeId) -> bool {
        self.nodes.get(&target).map_or(false, |s| {
            s.predecessors
                .iter()
                .any(|e| self.links.get(e).map_or(false, |l| l.source == source))
        })
    }

    /// Breadth-first search over successor edges. A node reaches itself.
    pub fn is_reachable(&self, from: ShapeId, to: ShapeId) -> bool {
        if from == to {
            return true;
        }
        let mut seen: HashSet<ShapeId> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(from);
        queue.push_back(from);
        while let Some(n) = queue.pop_front() {
            for next in self.successors(n) {
                if next == to {
                    return true;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// False when `source -> target` would duplicate a direct edge or close a
    /// cycle (including a self loop).
    pub fn can_add_edge(&self, source: ShapeId, target: ShapeId) -> bool {
        !self.has_direct_edge(source, target) && !self.is_reachable(target, source)
    }

    /// Record `edge` as `source -> target` on both endpoints. Refuses an id
    /// that is already registered.
    pub fn register_edge(&mut self, edge: EdgeId, source: ShapeId, target: ShapeId) -> bool {
        if self.links.contains_key(&edge) {
            return false;
        }
        self.links.insert(edge, Link { source, target });
        self.nodes.entry(source).or_default().successors.insert(edge);
        self.nodes.entry(target).or_default().predecessors.insert(edge);
        true
    }

    /// Drop `edge` from its source's successors and its target's predecessors.
    pub fn unregister_edge(&mut self, edge: EdgeId) -> Option<Link> {
        let link = self.links.remove(&edge)?;
        if let Some(s) = self.nodes.get_mut(&link.source) {
            s.successors.remove(&edge);
        }
        if let Some(s) = self.nodes.get_mut(&link.target) {
            s.predecessors.remove(&edge);
        }
        for n in [link.source, link.target] {
            if self.nodes.get(&n).map_or(false, DependencySets::is_empty) {
                self.nodes.remove(&n);
            }
        }
        Some(link)
    }

    /// Every edge touching `node`, incoming and outgoing, ascending.
    pub fn incident_edges(&self, node: ShapeId) -> Vec<EdgeId> {
        let mut out: BTreeSet<EdgeId> = BTreeSet::new();
        if let Some(s) = self.nodes.get(&node) {
            out.extend(s.predecessors.iter().copied());
            out.extend(s.successors.iter().copied());
        }
        out.into_iter().collect()
    }

    /// Nodes that take part in at least one edge, in dependency order. Ties
    /// go to the lower id so the order is stable.
    pub fn topological_order(&self) -> Vec<ShapeId> {
        let mut indegree: BTreeMap<ShapeId, usize> = self
            .nodes
            .iter()
            .map(|(id, s)| (*id, s.predecessors.len()))
            .collect();
        let mut ready: BTreeSet<ShapeId> = indegree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(indegree.len());
        while let Some(n) = ready.pop_first() {
            order.push(n);
            for next in self.successors(n) {
                if let Some(d) = indegree.get_mut(&next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(next);
                    }
                }
            }
        }
        order
    }

    /// Unregister every edge touching `node`. Returns the dropped edge ids.
    pub fn forget_node(&mut self, node: ShapeId) -> Vec<EdgeId> {
        let edges = self.incident_edges(node);
        for &e in &edges {
            self.unregister_edge(e);
        }
        edges
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_updates_both_sides() {
        let mut t = DependencyTracker::new();
        assert!(t.register_edge(7, 1, 2));
        assert_eq!(t.successor_edges(1), vec![7]);
        assert_eq!(t.predecessor_edges(2), vec![7]);
        assert!(t.predecessor_edges(1).is_empty());
        assert!(!t.register_edge(7, 2, 3));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn unregister_is_symmetric() {
        let mut t = DependencyTracker::new();
        t.register_edge(0, 1, 2);
        t.register_edge(1, 2, 3);
        assert_eq!(t.unregister_edge(0), Some(Link { source: 1, target: 2 }));
        assert!(t.sets(1).is_none());
        assert!(t.predecessor_edges(2).is_empty());
        assert_eq!(t.successor_edges(2), vec![1]);
        assert_eq!(t.unregister_edge(0), None);
    }

    #[test]
    fn reachability_and_self() {
        let mut t = DependencyTracker::new();
        t.register_edge(0, 1, 2);
        t.register_edge(1, 2, 3);
        assert!(t.is_reachable(1, 3));
        assert!(!t.is_reachable(3, 1));
        assert!(t.is_reachable(4, 4));
        assert!(!t.can_add_edge(4, 4));
    }

    #[test]
    fn duplicate_and_cycle_rules() {
        let mut t = DependencyTracker::new();
        t.register_edge(0, 1, 2);
        t.register_edge(1, 2, 3);
        assert!(!t.can_add_edge(1, 2), "duplicate");
        assert!(!t.can_add_edge(3, 1), "cycle");
        assert!(!t.can_add_edge(2, 1), "two-cycle");
        assert!(t.can_add_edge(1, 3), "shortcut is fine");
    }

    #[test]
    fn forget_node_drops_both_directions() {
        let mut t = DependencyTracker::new();
        t.register_edge(0, 1, 2);
        t.register_edge(1, 2, 3);
        t.register_edge(2, 1, 3);
        assert_eq!(t.forget_node(2), vec![0, 1]);
        assert!(t.sets(2).is_none());
        assert_eq!(t.successors(1), vec![3]);
        assert_eq!(t.predecessor_edges(3), vec![2]);
        assert!(t.forget_node(2).is_empty());
    }

    #[test]
    fn topological_order_is_stable() {
        let mut t = DependencyTracker::new();
        t.register_edge(0, 5, 1);
        t.register_edge(1, 3, 1);
        t.register_edge(2, 1, 9);
        assert_eq!(t.topological_order(), vec![3, 5, 1, 9]);
    }
}
