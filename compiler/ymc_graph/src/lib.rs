//! The import dependency graph (C5, `SPEC_FULL.md` §4.5.2): one node per
//! canonical module path, edges for "imports from", and the entry-point
//! set used by [`DependencyGraph::purge`] to release subgraphs no module
//! reaches any more.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

#[derive(Default)]
struct Node {
    deps: IndexSet<PathBuf>,
}

/// A directed graph of module imports, keyed by canonical path.
///
/// Insertion order is preserved (via [`IndexMap`]/[`IndexSet`]) purely so
/// that cycle and purge reports list paths in the order they were first
/// seen, which is what a reader expects from a diagnostic.
#[derive(Default)]
pub struct DependencyGraph {
    nodes: IndexMap<PathBuf, Node>,
    entry_points: IndexSet<PathBuf>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `path` is present, marking it an entry point if `is_entry`.
    pub fn add_dep(&mut self, path: PathBuf, is_entry: bool) {
        self.nodes.entry(path.clone()).or_default();
        if is_entry {
            self.entry_points.insert(path);
        }
    }

    /// Adds the edge `from -> to`. If `to` can already reach `from` (or
    /// `from == to`), the edge would close a cycle: it is **not** added,
    /// and the full cycle path (`from`, then the path from `to` back to
    /// `from`) is returned for reporting.
    pub fn bind_paths(&mut self, from: &Path, to: &Path) -> Option<Vec<PathBuf>> {
        self.add_dep(from.to_path_buf(), false);
        self.add_dep(to.to_path_buf(), false);

        if from == to {
            return Some(vec![from.to_path_buf(), to.to_path_buf()]);
        }
        if let Some(back) = self.find_path(to, from) {
            let mut cycle = vec![from.to_path_buf()];
            cycle.extend(back);
            return Some(cycle);
        }

        self.nodes
            .get_mut(from)
            .expect("add_dep just inserted this node")
            .deps
            .insert(to.to_path_buf());
        None
    }

    /// Depth-first search for a path from `start` to `target`, following
    /// forward (import) edges. Returns the path including both endpoints.
    fn find_path(&self, start: &Path, target: &Path) -> Option<Vec<PathBuf>> {
        let mut visited = HashSet::new();
        let mut stack = vec![vec![start.to_path_buf()]];

        while let Some(path) = stack.pop() {
            let current = path.last().expect("path is never empty");
            if current == target {
                return Some(path);
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                for dep in &node.deps {
                    let mut next = path.clone();
                    next.push(dep.clone());
                    stack.push(next);
                }
            }
        }
        None
    }

    /// Drops `remove` (if any) from the entry-point set, then deletes every
    /// node no longer reachable from a remaining entry point. Returns the
    /// removed paths.
    pub fn purge(&mut self, remove: Option<&[PathBuf]>) -> Vec<PathBuf> {
        if let Some(remove) = remove {
            for path in remove {
                self.entry_points.shift_remove(path);
            }
        }

        let reachable = self.reachable_from_entries();
        let to_remove: Vec<PathBuf> = self
            .nodes
            .keys()
            .filter(|path| !reachable.contains(*path))
            .cloned()
            .collect();

        for path in &to_remove {
            self.nodes.shift_remove(path);
        }
        to_remove
    }

    fn reachable_from_entries(&self) -> HashSet<PathBuf> {
        let mut seen = HashSet::new();
        let mut stack: Vec<PathBuf> = self.entry_points.iter().cloned().collect();
        while let Some(path) = stack.pop() {
            if !seen.insert(path.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&path) {
                for dep in &node.deps {
                    stack.push(dep.clone());
                }
            }
        }
        seen
    }

    /// Clears every node and entry point.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.entry_points.clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains_key(path)
    }

    /// Every path currently tracked, entry points and their transitive
    /// imports alike — used by the live loader to know what to watch.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.nodes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn bind_paths_adds_edge() {
        let mut g = DependencyGraph::new();
        g.add_dep(p("/a"), true);
        assert!(g.bind_paths(&p("/a"), &p("/b")).is_none());
        assert!(g.contains(&p("/b")));
    }

    #[test]
    fn self_import_is_a_cycle() {
        let mut g = DependencyGraph::new();
        let cycle = g.bind_paths(&p("/a"), &p("/a"));
        assert_eq!(cycle, Some(vec![p("/a"), p("/a")]));
    }

    #[test]
    fn indirect_cycle_is_detected_and_not_persisted() {
        let mut g = DependencyGraph::new();
        assert!(g.bind_paths(&p("/x"), &p("/y")).is_none());
        let cycle = g.bind_paths(&p("/y"), &p("/x"));
        assert_eq!(cycle, Some(vec![p("/y"), p("/x"), p("/y")]));
        // the cyclic edge y -> x must not have been persisted
        assert!(g.bind_paths(&p("/y"), &p("/z")).is_none());
        assert!(g.contains(&p("/z")));
    }

    #[test]
    fn purge_removes_unreachable_nodes() {
        let mut g = DependencyGraph::new();
        g.add_dep(p("/entry"), true);
        g.bind_paths(&p("/entry"), &p("/dep"));
        g.add_dep(p("/orphan"), false);

        let removed = g.purge(None);
        assert_eq!(removed, vec![p("/orphan")]);
        assert!(g.contains(&p("/entry")));
        assert!(g.contains(&p("/dep")));
        assert!(!g.contains(&p("/orphan")));
    }

    #[test]
    fn purge_with_removed_entry_drops_its_subgraph() {
        let mut g = DependencyGraph::new();
        g.add_dep(p("/entry"), true);
        g.bind_paths(&p("/entry"), &p("/dep"));

        let removed = g.purge(Some(&[p("/entry")]));
        assert_eq!(removed.len(), 2);
        assert!(g.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut g = DependencyGraph::new();
        g.add_dep(p("/a"), true);
        g.reset();
        assert!(g.is_empty());
    }
}
