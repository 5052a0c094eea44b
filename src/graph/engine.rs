use std::cmp::Ordering;
use std::collections::BinaryHeap;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rayon::prelude::*;

/// Result of a shortest-path query: `distance < 0` means no directed path
/// exists (unknown pin, or disconnected component).
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub distance: f64,
    pub path: Vec<String>,
}

impl QueryResult {
    fn miss() -> Self {
        QueryResult {
            distance: -1.0,
            path: Vec::new(),
        }
    }
}

struct ComponentMeta {
    topo_complete: bool,
}

/// A directed graph over interned pin names, with precomputed weakly
/// connected components and a per-component topological order, answering
/// on-demand shortest-path queries with topology-pruned Dijkstra.
///
/// Grounded on `sparse_graph_shortest_path.{h,cpp}`.
pub struct ShortestPathEngine {
    name_to_id: IndexMap<String, u32>,
    id_to_name: Vec<String>,
    adj: Vec<Vec<(u32, f64)>>,
    rev_adj: Vec<Vec<(u32, f64)>>,
    component_of: Vec<u32>,
    topo_position: Vec<u32>,
    components: Vec<ComponentMeta>,
    timing: Mutex<IndexMap<&'static str, std::time::Duration>>,
}

impl ShortestPathEngine {
    pub(crate) fn from_edges(edges: &[(String, String, f64)]) -> Self {
        let mut name_to_id: IndexMap<String, u32> = IndexMap::new();
        let mut id_to_name: Vec<String> = Vec::new();

        let mut intern = |name: &str, name_to_id: &mut IndexMap<String, u32>| -> u32 {
            if let Some(&id) = name_to_id.get(name) {
                return id;
            }
            let id = id_to_name.len() as u32;
            id_to_name.push(name.to_string());
            name_to_id.insert(name.to_string(), id);
            id
        };

        let mut raw_edges = Vec::with_capacity(edges.len());
        for (from, to, weight) in edges {
            let u = intern(from, &mut name_to_id);
            let v = intern(to, &mut name_to_id);
            raw_edges.push((u, v, *weight));
        }

        let n = id_to_name.len();
        let mut adj: Vec<Vec<(u32, f64)>> = vec![Vec::new(); n];
        let mut rev_adj: Vec<Vec<(u32, f64)>> = vec![Vec::new(); n];
        for (u, v, w) in &raw_edges {
            adj[*u as usize].push((*v, *w));
            rev_adj[*v as usize].push((*u, *w));
        }

        let component_of = compute_components(n, &adj, &rev_adj);
        let num_components = component_of.iter().copied().max().map(|m| m + 1).unwrap_or(0);

        let mut nodes_by_component: Vec<Vec<u32>> = vec![Vec::new(); num_components as usize];
        for (node, &comp) in component_of.iter().enumerate() {
            nodes_by_component[comp as usize].push(node as u32);
        }

        let topo_results: Vec<(Vec<u32>, bool)> = nodes_by_component
            .par_iter()
            .map(|nodes| topological_order(nodes, &adj))
            .collect();

        let mut topo_position = vec![0u32; n];
        let mut components = Vec::with_capacity(topo_results.len());
        for (order, complete) in &topo_results {
            for (pos, &node) in order.iter().enumerate() {
                topo_position[node as usize] = pos as u32;
            }
            components.push(ComponentMeta {
                topo_complete: *complete,
            });
        }

        ShortestPathEngine {
            name_to_id,
            id_to_name,
            adj,
            rev_adj,
            component_of,
            topo_position,
            components,
            timing: Mutex::new(IndexMap::new()),
        }
    }

    pub fn node_count(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn query(&self, from: &str, to: &str) -> QueryResult {
        let started = std::time::Instant::now();
        let result = self.query_inner(from, to);
        let mut timing = self.timing.lock();
        *timing.entry("query").or_insert(std::time::Duration::ZERO) += started.elapsed();
        result
    }

    fn query_inner(&self, from: &str, to: &str) -> QueryResult {
        let (Some(&u), Some(&v)) = (self.name_to_id.get(from), self.name_to_id.get(to)) else {
            return QueryResult::miss();
        };
        if u == v {
            return QueryResult {
                distance: 0.0,
                path: vec![from.to_string()],
            };
        }
        if self.component_of[u as usize] != self.component_of[v as usize] {
            return QueryResult::miss();
        }
        self.dijkstra_topo(u, v)
    }

    fn dijkstra_topo(&self, from: u32, to: u32) -> QueryResult {
        let comp = self.component_of[to as usize];
        let topo_complete = self.components[comp as usize].topo_complete;
        let to_pos = self.topo_position[to as usize];

        let n = self.id_to_name.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<u32>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut heap = BinaryHeap::new();

        dist[from as usize] = 0.0;
        heap.push(HeapEntry {
            dist: 0.0,
            node: from,
        });

        while let Some(HeapEntry { dist: d, node: u }) = heap.pop() {
            if visited[u as usize] {
                continue;
            }
            visited[u as usize] = true;
            if u == to {
                return QueryResult {
                    distance: d,
                    path: self.reconstruct_path(&parent, from, to),
                };
            }
            if topo_complete && self.topo_position[u as usize] > to_pos {
                continue;
            }
            for &(v, w) in &self.adj[u as usize] {
                if topo_complete && self.topo_position[v as usize] > to_pos {
                    continue;
                }
                let cand = d + w;
                if cand < dist[v as usize] {
                    dist[v as usize] = cand;
                    parent[v as usize] = Some(u);
                    heap.push(HeapEntry {
                        dist: cand,
                        node: v,
                    });
                }
            }
        }
        QueryResult::miss()
    }

    fn reconstruct_path(&self, parent: &[Option<u32>], from: u32, to: u32) -> Vec<String> {
        let mut rev = vec![to];
        let mut cur = to;
        while cur != from {
            match parent[cur as usize] {
                Some(p) => {
                    rev.push(p);
                    cur = p;
                }
                None => break,
            }
        }
        rev.reverse();
        rev.into_iter()
            .map(|id| self.id_to_name[id as usize].clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    dist: f64,
    node: u32,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) behaves as a min-heap.
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Weakly connected components via BFS over the union of forward and
/// reverse adjacency.
fn compute_components(n: usize, adj: &[Vec<(u32, f64)>], rev_adj: &[Vec<(u32, f64)>]) -> Vec<u32> {
    let mut component_of = vec![u32::MAX; n];
    let mut next_component = 0u32;
    let mut queue = std::collections::VecDeque::new();

    for start in 0..n {
        if component_of[start] != u32::MAX {
            continue;
        }
        component_of[start] = next_component;
        queue.push_back(start as u32);
        while let Some(u) = queue.pop_front() {
            for &(v, _) in adj[u as usize].iter().chain(rev_adj[u as usize].iter()) {
                if component_of[v as usize] == u32::MAX {
                    component_of[v as usize] = next_component;
                    queue.push_back(v);
                }
            }
        }
        next_component += 1;
    }
    component_of
}

/// Kahn's algorithm restricted to the given node set, using `adj` for
/// successor edges. Returns `(order, complete)`; `complete` is false if a
/// cycle prevented every node from being ordered.
fn topological_order(nodes: &[u32], adj: &[Vec<(u32, f64)>]) -> (Vec<u32>, bool) {
    if nodes.len() <= 1 {
        return (nodes.to_vec(), true);
    }
    let in_set: std::collections::HashSet<u32> = nodes.iter().copied().collect();
    let mut in_degree: IndexMap<u32, u32> = nodes.iter().map(|&n| (n, 0)).collect();
    for &u in nodes {
        for &(v, _) in &adj[u as usize] {
            if in_set.contains(&v) {
                *in_degree.get_mut(&v).unwrap() += 1;
            }
        }
    }

    let mut queue: std::collections::VecDeque<u32> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&n, _)| n)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &(v, _) in &adj[u as usize] {
            if let Some(deg) = in_degree.get_mut(&v) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(v);
                }
            }
        }
    }

    let complete = order.len() == nodes.len();
    (order, complete)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, &str, f64)]) -> Vec<(String, String, f64)> {
        pairs
            .iter()
            .map(|(a, b, w)| (a.to_string(), b.to_string(), *w))
            .collect()
    }

    #[test]
    fn self_query_is_zero() {
        let engine = ShortestPathEngine::from_edges(&edges(&[("a", "b", 1.0)]));
        let r = engine.query("a", "a");
        assert_eq!(r.distance, 0.0);
        assert_eq!(r.path, vec!["a".to_string()]);
    }

    #[test]
    fn unknown_node_misses() {
        let engine = ShortestPathEngine::from_edges(&edges(&[("a", "b", 1.0)]));
        let r = engine.query("a", "z");
        assert_eq!(r.distance, -1.0);
    }

    #[test]
    fn finds_shortest_path_through_chain() {
        let engine = ShortestPathEngine::from_edges(&edges(&[
            ("a", "b", 1.0),
            ("b", "c", 2.0),
            ("a", "c", 5.0),
        ]));
        let r = engine.query("a", "c");
        assert_eq!(r.distance, 3.0);
        assert_eq!(r.path, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn disconnected_components_miss() {
        let engine =
            ShortestPathEngine::from_edges(&edges(&[("a", "b", 1.0), ("x", "y", 1.0)]));
        let r = engine.query("a", "y");
        assert_eq!(r.distance, -1.0);
    }

    #[test]
    fn tolerates_cycles_by_falling_back_to_plain_dijkstra() {
        let engine = ShortestPathEngine::from_edges(&edges(&[
            ("a", "b", 1.0),
            ("b", "a", 1.0),
            ("b", "c", 1.0),
        ]));
        let r = engine.query("a", "c");
        assert_eq!(r.distance, 2.0);
    }
}
