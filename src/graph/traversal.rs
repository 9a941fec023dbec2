//! Read-only traversals over a GraphStore: DFS (recursive order and
//! stack-based), BFS, and BFS shortest path.
//!
//! An unknown start id always yields an empty result rather than an error.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;

use super::GraphStore;

/// DFS and BFS from the same start node, side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalComparison {
    pub start_node: String,
    pub dfs: Vec<String>,
    pub bfs: Vec<String>,
    pub dfs_count: usize,
    pub bfs_count: usize,
}

/// Depth-first pre-order, visiting neighbors in adjacency order at every node
/// (the order a recursive DFS produces).
///
/// Runs on an explicit stack of (node, next neighbor index) frames, so the
/// depth of the graph is not bounded by the thread stack.
pub fn dfs(graph: &GraphStore, start: &str) -> Vec<String> {
    let Some(start) = graph.node_key(start) else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();
    let mut frames: Vec<(&str, usize)> = Vec::new();

    visited.insert(start);
    result.push(start.to_string());
    frames.push((start, 0));

    while let Some(frame) = frames.last_mut() {
        let (node, next) = *frame;
        let neighbors = graph.neighbors(node);
        if next >= neighbors.len() {
            frames.pop();
            continue;
        }
        frame.1 += 1;

        let neighbor = neighbors[next].as_str();
        if visited.insert(neighbor) {
            result.push(neighbor.to_string());
            frames.push((neighbor, 0));
        }
    }

    result
}

/// Stack-based DFS.
///
/// Neighbors are pushed in adjacency order and popped in reverse, so at each
/// branch point the visit order is the reverse of [`dfs`].
pub fn dfs_iterative(graph: &GraphStore, start: &str) -> Vec<String> {
    let Some(start) = graph.node_key(start) else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();
    let mut stack: Vec<&str> = vec![start];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        result.push(current.to_string());

        for neighbor in graph.neighbors(current) {
            if !visited.contains(neighbor.as_str()) {
                stack.push(neighbor);
            }
        }
    }

    result
}

/// Level-order traversal. Nodes are marked visited when enqueued, so a node
/// reachable through several parents is queued once.
pub fn bfs(graph: &GraphStore, start: &str) -> Vec<String> {
    let Some(start) = graph.node_key(start) else {
        return Vec::new();
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        result.push(current.to_string());
        for neighbor in graph.neighbors(current) {
            if visited.insert(neighbor.as_str()) {
                queue.push_back(neighbor);
            }
        }
    }

    result
}

/// Shortest path (fewest edges) from `start` to `end`, inclusive of both.
///
/// Empty if either id is unknown or `end` is unreachable; `[start]` if the
/// two are equal. The search stops when `end` is dequeued.
pub fn shortest_path(graph: &GraphStore, start: &str, end: &str) -> Vec<String> {
    let (Some(start), Some(end)) = (graph.node_key(start), graph.node_key(end)) else {
        return Vec::new();
    };

    // parent[n] = node n was discovered from; the start maps to None.
    let mut parent: HashMap<&str, Option<&str>> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    parent.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == end {
            return reconstruct_path(&parent, end);
        }
        for neighbor in graph.neighbors(current) {
            if !parent.contains_key(neighbor.as_str()) {
                parent.insert(neighbor, Some(current));
                queue.push_back(neighbor);
            }
        }
    }

    Vec::new()
}

/// Walk parent pointers from `end` back to the start and reverse.
fn reconstruct_path(parent: &HashMap<&str, Option<&str>>, end: &str) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = Some(end);
    while let Some(node) = current {
        path.push(node.to_string());
        current = parent.get(node).copied().flatten();
    }
    path.reverse();
    path
}

pub fn compare_traversals(graph: &GraphStore, start: &str) -> TraversalComparison {
    let dfs = dfs(graph, start);
    let bfs = bfs(graph, start);
    TraversalComparison {
        start_node: start.to_string(),
        dfs_count: dfs.len(),
        bfs_count: bfs.len(),
        dfs,
        bfs,
    }
}
