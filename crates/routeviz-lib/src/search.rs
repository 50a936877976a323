//! Shortest-path exploration over a route's own vertices.
//!
//! The graph is a simple chain: one vertex per coordinate and an undirected
//! edge between consecutive vertices weighted by haversine distance. Running
//! Dijkstra over it reproduces the route, but the pop order is what the
//! "explored nodes" overlay visualizes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::{haversine, Coordinate};
use crate::route::RouteGeometry;

/// Index of a vertex inside a [`PathGraph`].
pub type VertexId = usize;

/// Undirected edge to a neighbouring vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: VertexId,
    pub distance: f64,
}

/// Adjacency-list graph built from a route geometry.
#[derive(Debug, Clone)]
pub struct PathGraph {
    coordinates: Vec<Coordinate>,
    adjacency: Vec<Vec<Edge>>,
}

impl PathGraph {
    /// Build the chain graph for `geometry`.
    ///
    /// Geometries with fewer than two vertices have no edges to search and
    /// are rejected with [`Error::EmptyGeometry`].
    pub fn from_geometry(geometry: &RouteGeometry) -> Result<Self> {
        Self::from_points(geometry.points())
    }

    pub fn from_points(points: &[Coordinate]) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::EmptyGeometry {
                vertices: points.len(),
            });
        }

        let mut adjacency = vec![Vec::with_capacity(2); points.len()];
        for (index, pair) in points.windows(2).enumerate() {
            let distance = haversine(pair[0], pair[1]);
            adjacency[index].push(Edge {
                target: index + 1,
                distance,
            });
            adjacency[index + 1].push(Edge {
                target: index,
                distance,
            });
        }

        Ok(Self {
            coordinates: points.to_vec(),
            adjacency,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn coordinate(&self, vertex: VertexId) -> Option<Coordinate> {
        self.coordinates.get(vertex).copied()
    }

    /// Return neighbours for `vertex`, or an empty slice when out of range.
    pub fn neighbours(&self, vertex: VertexId) -> &[Edge] {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Run Dijkstra from the first vertex until the last one is popped.
    pub fn shortest_path(&self) -> SearchResult {
        let goal = self.vertex_count() - 1;
        let mut distances = vec![f64::INFINITY; self.vertex_count()];
        let mut parents: Vec<Option<VertexId>> = vec![None; self.vertex_count()];
        let mut visited_order = Vec::new();
        let mut queue = BinaryHeap::new();

        distances[0] = 0.0;
        queue.push(QueueEntry::new(0, 0.0));

        while let Some(entry) = queue.pop() {
            // A cheaper entry for this vertex was already settled.
            if entry.cost > distances[entry.node] {
                continue;
            }

            visited_order.push(entry.node);
            if entry.node == goal {
                break;
            }

            for edge in self.neighbours(entry.node) {
                let next_cost = entry.cost + edge.distance;
                if next_cost < distances[edge.target] {
                    distances[edge.target] = next_cost;
                    parents[edge.target] = Some(entry.node);
                    queue.push(QueueEntry::new(edge.target, next_cost));
                }
            }
        }

        let best_path = reconstruct_path(&parents, 0, goal);
        let visited_coordinates = visited_order
            .iter()
            .filter_map(|&vertex| self.coordinate(vertex))
            .collect();
        let best_path_coordinates = best_path
            .iter()
            .filter_map(|&vertex| self.coordinate(vertex))
            .collect();

        SearchResult {
            visited_order,
            best_path,
            total_distance_meters: distances[goal],
            visited_coordinates,
            best_path_coordinates,
        }
    }
}

/// Outcome of exploring a route geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    /// Vertices in the order they were popped from the frontier.
    pub visited_order: Vec<VertexId>,
    /// Vertex indices from the first to the last vertex.
    pub best_path: Vec<VertexId>,
    pub total_distance_meters: f64,
    pub visited_coordinates: Vec<Coordinate>,
    pub best_path_coordinates: Vec<Coordinate>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.visited_order.is_empty() && self.best_path.is_empty()
    }
}

/// Explore `geometry`. Geometries with fewer than two vertices yield an
/// empty result so callers simply render no overlays.
pub fn search(geometry: &RouteGeometry) -> SearchResult {
    match PathGraph::from_geometry(geometry) {
        Ok(graph) => graph.shortest_path(),
        Err(err) => {
            tracing::debug!(error = %err, "skipping shortest-path search");
            SearchResult::default()
        }
    }
}

fn reconstruct_path(parents: &[Option<VertexId>], start: VertexId, goal: VertexId) -> Vec<VertexId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

/// Frontier entry; the heap pops the cheapest first.
#[derive(Copy, Clone, Debug)]
struct QueueEntry {
    node: VertexId,
    cost: f64,
}

impl QueueEntry {
    fn new(node: VertexId, cost: f64) -> Self {
        Self { node, cost }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal costs come from zero-length edges; settle the vertex further
        // along the chain first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}
