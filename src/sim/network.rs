//! Road-network topology.
//!
//! A directed graph of signalized intersections connected by road segments.
//! The node ordering doubles as the fixed agent ordering of the multi-agent
//! coordinator: it must be stable across the episode and across training and
//! evaluation runs, or joint observations stop lining up with the policy.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction::Outgoing;

use super::Direction;
use crate::Id;

/// A grid of signalized intersections with directed road segments.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    graph: DiGraph<Id, Direction>,
    /// Row-major intersection order; the canonical agent ordering.
    order: Vec<Id>,
    by_id: HashMap<Id, NodeIndex>,
}

impl RoadNetwork {
    /// Builds a `rows` x `cols` grid.
    ///
    /// Intersections are named `tl_<row><col>` and ordered row-major, the
    /// layout of the original 3x3 network. Each intersection is linked to its
    /// southern neighbour along the north-south axis and to its eastern
    /// neighbour along the east-west axis; traffic leaving the last
    /// intersection of an axis exits the network.
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut graph = DiGraph::new();
        let mut order = Vec::with_capacity(rows * cols);
        let mut by_id = HashMap::new();
        let mut nodes = Vec::with_capacity(rows * cols);

        for r in 0..rows {
            for c in 0..cols {
                let id = format!("tl_{}{}", r, c);
                let idx = graph.add_node(id.clone());
                by_id.insert(id.clone(), idx);
                order.push(id);
                nodes.push(idx);
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                let here = nodes[r * cols + c];
                if r + 1 < rows {
                    graph.add_edge(here, nodes[(r + 1) * cols + c], Direction::NorthSouth);
                }
                if c + 1 < cols {
                    graph.add_edge(here, nodes[r * cols + c + 1], Direction::EastWest);
                }
            }
        }

        Self {
            graph,
            order,
            by_id,
        }
    }

    /// A single standalone intersection.
    pub fn single() -> Self {
        Self::grid(1, 1)
    }

    /// Intersection ids in the fixed agent order.
    pub fn intersection_ids(&self) -> &[Id] {
        &self.order
    }

    /// Number of intersections.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the network has no intersections.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether an intersection id exists in this network.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The intersection that traffic leaving `id` along `direction` reaches,
    /// or `None` if it exits the network.
    pub fn downstream(&self, id: &str, direction: Direction) -> Option<&str> {
        let idx = *self.by_id.get(id)?;
        self.graph
            .edges_directed(idx, Outgoing)
            .find(|e| *e.weight() == direction)
            .map(|e| self.graph[e.target()].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_3x3_has_nine_intersections_row_major() {
        let net = RoadNetwork::grid(3, 3);
        assert_eq!(net.len(), 9);
        assert_eq!(
            net.intersection_ids(),
            &[
                "tl_00", "tl_01", "tl_02", "tl_10", "tl_11", "tl_12", "tl_20", "tl_21", "tl_22"
            ]
        );
    }

    #[test]
    fn downstream_follows_axis() {
        let net = RoadNetwork::grid(3, 3);
        assert_eq!(net.downstream("tl_00", Direction::NorthSouth), Some("tl_10"));
        assert_eq!(net.downstream("tl_00", Direction::EastWest), Some("tl_01"));
        // Boundary intersections route off-grid.
        assert_eq!(net.downstream("tl_22", Direction::NorthSouth), None);
        assert_eq!(net.downstream("tl_22", Direction::EastWest), None);
    }

    #[test]
    fn single_network_has_no_downstream() {
        let net = RoadNetwork::single();
        assert_eq!(net.len(), 1);
        assert_eq!(net.intersection_ids(), &["tl_00"]);
        assert_eq!(net.downstream("tl_00", Direction::NorthSouth), None);
    }

    #[test]
    fn unknown_id_has_no_downstream() {
        let net = RoadNetwork::grid(2, 2);
        assert!(!net.contains("tl_99"));
        assert_eq!(net.downstream("tl_99", Direction::EastWest), None);
    }
}
