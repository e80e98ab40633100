use std::collections::HashSet;
use thiserror::Error;

use crate::core::blossom::{max_weight_matching, MatchingError};
use crate::models::{CompatibilityEdge, EdgeExplanation, PairKey};

/// Violations of the compatibility-graph invariants
///
/// These indicate a bug in whatever assembled the graph, never bad input data.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),

    #[error("duplicate edge ({0}, {1})")]
    DuplicateEdge(usize, usize),

    #[error("edge ({0}, {1}) has invalid weight {2}")]
    InvalidWeight(usize, usize, f64),

    #[error("edge ({0}, {1}) references a vertex outside a graph of {2} vertices")]
    VertexOutOfRange(usize, usize, usize),
}

/// Weighted undirected graph over person indices
#[derive(Debug, Clone, Default)]
pub struct CompatibilityGraph {
    vertex_count: usize,
    edges: Vec<CompatibilityEdge>,
    keys: HashSet<PairKey>,
}

impl CompatibilityGraph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            keys: HashSet::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[CompatibilityEdge] {
        &self.edges
    }

    /// Add an edge between `u` and `v`, enforcing the graph invariants
    pub fn connect(
        &mut self,
        u: usize,
        v: usize,
        weight: f64,
        explanation: EdgeExplanation,
    ) -> Result<(), GraphError> {
        let key = PairKey::new(u, v).ok_or(GraphError::SelfLoop(u))?;
        if key.high() >= self.vertex_count {
            return Err(GraphError::VertexOutOfRange(key.low(), key.high(), self.vertex_count));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight(key.low(), key.high(), weight));
        }
        if !self.keys.insert(key) {
            return Err(GraphError::DuplicateEdge(key.low(), key.high()));
        }

        self.edges.push(CompatibilityEdge::new(key, weight, explanation));
        Ok(())
    }

    /// Maximum-weight matching over this graph
    pub fn max_weight_matching(&self) -> Result<Matching, MatchingError> {
        let raw: Vec<(usize, usize, f64)> = self
            .edges
            .iter()
            .map(|edge| (edge.key().low(), edge.key().high(), edge.weight()))
            .collect();

        let mates = max_weight_matching(self.vertex_count, &raw)?;

        let mut selected: Vec<CompatibilityEdge> = self
            .edges
            .iter()
            .filter(|edge| mates[edge.key().low()] == Some(edge.key().high()))
            .cloned()
            .collect();
        selected.sort_by_key(|edge| edge.key());

        Ok(Matching { edges: selected })
    }
}

/// Vertex-disjoint subset of a graph's edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matching {
    edges: Vec<CompatibilityEdge>,
}

impl Matching {
    /// Edges ordered by pair key
    pub fn edges(&self) -> &[CompatibilityEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(CompatibilityEdge::weight).sum()
    }

    pub fn is_matched(&self, vertex: usize) -> bool {
        self.edges.iter().any(|edge| edge.key().contains(vertex))
    }

    pub fn into_edges(self) -> Vec<CompatibilityEdge> {
        self.edges
    }
}
