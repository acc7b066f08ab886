//! Declaration Graph - by-value dependencies between structures and unions.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: canonical names of declared structures/unions, added in processing order
//!   (so a node's index is its processing position)
//! - Edges: `dependency -> dependent` for every plain by-value field whose type is
//!   another declared structure/union
//!
//! Classification reads earlier verdicts, so a dependency must be classified before
//! every structure that embeds it. [`DeclarationGraph::check_order`] verifies that the
//! processing order already satisfies this; [`DeclarationGraph::stable_order`] computes
//! an order that does, preferring the original one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use vkbind_core::{CanonicalName, IngestError, OrderViolation};

#[derive(Debug, Default)]
pub struct DeclarationGraph {
    graph: DiGraph<CanonicalName, ()>,
    index: FxHashMap<CanonicalName, NodeIndex>,
}

impl DeclarationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration at the next processing position. A repeated name keeps its
    /// first position.
    pub fn add_declaration(&mut self, name: CanonicalName) -> NodeIndex {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.index.insert(name, idx);
        idx
    }

    /// Record that `dependent` embeds `dependency` by value.
    ///
    /// Ignored unless both are declared: fields of handle, scalar or unknown type do
    /// not constrain the order.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) -> bool {
        match (self.index.get(dependency), self.index.get(dependent)) {
            (Some(&from), Some(&to)) => {
                self.graph.update_edge(from, to, ());
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn declaration_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Declarations in processing order.
    pub fn declarations(&self) -> impl Iterator<Item = &CanonicalName> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Verify that every dependency is processed before its dependents.
    ///
    /// Reports the violation whose dependent comes first in processing order.
    pub fn check_order(&self) -> Result<(), IngestError> {
        let mut violations: Vec<(NodeIndex, NodeIndex)> = self
            .graph
            .edge_references()
            .filter(|edge| edge.source().index() >= edge.target().index())
            .map(|edge| (edge.target(), edge.source()))
            .collect();
        violations.sort();

        match violations.first() {
            Some(&(dependent, dependency)) => Err(self.violation(dependent, dependency)),
            None => Ok(()),
        }
    }

    /// Topological order that keeps the processing order wherever it is free to.
    ///
    /// Among the declarations whose dependencies are all placed, the one declared
    /// earliest goes next. Fails only on a cycle.
    pub fn stable_order(&self) -> Result<Vec<CanonicalName>, IngestError> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(i)) = ready.pop() {
            let idx = NodeIndex::new(i);
            order.push(self.graph[idx].clone());
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                let next = edge.target().index();
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() == self.graph.node_count() {
            return Ok(order);
        }

        // Whatever is left sits on or behind a cycle; report the earliest cyclic edge.
        let stuck = self
            .graph
            .edge_references()
            .filter(|edge| in_degree[edge.target().index()] > 0)
            .filter(|edge| in_degree[edge.source().index()] > 0)
            .map(|edge| (edge.target(), edge.source()))
            .filter(|&(dependent, dependency)| self.same_cycle(dependent, dependency))
            .min_by_key(|&(dependent, dependency)| (dependent.index(), dependency.index()));

        match stuck {
            Some((dependent, dependency)) => Err(self.violation(dependent, dependency)),
            None => Ok(order),
        }
    }

    fn violation(&self, dependent: NodeIndex, dependency: NodeIndex) -> IngestError {
        let violation = match self.cycle_members(dependent, dependency) {
            Some(members) => OrderViolation::Cycle(members),
            None => OrderViolation::ForwardReference,
        };
        IngestError::CyclicOrUnorderedDeclaration {
            entity: self.graph[dependent].clone(),
            dependency: self.graph[dependency].clone(),
            violation,
        }
    }

    fn same_cycle(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.cycle_members(a, b).is_some()
    }

    /// Members of the strongly connected component holding both nodes, in processing
    /// order, if that component is a cycle.
    fn cycle_members(&self, a: NodeIndex, b: NodeIndex) -> Option<Vec<CanonicalName>> {
        if a == b {
            return self
                .graph
                .contains_edge(a, a)
                .then(|| vec![self.graph[a].clone()]);
        }
        let mut component = tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| scc.contains(&a))?;
        if !component.contains(&b) {
            return None;
        }
        component.sort_by_key(|idx| idx.index());
        Some(
            component
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect(),
        )
    }
}
