//! model.rs
//! The stock-and-flow model: elements, causal edges and the flow-target relation.

use super::edge::Causality;
use super::node::{Computation, Element, ElementId, ElementKind};
use crate::error::{ModelError, SimResult};
use petgraph::graph::DiGraph;
use petgraph::Direction;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Owns every element and causal edge of one model.
///
/// Two relations are kept apart: each element's `Computation` lists the
/// arguments it is evaluated from, while `flow_targets` records which stocks
/// each flow integrates into. The petgraph edge set holds every declared
/// causality, including parallel edges, for graph rendering.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) graph: DiGraph<Element, Causality>,
    index: HashMap<String, ElementId>,
    flow_targets: HashMap<ElementId, SmallVec<[ElementId; 2]>>,
}

impl Model {
    pub fn new() -> Self { Self::default() }

    /// Registers a new element.
    ///
    /// Argument names in `computation` may refer to elements that are added
    /// later; they are resolved when the model is validated or evaluated.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        kind: ElementKind,
        computation: Option<Computation>,
        initial_value: Option<f64>,
    ) -> SimResult<ElementId> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ModelError::DuplicateElement(name));
        }
        if kind == ElementKind::Stock && computation.is_some() {
            return Err(ModelError::StockWithComputation(name));
        }

        let id = self.graph.add_node(Element::new(name.clone(), kind, computation, initial_value));
        self.index.insert(name, id);
        Ok(id)
    }

    pub fn add_stock(&mut self, name: impl Into<String>, initial_value: f64) -> SimResult<ElementId> {
        self.add_element(name, ElementKind::Stock, None, Some(initial_value))
    }

    pub fn add_flow(&mut self, name: impl Into<String>, computation: Computation) -> SimResult<ElementId> {
        self.add_element(name, ElementKind::Flow, Some(computation), None)
    }

    pub fn add_variable(&mut self, name: impl Into<String>, computation: Computation) -> SimResult<ElementId> {
        self.add_element(name, ElementKind::Variable, Some(computation), None)
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: f64) -> SimResult<ElementId> {
        self.add_element(name, ElementKind::Parameter, None, Some(value))
    }

    /// Registers a directed `from -> to` edge without metadata.
    pub fn add_causality(&mut self, from: &str, to: &str) -> SimResult<()> {
        self.add_causality_with(from, to, Causality::default())
    }

    pub fn add_causality_with(&mut self, from: &str, to: &str, causality: Causality) -> SimResult<()> {
        let source = self.id(from)?;
        let target = self.id(to)?;
        self.graph.add_edge(source, target, causality);

        if self.graph[source].kind == ElementKind::Flow && self.graph[target].kind == ElementKind::Stock {
            let targets = self.flow_targets.entry(source).or_default();
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        Ok(())
    }

    // --- Queries ---

    pub fn id(&self, name: &str) -> SimResult<ElementId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownElement(name.to_string()))
    }

    pub fn element(&self, name: &str) -> SimResult<&Element> {
        Ok(&self.graph[self.id(name)?])
    }

    /// The last recorded value of an element.
    pub fn current_value(&self, name: &str) -> SimResult<f64> {
        self.element(name)?
            .current()
            .ok_or_else(|| ModelError::EmptyHistory(name.to_string()))
    }

    pub fn history(&self, name: &str) -> SimResult<&[f64]> {
        Ok(self.element(name)?.history())
    }

    /// The argument names declared by the element's computation, in order.
    /// Empty for stocks and constants.
    pub fn computation_args(&self, name: &str) -> SimResult<&[String]> {
        Ok(self
            .element(name)?
            .computation
            .as_ref()
            .map_or(&[][..], |c| c.args.as_slice()))
    }

    /// Distinct elements with an incoming edge from `name`, in insertion order.
    pub fn successors(&self, name: &str) -> SimResult<Vec<&str>> {
        let id = self.id(name)?;
        let mut targets: Vec<ElementId> = self.graph.neighbors_directed(id, Direction::Outgoing).collect();
        targets.sort_unstable();
        targets.dedup();
        Ok(targets.into_iter().map(|t| self.graph[t].name.as_str()).collect())
    }

    /// The stocks a flow integrates into.
    pub fn flow_targets(&self, name: &str) -> SimResult<Vec<&str>> {
        let id = self.id(name)?;
        Ok(self.flow_target_ids(id).iter().map(|&t| self.graph[t].name.as_str()).collect())
    }

    /// Element names in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(|e| e.name.as_str())
    }

    /// Every declared edge as `(from, to, metadata)`, parallel edges included.
    pub fn causalities(&self) -> impl Iterator<Item = (&str, &str, &Causality)> + '_ {
        self.graph.edge_indices().filter_map(move |e| {
            let (source, target) = self.graph.edge_endpoints(e)?;
            Some((
                self.graph[source].name.as_str(),
                self.graph[target].name.as_str(),
                &self.graph[e],
            ))
        })
    }

    pub fn len(&self) -> usize { self.graph.node_count() }
    pub fn is_empty(&self) -> bool { self.graph.node_count() == 0 }
    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    // --- Crate-internal accessors used by the engine ---

    pub(crate) fn element_at(&self, id: ElementId) -> &Element { &self.graph[id] }

    pub(crate) fn lookup(&self, name: &str) -> Option<ElementId> { self.index.get(name).copied() }

    pub(crate) fn ids(&self) -> impl Iterator<Item = ElementId> { self.graph.node_indices() }

    pub(crate) fn ids_of_kind(&self, kind: ElementKind) -> Vec<ElementId> {
        self.graph.node_indices().filter(|&id| self.graph[id].kind == kind).collect()
    }

    pub(crate) fn flow_target_ids(&self, flow: ElementId) -> &[ElementId] {
        self.flow_targets.get(&flow).map_or(&[][..], |t| t.as_slice())
    }

    pub(crate) fn push_sample(&mut self, id: ElementId, value: f64) {
        self.graph[id].history.push(value);
    }
}
