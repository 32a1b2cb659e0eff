//! Defines the `Element` and its associated types, representing a single
//! stock, flow, variable or parameter in the model.

use crate::compute::Function;
use petgraph::graph::NodeIndex;
use smallvec::SmallVec;

/// A unique, stable identifier for an element within the model.
///
/// This is a type alias for `petgraph::graph::NodeIndex` to abstract the
/// underlying graph implementation.
pub type ElementId = NodeIndex;

/// The role an element plays in the stock-and-flow structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// An accumulation. Changes only through integration of the flows feeding it.
    Stock,
    /// A rate, integrated into the stocks it targets once per step.
    Flow,
    /// A derived quantity recomputed every step.
    Variable,
    /// A constant input, re-recorded every step.
    Parameter,
}

/// The calculation that produces an element's value each step.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub function: Function,
    // Argument element names, in the order the function consumes them.
    // This is the authoritative dependency list; causal edges are not consulted.
    pub args: SmallVec<[String; 2]>,
}

impl Computation {
    pub fn new<I, S>(function: Function, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named node of the model, owning its append-only value history.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub computation: Option<Computation>,
    pub(crate) history: Vec<f64>,
}

impl Element {
    pub(crate) fn new(name: String, kind: ElementKind, computation: Option<Computation>, initial: Option<f64>) -> Self {
        Self {
            name,
            kind,
            computation,
            history: initial.into_iter().collect(),
        }
    }

    pub fn history(&self) -> &[f64] { &self.history }

    pub fn current(&self) -> Option<f64> { self.history.last().copied() }

    pub fn is_stock(&self) -> bool { self.kind == ElementKind::Stock }

    /// True for elements without a computation that are not stocks.
    pub fn is_constant(&self) -> bool { !self.is_stock() && self.computation.is_none() }
}
