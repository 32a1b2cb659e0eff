//! Defines the core data structures for the stock-and-flow model.
pub mod edge;
pub mod model;
pub mod node;
pub mod topology;

// Re-export key types for convenient access
pub use edge::{Causality, Polarity};
pub use model::Model;
pub use node::{Computation, Element, ElementId, ElementKind};
