//! A minimal system-dynamics engine.
//!
//! Models are built from stocks, flows, variables and parameters joined by
//! causal edges, then advanced with explicit Euler steps by a [`Session`].

pub mod compute;
pub mod config;
pub mod error;
pub mod graph;
pub mod scenario;
pub mod session;

pub use compute::{ComputationError, Evaluator, Function, StepReport, Stepper};
pub use config::{IdleStockPolicy, SessionConfig};
pub use error::{ModelError, SimResult};
pub use graph::{Causality, Computation, Element, ElementId, ElementKind, Model, Polarity};
pub use session::{RunLength, Session};
