//! ledger.rs
//! Per-step memo table. Values resolved during a step are staged here and only
//! reach element histories once the whole step has succeeded.

use crate::graph::ElementId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Division by zero at element '{element}'")]
    DivisionByZero { element: String },
    #[error("{function} at element '{element}' expects {expected} argument(s), got {actual}")]
    ArityMismatch { element: String, function: &'static str, expected: usize, actual: usize },
    #[error("Element '{element}' references unknown argument '{argument}'")]
    UnknownArgument { element: String, argument: String },
    #[error("Cycle through '{element}' does not pass through a stock")]
    CycleDetected { element: String },
    #[error("Element '{element}' has no value to read")]
    MissingValue { element: String },
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    // Dense storage indexed by element id; `None` means "not resolved this step".
    values: Vec<Option<f64>>,
}

impl Ledger {
    pub fn new() -> Self { Self::default() }

    /// Forgets every staged value and makes room for `size` elements.
    pub fn reset(&mut self, size: usize) {
        self.values.clear();
        self.values.resize(size, None);
    }

    #[inline(always)]
    pub fn get(&self, id: ElementId) -> Option<f64> {
        self.values.get(id.index()).copied().flatten()
    }

    #[inline(always)]
    pub fn insert(&mut self, id: ElementId, value: f64) {
        let idx = id.index();
        if idx >= self.values.len() {
            self.values.resize(idx + 1, None);
        }
        self.values[idx] = Some(value);
    }

    /// Staged values in element insertion order.
    pub fn resolved(&self) -> impl Iterator<Item = (ElementId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (ElementId::new(i), v)))
    }

    pub fn resolved_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}
