//! Recursive, memoized resolution of element values for the current step.
use super::ledger::{ComputationError, Ledger};
use crate::error::SimResult;
use crate::graph::{ElementId, ElementKind, Model};
use smallvec::SmallVec;
use std::collections::HashSet;

pub struct Evaluator<'a> {
    model: &'a Model,
    ledger: &'a mut Ledger,
    visiting: HashSet<ElementId>, // For cycle detection
}

impl<'a> Evaluator<'a> {
    /// The ledger holds whatever has already been resolved this step; the
    /// caller is responsible for resetting it between steps.
    pub fn new(model: &'a Model, ledger: &'a mut Ledger) -> Self {
        Self { model, ledger, visiting: HashSet::new() }
    }

    /// Resolves the named element's value for the current step.
    ///
    /// Results are staged in the ledger, not written to any history.
    pub fn evaluate(&mut self, name: &str) -> SimResult<f64> {
        let id = self.model.id(name)?;
        Ok(self.resolve(id)?)
    }

    pub(crate) fn resolve(&mut self, id: ElementId) -> Result<f64, ComputationError> {
        let model = self.model;
        let element = model.element_at(id);

        // Stocks are read as last integrated; never recursed through.
        if element.kind == ElementKind::Stock {
            return element
                .current()
                .ok_or_else(|| ComputationError::MissingValue { element: element.name.clone() });
        }

        if let Some(value) = self.ledger.get(id) {
            return Ok(value);
        }

        if !self.visiting.insert(id) {
            return Err(ComputationError::CycleDetected { element: element.name.clone() });
        }

        // Leave `visiting` clean on failure too, or a retry reports a false cycle.
        let result = self.compute(id);
        self.visiting.remove(&id);

        let value = result?;
        self.ledger.insert(id, value);
        Ok(value)
    }

    fn compute(&mut self, id: ElementId) -> Result<f64, ComputationError> {
        let model = self.model;
        let element = model.element_at(id);

        match &element.computation {
            // A constant is re-recorded with its last known value.
            None => element
                .current()
                .ok_or_else(|| ComputationError::MissingValue { element: element.name.clone() }),
            Some(computation) => {
                let function = computation.function;
                if computation.args.len() != function.arity() {
                    return Err(ComputationError::ArityMismatch {
                        element: element.name.clone(),
                        function: function.name(),
                        expected: function.arity(),
                        actual: computation.args.len(),
                    });
                }

                let mut args = SmallVec::<[f64; 2]>::with_capacity(computation.args.len());
                for arg in &computation.args {
                    let arg_id = model.lookup(arg).ok_or_else(|| ComputationError::UnknownArgument {
                        element: element.name.clone(),
                        argument: arg.clone(),
                    })?;
                    args.push(self.resolve(arg_id)?);
                }
                function.apply(&element.name, &args)
            }
        }
    }
}
