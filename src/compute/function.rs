//! The fixed set of numeric operations an element can be computed with.
use super::ledger::ComputationError;

/// A pure numeric operation with a fixed arity.
///
/// Arguments are applied in the order the element declares them, which matters
/// for the non-commutative `Subtract` and `Division`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Function {
    /// `slope * x + intercept`
    Linear { slope: f64, intercept: f64 },
    /// `x - y`
    Subtract,
    /// `x / y`
    Division,
}

impl Function {
    /// Passes its single argument through unchanged.
    pub const IDENTITY: Function = Function::Linear { slope: 1.0, intercept: 0.0 };

    pub fn linear(slope: f64, intercept: f64) -> Self {
        Function::Linear { slope, intercept }
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Linear { .. } => 1,
            Function::Subtract | Function::Division => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Linear { .. } => "Linear",
            Function::Subtract => "Subtract",
            Function::Division => "Division",
        }
    }

    /// Applies the operation on behalf of `element`, whose name is only used
    /// for error reporting.
    pub fn apply(&self, element: &str, args: &[f64]) -> Result<f64, ComputationError> {
        if args.len() != self.arity() {
            return Err(ComputationError::ArityMismatch {
                element: element.to_string(),
                function: self.name(),
                expected: self.arity(),
                actual: args.len(),
            });
        }

        match *self {
            Function::Linear { slope, intercept } => Ok(slope * args[0] + intercept),
            Function::Subtract => Ok(args[0] - args[1]),
            Function::Division => {
                if args[1] == 0.0 {
                    return Err(ComputationError::DivisionByZero { element: element.to_string() });
                }
                Ok(args[0] / args[1])
            }
        }
    }
}
