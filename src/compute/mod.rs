//! Evaluates and integrates the model.
pub mod evaluator;
pub mod function;
pub mod ledger;
pub mod stepper;

pub use evaluator::Evaluator;
pub use function::Function;
pub use ledger::{ComputationError, Ledger};
pub use stepper::{StepReport, Stepper};
