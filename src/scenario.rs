//! Canonical first-order feedback structures.
//!
//! Each builder adds its elements and causal edges to an existing model, so
//! several structures can live side by side as long as their names differ.

use crate::compute::Function;
use crate::error::SimResult;
use crate::graph::{Causality, Computation, Model, Polarity};

/// Goal-seeking loop: `stock0` closes its gap to `goal0` over `at0` time units.
///
/// ```text
/// gap0  = goal0 - stock0
/// flow0 = gap0 / at0        (flow0 -> stock0)
/// ```
///
/// Seeded with `stock0 = 100`, `goal0 = 20`, `at0 = 5`.
pub fn first_order_negative(model: &mut Model) -> SimResult<()> {
    model.add_stock("stock0", 100.0)?;
    model.add_flow("flow0", Computation::new(Function::Division, ["gap0", "at0"]))?;
    model.add_causality("flow0", "stock0")?;

    model.add_parameter("goal0", 20.0)?;
    model.add_variable("gap0", Computation::new(Function::Subtract, ["goal0", "stock0"]))?;
    model.add_causality_with("stock0", "gap0", Causality::with_polarity(Polarity::Negative))?;
    model.add_causality_with("goal0", "gap0", Causality::with_polarity(Polarity::Positive))?;

    model.add_parameter("at0", 5.0)?;
    model.add_causality_with("gap0", "flow0", Causality::with_polarity(Polarity::Positive))?;
    model.add_causality_with("at0", "flow0", Causality::with_polarity(Polarity::Negative))?;
    Ok(())
}

/// Reinforcing loop: `stock1` grows by `growth_rate` of itself per time unit.
///
/// ```text
/// flow1 = growth_rate * stock1   (flow1 -> stock1)
/// ```
pub fn first_order_positive(model: &mut Model, initial: f64, growth_rate: f64) -> SimResult<()> {
    model.add_stock("stock1", initial)?;
    model.add_flow("flow1", Computation::new(Function::linear(growth_rate, 0.0), ["stock1"]))?;
    model.add_causality_with("flow1", "stock1", Causality::with_polarity(Polarity::Positive))?;
    model.add_causality_with("stock1", "flow1", Causality::with_polarity(Polarity::Positive))?;
    Ok(())
}
