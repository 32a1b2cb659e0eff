use super::model::Model;
use super::node::{ElementId, ElementKind};
use crate::compute::ComputationError;
use crate::error::{ModelError, SimResult};

/// Checks that a model can be stepped before any value is computed.
///
/// Rejects:
/// - stocks and constants with no recorded value (`EmptyHistory`),
/// - computations with the wrong number of arguments or an argument name that
///   does not resolve,
/// - dependency cycles that do not pass through a stock.
pub fn validate(model: &Model) -> SimResult<()> {
    for id in model.ids() {
        let element = model.element_at(id);
        let needs_seed = element.is_stock() || element.is_constant();
        if needs_seed && element.current().is_none() {
            return Err(ModelError::EmptyHistory(element.name.clone()));
        }

        if let Some(computation) = &element.computation {
            let function = computation.function;
            if computation.args.len() != function.arity() {
                return Err(ComputationError::ArityMismatch {
                    element: element.name.clone(),
                    function: function.name(),
                    expected: function.arity(),
                    actual: computation.args.len(),
                }
                .into());
            }
            if let Some(missing) = computation.args.iter().find(|a| model.lookup(a).is_none()) {
                return Err(ComputationError::UnknownArgument {
                    element: element.name.clone(),
                    argument: missing.clone(),
                }
                .into());
            }
        }
    }

    let mut state = vec![VisitState::None; model.len()];
    for id in model.ids() {
        if state[id.index()] == VisitState::None {
            visit(id, model, &mut state)?;
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}

// Depth-first walk over computation arguments. Stocks are leaves: reading a
// stock never recurses, so any cycle through one is broken there.
fn visit(id: ElementId, model: &Model, state: &mut [VisitState]) -> Result<(), ComputationError> {
    let idx = id.index();
    match state[idx] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            return Err(ComputationError::CycleDetected { element: model.element_at(id).name.clone() })
        }
        VisitState::None => state[idx] = VisitState::Visiting,
    }

    let element = model.element_at(id);
    if element.kind != ElementKind::Stock {
        if let Some(computation) = &element.computation {
            for arg in &computation.args {
                if let Some(arg_id) = model.lookup(arg) {
                    visit(arg_id, model, state)?;
                }
            }
        }
    }

    state[idx] = VisitState::Visited;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Function;
    use crate::graph::{Computation, Model};

    #[test]
    fn test_cycle_through_stock_is_accepted() {
        // level -> outflow -> level, broken at the stock.
        let mut model = Model::new();
        model.add_stock("level", 50.0).unwrap();
        model.add_flow("outflow", Computation::new(Function::linear(-0.5, 0.0), ["level"])).unwrap();
        model.add_causality("outflow", "level").unwrap();
        model.add_causality("level", "outflow").unwrap();

        assert!(validate(&model).is_ok());
    }

    #[test]
    fn test_cycle_without_stock_is_rejected() {
        let mut model = Model::new();
        model.add_variable("a", Computation::new(Function::IDENTITY, ["b"])).unwrap();
        model.add_variable("b", Computation::new(Function::IDENTITY, ["a"])).unwrap();

        let err = validate(&model).unwrap_err();
        assert!(matches!(err, ModelError::Computation(ComputationError::CycleDetected { .. })));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let mut model = Model::new();
        model.add_flow("f", Computation::new(Function::linear(0.5, 1.0), ["f"])).unwrap();

        let err = validate(&model).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Computation(ComputationError::CycleDetected { element }) if element == "f"
        ));
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        let mut model = Model::new();
        model.add_variable("gap", Computation::new(Function::Subtract, ["goal", "level"])).unwrap();
        model.add_parameter("goal", 1.0).unwrap();

        let err = validate(&model).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Computation(ComputationError::UnknownArgument { argument, .. }) if argument == "level"
        ));
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let mut model = Model::new();
        model.add_parameter("x", 1.0).unwrap();
        model.add_variable("bad", Computation::new(Function::Division, ["x"])).unwrap();

        let err = validate(&model).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Computation(ComputationError::ArityMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_unseeded_stock_and_constant_are_rejected() {
        let mut model = Model::new();
        model.add_element("s", ElementKind::Stock, None, None).unwrap();
        assert!(matches!(validate(&model), Err(ModelError::EmptyHistory(name)) if name == "s"));

        let mut model = Model::new();
        model.add_element("p", ElementKind::Parameter, None, None).unwrap();
        assert!(matches!(validate(&model), Err(ModelError::EmptyHistory(name)) if name == "p"));
    }
}
