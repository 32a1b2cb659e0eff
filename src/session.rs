//! The simulation driver: owns a model and its timing, runs it, and exposes
//! the recorded histories to plotting and reporting consumers.

use crate::compute::{StepReport, Stepper};
use crate::config::SessionConfig;
use crate::error::SimResult;
use crate::graph::{topology, Model};
use tracing::{debug, info, warn};

/// How many steps a call to [`Session::run`] should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunLength {
    /// `floor(duration / dt)` from the session config.
    #[default]
    Configured,
    /// Exactly this many steps. Zero is a valid, explicit no-op.
    Steps(usize),
}

#[derive(Debug, Clone)]
pub struct Session {
    model: Model,
    config: SessionConfig,
    stepper: Stepper,
    steps_taken: usize,
}

impl Session {
    /// Takes exclusive ownership of `model` after validating both the
    /// configuration and the model structure.
    pub fn new(model: Model, config: SessionConfig) -> SimResult<Self> {
        config.validate()?;
        topology::validate(&model)?;
        Ok(Self {
            stepper: Stepper::new(config.idle_stock),
            model,
            config,
            steps_taken: 0,
        })
    }

    /// Advances the model by one `dt`. On error nothing from this step is
    /// recorded and the step counter is unchanged.
    pub fn step(&mut self) -> SimResult<StepReport> {
        let step = self.steps_taken + 1;
        match self.stepper.step(&mut self.model, self.config.dt) {
            Ok(report) => {
                self.steps_taken = step;
                debug!(
                    step,
                    time = self.time(),
                    flows = report.flow_amounts.len(),
                    stocks_changed = report.stock_changes.len(),
                    "Step committed"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(step, error = %e, "Step aborted, nothing committed");
                Err(e.into())
            }
        }
    }

    /// Runs the requested number of steps and returns how many were taken.
    /// Stops at the first failing step; earlier steps stay committed.
    pub fn run(&mut self, length: RunLength) -> SimResult<usize> {
        let steps = match length {
            RunLength::Configured => self.total_steps(),
            RunLength::Steps(n) => n,
        };
        info!(steps, dt = self.config.dt, elements = self.model.len(), "Simulation run started");

        for _ in 0..steps {
            self.step()?;
        }

        info!(steps, time = self.time(), "Simulation run finished");
        Ok(steps)
    }

    // --- Queries ---

    pub fn config(&self) -> &SessionConfig { &self.config }
    pub fn model(&self) -> &Model { &self.model }
    pub fn into_model(self) -> Model { self.model }

    pub fn total_steps(&self) -> usize { self.config.total_steps() }
    pub fn steps_taken(&self) -> usize { self.steps_taken }

    /// Simulated time reached so far.
    pub fn time(&self) -> f64 { self.steps_taken as f64 * self.config.dt }

    /// The time of every sample of a seeded, step-aligned element:
    /// `0, dt, 2*dt, ...` up to the current time.
    pub fn times(&self) -> Vec<f64> {
        (0..=self.steps_taken).map(|i| i as f64 * self.config.dt).collect()
    }

    pub fn history(&self, name: &str) -> SimResult<&[f64]> {
        self.model.history(name)
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> + '_ {
        self.model.elements()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ComputationError, Function};
    use crate::config::IdleStockPolicy;
    use crate::error::ModelError;
    use crate::graph::Computation;

    fn draining_tank() -> Model {
        let mut model = Model::new();
        model.add_stock("tank", 100.0).unwrap();
        model.add_flow("drain", Computation::new(Function::linear(-0.5, 0.0), ["tank"])).unwrap();
        model.add_causality("drain", "tank").unwrap();
        model.add_causality("tank", "drain").unwrap();
        model
    }

    #[test]
    fn test_run_configured_length() {
        let mut session = Session::new(draining_tank(), SessionConfig::new(0.5, 3.0)).unwrap();
        assert_eq!(session.run(RunLength::Configured).unwrap(), 6);
        assert_eq!(session.steps_taken(), 6);
        assert_eq!(session.history("tank").unwrap().len(), 7);
        assert_eq!(session.history("drain").unwrap().len(), 6);
        assert_eq!(session.times(), [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
        assert_eq!(session.time(), 3.0);
    }

    #[test]
    fn test_run_zero_steps_explicitly() {
        let mut session = Session::new(draining_tank(), SessionConfig::new(0.5, 3.0)).unwrap();
        assert_eq!(session.run(RunLength::Steps(0)).unwrap(), 0);
        assert_eq!(session.history("tank").unwrap(), [100.0]);

        let mut session = Session::new(draining_tank(), SessionConfig::new(0.5, 0.0)).unwrap();
        assert_eq!(session.run(RunLength::Configured).unwrap(), 0);
        assert!(session.history("drain").unwrap().is_empty());
    }

    #[test]
    fn test_runs_accumulate() {
        let mut session = Session::new(draining_tank(), SessionConfig::default()).unwrap();
        session.run(RunLength::Steps(2)).unwrap();
        session.step().unwrap();
        assert_eq!(session.steps_taken(), 3);
        assert_eq!(session.history("tank").unwrap(), [100.0, 87.5, 76.5625, 66.9921875]);
    }

    #[test]
    fn test_rejects_invalid_config_and_structure() {
        let err = Session::new(draining_tank(), SessionConfig::new(-1.0, 10.0)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration { .. }));

        // Too many steps to count.
        let err = Session::new(draining_tank(), SessionConfig::new(1e-300, 1e300)).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration { .. }));

        let mut model = draining_tank();
        model.add_variable("loop_a", Computation::new(Function::IDENTITY, ["loop_b"])).unwrap();
        model.add_variable("loop_b", Computation::new(Function::IDENTITY, ["loop_a"])).unwrap();
        let err = Session::new(model, SessionConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::Computation(ComputationError::CycleDetected { .. })));
    }

    #[test]
    fn test_failed_step_keeps_counter_and_histories() {
        let mut model = draining_tank();
        // Valid structure, but the divisor reaches zero after two steps.
        model.add_parameter("base", 2.0).unwrap();
        model.add_variable("countdown", Computation::new(Function::Subtract, ["base", "clock"])).unwrap();
        model.add_stock("clock", 0.0).unwrap();
        model.add_parameter("tick", 1.0).unwrap();
        model.add_flow("advance", Computation::new(Function::IDENTITY, ["tick"])).unwrap();
        model.add_causality("advance", "clock").unwrap();
        model.add_variable("ratio", Computation::new(Function::Division, ["tank", "countdown"])).unwrap();

        let mut session = Session::new(model, SessionConfig::new(1.0, 10.0)).unwrap();
        let err = session.run(RunLength::Configured).unwrap_err();
        assert!(matches!(err, ModelError::Computation(ComputationError::DivisionByZero { .. })));
        assert_eq!(session.steps_taken(), 2);
        assert_eq!(session.history("clock").unwrap(), [0.0, 1.0, 2.0]);
        assert_eq!(session.history("ratio").unwrap().len(), 2);
        assert_eq!(session.history("tank").unwrap().len(), 3);
    }

    #[test]
    fn test_skip_policy_from_config() {
        let mut model = draining_tank();
        model.add_stock("untouched", 1.0).unwrap();
        let config = SessionConfig::new(1.0, 4.0).with_idle_stock(IdleStockPolicy::Skip);

        let mut session = Session::new(model, config).unwrap();
        session.run(RunLength::Configured).unwrap();
        assert_eq!(session.history("untouched").unwrap(), [1.0]);
        assert_eq!(session.history("tank").unwrap().len(), 5);
    }

    #[test]
    fn test_unknown_element_query() {
        let session = Session::new(draining_tank(), SessionConfig::default()).unwrap();
        assert!(matches!(session.history("ghost"), Err(ModelError::UnknownElement(_))));
        assert_eq!(session.elements().collect::<Vec<_>>(), ["tank", "drain"]);
    }
}
