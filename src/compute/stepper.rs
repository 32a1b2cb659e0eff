//! One explicit Euler step over the whole model.
use super::evaluator::Evaluator;
use super::ledger::{ComputationError, Ledger};
use crate::config::IdleStockPolicy;
use crate::graph::{ElementId, ElementKind, Model};
use std::collections::BTreeMap;

/// What a committed step did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// `dt * value` for every flow, in element order.
    pub flow_amounts: Vec<(ElementId, f64)>,
    /// Net change applied to each stock a flow targeted.
    pub stock_changes: Vec<(ElementId, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct Stepper {
    ledger: Ledger,
    idle_stock: IdleStockPolicy,
}

impl Stepper {
    pub fn new(idle_stock: IdleStockPolicy) -> Self {
        Self { ledger: Ledger::new(), idle_stock }
    }

    pub fn idle_stock(&self) -> IdleStockPolicy { self.idle_stock }

    /// Advances the model by `dt`.
    ///
    /// Every value is computed before any history is touched, so a failure
    /// leaves the model exactly as it was before the call.
    pub fn step(&mut self, model: &mut Model, dt: f64) -> Result<StepReport, ComputationError> {
        self.ledger.reset(model.len());
        let flows = model.ids_of_kind(ElementKind::Flow);

        // 1. Resolve flows, then everything else that is not a stock so
        //    elements unreachable from any flow still get one sample per step.
        let mut flow_amounts = Vec::with_capacity(flows.len());
        {
            let mut evaluator = Evaluator::new(model, &mut self.ledger);
            for &flow in &flows {
                flow_amounts.push((flow, dt * evaluator.resolve(flow)?));
            }
            for id in model.ids() {
                if model.element_at(id).kind != ElementKind::Stock {
                    evaluator.resolve(id)?;
                }
            }
        }

        // 2. Aggregate per-stock net change.
        let mut totals: BTreeMap<ElementId, f64> = BTreeMap::new();
        for &(flow, amount) in &flow_amounts {
            for &stock in model.flow_target_ids(flow) {
                *totals.entry(stock).or_insert(0.0) += amount;
            }
        }

        let mut stock_updates = Vec::with_capacity(totals.len());
        for (&stock, &total) in &totals {
            let element = model.element_at(stock);
            let current = element
                .current()
                .ok_or_else(|| ComputationError::MissingValue { element: element.name.clone() })?;
            stock_updates.push((stock, current + total));
        }

        // 3. Commit. Nothing below can fail.
        for (id, value) in self.ledger.resolved() {
            model.push_sample(id, value);
        }
        for &(stock, value) in &stock_updates {
            model.push_sample(stock, value);
        }
        if self.idle_stock == IdleStockPolicy::Hold {
            for stock in model.ids_of_kind(ElementKind::Stock) {
                if totals.contains_key(&stock) {
                    continue;
                }
                if let Some(value) = model.element_at(stock).current() {
                    model.push_sample(stock, value);
                }
            }
        }

        Ok(StepReport {
            flow_amounts,
            stock_changes: totals.into_iter().collect(),
        })
    }
}
