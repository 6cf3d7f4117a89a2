//! Lifecycle hooks for observing a simulation run.
//!
//! Hooks are **observers**: they receive owned snapshots of simulation
//! state at lifecycle points and cannot mutate anything. Owned data keeps
//! hooks free of lifetime entanglement — they can store, forward, or
//! serialize what they receive.
//!
//! The built-in [`SaleLogDrain`] forwards sale events over a bounded
//! channel to a logging thread, so a slow consumer can never stall the
//! serial resolution phase: when the channel is full the event is dropped
//! (logging here is best-effort by contract).

use crate::runner::{SimulationStats, YearlySummary};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info};
use sim_core::Sale;
use std::thread;
use types::Date;

// ─────────────────────────────────────────────────────────────────────────────
// Hook Context
// ─────────────────────────────────────────────────────────────────────────────

/// Snapshot passed to every hook invocation.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Current simulation month.
    pub date: Date,
    /// Counters as of the hook call.
    pub stats: SimulationStats,
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Observer of simulation lifecycle events. All methods default to no-ops;
/// implement the ones you care about.
pub trait SimulationHook: Send + Sync {
    /// Identifying name, used in error messages.
    fn name(&self) -> &str;

    /// Once per run, before the first year begins.
    fn before_first_year(&self, _ctx: &HookContext) {}

    /// Before each year's supply generation.
    fn before_year(&self, _year: i32, _ctx: &HookContext) {}

    /// Before each monthly clear.
    fn before_month(&self, _ctx: &HookContext) {}

    /// After a monthly clear, with the month's sales.
    fn on_sales(&self, _sales: Vec<Sale>, _ctx: &HookContext) {}

    /// After each month's bookkeeping.
    fn after_month(&self, _ctx: &HookContext) {}

    /// After each year, with the yearly summary.
    fn after_year(&self, _summary: &YearlySummary, _ctx: &HookContext) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook Runner
// ─────────────────────────────────────────────────────────────────────────────

/// Dispatches lifecycle events to registered hooks, in registration order.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Box<dyn SimulationHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, hook: Box<dyn SimulationHook>) {
        debug!("registered hook {}", hook.name());
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn before_first_year(&self, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.before_first_year(ctx);
        }
    }

    pub fn before_year(&self, year: i32, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.before_year(year, ctx);
        }
    }

    pub fn before_month(&self, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.before_month(ctx);
        }
    }

    pub fn on_sales(&self, sales: &[Sale], ctx: &HookContext) {
        for hook in &self.hooks {
            hook.on_sales(sales.to_vec(), ctx);
        }
    }

    pub fn after_month(&self, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.after_month(ctx);
        }
    }

    pub fn after_year(&self, summary: &YearlySummary, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.after_year(summary, ctx);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sale Log Drain
// ─────────────────────────────────────────────────────────────────────────────

/// Forwards sales to a background logging thread over a bounded channel.
pub struct SaleLogDrain {
    tx: Sender<Sale>,
}

impl SaleLogDrain {
    /// Spawn the drain thread and return the hook plus its join handle.
    /// The thread exits when the hook (and its sender) is dropped.
    pub fn spawn(capacity: usize) -> (Self, thread::JoinHandle<u64>) {
        let (tx, rx): (Sender<Sale>, Receiver<Sale>) = bounded(capacity);
        let handle = thread::spawn(move || {
            let mut drained = 0u64;
            for sale in rx.iter() {
                debug!(
                    "sale drained: {} -> {} at ${:.0} ({})",
                    sale.dwelling, sale.buyer, sale.price, sale.date
                );
                drained += 1;
            }
            info!("sale log drain closed after {} sales", drained);
            drained
        });
        (Self { tx }, handle)
    }
}

impl SimulationHook for SaleLogDrain {
    fn name(&self) -> &str {
        "SaleLogDrain"
    }

    fn on_sales(&self, sales: Vec<Sale>, _ctx: &HookContext) {
        for sale in sales {
            // Best-effort: a full channel drops the event rather than
            // blocking resolution.
            let _ = self.tx.try_send(sale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use types::{DwellingId, HouseholdId};

    struct SaleCounter {
        count: Arc<AtomicUsize>,
    }

    impl SimulationHook for SaleCounter {
        fn name(&self) -> &str {
            "SaleCounter"
        }

        fn on_sales(&self, sales: Vec<Sale>, _ctx: &HookContext) {
            self.count.fetch_add(sales.len(), Ordering::Relaxed);
        }
    }

    fn sale() -> Sale {
        Sale {
            buyer: HouseholdId(1),
            dwelling: DwellingId(2),
            price: 120_000.0,
            date: Date::new(1986, 3),
        }
    }

    fn hook_ctx() -> HookContext {
        HookContext {
            date: Date::new(1986, 3),
            stats: SimulationStats::default(),
        }
    }

    #[test]
    fn test_hook_runner_dispatches_sales() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut runner = HookRunner::new();
        runner.add(Box::new(SaleCounter { count: count.clone() }));
        runner.on_sales(&[sale(), sale()], &hook_ctx());
        runner.on_sales(&[sale()], &hook_ctx());
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_sale_log_drain_receives_events() {
        let (drain, handle) = SaleLogDrain::spawn(16);
        drain.on_sales(vec![sale(), sale(), sale()], &hook_ctx());
        drop(drain);
        assert_eq!(handle.join().unwrap(), 3);
    }
}
