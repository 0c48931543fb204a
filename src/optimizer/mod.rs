pub mod mutation;
pub mod runner;

pub use self::runner::{OptimizationOptions, OptimizationResult, Optimizer};

use crate::scorer::{GroupId, GroupStats, Scorer};
use std::sync::Arc;

/// Move-acceptance strategy. Hill-climbing takes any non-worsening move;
/// annealing additionally takes worsening moves with the Metropolis
/// probability under a geometric cooling schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    HillClimb,
    Anneal { temp_max: f64, temp_min: f64 },
}

#[inline(always)]
fn fast_exp(x: f64) -> f64 {
    // (1 + x/256)^256. The early return keeps the base positive; beyond
    // exp(-60) the acceptance probability is indistinguishable from zero.
    if x < -60.0 {
        return 0.0;
    }
    let x = 1.0 + x / 256.0;
    let x = x * x * x * x * x * x * x * x;
    x * x
}

/// One independent search chain: owns its assignment, its incremental
/// bookkeeping and its RNG. Nothing mutable is shared between chains; only
/// final costs are compared across them.
pub struct Replica {
    pub scorer: Arc<Scorer>,
    pub strategy: Strategy,
    pub assignment: Vec<GroupId>,
    pub stats: GroupStats,
    pub cost: f64,
    /// Cost of the starting assignment, before any move.
    pub initial_cost: f64,
    pub best_cost: f64,
    pub best_assignment: Vec<GroupId>,
    /// Total planned iterations; drives the cooling schedule.
    pub budget: usize,
    /// Iterations consumed so far.
    pub completed: usize,
    pub rng: fastrand::Rng,
}

impl Replica {
    pub fn new(scorer: Arc<Scorer>, strategy: Strategy, budget: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };

        let assignment =
            mutation::shuffled_assignment(&mut rng, scorer.num_participants, scorer.num_groups);
        let stats = GroupStats::build(&scorer, &assignment);
        let cost = scorer.cost(&stats);

        Replica {
            best_cost: cost,
            best_assignment: assignment.clone(),
            scorer,
            strategy,
            assignment,
            stats,
            cost,
            initial_cost: cost,
            budget,
            completed: 0,
            rng,
        }
    }

    /// Current temperature: geometric decay from `temp_max` to `temp_min`
    /// across the budget. Clamped to the `temp_min` floor so the Metropolis
    /// exponent stays finite through the final iteration.
    pub fn temperature(&self) -> f64 {
        match self.strategy {
            Strategy::HillClimb => 0.0,
            Strategy::Anneal { temp_max, temp_min } => {
                let span = self.budget.saturating_sub(1).max(1) as f64;
                let progress = (self.completed as f64 / span).min(1.0);
                (temp_max * (temp_min / temp_max).powf(progress)).max(temp_min)
            }
        }
    }

    /// Runs up to `steps` iterations (capped by the remaining budget) and
    /// returns the number of accepted moves. Each proposal draw consumes one
    /// iteration, whether or not it produced a usable cross-group pair.
    pub fn evolve(&mut self, steps: usize) -> usize {
        let mut accepted = 0;
        let steps = steps.min(self.budget - self.completed);

        for _ in 0..steps {
            let proposal = mutation::propose_swap(&mut self.rng, &self.assignment);

            if let Some((a, b)) = proposal {
                let delta = self.scorer.swap_delta(&self.stats, &self.assignment, a, b);

                let accept = if delta <= 0.0 {
                    true
                } else {
                    match self.strategy {
                        Strategy::HillClimb => false,
                        Strategy::Anneal { .. } => {
                            let temp = self.temperature();
                            self.rng.f64() < fast_exp(-delta / temp)
                        }
                    }
                };

                if accept {
                    self.stats
                        .apply_swap(&self.scorer, &self.assignment, a, b);
                    self.assignment.swap(a, b);
                    self.cost += delta;
                    accepted += 1;

                    if self.cost < self.best_cost {
                        self.best_cost = self.cost;
                        self.best_assignment.clone_from(&self.assignment);
                    }
                }
            }

            self.completed += 1;
        }

        accepted
    }
}
