use super::{Replica, Strategy};
use crate::config::SearchParams;
use crate::error::{GfResult, GroupForgeError};
use crate::scorer::{GroupId, GroupStats, Scorer};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct OptimizationOptions {
    pub iterations: usize,
    pub strategy: Strategy,
    /// Independent restart chains; the best final cost wins.
    pub restarts: usize,
    pub seed: Option<u64>,
}

impl From<&SearchParams> for OptimizationOptions {
    fn from(params: &SearchParams) -> Self {
        let strategy = if params.anneal {
            Strategy::Anneal {
                temp_max: params.temp_max,
                temp_min: params.temp_min,
            }
        } else {
            Strategy::HillClimb
        };
        Self {
            iterations: params.iterations,
            strategy,
            restarts: params.restarts,
            seed: params.seed,
        }
    }
}

impl OptimizationOptions {
    pub fn validate(&self) -> GfResult<()> {
        if self.restarts == 0 {
            return Err(GroupForgeError::Config(
                "at least one restart chain is required".to_string(),
            ));
        }
        if let Strategy::Anneal { temp_max, temp_min } = self.strategy {
            // The floor keeps exp(-delta/T) well-defined at the last iteration.
            if temp_min <= 0.0 {
                return Err(GroupForgeError::Config(
                    "temp-min must be positive".to_string(),
                ));
            }
            if temp_max < temp_min {
                return Err(GroupForgeError::Config(
                    "temp-max must be at least temp-min".to_string(),
                ));
            }
        }
        Ok(())
    }
}

pub struct OptimizationResult {
    /// Best cost found, recomputed from scratch (see `Optimizer::run`).
    pub cost: f64,
    /// Cost of the winning chain's starting assignment.
    pub initial_cost: f64,
    pub assignment: Vec<GroupId>,
    /// Accepted moves in the winning chain.
    pub accepted: usize,
    pub iterations: usize,
}

pub struct Optimizer {
    scorer: Arc<Scorer>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    /// Runs every restart chain to budget exhaustion and returns the
    /// best-cost assignment seen across all of them. With a fixed seed the
    /// whole run is reproducible: chain k derives its RNG from `seed + k`
    /// and chains never exchange state mid-run.
    pub fn run(&self) -> GfResult<OptimizationResult> {
        self.options.validate()?;
        let opts = &self.options;
        let started = Instant::now();

        let chains: Vec<(Replica, usize)> = (0..opts.restarts)
            .into_par_iter()
            .map(|chain| {
                let seed = opts.seed.map(|s| s + chain as u64);
                let mut replica =
                    Replica::new(self.scorer.clone(), opts.strategy, opts.iterations, seed);

                // Epoch chunks keep progress observable without touching the
                // move loop itself.
                let epoch = (opts.iterations / 10).max(1);
                let mut accepted = 0;
                while replica.completed < replica.budget {
                    accepted += replica.evolve(epoch);
                    debug!(
                        chain,
                        completed = replica.completed,
                        cost = replica.cost,
                        best = replica.best_cost,
                        "epoch done"
                    );
                }
                (replica, accepted)
            })
            .collect();

        let mut winner: Option<&(Replica, usize)> = None;
        for entry in &chains {
            let better = match winner {
                Some((best, _)) => entry.0.best_cost < best.best_cost,
                None => true,
            };
            if better {
                winner = Some(entry);
            }
        }
        let (replica, accepted) = winner.expect("restarts >= 1 is validated above");

        // The incremental path accumulates float drift over long runs; one
        // exact rebuild pins the reported cost.
        let stats = GroupStats::build(&self.scorer, &replica.best_assignment);
        let cost = self.scorer.cost(&stats);

        info!(
            "optimization finished: {} chains x {} iterations, best cost {:.4} in {:?}",
            opts.restarts,
            opts.iterations,
            cost,
            started.elapsed()
        );

        Ok(OptimizationResult {
            cost,
            initial_cost: replica.initial_cost,
            assignment: replica.best_assignment.clone(),
            accepted: *accepted,
            iterations: opts.iterations,
        })
    }
}
