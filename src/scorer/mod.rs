pub mod setup;

use crate::columns::{ClusterGoal, ColumnSpec, MixGoal};
use crate::error::GfResult;
use crate::table::ParticipantTable;
use serde::Serialize;

pub type GroupId = u32;

/// A mix-kind ColumnSpec projected onto the participant table: raw values
/// interned to dense codes, with the per-value totals the cost formulas need.
pub struct MixColumn {
    pub column: usize,
    /// Weight magnitude; the sign already went into `goal`.
    pub weight: f64,
    pub goal: MixGoal,
    /// Participant index -> interned value code.
    pub codes: Vec<u32>,
    /// Code -> raw value, for reports.
    pub labels: Vec<String>,
    /// Code -> occurrences across the whole table.
    pub totals: Vec<f64>,
    /// Code -> even-distribution target per group (`totals / num_groups`).
    pub expected: Vec<f64>,
}

/// A cluster-kind ColumnSpec projected onto the table: values parsed eagerly.
pub struct ClusterColumn {
    pub column: usize,
    pub weight: f64,
    pub goal: ClusterGoal,
    /// Participant index -> numeric value.
    pub values: Vec<f64>,
    /// `(max - min)^2 / 4`. Popoviciu's inequality caps the population
    /// variance of any subset, so `cap - variance` stays non-negative and
    /// gives the dispersal objective something to minimize.
    pub spread_cap: f64,
}

/// The immutable cost model: every prepared column objective plus the table
/// dimensions. Shared read-only across restart chains.
pub struct Scorer {
    pub num_groups: usize,
    pub num_participants: usize,
    pub mix_columns: Vec<MixColumn>,
    pub cluster_columns: Vec<ClusterColumn>,
}

/// Incremental bookkeeping for one candidate assignment: per-group value
/// counts for mix columns, running sum / sum-of-squares for cluster columns.
/// Updated in O(#specs) per applied swap; rebuilt from scratch only in tests
/// (drift checks) and once at the end of a run for the exact reported cost.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub sizes: Vec<u32>,
    /// One flattened `[group * num_values + code]` table per mix column.
    pub mix_counts: Vec<Vec<u32>>,
    /// Per cluster column, per group.
    pub sums: Vec<Vec<f64>>,
    pub sum_sqs: Vec<Vec<f64>>,
}

/// One row of the per-objective cost report.
#[derive(Debug, Clone, Serialize)]
pub struct SpecContribution {
    pub column: usize,
    pub objective: String,
    pub weight: f64,
    pub cost: f64,
}

#[inline]
fn population_variance(sum: f64, sum_sq: f64, n: u32) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let n = n as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

impl GroupStats {
    pub fn build(scorer: &Scorer, assignment: &[GroupId]) -> Self {
        let n = scorer.num_groups;

        let mut sizes = vec![0u32; n];
        for &g in assignment {
            sizes[g as usize] += 1;
        }

        let mix_counts = scorer
            .mix_columns
            .iter()
            .map(|mc| {
                let values = mc.labels.len();
                let mut counts = vec![0u32; n * values];
                for (p, &g) in assignment.iter().enumerate() {
                    counts[g as usize * values + mc.codes[p] as usize] += 1;
                }
                counts
            })
            .collect();

        let mut sums = Vec::with_capacity(scorer.cluster_columns.len());
        let mut sum_sqs = Vec::with_capacity(scorer.cluster_columns.len());
        for cc in &scorer.cluster_columns {
            let mut sum = vec![0.0f64; n];
            let mut sum_sq = vec![0.0f64; n];
            for (p, &g) in assignment.iter().enumerate() {
                let x = cc.values[p];
                sum[g as usize] += x;
                sum_sq[g as usize] += x * x;
            }
            sums.push(sum);
            sum_sqs.push(sum_sq);
        }

        GroupStats {
            sizes,
            mix_counts,
            sums,
            sum_sqs,
        }
    }

    /// Moves participant `a` into `b`'s group and vice versa. Must be called
    /// while `assignment` still holds the pre-swap groups. Group sizes are
    /// untouched: a swap preserves the balanced partition by construction.
    pub fn apply_swap(&mut self, scorer: &Scorer, assignment: &[GroupId], a: usize, b: usize) {
        let ga = assignment[a] as usize;
        let gb = assignment[b] as usize;
        if ga == gb {
            return;
        }

        for (k, mc) in scorer.mix_columns.iter().enumerate() {
            let ca = mc.codes[a] as usize;
            let cb = mc.codes[b] as usize;
            if ca == cb {
                continue;
            }
            let values = mc.labels.len();
            let counts = &mut self.mix_counts[k];
            counts[ga * values + ca] -= 1;
            counts[gb * values + ca] += 1;
            counts[gb * values + cb] -= 1;
            counts[ga * values + cb] += 1;
        }

        for (k, cc) in scorer.cluster_columns.iter().enumerate() {
            let xa = cc.values[a];
            let xb = cc.values[b];
            if xa == xb {
                continue;
            }
            self.sums[k][ga] += xb - xa;
            self.sums[k][gb] += xa - xb;
            self.sum_sqs[k][ga] += xb * xb - xa * xa;
            self.sum_sqs[k][gb] += xa * xa - xb * xb;
        }
    }
}

impl Scorer {
    pub fn new(
        table: &ParticipantTable,
        num_groups: usize,
        mix_specs: &[ColumnSpec],
        cluster_specs: &[ColumnSpec],
    ) -> GfResult<Self> {
        setup::build_scorer(table, num_groups, mix_specs, cluster_specs)
    }

    /// Full cost of an assignment, computed from scratch out of its stats.
    /// Non-negative; 0 for an empty spec list, whatever the assignment.
    pub fn cost(&self, stats: &GroupStats) -> f64 {
        let mut total = 0.0;
        for (k, mc) in self.mix_columns.iter().enumerate() {
            total += mc.weight * mix_cost(mc, &stats.mix_counts[k], self.num_groups);
        }
        for (k, cc) in self.cluster_columns.iter().enumerate() {
            total += cc.weight * cluster_cost(cc, &stats.sums[k], &stats.sum_sqs[k], &stats.sizes);
        }
        total
    }

    /// Per-objective contributions, in spec order (mix first, then cluster).
    pub fn cost_breakdown(&self, stats: &GroupStats) -> Vec<SpecContribution> {
        let mut out = Vec::with_capacity(self.mix_columns.len() + self.cluster_columns.len());
        for (k, mc) in self.mix_columns.iter().enumerate() {
            out.push(SpecContribution {
                column: mc.column,
                objective: match mc.goal {
                    MixGoal::Spread => "spread",
                    MixGoal::Concentrate => "concentrate",
                }
                .to_string(),
                weight: mc.weight,
                cost: mc.weight * mix_cost(mc, &stats.mix_counts[k], self.num_groups),
            });
        }
        for (k, cc) in self.cluster_columns.iter().enumerate() {
            out.push(SpecContribution {
                column: cc.column,
                objective: match cc.goal {
                    ClusterGoal::Tighten => "cluster",
                    ClusterGoal::Disperse => "disperse",
                }
                .to_string(),
                weight: cc.weight,
                cost: cc.weight
                    * cluster_cost(cc, &stats.sums[k], &stats.sum_sqs[k], &stats.sizes),
            });
        }
        out
    }

    /// Cost change if participants `a` and `b` traded groups, without touching
    /// the stats. O(#specs); the full rebuild is never needed in the loop.
    pub fn swap_delta(&self, stats: &GroupStats, assignment: &[GroupId], a: usize, b: usize) -> f64 {
        let ga = assignment[a] as usize;
        let gb = assignment[b] as usize;
        if ga == gb {
            return 0.0;
        }

        let mut delta = 0.0;

        for (k, mc) in self.mix_columns.iter().enumerate() {
            let ca = mc.codes[a] as usize;
            let cb = mc.codes[b] as usize;
            if ca == cb {
                continue;
            }
            let values = mc.labels.len();
            let counts = &stats.mix_counts[k];

            let cell = |code: usize, group: usize, change: f64| -> f64 {
                let before = counts[group * values + code] as f64;
                let after = before + change;
                match mc.goal {
                    MixGoal::Spread => {
                        let e = mc.expected[code];
                        (after - e) * (after - e) - (before - e) * (before - e)
                    }
                    // Concentration carries -sum(count^2); the per-value
                    // total^2 terms are constants and cancel out of deltas.
                    MixGoal::Concentrate => before * before - after * after,
                }
            };

            delta += mc.weight
                * (cell(ca, ga, -1.0) + cell(cb, ga, 1.0) + cell(ca, gb, 1.0) + cell(cb, gb, -1.0));
        }

        for (k, cc) in self.cluster_columns.iter().enumerate() {
            let xa = cc.values[a];
            let xb = cc.values[b];
            if xa == xb {
                continue;
            }
            let sums = &stats.sums[k];
            let sqs = &stats.sum_sqs[k];
            let na = stats.sizes[ga];
            let nb = stats.sizes[gb];

            let old = population_variance(sums[ga], sqs[ga], na)
                + population_variance(sums[gb], sqs[gb], nb);
            let new = population_variance(sums[ga] - xa + xb, sqs[ga] - xa * xa + xb * xb, na)
                + population_variance(sums[gb] - xb + xa, sqs[gb] - xb * xb + xa * xa, nb);

            delta += match cc.goal {
                ClusterGoal::Tighten => cc.weight * (new - old),
                ClusterGoal::Disperse => cc.weight * (old - new),
            };
        }

        delta
    }
}

fn mix_cost(mc: &MixColumn, counts: &[u32], num_groups: usize) -> f64 {
    let values = mc.labels.len();
    match mc.goal {
        // Squared deviation from the even-distribution target, every
        // (group, value) cell counted.
        MixGoal::Spread => {
            let mut acc = 0.0;
            for g in 0..num_groups {
                for code in 0..values {
                    let d = counts[g * values + code] as f64 - mc.expected[code];
                    acc += d * d;
                }
            }
            acc
        }
        // sum(total^2) - sum(count^2): zero exactly when every value sits in
        // a single group, and moving a value toward its majority group always
        // lowers it. The two goals minimize mirror-image objectives in
        // sum(count^2).
        MixGoal::Concentrate => {
            let base: f64 = mc.totals.iter().map(|t| t * t).sum();
            let mut sq = 0.0;
            for &c in counts {
                let c = c as f64;
                sq += c * c;
            }
            base - sq
        }
    }
}

fn cluster_cost(cc: &ClusterColumn, sums: &[f64], sum_sqs: &[f64], sizes: &[u32]) -> f64 {
    let mut acc = 0.0;
    for (g, &n) in sizes.iter().enumerate() {
        let var = population_variance(sums[g], sum_sqs[g], n);
        acc += match cc.goal {
            ClusterGoal::Tighten => var,
            ClusterGoal::Disperse => (cc.spread_cap - var).max(0.0),
        };
    }
    acc
}
