use crate::reports;
use clap::Args;
use groupforge::columns::{self, SpecKind};
use groupforge::config::SearchParams;
use groupforge::error::{GfResult, GroupForgeError};
use groupforge::optimizer::{OptimizationOptions, Optimizer};
use groupforge::scorer::{GroupStats, Scorer, SpecContribution};
use groupforge::table::ParticipantTable;
use serde::Serialize;
use std::fs::File;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Delimited file with one participant per row.
    pub input: String,

    #[command(flatten)]
    pub search: SearchParams,

    /// Spread the values of a column evenly across groups (COL[:WEIGHT]);
    /// a negative weight concentrates the values instead.
    #[arg(short = 'm', long = "mix", value_name = "COL[:WEIGHT]")]
    pub mix: Vec<String>,

    /// Keep similar numeric values of a column in the same group
    /// (COL[:WEIGHT]); a negative weight disperses them instead.
    #[arg(short = 'c', long = "cluster", value_name = "COL[:WEIGHT]")]
    pub cluster: Vec<String>,

    /// Write the table with a group column appended.
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Write a JSON run summary.
    #[arg(long)]
    pub summary: Option<String>,

    /// Column shown for each member in the printed report.
    #[arg(long, default_value_t = 0)]
    pub label: usize,
}

#[derive(Serialize)]
struct RunSummary {
    num_groups: usize,
    participants: usize,
    iterations: usize,
    strategy: &'static str,
    initial_cost: f64,
    final_cost: f64,
    accepted_moves: usize,
    group_sizes: Vec<u32>,
    contributions: Vec<SpecContribution>,
}

pub fn run(args: SplitArgs, delimiter: u8, headers: bool) -> GfResult<()> {
    info!("📂 Loading participants from {}", args.input);
    let table = ParticipantTable::load_from_file(&args.input, delimiter, headers)?;
    info!(
        "   {} participants, {} columns",
        table.len(),
        table.column_count()
    );

    if args.label >= table.column_count() {
        return Err(GroupForgeError::Config(format!(
            "label column {} is out of range (table has {} columns)",
            args.label,
            table.column_count()
        )));
    }

    let mix_specs = columns::parse_specs(&args.mix, SpecKind::Mix)?;
    let cluster_specs = columns::parse_specs(&args.cluster, SpecKind::Cluster)?;

    let scorer = Arc::new(Scorer::new(
        &table,
        args.search.groups,
        &mix_specs,
        &cluster_specs,
    )?);

    let options = OptimizationOptions::from(&args.search);
    let optimizer = Optimizer::new(scorer.clone(), options);
    let result = optimizer.run()?;

    let stats = GroupStats::build(&scorer, &result.assignment);
    let contributions = scorer.cost_breakdown(&stats);

    reports::print_groups(&table, &result.assignment, scorer.num_groups, args.label);
    reports::print_breakdown(&contributions, result.cost);
    info!(
        "🏁 Cost {:.4} (initial {:.4}), accepted {} of {} moves",
        result.cost, result.initial_cost, result.accepted, result.iterations
    );

    if let Some(path) = &args.output {
        table.write_with_groups(path, delimiter, &result.assignment)?;
        info!("📝 Wrote {}", path);
    }

    if let Some(path) = &args.summary {
        let summary = RunSummary {
            num_groups: scorer.num_groups,
            participants: scorer.num_participants,
            iterations: result.iterations,
            strategy: if args.search.anneal {
                "simulated-annealing"
            } else {
                "hill-climb"
            },
            initial_cost: result.initial_cost,
            final_cost: result.cost,
            accepted_moves: result.accepted,
            group_sizes: stats.sizes.clone(),
            contributions,
        };
        serde_json::to_writer_pretty(File::create(path)?, &summary)?;
        info!("📊 Wrote {}", path);
    }

    Ok(())
}
