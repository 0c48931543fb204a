use crate::reports;
use clap::Args;
use groupforge::columns::{self, SpecKind};
use groupforge::error::{GfResult, GroupForgeError};
use groupforge::scorer::{GroupId, GroupStats, Scorer};
use groupforge::table::ParticipantTable;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Delimited file whose LAST column is an existing group id.
    pub input: String,

    /// Spread objectives to score against (COL[:WEIGHT]).
    #[arg(short = 'm', long = "mix", value_name = "COL[:WEIGHT]")]
    pub mix: Vec<String>,

    /// Cluster objectives to score against (COL[:WEIGHT]).
    #[arg(short = 'c', long = "cluster", value_name = "COL[:WEIGHT]")]
    pub cluster: Vec<String>,
}

/// Rebuilds the bookkeeping for a grouping produced earlier (or by hand) and
/// prints its per-objective cost. Works on arbitrary groupings; balance is
/// an optimizer invariant, not a scoring precondition.
pub fn run(args: ScoreArgs, delimiter: u8, headers: bool) -> GfResult<()> {
    info!("📂 Loading grouped table from {}", args.input);
    let full = ParticipantTable::load_from_file(&args.input, delimiter, headers)?;

    let width = full.column_count();
    let mut assignment: Vec<GroupId> = Vec::with_capacity(full.len());
    for (row, record) in full.records.iter().enumerate() {
        let raw = &record[width - 1];
        let group: GroupId = raw.trim().parse().map_err(|_| {
            GroupForgeError::Data(format!("row {}: '{}' is not a group id", row + 1, raw))
        })?;
        assignment.push(group);
    }
    let num_groups = assignment.iter().max().copied().unwrap_or(0) as usize + 1;

    // Specs address the data columns, so the trailing group column is
    // stripped before the scorer sees the table.
    let table = full.without_last_column()?;

    let mix_specs = columns::parse_specs(&args.mix, SpecKind::Mix)?;
    let cluster_specs = columns::parse_specs(&args.cluster, SpecKind::Cluster)?;

    let scorer = Scorer::new(&table, num_groups, &mix_specs, &cluster_specs)?;
    let stats = GroupStats::build(&scorer, &assignment);
    let contributions = scorer.cost_breakdown(&stats);
    let cost = scorer.cost(&stats);

    reports::print_breakdown(&contributions, cost);
    info!(
        "   {} groups, sizes {:?}",
        num_groups,
        stats.sizes
    );

    Ok(())
}
