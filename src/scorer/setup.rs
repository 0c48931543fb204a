use super::{ClusterColumn, MixColumn, Scorer};
use crate::columns::{ClusterGoal, ColumnSpec, MixGoal};
use crate::error::{GfResult, GroupForgeError};
use crate::table::ParticipantTable;
use std::collections::HashMap;
use tracing::debug;

/// Builds the immutable cost model. All configuration and data validation
/// happens here, before the first optimization iteration: bad group counts,
/// out-of-range columns, zero weights and non-numeric cluster values are
/// rejected eagerly rather than discovered mid-run.
pub fn build_scorer(
    table: &ParticipantTable,
    num_groups: usize,
    mix_specs: &[ColumnSpec],
    cluster_specs: &[ColumnSpec],
) -> GfResult<Scorer> {
    if num_groups == 0 {
        return Err(GroupForgeError::Config(
            "number of groups must be positive".to_string(),
        ));
    }
    if table.is_empty() {
        return Err(GroupForgeError::Data(
            "participant table is empty".to_string(),
        ));
    }

    let width = table.column_count();
    for spec in mix_specs.iter().chain(cluster_specs) {
        if spec.column >= width {
            return Err(GroupForgeError::Config(format!(
                "column index {} is out of range (table has {} columns)",
                spec.column, width
            )));
        }
        // The CLI parser rejects this already; API callers get the same check.
        if spec.weight == 0.0 || !spec.weight.is_finite() {
            return Err(GroupForgeError::Config(format!(
                "column {} has a zero or non-finite weight",
                spec.column
            )));
        }
    }

    let mix_columns = mix_specs
        .iter()
        .map(|spec| build_mix_column(table, num_groups, spec))
        .collect::<Vec<_>>();

    let cluster_columns = cluster_specs
        .iter()
        .map(|spec| build_cluster_column(table, spec))
        .collect::<GfResult<Vec<_>>>()?;

    debug!(
        participants = table.len(),
        groups = num_groups,
        mix = mix_columns.len(),
        cluster = cluster_columns.len(),
        "scorer ready"
    );

    Ok(Scorer {
        num_groups,
        num_participants: table.len(),
        mix_columns,
        cluster_columns,
    })
}

fn build_mix_column(table: &ParticipantTable, num_groups: usize, spec: &ColumnSpec) -> MixColumn {
    let mut index: HashMap<&str, u32> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    let mut totals: Vec<f64> = Vec::new();
    let mut codes = Vec::with_capacity(table.len());

    for record in &table.records {
        let raw = record[spec.column].as_str();
        let code = *index.entry(raw).or_insert_with(|| {
            labels.push(raw.to_string());
            totals.push(0.0);
            (labels.len() - 1) as u32
        });
        totals[code as usize] += 1.0;
        codes.push(code);
    }

    let expected = totals.iter().map(|t| t / num_groups as f64).collect();
    let goal = if spec.weight < 0.0 {
        MixGoal::Concentrate
    } else {
        MixGoal::Spread
    };

    debug!(
        column = spec.column,
        distinct = labels.len(),
        ?goal,
        "mix column interned"
    );

    MixColumn {
        column: spec.column,
        weight: spec.weight.abs(),
        goal,
        codes,
        labels,
        totals,
        expected,
    }
}

fn build_cluster_column(table: &ParticipantTable, spec: &ColumnSpec) -> GfResult<ClusterColumn> {
    let mut values = Vec::with_capacity(table.len());
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for (row, record) in table.records.iter().enumerate() {
        let raw = record[spec.column].as_str();
        let x: f64 = raw.trim().parse().map_err(|_| {
            GroupForgeError::Data(format!(
                "row {}, column {}: '{}' is not numeric",
                row + 1,
                spec.column,
                raw
            ))
        })?;
        min = min.min(x);
        max = max.max(x);
        values.push(x);
    }

    let half_range = (max - min) / 2.0;
    let goal = if spec.weight < 0.0 {
        ClusterGoal::Disperse
    } else {
        ClusterGoal::Tighten
    };

    Ok(ClusterColumn {
        column: spec.column,
        weight: spec.weight.abs(),
        goal,
        values,
        spread_cap: half_range * half_range,
    })
}
