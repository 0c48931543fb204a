use crate::error::{GfResult, GroupForgeError};

/// Which CLI flag a spec was supplied through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Mix,
    Cluster,
}

/// One optimization objective: a column index plus a signed, nonzero weight.
///
/// A negative weight flips the objective: mix columns concentrate their
/// values instead of spreading them, cluster columns disperse instead of
/// tightening. The sign is resolved into a tagged goal once, during scorer
/// setup; the cost path never re-tests it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub column: usize,
    pub weight: f64,
    pub kind: SpecKind,
}

impl ColumnSpec {
    /// Parses `<index>` or `<index>:<weight>`. Weight defaults to 1.0.
    pub fn parse(raw: &str, kind: SpecKind) -> GfResult<Self> {
        let (idx_str, weight_str) = match raw.split_once(':') {
            Some((i, w)) => (i, Some(w)),
            None => (raw, None),
        };

        let column: usize = idx_str.trim().parse().map_err(|_| {
            GroupForgeError::Config(format!("invalid column index in spec '{}'", raw))
        })?;

        let weight: f64 = match weight_str {
            Some(w) => w
                .trim()
                .parse()
                .map_err(|_| GroupForgeError::Config(format!("invalid weight in spec '{}'", raw)))?,
            None => 1.0,
        };

        if weight == 0.0 || !weight.is_finite() {
            return Err(GroupForgeError::Config(format!(
                "spec '{}' has a zero or non-finite weight",
                raw
            )));
        }

        Ok(ColumnSpec {
            column,
            weight,
            kind,
        })
    }
}

pub fn parse_specs(raw: &[String], kind: SpecKind) -> GfResult<Vec<ColumnSpec>> {
    raw.iter().map(|r| ColumnSpec::parse(r, kind)).collect()
}

/// Objective for a categorical column, resolved once from the weight sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixGoal {
    /// Spread each value evenly across the groups.
    Spread,
    /// Pull each value into as few groups as possible.
    Concentrate,
}

/// Objective for a numeric column, resolved once from the weight sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterGoal {
    /// Minimize within-group variance.
    Tighten,
    /// Maximize within-group variance.
    Disperse,
}
