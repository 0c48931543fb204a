use crate::error::{GfResult, GroupForgeError};
use clap::Args;

/// Search parameters for the `split` subcommand. Flattened into the
/// subcommand's argument struct.
#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Number of groups to split into.
    #[arg(short = 'n', long = "groups")]
    pub groups: usize,

    /// Optimization iteration budget. 0 keeps the initial split.
    #[arg(short = 'i', long, default_value_t = 10_000)]
    pub iterations: usize,

    /// Use simulated annealing instead of hill-climbing.
    #[arg(short = 'a', long)]
    pub anneal: bool,

    /// Starting temperature for annealing.
    #[arg(long, default_value_t = 10.0)]
    pub temp_max: f64,

    /// Temperature floor for annealing; must stay positive.
    #[arg(long, default_value_t = 1e-3)]
    pub temp_min: f64,

    /// Independent restart chains; the best result wins.
    #[arg(short = 'r', long, default_value_t = 1)]
    pub restarts: usize,

    /// RNG seed for exactly reproducible runs.
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

/// Resolves the `--delimiter` argument to a single byte. Accepts the two
/// spellings shells commonly deliver for tab.
pub fn delimiter_byte(raw: &str) -> GfResult<u8> {
    match raw.as_bytes() {
        [b] => Ok(*b),
        [b'\\', b't'] => Ok(b'\t'),
        _ => Err(GroupForgeError::Config(format!(
            "delimiter '{}' must be a single byte",
            raw
        ))),
    }
}
