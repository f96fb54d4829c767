//! # KdbTree Query Runner
//!
//! Loads merchant payments into a [`kdbtree::KdbTree`] over latitude and
//! longitude and answers radius queries against them.
//!
//! - Payment lines: `name, category, lat, lng`
//! - Query lines: `lat, lng[, category[, radius_km]]`

pub mod errors;
pub mod generator;
pub mod payments;
pub mod queries;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use kdbtree::TreeConfig;

pub use errors::{RunnerError, RunnerResult};
pub use generator::generate_payments;
pub use payments::{build_index, geo_domain, read_payments, Payment};
pub use queries::{format_match, read_queries, run_queries, RadiusQuery};

/// Loads `payments_path`, runs every query in `queries_path` and writes the
/// results to `out`. Returns the total number of matches.
pub fn run_files<W: Write>(
    payments_path: &Path,
    queries_path: &Path,
    config: TreeConfig,
    out: &mut W,
) -> RunnerResult<usize> {
    let payments = read_payments(
        BufReader::new(File::open(payments_path)?),
        &payments_path.display().to_string(),
    )?;
    log::debug!("Read {} payments from {}", payments.len(), payments_path.display());

    let queries = read_queries(
        BufReader::new(File::open(queries_path)?),
        &queries_path.display().to_string(),
    )?;

    let tree = build_index(payments, config)?;
    let total = run_queries(&tree, &queries, out)?;
    out.flush()?;
    Ok(total)
}
