use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use kdbtree::constants::{DEFAULT_POINT_CAPACITY, DEFAULT_REGION_CAPACITY};
use kdbtree::TreeConfig;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs radius queries against a payments file
    Query {
        /// File of `name, category, lat, lng` lines
        payments: PathBuf,
        /// File of `lat, lng[, category[, radius_km]]` lines
        queries: PathBuf,
        #[clap(long, default_value_t = DEFAULT_REGION_CAPACITY)]
        region_capacity: usize,
        #[clap(long, default_value_t = DEFAULT_POINT_CAPACITY)]
        point_capacity: usize,
    },
    /// Writes a random San Francisco payments file
    Generate {
        rows: usize,
        output: PathBuf,
        #[clap(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            payments,
            queries,
            region_capacity,
            point_capacity,
        } => {
            let config = TreeConfig::new(region_capacity, point_capacity)?;
            let mut out = BufWriter::new(io::stdout().lock());
            kdbtree_query::run_files(&payments, &queries, config, &mut out)
                .with_context(|| format!("running queries from {}", queries.display()))?;
        }
        Commands::Generate { rows, output, seed } => {
            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            kdbtree_query::generate_payments(rows, seed, &mut BufWriter::new(file))?;
        }
    }

    Ok(())
}
