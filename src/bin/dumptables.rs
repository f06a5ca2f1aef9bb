//! Writes the precomputed evaluation tables to a standalone file, in the
//! same layout the library loads: the 7-card table, the 5-card table and the
//! 3-card table concatenated, little-endian throughout.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use poker_eval::evaluator::internal_tables;
use read_write::VecIO;

#[derive(Parser, Debug)]
#[command(version, about = "Writes the evaluation tables to a standalone file")]
struct Args {
    /// Output file
    #[arg(long, default_value = "poker.dat")]
    out: PathBuf,
}

fn run() -> Result<()> {
    let args = Args::parse();
    let (t3, t5, t7) = internal_tables();
    let mut f = File::create(&args.out)
        .with_context(|| format!("can't create {}", args.out.display()))?;
    f.write_vec_to_file(t7)?;
    f.write_vec_to_file(t5)?;
    f.write_vec_to_file(t3)?;
    let bytes = t7.len() * 4 + t5.len() * 4 + t3.len() * 2;
    println!("wrote {} bytes to {}", bytes, args.out.display());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
