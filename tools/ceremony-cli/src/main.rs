//! Command-line trusted-setup ceremony tool: generates a fresh q-SDH
//! trapdoor and its public parameter table, or verifies an existing one.
//!
//! `generate` is single-party and insecure by construction (the trapdoor
//! scalars pass through this process's memory); it exists for local
//! development and test fixtures, not for producing parameters an
//! `Aad::new` deployment should actually trust. A real ceremony needs
//! multiple independent contributors, which this tool does not orchestrate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use zeroize::Zeroize;

use aad_core::params::PublicParameters;

#[derive(Parser)]
#[command(name = "ceremony-cli", about = "Generate or verify q-SDH public parameters")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generates a fresh trapdoor and writes its parameter table to disk.
    Generate {
        /// Path of the trapdoor file; chunk files are written alongside it
        /// as `<output>-0`, `<output>-1`, ...
        #[arg(long)]
        output: PathBuf,
        /// Highest polynomial degree the resulting parameters support.
        #[arg(long)]
        degree: usize,
        /// Degrees covered per chunk file.
        #[arg(long, default_value_t = 1 << 16)]
        chunk_size: usize,
    },
    /// Loads a trapdoor and its chunk files, spot-checking every record.
    Verify {
        /// Path of the trapdoor file written by `generate`.
        #[arg(long)]
        input: PathBuf,
        /// Only load the first `max-degree` parameters, if given.
        #[arg(long)]
        max_degree: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate { output, degree, chunk_size } => generate(&output, degree, chunk_size),
        Command::Verify { input, max_degree } => verify(&input, max_degree),
    }
}

fn generate(output: &std::path::Path, degree: usize, chunk_size: usize) -> Result<()> {
    log::warn!("generating an insecure single-party trapdoor; do not use this for a production deployment");
    let mut rng = StdRng::from_entropy();
    let (_pp, mut s, mut tau) = PublicParameters::generate_insecure(&mut rng, 0);

    PublicParameters::write_trapdoor_file(output, s, tau, degree)
        .context("writing trapdoor file")?;

    let mut start = 0usize;
    let mut chunk_index = 0usize;
    while start <= degree {
        let end = (start + chunk_size).min(degree + 1);
        let chunk_path = format!("{}-{chunk_index}", output.display());
        PublicParameters::write_chunk_file(&chunk_path, start, end, s, tau)
            .with_context(|| format!("writing chunk file '{chunk_path}'"))?;
        start = end;
        chunk_index += 1;
    }

    s.zeroize();
    tau.zeroize();
    log::info!("wrote trapdoor file '{}' and {chunk_index} chunk file(s) up to degree {degree}", output.display());
    Ok(())
}

fn verify(input: &std::path::Path, max_degree: Option<usize>) -> Result<()> {
    let pp = PublicParameters::load(input, max_degree, true)
        .context("loading and verifying public parameters")?;
    println!("parameters at '{}' verified up to degree {}", input.display(), pp.q);
    Ok(())
}
