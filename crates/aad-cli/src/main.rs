//! Command-line driver for the append-only authenticated dictionary.
//!
//! The dictionary itself has no on-disk persistence (`Aad` lives entirely
//! in memory for one run); this tool replays a script of
//! `append`/`query`/`prove`/`verify`/`digest` lines against a single
//! in-memory instance and prints the result of each, so a full interaction
//! can be captured and inspected without writing a server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use aad_core::aad::Aad;
use aad_core::membership::{self, MembershipProof};
use aad_core::params::{CryptoContext, PublicParameters};

#[derive(Parser)]
#[command(name = "aad-cli", about = "Drive an append-only authenticated dictionary from a command script")]
struct Cli {
    /// Security parameter; also fixes the accumulated tree depth (`4*lambda`).
    #[arg(long, default_value_t = 128)]
    lambda: usize,

    /// Run against dummy group identities instead of real parameters; no
    /// pairing checks are performed and proofs are not cryptographically
    /// meaningful.
    #[arg(long)]
    simulate: bool,

    /// Trapdoor file produced by `ceremony-cli generate`. Required unless
    /// `--simulate` is given.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Path to a script of newline-separated commands:
    /// `append KEY VALUE`, `query KEY`, `prove KEY`, `verify KEY`, `digest`.
    script: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let ctx = if cli.simulate {
        CryptoContext::Simulated
    } else {
        let path = cli.params.context("--params is required unless --simulate is set")?;
        let pp = PublicParameters::load(&path, None, true).context("loading public parameters")?;
        CryptoContext::Real { pp: Arc::new(pp) }
    };

    let mut aad = match ctx {
        CryptoContext::Simulated => Aad::new_simulated(cli.lambda),
        CryptoContext::Real { pp } => Aad::new(cli.lambda, pp),
    };

    let script = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("reading script '{}'", cli.script.display()))?;

    for (line_no, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_line(&mut aad, line).with_context(|| format!("line {}: '{line}'", line_no + 1))?;
    }
    Ok(())
}

fn run_line(aad: &mut Aad, line: &str) -> Result<()> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(());
    };
    match cmd {
        "append" => {
            let key = parts.next().context("append requires KEY VALUE")?;
            let value = parts.next().context("append requires KEY VALUE")?;
            let index = aad.append(key.as_bytes(), value.as_bytes())?;
            println!("appended {key}={value} at index {index}, version {}", aad.version());
        }
        "query" => {
            let key = parts.next().context("query requires KEY")?;
            let values = aad.get_values(key.as_bytes());
            if values.is_empty() {
                println!("{key}: no values");
            } else {
                for (value, index) in values {
                    println!("{key}[{index}] = {}", String::from_utf8_lossy(&value));
                }
            }
        }
        "prove" => {
            let key = parts.next().context("prove requires KEY")?;
            let proofs = aad.complete_membership_proof(key.as_bytes())?;
            for (tree_idx, proof) in &proofs {
                match proof {
                    MembershipProof::Present { values, .. } => {
                        println!("{key}: membership proof over tree {tree_idx}, {} value(s)", values.len());
                    }
                    MembershipProof::Absent { .. } => {
                        println!("{key}: non-membership proof over tree {tree_idx}");
                    }
                }
            }
        }
        "verify" => {
            let key = parts.next().context("verify requires KEY")?;
            let proofs = aad.complete_membership_proof(key.as_bytes())?;
            let digest = aad.get_digest(None)?;
            for (tree_idx, proof) in &proofs {
                let entry = &digest.entries[*tree_idx];
                let ok = membership::verify_membership_proof(
                    proof,
                    entry.acc_at,
                    entry.acc_frontier,
                    entry.bezout_x,
                    entry.bezout_y,
                    key.as_bytes(),
                    aad.lambda(),
                    aad.ctx(),
                );
                println!("{key}: proof over tree {tree_idx} verifies = {ok}");
            }
        }
        "digest" => {
            let digest = aad.get_digest(None)?;
            print!("{}", digest.describe());
        }
        other => bail!("unknown command '{other}'"),
    }
    Ok(())
}
