//! q-SDH-style public parameters for the polynomial commitments, and the
//! `CryptoContext` that lets the rest of the crate run either against real
//! parameters or in simulate mode.
//!
//! Trusted-setup ceremony and ad-hoc parameter generation live in the
//! `ceremony-cli` tool; this module only owns the typed container and its
//! streaming file format (plain text, one hex-encoded group/field element
//! per line).

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use ark_ec::CurveGroup;
use ark_ff::{One, UniformRand};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::RngCore;

use crate::curve::{g1_generator, g2_generator, pairing, Fr, G1Affine, G2Affine};
use crate::error::{AadError, Result};

/// `(s, tau, q, g1^{s^i}, g1^{tau s^i}, g2^{s^i}, g2^tau)` for `i` in
/// `0..=q`. Read-only once loaded; safe to share across `Aad` instances.
pub struct PublicParameters {
    /// Highest supported polynomial degree.
    pub q: usize,
    /// `g1^{s^i}` for `i` in `0..=q`.
    pub g1_si: Vec<G1Affine>,
    /// `g1^{tau s^i}` for `i` in `0..=q`.
    pub g1_tau_si: Vec<G1Affine>,
    /// `g2^{s^i}` for `i` in `0..=q`.
    pub g2_si: Vec<G2Affine>,
    /// `g2^tau`.
    pub g2_tau: G2Affine,
}

impl PublicParameters {
    /// `g1^s`.
    pub fn g1_to_s(&self) -> G1Affine {
        self.g1_si[1]
    }

    /// `g1^tau`.
    pub fn g1_to_tau(&self) -> G1Affine {
        self.g1_tau_si[0]
    }

    /// `g2^s`.
    pub fn g2_to_s(&self) -> G2Affine {
        self.g2_si[1]
    }

    /// Generates a fresh trapdoor `(s, tau)` and the full parameter table
    /// up to degree `q`, entirely in memory. Intended for tests and small
    /// demonstrations; `ceremony-cli` is the out-of-core tool meant for a
    /// real ceremony, where `s`/`tau` are supposed to be destroyed rather
    /// than handed back like this.
    pub fn generate_insecure<R: RngCore>(rng: &mut R, q: usize) -> (Self, Fr, Fr) {
        let s = Fr::rand(rng);
        let tau = Fr::rand(rng);
        let g1 = g1_generator();
        let g2 = g2_generator();
        let g1tau = (g1 * tau).into_affine();

        let mut g1_si = Vec::with_capacity(q + 1);
        let mut g1_tau_si = Vec::with_capacity(q + 1);
        let mut g2_si = Vec::with_capacity(q + 1);
        let mut si = Fr::one();
        for _ in 0..=q {
            g1_si.push((g1 * si).into_affine());
            g1_tau_si.push((g1tau * si).into_affine());
            g2_si.push((g2 * si).into_affine());
            si *= s;
        }

        let pp = Self {
            q,
            g1_si,
            g1_tau_si,
            g2_si,
            g2_tau: (g2 * tau).into_affine(),
        };
        (pp, s, tau)
    }

    /// Loads parameters from a trapdoor file and its `<trap>-0`,
    /// `<trap>-1`, ... chunk files, streaming records until `q+1` (or
    /// `max_q+1`, if smaller) have been consumed. When `verify` is set,
    /// every record is spot-checked against direct scalar multiplication
    /// and the pairing identity `e(g1^{s^i}, g2^tau) = e(g1^{tau s^i},
    /// g2)`.
    pub fn load(
        trapdoor_path: impl AsRef<Path>,
        max_q: Option<usize>,
        verify: bool,
    ) -> Result<Self> {
        let trapdoor_path = trapdoor_path.as_ref();
        let file = std::fs::File::open(trapdoor_path)?;
        let mut lines = BufReader::new(file).lines();

        let s = parse_fr_line(&mut lines)?;
        let tau = parse_fr_line(&mut lines)?;
        let q_full: usize = next_line(&mut lines)?
            .trim()
            .parse()
            .map_err(|e| AadError::ParameterLoad(format!("bad q: {e}")))?;
        let g2_tau = parse_g2_line(&mut lines)?;

        if g2_tau != (g2_generator() * tau).into_affine() {
            return Err(AadError::ParameterLoad(
                "g2^tau in trapdoor file does not match tau*g2".into(),
            ));
        }

        let q = match max_q {
            Some(m) if m <= q_full => m,
            Some(m) => {
                return Err(AadError::ParameterLoad(format!(
                    "requested {m} parameters but only {q_full} are available"
                )))
            }
            None => q_full,
        };

        let mut g1_si = Vec::with_capacity(q + 1);
        let mut g1_tau_si = Vec::with_capacity(q + 1);
        let mut g2_si = Vec::with_capacity(q + 1);

        let g1 = g1_generator();
        let g2 = g2_generator();
        let mut si = Fr::one();
        let mut chunk_index = 0usize;

        while g1_si.len() <= q {
            let chunk_path = format!("{}-{}", trapdoor_path.display(), chunk_index);
            let file = std::fs::File::open(&chunk_path).map_err(|_| {
                AadError::ParameterLoad(format!("could not open parameter chunk '{chunk_path}'"))
            })?;
            let mut lines = BufReader::new(file).lines();

            while g1_si.len() <= q {
                let Some(g1si_line) = lines.next() else { break };
                let g1si = parse_g1_str(&g1si_line?)?;
                let g1tausi = parse_g1_str(&next_line(&mut lines)?)?;
                let g2si = parse_g2_str(&next_line(&mut lines)?)?;

                if verify {
                    if g1si != (g1 * si).into_affine() {
                        return Err(AadError::ParameterLoad("g1^{s^i} mismatch".into()));
                    }
                    if g1tausi != (g1 * (si * tau)).into_affine() {
                        return Err(AadError::ParameterLoad("g1^{tau s^i} mismatch".into()));
                    }
                    if pairing(g1si, g2_tau) != pairing(g1tausi, g2) {
                        return Err(AadError::ParameterLoad(
                            "pairing cross-check between g1^{s^i} and g1^{tau s^i} failed".into(),
                        ));
                    }
                    if g2si != (g2 * si).into_affine() {
                        return Err(AadError::ParameterLoad("g2^{s^i} mismatch".into()));
                    }
                }

                g1_si.push(g1si);
                g1_tau_si.push(g1tausi);
                g2_si.push(g2si);
                si *= s;
            }
            chunk_index += 1;
        }

        if g1_si.len() != q + 1 {
            return Err(AadError::ParameterLoad(
                "did not read exactly q+1 parameters".into(),
            ));
        }

        Ok(Self {
            q,
            g1_si,
            g1_tau_si,
            g2_si,
            g2_tau,
        })
    }

    /// Writes the trapdoor file: `s`, `tau`, `q`, `g2^tau`.
    pub fn write_trapdoor_file(
        path: impl AsRef<Path>,
        s: Fr,
        tau: Fr,
        q: usize,
    ) -> Result<()> {
        let mut out = std::fs::File::create(path)?;
        writeln!(out, "{}", encode_fr(&s))?;
        writeln!(out, "{}", encode_fr(&tau))?;
        writeln!(out, "{q}")?;
        writeln!(out, "{}", encode_g2(&(g2_generator() * tau).into_affine()))?;
        Ok(())
    }

    /// Writes one chunk file covering degrees `[start, end)`.
    pub fn write_chunk_file(
        path: impl AsRef<Path>,
        start: usize,
        end: usize,
        s: Fr,
        tau: Fr,
    ) -> Result<()> {
        let mut out = std::fs::File::create(path)?;
        let g1 = g1_generator();
        let g1tau = (g1 * tau).into_affine();
        let mut si = s.pow([start as u64]);
        for _ in start..end {
            let g1si = (g1 * si).into_affine();
            let g1tausi = (g1tau * si).into_affine();
            let g2si = (g2_generator() * si).into_affine();
            writeln!(out, "{}", encode_g1(&g1si))?;
            writeln!(out, "{}", encode_g1(&g1tausi))?;
            writeln!(out, "{}", encode_g2(&g2si))?;
            si *= s;
        }
        Ok(())
    }
}

/// Distinguishes a real pairing-backed run from the benchmarking-only
/// simulate mode (`spec.md` §6.2): no real commitments, no pairing checks,
/// proofs carry dummy group identities. Carried as an enum rather than an
/// `Option<PublicParameters>` so every call site must match on it
/// explicitly instead of silently falling back to an absent-parameters
/// branch.
pub enum CryptoContext {
    /// Real commitments against loaded q-SDH parameters.
    Real {
        /// The loaded parameters.
        pp: std::sync::Arc<PublicParameters>,
    },
    /// Benchmarking-only: commitments are the group identity, pairing
    /// checks are skipped. Must never be used to produce a proof that is
    /// mistaken for a real one.
    Simulated,
}

impl CryptoContext {
    /// True for `Simulated`.
    pub fn is_simulated(&self) -> bool {
        matches!(self, CryptoContext::Simulated)
    }
}

fn next_line(lines: &mut std::io::Lines<BufReader<std::fs::File>>) -> Result<String> {
    lines
        .next()
        .ok_or_else(|| AadError::ParameterLoad("unexpected end of file".into()))?
        .map_err(AadError::from)
}

fn parse_fr_line(lines: &mut std::io::Lines<BufReader<std::fs::File>>) -> Result<Fr> {
    parse_fr_str(&next_line(lines)?)
}

fn parse_g2_line(lines: &mut std::io::Lines<BufReader<std::fs::File>>) -> Result<G2Affine> {
    parse_g2_str(&next_line(lines)?)
}

fn parse_fr_str(s: &str) -> Result<Fr> {
    let bytes = hex::decode(s.trim())
        .map_err(|e| AadError::ParameterLoad(format!("bad hex scalar: {e}")))?;
    Fr::deserialize_compressed(&bytes[..])
        .map_err(|e| AadError::ParameterLoad(format!("bad scalar encoding: {e}")))
}

fn parse_g1_str(s: &str) -> Result<G1Affine> {
    let bytes =
        hex::decode(s.trim()).map_err(|e| AadError::ParameterLoad(format!("bad hex G1: {e}")))?;
    G1Affine::deserialize_compressed(&bytes[..])
        .map_err(|e| AadError::ParameterLoad(format!("bad G1 encoding: {e}")))
}

fn parse_g2_str(s: &str) -> Result<G2Affine> {
    let bytes =
        hex::decode(s.trim()).map_err(|e| AadError::ParameterLoad(format!("bad hex G2: {e}")))?;
    G2Affine::deserialize_compressed(&bytes[..])
        .map_err(|e| AadError::ParameterLoad(format!("bad G2 encoding: {e}")))
}

fn encode_fr(x: &Fr) -> String {
    let mut bytes = Vec::new();
    x.serialize_compressed(&mut bytes).expect("scalar serialization is infallible");
    hex::encode(bytes)
}

fn encode_g1(p: &G1Affine) -> String {
    let mut bytes = Vec::new();
    p.serialize_compressed(&mut bytes).expect("G1 serialization is infallible");
    hex::encode(bytes)
}

fn encode_g2(p: &G2Affine) -> String {
    let mut bytes = Vec::new();
    p.serialize_compressed(&mut bytes).expect("G2 serialization is infallible");
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn generated_parameters_satisfy_pairing_identity() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let (pp, _s, _tau) = PublicParameters::generate_insecure(&mut rng, 8);
        for i in 0..=8 {
            assert_eq!(
                pairing(pp.g1_si[i], pp.g2_tau),
                pairing(pp.g1_tau_si[i], g2_generator())
            );
        }
    }
}
