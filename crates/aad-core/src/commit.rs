//! Commits a polynomial `p(x)` to `g1^{p(s)}` (and optionally its
//! extractable twin `g1^{tau p(s)}`) or to `g2^{p(s)}` via multi-exponentiation
//! against the loaded q-SDH parameters.
//!
//! `commit_g2` deliberately has no `extractable` parameter: the reference
//! implementation explicitly refuses to produce an extractable G2
//! commitment (`spec.md` §9's open question), and this crate preserves that
//! restriction in the type signature rather than as a runtime check.

use ark_ec::VariableBaseMSM;

use crate::curve::{G1, G2};
use crate::error::{AadError, Result};
use crate::params::PublicParameters;
use crate::poly::Poly;

/// Polynomial commitment operations against a fixed set of public
/// parameters.
pub struct PolyCommit;

impl PolyCommit {
    /// Rejects polynomials whose coefficient count exceeds `pp.q + 1`: the
    /// commitment would need bases beyond what the trusted setup produced.
    pub fn check_degree(pp: &PublicParameters, poly: &Poly) -> Result<()> {
        let degree = poly.coeffs().len().saturating_sub(1);
        if degree > pp.q {
            return Err(AadError::ParameterInsufficient { degree, q: pp.q });
        }
        Ok(())
    }

    /// `g1^{p(s)}`, or `g1^{tau p(s)}` when `extractable` is set.
    pub fn commit_g1(pp: &PublicParameters, poly: &Poly, extractable: bool) -> Result<G1> {
        Self::check_degree(pp, poly)?;
        let bases = if extractable { &pp.g1_tau_si } else { &pp.g1_si };
        let n = poly.coeffs().len();
        G1::msm(&bases[..n], poly.coeffs())
            .map_err(|_| AadError::ProtocolViolation("G1 multi-exponentiation length mismatch".into()))
    }

    /// `g2^{p(s)}`. There is no extractable variant: see the module docs.
    pub fn commit_g2(pp: &PublicParameters, poly: &Poly) -> Result<G2> {
        Self::check_degree(pp, poly)?;
        let n = poly.coeffs().len();
        G2::msm(&pp.g2_si[..n], poly.coeffs())
            .map_err(|_| AadError::ProtocolViolation("G2 multi-exponentiation length mismatch".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{g2_generator, pairing};
    use ark_ec::CurveGroup;
    use rand::SeedableRng;

    #[test]
    fn extractable_commitment_satisfies_pairing_identity() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let (pp, s, _tau) = PublicParameters::generate_insecure(&mut rng, 6);
        let p = crate::poly::from_roots(&[s - crate::curve::Fr::from(3u64), crate::curve::Fr::from(5u64)]);
        let acc = PolyCommit::commit_g1(&pp, &p, false).expect("degree within bound").into_affine();
        let acc_ext = PolyCommit::commit_g1(&pp, &p, true).expect("degree within bound").into_affine();
        assert_eq!(pairing(acc, pp.g2_tau), pairing(acc_ext, g2_generator()));
    }

    #[test]
    fn degree_over_q_is_rejected() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let (pp, _s, _tau) = PublicParameters::generate_insecure(&mut rng, 2);
        let roots: Vec<crate::curve::Fr> = (0..5).map(|i| crate::curve::Fr::from(i as u64 + 1)).collect();
        let p = crate::poly::from_roots(&roots);
        assert!(PolyCommit::commit_g1(&pp, &p, false).is_err());
    }
}
