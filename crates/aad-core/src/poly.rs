//! Polynomial kernels over the scalar field: multiplication, exact
//! division, from-roots interpolation, and the extended Euclidean
//! algorithm used to derive Bezout witnesses. We specify the contracts the
//! rest of the crate relies on; `ark-poly` supplies the arithmetic.

use ark_ff::{Field, Zero};
use ark_poly::univariate::{DenseOrSparsePolynomial, DensePolynomial};
use ark_poly::{DenseUVPolynomial, Polynomial};

use crate::curve::Fr;
use crate::error::{AadError, Result};

/// Dense univariate polynomial over the scalar field.
pub type Poly = DensePolynomial<Fr>;

/// The constant polynomial `1`.
pub fn one() -> Poly {
    Poly::from_coefficients_vec(vec![Fr::from(1u64)])
}

/// The monic polynomial with exactly the given roots:
/// `prod_{r in roots} (x - r)`.
pub fn from_roots(roots: &[Fr]) -> Poly {
    let mut p = one();
    for r in roots {
        let factor = Poly::from_coefficients_vec(vec![-*r, Fr::from(1u64)]);
        p = &p * &factor;
    }
    p
}

/// `a * b`.
pub fn multiply(a: &Poly, b: &Poly) -> Poly {
    a * b
}

/// Scales every coefficient of `p` by `c`.
pub fn scale(p: &Poly, c: Fr) -> Poly {
    Poly::from_coefficients_vec(p.coeffs().iter().map(|x| *x * c).collect())
}

/// Exact polynomial division: `numerator / denominator`, erroring if the
/// remainder is nonzero. Used to derive forest subset witnesses (the
/// quotient of a parent AT polynomial by a child's).
pub fn divide_exact(numerator: &Poly, denominator: &Poly) -> Result<Poly> {
    if denominator.is_zero() {
        return Err(AadError::ProtocolViolation(
            "cannot divide by the zero polynomial".into(),
        ));
    }
    let num: DenseOrSparsePolynomial<Fr> = numerator.clone().into();
    let den: DenseOrSparsePolynomial<Fr> = denominator.clone().into();
    let (q, r) = num
        .divide_with_q_and_r(&den)
        .ok_or_else(|| AadError::ProtocolViolation("polynomial division failed".into()))?;
    if !r.is_zero() {
        return Err(AadError::ProtocolViolation(
            "exact polynomial division left a nonzero remainder".into(),
        ));
    }
    Ok(q)
}

fn quotient(a: &Poly, b: &Poly) -> Poly {
    let a_ds: DenseOrSparsePolynomial<Fr> = a.clone().into();
    let b_ds: DenseOrSparsePolynomial<Fr> = b.clone().into();
    a_ds.divide_with_q_and_r(&b_ds)
        .map(|(q, _)| q)
        .unwrap_or_else(Poly::zero)
}

/// Extended Euclidean algorithm over polynomials: returns `(x, y)` with
/// `a*x + b*y = 1`, assuming `gcd(a, b)` is a nonzero constant (true
/// whenever `a` and `b` have disjoint root sets, as AT and frontier
/// polynomials always do). Errors if the actual gcd is non-constant.
pub fn extended_gcd_bezout(a: &Poly, b: &Poly) -> Result<(Poly, Poly)> {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (one(), Poly::zero());
    let (mut old_t, mut t) = (Poly::zero(), one());

    while !r.is_zero() {
        let q = quotient(&old_r, &r);
        let new_r = &old_r - &(&q * &r);
        old_r = std::mem::replace(&mut r, new_r);
        let new_s = &old_s - &(&q * &s);
        old_s = std::mem::replace(&mut s, new_s);
        let new_t = &old_t - &(&q * &t);
        old_t = std::mem::replace(&mut t, new_t);
    }

    if old_r.degree() != 0 || old_r.is_zero() {
        return Err(AadError::ProtocolViolation(
            "gcd of AT and frontier polynomials was not a nonzero constant".into(),
        ));
    }

    let inv = old_r
        .coeffs()
        .first()
        .expect("degree-0 nonzero polynomial has one coefficient")
        .inverse()
        .expect("nonzero field element is invertible");

    Ok((scale(&old_s, inv), scale(&old_t, inv)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::UniformRand;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    #[test]
    fn from_roots_evaluates_to_zero_at_roots() {
        let mut r = rng();
        let roots: Vec<Fr> = (0..5).map(|_| Fr::rand(&mut r)).collect();
        let p = from_roots(&roots);
        for root in &roots {
            assert!(p.evaluate(root).is_zero());
        }
    }

    #[test]
    fn divide_exact_recovers_factor() {
        let mut r = rng();
        let roots: Vec<Fr> = (0..4).map(|_| Fr::rand(&mut r)).collect();
        let full = from_roots(&roots);
        let partial = from_roots(&roots[..2]);
        let quotient = divide_exact(&full, &partial).expect("partial's roots are a subset of full's");
        assert_eq!(quotient, from_roots(&roots[2..]));
    }

    #[test]
    fn divide_exact_rejects_nonzero_remainder() {
        let mut r = rng();
        let a = from_roots(&[Fr::rand(&mut r)]);
        let b = from_roots(&[Fr::rand(&mut r), Fr::rand(&mut r)]);
        assert!(divide_exact(&a, &b).is_err());
    }

    #[test]
    fn bezout_identity_holds() {
        let mut r = rng();
        let a = from_roots(&[Fr::rand(&mut r), Fr::rand(&mut r)]);
        let b = from_roots(&[Fr::rand(&mut r), Fr::rand(&mut r), Fr::rand(&mut r)]);
        let (x, y) = extended_gcd_bezout(&a, &b).expect("a and b are coprime");
        let lhs = &(&a * &x) + &(&b * &y);
        assert_eq!(lhs, one());
    }
}
