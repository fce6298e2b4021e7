//! Modular arithmetic over the digraph ring Z/MZ

use crate::error::ModularError;

/// Extended Euclidean algorithm (iterative).
///
/// Returns `(d, x)` where `d = gcd(b, n) >= 0` and `x` is a Bézout coefficient,
/// i.e. there is some `y` with `b·x + n·y = d`.
///
/// # Arguments
///
/// * `b` - Any integer, negative values included.
/// * `n` - The second operand, expected to be `>= 0`.
pub fn extended_gcd(mut b: i64, mut n: i64) -> (i64, i64) {
    let (mut x0, mut x1) = (1i64, 0i64);

    while n != 0 {
        let q = b.div_euclid(n);
        (b, n) = (n, b.rem_euclid(n));
        (x0, x1) = (x1, x0 - q * x1);
    }

    // Only reachable with n == 0 on entry and b < 0
    if b < 0 {
        return (-b, -x0);
    }

    (b, x0)
}

/// Greatest common divisor, always non-negative.
pub fn gcd(a: i64, b: i64) -> i64 {
    extended_gcd(a, b).0
}

/// Multiplies two residues modulo `m` without intermediate overflow.
pub fn mul_mod(a: i64, b: i64, m: i64) -> i64 {
    ((a as i128 * b as i128).rem_euclid(m as i128)) as i64
}

/// Computes the inverse of `a` modulo `m`.
///
/// # Returns
///
/// The inverse in `[0, m)`, or [`ModularError::NoInverse`] carrying
/// `gcd(a, m)` when it is not 1.
pub fn mod_inverse(a: i64, m: i64) -> Result<i64, ModularError> {
    if m <= 0 {
        return Err(ModularError::InvalidModulus(m));
    }

    let (d, x) = extended_gcd(a, m);

    if d != 1 {
        return Err(ModularError::NoInverse { value: a, modulus: m, gcd: d });
    }

    Ok(x.rem_euclid(m))
}

/// Solves the linear congruence `a·x ≡ b (mod m)`.
///
/// With `d = gcd(a, m)`:
/// - `d == 1`: one solution, `a⁻¹·b mod m`.
/// - `d` does not divide `b`: [`ModularError::NoSolution`].
/// - `d == m` (`a ≡ 0`): [`ModularError::Degenerate`], since the reduced
///   modulus collapses to 1 and no candidate carries information.
/// - otherwise: the `d` solutions `x0 + k·(m/d)` for `k` in `[0, d)`, where
///   `x0` solves the congruence reduced by `d`.
///
/// Solutions are returned in ascending order, all in `[0, m)`.
pub fn solve_linear_congruence(a: i64, b: i64, m: i64) -> Result<Vec<i64>, ModularError> {
    if m <= 0 {
        return Err(ModularError::InvalidModulus(m));
    }

    let a = a.rem_euclid(m);
    let b = b.rem_euclid(m);
    let d = gcd(a, m);

    if d == 1 {
        let inverse = mod_inverse(a, m)?;
        return Ok(vec![mul_mod(inverse, b, m)]);
    }

    if b % d != 0 {
        return Err(ModularError::NoSolution { a, b, modulus: m, gcd: d });
    }

    if d == m {
        return Err(ModularError::Degenerate { modulus: m });
    }

    // Exact integer reduction by the gcd
    let (a, b, reduced) = (a / d, b / d, m / d);
    let x0 = mul_mod(mod_inverse(a, reduced)?, b, reduced);

    Ok((0..d).map(|k| x0 + k * reduced).collect())
}
