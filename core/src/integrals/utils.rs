//! Recurrences of the McMurchie-Davidson scheme.
//!
//! Reference:
//!
//! [1] Goings, J. Integrals. https://joshuagoings.com/2017/04/28/integrals/
use nalgebra::Vector3;

/// Above this argument the Boys function is evaluated with its asymptotic form.
const BOYS_ASYMPTOTIC_THRESHOLD: f64 = 35.0;

/// Hermite expansion coefficient E^{ij}_t of the product of two one-dimensional Gaussians.
///
/// `diff` is the distance between the two centers along this axis, `a - b`.
pub(super) fn hermite_expansion([i, j, t]: [i32; 3], diff: f64, a: f64, b: f64) -> f64 {
    let p = a + b;
    let q = a * b / p;

    if t < 0 || t > i + j || i < 0 || j < 0 {
        0.0
    } else if i == 0 && j == 0 && t == 0 {
        (-q * diff * diff).exp()
    } else if j == 0 {
        (2.0 * p).recip() * hermite_expansion([i - 1, j, t - 1], diff, a, b)
            - (q * diff / a) * hermite_expansion([i - 1, j, t], diff, a, b)
            + (t + 1) as f64 * hermite_expansion([i - 1, j, t + 1], diff, a, b)
    } else {
        (2.0 * p).recip() * hermite_expansion([i, j - 1, t - 1], diff, a, b)
            + (q * diff / b) * hermite_expansion([i, j - 1, t], diff, a, b)
            + (t + 1) as f64 * hermite_expansion([i, j - 1, t + 1], diff, a, b)
    }
}

/// Hermite Coulomb auxiliary integral R^n_{tuv}.
///
/// `diff` is the distance between the gaussian product center and the point charge (or the
/// second product center), `p` the combined exponent.
pub(super) fn coulomb_auxiliary(t: i32, u: i32, v: i32, n: i32, p: f64, diff: Vector3<f64>) -> f64 {
    if t < 0 || u < 0 || v < 0 {
        return 0.0;
    }

    if t == 0 && u == 0 && v == 0 {
        return (-2.0 * p).powi(n) * boys(n, p * diff.norm_squared());
    }

    if t == 0 && u == 0 {
        (v - 1) as f64 * coulomb_auxiliary(t, u, v - 2, n + 1, p, diff)
            + diff.z * coulomb_auxiliary(t, u, v - 1, n + 1, p, diff)
    } else if t == 0 {
        (u - 1) as f64 * coulomb_auxiliary(t, u - 2, v, n + 1, p, diff)
            + diff.y * coulomb_auxiliary(t, u - 1, v, n + 1, p, diff)
    } else {
        (t - 1) as f64 * coulomb_auxiliary(t - 2, u, v, n + 1, p, diff)
            + diff.x * coulomb_auxiliary(t - 1, u, v, n + 1, p, diff)
    }
}

/// The Boys function F_n(x) = int_0^1 t^{2n} exp(-x t^2) dt
pub(super) fn boys(n: i32, x: f64) -> f64 {
    if x < BOYS_ASYMPTOTIC_THRESHOLD {
        // F_n(x) = exp(-x) * sum_k (2x)^k / ((2n+1)(2n+3)...(2n+2k+1))
        let mut term = (2 * n + 1) as f64;
        term = term.recip();
        let mut sum = term;
        let mut k = 1;
        loop {
            term *= 2.0 * x / (2 * n + 2 * k + 1) as f64;
            sum += term;
            k += 1;
            if term < 1e-17 * sum {
                break;
            }
        }
        (-x).exp() * sum
    } else {
        let double_factorial = (1..2 * n).step_by(2).map(|i| i as f64).product::<f64>();
        double_factorial / 2f64.powi(n + 1) * (std::f64::consts::PI / x.powi(2 * n + 1)).sqrt()
    }
}
