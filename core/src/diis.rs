//! Pulay's direct inversion in the iterative subspace, used to accelerate the SCF loop.
use std::collections::VecDeque;

use nalgebra::{DMatrix, DVector};

/// How many past fock matrices are kept for extrapolation
const MAX_SAMPLES: usize = 12;
/// Extrapolation starts once this many samples have been collected
const MIN_SAMPLES: usize = 5;

struct Sample {
    error: DMatrix<f64>,
    fock: DMatrix<f64>,
}

pub(crate) struct Diis {
    /// most recent sample first
    previous_samples: VecDeque<Sample>,
}

impl Diis {
    pub(crate) fn new() -> Self {
        Self {
            previous_samples: VecDeque::with_capacity(MAX_SAMPLES + 1),
        }
    }

    /// Records a new (error, fock) pair and returns the extrapolated fock matrix. Returns
    /// `None` if the DIIS equations are singular.
    pub(crate) fn fock(&mut self, error: DMatrix<f64>, fock: DMatrix<f64>) -> Option<DMatrix<f64>> {
        self.previous_samples.push_front(Sample { error, fock });
        self.previous_samples.truncate(MAX_SAMPLES);

        let n = self.previous_samples.len();
        if n < MIN_SAMPLES {
            return self
                .previous_samples
                .front()
                .map(|Sample { fock, .. }| fock.to_owned());
        }

        let matrix = DMatrix::from_fn(n + 1, n + 1, |i, j| match (i, j) {
            (i, j) if i == n && j == n => 0.0,
            (i, j) if i == n || j == n => 1.0,
            _ => self.previous_samples[j]
                .error
                .dot(&self.previous_samples[i].error),
        });

        let b = DVector::from_fn(n + 1, |i, _| if i == n { 1.0 } else { 0.0 });

        let solution = matrix.qr().solve(&b)?;
        if solution.iter().any(|x| !x.is_finite()) {
            return None;
        }

        Some(
            solution
                .iter()
                .take(n)
                .zip(&self.previous_samples)
                .map(|(&weight, sample)| weight * &sample.fock)
                .sum(),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    use super::{Diis, MIN_SAMPLES};

    #[test]
    fn passes_through_until_enough_samples() {
        let mut diis = Diis::new();
        for k in 0..MIN_SAMPLES - 1 {
            let fock = DMatrix::from_element(2, 2, k as f64);
            let error = DMatrix::from_element(2, 2, 1.0 / (k + 1) as f64);
            assert_eq!(diis.fock(error, fock.clone()), Some(fock));
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let mut diis = Diis::new();
        let mut last = None;
        for k in 0..MIN_SAMPLES + 2 {
            let fock = DMatrix::from_element(3, 3, 3.0);
            let error = DMatrix::from_fn(3, 3, |i, j| if 3 * i + j == k { 1.0 } else { 0.1 });
            last = diis.fock(error, fock);
        }
        // every sample has the same fock matrix, so any affine combination reproduces it
        assert_relative_eq!(last.unwrap(), DMatrix::from_element(3, 3, 3.0), epsilon = 1e-8);
    }
}
