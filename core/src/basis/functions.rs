use nalgebra::Vector3;
use smallvec::SmallVec;

/// Function of the form K*x^i*y^j*z^k*exp(-alpha*x^2)
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gaussian {
    pub exponent: f64,
    /// The coefficient of this gaussian, including the normalization constant
    pub coefficient: f64,
    /// (i, j, k) exponents of polynomial terms
    pub angular: (i32, i32, i32),
}

impl Gaussian {
    /// Creates a primitive from an un-normalized contraction coefficient.
    pub fn normalized(exponent: f64, coefficient: f64, angular: (i32, i32, i32)) -> Self {
        Self {
            exponent,
            coefficient: coefficient * Self::norm(exponent, angular),
            angular,
        }
    }

    pub fn norm(exponent: f64, angular: (i32, i32, i32)) -> f64 {
        let (i, j, k) = angular;

        (std::f64::consts::FRAC_2_PI * exponent)
            .powi(3)
            .sqrt()
            .sqrt()
            * f64::sqrt(
                (8.0 * exponent).powi(i + j + k)
                    / ((i + 1..=2 * i).product::<i32>()
                        * (j + 1..=2 * j).product::<i32>()
                        * (k + 1..=2 * k).product::<i32>()) as f64,
            )
    }
}

/// Linear combination of many [`Gaussian`]s
#[derive(Clone, Debug, PartialEq)]
pub struct ContractedGaussian(pub SmallVec<[Gaussian; 6]>);

#[derive(Clone, Debug, PartialEq)]
pub struct BasisFunction {
    pub contracted_gaussian: ContractedGaussian,
    /// The position of this basis function, in bohr
    pub position: Vector3<f64>,
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::Gaussian;

    #[test]
    fn s_norm_matches_closed_form() {
        let exponent = 0.8;
        let expected = (2.0 * exponent / std::f64::consts::PI).powf(0.75);
        assert_relative_eq!(Gaussian::norm(exponent, (0, 0, 0)), expected, epsilon = 1e-14);
    }

    #[test]
    fn p_norm_matches_closed_form() {
        let exponent = 1.3;
        let expected = (2.0 * exponent / std::f64::consts::PI).powf(0.75)
            * (4.0 * exponent).sqrt();
        assert_relative_eq!(Gaussian::norm(exponent, (0, 1, 0)), expected, epsilon = 1e-12);
    }
}
