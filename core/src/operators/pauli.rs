use std::{
    collections::BTreeMap,
    fmt,
    ops::{Add, Mul},
    str::FromStr,
};

use nalgebra::{Complex, DMatrix};

/// Coefficients at or below this magnitude are dropped by [`SparsePauliOp::simplify`]
pub const DEFAULT_ATOL: f64 = 1e-12;

/// A tensor product of single qubit Pauli operators, stored as two bit masks.
///
/// Qubit `j` carries `I` if neither bit `j` is set, `X` if only the x bit is set, `Z` if only
/// the z bit is set and `Y` if both are set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PauliString {
    x: u64,
    z: u64,
}

impl PauliString {
    pub const IDENTITY: Self = Self { x: 0, z: 0 };

    pub const fn new(x: u64, z: u64) -> Self {
        Self { x, z }
    }

    pub fn x(&self) -> u64 {
        self.x
    }

    pub fn z(&self) -> u64 {
        self.z
    }

    /// number of non-identity factors
    pub fn weight(&self) -> u32 {
        (self.x | self.z).count_ones()
    }

    /// number of Y factors
    fn y_count(&self) -> u32 {
        (self.x & self.z).count_ones()
    }

    /// Returns the product `self * other` as a Pauli string and a phase.
    pub fn compose(&self, other: &Self) -> (Self, Complex<f64>) {
        let product = Self {
            x: self.x ^ other.x,
            z: self.z ^ other.z,
        };

        // moving the Z factors of `self` past the X factors of `other` yields a sign per
        // overlap; the Y factors carry an extra i each
        let exponent = self.y_count() as i64 + other.y_count() as i64 - product.y_count() as i64
            + 2 * (self.z & other.x).count_ones() as i64;

        (product, i_power(exponent))
    }

    /// Applies this Pauli string to the computational basis state `basis`. Returns the
    /// resulting basis state and the phase it picks up.
    #[inline(always)]
    pub fn apply(&self, basis: usize) -> (usize, Complex<f64>) {
        let parity = ((basis as u64 & self.z).count_ones() & 1) as i64;
        (
            basis ^ self.x as usize,
            i_power(self.y_count() as i64 + 2 * parity),
        )
    }

    fn label(&self, qubit: usize) -> char {
        match (self.x >> qubit & 1, self.z >> qubit & 1) {
            (0, 0) => 'I',
            (1, 0) => 'X',
            (0, 1) => 'Z',
            _ => 'Y',
        }
    }

    /// index of the highest qubit this string acts on non-trivially, plus one
    pub fn min_qubits(&self) -> usize {
        64 - (self.x | self.z).leading_zeros() as usize
    }
}

/// i^exponent
fn i_power(exponent: i64) -> Complex<f64> {
    match exponent.rem_euclid(4) {
        0 => Complex::new(1.0, 0.0),
        1 => Complex::new(0.0, 1.0),
        2 => Complex::new(-1.0, 0.0),
        _ => Complex::new(0.0, -1.0),
    }
}

/// Parses labels such as `"XIZY"`. As usual, the rightmost character is qubit 0.
impl FromStr for PauliString {
    type Err = char;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let mut pauli = Self::IDENTITY;
        for (qubit, character) in label.chars().rev().enumerate() {
            let bit = 1u64 << qubit;
            match character {
                'I' => {}
                'X' => pauli.x |= bit,
                'Z' => pauli.z |= bit,
                'Y' => {
                    pauli.x |= bit;
                    pauli.z |= bit;
                }
                other => return Err(other),
            }
        }
        Ok(pauli)
    }
}

/// A weighted sum of Pauli strings acting on a fixed number of qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct SparsePauliOp {
    num_qubits: usize,
    terms: Vec<(PauliString, Complex<f64>)>,
}

impl SparsePauliOp {
    /// The zero operator
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: Vec::new(),
        }
    }

    pub fn identity(num_qubits: usize) -> Self {
        Self::from_terms(num_qubits, [(PauliString::IDENTITY, Complex::new(1.0, 0.0))])
    }

    pub fn from_terms(
        num_qubits: usize,
        terms: impl IntoIterator<Item = (PauliString, Complex<f64>)>,
    ) -> Self {
        let terms = terms.into_iter().collect::<Vec<_>>();
        debug_assert!(terms
            .iter()
            .all(|(pauli, _)| pauli.min_qubits() <= num_qubits));
        Self { num_qubits, terms }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn terms(&self) -> &[(PauliString, Complex<f64>)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Operator product `self * other`
    pub fn compose(&self, other: &Self) -> Self {
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for (pauli_a, coeff_a) in &self.terms {
            for (pauli_b, coeff_b) in &other.terms {
                let (pauli, phase) = pauli_a.compose(pauli_b);
                terms.push((pauli, coeff_a * coeff_b * phase));
            }
        }

        Self {
            num_qubits: self.num_qubits.max(other.num_qubits),
            terms,
        }
    }

    /// Merges duplicate Pauli strings and drops terms whose coefficient is at most `atol`.
    /// Terms come out sorted, which makes the result independent of insertion order.
    pub fn simplify(self, atol: f64) -> Self {
        let mut merged = BTreeMap::<PauliString, Complex<f64>>::new();
        for (pauli, coefficient) in self.terms {
            *merged.entry(pauli).or_default() += coefficient;
        }

        Self {
            num_qubits: self.num_qubits,
            terms: merged
                .into_iter()
                .filter(|(_, coefficient)| coefficient.norm() > atol)
                .collect(),
        }
    }

    /// Whether every coefficient is real up to `atol`, which for a simplified operator
    /// means the operator is hermitian.
    pub fn is_hermitian(&self, atol: f64) -> bool {
        self.terms
            .iter()
            .all(|(_, coefficient)| coefficient.im.abs() <= atol)
    }

    /// The dense `2^n x 2^n` matrix of this operator
    pub fn to_matrix(&self) -> DMatrix<Complex<f64>> {
        let dimension = 1 << self.num_qubits;
        let mut matrix = DMatrix::zeros(dimension, dimension);
        for (pauli, coefficient) in &self.terms {
            for column in 0..dimension {
                let (row, phase) = pauli.apply(column);
                matrix[(row, column)] += coefficient * phase;
            }
        }
        matrix
    }
}

impl Add for SparsePauliOp {
    type Output = SparsePauliOp;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.num_qubits = self.num_qubits.max(rhs.num_qubits);
        self.terms.extend(rhs.terms);
        self
    }
}

impl Mul<f64> for SparsePauliOp {
    type Output = SparsePauliOp;

    fn mul(mut self, rhs: f64) -> Self::Output {
        for (_, coefficient) in &mut self.terms {
            *coefficient *= rhs;
        }
        self
    }
}

impl Mul<Complex<f64>> for SparsePauliOp {
    type Output = SparsePauliOp;

    fn mul(mut self, rhs: Complex<f64>) -> Self::Output {
        for (_, coefficient) in &mut self.terms {
            *coefficient *= rhs;
        }
        self
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.min_qubits().max(1);
        for qubit in (0..width).rev() {
            write!(f, "{}", self.label(qubit))?;
        }
        Ok(())
    }
}

impl fmt::Display for SparsePauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pauli, coefficient) in &self.terms {
            let label = (0..self.num_qubits)
                .rev()
                .map(|qubit| pauli.label(qubit))
                .collect::<String>();
            writeln!(f, "{label} {:+.8} {:+.8}i", coefficient.re, coefficient.im)?;
        }
        Ok(())
    }
}
