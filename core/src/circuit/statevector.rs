use nalgebra::Complex;

use crate::operators::SparsePauliOp;

use super::{EntanglementGate, RotationGate};

/// The full `2^n` amplitude vector of an `n` qubit register. Qubit `j` is bit `j` of the
/// basis state index.
#[derive(Clone, Debug, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex<f64>>,
}

impl Statevector {
    /// `|0...0>`
    pub fn zero_state(num_qubits: usize) -> Self {
        Self::basis_state(num_qubits, 0)
    }

    pub fn basis_state(num_qubits: usize, index: usize) -> Self {
        let mut amplitudes = vec![Complex::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[index] = Complex::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    fn apply_single(&mut self, qubit: usize, matrix: [[Complex<f64>; 2]; 2]) {
        let bit = 1 << qubit;
        for index in 0..self.amplitudes.len() {
            if index & bit != 0 {
                continue;
            }
            let zero = self.amplitudes[index];
            let one = self.amplitudes[index | bit];
            self.amplitudes[index] = matrix[0][0] * zero + matrix[0][1] * one;
            self.amplitudes[index | bit] = matrix[1][0] * zero + matrix[1][1] * one;
        }
    }

    pub fn rotate(&mut self, gate: RotationGate, qubit: usize, angle: f64) {
        let (sin, cos) = (0.5 * angle).sin_cos();
        let c = Complex::new(cos, 0.0);
        let matrix = match gate {
            RotationGate::Rx => {
                let s = Complex::new(0.0, -sin);
                [[c, s], [s, c]]
            }
            RotationGate::Ry => {
                let s = Complex::new(sin, 0.0);
                [[c, -s], [s, c]]
            }
            RotationGate::Rz => [
                [Complex::new(cos, -sin), Complex::new(0.0, 0.0)],
                [Complex::new(0.0, 0.0), Complex::new(cos, sin)],
            ],
        };
        self.apply_single(qubit, matrix);
    }

    pub fn entangle(&mut self, gate: EntanglementGate, control: usize, target: usize) {
        let control_bit = 1 << control;
        let target_bit = 1 << target;
        match gate {
            EntanglementGate::Cz => {
                for amplitude in self
                    .amplitudes
                    .iter_mut()
                    .enumerate()
                    .filter(|(index, _)| index & control_bit != 0 && index & target_bit != 0)
                    .map(|(_, amplitude)| amplitude)
                {
                    *amplitude = -*amplitude;
                }
            }
            EntanglementGate::Cx => {
                for index in 0..self.amplitudes.len() {
                    if index & control_bit != 0 && index & target_bit == 0 {
                        self.amplitudes.swap(index, index | target_bit);
                    }
                }
            }
        }
    }

    /// `<ψ|O|ψ>`. The imaginary part vanishes for hermitian `O` and is dropped.
    pub fn expectation(&self, observable: &SparsePauliOp) -> f64 {
        debug_assert_eq!(observable.num_qubits(), self.num_qubits);

        observable
            .terms()
            .iter()
            .map(|(pauli, coefficient)| {
                let value = self
                    .amplitudes
                    .iter()
                    .enumerate()
                    .map(|(index, amplitude)| {
                        let (flipped, phase) = pauli.apply(index);
                        self.amplitudes[flipped].conj() * phase * amplitude
                    })
                    .sum::<Complex<f64>>();
                (coefficient * value).re
            })
            .sum()
    }
}
