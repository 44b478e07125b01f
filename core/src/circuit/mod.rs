//! Parameterized circuits and their exact simulation
mod ansatz;
mod statevector;

use nalgebra::DVector;

pub use ansatz::{AnsatzConfig, Entanglement, EntanglementGate, RotationGate};
pub use statevector::Statevector;

/// Largest register the statevector simulator accepts
pub const MAX_QUBITS: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gate {
    /// a rotation whose angle is the circuit parameter with index `parameter`
    Rotation {
        gate: RotationGate,
        qubit: usize,
        parameter: usize,
    },
    Entangler {
        gate: EntanglementGate,
        control: usize,
        target: usize,
    },
}

/// A gate sequence on a fixed register whose rotation angles are bound at run time.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterizedCircuit {
    num_qubits: usize,
    num_parameters: usize,
    gates: Vec<Gate>,
}

impl ParameterizedCircuit {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            num_parameters: 0,
            gates: Vec::new(),
        }
    }

    /// Appends a rotation with a fresh parameter and returns that parameter's index
    pub fn rotation(&mut self, gate: RotationGate, qubit: usize) -> usize {
        let parameter = self.num_parameters;
        self.num_parameters += 1;
        self.gates.push(Gate::Rotation {
            gate,
            qubit,
            parameter,
        });
        parameter
    }

    pub fn entangle(&mut self, gate: EntanglementGate, control: usize, target: usize) {
        self.gates.push(Gate::Entangler {
            gate,
            control,
            target,
        });
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Runs the circuit on `|0...0>`
    pub fn statevector(&self, parameters: &DVector<f64>) -> Statevector {
        assert_eq!(
            parameters.len(),
            self.num_parameters,
            "wrong number of circuit parameters"
        );

        let mut state = Statevector::zero_state(self.num_qubits);
        for gate in &self.gates {
            match *gate {
                Gate::Rotation {
                    gate,
                    qubit,
                    parameter,
                } => state.rotate(gate, qubit, parameters[parameter]),
                Gate::Entangler {
                    gate,
                    control,
                    target,
                } => state.entangle(gate, control, target),
            }
        }
        state
    }
}
