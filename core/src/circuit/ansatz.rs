use serde::{Deserialize, Serialize};

use super::ParameterizedCircuit;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationGate {
    Rx,
    #[default]
    Ry,
    Rz,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntanglementGate {
    #[default]
    Cz,
    Cx,
}

/// Which qubit pairs an entangling layer couples
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entanglement {
    /// every pair `(i, j)` with `i < j`
    #[default]
    Full,
    /// `(i, i + 1)`
    Linear,
    /// linear, preceded by `(n - 1, 0)`
    Circular,
}

impl Entanglement {
    pub fn pairs(self, num_qubits: usize) -> Vec<(usize, usize)> {
        let linear = (1..num_qubits).map(|target| (target - 1, target));
        match self {
            Entanglement::Full => (0..num_qubits)
                .flat_map(|i| (i + 1..num_qubits).map(move |j| (i, j)))
                .collect(),
            Entanglement::Linear => linear.collect(),
            Entanglement::Circular if num_qubits > 2 => {
                std::iter::once((num_qubits - 1, 0)).chain(linear).collect()
            }
            Entanglement::Circular => linear.collect(),
        }
    }
}

/// Layers of single qubit rotations alternating with entangling layers, ending in a
/// rotation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnsatzConfig {
    /// the number of entangling layers
    pub reps: usize,
    pub rotation: RotationGate,
    pub entanglement_gate: EntanglementGate,
    pub entanglement: Entanglement,
}

impl Default for AnsatzConfig {
    fn default() -> Self {
        Self {
            reps: 3,
            rotation: RotationGate::Ry,
            entanglement_gate: EntanglementGate::Cz,
            entanglement: Entanglement::Full,
        }
    }
}

impl AnsatzConfig {
    pub fn two_local(&self, num_qubits: usize) -> ParameterizedCircuit {
        let mut circuit = ParameterizedCircuit::new(num_qubits);
        let pairs = self.entanglement.pairs(num_qubits);

        for layer in 0..=self.reps {
            if layer > 0 {
                for &(control, target) in &pairs {
                    circuit.entangle(self.entanglement_gate, control, target);
                }
            }
            for qubit in 0..num_qubits {
                circuit.rotation(self.rotation, qubit);
            }
        }

        circuit
    }
}
