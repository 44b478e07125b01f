use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::DVector;
use vqe_core::{
    basis::BasisSet,
    circuit::AnsatzConfig,
    integrals::{ElectronTensor, McMurchieDavidson},
    mapping::MapperKind,
    GroundStateEstimator, ScalingFactor,
};

const INTEGRATOR: McMurchieDavidson = McMurchieDavidson;

fn bench_electron(c: &mut Criterion) {
    let estimator = GroundStateEstimator::default();
    let geometry = estimator.geometry(0.735).unwrap();
    let basis = BasisSet::sto3g().basis_for(geometry.atoms()).unwrap();

    c.bench_function("Electron Repulsion H2 STO-3G", |b| {
        b.iter(|| ElectronTensor::from_basis(&basis, &INTEGRATOR))
    });
}

fn bench_hamiltonian(c: &mut Criterion) {
    let estimator = GroundStateEstimator::default();
    let geometry = estimator.geometry(0.735).unwrap();
    let scaling = ScalingFactor::new(1.0).unwrap();

    for mapper in [MapperKind::JordanWigner, MapperKind::Parity] {
        let estimator = GroundStateEstimator::new(vqe_core::EstimatorConfig {
            mapper,
            ..Default::default()
        })
        .unwrap();
        c.bench_function(&format!("Qubit Hamiltonian {mapper:?}"), |b| {
            b.iter(|| estimator.qubit_hamiltonian(&geometry, scaling).unwrap())
        });
    }
}

fn bench_expectation(c: &mut Criterion) {
    let estimator = GroundStateEstimator::default();
    let geometry = estimator.geometry(0.735).unwrap();
    let (_, hamiltonian) = estimator
        .qubit_hamiltonian(&geometry, ScalingFactor::new(1.0).unwrap())
        .unwrap();
    let ansatz = AnsatzConfig::default().two_local(hamiltonian.num_qubits());
    let parameters = DVector::from_element(ansatz.num_parameters(), 0.3);

    c.bench_function("Ansatz Expectation H2", |b| {
        b.iter(|| ansatz.statevector(&parameters).expectation(&hamiltonian))
    });
}

fn bench_estimate(c: &mut Criterion) {
    let estimator = GroundStateEstimator::default();

    let mut group = c.benchmark_group("Estimate");
    group.sample_size(10);
    group.bench_function("H2 0.735", |b| {
        b.iter(|| estimator.estimate_energy(0.735, 1.0).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_electron,
    bench_hamiltonian,
    bench_expectation,
    bench_estimate
);
criterion_main!(benches);
