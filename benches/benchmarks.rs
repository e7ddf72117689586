use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use porenet_rs::discretization::generator::ThroatField;
use porenet_rs::models::pore::{NetworkParams, PressureField, SimulationConfig};
use porenet_rs::numerics::solver::{solve_direct, PressureSolver};
use porenet_rs::numerics::sor::SorSolver;
use porenet_rs::physics::assembly::SystemAssembler;
use porenet_rs::physics::conductance::{ConductanceModel, FlowRegime};

fn problem_sizes() -> Vec<usize> {
    vec![4, 6]
}

fn solver_sizes() -> Vec<usize> {
    vec![4, 6]
}

fn network(size: usize) -> NetworkParams {
    NetworkParams {
        n: size + 2,
        m: size,
        w: size,
        z_avg: 12.0,
        seed: 42,
        ..NetworkParams::default()
    }
}

fn setup(size: usize) -> (SimulationConfig, ThroatField) {
    let config = SimulationConfig {
        network: network(size),
        ..SimulationConfig::default()
    };
    let throats = ThroatField::sample(&config.network).unwrap();
    (config, throats)
}

fn assembler<'a>(config: &SimulationConfig, throats: &'a ThroatField) -> SystemAssembler<'a> {
    let model = ConductanceModel::new(config.fluid, FlowRegime::Viscous, throats.cutoff);
    SystemAssembler::new(
        throats,
        model,
        config.boundary_conditions(),
        config.network.r_avg,
        config.network.l_avg,
    )
}

fn bench_throat_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("throat_sampling");
    for &size in &problem_sizes() {
        let params = network(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &_| {
            b.iter(|| {
                let field = ThroatField::sample(std::hint::black_box(&params)).unwrap();
                std::hint::black_box(field.network());
            });
        });
    }
    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    for &size in &problem_sizes() {
        let (config, throats) = setup(size);
        let asm = assembler(&config, &throats);
        let init = PressureField::initial(throats.lattice, &asm.bc);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &_| {
            b.iter(|| {
                let (system, _stats) = asm.assemble(init.values.as_slice());
                std::hint::black_box(system);
            });
        });
    }
    group.finish();
}

fn bench_direct_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct_solve");
    for &size in &solver_sizes() {
        let (config, throats) = setup(size);
        let asm = assembler(&config, &throats);
        let init = PressureField::initial(throats.lattice, &asm.bc);
        let (system, _) = asm.assemble(init.values.as_slice());
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &_| {
            b.iter(|| {
                let _ = std::hint::black_box(solve_direct(&system));
            });
        });
    }
    group.finish();
}

fn bench_sor_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("sor_solve");
    for &size in &solver_sizes() {
        let (config, throats) = setup(size);
        let asm = assembler(&config, &throats);
        let init = PressureField::initial(throats.lattice, &asm.bc);
        let (system, _) = asm.assemble(init.values.as_slice());
        let sor = SorSolver::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &_| {
            b.iter_batched(
                || init.values.clone(),
                |p| {
                    let _ = sor.solve(&system, p, false);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_pressure_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("pressure_solver");
    for &size in &solver_sizes() {
        let (config, throats) = setup(size);
        let asm = assembler(&config, &throats);
        let init = PressureField::initial(throats.lattice, &asm.bc);
        let solver = PressureSolver::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &_| {
            b.iter_batched(
                || init.values.clone(),
                |p| {
                    let _ = solver.solve(&asm, p, false);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_throat_sampling,
    bench_assembly,
    bench_direct_solve,
    bench_sor_solve,
    bench_pressure_solver
);
criterion_main!(benches);
