criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(2));
    targets =
        synthesizing_identity_task,
        synthesizing_rotation_task,
        synthesizing_scale_task,
        expanding_one_candidate,
        scoring_one_candidate,
        checking_robustness_of_identity,
}

fn synthesizing_identity_task(c: &mut criterion::Criterion) {
    let registry = PrimitiveRegistry::standard();
    let task = identity_task();
    let config = SynthesisConfig::default();
    c.bench_function("beam-synthesize a one-step identity task", |b| {
        b.iter(|| BeamSynthesizer::new().synthesize(&task, &config, &registry, &[]))
    });
}

fn synthesizing_rotation_task(c: &mut criterion::Criterion) {
    let registry = PrimitiveRegistry::standard();
    let task = rotation_task();
    let config = SynthesisConfig::default();
    c.bench_function("beam-synthesize a 90-degree rotation task", |b| {
        b.iter(|| BeamSynthesizer::new().synthesize(&task, &config, &registry, &[]))
    });
}

fn synthesizing_scale_task(c: &mut criterion::Criterion) {
    let registry = PrimitiveRegistry::standard();
    let task = scale_task();
    let config = SynthesisConfig::default();
    c.bench_function("beam-synthesize a 2x scale task", |b| {
        b.iter(|| BeamSynthesizer::new().synthesize(&task, &config, &registry, &[]))
    });
}

fn expanding_one_candidate(c: &mut criterion::Criterion) {
    let pool = seed_pool();
    let ast = primitive("reflect_h", vec![]);
    c.bench_function("expand one candidate over the seed pool", |b| {
        b.iter(|| expand(&ast, &pool))
    });
}

fn scoring_one_candidate(c: &mut criterion::Criterion) {
    let registry = PrimitiveRegistry::standard();
    let task = identity_task();
    let ast = primitive("identity", vec![]);
    let critic = evaluate(&ast, &task, &registry);
    c.bench_function("score one candidate against a critic result", |b| {
        b.iter(|| score(&ast, &critic))
    });
}

fn checking_robustness_of_identity(c: &mut criterion::Criterion) {
    let registry = PrimitiveRegistry::standard();
    let task = identity_task();
    let ast = primitive("identity", vec![]);
    let config = RobustnessConfig::default();
    c.bench_function("robustness-check a certified identity program", |b| {
        b.iter(|| check_robustness(&ast, &task, &registry, &config))
    });
}

fn identity_task() -> ARCTask {
    let grid = Grid::from_rows(&[vec![1, 2, 0], vec![0, 3, 4]]);
    ARCTask::new("bench-identity", vec![ARCPair { input: grid.clone(), output: grid }], vec![])
}

fn rotation_task() -> ARCTask {
    let input = Grid::from_rows(&[vec![1, 0], vec![0, 0]]);
    let output = Grid::from_rows(&[vec![0, 1], vec![0, 0]]);
    ARCTask::new("bench-rotation", vec![ARCPair { input, output }], vec![])
}

fn scale_task() -> ARCTask {
    let input = Grid::from_rows(&[vec![1, 2]]);
    let output = Grid::from_rows(&[vec![1, 1, 2, 2], vec![1, 1, 2, 2]]);
    ARCTask::new("bench-scale", vec![ARCPair { input, output }], vec![])
}

use jurisagi::critic::evaluate;
use jurisagi::dsl::ast::primitive;
use jurisagi::dsl::PrimitiveRegistry;
use jurisagi::grid::Grid;
use jurisagi::robustness::{check_robustness, RobustnessConfig};
use jurisagi::synth::beam::BeamSynthesizer;
use jurisagi::synth::expansion::{expand, seed_pool};
use jurisagi::synth::scoring::score;
use jurisagi::synth::{SynthesisConfig, Synthesizer};
use jurisagi::task::{ARCPair, ARCTask};
