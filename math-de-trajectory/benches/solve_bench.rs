use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_de_trajectory::function_registry::{quadratic_bowl, rastrigin};
use math_de_trajectory::{DEConfig, DEConfigBuilder, DifferentialEvolution, pick_three_distinct};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_default_run(c: &mut Criterion) {
    let config = DEConfig {
        seed: Some(42),
        ..DEConfig::default()
    };

    c.bench_function("solve_quadratic_bowl_default", |b| {
        b.iter(|| {
            let de = DifferentialEvolution::new(&quadratic_bowl, config.clone())
                .expect("valid config");
            black_box(de.solve());
        })
    });
}

fn bench_dimension_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_rastrigin");
    for dim in [2usize, 10, 30] {
        let config = DEConfigBuilder::new()
            .bounds(vec![(-5.12, 5.12); dim])
            .popsize(40)
            .maxiter(100)
            .seed(7)
            .build()
            .expect("valid config");
        group.bench_with_input(BenchmarkId::from_parameter(dim), &config, |b, config| {
            b.iter(|| {
                let de = DifferentialEvolution::new(&rastrigin, config.clone())
                    .expect("valid config");
                black_box(de.solve());
            })
        });
    }
    group.finish();
}

fn bench_donor_selection(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("pick_three_distinct_100", |b| {
        b.iter(|| black_box(pick_three_distinct(black_box(100), 17, &mut rng)))
    });
}

criterion_group!(
    benches,
    bench_default_run,
    bench_dimension_scaling,
    bench_donor_selection
);
criterion_main!(benches);
