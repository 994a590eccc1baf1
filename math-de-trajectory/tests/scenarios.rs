use approx::assert_relative_eq;
use math_de_trajectory::function_registry::{FunctionRegistry, quadratic_bowl, sphere};
use math_de_trajectory::{
    DEConfig, DEConfigBuilder, Trajectory, differential_evolution, pick_three_distinct,
};
use ndarray::array;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use tempfile::TempDir;

#[test]
fn test_sphere_small_population_converges() {
    let config = DEConfigBuilder::new()
        .bounds(vec![(-1.0, 1.0), (-1.0, 1.0)])
        .popsize(4)
        .mutation(0.5)
        .recombination(0.9)
        .maxiter(100)
        .seed(42)
        .build()
        .expect("valid config");

    let report = differential_evolution(&sphere, config).expect("run");

    assert!(report.fun < 0.01, "best={}", report.fun);
    assert_eq!(report.trajectory.len(), 100);
    for snapshot in report.trajectory.iter() {
        assert_eq!(snapshot.dim(), (4, 2));
    }
}

#[test]
fn test_donors_for_four_agents_are_the_other_three() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..50 {
        let (a, b, c) = pick_three_distinct(4, 2, &mut rng);
        let got: HashSet<usize> = [a, b, c].into_iter().collect();
        assert_eq!(got, HashSet::from([0, 1, 3]));
    }
}

#[test]
fn test_quadratic_bowl_reference_values() {
    assert_eq!(quadratic_bowl(&array![0.0, 0.0]), 25.0);
    assert_relative_eq!(quadratic_bowl(&array![2.5, 2.5]), 18.75);
}

#[test]
fn test_default_run_finds_bowl_minimum() {
    let config = DEConfigBuilder::new()
        .seed(7)
        .maxiter(200)
        .build()
        .expect("valid config");

    let report = differential_evolution(&quadratic_bowl, config).expect("run");

    assert_relative_eq!(report.fun, 50.0 / 3.0, epsilon = 1e-6);
    assert_relative_eq!(report.x[0], 5.0 / 3.0, epsilon = 1e-2);
    assert_relative_eq!(report.x[1], 5.0 / 3.0, epsilon = 1e-2);
}

#[test]
fn test_same_seed_is_bit_identical() {
    let config = DEConfigBuilder::new()
        .bounds(vec![(-3.0, 3.0); 4])
        .popsize(10)
        .maxiter(40)
        .seed(31337)
        .build()
        .expect("valid config");

    let a = differential_evolution(&sphere, config.clone()).expect("run");
    let b = differential_evolution(&sphere, config).expect("run");

    assert_eq!(a.trajectory, b.trajectory);
    assert_eq!(a.x, b.x);
    assert_eq!(a.fun.to_bits(), b.fun.to_bits());
}

#[test]
fn test_every_registry_function_runs() {
    let registry = FunctionRegistry::new();

    for name in registry.list_functions() {
        let info = registry.info(&name).expect("listed");
        let dim = info.default_dimension();
        let config = DEConfigBuilder::new()
            .bounds(info.bounds_for(dim))
            .popsize(8)
            .maxiter(5)
            .seed(1)
            .build()
            .expect("valid config");

        let report = differential_evolution(&info.func, config).expect("run");

        assert_eq!(report.nfev, 8 + 8 * 5, "{name}");
        assert!(report.fun >= info.minimum - 1e-9, "{name}");
    }
}

#[test]
fn test_trajectory_csv_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let csv = dir.path().join("nested").join("run.csv");
    let json = dir.path().join("run.json");
    let report = differential_evolution(
        &quadratic_bowl,
        DEConfig {
            seed: Some(3),
            ..DEConfig::default()
        },
    )
    .expect("run");

    report.trajectory.write_csv(&csv).expect("write csv");
    report.trajectory.write_json(&json).expect("write json");

    assert_eq!(Trajectory::read_csv(&csv).expect("read csv"), report.trajectory);
    assert_eq!(
        Trajectory::read_json(&json).expect("read json"),
        report.trajectory
    );
}
