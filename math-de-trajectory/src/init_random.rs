use ndarray::Array2;
use rand::Rng;

use crate::DEConfig;
use crate::population::Population;

/// Draws every coordinate uniformly in its bounds, agent by agent.
///
/// The configuration must already be validated. Scores start unevaluated.
pub fn init_random<R: Rng + ?Sized>(config: &DEConfig, rng: &mut R) -> Population {
    let n = config.dimension();
    let npop = config.popsize;
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for (j, &(lower, upper)) in config.bounds.iter().enumerate() {
            let u: f64 = rng.random::<f64>();
            pop[(i, j)] = lower + u * (upper - lower);
        }
    }
    Population::new(pop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEConfigBuilder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_initialization_dimensions() {
        let config = DEConfigBuilder::new()
            .bounds(vec![(0.0, 10.0), (0.0, 10.0), (-1.0, 1.0)])
            .popsize(20)
            .build()
            .expect("valid config");
        let mut rng = StdRng::seed_from_u64(42);

        let pop = init_random(&config, &mut rng);

        assert_eq!(pop.len(), 20);
        assert_eq!(pop.dimension(), 3);
        assert!((0..20).all(|i| !pop.is_evaluated(i)));
    }

    #[test]
    fn test_random_initialization_bounds() {
        let config = DEConfigBuilder::new()
            .bounds(vec![(0.0, 10.0), (-3.0, -2.0)])
            .popsize(50)
            .build()
            .expect("valid config");
        let mut rng = StdRng::seed_from_u64(42);

        let pop = init_random(&config, &mut rng);

        for row in pop.positions().rows() {
            assert!(row[0] >= 0.0 && row[0] <= 10.0);
            assert!(row[1] >= -3.0 && row[1] <= -2.0);
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let config = DEConfig::default();

        let a = init_random(&config, &mut StdRng::seed_from_u64(5));
        let b = init_random(&config, &mut StdRng::seed_from_u64(5));

        assert_eq!(a.positions(), b.positions());
    }
}
