use ndarray::{Array1, ArrayView1};
use rand::Rng;

/// Binomial crossover with one forced mutant coordinate.
///
/// `jrand` is drawn first; the uniform draw for a coordinate only happens when
/// that coordinate is not `jrand`.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    target: ArrayView1<'_, f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = target.len();
    let jrand = rng.random_range(0..n);
    let mut trial = target.to_owned();
    for j in 0..n {
        if j == jrand || rng.random::<f64>() < cr {
            trial[j] = mutant[j];
        }
    }
    trial
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_binomial_crossover_preserves_dimensions() {
        let target = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let mutant = array![10.0, 20.0, 30.0, 40.0, 50.0];
        let mut rng = StdRng::seed_from_u64(42);

        let trial = binomial_crossover(target.view(), &mutant, 0.5, &mut rng);

        assert_eq!(trial.len(), target.len());
        for j in 0..trial.len() {
            assert!(trial[j] == target[j] || trial[j] == mutant[j]);
        }
    }

    #[test]
    fn test_zero_rate_takes_exactly_one_mutant_coordinate() {
        let target = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let mutant = array![10.0, 20.0, 30.0, 40.0, 50.0];
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let trial = binomial_crossover(target.view(), &mutant, 0.0, &mut rng);
            let from_mutant = (0..5).filter(|&j| trial[j] == mutant[j]).count();
            assert_eq!(from_mutant, 1);
        }
    }

    #[test]
    fn test_full_rate_takes_whole_mutant() {
        let target = array![1.0, 2.0, 3.0];
        let mutant = array![-1.0, -2.0, -3.0];
        let mut rng = StdRng::seed_from_u64(1);

        let trial = binomial_crossover(target.view(), &mutant, 1.0, &mut rng);

        assert_eq!(trial, mutant);
    }
}
