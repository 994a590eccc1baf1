use ndarray::{Array1, ArrayView1};
use rand::Rng;

use crate::crossover_binomial::binomial_crossover;
use crate::distinct_indices::pick_three_distinct;
use crate::mutant_rand1::mutant_rand1;
use crate::population::Population;

/// Builds a DE/rand/1/bin trial vector from a target and three donors.
///
/// One coordinate, drawn uniformly, always comes from the mutant
/// `a + f * (b - c)`; every other coordinate comes from the mutant with
/// probability `cr` and from `target` otherwise. No clipping is applied.
pub fn make_trial<R: Rng + ?Sized>(
    target: ArrayView1<'_, f64>,
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
    c: ArrayView1<'_, f64>,
    f: f64,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let mutant = mutant_rand1(a, b, c, f);
    binomial_crossover(target, &mutant, cr, rng)
}

/// Picks donors for agent `i` in `pop` and builds its trial.
///
/// Only reads `pop`, so every trial of a generation sees the same frozen state.
pub(crate) fn trial_for_agent<R: Rng + ?Sized>(
    i: usize,
    pop: &Population,
    f: f64,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let (ia, ib, ic) = pick_three_distinct(pop.len(), i, rng);
    make_trial(
        pop.position(i),
        pop.position(ia),
        pop.position(ib),
        pop.position(ic),
        f,
        cr,
        rng,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_forced_dimension_changes_trial() {
        let target = array![0.0, 0.0, 0.0, 0.0];
        let a = array![1.0, 1.0, 1.0, 1.0];
        let b = array![2.0, 2.0, 2.0, 2.0];
        let c = array![0.0, 0.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let trial = make_trial(
                target.view(),
                a.view(),
                b.view(),
                c.view(),
                0.5,
                0.0,
                &mut rng,
            );
            assert_ne!(trial, target);
            let changed: Vec<f64> = trial.iter().copied().filter(|&v| v != 0.0).collect();
            assert_eq!(changed, vec![2.0]);
        }
    }

    #[test]
    fn test_trial_coordinates_come_from_target_or_mutant() {
        let target = array![5.0, 6.0, 7.0];
        let a = array![1.0, 2.0, 3.0];
        let b = array![1.0, 1.0, 1.0];
        let c = array![0.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(5);

        let trial = make_trial(
            target.view(),
            a.view(),
            b.view(),
            c.view(),
            1.0,
            0.5,
            &mut rng,
        );

        let mutant = array![2.0, 3.0, 4.0];
        for j in 0..3 {
            assert!(trial[j] == target[j] || trial[j] == mutant[j]);
        }
    }

    #[test]
    fn test_trial_may_leave_initial_box() {
        let target = array![0.75];
        let a = array![0.75];
        let b = array![1.0];
        let c = array![-1.0];
        let mut rng = StdRng::seed_from_u64(0);

        let trial = make_trial(
            target.view(),
            a.view(),
            b.view(),
            c.view(),
            0.5,
            0.9,
            &mut rng,
        );

        assert_eq!(trial[0], 1.75);
    }
}
