use ndarray::Array1;

use crate::population::Population;

/// Outcome of one greedy selection step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Whether the trial replaced the agent.
    pub updated: bool,
    /// The agent's score after selection.
    pub score: f64,
    /// Objective calls made by this step (1 or 2).
    pub nfev: usize,
}

/// Scores `trial` and keeps it in slot `i` only if it is strictly better.
///
/// An agent that was never evaluated gets its current position scored first,
/// so the objective sees each incumbent once and each trial once. Ties keep
/// the incumbent.
///
/// The objective is expected to return a finite value for every input; a NaN
/// or infinite result is a contract violation that this function does not
/// try to repair.
pub fn evaluate_and_select<F>(
    i: usize,
    trial: Array1<f64>,
    pop: &mut Population,
    func: &F,
) -> Selection
where
    F: Fn(&Array1<f64>) -> f64,
{
    let mut nfev = 0;
    if !pop.is_evaluated(i) {
        let s = func(&pop.position(i).to_owned());
        nfev += 1;
        pop.set_score(i, s);
    }
    let current = pop.scores()[i];

    let trial_score = func(&trial);
    nfev += 1;

    if trial_score < current {
        pop.replace(i, &trial, trial_score);
        Selection {
            updated: true,
            score: trial_score,
            nfev,
        }
    } else {
        Selection {
            updated: false,
            score: current,
            nfev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::cell::Cell;

    fn sphere(x: &Array1<f64>) -> f64 {
        x.iter().map(|&xi| xi * xi).sum()
    }

    fn population() -> Population {
        Population::new(array![[1.0, 1.0], [2.0, 0.0], [0.0, 3.0], [4.0, 4.0]])
    }

    #[test]
    fn test_better_trial_replaces_agent() {
        let mut pop = population();

        let sel = evaluate_and_select(0, array![0.5, 0.0], &mut pop, &sphere);

        assert!(sel.updated);
        assert_eq!(sel.score, 0.25);
        assert_eq!(sel.nfev, 2);
        assert_eq!(pop.position(0), array![0.5, 0.0]);
        assert_eq!(pop.score(0), Some(0.25));
    }

    #[test]
    fn test_worse_trial_keeps_agent() {
        let mut pop = population();

        let sel = evaluate_and_select(1, array![5.0, 5.0], &mut pop, &sphere);

        assert!(!sel.updated);
        assert_eq!(sel.score, 4.0);
        assert_eq!(pop.position(1), array![2.0, 0.0]);
        assert_eq!(pop.score(1), Some(4.0));
    }

    #[test]
    fn test_tie_keeps_incumbent() {
        let mut pop = population();

        let sel = evaluate_and_select(1, array![0.0, 2.0], &mut pop, &sphere);

        assert!(!sel.updated);
        assert_eq!(pop.position(1), array![2.0, 0.0]);
    }

    #[test]
    fn test_incumbent_evaluated_only_on_first_touch() {
        let calls = Cell::new(0usize);
        let counted = |x: &Array1<f64>| {
            calls.set(calls.get() + 1);
            sphere(x)
        };
        let mut pop = population();

        let first = evaluate_and_select(2, array![0.0, 4.0], &mut pop, &counted);
        assert_eq!(calls.get(), 2);
        assert_eq!(first.nfev, 2);

        let second = evaluate_and_select(2, array![0.0, 5.0], &mut pop, &counted);
        assert_eq!(calls.get(), 3);
        assert_eq!(second.nfev, 1);
        assert_eq!(pop.score(2), Some(9.0));
    }
}
