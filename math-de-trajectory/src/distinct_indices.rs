use rand::Rng;
use rand::seq::SliceRandom;

/// Picks three pairwise-distinct population indices, none equal to `exclude`.
///
/// The whole index range is shuffled and the first three entries different from
/// `exclude` are returned in scan order, so every ordered triple is equally likely.
/// The first index is the mutation base, the other two form the difference term.
///
/// `pool_size < 4` is a programmer error: configuration validation rejects such
/// populations before any run starts.
pub fn pick_three_distinct<R: Rng + ?Sized>(
    pool_size: usize,
    exclude: usize,
    rng: &mut R,
) -> (usize, usize, usize) {
    debug_assert!(pool_size >= 4, "need at least 4 agents, got {pool_size}");
    let idxs = distinct_indices(exclude, 3, pool_size, rng);
    (idxs[0], idxs[1], idxs[2])
}

pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= pool_size.saturating_sub(1));
    let mut idxs: Vec<usize> = (0..pool_size).collect();
    idxs.shuffle(rng);
    let mut out = Vec::with_capacity(count);
    for idx in idxs.into_iter() {
        if idx == exclude {
            continue;
        }
        out.push(idx);
        if out.len() == count {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    #[test]
    fn test_three_distinct_and_not_excluded() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 4..12 {
            for exclude in 0..n {
                for _ in 0..20 {
                    let (a, b, c) = pick_three_distinct(n, exclude, &mut rng);
                    assert!(a < n && b < n && c < n);
                    assert!(a != b && b != c && a != c);
                    assert!(a != exclude && b != exclude && c != exclude);
                }
            }
        }
    }

    #[test]
    fn test_minimum_population_uses_every_other_index() {
        let mut rng = StdRng::seed_from_u64(42);
        for exclude in 0..4 {
            let (a, b, c) = pick_three_distinct(4, exclude, &mut rng);
            let got: BTreeSet<usize> = [a, b, c].into_iter().collect();
            let expected: BTreeSet<usize> = (0..4).filter(|&i| i != exclude).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_every_valid_index_reachable_as_base() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [0usize; 6];
        for _ in 0..600 {
            let (a, _, _) = pick_three_distinct(6, 2, &mut rng);
            seen[a] += 1;
        }
        assert_eq!(seen[2], 0);
        for (i, &count) in seen.iter().enumerate() {
            if i != 2 {
                assert!(count > 60, "index {i} drawn only {count} times");
            }
        }
    }
}
