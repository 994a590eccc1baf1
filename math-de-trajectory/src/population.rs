use ndarray::{Array1, Array2, ArrayView1};

/// Score of an agent whose position has not been evaluated yet.
///
/// Compares worse than every finite score.
pub const UNEVALUATED: f64 = f64::INFINITY;

/// The N agents of a run: one position row and one score per slot.
///
/// Slot indices are stable for the whole run; only positions and scores change.
#[derive(Debug, Clone)]
pub struct Population {
    positions: Array2<f64>,
    scores: Array1<f64>,
}

impl Population {
    /// Wraps `positions` (one row per agent) with every score unevaluated.
    pub fn new(positions: Array2<f64>) -> Self {
        let scores = Array1::from_elem(positions.nrows(), UNEVALUATED);
        Self { positions, scores }
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.positions.nrows()
    }

    /// Returns `true` if there are no agents.
    pub fn is_empty(&self) -> bool {
        self.positions.nrows() == 0
    }

    /// Dimension of every position.
    pub fn dimension(&self) -> usize {
        self.positions.ncols()
    }

    /// Position of agent `i`.
    pub fn position(&self, i: usize) -> ArrayView1<'_, f64> {
        self.positions.row(i)
    }

    /// Score of agent `i`, or `None` while it is unevaluated.
    pub fn score(&self, i: usize) -> Option<f64> {
        let s = self.scores[i];
        if s == UNEVALUATED { None } else { Some(s) }
    }

    /// Returns `true` once agent `i` has a score.
    pub fn is_evaluated(&self, i: usize) -> bool {
        self.scores[i] != UNEVALUATED
    }

    pub(crate) fn set_score(&mut self, i: usize, score: f64) {
        self.scores[i] = score;
    }

    pub(crate) fn replace(&mut self, i: usize, position: &Array1<f64>, score: f64) {
        self.positions.row_mut(i).assign(position);
        self.scores[i] = score;
    }

    /// All positions, one row per agent.
    pub fn positions(&self) -> &Array2<f64> {
        &self.positions
    }

    /// All scores; unevaluated agents hold [`UNEVALUATED`].
    pub fn scores(&self) -> &Array1<f64> {
        &self.scores
    }

    pub(crate) fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.positions, self.scores)
    }
}
