use ndarray::{Array1, ArrayView1, Zip};

/// Rand/1 mutant: `a + f * (b - c)`.
pub(crate) fn mutant_rand1(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
    c: ArrayView1<'_, f64>,
    f: f64,
) -> Array1<f64> {
    Zip::from(a)
        .and(b)
        .and(c)
        .map_collect(|&x0, &x1, &x2| x0 + f * (x1 - x2))
}
