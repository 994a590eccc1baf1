//! Named objectives for the binaries, benchmarks and tests.
//!
//! Each entry carries default bounds and, for functions that only make sense
//! in a fixed number of dimensions, that dimension.

use ndarray::Array1;
use std::collections::HashMap;
use std::f64::consts::{E, PI};

/// Objective function type.
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Registry entry for one objective.
#[derive(Clone, Copy, Debug)]
pub struct FunctionInfo {
    /// The objective itself.
    pub func: TestFunction,
    /// Default `(lower, upper)` bound applied to every dimension.
    pub bounds: (f64, f64),
    /// Required dimension, if the function is not defined for any D.
    pub dimension: Option<usize>,
    /// Known global minimum value.
    pub minimum: f64,
}

impl FunctionInfo {
    /// Default bounds for a `dim`-dimensional search.
    pub fn bounds_for(&self, dim: usize) -> Vec<(f64, f64)> {
        vec![self.bounds; dim]
    }

    /// Dimension used when none is requested.
    pub fn default_dimension(&self) -> usize {
        self.dimension.unwrap_or(2)
    }
}

/// Function registry mapping names to objectives.
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionInfo>,
}

impl FunctionRegistry {
    /// Creates a new registry with all built-in objectives.
    pub fn new() -> Self {
        let mut functions = HashMap::new();

        functions.insert(
            "quadratic_bowl".to_string(),
            FunctionInfo {
                func: quadratic_bowl,
                bounds: (-15.0, 15.0),
                dimension: Some(2),
                minimum: 50.0 / 3.0,
            },
        );
        functions.insert(
            "booth".to_string(),
            FunctionInfo {
                func: booth,
                bounds: (-10.0, 10.0),
                dimension: Some(2),
                minimum: 0.0,
            },
        );
        functions.insert(
            "sphere".to_string(),
            FunctionInfo {
                func: sphere,
                bounds: (-5.0, 5.0),
                dimension: None,
                minimum: 0.0,
            },
        );
        functions.insert(
            "rosenbrock".to_string(),
            FunctionInfo {
                func: rosenbrock,
                bounds: (-2.048, 2.048),
                dimension: None,
                minimum: 0.0,
            },
        );
        functions.insert(
            "rastrigin".to_string(),
            FunctionInfo {
                func: rastrigin,
                bounds: (-5.12, 5.12),
                dimension: None,
                minimum: 0.0,
            },
        );
        functions.insert(
            "ackley".to_string(),
            FunctionInfo {
                func: ackley,
                bounds: (-32.768, 32.768),
                dimension: None,
                minimum: 0.0,
            },
        );

        Self { functions }
    }

    /// Gets an objective by name.
    pub fn get(&self, name: &str) -> Option<TestFunction> {
        self.functions.get(name).map(|info| info.func)
    }

    /// Gets the full entry for `name`.
    pub fn info(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.get(name)
    }

    /// Lists all available function names, sorted alphabetically.
    pub fn list_functions(&self) -> Vec<String> {
        let mut names: Vec<_> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns an iterator over all (name, entry) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FunctionInfo)> {
        self.functions.iter()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `x0² + x0·x1 + x1² − 5·x0 − 5·x1 + 25`, minimum 50/3 at (5/3, 5/3).
///
/// Only the first two coordinates are used.
pub fn quadratic_bowl(x: &Array1<f64>) -> f64 {
    let (x0, x1) = (x[0], x[1]);
    x0 * x0 + x0 * x1 + x1 * x1 - 5.0 * x0 - 5.0 * x1 + 25.0
}

/// Booth function, minimum 0 at (1, 3).
pub fn booth(x: &Array1<f64>) -> f64 {
    let (x0, x1) = (x[0], x[1]);
    (x0 + 2.0 * x1 - 7.0).powi(2) + (2.0 * x0 + x1 - 5.0).powi(2)
}

/// Sum of squares.
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Rosenbrock valley, minimum 0 at (1, ..., 1).
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .map(|w| 100.0 * (w[1] - w[0].powi(2)).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Rastrigin function, minimum 0 at the origin.
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    let a = 10.0;
    a * x.len() as f64
        + x.iter()
            .map(|&xi| xi * xi - a * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Ackley function, minimum 0 at the origin.
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}
