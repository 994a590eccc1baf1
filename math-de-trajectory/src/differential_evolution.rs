use crate::{DEConfig, DEReport, DifferentialEvolution, Result};
use ndarray::Array1;

/// Runs DE/rand/1/bin on `func` and returns the report.
///
/// Validates `config`, runs exactly `config.maxiter` generations and returns
/// the best position, its score and the full trajectory.
///
/// # Errors
///
/// Any error of [`DEConfig::validate`]; no objective call is made in that case.
///
/// # Example
///
/// ```rust
/// use math_de_trajectory::{differential_evolution, DEConfigBuilder};
///
/// let config = DEConfigBuilder::new()
///     .bounds(vec![(-5.0, 5.0), (-5.0, 5.0)])
///     .maxiter(50)
///     .seed(42)
///     .build()
///     .expect("valid config");
/// let result = differential_evolution(&|x| x[0].powi(2) + x[1].powi(2), config)
///     .expect("optimization failed");
///
/// assert!(result.fun < 0.01);
/// ```
pub fn differential_evolution<F>(func: &F, config: DEConfig) -> Result<DEReport>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let de = DifferentialEvolution::new(func, config)?;
    Ok(de.solve())
}
