//! Recording wrapper that stores the trajectory of a run on disk.

use crate::error::{DEError, Result};
use crate::{DEConfig, DEReport, differential_evolution};
use directories::ProjectDirs;
use ndarray::Array1;
use std::path::{Path, PathBuf};

/// Get the records directory using the directories crate
pub fn records_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "spinorama", "math-audio").ok_or_else(|| {
        DEError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "failed to determine project directories",
        ))
    })?;

    let records_dir = proj_dirs.cache_dir().join("records");
    std::fs::create_dir_all(&records_dir)?;

    Ok(records_dir)
}

/// Runs the optimizer and writes `<name>_trajectory.csv` into the records directory.
///
/// Returns the report together with the path of the CSV file.
pub fn run_recorded_differential_evolution<F>(
    function_name: &str,
    func: F,
    config: DEConfig,
) -> Result<(DEReport, PathBuf)>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let dir = records_dir()?;
    run_recorded_in(&dir, function_name, func, config)
}

/// Same as [`run_recorded_differential_evolution`] with an explicit output directory.
pub fn run_recorded_in<F>(
    dir: &Path,
    function_name: &str,
    func: F,
    config: DEConfig,
) -> Result<(DEReport, PathBuf)>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let report = differential_evolution(&func, config)?;

    let csv_path = dir.join(format!("{}_trajectory.csv", function_name));
    report.trajectory.write_csv(&csv_path)?;
    log::info!(
        "Saved {} iterations x {} agents to {}",
        report.trajectory.len(),
        report.trajectory.population_size(),
        csv_path.display()
    );

    Ok((report, csv_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEConfigBuilder, Trajectory};
    use tempfile::TempDir;

    #[test]
    fn test_run_recorded_basic() {
        let quadratic = |x: &Array1<f64>| -> f64 { x.iter().map(|&xi| xi * xi).sum() };
        let config = DEConfigBuilder::new()
            .bounds(vec![(-5.0, 5.0), (-5.0, 5.0)])
            .seed(42)
            .maxiter(20)
            .popsize(10)
            .build()
            .expect("popsize must be >= 4");
        let dir = TempDir::new().expect("temp dir");

        let (report, csv_path) =
            run_recorded_in(dir.path(), "test_quadratic", quadratic, config).expect("run");

        assert!(csv_path.ends_with("test_quadratic_trajectory.csv"));
        let back = Trajectory::read_csv(&csv_path).expect("read back");
        assert_eq!(back, report.trajectory);
        assert_eq!(back.len(), 20);
        assert_eq!(back.population_size(), 10);
    }

    #[test]
    fn test_run_recorded_invalid_config_writes_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let config = DEConfig {
            maxiter: 0,
            ..DEConfig::default()
        };

        let err = run_recorded_in(dir.path(), "nothing", |x: &Array1<f64>| x.sum(), config)
            .unwrap_err();

        assert!(matches!(err, DEError::NoIterations));
        assert!(!dir.path().join("nothing_trajectory.csv").exists());
    }
}
