//! Differential Evolution (DE/rand/1/bin) with full trajectory recording.
//!
//! A fixed budget of generations is run over a small population. Every
//! generation first builds one trial vector per agent from the previous
//! generation, then greedily replaces each agent whose trial scores strictly
//! better. After each selection the agent's position is copied into a
//! [`Trajectory`], so the whole history can be inspected or plotted once the
//! run is over.
//!
//! # Example
//!
//! ```rust
//! use math_de_trajectory::{differential_evolution, DEConfigBuilder};
//!
//! // Minimize the sphere function: f(x) = sum(x_i^2)
//! let config = DEConfigBuilder::new()
//!     .bounds(vec![(-1.0, 1.0), (-1.0, 1.0)])
//!     .popsize(10)
//!     .maxiter(100)
//!     .seed(42)
//!     .build()
//!     .expect("invalid config");
//!
//! let result = differential_evolution(&|x| x.iter().map(|&xi| xi * xi).sum(), config)
//!     .expect("optimization failed");
//!
//! assert!(result.fun < 1e-3);
//! assert_eq!(result.trajectory.len(), 100);
//! ```
#![warn(missing_docs)]

pub mod error;
pub use error::{DEError, Result};

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Binomial crossover with a forced mutant coordinate.
mod crossover_binomial;
/// Rand/1 mutant construction.
mod mutant_rand1;

/// Selection of distinct donor indices.
pub mod distinct_indices;
/// Uniform random initialization of the population.
pub mod init_random;
/// Agent positions and lazily computed scores.
pub mod population;
/// Greedy one-to-one selection.
pub mod selection;
/// Trial vector construction (mutation + crossover).
pub mod trial;

/// Convenience entry point.
pub mod differential_evolution;
/// Named benchmark objectives with default bounds.
pub mod function_registry;
/// Trajectory recording and export.
pub mod recorder;
/// Run wrapper that stores the trajectory on disk.
pub mod run_recorded;

pub use differential_evolution::differential_evolution;
pub use distinct_indices::pick_three_distinct;
pub use init_random::init_random;
pub use population::{Population, UNEVALUATED};
pub use recorder::{Trajectory, TrajectoryRecorder};
pub use run_recorded::run_recorded_differential_evolution;
pub use selection::{Selection, evaluate_and_select};
pub use trial::make_trial;

use trial::trial_for_agent;

/// What happens to trial coordinates that leave the initialization bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    /// Trials are scored where they land; agents may leave the box.
    #[default]
    Free,
    /// Each trial coordinate is clamped to `[lower, upper]` before scoring.
    Clip,
}

/// Configuration for a DE/rand/1/bin run.
///
/// The defaults are a 2-D search over `[-15, 15]²` with 15 agents, `F = 0.5`,
/// `CR = 0.5` and 40 generations. Use [`DEConfigBuilder`] to get a validated
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DEConfig {
    /// Number of generations; the run never stops early.
    pub maxiter: usize,
    /// Number of agents N (>= 4).
    pub popsize: usize,
    /// Mutation factor F.
    pub mutation: f64,
    /// Crossover probability CR in [0, 1].
    pub recombination: f64,
    /// `(lower, upper)` per dimension; the dimension is `bounds.len()`.
    pub bounds: Vec<(f64, f64)>,
    /// Random seed; a fresh one is drawn and reported when `None`.
    pub seed: Option<u64>,
    /// Handling of trials outside the bounds.
    pub boundary: Boundary,
}

impl Default for DEConfig {
    fn default() -> Self {
        Self {
            maxiter: 40,
            popsize: 15,
            mutation: 0.5,
            recombination: 0.5,
            bounds: vec![(-15.0, 15.0); 2],
            seed: None,
            boundary: Boundary::Free,
        }
    }
}

impl DEConfig {
    /// Dimension of the search space.
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Checks every precondition of a run.
    ///
    /// # Errors
    ///
    /// - `PopulationTooSmall` if `popsize < 4`
    /// - `InvalidDimension` if there are no bounds
    /// - `InvalidBounds` if a pair is not finite with `lower < upper`
    /// - `InvalidMutationFactor` if `mutation` is not finite
    /// - `InvalidCrossoverRate` if `recombination` is outside `[0, 1]`
    /// - `NoIterations` if `maxiter == 0`
    pub fn validate(&self) -> Result<()> {
        if self.popsize < 4 {
            return Err(DEError::PopulationTooSmall {
                pop_size: self.popsize,
            });
        }
        if self.bounds.is_empty() {
            return Err(DEError::InvalidDimension { dimension: 0 });
        }
        for (index, &(lower, upper)) in self.bounds.iter().enumerate() {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(DEError::InvalidBounds {
                    index,
                    lower,
                    upper,
                });
            }
        }
        if !self.mutation.is_finite() {
            return Err(DEError::InvalidMutationFactor {
                factor: self.mutation,
            });
        }
        if !(0.0..=1.0).contains(&self.recombination) {
            return Err(DEError::InvalidCrossoverRate {
                rate: self.recombination,
            });
        }
        if self.maxiter == 0 {
            return Err(DEError::NoIterations);
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    ///
    /// Missing fields take their default value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DEConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Fluent builder for `DEConfig`.
///
/// # Example
///
/// ```rust
/// use math_de_trajectory::DEConfigBuilder;
///
/// let config = DEConfigBuilder::new()
///     .bounds(vec![(-5.0, 5.0); 3])
///     .maxiter(500)
///     .popsize(20)
///     .mutation(0.8)
///     .recombination(0.9)
///     .seed(42)
///     .build()
///     .expect("valid config");
/// assert_eq!(config.dimension(), 3);
/// ```
pub struct DEConfigBuilder {
    cfg: DEConfig,
}

impl Default for DEConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DEConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: DEConfig::default(),
        }
    }
    /// Starts from an existing configuration.
    pub fn from_config(cfg: DEConfig) -> Self {
        Self { cfg }
    }
    /// Sets the number of generations.
    pub fn maxiter(mut self, v: usize) -> Self {
        self.cfg.maxiter = v;
        self
    }
    /// Sets the number of agents.
    pub fn popsize(mut self, v: usize) -> Self {
        self.cfg.popsize = v;
        self
    }
    /// Sets the mutation factor F.
    pub fn mutation(mut self, v: f64) -> Self {
        self.cfg.mutation = v;
        self
    }
    /// Sets the crossover probability CR.
    pub fn recombination(mut self, v: f64) -> Self {
        self.cfg.recombination = v;
        self
    }
    /// Sets the per-dimension bounds, and with them the dimension.
    pub fn bounds(mut self, v: Vec<(f64, f64)>) -> Self {
        self.cfg.bounds = v;
        self
    }
    /// Sets the random seed for reproducibility.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Sets how out-of-bounds trials are handled.
    pub fn boundary(mut self, v: Boundary) -> Self {
        self.cfg.boundary = v;
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Any error of [`DEConfig::validate`].
    pub fn build(self) -> Result<DEConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Result of a DE run.
#[derive(Clone)]
pub struct DEReport {
    /// Best position found.
    pub x: Array1<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Number of generations performed.
    pub nit: usize,
    /// Number of objective evaluations performed.
    pub nfev: usize,
    /// Seed the run used.
    pub seed: u64,
    /// Final population (N x D).
    pub population: Array2<f64>,
    /// Final score of each agent.
    pub population_energies: Array1<f64>,
    /// Best score after each generation; non-increasing.
    pub history: Vec<f64>,
    /// Every agent's position after every generation.
    pub trajectory: Trajectory,
}

impl fmt::Debug for DEReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DEReport")
            .field("x", &format!("len={}", self.x.len()))
            .field("fun", &self.fun)
            .field("nit", &self.nit)
            .field("nfev", &self.nfev)
            .field("seed", &self.seed)
            .field(
                "population",
                &format!("{}x{}", self.population.nrows(), self.population.ncols()),
            )
            .field(
                "trajectory",
                &format!(
                    "{}x{}",
                    self.trajectory.len(),
                    self.trajectory.population_size()
                ),
            )
            .finish()
    }
}

/// Differential Evolution optimizer.
///
/// Create it with [`DifferentialEvolution::new`], which validates the
/// configuration, then call [`solve`](Self::solve).
///
/// The objective must return a finite value for every input, including
/// points outside the bounds. It is called once per agent for its initial
/// position and once per trial.
pub struct DifferentialEvolution<'a, F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    func: &'a F,
    config: DEConfig,
}

impl<'a, F> DifferentialEvolution<'a, F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    /// Creates a new DE optimizer for `func`.
    ///
    /// # Errors
    ///
    /// Any error of [`DEConfig::validate`].
    pub fn new(func: &'a F, config: DEConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { func, config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &DEConfig {
        &self.config
    }

    /// Runs all generations and returns the report.
    pub fn solve(&self) -> DEReport {
        let n = self.config.dimension();
        let npop = self.config.popsize;
        let maxiter = self.config.maxiter;
        let f = self.config.mutation;
        let cr = self.config.recombination;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);

        log::info!(
            "DE init: {} dimensions, population={}, maxiter={}, seed={}",
            n,
            npop,
            maxiter,
            seed
        );
        log::info!(
            "  F={:.3}, CR={:.3}, boundary={:?}",
            f,
            cr,
            self.config.boundary
        );

        let mut pop = init_random(&self.config, &mut rng);
        let mut recorder = TrajectoryRecorder::new(maxiter, npop, n);
        let mut history = Vec::with_capacity(maxiter);

        let mut nfev: usize = 0;
        let mut best_idx = 0usize;
        let mut best_f = UNEVALUATED;

        let t0 = Instant::now();
        for iter in 0..maxiter {
            // Trials only read the previous generation.
            let trials: Vec<Array1<f64>> = (0..npop)
                .map(|i| {
                    let mut trial = trial_for_agent(i, &pop, f, cr, &mut rng);
                    if self.config.boundary == Boundary::Clip {
                        self.clip(&mut trial);
                    }
                    trial
                })
                .collect();

            let mut accepted = 0usize;
            for (i, trial) in trials.into_iter().enumerate() {
                let sel = evaluate_and_select(i, trial, &mut pop, self.func);
                nfev += sel.nfev;
                if sel.updated {
                    accepted += 1;
                }
                // covers both a replacement and a first-touch score
                if sel.score < best_f {
                    best_idx = i;
                    best_f = sel.score;
                }
                recorder.record(iter, i, pop.position(i));
            }
            history.push(best_f);

            log::debug!(
                "DE iter {:4}  best_f={:.6e}  accepted={}/{}",
                iter + 1,
                best_f,
                accepted,
                npop
            );
            log::trace!("DE iter {:4}  population={:?}", iter + 1, pop.positions());
        }

        log::info!(
            "DE finished: {} iterations, {} evaluations, best_f={:.6e} in {:.2?}",
            maxiter,
            nfev,
            best_f,
            t0.elapsed()
        );

        // The best agent only moves when it improves, which also moves the best.
        let x = pop.position(best_idx).to_owned();
        let (population, population_energies) = pop.into_parts();

        DEReport {
            x,
            fun: best_f,
            nit: maxiter,
            nfev,
            seed,
            population,
            population_energies,
            history,
            trajectory: recorder.finish(),
        }
    }

    fn clip(&self, trial: &mut Array1<f64>) {
        for (x, &(lo, hi)) in trial.iter_mut().zip(self.config.bounds.iter()) {
            *x = x.clamp(lo, hi);
        }
    }
}
