//! Error types for the Differential Evolution optimizer.
//!
//! Configuration problems are detected once, before the population is drawn,
//! and reported through [`DEError`]. The generation loop itself never fails.
//! I/O variants only come from the configuration file and trajectory export
//! helpers.

use thiserror::Error;

/// Errors that can occur while configuring a run or exporting its results.
#[derive(Debug, Error)]
pub enum DEError {
    /// The search space has no dimension.
    #[error("invalid dimension: {dimension} (must be >= 1)")]
    InvalidDimension {
        /// The invalid dimension
        dimension: usize,
    },

    /// A lower bound is not strictly below its upper bound, or one of them is not finite.
    #[error("invalid bounds at index {index}: lower ({lower}) must be < upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// Population size is too small (must be >= 4).
    #[error("population size ({pop_size}) must be >= 4")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
    },

    /// Mutation factor is not a finite number.
    #[error("invalid mutation factor: {factor} (must be finite)")]
    InvalidMutationFactor {
        /// The invalid mutation factor
        factor: f64,
    },

    /// Crossover rate is out of valid range [0, 1].
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid crossover rate
        rate: f64,
    },

    /// The iteration budget is zero.
    #[error("iteration count must be >= 1")]
    NoIterations,

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A trajectory CSV file is malformed.
    #[error("malformed trajectory at line {line}: {reason}")]
    TrajectoryFormat {
        /// 1-based line number in the file
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A loaded trajectory has snapshots of different shapes.
    #[error("trajectory snapshot {iteration} has shape {found:?}, expected {expected:?}")]
    RaggedTrajectory {
        /// Index of the first snapshot that does not match snapshot 0
        iteration: usize,
        /// `(agents, dimension)` of snapshot 0
        expected: (usize, usize),
        /// `(agents, dimension)` of the offending snapshot
        found: (usize, usize),
    },
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
    /// Returns `true` if this is a bounds-related error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            DEError::InvalidDimension { .. } | DEError::InvalidBounds { .. }
        )
    }

    /// Returns `true` if this is a configuration-related error.
    ///
    /// This includes `PopulationTooSmall`, `InvalidMutationFactor`,
    /// `InvalidCrossoverRate` and `NoIterations`.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DEError::PopulationTooSmall { .. }
                | DEError::InvalidMutationFactor { .. }
                | DEError::InvalidCrossoverRate { .. }
                | DEError::NoIterations
        )
    }

    /// Returns `true` if this error comes from file handling rather than from the run parameters.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            DEError::Io(_)
                | DEError::Json(_)
                | DEError::TrajectoryFormat { .. }
                | DEError::RaggedTrajectory { .. }
        )
    }
}
