//! Per-iteration record of every agent's position.
//!
//! [`TrajectoryRecorder`] is filled by the optimizer while it runs and turned
//! into a read-only [`Trajectory`] once the run ends. Trajectories can be
//! written to and read back from CSV (`iteration,agent,x0,..`) or JSON for
//! external plotting.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DEError, Result};

/// Write-once storage for `iterations × agents` positions.
#[derive(Debug)]
pub struct TrajectoryRecorder {
    snapshots: Vec<Array2<f64>>,
    written: Vec<bool>,
    agents: usize,
}

impl TrajectoryRecorder {
    /// Allocates room for `iterations` snapshots of `agents` positions of length `dimension`.
    pub fn new(iterations: usize, agents: usize, dimension: usize) -> Self {
        Self {
            snapshots: vec![Array2::zeros((agents, dimension)); iterations],
            written: vec![false; iterations * agents],
            agents,
        }
    }

    /// Copies `position` into slot `[iteration][agent]`.
    ///
    /// Each slot is written exactly once; writing it again is a logic error.
    pub fn record(&mut self, iteration: usize, agent: usize, position: ArrayView1<'_, f64>) {
        let slot = iteration * self.agents + agent;
        debug_assert!(
            !self.written[slot],
            "trajectory slot [{iteration}][{agent}] recorded twice"
        );
        self.written[slot] = true;
        self.snapshots[iteration].row_mut(agent).assign(&position);
    }

    /// Number of slots recorded so far.
    pub fn recorded(&self) -> usize {
        self.written.iter().filter(|&&w| w).count()
    }

    /// Freezes the recorded snapshots.
    pub fn finish(self) -> Trajectory {
        debug_assert!(self.written.iter().all(|&w| w), "trajectory has gaps");
        Trajectory {
            snapshots: self.snapshots,
        }
    }
}

/// Immutable history of agent positions, one `agents × dimension` matrix per iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    snapshots: Vec<Array2<f64>>,
}

impl Trajectory {
    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` if no iteration was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Agents per snapshot.
    pub fn population_size(&self) -> usize {
        self.snapshots.first().map_or(0, |s| s.nrows())
    }

    /// Length of each position.
    pub fn dimension(&self) -> usize {
        self.snapshots.first().map_or(0, |s| s.ncols())
    }

    /// Positions after iteration `iteration`, one row per agent.
    pub fn snapshot(&self, iteration: usize) -> Option<ArrayView2<'_, f64>> {
        self.snapshots.get(iteration).map(|s| s.view())
    }

    /// Position of `agent` after iteration `iteration`.
    pub fn position(&self, iteration: usize, agent: usize) -> Option<ArrayView1<'_, f64>> {
        self.snapshots
            .get(iteration)
            .filter(|s| agent < s.nrows())
            .map(|s| s.row(agent))
    }

    /// Iterates over snapshots in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = ArrayView2<'_, f64>> {
        self.snapshots.iter().map(|s| s.view())
    }

    /// Writes the trajectory as CSV with an `iteration,agent,x0,..` header.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        create_parent_dir(path.as_ref())?;
        let mut file = BufWriter::new(File::create(path.as_ref())?);

        write!(file, "iteration,agent")?;
        for j in 0..self.dimension() {
            write!(file, ",x{}", j)?;
        }
        writeln!(file)?;

        for (iteration, snapshot) in self.snapshots.iter().enumerate() {
            for (agent, row) in snapshot.rows().into_iter().enumerate() {
                write!(file, "{},{}", iteration, agent)?;
                for &x in row.iter() {
                    write!(file, ",{}", x)?;
                }
                writeln!(file)?;
            }
        }

        file.flush()?;
        Ok(())
    }

    /// Reads a trajectory written by [`Trajectory::write_csv`].
    ///
    /// Rows must be grouped by iteration with agents in order `0..N`, and every
    /// iteration must hold the same number of agents.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let last_line = content.lines().count();
        let mut lines = content.lines();

        let header = lines.next().ok_or_else(|| DEError::TrajectoryFormat {
            line: 1,
            reason: "empty file".into(),
        })?;
        let columns: Vec<&str> = header.split(',').collect();
        if columns.len() < 3 || columns[0] != "iteration" || columns[1] != "agent" {
            return Err(DEError::TrajectoryFormat {
                line: 1,
                reason: format!("expected 'iteration,agent,x0,..', got '{}'", header),
            });
        }
        let dimension = columns.len() - 2;

        let mut snapshots: Vec<Vec<f64>> = Vec::new();
        let mut agents: Option<usize> = None;
        let mut current_agents = 0usize;

        for (idx, line) in lines.enumerate() {
            let line_no = idx + 2;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() != dimension + 2 {
                return Err(DEError::TrajectoryFormat {
                    line: line_no,
                    reason: format!("expected {} columns, got {}", dimension + 2, parts.len()),
                });
            }
            let parse_index = |s: &str, what: &str| {
                s.trim()
                    .parse::<usize>()
                    .map_err(|_| DEError::TrajectoryFormat {
                        line: line_no,
                        reason: format!("invalid {} '{}'", what, s),
                    })
            };
            let iteration = parse_index(parts[0], "iteration")?;
            let agent = parse_index(parts[1], "agent")?;

            if iteration == snapshots.len() && agent == 0 {
                if let Some(previous) = snapshots.last()
                    && agents.is_none()
                {
                    agents = Some(previous.len() / dimension);
                }
                if let Some(n) = agents
                    && !snapshots.is_empty()
                    && current_agents != n
                {
                    return Err(DEError::TrajectoryFormat {
                        line: line_no,
                        reason: format!(
                            "iteration {} has {} agents, expected {}",
                            iteration - 1,
                            current_agents,
                            n
                        ),
                    });
                }
                snapshots.push(Vec::new());
                current_agents = 0;
            } else if iteration + 1 != snapshots.len() || agent != current_agents {
                return Err(DEError::TrajectoryFormat {
                    line: line_no,
                    reason: format!(
                        "unexpected row for iteration {} agent {}",
                        iteration, agent
                    ),
                });
            }

            let row = snapshots.last_mut().ok_or_else(|| DEError::TrajectoryFormat {
                line: line_no,
                reason: "row before first iteration".into(),
            })?;
            for part in &parts[2..] {
                let x: f64 = part.trim().parse().map_err(|_| DEError::TrajectoryFormat {
                    line: line_no,
                    reason: format!("invalid coordinate '{}'", part),
                })?;
                row.push(x);
            }
            current_agents += 1;
        }

        if let Some(n) = agents
            && current_agents != n
        {
            return Err(DEError::TrajectoryFormat {
                line: last_line,
                reason: format!(
                    "last iteration has {} agents, expected {}",
                    current_agents, n
                ),
            });
        }

        let snapshots = snapshots
            .into_iter()
            .map(|flat| {
                let rows = flat.len() / dimension;
                Array2::from_shape_vec((rows, dimension), flat).map_err(|e| {
                    DEError::TrajectoryFormat {
                        line: last_line,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { snapshots })
    }

    /// Writes the trajectory as pretty-printed JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        create_parent_dir(path.as_ref())?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a trajectory written by [`Trajectory::write_json`].
    ///
    /// Every snapshot must have the shape of the first one.
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let trajectory: Trajectory = serde_json::from_str(&contents)?;
        trajectory.check_shape()?;
        Ok(trajectory)
    }

    fn check_shape(&self) -> Result<()> {
        let Some(first) = self.snapshots.first() else {
            return Ok(());
        };
        let expected = first.dim();
        match self
            .snapshots
            .iter()
            .enumerate()
            .find(|(_, s)| s.dim() != expected)
        {
            Some((iteration, s)) => Err(DEError::RaggedTrajectory {
                iteration,
                expected,
                found: s.dim(),
            }),
            None => Ok(()),
        }
    }
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
