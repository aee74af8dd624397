//! # Partition sweeps
//!
//! Walks a range of partition parameters, scores each partition with a
//! caller-supplied [`Scorer`] and keeps the best result in a [`SweepOutcome`]
//! that is threaded through the loop and returned.
//!
//! Row and column parameters advance together: the sweep from `(2, 3)` to
//! `(6, 9)` with step 2 visits `(2, 3)`, `(4, 5)` and `(6, 7)`, stopping when
//! either range is exhausted.

use std::error::Error as StdError;
use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::map::MapShape;
use crate::partition::{Partition, PartitionError, PartitionStrategy};

mod error;

#[cfg(test)]
mod tests;

pub use error::SweepError;

/// Error type scorers report
pub type ScoreError = Box<dyn StdError + Send + Sync>;

/// Scores one candidate partition; higher is better
pub trait Scorer {
    /// Score the partition visited at `step` (1-based)
    fn score(
        &mut self,
        step: usize,
        strategy: &PartitionStrategy,
        partition: &Partition,
    ) -> Result<f64, ScoreError>;
}

impl<F> Scorer for F
where
    F: FnMut(usize, &PartitionStrategy, &Partition) -> Result<f64, ScoreError>,
{
    fn score(
        &mut self,
        step: usize,
        strategy: &PartitionStrategy,
        partition: &Partition,
    ) -> Result<f64, ScoreError> {
        self(step, strategy, partition)
    }
}

/// Which partition strategy the sweep parameters feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepKind {
    /// Parameters are part counts
    Uniform,
    /// Parameters are part sizes
    FixedSize,
}

/// Range of partition parameters to visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSweep {
    /// Strategy the parameters are fed to
    pub kind: SweepKind,
    /// First `(row, col)` parameter
    pub start: (usize, usize),
    /// Last `(row, col)` parameter, inclusive
    pub end: (usize, usize),
    /// Increment applied to both parameters
    pub step: usize,
}

/// Scored partition
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPartition {
    /// Step at which it was visited (1-based)
    pub step: usize,
    /// Score reported by the scorer
    pub score: f64,
    /// Strategy that produced it
    pub strategy: PartitionStrategy,
    /// Resulting regions
    pub partition: Partition,
}

/// Accumulated result of a sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepOutcome {
    /// Best partition so far
    pub best: Option<ScoredPartition>,
    /// Every partition that improved on the previous best, in order
    pub history: Vec<ScoredPartition>,
    /// Partitions scored
    pub iterations: usize,
}

impl SweepOutcome {
    /// Fold one scored partition into the outcome
    pub fn record(mut self, scored: ScoredPartition) -> Self {
        self.iterations += 1;
        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| scored.score > best.score);
        if improves {
            info!(
                "Step {}: score {} is the new best ({})",
                scored.step, scored.score, scored.strategy
            );
            self.history.push(scored.clone());
            self.best = Some(scored);
        }
        self
    }
}

impl fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.best {
            Some(best) => write!(
                f,
                "{} partitions scored, best {} at step {} ({}), {} improvements",
                self.iterations,
                best.score,
                best.step,
                best.strategy,
                self.history.len()
            ),
            None => write!(f, "{} partitions scored, no best", self.iterations),
        }
    }
}

impl PartitionSweep {
    /// Create a sweep
    pub fn new(kind: SweepKind, start: (usize, usize), end: (usize, usize), step: usize) -> Self {
        Self {
            kind,
            start,
            end,
            step,
        }
    }

    /// Strategies visited, in order
    pub fn strategies(&self) -> Result<Vec<PartitionStrategy>, PartitionError> {
        if self.step == 0 {
            return Err(PartitionError::InvalidPartition(
                "sweep step must be positive".to_string(),
            ));
        }
        let rows = (self.start.0..=self.end.0).step_by(self.step);
        let cols = (self.start.1..=self.end.1).step_by(self.step);
        Ok(rows
            .zip(cols)
            .map(|(r, c)| match self.kind {
                SweepKind::Uniform => PartitionStrategy::Uniform {
                    row_parts: r,
                    col_parts: c,
                },
                SweepKind::FixedSize => PartitionStrategy::FixedSize {
                    part_rows: r,
                    part_cols: c,
                },
            })
            .collect())
    }

    /// Partition `shape` at every step and score it
    pub fn run<S: Scorer>(&self, shape: MapShape, scorer: &mut S) -> Result<SweepOutcome, SweepError> {
        let mut outcome = SweepOutcome::default();
        for (i, strategy) in self.strategies()?.into_iter().enumerate() {
            let step = i + 1;
            let partition = Partition::generate(shape, strategy)?;
            let score = scorer
                .score(step, &strategy, &partition)
                .map_err(|source| SweepError::Scorer { step, source })?;
            outcome = outcome.record(ScoredPartition {
                step,
                score,
                strategy,
                partition,
            });
        }
        info!("Sweep finished: {}", outcome);
        Ok(outcome)
    }
}
