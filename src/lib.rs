mod cost;
mod error;
mod item;
mod measure;
mod perf;
mod plain;
mod search;
mod types;

pub use cost::FitnessClass;
pub use error::ParBreakError;
pub use item::{paragraph_end, Item, INF};
pub use plain::{items_from_text, render_plain, Justify};
pub use search::{BreakStatus, Breakpoint, ParagraphBreaks};
pub use types::Pt;

use perf::PerfLogger;
use search::{SearchOptions, SearchStats};
use std::sync::Arc;
use std::time::Instant;

pub struct ParBreak {
    tolerance: f64,
    looseness: i32,
    fitness_demerit: f64,
    flagged_demerit: f64,
    perf: Option<Arc<PerfLogger>>,
}

impl ParBreak {
    pub fn builder() -> ParBreakBuilder {
        ParBreakBuilder::new()
    }

    // One pass over the item sequence; every invocation rebuilds its own
    // working state, so repeated calls with the same inputs agree exactly.
    pub fn break_paragraph(
        &self,
        items: &[Item],
        line_lengths: &[Pt],
    ) -> Result<ParagraphBreaks, ParBreakError> {
        let start = self.perf.as_ref().map(|_| Instant::now());
        let options = SearchOptions {
            tolerance: self.tolerance,
            looseness: self.looseness,
            fitness_demerit: self.fitness_demerit,
            flagged_demerit: self.flagged_demerit,
        };
        let mut stats = SearchStats::default();
        let result = search::find_breaks(items, line_lengths, &options, &mut stats);
        if let (Some(perf), Some(start)) = (&self.perf, start) {
            perf.log_span_ms("breaks.search", start.elapsed().as_secs_f64() * 1000.0);
            perf.log_counts(
                "breaks.search.counts",
                &[
                    ("items", stats.items),
                    ("feasible_breakpoints", stats.feasible_breakpoints),
                    ("nodes_created", stats.nodes_created),
                    ("deactivated", stats.deactivated),
                    ("active_peak", stats.active_peak),
                ],
            );
            perf.flush();
        }
        result
    }
}

#[derive(Clone)]
pub struct ParBreakBuilder {
    tolerance: f64,
    looseness: i32,
    fitness_demerit: f64,
    flagged_demerit: f64,
    perf_path: Option<std::path::PathBuf>,
}

impl ParBreakBuilder {
    pub fn new() -> Self {
        Self {
            tolerance: 1.0,
            looseness: 0,
            fitness_demerit: 100.0,
            flagged_demerit: 100.0,
            perf_path: None,
        }
    }

    pub fn tolerance(mut self, value: f64) -> Self {
        self.tolerance = value;
        self
    }

    pub fn looseness(mut self, lines: i32) -> Self {
        self.looseness = lines;
        self
    }

    pub fn fitness_demerit(mut self, value: f64) -> Self {
        self.fitness_demerit = value;
        self
    }

    pub fn flagged_demerit(mut self, value: f64) -> Self {
        self.flagged_demerit = value;
        self
    }

    pub fn perf_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.perf_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<ParBreak, ParBreakError> {
        if !self.tolerance.is_finite() || self.tolerance < -1.0 {
            return Err(ParBreakError::InvalidConfiguration(
                "tolerance must be finite and >= -1".to_string(),
            ));
        }
        if !self.fitness_demerit.is_finite() || self.fitness_demerit < 0.0 {
            return Err(ParBreakError::InvalidConfiguration(
                "fitness_demerit must be finite and >= 0".to_string(),
            ));
        }
        if !self.flagged_demerit.is_finite() || self.flagged_demerit < 0.0 {
            return Err(ParBreakError::InvalidConfiguration(
                "flagged_demerit must be finite and >= 0".to_string(),
            ));
        }
        let perf = if let Some(path) = self.perf_path {
            Some(Arc::new(PerfLogger::new(path)?))
        } else {
            None
        };
        Ok(ParBreak {
            tolerance: self.tolerance,
            looseness: self.looseness,
            fitness_demerit: self.fitness_demerit,
            flagged_demerit: self.flagged_demerit,
            perf,
        })
    }
}

impl Default for ParBreakBuilder {
    fn default() -> Self {
        Self::new()
    }
}
