use crate::item::{Item, INF};
use crate::measure::PrefixSums;
use crate::types::Pt;

// Ceiling for cumulative demerits; sums saturate here instead of running
// into non-finite arithmetic.
pub(crate) const DEMERITS_MAX: f64 = 1.0e300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessClass {
    Tight,
    Normal,
    Loose,
    VeryLoose,
}

impl FitnessClass {
    pub(crate) fn from_ratio(ratio: f64) -> FitnessClass {
        if ratio < -0.5 {
            FitnessClass::Tight
        } else if ratio <= 0.5 {
            FitnessClass::Normal
        } else if ratio <= 1.0 {
            FitnessClass::Loose
        } else {
            FitnessClass::VeryLoose
        }
    }

    pub fn rank(self) -> i32 {
        match self {
            FitnessClass::Tight => 0,
            FitnessClass::Normal => 1,
            FitnessClass::Loose => 2,
            FitnessClass::VeryLoose => 3,
        }
    }

    fn jump(self, other: FitnessClass) -> i32 {
        (self.rank() - other.rank()).abs()
    }
}

// A break is legal at an explicit penalty that does not forbid it, or at
// glue directly following a box. The paragraph start is represented by the
// synthetic root node, never by position 0 itself.
pub(crate) fn is_feasible_breakpoint(items: &[Item], i: usize) -> bool {
    match items[i] {
        Item::Penalty { penalty, .. } => penalty < INF,
        Item::Glue { .. } => i > 0 && items[i - 1].is_box(),
        Item::Box { .. } => false,
    }
}

pub(crate) struct Candidate {
    pub fitness_class: FitnessClass,
    pub demerits: f64,
}

pub(crate) struct Judgment {
    pub ratio: f64,
    pub deactivate: bool,
    pub candidate: Option<Candidate>,
}

pub(crate) struct CostModel<'a> {
    items: &'a [Item],
    sums: &'a PrefixSums,
    line_lengths: &'a [Pt],
    tolerance: f64,
    fitness_demerit: f64,
    flagged_demerit: f64,
}

impl<'a> CostModel<'a> {
    pub fn new(
        items: &'a [Item],
        sums: &'a PrefixSums,
        line_lengths: &'a [Pt],
        tolerance: f64,
        fitness_demerit: f64,
        flagged_demerit: f64,
    ) -> CostModel<'a> {
        CostModel {
            items,
            sums,
            line_lengths,
            tolerance,
            fitness_demerit,
            flagged_demerit,
        }
    }

    // The schedule entry for the line being formed; the last entry repeats
    // for every line past the end of the schedule.
    fn target_width(&self, line_index: usize) -> Pt {
        if line_index < self.line_lengths.len() {
            self.line_lengths[line_index]
        } else {
            self.line_lengths[self.line_lengths.len() - 1]
        }
    }

    // Works on whole milli-point counts: the quantization grid is the unit
    // of exactness here, so "fits the line" means equal milli counts.
    pub fn adjustment_ratio(&self, a_position: usize, b: usize, line_index: usize) -> f64 {
        let mut ideal = self.sums.width_between(a_position, b).to_milli_i64();
        if let Item::Penalty { width, .. } = self.items[b] {
            ideal += width.to_milli_i64();
        }
        let target = self.target_width(line_index).to_milli_i64();
        if ideal < target {
            let stretch = self.sums.stretch_between(a_position, b).to_milli_i64();
            if stretch > 0 {
                (target - ideal) as f64 / stretch as f64
            } else {
                INF
            }
        } else if ideal > target {
            let shrink = self.sums.shrink_between(a_position, b).to_milli_i64();
            if shrink > 0 {
                (target - ideal) as f64 / shrink as f64
            } else {
                INF
            }
        } else {
            0.0
        }
    }

    pub fn judge(
        &self,
        a_position: usize,
        a_line: u32,
        a_fitness: FitnessClass,
        a_demerits: f64,
        b: usize,
    ) -> Judgment {
        let ratio = self.adjustment_ratio(a_position, b, a_line as usize);
        let deactivate = ratio < -1.0 || self.items[b].is_forced_break();
        if !(-1.0 <= ratio && ratio <= self.tolerance) {
            return Judgment {
                ratio,
                deactivate,
                candidate: None,
            };
        }

        let penalty = self.items[b].penalty_value();
        let badness = 100.0 * ratio.abs().powi(3);
        let mut demerits = if penalty >= 0.0 {
            (1.0 + badness + penalty).powi(3)
        } else if penalty > -INF {
            (1.0 + badness).powi(2) - penalty * penalty
        } else {
            (1.0 + badness).powi(2)
        };
        if self.items[a_position].is_flagged() && self.items[b].is_flagged() {
            demerits += self.flagged_demerit;
        }
        let fitness = FitnessClass::from_ratio(ratio);
        if fitness.jump(a_fitness) > 1 {
            demerits += self.fitness_demerit;
        }
        let total = clamp_demerits(a_demerits + demerits);

        Judgment {
            ratio,
            deactivate,
            candidate: Some(Candidate {
                fitness_class: fitness,
                demerits: total,
            }),
        }
    }
}

pub(crate) fn clamp_demerits(value: f64) -> f64 {
    if value.is_finite() && value <= DEMERITS_MAX {
        value
    } else {
        DEMERITS_MAX
    }
}
