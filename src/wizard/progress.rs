//! Display metrics derived from the current step.

use serde::{Deserialize, Serialize};

use super::state::WizardState;
use super::step::WizardStep;

/// State of one dot in the step indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMarker {
    Done,
    Active,
    Pending,
}

/// Everything the header needs, computed in one go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub step_number: usize,
    pub total_steps: usize,
    pub percent: f64,
    pub markers: [StepMarker; WizardStep::TOTAL],
}

impl ProgressSnapshot {
    /// Percentage rounded to the nearest whole number, for gauges.
    pub fn percent_rounded(&self) -> u16 {
        self.percent.round() as u16
    }
}

/// Derives step number, totals and percentages from a [`WizardState`].
pub struct ProgressProjector;

impl ProgressProjector {
    /// Number of steps in the fixed sequence.
    pub const fn total_steps() -> usize {
        WizardStep::TOTAL
    }

    /// 1-based position of the current step.
    pub fn step_number(state: &WizardState) -> usize {
        state.current.index() + 1
    }

    /// `step_number / total_steps * 100`.
    pub fn percent_complete(state: &WizardState) -> f64 {
        Self::step_number(state) as f64 / Self::total_steps() as f64 * 100.0
    }

    /// Marker for the step at zero-based `index`.
    pub fn marker(state: &WizardState, index: usize) -> StepMarker {
        let active = Self::step_number(state) - 1;
        if index < active {
            StepMarker::Done
        } else if index == active {
            StepMarker::Active
        } else {
            StepMarker::Pending
        }
    }

    /// Markers for the whole indicator row.
    pub fn markers(state: &WizardState) -> [StepMarker; WizardStep::TOTAL] {
        std::array::from_fn(|i| Self::marker(state, i))
    }

    pub fn snapshot(state: &WizardState) -> ProgressSnapshot {
        ProgressSnapshot {
            step_number: Self::step_number(state),
            total_steps: Self::total_steps(),
            percent: Self::percent_complete(state),
            markers: Self::markers(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(step: WizardStep) -> WizardState {
        WizardState {
            current: step,
            ..Default::default()
        }
    }

    #[test]
    fn test_total_steps_is_seven() {
        assert_eq!(ProgressProjector::total_steps(), 7);
    }

    #[test]
    fn test_percent_at_first_and_last_step() {
        let first = ProgressProjector::percent_complete(&state_at(WizardStep::Upload));
        assert!((first - 14.285_714).abs() < 0.001);

        let last = ProgressProjector::percent_complete(&state_at(WizardStep::Preview));
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_percent_increases_along_sequence() {
        let mut last = 0.0;
        for step in WizardStep::SEQUENCE {
            let pct = ProgressProjector::percent_complete(&state_at(step));
            assert!(pct > last, "{:?}: {} should exceed {}", step, pct, last);
            last = pct;
        }
    }

    #[test]
    fn test_markers_at_template_step() {
        let markers = ProgressProjector::markers(&state_at(WizardStep::Template));
        assert_eq!(
            markers,
            [
                StepMarker::Done,
                StepMarker::Done,
                StepMarker::Active,
                StepMarker::Pending,
                StepMarker::Pending,
                StepMarker::Pending,
                StepMarker::Pending,
            ]
        );
    }

    #[test]
    fn test_snapshot_rounds_for_display() {
        let snapshot = ProgressProjector::snapshot(&state_at(WizardStep::Upload));
        assert_eq!(snapshot.step_number, 1);
        assert_eq!(snapshot.total_steps, 7);
        assert_eq!(snapshot.percent_rounded(), 14);
    }
}
