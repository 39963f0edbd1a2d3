use serde::{Deserialize, Serialize};

use crate::config::{DifficultyProfile, TimingWindows};

/// Judgment tiers from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    Perfect,
    Great,
    Good,
    Miss,
}

impl Judgment {
    /// Whether this judgment continues combo.
    pub fn continues_combo(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Timing direction for early/late feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingDirection {
    Early,
    Exact,
    Late,
}

impl TimingDirection {
    const EXACT_THRESHOLD_MS: f64 = 1.0;

    /// `timing_diff_ms` = target_time - tap_time; positive means early.
    pub fn from_timing_diff(timing_diff_ms: f64) -> Self {
        if timing_diff_ms > Self::EXACT_THRESHOLD_MS {
            TimingDirection::Early
        } else if timing_diff_ms < -Self::EXACT_THRESHOLD_MS {
            TimingDirection::Late
        } else {
            TimingDirection::Exact
        }
    }
}

/// Judgment timing windows in milliseconds, after difficulty scaling.
#[derive(Debug, Clone, Copy)]
pub struct JudgeWindow {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    pub miss: f64,
}

impl JudgeWindow {
    /// Scale the base windows by a difficulty multiplier.
    pub fn scaled(base: TimingWindows, multiplier: f64) -> Self {
        Self {
            perfect: base.perfect * multiplier,
            great: base.great * multiplier,
            good: base.good * multiplier,
            miss: base.miss * multiplier,
        }
    }

    pub fn for_profile(base: TimingWindows, profile: &DifficultyProfile) -> Self {
        Self::scaled(base, profile.timing_multiplier)
    }

    /// Classify a tap by its absolute distance from the note's target time.
    ///
    /// Returns `None` when the tap is outside the miss window entirely (a
    /// tap with nothing to hit). A distance inside the miss window but past
    /// the good window resolves the note as [`Judgment::Miss`]: the tap is
    /// attributed to the note, unlike the passive timeout path.
    pub fn classify(&self, distance_ms: f64) -> Option<Judgment> {
        let distance = distance_ms.abs();
        if distance > self.miss {
            return None;
        }
        if distance <= self.perfect {
            Some(Judgment::Perfect)
        } else if distance <= self.great {
            Some(Judgment::Great)
        } else if distance <= self.good {
            Some(Judgment::Good)
        } else {
            Some(Judgment::Miss)
        }
    }

    /// Whether an unresolved note has aged past any possible hit.
    /// `timing_diff_ms` = target_time - elapsed; negative means the note is
    /// in the past.
    pub fn is_timed_out(&self, timing_diff_ms: f64) -> bool {
        timing_diff_ms < -self.miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> JudgeWindow {
        JudgeWindow::scaled(TimingWindows::default(), 1.0)
    }

    #[test]
    fn classifies_by_ascending_thresholds() {
        let w = window();
        assert_eq!(w.classify(0.0), Some(Judgment::Perfect));
        assert_eq!(w.classify(50.0), Some(Judgment::Perfect));
        assert_eq!(w.classify(-50.0), Some(Judgment::Perfect));
        assert_eq!(w.classify(51.0), Some(Judgment::Great));
        assert_eq!(w.classify(100.0), Some(Judgment::Great));
        assert_eq!(w.classify(101.0), Some(Judgment::Good));
        assert_eq!(w.classify(150.0), Some(Judgment::Good));
    }

    #[test]
    fn in_window_past_good_is_a_manual_miss() {
        // The band between the good and miss windows resolves the note as a
        // miss attributed to the tap. Kept intentionally.
        let w = window();
        assert_eq!(w.classify(151.0), Some(Judgment::Miss));
        assert_eq!(w.classify(200.0), Some(Judgment::Miss));
        assert_eq!(w.classify(-200.0), Some(Judgment::Miss));
    }

    #[test]
    fn outside_miss_window_is_no_judgment() {
        let w = window();
        assert_eq!(w.classify(201.0), None);
        assert_eq!(w.classify(-1000.0), None);
    }

    #[test]
    fn scaling_widens_every_window() {
        let w = JudgeWindow::scaled(TimingWindows::default(), 1.5);
        assert_eq!(w.perfect, 75.0);
        assert_eq!(w.great, 150.0);
        assert_eq!(w.good, 225.0);
        assert_eq!(w.miss, 300.0);
        assert_eq!(w.classify(75.0), Some(Judgment::Perfect));
        assert_eq!(w.classify(300.0), Some(Judgment::Miss));
        assert_eq!(w.classify(301.0), None);
    }

    #[test]
    fn timeout_is_strictly_past_the_miss_window() {
        let w = window();
        assert!(!w.is_timed_out(0.0));
        assert!(!w.is_timed_out(-200.0));
        assert!(w.is_timed_out(-200.1));
    }

    #[test]
    fn timing_direction() {
        assert_eq!(
            TimingDirection::from_timing_diff(10.0),
            TimingDirection::Early
        );
        assert_eq!(
            TimingDirection::from_timing_diff(-10.0),
            TimingDirection::Late
        );
        assert_eq!(
            TimingDirection::from_timing_diff(0.5),
            TimingDirection::Exact
        );
    }
}
