use crate::config::Scoring;

use super::Judgment;

/// Per-run score, combo and judgment counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBoard {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub great_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one judgment. A non-miss extends the combo and earns its base
    /// score plus the combo bonus; a miss zeroes the combo.
    pub fn apply(&mut self, judgment: Judgment, scoring: &Scoring) {
        let base = match judgment {
            Judgment::Perfect => {
                self.perfect_count += 1;
                scoring.perfect
            }
            Judgment::Great => {
                self.great_count += 1;
                scoring.great
            }
            Judgment::Good => {
                self.good_count += 1;
                scoring.good
            }
            Judgment::Miss => {
                self.miss_count += 1;
                0
            }
        };

        if judgment.continues_combo() {
            self.combo += 1;
            self.score += base + self.combo * scoring.combo_bonus;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }
    }

    pub fn judged_count(&self) -> u32 {
        self.perfect_count + self.great_count + self.good_count + self.miss_count
    }

    /// Accuracy over the whole beatmap, as a percentage with one decimal.
    /// Only perfect and great count as hits; unjudged notes count against.
    pub fn accuracy(&self, total_notes: u32) -> f64 {
        if total_notes == 0 {
            return 0.0;
        }
        let hits = self.perfect_count + self.great_count;
        (hits as f64 / total_notes as f64 * 1000.0).round() / 10.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
