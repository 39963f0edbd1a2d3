use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeatmapError {
    #[error("beat {index} ({value}ms) is earlier than the previous beat ({previous}ms)")]
    OutOfOrder {
        index: usize,
        value: u64,
        previous: u64,
    },
}

/// Ordered tap targets in milliseconds from track start.
///
/// Timestamps are non-decreasing. Ties are allowed so imported data may
/// carry simultaneous beats; the capture loop never produces them because
/// it appends in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct Beatmap {
    beats: Vec<u64>,
}

impl Beatmap {
    pub fn new(beats: Vec<u64>) -> Result<Self, BeatmapError> {
        for (index, window) in beats.windows(2).enumerate() {
            if window[1] < window[0] {
                return Err(BeatmapError::OutOfOrder {
                    index: index + 1,
                    value: window[1],
                    previous: window[0],
                });
            }
        }
        Ok(Self { beats })
    }

    pub fn beats(&self) -> &[u64] {
        &self.beats
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Target time of the beat at `index`, in ms.
    pub fn beat_at(&self, index: usize) -> Option<u64> {
        self.beats.get(index).copied()
    }

    pub fn last_beat(&self) -> Option<u64> {
        self.beats.last().copied()
    }
}

impl TryFrom<Vec<u64>> for Beatmap {
    type Error = BeatmapError;

    fn try_from(beats: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(beats)
    }
}

impl From<Beatmap> for Vec<u64> {
    fn from(beatmap: Beatmap) -> Self {
        beatmap.beats
    }
}
