use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Beatmap;

/// Wire action tag the collection endpoint dispatches on.
const SUBMIT_ACTION: &str = "submitBeatmap";

/// Beatmap submission payload.
///
/// The endpoint expects camelCase keys and the beatmap as a JSON array
/// re-encoded into a string field, not a nested array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatmapSubmission {
    pub action: String,
    /// Author name.
    pub name: String,
    /// Track the beatmap was recorded against.
    pub track: String,
    pub beat_count: usize,
    pub comment: String,
    /// JSON-encoded array of beat timestamps in ms.
    pub beatmap: String,
    /// ISO 8601 submission time.
    pub timestamp: String,
}

impl BeatmapSubmission {
    pub fn new(
        author: &str,
        track: &str,
        beatmap: &Beatmap,
        comment: &str,
        offset_ms: i64,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let beats: Vec<u64> = beatmap.clone().into();
        Self {
            action: SUBMIT_ACTION.to_string(),
            name: author.to_string(),
            track: track.to_string(),
            beat_count: beats.len(),
            // The calibration offset is not baked into the timestamps;
            // it travels in the comment so reviewers can see it.
            comment: format!("{comment} (Offset used: {offset_ms}ms)"),
            beatmap: serde_json::to_string(&beats).unwrap_or_else(|_| "[]".to_string()),
            timestamp: submitted_at.to_rfc3339(),
        }
    }

    /// Decode the embedded beatmap string back into beat timestamps.
    pub fn decode_beatmap(&self) -> anyhow::Result<Beatmap> {
        let beatmap: Beatmap = serde_json::from_str(&self.beatmap)?;
        Ok(beatmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payload_embeds_the_beatmap_as_a_string() {
        let beatmap = Beatmap::new(vec![200, 900, 1500]).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let payload = BeatmapSubmission::new("ada", "smooth", &beatmap, "first take", 40, at);

        assert_eq!(payload.action, "submitBeatmap");
        assert_eq!(payload.beat_count, 3);
        assert_eq!(payload.beatmap, "[200,900,1500]");
        assert_eq!(payload.comment, "first take (Offset used: 40ms)");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("beatCount").is_some());
        // The beatmap field is a string, not an array.
        assert!(json["beatmap"].is_string());
    }

    #[test]
    fn embedded_beatmap_round_trips() {
        let beatmap = Beatmap::new(vec![200, 900, 1500]).unwrap();
        let payload =
            BeatmapSubmission::new("ada", "smooth", &beatmap, "", 0, Utc::now());
        assert_eq!(payload.decode_beatmap().unwrap(), beatmap);
    }
}
