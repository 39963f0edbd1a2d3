// Data model for tracks and their authored beatmaps.

pub mod beatmap;
pub mod track;

pub use beatmap::{Beatmap, BeatmapError};
pub use track::{Track, builtin_tracks};
