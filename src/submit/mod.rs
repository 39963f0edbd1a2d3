mod client;
mod payload;

pub use client::SubmitClient;
pub use payload::BeatmapSubmission;
