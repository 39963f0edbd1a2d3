mod playback;
mod session;

pub use playback::{PlaybackSession, TestPlayback};
pub use session::CaptureSession;
