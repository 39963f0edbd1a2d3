mod session;

pub use session::{GameSession, Haptics, NoHaptics, SessionError};
