mod field;
mod judge;
mod note;
mod result;
mod run;
mod score;

pub use field::NoteField;
pub use judge::{JudgeWindow, Judgment, TimingDirection};
pub use note::{BeatNote, NoteState};
pub use result::{EndReason, Medal, RunSummary};
pub use run::{RunEngine, StartError, TickReport};
pub use score::ScoreBoard;
