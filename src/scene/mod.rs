//! Screen flow for the player and the beatmap creator.
//!
//! Both flows are small explicit state machines. Transitions not listed
//! here do not happen; callers ask before switching and get a rejection
//! back instead of a panic.

use thiserror::Error;

use crate::config::EngineTuning;

/// Player-facing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Tutorial,
    Info,
    Countdown,
    Playing,
    Result,
}

#[derive(Debug, Error)]
#[error("cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: Screen,
    pub to: Screen,
}

/// Tracks the current screen and enforces the allowed flow.
///
/// The countdown and info screens are timed: enter them through
/// [`start_countdown`] / [`show_info`] and drive [`tick`] each frame to
/// get the automatic transition out.
///
/// [`start_countdown`]: ScreenFlow::start_countdown
/// [`show_info`]: ScreenFlow::show_info
/// [`tick`]: ScreenFlow::tick
#[derive(Debug)]
pub struct ScreenFlow {
    current: Screen,
    countdown: Option<Countdown>,
    info_remaining_ms: Option<f64>,
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self {
            current: Screen::Title,
            countdown: None,
            info_remaining_ms: None,
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// The running countdown, for the display layer.
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    fn allowed(from: Screen, to: Screen) -> bool {
        use Screen::*;
        matches!(
            (from, to),
            (Title, Tutorial)
                | (Title, Info)
                | (Title, Countdown)
                | (Tutorial, Title)
                | (Info, Title)
                | (Countdown, Playing)
                | (Countdown, Title)
                | (Playing, Result)
                | (Playing, Title)
                | (Result, Countdown)
                | (Result, Title)
        )
    }

    pub fn go(&mut self, to: Screen) -> Result<(), TransitionError> {
        if !Self::allowed(self.current, to) {
            return Err(TransitionError {
                from: self.current,
                to,
            });
        }
        // Playing cannot be entered while a countdown is still running.
        if to == Screen::Playing && self.countdown.as_ref().is_some_and(|c| !c.is_done()) {
            return Err(TransitionError {
                from: self.current,
                to,
            });
        }
        log::debug!("screen {:?} -> {:?}", self.current, to);
        self.current = to;
        self.countdown = None;
        self.info_remaining_ms = None;
        Ok(())
    }

    /// Enter the countdown screen with the configured duration.
    pub fn start_countdown(&mut self, tuning: &EngineTuning) -> Result<(), TransitionError> {
        self.go(Screen::Countdown)?;
        self.countdown = Some(Countdown::new(tuning.countdown_seconds));
        Ok(())
    }

    /// Show the difficulty info screen for its configured duration.
    pub fn show_info(&mut self, tuning: &EngineTuning) -> Result<(), TransitionError> {
        self.go(Screen::Info)?;
        self.info_remaining_ms = Some(tuning.info_screen_ms as f64);
        Ok(())
    }

    /// Advance the timed screens. Returns the screen that was entered
    /// automatically, if any: Countdown runs into Playing, Info falls
    /// back to Title.
    pub fn tick(&mut self, delta_ms: f64) -> Option<Screen> {
        match self.current {
            Screen::Countdown => {
                let done = self.countdown.as_mut().is_some_and(|c| c.advance(delta_ms));
                if done {
                    self.go(Screen::Playing).ok()?;
                    return Some(Screen::Playing);
                }
                None
            }
            Screen::Info => {
                if let Some(remaining) = &mut self.info_remaining_ms {
                    *remaining -= delta_ms;
                    if *remaining <= 0.0 {
                        self.go(Screen::Title).ok()?;
                        return Some(Screen::Title);
                    }
                }
                None
            }
            _ => None,
        }
    }
}

impl Default for ScreenFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-run countdown. Ticks down from a whole number of seconds; the
/// run starts when it crosses zero.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    remaining_ms: f64,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining_ms: seconds as f64 * 1000.0,
        }
    }

    /// Advance by `delta_ms`. Returns true once the countdown is over.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    /// Seconds to display, rounded up so "1" shows until the end.
    pub fn display_seconds(&self) -> u32 {
        (self.remaining_ms / 1000.0).ceil() as u32
    }
}

/// Modes of the beatmap creator.
///
/// Recording and testing are mutually exclusive; entering one requires
/// passing through idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreatorMode {
    #[default]
    Idle,
    Recording,
    Testing,
}

impl CreatorMode {
    pub fn can_enter(self, to: CreatorMode) -> bool {
        use CreatorMode::*;
        match (self, to) {
            (Idle, Recording) | (Idle, Testing) => true,
            (Recording, Idle) | (Testing, Idle) => true,
            // Re-entering the current mode is a no-op, not an error.
            (a, b) => a == b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_path_through_a_run() {
        let mut flow = ScreenFlow::new();
        assert_eq!(flow.current(), Screen::Title);
        flow.go(Screen::Countdown).unwrap();
        flow.go(Screen::Playing).unwrap();
        flow.go(Screen::Result).unwrap();
        // Retry goes back through the countdown.
        flow.go(Screen::Countdown).unwrap();
        flow.go(Screen::Playing).unwrap();
        // Quit mid-run returns to the title.
        flow.go(Screen::Title).unwrap();
    }

    #[test]
    fn skipping_the_countdown_is_rejected() {
        let mut flow = ScreenFlow::new();
        let err = flow.go(Screen::Playing).unwrap_err();
        assert_eq!(err.from, Screen::Title);
        assert_eq!(err.to, Screen::Playing);
        // The flow is unchanged after a rejection.
        assert_eq!(flow.current(), Screen::Title);
    }

    #[test]
    fn tutorial_and_info_return_to_title_only() {
        let mut flow = ScreenFlow::new();
        flow.go(Screen::Tutorial).unwrap();
        assert!(flow.go(Screen::Countdown).is_err());
        flow.go(Screen::Title).unwrap();
        flow.go(Screen::Info).unwrap();
        assert!(flow.go(Screen::Result).is_err());
    }

    #[test]
    fn playing_waits_for_the_countdown() {
        let tuning = EngineTuning::default();
        let mut flow = ScreenFlow::new();
        flow.start_countdown(&tuning).unwrap();
        assert_eq!(flow.countdown().unwrap().display_seconds(), 3);

        // Jumping ahead while the countdown runs is rejected.
        assert!(flow.go(Screen::Playing).is_err());

        assert_eq!(flow.tick(1000.0), None);
        assert_eq!(flow.tick(1000.0), None);
        assert_eq!(flow.tick(1000.0), Some(Screen::Playing));
        assert_eq!(flow.current(), Screen::Playing);
        assert!(flow.countdown().is_none());
    }

    #[test]
    fn info_screen_dismisses_itself() {
        let tuning = EngineTuning::default();
        let mut flow = ScreenFlow::new();
        flow.show_info(&tuning).unwrap();

        assert_eq!(flow.tick(2999.0), None);
        assert_eq!(flow.tick(1.0), Some(Screen::Title));
        assert_eq!(flow.current(), Screen::Title);
    }

    #[test]
    fn leaving_the_countdown_early_cancels_it() {
        let tuning = EngineTuning::default();
        let mut flow = ScreenFlow::new();
        flow.start_countdown(&tuning).unwrap();
        flow.go(Screen::Title).unwrap();
        assert!(flow.countdown().is_none());
        // No stale timer fires after the screen changed.
        assert_eq!(flow.tick(5000.0), None);
    }

    #[test]
    fn countdown_displays_whole_seconds_until_done() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.display_seconds(), 3);
        assert!(!countdown.advance(1000.0));
        assert_eq!(countdown.display_seconds(), 2);
        assert!(!countdown.advance(1999.0));
        assert_eq!(countdown.display_seconds(), 1);
        assert!(countdown.advance(1.0));
        assert_eq!(countdown.display_seconds(), 0);
    }

    #[test]
    fn creator_modes_are_mutually_exclusive() {
        assert!(CreatorMode::Idle.can_enter(CreatorMode::Recording));
        assert!(CreatorMode::Idle.can_enter(CreatorMode::Testing));
        assert!(!CreatorMode::Recording.can_enter(CreatorMode::Testing));
        assert!(!CreatorMode::Testing.can_enter(CreatorMode::Recording));
        assert!(CreatorMode::Recording.can_enter(CreatorMode::Idle));
        assert!(CreatorMode::Testing.can_enter(CreatorMode::Testing));
    }
}
