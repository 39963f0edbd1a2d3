use std::path::Path;

use anyhow::{Context, Result};
use kira::sound::PlaybackState;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager as KiraAudioManager, AudioManagerSettings, Tween};

use super::click::ClickSink;
use super::clock::{ClockEvent, ClockSource};

/// A [`ClockSource`] backed by real audio playback through kira.
///
/// The playback position of the sound handle is the single time source
/// for the whole session, so judgments stay locked to what the player
/// hears. Also carries the metronome click for test playback.
pub struct SongClock {
    manager: KiraAudioManager,
    data: StaticSoundData,
    handle: Option<StaticSoundHandle>,
    click: StaticSoundData,
    duration_ms: f64,
    started: bool,
    ended: bool,
    pending: Vec<ClockEvent>,
}

impl SongClock {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let manager = KiraAudioManager::new(AudioManagerSettings::default())
            .context("Failed to create audio manager")?;
        let data = StaticSoundData::from_file(path)
            .with_context(|| format!("Failed to load track audio: {}", path.display()))?;
        let duration_ms = data.duration().as_secs_f64() * 1000.0;
        log::info!("loaded {} ({:.1}s)", path.display(), duration_ms / 1000.0);

        Ok(Self {
            manager,
            data,
            handle: None,
            click: super::click::click_sound(),
            duration_ms,
            started: false,
            ended: false,
            pending: vec![ClockEvent::MetadataLoaded(duration_ms)],
        })
    }

    /// Fire the metronome click. Playback failures are logged, not fatal.
    pub fn play_click(&mut self) {
        if let Err(e) = self.manager.play(self.click.clone()) {
            log::warn!("click playback failed: {e}");
        }
    }
}

impl ClickSink for SongClock {
    fn click(&mut self) {
        self.play_click();
    }
}

impl ClockSource for SongClock {
    fn play(&mut self) {
        match &mut self.handle {
            Some(handle) if handle.state() == PlaybackState::Paused => {
                handle.resume(Tween::default());
            }
            Some(_) => {}
            None => match self.manager.play(self.data.clone()) {
                Ok(handle) => {
                    self.handle = Some(handle);
                    self.started = true;
                    self.ended = false;
                    self.pending.push(ClockEvent::Started);
                }
                Err(e) => log::warn!("song playback failed: {e}"),
            },
        }
    }

    fn pause(&mut self) {
        if let Some(handle) = &mut self.handle {
            handle.pause(Tween::default());
        }
    }

    fn seek_start(&mut self) {
        if let Some(handle) = &mut self.handle {
            handle.seek_to(0.0);
        }
    }

    fn position_ms(&mut self) -> Option<f64> {
        let handle = self.handle.as_ref()?;
        self.started.then(|| handle.position() * 1000.0)
    }

    fn duration_ms(&self) -> Option<f64> {
        Some(self.duration_ms)
    }

    fn poll(&mut self) -> Vec<ClockEvent> {
        if !self.ended
            && self
                .handle
                .as_ref()
                .is_some_and(|h| h.state() == PlaybackState::Stopped)
        {
            self.ended = true;
            self.handle = None;
            self.pending.push(ClockEvent::Ended);
        }
        std::mem::take(&mut self.pending)
    }
}
