use serde::Serialize;

use crate::playback::media::{MediaElement, MediaError, MediaEvent};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlaybackState {
    pub playing: bool,
    pub muted: bool,
    pub duration: f64,
    pub current_time: f64,
    pub audio_source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn phase(&self) -> PlaybackPhase {
        match (&self.audio_source, self.playing) {
            (None, _) => PlaybackPhase::Idle,
            (Some(_), true) => PlaybackPhase::Playing,
            (Some(_), false) => PlaybackPhase::Paused,
        }
    }
}

type Observer = Box<dyn FnMut(&PlaybackState)>;

/// Owns the audio element and the playback state derived from its events.
///
/// Only this type writes [`PlaybackState`]. Commands go to the element and
/// the state follows once [`PlaybackController::sync`] applies the events
/// the element reported, so `playing` flips only after an actual `Play`.
pub struct PlaybackController<M: MediaElement> {
    media: M,
    state: PlaybackState,
    observers: Vec<Observer>,
    last_error: Option<MediaError>,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M) -> Self {
        let state = PlaybackState {
            playing: false,
            muted: media.muted(),
            duration: media.duration(),
            current_time: media.current_time(),
            audio_source: media.source().map(str::to_string),
        };
        Self {
            media,
            state,
            observers: Vec::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn last_error(&self) -> Option<&MediaError> {
        self.last_error.as_ref()
    }

    /// Live position read straight from the element.
    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PlaybackState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Start `source`, loading it first when it is not the current source.
    /// A reload starts from 0 and keeps the current playback rate.
    pub fn play(&mut self, source: &str) {
        if self.media.source() != Some(source) {
            let rate = self.media.playback_rate();
            self.media.load(source);
            self.media.set_playback_rate(rate);
            self.state.audio_source = Some(source.to_string());
            self.state.current_time = 0.0;
            self.notify();
        }
        self.last_error = None;
        if let Err(err) = self.media.play() {
            tracing::warn!(source, error = %err, "playback: play request rejected");
            self.last_error = Some(err);
        }
    }

    pub fn pause(&mut self) {
        self.media.pause();
    }

    pub fn toggle(&mut self, source: &str) {
        if self.state.playing && self.state.audio_source.as_deref() == Some(source) {
            self.pause();
        } else {
            self.play(source);
        }
    }

    pub fn seek(&mut self, time: f64) {
        self.media.set_current_time(time);
    }

    pub fn seek_by(&mut self, delta: f64) {
        let target = self.media.current_time() + delta;
        self.media.set_current_time(target);
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.state.muted;
        self.media.set_muted(muted);
        self.state.muted = muted;
        self.notify();
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            tracing::warn!(rate, "playback: ignoring invalid playback rate");
            return;
        }
        self.media.set_playback_rate(rate);
    }

    /// Apply every event the element reported since the last call.
    /// Returns the number of events applied.
    pub fn sync(&mut self) -> usize {
        let events = self.media.drain_events();
        let count = events.len();
        let mut changed = false;
        for event in events {
            changed |= self.apply(event);
        }
        if changed {
            self.notify();
        }
        count
    }

    fn apply(&mut self, event: MediaEvent) -> bool {
        let before = self.state.clone();
        match event {
            MediaEvent::Play => self.state.playing = true,
            MediaEvent::Pause | MediaEvent::Ended => self.state.playing = false,
            MediaEvent::DurationChange(duration) => {
                if duration.is_finite() {
                    self.state.duration = duration;
                }
            }
            MediaEvent::TimeUpdate(time) => self.state.current_time = time,
            MediaEvent::VolumeChange { muted } => self.state.muted = muted,
            MediaEvent::Error(err) => {
                tracing::warn!(
                    source = self.state.audio_source.as_deref().unwrap_or(""),
                    error = %err,
                    "playback: media element reported an error"
                );
                self.state.playing = false;
                self.last_error = Some(err);
            }
        }
        before != self.state
    }

    fn notify(&mut self) {
        let state = self.state.clone();
        for observer in &mut self.observers {
            observer(&state);
        }
    }
}
