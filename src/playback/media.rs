use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("no media source loaded")]
    NoSource,
    #[error("playback aborted")]
    Aborted,
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("source not supported: {0}")]
    SourceNotSupported(String),
    #[error("playback not allowed: {0}")]
    NotAllowed(String),
}

/// Notifications a media element emits after the fact.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
    DurationChange(f64),
    TimeUpdate(f64),
    VolumeChange { muted: bool },
    Error(MediaError),
}

/// The single audio element a controller drives.
///
/// Commands take effect on the element; the resulting state changes are
/// reported through [`MediaElement::drain_events`], never assumed.
pub trait MediaElement {
    fn source(&self) -> Option<&str>;
    /// Replace the source. Resets position and playback rate.
    fn load(&mut self, source: &str);
    fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);
    fn duration(&self) -> f64;
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);
    fn drain_events(&mut self) -> Vec<MediaEvent>;
}

/// Deterministic media element whose clock is advanced by the host.
#[derive(Debug, Clone)]
pub struct ClockMedia {
    known_sources: HashMap<String, f64>,
    source: Option<String>,
    time: f64,
    duration: f64,
    paused: bool,
    muted: bool,
    rate: f64,
    fail_next_play: Option<MediaError>,
    events: Vec<MediaEvent>,
}

impl ClockMedia {
    pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            known_sources: HashMap::new(),
            source: None,
            time: 0.0,
            duration: 0.0,
            paused: true,
            muted: false,
            rate: Self::DEFAULT_PLAYBACK_RATE,
            fail_next_play: None,
            events: Vec::new(),
        }
    }

    /// Register a playable source and its length in seconds.
    pub fn with_source(mut self, source: &str, duration: f64) -> Self {
        self.known_sources.insert(source.to_string(), duration);
        self
    }

    pub fn fail_next_play(&mut self, err: MediaError) {
        self.fail_next_play = Some(err);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Move the clock forward by `wall_secs` of wall time while playing.
    pub fn advance(&mut self, wall_secs: f64) {
        if self.paused || !wall_secs.is_finite() || wall_secs <= 0.0 {
            return;
        }
        self.time += wall_secs * self.rate;
        if self.time >= self.duration {
            self.time = self.duration;
            self.paused = true;
            self.events.push(MediaEvent::TimeUpdate(self.time));
            self.events.push(MediaEvent::Pause);
            self.events.push(MediaEvent::Ended);
            return;
        }
        self.events.push(MediaEvent::TimeUpdate(self.time));
    }
}

impl Default for ClockMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for ClockMedia {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self, source: &str) {
        if !self.paused {
            self.paused = true;
            self.events.push(MediaEvent::Pause);
        }
        self.source = Some(source.to_string());
        self.time = 0.0;
        self.rate = Self::DEFAULT_PLAYBACK_RATE;
        self.events.push(MediaEvent::TimeUpdate(0.0));
        match self.known_sources.get(source).copied() {
            Some(duration) => {
                self.duration = duration;
                self.events.push(MediaEvent::DurationChange(duration));
            }
            None => {
                self.duration = 0.0;
                self.events.push(MediaEvent::Error(MediaError::SourceNotSupported(
                    source.to_string(),
                )));
            }
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if let Some(err) = self.fail_next_play.take() {
            self.events.push(MediaEvent::Error(err.clone()));
            return Err(err);
        }
        let Some(source) = self.source.as_deref() else {
            return Err(MediaError::NoSource);
        };
        if !self.known_sources.contains_key(source) {
            return Err(MediaError::SourceNotSupported(source.to_string()));
        }
        if self.time >= self.duration {
            self.time = 0.0;
        }
        if self.paused {
            self.paused = false;
            self.events.push(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(MediaEvent::Pause);
        }
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        self.time = time.clamp(0.0, self.duration.max(0.0));
        self.events.push(MediaEvent::TimeUpdate(self.time));
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            self.muted = muted;
            self.events.push(MediaEvent::VolumeChange { muted });
        }
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reports_duration_and_resets_rate() {
        let mut media = ClockMedia::new().with_source("a.mp3", 3.0);
        media.set_playback_rate(1.5);
        media.load("a.mp3");
        assert_eq!(media.playback_rate(), ClockMedia::DEFAULT_PLAYBACK_RATE);
        assert!(media
            .drain_events()
            .contains(&MediaEvent::DurationChange(3.0)));
    }

    #[test]
    fn unknown_source_errors() {
        let mut media = ClockMedia::new();
        media.load("missing.mp3");
        let events = media.drain_events();
        assert!(matches!(
            events.last(),
            Some(MediaEvent::Error(MediaError::SourceNotSupported(_)))
        ));
        assert!(media.play().is_err());
    }

    #[test]
    fn advance_runs_to_end() {
        let mut media = ClockMedia::new().with_source("a.mp3", 1.0);
        media.load("a.mp3");
        media.play().expect("play");
        media.drain_events();
        media.advance(0.6);
        media.advance(0.6);
        assert_eq!(media.current_time(), 1.0);
        assert!(media.is_paused());
        let events = media.drain_events();
        assert_eq!(events.last(), Some(&MediaEvent::Ended));
    }

    #[test]
    fn rate_scales_advance() {
        let mut media = ClockMedia::new().with_source("a.mp3", 10.0);
        media.load("a.mp3");
        media.set_playback_rate(2.0);
        media.play().expect("play");
        media.advance(1.0);
        assert!((media.current_time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn seek_is_clamped_by_element() {
        let mut media = ClockMedia::new().with_source("a.mp3", 2.0);
        media.load("a.mp3");
        media.set_current_time(5.0);
        assert_eq!(media.current_time(), 2.0);
        media.set_current_time(-1.0);
        assert_eq!(media.current_time(), 0.0);
    }
}
