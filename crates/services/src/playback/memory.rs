use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::{AudioOutput, EndedCallback};
use crate::error::PlaybackError;

/// Silent in-process output.
///
/// Tracks load/play/pause calls and a manually driven position. Used when no
/// audio device is available and as the output of choice in tests.
#[derive(Default)]
pub struct MemoryOutput {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    source: Option<String>,
    paused: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    fail_next: Option<PlaybackError>,
    play_calls: u32,
    on_ended: Option<EndedCallback>,
}

impl MemoryOutput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                paused: true,
                volume: 1.0,
                ..MemoryState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `play` call fail with `error`.
    pub fn fail_next_play(&self, error: PlaybackError) {
        self.state().fail_next = Some(error);
    }

    /// Length reported for whatever gets loaded next.
    pub fn set_media_duration(&self, duration: Option<Duration>) {
        self.state().duration = duration;
    }

    /// Move the playhead, as if audio had been rendered.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state();
        if !state.paused {
            state.position += by;
        }
    }

    /// Simulate the media reaching its end.
    pub fn finish(&self) {
        let callback = {
            let mut state = self.state();
            state.paused = true;
            state.position = state.duration.unwrap_or_default();
            state.on_ended.clone()
        };
        if let Some(callback) = callback {
            callback();
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<String> {
        self.state().source.clone()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.state().volume
    }

    #[must_use]
    pub fn play_calls(&self) -> u32 {
        self.state().play_calls
    }
}

#[async_trait]
impl AudioOutput for MemoryOutput {
    fn load(&self, url: &str) {
        let mut state = self.state();
        state.source = Some(url.to_string());
        state.paused = true;
        state.position = Duration::ZERO;
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        let mut state = self.state();
        state.play_calls += 1;
        if let Some(error) = state.fail_next.take() {
            state.paused = true;
            return Err(error);
        }
        if state.source.is_none() {
            return Err(PlaybackError::NothingLoaded);
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&self) {
        self.state().paused = true;
    }

    fn seek(&self, position: Duration) {
        self.state().position = position;
    }

    fn set_volume(&self, volume: f32) {
        self.state().volume = volume;
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn position(&self) -> Duration {
        self.state().position
    }

    fn duration(&self) -> Option<Duration> {
        let state = self.state();
        state.source.as_ref().and(state.duration)
    }

    fn on_ended(&self, callback: EndedCallback) {
        self.state().on_ended = Some(callback);
    }
}
