use crate::model::Track;

/// Duration assumed for a preview when the output cannot report one.
pub const DEFAULT_PREVIEW_SECS: f64 = 30.0;

/// Observable state of the shared preview player.
///
/// `is_playing` is only ever true while `current_track` holds a track with a
/// preview URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub progress_secs: f64,
    pub duration_secs: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            progress_secs: 0.0,
            duration_secs: 0.0,
        }
    }
}

impl PlaybackState {
    /// Whether `track` is the one currently loaded.
    #[must_use]
    pub fn is_current(&self, track: &Track) -> bool {
        self.current_track
            .as_ref()
            .is_some_and(|current| current.same_preview(track))
    }

    /// Whether `track` is loaded and audible right now.
    #[must_use]
    pub fn is_playing_track(&self, track: &Track) -> bool {
        self.is_playing && self.is_current(track)
    }

    /// Progress in `0.0..=1.0`, for progress bars.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.progress_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_ratio_is_clamped() {
        let state = PlaybackState {
            current_track: None,
            is_playing: false,
            progress_secs: 45.0,
            duration_secs: DEFAULT_PREVIEW_SECS,
        };
        assert!((state.progress_ratio() - 1.0).abs() < f64::EPSILON);
        assert!(PlaybackState::default().progress_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn playing_track_requires_matching_preview() {
        let track = Track::new("A").with_preview("https://p/a.mp3");
        let other = Track::new("B").with_preview("https://p/b.mp3");
        let state = PlaybackState {
            current_track: Some(track.clone()),
            is_playing: true,
            progress_secs: 1.0,
            duration_secs: 30.0,
        };
        assert!(state.is_playing_track(&track));
        assert!(!state.is_playing_track(&other));
    }
}
