use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::watch;

use quiz_core::model::{DEFAULT_PREVIEW_SECS, PlaybackState, Track};

use super::{AudioOutput, EndedCallback};
use crate::error::PlaybackError;
use crate::tasks::{TaskGuard, TaskScheduler};

/// Output volume applied to every preview.
pub const PREVIEW_VOLUME: f32 = 0.7;

/// How often progress is sampled while a preview plays.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// What a playback request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The preview is audible.
    Started,
    /// The requested track was playing and is now paused.
    Paused,
    /// The track has no preview; it became current without audio.
    NoPreview,
    /// A later request took over the output before this one finished.
    Superseded,
    /// Replay was requested with nothing loaded.
    NothingLoaded,
}

#[derive(Clone, Copy)]
enum StartKind {
    Play,
    Replay,
}

/// Owns the single audio output shared by every track widget.
///
/// Cloning is cheap; all clones drive the same output. Each load bumps a
/// generation counter, and sampling ticks or end-of-media callbacks carrying
/// an older generation are ignored.
#[derive(Clone)]
pub struct PlaybackCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    output: Arc<dyn AudioOutput>,
    scheduler: TaskScheduler,
    sample_interval: Duration,
    inner: Mutex<Inner>,
    updates: watch::Sender<PlaybackState>,
}

#[derive(Default)]
struct Inner {
    state: PlaybackState,
    generation: u64,
    loaded: bool,
    /// Generation of a start request awaiting the output.
    pending: Option<u64>,
    sampler: Option<TaskGuard>,
}

impl PlaybackCoordinator {
    #[must_use]
    pub fn new(output: Arc<dyn AudioOutput>, scheduler: TaskScheduler) -> Self {
        Self::with_sample_interval(output, scheduler, SAMPLE_INTERVAL)
    }

    #[must_use]
    pub fn with_sample_interval(
        output: Arc<dyn AudioOutput>,
        scheduler: TaskScheduler,
        sample_interval: Duration,
    ) -> Self {
        let (updates, _) = watch::channel(PlaybackState::default());
        Self {
            shared: Arc::new(Shared {
                output,
                scheduler,
                sample_interval,
                inner: Mutex::new(Inner::default()),
                updates,
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> PlaybackState {
        self.shared.lock().state.clone()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.updates.subscribe()
    }

    /// Toggle or switch to `track`.
    ///
    /// Playing the track that is already audible pauses it. Any other track
    /// replaces the current one from the start.
    ///
    /// # Errors
    ///
    /// Returns the output's `PlaybackError` when the preview cannot start.
    /// The state is left not playing.
    pub async fn play(&self, track: &Track) -> Result<PlayOutcome, PlaybackError> {
        let generation = {
            let mut inner = self.shared.lock();
            if inner.state.is_playing_track(track) {
                self.shared.halt(&mut inner);
                self.shared.publish(&inner);
                log::debug!("paused preview of {}", track.name);
                return Ok(PlayOutcome::Paused);
            }

            self.shared.output.pause();
            inner.sampler = None;
            inner.generation += 1;
            let generation = inner.generation;
            inner.state = PlaybackState {
                current_track: Some(track.clone()),
                is_playing: false,
                progress_secs: 0.0,
                duration_secs: DEFAULT_PREVIEW_SECS,
            };

            let Some(url) = track.preview() else {
                inner.loaded = false;
                inner.pending = None;
                self.shared.publish(&inner);
                log::debug!("track {} has no preview", track.name);
                return Ok(PlayOutcome::NoPreview);
            };

            self.shared.output.load(url);
            self.shared.output.set_volume(PREVIEW_VOLUME);
            self.shared
                .output
                .on_ended(Shared::ended_callback(&self.shared, generation));
            inner.loaded = true;
            inner.pending = Some(generation);
            self.shared.publish(&inner);
            generation
        };

        let result = self.shared.output.play().await;
        self.shared.finish_start(generation, result, StartKind::Play)
    }

    /// Pause whatever is audible. Idempotent.
    pub fn pause(&self) {
        let mut inner = self.shared.lock();
        self.shared.halt(&mut inner);
        self.shared.publish(&inner);
    }

    /// Silence the output and forget the current track.
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        self.shared.output.pause();
        self.shared.output.seek(Duration::ZERO);
        inner.generation += 1;
        inner.pending = None;
        inner.sampler = None;
        inner.loaded = false;
        inner.state = PlaybackState::default();
        self.shared.publish(&inner);
    }

    /// Restart the loaded preview from the beginning.
    ///
    /// # Errors
    ///
    /// Returns the output's `PlaybackError` when playback cannot restart;
    /// `is_playing` keeps its previous value.
    pub async fn replay(&self) -> Result<PlayOutcome, PlaybackError> {
        let generation = {
            let mut inner = self.shared.lock();
            if !inner.loaded {
                return Ok(PlayOutcome::NothingLoaded);
            }
            let generation = inner.generation;
            self.shared.output.seek(Duration::ZERO);
            self.shared
                .output
                .on_ended(Shared::ended_callback(&self.shared, generation));
            inner.pending = Some(generation);
            generation
        };

        let result = self.shared.output.play().await;
        self.shared.finish_start(generation, result, StartKind::Replay)
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.state.clone());
    }

    fn halt(&self, inner: &mut Inner) {
        self.output.pause();
        inner.generation += 1;
        inner.pending = None;
        inner.sampler = None;
        inner.state.is_playing = false;
    }

    fn finish_start(
        self: &Arc<Self>,
        generation: u64,
        result: Result<(), PlaybackError>,
        kind: StartKind,
    ) -> Result<PlayOutcome, PlaybackError> {
        let mut inner = self.lock();
        if inner.generation != generation {
            if result.is_ok() && inner.pending.is_none() && !inner.state.is_playing {
                self.output.pause();
            }
            return Ok(PlayOutcome::Superseded);
        }
        inner.pending = None;

        match result {
            Ok(()) => {
                inner.state.is_playing = true;
                if matches!(kind, StartKind::Replay) {
                    inner.state.progress_secs = 0.0;
                }
                inner.state.duration_secs = self.reported_duration();
                inner.sampler = Some(self.start_sampler(generation));
                self.publish(&inner);
                Ok(PlayOutcome::Started)
            }
            Err(error) => {
                log::warn!("preview playback failed: {error}");
                if matches!(kind, StartKind::Play) {
                    inner.state.is_playing = false;
                    self.publish(&inner);
                }
                Err(error)
            }
        }
    }

    fn reported_duration(&self) -> f64 {
        self.output
            .duration()
            .map(|duration| duration.as_secs_f64())
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or(DEFAULT_PREVIEW_SECS)
    }

    fn start_sampler(self: &Arc<Self>, generation: u64) -> TaskGuard {
        let weak = Arc::downgrade(self);
        self.scheduler.every(self.sample_interval, move || {
            let Some(shared) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            shared.sample(generation)
        })
    }

    fn sample(&self, generation: u64) -> ControlFlow<()> {
        let mut inner = self.lock();
        if inner.generation != generation || !inner.state.is_playing {
            return ControlFlow::Break(());
        }
        if !self.output.is_paused() {
            inner.state.progress_secs = self.output.position().as_secs_f64();
            inner.state.duration_secs = self.reported_duration();
            self.publish(&inner);
        }
        ControlFlow::Continue(())
    }

    fn ended_callback(shared: &Arc<Self>, generation: u64) -> EndedCallback {
        let weak: Weak<Self> = Arc::downgrade(shared);
        Arc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_ended(generation);
            }
        })
    }

    fn on_ended(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }
        inner.state.is_playing = false;
        inner.state.progress_secs = 0.0;
        inner.pending = None;
        inner.sampler = None;
        self.publish(&inner);
        log::debug!("preview ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::MemoryOutput;

    fn coordinator() -> (PlaybackCoordinator, Arc<MemoryOutput>) {
        let output = Arc::new(MemoryOutput::new());
        let coordinator = PlaybackCoordinator::new(output.clone(), TaskScheduler::current());
        (coordinator, output)
    }

    fn track(name: &str) -> Track {
        Track::new(name).with_preview(format!("https://p.scdn.co/{name}.mp3"))
    }

    #[tokio::test(start_paused = true)]
    async fn play_loads_preview_at_fixed_volume() {
        let (coordinator, output) = coordinator();
        let a = track("a");

        let outcome = coordinator.play(&a).await.unwrap();

        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(output.source().as_deref(), a.preview());
        assert!((output.volume() - PREVIEW_VOLUME).abs() < f32::EPSILON);
        let state = coordinator.snapshot();
        assert!(state.is_playing_track(&a));
        assert!((state.duration_secs - DEFAULT_PREVIEW_SECS).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn reported_duration_replaces_default() {
        let (coordinator, output) = coordinator();
        output.set_media_duration(Some(Duration::from_secs(29)));

        coordinator.play(&track("a")).await.unwrap();

        assert!((coordinator.snapshot().duration_secs - 29.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn sampler_tracks_output_position() {
        let (coordinator, output) = coordinator();
        coordinator.play(&track("a")).await.unwrap();

        output.advance(Duration::from_secs(3));
        tokio::time::sleep(SAMPLE_INTERVAL + Duration::from_millis(10)).await;

        assert!((coordinator.snapshot().progress_secs - 3.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn sampler_stops_after_pause() {
        let (coordinator, output) = coordinator();
        coordinator.play(&track("a")).await.unwrap();
        coordinator.pause();
        coordinator.pause();

        output.seek(Duration::from_secs(7));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let state = coordinator.snapshot();
        assert!(!state.is_playing);
        assert!(state.progress_secs.abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_tracks_replaces_the_source() {
        let (coordinator, output) = coordinator();
        let b = track("b");
        coordinator.play(&track("a")).await.unwrap();

        coordinator.play(&b).await.unwrap();

        assert_eq!(output.source().as_deref(), b.preview());
        assert!(coordinator.snapshot().is_playing_track(&b));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_reports_error_and_stays_silent() {
        let (coordinator, output) = coordinator();
        output.fail_next_play(PlaybackError::Decode("bad frame".into()));

        let error = coordinator.play(&track("a")).await.unwrap_err();

        assert_eq!(error, PlaybackError::Decode("bad frame".into()));
        let state = coordinator.snapshot();
        assert!(!state.is_playing);
        assert!(state.current_track.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_media_resets_progress() {
        let (coordinator, output) = coordinator();
        let a = track("a");
        coordinator.play(&a).await.unwrap();
        output.advance(Duration::from_secs(5));
        tokio::time::sleep(SAMPLE_INTERVAL).await;

        output.finish();

        let state = coordinator.snapshot();
        assert!(!state.is_playing);
        assert!(state.progress_secs.abs() < f64::EPSILON);
        assert!(state.is_current(&a));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_end_callback_is_ignored() {
        let (coordinator, _output) = coordinator();
        let a = track("a");
        coordinator.play(&a).await.unwrap();
        let stale = Shared::ended_callback(&coordinator.shared, 0);

        stale();

        assert!(coordinator.snapshot().is_playing_track(&a));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_restarts_from_zero_without_changing_track() {
        let (coordinator, output) = coordinator();
        let a = track("a");
        coordinator.play(&a).await.unwrap();
        output.advance(Duration::from_secs(12));
        tokio::time::sleep(SAMPLE_INTERVAL).await;
        coordinator.pause();

        let outcome = coordinator.replay().await.unwrap();

        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(output.position(), Duration::ZERO);
        let state = coordinator.snapshot();
        assert!(state.is_playing_track(&a));
        assert!(state.progress_secs.abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_failure_keeps_playing_flag() {
        let (coordinator, output) = coordinator();
        coordinator.play(&track("a")).await.unwrap();
        output.fail_next_play(PlaybackError::Device("gone".into()));

        assert!(coordinator.replay().await.is_err());
        assert!(coordinator.snapshot().is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_without_loaded_preview_does_nothing() {
        let (coordinator, output) = coordinator();

        assert_eq!(coordinator.replay().await.unwrap(), PlayOutcome::NothingLoaded);

        coordinator.play(&track("a")).await.unwrap();
        coordinator.stop();
        assert_eq!(coordinator.replay().await.unwrap(), PlayOutcome::NothingLoaded);
        assert_eq!(output.play_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_state_changes() {
        let (coordinator, _output) = coordinator();
        let mut updates = coordinator.subscribe();

        coordinator.play(&track("a")).await.unwrap();

        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().is_playing);
    }
}
