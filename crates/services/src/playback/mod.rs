//! Preview playback: the audio output seam and the coordinator that owns it.

mod coordinator;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PlaybackError;

pub use coordinator::{PREVIEW_VOLUME, PlayOutcome, PlaybackCoordinator, SAMPLE_INTERVAL};
pub use memory::MemoryOutput;

/// Called once when the loaded media plays to its end.
pub type EndedCallback = Arc<dyn Fn() + Send + Sync>;

/// A single controllable media output.
///
/// Implementations must not invoke the ended callback while holding locks
/// that their other methods take.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Replace the loaded media. Playback stays paused.
    fn load(&self, url: &str);

    /// Start or resume playback of the loaded media.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError` when nothing is loaded or the media cannot be
    /// fetched, decoded or played.
    async fn play(&self) -> Result<(), PlaybackError>;

    fn pause(&self);

    fn seek(&self, position: Duration);

    fn set_volume(&self, volume: f32);

    fn is_paused(&self) -> bool;

    fn position(&self) -> Duration;

    /// Total length of the loaded media, when known.
    fn duration(&self) -> Option<Duration>;

    /// Replace the end-of-media callback.
    fn on_ended(&self, callback: EndedCallback);
}
