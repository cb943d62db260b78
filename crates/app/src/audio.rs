//! Preview playback through the default audio device.
//!
//! rodio's `OutputStream` cannot leave the thread that opened it, so one
//! dedicated thread owns the stream and the current `Sink` and is driven by
//! commands. Position is tracked here rather than asked of the sink.

use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};
use services::{AudioOutput, EndedCallback, PlaybackError};

/// How often the audio thread checks whether the sink ran dry.
const END_POLL: Duration = Duration::from_millis(100);

enum Command {
    Start {
        id: u64,
        bytes: Arc<[u8]>,
        offset: Duration,
        volume: f32,
        paused: bool,
    },
    Resume,
    Pause,
    Volume(f32),
    Stop,
}

#[derive(Debug, Default)]
struct Playhead {
    base: Duration,
    since: Option<Instant>,
}

impl Playhead {
    fn position(&self) -> Duration {
        self.base + self.since.map_or(Duration::ZERO, |started| started.elapsed())
    }

    fn resume(&mut self) {
        if self.since.is_none() {
            self.since = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.since.take() {
            self.base += started.elapsed();
        }
    }

    fn reset(&mut self, at: Duration) {
        let running = self.since.is_some();
        self.base = at;
        self.since = running.then(Instant::now);
    }
}

struct Shared {
    source: Option<String>,
    bytes: Option<Arc<[u8]>>,
    duration: Option<Duration>,
    paused: bool,
    volume: f32,
    playhead: Playhead,
    /// Id of the last `Start` sent; the audio thread's sink belongs to it.
    start_id: u64,
    sink_live: bool,
    on_ended: Option<EndedCallback>,
}

impl Shared {
    fn new() -> Self {
        Self {
            source: None,
            bytes: None,
            duration: None,
            paused: true,
            volume: 1.0,
            playhead: Playhead::default(),
            start_id: 0,
            sink_live: false,
            on_ended: None,
        }
    }
}

/// `AudioOutput` backed by rodio. Previews are fetched over HTTP on first play.
pub struct RodioOutput {
    commands: Sender<Command>,
    shared: Arc<Mutex<Shared>>,
    http: reqwest::Client,
}

impl RodioOutput {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Device` when no device can be opened.
    pub fn open() -> Result<Self, PlaybackError> {
        let shared = Arc::new(Mutex::new(Shared::new()));
        let (commands, receiver) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let thread_shared = Arc::clone(&shared);
        thread::Builder::new()
            .name("audio-output".into())
            .spawn(move || match OutputStream::try_default() {
                Ok((_stream, handle)) => {
                    let _ = ready_tx.send(Ok(()));
                    run_audio_thread(&handle, &receiver, &thread_shared);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(PlaybackError::Device(err.to_string())));
                }
            })
            .map_err(|err| PlaybackError::Device(err.to_string()))?;

        ready_rx
            .recv()
            .map_err(|err| PlaybackError::Device(err.to_string()))??;
        log::debug!("audio output ready");

        Ok(Self {
            commands,
            shared,
            http: reqwest::Client::new(),
        })
    }

    fn state(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::warn!("audio thread is gone; command dropped");
        }
    }

    async fn fetch(&self, url: &str) -> Result<Arc<[u8]>, PlaybackError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| PlaybackError::Fetch(err.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|err| PlaybackError::Fetch(err.to_string()))?;
        Ok(Arc::from(body.as_ref()))
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, PlaybackError> {
    Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|err| PlaybackError::Decode(err.to_string()))
}

#[async_trait]
impl AudioOutput for RodioOutput {
    fn load(&self, url: &str) {
        let mut state = self.state();
        if state.source.as_deref() != Some(url) {
            state.bytes = None;
            state.duration = None;
        }
        state.source = Some(url.to_string());
        state.paused = true;
        state.playhead = Playhead::default();
        state.start_id += 1;
        state.sink_live = false;
        drop(state);
        self.send(Command::Stop);
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        let (url, cached) = {
            let state = self.state();
            let url = state.source.clone().ok_or(PlaybackError::NothingLoaded)?;
            (url, state.bytes.clone())
        };
        let bytes = match cached {
            Some(bytes) => bytes,
            None => {
                let bytes = self.fetch(&url).await?;
                let duration = decode(&bytes)?.total_duration();
                let mut state = self.state();
                if state.source.as_deref() != Some(url.as_str()) {
                    // Another preview was loaded while this one downloaded.
                    return Ok(());
                }
                state.bytes = Some(Arc::clone(&bytes));
                state.duration = duration;
                bytes
            }
        };

        let mut state = self.state();
        if state.source.as_deref() != Some(url.as_str()) {
            return Ok(());
        }
        if !state.paused {
            return Ok(());
        }
        let finished = state
            .duration
            .is_some_and(|duration| state.playhead.position() >= duration);
        if finished {
            state.playhead = Playhead::default();
            state.sink_live = false;
        }
        state.paused = false;
        state.playhead.resume();
        let command = if state.sink_live {
            Command::Resume
        } else {
            state.start_id += 1;
            state.sink_live = true;
            Command::Start {
                id: state.start_id,
                bytes,
                offset: state.playhead.position(),
                volume: state.volume,
                paused: false,
            }
        };
        drop(state);
        self.send(command);
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state();
        state.paused = true;
        state.playhead.pause();
        drop(state);
        self.send(Command::Pause);
    }

    fn seek(&self, position: Duration) {
        let mut state = self.state();
        state.playhead.reset(position);
        let Some(bytes) = state.bytes.clone() else {
            return;
        };
        if !state.sink_live && state.paused {
            return;
        }
        state.start_id += 1;
        state.sink_live = true;
        let command = Command::Start {
            id: state.start_id,
            bytes,
            offset: position,
            volume: state.volume,
            paused: state.paused,
        };
        drop(state);
        self.send(command);
    }

    fn set_volume(&self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.state().volume = volume;
        self.send(Command::Volume(volume));
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn position(&self) -> Duration {
        let state = self.state();
        let position = state.playhead.position();
        state.duration.map_or(position, |duration| position.min(duration))
    }

    fn duration(&self) -> Option<Duration> {
        self.state().duration
    }

    fn on_ended(&self, callback: EndedCallback) {
        self.state().on_ended = Some(callback);
    }
}

fn run_audio_thread(
    handle: &rodio::OutputStreamHandle,
    commands: &Receiver<Command>,
    shared: &Mutex<Shared>,
) {
    let mut current: Option<(u64, Sink)> = None;
    loop {
        match commands.recv_timeout(END_POLL) {
            Ok(Command::Start {
                id,
                bytes,
                offset,
                volume,
                paused,
            }) => {
                if let Some((_, sink)) = current.take() {
                    sink.stop();
                }
                current = start_sink(handle, &bytes, offset, volume, paused).map(|sink| (id, sink));
            }
            Ok(Command::Resume) => {
                if let Some((_, sink)) = &current {
                    sink.play();
                }
            }
            Ok(Command::Pause) => {
                if let Some((_, sink)) = &current {
                    sink.pause();
                }
            }
            Ok(Command::Volume(volume)) => {
                if let Some((_, sink)) = &current {
                    sink.set_volume(volume);
                }
            }
            Ok(Command::Stop) => {
                if let Some((_, sink)) = current.take() {
                    sink.stop();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let drained = current.as_ref().is_some_and(|(_, sink)| sink.empty());
        if drained {
            if let Some((id, _)) = current.take() {
                report_end(shared, id);
            }
        }
    }
    log::debug!("audio thread stopped");
}

fn start_sink(
    handle: &rodio::OutputStreamHandle,
    bytes: &Arc<[u8]>,
    offset: Duration,
    volume: f32,
    paused: bool,
) -> Option<Sink> {
    let source = match decode(bytes) {
        Ok(source) => source,
        Err(err) => {
            log::warn!("{err}");
            return None;
        }
    };
    let sink = match Sink::try_new(handle) {
        Ok(sink) => sink,
        Err(err) => {
            log::warn!("could not open sink: {err}");
            return None;
        }
    };
    sink.set_volume(volume);
    if paused {
        sink.pause();
    }
    sink.append(source.skip_duration(offset));
    Some(sink)
}

/// Mark the sink for `id` as finished and fire the ended callback outside the lock.
fn report_end(shared: &Mutex<Shared>, id: u64) {
    let callback = {
        let mut state = lock(shared);
        if state.start_id != id || state.paused {
            return;
        }
        state.paused = true;
        state.playhead.pause();
        state.sink_live = false;
        state.on_ended.clone()
    };
    if let Some(callback) = callback {
        callback();
    }
}
