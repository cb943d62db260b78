use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use quiz_core::model::{BotMessage, Mood, QuizMode, QuizSession, Transcript, TranscriptMessage};

use super::state::{AnswerOutcome, QuizSnapshot, QuizTimings, SessionPhase, SessionRunState};
use crate::api::{AnswerRequest, AnswerResult, QuizApi, StartQuizRequest};
use crate::error::QuizApiError;
use crate::notify::{Notification, Notifier};
use crate::playback::PlaybackCoordinator;
use crate::tasks::{TaskGuard, TaskScheduler};

const START_FAILED: &str = "Failed to start quiz. Try again.";
const ANSWER_FAILED: &str = "Failed to submit answer";

/// Drives one quiz session at a time for a fixed mode.
///
/// Every start, completion and teardown bumps an epoch. Delayed work and API
/// responses that belong to an older epoch are dropped.
#[derive(Clone)]
pub struct QuizSessionController {
    shared: Arc<Shared>,
}

struct Shared {
    mode: QuizMode,
    api: Arc<dyn QuizApi>,
    playback: PlaybackCoordinator,
    notifier: Arc<dyn Notifier>,
    scheduler: TaskScheduler,
    timings: QuizTimings,
    inner: Mutex<Inner>,
    updates: watch::Sender<QuizSnapshot>,
}

struct Inner {
    run: SessionRunState,
    session: Option<QuizSession>,
    transcript: Transcript,
    pending_answer: Option<String>,
    mood: Option<Mood>,
    epoch: u64,
    /// The countdown ran out while an answer was being graded.
    completion_deferred: bool,
    pacing: Option<TaskGuard>,
    countdown: Option<TaskGuard>,
}

impl Inner {
    fn new(mode: QuizMode) -> Self {
        Self {
            run: SessionRunState::initial(mode),
            session: None,
            transcript: Transcript::new(),
            pending_answer: None,
            mood: None,
            epoch: 0,
            completion_deferred: false,
            pacing: None,
            countdown: None,
        }
    }

    fn cancel_tasks(&mut self) {
        self.pacing = None;
        self.countdown = None;
    }

    fn snapshot(&self, mode: QuizMode) -> QuizSnapshot {
        QuizSnapshot {
            mode,
            run: self.run.clone(),
            transcript: self.transcript.clone(),
            pending_answer: self.pending_answer.clone(),
            total_questions: self
                .session
                .as_ref()
                .map_or(0, QuizSession::total_questions),
            mood: self.mood,
        }
    }
}

impl QuizSessionController {
    #[must_use]
    pub fn new(
        mode: QuizMode,
        api: Arc<dyn QuizApi>,
        playback: PlaybackCoordinator,
        notifier: Arc<dyn Notifier>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self::with_timings(mode, api, playback, notifier, scheduler, QuizTimings::default())
    }

    #[must_use]
    pub fn with_timings(
        mode: QuizMode,
        api: Arc<dyn QuizApi>,
        playback: PlaybackCoordinator,
        notifier: Arc<dyn Notifier>,
        scheduler: TaskScheduler,
        timings: QuizTimings,
    ) -> Self {
        let (updates, _) = watch::channel(QuizSnapshot::initial(mode));
        Self {
            shared: Arc::new(Shared {
                mode,
                api,
                playback,
                notifier,
                scheduler,
                timings,
                inner: Mutex::new(Inner::new(mode)),
                updates,
            }),
        }
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.shared.mode
    }

    #[must_use]
    pub fn playback(&self) -> &PlaybackCoordinator {
        &self.shared.playback
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        let inner = self.shared.lock();
        inner.snapshot(self.shared.mode)
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Ask the backend for a new session and show its first question.
    ///
    /// `mood` is remembered for the mood mode; other modes ignore it.
    ///
    /// # Errors
    ///
    /// Returns the backend error after moving to the error phase (or back to
    /// mood selection) and notifying the user.
    pub async fn start_session(&self, mood: Option<Mood>) -> Result<(), QuizApiError> {
        let mode = self.shared.mode;
        let (epoch, request) = {
            let mut inner = self.shared.lock();
            inner.epoch += 1;
            inner.cancel_tasks();
            inner.run = SessionRunState::loading();
            inner.session = None;
            inner.transcript = Transcript::new();
            inner.pending_answer = None;
            inner.completion_deferred = false;
            if mode.needs_mood() && mood.is_some() {
                inner.mood = mood;
            }
            let request_mood = if mode.needs_mood() { inner.mood } else { None };
            self.shared.publish(&inner);
            (inner.epoch, StartQuizRequest::new(mode, request_mood))
        };
        log::debug!("starting {mode} quiz");

        let result = self.shared.api.start_quiz(request).await;

        let mut inner = self.shared.lock();
        if inner.epoch != epoch {
            return Ok(());
        }
        match result {
            Ok(session) => {
                inner.transcript = session
                    .question(0)
                    .map(|first| Transcript::starting_with(BotMessage::question(first)))
                    .unwrap_or_default();
                inner.run.phase = SessionPhase::Playing;
                if mode.is_timed() {
                    inner.run.time_left_secs = Some(self.shared.timings.time_limit_secs);
                    inner.run.timed_active = true;
                    inner.countdown = Some(self.shared.start_countdown(epoch));
                }
                log::debug!(
                    "session {} started with {} questions",
                    session.id(),
                    session.total_questions()
                );
                inner.session = Some(session);
                self.shared.publish(&inner);
                Ok(())
            }
            Err(error) => {
                log::warn!("could not start {mode} quiz: {error}");
                inner.run.phase = if mode.needs_mood() {
                    SessionPhase::MoodSelect
                } else {
                    SessionPhase::Error
                };
                self.shared.publish(&inner);
                drop(inner);
                self.shared.notifier.notify(Notification::error(START_FAILED));
                Err(error)
            }
        }
    }

    /// Send `choice` for the current question.
    ///
    /// Ignored unless a question is open. On success the score becomes the
    /// backend total and the next step is scheduled.
    ///
    /// # Errors
    ///
    /// Returns the backend error after reopening the question and notifying
    /// the user. Score and transcript are left as they were.
    pub async fn submit_answer(&self, choice: &str) -> Result<AnswerOutcome, QuizApiError> {
        let (epoch, request) = {
            let mut inner = self.shared.lock();
            if inner.run.phase != SessionPhase::Playing || inner.run.answered {
                return Ok(AnswerOutcome::Ignored);
            }
            let Some(session) = inner.session.as_ref() else {
                return Ok(AnswerOutcome::Ignored);
            };
            if session.question(inner.run.current_index).is_none() {
                return Ok(AnswerOutcome::Ignored);
            }
            let request = AnswerRequest {
                session_id: session.id().clone(),
                question_index: inner.run.current_index,
                answer: choice.to_string(),
            };
            inner.run.answered = true;
            inner.pending_answer = Some(choice.to_string());
            self.shared.publish(&inner);
            (inner.epoch, request)
        };

        let result = self.shared.api.submit_answer(request).await;

        let mut inner = self.shared.lock();
        if inner.epoch != epoch {
            return Ok(AnswerOutcome::Ignored);
        }
        match result {
            Ok(graded) => {
                let echo = inner
                    .pending_answer
                    .take()
                    .unwrap_or_else(|| choice.to_string());
                let outcome = self.shared.record_grade(&mut inner, epoch, echo, graded);
                self.shared.publish(&inner);
                Ok(outcome)
            }
            Err(error) => {
                log::warn!("could not submit answer: {error}");
                inner.run.answered = false;
                inner.pending_answer = None;
                let deferred = std::mem::take(&mut inner.completion_deferred);
                self.shared.publish(&inner);
                drop(inner);
                if deferred {
                    self.shared.complete(epoch);
                }
                self.shared.notifier.notify(Notification::error(ANSWER_FAILED));
                Err(error)
            }
        }
    }

    /// Show the hint for the current question once.
    ///
    /// Returns whether a hint entry was appended.
    pub fn request_hint(&self) -> bool {
        let mut inner = self.shared.lock();
        if inner.run.phase != SessionPhase::Playing || inner.run.show_hint {
            return false;
        }
        let Some(hint) = inner
            .session
            .as_ref()
            .and_then(|session| session.question(inner.run.current_index))
            .map(BotMessage::hint)
        else {
            return false;
        };
        inner.run.show_hint = true;
        inner.transcript.push(hint);
        self.shared.publish(&inner);
        true
    }

    /// Stop audio and discard the session along with any pending work.
    pub fn leave(&self) {
        self.shared.playback.stop();
        let mode = self.shared.mode;
        let mut inner = self.shared.lock();
        let epoch = inner.epoch + 1;
        *inner = Inner {
            epoch,
            ..Inner::new(mode)
        };
        self.shared.publish(&inner);
        log::debug!("left {mode} quiz");
    }

    /// "Play again": back to mood selection for the mood mode, otherwise a
    /// fresh session.
    ///
    /// # Errors
    ///
    /// Propagates the backend error of the new session.
    pub async fn restart(&self) -> Result<(), QuizApiError> {
        if self.shared.mode.needs_mood() {
            self.leave();
            return Ok(());
        }
        self.start_session(None).await
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.snapshot(self.mode));
    }

    fn record_grade(
        self: &Arc<Self>,
        inner: &mut Inner,
        epoch: u64,
        echo: String,
        graded: AnswerResult,
    ) -> AnswerOutcome {
        let countdown_expired =
            self.mode.is_timed() && inner.run.time_left_secs == Some(0);
        let finished = graded.is_last_question
            || countdown_expired
            || std::mem::take(&mut inner.completion_deferred);

        inner.run.score = graded.total_score;
        inner.transcript.push(TranscriptMessage::user(echo));
        inner.transcript.push(BotMessage {
            content: graded.bot_response,
            is_correct: Some(graded.is_correct),
            correct_answer: Some(graded.correct_answer),
            fun_fact: graded.fun_fact,
            points: Some(graded.points),
            track_info: graded.track_info,
            ..BotMessage::default()
        });

        let weak = Arc::downgrade(self);
        inner.pacing = Some(if finished {
            self.scheduler.after(self.timings.feedback_delay, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.complete(epoch);
                }
            })
        } else {
            self.scheduler.after(self.timings.next_question_delay, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.advance(epoch);
                }
            })
        });

        AnswerOutcome::Graded {
            is_correct: graded.is_correct,
            finished,
        }
    }

    fn advance(&self, epoch: u64) {
        let mut inner = self.lock();
        if inner.epoch != epoch || inner.run.phase != SessionPhase::Playing {
            return;
        }
        inner.run.current_index += 1;
        inner.run.answered = false;
        inner.run.show_hint = false;
        let next = inner
            .session
            .as_ref()
            .and_then(|session| session.question(inner.run.current_index))
            .map(BotMessage::question);
        // Past the last question the session stays open until the server,
        // the countdown or the player ends it.
        if let Some(question) = next {
            inner.transcript.push(question);
        }
        self.publish(&inner);
    }

    fn complete(&self, epoch: u64) {
        let mut inner = self.lock();
        if inner.epoch != epoch {
            return;
        }
        inner.epoch += 1;
        inner.cancel_tasks();
        inner.run.phase = SessionPhase::Complete;
        inner.run.timed_active = false;
        inner.pending_answer = None;
        inner.completion_deferred = false;
        self.publish(&inner);
        log::debug!("quiz complete with score {}", inner.run.score);
        drop(inner);
        self.playback.stop();
    }

    fn start_countdown(self: &Arc<Self>, epoch: u64) -> TaskGuard {
        let weak = Arc::downgrade(self);
        self.scheduler.every(self.timings.countdown_tick, move || {
            let Some(shared) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            shared.tick_countdown(epoch)
        })
    }

    fn tick_countdown(&self, epoch: u64) -> ControlFlow<()> {
        let mut inner = self.lock();
        if inner.epoch != epoch || !inner.run.timed_active {
            return ControlFlow::Break(());
        }
        let left = inner.run.time_left_secs.unwrap_or(0).saturating_sub(1);
        inner.run.time_left_secs = Some(left);
        if left > 0 {
            self.publish(&inner);
            return ControlFlow::Continue(());
        }

        inner.run.timed_active = false;
        if inner.pending_answer.is_some() {
            inner.completion_deferred = true;
            self.publish(&inner);
        } else {
            drop(inner);
            self.complete(epoch);
        }
        ControlFlow::Break(())
    }
}
