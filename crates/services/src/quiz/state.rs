use std::time::Duration;

use quiz_core::model::{Mood, QuizMode, Transcript};

/// Where a quiz session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    MoodSelect,
    Loading,
    Playing,
    Complete,
    Error,
}

/// Transient per-session counters and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRunState {
    pub phase: SessionPhase,
    pub current_index: usize,
    /// Latest total reported by the backend.
    pub score: u32,
    pub answered: bool,
    pub show_hint: bool,
    pub time_left_secs: Option<u32>,
    pub timed_active: bool,
}

impl SessionRunState {
    /// State before any session was started for `mode`.
    #[must_use]
    pub fn initial(mode: QuizMode) -> Self {
        let phase = if mode.needs_mood() {
            SessionPhase::MoodSelect
        } else {
            SessionPhase::Loading
        };
        Self {
            phase,
            current_index: 0,
            score: 0,
            answered: false,
            show_hint: false,
            time_left_secs: None,
            timed_active: false,
        }
    }

    pub(crate) fn loading() -> Self {
        Self {
            phase: SessionPhase::Loading,
            ..Self::initial(QuizMode::Genre)
        }
    }
}

/// Delays used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizTimings {
    /// Pause between the last feedback and the results screen.
    pub feedback_delay: Duration,
    /// Pause between feedback and the next question.
    pub next_question_delay: Duration,
    pub countdown_tick: Duration,
    /// Countdown length for timed sessions.
    pub time_limit_secs: u32,
}

impl Default for QuizTimings {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::from_millis(2000),
            next_question_delay: Duration::from_millis(2500),
            countdown_tick: Duration::from_secs(1),
            time_limit_secs: 60,
        }
    }
}

/// Everything a view needs to render a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub mode: QuizMode,
    pub run: SessionRunState,
    pub transcript: Transcript,
    /// Choice sent to the backend and not graded yet.
    pub pending_answer: Option<String>,
    pub total_questions: usize,
    pub mood: Option<Mood>,
}

impl QuizSnapshot {
    #[must_use]
    pub fn initial(mode: QuizMode) -> Self {
        Self {
            mode,
            run: SessionRunState::initial(mode),
            transcript: Transcript::new(),
            pending_answer: None,
            total_questions: 0,
            mood: None,
        }
    }

    /// Answer choices to offer, if the latest question is still open.
    #[must_use]
    pub fn awaiting_options(&self) -> Option<&[String]> {
        if self.run.phase != SessionPhase::Playing {
            return None;
        }
        self.transcript.awaiting_options(self.run.answered)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.run.phase == SessionPhase::Complete
    }
}

/// Result of a submit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Nothing was sent: no open question, or an answer is already in.
    Ignored,
    Graded { is_correct: bool, finished: bool },
}
