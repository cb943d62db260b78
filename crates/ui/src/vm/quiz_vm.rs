use quiz_core::catalog::{MOODS, mode_info};
use quiz_core::model::{BotMessage, Track, TrackInfo, TranscriptMessage};
use services::{QuizSnapshot, SessionPhase};

use crate::vm::time_fmt::format_countdown;

/// Seconds left at which the countdown is highlighted.
const URGENT_SECS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackBadge {
    Correct,
    Incorrect,
}

impl FeedbackBadge {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeedbackBadge::Correct => "Correct!",
            FeedbackBadge::Incorrect => "Incorrect",
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            FeedbackBadge::Correct => "badge badge-correct",
            FeedbackBadge::Incorrect => "badge badge-incorrect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotMessageVm {
    pub content: String,
    pub track: Option<Track>,
    pub badge: Option<FeedbackBadge>,
    pub correct_answer: Option<String>,
    pub points_label: Option<String>,
    pub fun_fact: Option<String>,
    pub is_hint: bool,
    pub track_info: Option<TrackInfo>,
}

impl BotMessageVm {
    /// Bubble class reflecting hint or verdict.
    #[must_use]
    pub fn bubble_class(&self) -> &'static str {
        match (self.is_hint, self.badge) {
            (true, _) => "bubble bubble-hint",
            (false, Some(FeedbackBadge::Correct)) => "bubble bubble-correct",
            (false, Some(FeedbackBadge::Incorrect)) => "bubble bubble-incorrect",
            (false, None) => "bubble",
        }
    }
}

impl From<&BotMessage> for BotMessageVm {
    fn from(bot: &BotMessage) -> Self {
        let badge = bot.is_correct.map(|correct| {
            if correct {
                FeedbackBadge::Correct
            } else {
                FeedbackBadge::Incorrect
            }
        });
        Self {
            content: bot.content.clone(),
            track: bot.track.clone(),
            badge,
            correct_answer: bot
                .correct_answer
                .clone()
                .filter(|_| badge == Some(FeedbackBadge::Incorrect)),
            points_label: bot
                .points
                .filter(|points| *points > 0)
                .map(|points| format!("+{points} pts")),
            fun_fact: bot.fun_fact.clone(),
            is_hint: bot.is_hint,
            track_info: bot.track_info.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageVm {
    Bot(BotMessageVm),
    User { content: String },
}

impl From<&TranscriptMessage> for MessageVm {
    fn from(message: &TranscriptMessage) -> Self {
        match message {
            TranscriptMessage::Bot(bot) => MessageVm::Bot(BotMessageVm::from(bot)),
            TranscriptMessage::User { content } => MessageVm::User {
                content: content.clone(),
            },
        }
    }
}

/// Render-ready state of the quiz page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub phase: SessionPhase,
    pub title: &'static str,
    pub score: u32,
    pub question_label: String,
    pub progress_percent: u32,
    pub countdown_label: Option<String>,
    pub countdown_urgent: bool,
    pub mood_label: Option<&'static str>,
    pub messages: Vec<MessageVm>,
    pub pending_answer: Option<String>,
    pub options: Vec<String>,
    pub can_hint: bool,
    pub answered_questions: usize,
}

impl QuizVm {
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}

#[must_use]
pub fn map_quiz_snapshot(snapshot: &QuizSnapshot) -> QuizVm {
    let run = &snapshot.run;
    let total = snapshot.total_questions;
    let options = snapshot
        .awaiting_options()
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    let countdown_label = if snapshot.mode.is_timed() {
        run.time_left_secs.map(format_countdown)
    } else {
        None
    };
    let answered_questions = snapshot
        .transcript
        .iter()
        .filter(|message| message.as_bot().is_some_and(BotMessage::is_feedback))
        .count();

    QuizVm {
        phase: run.phase,
        title: mode_info(snapshot.mode).title,
        score: run.score,
        question_label: question_label(run.current_index, total),
        progress_percent: progress_percent(run.current_index, total),
        countdown_label,
        countdown_urgent: run.timed_active && run.time_left_secs.is_some_and(|left| left <= URGENT_SECS),
        mood_label: snapshot.mood.and_then(|mood| {
            MOODS
                .iter()
                .find(|info| info.mood == mood)
                .map(|info| info.label)
        }),
        messages: snapshot.transcript.iter().map(MessageVm::from).collect(),
        pending_answer: snapshot.pending_answer.clone(),
        can_hint: !options.is_empty() && !run.show_hint,
        options,
        answered_questions,
    }
}

/// `current_index / total` as a whole percentage.
#[must_use]
pub fn progress_percent(current_index: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = current_index.min(total) * 100 / total;
    u32::try_from(percent).unwrap_or(100)
}

/// One-based position label, e.g. `3/10`.
#[must_use]
pub fn question_label(current_index: usize, total: usize) -> String {
    if total == 0 {
        return "0/0".to_string();
    }
    format!("{}/{total}", (current_index + 1).min(total))
}
