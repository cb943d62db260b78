use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::model::{SessionId, Track};

//
// ─── MODE ─────────────────────────────────────────────────────────────────────
//

/// Quiz variants offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Genre,
    Artist,
    Mood,
    Timed,
}

impl QuizMode {
    pub const ALL: [QuizMode; 4] = [Self::Genre, Self::Artist, Self::Mood, Self::Timed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Genre => "genre",
            QuizMode::Artist => "artist",
            QuizMode::Mood => "mood",
            QuizMode::Timed => "timed",
        }
    }

    /// The mood variant asks for a mood before any session is started.
    #[must_use]
    pub fn needs_mood(self) -> bool {
        matches!(self, QuizMode::Mood)
    }

    #[must_use]
    pub fn is_timed(self) -> bool {
        matches!(self, QuizMode::Timed)
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownMode(s.to_string()))
    }
}

//
// ─── MOOD ─────────────────────────────────────────────────────────────────────
//

/// Moods offered by the mood quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Chill,
    Energetic,
    Sad,
    Focus,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Self::Happy,
        Self::Chill,
        Self::Energetic,
        Self::Sad,
        Self::Focus,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Chill => "chill",
            Mood::Energetic => "energetic",
            Mood::Sad => "sad",
            Mood::Focus => "focus",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownMood(s.to_string()))
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty tier requested when starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ModelError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Correct answers stay on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub track: Option<Track>,
    pub options: Vec<String>,
    pub hint: Option<String>,
    pub mode: Option<QuizMode>,
}

impl Question {
    #[must_use]
    pub fn new(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            track: None,
            options,
            hint: None,
            mode: None,
        }
    }

    #[must_use]
    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// A quiz session as created by the backend. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    id: SessionId,
    mode: QuizMode,
    questions: Vec<Question>,
    total_questions: usize,
    difficulty: Difficulty,
    time_limit_secs: Option<u32>,
    points_per_correct: Option<u32>,
}

impl QuizSession {
    /// Build a session from its question list.
    ///
    /// `total_questions` is the count reported by the server; it falls back to
    /// the list length when the server reports zero.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptySession` if there are no questions.
    pub fn new(
        id: SessionId,
        mode: QuizMode,
        questions: Vec<Question>,
        total_questions: usize,
    ) -> Result<Self, ModelError> {
        if questions.is_empty() {
            return Err(ModelError::EmptySession);
        }
        let total_questions = if total_questions == 0 {
            questions.len()
        } else {
            total_questions
        };
        Ok(Self {
            id,
            mode,
            questions,
            total_questions,
            difficulty: Difficulty::default(),
            time_limit_secs: None,
            points_per_correct: None,
        })
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, secs: Option<u32>) -> Self {
        self.time_limit_secs = secs;
        self
    }

    #[must_use]
    pub fn with_points_per_correct(mut self, points: Option<u32>) -> Self {
        self.points_per_correct = points;
        self
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    #[must_use]
    pub fn points_per_correct(&self) -> Option<u32> {
        self.points_per_correct
    }
}
