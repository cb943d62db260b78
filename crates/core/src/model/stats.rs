use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Difficulty, QuizMode};

/// Correct/total counters for one genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenreAccuracy {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub total: u32,
}

impl GenreAccuracy {
    /// Accuracy as a percentage, or `None` before any question in the genre.
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(f64::from(self.correct) / f64::from(self.total) * 100.0)
    }
}

/// One point of the score history chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryPoint {
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub score: u32,
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: Option<QuizMode>,
    #[serde(default)]
    pub total_questions: u32,
}

/// A completed session as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSession {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_mode")]
    pub mode: Option<QuizMode>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Aggregate statistics for the signed-in player.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub total_correct: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub best_genre: Option<String>,
    #[serde(default)]
    pub worst_genre: Option<String>,
    #[serde(default)]
    pub genre_accuracy: BTreeMap<String, GenreAccuracy>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default, rename = "difficulty_level")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub score_history: Vec<ScoreHistoryPoint>,
    #[serde(default)]
    pub recent_sessions: Vec<RecentSession>,
}

/// A ranked player on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub best_streak: u32,
}

/// The signed-in player's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Display name, falling back to the account id.
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

// The backend stores timestamps as free-form strings and may send "" for
// missing values; anything unparseable becomes `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|value| value.with_timezone(&Utc)))
}

fn lenient_mode<'de, D>(deserializer: D) -> Result<Option<QuizMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|value| value.parse().ok()))
}
