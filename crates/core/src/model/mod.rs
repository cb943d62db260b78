mod ids;
mod playback;
mod quiz;
mod stats;
mod track;
mod transcript;

pub use ids::SessionId;
pub use playback::{DEFAULT_PREVIEW_SECS, PlaybackState};
pub use quiz::{Difficulty, Mood, Question, QuizMode, QuizSession};
pub use stats::{
    GenreAccuracy, LeaderboardEntry, RecentSession, ScoreHistoryPoint, UserProfile, UserStats,
};
pub use track::{Track, TrackInfo};
pub use transcript::{BotMessage, HINT_FALLBACK, Transcript, TranscriptMessage};
