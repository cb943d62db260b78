//! JSON shapes of the backend responses and their mapping into domain types.

use serde::Deserialize;

use quiz_core::model::{
    Difficulty, LeaderboardEntry, Question, QuizMode, QuizSession, SessionId, Track, TrackInfo,
    UserProfile,
};
use quiz_core::ModelError;

use super::AnswerResult;

#[derive(Debug, Deserialize)]
pub(crate) struct StartQuizResponse {
    session_id: String,
    #[serde(default)]
    questions: Vec<QuestionPayload>,
    #[serde(default)]
    total_questions: usize,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    mode: Option<QuizMode>,
    #[serde(default)]
    time_limit: Option<u32>,
    #[serde(default)]
    points_per_correct: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    question: String,
    #[serde(default)]
    track: Option<Track>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    mode: Option<QuizMode>,
}

impl From<QuestionPayload> for Question {
    fn from(payload: QuestionPayload) -> Self {
        Self {
            text: payload.question,
            track: payload.track,
            options: payload.options,
            hint: non_blank(payload.hint),
            mode: payload.mode,
        }
    }
}

impl StartQuizResponse {
    /// `requested` is used when the server does not echo the mode back.
    pub(crate) fn into_session(self, requested: QuizMode) -> Result<QuizSession, ModelError> {
        let id = SessionId::new(self.session_id)?;
        let questions = self.questions.into_iter().map(Question::from).collect();
        Ok(
            QuizSession::new(id, self.mode.unwrap_or(requested), questions, self.total_questions)?
                .with_difficulty(self.difficulty.unwrap_or_default())
                .with_time_limit(self.time_limit)
                .with_points_per_correct(self.points_per_correct),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerResponse {
    is_correct: bool,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    points: u32,
    total_score: u32,
    #[serde(default)]
    bot_response: String,
    #[serde(default)]
    fun_fact: Option<String>,
    #[serde(default)]
    is_last_question: bool,
    #[serde(default)]
    track_info: Option<TrackInfo>,
}

impl From<AnswerResponse> for AnswerResult {
    fn from(response: AnswerResponse) -> Self {
        Self {
            is_correct: response.is_correct,
            correct_answer: response.correct_answer,
            points: response.points,
            total_score: response.total_score,
            bot_response: response.bot_response,
            fun_fact: non_blank(response.fun_fact),
            is_last_question: response.is_last_question,
            track_info: response.track_info,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaderboardResponse {
    #[serde(default)]
    pub(crate) leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginUrlResponse {
    pub(crate) auth_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallbackResponse {
    pub(crate) token: String,
    pub(crate) user: UserProfile,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_response_maps_into_session() {
        let json = r#"{
            "session_id": "abc",
            "questions": [
                {
                    "question": "What genre is this?",
                    "track": {"name": "Song", "album": "LP", "album_art": null, "preview_url": "https://p/1.mp3", "spotify_url": ""},
                    "options": ["pop", "rock", "jazz", "metal"],
                    "hint": "",
                    "mode": "genre"
                }
            ],
            "total_questions": 1,
            "difficulty": "medium",
            "mode": "genre",
            "time_limit": null,
            "points_per_correct": 20
        }"#;
        let response: StartQuizResponse = serde_json::from_str(json).unwrap();
        let session = response.into_session(QuizMode::Artist).unwrap();

        assert_eq!(session.id().as_str(), "abc");
        assert_eq!(session.mode(), QuizMode::Genre);
        assert_eq!(session.points_per_correct(), Some(20));
        let question = session.question(0).unwrap();
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.hint, None);
        assert!(question.track.as_ref().unwrap().has_preview());
    }

    #[test]
    fn start_response_without_questions_is_invalid() {
        let response: StartQuizResponse =
            serde_json::from_str(r#"{"session_id": "abc", "questions": []}"#).unwrap();
        assert_eq!(
            response.into_session(QuizMode::Timed).unwrap_err(),
            ModelError::EmptySession
        );
    }

    #[test]
    fn answer_response_drops_blank_fun_fact() {
        let json = r#"{
            "is_correct": false,
            "correct_answer": "jazz",
            "points": 0,
            "total_score": 40,
            "bot_response": "Close!",
            "fun_fact": "",
            "is_last_question": false,
            "track_info": {"name": "Song", "artist": "Band", "album": "LP", "album_art": null, "genre": "jazz", "spotify_url": ""},
            "question_index": 1
        }"#;
        let response: AnswerResponse = serde_json::from_str(json).unwrap();
        let result = AnswerResult::from(response);
        assert_eq!(result.fun_fact, None);
        assert_eq!(result.total_score, 40);
        assert_eq!(result.track_info.unwrap().artist, "Band");
    }
}
