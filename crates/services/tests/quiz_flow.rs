use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use quiz_core::model::{Mood, Question, QuizMode, QuizSession, SessionId, Track, TranscriptMessage};
use services::{
    AnswerOutcome, AnswerRequest, AnswerResult, AudioOutput, MemoryOutput, Notification, Notifier,
    PlaybackCoordinator, QuizApi, QuizApiError, QuizSessionController, SessionPhase,
    StartQuizRequest, TaskScheduler,
};

#[derive(Default)]
struct ScriptedApi {
    starts: Mutex<VecDeque<Result<QuizSession, QuizApiError>>>,
    answers: Mutex<VecDeque<Result<AnswerResult, QuizApiError>>>,
    start_requests: Mutex<Vec<StartQuizRequest>>,
    answer_requests: Mutex<Vec<AnswerRequest>>,
    answer_latency: Duration,
}

impl ScriptedApi {
    fn with_latency(latency: Duration) -> Self {
        Self {
            answer_latency: latency,
            ..Self::default()
        }
    }

    fn push_start(&self, result: Result<QuizSession, QuizApiError>) {
        self.starts.lock().unwrap().push_back(result);
    }

    fn push_answer(&self, result: Result<AnswerResult, QuizApiError>) {
        self.answers.lock().unwrap().push_back(result);
    }

    fn answer_calls(&self) -> usize {
        self.answer_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl QuizApi for ScriptedApi {
    async fn start_quiz(&self, request: StartQuizRequest) -> Result<QuizSession, QuizApiError> {
        self.start_requests.lock().unwrap().push(request);
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QuizApiError::Unavailable("no session scripted".into())))
    }

    async fn submit_answer(&self, request: AnswerRequest) -> Result<AnswerResult, QuizApiError> {
        self.answer_requests.lock().unwrap().push(request);
        if !self.answer_latency.is_zero() {
            tokio::time::sleep(self.answer_latency).await;
        }
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QuizApiError::Unavailable("no answer scripted".into())))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

struct Harness {
    controller: QuizSessionController,
    api: Arc<ScriptedApi>,
    notifier: Arc<RecordingNotifier>,
    output: Arc<MemoryOutput>,
}

fn harness(mode: QuizMode, api: ScriptedApi) -> Harness {
    let api = Arc::new(api);
    let notifier = Arc::new(RecordingNotifier::default());
    let output = Arc::new(MemoryOutput::new());
    let scheduler = TaskScheduler::current();
    let playback = PlaybackCoordinator::new(output.clone(), scheduler.clone());
    let controller = QuizSessionController::new(
        mode,
        api.clone(),
        playback,
        notifier.clone(),
        scheduler,
    );
    Harness {
        controller,
        api,
        notifier,
        output,
    }
}

fn question(n: usize) -> Question {
    Question::new(
        format!("Which genre is track {n}?"),
        vec!["Rock".into(), "Jazz".into(), "Pop".into(), "Funk".into()],
    )
    .with_track(Track::new(format!("Track {n}")).with_preview(format!("https://p/{n}.mp3")))
    .with_hint(format!("Think about decade {n}"))
}

fn session(mode: QuizMode, count: usize) -> QuizSession {
    let questions = (1..=count).map(question).collect();
    QuizSession::new(SessionId::new("sess-1").unwrap(), mode, questions, count).unwrap()
}

fn graded(is_correct: bool, total_score: u32, is_last_question: bool) -> AnswerResult {
    AnswerResult {
        is_correct,
        correct_answer: "Rock".into(),
        points: if is_correct { 100 } else { 0 },
        total_score,
        bot_response: if is_correct { "Nice!".into() } else { "Not quite.".into() },
        fun_fact: Some("Recorded in one take.".into()),
        is_last_question,
        track_info: None,
    }
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn genre_round_feedback_then_next_question() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    api.push_answer(Ok(graded(true, 100, false)));
    let h = harness(QuizMode::Genre, api);

    h.controller.start_session(None).await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Playing);
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.total_questions, 5);

    let outcome = h.controller.submit_answer("Rock").await.unwrap();
    assert_eq!(
        outcome,
        AnswerOutcome::Graded {
            is_correct: true,
            finished: false
        }
    );
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.transcript.len(), 3);
    assert_eq!(snapshot.run.score, 100);
    assert_eq!(
        snapshot.transcript.messages()[1],
        TranscriptMessage::user("Rock")
    );
    let feedback = snapshot.transcript.messages()[2].as_bot().unwrap();
    assert_eq!(feedback.is_correct, Some(true));
    assert_eq!(feedback.points, Some(100));
    assert!(snapshot.awaiting_options().is_none());

    wait(2400).await;
    assert_eq!(h.controller.snapshot().transcript.len(), 3);

    wait(200).await;
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.transcript.len(), 4);
    assert_eq!(snapshot.run.current_index, 1);
    assert!(!snapshot.run.answered);
    assert_eq!(snapshot.awaiting_options().map(<[String]>::len), Some(4));

    let requests = h.api.answer_requests.lock().unwrap();
    assert_eq!(requests[0].question_index, 0);
    assert_eq!(requests[0].session_id.as_str(), "sess-1");
}

#[tokio::test(start_paused = true)]
async fn score_follows_backend_total() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Artist, 3)));
    api.push_answer(Ok(graded(true, 150, false)));
    api.push_answer(Ok(graded(false, 120, false)));
    let h = harness(QuizMode::Artist, api);
    h.controller.start_session(None).await.unwrap();

    h.controller.submit_answer("Rock").await.unwrap();
    assert_eq!(h.controller.snapshot().run.score, 150);
    wait(2600).await;
    h.controller.submit_answer("Jazz").await.unwrap();
    assert_eq!(h.controller.snapshot().run.score, 120);
}

#[tokio::test(start_paused = true)]
async fn last_answer_completes_and_stops_audio() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 1)));
    api.push_answer(Ok(graded(true, 100, true)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();
    h.controller
        .playback()
        .play(&question(1).track.unwrap())
        .await
        .unwrap();

    let outcome = h.controller.submit_answer("Rock").await.unwrap();
    assert_eq!(
        outcome,
        AnswerOutcome::Graded {
            is_correct: true,
            finished: true
        }
    );
    wait(1900).await;
    assert_eq!(h.controller.snapshot().run.phase, SessionPhase::Playing);

    wait(200).await;
    assert_eq!(h.controller.snapshot().run.phase, SessionPhase::Complete);
    assert!(h.controller.playback().snapshot().current_track.is_none());
    assert_eq!(h.controller.snapshot().run.score, 100);
}

#[tokio::test(start_paused = true)]
async fn rejected_answer_reopens_question() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    api.push_answer(Err(QuizApiError::Unavailable("502".into())));
    api.push_answer(Ok(graded(false, 0, false)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();

    assert!(h.controller.submit_answer("Jazz").await.is_err());

    let snapshot = h.controller.snapshot();
    assert!(!snapshot.run.answered);
    assert!(snapshot.pending_answer.is_none());
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.run.score, 0);
    assert!(snapshot.awaiting_options().is_some());
    assert_eq!(h.notifier.messages(), vec!["Failed to submit answer".to_string()]);

    h.controller.submit_answer("Rock").await.unwrap();
    assert_eq!(h.controller.snapshot().transcript.len(), 3);
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn second_answer_while_grading_is_ignored() {
    let api = ScriptedApi::with_latency(Duration::from_millis(300));
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    api.push_answer(Ok(graded(true, 100, false)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();

    let first = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.submit_answer("Rock").await }
    });
    wait(10).await;
    let snapshot = h.controller.snapshot();
    assert!(snapshot.run.answered);
    assert_eq!(snapshot.pending_answer.as_deref(), Some("Rock"));
    assert_eq!(snapshot.transcript.len(), 1);

    let second = h.controller.submit_answer("Jazz").await.unwrap();
    assert_eq!(second, AnswerOutcome::Ignored);

    first.await.unwrap().unwrap();
    assert_eq!(h.api.answer_calls(), 1);
    assert_eq!(h.controller.snapshot().transcript.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn answer_before_start_is_ignored() {
    let h = harness(QuizMode::Genre, ScriptedApi::default());

    let outcome = h.controller.submit_answer("Rock").await.unwrap();

    assert_eq!(outcome, AnswerOutcome::Ignored);
    assert_eq!(h.api.answer_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn hint_is_appended_once() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();

    assert!(h.controller.request_hint());
    assert!(!h.controller.request_hint());

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.transcript.len(), 2);
    let hint = snapshot.transcript.messages()[1].as_bot().unwrap();
    assert!(hint.is_hint);
    assert_eq!(hint.content, "Hint: Think about decade 1");
    assert!(snapshot.run.show_hint);
    assert!(snapshot.awaiting_options().is_some());
}

#[tokio::test(start_paused = true)]
async fn hint_resets_for_the_next_question() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    api.push_answer(Ok(graded(true, 100, false)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();
    assert!(h.controller.request_hint());
    h.controller.submit_answer("Rock").await.unwrap();

    wait(2600).await;

    assert!(!h.controller.snapshot().run.show_hint);
    assert!(h.controller.request_hint());
}

#[tokio::test(start_paused = true)]
async fn timed_countdown_expiry_completes_and_stops_audio() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Timed, 10)));
    let h = harness(QuizMode::Timed, api);
    h.controller.start_session(None).await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.time_left_secs, Some(60));
    assert!(snapshot.run.timed_active);

    h.controller
        .playback()
        .play(&question(1).track.unwrap())
        .await
        .unwrap();
    wait(30_500).await;
    assert_eq!(h.controller.snapshot().run.time_left_secs, Some(30));

    wait(30_000).await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Complete);
    assert_eq!(snapshot.run.time_left_secs, Some(0));
    assert!(!snapshot.run.timed_active);
    let playback = h.controller.playback().snapshot();
    assert!(playback.current_track.is_none());
    assert!(!playback.is_playing);
    assert!(h.output.is_paused());
}

#[tokio::test(start_paused = true)]
async fn timed_session_outlasting_its_questions_waits_for_the_countdown() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Timed, 1)));
    api.push_answer(Ok(graded(true, 100, false)));
    let h = harness(QuizMode::Timed, api);
    h.controller.start_session(None).await.unwrap();

    h.controller.submit_answer("Rock").await.unwrap();
    wait(2600).await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Playing);
    assert_eq!(snapshot.run.current_index, 1);
    assert_eq!(snapshot.transcript.len(), 3);
    assert_eq!(snapshot.run.time_left_secs, Some(58));
    assert!(snapshot.awaiting_options().is_none());

    let outcome = h.controller.submit_answer("Jazz").await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Ignored);
    assert_eq!(h.api.answer_calls(), 1);

    wait(58_000).await;

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Complete);
    assert_eq!(snapshot.run.score, 100);
}

#[tokio::test(start_paused = true)]
async fn countdown_waits_for_in_flight_answer() {
    let api = ScriptedApi::with_latency(Duration::from_secs(3));
    api.push_start(Ok(session(QuizMode::Timed, 10)));
    api.push_answer(Ok(graded(true, 300, false)));
    let h = harness(QuizMode::Timed, api);
    h.controller.start_session(None).await.unwrap();

    wait(58_500).await;
    let pending = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.submit_answer("Rock").await }
    });

    wait(2_000).await;
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Playing);
    assert!(!snapshot.run.timed_active);

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        AnswerOutcome::Graded {
            is_correct: true,
            finished: true
        }
    );
    assert_eq!(h.controller.snapshot().run.score, 300);
    assert_eq!(h.controller.snapshot().transcript.len(), 3);

    wait(2_100).await;
    assert_eq!(h.controller.snapshot().run.phase, SessionPhase::Complete);
}

#[tokio::test(start_paused = true)]
async fn failed_start_moves_to_error_and_notifies() {
    let api = ScriptedApi::default();
    api.push_start(Err(QuizApiError::Unavailable("down".into())));
    let h = harness(QuizMode::Genre, api);

    assert!(h.controller.start_session(None).await.is_err());

    assert_eq!(h.controller.snapshot().run.phase, SessionPhase::Error);
    assert_eq!(
        h.notifier.messages(),
        vec!["Failed to start quiz. Try again.".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn mood_session_sends_mood_and_falls_back_to_selection() {
    let api = ScriptedApi::default();
    api.push_start(Err(QuizApiError::Unavailable("down".into())));
    api.push_start(Ok(session(QuizMode::Mood, 5)));
    let h = harness(QuizMode::Mood, api);
    assert_eq!(h.controller.snapshot().run.phase, SessionPhase::MoodSelect);

    assert!(h.controller.start_session(Some(Mood::Chill)).await.is_err());
    assert_eq!(h.controller.snapshot().run.phase, SessionPhase::MoodSelect);

    h.controller.start_session(Some(Mood::Focus)).await.unwrap();
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Playing);
    assert_eq!(snapshot.mood, Some(Mood::Focus));

    let requests = h.api.start_requests.lock().unwrap();
    assert_eq!(requests[0].mood, Some(Mood::Chill));
    assert_eq!(requests[1].mood, Some(Mood::Focus));
}

#[tokio::test(start_paused = true)]
async fn leaving_mid_answer_discards_the_response() {
    let api = ScriptedApi::with_latency(Duration::from_millis(500));
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    api.push_answer(Ok(graded(true, 100, false)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();

    let pending = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.submit_answer("Rock").await }
    });
    wait(100).await;
    h.controller.leave();

    assert_eq!(pending.await.unwrap().unwrap(), AnswerOutcome::Ignored);
    wait(5_000).await;
    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Loading);
    assert!(snapshot.transcript.is_empty());
    assert_eq!(snapshot.run.score, 0);
}

#[tokio::test(start_paused = true)]
async fn restart_returns_mood_mode_to_selection() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Mood, 1)));
    api.push_answer(Ok(graded(true, 100, true)));
    let h = harness(QuizMode::Mood, api);
    h.controller.start_session(Some(Mood::Happy)).await.unwrap();
    h.controller.submit_answer("Rock").await.unwrap();
    wait(2_100).await;
    assert!(h.controller.snapshot().is_complete());

    h.controller.restart().await.unwrap();

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::MoodSelect);
    assert!(snapshot.transcript.is_empty());
}

#[tokio::test(start_paused = true)]
async fn restart_starts_a_fresh_session_for_other_modes() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 1)));
    api.push_answer(Ok(graded(true, 100, true)));
    api.push_start(Ok(session(QuizMode::Genre, 2)));
    let h = harness(QuizMode::Genre, api);
    h.controller.start_session(None).await.unwrap();
    h.controller.submit_answer("Rock").await.unwrap();
    wait(2_100).await;

    h.controller.restart().await.unwrap();

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.run.phase, SessionPhase::Playing);
    assert_eq!(snapshot.run.score, 0);
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.total_questions, 2);
}

#[tokio::test(start_paused = true)]
async fn subscribers_follow_the_session() {
    let api = ScriptedApi::default();
    api.push_start(Ok(session(QuizMode::Genre, 5)));
    let h = harness(QuizMode::Genre, api);
    let mut updates = h.controller.subscribe();

    h.controller.start_session(None).await.unwrap();

    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().run.phase, SessionPhase::Playing);
}
