use crate::model::{Question, Track, TrackInfo};

/// Hint text used when a question carries none.
pub const HINT_FALLBACK: &str = "Listen carefully to the instruments and rhythm.";

/// A message spoken by the quiz bot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BotMessage {
    pub content: String,
    pub track: Option<Track>,
    pub options: Option<Vec<String>>,
    pub is_correct: Option<bool>,
    pub correct_answer: Option<String>,
    pub fun_fact: Option<String>,
    pub points: Option<u32>,
    pub is_hint: bool,
    pub track_info: Option<TrackInfo>,
}

impl BotMessage {
    /// A question prompt with its track and answer options.
    #[must_use]
    pub fn question(question: &Question) -> Self {
        Self {
            content: question.text.clone(),
            track: question.track.clone(),
            options: Some(question.options.clone()),
            ..Self::default()
        }
    }

    /// A hint for `question`, falling back to generic advice.
    #[must_use]
    pub fn hint(question: &Question) -> Self {
        let hint = question
            .hint
            .as_deref()
            .filter(|hint| !hint.trim().is_empty())
            .unwrap_or(HINT_FALLBACK);
        Self {
            content: format!("Hint: {hint}"),
            is_hint: true,
            ..Self::default()
        }
    }

    /// Whether this message is a question still waiting on a choice.
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|options| !options.is_empty())
    }

    /// Graded feedback carries a correctness verdict.
    #[must_use]
    pub fn is_feedback(&self) -> bool {
        self.is_correct.is_some()
    }
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptMessage {
    Bot(BotMessage),
    User { content: String },
}

impl TranscriptMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    #[must_use]
    pub fn as_bot(&self) -> Option<&BotMessage> {
        match self {
            TranscriptMessage::Bot(bot) => Some(bot),
            TranscriptMessage::User { .. } => None,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, TranscriptMessage::User { .. })
    }
}

impl From<BotMessage> for TranscriptMessage {
    fn from(bot: BotMessage) -> Self {
        Self::Bot(bot)
    }
}

/// Append-only conversation log of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    messages: Vec<TranscriptMessage>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh transcript opening with `first`.
    #[must_use]
    pub fn starting_with(first: impl Into<TranscriptMessage>) -> Self {
        Self {
            messages: vec![first.into()],
        }
    }

    pub fn push(&mut self, message: impl Into<TranscriptMessage>) {
        self.messages.push(message.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&TranscriptMessage> {
        self.messages.last()
    }

    /// Options of the last entry, if it is a question still awaiting a choice.
    ///
    /// Only the last entry qualifies, and only while `answered` is false.
    /// Hint entries trailing the question are skipped so a shown hint does
    /// not hide the choices.
    #[must_use]
    pub fn awaiting_options(&self, answered: bool) -> Option<&[String]> {
        if answered {
            return None;
        }
        self.messages
            .iter()
            .rev()
            .find(|message| !message.as_bot().is_some_and(|bot| bot.is_hint))
            .and_then(TranscriptMessage::as_bot)
            .filter(|bot| bot.has_options())
            .and_then(|bot| bot.options.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptMessage> {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question::new("Which genre?", vec!["pop".into(), "rock".into()])
    }

    #[test]
    fn hint_falls_back_when_missing_or_blank() {
        let bot = BotMessage::hint(&sample_question());
        assert_eq!(bot.content, format!("Hint: {HINT_FALLBACK}"));
        assert!(bot.is_hint);

        let blank = sample_question().with_hint("   ");
        assert_eq!(BotMessage::hint(&blank).content, format!("Hint: {HINT_FALLBACK}"));

        let hinted = sample_question().with_hint("Guitars");
        assert_eq!(BotMessage::hint(&hinted).content, "Hint: Guitars");
    }

    #[test]
    fn awaiting_options_only_for_last_unanswered_question() {
        let mut transcript = Transcript::starting_with(BotMessage::question(&sample_question()));
        assert_eq!(transcript.awaiting_options(false).map(<[String]>::len), Some(2));
        assert!(transcript.awaiting_options(true).is_none());

        transcript.push(BotMessage::hint(&sample_question()));
        assert_eq!(transcript.awaiting_options(false).map(<[String]>::len), Some(2));

        transcript.push(TranscriptMessage::user("pop"));
        assert!(transcript.awaiting_options(false).is_none());
        assert_eq!(transcript.len(), 3);
    }
}
