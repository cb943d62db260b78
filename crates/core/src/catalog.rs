//! Static descriptions of quiz modes and moods shown by the hub and the mood picker.

use crate::model::{Mood, QuizMode};

/// Hub card for a quiz mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub mode: QuizMode,
    pub title: &'static str,
    pub description: &'static str,
    pub badge: &'static str,
}

/// Picker entry for a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodInfo {
    pub mood: Mood,
    pub label: &'static str,
    pub description: &'static str,
}

pub const MODES: [ModeInfo; 4] = [
    ModeInfo {
        mode: QuizMode::Genre,
        title: "Genre Guess",
        description: "Listen to a track preview and identify the genre. Test your ear across pop, rock, jazz, and more.",
        badge: "Popular",
    },
    ModeInfo {
        mode: QuizMode::Artist,
        title: "Artist Guess",
        description: "Can you name the artist behind the track? Use hints if you get stuck.",
        badge: "Challenge",
    },
    ModeInfo {
        mode: QuizMode::Mood,
        title: "Mood Quiz",
        description: "Select your current mood and get matched with tracks that fit your vibe.",
        badge: "Personalized",
    },
    ModeInfo {
        mode: QuizMode::Timed,
        title: "Timed Challenge",
        description: "60 seconds on the clock. Answer as many questions as you can.",
        badge: "Speed",
    },
];

pub const MOODS: [MoodInfo; 5] = [
    MoodInfo {
        mood: Mood::Happy,
        label: "Happy",
        description: "Upbeat, feel-good vibes",
    },
    MoodInfo {
        mood: Mood::Chill,
        label: "Chill",
        description: "Relaxed, laid-back tunes",
    },
    MoodInfo {
        mood: Mood::Energetic,
        label: "Energetic",
        description: "High energy bangers",
    },
    MoodInfo {
        mood: Mood::Sad,
        label: "Sad",
        description: "Emotional, introspective",
    },
    MoodInfo {
        mood: Mood::Focus,
        label: "Focus",
        description: "Concentration & clarity",
    },
];

#[must_use]
pub fn mode_info(mode: QuizMode) -> &'static ModeInfo {
    MODES
        .iter()
        .find(|info| info.mode == mode)
        .unwrap_or(&MODES[0])
}
