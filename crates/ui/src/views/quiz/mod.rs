mod audio_player;
mod mood_picker;
mod transcript;
mod view;

pub use audio_player::AudioPlayer;
pub use mood_picker::MoodPicker;
pub use transcript::Transcript;
pub use view::QuizView;
