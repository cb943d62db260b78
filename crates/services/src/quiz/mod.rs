//! Quiz session state machine.

mod controller;
mod state;

pub use controller::QuizSessionController;
pub use state::{AnswerOutcome, QuizSnapshot, QuizTimings, SessionPhase, SessionRunState};
