mod dashboard;
mod hub;
mod landing;
mod leaderboard;
pub mod quiz;
mod state;

pub use dashboard::DashboardView;
pub use hub::HubView;
pub use landing::LandingView;
pub use leaderboard::LeaderboardView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
