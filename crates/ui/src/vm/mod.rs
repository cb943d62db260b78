mod dashboard_vm;
mod leaderboard_vm;
mod quiz_vm;
mod time_fmt;
mod toast_vm;

pub use dashboard_vm::{
    DashboardVm, GenreRowVm, HistoryPointVm, RecentSessionVm, map_dashboard,
};
pub use leaderboard_vm::{LeaderboardRowVm, map_leaderboard};
pub use quiz_vm::{
    BotMessageVm, FeedbackBadge, MessageVm, QuizVm, map_quiz_snapshot, progress_percent,
    question_label,
};
pub use time_fmt::{format_countdown, format_date, format_playhead};
pub use toast_vm::{Toast, ToastExpiry, ToastQueue};
