use std::cmp::Ordering;

use quiz_core::catalog::mode_info;
use quiz_core::model::UserStats;

use crate::vm::time_fmt::format_date;

const RECENT_LIMIT: usize = 5;
const MISSING: &str = "N/A";

#[derive(Clone, Debug, PartialEq)]
pub struct GenreRowVm {
    pub genre: String,
    pub correct: u32,
    pub total: u32,
    pub percent: f64,
    pub percent_label: String,
    /// Bar color bucket: `high` (70%+), `mid` (40%+) or `low`.
    pub tier: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentSessionVm {
    pub mode_label: &'static str,
    pub score: u32,
    pub total_questions: u32,
    pub date_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryPointVm {
    pub game_label: String,
    pub score: u32,
    pub date_label: String,
    /// Bar height relative to the best score, `0..=100`.
    pub bar_percent: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub total_score: u64,
    pub total_games: u32,
    pub accuracy_label: String,
    pub correct_label: String,
    pub streak: u32,
    pub best_streak: u32,
    pub best_genre: String,
    pub worst_genre: String,
    pub difficulty: &'static str,
    pub genres: Vec<GenreRowVm>,
    pub recent: Vec<RecentSessionVm>,
    pub history: Vec<HistoryPointVm>,
}

impl DashboardVm {
    #[must_use]
    pub fn has_played(&self) -> bool {
        self.total_games > 0
    }
}

#[must_use]
pub fn map_dashboard(stats: &UserStats) -> DashboardVm {
    DashboardVm {
        total_score: stats.total_score,
        total_games: stats.total_games,
        accuracy_label: format!("{:.1}%", stats.accuracy),
        correct_label: format!("{}/{} correct", stats.total_correct, stats.total_questions),
        streak: stats.streak,
        best_streak: stats.best_streak,
        best_genre: genre_or_missing(stats.best_genre.as_deref()),
        worst_genre: genre_or_missing(stats.worst_genre.as_deref()),
        difficulty: stats.difficulty.as_str(),
        genres: genre_rows(stats),
        recent: stats
            .recent_sessions
            .iter()
            .take(RECENT_LIMIT)
            .map(|session| RecentSessionVm {
                mode_label: session.mode.map_or(MISSING, |mode| mode_info(mode).title),
                score: session.score,
                total_questions: session.total_questions,
                date_label: session
                    .started_at
                    .map_or_else(|| MISSING.to_string(), format_date),
            })
            .collect(),
        history: history_points(stats),
    }
}

fn genre_or_missing(genre: Option<&str>) -> String {
    genre
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map_or_else(|| MISSING.to_string(), capitalize)
}

/// Genres with at least one question, most accurate first.
fn genre_rows(stats: &UserStats) -> Vec<GenreRowVm> {
    let mut rows: Vec<GenreRowVm> = stats
        .genre_accuracy
        .iter()
        .filter_map(|(genre, accuracy)| {
            let percent = accuracy.percent()?;
            Some(GenreRowVm {
                genre: capitalize(genre),
                correct: accuracy.correct,
                total: accuracy.total,
                percent,
                percent_label: format!("{percent:.0}%"),
                tier: if percent >= 70.0 {
                    "high"
                } else if percent >= 40.0 {
                    "mid"
                } else {
                    "low"
                },
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.percent
            .partial_cmp(&a.percent)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.genre.cmp(&b.genre))
    });
    rows
}

fn history_points(stats: &UserStats) -> Vec<HistoryPointVm> {
    let best = stats
        .score_history
        .iter()
        .map(|point| point.score)
        .max()
        .unwrap_or(0);
    stats
        .score_history
        .iter()
        .enumerate()
        .map(|(index, point)| HistoryPointVm {
            game_label: format!("G{}", index + 1),
            score: point.score,
            date_label: point.date.map_or_else(String::new, format_date),
            bar_percent: if best == 0 {
                0
            } else {
                u32::try_from(u64::from(point.score) * 100 / u64::from(best)).unwrap_or(100)
            },
        })
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
