use quiz_core::model::LeaderboardEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub rank: u32,
    pub name: String,
    pub avatar: Option<String>,
    pub total_score: u64,
    pub total_games: u32,
    pub accuracy_label: String,
    pub best_streak: u32,
    pub is_podium: bool,
}

impl From<&LeaderboardEntry> for LeaderboardRowVm {
    fn from(entry: &LeaderboardEntry) -> Self {
        let name = entry
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| "Anonymous".to_string(), str::to_string);
        Self {
            rank: entry.rank,
            name,
            avatar: entry.avatar.clone().filter(|url| !url.trim().is_empty()),
            total_score: entry.total_score,
            total_games: entry.total_games,
            accuracy_label: format!("{:.1}%", entry.accuracy),
            best_streak: entry.best_streak,
            is_podium: (1..=3).contains(&entry.rank),
        }
    }
}

/// Rows in rank order.
#[must_use]
pub fn map_leaderboard(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRowVm> {
    let mut rows: Vec<_> = entries.iter().map(LeaderboardRowVm::from).collect();
    rows.sort_by_key(|row| row.rank);
    rows
}
