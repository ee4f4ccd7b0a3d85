pub mod gist;
pub mod memory;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::quiz::percentage;

pub use gist::GistLeaderboard;
pub use memory::MemoryLeaderboard;

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// The user behind a submission, as reported by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u64,
    pub username: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "first_name")]
    pub display_name: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub date: String,
}

impl LeaderboardEntry {
    pub fn new(player: &Player, score: u32, total: u32) -> Self {
        Self {
            user_id: player.id,
            username: player.username.clone(),
            display_name: player.display_name.clone(),
            score,
            total,
            percentage: percentage(score, total),
            date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }

    /// `@handle` when the user has one, otherwise their display name.
    pub fn shown_name(&self) -> String {
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => self.display_name.clone(),
        }
    }

    /// Orders by percentage, then score.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.percentage
            .cmp(&other.percentage)
            .then(self.score.cmp(&other.score))
    }

    pub fn is_better_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First result for the user, or better than the stored one.
    Improved,
    /// Stored result is at least as good; nothing changed.
    NotImproved,
    /// The board could not be loaded or saved.
    Failed,
}

impl SubmitOutcome {
    pub fn is_new_best(self) -> bool {
        self == SubmitOutcome::Improved
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// 1-based.
    pub rank: usize,
    pub entry: LeaderboardEntry,
}

#[async_trait]
pub trait Leaderboard: Send + Sync {
    async fn add_entry(&self, player: &Player, score: u32, total: u32) -> SubmitOutcome;

    async fn top(&self, limit: usize) -> Vec<LeaderboardEntry>;

    async fn user_position(&self, user_id: u64) -> Option<Position>;
}

/// Gist storage when both the id and token are configured, memory otherwise.
pub fn from_config(config: &Config) -> Arc<dyn Leaderboard> {
    match (&config.gist_id, &config.github_token) {
        (Some(gist_id), Some(token)) => {
            info!("Leaderboard is stored in gist {}", gist_id);
            Arc::new(GistLeaderboard::new(gist_id.clone(), token.clone()))
        }
        _ => {
            info!("Leaderboard is kept in memory, results are lost on restart");
            Arc::new(MemoryLeaderboard::new())
        }
    }
}

/// Best-wins merge of `candidate` into `entries`. Returns whether anything changed.
pub fn merge(entries: &mut Vec<LeaderboardEntry>, candidate: LeaderboardEntry) -> bool {
    match entries.iter_mut().find(|e| e.user_id == candidate.user_id) {
        Some(stored) if candidate.is_better_than(stored) => {
            *stored = candidate;
            true
        }
        Some(_) => false,
        None => {
            entries.push(candidate);
            true
        }
    }
}

/// Copy of `entries`, best first.
pub fn rank(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.compare(a));
    sorted
}

pub fn top_of(entries: &[LeaderboardEntry], limit: usize) -> Vec<LeaderboardEntry> {
    let mut sorted = rank(entries);
    sorted.truncate(limit);
    sorted
}

pub fn position_in(entries: &[LeaderboardEntry], user_id: u64) -> Option<Position> {
    rank(entries)
        .into_iter()
        .enumerate()
        .find(|(_, entry)| entry.user_id == user_id)
        .map(|(i, entry)| Position { rank: i + 1, entry })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn player(id: u64) -> Player {
        Player {
            id,
            username: Some(format!("user{}", id)),
            display_name: format!("User {}", id),
        }
    }

    pub fn entry(id: u64, score: u32, total: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(&player(id), score, total)
    }

    fn with(id: u64, percentage: u32, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            percentage,
            score,
            ..entry(id, score, 10)
        }
    }

    #[test]
    fn entry_computes_percentage_and_date() {
        let entry = entry(1, 2, 3);
        assert_eq!(entry.percentage, 66);
        assert_eq!(entry.date.len(), "17.10.2026 12:30".len());
        assert_eq!(&entry.date[2..3], ".");
    }

    #[test]
    fn percentage_beats_score() {
        let mut entries = vec![with(1, 70, 7)];
        assert!(merge(&mut entries, with(1, 80, 4)));
        assert_eq!(entries.len(), 1);
        assert_eq!((entries[0].percentage, entries[0].score), (80, 4));
    }

    #[test]
    fn score_breaks_percentage_ties() {
        let mut entries = vec![with(1, 70, 7)];
        assert!(merge(&mut entries, with(1, 70, 9)));
        assert_eq!(entries[0].score, 9);
    }

    #[test]
    fn equal_or_worse_results_are_kept_out() {
        let stored = with(1, 70, 7);
        let mut entries = vec![stored.clone()];
        assert!(!merge(&mut entries, with(1, 70, 7)));
        assert!(!merge(&mut entries, with(1, 60, 9)));
        assert!(!merge(&mut entries, with(1, 70, 3)));
        assert_eq!(entries, vec![stored]);
    }

    #[test]
    fn new_users_are_appended() {
        let mut entries = vec![with(1, 70, 7)];
        assert!(merge(&mut entries, with(2, 10, 1)));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn ranking_is_descending() {
        let entries = vec![with(1, 50, 5), with(2, 90, 9), with(3, 90, 18), with(4, 10, 1)];
        let ids: Vec<u64> = rank(&entries).iter().map(|e| e.user_id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);

        assert_eq!(top_of(&entries, 2).len(), 2);
        assert_eq!(top_of(&entries, 100).len(), 4);
        assert!(top_of(&entries, 0).is_empty());

        assert_eq!(position_in(&entries, 1).map(|p| p.rank), Some(3));
        assert!(position_in(&entries, 99).is_none());
    }

    #[test]
    fn shown_name_prefers_handle() {
        let mut entry = entry(5, 1, 1);
        assert_eq!(entry.shown_name(), "@user5");
        entry.username = Some(String::new());
        assert_eq!(entry.shown_name(), "User 5");
        entry.username = None;
        assert_eq!(entry.shown_name(), "User 5");
    }

    #[test]
    fn entry_json_uses_document_field_names() {
        let json = serde_json::to_value(entry(1, 7, 10)).unwrap();
        for field in ["user_id", "username", "first_name", "score", "total", "percentage", "date"] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
    }
}
