use async_trait::async_trait;
use parking_lot::RwLock;

use super::{merge, position_in, top_of, Leaderboard, LeaderboardEntry, Player, Position, SubmitOutcome};

/// Process-local board. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl Leaderboard for MemoryLeaderboard {
    async fn add_entry(&self, player: &Player, score: u32, total: u32) -> SubmitOutcome {
        if total == 0 {
            return SubmitOutcome::Failed;
        }
        let candidate = LeaderboardEntry::new(player, score, total);
        if merge(&mut self.entries.write(), candidate) {
            SubmitOutcome::Improved
        } else {
            SubmitOutcome::NotImproved
        }
    }

    async fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        top_of(&self.entries.read(), limit)
    }

    async fn user_position(&self, user_id: u64) -> Option<Position> {
        position_in(&self.entries.read(), user_id)
    }
}
