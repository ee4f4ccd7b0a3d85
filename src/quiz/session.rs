use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::leaderboard::{Leaderboard, Player};
use crate::quiz::catalogue::Catalogue;
use crate::quiz::shuffle::shuffle_with_limit;
use crate::quiz::{percentage, AnswerOutcome, QuestionView, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizResult {
    /// The user left early. The score is not recorded.
    Aborted { score: u32 },
    Completed {
        score: u32,
        total: u32,
        percentage: u32,
        /// Rank on the leaderboard, present only when this attempt is the user's new best.
        new_rank: Option<usize>,
    },
}

/// What the user sees after the verdict on an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    Question(QuestionView),
    Result(QuizResult),
}

/// Owns every in-progress quiz, one per user.
pub struct SessionManager {
    catalogue: Catalogue,
    question_limit: usize,
    sessions: Mutex<HashMap<u64, Session>>,
    leaderboard: Arc<dyn Leaderboard>,
}

impl SessionManager {
    pub fn new(catalogue: Catalogue, leaderboard: Arc<dyn Leaderboard>) -> Self {
        if catalogue.is_empty() {
            warn!("Question catalogue is empty, no quiz can be started");
        }
        Self {
            catalogue,
            question_limit: 0,
            sessions: Mutex::new(HashMap::new()),
            leaderboard,
        }
    }

    /// Caps every quiz at `limit` questions; 0 asks the whole catalogue.
    pub fn with_question_limit(mut self, limit: usize) -> Self {
        self.question_limit = limit;
        self
    }

    pub fn leaderboard(&self) -> &Arc<dyn Leaderboard> {
        &self.leaderboard
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Starts a fresh quiz for the user, dropping any quiz they had running.
    pub fn start_session(&self, user_id: u64) -> Option<QuestionView> {
        let questions = shuffle_with_limit(&self.catalogue.questions, self.question_limit);
        if questions.is_empty() {
            return None;
        }

        let session = Session::new(user_id, questions);
        let first = session.current();

        let mut sessions = self.sessions.lock();
        if sessions.insert(user_id, session).is_some() {
            debug!("User {} restarted the quiz, previous attempt discarded", user_id);
        }
        info!(
            "User {} started a quiz ({} active)",
            user_id,
            sessions.len()
        );
        first
    }

    pub fn current_question(&self, user_id: u64) -> Option<QuestionView> {
        self.sessions.lock().get(&user_id)?.current()
    }

    pub fn submit_answer(
        &self,
        user_id: u64,
        question_index: usize,
        option_index: usize,
    ) -> Option<AnswerOutcome> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(&user_id)?;

        let outcome = session.answer(question_index, option_index);
        match &outcome {
            Some(outcome) => debug!(
                "User {} answered question {}: correct={}, score={}",
                session.user_id, question_index, outcome.correct, session.score
            ),
            None => debug!(
                "Ignoring answer {} to question {} from user {}, current question is {}",
                option_index, question_index, session.user_id, session.current_index
            ),
        }
        outcome
    }

    /// Records an answer and, after the last question, finishes the quiz right away
    /// so the result is submitted before anything is sent back to the user.
    pub async fn answer(
        &self,
        player: &Player,
        question_index: usize,
        option_index: usize,
    ) -> Option<(AnswerOutcome, Option<Followup>)> {
        let outcome = self.submit_answer(player.id, question_index, option_index)?;

        let followup = if outcome.finished {
            self.finish_session(player, false)
                .await
                .map(Followup::Result)
        } else {
            self.current_question(player.id).map(Followup::Question)
        };
        Some((outcome, followup))
    }

    /// Ends the user's quiz. A completed quiz is submitted to the leaderboard.
    pub async fn finish_session(&self, player: &Player, aborted: bool) -> Option<QuizResult> {
        // The lock is released before any leaderboard round trip.
        let session = self.sessions.lock().remove(&player.id)?;

        if aborted {
            info!("User {} left the quiz with score {}", player.id, session.score);
            return Some(QuizResult::Aborted {
                score: session.score,
            });
        }

        let score = session.score;
        let total = session.total();
        let outcome = self.leaderboard.add_entry(player, score, total).await;
        info!(
            "User {} finished the quiz with {}/{}: {:?}",
            player.id, score, total, outcome
        );

        let new_rank = if outcome.is_new_best() {
            self.leaderboard
                .user_position(player.id)
                .await
                .map(|position| position.rank)
        } else {
            None
        };

        Some(QuizResult::Completed {
            score,
            total,
            percentage: percentage(score, total),
            new_rank,
        })
    }
}
