pub mod catalogue;
pub mod session;
pub mod shuffle;

/// Labels of the two fixed options every question offers.
pub const OPTIONS: [&str; 2] = ["👍Халяль", "🐖Харам"];

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: [String; 2],
    pub correct_index: usize,
}

impl Question {
    pub fn new(id: u32, prompt: impl Into<String>, correct_index: usize) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            options: OPTIONS.map(String::from),
            correct_index,
        }
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}

/// One user's quiz attempt. The question order is fixed at creation.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: u64,
    pub current_index: usize,
    pub score: u32,
    pub questions: Vec<Question>,
}

impl Session {
    pub fn new(user_id: u64, questions: Vec<Question>) -> Self {
        Self {
            user_id,
            current_index: 0,
            score: 0,
            questions,
        }
    }

    pub fn total(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn current(&self) -> Option<QuestionView> {
        let question = self.questions.get(self.current_index)?;
        Some(QuestionView {
            index: self.current_index,
            total: self.questions.len(),
            question: question.clone(),
        })
    }

    /// Records an answer to the current question and moves on.
    ///
    /// Returns `None` without touching the session when `question_index` is not
    /// the current question or `option_index` is not one of the options.
    pub fn answer(&mut self, question_index: usize, option_index: usize) -> Option<AnswerOutcome> {
        if question_index != self.current_index {
            return None;
        }
        let question = self.questions.get(question_index)?;
        if option_index >= question.options.len() {
            return None;
        }

        let correct = question.is_correct(option_index);
        let correct_option = question.correct_option().to_string();
        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        Some(AnswerOutcome {
            correct,
            correct_option,
            finished: self.is_finished(),
        })
    }
}

/// A question as shown to the user: its position in the session plus the question itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub question: Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_option: String,
    pub finished: bool,
}

/// Integer percentage, rounded down. Zero when there is nothing to score against.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let percentage = u64::from(score) * 100 / u64::from(total);
    u32::try_from(percentage).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            7,
            vec![
                Question::new(1, "Свинина", 1),
                Question::new(2, "Курица", 0),
                Question::new(3, "Говядина", 0),
            ],
        )
    }

    #[test]
    fn question_uses_fixed_options() {
        let question = Question::new(1, "Свинина", 1);
        assert_eq!(question.options, ["👍Халяль".to_string(), "🐖Харам".to_string()]);
        assert_eq!(question.correct_option(), "🐖Харам");
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
    }

    #[test]
    fn index_tracks_answers_and_score_never_exceeds_it() {
        let mut session = session();
        let picks = [1, 1, 0];
        for (k, pick) in picks.iter().enumerate() {
            session.answer(k, *pick).unwrap();
            assert_eq!(session.current_index, k + 1);
            assert!(session.score as usize <= session.current_index);
        }
        assert_eq!(session.score, 2);
        assert!(session.is_finished());
        assert!(session.current().is_none());
    }

    #[test]
    fn wrong_answer_still_advances() {
        let mut session = session();
        let outcome = session.answer(0, 0).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_option, "🐖Харам");
        assert!(!outcome.finished);
        assert_eq!(session.current_index, 1);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn stale_or_out_of_range_answers_are_ignored() {
        let mut session = session();
        assert!(session.answer(1, 0).is_none());
        assert!(session.answer(0, 2).is_none());
        assert!(session.answer(usize::MAX, 0).is_none());
        assert_eq!(session.current_index, 0);

        session.answer(0, 1).unwrap();
        // replaying the same button press does nothing
        assert!(session.answer(0, 1).is_none());
        assert_eq!(session.current_index, 1);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn answering_past_the_end_is_ignored() {
        let mut session = session();
        for k in 0..3 {
            session.answer(k, 0).unwrap();
        }
        assert!(session.answer(3, 0).is_none());
        assert_eq!(session.current_index, 3);
    }

    #[test]
    fn percentage_rounds_down() {
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(7, 10), 70);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn percentage_of_huge_scores_does_not_overflow() {
        assert_eq!(percentage(u32::MAX, u32::MAX), 100);
        assert_eq!(percentage(u32::MAX / 2, u32::MAX), 49);
        assert_eq!(percentage(u32::MAX, 1), u32::MAX);
    }
}
