use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "главное меню")]
    Start,
    #[command(description = "начать викторину")]
    Quiz,
    #[command(description = "обо мне")]
    Info,
    #[command(description = "лучшие игроки")]
    Leaderboard,
}

/// What a pressed inline button asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartQuiz,
    Answer { question: usize, option: usize },
    ExitQuiz,
    Menu,
    Info,
    Leaderboard,
}

const START_QUIZ: &str = "start_quiz";
const EXIT_QUIZ: &str = "exit_quiz";
const MENU: &str = "back_to_menu";
const INFO: &str = "info";
const LEADERBOARD: &str = "leaderboard";
const ANSWER_PREFIX: &str = "quiz_";

impl Action {
    /// Decodes callback data. Anything unrecognised, including malformed answers, is `None`.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            START_QUIZ => Some(Action::StartQuiz),
            EXIT_QUIZ => Some(Action::ExitQuiz),
            MENU => Some(Action::Menu),
            INFO => Some(Action::Info),
            LEADERBOARD => Some(Action::Leaderboard),
            _ => {
                let (question, option) = data.strip_prefix(ANSWER_PREFIX)?.split_once('_')?;
                Some(Action::Answer {
                    question: question.parse().ok()?,
                    option: option.parse().ok()?,
                })
            }
        }
    }

    pub fn data(&self) -> String {
        match self {
            Action::StartQuiz => START_QUIZ.to_string(),
            Action::Answer { question, option } => {
                format!("{}{}_{}", ANSWER_PREFIX, question, option)
            }
            Action::ExitQuiz => EXIT_QUIZ.to_string(),
            Action::Menu => MENU.to_string(),
            Action::Info => INFO.to_string(),
            Action::Leaderboard => LEADERBOARD.to_string(),
        }
    }
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Action::Menu,
            Command::Quiz => Action::StartQuiz,
            Command::Info => Action::Info,
            Command::Leaderboard => Action::Leaderboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_callbacks() {
        assert_eq!(Action::parse("start_quiz"), Some(Action::StartQuiz));
        assert_eq!(Action::parse("exit_quiz"), Some(Action::ExitQuiz));
        assert_eq!(Action::parse("back_to_menu"), Some(Action::Menu));
        assert_eq!(Action::parse("info"), Some(Action::Info));
        assert_eq!(Action::parse("leaderboard"), Some(Action::Leaderboard));
    }

    #[test]
    fn parses_answers() {
        assert_eq!(
            Action::parse("quiz_12_1"),
            Some(Action::Answer { question: 12, option: 1 })
        );
        let answer = Action::Answer { question: 3, option: 0 };
        assert_eq!(answer.data(), "quiz_3_0");
        assert_eq!(Action::parse(&answer.data()), Some(answer));
    }

    #[test]
    fn rejects_malformed_callbacks() {
        for data in ["", "quiz", "quiz_", "quiz_1", "quiz_1_", "quiz_a_1", "quiz_1_2_3", "quiz_-1_0", "other"] {
            assert_eq!(Action::parse(data), None, "{:?}", data);
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/start", "bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/quiz", "bot").unwrap(), Command::Quiz);
        assert_eq!(Command::parse("/leaderboard", "bot").unwrap(), Command::Leaderboard);
        assert!(Command::parse("/unknown", "bot").is_err());
        assert!(Command::parse("hello", "bot").is_err());
        assert_eq!(Action::from(Command::Start), Action::Menu);
    }
}
