use std::env;

const DEFAULT_QUESTIONS_FILE: &str = "questions.txt";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{name} must be a number, got {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub telegram_token: String,
    pub gist_id: Option<String>,
    pub github_token: Option<String>,
    pub questions_file: String,
    /// Questions per quiz, 0 for the whole catalogue.
    pub question_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let telegram_token =
            var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let question_limit = match var("QUIZ_QUESTION_LIMIT") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| ConfigError::Invalid {
                name: "QUIZ_QUESTION_LIMIT",
                value,
            })?,
            None => 0,
        };

        Ok(Self {
            telegram_token,
            gist_id: var("GITHUB_GIST_ID"),
            github_token: var("GITHUB_TOKEN"),
            questions_file: var("QUESTIONS_FILE")
                .unwrap_or_else(|| DEFAULT_QUESTIONS_FILE.to_string()),
            question_limit,
        })
    }
}
