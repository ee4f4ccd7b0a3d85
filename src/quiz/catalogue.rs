use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{info, warn};

use crate::quiz::Question;

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read questions: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected the question to start with a double quote")]
    MissingOpeningQuote { line: usize },
    #[error("line {line}: no closing quote")]
    MissingClosingQuote { line: usize },
    #[error("line {line}: no correctness indicator found")]
    MissingIndicator { line: usize },
    #[error("line {line}: correctness must be 0 or 1, got {found:?}")]
    InvalidIndicator { line: usize, found: char },
    #[error("line {line}: question cannot be empty")]
    EmptyQuestion { line: usize },
    #[error("no valid questions found")]
    Empty,
}

/// Ordered catalogue of questions, shared read-only by every session.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub questions: Vec<Question>,
}

impl Catalogue {
    /// Parses the whole input. A single malformed line fails the load.
    pub fn parse(reader: impl Read) -> Result<Self, CatalogueError> {
        let reader = BufReader::new(reader);
        let mut questions = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (prompt, correct_index) = parse_line(line, number + 1)?;
            questions.push(Question::new(questions.len() as u32 + 1, prompt, correct_index));
        }

        if questions.is_empty() {
            return Err(CatalogueError::Empty);
        }

        Ok(Self { questions })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        Self::parse(File::open(path)?)
    }

    /// Loads the file at `path`, or the built-in questions if it can't be used.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(catalogue) => {
                info!("Loaded {} questions from {}", catalogue.len(), path.display());
                catalogue
            }
            Err(err) => {
                warn!(
                    "Failed to load questions from {}: {}. Using default questions",
                    path.display(),
                    err
                );
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        Self {
            questions: vec![Question::new(1, "Свинина", 1), Question::new(2, "Курица", 0)],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// Format: "question text" <0|1>
// The text ends at the first quote after the opening one; only the first
// character after it (ignoring whitespace) is read as the indicator.
fn parse_line(line: &str, number: usize) -> Result<(String, usize), CatalogueError> {
    let rest = line
        .strip_prefix('"')
        .ok_or(CatalogueError::MissingOpeningQuote { line: number })?;
    let quote_end = rest
        .find('"')
        .ok_or(CatalogueError::MissingClosingQuote { line: number })?;

    let prompt = &rest[..quote_end];
    let remaining = rest[quote_end + 1..].trim_start();

    let indicator = remaining
        .chars()
        .next()
        .ok_or(CatalogueError::MissingIndicator { line: number })?;
    let correct_index = match indicator {
        '0' => 0,
        '1' => 1,
        found => return Err(CatalogueError::InvalidIndicator { line: number, found }),
    };

    if prompt.is_empty() {
        return Err(CatalogueError::EmptyQuestion { line: number });
    }

    Ok((prompt.to_string(), correct_index))
}
