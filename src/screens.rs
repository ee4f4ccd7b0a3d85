//! Everything the bot says, as plain data. The transport turns a [`Screen`]
//! into a Telegram message with an inline keyboard.

use crate::actions::Action;
use crate::leaderboard::LeaderboardEntry;
use crate::quiz::session::QuizResult;
use crate::quiz::{AnswerOutcome, QuestionView};

pub const LEADERBOARD_SIZE: usize = 10;

const SOURCE_URL: &str = "https://github.com/PoluyanbIch/GoTgBot";
const AUTHOR_URL: &str = "https://github.com/PoluyanbIch";
const CONTACT_URL: &str = "https://t.me/PoluyanbIch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Plain,
    Markdown,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    Action { label: String, action: Action },
    Link { label: String, url: String },
}

impl Button {
    fn action(label: &str, action: Action) -> Self {
        Button::Action {
            label: label.to_string(),
            action,
        }
    }

    fn link(label: &str, url: &str) -> Self {
        Button::Link {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub markup: Markup,
    pub keyboard: Vec<Vec<Button>>,
}

impl Screen {
    fn new(text: impl Into<String>, markup: Markup) -> Self {
        Self {
            text: text.into(),
            markup,
            keyboard: Vec::new(),
        }
    }

    fn row(mut self, row: Vec<Button>) -> Self {
        self.keyboard.push(row);
        self
    }
}

pub fn main_menu() -> Screen {
    Screen::new("📋 *Главное меню*", Markup::Markdown)
        .row(vec![
            Button::action("🐖Харам тест🐖", Action::StartQuiz),
            Button::action("🏆 Лидерборд", Action::Leaderboard),
        ])
        .row(vec![Button::action("ℹ️Обо мнеℹ️", Action::Info)])
}

pub fn unknown_command() -> Screen {
    Screen::new("Неизвестная команда", Markup::Plain)
}

pub fn question(view: &QuestionView) -> Screen {
    let text = format!(
        "❓ <b>Вопрос {}/{}</b>\n\n{}",
        view.index + 1,
        view.total,
        escape_html(&view.question.prompt)
    );

    let mut screen = Screen::new(text, Markup::Html);
    for (option, label) in view.question.options.iter().enumerate() {
        screen = screen.row(vec![Button::action(
            label,
            Action::Answer {
                question: view.index,
                option,
            },
        )]);
    }
    screen.row(vec![Button::action("🚪Выйти из викторины🚪", Action::ExitQuiz)])
}

pub fn answer(outcome: &AnswerOutcome) -> Screen {
    let text = if outcome.correct {
        "✅ *Правильно!* 🎉".to_string()
    } else {
        format!(
            "❌ *Неправильно!*\nПравильный ответ: {}",
            outcome.correct_option
        )
    };
    Screen::new(text, Markup::Markdown)
}

pub fn result(result: &QuizResult) -> Screen {
    let text = match result {
        QuizResult::Aborted { .. } => "🚪 Викторина прервана.\nВаш результат не сохранен.".to_string(),
        QuizResult::Completed {
            score,
            total,
            percentage,
            new_rank,
        } => {
            let mut text = format!(
                "🏁 *Викторина завершена!*\n\n📊 Результат: {}/{}\n📈 Процент правильных: {}%\n\n",
                score, total, percentage
            );
            if let Some(rank) = new_rank {
                text += &format!(
                    "🎉 *Новый рекорд!* Вы на {} месте в лидерборде!\n\n",
                    rank
                );
            }
            text
        }
    };

    Screen::new(text, Markup::Markdown).row(vec![
        Button::action("🎯 Начать заново", Action::StartQuiz),
        Button::action("🔙 В меню", Action::Menu),
    ])
}

pub fn leaderboard(top: &[LeaderboardEntry]) -> Screen {
    if top.is_empty() {
        return Screen::new(
            "🏆 <b>Лидерборд</b>\n\nПока нет результатов. Будьте первым! 🎯",
            Markup::Html,
        )
        .row(leaderboard_buttons());
    }

    let mut text = format!("🏆 <b>Топ {} игроков</b>\n\n", LEADERBOARD_SIZE);
    for (i, entry) in top.iter().enumerate() {
        let medal = match i {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "🔸",
        };
        text += &format!(
            "{} {}. {} - {}% ({}/{})\n   📅 {}\n\n",
            medal,
            i + 1,
            escape_html(&entry.shown_name()),
            entry.percentage,
            entry.score,
            entry.total,
            entry.date
        );
    }

    Screen::new(text, Markup::Html).row(leaderboard_buttons())
}

fn leaderboard_buttons() -> Vec<Button> {
    vec![
        Button::action("🎯 Начать викторину", Action::StartQuiz),
        Button::action("📋 Главное меню", Action::Menu),
    ]
}

pub fn info() -> Screen {
    let text = format!(
        "Мой исходный код:\n{}\nМожно поставить звездочку⭐ на него и подписаться:\n{}\nотзывы, предложения, предпочтения -> {}",
        SOURCE_URL, AUTHOR_URL, CONTACT_URL
    );

    Screen::new(text, Markup::Plain)
        .row(vec![Button::link("📂 GitHub репозиторий", SOURCE_URL)])
        .row(vec![
            Button::link("👤 Автор", AUTHOR_URL),
            Button::link("💬 Написать", CONTACT_URL),
        ])
        .row(vec![Button::action("🔙 Назад", Action::Menu)])
}

// Profile names and catalogue prompts are arbitrary text.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
