mod actions;
mod config;
mod leaderboard;
mod quiz;
mod screens;

use std::{sync::Arc, time::Duration};

use actions::{Action, Command};
use config::Config;
use dotenv::dotenv;
use leaderboard::Player;
use log::{debug, error, info, warn};
use quiz::{
    catalogue::Catalogue,
    session::{Followup, SessionManager},
};
use reqwest::Url;
use screens::{Button, Markup, Screen};
use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, User},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Pause between the verdict on an answer and the next question.
const NEXT_QUESTION_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    info!("Starting quiz bot...");

    let catalogue = Catalogue::load_or_default(&config.questions_file);
    let leaderboard = leaderboard::from_config(&config);
    let quiz = Arc::new(
        SessionManager::new(catalogue, leaderboard).with_question_limit(config.question_limit),
    );

    let bot = Bot::new(config.telegram_token.clone());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(command))
                .branch(dptree::endpoint(unknown_message)),
        )
        .branch(Update::filter_callback_query().endpoint(callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![quiz])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn player_of(user: &User) -> Player {
    Player {
        id: user.id.0,
        username: user.username.clone(),
        display_name: user.first_name.clone(),
    }
}

async fn command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    quiz: Arc<SessionManager>,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    perform(&bot, msg.chat.id, &player_of(user), cmd.into(), &quiz).await
}

async fn unknown_message(bot: Bot, msg: Message) -> HandlerResult {
    send(&bot, msg.chat.id, screens::unknown_command()).await
}

async fn callback(bot: Bot, q: CallbackQuery, quiz: Arc<SessionManager>) -> HandlerResult {
    // Stops the loading spinner on the button; the rest works without it.
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Error answering callback: {}", err);
    }

    let Some(chat_id) = q.message.as_ref().map(|m| m.chat.id) else {
        return Ok(());
    };

    match q.data.as_deref().and_then(Action::parse) {
        Some(action) => perform(&bot, chat_id, &player_of(&q.from), action, &quiz).await,
        None => send(&bot, chat_id, screens::unknown_command()).await,
    }
}

async fn perform(
    bot: &Bot,
    chat_id: ChatId,
    player: &Player,
    action: Action,
    quiz: &SessionManager,
) -> HandlerResult {
    debug!("User {} requested {:?}", player.id, action);

    match action {
        Action::Menu => send(bot, chat_id, screens::main_menu()).await,
        Action::Info => send(bot, chat_id, screens::info()).await,
        Action::Leaderboard => {
            let top = quiz.leaderboard().top(screens::LEADERBOARD_SIZE).await;
            send(bot, chat_id, screens::leaderboard(&top)).await
        }
        Action::StartQuiz => match quiz.start_session(player.id) {
            Some(first) => send(bot, chat_id, screens::question(&first)).await,
            None => {
                warn!("No questions to ask user {}", player.id);
                send(bot, chat_id, screens::main_menu()).await
            }
        },
        Action::Answer { question, option } => {
            let Some((outcome, followup)) = quiz.answer(player, question, option).await else {
                return Ok(());
            };
            // The quiz has already moved on, a lost verdict must not stop the next screen.
            if let Err(err) = send(bot, chat_id, screens::answer(&outcome)).await {
                warn!("Error sending verdict to user {}: {}", player.id, err);
            }
            tokio::time::sleep(NEXT_QUESTION_DELAY).await;

            match followup {
                Some(Followup::Question(next)) => send(bot, chat_id, screens::question(&next)).await,
                Some(Followup::Result(result)) => send(bot, chat_id, screens::result(&result)).await,
                None => Ok(()),
            }
        }
        Action::ExitQuiz => finish(bot, chat_id, player, true, quiz).await,
    }
}

async fn finish(
    bot: &Bot,
    chat_id: ChatId,
    player: &Player,
    aborted: bool,
    quiz: &SessionManager,
) -> HandlerResult {
    match quiz.finish_session(player, aborted).await {
        Some(result) => send(bot, chat_id, screens::result(&result)).await,
        None => Ok(()),
    }
}

async fn send(bot: &Bot, chat_id: ChatId, screen: Screen) -> HandlerResult {
    let mut request = bot.send_message(chat_id, screen.text);
    if let Some(mode) = parse_mode(screen.markup) {
        request = request.parse_mode(mode);
    }
    if !screen.keyboard.is_empty() {
        request = request.reply_markup(keyboard(screen.keyboard));
    }

    request.await?;
    Ok(())
}

// Screens are written in legacy Markdown (`*bold*`), not MarkdownV2.
#[allow(deprecated)]
fn parse_mode(markup: Markup) -> Option<ParseMode> {
    match markup {
        Markup::Markdown => Some(ParseMode::Markdown),
        Markup::Html => Some(ParseMode::Html),
        Markup::Plain => None,
    }
}

fn keyboard(rows: Vec<Vec<Button>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
        row.into_iter()
            .filter_map(|button| match button {
                Button::Action { label, action } => {
                    Some(InlineKeyboardButton::callback(label, action.data()))
                }
                Button::Link { label, url } => match Url::parse(&url) {
                    Ok(url) => Some(InlineKeyboardButton::url(label, url)),
                    Err(err) => {
                        error!("Skipping button with bad url {}: {}", url, err);
                        None
                    }
                },
            })
            .collect::<Vec<_>>()
    }))
}
