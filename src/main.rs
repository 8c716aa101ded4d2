mod content;
mod quiz;
mod settings;
mod solver;
mod tutor;

use std::sync::Arc;

use content::Content;
use quiz::QuizQuestion;
use settings::Settings;
use solver::{input, CalculationKind};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{ChatAction, InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
};
use tutor::Tutor;

type TutorDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    Menu,
    ReceiveConcept,
    ReceiveComponent,
    SolverReceiveKind,
    SolverReceiveInputs {
        kind: CalculationKind,
    },
    QuizReceiveAnswer {
        question: QuizQuestion,
    },
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    log::info!("Starting circuit tutor bot...");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let content = match Content::load(settings.content_path.as_deref()) {
        Ok(content) => Arc::new(content),
        Err(err) => {
            log::error!("Failed to load content: {}", err);
            std::process::exit(1);
        }
    };
    log::info!(
        "Content loaded: {} quiz questions, {} resources",
        content.quiz.questions.len(),
        content.resources.len()
    );

    let tutor = Arc::new(Tutor::from_settings(&settings));
    if !tutor.is_configured() {
        log::warn!("Concept Explanation and Circuit Design will answer with a configuration warning");
    }

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(
                dptree::filter(|msg: Message| command_of(msg.text()) == Some(BotCommand::Start))
                    .endpoint(start),
            )
            .branch(
                dptree::filter(|msg: Message| command_of(msg.text()) == Some(BotCommand::Menu))
                    .endpoint(show_menu),
            )
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Menu].endpoint(receive_section))
            .branch(dptree::case![State::ReceiveConcept].endpoint(receive_concept))
            .branch(dptree::case![State::ReceiveComponent].endpoint(receive_component))
            .branch(dptree::case![State::SolverReceiveKind].endpoint(receive_calculator))
            .branch(
                dptree::case![State::SolverReceiveInputs { kind }]
                    .endpoint(receive_calculator_inputs),
            )
            .branch(
                dptree::case![State::QuizReceiveAnswer { question }].endpoint(receive_quiz_answer),
            ),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new(), tutor, content])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const HOME: &str = "🏠 Home";
const CONCEPT_EXPLANATION: &str = "📖 Concept Explanation";
const NUMERICAL_SOLVER: &str = "🧮 Numerical Solver";
const INTERACTIVE_QUIZ: &str = "📝 Interactive Quiz";
const CIRCUIT_DESIGN: &str = "🔧 Circuit Design";
const STUDY_RESOURCES: &str = "📂 Study Resources";

fn menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(HOME), KeyboardButton::new(CONCEPT_EXPLANATION)],
        vec![KeyboardButton::new(NUMERICAL_SOLVER), KeyboardButton::new(INTERACTIVE_QUIZ)],
        vec![KeyboardButton::new(CIRCUIT_DESIGN), KeyboardButton::new(STUDY_RESOURCES)],
    ])
}

fn calculator_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(
        CalculationKind::ALL
            .chunks(2)
            .map(|row| row.iter().map(|kind| KeyboardButton::new(kind.label())).collect())
            .collect::<Vec<Vec<_>>>(),
    )
}

/// Commands honoured in every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BotCommand {
    Start,
    Menu,
}

fn command_of(text: Option<&str>) -> Option<BotCommand> {
    match text.map(str::trim) {
        Some("/start") => Some(BotCommand::Start),
        Some("/menu") => Some(BotCommand::Menu),
        _ => None,
    }
}

async fn start(bot: Bot, dialogue: TutorDialogue, content: Arc<Content>, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        format!(
            "👋 Hi! I am the {}. Pick a section to start learning.",
            content.title
        ),
    )
    .reply_markup(menu_keyboard())
    .await?;

    dialogue.update(State::Menu).await?;
    Ok(())
}

async fn show_menu(bot: Bot, dialogue: TutorDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Choose a section:")
        .reply_markup(menu_keyboard())
        .await?;

    dialogue.update(State::Menu).await?;
    Ok(())
}

async fn receive_section(
    bot: Bot,
    dialogue: TutorDialogue,
    content: Arc<Content>,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(HOME) => send_home(&bot, &content, &msg).await?,
        Some(CONCEPT_EXPLANATION) => {
            bot.send_message(msg.chat.id, "📘 Enter a concept (e.g., diode, transistor):")
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.update(State::ReceiveConcept).await?;
        }
        Some(NUMERICAL_SOLVER) => {
            bot.send_message(msg.chat.id, "🔢 Which calculator?")
                .reply_markup(calculator_keyboard())
                .await?;
            dialogue.update(State::SolverReceiveKind).await?;
        }
        Some(INTERACTIVE_QUIZ) => {
            let Some(question) = content.quiz.random_question() else {
                bot.send_message(msg.chat.id, "The quiz bank is empty.").await?;
                return Ok(());
            };

            let options = question
                .options
                .iter()
                .map(|option| vec![KeyboardButton::new(option.clone())])
                .collect::<Vec<_>>();
            bot.send_message(msg.chat.id, format!("📝 Quick Quiz\n\n{}", question.question))
                .reply_markup(KeyboardMarkup::new(options))
                .await?;

            dialogue
                .update(State::QuizReceiveAnswer {
                    question: question.clone(),
                })
                .await?;
        }
        Some(CIRCUIT_DESIGN) => {
            bot.send_message(
                msg.chat.id,
                "🔧 Enter a component for guidance (e.g., amplifier):",
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
            dialogue.update(State::ReceiveComponent).await?;
        }
        Some(STUDY_RESOURCES) => {
            bot.send_message(msg.chat.id, content.resources_html())
                .parse_mode(ParseMode::Html)
                .await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Please choose one of the sections")
                .reply_markup(menu_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn send_home(bot: &Bot, content: &Content, msg: &Message) -> HandlerResult {
    if let Some(image) = &content.image {
        match reqwest::Url::parse(&image.url) {
            Ok(url) => {
                // The welcome text still goes out if the image can't be fetched
                if let Err(err) = bot
                    .send_photo(msg.chat.id, InputFile::url(url))
                    .caption(image.caption.clone())
                    .await
                {
                    log::warn!("Failed to send welcome image: {}", err);
                }
            }
            Err(err) => log::warn!("Invalid welcome image url {:?}: {}", image.url, err),
        }
    }

    bot.send_message(msg.chat.id, content.home_text())
        .parse_mode(ParseMode::Html)
        .reply_markup(menu_keyboard())
        .await?;
    Ok(())
}

async fn receive_concept(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    msg: Message,
) -> HandlerResult {
    let Some(concept) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the concept as text")
            .await?;
        return Ok(());
    };

    // Only a nicety, the reply goes out either way
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    let reply = tutor.explain_or_warn(concept).await;

    bot.send_message(msg.chat.id, reply)
        .reply_markup(menu_keyboard())
        .await?;
    dialogue.update(State::Menu).await?;
    Ok(())
}

async fn receive_component(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    msg: Message,
) -> HandlerResult {
    let Some(component) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the component as text")
            .await?;
        return Ok(());
    };

    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;
    let reply = tutor.design_or_warn(component).await;

    bot.send_message(msg.chat.id, reply)
        .reply_markup(menu_keyboard())
        .await?;
    dialogue.update(State::Menu).await?;
    Ok(())
}

async fn receive_calculator(bot: Bot, dialogue: TutorDialogue, msg: Message) -> HandlerResult {
    match msg.text().and_then(CalculationKind::from_label) {
        Some(kind) => {
            bot.send_message(msg.chat.id, input::usage(kind))
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.update(State::SolverReceiveInputs { kind }).await?;
        }
        None => {
            bot.send_message(msg.chat.id, "Please choose one of the calculators")
                .reply_markup(calculator_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn receive_calculator_inputs(
    bot: Bot,
    dialogue: TutorDialogue,
    kind: CalculationKind,
    msg: Message,
) -> HandlerResult {
    let Some(line) = msg.text() else {
        bot.send_message(msg.chat.id, format!("Please send the values as text, e.g. {}", kind.example()))
            .await?;
        return Ok(());
    };

    match input::evaluate_line(kind, line) {
        Ok(result) => {
            log::debug!("{} solved: {}", kind, result);
            bot.send_message(msg.chat.id, format!("✅ {}", result))
                .reply_markup(menu_keyboard())
                .await?;
            dialogue.update(State::Menu).await?;
        }
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                format!("❌ {}\nSend corrected values or /menu to go back.", err),
            )
            .await?;
        }
    }
    Ok(())
}

async fn receive_quiz_answer(
    bot: Bot,
    dialogue: TutorDialogue,
    question: QuizQuestion,
    msg: Message,
) -> HandlerResult {
    let Some(answer) = msg.text() else {
        bot.send_message(msg.chat.id, "Please choose one of the answers")
            .await?;
        return Ok(());
    };

    let outcome = question.check(answer);
    bot.send_message(msg.chat.id, outcome.message())
        .reply_markup(menu_keyboard())
        .await?;
    dialogue.update(State::Menu).await?;
    Ok(())
}
