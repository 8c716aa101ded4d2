pub mod completions;

use chatgpt::config::ChatGPTEngine;
use chatgpt::prelude::*;
use chatgpt::types::CompletionResponse;

use crate::settings::Settings;
use completions::CompletionClient;

pub const MAX_TOKENS: u32 = 250;
pub const TEMPERATURE: f32 = 0.5;
pub const TUTOR_PERSONA: &str = "You are a helpful electronics tutor.";

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("OPENAI_API_KEY is not set, AI answers are unavailable")]
    NotConfigured,
    #[error("please enter a {0} first")]
    EmptyInput(&'static str),
    #[error("invalid API base url: {0}")]
    InvalidApiBase(String),
    #[error("{0}")]
    Chat(#[from] chatgpt::err::Error),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("the service returned no text")]
    EmptyResponse,
}

/// User-visible form of a failed tutor call.
pub fn warning(err: &TutorError) -> String {
    format!("⚠️ Error: {}", err)
}

pub fn concept_prompt(concept: &str) -> String {
    format!(
        "Explain the concept of {} in Electronics Device and Circuit.",
        concept.trim()
    )
}

pub fn design_prompt(component: &str) -> String {
    format!("Design a simple circuit using {}.", component.trim())
}

fn engine_for(model: &str) -> ChatGPTEngine {
    match model {
        "gpt-3.5-turbo" => ChatGPTEngine::Gpt35Turbo,
        "gpt-4" => ChatGPTEngine::Gpt4,
        // Custom engines need a &'static str; this runs once at startup
        other => ChatGPTEngine::Custom(Box::leak(other.to_string().into_boxed_str())),
    }
}

struct Clients {
    chat_gpt: ChatGPT,
    completions: CompletionClient,
}

/// Electronics tutor backed by the hosted text-generation API.
///
/// Without an API key the tutor is still constructed, but every call fails
/// with [`TutorError::NotConfigured`] so the bot can tell the user instead of
/// crashing.
pub struct Tutor {
    clients: Option<Clients>,
}

impl Tutor {
    pub fn new(settings: &Settings) -> std::result::Result<Self, TutorError> {
        let api_key = settings.api_key.clone().ok_or(TutorError::NotConfigured)?;

        let chat_gpt = {
            let mut gpt = ChatGPT::new(api_key.clone())?;

            gpt.config.engine = engine_for(&settings.chat_model);
            gpt.config.temperature = TEMPERATURE;
            gpt.config.max_tokens = Some(MAX_TOKENS);
            gpt.config.timeout = settings.timeout;
            gpt.config.api_url = reqwest::Url::parse(&format!("{}/v1/chat/completions", settings.api_base))
                .map_err(|e| TutorError::InvalidApiBase(e.to_string()))?;

            gpt
        };

        let completions = CompletionClient::new(
            &settings.api_base,
            api_key,
            settings.completion_model.clone(),
            settings.timeout,
        )?;

        Ok(Self {
            clients: Some(Clients {
                chat_gpt,
                completions,
            }),
        })
    }

    pub fn unconfigured() -> Self {
        Self { clients: None }
    }

    /// Builds the tutor, falling back to the unconfigured one on error.
    pub fn from_settings(settings: &Settings) -> Self {
        match Self::new(settings) {
            Ok(tutor) => {
                log::info!("Tutor configured with chat model {}", settings.chat_model);
                tutor
            }
            Err(err) => {
                log::warn!("Tutor unavailable: {}", err);
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.clients.is_some()
    }

    fn clients(&self) -> std::result::Result<&Clients, TutorError> {
        self.clients.as_ref().ok_or(TutorError::NotConfigured)
    }

    pub async fn explain_concept(&self, concept: &str) -> std::result::Result<String, TutorError> {
        if concept.trim().is_empty() {
            return Err(TutorError::EmptyInput("concept"));
        }
        let clients = self.clients()?;
        log::debug!("Explaining concept: {:?}", concept);

        let mut conversation = clients.chat_gpt.new_conversation_directed(TUTOR_PERSONA);
        let response: CompletionResponse = conversation
            .send_message(concept_prompt(concept))
            .await
            .map_err(|err| {
                log::warn!("Concept explanation failed: {}", err);
                err
            })?;
        let content = response.message().content.trim().to_string();

        log::debug!("Completion: {:?}", content);

        if content.is_empty() {
            return Err(TutorError::EmptyResponse);
        }
        Ok(content)
    }

    pub async fn design_circuit(&self, component: &str) -> std::result::Result<String, TutorError> {
        if component.trim().is_empty() {
            return Err(TutorError::EmptyInput("component"));
        }
        let clients = self.clients()?;
        log::debug!("Generating design steps for: {:?}", component);

        let content = clients
            .completions
            .complete(&design_prompt(component))
            .await
            .map_err(|err| {
                log::warn!("Circuit design guidance failed: {}", err);
                err
            })?;

        log::debug!("Completion: {:?}", content);
        Ok(content)
    }

    /// Runs [`Tutor::explain_concept`] and renders failures as a warning.
    pub async fn explain_or_warn(&self, concept: &str) -> String {
        self.explain_concept(concept)
            .await
            .unwrap_or_else(|err| warning(&err))
    }

    /// Runs [`Tutor::design_circuit`] and renders failures as a warning.
    pub async fn design_or_warn(&self, component: &str) -> String {
        self.design_circuit(component)
            .await
            .unwrap_or_else(|err| warning(&err))
    }
}
