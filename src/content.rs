//! Static content shown by the bot: welcome page, study links and the quiz bank.
//!
//! Loaded from YAML so the links and questions can be swapped without a rebuild.
//! `content.yaml` at the crate root is compiled in as the default.

use std::fs;
use std::path::Path;

use teloxide::utils::html;

use crate::quiz::QuizPool;

const DEFAULT_CONTENT: &str = include_str!("../content.yaml");

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse content: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("the quiz bank is empty")]
    EmptyQuiz,
    #[error("quiz question \"{0}\" needs at least two options")]
    TooFewOptions(String),
    #[error("the answer to quiz question \"{0}\" is not one of its options")]
    AnswerNotAnOption(String),
    #[error("resource #{0} needs both a title and a url")]
    IncompleteResource(usize),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Content {
    pub title: String,
    pub welcome: String,
    pub image: Option<Image>,
    #[serde(default)]
    pub footer: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    pub quiz: QuizPool,
}

impl Content {
    pub fn from_yaml(yaml: &str) -> Result<Self, ContentError> {
        let content: Content = serde_yaml::from_str(yaml)?;
        content.validate()?;
        Ok(content)
    }

    /// Reads `path` if given, otherwise falls back to the compiled-in content.
    pub fn load(path: Option<&Path>) -> Result<Self, ContentError> {
        match path {
            Some(path) => {
                log::info!("Loading content from {}", path.display());
                Self::from_yaml(&fs::read_to_string(path)?)
            }
            None => Self::from_yaml(DEFAULT_CONTENT),
        }
    }

    fn validate(&self) -> Result<(), ContentError> {
        if self.quiz.questions.is_empty() {
            return Err(ContentError::EmptyQuiz);
        }
        for question in &self.quiz.questions {
            if question.options.len() < 2 {
                return Err(ContentError::TooFewOptions(question.question.clone()));
            }
            if !question.options.contains(&question.answer) {
                return Err(ContentError::AnswerNotAnOption(question.question.clone()));
            }
        }
        for (index, resource) in self.resources.iter().enumerate() {
            if resource.title.trim().is_empty() || resource.url.trim().is_empty() {
                return Err(ContentError::IncompleteResource(index + 1));
            }
        }
        Ok(())
    }

    pub fn home_text(&self) -> String {
        format!(
            "<b>👋 Welcome to the {}!</b>\n\n{}\n\n{}",
            html::escape(&self.title),
            html::escape(&self.welcome),
            html::escape(&self.footer)
        )
    }

    /// Study links as an HTML bullet list.
    pub fn resources_html(&self) -> String {
        let mut text = String::from("<b>📚 Study Materials</b>\nHere are some useful resources:\n");
        for resource in &self.resources {
            text.push_str(&format!(
                "\n• <a href=\"{}\">{}</a>",
                html::escape(&resource.url),
                html::escape(&resource.title)
            ));
        }
        text
    }
}
