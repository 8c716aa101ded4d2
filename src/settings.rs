use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{name} must be a whole number of seconds, got \"{value}\"")]
    BadTimeout { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `None` leaves the tutor unconfigured; the bot still runs.
    pub api_key: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    pub completion_model: String,
    pub timeout: Duration,
    pub content_path: Option<PathBuf>,
}

impl Settings {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        if let Err(err) = dotenv::dotenv() {
            log::debug!("No .env file loaded: {}", err);
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timeout = match non_empty("TUTOR_REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| SettingsError::BadTimeout {
                    name: "TUTOR_REQUEST_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key: non_empty("OPENAI_API_KEY"),
            api_base: non_empty("OPENAI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            chat_model: non_empty("TUTOR_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            completion_model: non_empty("TUTOR_COMPLETION_MODEL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            timeout,
            content_path: non_empty("TUTOR_CONTENT").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(settings.completion_model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(settings.timeout, Duration::from_secs(15));
        assert_eq!(settings.content_path, None);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert_eq!(settings(&[("OPENAI_API_KEY", "  ")]).unwrap().api_key, None);
    }

    #[test]
    fn overrides_are_read() {
        let settings = settings(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:8080/"),
            ("TUTOR_REQUEST_TIMEOUT_SECS", "30"),
            ("TUTOR_CONTENT", "content.yaml"),
        ])
        .unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.api_base, "http://localhost:8080");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.content_path, Some(PathBuf::from("content.yaml")));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert_eq!(
            settings(&[("TUTOR_REQUEST_TIMEOUT_SECS", "soon")]),
            Err(SettingsError::BadTimeout {
                name: "TUTOR_REQUEST_TIMEOUT_SECS",
                value: "soon".to_string()
            })
        );
    }
}
