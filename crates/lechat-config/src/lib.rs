//! Layered configuration for lechat.
//!
//! Precedence, highest first: CLI overrides, `LECHAT_*` environment
//! variables, `~/.config/lechat/config.toml`. The config layer exists only
//! for the CLI; the client itself reads neither files nor environment.

use lechat_types::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// Resolved configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session cookie sent as the `Cookie` header.
    pub cookie: String,
    /// Conversation id the messages are appended to.
    pub chat_id: String,
    /// Default model wire name, if configured. Parsed by the CLI so an
    /// unknown name surfaces as a model error, not a config error.
    pub model: Option<String>,
}

/// Values passed on the command line, overriding everything else.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub cookie: Option<String>,
    pub chat_id: Option<String>,
    pub model: Option<String>,
}

/// Shape of `config.toml`. All keys optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    cookie: Option<String>,
    chat_id: Option<String>,
    model: Option<String>,
}

impl Config {
    /// Load configuration from all sources.
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let file = match config_file_path() {
            Some(path) => read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Self::resolve(overrides, |key| std::env::var(key).ok(), file)
    }

    fn resolve(
        overrides: CliOverrides,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        let cookie = overrides
            .cookie
            .or_else(|| env("LECHAT_COOKIE"))
            .or(file.cookie)
            .ok_or_else(|| ConfigError::Missing {
                key: "cookie".to_string(),
            })?;
        let chat_id = overrides
            .chat_id
            .or_else(|| env("LECHAT_CHAT_ID"))
            .or(file.chat_id)
            .ok_or_else(|| ConfigError::Missing {
                key: "chat_id".to_string(),
            })?;
        let model = overrides.model.or_else(|| env("LECHAT_MODEL")).or(file.model);

        Ok(Self {
            cookie,
            chat_id,
            model,
        })
    }
}

/// Path of the user config file, if a config directory exists.
pub fn config_file_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("lechat").join("config.toml"))
}

fn read_file_config(path: &PathBuf) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_file_config(&text, &path.display().to_string()),
        Err(_) => {
            tracing::debug!("No config file at {}", path.display());
            Ok(FileConfig::default())
        }
    }
}

fn parse_file_config(text: &str, path: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn file_values_are_used_when_nothing_overrides() {
        let file = FileConfig {
            cookie: Some("file-cookie".into()),
            chat_id: Some("file-chat".into()),
            model: Some("codestral".into()),
        };
        let config = Config::resolve(CliOverrides::default(), no_env, file).unwrap();
        assert_eq!(config.cookie, "file-cookie");
        assert_eq!(config.chat_id, "file-chat");
        assert_eq!(config.model.as_deref(), Some("codestral"));
    }

    #[test]
    fn environment_overrides_file() {
        let file = FileConfig {
            cookie: Some("file-cookie".into()),
            chat_id: Some("file-chat".into()),
            model: None,
        };
        let env = |key: &str| match key {
            "LECHAT_COOKIE" => Some("env-cookie".to_string()),
            _ => None,
        };
        let config = Config::resolve(CliOverrides::default(), env, file).unwrap();
        assert_eq!(config.cookie, "env-cookie");
        assert_eq!(config.chat_id, "file-chat");
    }

    #[test]
    fn cli_overrides_everything() {
        let file = FileConfig {
            cookie: Some("file-cookie".into()),
            chat_id: Some("file-chat".into()),
            model: Some("codestral".into()),
        };
        let env = |_: &str| Some("env-value".to_string());
        let overrides = CliOverrides {
            cookie: Some("cli-cookie".into()),
            chat_id: Some("cli-chat".into()),
            model: Some("mistral-nemo".into()),
        };
        let config = Config::resolve(overrides, env, file).unwrap();
        assert_eq!(config.cookie, "cli-cookie");
        assert_eq!(config.chat_id, "cli-chat");
        assert_eq!(config.model.as_deref(), Some("mistral-nemo"));
    }

    #[test]
    fn missing_cookie_is_reported() {
        let err =
            Config::resolve(CliOverrides::default(), no_env, FileConfig::default()).unwrap_err();
        match err {
            ConfigError::Missing { key } => assert_eq!(key, "cookie"),
            other => panic!("Expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn missing_chat_id_is_reported() {
        let file = FileConfig {
            cookie: Some("c".into()),
            chat_id: None,
            model: None,
        };
        let err = Config::resolve(CliOverrides::default(), no_env, file).unwrap_err();
        match err {
            ConfigError::Missing { key } => assert_eq!(key, "chat_id"),
            other => panic!("Expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn parse_valid_file() {
        let file = parse_file_config(
            "cookie = \"abc\"\nchat_id = \"chat-1\"\nmodel = \"codestral\"\n",
            "test.toml",
        )
        .unwrap();
        assert_eq!(file.cookie.as_deref(), Some("abc"));
        assert_eq!(file.chat_id.as_deref(), Some("chat-1"));
        assert_eq!(file.model.as_deref(), Some("codestral"));
    }

    #[test]
    fn parse_invalid_file_is_a_parse_error() {
        let err = parse_file_config("cookie = [not toml", "bad.toml").unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, "bad.toml"),
            other => panic!("Expected Parse, got {other:?}"),
        }
    }
}
