//! Runtime configuration: command-line flags with environment fallbacks.
//!
//! `.env` is loaded by `main` before parsing, so every flag can also come
//! from a dotenv file. The API key is checked here, at startup, rather than
//! on the first model call.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use tally_core::{DEFAULT_ARTICLE_MODEL, DEFAULT_SEED_URLS};
use tally_engine::{FetchSettings, OpenAiSettings, RetryPolicy, TallySettings, DEFAULT_BASE_URL};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "tally",
    version,
    about = "Word frequency, article crawl and LLM word-count HTTP service."
)]
pub struct Cli {
    /// API key for the OpenAI-compatible model provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Address to listen on
    #[arg(long, env = "TALLY_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Model used by the article generation endpoint
    #[arg(long, env = "TALLY_ARTICLE_MODEL", default_value = DEFAULT_ARTICLE_MODEL)]
    pub article_model: String,

    /// Page the crawl endpoint may pick (repeat, or comma-separate in the env var)
    #[arg(long = "seed-url", env = "TALLY_SEED_URLS", value_delimiter = ',')]
    pub seed_urls: Vec<String>,

    /// Crawled articles are cut to this many characters
    #[arg(long, env = "TALLY_CRAWL_MAX_CHARS", default_value_t = 1000)]
    pub crawl_max_chars: usize,

    /// Timeout for fetching a crawl page, in seconds
    #[arg(long, env = "TALLY_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Timeout for a single model call, in seconds
    #[arg(long, env = "TALLY_LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub llm_timeout_secs: u64,

    /// Retries on rate-limit and server errors from the model provider
    #[arg(long, env = "TALLY_LLM_MAX_RETRIES", default_value_t = 3)]
    pub llm_max_retries: u32,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, env = "TALLY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long, env = "TALLY_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key: set OPENAI_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("invalid OpenAI base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid seed url {url:?}: {reason}")]
    InvalidSeedUrl { url: String, reason: String },
    #[error("at least one seed url is required")]
    NoSeedUrls,
    #[error("crawl max chars must be greater than zero")]
    ZeroCrawlLimit,
    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Validated, read-only settings for the life of the process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    pub openai: OpenAiSettings,
    pub fetch: FetchSettings,
    pub tally: TallySettings,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = parse_http_url(&cli.openai_base_url).map_err(|reason| {
            ConfigError::InvalidBaseUrl {
                url: cli.openai_base_url.clone(),
                reason,
            }
        })?;

        let seed_urls = if cli.seed_urls.is_empty() {
            DEFAULT_SEED_URLS.iter().map(|url| url.to_string()).collect()
        } else {
            cli.seed_urls
                .iter()
                .map(|raw| raw.trim())
                .filter(|raw| !raw.is_empty())
                .map(|raw| {
                    parse_http_url(raw)
                        .map(|url| url.to_string())
                        .map_err(|reason| ConfigError::InvalidSeedUrl {
                            url: raw.to_string(),
                            reason,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        if seed_urls.is_empty() {
            return Err(ConfigError::NoSeedUrls);
        }

        if cli.crawl_max_chars == 0 {
            return Err(ConfigError::ZeroCrawlLimit);
        }

        let log_level = tally_logging::parse_level(&cli.log_level)
            .ok_or_else(|| ConfigError::UnknownLogLevel(cli.log_level.clone()))?;

        let openai = OpenAiSettings {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
            request_timeout: Duration::from_secs(cli.llm_timeout_secs),
            retry: RetryPolicy {
                max_retries: cli.llm_max_retries,
                ..RetryPolicy::default()
            },
        };

        let fetch = FetchSettings {
            request_timeout: Duration::from_secs(cli.fetch_timeout_secs),
            ..FetchSettings::default()
        };

        let tally = TallySettings {
            seed_urls,
            crawl_max_chars: cli.crawl_max_chars,
            article_model: cli.article_model,
        };

        Ok(Self {
            bind: cli.bind,
            openai,
            fetch,
            tally,
            log_level,
            log_file: cli.log_file,
        })
    }
}

fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Built from explicit args; the api key is then set directly so a key
    // exported in the test environment cannot leak in.
    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["tally"];
        argv.extend_from_slice(args);
        let mut cli = Cli::try_parse_from(argv).unwrap();
        cli.api_key = Some("sk-test".to_string());
        cli
    }

    #[test]
    fn defaults_are_applied() {
        let settings = Settings::from_cli(cli(&[])).unwrap();
        assert_eq!(settings.bind, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(settings.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.openai.api_key, "sk-test");
        assert_eq!(settings.tally.crawl_max_chars, 1000);
        assert_eq!(settings.tally.article_model, "gpt-4o");
        assert_eq!(settings.tally.seed_urls.len(), DEFAULT_SEED_URLS.len());
        assert_eq!(settings.log_level, LevelFilter::Info);
    }

    #[test]
    fn missing_api_key_is_a_startup_error() {
        let mut args = cli(&[]);
        args.api_key = None;
        assert_eq!(
            Settings::from_cli(args).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let mut args = cli(&[]);
        args.api_key = Some("   ".to_string());
        assert_eq!(
            Settings::from_cli(args).unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn seed_urls_accept_repeats_and_commas() {
        let settings = Settings::from_cli(cli(&[
            "--seed-url",
            "https://a.example/,https://b.example/x",
            "--seed-url",
            "http://c.example/",
        ]))
        .unwrap();
        assert_eq!(
            settings.tally.seed_urls,
            vec![
                "https://a.example/".to_string(),
                "https://b.example/x".to_string(),
                "http://c.example/".to_string(),
            ]
        );
    }

    #[test]
    fn non_http_seed_url_is_rejected() {
        let err = Settings::from_cli(cli(&["--seed-url", "ftp://files.example/"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeedUrl { .. }), "{err:?}");
    }

    #[test]
    fn blank_seed_list_is_rejected() {
        let err = Settings::from_cli(cli(&["--seed-url", " , "])).unwrap_err();
        assert_eq!(err, ConfigError::NoSeedUrls);
    }

    #[test]
    fn zero_crawl_limit_is_rejected() {
        let err = Settings::from_cli(cli(&["--crawl-max-chars", "0"])).unwrap_err();
        assert_eq!(err, ConfigError::ZeroCrawlLimit);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = Settings::from_cli(cli(&["--log-level", "chatty"])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownLogLevel("chatty".to_string()));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let settings =
            Settings::from_cli(cli(&["--openai-base-url", "http://localhost:8080/v1/"])).unwrap();
        assert_eq!(settings.openai.base_url, "http://localhost:8080/v1");
    }
}
