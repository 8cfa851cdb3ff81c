use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the text-generation service. Generation fails without it,
    /// extraction does not need it.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub fetch_timeout: Duration,
    pub generation_timeout: Duration,
    pub user_agent: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            api_url: get_env_or_default("LLM_API_URL", DEFAULT_API_URL),
            model: get_env_or_default("LLM_MODEL", DEFAULT_MODEL),
            fetch_timeout: Duration::from_secs(get_env_parsed_or_default("FETCH_TIMEOUT_SECS", 20)),
            generation_timeout: Duration::from_secs(get_env_parsed_or_default(
                "GENERATION_TIMEOUT_SECS",
                60,
            )),
            user_agent: get_env_or_default("FETCH_USER_AGENT", DEFAULT_USER_AGENT),
            bind_addr: get_env_or_default("BIND_ADDR", "127.0.0.1:3000"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            fetch_timeout: Duration::from_secs(20),
            generation_timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("invalid value {raw:?} for {key}, falling back to {default}");
            default
        }),
        Err(_) => default,
    }
}
