use std::{env, path::PathBuf, time::Duration};

use crate::{
    hint::{HintConfig, HintStrategy},
    puzzle::PuzzleShape,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub data_file: PathBuf,
    pub store_ttl: Duration,
    pub cleanup_interval: Duration,
    pub shape: PuzzleShape,
    pub hints: HintConfig,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(8080);

        let workers = env::var("SERVER_WORKERS")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or_else(num_cpus::get);

        let data_file = env::var("PUZZLE_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/connections.json"));

        let store_ttl = env_secs("PUZZLE_STORE_TTL_SECS").unwrap_or_else(|| Duration::from_secs(60));
        let cleanup_interval =
            env_secs("CLEANUP_INTERVAL_SECS").unwrap_or_else(|| Duration::from_secs(300));

        let defaults = PuzzleShape::default();
        let shape = PuzzleShape {
            categories: env_count("PUZZLE_CATEGORIES").unwrap_or(defaults.categories),
            words_per_category: env_count("PUZZLE_WORDS_PER_CATEGORY")
                .unwrap_or(defaults.words_per_category),
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        AppConfig {
            host,
            port,
            workers,
            data_file,
            store_ttl,
            cleanup_interval,
            shape,
            hints: hint_config_from_env(),
            log_level,
        }
    }
}

fn hint_config_from_env() -> HintConfig {
    let defaults = HintConfig::default();

    let strategy = env::var("HINT_STRATEGY")
        .ok()
        .and_then(|raw| raw.trim().parse::<HintStrategy>().ok())
        .unwrap_or(defaults.strategy);

    let api_key = env::var("HINT_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    HintConfig {
        strategy,
        api_base_url: env::var("HINT_API_BASE_URL").unwrap_or(defaults.api_base_url),
        api_key,
        model: env::var("HINT_MODEL").unwrap_or(defaults.model),
        timeout: env_secs("HINT_TIMEOUT_SECS").unwrap_or(defaults.timeout),
        max_tokens: env::var("HINT_MAX_TOKENS")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.max_tokens),
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

fn env_count(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|value| *value > 0)
}
