use chrono::{FixedOffset, Local, Offset};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use validator::Validate;

/// Which backend holds words and answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "in_memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Versioned game tuning table. Changing any of these values should bump `version`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct GameRules {
    #[validate(length(min = 1))]
    pub version: String,

    /// Target alphabet, in display order.
    #[validate(length(min = 4))]
    pub alphabet: String,

    /// Words hidden from every query.
    pub blacklisted_words: Vec<String>,

    /// Letters that disqualify a word and are never used as decoys.
    pub blacklisted_letters: String,

    /// Number of tiles in the spell-word bag.
    #[validate(range(min = 1, max = 64))]
    pub spell_bag_size: usize,

    /// Number of candidate letters in the missing-letter puzzle, the correct one included.
    #[validate(range(min = 2, max = 16))]
    pub missing_letter_options: usize,

    #[validate(range(min = 1))]
    pub default_distractor_count: usize,

    #[validate(range(min = 1, max = 50))]
    pub max_distractor_count: usize,

    /// Trailing window during which correctly answered words are withheld.
    #[validate(range(min = 1, max = 120))]
    pub exclusion_window_months: u32,

    #[validate(range(min = 1))]
    pub daily_goal: u32,

    /// Offset east of UTC used to find the start of the learner's day.
    /// Falls back to the host offset when unset.
    #[validate(range(min = -1440, max = 1440))]
    pub day_offset_minutes: Option<i32>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            version: "2024.2".to_string(),
            alphabet: "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ".to_string(),
            blacklisted_words: vec!["ЦВЕТОК".to_string()],
            blacklisted_letters: "ЁЙЩЪЬ".to_string(),
            spell_bag_size: 10,
            missing_letter_options: 4,
            default_distractor_count: 3,
            max_distractor_count: 8,
            exclusion_window_months: 1,
            daily_goal: 20,
            day_offset_minutes: None,
        }
    }
}

impl GameRules {
    pub fn day_offset(&self) -> FixedOffset {
        self.day_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| Local::now().offset().fix())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub bind_addr: String,
    pub store_timeout: Duration,
    pub vocabulary_seed_file: Option<String>,
    /// Fixed seed for puzzle randomness; intended for reproducible test runs.
    pub rng_seed: Option<u64>,
    pub metrics_auth: String,
    pub rules: GameRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_database: "readinggame".to_string(),
            bind_addr: "0.0.0.0:8081".to_string(),
            store_timeout: Duration::from_secs(5),
            vocabulary_seed_file: None,
            rng_seed: None,
            metrics_auth: "admin:changeme".to_string(),
            rules: GameRules::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first, then the crate-local one
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let storage_backend = settings
            .get_string("storage.backend")
            .or_else(|_| env::var("STORAGE_BACKEND"))
            .unwrap_or_else(|_| "mongo".to_string())
            .parse::<StorageBackend>()
            .map_err(config::ConfigError::Message)?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "readinggame".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let store_timeout_ms = settings
            .get_int("storage.timeout_ms")
            .ok()
            .or_else(|| env::var("STORE_TIMEOUT_MS").ok()?.parse().ok())
            .unwrap_or(5_000);
        if store_timeout_ms <= 0 {
            return Err(config::ConfigError::Message(format!(
                "storage.timeout_ms must be positive, got {}",
                store_timeout_ms
            )));
        }

        let vocabulary_seed_file = settings
            .get_string("vocabulary.seed_file")
            .or_else(|_| env::var("VOCABULARY_SEED_FILE"))
            .ok()
            .filter(|path| !path.is_empty());

        let rng_seed = settings
            .get_int("game.rng_seed")
            .ok()
            .map(|seed| seed as u64)
            .or_else(|| env::var("GAME_RNG_SEED").ok()?.parse().ok());

        let metrics_auth = match settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
        {
            Ok(auth) => auth,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::Message(
                    "METRICS_AUTH must be set in production".to_string(),
                ));
            }
            Err(_) => {
                eprintln!("WARNING: Using default METRICS_AUTH (dev mode only!)");
                "admin:changeme".to_string()
            }
        };

        let rules = match settings.get::<GameRules>("rules") {
            Ok(rules) => rules,
            Err(config::ConfigError::NotFound(_)) => GameRules::default(),
            Err(e) => return Err(e),
        };
        rules
            .validate()
            .map_err(|e| config::ConfigError::Message(format!("invalid game rules: {}", e)))?;

        Ok(Config {
            storage_backend,
            mongo_uri,
            mongo_database,
            bind_addr,
            store_timeout: Duration::from_millis(store_timeout_ms as u64),
            vocabulary_seed_file,
            rng_seed,
            metrics_auth,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_rules_are_valid() {
        assert!(GameRules::default().validate().is_ok());
    }

    #[test]
    fn rules_reject_tiny_option_count() {
        let rules = GameRules {
            missing_letter_options: 1,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn explicit_day_offset_wins() {
        let rules = GameRules {
            day_offset_minutes: Some(180),
            ..GameRules::default()
        };
        assert_eq!(rules.day_offset().local_minus_utc(), 180 * 60);
    }

    #[test]
    fn storage_backend_parses_aliases() {
        assert_eq!("MongoDB".parse::<StorageBackend>(), Ok(StorageBackend::Mongo));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    #[serial]
    fn load_reads_legacy_env_fallbacks() {
        env::set_var("SKIP_ROOT_ENV", "1");
        env::set_var("APP_ENV", "test-missing-profile");
        env::set_var("STORAGE_BACKEND", "memory");
        env::set_var("MONGO_DATABASE", "readinggame_test");
        env::set_var("GAME_RNG_SEED", "42");

        let config = Config::load().expect("config should load from env");
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.mongo_database, "readinggame_test");
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.rules.spell_bag_size, 10);

        for key in [
            "SKIP_ROOT_ENV",
            "APP_ENV",
            "STORAGE_BACKEND",
            "MONGO_DATABASE",
            "GAME_RNG_SEED",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn load_rejects_unknown_backend() {
        env::set_var("SKIP_ROOT_ENV", "1");
        env::set_var("APP_ENV", "test-missing-profile");
        env::set_var("STORAGE_BACKEND", "sqlite");

        assert!(Config::load().is_err());

        env::remove_var("STORAGE_BACKEND");
        env::remove_var("APP_ENV");
        env::remove_var("SKIP_ROOT_ENV");
    }

    #[test]
    #[serial]
    fn load_requires_metrics_auth_in_prod() {
        env::set_var("SKIP_ROOT_ENV", "1");
        env::set_var("APP_ENV", "prod");
        env::set_var("STORAGE_BACKEND", "memory");
        env::remove_var("METRICS_AUTH");

        let err = Config::load().expect_err("prod without METRICS_AUTH must fail");
        assert!(err.to_string().contains("METRICS_AUTH"));

        env::set_var("METRICS_AUTH", "scrape:secret");
        let config = Config::load().expect("prod with METRICS_AUTH should load");
        assert_eq!(config.metrics_auth, "scrape:secret");

        for key in ["SKIP_ROOT_ENV", "APP_ENV", "STORAGE_BACKEND", "METRICS_AUTH"] {
            env::remove_var(key);
        }
    }
}
