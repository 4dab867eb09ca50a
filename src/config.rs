use std::ffi::OsStr;
use std::fs::File;

use itertools::Itertools;
use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;
use tracing::Level;

use crate::error::{CfError, Result};

// Set some default values
const DEFAULT_USERS_PATH: &str = "users.txt";
const DEFAULT_ITEMS_PATH: &str = "hotels.txt";
const DEFAULT_ACTIVITY_PATH: &str = "activity.txt";
const DEFAULT_OUTPUT_PATH: &str = "predictions.txt";
const DEFAULT_TOP_K: usize = 0;
const DEFAULT_VERBOSITY: u8 = 1;
const DEFAULT_TOP_K_CHOICES: &str = "0";

pub struct AppConfig {
    pub log: LogConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
    pub search: SearchConfig,
}

pub struct LogConfig {
    pub verbosity: u8,
}

pub struct DataConfig {
    pub users_path: String,
    pub items_path: String,
    pub activity_path: String,
    pub output_path: String,
}

pub struct ModelConfig {
    pub top_k: usize,
}

pub struct EvaluationConfig {
    pub enabled: bool,
    pub seed: Option<u64>,
}

pub struct SearchConfig {
    pub top_k_choices: Vec<usize>,
}

impl AppConfig {
    pub fn new(config_path: &str) -> Result<AppConfig> {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(config_path) {
            let config_text = ConfigText::new(config_file, config_path).map_err(|e| {
                CfError::Config(format!("loading configuration file {} failed: {:?}", config_path, e))
            })?;
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (ConfPath::from(&["data", "users_path"]), OsStr::new("USERS_DATA")),
            (ConfPath::from(&["data", "items_path"]), OsStr::new("ITEMS_DATA")),
            (ConfPath::from(&["data", "activity_path"]), OsStr::new("ACTIVITY_DATA")),
            (ConfPath::from(&["data", "output_path"]), OsStr::new("OUTPUT_PATH")),
            (ConfPath::from(&["model", "top_k"]), OsStr::new("TOP_K")),
            (ConfPath::from(&["evaluation", "enabled"]), OsStr::new("EVALUATE")),
            (ConfPath::from(&["evaluation", "seed"]), OsStr::new("SEED")),
            (ConfPath::from(&["log", "verbosity"]), OsStr::new("VERBOSITY")),
            (ConfPath::from(&["search", "top_k_choices"]), OsStr::new("TOP_K_CHOICES")),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    pub(crate) fn parse(conf: Config) -> Result<AppConfig> {
        Ok(AppConfig {
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"])),
            search: SearchConfig::parse(&conf, ConfPath::from(&["search"]))?,
        })
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            verbosity: conf
                .get(path.push("verbosity"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_VERBOSITY),
        }
    }

    pub fn max_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        let path_or = |key: &str, default: &str| -> String {
            conf.get(path.push(key))
                .trim()
                .value()
                .map(unquote)
                .unwrap_or_else(|_| default.to_string())
        };
        DataConfig {
            users_path: path_or("users_path", DEFAULT_USERS_PATH),
            items_path: path_or("items_path", DEFAULT_ITEMS_PATH),
            activity_path: path_or("activity_path", DEFAULT_ACTIVITY_PATH),
            output_path: path_or("output_path", DEFAULT_OUTPUT_PATH),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            top_k: conf
                .get(path.push("top_k"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TOP_K),
        }
    }

    /// Neighbourhood size, `None` when every user takes part.
    pub fn neighborhood_size(&self) -> Option<usize> {
        if self.top_k > 0 {
            Some(self.top_k)
        } else {
            None
        }
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvaluationConfig {
        EvaluationConfig {
            enabled: conf
                .get(path.push("enabled"))
                .trim()
                .value()
                .unwrap_or(false),
            seed: conf.get(path.push("seed")).trim().value().ok(),
        }
    }
}

impl SearchConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<SearchConfig> {
        let choices: String = conf
            .get(path.push("top_k_choices"))
            .trim()
            .value()
            .map(unquote)
            .unwrap_or_else(|_| DEFAULT_TOP_K_CHOICES.to_string());
        Ok(SearchConfig {
            top_k_choices: parse_choices(&choices)?,
        })
    }
}

/// Strips one pair of surrounding double quotes, if present.
fn unquote(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Parses a comma separated list such as `5, 10, 50`. Repeated values are dropped.
fn parse_choices(choices: &str) -> Result<Vec<usize>> {
    let parsed: Vec<usize> = choices
        .split(',')
        .map(str::trim)
        .filter(|choice| !choice.is_empty())
        .map(|choice| {
            choice
                .parse::<usize>()
                .map_err(|_| CfError::Config(format!("invalid top_k choice `{}`", choice)))
        })
        .collect::<Result<_>>()?;
    Ok(parsed.into_iter().unique().collect_vec())
}
