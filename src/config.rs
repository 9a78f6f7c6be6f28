use {
    std::{env, str::FromStr, fmt::Display},
    crate::logger::{Level, micro::*},
};

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_LOG_BUFFER: usize = 10;
pub const DEFAULT_LOG_LEVEL: Level = Level::Info;

const ENV_HOST: &str = "HERMITMUX_HOST";
const ENV_PORT: &str = "HERMITMUX_PORT";
const ENV_MAX_LINES: &str = "HERMITMUX_MAX_LINES";
const ENV_LOG_LEVEL: &str = "HERMITMUX_LOG_LEVEL";
const ENV_LOG_BUFFER: &str = "HERMITMUX_LOG_BUFFER";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_lines: usize,
    pub log_level: Level,
    pub log_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            max_lines: num_cpus::get() * 2,
            log_level: DEFAULT_LOG_LEVEL,
            log_buffer: DEFAULT_LOG_BUFFER,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Values that fail to parse fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Config::default();
        Config {
            host: lookup(ENV_HOST).unwrap_or(default.host),
            port: parse_or(&lookup, ENV_PORT, default.port),
            max_lines: parse_or(&lookup, ENV_MAX_LINES, default.max_lines).max(1),
            log_level: parse_or(&lookup, ENV_LOG_LEVEL, default.log_level),
            log_buffer: parse_or(&lookup, ENV_LOG_BUFFER, default.log_buffer).max(1),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(e) => {
                warn!("{}={:?}: {}. using default {}", key, raw, e, default);
                default
            },
        },
        None => default,
    }
}
