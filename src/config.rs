use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::log::{fatal, level_gate, log_level::LogLevel};

#[derive(Debug)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Error reading file {path}: {e}"))?;
        Ok(Self::parse(&content))
    }

    /// Parses INI-style text: `key = value` lines, optional `[section]`
    /// headers, `#` comments. Quotes around values are stripped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut globals = HashMap::new();
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = &line[1..line.len() - 1];
                current_section = Some(name.to_string());
                continue;
            }

            if let Some(pos) = line.find('=') {
                let key = line[..pos].trim().to_string();
                let value = line[pos + 1..].trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        globals.insert(key, value);
                    }
                    Some(sec) => {
                        sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        Config { globals, sections }
    }

    pub fn empty() -> Self {
        Self {
            globals: HashMap::new(),
            sections: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }
}

/// Settings of the `[Logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub prefix: String,
    pub min_level: Option<LogLevel>,
    pub fatal_flush_timeout: Duration,
}

impl LoggingConfig {
    pub const SECTION: &'static str = "Logging";
    pub const DEFAULT_PREFIX: &'static str = "rustylog";

    /// Reads `log_path`, `log_prefix`, `min_level` and
    /// `fatal_flush_timeout_ms`. Missing or unparsable keys fall back to the
    /// defaults.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();

        let log_dir = config
            .get_non_empty(Self::SECTION, "log_path")
            .map_or(defaults.log_dir, expand_path);
        let prefix = config
            .get(Self::SECTION, "log_prefix")
            .map_or(defaults.prefix, str::to_string);
        let min_level = config
            .get_non_empty(Self::SECTION, "min_level")
            .and_then(LogLevel::from_name);
        let fatal_flush_timeout = config
            .get(Self::SECTION, "fatal_flush_timeout_ms")
            .and_then(|s| s.parse().ok())
            .map_or(defaults.fatal_flush_timeout, Duration::from_millis);

        Self {
            log_dir,
            prefix,
            min_level,
            fatal_flush_timeout,
        }
    }

    /// Pushes the level floor into the level gate and the flush timeout into
    /// the fatal path.
    pub fn apply(&self) {
        if let Some(min) = self.min_level {
            level_gate::set_min_level(min);
        }
        fatal::set_fatal_flush_timeout(self.fatal_flush_timeout);
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: exe_dir_fallback_cwd().join("logs"),
            prefix: Self::DEFAULT_PREFIX.to_string(),
            min_level: None,
            fatal_flush_timeout: fatal::DEFAULT_FATAL_FLUSH_TIMEOUT,
        }
    }
}

/// Locates the directory of the executable, or falls back to the current
/// working directory on error.
fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Expands tilde (`~`) in file paths to the user's home directory.
fn expand_path(path_str: &str) -> PathBuf {
    if path_str.starts_with('~') {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from);

        if let Some(mut home_path) = home {
            if path_str == "~" {
                return home_path;
            }
            if path_str.starts_with("~/") || path_str.starts_with("~\\") {
                home_path.push(&path_str[2..]);
                return home_path;
            }
        }
    }
    PathBuf::from(path_str)
}
