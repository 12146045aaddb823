//! Configuration module for `StudyHub`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the studyhub config directory
const DIR_VARIABLE: &str = "$STUDYHUB";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory of the local document store
    #[serde(default)]
    pub data_dir: String,
    /// Directory for generated syllabus reports
    #[serde(default)]
    pub reports_dir: String,
}

/// Identity used by the CLI when reading and writing documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// User id owning tasks and progress
    #[serde(default)]
    pub uid: String,
    /// Role flag (`student` or `admin`)
    #[serde(default)]
    pub role: String,
}

/// Defaults for the headless background simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Canvas width in pixels
    #[serde(default)]
    pub width: f64,
    /// Canvas height in pixels
    #[serde(default)]
    pub height: f64,
    /// Number of bouncing icons
    #[serde(default)]
    pub icons: usize,
    /// Number of background particles
    #[serde(default)]
    pub particles: usize,
    /// Frames to simulate per run
    #[serde(default)]
    pub frames: usize,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Local identity
    #[serde(default)]
    pub user: UserConfig,
    /// Simulation defaults
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override document store directory
    pub data_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
    /// Override acting user id
    pub uid: Option<String>,
    /// Override acting user role
    pub role: Option<String>,
}

impl Config {
    /// Get the `$STUDYHUB` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/studyhub`
    /// - macOS: `~/Library/Application Support/studyhub`
    /// - Windows: `%APPDATA%\studyhub`
    #[must_use]
    pub fn get_studyhub_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studyhub")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty (or zero) here and set in `defaults` are
    /// filled in, so user edits survive upgrades that add new keys.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        changed |= fill_string(&mut self.logging.level, &defaults.logging.level);
        changed |= fill_string(&mut self.logging.file, &defaults.logging.file);

        changed |= fill_string(&mut self.paths.data_dir, &defaults.paths.data_dir);
        changed |= fill_string(&mut self.paths.reports_dir, &defaults.paths.reports_dir);

        changed |= fill_string(&mut self.user.uid, &defaults.user.uid);
        changed |= fill_string(&mut self.user.role, &defaults.user.role);

        let sim = &mut self.simulation;
        let sim_defaults = &defaults.simulation;
        if sim.width <= 0.0 && sim_defaults.width > 0.0 {
            sim.width = sim_defaults.width;
            changed = true;
        }
        if sim.height <= 0.0 && sim_defaults.height > 0.0 {
            sim.height = sim_defaults.height;
            changed = true;
        }
        if sim.icons == 0 && sim_defaults.icons > 0 {
            sim.icons = sim_defaults.icons;
            changed = true;
        }
        if sim.particles == 0 && sim_defaults.particles > 0 {
            sim.particles = sim_defaults.particles;
            changed = true;
        }
        if sim.frames == 0 && sim_defaults.frames > 0 {
            sim.frames = sim_defaults.frames;
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides only live for the current run; nothing is written back.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(data_dir) = &overrides.data_dir {
            self.paths.data_dir.clone_from(data_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
        if let Some(uid) = &overrides.uid {
            self.user.uid.clone_from(uid);
        }
        if let Some(role) = &overrides.role {
            self.user.role.clone_from(role);
        }
    }

    /// Get the user config file path
    ///
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_studyhub_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$STUDYHUB` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_studyhub_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields fall back to their serde defaults (empty strings, zero, false).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_dir = Self::expand_variables(&config.paths.data_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// Falls back to defaults if the file exists but cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            // First run
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform-specific config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Whether the configured role grants admin rights
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.role.eq_ignore_ascii_case("admin")
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `data_dir`, `reports_dir`,
    /// `uid`, `role`, `width`, `height`, `icons`, `particles`, `frames`.
    /// Dashed spellings (`data-dir`) are accepted for the path keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "data_dir" | "data-dir" => Some(self.paths.data_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "uid" => Some(self.user.uid.clone()),
            "role" => Some(self.user.role.clone()),
            "width" => Some(self.simulation.width.to_string()),
            "height" => Some(self.simulation.height.to_string()),
            "icons" => Some(self.simulation.icons.to_string()),
            "particles" => Some(self.simulation.particles.to_string()),
            "frames" => Some(self.simulation.frames.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_value(key, value)?,
            "data_dir" | "data-dir" => self.paths.data_dir = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "uid" => self.user.uid = value.to_string(),
            "role" => {
                let role = value.to_ascii_lowercase();
                if role != "student" && role != "admin" {
                    return Err(format!(
                        "Invalid value for 'role': '{value}' (expected student or admin)"
                    ));
                }
                self.user.role = role;
            }
            "width" => self.simulation.width = parse_value(key, value)?,
            "height" => self.simulation.height = parse_value(key, value)?,
            "icons" => self.simulation.icons = parse_value(key, value)?,
            "particles" => self.simulation.particles = parse_value(key, value)?,
            "frames" => self.simulation.frames = parse_value(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_dir" | "data-dir" => self.paths.data_dir.clone_from(&defaults.paths.data_dir),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "uid" => self.user.uid.clone_from(&defaults.user.uid),
            "role" => self.user.role.clone_from(&defaults.user.role),
            "width" => self.simulation.width = defaults.simulation.width,
            "height" => self.simulation.height = defaults.simulation.height,
            "icons" => self.simulation.icons = defaults.simulation.icons,
            "particles" => self.simulation.particles = defaults.simulation.particles,
            "frames" => self.simulation.frames = defaults.simulation.frames,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// Succeeds without doing anything if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn fill_string(target: &mut String, default: &str) -> bool {
    if target.is_empty() && !default.is_empty() {
        default.clone_into(target);
        true
    } else {
        false
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_dir = \"{}\"", self.paths.data_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[user]")?;
        writeln!(f, "  uid = \"{}\"", self.user.uid)?;
        writeln!(f, "  role = \"{}\"", self.user.role)?;

        writeln!(f, "\n[simulation]")?;
        writeln!(f, "  width = {}", self.simulation.width)?;
        writeln!(f, "  height = {}", self.simulation.height)?;
        writeln!(f, "  icons = {}", self.simulation.icons)?;
        writeln!(f, "  particles = {}", self.simulation.particles)?;
        writeln!(f, "  frames = {}", self.simulation.frames)?;

        Ok(())
    }
}
