//! CLI argument definitions for `StudyHub`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use studyhub::config::ConfigOverrides;
use studyhub::core::models::SyllabusKey;
use studyhub::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// CLI role argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RoleArg {
    /// Regular user
    Student,
    /// Content maintainer
    Admin,
}

impl std::fmt::Display for RoleArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Selects a syllabus document: either an exam or a university semester
#[derive(Debug, Clone, Default, Args)]
pub struct SyllabusKeyArgs {
    /// Competitive exam name (e.g., "JEE Main")
    #[arg(long, value_name = "NAME", conflicts_with_all = ["university", "branch", "semester"])]
    pub exam: Option<String>,

    /// University name
    #[arg(long, value_name = "NAME", requires_all = ["branch", "semester"])]
    pub university: Option<String>,

    /// Branch / major
    #[arg(long, value_name = "NAME", requires = "university")]
    pub branch: Option<String>,

    /// Semester number
    #[arg(long, value_name = "N", requires = "university")]
    pub semester: Option<u8>,
}

impl SyllabusKeyArgs {
    /// Build the syllabus key
    ///
    /// # Errors
    /// Returns an error if neither `--exam` nor the full university triple was given
    pub fn to_key(&self) -> Result<SyllabusKey, String> {
        match (&self.exam, &self.university, &self.branch, self.semester) {
            (Some(exam), _, _, _) if !exam.trim().is_empty() => Ok(SyllabusKey::exam(exam.trim())),
            (None, Some(uni), Some(branch), Some(semester)) => {
                Ok(SyllabusKey::university(uni.trim(), branch.trim(), semester))
            }
            _ => Err(
                "Select a syllabus with --exam NAME or --university NAME --branch NAME --semester N"
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_dir`, `role`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum SyllabusSubcommand {
    /// Parse a raw syllabus text file and print it as JSON.
    ///
    /// Nothing is stored. Useful for checking a file before importing it.
    Parse {
        /// Raw syllabus text file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Write the JSON here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Parse a raw syllabus and merge it into the stored document (admin only).
    ///
    /// Subjects and topics matching stored ones by name keep their ids and
    /// resource links. Stored entries missing from the new text are dropped.
    Import {
        /// Raw syllabus text file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        #[command(flatten)]
        key: SyllabusKeyArgs,
    },
    /// Show a stored syllabus.
    Show {
        #[command(flatten)]
        key: SyllabusKeyArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum TodoSubcommand {
    /// Add a task.
    Add {
        /// Task title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Due time as RFC 3339 (`2025-05-01T18:00:00Z`) or a date (`2025-05-01`)
        #[arg(long, value_name = "WHEN")]
        due: String,

        /// Syllabus document id to link (as shown by `syllabus show`)
        #[arg(long, value_name = "DOC_ID", requires_all = ["subject", "topic"])]
        syllabus: Option<String>,

        /// Subject name or id within the linked syllabus
        #[arg(long, value_name = "SUBJECT", requires = "syllabus")]
        subject: Option<String>,

        /// Topic name within the subject
        #[arg(long, value_name = "TOPIC", requires = "syllabus")]
        topic: Option<String>,
    },
    /// List tasks, earliest due first.
    List {
        /// Hide completed tasks
        #[arg(long)]
        pending: bool,
    },
    /// Toggle a task's completion; linked topics are marked in progress too.
    Done {
        /// Task id or unique id prefix
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete a task.
    Rm {
        /// Task id or unique id prefix
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReviewSubcommand {
    /// Submit a review; it stays hidden until an admin approves it.
    Add {
        /// Rating from 1 to 5
        #[arg(long, value_name = "N")]
        rating: u8,

        /// Review text
        #[arg(value_name = "MESSAGE")]
        message: String,
    },
    /// Approve a review for public display (admin only).
    Approve {
        /// Review id or unique id prefix
        #[arg(value_name = "ID")]
        id: String,
    },
    /// List approved reviews, newest first.
    List {
        /// Include unapproved reviews (admin only)
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Parse, import, and inspect syllabi.
    Syllabus {
        #[command(subcommand)]
        subcommand: SyllabusSubcommand,
    },
    /// Manage the to-do list.
    Todo {
        #[command(subcommand)]
        subcommand: TodoSubcommand,
    },
    /// Show completion for a syllabus, optionally marking a topic first.
    Progress {
        #[command(flatten)]
        key: SyllabusKeyArgs,

        /// Subject name or id whose topic should be marked
        #[arg(long, value_name = "SUBJECT", requires = "topic")]
        mark: Option<String>,

        /// Topic to mark done
        #[arg(long, value_name = "TOPIC", requires = "mark")]
        topic: Option<String>,

        /// Mark the topic as not done instead
        #[arg(long, requires = "mark")]
        undo: bool,
    },
    /// Generate a syllabus progress report.
    Report {
        #[command(flatten)]
        key: SyllabusKeyArgs,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        /// Output file path (optional; defaults to the reports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Submit, moderate, and list reviews.
    Review {
        #[command(subcommand)]
        subcommand: ReviewSubcommand,
    },
    /// Run the floating-icon background simulation headless.
    ///
    /// Prints a summary; with --trace, writes one JSON frame per line.
    Simulate {
        /// Frames to run (defaults to config `simulation.frames`)
        #[arg(long, value_name = "N")]
        frames: Option<usize>,

        /// RNG seed for a reproducible run
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Canvas width in pixels
        #[arg(long, value_name = "PX")]
        width: Option<f64>,

        /// Canvas height in pixels
        #[arg(long, value_name = "PX")]
        height: Option<f64>,

        /// Number of icons
        #[arg(long, value_name = "N")]
        icons: Option<usize>,

        /// Number of particles
        #[arg(long, value_name = "N")]
        particles: Option<usize>,

        /// Write a JSON-lines frame trace to this file
        #[arg(long, value_name = "FILE")]
        trace: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "studyhub",
    about = "StudyHub command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the data directory holding syllabi, tasks, progress, and reviews
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the report output directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Act as this user id
    #[arg(long = "user", value_name = "UID")]
    pub user: Option<String>,

    /// Act with this role
    #[arg(long = "role", value_enum)]
    pub role: Option<RoleArg>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            data_dir: self
                .data_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            uid: self.user.clone(),
            role: self.role.map(|r| r.to_string()),
        }
    }
}
