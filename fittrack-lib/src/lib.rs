// src/lib.rs
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod challenge;
mod config;
pub mod form;
pub mod membership;
pub mod model;
pub mod profile;
pub mod report;
pub mod session;
pub mod stats;
pub mod store;
pub mod template;
pub mod undo;
pub mod validation;

// --- Expose public types ---
pub use challenge::{
    Challenge, ChallengeBoard, ChallengeDraft, ChallengeKind, ChallengeStatus, StatusFilter,
};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, Error as ConfigError, ReportDefaults, StandardColor, Theme,
};
pub use form::{ExerciseDraft, ExerciseField, WorkoutDraft, WorkoutField, WorkoutForm};
pub use membership::{ChallengeId, Membership, MembershipSet};
pub use model::{Exercise, Metric, Workout, WorkoutType};
pub use profile::{FitnessLevel, Goals, GoalsDraft, PrimaryGoal, Profile, ProfileDraft};
pub use report::{
    DateRange, ExportArtifact, ExportError, ReportConfig, ReportFormat, ReportSection, ReportType,
};
pub use session::{Effect, Event, FormKind, Notification, Session};
pub use stats::{AggregateStats, TypeShare};
pub use store::WorkoutLog;
pub use template::WorkoutTemplate;
pub use undo::{UndoToken, Undoable};
pub use validation::FieldErrors;

/// Configuration plus the live session it configures.
pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
    pub session: Session,
}

impl AppService {
    /// Loads (or creates) the config file and starts a session dated today.
    /// # Errors
    /// Returns `anyhow::Error` if the config path cannot be determined or the file cannot be loaded.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        Ok(Self::with_config(
            config,
            config_path,
            Local::now().date_naive(),
        ))
    }

    /// Service over an already loaded config. Tests use this with a temp path.
    #[must_use]
    pub fn with_config(config: Config, config_path: PathBuf, today: NaiveDate) -> Self {
        let session = if config.seed_sample_data {
            Session::with_sample_data(today)
        } else {
            Session::new(today)
        }
        .with_report_config(ReportConfig::from_defaults(config.report));
        tracing::debug!(
            seeded = config.seed_sample_data,
            path = %config_path.display(),
            "Session started"
        );
        Self {
            config,
            config_path,
            session,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// # Errors
    /// - `ConfigError::InvalidHistoryLimit` if `limit` is 0.
    /// - `ConfigError` variants if saving fails.
    pub fn set_history_limit(&mut self, limit: usize) -> Result<(), ConfigError> {
        if limit == 0 {
            return Err(ConfigError::InvalidHistoryLimit);
        }
        self.config.history_limit = limit;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidColor` if the name is not a known color.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()
    }

    /// Takes effect from the next session.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_seed_sample_data(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.config.seed_sample_data = enabled;
        self.save_config()
    }

    /// Saves new report dialog defaults and applies them to the live session.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_report_defaults(&mut self, defaults: ReportDefaults) -> Result<(), ConfigError> {
        self.config.report = defaults;
        self.save_config()?;
        self.session.apply(Event::SetReportType(defaults.report_type));
        self.session.apply(Event::SetDateRange(defaults.date_range));
        self.session.apply(Event::SetReportFormat(defaults.format));
        Ok(())
    }

    /// The configured header color, falling back to the default theme's.
    #[must_use]
    pub fn header_color(&self) -> StandardColor {
        parse_color(&self.config.theme.header_color).unwrap_or(StandardColor::Green)
    }

    /// Feeds one event to the session.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        self.session.apply(event)
    }

    /// Newest workouts matching `query`, capped at the configured history limit.
    #[must_use]
    pub fn recent_workouts(&self, query: Option<&str>) -> Vec<&Workout> {
        let mut workouts = self.session.log().search(query.unwrap_or(""));
        workouts.truncate(self.config.history_limit);
        workouts
    }

    /// Parses a challenge id argument and checks the challenge can be joined.
    /// # Errors
    /// Returns an error if the text is not a number, no such challenge exists
    /// or the challenge is not upcoming.
    pub fn resolve_challenge_id(&self, identifier: &str) -> Result<ChallengeId> {
        let id: ChallengeId = identifier
            .trim()
            .trim_start_matches('#')
            .parse()
            .with_context(|| format!("'{identifier}' is not a challenge id"))?;
        let Some(challenge) = self.session.challenges().get(id) else {
            bail!("Challenge {id} not found");
        };
        if !challenge.status.is_joinable() {
            bail!(
                "Challenge {id} is not open for joining: {}",
                challenge.status
            );
        }
        Ok(id)
    }

    /// Writes an artifact into `dir` under its own file name.
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn write_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let path = dir.join(&artifact.file_name);
        fs::write(&path, &artifact.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = artifact.content.len(), "Wrote export");
        Ok(path)
    }
}
