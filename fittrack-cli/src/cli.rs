// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use fittrack_lib::{
    ChallengeKind, DateRange, FitnessLevel, PrimaryGoal, ReportFormat, ReportSection, ReportType,
    StatusFilter, WorkoutTemplate, WorkoutType,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fittrack", author, version, about = "Log workouts, join challenges and export fitness reports", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print CSV instead of tables where supported
    #[arg(long, global = true)]
    pub export_csv: bool,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkoutTypeCli {
    Strength,
    Cardio,
    Hiit,
    Yoga,
    Running,
    Cycling,
    Swimming,
    Other,
}

impl From<WorkoutTypeCli> for WorkoutType {
    fn from(value: WorkoutTypeCli) -> Self {
        match value {
            WorkoutTypeCli::Strength => Self::Strength,
            WorkoutTypeCli::Cardio => Self::Cardio,
            WorkoutTypeCli::Hiit => Self::Hiit,
            WorkoutTypeCli::Yoga => Self::Yoga,
            WorkoutTypeCli::Running => Self::Running,
            WorkoutTypeCli::Cycling => Self::Cycling,
            WorkoutTypeCli::Swimming => Self::Swimming,
            WorkoutTypeCli::Other => Self::Other,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a workout, optionally starting from a template
    Log {
        /// Start from a template (see `templates`); other options override it
        #[arg(long)]
        template: Option<WorkoutTemplate>,
        /// Workout type
        #[arg(short = 't', long = "type", value_enum, required_unless_present = "template")]
        type_: Option<WorkoutTypeCli>,
        /// Duration in minutes
        #[arg(short = 'm', long, required_unless_present = "template")]
        duration: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Exercise as NAME[:SETS[:REPS[:WEIGHT]]], repeatable (e.g. "Bench Press:3:10:60").
        /// With --template these are added after the template's exercises.
        #[arg(
            short,
            long = "exercise",
            value_name = "EXERCISE",
            required_unless_present = "template"
        )]
        exercises: Vec<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List the ready-made workouts
    Templates,
    /// Log one of the ready-made workouts
    LogTemplate {
        /// full-body, hiit-cardio or upper-body
        template: WorkoutTemplate,
    },
    /// List logged workouts, newest first
    History {
        /// Only workouts whose type or exercises contain this text
        #[arg(short, long)]
        search: Option<String>,
        /// Show at most N workouts (defaults to the configured history limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show workout statistics and the type breakdown
    Stats,
    /// List challenges
    Challenges {
        /// all, active, upcoming or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Only challenges whose title or description contain this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Join a challenge, or leave it if already joined
    Join {
        /// Challenge id(s); repeating an id toggles it again
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Create a new challenge
    CreateChallenge {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
        /// steps, workout-streak, weight-loss, strength, running or custom
        #[arg(short = 't', long = "type")]
        kind: ChallengeKind,
        /// What counts as success, e.g. "10000 steps"
        #[arg(long)]
        goal: String,
        /// Hide the challenge from other users
        #[arg(long)]
        private: bool,
    },
    /// Undo the last join or profile/goals change (shell only)
    Undo,
    /// Export all workouts as CSV
    Export {
        /// Directory to write the file into
        #[arg(short, long, default_value = ".", conflicts_with = "stdout")]
        output: PathBuf,
        /// Print the file to stdout instead
        #[arg(long)]
        stdout: bool,
    },
    /// Generate a custom report
    Report {
        /// comprehensive, workout, progress or goals
        #[arg(short = 't', long = "type")]
        report_type: Option<ReportType>,
        /// last30, last90, last180, last365 or all
        #[arg(short, long)]
        range: Option<DateRange>,
        /// pdf, csv or excel
        #[arg(short, long)]
        format: Option<ReportFormat>,
        /// Leave out a section: workout-data, progress-metrics, goal-tracking, charts-graphs
        #[arg(long = "without", value_name = "SECTION")]
        without: Vec<ReportSection>,
        /// Directory to write the file into
        #[arg(short, long, default_value = ".", conflicts_with = "stdout")]
        output: PathBuf,
        /// Print the report to stdout instead
        #[arg(long)]
        stdout: bool,
    },
    /// Show the profile, or update it when any option is given
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        age: Option<String>,
        /// Height in cm
        #[arg(long)]
        height: Option<String>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<String>,
        /// beginner, intermediate, advanced or athlete
        #[arg(long)]
        level: Option<FitnessLevel>,
    },
    /// Show fitness goals, or update them when any option is given
    Goals {
        /// weight-loss, muscle-gain, strength, endurance, flexibility or general-fitness
        #[arg(long)]
        primary: Option<PrimaryGoal>,
        /// Target weight in kg
        #[arg(long)]
        target_weight: Option<String>,
        /// Workouts per week
        #[arg(long)]
        weekly: Option<String>,
        /// Comma-separated workout preferences (e.g. "strength,yoga")
        #[arg(long, value_delimiter = ',')]
        preferences: Option<Vec<String>>,
        /// Restore the default goals
        #[arg(long, conflicts_with_all = ["primary", "target_weight", "weekly", "preferences"])]
        reset: bool,
    },
    /// Set the default number of rows shown by `history`
    SetHistoryLimit { limit: usize },
    /// Set the defaults the `report` command starts from
    SetReportDefaults {
        /// comprehensive, workout, progress or goals
        #[arg(short = 't', long = "type")]
        report_type: Option<ReportType>,
        /// last30, last90, last180, last365 or all
        #[arg(short, long)]
        range: Option<DateRange>,
        /// pdf, csv or excel
        #[arg(short, long)]
        format: Option<ReportFormat>,
    },
    /// Set the table header color (e.g. Green, DarkBlue)
    SetHeaderColor { color: String },
    /// Choose whether sessions start with the sample data
    SetSampleData {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Show the path to the config file
    ConfigPath,
    /// Start an interactive shell that keeps one session across commands
    Shell,
    /// Generate shell completion script
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_takes_repeated_exercises() {
        let cli = Cli::try_parse_from([
            "fittrack", "log", "-t", "strength", "-m", "45", "-e", "Squat:3:5", "-e", "Rows",
        ])
        .unwrap();
        match cli.command {
            Commands::Log {
                type_, exercises, ..
            } => {
                assert_eq!(type_, Some(WorkoutTypeCli::Strength));
                assert_eq!(exercises, vec!["Squat:3:5", "Rows"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_needs_type_unless_templated() {
        assert!(Cli::try_parse_from(["fittrack", "log", "-m", "30", "-e", "Rows"]).is_err());
        let cli = Cli::try_parse_from(["fittrack", "log", "--template", "upper-body"]).unwrap();
        match cli.command {
            Commands::Log {
                template,
                type_,
                duration,
                exercises,
                ..
            } => {
                assert_eq!(template, Some(WorkoutTemplate::UpperBody));
                assert_eq!(type_, None);
                assert_eq!(duration, None);
                assert!(exercises.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn report_parses_lib_enums() {
        let cli = Cli::try_parse_from([
            "fittrack", "report", "--type", "goals", "--range", "last90", "--without",
            "charts-graphs", "--stdout",
        ])
        .unwrap();
        match cli.command {
            Commands::Report {
                report_type,
                range,
                without,
                stdout,
                ..
            } => {
                assert_eq!(report_type, Some(ReportType::Goals));
                assert_eq!(range, Some(DateRange::Last90));
                assert_eq!(without, vec![ReportSection::ChartsGraphs]);
                assert!(stdout);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
