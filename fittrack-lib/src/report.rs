// src/report.rs
use chrono::{Duration, NaiveDate};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::config::ReportDefaults;
use crate::model::Workout;
use crate::profile::Goals;
use crate::store::WorkoutLog;
use crate::validation::DATE_FORMAT;

pub const DATA_EXPORT_FILE_NAME: &str = "fitness_data_export.csv";
pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const HTML_MIME: &str = "text/html";

const CSV_HEADER: [&str; 4] = ["Date", "Workout Type", "Duration", "Exercises"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Failed to render report template: {0}")]
    Template(#[from] handlebars::RenderError),
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Comprehensive,
    Workout,
    Progress,
    Goals,
}

impl ReportType {
    /// Capitalised form used in report titles.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Comprehensive => "Comprehensive",
            Self::Workout => "Workout",
            Self::Progress => "Progress",
            Self::Goals => "Goals",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Last30,
    Last90,
    Last180,
    Last365,
    All,
}

impl DateRange {
    #[must_use]
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::Last30 => Some(30),
            Self::Last90 => Some(90),
            Self::Last180 => Some(180),
            Self::Last365 => Some(365),
            Self::All => None,
        }
    }

    /// Earliest date included when generating on `today`.
    #[must_use]
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|days| today - Duration::days(days))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
    Excel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ReportSection {
    WorkoutData,
    ProgressMetrics,
    GoalTracking,
    ChartsGraphs,
}

impl ReportSection {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WorkoutData => "Workout Data",
            Self::ProgressMetrics => "Progress Metrics",
            Self::GoalTracking => "Goal Tracking",
            Self::ChartsGraphs => "Charts & Graphs",
        }
    }
}

/// Which sections a custom report includes. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSections {
    pub workout_data: bool,
    pub progress_metrics: bool,
    pub goal_tracking: bool,
    pub charts_graphs: bool,
}

impl Default for ReportSections {
    fn default() -> Self {
        Self {
            workout_data: true,
            progress_metrics: true,
            goal_tracking: true,
            charts_graphs: true,
        }
    }
}

impl ReportSections {
    fn slot(&mut self, section: ReportSection) -> &mut bool {
        match section {
            ReportSection::WorkoutData => &mut self.workout_data,
            ReportSection::ProgressMetrics => &mut self.progress_metrics,
            ReportSection::GoalTracking => &mut self.goal_tracking,
            ReportSection::ChartsGraphs => &mut self.charts_graphs,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self, section: ReportSection) -> bool {
        match section {
            ReportSection::WorkoutData => self.workout_data,
            ReportSection::ProgressMetrics => self.progress_metrics,
            ReportSection::GoalTracking => self.goal_tracking,
            ReportSection::ChartsGraphs => self.charts_graphs,
        }
    }

    /// Flips one section and returns its new state.
    pub fn toggle(&mut self, section: ReportSection) -> bool {
        let slot = self.slot(section);
        *slot = !*slot;
        *slot
    }
}

/// State of the custom report dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportConfig {
    pub report_type: ReportType,
    pub date_range: DateRange,
    pub format: ReportFormat,
    pub sections: ReportSections,
}

impl ReportConfig {
    #[must_use]
    pub fn from_defaults(defaults: ReportDefaults) -> Self {
        Self {
            report_type: defaults.report_type,
            date_range: defaults.date_range,
            format: defaults.format,
            sections: ReportSections::default(),
        }
    }

    pub fn toggle_section(&mut self, section: ReportSection) -> bool {
        let enabled = self.sections.toggle(section);
        tracing::debug!(%section, enabled, "Toggled report section");
        enabled
    }

    /// `fittrack_<type>_report.<format>`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("fittrack_{}_report.{}", self.report_type, self.format)
    }
}

/// A finished export, ready to be written wherever the caller wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// Everything a report can draw on.
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    pub log: &'a WorkoutLog,
    pub goals: &'a Goals,
}

fn duration_cell(workout: &Workout) -> String {
    format!("{} min", workout.duration_minutes)
}

fn exercises_cell(workout: &Workout) -> String {
    workout.exercise_names().join(", ")
}

fn write_csv<'a, I>(workouts: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Workout>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for workout in workouts {
        writer.write_record([
            workout.date.format(DATE_FORMAT).to_string(),
            workout.workout_type.label().to_string(),
            duration_cell(workout),
            exercises_cell(workout),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// CSV of the given workouts in the order supplied.
/// # Errors
/// Returns `ExportError` if the CSV writer fails.
pub fn export_csv<'a, I>(workouts: I) -> Result<ExportArtifact, ExportError>
where
    I: IntoIterator<Item = &'a Workout>,
{
    let content = write_csv(workouts)?;
    tracing::info!(bytes = content.len(), "Exported workout data");
    Ok(ExportArtifact {
        file_name: DATA_EXPORT_FILE_NAME.to_string(),
        mime_type: CSV_MIME,
        content,
    })
}

const REPORT_TEMPLATE: &str = r#"<html>
<head>
  <title>FitTrack - {{title}} Report</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 40px; }
    h1 { color: #333; }
    .section { margin-bottom: 20px; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
    th { background-color: #f2f2f2; }
  </style>
</head>
<body>
  <h1>FitTrack - {{title}} Report</h1>
  <p>Generated on {{generated}}</p>
  <p>Period: {{period}}</p>
{{#if sections.workout_data}}
  <div class="section">
    <h2>Workout Data</h2>
    {{#if rows}}
    <table>
      <tr><th>Date</th><th>Workout Type</th><th>Duration</th><th>Exercises</th></tr>
      {{#each rows}}
      <tr><td>{{date}}</td><td>{{workout_type}}</td><td>{{duration}}</td><td>{{exercises}}</td></tr>
      {{/each}}
    </table>
    {{else}}
    <p>No workouts in this period.</p>
    {{/if}}
  </div>
{{/if}}
{{#if sections.progress_metrics}}
  <div class="section">
    <h2>Progress Metrics</h2>
    <p>Total Workouts: {{stats.total_count}}</p>
    <p>This Month: {{stats.current_period_count}}</p>
    <p>Average Duration: {{stats.average_duration}} min</p>
    <p>Most Frequent: {{most_frequent}}</p>
  </div>
{{/if}}
{{#if sections.goal_tracking}}
  <div class="section">
    <h2>Goal Tracking</h2>
    <p>Primary Goal: {{goals.primary}}</p>
    {{#if goals.target_weight}}<p>Target Weight: {{goals.target_weight}} kg</p>{{/if}}
    {{#if goals.weekly_target}}<p>Weekly Workouts: {{goals.this_week}} of {{goals.weekly_target}}</p>{{/if}}
    {{#if goals.preferences}}<p>Preferences: {{goals.preferences}}</p>{{/if}}
  </div>
{{/if}}
{{#if sections.charts_graphs}}
  <div class="section">
    <h2>Charts &amp; Graphs</h2>
    <table>
      <tr><th>Workout Type</th><th>Count</th><th>Share</th></tr>
      {{#each distribution}}
      <tr><td>{{label}}</td><td>{{count}}</td><td>{{percent}}%</td></tr>
      {{/each}}
    </table>
  </div>
{{/if}}
</body>
</html>
"#;

fn render_html(
    config: &ReportConfig,
    data: &ReportData<'_>,
    rows: &[&Workout],
    today: NaiveDate,
) -> Result<String, ExportError> {
    let this_week = data.log.since(Some(today - Duration::days(6))).len();
    let stats = data.log.stats();
    let rows: Vec<_> = rows
        .iter()
        .map(|w| {
            json!({
                "date": w.date.format(DATE_FORMAT).to_string(),
                "workout_type": w.workout_type.label(),
                "duration": duration_cell(w),
                "exercises": exercises_cell(w),
            })
        })
        .collect();
    let distribution: Vec<_> = data
        .log
        .type_distribution()
        .iter()
        .map(|share| {
            json!({
                "label": share.workout_type.label(),
                "count": share.count,
                "percent": share.percent,
            })
        })
        .collect();
    let preferences = data
        .goals
        .preferences
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ");
    let period = config
        .date_range
        .start(today)
        .map_or_else(|| "All time".to_string(), |start| {
            format!("{} to {}", start.format(DATE_FORMAT), today.format(DATE_FORMAT))
        });

    let context = json!({
        "title": config.report_type.title(),
        "generated": today.format(DATE_FORMAT).to_string(),
        "period": period,
        "sections": config.sections,
        "rows": rows,
        "stats": stats,
        "most_frequent": stats.most_frequent_type.map_or("None", |t| t.label()),
        "goals": {
            "primary": data.goals.primary_goal.label(),
            "target_weight": data.goals.target_weight,
            "weekly_target": data.goals.weekly_workouts,
            "this_week": this_week,
            "preferences": preferences,
        },
        "distribution": distribution,
    });

    let hbs = Handlebars::new();
    Ok(hbs.render_template(REPORT_TEMPLATE, &context)?)
}

/// Builds the custom report. `csv` yields the filtered workout rows; the
/// other formats yield an HTML document under the requested extension.
/// # Errors
/// Returns `ExportError` if CSV writing or template rendering fails.
pub fn generate_report(
    config: &ReportConfig,
    data: &ReportData<'_>,
    today: NaiveDate,
) -> Result<ExportArtifact, ExportError> {
    let rows = data.log.since(config.date_range.start(today));
    tracing::info!(
        report_type = %config.report_type,
        range = %config.date_range,
        format = %config.format,
        rows = rows.len(),
        "Generating report"
    );

    let (mime_type, content) = match config.format {
        ReportFormat::Csv => (CSV_MIME, write_csv(rows.iter().copied())?),
        ReportFormat::Pdf | ReportFormat::Excel => {
            (HTML_MIME, render_html(config, data, &rows, today)?)
        }
    };
    Ok(ExportArtifact {
        file_name: config.file_name(),
        mime_type,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exercise, WorkoutType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn workout(days_ago: i64, workout_type: WorkoutType, names: &[&str]) -> Workout {
        Workout {
            workout_type,
            date: today() - Duration::days(days_ago),
            duration_minutes: 45,
            exercises: names.iter().map(|n| Exercise::named(*n)).collect(),
            notes: None,
            metrics: vec![],
        }
    }

    #[test]
    fn csv_columns_and_quoting() {
        let workouts = [
            workout(0, WorkoutType::Strength, &["Bench Press", "Squats"]),
            workout(2, WorkoutType::Running, &["5K Run"]),
        ];
        let artifact = export_csv(&workouts).unwrap();
        assert_eq!(artifact.file_name, "fitness_data_export.csv");
        assert_eq!(artifact.mime_type, CSV_MIME);
        let lines: Vec<_> = artifact.content.lines().collect();
        assert_eq!(lines[0], "Date,Workout Type,Duration,Exercises");
        assert_eq!(
            lines[1],
            "2025-03-20,Strength Training,45 min,\"Bench Press, Squats\""
        );
        assert_eq!(lines[2], "2025-03-18,Running,45 min,5K Run");
    }

    #[test]
    fn sections_toggle() {
        let mut config = ReportConfig::default();
        assert!(config.sections.is_enabled(ReportSection::GoalTracking));
        assert!(!config.toggle_section(ReportSection::GoalTracking));
        assert!(!config.sections.is_enabled(ReportSection::GoalTracking));
        assert!(config.toggle_section(ReportSection::GoalTracking));
    }

    #[test]
    fn file_name_uses_type_and_format() {
        let config = ReportConfig {
            report_type: ReportType::Progress,
            format: ReportFormat::Excel,
            ..ReportConfig::default()
        };
        assert_eq!(config.file_name(), "fittrack_progress_report.excel");
        assert_eq!(
            ReportConfig::default().file_name(),
            "fittrack_comprehensive_report.pdf"
        );
    }

    fn log_of(workouts: Vec<Workout>) -> WorkoutLog {
        let mut log = WorkoutLog::new();
        for workout in workouts {
            log.record(workout);
        }
        log
    }

    #[test]
    fn html_report_renders_enabled_sections_and_escapes() {
        let log = log_of(vec![
            workout(40, WorkoutType::Cycling, &["Old ride"]),
            workout(1, WorkoutType::Yoga, &["<Sun> & Moon"]),
        ]);
        let goals = Goals::default();
        let data = ReportData {
            log: &log,
            goals: &goals,
        };
        let mut config = ReportConfig::default();
        config.toggle_section(ReportSection::ChartsGraphs);
        let artifact = generate_report(&config, &data, today()).unwrap();
        assert_eq!(artifact.mime_type, HTML_MIME);
        let html = &artifact.content;
        assert!(html.contains("<h1>FitTrack - Comprehensive Report</h1>"));
        assert!(html.contains("Generated on 2025-03-20"));
        assert!(html.contains("&lt;Sun&gt; &amp; Moon"));
        assert!(!html.contains("Old ride"), "outside the 30 day range");
        assert!(html.contains("Primary Goal: Strength"));
        assert!(html.contains("Average Duration: 45 min"));
        assert!(html.contains("Weekly Workouts: 1 of 4"));
        assert!(!html.contains("Charts &amp; Graphs"));
    }

    #[test]
    fn csv_report_filters_by_range() {
        let log = log_of(vec![
            workout(100, WorkoutType::Running, &["Long"]),
            workout(10, WorkoutType::Running, &["Tempo"]),
        ]);
        let goals = Goals::default();
        let data = ReportData {
            log: &log,
            goals: &goals,
        };
        let config = ReportConfig {
            report_type: ReportType::Workout,
            date_range: DateRange::Last90,
            format: ReportFormat::Csv,
            ..ReportConfig::default()
        };
        let artifact = generate_report(&config, &data, today()).unwrap();
        assert_eq!(artifact.file_name, "fittrack_workout_report.csv");
        assert_eq!(artifact.content.lines().count(), 2);
        assert!(artifact.content.contains("Tempo"));

        let all = ReportConfig {
            date_range: DateRange::All,
            ..config
        };
        let artifact = generate_report(&all, &data, today()).unwrap();
        assert_eq!(artifact.content.lines().count(), 3);
    }
}
