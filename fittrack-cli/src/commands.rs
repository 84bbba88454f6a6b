// src/commands.rs
use anyhow::{bail, Context, Result};
use comfy_table::Color;
use std::io::{self, Write};
use std::path::Path;

use fittrack_lib::validation::accepts_numeric_input;
use fittrack_lib::{
    AppService, ChallengeDraft, Effect, Event, ExerciseField, GoalsDraft, ProfileDraft,
    WorkoutField, WorkoutTemplate, WorkoutType,
};

use crate::cli::Commands;
use crate::output;

/// Where downloads produced by a command go.
#[derive(Debug, Clone, Copy)]
enum Sink<'a> {
    Dir(&'a Path),
    Stdout,
}

impl<'a> Sink<'a> {
    const fn new(dir: &'a Path, stdout: bool) -> Self {
        if stdout {
            Self::Stdout
        } else {
            Self::Dir(dir)
        }
    }
}

/// Prints notifications, writes downloads and turns field errors into an error.
fn handle_effects(effects: Vec<Effect>, sink: Option<Sink<'_>>) -> Result<()> {
    let mut failed = false;
    for effect in effects {
        match effect {
            Effect::Notify(notification) => output::print_notification(&notification),
            Effect::FieldErrors { form, errors } => {
                output::print_field_errors(form, &errors);
                failed = true;
            }
            Effect::Download(artifact) => match sink {
                Some(Sink::Dir(dir)) => {
                    let path = AppService::write_artifact(&artifact, dir)?;
                    println!("Saved {} ({})", path.display(), artifact.mime_type);
                }
                Some(Sink::Stdout) => {
                    let mut stdout = io::stdout().lock();
                    stdout
                        .write_all(artifact.content.as_bytes())
                        .context("Failed to write export to stdout")?;
                    stdout.flush()?;
                }
                None => tracing::warn!(file = %artifact.file_name, "Download dropped"),
            },
        }
    }
    if failed {
        bail!("Validation failed");
    }
    Ok(())
}

/// Splits `NAME[:SETS[:REPS[:WEIGHT]]]`.
fn parse_exercise_spec(spec: &str) -> Result<[&str; 4]> {
    let mut parts = spec.split(':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let mut fields = [name, "", "", ""];
    for (slot, value) in fields.iter_mut().skip(1).zip(parts.by_ref()) {
        *slot = value;
    }
    if parts.next().is_some() {
        bail!("Too many ':' separated values in exercise '{spec}'");
    }
    for (label, value) in ["sets", "reps", "weight"].iter().zip(&fields[1..]) {
        if !accepts_numeric_input(value) {
            bail!("Exercise '{name}': {label} must contain only numbers (got '{value}')");
        }
    }
    Ok(fields)
}

fn header_color(service: &AppService) -> Color {
    Color::from(service.header_color())
}

/// Runs one parsed command against the service's session.
pub fn run(service: &mut AppService, command: Commands, export_csv: bool) -> Result<()> {
    match command {
        Commands::Log {
            template,
            type_,
            duration,
            date,
            exercises,
            notes,
        } => {
            if let Some(duration) = &duration {
                if !accepts_numeric_input(duration) {
                    bail!("Duration must contain only numbers (got '{duration}')");
                }
            }
            let rows = exercises
                .iter()
                .map(String::as_str)
                .map(parse_exercise_spec)
                .collect::<Result<Vec<_>>>()?;

            // The shell keeps its session, so never build on a previous draft
            let mut effects = service.dispatch(match template {
                Some(template) => Event::UseTemplate(template),
                None => Event::ResetWorkoutForm,
            });
            if let Some(type_) = type_ {
                let workout_type = WorkoutType::from(type_);
                effects.extend(service.dispatch(Event::SelectWorkoutType(workout_type)));
            }
            for (field, value) in [
                (WorkoutField::Duration, duration),
                (WorkoutField::Date, date),
                (WorkoutField::Notes, notes),
            ] {
                if let Some(value) = value {
                    effects.extend(service.dispatch(Event::SetWorkoutField { field, value }));
                }
            }

            // A blank form has one empty row to fill; a template's rows are kept
            let mut index = if template.is_some() {
                service.session.form().exercise_count()
            } else {
                0
            };
            for [name, sets, reps, weight] in rows {
                if index >= service.session.form().exercise_count() {
                    effects.extend(service.dispatch(Event::AddExercise));
                }
                for (field, value) in [
                    (ExerciseField::Name, name),
                    (ExerciseField::Sets, sets),
                    (ExerciseField::Reps, reps),
                    (ExerciseField::Weight, weight),
                ] {
                    effects.extend(service.dispatch(Event::UpdateExercise {
                        index,
                        field,
                        value: value.to_string(),
                    }));
                }
                index += 1;
            }
            effects.extend(service.dispatch(Event::SubmitWorkout));
            handle_effects(effects, None)?;
        }
        Commands::Templates => {
            let today = service.session.today();
            let templates: Vec<_> = WorkoutTemplate::ALL
                .iter()
                .map(|&template| (template, template.draft(today)))
                .collect();
            if export_csv {
                output::print_template_csv(&templates)?;
            } else {
                output::print_template_table(&templates, header_color(service));
            }
        }
        Commands::LogTemplate { template } => {
            let effects = service.dispatch(Event::LogTemplate(template));
            handle_effects(effects, None)?;
        }
        Commands::History { search, limit } => {
            let mut workouts = service.recent_workouts(search.as_deref());
            if let Some(limit) = limit {
                workouts.truncate(limit);
            }
            if workouts.is_empty() {
                println!("No workouts found matching the criteria.");
            } else if export_csv {
                output::print_workout_csv(&workouts)?;
            } else {
                output::print_workout_table(&workouts, header_color(service));
            }
        }
        Commands::Stats => {
            let log = service.session.log();
            let distribution = log.type_distribution();
            if export_csv {
                output::print_stats_csv(log.stats(), &distribution)?;
            } else {
                output::print_stats(log.stats(), &distribution, header_color(service));
            }
        }
        Commands::Challenges { status, search } => {
            let session = &service.session;
            let challenges = session
                .challenges()
                .filter(status, search.as_deref().unwrap_or(""));
            if challenges.is_empty() {
                println!("No challenges found matching the criteria.");
            } else if export_csv {
                output::print_challenge_csv(&challenges, session.memberships())?;
            } else {
                output::print_challenge_table(
                    &challenges,
                    session.memberships(),
                    header_color(service),
                );
            }
        }
        Commands::Join { ids } => {
            for identifier in &ids {
                let id = service.resolve_challenge_id(identifier)?;
                let effects = service.dispatch(Event::ToggleChallenge(id));
                handle_effects(effects, None)?;
            }
        }
        Commands::CreateChallenge {
            title,
            description,
            start,
            end,
            kind,
            goal,
            private,
        } => {
            let draft = ChallengeDraft {
                title,
                description,
                start_date: start,
                end_date: end,
                kind: kind.value().to_string(),
                goal,
                is_public: !private,
            };
            let effects = service.dispatch(Event::CreateChallenge(draft));
            handle_effects(effects, None)?;
        }
        Commands::Undo => match service.session.pending_undo() {
            Some(token) => {
                let effects = service.dispatch(Event::Undo(token));
                handle_effects(effects, None)?;
            }
            None => println!("Nothing to undo."),
        },
        Commands::Export { output, stdout } => {
            let effects = service.dispatch(Event::ExportData);
            handle_effects(effects, Some(Sink::new(&output, stdout)))?;
        }
        Commands::Report {
            report_type,
            range,
            format,
            without,
            output,
            stdout,
        } => {
            if let Some(report_type) = report_type {
                service.dispatch(Event::SetReportType(report_type));
            }
            if let Some(range) = range {
                service.dispatch(Event::SetDateRange(range));
            }
            if let Some(format) = format {
                service.dispatch(Event::SetReportFormat(format));
            }
            for section in without {
                if service.session.report_config().sections.is_enabled(section) {
                    service.dispatch(Event::ToggleReportSection(section));
                }
            }
            let effects = service.dispatch(Event::GenerateReport);
            handle_effects(effects, Some(Sink::new(&output, stdout)))?;
        }
        Commands::Profile {
            name,
            email,
            bio,
            age,
            height,
            weight,
            level,
        } => {
            let changed = name.is_some()
                || email.is_some()
                || bio.is_some()
                || age.is_some()
                || height.is_some()
                || weight.is_some()
                || level.is_some();
            if changed {
                let mut draft = ProfileDraft::from(service.session.profile());
                let fields = [
                    (&mut draft.name, name),
                    (&mut draft.email, email),
                    (&mut draft.bio, bio),
                    (&mut draft.age, age),
                    (&mut draft.height, height),
                    (&mut draft.weight, weight),
                    (&mut draft.fitness_level, level.map(|l| l.to_string())),
                ];
                for (slot, value) in fields {
                    if let Some(value) = value {
                        *slot = value;
                    }
                }
                let effects = service.dispatch(Event::UpdateProfile(draft));
                handle_effects(effects, None)?;
            }
            output::print_profile(service.session.profile(), header_color(service));
        }
        Commands::Goals {
            primary,
            target_weight,
            weekly,
            preferences,
            reset,
        } => {
            if reset {
                let effects = service.dispatch(Event::ResetGoals);
                handle_effects(effects, None)?;
            } else if primary.is_some()
                || target_weight.is_some()
                || weekly.is_some()
                || preferences.is_some()
            {
                let mut draft = GoalsDraft::from(service.session.goals());
                if let Some(primary) = primary {
                    draft.primary_goal = primary.to_string();
                }
                if let Some(target_weight) = target_weight {
                    draft.target_weight = target_weight;
                }
                if let Some(weekly) = weekly {
                    draft.weekly_workouts = weekly;
                }
                if let Some(preferences) = preferences {
                    draft.preferences = preferences
                        .into_iter()
                        .filter(|p| !p.trim().is_empty())
                        .collect();
                }
                let effects = service.dispatch(Event::UpdateGoals(draft));
                handle_effects(effects, None)?;
            }
            output::print_goals(service.session.goals(), header_color(service));
        }
        Commands::SetHistoryLimit { limit } => {
            service
                .set_history_limit(limit)
                .context("Failed to set history limit")?;
            println!("History limit set to {limit}.");
        }
        Commands::SetReportDefaults {
            report_type,
            range,
            format,
        } => {
            let mut defaults = service.config.report;
            if let Some(report_type) = report_type {
                defaults.report_type = report_type;
            }
            if let Some(range) = range {
                defaults.date_range = range;
            }
            if let Some(format) = format {
                defaults.format = format;
            }
            service
                .set_report_defaults(defaults)
                .context("Failed to set report defaults")?;
            println!(
                "Report defaults: {} report, range {}, format {}.",
                defaults.report_type, defaults.date_range, defaults.format
            );
        }
        Commands::SetHeaderColor { color } => {
            service
                .set_header_color(&color)
                .context("Failed to set header color")?;
            println!("Header color set to {}.", service.config.theme.header_color);
        }
        Commands::SetSampleData { enabled } => {
            service
                .set_seed_sample_data(enabled)
                .context("Failed to update sample data setting")?;
            println!(
                "Sample data {} for new sessions.",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        Commands::ConfigPath => {
            println!("{}", service.get_config_path().display());
        }
        Commands::Shell | Commands::GenerateCompletion { .. } => {
            bail!("This command cannot be run from here");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_spec_fills_missing_parts() {
        assert_eq!(
            parse_exercise_spec("Bench Press:3:10:60").unwrap(),
            ["Bench Press", "3", "10", "60"]
        );
        assert_eq!(parse_exercise_spec("Rows").unwrap(), ["Rows", "", "", ""]);
        assert_eq!(parse_exercise_spec("Dips::12").unwrap(), ["Dips", "", "12", ""]);
    }

    #[test]
    fn exercise_spec_rejects_bad_numbers() {
        assert!(parse_exercise_spec("Squat:3x").is_err());
        assert!(parse_exercise_spec("Squat:1:2:3:4").is_err());
    }
}
