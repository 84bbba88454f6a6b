// src/output.rs
use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io;

use fittrack_lib::{
    AggregateStats, Challenge, ChallengeStatus, FieldErrors, FormKind, Goals, MembershipSet,
    Notification, Profile, TypeShare, Workout, WorkoutDraft, WorkoutTemplate,
};

fn dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn header(labels: &[&str], color: Color) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).fg(color).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(labels: &[&str], color: Color) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(labels, color));
    table
}

pub fn print_notification(notification: &Notification) {
    println!("{}: {}", notification.title, notification.description);
    if notification.undo.is_some() {
        println!("  (run `undo` in the shell to revert)");
    }
}

pub fn print_field_errors(form: FormKind, errors: &FieldErrors) {
    eprintln!("{form:?} form has errors:");
    for (path, message) in errors.iter() {
        eprintln!("  {path}: {message}");
    }
}

fn exercise_summary(workout: &Workout) -> String {
    workout
        .exercises
        .iter()
        .map(|e| {
            let detail = match (e.sets, e.reps) {
                (Some(s), Some(r)) => format!(" {s}x{r}"),
                (Some(s), None) => format!(" {s} sets"),
                (None, Some(r)) => format!(" {r} reps"),
                (None, None) => String::new(),
            };
            let weight = e.weight.map(|w| format!(" @{w}kg")).unwrap_or_default();
            format!("{}{detail}{weight}", e.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints workouts in a formatted table.
pub fn print_workout_table(workouts: &[&Workout], header_color: Color) {
    let mut table = new_table(
        &["Date", "Type", "Duration (min)", "Exercises", "Metrics", "Notes"],
        header_color,
    );
    for workout in workouts {
        let metrics = workout
            .metrics
            .iter()
            .map(|m| format!("{}: {}", m.name, m.value))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(workout.date.format("%Y-%m-%d").to_string()),
            Cell::new(workout.workout_type.label()),
            Cell::new(workout.duration_minutes.to_string()),
            Cell::new(exercise_summary(workout)),
            Cell::new(if metrics.is_empty() { "-".to_string() } else { metrics }),
            Cell::new(workout.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

fn template_exercises(draft: &WorkoutDraft) -> Vec<&str> {
    draft.exercises.iter().map(|e| e.name.as_str()).collect()
}

pub fn print_template_table(templates: &[(WorkoutTemplate, WorkoutDraft)], header_color: Color) {
    let mut table = new_table(
        &["Template", "Title", "Type", "Duration (min)", "Exercises"],
        header_color,
    );
    for (template, draft) in templates {
        table.add_row(vec![
            Cell::new(template),
            Cell::new(template.title()),
            Cell::new(dash(draft.workout_type)),
            Cell::new(&draft.duration),
            Cell::new(template_exercises(draft).join("\n")),
        ]);
    }
    println!("{table}");
}

pub fn print_template_csv(templates: &[(WorkoutTemplate, WorkoutDraft)]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Template", "Title", "Type", "Duration_min", "Exercises"])?;
    for (template, draft) in templates {
        writer.write_record([
            template.to_string(),
            template.title().to_string(),
            draft.workout_type.map(|t| t.value().to_string()).unwrap_or_default(),
            draft.duration.clone(),
            template_exercises(draft).join("; "),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per exercise so sets/reps/weight stay machine readable.
pub fn print_workout_csv(workouts: &[&Workout]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "Date", "Type", "Duration_min", "Exercise", "Sets", "Reps", "Weight_kg", "Notes",
    ])?;
    for workout in workouts {
        for exercise in &workout.exercises {
            writer.write_record([
                workout.date.format("%Y-%m-%d").to_string(),
                workout.workout_type.value().to_string(),
                workout.duration_minutes.to_string(),
                exercise.name.clone(),
                exercise.sets.map(|v| v.to_string()).unwrap_or_default(),
                exercise.reps.map(|v| v.to_string()).unwrap_or_default(),
                exercise.weight.map(|v| v.to_string()).unwrap_or_default(),
                workout.notes.clone().unwrap_or_default(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn print_stats(stats: &AggregateStats, distribution: &[TypeShare], header_color: Color) {
    let mut table = new_table(&["Metric", "Value"], header_color);
    table.add_row(vec!["Total Workouts".to_string(), stats.total_count.to_string()]);
    table.add_row(vec![
        "This Month".to_string(),
        stats.current_period_count.to_string(),
    ]);
    table.add_row(vec![
        "Avg. Duration".to_string(),
        format!("{} min", stats.average_duration),
    ]);
    table.add_row(vec![
        "Most Common".to_string(),
        dash(stats.most_frequent_type.map(|t| t.label())),
    ]);
    println!("{table}");

    if distribution.is_empty() {
        return;
    }
    let mut table = new_table(&["Type", "Workouts", "Share"], header_color);
    for share in distribution {
        table.add_row(vec![
            share.workout_type.label().to_string(),
            share.count.to_string(),
            format!("{}%", share.percent),
        ]);
    }
    println!("{table}");
}

pub fn print_stats_csv(stats: &AggregateStats, distribution: &[TypeShare]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Metric", "Value"])?;
    writer.write_record(["total_workouts", &stats.total_count.to_string()])?;
    writer.write_record(["this_month", &stats.current_period_count.to_string()])?;
    writer.write_record(["avg_duration_min", &stats.average_duration.to_string()])?;
    writer.write_record([
        "most_common",
        stats.most_frequent_type.map_or("", |t| t.value()),
    ])?;
    for share in distribution {
        writer.write_record([
            format!("share_{}", share.workout_type.value()),
            share.percent.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn status_cell(status: ChallengeStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        ChallengeStatus::Active { .. } => cell.fg(Color::Green),
        ChallengeStatus::Upcoming { .. } => cell.fg(Color::Yellow),
        ChallengeStatus::Completed { .. } => cell.fg(Color::DarkGrey),
    }
}

pub fn print_challenge_table(
    challenges: &[&Challenge],
    memberships: &MembershipSet,
    header_color: Color,
) {
    let mut table = new_table(
        &["ID", "Title", "Description", "Status", "Participants", "Joined"],
        header_color,
    );
    for challenge in challenges {
        let joined = memberships.is_joined(challenge.id);
        table.add_row(vec![
            Cell::new(challenge.id.to_string()),
            Cell::new(&challenge.title),
            Cell::new(&challenge.description),
            status_cell(challenge.status),
            Cell::new(challenge.participants.to_string()),
            Cell::new(if joined { "yes" } else { "-" }),
        ]);
    }
    println!("{table}");
}

pub fn print_challenge_csv(challenges: &[&Challenge], memberships: &MembershipSet) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Id", "Title", "Status", "Participants", "Joined"])?;
    for challenge in challenges {
        let status = match challenge.status {
            ChallengeStatus::Active { .. } => "active",
            ChallengeStatus::Upcoming { .. } => "upcoming",
            ChallengeStatus::Completed { .. } => "completed",
        };
        writer.write_record([
            challenge.id.to_string(),
            challenge.title.clone(),
            status.to_string(),
            challenge.participants.to_string(),
            memberships.is_joined(challenge.id).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn print_profile(profile: &Profile, header_color: Color) {
    let mut table = new_table(&["Profile", ""], header_color);
    table.add_row(vec!["Name".to_string(), profile.name.clone()]);
    table.add_row(vec!["Email".to_string(), profile.email.clone()]);
    table.add_row(vec!["Bio".to_string(), dash(profile.bio.as_deref())]);
    table.add_row(vec!["Age".to_string(), dash(profile.age)]);
    table.add_row(vec![
        "Height".to_string(),
        dash(profile.height.map(|h| format!("{h} cm"))),
    ]);
    table.add_row(vec![
        "Weight".to_string(),
        dash(profile.weight.map(|w| format!("{w} kg"))),
    ]);
    table.add_row(vec![
        "Fitness Level".to_string(),
        profile.fitness_level.to_string(),
    ]);
    println!("{table}");
}

pub fn print_goals(goals: &Goals, header_color: Color) {
    let mut table = new_table(&["Goals", ""], header_color);
    table.add_row(vec![
        "Primary Goal".to_string(),
        goals.primary_goal.label().to_string(),
    ]);
    table.add_row(vec![
        "Target Weight".to_string(),
        dash(goals.target_weight.map(|w| format!("{w} kg"))),
    ]);
    table.add_row(vec![
        "Weekly Workouts".to_string(),
        dash(goals.weekly_workouts),
    ]);
    let preferences = goals
        .preferences
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec![
        "Preferences".to_string(),
        if preferences.is_empty() { "-".to_string() } else { preferences },
    ]);
    println!("{table}");
}
