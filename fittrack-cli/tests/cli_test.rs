use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Each test gets its own config dir so no real config is touched
fn fittrack(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fittrack").unwrap();
    cmd.env("FITTRACK_CONFIG_DIR", config_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn config_path_points_into_override_dir() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .arg("config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn history_lists_sample_workouts() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["history", "--search", "yoga"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sun Salutation"))
        .stdout(predicate::str::contains("Bench Press").not());
}

#[test]
fn history_csv_has_one_row_per_exercise() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["history", "--search", "swim", "--export-csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Date,Type,Duration_min,Exercise,Sets,Reps,Weight_kg,Notes",
        ))
        .stdout(predicate::str::contains("swimming,40,Freestyle"))
        .stdout(predicate::str::contains("swimming,40,Breaststroke"));
}

#[test]
fn log_reports_success() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args([
            "log", "-t", "running", "-m", "30", "-e", "Intervals:6", "-n", "windy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout logged successfully: Your Running workout has been added to your history.",
        ));
}

#[test]
fn log_with_bad_date_fails_with_field_error() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["log", "-t", "yoga", "-m", "20", "-d", "tomorrow", "-e", "Flow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("date: Please select a date"));
}

#[test]
fn log_rejects_non_numeric_sets() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["log", "-t", "strength", "-m", "45", "-e", "Squat:3x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sets must contain only numbers"));
}

#[test]
fn failed_log_in_shell_does_not_leak_into_next_one() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["set-sample-data", "false"])
        .assert()
        .success();
    fittrack(&dir)
        .arg("shell")
        .write_stdin(
            "log -t strength -m 0 -d 2020-01-01 -n stale -e A -e B -e C\n\
             log -t yoga -m 30 -e X\n\
             history --export-csv\n\
             exit\n",
        )
        .assert()
        .success()
        .stderr(predicate::str::contains("Duration must be at least 1 minute"))
        .stdout(predicate::str::contains(",yoga,30,X,,,,"))
        .stdout(predicate::str::contains("2020-01-01").not())
        .stdout(predicate::str::contains("stale").not())
        .stdout(predicate::str::contains("yoga,30,B").not())
        .stdout(predicate::str::contains("yoga,30,C").not());
}

#[test]
fn templates_are_listed_with_titles() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["templates", "--export-csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("full-body,Full Body Strength,strength,45"))
        .stdout(predicate::str::contains("hiit-cardio,HIIT Cardio Blast,hiit,30"));
}

#[test]
fn log_from_template_adds_extra_exercises() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["set-sample-data", "false"])
        .assert()
        .success();
    fittrack(&dir)
        .arg("shell")
        .write_stdin(
            "log --template upper-body -m 50 -e Plank\n\
             history --export-csv\n\
             exit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Your Strength Training workout has been added to your history.",
        ))
        .stdout(predicate::str::contains(",strength,50,Push-ups,3,15,,"))
        .stdout(predicate::str::contains(",strength,50,Plank,,,,"));
}

#[test]
fn report_defaults_are_saved() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["set-report-defaults", "--type", "workout", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Report defaults: workout report, range last30, format csv.",
        ));
    let config = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(config.contains("report_type = \"workout\""));
    fittrack(&dir)
        .args(["report", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Date,Workout Type,Duration,Exercises"));
}

#[test]
fn stats_show_sample_figures() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["stats", "--export-csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_workouts,24"))
        .stdout(predicate::str::contains("avg_duration_min,42"))
        .stdout(predicate::str::contains("most_common,strength"));
}

#[test]
fn join_toggles_within_one_invocation() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["join", "4", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Challenge joined: You've joined the Marathon Prep Challenge challenge",
        ))
        .stdout(predicate::str::contains("Challenge left"));
}

#[test]
fn join_refuses_challenges_that_are_not_upcoming() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["join", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Challenge 1 is not open for joining"));
}

#[test]
fn join_unknown_challenge_fails() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["join", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Challenge 42 not found"));
}

#[test]
fn challenges_filter_by_status() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["challenges", "--status", "completed", "--export-csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spring Fitness Challenge"))
        .stdout(predicate::str::contains("Marathon").not());
}

#[test]
fn create_challenge_validates() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args([
            "create-challenge",
            "--title",
            "No",
            "--description",
            "too short",
            "--start",
            "2025-04-01",
            "--end",
            "2025-04-30",
            "--type",
            "steps",
            "--goal",
            "10000 steps",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title: Title must be at least 3 characters."))
        .stderr(predicate::str::contains(
            "description: Description must be at least 10 characters.",
        ));
}

#[test]
fn export_writes_csv_file() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["export", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Data exported successfully"));
    let content = std::fs::read_to_string(out.path().join("fitness_data_export.csv")).unwrap();
    assert!(content.starts_with("Date,Workout Type,Duration,Exercises"));
}

#[test]
fn report_to_stdout_is_html() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args([
            "report",
            "--type",
            "progress",
            "--range",
            "all",
            "--without",
            "charts-graphs",
            "--stdout",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>FitTrack - Progress Report</h1>"))
        .stdout(predicate::str::contains("Charts &amp; Graphs").not())
        .stdout(predicate::str::contains("Custom report generated"));
}

#[test]
fn profile_update_is_validated() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["profile", "--email", "not-an-email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid email address."));
    fittrack(&dir)
        .args(["profile", "--name", "Jane Roe", "--level", "advanced"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile updated successfully"))
        .stdout(predicate::str::contains("Jane Roe"));
}

#[test]
fn goals_reset() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["goals", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goals reset"))
        .stdout(predicate::str::contains("Strength Training, HIIT"));
}

#[test]
fn sample_data_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["set-sample-data", "false"])
        .assert()
        .success();
    fittrack(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts found"));
}

#[test]
fn bad_header_color_is_rejected() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["set-header-color", "mauve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid color name: mauve"));
}

#[test]
fn shell_keeps_one_session_for_undo() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .arg("shell")
        .write_stdin("join 3\nundo\nundo\nchallenges --status upcoming --export-csv\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Challenge joined"))
        .stdout(predicate::str::contains(
            "Action undone: You've left the Summer Shred Challenge challenge",
        ))
        .stdout(predicate::str::contains("Nothing to undo."))
        .stdout(predicate::str::contains("3,Summer Shred Challenge,upcoming,245,false"));
}

#[test]
fn completion_script_is_generated() {
    let dir = TempDir::new().unwrap();
    fittrack(&dir)
        .args(["generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fittrack"));
}
