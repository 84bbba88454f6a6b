// src/form.rs
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use strum_macros::{EnumIter, EnumString};

use crate::model::{Exercise, Workout, WorkoutType};
use crate::store::WorkoutLog;
use crate::validation::{self, accepts_numeric_input, is_digits, FieldErrors, DATE_FORMAT};

/// Editable fields of one exercise row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExerciseField {
    Name,
    Sets,
    Reps,
    Weight,
}

impl ExerciseField {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::Name)
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Sets => "sets",
            Self::Reps => "reps",
            Self::Weight => "weight",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Sets => "Sets",
            Self::Reps => "Reps",
            Self::Weight => "Weight",
        }
    }
}

impl fmt::Display for ExerciseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw text of one exercise row as typed. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseDraft {
    pub name: String,
    pub sets: String,
    pub reps: String,
    pub weight: String,
}

impl ExerciseDraft {
    #[must_use]
    pub fn get(&self, field: ExerciseField) -> &str {
        match field {
            ExerciseField::Name => &self.name,
            ExerciseField::Sets => &self.sets,
            ExerciseField::Reps => &self.reps,
            ExerciseField::Weight => &self.weight,
        }
    }

    fn slot(&mut self, field: ExerciseField) -> &mut String {
        match field {
            ExerciseField::Name => &mut self.name,
            ExerciseField::Sets => &mut self.sets,
            ExerciseField::Reps => &mut self.reps,
            ExerciseField::Weight => &mut self.weight,
        }
    }
}

/// Raw state of the "log workout" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDraft {
    pub workout_type: Option<WorkoutType>,
    /// `YYYY-MM-DD`, coerced to a date during validation.
    pub date: String,
    /// Minutes as typed.
    pub duration: String,
    pub exercises: Vec<ExerciseDraft>,
    pub notes: String,
}

impl WorkoutDraft {
    /// Blank draft dated `date`, with the single mandatory exercise row.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            workout_type: None,
            date: date.format(DATE_FORMAT).to_string(),
            duration: String::new(),
            exercises: vec![ExerciseDraft::default()],
            notes: String::new(),
        }
    }
}

/// Top-level (non-exercise) fields of the workout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutField {
    Type,
    Date,
    Duration,
    Notes,
}

impl WorkoutField {
    const fn path(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Date => "date",
            Self::Duration => "duration",
            Self::Notes => "notes",
        }
    }
}

/// Validates a draft into a `Workout`, or returns every failing field path.
/// # Errors
/// Returns the field-path keyed messages when any field is invalid.
pub fn validate_workout(draft: &WorkoutDraft) -> Result<Workout, FieldErrors> {
    let mut errors = FieldErrors::new();

    if draft.workout_type.is_none() {
        errors.add("type", "Please select a workout type");
    }

    let date = validation::parse_form_date(&draft.date);
    if date.is_none() {
        errors.add("date", "Please select a date");
    }

    let duration = if is_digits(&draft.duration) {
        match draft.duration.parse::<u32>() {
            Ok(0) => {
                errors.add("duration", "Duration must be at least 1 minute");
                None
            }
            Ok(minutes) => Some(minutes),
            Err(_) => {
                errors.add("duration", "Duration is too large");
                None
            }
        }
    } else {
        errors.add("duration", "Duration must contain only numbers");
        None
    };

    if draft.exercises.is_empty() {
        errors.add("exercises", "Add at least one exercise");
    }

    let mut exercises = Vec::with_capacity(draft.exercises.len());
    for (index, row) in draft.exercises.iter().enumerate() {
        if row.name.trim().is_empty() {
            errors.add(
                format!("exercises.{index}.name"),
                "Exercise name is required",
            );
        }
        let mut numeric = |field: ExerciseField| -> Option<u32> {
            let raw = row.get(field);
            if raw.is_empty() {
                return None;
            }
            let path = format!("exercises.{index}.{}", field.key());
            if !is_digits(raw) {
                errors.add(path, format!("{} must contain only numbers", field.label()));
                return None;
            }
            raw.parse::<u32>().map_or_else(
                |_| {
                    errors.add(path, format!("{} is too large", field.label()));
                    None
                },
                Some,
            )
        };
        let sets = numeric(ExerciseField::Sets);
        let reps = numeric(ExerciseField::Reps);
        let weight = numeric(ExerciseField::Weight);
        exercises.push(Exercise {
            name: row.name.trim().to_string(),
            sets,
            reps,
            weight,
        });
    }

    let (Some(workout_type), Some(date), Some(duration_minutes)) =
        (draft.workout_type, date, duration)
    else {
        return Err(errors);
    };

    let notes = draft.notes.trim();
    errors.into_result(Workout {
        workout_type,
        date,
        duration_minutes,
        exercises,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        metrics: Vec::new(),
    })
}

/// The "log workout" form: a draft plus the errors surfaced by the last submit.
#[derive(Debug, Clone)]
pub struct WorkoutForm {
    draft: WorkoutDraft,
    errors: FieldErrors,
    default_date: NaiveDate,
}

impl WorkoutForm {
    /// Blank form whose date field starts at `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            draft: WorkoutDraft::new(today),
            errors: FieldErrors::new(),
            default_date: today,
        }
    }

    /// Form pre-filled from a template draft.
    #[must_use]
    pub fn from_draft(draft: WorkoutDraft, today: NaiveDate) -> Self {
        Self {
            draft,
            errors: FieldErrors::new(),
            default_date: today,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &WorkoutDraft {
        &self.draft
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.draft.exercises.len()
    }

    /// Appends a blank exercise row.
    pub fn add_entry(&mut self) {
        self.draft.exercises.push(ExerciseDraft::default());
        tracing::debug!(count = self.draft.exercises.len(), "Added exercise row");
    }

    /// Removes the row at `index`. Refused for the last remaining row and for
    /// out-of-range indices. Returns whether a row was removed.
    pub fn remove_entry(&mut self, index: usize) -> bool {
        if self.draft.exercises.len() <= 1 || index >= self.draft.exercises.len() {
            tracing::debug!(index, "Refused to remove exercise row");
            return false;
        }
        self.draft.exercises.remove(index);
        true
    }

    /// Sets one exercise field. Numeric fields only take digits or the empty
    /// string; anything else is dropped and the field keeps its value.
    /// Returns whether the value was stored.
    pub fn update_field(&mut self, index: usize, field: ExerciseField, value: &str) -> bool {
        if field.is_numeric() && !accepts_numeric_input(value) {
            tracing::debug!(index, %field, value, "Ignored non-numeric input");
            return false;
        }
        let Some(row) = self.draft.exercises.get_mut(index) else {
            tracing::warn!(index, "No exercise row at index");
            return false;
        };
        *row.slot(field) = value.to_string();
        true
    }

    pub fn select_type(&mut self, workout_type: WorkoutType) {
        self.draft.workout_type = Some(workout_type);
        self.errors.clear_field(WorkoutField::Type.path());
    }

    /// Sets a top-level field from text. `Type` must be a form value such as
    /// `"strength"`; `Duration` obeys the digits-only rule.
    /// Returns whether the value was stored.
    pub fn set_field(&mut self, field: WorkoutField, value: &str) -> bool {
        match field {
            WorkoutField::Type => match WorkoutType::from_str(value.trim()) {
                Ok(t) => self.draft.workout_type = Some(t),
                Err(_) => {
                    tracing::debug!(value, "Unknown workout type");
                    return false;
                }
            },
            WorkoutField::Date => self.draft.date = value.to_string(),
            WorkoutField::Duration => {
                if !accepts_numeric_input(value) {
                    tracing::debug!(value, "Ignored non-numeric duration");
                    return false;
                }
                self.draft.duration = value.to_string();
            }
            WorkoutField::Notes => self.draft.notes = value.to_string(),
        }
        self.errors.clear_field(field.path());
        true
    }

    /// Validates the current draft without changing it.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        validate_workout(&self.draft).err().unwrap_or_default()
    }

    /// Validates the draft and hands back the workout, resetting the form to
    /// a blank draft. On failure the errors are kept on the form and the
    /// draft is left untouched.
    /// # Errors
    /// Returns the field errors when the draft does not validate.
    pub fn take_valid(&mut self) -> Result<Workout, FieldErrors> {
        match validate_workout(&self.draft) {
            Ok(workout) => {
                self.reset();
                Ok(workout)
            }
            Err(errors) => {
                tracing::warn!(errors = errors.len(), "Workout form failed validation");
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validates and records the draft into `log`.
    /// # Errors
    /// Returns the field errors when the draft does not validate.
    pub fn submit<'a>(&mut self, log: &'a mut WorkoutLog) -> Result<&'a Workout, FieldErrors> {
        let workout = self.take_valid()?;
        Ok(log.record(workout))
    }

    pub fn reset(&mut self) {
        self.draft = WorkoutDraft::new(self.default_date);
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn filled_form() -> WorkoutForm {
        let mut form = WorkoutForm::new(today());
        form.select_type(WorkoutType::Strength);
        assert!(form.set_field(WorkoutField::Duration, "45"));
        assert!(form.update_field(0, ExerciseField::Name, "Bench Press"));
        form
    }

    #[test]
    fn new_form_has_one_blank_row_dated_today() {
        let form = WorkoutForm::new(today());
        assert_eq!(form.exercise_count(), 1);
        assert_eq!(form.draft().date, "2025-03-20");
        assert_eq!(form.draft().exercises[0], ExerciseDraft::default());
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut form = WorkoutForm::new(today());
        assert!(!form.remove_entry(0));
        form.add_entry();
        form.add_entry();
        assert!(!form.remove_entry(3));
        assert!(form.remove_entry(1));
        assert!(form.remove_entry(0));
        assert!(!form.remove_entry(0));
        assert_eq!(form.exercise_count(), 1);
    }

    #[test]
    fn remove_keeps_the_other_rows_in_order() {
        let mut form = WorkoutForm::new(today());
        form.add_entry();
        form.add_entry();
        form.update_field(0, ExerciseField::Name, "A");
        form.update_field(1, ExerciseField::Name, "B");
        form.update_field(2, ExerciseField::Name, "C");
        assert!(form.remove_entry(1));
        let names: Vec<_> = form.draft().exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn numeric_fields_reject_non_digits() {
        let mut form = WorkoutForm::new(today());
        assert!(form.update_field(0, ExerciseField::Sets, "3"));
        assert!(!form.update_field(0, ExerciseField::Sets, "3a"));
        assert_eq!(form.draft().exercises[0].sets, "3");
        assert!(!form.update_field(0, ExerciseField::Weight, "60.5"));
        assert!(form.update_field(0, ExerciseField::Sets, ""));
        assert_eq!(form.draft().exercises[0].sets, "");
        // Names take anything.
        assert!(form.update_field(0, ExerciseField::Name, "5x5 Squat!"));
    }

    #[test]
    fn duration_takes_digits_only() {
        let mut form = WorkoutForm::new(today());
        assert!(form.set_field(WorkoutField::Duration, "30"));
        assert!(!form.set_field(WorkoutField::Duration, "30 min"));
        assert_eq!(form.draft().duration, "30");
    }

    #[test]
    fn update_out_of_range_row_is_ignored() {
        let mut form = WorkoutForm::new(today());
        assert!(!form.update_field(4, ExerciseField::Name, "Ghost"));
        assert_eq!(form.exercise_count(), 1);
    }

    #[test]
    fn blank_form_reports_every_required_field() {
        let errors = WorkoutForm::new(today()).validate();
        assert_eq!(errors.get("type"), Some("Please select a workout type"));
        assert_eq!(
            errors.get("duration"),
            Some("Duration must contain only numbers")
        );
        assert_eq!(
            errors.get("exercises.0.name"),
            Some("Exercise name is required")
        );
        assert!(!errors.contains("date"));
    }

    #[test]
    fn empty_exercise_list_is_keyed_at_exercises() {
        let mut draft = filled_form().draft().clone();
        draft.exercises.clear();
        let errors = validate_workout(&draft).unwrap_err();
        assert_eq!(errors.get("exercises"), Some("Add at least one exercise"));
    }

    #[test]
    fn date_is_coerced_before_validation() {
        let mut form = filled_form();
        form.set_field(WorkoutField::Date, "2025-03-18");
        assert!(form.validate().is_empty());
        form.set_field(WorkoutField::Date, "18/03/2025");
        assert_eq!(form.validate().get("date"), Some("Please select a date"));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut form = filled_form();
        form.set_field(WorkoutField::Duration, "0");
        assert_eq!(
            form.validate().get("duration"),
            Some("Duration must be at least 1 minute")
        );
    }

    #[test]
    fn malformed_numbers_in_a_raw_draft_are_reported_per_row() {
        let mut draft = filled_form().draft().clone();
        draft.exercises.push(ExerciseDraft {
            name: "Squat".into(),
            sets: "x".into(),
            reps: "5".into(),
            weight: String::new(),
        });
        let errors = validate_workout(&draft).unwrap_err();
        assert_eq!(
            errors.get("exercises.1.sets"),
            Some("Sets must contain only numbers")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn validated_workout_parses_numbers_and_trims() {
        let mut form = filled_form();
        form.update_field(0, ExerciseField::Sets, "3");
        form.update_field(0, ExerciseField::Reps, "10");
        form.set_field(WorkoutField::Notes, "  felt strong ");
        let workout = validate_workout(form.draft()).unwrap();
        assert_eq!(workout.duration_minutes, 45);
        assert_eq!(workout.date, today());
        assert_eq!(workout.exercises[0].sets, Some(3));
        assert_eq!(workout.exercises[0].reps, Some(10));
        assert_eq!(workout.exercises[0].weight, None);
        assert_eq!(workout.notes.as_deref(), Some("felt strong"));
    }

    #[test]
    fn failed_submit_keeps_the_draft_and_surfaces_errors() {
        let mut log = WorkoutLog::new();
        let mut form = WorkoutForm::new(today());
        form.add_entry();
        let before = form.draft().clone();
        let errors = form.submit(&mut log).unwrap_err();
        assert!(errors.contains("type"));
        assert_eq!(form.draft(), &before);
        assert_eq!(form.errors(), &errors);
        assert!(log.is_empty());
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut log = WorkoutLog::new();
        let mut form = WorkoutForm::new(today());
        let _ = form.submit(&mut log);
        assert!(form.errors().contains("type"));
        form.select_type(WorkoutType::Yoga);
        assert!(!form.errors().contains("type"));
        assert!(form.errors().contains("duration"));
    }

    #[test]
    fn successful_submit_resets_the_form() {
        let mut log = WorkoutLog::new();
        let mut form = filled_form();
        form.add_entry();
        form.update_field(1, ExerciseField::Name, "Rows");
        let logged = form.submit(&mut log).unwrap();
        assert_eq!(logged.exercises.len(), 2);
        assert_eq!(form.draft(), &WorkoutDraft::new(today()));
        assert!(form.errors().is_empty());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn unknown_type_text_is_ignored() {
        let mut form = WorkoutForm::new(today());
        assert!(!form.set_field(WorkoutField::Type, "pilates"));
        assert!(form.set_field(WorkoutField::Type, "Running"));
        assert_eq!(form.draft().workout_type, Some(WorkoutType::Running));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add,
            Remove(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![Just(Op::Add), (0usize..8).prop_map(Op::Remove)]
        }

        proptest! {
            #[test]
            fn entry_count_never_drops_below_one(ops in prop::collection::vec(op(), 0..64)) {
                let mut form = WorkoutForm::new(today());
                for op in ops {
                    let before = form.exercise_count();
                    match op {
                        Op::Add => {
                            form.add_entry();
                            prop_assert_eq!(form.exercise_count(), before + 1);
                        }
                        Op::Remove(i) => {
                            let removed = form.remove_entry(i);
                            prop_assert_eq!(removed, before > 1 && i < before);
                        }
                    }
                    prop_assert!(form.exercise_count() >= 1);
                }
            }

            #[test]
            fn numeric_fields_only_ever_hold_digits(values in prop::collection::vec(".{0,6}", 1..16)) {
                let mut form = WorkoutForm::new(today());
                for value in &values {
                    let stored = form.update_field(0, ExerciseField::Reps, value);
                    prop_assert_eq!(stored, accepts_numeric_input(value));
                    prop_assert!(accepts_numeric_input(&form.draft().exercises[0].reps));
                }
            }
        }
    }
}
