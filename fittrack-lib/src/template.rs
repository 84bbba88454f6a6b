// src/template.rs
use chrono::NaiveDate;
use strum_macros::{Display, EnumIter, EnumString};

use crate::form::{ExerciseDraft, WorkoutDraft};
use crate::model::WorkoutType;
use crate::validation::DATE_FORMAT;

/// name, sets, reps, weight
type Row = (&'static str, &'static str, &'static str, &'static str);

const FULL_BODY: &[Row] = &[
    ("Bench Press", "3", "10", "70"),
    ("Squats", "3", "12", "90"),
    ("Deadlifts", "3", "8", "100"),
    ("Pull-ups", "3", "8", "0"),
    ("Shoulder Press", "3", "10", "40"),
];

const HIIT_CARDIO: &[Row] = &[
    ("Jumping Jacks", "4", "", ""),
    ("Mountain Climbers", "4", "", ""),
    ("Burpees", "4", "", ""),
    ("High Knees", "4", "", ""),
];

const UPPER_BODY: &[Row] = &[
    ("Push-ups", "3", "15", ""),
    ("Dumbbell Rows", "3", "12", "20"),
    ("Shoulder Press", "3", "10", "15"),
    ("Bicep Curls", "3", "12", "12"),
    ("Tricep Dips", "3", "12", ""),
];

/// Ready-made workouts that can be logged in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WorkoutTemplate {
    FullBody,
    HiitCardio,
    UpperBody,
}

impl WorkoutTemplate {
    pub const ALL: [Self; 3] = [Self::FullBody, Self::HiitCardio, Self::UpperBody];

    /// Display name, e.g. "Full Body Strength".
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FullBody => "Full Body Strength",
            Self::HiitCardio => "HIIT Cardio Blast",
            Self::UpperBody => "Upper Body Focus",
        }
    }

    /// The template as a filled-in form dated `today`.
    #[must_use]
    pub fn draft(self, today: NaiveDate) -> WorkoutDraft {
        let (workout_type, duration, rows, notes) = match self {
            Self::FullBody => (
                WorkoutType::Strength,
                "45",
                FULL_BODY,
                "Full body workout template",
            ),
            Self::HiitCardio => (
                WorkoutType::Hiit,
                "30",
                HIIT_CARDIO,
                "45 sec per exercise with 15 sec rest between exercises",
            ),
            Self::UpperBody => (
                WorkoutType::Strength,
                "40",
                UPPER_BODY,
                "Upper body focus workout",
            ),
        };
        WorkoutDraft {
            workout_type: Some(workout_type),
            date: today.format(DATE_FORMAT).to_string(),
            duration: duration.to_string(),
            exercises: rows
                .iter()
                .map(|(name, sets, reps, weight)| ExerciseDraft {
                    name: (*name).to_string(),
                    sets: (*sets).to_string(),
                    reps: (*reps).to_string(),
                    weight: (*weight).to_string(),
                })
                .collect(),
            notes: notes.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validate_workout;
    use strum::IntoEnumIterator;

    #[test]
    fn every_template_validates() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        for template in WorkoutTemplate::iter() {
            let workout = validate_workout(&template.draft(today))
                .unwrap_or_else(|e| panic!("{template} failed:\n{e}"));
            assert_eq!(workout.date, today);
        }
    }

    #[test]
    fn all_lists_every_template_once() {
        assert_eq!(WorkoutTemplate::ALL.len(), WorkoutTemplate::iter().count());
        for template in WorkoutTemplate::iter() {
            assert!(WorkoutTemplate::ALL.contains(&template));
        }
        assert_eq!(WorkoutTemplate::HiitCardio.title(), "HIIT Cardio Blast");
    }

    #[test]
    fn templates_parse_by_name() {
        assert_eq!(
            "hiit-cardio".parse::<WorkoutTemplate>().unwrap(),
            WorkoutTemplate::HiitCardio
        );
    }
}
