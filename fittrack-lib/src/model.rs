// src/model.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Workout category selected in the log form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Hiit,
    Yoga,
    Running,
    Cycling,
    Swimming,
    Other,
}

impl WorkoutType {
    /// Form value, e.g. `"hiit"`.
    #[must_use]
    pub fn value(self) -> &'static str {
        self.into()
    }

    /// Human readable label used in history, stats and exports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strength => "Strength Training",
            Self::Cardio => "Cardio",
            Self::Hiit => "HIIT",
            Self::Yoga => "Yoga",
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One exercise line of a logged workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<u32>,
}

impl Exercise {
    /// Exercise with no set/rep/weight detail, as the sample history uses.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: None,
            reps: None,
            weight: None,
        }
    }
}

/// Free-form display metric attached to a workout ("Distance", "5 km").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: String,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A validated, logged workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workout {
    pub workout_type: WorkoutType,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub exercises: Vec<Exercise>, // Never empty once validated
    pub notes: Option<String>,
    pub metrics: Vec<Metric>,
}

impl Workout {
    #[must_use]
    pub fn exercise_names(&self) -> Vec<&str> {
        self.exercises.iter().map(|e| e.name.as_str()).collect()
    }

    /// Case-insensitive match on the type label or any exercise name.
    /// The query is expected to be lowercased already.
    #[must_use]
    pub fn matches(&self, lowered_query: &str) -> bool {
        self.workout_type
            .label()
            .to_lowercase()
            .contains(lowered_query)
            || self.workout_type.value().contains(lowered_query)
            || self
                .exercises
                .iter()
                .any(|e| e.name.to_lowercase().contains(lowered_query))
    }
}
