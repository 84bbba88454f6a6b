// src/profile.rs
use serde::Serialize;
use std::collections::BTreeSet;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::model::WorkoutType;
use crate::validation::{is_valid_email, FieldErrors};

pub const BIO_MAX_CHARS: usize = 160;

/// Workout types offered as training preferences on the goals form.
pub const PREFERENCE_TYPES: [WorkoutType; 6] = [
    WorkoutType::Strength,
    WorkoutType::Cardio,
    WorkoutType::Hiit,
    WorkoutType::Yoga,
    WorkoutType::Running,
    WorkoutType::Cycling,
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
    Athlete,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
    Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryGoal {
    WeightLoss,
    MuscleGain,
    Strength,
    Endurance,
    Flexibility,
    GeneralFitness,
}

impl PrimaryGoal {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WeightLoss => "Weight Loss",
            Self::MuscleGain => "Muscle Gain",
            Self::Strength => "Strength",
            Self::Endurance => "Endurance",
            Self::Flexibility => "Flexibility",
            Self::GeneralFitness => "General Fitness",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub age: Option<u32>,
    /// Centimetres.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub fitness_level: FitnessLevel,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            bio: Some(
                "Fitness enthusiast looking to improve my overall health and strength."
                    .to_string(),
            ),
            age: Some(32),
            height: Some(175.0),
            weight: Some(75.0),
            fitness_level: FitnessLevel::Intermediate,
        }
    }
}

/// Raw profile form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub fitness_level: String,
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            bio: profile.bio.clone().unwrap_or_default(),
            age: profile.age.map(|v| v.to_string()).unwrap_or_default(),
            height: profile.height.map(|v| v.to_string()).unwrap_or_default(),
            weight: profile.weight.map(|v| v.to_string()).unwrap_or_default(),
            fitness_level: profile.fitness_level.to_string(),
        }
    }
}

/// # Errors
/// Returns field errors keyed by the camel-case form field names.
pub fn validate_profile(draft: &ProfileDraft) -> Result<Profile, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = draft.name.trim();
    if name.chars().count() < 2 {
        errors.add("name", "Name must be at least 2 characters.");
    }
    if !is_valid_email(&draft.email) {
        errors.add("email", "Please enter a valid email address.");
    }
    let bio = draft.bio.trim();
    if bio.chars().count() > BIO_MAX_CHARS {
        errors.add(
            "bio",
            format!("Bio must contain at most {BIO_MAX_CHARS} characters."),
        );
    }
    let age = errors.optional_int("age", &draft.age, "Please enter a valid age.");
    let height = errors.optional_float("height", &draft.height, "Please enter a valid height.");
    let weight = errors.optional_float("weight", &draft.weight, "Please enter a valid weight.");
    let fitness_level = draft.fitness_level.trim().parse::<FitnessLevel>().ok();

    let Some(fitness_level) = fitness_level else {
        errors.add("fitnessLevel", "Please select a fitness level.");
        return Err(errors);
    };
    errors.into_result(Profile {
        name: name.to_string(),
        email: draft.email.trim().to_string(),
        bio: (!bio.is_empty()).then(|| bio.to_string()),
        age,
        height,
        weight,
        fitness_level,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goals {
    pub primary_goal: PrimaryGoal,
    /// Kilograms.
    pub target_weight: Option<f64>,
    pub weekly_workouts: Option<u32>,
    pub preferences: BTreeSet<WorkoutType>,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            primary_goal: PrimaryGoal::Strength,
            target_weight: Some(70.0),
            weekly_workouts: Some(4),
            preferences: [WorkoutType::Strength, WorkoutType::Hiit].into(),
        }
    }
}

/// Raw goals form fields. `preferences` holds workout type form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalsDraft {
    pub primary_goal: String,
    pub target_weight: String,
    pub weekly_workouts: String,
    pub preferences: Vec<String>,
}

impl From<&Goals> for GoalsDraft {
    fn from(goals: &Goals) -> Self {
        Self {
            primary_goal: goals.primary_goal.to_string(),
            target_weight: goals.target_weight.map(|v| v.to_string()).unwrap_or_default(),
            weekly_workouts: goals
                .weekly_workouts
                .map(|v| v.to_string())
                .unwrap_or_default(),
            preferences: goals
                .preferences
                .iter()
                .map(|t| t.value().to_string())
                .collect(),
        }
    }
}

/// # Errors
/// Returns field errors keyed `primaryGoal`, `targetWeight`, `weeklyWorkouts`
/// and `preferences`.
pub fn validate_goals(draft: &GoalsDraft) -> Result<Goals, FieldErrors> {
    let mut errors = FieldErrors::new();

    let target_weight = errors.optional_float(
        "targetWeight",
        &draft.target_weight,
        "Please enter a valid target weight.",
    );
    let weekly_workouts = errors.optional_int(
        "weeklyWorkouts",
        &draft.weekly_workouts,
        "Please enter a valid number of workouts.",
    );

    let mut preferences = BTreeSet::new();
    for raw in &draft.preferences {
        match raw.trim().parse::<WorkoutType>() {
            Ok(t) if PREFERENCE_TYPES.contains(&t) => {
                preferences.insert(t);
            }
            _ => errors.add("preferences", format!("Unknown workout preference: {raw}")),
        }
    }

    let Ok(primary_goal) = draft.primary_goal.trim().parse::<PrimaryGoal>() else {
        errors.add("primaryGoal", "Please select a primary goal.");
        return Err(errors);
    };
    errors.into_result(Goals {
        primary_goal,
        target_weight,
        weekly_workouts,
        preferences,
    })
}
