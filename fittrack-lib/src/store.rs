// src/store.rs
use chrono::{Duration, NaiveDate};
use std::collections::VecDeque;

use crate::model::{Exercise, Metric, Workout, WorkoutType};
use crate::stats::{self, AggregateStats, TypeShare};

/// The session's workout history plus the stats derived from it.
///
/// Workouts are kept newest-first. Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct WorkoutLog {
    workouts: VecDeque<Workout>,
    stats: AggregateStats,
}

impl WorkoutLog {
    /// Empty history with zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with the sample workouts, dated relative to `today`.
    #[must_use]
    pub fn with_sample_data(today: NaiveDate) -> Self {
        Self {
            workouts: sample_workouts(today).into(),
            stats: AggregateStats::sample(),
        }
    }

    /// Prepends a workout and folds it into the stats.
    pub fn record(&mut self, workout: Workout) -> &Workout {
        let duration = workout.duration_minutes;
        tracing::info!(
            workout_type = workout.workout_type.value(),
            duration,
            exercises = workout.exercises.len(),
            "Recording workout"
        );
        self.workouts.push_front(workout);
        self.stats
            .record(duration, self.workouts.iter().map(|w| w.workout_type));
        tracing::debug!(stats = ?self.stats, "Stats updated");
        &self.workouts[0]
    }

    #[must_use]
    pub const fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Case-insensitive search over type labels and exercise names.
    /// A blank query returns the whole history.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Workout> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.workouts.iter().collect();
        }
        self.workouts.iter().filter(|w| w.matches(&query)).collect()
    }

    /// Workouts dated on or after `since`; `None` means all of them.
    #[must_use]
    pub fn since(&self, since: Option<NaiveDate>) -> Vec<&Workout> {
        self.workouts
            .iter()
            .filter(|w| since.map_or(true, |d| w.date >= d))
            .collect()
    }

    #[must_use]
    pub fn type_distribution(&self) -> Vec<TypeShare> {
        stats::type_distribution(self.workouts.iter().map(|w| w.workout_type))
    }
}

fn sample_workouts(today: NaiveDate) -> Vec<Workout> {
    let days_ago = |n: i64| today - Duration::days(n);
    let exercises = |names: &[&str]| -> Vec<Exercise> {
        names.iter().map(|n| Exercise::named(*n)).collect()
    };
    vec![
        Workout {
            workout_type: WorkoutType::Strength,
            date: today,
            duration_minutes: 45,
            exercises: exercises(&["Bench Press", "Squats", "Deadlifts", "Pull-ups"]),
            notes: None,
            metrics: vec![],
        },
        Workout {
            workout_type: WorkoutType::Running,
            date: days_ago(1),
            duration_minutes: 30,
            exercises: exercises(&["5K Run"]),
            notes: None,
            metrics: vec![
                Metric::new("Distance", "5 km"),
                Metric::new("Pace", "6:00 min/km"),
            ],
        },
        Workout {
            workout_type: WorkoutType::Yoga,
            date: days_ago(1),
            duration_minutes: 60,
            exercises: exercises(&["Sun Salutation", "Warrior Poses", "Balance Poses"]),
            notes: None,
            metrics: vec![],
        },
        Workout {
            workout_type: WorkoutType::Cycling,
            date: days_ago(2),
            duration_minutes: 45,
            exercises: exercises(&["Outdoor Cycling"]),
            notes: None,
            metrics: vec![
                Metric::new("Distance", "15 km"),
                Metric::new("Avg. Speed", "20 km/h"),
            ],
        },
        Workout {
            workout_type: WorkoutType::Swimming,
            date: days_ago(3),
            duration_minutes: 40,
            exercises: exercises(&["Freestyle", "Breaststroke"]),
            notes: None,
            metrics: vec![Metric::new("Distance", "1000 m"), Metric::new("Laps", "20")],
        },
    ]
}
