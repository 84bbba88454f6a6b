// src/stats.rs
use serde::Serialize;

use crate::model::WorkoutType;

/// Summary numbers shown on the workout stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AggregateStats {
    pub total_count: u32,
    /// Workouts "this month". There is no period rollover; it only grows.
    pub current_period_count: u32,
    /// Minutes, rounded.
    pub average_duration: u32,
    pub most_frequent_type: Option<WorkoutType>,
}

impl AggregateStats {
    /// The figures the dashboard opens with when sample data is loaded.
    #[must_use]
    pub const fn sample() -> Self {
        Self {
            total_count: 24,
            current_period_count: 12,
            average_duration: 42,
            most_frequent_type: Some(WorkoutType::Strength),
        }
    }

    /// Folds one newly added workout into the stats.
    ///
    /// `collection` must already contain the new workout, in stored order.
    /// The running mean weights the old average by the *period* count, not
    /// the lifetime total.
    pub fn record<I>(&mut self, new_duration: u32, collection: I)
    where
        I: IntoIterator<Item = WorkoutType>,
    {
        self.average_duration = running_mean(
            self.average_duration,
            self.current_period_count,
            new_duration,
        );
        self.total_count = self.total_count.saturating_add(1);
        self.current_period_count = self.current_period_count.saturating_add(1);
        self.most_frequent_type = most_frequent_type(collection);
    }
}

/// `round((old_avg * old_count + new) / (old_count + 1))`, halves rounding up.
#[must_use]
pub fn running_mean(old_avg: u32, old_count: u32, new_value: u32) -> u32 {
    let numerator = u64::from(old_avg) * u64::from(old_count) + u64::from(new_value);
    rounded_div(numerator, u64::from(old_count) + 1)
}

fn rounded_div(numerator: u64, denominator: u64) -> u32 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Counts per type in first-encountered order.
fn count_by_type<I>(types: I) -> Vec<(WorkoutType, u32)>
where
    I: IntoIterator<Item = WorkoutType>,
{
    let mut counts: Vec<(WorkoutType, u32)> = Vec::new();
    for t in types {
        match counts.iter_mut().find(|(seen, _)| *seen == t) {
            Some((_, count)) => *count += 1,
            None => counts.push((t, 1)),
        }
    }
    counts
}

/// Highest count wins; ties go to the type encountered first.
#[must_use]
pub fn most_frequent_type<I>(types: I) -> Option<WorkoutType>
where
    I: IntoIterator<Item = WorkoutType>,
{
    let mut best: Option<(WorkoutType, u32)> = None;
    for (t, count) in count_by_type(types) {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((t, count));
        }
    }
    best.map(|(t, _)| t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeShare {
    pub workout_type: WorkoutType,
    pub count: u32,
    /// Rounded share of all workouts, 0-100.
    pub percent: u32,
}

/// Breakdown by workout type for the analytics distribution chart,
/// largest first (stable for equal counts).
#[must_use]
pub fn type_distribution<I>(types: I) -> Vec<TypeShare>
where
    I: IntoIterator<Item = WorkoutType>,
{
    let counts = count_by_type(types);
    let total: u32 = counts.iter().map(|(_, c)| c).sum();
    let mut shares: Vec<TypeShare> = counts
        .into_iter()
        .map(|(workout_type, count)| TypeShare {
            workout_type,
            count,
            percent: rounded_div(100 * u64::from(count), u64::from(total)),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}
