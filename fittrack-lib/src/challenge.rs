// src/challenge.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::membership::ChallengeId;
use crate::validation::{parse_form_date, FieldErrors};

/// Lifecycle position of a challenge, with the figures each tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active { progress: u8, days_left: u32 },
    Upcoming { days_to_start: u32 },
    Completed { progress: u8, rank: u32 },
}

impl ChallengeStatus {
    #[must_use]
    pub const fn tab(self) -> StatusFilter {
        match self {
            Self::Active { .. } => StatusFilter::Active,
            Self::Upcoming { .. } => StatusFilter::Upcoming,
            Self::Completed { .. } => StatusFilter::Completed,
        }
    }

    /// Only upcoming challenges take new members.
    #[must_use]
    pub const fn is_joinable(self) -> bool {
        matches!(self, Self::Upcoming { .. })
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active {
                progress,
                days_left,
            } => write!(f, "active ({progress}%, {days_left} days left)"),
            Self::Upcoming { days_to_start } => {
                write!(f, "upcoming (starts in {days_to_start} days)")
            }
            Self::Completed { progress, rank } => {
                write!(f, "completed ({progress}%, rank #{rank})")
            }
        }
    }
}

/// Tabs on the challenges view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Upcoming,
    Completed,
}

impl StatusFilter {
    #[must_use]
    pub fn admits(self, status: ChallengeStatus) -> bool {
        self == Self::All || self == status.tab()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeKind {
    Steps,
    WorkoutStreak,
    WeightLoss,
    Strength,
    Running,
    Custom,
}

impl ChallengeKind {
    /// Form value, e.g. `"workout-streak"`.
    #[must_use]
    pub fn value(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub status: ChallengeStatus,
    pub participants: u32,
}

impl Challenge {
    /// Case-insensitive match on title or description; `lowered_query` must
    /// already be lowercase.
    #[must_use]
    pub fn matches(&self, lowered_query: &str) -> bool {
        self.title.to_lowercase().contains(lowered_query)
            || self.description.to_lowercase().contains(lowered_query)
    }
}

/// Raw "create challenge" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeDraft {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub kind: String,
    pub goal: String,
    pub is_public: bool,
}

impl Default for ChallengeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            kind: String::new(),
            goal: String::new(),
            is_public: true,
        }
    }
}

/// A validated challenge submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: ChallengeKind,
    pub goal: String,
    pub is_public: bool,
}

/// # Errors
/// Returns field errors keyed `title`, `description`, `startDate`, `endDate`,
/// `type` and `goal`.
pub fn validate_challenge(draft: &ChallengeDraft) -> Result<NewChallenge, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = draft.title.trim();
    if title.chars().count() < 3 {
        errors.add("title", "Title must be at least 3 characters.");
    }
    let description = draft.description.trim();
    if description.chars().count() < 10 {
        errors.add("description", "Description must be at least 10 characters.");
    }
    let start_date = parse_form_date(&draft.start_date);
    if start_date.is_none() {
        errors.add("startDate", "Please select a start date.");
    }
    let end_date = parse_form_date(&draft.end_date);
    if end_date.is_none() {
        errors.add("endDate", "Please select an end date.");
    }
    let kind = draft.kind.trim().parse::<ChallengeKind>().ok();
    if kind.is_none() {
        errors.add("type", "Please select a challenge type.");
    }
    let goal = draft.goal.trim();
    if goal.is_empty() {
        errors.add("goal", "Please enter a goal");
    }

    let (Some(start_date), Some(end_date), Some(kind)) = (start_date, end_date, kind) else {
        return Err(errors);
    };
    errors.into_result(NewChallenge {
        title: title.to_string(),
        description: description.to_string(),
        start_date,
        end_date,
        kind,
        goal: goal.to_string(),
        is_public: draft.is_public,
    })
}

/// The challenge catalog, newest first.
#[derive(Debug, Clone, Default)]
pub struct ChallengeBoard {
    challenges: Vec<Challenge>,
}

impl ChallengeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sample_data() -> Self {
        Self {
            challenges: sample_challenges(),
        }
    }

    /// Adds a freshly created challenge: next id, one participant, starting
    /// tomorrow. Returns the stored challenge.
    pub fn create(&mut self, new: NewChallenge) -> &Challenge {
        let id = self.next_id();
        tracing::info!(
            id,
            title = %new.title,
            kind = new.kind.value(),
            public = new.is_public,
            "Creating challenge"
        );
        self.challenges.insert(
            0,
            Challenge {
                id,
                title: new.title,
                description: new.description,
                status: ChallengeStatus::Upcoming { days_to_start: 1 },
                participants: 1,
            },
        );
        &self.challenges[0]
    }

    /// Count plus one, as the catalog never shrinks.
    fn next_id(&self) -> ChallengeId {
        ChallengeId::try_from(self.challenges.len())
            .unwrap_or(ChallengeId::MAX - 1)
            .saturating_add(1)
    }

    #[must_use]
    pub fn get(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Challenges on the given tab whose title or description contains
    /// `query`, ignoring case.
    #[must_use]
    pub fn filter(&self, tab: StatusFilter, query: &str) -> Vec<&Challenge> {
        let query = query.trim().to_lowercase();
        self.challenges
            .iter()
            .filter(|c| tab.admits(c.status))
            .filter(|c| query.is_empty() || c.matches(&query))
            .collect()
    }
}

fn sample_challenges() -> Vec<Challenge> {
    let challenge = |id, title: &str, description: &str, status, participants| Challenge {
        id,
        title: title.to_string(),
        description: description.to_string(),
        status,
        participants,
    };
    vec![
        challenge(
            1,
            "30-Day Consistency Challenge",
            "Complete a workout every day for 30 days",
            ChallengeStatus::Active {
                progress: 40,
                days_left: 18,
            },
            342,
        ),
        challenge(
            2,
            "10K Steps Challenge",
            "Walk 10,000 steps every day for 14 days",
            ChallengeStatus::Active {
                progress: 35,
                days_left: 9,
            },
            256,
        ),
        challenge(
            3,
            "Summer Shred Challenge",
            "Lose 5% body fat in 8 weeks with guided workouts",
            ChallengeStatus::Upcoming { days_to_start: 2 },
            245,
        ),
        challenge(
            4,
            "Marathon Prep Challenge",
            "12-week training program for your first marathon",
            ChallengeStatus::Upcoming { days_to_start: 5 },
            178,
        ),
        challenge(
            5,
            "Yoga for Beginners",
            "30 days of guided yoga sessions for beginners",
            ChallengeStatus::Upcoming { days_to_start: 7 },
            312,
        ),
        challenge(
            6,
            "Spring Fitness Challenge",
            "4-week challenge to kickstart your fitness journey",
            ChallengeStatus::Completed {
                progress: 100,
                rank: 12,
            },
            423,
        ),
    ]
}
