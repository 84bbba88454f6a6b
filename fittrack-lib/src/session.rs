// src/session.rs
use chrono::NaiveDate;

use crate::challenge::{validate_challenge, ChallengeBoard, ChallengeDraft};
use crate::form::{validate_workout, ExerciseField, WorkoutField, WorkoutForm};
use crate::membership::{ChallengeId, Membership, MembershipSet};
use crate::model::{Workout, WorkoutType};
use crate::profile::{validate_goals, validate_profile, Goals, GoalsDraft, Profile, ProfileDraft};
use crate::report::{
    self, DateRange, ExportArtifact, ExportError, ReportConfig, ReportData, ReportFormat,
    ReportSection, ReportType,
};
use crate::store::WorkoutLog;
use crate::template::WorkoutTemplate;
use crate::undo::{UndoToken, Undoable};
use crate::validation::FieldErrors;

/// Transient message for the user, optionally offering an undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub undo: Option<UndoToken>,
}

impl Notification {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            undo: None,
        }
    }

    fn with_undo(mut self, token: UndoToken) -> Self {
        self.undo = Some(token);
        self
    }
}

/// Which form a set of field errors belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Workout,
    Challenge,
    Profile,
    Goals,
}

/// Output of a transition, for the presentation layer to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notification),
    FieldErrors { form: FormKind, errors: FieldErrors },
    Download(ExportArtifact),
}

/// Inputs the session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AddExercise,
    RemoveExercise(usize),
    UpdateExercise {
        index: usize,
        field: ExerciseField,
        value: String,
    },
    SelectWorkoutType(WorkoutType),
    SetWorkoutField {
        field: WorkoutField,
        value: String,
    },
    SubmitWorkout,
    /// Clears the workout form back to a single blank row.
    ResetWorkoutForm,
    /// Pre-fills the workout form from a template without logging it.
    UseTemplate(WorkoutTemplate),
    LogTemplate(WorkoutTemplate),
    ToggleChallenge(ChallengeId),
    CreateChallenge(ChallengeDraft),
    UpdateProfile(ProfileDraft),
    UpdateGoals(GoalsDraft),
    ResetGoals,
    SetReportType(ReportType),
    SetDateRange(DateRange),
    SetReportFormat(ReportFormat),
    ToggleReportSection(ReportSection),
    ExportData,
    GenerateReport,
    Undo(UndoToken),
}

/// What the single pending undo would revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UndoTarget {
    Join(ChallengeId),
    Profile,
    Goals,
}

/// All state for one user session.
#[derive(Debug, Clone)]
pub struct Session {
    today: NaiveDate,
    log: WorkoutLog,
    form: WorkoutForm,
    challenges: ChallengeBoard,
    memberships: MembershipSet,
    profile: Undoable<Profile>,
    goals: Undoable<Goals>,
    report: ReportConfig,
    pending_undo: Option<(UndoToken, UndoTarget)>,
    next_token: u64,
}

impl Session {
    /// Session with empty history and catalog.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self::build(today, WorkoutLog::new(), ChallengeBoard::new())
    }

    /// Session seeded with the sample history and challenges.
    #[must_use]
    pub fn with_sample_data(today: NaiveDate) -> Self {
        Self::build(
            today,
            WorkoutLog::with_sample_data(today),
            ChallengeBoard::with_sample_data(),
        )
    }

    fn build(today: NaiveDate, log: WorkoutLog, challenges: ChallengeBoard) -> Self {
        Self {
            today,
            log,
            form: WorkoutForm::new(today),
            challenges,
            memberships: MembershipSet::new(),
            profile: Undoable::new(Profile::default()),
            goals: Undoable::new(Goals::default()),
            report: ReportConfig::default(),
            pending_undo: None,
            next_token: 1,
        }
    }

    #[must_use]
    pub fn with_report_config(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    #[must_use]
    pub const fn log(&self) -> &WorkoutLog {
        &self.log
    }

    #[must_use]
    pub const fn form(&self) -> &WorkoutForm {
        &self.form
    }

    #[must_use]
    pub const fn challenges(&self) -> &ChallengeBoard {
        &self.challenges
    }

    #[must_use]
    pub const fn memberships(&self) -> &MembershipSet {
        &self.memberships
    }

    #[must_use]
    pub const fn profile(&self) -> &Profile {
        self.profile.get()
    }

    #[must_use]
    pub const fn goals(&self) -> &Goals {
        self.goals.get()
    }

    #[must_use]
    pub const fn report_config(&self) -> &ReportConfig {
        &self.report
    }

    /// The undo currently on offer, if any.
    #[must_use]
    pub fn pending_undo(&self) -> Option<UndoToken> {
        self.pending_undo.map(|(token, _)| token)
    }

    /// Pure-function form of `apply`.
    #[must_use]
    pub fn step(mut self, event: Event) -> (Self, Vec<Effect>) {
        let effects = self.apply(event);
        (self, effects)
    }

    /// Runs one event to completion and returns its effects.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        tracing::debug!(?event, "Applying event");
        match event {
            Event::AddExercise => {
                self.form.add_entry();
                vec![]
            }
            Event::RemoveExercise(index) => {
                self.form.remove_entry(index);
                vec![]
            }
            Event::UpdateExercise {
                index,
                field,
                value,
            } => {
                self.form.update_field(index, field, &value);
                vec![]
            }
            Event::SelectWorkoutType(workout_type) => {
                self.form.select_type(workout_type);
                vec![]
            }
            Event::SetWorkoutField { field, value } => {
                self.form.set_field(field, &value);
                vec![]
            }
            Event::SubmitWorkout => self.submit_workout(),
            Event::ResetWorkoutForm => {
                self.form.reset();
                vec![]
            }
            Event::UseTemplate(template) => {
                tracing::debug!(%template, "Pre-filling workout form");
                self.form = WorkoutForm::from_draft(template.draft(self.today), self.today);
                vec![]
            }
            Event::LogTemplate(template) => self.log_template(template),
            Event::ToggleChallenge(id) => self.toggle_challenge(id),
            Event::CreateChallenge(draft) => self.create_challenge(&draft),
            Event::UpdateProfile(draft) => self.update_profile(&draft),
            Event::UpdateGoals(draft) => self.update_goals(&draft),
            Event::ResetGoals => self.reset_goals(),
            Event::SetReportType(report_type) => {
                self.report.report_type = report_type;
                vec![]
            }
            Event::SetDateRange(range) => {
                self.report.date_range = range;
                vec![]
            }
            Event::SetReportFormat(format) => {
                self.report.format = format;
                vec![]
            }
            Event::ToggleReportSection(section) => {
                self.report.toggle_section(section);
                vec![]
            }
            Event::ExportData => self.export_data(),
            Event::GenerateReport => self.generate_report(),
            Event::Undo(token) => self.undo(token),
        }
    }

    fn issue_undo(&mut self, target: UndoTarget) -> UndoToken {
        let token = UndoToken::new(self.next_token);
        self.next_token += 1;
        self.pending_undo = Some((token, target));
        token
    }

    /// Any committed change supersedes the pending undo.
    fn cancel_pending_undo(&mut self) {
        if let Some((token, target)) = self.pending_undo.take() {
            tracing::debug!(%token, ?target, "Pending undo superseded");
            match target {
                UndoTarget::Join(_) => self.memberships.discard_undo(),
                UndoTarget::Profile => self.profile.discard(),
                UndoTarget::Goals => self.goals.discard(),
            }
        }
    }

    fn workout_logged(&mut self, workout: Workout, title: &str, description: String) -> Vec<Effect> {
        self.cancel_pending_undo();
        self.log.record(workout);
        vec![Effect::Notify(Notification::new(title, description))]
    }

    fn submit_workout(&mut self) -> Vec<Effect> {
        match self.form.take_valid() {
            Ok(workout) => {
                let description = format!(
                    "Your {} workout has been added to your history.",
                    workout.workout_type
                );
                self.workout_logged(workout, "Workout logged successfully", description)
            }
            Err(errors) => vec![Effect::FieldErrors {
                form: FormKind::Workout,
                errors,
            }],
        }
    }

    fn log_template(&mut self, template: WorkoutTemplate) -> Vec<Effect> {
        match validate_workout(&template.draft(self.today)) {
            Ok(workout) => {
                let description = format!(
                    "A {} workout has been added to your history using this template.",
                    workout.workout_type
                );
                self.workout_logged(workout, "Template workout logged", description)
            }
            Err(errors) => {
                tracing::error!(%template, %errors, "Workout template failed validation");
                vec![Effect::FieldErrors {
                    form: FormKind::Workout,
                    errors,
                }]
            }
        }
    }

    fn toggle_challenge(&mut self, id: ChallengeId) -> Vec<Effect> {
        let Some(challenge) = self.challenges.get(id) else {
            tracing::warn!(challenge = id, "Ignoring toggle of unknown challenge");
            return vec![];
        };
        if !challenge.status.is_joinable() {
            tracing::warn!(
                challenge = id,
                status = %challenge.status,
                "Ignoring toggle of a challenge that is not upcoming"
            );
            return vec![];
        }
        let title = challenge.title.clone();
        self.cancel_pending_undo();
        match self.memberships.toggle(id) {
            Membership::Joined => {
                let token = self.issue_undo(UndoTarget::Join(id));
                vec![Effect::Notify(
                    Notification::new(
                        "Challenge joined",
                        format!("You've joined the {title} challenge"),
                    )
                    .with_undo(token),
                )]
            }
            Membership::NotJoined => vec![Effect::Notify(Notification::new(
                "Challenge left",
                format!("You've left the {title} challenge"),
            ))],
        }
    }

    fn create_challenge(&mut self, draft: &ChallengeDraft) -> Vec<Effect> {
        match validate_challenge(draft) {
            Ok(new) => {
                self.cancel_pending_undo();
                let created = self.challenges.create(new);
                vec![Effect::Notify(Notification::new(
                    "Challenge created successfully",
                    format!("Your challenge \"{}\" has been created.", created.title),
                ))]
            }
            Err(errors) => vec![Effect::FieldErrors {
                form: FormKind::Challenge,
                errors,
            }],
        }
    }

    fn update_profile(&mut self, draft: &ProfileDraft) -> Vec<Effect> {
        match validate_profile(draft) {
            Ok(profile) => {
                self.cancel_pending_undo();
                tracing::info!(name = %profile.name, "Updating profile");
                self.profile.replace(profile);
                let token = self.issue_undo(UndoTarget::Profile);
                vec![Effect::Notify(
                    Notification::new(
                        "Profile updated successfully",
                        "Your profile information has been updated.",
                    )
                    .with_undo(token),
                )]
            }
            Err(errors) => vec![Effect::FieldErrors {
                form: FormKind::Profile,
                errors,
            }],
        }
    }

    fn update_goals(&mut self, draft: &GoalsDraft) -> Vec<Effect> {
        match validate_goals(draft) {
            Ok(goals) => {
                self.cancel_pending_undo();
                tracing::info!(primary_goal = %goals.primary_goal, "Updating goals");
                self.goals.replace(goals);
                let token = self.issue_undo(UndoTarget::Goals);
                vec![Effect::Notify(
                    Notification::new(
                        "Goals updated successfully",
                        "Your fitness goals have been updated.",
                    )
                    .with_undo(token),
                )]
            }
            Err(errors) => vec![Effect::FieldErrors {
                form: FormKind::Goals,
                errors,
            }],
        }
    }

    fn reset_goals(&mut self) -> Vec<Effect> {
        self.cancel_pending_undo();
        tracing::info!("Resetting goals to defaults");
        self.goals.replace(Goals::default());
        let token = self.issue_undo(UndoTarget::Goals);
        vec![Effect::Notify(
            Notification::new(
                "Goals reset",
                "Your fitness goals have been reset to default values.",
            )
            .with_undo(token),
        )]
    }

    fn export_failed(error: &ExportError) -> Vec<Effect> {
        tracing::error!(%error, "Export failed");
        vec![Effect::Notify(Notification::new(
            "Export failed",
            error.to_string(),
        ))]
    }

    fn export_data(&self) -> Vec<Effect> {
        match report::export_csv(self.log.iter()) {
            Ok(artifact) => vec![
                Effect::Download(artifact),
                Effect::Notify(Notification::new(
                    "Data exported successfully",
                    "Your fitness data has been exported to CSV format.",
                )),
            ],
            Err(e) => Self::export_failed(&e),
        }
    }

    fn generate_report(&self) -> Vec<Effect> {
        let data = ReportData {
            log: &self.log,
            goals: self.goals.get(),
        };
        match report::generate_report(&self.report, &data, self.today) {
            Ok(artifact) => vec![
                Effect::Download(artifact),
                Effect::Notify(Notification::new(
                    "Custom report generated",
                    "Your custom report has been generated and is ready to download.",
                )),
            ],
            Err(e) => Self::export_failed(&e),
        }
    }

    fn undo(&mut self, token: UndoToken) -> Vec<Effect> {
        match self.pending_undo {
            Some((pending, target)) if pending == token => {
                self.pending_undo = None;
                let description = match target {
                    UndoTarget::Join(id) => {
                        self.memberships.undo();
                        let title = self
                            .challenges
                            .get(id)
                            .map_or_else(|| format!("#{id}"), |c| c.title.clone());
                        format!("You've left the {title} challenge")
                    }
                    UndoTarget::Profile => {
                        self.profile.undo();
                        "Your previous state has been restored.".to_string()
                    }
                    UndoTarget::Goals => {
                        self.goals.undo();
                        "Your previous state has been restored.".to_string()
                    }
                };
                tracing::info!(%token, ?target, "Undo applied");
                vec![Effect::Notify(Notification::new("Action undone", description))]
            }
            _ => {
                tracing::debug!(%token, "Undo token is stale; ignoring");
                vec![]
            }
        }
    }
}
