//! Registration form state machine.
//!
//! `Idle → Validating → Failed | Submitting → Succeeded | Failed`. The flow
//! owns the draft; callers mutate it only through the edit methods, which
//! refuse changes while a request is in flight.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    api::{ApiError, PortalApi},
    models::{
        area::Area,
        draft::RegistrationDraft,
        persona::{CreatedPersona, NewPersona, Persona},
    },
    services::{
        areas::resolve_area_selection,
        gate::Destination,
        validation::{ValidationError, validate},
    },
};

/// Time the success message stays on screen before moving to the results view
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub const NO_CONNECTION_REASON: &str =
    "Could not connect to the server. Check that the backend is running.";
pub const GENERIC_FAILURE_REASON: &str =
    "Something went wrong while registering the person. Please try again.";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Person registered successfully!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
}

/// One-shot navigation scheduled after a successful submission.
///
/// Dropping it before [`PendingRedirect::wait`] completes cancels it.
#[derive(Debug)]
pub struct PendingRedirect {
    destination: Destination,
    delay: Duration,
}

impl PendingRedirect {
    pub fn new(destination: Destination, delay: Duration) -> Self {
        Self { destination, delay }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(self) -> Destination {
        tokio::time::sleep(self.delay).await;
        self.destination
    }
}

/// First half of a submission, before any I/O
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitStep {
    /// A request is already in flight
    Ignored,
    Rejected(ValidationError),
    /// The draft is frozen; send this body
    Ready(NewPersona),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Ignored,
    Invalid(ValidationError),
    Succeeded {
        message: String,
        /// Echo of the stored record, when the service sent one
        persona: Option<Persona>,
        redirect: PendingRedirect,
    },
    Failed(String),
}

#[derive(Debug, Default, Serialize)]
pub struct RegistrationFlow {
    draft: RegistrationDraft,
    state: SubmissionState,
    success_message: Option<String>,
}

impl RegistrationFlow {
    pub fn with_draft(draft: RegistrationDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.edit(|draft| draft.name = name)
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> bool {
        let email = email.into();
        self.edit(|draft| draft.email = email)
    }

    /// Applies raw selector input; see [`resolve_area_selection`]
    pub fn select_area(&mut self, raw: &str, areas: &[Area]) -> bool {
        let area_id = resolve_area_selection(raw, areas);
        debug!(raw, ?area_id, "area selected");
        self.edit(|draft| draft.area_id = area_id)
    }

    /// Returns `false` when the draft is frozen by an in-flight submission.
    /// Editing after a failure clears the error without retrying.
    fn edit(&mut self, change: impl FnOnce(&mut RegistrationDraft)) -> bool {
        if self.is_submitting() {
            debug!("edit ignored while submitting");
            return false;
        }

        change(&mut self.draft);

        if matches!(self.state, SubmissionState::Failed(_)) {
            self.state = SubmissionState::Idle;
        }
        true
    }

    pub fn begin_submit(&mut self) -> SubmitStep {
        if self.is_submitting() {
            debug!("submit ignored, a request is already in flight");
            return SubmitStep::Ignored;
        }

        self.success_message = None;
        self.state = SubmissionState::Validating;

        match validate(&self.draft) {
            Err(violation) => {
                debug!(?violation, "draft rejected");
                self.state = SubmissionState::Failed(violation.to_string());
                SubmitStep::Rejected(violation)
            }
            Ok(persona) => {
                debug!(area_id = persona.area_id, "submitting draft");
                self.state = SubmissionState::Submitting;
                SubmitStep::Ready(persona)
            }
        }
    }

    /// Second half of a submission, fed with the service's answer
    pub fn finish_submit(&mut self, result: Result<CreatedPersona, ApiError>) -> SubmitOutcome {
        if !self.is_submitting() {
            warn!("submission result arrived with no request in flight");
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(created) => {
                let message = created
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                info!(persona_id = ?created.data.as_ref().map(|p| p.id), "persona registered");

                self.state = SubmissionState::Succeeded;
                self.draft = RegistrationDraft::default();
                self.success_message = Some(message.clone());

                SubmitOutcome::Succeeded {
                    message,
                    persona: created.data,
                    redirect: PendingRedirect::new(Destination::Resultados, REDIRECT_DELAY),
                }
            }
            Err(error) => {
                warn!(%error, "registration failed");
                let reason = failure_reason(&error);
                self.state = SubmissionState::Failed(reason.clone());
                SubmitOutcome::Failed(reason)
            }
        }
    }

    /// Validates and, when valid, issues exactly one create request
    pub async fn submit(&mut self, api: &impl PortalApi) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStep::Ignored => SubmitOutcome::Ignored,
            SubmitStep::Rejected(violation) => SubmitOutcome::Invalid(violation),
            SubmitStep::Ready(persona) => {
                let result = api.create_persona(&persona).await;
                self.finish_submit(result)
            }
        }
    }
}

/// Service message first, then "no connection", then a generic reason
pub fn failure_reason(error: &ApiError) -> String {
    match error {
        ApiError::Service { error, .. } => error.clone(),
        ApiError::Transport(_) => NO_CONNECTION_REASON.to_string(),
        ApiError::Unknown(_) => GENERIC_FAILURE_REASON.to_string(),
    }
}
