//! Form controller: owns the UI state and drives the composer.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tutor_config::CredentialSource;
use tutor_primitives::GradeLevel;

use crate::composer::Composer;
use crate::phase::{Phase, PhaseEvent};
use crate::view::{View, select_view};

/// Shown when submitting a blank formula.
pub const EMPTY_FORMULA_MESSAGE: &str = "분석할 공식을 입력해주세요.";

/// Shown for every failed request, whatever the cause.
pub const ANALYSIS_FAILURE_MESSAGE: &str =
    "공식 분석 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

/// Snapshot of everything the form displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    /// Selected grade.
    pub grade: GradeLevel,
    /// Formula as typed.
    pub formula: String,
    /// Text of the last successful analysis; empty otherwise.
    pub result: String,
    /// User-facing error, if any.
    pub error: Option<String>,
    /// `true` exactly while a request is outstanding.
    pub loading: bool,
    /// Current submission phase.
    pub phase: Phase,
}

impl FormState {
    /// Creates an empty form with `grade` preselected.
    #[must_use]
    pub const fn new(grade: GradeLevel) -> Self {
        Self {
            grade,
            formula: String::new(),
            result: String::new(),
            error: None,
            loading: false,
            phase: Phase::Idle,
        }
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.formula.trim().is_empty()
    }

    /// Selects the view for this snapshot.
    #[must_use]
    pub fn view(&self) -> View {
        select_view(self)
    }
}

/// Result of a call to [`Controller::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The formula was blank; no request was made.
    Rejected,
    /// A request was already outstanding; nothing changed.
    Busy,
    /// The request returned text.
    Succeeded,
    /// The request failed.
    Failed,
}

/// Owns the form state and runs one request at a time.
///
/// State changes are published through a `watch` channel; see
/// [`Controller::subscribe`].
pub struct Controller {
    composer: Composer,
    credentials: Arc<dyn CredentialSource>,
    state: watch::Sender<FormState>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("composer", &self.composer)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates a controller with `default_grade` preselected.
    #[must_use]
    pub fn new(
        composer: Composer,
        credentials: Arc<dyn CredentialSource>,
        default_grade: GradeLevel,
    ) -> Self {
        let (state, _) = watch::channel(FormState::new(default_grade));
        Self {
            composer,
            credentials,
            state,
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state.borrow().can_submit()
    }

    /// Selects the view for the current state.
    #[must_use]
    pub fn view(&self) -> View {
        self.state.borrow().view()
    }

    /// Changes the selected grade. An in-flight request keeps the grade it
    /// was submitted with.
    pub fn select_grade(&self, grade: GradeLevel) {
        self.state.send_if_modified(|state| {
            let changed = state.grade != grade;
            state.grade = grade;
            changed
        });
    }

    /// Replaces the formula text. Ignored while a request is outstanding.
    ///
    /// Returns `false` if the edit was ignored.
    pub fn set_formula(&self, formula: impl Into<String>) -> bool {
        let formula = formula.into();
        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            accepted = true;
            let changed = state.formula != formula;
            state.formula = formula;
            changed
        });
        accepted
    }

    /// Submits the current formula.
    ///
    /// A blank formula sets [`EMPTY_FORMULA_MESSAGE`] without any network
    /// activity. Otherwise prior output is cleared, loading is raised, and the
    /// composer is called once; the loading flag is lowered on every exit path.
    pub async fn submit(&self) -> SubmitOutcome {
        let (grade, formula) = match self.begin() {
            Ok(inputs) => inputs,
            Err(outcome) => return outcome,
        };
        let guard = LoadingGuard { state: &self.state };

        let outcome = match self.run(grade, &formula).await {
            Ok(text) => {
                info!(%grade, text_len = text.len(), "formula analysis succeeded");
                self.settle(PhaseEvent::Succeed, |state| {
                    state.result = text;
                    state.error = None;
                });
                SubmitOutcome::Succeeded
            }
            Err(cause) => {
                error!(%grade, %cause, "formula analysis failed");
                self.settle(PhaseEvent::Fail, |state| {
                    state.result.clear();
                    state.error = Some(ANALYSIS_FAILURE_MESSAGE.to_owned());
                });
                SubmitOutcome::Failed
            }
        };

        drop(guard);
        outcome
    }

    /// Validates and enters loading in one state update, returning the
    /// request inputs.
    fn begin(&self) -> Result<(GradeLevel, String), SubmitOutcome> {
        let mut begun = Err(SubmitOutcome::Busy);
        self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            if state.formula.trim().is_empty() {
                state.error = Some(EMPTY_FORMULA_MESSAGE.to_owned());
                begun = Err(SubmitOutcome::Rejected);
                return true;
            }
            if let Err(err) = state.phase.transition(PhaseEvent::Submit) {
                warn!(error = %err, "submit refused");
                return false;
            }
            state.error = None;
            state.result.clear();
            state.loading = true;
            begun = Ok((state.grade, state.formula.clone()));
            true
        });
        begun
    }

    async fn run(&self, grade: GradeLevel, formula: &str) -> Result<String, String> {
        let credential = self.credentials.resolve().map_err(|err| err.to_string())?;
        self.composer
            .request_analysis(&credential, grade, formula)
            .await
            .map_err(|err| err.to_string())
    }

    fn settle(&self, event: PhaseEvent, apply: impl FnOnce(&mut FormState)) {
        self.state.send_modify(|state| {
            if let Err(err) = state.phase.transition(event) {
                warn!(error = %err, "unexpected completion");
            }
            apply(state);
            state.loading = false;
        });
    }
}

/// Lowers the loading flag if the submit future is dropped before settling.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FormState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if !state.loading {
                return false;
            }
            warn!("analysis request abandoned before completion");
            // Loading implies Phase::Loading, so this cannot fail.
            let _ = state.phase.transition(PhaseEvent::Abandon);
            state.loading = false;
            true
        });
    }
}
