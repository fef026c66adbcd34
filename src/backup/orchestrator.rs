//! Restore flow state machine
//!
//! Layers user-facing retry pacing on top of [`open_backup`]. A single
//! ambiguous decryption failure (most often a mistyped passphrase) is
//! forgiven once with an inline prompt. A second consecutive failure for the
//! same file, or any failure that is not a decryption failure, replaces the
//! form with a hard error offering only "try again" or "return home".
//!
//! The policy lives in the pure [`transition`] function. [`RestoreFlow`] owns
//! the draft (file, passphrase) and hands out numbered [`RestoreAttempt`]s;
//! a report for anything but the latest attempt is ignored.

use tracing::{debug, info, warn};

use crate::crypto::Passphrase;
use crate::error::RestoreError;

use super::restore::{open_backup, RestoreResult};

/// Where the restore flow currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreState {
    /// Form is interactive. `failures` counts consecutive failures for the
    /// currently selected file.
    Idle { failures: u32 },
    /// An attempt is in flight
    Submitted { failures: u32 },
    /// Inline, dismissible "passphrase didn't match" prompt
    SoftError { failures: u32 },
    /// Form replaced by an error panel
    HardError { error: RestoreError },
    /// Records decrypted and validated
    Success,
    /// User chose to return home
    Abandoned,
}

impl Default for RestoreState {
    fn default() -> Self {
        Self::Idle { failures: 0 }
    }
}

/// Something that happened to the restore flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreEvent {
    /// A different file was picked
    FileSelected,
    /// The user submitted the form
    Submit,
    /// The latest attempt finished
    Completed(Result<(), RestoreError>),
    /// The soft error prompt was dismissed
    Dismiss,
    /// "Try again" from the hard error panel
    TryAgain,
    /// "Return home" from the hard error panel
    ReturnHome,
}

/// Compute the next state
///
/// Events that make no sense in the current state leave it unchanged.
pub fn transition(state: &RestoreState, event: &RestoreEvent) -> RestoreState {
    use RestoreEvent as E;
    use RestoreState as S;

    match (state, event) {
        (S::Idle { .. } | S::SoftError { .. }, E::FileSelected) => S::Idle { failures: 0 },

        (S::Idle { failures } | S::SoftError { failures }, E::Submit) => S::Submitted {
            failures: *failures,
        },
        // Resubmitting supersedes the in-flight attempt
        (S::Submitted { failures }, E::Submit) => S::Submitted {
            failures: *failures,
        },

        (S::Submitted { .. }, E::Completed(Ok(()))) => S::Success,
        (S::Submitted { failures: 0 }, E::Completed(Err(error)))
            if error.is_decryption_failure() =>
        {
            S::SoftError { failures: 1 }
        }
        (S::Submitted { .. }, E::Completed(Err(error))) => S::HardError {
            error: error.clone(),
        },

        (S::SoftError { failures }, E::Dismiss) => S::Idle {
            failures: *failures,
        },

        (S::HardError { .. }, E::TryAgain) => S::Idle { failures: 0 },
        (S::HardError { .. }, E::ReturnHome) => S::Abandoned,

        (current, _) => current.clone(),
    }
}

/// One decrypt-and-validate attempt, detached from the flow
///
/// Can be run on any thread; hand the report back to
/// [`RestoreFlow::complete`].
#[derive(Debug)]
pub struct RestoreAttempt {
    ticket: u64,
    contents: String,
    passphrase: Passphrase,
}

/// Outcome of a [`RestoreAttempt`]
#[derive(Debug)]
pub struct AttemptReport {
    ticket: u64,
    outcome: Result<RestoreResult, RestoreError>,
}

impl RestoreAttempt {
    /// Ticket number of this attempt
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Decrypt and validate
    pub fn run(self) -> AttemptReport {
        debug!(ticket = self.ticket, "Running restore attempt");
        AttemptReport {
            ticket: self.ticket,
            outcome: open_backup(&self.contents, &self.passphrase),
        }
    }
}

/// The restore form and its retry policy
#[derive(Debug, Default)]
pub struct RestoreFlow {
    state: RestoreState,
    file_name: Option<String>,
    contents: Option<String>,
    passphrase: Option<Passphrase>,
    latest_ticket: u64,
    restored: Option<RestoreResult>,
}

impl RestoreFlow {
    /// Create a flow with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &RestoreState {
        &self.state
    }

    /// Name of the selected file, if any
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The restored records, once the flow has succeeded
    pub fn restored(&self) -> Option<&RestoreResult> {
        self.restored.as_ref()
    }

    /// Take ownership of the restored records
    pub fn take_restored(&mut self) -> Option<RestoreResult> {
        self.restored.take()
    }

    /// Select a backup file
    ///
    /// Picking a file resets the failure count; it is a new file as far as
    /// escalation is concerned.
    pub fn select_file(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        if !matches!(
            self.state,
            RestoreState::Idle { .. } | RestoreState::SoftError { .. }
        ) {
            return;
        }
        self.file_name = Some(name.into());
        self.contents = Some(contents.into());
        self.apply(RestoreEvent::FileSelected);
    }

    /// Replace the passphrase
    ///
    /// Any string counts once entered, including the empty one.
    pub fn set_passphrase(&mut self, passphrase: Passphrase) {
        if self.is_editable() {
            self.passphrase = Some(passphrase);
        }
    }

    /// Whether the form accepts input
    pub fn is_editable(&self) -> bool {
        matches!(
            self.state,
            RestoreState::Idle { .. } | RestoreState::SoftError { .. } | RestoreState::Submitted { .. }
        )
    }

    /// Whether submitting is currently allowed
    pub fn can_submit(&self) -> bool {
        self.is_editable() && self.contents.is_some() && self.passphrase.is_some()
    }

    /// Start a fresh attempt with the current file and passphrase
    ///
    /// Returns `None` if submission is not allowed right now. Any attempt
    /// still in flight is superseded.
    pub fn submit(&mut self) -> Option<RestoreAttempt> {
        if !self.can_submit() {
            return None;
        }
        let contents = self.contents.clone()?;
        let passphrase = self.passphrase.clone()?;

        self.latest_ticket += 1;
        self.apply(RestoreEvent::Submit);

        Some(RestoreAttempt {
            ticket: self.latest_ticket,
            contents,
            passphrase,
        })
    }

    /// Feed back the report of an attempt
    ///
    /// Reports from superseded attempts are dropped. Returns whether the
    /// report was applied.
    pub fn complete(&mut self, report: AttemptReport) -> bool {
        if report.ticket != self.latest_ticket
            || !matches!(self.state, RestoreState::Submitted { .. })
        {
            debug!(
                ticket = report.ticket,
                latest = self.latest_ticket,
                "Ignoring stale restore attempt"
            );
            return false;
        }

        match report.outcome {
            Ok(result) => {
                info!(check_ins = result.check_ins.len(), "Backup opened");
                self.restored = Some(result);
                self.apply(RestoreEvent::Completed(Ok(())));
            }
            Err(error) => {
                warn!(error = %error, "Restore attempt failed");
                self.apply(RestoreEvent::Completed(Err(error)));
            }
        }
        true
    }

    /// Submit and run synchronously
    pub fn submit_and_wait(&mut self) -> Option<&RestoreState> {
        let attempt = self.submit()?;
        self.complete(attempt.run());
        Some(&self.state)
    }

    /// Dismiss the inline soft error
    pub fn dismiss(&mut self) {
        self.apply(RestoreEvent::Dismiss);
    }

    /// "Try again" from the hard error panel: clear everything
    pub fn try_again(&mut self) {
        if matches!(self.state, RestoreState::HardError { .. }) {
            self.clear_draft();
            self.apply(RestoreEvent::TryAgain);
        }
    }

    /// "Return home" from the hard error panel
    pub fn return_home(&mut self) {
        if matches!(self.state, RestoreState::HardError { .. }) {
            self.clear_draft();
            self.apply(RestoreEvent::ReturnHome);
        }
    }

    fn clear_draft(&mut self) {
        self.file_name = None;
        self.contents = None;
        self.passphrase = None;
    }

    fn apply(&mut self, event: RestoreEvent) {
        let next = transition(&self.state, &event);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "Restore state change");
        }
        self.state = next;
    }
}
