// crates/relink-media/src/controller.rs
//
// RestorationController: the stateful façade the editor drives.
//
//   Completed(idle) ─restore_project_media─▶ Scanning ─▶ Restoring ─┬▶ UserInput ─resolve/cancel─▶ Completed
//                                               │                    └▶ Completed
//                                               └─ orchestrator error ─▶ Error
//
// One controller per open project. It never runs two passes at once; the
// `&mut self` receivers make that the caller's problem by construction.
// Progress is a field the UI polls, not a callback; while a pass is in flight
// poll `progress_handle()` instead, the controller itself is borrowed. Phase
// changes can also be pushed out as they happen with `on_transition`.

use std::path::Path;
use std::sync::Arc;

use relink_core::{
    RestorationPhase, RestorationResult, RestorationState, RestoreOptions, ResolutionDecision,
    ResolutionOutcome, Result, SavedMediaReference, SavedMusicReference,
};

use crate::restore::{RestoreProgress, Restorer};

/// Scanning covers 0..SCAN_PROGRESS_CEILING; classification wrap-up and the
/// user round take it to 100.
pub const SCAN_PROGRESS_CEILING: u8 = 80;

#[derive(Clone, Debug, PartialEq)]
pub struct RestoreOutcome {
    pub result:           RestorationResult,
    /// Missing files remain and the caller asked for a dialog.
    pub needs_user_input: bool,
}

type TransitionHook = Box<dyn Fn(&RestorationState) + Send>;

pub struct RestorationController {
    restorer: Restorer,
    state:    RestorationState,
    result:   Option<RestorationResult>,
    observer: Option<TransitionHook>,
}

impl RestorationController {
    pub fn new(restorer: Restorer) -> Self {
        Self { restorer, state: RestorationState::default(), result: None, observer: None }
    }

    /// Called with the new state on every phase change, including the
    /// intermediate ones a caller awaiting the pass would never see.
    pub fn on_transition(&mut self, hook: impl Fn(&RestorationState) + Send + 'static) {
        self.observer = Some(Box::new(hook));
    }

    pub fn state(&self) -> &RestorationState {
        &self.state
    }

    /// Result of the last successful pass, cleared by `reset_restoration`.
    pub fn result(&self) -> Option<&RestorationResult> {
        self.result.as_ref()
    }

    pub fn missing_files(&self) -> &[SavedMediaReference] {
        self.result.as_ref().map(|r| r.missing_files.as_slice()).unwrap_or_default()
    }

    pub fn progress_handle(&self) -> Arc<RestoreProgress> {
        self.restorer.progress()
    }

    pub async fn restore_project_media(
        &mut self,
        media:        &[SavedMediaReference],
        music:        &[SavedMusicReference],
        project_file: &Path,
        options:      RestoreOptions,
    ) -> Result<RestoreOutcome> {
        self.result = None;
        self.transition(RestorationPhase::Scanning, 0);

        let result = match self.restorer.restore(media, music, project_file, &options).await {
            Ok(r) => r,
            Err(e) => {
                log::error!("[restore] pass failed: {e}");
                self.set_state(RestorationState {
                    phase:    RestorationPhase::Error,
                    progress: 0,
                    error:    Some(e.to_string()),
                });
                return Err(e);
            }
        };

        self.transition(RestorationPhase::Restoring, SCAN_PROGRESS_CEILING);

        let needs_user_input = result.has_unresolved() && options.show_dialog && !options.auto_resolve;
        if needs_user_input {
            self.transition(RestorationPhase::UserInput, SCAN_PROGRESS_CEILING);
        } else {
            if options.auto_resolve && result.has_unresolved() {
                log::info!(
                    "[restore] auto-resolve: {} unresolved file(s) left out of the project",
                    result.missing_files.len()
                );
            }
            self.transition(RestorationPhase::Completed, 100);
        }

        self.result = Some(result.clone());
        Ok(RestoreOutcome { result, needs_user_input })
    }

    /// Apply the user's decisions. Files the user didn't decide on are left
    /// to the caller's bookkeeping. Always ends Completed.
    pub fn handle_missing_files_resolution(&mut self, decisions: Vec<ResolutionDecision>) -> ResolutionOutcome {
        let outcome = ResolutionOutcome::from_decisions(decisions);
        log::info!(
            "[restore] resolution: {} found, {} removed",
            outcome.found_files.len(),
            outcome.removed_files.len()
        );
        self.transition(RestorationPhase::Completed, 100);
        outcome
    }

    /// User closed the dialog without deciding. Nothing new is restored.
    pub fn cancel_missing_files_dialog(&mut self) {
        if !self.state.awaiting_user() {
            log::debug!("[restore] cancel ignored in phase {:?}", self.state.phase);
            return;
        }
        self.transition(RestorationPhase::Completed, 100);
    }

    /// Back to idle with no result, from any phase. For reuse across projects.
    pub fn reset_restoration(&mut self) {
        self.result = None;
        self.set_state(RestorationState::default());
    }

    fn transition(&mut self, phase: RestorationPhase, progress: u8) {
        log::debug!("[restore] phase {:?} → {:?} ({progress}%)", self.state.phase, phase);
        self.set_state(RestorationState { phase, progress, error: None });
    }

    fn set_state(&mut self, state: RestorationState) {
        self.state = state;
        if let Some(hook) = &self.observer {
            hook(&self.state);
        }
    }
}

/// Map pass progress onto the 0..SCAN_PROGRESS_CEILING scanning band.
pub fn scan_percent(progress: &RestoreProgress) -> u8 {
    (progress.fraction() * f64::from(SCAN_PROGRESS_CEILING)).round() as u8
}
