// crates/relink-media/src/worker.rs
//
// RestoreWorker: a RestorationController on its own thread, for a UI that
// can't block on a pass. Commands go in over one channel; events come back
// over `rx`, which the UI drains once per frame.
//
// The thread owns a single-threaded tokio runtime. Per-reference tasks still
// overlap (tokio::fs and the directory walk run on the blocking pool), so the
// batch concurrency cap means the same thing here as anywhere else.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use relink_core::{
    RestorationPhase, RestorationResult, RestorationState, RestoreError, RestoreOptions,
    ResolutionDecision, ResolutionOutcome, Result, SavedMediaReference, SavedMusicReference,
};

use crate::controller::{scan_percent, RestorationController};
use crate::restore::{RestoreProgress, Restorer};

/// Results sent from the restore thread to the UI.
#[derive(Clone, Debug)]
pub enum RestoreEvent {
    /// Controller state after a transition.
    Phase(RestorationState),
    Finished { result: RestorationResult, needs_user_input: bool },
    Failed { msg: String },
    Resolved(ResolutionOutcome),
}

enum WorkerCmd {
    Restore {
        media:        Vec<SavedMediaReference>,
        music:        Vec<SavedMusicReference>,
        project_file: PathBuf,
        options:      RestoreOptions,
    },
    Resolve(Vec<ResolutionDecision>),
    CancelDialog,
    Reset,
    Shutdown,
}

pub struct RestoreWorker {
    pub rx:   Receiver<RestoreEvent>,
    cmd_tx:   Sender<WorkerCmd>,
    /// Last state the controller reported. Scanning progress is overlaid from
    /// `progress` on read.
    state:    Arc<Mutex<RestorationState>>,
    progress: Arc<RestoreProgress>,
    handle:   Option<JoinHandle<()>>,
}

impl RestoreWorker {
    pub fn new(restorer: Restorer) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (event_tx, rx)     = unbounded();
        let (cmd_tx, cmd_rx)   = unbounded::<WorkerCmd>();
        let state              = Arc::new(Mutex::new(RestorationState::default()));
        let progress           = restorer.progress();
        let mut controller     = RestorationController::new(restorer);

        // Snapshot first, then the event: a UI reacting to the event reads
        // the new state.
        let shared = Arc::clone(&state);
        let phases = event_tx.clone();
        controller.on_transition(move |s| {
            *shared.lock() = s.clone();
            let _ = phases.send(RestoreEvent::Phase(s.clone()));
        });

        let handle = thread::Builder::new()
            .name("relink-restore".into())
            .spawn(move || {
                while let Ok(cmd) = cmd_rx.recv() {
                    match cmd {
                        WorkerCmd::Restore { media, music, project_file, options } => {
                            let outcome = runtime.block_on(
                                controller.restore_project_media(&media, &music, &project_file, options),
                            );
                            let event = match outcome {
                                Ok(o)  => RestoreEvent::Finished { result: o.result, needs_user_input: o.needs_user_input },
                                Err(e) => RestoreEvent::Failed { msg: e.to_string() },
                            };
                            let _ = event_tx.send(event);
                        }
                        WorkerCmd::Resolve(decisions) => {
                            let outcome = controller.handle_missing_files_resolution(decisions);
                            let _ = event_tx.send(RestoreEvent::Resolved(outcome));
                        }
                        WorkerCmd::CancelDialog => {
                            controller.cancel_missing_files_dialog();
                        }
                        WorkerCmd::Reset => {
                            controller.reset_restoration();
                        }
                        WorkerCmd::Shutdown => break,
                    }
                }
                log::debug!("[worker] restore thread exiting");
            })?;

        Ok(Self { rx, cmd_tx, state, progress, handle: Some(handle) })
    }

    pub fn start(
        &self,
        media:        Vec<SavedMediaReference>,
        music:        Vec<SavedMusicReference>,
        project_file: PathBuf,
        options:      RestoreOptions,
    ) -> Result<()> {
        self.send(WorkerCmd::Restore { media, music, project_file, options })
    }

    pub fn resolve(&self, decisions: Vec<ResolutionDecision>) -> Result<()> {
        self.send(WorkerCmd::Resolve(decisions))
    }

    pub fn cancel_dialog(&self) -> Result<()> {
        self.send(WorkerCmd::CancelDialog)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(WorkerCmd::Reset)
    }

    /// Current state for the UI to render. During a scan the progress field
    /// tracks references processed so far.
    pub fn state(&self) -> RestorationState {
        let mut s = self.state.lock().clone();
        if s.phase == RestorationPhase::Scanning {
            s.progress = scan_percent(&self.progress);
        }
        s
    }

    /// Stop the thread after the command in flight. A pass already running
    /// finishes its current batch first; there is no mid-batch preemption.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(WorkerCmd::Shutdown);
        if let Some(h) = self.handle.take() {
            if h.join().is_err() {
                log::warn!("[worker] restore thread panicked");
            }
        }
    }

    fn send(&self, cmd: WorkerCmd) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| RestoreError::Worker("restore thread has exited".into()))
    }
}

impl Drop for RestoreWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
