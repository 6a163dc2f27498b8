// crates/relink-core/src/state.rs
//
// Controller-owned, UI-facing restoration state. One per controller, never a
// process-wide singleton; each open project gets its own.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorationPhase {
    Scanning,
    Restoring,
    UserInput,
    /// Also the idle state before the first pass and after a reset.
    Completed,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestorationState {
    pub phase:    RestorationPhase,
    /// 0–100.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:    Option<String>,
}

impl Default for RestorationState {
    fn default() -> Self {
        Self { phase: RestorationPhase::Completed, progress: 0, error: None }
    }
}

impl RestorationState {
    pub fn awaiting_user(&self) -> bool {
        self.phase == RestorationPhase::UserInput
    }
}
