use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::models::{SessionReport, Trial};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WindowPhase {
    Idle,
    Armed,
    Open,
    Classifying,
    Finalized,
    Error,
}

impl Default for WindowPhase {
    fn default() -> Self {
        WindowPhase::Idle
    }
}

impl WindowPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WindowPhase::Finalized | WindowPhase::Error)
    }
}

/// The single live acquisition session and its trial.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionSession {
    pub id: String,
    pub trial: Trial,
    pub window_ms: u64,
    pub phase: WindowPhase,
    pub armed_at: DateTime<Utc>,
    pub report: Option<SessionReport>,
    pub failure: Option<String>,
    #[serde(skip)]
    pub armed_anchor: Option<Instant>,
}

impl AcquisitionSession {
    pub fn gate_open(&self) -> bool {
        self.phase == WindowPhase::Open
    }

    pub fn result_finalized(&self) -> bool {
        self.phase == WindowPhase::Finalized
    }

    pub fn remaining_ms(&self) -> u64 {
        match (self.phase, self.armed_anchor) {
            (WindowPhase::Armed, Some(anchor)) => {
                let elapsed = anchor.elapsed().as_millis() as u64;
                self.window_ms.saturating_sub(elapsed)
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub session: Option<AcquisitionSession>,
}

impl WindowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WindowPhase {
        self.session
            .as_ref()
            .map(|session| session.phase)
            .unwrap_or(WindowPhase::Idle)
    }

    /// Replaces whatever session was live; its result flag goes with it.
    pub fn begin_session(&mut self, session_id: String, trial: Trial, window_ms: u64, now: Instant) {
        self.session = Some(AcquisitionSession {
            id: session_id,
            trial,
            window_ms,
            phase: WindowPhase::Armed,
            armed_at: Utc::now(),
            report: None,
            failure: None,
            armed_anchor: Some(now),
        });
    }

    /// Timer expiry for `session_id`. A stale id is ignored.
    pub fn open(&mut self, session_id: &str) -> bool {
        match self.session.as_mut() {
            Some(session) if session.id == session_id && session.phase == WindowPhase::Armed => {
                session.phase = WindowPhase::Open;
                session.armed_anchor = None;
                true
            }
            _ => false,
        }
    }

    /// `Open → Classifying`; hands back what the pipeline needs.
    pub fn begin_classifying(&mut self) -> Option<(String, Trial)> {
        let session = self.session.as_mut()?;
        if session.phase != WindowPhase::Open {
            return None;
        }
        session.phase = WindowPhase::Classifying;
        Some((session.id.clone(), session.trial))
    }

    pub fn finalize(&mut self, session_id: &str, report: SessionReport) -> bool {
        match self.classifying_session(session_id) {
            Some(session) => {
                session.phase = WindowPhase::Finalized;
                session.report = Some(report);
                true
            }
            None => false,
        }
    }

    pub fn fail(&mut self, session_id: &str, reason: String) -> bool {
        match self.classifying_session(session_id) {
            Some(session) => {
                session.phase = WindowPhase::Error;
                session.failure = Some(reason);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    fn classifying_session(&mut self, session_id: &str) -> Option<&mut AcquisitionSession> {
        self.session
            .as_mut()
            .filter(|session| session.id == session_id && session.phase == WindowPhase::Classifying)
    }
}
