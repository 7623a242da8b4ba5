use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::PipelineError,
    models::{SessionReport, Trial},
    pipeline::Pipeline,
};

use super::{WindowPhase, WindowState};

const ENABLE_LOGS: bool = true;

use crate::{session_error, session_info, session_warn};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub phase: WindowPhase,
    pub session_id: Option<String>,
    pub trial: Option<Trial>,
    pub remaining_ms: u64,
    pub report: Option<SessionReport>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WindowEvent {
    Armed {
        session_id: String,
        trial: Trial,
        window_ms: u64,
    },
    Opened {
        session_id: String,
    },
    Finalized {
        report: SessionReport,
    },
    Failed {
        session_id: String,
        reason: String,
    },
}

#[derive(Debug)]
pub enum TriggerResult {
    /// Gate not open; nothing was pulled.
    Rejected(WindowPhase),
    Finalized(SessionReport),
    /// Session already has its verdict; the pipeline did not run.
    AlreadyFinalized(SessionReport),
    /// The session is now in `Error`. Only a new trial recovers.
    Failed(PipelineError),
    /// A new trial was armed while this one was classifying.
    Superseded,
}

struct ArmedTimer {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

#[derive(Clone)]
pub struct WindowController {
    state: Arc<Mutex<WindowState>>,
    timer: Arc<Mutex<Option<ArmedTimer>>>,
    pipeline: Pipeline,
    window: Duration,
    events: broadcast::Sender<WindowEvent>,
}

impl WindowController {
    pub fn new(pipeline: Pipeline, window: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(WindowState::new())),
            timer: Arc::new(Mutex::new(None)),
            pipeline,
            window,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WindowEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> WindowSnapshot {
        let guard = self.state.lock().await;
        let session = guard.session.as_ref();
        WindowSnapshot {
            phase: guard.phase(),
            session_id: session.map(|s| s.id.clone()),
            trial: session.map(|s| s.trial),
            remaining_ms: session.map(|s| s.remaining_ms()).unwrap_or(0),
            report: session.and_then(|s| s.report.clone()),
        }
    }

    /// Starts a fresh session for `trial`. Any live timer is torn down
    /// before the new one is installed, and the old session is dropped.
    pub async fn arm_window(&self, trial: Trial) -> WindowSnapshot {
        let mut timer_guard = self.timer.lock().await;
        if let Some(previous) = timer_guard.take() {
            previous.cancel_token.cancel();
            previous.handle.abort();
        }

        let session_id = Uuid::new_v4().to_string();
        let window_ms = self.window.as_millis() as u64;
        {
            let mut state = self.state.lock().await;
            if let Some(previous) = state.session.as_ref() {
                if !previous.phase.is_terminal() {
                    session_warn!(previous.id, "superseded while {:?}", previous.phase);
                }
            }
            state.begin_session(session_id.clone(), trial, window_ms, Instant::now());
        }

        *timer_guard = Some(self.spawn_timer(session_id.clone()));
        drop(timer_guard);

        session_info!(session_id, "armed {} for {} ms", trial, window_ms);
        let _ = self.events.send(WindowEvent::Armed {
            session_id,
            trial,
            window_ms,
        });

        self.snapshot().await
    }

    /// Runs the pipeline once for the open session.
    pub async fn trigger(&self) -> TriggerResult {
        let (session_id, trial) = {
            let mut state = self.state.lock().await;
            match state.phase() {
                WindowPhase::Finalized => {
                    return match state.session.as_ref().and_then(|s| s.report.clone()) {
                        Some(report) => TriggerResult::AlreadyFinalized(report),
                        None => TriggerResult::Rejected(WindowPhase::Finalized),
                    };
                }
                WindowPhase::Open => match state.begin_classifying() {
                    Some(claimed) => claimed,
                    None => return TriggerResult::Rejected(WindowPhase::Open),
                },
                phase => return TriggerResult::Rejected(phase),
            }
        };

        session_info!(session_id, "classifying");
        let result = self.pipeline.run(&trial).await;

        let mut state = self.state.lock().await;
        match result {
            Ok((outcome, verdict)) => {
                let report = SessionReport {
                    session_id: session_id.clone(),
                    trial,
                    outcome,
                    verdict,
                    finalized_at: Utc::now(),
                };
                if !state.finalize(&session_id, report.clone()) {
                    session_warn!(session_id, "result discarded, a newer trial is live");
                    return TriggerResult::Superseded;
                }
                session_info!(
                    session_id,
                    "finalized: {} detected, correct={}",
                    outcome.label.as_str(),
                    verdict.is_correct
                );
                let _ = self.events.send(WindowEvent::Finalized {
                    report: report.clone(),
                });
                TriggerResult::Finalized(report)
            }
            Err(err) => {
                let reason = err.to_string();
                if !state.fail(&session_id, reason.clone()) {
                    session_warn!(session_id, "failure discarded, a newer trial is live: {}", reason);
                    return TriggerResult::Superseded;
                }
                session_error!(session_id, "pipeline failed: {}", reason);
                let _ = self.events.send(WindowEvent::Failed { session_id, reason });
                TriggerResult::Failed(err)
            }
        }
    }

    /// Drops the live session and its timer, back to `Idle`.
    pub async fn cancel(&self) {
        if let Some(timer) = self.timer.lock().await.take() {
            timer.cancel_token.cancel();
            timer.handle.abort();
        }
        self.state.lock().await.cancel();
    }

    fn spawn_timer(&self, session_id: String) -> ArmedTimer {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let state = self.state.clone();
        let events = self.events.clone();
        let window = self.window;

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(window) => {
                    let opened = state.lock().await.open(&session_id);
                    if opened {
                        session_info!(session_id, "gate open");
                        let _ = events.send(WindowEvent::Opened { session_id });
                    }
                }
                _ = token.cancelled() => {
                    session_info!(session_id, "window cancelled before expiry");
                }
            }
        });

        ArmedTimer {
            handle,
            cancel_token,
        }
    }
}
