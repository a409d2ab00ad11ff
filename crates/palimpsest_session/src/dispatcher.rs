//! Starting runs and folding their event streams into the session.

use crate::config::SessionConfig;
use crate::fold::{RunEffect, fold_run_event};
use crate::observer::{SessionObserver, Toast};
use crate::session::SharedSession;
use crate::target::RunTarget;
use futures_util::StreamExt;
use palimpsest_core::{CachedVersion, CallId, RunLogEntry, Version, VersionId, VersionKey};
use palimpsest_error::{
    PalimpsestResult, RunError, RunErrorKind, SessionError, SessionErrorKind,
};
use palimpsest_interface::RunBackend;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// How a run that returned normally ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "end", content = "message")]
pub enum RunEnd {
    /// The backend reported completion
    Completed,
    /// The backend reported failure with this message
    Failed(String),
    /// The caller cancelled before a terminal status arrived
    Cancelled,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    /// Call id the run was logged under
    pub call_id: CallId,
    /// Target resolved at start
    pub target: RunTarget,
    /// Bucket the live entry ended up in
    pub key: VersionKey,
    /// How the run ended
    pub end: RunEnd,
    /// Last folded state of the entry
    pub entry: RunLogEntry,
    /// Version created for this run, if any
    pub created_version: Option<VersionId>,
}

enum Pending {
    Toast(Toast),
    RunLogs(VersionKey),
    Versions,
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn next_ordinal(versions: &[Version]) -> u32 {
    versions
        .iter()
        .map(|v| v.ordinal)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Starts runs of the session's draft or original and folds their events.
///
/// Any number of runs may be in flight at once unless the configuration sets
/// `max_concurrent_runs`. Each run is logged under its own random call id.
#[derive(Clone)]
pub struct RunDispatcher {
    session: SharedSession,
    backend: Arc<dyn RunBackend>,
    observer: Arc<dyn SessionObserver>,
    config: SessionConfig,
    in_flight: Arc<AtomicUsize>,
}

impl RunDispatcher {
    /// Create a dispatcher for `session`.
    pub fn new(
        session: SharedSession,
        backend: Arc<dyn RunBackend>,
        observer: Arc<dyn SessionObserver>,
        config: SessionConfig,
    ) -> Self {
        Self {
            session,
            backend,
            observer,
            config,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The session this dispatcher writes to.
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Runs currently streaming.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> PalimpsestResult<InFlight> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlight(Arc::clone(&self.in_flight));
        if let Some(max) = self.config.max_concurrent_runs()
            && running >= *max
        {
            return Err(SessionError::new(SessionErrorKind::RunLimitReached(running)).into());
        }
        Ok(guard)
    }

    fn deliver(&self, pending: Vec<Pending>) {
        for item in pending {
            match item {
                Pending::Toast(toast) => self.observer.on_toast(&toast),
                Pending::RunLogs(key) => self.observer.on_run_logs_invalidated(&key),
                Pending::Versions => self.observer.on_versions_invalidated(),
            }
        }
    }

    /// Run the selected version or the draft with `sample_input`.
    ///
    /// Returns once the backend reports a terminal status or `cancel` fires.
    /// A completed or failed run has its live entry removed. On a stream
    /// error the entry keeps whatever was folded so far, an error toast is
    /// shown and the error is returned; the run's real fate is unknown.
    #[tracing::instrument(skip(self, sample_input, cancel))]
    pub async fn run(
        &self,
        sample_input: BTreeMap<String, String>,
        cancel: CancellationToken,
    ) -> PalimpsestResult<RunOutcome> {
        let _in_flight = self.acquire()?;
        let call_id = CallId::random();

        let (target, request, mut key) = {
            let mut session = self.session.write().await;
            let status = session
                .status()
                .ok_or_else(|| SessionError::new(SessionErrorKind::NoVersionSelected))?;
            if !status.can_run {
                return Err(SessionError::new(SessionErrorKind::InvalidDraft(format!(
                    "{:?}",
                    status.issues
                )))
                .into());
            }
            let target = session.resolve_target()?;
            let (Some(original), Some(draft)) = (session.original(), session.draft()) else {
                return Err(SessionError::new(SessionErrorKind::NoVersionSelected).into());
            };
            let request = target.request(original, draft, sample_input);
            let key = target.version_key();
            session.upsert_run(key.clone(), call_id.clone(), RunLogEntry::default());
            (target, request, key)
        };

        tracing::info!(call = %call_id, target = ?target, "Starting run");

        let mut stream = match self.backend.run_stream(&request).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "Backend refused to start run");
                self.session.write().await.remove_run(&key, &call_id);
                self.observer
                    .on_toast(&Toast::error(format!("Failed to start run: {}", err)));
                return Err(RunError::new(RunErrorKind::Start(err.to_string())).into());
            }
        };

        let mut created_version = None;
        loop {
            let item = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!(call = %call_id, "Run cancelled");
                    let entry = self
                        .session
                        .write()
                        .await
                        .remove_run(&key, &call_id)
                        .unwrap_or_default();
                    self.observer.on_toast(&Toast::info("Run cancelled"));
                    return Ok(RunOutcome {
                        call_id,
                        target,
                        key,
                        end: RunEnd::Cancelled,
                        entry,
                        created_version,
                    });
                }
                item = stream.next() => item,
            };

            let event = match item {
                Some(Ok(event)) => event,
                Some(Err(err)) => {
                    tracing::warn!(call = %call_id, error = %err, "Run stream failed");
                    self.observer
                        .on_toast(&Toast::error(format!("Run failed: {}", err)));
                    return Err(RunError::new(RunErrorKind::Stream(err.to_string())).into());
                }
                None => {
                    tracing::warn!(call = %call_id, "Run stream ended without a terminal status");
                    self.observer
                        .on_toast(&Toast::error("Run ended without a completion status"));
                    return Err(RunError::new(RunErrorKind::Truncated).into());
                }
            };

            let mut pending = Vec::new();
            let mut end = None;
            let entry = {
                let mut session = self.session.write().await;
                let current = session.run_log(&key, &call_id).cloned().unwrap_or_default();
                let fold = fold_run_event(current, &event);
                session.upsert_run(key.clone(), call_id.clone(), fold.entry.clone());

                for effect in fold.effects {
                    match effect {
                        RunEffect::VersionCreated { id, ordinal } => {
                            if request.version_id.is_some() {
                                tracing::debug!(version = %id, "Ignoring version id echoed for an existing version");
                                continue;
                            }
                            let ordinal =
                                ordinal.unwrap_or_else(|| next_ordinal(session.versions()));
                            session.set_cache(CachedVersion {
                                id: id.clone(),
                                ordinal,
                                fields: request.fields(),
                            });
                            let new_key = VersionKey::Version(id.clone());
                            session.rekey_run(&key, new_key.clone(), &call_id);
                            key = new_key;
                            created_version = Some(id);
                            pending.push(Pending::Versions);
                        }
                        RunEffect::Completed => {
                            session.remove_run(&key, &call_id);
                            pending.push(Pending::RunLogs(key.clone()));
                            pending.push(Pending::Toast(Toast::success("Run completed")));
                            end = Some(RunEnd::Completed);
                        }
                        RunEffect::Failed { message } => {
                            session.remove_run(&key, &call_id);
                            pending.push(Pending::RunLogs(key.clone()));
                            pending.push(Pending::Toast(Toast::error(message.clone())));
                            end = Some(RunEnd::Failed(message));
                        }
                    }
                }
                fold.entry
            };
            self.deliver(pending);

            if let Some(end) = end {
                tracing::info!(call = %call_id, end = ?end, "Run finished");
                return Ok(RunOutcome {
                    call_id,
                    target,
                    key,
                    end,
                    entry,
                    created_version,
                });
            }
        }
    }
}
