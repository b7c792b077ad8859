//! Route session: fetch/mutate/refetch orchestration for one route view.
//!
//! The session owns the current snapshot and never patches it locally. Every
//! successful mutation is followed by a full re-fetch, and the snapshot only
//! changes when that fetch lands. Concurrency rules:
//!
//! - Each fetch is tagged with a monotonically increasing sequence number. A
//!   response is applied only if its number is still the latest issued, so a
//!   slow reload can never overwrite newer state.
//! - At most one completion mutation is in flight per session. Eligibility
//!   signals raised while it runs are ignored and a manual completion request
//!   is rejected with `Conflict`.
//! - [`RouteSession::close`] flips the liveness token. Requests already in
//!   flight finish, but their responses are dropped and no follow-up fetch is
//!   issued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::core::invariants::validate_route;
use crate::core::map_view::{MapSettings, MapView, build_map_view};
use crate::core::preconditions::{
    check_completion_request, check_editable, check_stop_mutation, validate_address,
};
use crate::core::status::{evaluate_auto_completion, next_status};
use crate::core::summary::{RouteSummary, summarize};
use crate::error::SessionError;
use crate::io::gateway::SyncGateway;
use crate::route::{Route, RouteId, RouteStatus, StopId, StopStatus};

/// What happened to a fetch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refresh {
    /// Snapshot replaced; carries the auto-completion signal for it.
    Applied { transition: Option<RouteStatus> },
    /// A newer fetch was issued meanwhile; response dropped.
    Superseded,
    /// Session closed meanwhile; response dropped.
    Abandoned,
}

#[derive(Default)]
struct SessionState {
    route_id: Option<RouteId>,
    snapshot: Option<Arc<Route>>,
    /// Sequence number of the most recently issued fetch.
    latest_fetch: u64,
}

/// Clears the completion flag when the in-flight attempt ends, however it ends.
struct CompletionGuard<'a>(&'a AtomicBool);

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Request a stop status change after checking it against `route`.
///
/// Completed routes are rejected with `Conflict` and unknown stops with
/// `NotFound`, both before the gateway is called. Success only means the
/// remote accepted the change; callers re-fetch for the new state.
pub async fn apply_stop_status(
    gateway: &dyn SyncGateway,
    route: &Route,
    stop_id: StopId,
    requested: StopStatus,
) -> Result<(), SessionError> {
    check_stop_mutation(route, stop_id)?;
    gateway
        .set_stop_status(route.id, stop_id, requested)
        .await
        .map_err(SessionError::network)?;
    info!(route_id = route.id, stop_id, status = %requested, "stop status updated");
    Ok(())
}

/// Owner of one route's snapshot.
pub struct RouteSession {
    gateway: Arc<dyn SyncGateway>,
    state: Mutex<SessionState>,
    alive: AtomicBool,
    completion_in_flight: AtomicBool,
}

impl RouteSession {
    pub fn new(gateway: Arc<dyn SyncGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(SessionState::default()),
            alive: AtomicBool::new(true),
            completion_in_flight: AtomicBool::new(false),
        }
    }

    /// Current snapshot, or `None` before the first successful load.
    pub fn current_snapshot(&self) -> Option<Arc<Route>> {
        self.state().snapshot.clone()
    }

    pub fn map_view(&self, settings: &MapSettings) -> Option<MapView> {
        self.current_snapshot()
            .map(|route| build_map_view(&route, settings))
    }

    pub fn summary(&self) -> Option<RouteSummary> {
        self.current_snapshot().map(|route| summarize(&route))
    }

    pub fn is_closed(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }

    /// Abandon the session. In-flight requests complete but never touch the
    /// snapshot, and later operations are rejected.
    pub fn close(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            debug!(route_id = ?self.state().route_id, "route session closed");
        }
    }

    /// Fetch `route_id` and replace the snapshot wholesale.
    pub async fn load(&self, route_id: RouteId) -> Result<(), SessionError> {
        self.ensure_alive()?;
        self.state().route_id = Some(route_id);
        self.reload(route_id).await
    }

    pub async fn add_stop(&self, address_text: &str) -> Result<(), SessionError> {
        let address = validate_address(address_text)?;
        let route = self.loaded_route()?;
        check_editable(&route)?;

        let stop_id = self
            .gateway
            .add_stop(route.id, address)
            .await
            .map_err(|err| self.network_failure("add stop", err))?;
        info!(route_id = route.id, stop_id, "stop added");
        self.reload(route.id).await
    }

    pub async fn delete_stop(&self, stop_id: StopId) -> Result<(), SessionError> {
        let route = self.loaded_route()?;
        check_stop_mutation(&route, stop_id)?;

        self.gateway
            .delete_stop(route.id, stop_id)
            .await
            .map_err(|err| self.network_failure("delete stop", err))?;
        info!(route_id = route.id, stop_id, "stop deleted");
        self.reload(route.id).await
    }

    pub async fn set_stop_status(
        &self,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<(), SessionError> {
        let route = self.loaded_route()?;
        apply_stop_status(self.gateway.as_ref(), &route, stop_id, status)
            .await
            .inspect_err(|err| {
                if !err.is_local() {
                    warn!(route_id = route.id, stop_id, error = %err, "set stop status failed");
                }
            })?;
        self.reload(route.id).await
    }

    /// Move a stop to the next status in its cycle.
    pub async fn advance_stop(&self, stop_id: StopId) -> Result<(), SessionError> {
        let route = self.loaded_route()?;
        let current = check_stop_mutation(&route, stop_id)?.status;
        self.set_stop_status(stop_id, next_status(current)).await
    }

    /// User-confirmed completion of a pending route.
    pub async fn request_completion(&self) -> Result<(), SessionError> {
        let route = self.loaded_route()?;
        check_completion_request(&route)?;
        let guard = self.try_begin_completion().ok_or_else(|| {
            SessionError::Conflict(format!("route {} completion already in flight", route.id))
        })?;

        self.gateway
            .set_route_status(route.id, RouteStatus::Completed)
            .await
            .map_err(|err| self.network_failure("complete route", err))?;
        drop(guard);
        info!(route_id = route.id, "route completed by request");
        self.reload(route.id).await
    }

    /// Fetch, apply, then issue an auto-completion if the new snapshot asks for one.
    ///
    /// Once the fetched snapshot is applied the triggering operation has
    /// succeeded; a failed auto-completion is logged and retried on the next
    /// reload instead of being reported to the caller.
    async fn reload(&self, route_id: RouteId) -> Result<(), SessionError> {
        let Refresh::Applied {
            transition: Some(target),
        } = self.fetch_and_apply(route_id).await?
        else {
            return Ok(());
        };

        let Some(_guard) = self.try_begin_completion() else {
            debug!(route_id, "route completion already in flight; ignoring signal");
            return Ok(());
        };

        info!(route_id, status = %target, "all stops delivered; completing route");
        if let Err(err) = self.gateway.set_route_status(route_id, target).await {
            warn!(
                route_id,
                error = %SessionError::network(err),
                "auto-completion failed; route left pending"
            );
            return Ok(());
        }

        match self.fetch_and_apply(route_id).await {
            Ok(Refresh::Applied {
                transition: Some(_),
            }) => {
                warn!(route_id, "route still eligible for completion after completing it");
            }
            Ok(_) => {}
            Err(err) => {
                warn!(route_id, error = %err, "reload after auto-completion failed");
            }
        }
        Ok(())
    }

    /// Claim the single completion slot, or `None` if a completion is in flight.
    fn try_begin_completion(&self) -> Option<CompletionGuard<'_>> {
        if self.completion_in_flight.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(CompletionGuard(&self.completion_in_flight))
    }

    async fn fetch_and_apply(&self, route_id: RouteId) -> Result<Refresh, SessionError> {
        if self.is_closed() {
            debug!(route_id, "session closed; skipping route fetch");
            return Ok(Refresh::Abandoned);
        }
        let seq = {
            let mut state = self.state();
            state.latest_fetch += 1;
            state.latest_fetch
        };
        debug!(route_id, seq, "fetching route");

        let fetched = self.gateway.fetch_route(route_id).await;

        if self.is_closed() {
            debug!(route_id, seq, "session closed; dropping route response");
            return Ok(Refresh::Abandoned);
        }

        let mut state = self.state();
        if seq != state.latest_fetch {
            warn!(
                route_id,
                seq,
                latest = state.latest_fetch,
                "discarding stale route response"
            );
            return Ok(Refresh::Superseded);
        }

        let route = fetched.map_err(|err| self.network_failure("fetch route", err))?;
        let errors = validate_route(&route);
        if !errors.is_empty() {
            let err = SessionError::Network(format!(
                "route {} failed invariants: {}",
                route_id,
                errors.join("; ")
            ));
            warn!(route_id, error = %err, "rejecting route snapshot");
            return Err(err);
        }

        let transition = evaluate_auto_completion(&route);
        debug!(
            route_id,
            seq,
            status = %route.status,
            stops = route.stops.len(),
            "route snapshot replaced"
        );
        state.snapshot = Some(Arc::new(route));
        Ok(Refresh::Applied { transition })
    }

    fn loaded_route(&self) -> Result<Arc<Route>, SessionError> {
        self.ensure_alive()?;
        self.current_snapshot().ok_or(SessionError::NotLoaded)
    }

    fn ensure_alive(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::Conflict("session closed".to_string()));
        }
        Ok(())
    }

    fn network_failure(&self, action: &str, err: anyhow::Error) -> SessionError {
        let err = SessionError::network(err);
        warn!(action, error = %err, "remote call failed; snapshot unchanged");
        err
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
