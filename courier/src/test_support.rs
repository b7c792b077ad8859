//! Test-only helpers for constructing routes and scripting the gateway.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::io::gateway::SyncGateway;
use crate::route::{Route, RouteId, RouteStatus, Stop, StopId, StopStatus};

/// Id used by [`route`].
pub const TEST_ROUTE_ID: RouteId = 1;

/// Create a deterministic pending route starting in central Hanoi.
pub fn route(stops: Vec<Stop>) -> Route {
    Route {
        id: TEST_ROUTE_ID,
        name: "Test route".to_string(),
        status: RouteStatus::Pending,
        start_address: "1 Trang Tien, Hoan Kiem".to_string(),
        start_lat: Some(21.0285),
        start_lng: Some(105.8522),
        total_distance_meters: None,
        total_duration_seconds: None,
        encoded_path: None,
        stops,
    }
}

/// Create a deterministic completed route.
pub fn completed_route(stops: Vec<Stop>) -> Route {
    Route {
        status: RouteStatus::Completed,
        ..route(stops)
    }
}

/// Create a stop with no coordinate and no optimized order.
pub fn stop(id: StopId, status: StopStatus) -> Stop {
    Stop {
        id,
        address_text: format!("{} Test street", id),
        lat: None,
        lng: None,
        status,
        optimized_order: None,
    }
}

/// Create a pending stop at an explicit coordinate.
pub fn stop_at(id: StopId, lat: f64, lng: f64) -> Stop {
    Stop {
        lat: Some(lat),
        lng: Some(lng),
        ..stop(id, StopStatus::Pending)
    }
}

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    FetchRoute(RouteId),
    AddStop(RouteId, String),
    DeleteStop(RouteId, StopId),
    SetStopStatus(RouteId, StopId, StopStatus),
    SetRouteStatus(RouteId, RouteStatus),
}

struct ScriptedState {
    route: Route,
    next_stop_id: StopId,
    calls: Vec<GatewayCall>,
    pending_failures: usize,
    pending_route_status_failures: usize,
}

/// In-memory gateway holding the server-side copy of one route.
///
/// Every call is recorded. Mutations apply to the server copy the way the
/// backend would; `fail_next` makes upcoming calls fail without applying.
pub struct ScriptedGateway {
    state: Mutex<ScriptedState>,
    route_status_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedGateway {
    pub fn new(route: Route) -> Arc<Self> {
        let next_stop_id = route.stops.iter().map(|stop| stop.id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            state: Mutex::new(ScriptedState {
                route,
                next_stop_id,
                calls: Vec::new(),
                pending_failures: 0,
                pending_route_status_failures: 0,
            }),
            route_status_gate: Mutex::new(None),
        })
    }

    /// Fail the next `count` calls (of any kind) with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.lock().pending_failures = count;
    }

    /// Fail the next `count` `set_route_status` calls only.
    pub fn fail_route_status(&self, count: usize) {
        self.lock().pending_route_status_failures = count;
    }

    /// Hold every `set_route_status` call until the returned gate is notified.
    pub fn hold_route_status(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self
            .route_status_gate
            .lock()
            .expect("route status gate lock") = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn route_status_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, GatewayCall::SetRouteStatus(..)))
            .count()
    }

    pub fn server_route(&self) -> Route {
        self.lock().route.clone()
    }

    /// Replace the server copy, as if another client had edited it.
    pub fn set_server_route(&self, route: Route) {
        self.lock().route = route;
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().expect("scripted gateway lock")
    }

    /// Record `call`, then consume a pending failure if one is scripted.
    fn begin(&self, call: GatewayCall) -> Result<MutexGuard<'_, ScriptedState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.pending_failures > 0 {
            state.pending_failures -= 1;
            return Err(anyhow!("scripted transport failure"));
        }
        Ok(state)
    }

    fn check_route(state: &ScriptedState, route_id: RouteId) -> Result<()> {
        if state.route.id != route_id {
            return Err(anyhow!("route {route_id} returned 404"));
        }
        Ok(())
    }
}

#[async_trait]
impl SyncGateway for ScriptedGateway {
    async fn fetch_route(&self, route_id: RouteId) -> Result<Route> {
        let state = self.begin(GatewayCall::FetchRoute(route_id))?;
        Self::check_route(&state, route_id)?;
        Ok(state.route.clone())
    }

    async fn add_stop(&self, route_id: RouteId, address_text: &str) -> Result<StopId> {
        let mut state = self.begin(GatewayCall::AddStop(route_id, address_text.to_string()))?;
        Self::check_route(&state, route_id)?;
        let id = state.next_stop_id;
        state.next_stop_id += 1;
        state.route.stops.push(Stop {
            address_text: address_text.to_string(),
            ..stop(id, StopStatus::Pending)
        });
        Ok(id)
    }

    async fn delete_stop(&self, route_id: RouteId, stop_id: StopId) -> Result<()> {
        let mut state = self.begin(GatewayCall::DeleteStop(route_id, stop_id))?;
        Self::check_route(&state, route_id)?;
        let before = state.route.stops.len();
        state.route.stops.retain(|stop| stop.id != stop_id);
        if state.route.stops.len() == before {
            return Err(anyhow!("stop {stop_id} returned 404"));
        }
        Ok(())
    }

    async fn set_stop_status(
        &self,
        route_id: RouteId,
        stop_id: StopId,
        status: StopStatus,
    ) -> Result<()> {
        let mut state = self.begin(GatewayCall::SetStopStatus(route_id, stop_id, status))?;
        Self::check_route(&state, route_id)?;
        let stop = state
            .route
            .stops
            .iter_mut()
            .find(|stop| stop.id == stop_id)
            .ok_or_else(|| anyhow!("stop {stop_id} returned 404"))?;
        stop.status = status;
        Ok(())
    }

    async fn set_route_status(&self, route_id: RouteId, status: RouteStatus) -> Result<()> {
        {
            let mut state = self.begin(GatewayCall::SetRouteStatus(route_id, status))?;
            if state.pending_route_status_failures > 0 {
                state.pending_route_status_failures -= 1;
                return Err(anyhow!("route status update returned 503"));
            }
        }
        let gate = self
            .route_status_gate
            .lock()
            .expect("route status gate lock")
            .clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut state = self.lock();
        Self::check_route(&state, route_id)?;
        state.route.status = status;
        Ok(())
    }
}
