//! Stop status cycling and route auto-completion.

use crate::route::{Route, RouteStatus, StopStatus};

/// Next status in the tap-to-cycle order `pending -> delivered -> failed -> pending`.
pub fn next_status(current: StopStatus) -> StopStatus {
    match current {
        StopStatus::Pending => StopStatus::Delivered,
        StopStatus::Delivered => StopStatus::Failed,
        StopStatus::Failed => StopStatus::Pending,
    }
}

/// Transition the route should take after a snapshot replacement, if any.
///
/// Returns `Some(Completed)` only for a pending route with at least one stop
/// where every stop is delivered. Pure; issuing the mutation is the caller's job.
pub fn evaluate_auto_completion(route: &Route) -> Option<RouteStatus> {
    let eligible = route.status == RouteStatus::Pending
        && !route.stops.is_empty()
        && route
            .stops
            .iter()
            .all(|stop| stop.status == StopStatus::Delivered);
    eligible.then_some(RouteStatus::Completed)
}
