//! Local checks run before any mutation reaches the gateway.

use crate::error::SessionError;
use crate::route::{Route, RouteStatus, Stop, StopId};

/// Trimmed address text, or `Validation` when nothing is left.
pub fn validate_address(address_text: &str) -> Result<&str, SessionError> {
    let trimmed = address_text.trim();
    if trimmed.is_empty() {
        return Err(SessionError::Validation(
            "stop address must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Stops may only be added or removed while the route is pending.
pub fn check_editable(route: &Route) -> Result<(), SessionError> {
    if route.status == RouteStatus::Completed {
        return Err(SessionError::Conflict(format!(
            "route {} is completed",
            route.id
        )));
    }
    Ok(())
}

/// Resolve `stop_id` for a stop mutation on an editable route.
pub fn check_stop_mutation(route: &Route, stop_id: StopId) -> Result<&Stop, SessionError> {
    check_editable(route)?;
    route.find_stop(stop_id).ok_or_else(|| {
        SessionError::NotFound(format!("stop {} is not on route {}", stop_id, route.id))
    })
}

/// Completion can only be requested for a pending route.
pub fn check_completion_request(route: &Route) -> Result<(), SessionError> {
    if route.status != RouteStatus::Pending {
        return Err(SessionError::Conflict(format!(
            "route {} is already {}",
            route.id, route.status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::StopStatus;
    use crate::test_support::{completed_route, route, stop};

    #[test]
    fn blank_addresses_are_rejected() {
        for blank in ["", "   ", "\t\n"] {
            assert!(matches!(
                validate_address(blank),
                Err(SessionError::Validation(_))
            ));
        }
        assert_eq!(validate_address("  5 Trang Tien "), Ok("5 Trang Tien"));
    }

    #[test]
    fn completed_route_rejects_stop_mutation_before_lookup() {
        let route = completed_route(vec![stop(1, StopStatus::Delivered)]);
        assert!(matches!(
            check_stop_mutation(&route, 99),
            Err(SessionError::Conflict(_))
        ));
    }

    #[test]
    fn unknown_stop_is_not_found() {
        let route = route(vec![stop(1, StopStatus::Pending)]);
        assert!(matches!(
            check_stop_mutation(&route, 2),
            Err(SessionError::NotFound(_))
        ));
        assert_eq!(check_stop_mutation(&route, 1).map(|stop| stop.id), Ok(1));
    }

    #[test]
    fn completion_request_requires_pending_route() {
        assert!(check_completion_request(&route(Vec::new())).is_ok());
        assert!(matches!(
            check_completion_request(&completed_route(Vec::new())),
            Err(SessionError::Conflict(_))
        ));
    }
}
