//! Human-readable route header and stop list.

use std::fmt;

use serde::Serialize;

use crate::route::{Route, RouteStatus, StopId, StopStatus};

const START_ADDRESS_PLACEHOLDER: &str = "not set";
const NOT_OPTIMIZED_NOTICE: &str = "route not optimized yet";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopLine {
    pub id: StopId,
    /// Optimized position, or `-` before optimization.
    pub order_label: String,
    pub address: String,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub start_address: String,
    pub status_label: &'static str,
    /// Distance/duration line, or the not-optimized notice.
    pub trip: String,
    /// Stops can still be added, removed, or have their status changed.
    pub editable: bool,
    /// Whether a manual "complete route" action should be offered.
    pub offers_completion: bool,
    pub stops: Vec<StopLine>,
}

pub fn summarize(route: &Route) -> RouteSummary {
    let start_address = if route.start_address.trim().is_empty() {
        START_ADDRESS_PLACEHOLDER.to_string()
    } else {
        route.start_address.clone()
    };

    RouteSummary {
        name: route.name.clone(),
        start_address,
        status_label: route_status_label(route.status),
        trip: trip_text(route.total_distance_meters, route.total_duration_seconds),
        editable: route.is_pending(),
        offers_completion: route.is_pending() && !route.stops.is_empty(),
        stops: route
            .stops
            .iter()
            .map(|stop| StopLine {
                id: stop.id,
                order_label: stop
                    .optimized_order
                    .map_or_else(|| "-".to_string(), |order| order.to_string()),
                address: stop.address_text.clone(),
                status_label: stop_status_label(stop.status),
            })
            .collect(),
    }
}

pub fn route_status_label(status: RouteStatus) -> &'static str {
    match status {
        RouteStatus::Pending => "Pending",
        RouteStatus::Completed => "Completed",
    }
}

pub fn stop_status_label(status: StopStatus) -> &'static str {
    match status {
        StopStatus::Pending => "Pending",
        StopStatus::Delivered => "Delivered",
        StopStatus::Failed => "Failed",
    }
}

/// `"12.3 km - about 25 min"`; a zero or missing distance means the route
/// has not been optimized.
fn trip_text(distance_meters: Option<f64>, duration_seconds: Option<f64>) -> String {
    let distance = match distance_meters {
        Some(meters) if meters > 0.0 => format!("{:.1} km", meters / 1000.0),
        _ => return NOT_OPTIMIZED_NOTICE.to_string(),
    };
    match duration_seconds {
        Some(seconds) => format!("{distance} - about {} min", (seconds / 60.0).round()),
        None => distance,
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.name, self.status_label)?;
        writeln!(f, "start: {}", self.start_address)?;
        writeln!(f, "{}", self.trip)?;
        for stop in &self.stops {
            writeln!(
                f,
                "  {:>3}  #{:<6} {:<10} {}",
                stop.order_label, stop.id, stop.status_label, stop.address
            )?;
        }
        Ok(())
    }
}
