//! Semantic invariants of a fetched route not expressible via JSON Schema.

use crate::route::Route;
use std::collections::HashSet;

/// Check semantic invariants not expressible in JSON Schema:
/// - No duplicate stop ids
/// - No duplicate `optimized_order` values
/// - Latitudes within [-90, 90], longitudes within [-180, 180]
/// - Non-negative distance and duration totals
pub fn validate_route(route: &Route) -> Vec<String> {
    let mut errors = Vec::new();

    check_coordinate(route.start_lat, route.start_lng, "start", &mut errors);
    check_total(route.total_distance_meters, "total_distance_meters", &mut errors);
    check_total(route.total_duration_seconds, "total_duration_seconds", &mut errors);

    let mut seen_ids = HashSet::new();
    let mut seen_orders = HashSet::new();
    for stop in &route.stops {
        let label = format!("stop {}", stop.id);
        if !seen_ids.insert(stop.id) {
            errors.push(format!("duplicate stop id {}", stop.id));
        }
        if let Some(order) = stop.optimized_order {
            if !seen_orders.insert(order) {
                errors.push(format!("{label}: duplicate optimized_order {order}"));
            }
        }
        check_coordinate(stop.lat, stop.lng, &label, &mut errors);
    }

    errors
}

fn check_coordinate(lat: Option<f64>, lng: Option<f64>, label: &str, errors: &mut Vec<String>) {
    match lat {
        Some(lat) if !(-90.0..=90.0).contains(&lat) => {
            errors.push(format!("{label}: latitude {lat} out of range"));
        }
        _ => {}
    }
    match lng {
        Some(lng) if !(-180.0..=180.0).contains(&lng) => {
            errors.push(format!("{label}: longitude {lng} out of range"));
        }
        _ => {}
    }
}

fn check_total(value: Option<f64>, field: &str, errors: &mut Vec<String>) {
    match value {
        Some(value) if !(value >= 0.0 && value.is_finite()) => {
            errors.push(format!("{field} must be a non-negative number (got {value})"));
        }
        _ => {}
    }
}
