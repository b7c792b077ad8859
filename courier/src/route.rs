//! Route and stop snapshot types.
//!
//! A [`Route`] is always an immutable snapshot of what the remote last
//! reported. Field names on [`Stop`] follow the wire format so the same type
//! serves both the gateway payload and renderer output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::Coordinate;

pub type RouteId = i64;
pub type StopId = i64;

/// Lifecycle status of a route. Only ever moves `pending -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Pending,
    Completed,
}

impl RouteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteStatus::Pending => "pending",
            RouteStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery outcome of a single stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    Pending,
    Delivered,
    Failed,
}

impl StopStatus {
    pub const ALL: [StopStatus; 3] = [
        StopStatus::Pending,
        StopStatus::Delivered,
        StopStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StopStatus::Pending => "pending",
            StopStatus::Delivered => "delivered",
            StopStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        StopStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                format!("unknown stop status '{value}' (expected pending, delivered or failed)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub address_text: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(rename = "stop_status")]
    pub status: StopStatus,
    /// Visiting position assigned by route optimization; `None` until optimized.
    #[serde(default)]
    pub optimized_order: Option<u32>,
}

impl Stop {
    /// Map coordinate, present only when both `lat` and `lng` are known.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lng, lat)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub status: RouteStatus,
    pub start_address: String,
    pub start_lat: Option<f64>,
    pub start_lng: Option<f64>,
    pub total_distance_meters: Option<f64>,
    pub total_duration_seconds: Option<f64>,
    pub encoded_path: Option<String>,
    /// Stops in insertion order.
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn start_coordinate(&self) -> Option<Coordinate> {
        match (self.start_lat, self.start_lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lng, lat)),
            _ => None,
        }
    }

    pub fn find_stop(&self, stop_id: StopId) -> Option<&Stop> {
        self.stops.iter().find(|stop| stop.id == stop_id)
    }

    pub fn is_pending(&self) -> bool {
        self.status == RouteStatus::Pending
    }

    /// Stops ordered by `optimized_order`; unoptimized stops follow in
    /// insertion order. The stored order is left untouched.
    pub fn stops_in_visit_order(&self) -> Vec<&Stop> {
        let mut ordered: Vec<&Stop> = self.stops.iter().collect();
        // Stable sort keeps insertion order among equal keys.
        ordered.sort_by_key(|stop| match stop.optimized_order {
            Some(order) => (0, order),
            None => (1, 0),
        });
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{route, stop, stop_at};

    #[test]
    fn stop_status_parses_case_insensitively() {
        assert_eq!("Delivered".parse::<StopStatus>(), Ok(StopStatus::Delivered));
        assert_eq!(" failed ".parse::<StopStatus>(), Ok(StopStatus::Failed));
        assert!("done".parse::<StopStatus>().is_err());
    }

    #[test]
    fn stop_deserializes_from_wire_names() {
        let raw = r#"{"id":7,"address_text":"12 Hang Bac","lat":21.03,"lng":105.85,"stop_status":"failed","optimized_order":2}"#;
        let parsed: Stop = serde_json::from_str(raw).expect("parse stop");
        assert_eq!(parsed.status, StopStatus::Failed);
        assert_eq!(parsed.optimized_order, Some(2));
        assert_eq!(parsed.coordinate(), Some(Coordinate::new(105.85, 21.03)));
    }

    /// A stop missing either half of its coordinate has no map position.
    #[test]
    fn partial_coordinate_is_invalid() {
        let mut half = stop(1, StopStatus::Pending);
        half.lat = Some(21.0);
        assert_eq!(half.coordinate(), None);
    }

    #[test]
    fn visit_order_puts_unoptimized_stops_last() {
        let mut a = stop_at(1, 21.0, 105.0);
        let mut b = stop_at(2, 21.1, 105.1);
        let c = stop_at(3, 21.2, 105.2);
        let mut d = stop_at(4, 21.3, 105.3);
        a.optimized_order = None;
        b.optimized_order = Some(2);
        d.optimized_order = Some(1);
        let route = route(vec![a, b, c, d]);

        let ids: Vec<StopId> = route
            .stops_in_visit_order()
            .iter()
            .map(|stop| stop.id)
            .collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
        assert_eq!(route.stops[0].id, 1);
    }
}
