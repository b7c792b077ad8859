//! Renderer inputs derived from a route snapshot.
//!
//! The map widget itself is external; this module only decides what it should
//! draw (markers, path line) and how the camera should be framed.

use serde::{Deserialize, Serialize};

use crate::core::bounds::get_bounds;
use crate::core::polyline::decode;
use crate::core::types::{Bounds, Coordinate};
use crate::route::{Route, StopId, StopStatus};

/// Label shown on a stop marker that has not been optimized yet.
pub const UNOPTIMIZED_LABEL: &str = "!";

/// Camera defaults and fit-animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Fallback center, `[lng, lat]`; also the empty-bounds fallback.
    pub default_center: Coordinate,
    pub default_zoom: f64,
    pub fit_padding_px: u32,
    pub fit_animation_ms: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: Coordinate::new(105.8522, 21.0285),
            default_zoom: 10.0,
            fit_padding_px: 80,
            fit_animation_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopMarker {
    pub stop_id: StopId,
    pub coordinate: Coordinate,
    pub label: String,
    pub optimized: bool,
    pub status: StopStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Camera {
    /// Frame the given bounds.
    Fit {
        bounds: Bounds,
        padding_px: u32,
        animation_ms: u32,
    },
    /// No start point yet; show the default area.
    Default { center: Coordinate, zoom: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub start_marker: Option<Coordinate>,
    pub stop_markers: Vec<StopMarker>,
    pub path: Vec<Coordinate>,
    pub camera: Camera,
}

/// Start point followed by every stop with a valid coordinate.
///
/// Decoded path vertices are not included, so a detour on the path may fall
/// outside the framed area.
pub fn framing_coordinates(route: &Route) -> Vec<Coordinate> {
    route
        .start_coordinate()
        .into_iter()
        .chain(route.stops.iter().filter_map(|stop| stop.coordinate()))
        .collect()
}

pub fn build_map_view(route: &Route, settings: &MapSettings) -> MapView {
    let stop_markers = route
        .stops
        .iter()
        .filter_map(|stop| {
            let coordinate = stop.coordinate()?;
            Some(StopMarker {
                stop_id: stop.id,
                coordinate,
                label: stop
                    .optimized_order
                    .map_or_else(|| UNOPTIMIZED_LABEL.to_string(), |order| order.to_string()),
                optimized: stop.optimized_order.is_some(),
                status: stop.status,
            })
        })
        .collect();

    let camera = match route.start_coordinate() {
        Some(_) => Camera::Fit {
            bounds: get_bounds(&framing_coordinates(route), settings.default_center),
            padding_px: settings.fit_padding_px,
            animation_ms: settings.fit_animation_ms,
        },
        None => Camera::Default {
            center: settings.default_center,
            zoom: settings.default_zoom,
        },
    };

    MapView {
        start_marker: route.start_coordinate(),
        stop_markers,
        path: decode(route.encoded_path.as_deref()),
        camera,
    }
}
