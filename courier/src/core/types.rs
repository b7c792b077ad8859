//! Shared geometry types for core logic.
//!
//! Coordinates are always `(longitude, latitude)`, the order map renderers
//! expect, and serialize as a two-element array.

use serde::{Deserialize, Serialize};

/// A geographic point in `(lng, lat)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lng, value.lat]
    }
}

/// Axis-aligned bounding box used to frame the map camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub north_east: Coordinate,
    pub south_west: Coordinate,
}

impl Bounds {
    /// Degenerate box with both corners on `point`.
    pub const fn point(point: Coordinate) -> Self {
        Self {
            north_east: point,
            south_west: point,
        }
    }
}
