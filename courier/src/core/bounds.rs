//! Camera framing bounds.

use crate::core::types::{Bounds, Coordinate};

/// Smallest axis-aligned box containing every coordinate.
///
/// Empty input frames `fallback` as both corners so callers never special-case
/// an empty route.
pub fn get_bounds(coords: &[Coordinate], fallback: Coordinate) -> Bounds {
    let Some((first, rest)) = coords.split_first() else {
        return Bounds::point(fallback);
    };

    let mut bounds = Bounds::point(*first);
    for point in rest {
        bounds.north_east.lng = bounds.north_east.lng.max(point.lng);
        bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
        bounds.south_west.lng = bounds.south_west.lng.min(point.lng);
        bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANOI: Coordinate = Coordinate::new(105.8522, 21.0285);

    fn sample() -> Vec<Coordinate> {
        vec![
            Coordinate::new(105.80, 21.05),
            Coordinate::new(105.90, 20.98),
            Coordinate::new(105.84, 21.10),
            Coordinate::new(105.78, 21.00),
        ]
    }

    #[test]
    fn empty_input_returns_fallback_as_both_corners() {
        assert_eq!(get_bounds(&[], HANOI), Bounds::point(HANOI));
    }

    #[test]
    fn single_point_is_both_corners() {
        let point = Coordinate::new(106.7, 10.77);
        assert_eq!(get_bounds(&[point], HANOI), Bounds::point(point));
    }

    #[test]
    fn corners_take_extremes_per_axis() {
        let bounds = get_bounds(&sample(), HANOI);
        assert_eq!(bounds.north_east, Coordinate::new(105.90, 21.10));
        assert_eq!(bounds.south_west, Coordinate::new(105.78, 20.98));
    }

    /// Bounds depend only on the set of points, not their order.
    #[test]
    fn bounds_are_order_independent() {
        let points = sample();
        let expected = get_bounds(&points, HANOI);

        let mut reversed = points.clone();
        reversed.reverse();
        assert_eq!(get_bounds(&reversed, HANOI), expected);

        for rotation in 1..points.len() {
            let mut rotated = points.clone();
            rotated.rotate_left(rotation);
            assert_eq!(get_bounds(&rotated, HANOI), expected);
        }
    }
}
