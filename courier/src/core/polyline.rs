//! Encoded polyline decoding.
//!
//! Each point is two zig-zag varint deltas (latitude first, then longitude)
//! written as 5-bit groups offset by 63, with `0x20` as the continuation bit.
//! Accumulated values are scaled by `1e-5`.

use crate::core::types::Coordinate;

const GROUP_OFFSET: i64 = 63;
const CONTINUATION: i64 = 0x20;
const GROUP_MASK: i64 = 0x1f;
const SCALE: f64 = 1e-5;

/// Decode an encoded path into `(lng, lat)` coordinates.
///
/// `None` or an empty string yields an empty path. A trailing point whose
/// groups are cut short is dropped rather than reported.
pub fn decode(encoded: Option<&str>) -> Vec<Coordinate> {
    let bytes = match encoded {
        Some(encoded) => encoded.as_bytes(),
        None => return Vec::new(),
    };

    let mut path = Vec::new();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while cursor < bytes.len() {
        let Some(dlat) = read_delta(bytes, &mut cursor) else {
            break;
        };
        let Some(dlng) = read_delta(bytes, &mut cursor) else {
            break;
        };
        lat = lat.wrapping_add(dlat);
        lng = lng.wrapping_add(dlng);
        path.push(Coordinate::new(lng as f64 * SCALE, lat as f64 * SCALE));
    }

    path
}

/// Read one signed delta starting at `cursor`, advancing past its groups.
///
/// Returns `None` when the input ends before a terminating group.
fn read_delta(bytes: &[u8], cursor: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    loop {
        let group = i64::from(*bytes.get(*cursor)?) - GROUP_OFFSET;
        *cursor += 1;
        result |= (group & GROUP_MASK).checked_shl(shift).unwrap_or(0);
        shift = shift.saturating_add(5);
        if group < CONTINUATION {
            break;
        }
    }

    // Low bit carries the sign.
    Some(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[Coordinate], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "point count");
        for (point, (lng, lat)) in actual.iter().zip(expected) {
            assert!((point.lng - lng).abs() < 1e-9, "lng {} != {}", point.lng, lng);
            assert!((point.lat - lat).abs() < 1e-9, "lat {} != {}", point.lat, lat);
        }
    }

    #[test]
    fn missing_or_empty_input_decodes_to_empty_path() {
        assert!(decode(None).is_empty());
        assert!(decode(Some("")).is_empty());
    }

    /// Reference pair from the published polyline format documentation.
    #[test]
    fn decodes_reference_path_in_lng_lat_order() {
        let path = decode(Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@"));
        assert_close(
            &path,
            &[(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)],
        );
    }

    #[test]
    fn decodes_single_point_near_hanoi() {
        // (21.0285, 105.8522) encoded.
        let path = decode(Some("ccj_CggaeS"));
        assert_close(&path, &[(105.8522, 21.0285)]);
    }

    /// A point missing its longitude groups is dropped; earlier points survive.
    #[test]
    fn truncated_trailing_point_is_dropped() {
        let path = decode(Some("_p~iF~ps|U_ulL"));
        assert_close(&path, &[(-120.2, 38.5)]);
    }

    #[test]
    fn decode_does_not_consume_input() {
        let encoded = String::from("_p~iF~ps|U");
        let first = decode(Some(&encoded));
        let second = decode(Some(&encoded));
        assert_eq!(first, second);
        assert_eq!(encoded, "_p~iF~ps|U");
    }
}
