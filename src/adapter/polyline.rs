//! Google encoded polyline decoding.
//!
//! Routing engines ship step geometry as encoded polylines at precision 5
//! (OSRM default) or 6 (Valhalla/OSRM `polyline6`). Decoding happens here
//! at the adapter boundary; the rest of the crate only ever sees decoded
//! coordinate sequences.

use crate::core::GeographicCoordinate;
use crate::error::{MargaError, Result};

/// Decode an encoded polyline into coordinates.
///
/// `precision` is the number of decimal places the encoder used (5 or 6
/// in practice). Fails on truncated input or bytes outside the encoding
/// alphabet.
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<GeographicCoordinate>> {
    let factor = 10_f64.powi(precision as i32);
    let mut coordinates = Vec::new();
    let mut lat = 0_i64;
    let mut lng = 0_i64;

    let mut bytes = encoded.bytes().peekable();
    while bytes.peek().is_some() {
        lat += decode_signed_value(&mut bytes)?;
        lng += decode_signed_value(&mut bytes)?;
        coordinates.push(GeographicCoordinate::new(
            lat as f64 / factor,
            lng as f64 / factor,
        ));
    }

    Ok(coordinates)
}

/// Decode one zigzag-encoded varint from the byte stream.
fn decode_signed_value(bytes: &mut impl Iterator<Item = u8>) -> Result<i64> {
    let mut shift = 0_u32;
    let mut value = 0_i64;

    loop {
        let byte = bytes
            .next()
            .ok_or_else(|| MargaError::parse("polyline ends mid-value"))?;
        if !(63..=126).contains(&byte) {
            return Err(MargaError::parse(format!(
                "byte 0x{:02x} is outside the polyline alphabet",
                byte
            )));
        }
        let chunk = (byte - 63) as i64;
        value |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return Err(MargaError::parse("polyline value overflows"));
        }
    }

    Ok(if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decode_reference_polyline() {
        // Reference vector from the polyline format documentation
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();

        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[0].lat, 38.5, epsilon = 1e-9);
        assert_relative_eq!(points[0].lng, -120.2, epsilon = 1e-9);
        assert_relative_eq!(points[1].lat, 40.7, epsilon = 1e-9);
        assert_relative_eq!(points[1].lng, -120.95, epsilon = 1e-9);
        assert_relative_eq!(points[2].lat, 43.252, epsilon = 1e-9);
        assert_relative_eq!(points[2].lng, -126.453, epsilon = 1e-9);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_polyline("", 5).unwrap().is_empty());
    }

    #[test]
    fn test_decode_precision_6() {
        // A single point at (38.5, -120.2) encoded with precision 6
        let encoded = {
            // encode by hand: value * 1e6, zigzag, 5-bit chunks
            fn encode(mut v: i64, out: &mut String) {
                v = if v < 0 { !(v << 1) } else { v << 1 };
                while v >= 0x20 {
                    out.push((((0x20 | (v & 0x1f)) + 63) as u8) as char);
                    v >>= 5;
                }
                out.push(((v + 63) as u8) as char);
            }
            let mut s = String::new();
            encode(38_500_000, &mut s);
            encode(-120_200_000, &mut s);
            s
        };

        let points = decode_polyline(&encoded, 6).unwrap();
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].lat, 38.5, epsilon = 1e-9);
        assert_relative_eq!(points[0].lng, -120.2, epsilon = 1e-9);
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        // The reference vector with its final byte removed
        let err = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`", 5).unwrap_err();
        assert!(matches!(err, MargaError::ParseError { .. }));
    }

    #[test]
    fn test_decode_rejects_bad_alphabet() {
        let err = decode_polyline("_p~iF\u{7}", 5).unwrap_err();
        assert!(matches!(err, MargaError::ParseError { .. }));
    }
}
