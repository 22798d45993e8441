/*!
Compact Position Reporting (CPR) global and local decoding.

reference: ICAO 9871 (D.2.4.7); spec §4.4. The `cpr_nl` table is the same
precomputed-breakpoint table the teacher (`adsb_deku::cpr`) uses, extended
here with surface support, local decoding, and straddle detection.
*/

use crate::error::Error;

/// Number of latitude zones at the equator.
pub const NZ: f64 = 15.0;
/// 2^17, the scale of a 17-bit encoded CPR coordinate.
pub const CPR_MAX: f64 = 131_072.0;

/// One CPR-encoded position as received: raw 17-bit lat/lon, odd/even
/// parity, and (for the caller's bookkeeping) a reception time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CprFrame {
    pub lat_cpr: u32,
    pub lon_cpr: u32,
    pub odd: bool,
    pub time: f64,
}

/// Floor-mod: `((a % b) + b) % b`, matching mathematical modulo rather
/// than Rust/C truncating remainder.
#[must_use]
pub fn fmod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r < 0.0 {
        r + b
    } else {
        r
    }
}

fn dlat(surface: bool, odd: bool) -> f64 {
    let span = if surface { 90.0 } else { 360.0 };
    span / (4.0 * NZ - if odd { 1.0 } else { 0.0 })
}

/// Number of longitude zones at latitude `lat` (`NL(lat)` in the spec).
///
/// reference: 1090-WP-9-14 breakpoint table, as used by readsb/dump1090
/// and the teacher's `cpr_nl`.
#[must_use]
pub fn nl(lat: f64) -> u32 {
    let lat = libm::fabs(lat);
    if lat < 10.47047130 {
        59
    } else if lat < 14.82817437 {
        58
    } else if lat < 18.18626357 {
        57
    } else if lat < 21.02939493 {
        56
    } else if lat < 23.54504487 {
        55
    } else if lat < 25.82924707 {
        54
    } else if lat < 27.93898710 {
        53
    } else if lat < 29.91135686 {
        52
    } else if lat < 31.77209708 {
        51
    } else if lat < 33.53993436 {
        50
    } else if lat < 35.22899598 {
        49
    } else if lat < 36.85025108 {
        48
    } else if lat < 38.41241892 {
        47
    } else if lat < 39.92256684 {
        46
    } else if lat < 41.38651832 {
        45
    } else if lat < 42.80914012 {
        44
    } else if lat < 44.19454951 {
        43
    } else if lat < 45.54626723 {
        42
    } else if lat < 46.86733252 {
        41
    } else if lat < 48.16039128 {
        40
    } else if lat < 49.42776439 {
        39
    } else if lat < 50.67150166 {
        38
    } else if lat < 51.89342469 {
        37
    } else if lat < 53.09516153 {
        36
    } else if lat < 54.27817472 {
        35
    } else if lat < 55.44378444 {
        34
    } else if lat < 56.59318756 {
        33
    } else if lat < 57.72747354 {
        32
    } else if lat < 58.84763776 {
        31
    } else if lat < 59.95459277 {
        30
    } else if lat < 61.04917774 {
        29
    } else if lat < 62.13216659 {
        28
    } else if lat < 63.20427479 {
        27
    } else if lat < 64.26616523 {
        26
    } else if lat < 65.31845310 {
        25
    } else if lat < 66.36171008 {
        24
    } else if lat < 67.39646774 {
        23
    } else if lat < 68.42322022 {
        22
    } else if lat < 69.44242631 {
        21
    } else if lat < 70.45451075 {
        20
    } else if lat < 71.45986473 {
        19
    } else if lat < 72.45884545 {
        18
    } else if lat < 73.45177442 {
        17
    } else if lat < 74.43893416 {
        16
    } else if lat < 75.42056257 {
        15
    } else if lat < 76.39684391 {
        14
    } else if lat < 77.36789461 {
        13
    } else if lat < 78.33374083 {
        12
    } else if lat < 79.42822225 {
        11
    } else if lat < 80.24923213 {
        10
    } else if lat < 81.19801349 {
        9
    } else if lat < 82.13956981 {
        8
    } else if lat < 83.07199445 {
        7
    } else if lat < 83.99173563 {
        6
    } else if lat < 84.89166191 {
        5
    } else if lat < 85.75541621 {
        4
    } else if lat < 86.53536998 {
        3
    } else if lat < 87.00000000 {
        2
    } else {
        1
    }
}

fn even_odd(even: &CprFrame, odd: &CprFrame) -> Result<(), Error> {
    if even.odd || !odd.odd {
        return Err(Error::BadFormat {
            reason: "global CPR requires one even and one odd frame".into(),
            original_message: "cpr::global".into(),
        });
    }
    Ok(())
}

/// Global CPR decode for airborne position pairs.
///
/// `newer_is_odd` selects which of the pair was received most recently,
/// per spec §4.4 step 5 ("the newer latitude").
pub fn global_airborne(
    even: &CprFrame,
    odd: &CprFrame,
    newer_is_odd: bool,
) -> Result<(f64, f64), Error> {
    global(even, odd, newer_is_odd, false, None)
}

/// Global CPR decode for surface position pairs. Requires a reference
/// point to disambiguate the four candidate longitude offsets
/// {0,90,180,270} that surface encoding leaves ambiguous.
pub fn global_surface(
    even: &CprFrame,
    odd: &CprFrame,
    newer_is_odd: bool,
    reference: (f64, f64),
) -> Result<(f64, f64), Error> {
    global(even, odd, newer_is_odd, true, Some(reference))
}

fn global(
    even: &CprFrame,
    odd: &CprFrame,
    newer_is_odd: bool,
    surface: bool,
    reference: Option<(f64, f64)>,
) -> Result<(f64, f64), Error> {
    even_odd(even, odd)?;

    let lat_even = f64::from(even.lat_cpr) / CPR_MAX;
    let lon_even = f64::from(even.lon_cpr) / CPR_MAX;
    let lat_odd = f64::from(odd.lat_cpr) / CPR_MAX;
    let lon_odd = f64::from(odd.lon_cpr) / CPR_MAX;

    let d_lat_even = dlat(surface, false);
    let d_lat_odd = dlat(surface, true);

    let j = libm::floor(59.0 * lat_even - 60.0 * lat_odd + 0.5);

    let mut rlat_even = d_lat_even * (fmod(j, 60.0) + lat_even);
    let mut rlat_odd = d_lat_odd * (fmod(j, 59.0) + lat_odd);

    if !surface {
        if rlat_even > 270.0 {
            rlat_even -= 360.0;
        } else if rlat_even < -270.0 {
            rlat_even += 360.0;
        }
        if rlat_odd > 270.0 {
            rlat_odd -= 360.0;
        } else if rlat_odd < -270.0 {
            rlat_odd += 360.0;
        }
    }

    let nl_even = nl(rlat_even);
    let nl_odd = nl(rlat_odd);
    if nl_even != nl_odd {
        return Err(Error::PositionStraddle {
            reason: "even/odd frames straddle an NL latitude boundary".into(),
        });
    }

    let rlat = if newer_is_odd { rlat_odd } else { rlat_even };
    let span = if surface { 90.0 } else { 360.0 };
    let n_zones = nl(rlat);

    let m = libm::floor(
        lon_even * f64::from(n_zones.saturating_sub(1)) - lon_odd * f64::from(n_zones) + 0.5,
    );

    let (ni, x) = if newer_is_odd {
        (core::cmp::max(1, n_zones.saturating_sub(1)), lon_odd)
    } else {
        (core::cmp::max(1, n_zones), lon_even)
    };
    let d_lon = span / f64::from(ni);
    let mut rlon = d_lon * (fmod(m, f64::from(ni)) + x);

    if !surface {
        if rlon >= 180.0 {
            rlon -= 360.0;
        }
        return Ok((rlat, rlon));
    }

    // Surface: resolve the 4 ambiguous longitude offsets against a
    // reference point using haversine distance.
    let reference = reference.ok_or_else(|| Error::MissingInformation {
        field: "reference position for surface global CPR".into(),
    })?;
    let mut best = (rlon, f64::MAX);
    for offset in [0.0, 90.0, 180.0, 270.0] {
        let candidate_lon = rlon + offset;
        let candidate_lon = if candidate_lon > 180.0 { candidate_lon - 360.0 } else { candidate_lon };
        let d = haversine_m(reference.0, reference.1, rlat, candidate_lon);
        if d < best.1 {
            best = (candidate_lon, d);
        }
    }
    Ok((rlat, best.0))
}

/// Local CPR decode relative to a reference position.
pub fn local(cpr: &CprFrame, ref_lat: f64, ref_lon: f64, surface: bool) -> (f64, f64) {
    let d_lat = dlat(surface, cpr.odd);
    let y = f64::from(cpr.lat_cpr) / CPR_MAX;
    let x = f64::from(cpr.lon_cpr) / CPR_MAX;

    let j = libm::floor(ref_lat / d_lat) + libm::floor(0.5 + fmod(ref_lat, d_lat) / d_lat - y);
    let rlat = d_lat * (j + y);

    let span = if surface { 90.0 } else { 360.0 };
    let i = if cpr.odd { 1 } else { 0 };
    let d_lon = span / core::cmp::max(1, nl(rlat).saturating_sub(i)) as f64;

    let m = libm::floor(ref_lon / d_lon) + libm::floor(0.5 + fmod(ref_lon, d_lon) / d_lon - x);
    let rlon = d_lon * (m + x);

    (rlat, rlon)
}

/// Great-circle distance in meters (Earth radius 6,371,000 m per spec §6).
#[must_use]
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = libm::sin(dlat / 2.0) * libm::sin(dlat / 2.0)
        + libm::cos(lat1_r) * libm::cos(lat2_r) * libm::sin(dlon / 2.0) * libm::sin(dlon / 2.0);
    let c = 2.0 * libm::atan2(libm::sqrt(a), libm::sqrt(1.0 - a));
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nl_high_low_lat() {
        assert_eq!(nl(89.9), 1);
        assert_eq!(nl(-89.9), 1);
        assert_eq!(nl(86.9), 2);
    }

    #[test]
    fn global_airborne_matches_known_pair() {
        // Vectors adapted from the teacher's cpr test fixture.
        let odd = CprFrame { lat_cpr: 74158, lon_cpr: 50194, odd: true, time: 1.0 };
        let even = CprFrame { lat_cpr: 93000, lon_cpr: 51372, odd: false, time: 0.0 };
        let (lat, lon) = global_airborne(&even, &odd, true).unwrap();
        assert!((lat - 52.265_780_174_126_06).abs() < 1e-9, "lat={lat}");
        assert!((lon - 3.938_912_527_901_786).abs() < 1e-9, "lon={lon}");
    }

    #[test]
    fn straddle_is_detected() {
        // Even/odd Rlat values fall either side of the NL breakpoint near
        // 86.5 degrees, where NL transitions 3 -> 2.
        let even = CprFrame { lat_cpr: 55038, lon_cpr: 24604, odd: false, time: 0.0 };
        let odd = CprFrame { lat_cpr: 24604, lon_cpr: 24604, odd: true, time: 0.0 };
        let result = global_airborne(&even, &odd, true);
        assert!(matches!(result, Err(Error::PositionStraddle { .. })));
    }

    #[test]
    fn fmod_matches_floor_mod_semantics() {
        assert_eq!(fmod(-1.0, 60.0), 59.0);
        assert_eq!(fmod(1.0, 60.0), 1.0);
    }
}
