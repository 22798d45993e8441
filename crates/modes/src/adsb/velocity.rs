//! Airborne velocity (TC 19): ground-speed and airspeed/heading subtypes.
//!
//! reference: spec §4.3 ("Velocity"); DO-260B 2.2.3.2.6

use deku::prelude::*;

/// Vertical rate source: barometric or GNSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalRateSource {
    Barometric,
    Gnss,
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawVelocityOverGround {
    #[deku(bits = 5)]
    tc: u8,
    #[deku(bits = 3)]
    subtype: u8,
    #[deku(bits = 2)]
    _reserved_a: u8,
    #[deku(bits = 3)]
    nac_v: u8,
    #[deku(bits = 1)]
    ew_sign: u8,
    #[deku(bits = 10)]
    ew_vel: u16,
    #[deku(bits = 1)]
    ns_sign: u8,
    #[deku(bits = 10)]
    ns_vel: u16,
    #[deku(bits = 1)]
    vr_source: u8,
    #[deku(bits = 1)]
    vr_sign: u8,
    #[deku(bits = 9)]
    vr_raw: u16,
    #[deku(bits = 2)]
    _reserved_b: u8,
    #[deku(bits = 1)]
    gbd_sign: u8,
    #[deku(bits = 7)]
    gbd_raw: u8,
}

/// Ground-speed velocity (subtype 1/2): east-west and north-south velocity
/// components resolved into speed and track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityOverGround {
    pub supersonic: bool,
    /// Navigation Accuracy Category for velocity (0-4).
    pub nac_v: u8,
    pub ground_speed_kt: Option<f64>,
    pub track_deg: Option<f64>,
    pub vertical_rate_fpm: Option<i32>,
    pub vertical_rate_source: VerticalRateSource,
    pub gnss_baro_diff_ft: Option<i32>,
}

impl VelocityOverGround {
    #[must_use]
    pub fn parse(me: &[u8; 7], supersonic: bool) -> Self {
        let ((_, _), raw) = RawVelocityOverGround::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching ground-speed velocity's fixed layout");
        let scale = if supersonic { 4.0 } else { 1.0 };

        let (ground_speed_kt, track_deg) = if raw.ew_vel == 0 || raw.ns_vel == 0 {
            (None, None)
        } else {
            let vew = (f64::from(raw.ew_vel) - 1.0) * scale * if raw.ew_sign != 0 { -1.0 } else { 1.0 };
            let vns = (f64::from(raw.ns_vel) - 1.0) * scale * if raw.ns_sign != 0 { -1.0 } else { 1.0 };
            let speed = libm::hypot(vew, vns);
            let mut track = libm::atan2(vew, vns).to_degrees();
            if track < 0.0 {
                track += 360.0;
            }
            (Some(speed), Some(track))
        };

        let vertical_rate_source =
            if raw.vr_source != 0 { VerticalRateSource::Gnss } else { VerticalRateSource::Barometric };
        let vertical_rate_fpm = vertical_rate(raw.vr_raw, raw.vr_sign != 0);
        let gnss_baro_diff_ft = gnss_baro_diff(raw.gbd_raw, raw.gbd_sign != 0);

        Self {
            supersonic,
            nac_v: raw.nac_v,
            ground_speed_kt,
            track_deg,
            vertical_rate_fpm,
            vertical_rate_source,
            gnss_baro_diff_ft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawAirspeedHeading {
    #[deku(bits = 5)]
    tc: u8,
    #[deku(bits = 3)]
    subtype: u8,
    #[deku(bits = 2)]
    _reserved_a: u8,
    #[deku(bits = 3)]
    nac_v: u8,
    #[deku(bits = 1)]
    heading_valid: u8,
    #[deku(bits = 10)]
    heading_raw: u16,
    #[deku(bits = 1)]
    airspeed_is_tas: u8,
    #[deku(bits = 10)]
    airspeed_raw: u16,
    #[deku(bits = 1)]
    vr_source: u8,
    #[deku(bits = 1)]
    vr_sign: u8,
    #[deku(bits = 9)]
    vr_raw: u16,
    #[deku(bits = 2)]
    _reserved_b: u8,
    #[deku(bits = 1)]
    gbd_sign: u8,
    #[deku(bits = 7)]
    gbd_raw: u8,
}

/// Airspeed/heading velocity (subtype 3/4).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirspeedHeading {
    pub supersonic: bool,
    /// Navigation Accuracy Category for velocity (0-4).
    pub nac_v: u8,
    pub heading_valid: bool,
    pub heading_deg: Option<f64>,
    pub airspeed_is_tas: bool,
    pub airspeed_kt: Option<u32>,
    pub vertical_rate_fpm: Option<i32>,
    pub vertical_rate_source: VerticalRateSource,
    pub gnss_baro_diff_ft: Option<i32>,
}

impl AirspeedHeading {
    #[must_use]
    pub fn parse(me: &[u8; 7], supersonic: bool) -> Self {
        let ((_, _), raw) = RawAirspeedHeading::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching airspeed/heading velocity's fixed layout");
        let scale = if supersonic { 4.0 } else { 1.0 };

        let heading_deg = (raw.heading_valid != 0).then(|| f64::from(raw.heading_raw) * (360.0 / 1024.0));
        let airspeed_kt = (raw.airspeed_raw != 0).then(|| ((f64::from(raw.airspeed_raw) - 1.0) * scale) as u32);

        let vertical_rate_source =
            if raw.vr_source != 0 { VerticalRateSource::Gnss } else { VerticalRateSource::Barometric };
        let vertical_rate_fpm = vertical_rate(raw.vr_raw, raw.vr_sign != 0);
        let gnss_baro_diff_ft = gnss_baro_diff(raw.gbd_raw, raw.gbd_sign != 0);

        Self {
            supersonic,
            nac_v: raw.nac_v,
            heading_valid: raw.heading_valid != 0,
            heading_deg,
            airspeed_is_tas: raw.airspeed_is_tas != 0,
            airspeed_kt,
            vertical_rate_fpm,
            vertical_rate_source,
            gnss_baro_diff_ft,
        }
    }
}

fn vertical_rate(raw: u16, sign: bool) -> Option<i32> {
    (raw != 0).then(|| {
        let magnitude = (i32::from(raw) - 1) * 64;
        if sign {
            -magnitude
        } else {
            magnitude
        }
    })
}

fn gnss_baro_diff(raw: u8, sign: bool) -> Option<i32> {
    (raw != 0).then(|| {
        let magnitude = (i32::from(raw) - 1) * 25;
        if sign {
            -magnitude
        } else {
            magnitude
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_velocity_components_mean_unavailable() {
        let me = [0b0001_1001, 0, 0, 0, 0, 0, 0];
        let v = VelocityOverGround::parse(&me, false);
        assert_eq!(v.ground_speed_kt, None);
        assert_eq!(v.track_deg, None);
    }

    #[test]
    fn nac_v_is_decoded_from_the_reserved_gap() {
        // tc=19(10011) subtype=1(001), reserved 2 bits = 00, nac_v = 101 (5).
        let me = [0b1001_1001, 0b0100_0000, 0, 0, 0, 0, 0];
        let v = VelocityOverGround::parse(&me, false);
        assert_eq!(v.nac_v, 5);
    }
}
