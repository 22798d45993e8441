//! Airborne and surface position (TC 5-8, 9-18, 20-22).
//!
//! reference: spec §4.3 ("Position"), §4.3.1 ("NIC/HPL table")

use deku::prelude::*;

use crate::altitude::decode_ac12;
use crate::cpr::CprFrame;
use crate::error::Error;

/// Navigation Integrity Category, and the horizontal protection limit /
/// containment radius it implies, resolved from (TC, ADS-B version, NIC
/// supplement A/B).
///
/// reference: spec §4.3.1. The supplement-B column only applies to surface
/// position messages (TC 5-8); airborne messages (TC 9-18, 20-22) resolve
/// NIC from TC and supplement A alone, so `nic_b` is `None` there.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nic {
    pub value: u8,
    /// Horizontal protection limit in meters, when bounded.
    pub hpl_m: Option<f64>,
    /// 95% containment radius in meters, when bounded.
    pub rc_m: Option<f64>,
}

/// Resolve NIC/HPL/Rc from (type code, ADS-B version, NIC supplement A,
/// NIC supplement B).
///
/// reference: DO-260B Table 2-14/2-15, as reproduced in spec §4.3.1. `nic_b`
/// is only consulted for surface type codes (5-8); airborne callers should
/// pass `false`. Version 0 transmitters never populate the NIC supplement
/// bits meaningfully, so both suppl. flags are ignored when `version == 0`.
#[must_use]
pub fn resolve_nic(tc: u8, version: u8, nic_a: bool, nic_b: bool) -> Nic {
    let (nic_a, nic_b) = if version == 0 { (false, false) } else { (nic_a, nic_b) };
    let (value, hpl_m, rc_m): (u8, Option<f64>, Option<f64>) = match tc {
        9 | 20 => (11, Some(7.5), Some(7.5)),
        10 | 21 => (10, Some(25.0), Some(25.0)),
        11 if nic_a => (9, Some(75.0), Some(75.0)),
        11 => (8, Some(185.2), Some(185.2)),
        12 => (7, Some(370.0), Some(370.0)),
        13 if nic_a => (6, Some(1_110.0), Some(1_110.0)),
        13 => (6, Some(926.0), Some(926.0)),
        14 => (5, Some(1_852.0), Some(1_852.0)),
        15 => (4, Some(3_704.0), Some(3_704.0)),
        16 if nic_a => (3, Some(7_408.0), Some(7_408.0)),
        16 => (2, Some(14_816.0), Some(14_816.0)),
        17 => (1, Some(37_040.0), Some(37_040.0)),
        5 => (11, Some(7.5), Some(7.5)),
        6 if nic_a && nic_b => (10, Some(25.0), Some(25.0)),
        6 => (8, Some(185.2), Some(185.2)),
        7 if nic_a => (7, Some(370.0), Some(370.0)),
        7 => (6, Some(1_110.0), Some(1_110.0)),
        _ => (0, None, None),
    };
    Nic { value, hpl_m, rc_m }
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawAirbornePosition {
    #[deku(bits = 5)]
    tc: u8,
    #[deku(bits = 2)]
    surveillance_status: u8,
    #[deku(bits = 1)]
    nic_supplement_a: u8,
    #[deku(bits = 12)]
    alt12: u16,
    #[deku(bits = 1)]
    time_synced_to_utc: u8,
    #[deku(bits = 1)]
    odd: u8,
    #[deku(bits = 17)]
    lat_cpr: u32,
    #[deku(bits = 17)]
    lon_cpr: u32,
}

/// Airborne position (TC 9-18: barometric altitude; TC 20-22: GNSS height).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AirbornePosition {
    pub tc: u8,
    pub surveillance_status: u8,
    pub nic_supplement_a: bool,
    pub altitude_ft: Option<i32>,
    pub gnss_height: bool,
    pub time_synced_to_utc: bool,
    pub odd: bool,
    pub lat_cpr: u32,
    pub lon_cpr: u32,
}

impl AirbornePosition {
    pub fn parse(me: &[u8; 7]) -> Result<Self, Error> {
        let ((_, _), raw) = RawAirbornePosition::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching airborne position's fixed layout");

        if !(9..=18).contains(&raw.tc) && !(20..=22).contains(&raw.tc) {
            return Err(Error::BadFormat {
                reason: alloc::format!("type code {} is not an airborne position code", raw.tc),
                original_message: crate::bits::bytes_to_hex(me),
            });
        }

        Ok(Self {
            tc: raw.tc,
            surveillance_status: raw.surveillance_status,
            nic_supplement_a: raw.nic_supplement_a != 0,
            altitude_ft: decode_ac12(raw.alt12),
            gnss_height: (20..=22).contains(&raw.tc),
            time_synced_to_utc: raw.time_synced_to_utc != 0,
            odd: raw.odd != 0,
            lat_cpr: raw.lat_cpr,
            lon_cpr: raw.lon_cpr,
        })
    }

    /// NIC/HPL for this report, keyed additionally by the aircraft's ADS-B
    /// version (see [`resolve_nic`]).
    #[must_use]
    pub fn nic(&self, version: u8) -> Nic {
        resolve_nic(self.tc, version, self.nic_supplement_a, false)
    }

    #[must_use]
    pub fn cpr_frame(&self, time: f64) -> CprFrame {
        CprFrame { lat_cpr: self.lat_cpr, lon_cpr: self.lon_cpr, odd: self.odd, time }
    }
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawSurfacePosition {
    #[deku(bits = 5)]
    tc: u8,
    #[deku(bits = 7)]
    movement: u8,
    #[deku(bits = 1)]
    ground_track_valid: u8,
    #[deku(bits = 7)]
    track_raw: u8,
    #[deku(bits = 1)]
    _time_sync: u8,
    #[deku(bits = 1)]
    odd: u8,
    #[deku(bits = 17)]
    lat_cpr: u32,
    #[deku(bits = 17)]
    lon_cpr: u32,
}

/// Surface position (TC 5-8).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfacePosition {
    pub tc: u8,
    pub movement: u8,
    pub ground_track_valid: bool,
    /// Ground track in degrees, when [`Self::ground_track_valid`].
    pub ground_track_deg: f32,
    pub odd: bool,
    pub lat_cpr: u32,
    pub lon_cpr: u32,
}

impl SurfacePosition {
    pub fn parse(me: &[u8; 7]) -> Result<Self, Error> {
        let ((_, _), raw) = RawSurfacePosition::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching surface position's fixed layout");

        Ok(Self {
            tc: raw.tc,
            movement: raw.movement,
            ground_track_valid: raw.ground_track_valid != 0,
            ground_track_deg: f32::from(raw.track_raw) * (360.0 / 128.0),
            odd: raw.odd != 0,
            lat_cpr: raw.lat_cpr,
            lon_cpr: raw.lon_cpr,
        })
    }

    /// NIC/HPL for this report, keyed additionally by the aircraft's ADS-B
    /// version and NIC supplement B (see [`resolve_nic`]).
    #[must_use]
    pub fn nic(&self, version: u8, nic_b: bool) -> Nic {
        resolve_nic(self.tc, version, false, nic_b)
    }

    #[must_use]
    pub fn cpr_frame(&self, time: f64) -> CprFrame {
        CprFrame { lat_cpr: self.lat_cpr, lon_cpr: self.lon_cpr, odd: self.odd, time }
    }

    /// Ground speed in knots decoded from the movement field, or `None`
    /// for the reserved/no-information/stopped/decelerating edge values.
    #[must_use]
    pub fn ground_speed_kt(&self) -> Option<f32> {
        match self.movement {
            0 => None,
            1 => Some(0.0),
            2..=8 => Some(0.125 + f32::from(self.movement - 2) * 0.125),
            9..=12 => Some(1.0 + f32::from(self.movement - 9) * 0.25),
            13..=38 => Some(2.0 + f32::from(self.movement - 13) * 0.5),
            39..=93 => Some(15.0 + f32::from(self.movement - 39)),
            94..=108 => Some(70.0 + f32::from(self.movement - 94) * 2.0),
            109..=123 => Some(100.0 + f32::from(self.movement - 109) * 5.0),
            124 => Some(175.0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nic_table_matches_known_rows() {
        let nic = resolve_nic(9, 2, false, false);
        assert_eq!(nic.value, 11);
        assert_eq!(nic.hpl_m, Some(7.5));

        let nic = resolve_nic(18, 2, false, false);
        assert_eq!(nic.value, 0);
        assert_eq!(nic.hpl_m, None);
    }

    #[test]
    fn nic_tc11_version_split() {
        // With suppl. A: the tighter NIC 9 / 75m row, regardless of version.
        let with_a = resolve_nic(11, 2, true, false);
        assert_eq!(with_a.value, 9);
        assert_eq!(with_a.hpl_m, Some(75.0));

        // Without suppl. A: NIC 8 / 185.2m.
        let without_a = resolve_nic(11, 1, false, false);
        assert_eq!(without_a.value, 8);
        assert_eq!(without_a.hpl_m, Some(185.2));
    }

    #[test]
    fn nic_version_zero_ignores_supplements() {
        // V0 never sets NIC supplement bits meaningfully; even if the raw
        // bit happens to be set, it must not be trusted.
        let v0 = resolve_nic(11, 0, true, false);
        assert_eq!(v0.value, 8);
        assert_eq!(v0.hpl_m, Some(185.2));
    }

    #[test]
    fn surface_movement_decodes_stopped_and_cruise() {
        let mut sp = SurfacePosition {
            tc: 5,
            movement: 1,
            ground_track_valid: false,
            ground_track_deg: 0.0,
            odd: false,
            lat_cpr: 0,
            lon_cpr: 0,
        };
        assert_eq!(sp.ground_speed_kt(), Some(0.0));
        sp.movement = 50;
        assert_eq!(sp.ground_speed_kt(), Some(26.0));
    }
}
