//! Aircraft identification and category (TC 1-4).
//!
//! reference: spec §4.3 ("Identification"); DO-260B 2.2.3.2.3.2

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

use deku::prelude::*;

/// The wake-turbulence category, encoded as (TC, CA) per spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmitterCategory {
    NoCategoryInfo,
    Light,
    Medium1,
    Medium2,
    HighVortexLarge,
    Heavy,
    HighPerformance,
    Rotorcraft,
    Reserved,
    SurfaceEmergencyVehicle,
    SurfaceServiceVehicle,
    PointObstacle,
    ClusterObstacle,
    LineObstacle,
    Unassigned,
}

const CHARSET: &[u8; 64] = b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ#####_###############0123456789######";

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawAircraftIdentification {
    #[deku(bits = 5)]
    tc: u8,
    #[deku(bits = 3)]
    ca: u8,
    #[deku(bits = 6)]
    c0: u8,
    #[deku(bits = 6)]
    c1: u8,
    #[deku(bits = 6)]
    c2: u8,
    #[deku(bits = 6)]
    c3: u8,
    #[deku(bits = 6)]
    c4: u8,
    #[deku(bits = 6)]
    c5: u8,
    #[deku(bits = 6)]
    c6: u8,
    #[deku(bits = 6)]
    c7: u8,
}

/// Aircraft identification and wake-turbulence category.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AircraftIdentification {
    pub tc: u8,
    pub category: EmitterCategory,
    /// Up to 8 characters, trimmed of trailing fill (`_`/`#`).
    pub callsign: String,
}

impl AircraftIdentification {
    #[must_use]
    pub fn parse(me: &[u8; 7]) -> Self {
        let ((_, _), raw) = RawAircraftIdentification::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching identification's fixed layout");

        let category = category(raw.tc, raw.ca);

        let mut chars: Vec<u8> = [raw.c0, raw.c1, raw.c2, raw.c3, raw.c4, raw.c5, raw.c6, raw.c7]
            .into_iter()
            .map(|code| CHARSET[code as usize])
            .collect();
        while matches!(chars.last(), Some(b'_') | Some(b'#')) {
            chars.pop();
        }
        let callsign = String::from_utf8_lossy(&chars).into_owned();

        Self { tc: raw.tc, category, callsign }
    }
}

fn category(tc: u8, ca: u8) -> EmitterCategory {
    use EmitterCategory::{
        ClusterObstacle, Heavy, HighPerformance, HighVortexLarge, Light, LineObstacle, Medium1, Medium2,
        NoCategoryInfo, PointObstacle, Reserved, Rotorcraft, SurfaceEmergencyVehicle, SurfaceServiceVehicle,
        Unassigned,
    };
    match (tc, ca) {
        (_, 0) => NoCategoryInfo,
        (4, 1) => Light,
        (4, 2) => Medium1,
        (4, 3) => Medium2,
        (4, 4) => HighVortexLarge,
        (4, 5) => Heavy,
        (4, 6) => HighPerformance,
        (4, 7) => Rotorcraft,
        (3, 1) => SurfaceEmergencyVehicle,
        (3, 3) => SurfaceServiceVehicle,
        (3, 4) => PointObstacle,
        (3, 5) => ClusterObstacle,
        (3, 6) => LineObstacle,
        (2, _) => Reserved,
        _ => Unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(tc: u8, ca: u8, chars: &[u8; 8]) -> [u8; 7] {
        let mut bits: Vec<u8> = Vec::new();
        for i in (0..5).rev() {
            bits.push((tc >> i) & 1);
        }
        for i in (0..3).rev() {
            bits.push((ca >> i) & 1);
        }
        for &c in chars {
            let code = CHARSET.iter().position(|&x| x == c).unwrap() as u8;
            for i in (0..6).rev() {
                bits.push((code >> i) & 1);
            }
        }
        let mut out = [0u8; 7];
        for (i, b) in bits.iter().enumerate() {
            if *b != 0 {
                out[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        out
    }

    #[test]
    fn decodes_callsign_and_trims_fill() {
        let me = pack(4, 1, b"KLM1023_");
        let id = AircraftIdentification::parse(&me);
        assert_eq!(id.callsign, "KLM1023");
        assert_eq!(id.category, EmitterCategory::Light);
    }
}
