//! Target state and status (TC 29, subtype 1).
//!
//! reference: spec §4.3 ("Target state and status"); DO-260B 2.2.3.2.7.1

use deku::prelude::*;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetAltitudeSource {
    Invalid,
    McpFcu,
    Fms,
    Reserved,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetStateAndStatus {
    pub subtype: u8,
    pub altitude_source: TargetAltitudeSource,
    pub target_altitude_ft: Option<i32>,
    /// Barometric pressure setting, `(raw - 1) * 0.8 mbar` above 800 mbar.
    pub barometric_pressure_mbar: Option<f64>,
    /// Target heading, signed and offset back into a 0-360 compass bearing.
    pub target_heading_deg: Option<f64>,
    pub autopilot_engaged: bool,
    pub vnav_engaged: bool,
    pub altitude_hold_engaged: bool,
    pub approach_mode_engaged: bool,
    pub tcas_operational: bool,
    pub lnav_engaged: bool,
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawTargetStateAndStatus {
    #[deku(bits = 5)]
    _tc: u8,
    #[deku(bits = 2)]
    subtype: u8,
    #[deku(bits = 2)]
    altitude_source: u8,
    #[deku(bits = 1)]
    alt_valid: u8,
    #[deku(bits = 11)]
    alt_raw: u16,
    #[deku(bits = 1)]
    baro_valid: u8,
    #[deku(bits = 9)]
    baro_raw: u16,
    #[deku(bits = 1)]
    heading_valid: u8,
    #[deku(bits = 1)]
    heading_sign: u8,
    #[deku(bits = 8)]
    heading_mag: u8,
    #[deku(bits = 4)]
    _reserved_a: u8,
    #[deku(bits = 1)]
    autopilot_engaged: u8,
    #[deku(bits = 1)]
    vnav_engaged: u8,
    #[deku(bits = 1)]
    altitude_hold_engaged: u8,
    #[deku(bits = 1)]
    _reserved_b: u8,
    #[deku(bits = 1)]
    approach_mode_engaged: u8,
    #[deku(bits = 1)]
    tcas_operational: u8,
    #[deku(bits = 1)]
    lnav_engaged: u8,
}

impl TargetStateAndStatus {
    pub fn parse(me: &[u8; 7]) -> Result<Self, Error> {
        let ((_, _), raw) = RawTargetStateAndStatus::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching target state's fixed layout");

        if raw.subtype != 1 {
            return Err(Error::UnspecifiedFormat { reason: alloc_msg(raw.subtype) });
        }

        let altitude_source = match raw.altitude_source {
            0 => TargetAltitudeSource::Invalid,
            1 => TargetAltitudeSource::McpFcu,
            2 => TargetAltitudeSource::Fms,
            _ => TargetAltitudeSource::Reserved,
        };
        let target_altitude_ft = (raw.alt_valid != 0).then_some(i32::from(raw.alt_raw) * 32);

        let barometric_pressure_mbar =
            (raw.baro_valid != 0).then(|| 800.0 + f64::from(raw.baro_raw - 1) * 0.8);

        let target_heading_deg = (raw.heading_valid != 0).then(|| {
            let magnitude = f64::from(raw.heading_mag) * (180.0 / 256.0);
            let signed = if raw.heading_sign != 0 { -magnitude } else { magnitude };
            if signed < 0.0 {
                signed + 360.0
            } else {
                signed
            }
        });

        Ok(Self {
            subtype: raw.subtype,
            altitude_source,
            target_altitude_ft,
            barometric_pressure_mbar,
            target_heading_deg,
            autopilot_engaged: raw.autopilot_engaged != 0,
            vnav_engaged: raw.vnav_engaged != 0,
            altitude_hold_engaged: raw.altitude_hold_engaged != 0,
            approach_mode_engaged: raw.approach_mode_engaged != 0,
            tcas_operational: raw.tcas_operational != 0,
            lnav_engaged: raw.lnav_engaged != 0,
        })
    }
}

fn alloc_msg(subtype: u8) -> alloc::string::String {
    alloc::format!("target state subtype {subtype} is reserved")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_subtype() {
        let me = [0b1110_1000, 0, 0, 0, 0, 0, 0];
        assert!(TargetStateAndStatus::parse(&me).is_err());
    }

    /// Packs (msb-first) fields of the given bit-widths into a 56-bit ME,
    /// in declaration order matching [`RawTargetStateAndStatus`].
    fn pack(fields: &[(u32, u32)]) -> [u8; 7] {
        let mut bits = alloc::vec::Vec::new();
        for &(value, width) in fields {
            for i in (0..width).rev() {
                bits.push(((value >> i) & 1) as u8);
            }
        }
        bits.resize(56, 0);
        let mut out = [0u8; 7];
        for (i, b) in bits.iter().enumerate() {
            if *b != 0 {
                out[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        out
    }

    #[test]
    fn barometric_pressure_offsets_from_800_mbar() {
        let me = pack(&[
            (0, 5),  // tc
            (1, 2),  // subtype
            (0, 2),  // altitude_source
            (0, 1),  // alt_valid
            (0, 11), // alt_raw
            (1, 1),  // baro_valid
            (11, 9), // baro_raw
        ]);
        let tss = TargetStateAndStatus::parse(&me).unwrap();
        assert_eq!(tss.barometric_pressure_mbar, Some(800.0 + 10.0 * 0.8));
    }

    #[test]
    fn target_heading_wraps_negative_into_compass_bearing() {
        let me = pack(&[
            (0, 5),   // tc
            (1, 2),   // subtype
            (0, 2),   // altitude_source
            (0, 1),   // alt_valid
            (0, 11),  // alt_raw
            (0, 1),   // baro_valid
            (0, 9),   // baro_raw
            (1, 1),   // heading_valid
            (1, 1),   // heading_sign (negative)
            (128, 8), // heading_mag: 128 * 180/256 = 90deg -> -90 -> wraps to 270
        ]);
        let tss = TargetStateAndStatus::parse(&me).unwrap();
        assert_eq!(tss.target_heading_deg, Some(270.0));
    }
}
