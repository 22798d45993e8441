//! Emergency/priority status and TCAS resolution advisory (both TC 28,
//! dispatched by the 3-bit subtype field), and operational status (TC 31,
//! versions 0-2).
//!
//! reference: spec §4.3 ("Status messages")

use deku::prelude::*;

use crate::bits::extract_bits;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmergencyState {
    None,
    General,
    Lifeguard,
    MinimumFuel,
    NoCommunication,
    UnlawfulInterference,
    DownedAircraft,
    Reserved,
}

impl EmergencyState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::General,
            2 => Self::Lifeguard,
            3 => Self::MinimumFuel,
            4 => Self::NoCommunication,
            5 => Self::UnlawfulInterference,
            6 => Self::DownedAircraft,
            _ => Self::Reserved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawEmergencyOrPriorityStatus {
    #[deku(bits = 5)]
    _tc: u8,
    #[deku(bits = 3)]
    subtype: u8,
    #[deku(bits = 3)]
    emergency_state: u8,
    #[deku(bits = 13)]
    id13: u32,
}

/// TC 28 subtype 1: emergency/priority status.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmergencyOrPriorityStatus {
    pub subtype: u8,
    pub emergency_state: EmergencyState,
    pub squawk: u32,
}

impl EmergencyOrPriorityStatus {
    pub fn parse(me: &[u8; 7]) -> Result<Self, Error> {
        let ((_, _), raw) = RawEmergencyOrPriorityStatus::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching emergency status's fixed layout");
        if raw.subtype != 1 {
            return Err(Error::UnspecifiedFormat { reason: alloc_msg(raw.subtype) });
        }
        Ok(Self {
            subtype: raw.subtype,
            emergency_state: EmergencyState::from_raw(raw.emergency_state),
            squawk: crate::altitude::decode_identity(raw.id13),
        })
    }
}

/// TC 28 subtype 2: TCAS resolution advisory report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TcasResolutionAdvisory {
    pub active_ra: u16,
    pub racs_record: u8,
    pub ra_terminated: bool,
    pub multiple_threat: bool,
}

impl TcasResolutionAdvisory {
    pub fn parse(me: &[u8; 7]) -> Result<Self, Error> {
        let subtype = extract_bits(me, 5, 3) as u8;
        if subtype != 2 {
            return Err(Error::UnspecifiedFormat { reason: alloc_msg(subtype) });
        }
        Ok(Self {
            active_ra: extract_bits(me, 8, 14) as u16,
            racs_record: extract_bits(me, 22, 4) as u8,
            ra_terminated: extract_bits(me, 26, 1) != 0,
            multiple_threat: extract_bits(me, 27, 1) != 0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, DekuRead)]
#[deku(endian = "big")]
struct RawOperationalStatus {
    #[deku(bits = 5)]
    _tc: u8,
    #[deku(bits = 3)]
    subtype: u8,
    #[deku(bits = 32)]
    _capability_class_and_operational_mode: u32,
    #[deku(bits = 3)]
    version: u8,
    #[deku(bits = 1)]
    nic_supplement_a: u8,
    #[deku(bits = 4)]
    nac_p: u8,
    #[deku(bits = 1)]
    nic_supplement_c: u8,
    #[deku(bits = 1)]
    geo_minus_baro_valid: u8,
    #[deku(bits = 1)]
    _reserved: u8,
    #[deku(bits = 2)]
    sil: u8,
}

/// Operational status: the subtype field distinguishes airborne (0) from
/// surface (1) capability reporting; `version` picks V0/V1/V2 field
/// semantics. `nic_supplement_c` is only meaningful for airborne reports.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationalStatus {
    pub airborne: bool,
    pub version: u8,
    pub nic_supplement_a: bool,
    pub nic_supplement_c: bool,
    pub nac_p: u8,
    pub sil: u8,
}

impl OperationalStatus {
    pub fn parse(me: &[u8; 7]) -> Result<Self, Error> {
        let ((_, _), raw) = RawOperationalStatus::from_bytes((me.as_slice(), 0))
            .expect("ME field is always 56 bits, matching operational status's fixed layout");
        if raw.subtype > 1 {
            return Err(Error::UnspecifiedFormat { reason: alloc_msg(raw.subtype) });
        }
        Ok(Self {
            airborne: raw.subtype == 0,
            version: raw.version,
            nic_supplement_a: raw.nic_supplement_a != 0,
            nic_supplement_c: raw.geo_minus_baro_valid != 0 && raw.nic_supplement_c != 0,
            nac_p: raw.nac_p,
            sil: raw.sil,
        })
    }
}

fn alloc_msg(subtype: u8) -> alloc::string::String {
    alloc::format!("subtype {subtype} is reserved")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_emergency_subtype() {
        let me = [0b0001_1010, 0, 0, 0, 0, 0, 0];
        assert!(EmergencyOrPriorityStatus::parse(&me).is_err());
    }

    #[test]
    fn tcas_resolution_advisory_rejects_wrong_subtype() {
        let me = [0b0001_1001, 0, 0, 0, 0, 0, 0];
        assert!(TcasResolutionAdvisory::parse(&me).is_err());
    }

    #[test]
    fn tcas_resolution_advisory_decodes_subtype_two() {
        let me = [0b0001_1010, 0, 0, 0, 0, 0, 0];
        let ra = TcasResolutionAdvisory::parse(&me).unwrap();
        assert_eq!(ra.active_ra, 0);
    }

    #[test]
    fn operational_status_nic_supplement_c_requires_valid_bit() {
        // subtype=0, nic_supplement_c bit set but the geo-minus-baro-valid
        // bit clear: must not surface as true.
        let me = [0, 0, 0, 0, 0, 0, 0b1000_0000];
        let status = OperationalStatus::parse(&me).unwrap();
        assert!(!status.nic_supplement_c);
    }

    #[test]
    fn operational_status_nic_supplement_c_surfaces_when_valid() {
        let me = [0, 0, 0, 0, 0, 0, 0b1100_0000];
        let status = OperationalStatus::parse(&me).unwrap();
        assert!(status.nic_supplement_c);
    }
}
