//! ADS-B message bodies (`ME` field of extended squitter frames), dispatched
//! on the 5-bit type code (`TC`) that opens every `ME`.
//!
//! reference: spec §4.3, §4.6

pub mod identification;
pub mod position;
pub mod status;
pub mod target_state;
pub mod velocity;

use crate::error::Error;
use identification::AircraftIdentification;
use position::{AirbornePosition, SurfacePosition};
use status::{EmergencyOrPriorityStatus, OperationalStatus, TcasResolutionAdvisory};
use target_state::TargetStateAndStatus;
use velocity::{AirspeedHeading, VelocityOverGround};

/// A decoded `ME` body, one variant per type-code family.
#[derive(Debug, Clone, PartialEq)]
pub enum Me {
    AircraftIdentification(AircraftIdentification),
    SurfacePosition(SurfacePosition),
    AirbornePosition(AirbornePosition),
    AirborneVelocity(AirborneVelocity),
    EmergencyOrPriorityStatus(EmergencyOrPriorityStatus),
    TcasResolutionAdvisory(TcasResolutionAdvisory),
    TargetStateAndStatus(TargetStateAndStatus),
    OperationalStatus(OperationalStatus),
    /// A type code this decoder does not interpret (reserved or not yet
    /// implemented); the 5-bit type code is kept for diagnostics.
    Reserved(u8),
}

/// Either ground-speed or airspeed/heading velocity reporting, per spec §4.6.
#[derive(Debug, Clone, PartialEq)]
pub enum AirborneVelocity {
    GroundSpeed(VelocityOverGround),
    AirspeedHeading(AirspeedHeading),
}

impl Me {
    pub fn parse(me: &[u8]) -> Result<Self, Error> {
        if me.len() != 7 {
            return Err(Error::BadFormat {
                reason: alloc_len_msg(me.len()),
                original_message: crate::bits::bytes_to_hex(me),
            });
        }
        let me: [u8; 7] = me.try_into().expect("length checked above");
        let tc = crate::bits::extract_bits(&me, 0, 5);
        match tc {
            1..=4 => Ok(Self::AircraftIdentification(AircraftIdentification::parse(&me))),
            5..=8 => Ok(Self::SurfacePosition(SurfacePosition::parse(&me)?)),
            9..=18 | 20..=22 => Ok(Self::AirbornePosition(AirbornePosition::parse(&me)?)),
            19 => parse_velocity(&me),
            23..=24 => Ok(Self::Reserved(tc as u8)),
            28 => parse_status_28(&me),
            29 => Ok(Self::TargetStateAndStatus(TargetStateAndStatus::parse(&me)?)),
            31 => Ok(Self::OperationalStatus(OperationalStatus::parse(&me)?)),
            other => Ok(Self::Reserved(other as u8)),
        }
    }
}

/// TC 28 carries two unrelated subtypes: 1 (emergency/priority status) and
/// 2 (TCAS resolution advisory). Peek the subtype field to route to the
/// right parser instead of guessing from the type code alone.
fn parse_status_28(me: &[u8; 7]) -> Result<Me, Error> {
    match crate::bits::extract_bits(me, 5, 3) {
        1 => Ok(Me::EmergencyOrPriorityStatus(EmergencyOrPriorityStatus::parse(me)?)),
        2 => Ok(Me::TcasResolutionAdvisory(TcasResolutionAdvisory::parse(me)?)),
        other => Err(Error::UnspecifiedFormat { reason: alloc_subtype28_msg(other) }),
    }
}

fn parse_velocity(me: &[u8; 7]) -> Result<Me, Error> {
    let subtype = crate::bits::extract_bits(me, 5, 3);
    match subtype {
        1 | 2 => Ok(Me::AirborneVelocity(AirborneVelocity::GroundSpeed(VelocityOverGround::parse(me, subtype == 2)))),
        3 | 4 => {
            Ok(Me::AirborneVelocity(AirborneVelocity::AirspeedHeading(AirspeedHeading::parse(me, subtype == 4))))
        }
        other => Err(Error::UnspecifiedFormat { reason: alloc_subtype_msg(other) }),
    }
}

#[cfg(feature = "alloc")]
use alloc::string::String;

fn alloc_len_msg(len: usize) -> String {
    alloc::format!("ME field length {len} is not 7 bytes")
}

fn alloc_subtype_msg(subtype: u32) -> String {
    alloc::format!("airborne velocity subtype {subtype} is reserved")
}

fn alloc_subtype28_msg(subtype: u32) -> String {
    alloc::format!("status subtype {subtype} is reserved")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(Me::parse(&[0; 6]).is_err());
    }

    #[test]
    fn tc28_subtype_one_routes_to_emergency_status() {
        let mut me = [0u8; 7];
        me[0] = 28 << 3 | 0b001; // tc=28, subtype=1
        let msg = Me::parse(&me).unwrap();
        assert!(matches!(msg, Me::EmergencyOrPriorityStatus(_)));
    }

    #[test]
    fn tc28_subtype_two_routes_to_tcas_resolution_advisory() {
        let mut me = [0u8; 7];
        me[0] = 28 << 3 | 0b010; // tc=28, subtype=2
        let msg = Me::parse(&me).unwrap();
        assert!(matches!(msg, Me::TcasResolutionAdvisory(_)));
    }

    #[test]
    fn tc28_reserved_subtype_is_rejected() {
        let mut me = [0u8; 7];
        me[0] = 28 << 3 | 0b111;
        assert!(Me::parse(&me).is_err());
    }
}
