//! Downlink Format (DF) taxonomy: the 14 distinct frame shapes Mode S and
//! ADS-B transmit, keyed by the 5-bit `DF` field in the first byte.
//!
//! reference: spec §3, §4.2

use crate::adsb::Me;
use crate::altitude::{decode_ac13, decode_identity};
use crate::bds::BdsCode;
use crate::error::Error;
use crate::frame::Frame;

/// The downlink format of a frame, decoded from the top 5 bits of byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DF {
    /// DF0: short air-air surveillance (ACAS).
    ShortAcas,
    /// DF4: surveillance altitude reply.
    AltitudeReply,
    /// DF5: surveillance identity reply.
    IdentifyReply,
    /// DF11: all-call reply.
    AllCallReply,
    /// DF16: long air-air surveillance (ACAS).
    LongAcas,
    /// DF17/18: extended squitter (ADS-B) and DF19 (military extended squitter).
    ExtendedSquitter,
    /// DF20: Comm-B altitude reply.
    CommBAltitudeReply,
    /// DF21: Comm-B identity reply.
    CommBIdentifyReply,
    /// DF24-31: Comm-D extended length message.
    CommDExtendedLengthMsg,
    /// Any DF value not covered above.
    Unknown(u8),
}

impl DF {
    #[must_use]
    pub fn from_first_byte(byte: u8) -> Self {
        let df = byte >> 3;
        match df {
            0 => Self::ShortAcas,
            4 => Self::AltitudeReply,
            5 => Self::IdentifyReply,
            11 => Self::AllCallReply,
            16 => Self::LongAcas,
            17..=19 => Self::ExtendedSquitter,
            20 => Self::CommBAltitudeReply,
            21 => Self::CommBIdentifyReply,
            24..=31 => Self::CommDExtendedLengthMsg,
            other => Self::Unknown(other),
        }
    }

    /// True for formats that transmit `AA` (address announced) directly,
    /// rather than XOR-ing the address into the parity field.
    #[must_use]
    pub const fn carries_icao_directly(self) -> bool {
        matches!(self, Self::AllCallReply | Self::ExtendedSquitter)
    }
}

/// A fully decoded message: the frame envelope plus its format-specific body.
#[derive(Debug, Clone)]
pub enum Message {
    ShortAcas { frame: Frame, vertical_status_airborne: bool, altitude_ft: Option<i32> },
    AltitudeReply { frame: Frame, altitude_ft: Option<i32> },
    IdentifyReply { frame: Frame, squawk: u32 },
    AllCallReply { frame: Frame, interrogator_code: u8 },
    LongAcas { frame: Frame, altitude_ft: Option<i32>, valid_rac: bool },
    ExtendedSquitter { frame: Frame, me: Me },
    CommBAltitudeReply { frame: Frame, altitude_ft: Option<i32>, bds: Option<BdsCode> },
    CommBIdentifyReply { frame: Frame, squawk: u32, bds: Option<BdsCode> },
    CommDExtendedLengthMsg { frame: Frame },
    Unknown { frame: Frame },
}

/// Decode a frame's format-specific body.
///
/// # Errors
/// Returns [`Error::BadFormat`] when an extended squitter's `ME` field
/// fails to parse.
pub fn decode(frame: Frame) -> Result<Message, Error> {
    match frame.downlink_format {
        DF::ShortAcas => {
            let vs = frame.first_field_bits(5, 1) != 0;
            let ac13 = frame.first_field_bits(19, 13) as u16;
            Ok(Message::ShortAcas { altitude_ft: decode_ac13(ac13), vertical_status_airborne: !vs, frame })
        }
        DF::AltitudeReply => {
            let ac13 = frame.first_field_bits(19, 13) as u16;
            Ok(Message::AltitudeReply { altitude_ft: decode_ac13(ac13), frame })
        }
        DF::IdentifyReply => {
            let id13 = frame.first_field_bits(19, 13);
            Ok(Message::IdentifyReply { squawk: decode_identity(id13), frame })
        }
        DF::AllCallReply => {
            let code = frame.interrogator_code()?;
            Ok(Message::AllCallReply { interrogator_code: code, frame })
        }
        DF::LongAcas => {
            let ac13 = frame.first_field_bits(19, 13) as u16;
            // Byte 7 of the MV field (payload[3]) reads 0x30 when the
            // Reply Information / RAC subfield is absent.
            let valid_rac = frame.payload.get(3).copied() != Some(0x30);
            Ok(Message::LongAcas { altitude_ft: decode_ac13(ac13), valid_rac, frame })
        }
        DF::ExtendedSquitter => {
            let me = Me::parse(&frame.payload)?;
            Ok(Message::ExtendedSquitter { frame, me })
        }
        DF::CommBAltitudeReply => {
            let ac13 = frame.first_field_bits(19, 13) as u16;
            let bds = payload7(&frame.payload).map(|me| crate::bds::identify(&me)).unwrap_or(None);
            Ok(Message::CommBAltitudeReply { altitude_ft: decode_ac13(ac13), bds, frame })
        }
        DF::CommBIdentifyReply => {
            let id13 = frame.first_field_bits(19, 13);
            let bds = payload7(&frame.payload).map(|me| crate::bds::identify(&me)).unwrap_or(None);
            Ok(Message::CommBIdentifyReply { squawk: decode_identity(id13), bds, frame })
        }
        DF::CommDExtendedLengthMsg => Ok(Message::CommDExtendedLengthMsg { frame }),
        DF::Unknown(_) => Ok(Message::Unknown { frame }),
    }
}

fn payload7(payload: &[u8]) -> Option<[u8; 7]> {
    payload.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn df_from_byte() {
        assert_eq!(DF::from_first_byte(0x20), DF::AltitudeReply);
        assert_eq!(DF::from_first_byte(0x8d), DF::ExtendedSquitter);
        assert_eq!(DF::from_first_byte(0x28), DF::CommBAltitudeReply);
    }

    #[test]
    fn decodes_altitude_reply() {
        let frame = Frame::from_hex("20000f7bbab761", false).unwrap();
        let msg = decode(frame).unwrap();
        assert!(matches!(msg, Message::AltitudeReply { .. }));
    }

    #[test]
    fn long_acas_rac_absent_when_payload_byte_is_0x30() {
        let bytes = [0x80, 0, 0, 0, 0, 0, 0, 0x30, 0, 0, 0, 0, 0, 0];
        let frame = Frame::parse(&bytes, true).unwrap();
        let msg = decode(frame).unwrap();
        assert!(matches!(msg, Message::LongAcas { valid_rac: false, .. }));
    }

    #[test]
    fn long_acas_rac_present_otherwise() {
        let bytes = [0x80, 0, 0, 0, 0, 0, 0, 0x31, 0, 0, 0, 0, 0, 0];
        let frame = Frame::parse(&bytes, true).unwrap();
        let msg = decode(frame).unwrap();
        assert!(matches!(msg, Message::LongAcas { valid_rac: true, .. }));
    }
}
