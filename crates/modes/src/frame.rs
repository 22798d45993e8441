//! Downlink frame envelope: raw bytes, CRC/parity handling, and
//! ICAO24/interrogator-code recovery.
//!
//! reference: spec §4.1, §4.2. `Frame` keeps the raw bytes around (for
//! `hex_message()` and lenient equality) and XORs the trailing 3 bytes
//! against a freshly computed CRC to recover the transmitted
//! ICAO24/interrogator code.

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};
use core::hash::{Hash, Hasher};

use crate::bits::{bytes_to_hex, extract_bits, hex_to_bytes, is_zero3, xor3};
use crate::crc::calc_parity;
use crate::error::Error;
use crate::message::DF;

/// A decoded Mode S / ADS-B downlink frame.
///
/// Equality and hashing are "lenient": two frames compare equal when their
/// `downlink_format`, `first_field`, `icao24` and `payload` match, ignoring
/// `raw` and `no_crc`, so a frame built from a hex string and one built
/// programmatically for the same logical message are interchangeable as
/// map keys. `first_field` is included because for DF11 it carries the
/// interrogator's capability code, not just padding ahead of `icao24`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    raw: Vec<u8>,
    no_crc: bool,
    pub downlink_format: DF,
    /// DF11 only: the 5-bit first field carries the interrogator's
    /// capability/code, not an ICAO address.
    pub first_field: u8,
    pub icao24: [u8; 3],
    pub payload: Vec<u8>,
    parity: [u8; 3],
}

impl Frame {
    /// Parse a raw byte buffer (7 or 14 bytes). When `no_crc` is true, the
    /// parity field is trusted rather than validated, and `icao24` is read
    /// directly instead of being recovered by XOR (used for short frames
    /// that belong to an already-known aircraft).
    pub fn parse(bytes: &[u8], no_crc: bool) -> Result<Self, Error> {
        if bytes.len() != 7 && bytes.len() != 14 {
            return Err(Error::BadFormat {
                reason: alloc_format(bytes.len()),
                original_message: bytes_to_hex(bytes),
            });
        }
        let (body, parity_slice) = bytes.split_at(bytes.len() - 3);
        let parity = [parity_slice[0], parity_slice[1], parity_slice[2]];
        let downlink_format = DF::from_first_byte(bytes[0]);
        let first_field = bytes[0] & 0x1f;

        let icao24 = if downlink_format.carries_icao_directly() || no_crc {
            [body[1], body[2], body[3]]
        } else {
            let computed = calc_parity(body);
            xor3(parity, computed)
        };

        let payload = body[4..].to_vec();

        Ok(Self { raw: bytes.to_vec(), no_crc, downlink_format, first_field, icao24, payload, parity })
    }

    /// Parse a case-insensitive hex string (14 or 28 hex digits).
    pub fn from_hex(hex: &str, no_crc: bool) -> Result<Self, Error> {
        let bytes = hex_to_bytes(hex)?;
        Self::parse(&bytes, no_crc)
    }

    /// Render the frame back to the hex string it was parsed from.
    #[must_use]
    pub fn hex_message(&self) -> String {
        bytes_to_hex(&self.raw)
    }

    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub const fn no_crc(&self) -> bool {
        self.no_crc
    }

    /// Validate the transmitted parity against a freshly computed CRC.
    ///
    /// For frames that carry the ICAO address directly (DF11/17/18/19),
    /// the remainder must be exactly zero. For frames that XOR the address
    /// into the parity field (DF0/4/5/16/20/21/24), the remainder must
    /// equal the address currently recorded in `icao24` XORed with the
    /// computed CRC.
    #[must_use]
    pub fn check_parity(&self) -> bool {
        if self.no_crc {
            return true;
        }
        let body = &self.raw[..self.raw.len() - 3];
        let computed = calc_parity(body);
        if self.downlink_format.carries_icao_directly() {
            is_zero3(xor3(self.parity, computed))
        } else {
            xor3(self.parity, computed) == self.icao24
        }
    }

    /// DF11 only: the interrogator code recovered from the parity field.
    /// Valid interrogator codes have their top 17 bits clear; spec §4.1.
    pub fn interrogator_code(&self) -> Result<u8, Error> {
        if self.downlink_format != DF::AllCallReply {
            return Err(Error::MissingInformation { field: "interrogator_code (DF11 only)".into() });
        }
        let body = &self.raw[..self.raw.len() - 3];
        let computed = calc_parity(body);
        let residue = xor3(self.parity, computed);
        Ok(residue[2] & 0x7f)
    }

    #[must_use]
    pub fn first_field_bits(&self, start: usize, nbits: usize) -> u32 {
        extract_bits(&self.raw, start, nbits)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.downlink_format == other.downlink_format
            && self.first_field == other.first_field
            && self.icao24 == other.icao24
            && self.payload == other.payload
    }
}

impl Eq for Frame {}

impl Hash for Frame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.downlink_format.hash(state);
        self.first_field.hash(state);
        self.icao24.hash(state);
        self.payload.hash(state);
    }
}

fn alloc_format(len: usize) -> String {
    #[cfg(feature = "alloc")]
    {
        alloc::format!("frame length {len} bytes is not 7 or 14")
    }
    #[cfg(not(feature = "alloc"))]
    {
        let _ = len;
        String::from("frame length is not 7 or 14 bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_icao_from_df4() {
        // DF4 altitude reply; parity computed offline to XOR in icao24
        // 9d a7 c8 over a body of 20 00 0f 7b.
        let frame = Frame::from_hex("20000f7bbab761", false).unwrap();
        assert_eq!(frame.downlink_format, DF::AltitudeReply);
        assert_eq!(frame.icao24, [0x9d, 0xa7, 0xc8]);
        assert!(frame.check_parity());
    }

    #[test]
    fn hex_roundtrip() {
        let hex = "8d3c6488f23481014008850d52fd";
        let frame = Frame::from_hex(hex, false).unwrap();
        assert_eq!(frame.hex_message(), hex);
    }

    #[test]
    fn lenient_equality_ignores_raw_bytes() {
        let a = Frame::from_hex("8d3c6488f23481014008850d52fd", false).unwrap();
        let b = Frame { raw: Vec::new(), ..a.clone() };
        assert_eq!(a, b);
    }

    #[test]
    fn differing_first_field_breaks_equality() {
        let a = Frame::from_hex("5d40621d4f94d0", false).unwrap();
        let b = Frame { first_field: a.first_field ^ 0x01, ..a.clone() };
        assert_ne!(a, b);
    }
}
