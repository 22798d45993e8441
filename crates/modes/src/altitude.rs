//! 13-bit and 12-bit altitude code decoding (Q-bit / Gillham), and the
//! 13-bit identity (squawk) field.
//!
//! reference: spec §4.3 ("Altitude in 13-bit fields uses Q-bit decoding")

use crate::mode_ac::{decode_id13_field, mode_a_to_mode_c};

/// Decode a 13-bit altitude code (as found in DF0/4/16/20 `AC` fields) into
/// feet. `None` when the field carries no valid altitude.
#[must_use]
pub fn decode_ac13(raw: u16) -> Option<i32> {
    let num = u32::from(raw);
    let m_bit = num & 0x0040;
    let q_bit = num & 0x0010;

    if m_bit != 0 {
        // altitude in meters: not supported by any fielded transponder
        return None;
    }

    if q_bit != 0 {
        let n = ((num & 0x1f80) >> 2) | ((num & 0x0020) >> 1) | (num & 0x000f);
        let feet = n * 25;
        feet.checked_sub(1000).map(|v| v as i32)
    } else {
        let gillham = decode_id13_field(num);
        mode_a_to_mode_c(gillham).ok().map(|n| n * 100)
    }
}

/// Decode a 12-bit altitude code (as found in ADS-B airborne position
/// messages) into feet. `None` when the field carries no valid altitude.
#[must_use]
pub fn decode_ac12(raw: u16) -> Option<i32> {
    let num = u32::from(raw);
    let q_bit = num & 0x0010;

    if q_bit != 0 {
        let n = ((num & 0x0fe0) >> 1) | (num & 0x000f);
        let feet = n * 25;
        feet.checked_sub(1000).map(|v| v as i32)
    } else {
        // 11 non-M/Q bits reassembled then Gillham-decoded; the two
        // halves of the 12-bit field straddle the (absent) M-bit
        // position, so shift the high part up by one before rebuilding
        // the 13-bit Gillham pattern mode_a_to_mode_c expects.
        let mut n = (num & 0x0fc0) << 1 | (num & 0x003f);
        n = decode_id13_field(n);
        mode_a_to_mode_c(n).ok().map(|v| v * 100)
    }
}

/// Decode the 13-bit identity (squawk) field used by DF5/DF21 and ADS-B
/// emergency/priority status messages.
#[must_use]
pub fn decode_identity(raw: u32) -> u32 {
    decode_id13_field(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_bit_set_gives_25ft_steps() {
        // Q=1, N=100 -> 100*25 - 1000 = 1500 ft
        assert_eq!(decode_ac13(0b1_1001_0100), Some(1500));
    }

    #[test]
    fn below_floor_is_none() {
        assert_eq!(decode_ac13(0b0_0000_0001_0000), None); // Q=1, N=0 -> 0-1000 underflow
    }
}
