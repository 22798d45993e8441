//! Comm-B Data Selector (BDS) register identification.
//!
//! reference: spec §4.7. Comm-B replies (DF20/21) and some ADS-B messages
//! carry a 56-bit `MB`/`ME` field whose register is not self-declared; the
//! receiver must guess it from the bit pattern. There is no single
//! deterministic algorithm for this (every decoder implements its own
//! heuristics), so `identify` scores each candidate register by how well
//! the 7 bytes match that register's known layout and returns the
//! best-scoring candidate.

use crate::bits::extract_bits;

/// A BDS register this decoder can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BdsCode {
    /// 0,5: Extended squitter airborne position.
    Bds05,
    /// 0,8: Extended squitter surface position.
    Bds08,
    /// 1,0: Data link capability report.
    Bds10,
    /// 2,0: Aircraft identification.
    Bds20,
    /// 3,0: TCAS resolution advisory.
    Bds30,
    /// F,1: Military applications.
    BdsF1,
}

impl BdsCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bds05 => "0,5",
            Self::Bds08 => "0,8",
            Self::Bds10 => "1,0",
            Self::Bds20 => "2,0",
            Self::Bds30 => "3,0",
            Self::BdsF1 => "F,1",
        }
    }
}

/// A candidate register with a 0-100 confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub code: BdsCode,
    pub confidence: u8,
}

/// Below this score a candidate is not reported by [`identify`].
pub const CONFIDENCE_THRESHOLD: u8 = 50;

/// Score every known register against `me` and return them sorted by
/// descending confidence.
#[must_use]
pub fn candidates(me: &[u8; 7]) -> [Candidate; 6] {
    let mut out = [
        Candidate { code: BdsCode::Bds05, confidence: score_position(me, true) },
        Candidate { code: BdsCode::Bds08, confidence: score_position(me, false) },
        Candidate { code: BdsCode::Bds10, confidence: score_bds10(me) },
        Candidate { code: BdsCode::Bds20, confidence: score_bds20(me) },
        Candidate { code: BdsCode::Bds30, confidence: score_bds30(me) },
        Candidate { code: BdsCode::BdsF1, confidence: score_bdsf1(me) },
    ];
    out.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    out
}

/// Best-guess register, or `None` when nothing clears [`CONFIDENCE_THRESHOLD`].
#[must_use]
pub fn identify(me: &[u8; 7]) -> Option<BdsCode> {
    let ranked = candidates(me);
    (ranked[0].confidence >= CONFIDENCE_THRESHOLD).then_some(ranked[0].code)
}

fn score_position(me: &[u8; 7], airborne: bool) -> u8 {
    let tc = extract_bits(me, 0, 5);
    let in_range = if airborne { (9..=18).contains(&tc) } else { (5..=8).contains(&tc) };
    if !in_range {
        return 0;
    }
    // surveillance status + NIC supplement bit have no reserved-must-be-zero
    // region to check against; type-code match alone is decent evidence.
    70
}

fn score_bds10(me: &[u8; 7]) -> u8 {
    // Data link capability report: byte 0 must be 0x10 (register number
    // self-identifies in the first byte for this one register).
    if me[0] != 0x10 {
        return 0;
    }
    90
}

fn score_bds20(me: &[u8; 7]) -> u8 {
    let tc = extract_bits(me, 0, 5);
    if !(1..=4).contains(&tc) {
        return 0;
    }
    // 8 six-bit characters must all be in the restricted IA5 subset used
    // for callsigns: A-Z, 0-9, or space.
    let mut valid = 0u32;
    for i in 0..8 {
        let c = extract_bits(me, 8 + i * 6, 6);
        if matches!(c, 1..=26 | 48..=57 | 32) {
            valid += 1;
        }
    }
    20 + (valid * 10) as u8
}

fn score_bds30(me: &[u8; 7]) -> u8 {
    // TCAS RA report: ARA/RAC/RAT/MTE bits occupy the top of the field;
    // the low 7 bits (threat ICAO sub-field marker) are typically unused
    // when no threat is being tracked and should read zero.
    let reserved = extract_bits(me, 49, 7);
    if reserved == 0 {
        60
    } else {
        30
    }
}

fn score_bdsf1(me: &[u8; 7]) -> u8 {
    // Military applications: no public layout to validate against. Treat
    // as a low-confidence fallback that only wins when nothing else matches.
    let _ = me;
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_link_capability_is_recognized_by_register_byte() {
        let me = [0x10, 0, 0, 0, 0, 0, 0];
        assert_eq!(identify(&me), Some(BdsCode::Bds10));
    }

    #[test]
    fn airborne_position_type_code_wins() {
        // TC=11 (airborne position) in the top 5 bits.
        let me = [0b0101_1000, 0, 0, 0, 0, 0, 0];
        assert_eq!(identify(&me), Some(BdsCode::Bds05));
    }

    #[test]
    fn all_space_callsign_scores_high_confidence() {
        // TC=1, all 8 characters = space (code 32).
        let me = [12, 16, 65, 4, 16, 65, 0];
        let c = score_bds20(&me);
        assert!(c >= 50, "confidence={c}");
    }
}
