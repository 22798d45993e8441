//! Per-aircraft CPR position tracking and reasonableness testing.
//!
//! reference: spec §5 ("Stateful decoding"). Mirrors the even/odd message
//! caching and "is this new position believable" checks every ADS-B
//! receiver implements, generalized here into `PositionDecoder` so the
//! session layer can stay ignorant of airborne-vs-surface plumbing.

use modes::cpr::{self, CprFrame};
use modes::error::Error;

use crate::position::Position;

/// Knobs controlling how aggressively [`PositionDecoder::filter`] rejects
/// implausible new positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReasonablenessConfig {
    /// Reject a candidate position implying ground speed above this bound.
    pub max_speed_kt: f64,
    /// Reject positions reported within this many seconds of the previous
    /// one and farther than a receiver could plausibly see move (a jitter
    /// filter separate from the speed bound, since very small `dt` makes
    /// the speed computation noisy).
    pub min_update_interval_s: f64,
    /// Optional receiver location; candidates beyond `max_range_m` from it
    /// are rejected outright.
    pub receiver_position: Option<Position>,
    pub max_range_m: f64,
}

impl Default for ReasonablenessConfig {
    fn default() -> Self {
        Self {
            max_speed_kt: 1_000.0,
            min_update_interval_s: 0.2,
            receiver_position: None,
            max_range_m: 650_000.0,
        }
    }
}

const KT_TO_MPS: f64 = 0.514_444;

/// Number of consecutive reasonable fixes required before a position is
/// surfaced to the caller at all.
const CONSECUTIVE_GOOD_THRESHOLD: u32 = 3;

/// Even/odd airborne CPR frames more than this many seconds apart are
/// stale and must not be combined.
const AIRBORNE_PAIR_WINDOW_S: f64 = 10.0;

/// Even/odd surface CPR frames more than this many seconds apart are
/// stale and must not be combined.
const SURFACE_PAIR_WINDOW_S: f64 = 25.0;

/// Maximum distance a local decode (relative to the last accepted
/// position) may disagree with the global decode before the pair is
/// treated as unreliable.
const LOCAL_GLOBAL_DISAGREEMENT_M: f64 = 10.0;

/// Even/odd CPR frame cache and last-accepted position for one aircraft,
/// covering both airborne and surface position families.
#[derive(Debug, Clone, Default)]
pub struct PositionDecoder {
    even_airborne: Option<CprFrame>,
    odd_airborne: Option<CprFrame>,
    even_surface: Option<CprFrame>,
    odd_surface: Option<CprFrame>,
    /// Most recent reasonable fix, confirmed or not. Used internally as
    /// the anchor for speed-reasonableness checks and local/global
    /// cross-checks, regardless of whether it has cleared the
    /// consecutive-good gate yet.
    anchor: Option<Position>,
    /// Most recent fix that cleared [`CONSECUTIVE_GOOD_THRESHOLD`]. This,
    /// not `anchor`, is what callers see.
    confirmed: Option<Position>,
    /// Length of the current run of consecutive reasonable fixes that
    /// have not yet reached [`CONSECUTIVE_GOOD_THRESHOLD`]. Reset to 0 by
    /// any unreasonable outcome.
    consecutive_good: u32,
}

impl PositionDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_position(&self) -> Option<Position> {
        self.confirmed
    }

    /// Length of the current run of consecutive reasonable fixes not yet
    /// surfaced (always `< CONSECUTIVE_GOOD_THRESHOLD`; once it reaches
    /// the threshold a position is returned and the run keeps going).
    #[must_use]
    pub const fn suppressed_count(&self) -> u32 {
        self.consecutive_good
    }

    /// Feed one airborne CPR frame. Returns `Ok(Some(position))` once a
    /// position clears CPR decoding, the local/global cross-check, and has
    /// been reasonable for `CONSECUTIVE_GOOD_THRESHOLD` fixes in a row.
    pub fn accept_airborne(&mut self, cpr: CprFrame, cfg: &ReasonablenessConfig) -> Result<Option<Position>, Error> {
        if cpr.odd {
            self.odd_airborne = Some(cpr);
        } else {
            self.even_airborne = Some(cpr);
        }
        let decoded = self.decode_airborne()?;
        Ok(self.filter(decoded, cfg))
    }

    /// Feed one surface CPR frame. Surface global decode needs an
    /// approximate reference (e.g. the receiver's own location, or the
    /// last known position) to resolve its 4-way longitude ambiguity.
    pub fn accept_surface(
        &mut self,
        cpr: CprFrame,
        reference: (f64, f64),
        cfg: &ReasonablenessConfig,
    ) -> Result<Option<Position>, Error> {
        if cpr.odd {
            self.odd_surface = Some(cpr);
        } else {
            self.even_surface = Some(cpr);
        }
        let decoded = self.decode_surface(reference)?;
        Ok(self.filter(decoded, cfg))
    }

    fn decode_airborne(&self) -> Result<Option<Position>, Error> {
        let (Some(even), Some(odd)) = (self.even_airborne, self.odd_airborne) else {
            return Ok(None);
        };
        if (even.time - odd.time).abs() > AIRBORNE_PAIR_WINDOW_S {
            return Ok(None);
        }
        let newer_is_odd = odd.time >= even.time;
        let newest = if newer_is_odd { odd } else { even };
        match cpr::global_airborne(&even, &odd, newer_is_odd) {
            Ok((lat, lon)) => {
                let global = Position::new(lat, lon, newest.time);
                Ok(self.cross_check(global, &newest, false))
            }
            Err(Error::PositionStraddle { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn decode_surface(&self, reference: (f64, f64)) -> Result<Option<Position>, Error> {
        let (Some(even), Some(odd)) = (self.even_surface, self.odd_surface) else {
            return Ok(None);
        };
        if (even.time - odd.time).abs() > SURFACE_PAIR_WINDOW_S {
            return Ok(None);
        }
        let newer_is_odd = odd.time >= even.time;
        let newest = if newer_is_odd { odd } else { even };
        match cpr::global_surface(&even, &odd, newer_is_odd, reference) {
            Ok((lat, lon)) => {
                let global = Position::new(lat, lon, newest.time);
                Ok(self.cross_check(global, &newest, true))
            }
            // Surface decode straddling is common near NL boundaries at
            // high latitude; warn-and-wait-for-the-next-pair rather than
            // treat it as a hard error.
            Err(Error::PositionStraddle { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Cross-check a freshly globally-decoded position against a locally
    /// decoded one anchored at the last accepted fix. With no prior fix to
    /// anchor a local decode there is nothing to check against, so the
    /// global result is trusted outright.
    fn cross_check(&self, global: Position, newest: &CprFrame, surface: bool) -> Option<Position> {
        let Some(reference) = self.anchor else {
            return Some(global);
        };
        let (lat, lon) = cpr::local(newest, reference.lat, reference.lon, surface);
        let local = Position::new(lat, lon, global.time);
        if global.distance_m(&local) > LOCAL_GLOBAL_DISAGREEMENT_M {
            None
        } else {
            Some(global)
        }
    }

    fn is_reasonable(&self, candidate: &Position, cfg: &ReasonablenessConfig) -> bool {
        if !candidate.is_sane() {
            return false;
        }
        if let Some(receiver) = cfg.receiver_position {
            if receiver.distance_m(candidate) > cfg.max_range_m {
                return false;
            }
        }
        if let Some(prev) = self.anchor {
            let dt = candidate.time - prev.time;
            if dt > cfg.min_update_interval_s {
                let speed_mps = prev.distance_m(candidate) / dt;
                if speed_mps > cfg.max_speed_kt * KT_TO_MPS {
                    return false;
                }
            }
        }
        true
    }

    /// Apply the reasonableness test and the consecutive-good-streak gate.
    /// A position is only ever returned once `CONSECUTIVE_GOOD_THRESHOLD`
    /// fixes in a row have passed; any unreasonable fix resets the streak.
    fn filter(&mut self, candidate: Option<Position>, cfg: &ReasonablenessConfig) -> Option<Position> {
        let candidate = candidate?;
        if !self.is_reasonable(&candidate, cfg) {
            self.consecutive_good = 0;
            return None;
        }
        self.anchor = Some(candidate);
        self.consecutive_good += 1;
        if self.consecutive_good >= CONSECUTIVE_GOOD_THRESHOLD {
            self.confirmed = Some(candidate);
            Some(candidate)
        } else {
            None
        }
    }
}

/// Everything the session tracks about one aircraft between messages.
#[derive(Debug, Clone)]
pub struct PerAircraftDecoderState {
    pub icao24: [u8; 3],
    pub callsign: Option<String>,
    pub altitude_ft: Option<i32>,
    pub position: PositionDecoder,
    pub last_seen_s: f64,
    /// ADS-B version (0/1/2) reported in this aircraft's operational
    /// status message, when one has been seen.
    pub adsb_version: Option<u8>,
    pub nic_suppl_a: Option<bool>,
    pub nic_suppl_c: Option<bool>,
    /// Difference between GNSS height and barometric altitude, in feet,
    /// from the most recent ground-speed velocity message.
    pub geo_minus_baro_ft: Option<i32>,
}

impl PerAircraftDecoderState {
    #[must_use]
    pub fn new(icao24: [u8; 3], now_s: f64) -> Self {
        Self {
            icao24,
            callsign: None,
            altitude_ft: None,
            position: PositionDecoder::new(),
            last_seen_s: now_s,
            adsb_version: None,
            nic_suppl_a: None,
            nic_suppl_c: None,
            geo_minus_baro_ft: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straddling_pair_yields_no_position_yet() {
        let mut pd = PositionDecoder::new();
        let even = CprFrame { lat_cpr: 55038, lon_cpr: 24604, odd: false, time: 0.0 };
        let odd = CprFrame { lat_cpr: 24604, lon_cpr: 24604, odd: true, time: 1.0 };
        pd.accept_airborne(even, &ReasonablenessConfig::default()).unwrap();
        let result = pd.accept_airborne(odd, &ReasonablenessConfig::default()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn stale_pair_outside_the_time_window_is_not_combined() {
        let mut pd = PositionDecoder::new();
        let odd = CprFrame { lat_cpr: 74158, lon_cpr: 50194, odd: true, time: 1.0 };
        let even = CprFrame { lat_cpr: 93000, lon_cpr: 51372, odd: false, time: 0.0 };
        pd.accept_airborne(odd, &ReasonablenessConfig::default()).unwrap();
        // 11 seconds later, well past the 10s airborne pairing window.
        let even_late = CprFrame { time: 12.0, ..even };
        let result = pd.accept_airborne(even_late, &ReasonablenessConfig::default()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn implausible_jump_resets_the_consecutive_good_streak() {
        let mut pd = PositionDecoder::new();
        pd.anchor = Some(Position::new(0.0, 0.0, 0.0));
        pd.consecutive_good = 2;
        let cfg = ReasonablenessConfig::default();
        // 10 degrees of latitude in 1 second is nowhere near achievable.
        let teleport = Position::new(10.0, 0.0, 1.0);
        assert_eq!(pd.filter(Some(teleport), &cfg), None);
        assert_eq!(pd.suppressed_count(), 0);
    }

    #[test]
    fn position_is_suppressed_until_three_consecutive_good_fixes() {
        let mut pd = PositionDecoder::new();
        let cfg = ReasonablenessConfig::default();
        assert_eq!(pd.filter(Some(Position::new(52.0, 4.0, 0.0)), &cfg), None);
        assert_eq!(pd.suppressed_count(), 1);
        assert_eq!(pd.filter(Some(Position::new(52.001, 4.0, 1.0)), &cfg), None);
        assert_eq!(pd.suppressed_count(), 2);
        let third = Position::new(52.002, 4.0, 2.0);
        assert_eq!(pd.filter(Some(third), &cfg), Some(third));
    }
}
