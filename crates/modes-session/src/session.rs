//! Registry of [`PerAircraftDecoderState`], keyed by ICAO24, with garbage
//! collection of aircraft that have gone quiet.
//!
//! reference: spec §5 ("Session decoder"), §4.6 (milliseconds at the
//! public surface)

use std::collections::HashMap;

use modes::adsb::position::{AirbornePosition, SurfacePosition};
use modes::adsb::{AirborneVelocity, Me};
use modes::error::Error;
use modes::frame::Frame;
use modes::message::{self, Message};
use tracing::{debug, trace};

use crate::aircraft::{PerAircraftDecoderState, ReasonablenessConfig};
use crate::position::Position;

/// A position-bearing `ME` report, borrowed from an already-decoded
/// [`Message`]. Lets [`SessionDecoder::decode_position`] be driven
/// directly, without going through [`SessionDecoder::decode`] first.
#[derive(Debug, Clone, Copy)]
pub enum PositionReport<'a> {
    Airborne(&'a AirbornePosition),
    Surface(&'a SurfacePosition),
}

/// Tracks one [`PerAircraftDecoderState`] per ICAO24 address seen so far.
pub struct SessionDecoder {
    aircraft: HashMap<[u8; 3], PerAircraftDecoderState>,
    reasonableness: ReasonablenessConfig,
}

impl SessionDecoder {
    #[must_use]
    pub fn new(reasonableness: ReasonablenessConfig) -> Self {
        Self { aircraft: HashMap::new(), reasonableness }
    }

    #[must_use]
    pub fn aircraft(&self, icao24: [u8; 3]) -> Option<&PerAircraftDecoderState> {
        self.aircraft.get(&icao24)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Decode one frame and fold it into the state of the aircraft it came
    /// from, returning the decoded [`Message`]. `now_ms` is a monotonic
    /// session clock (milliseconds) used for CPR pairing, reasonableness
    /// checks and GC, not wall time.
    pub fn decode(&mut self, frame: Frame, now_ms: i64) -> Result<Message, Error> {
        let icao24 = frame.icao24;
        let msg = message::decode(frame)?;
        let now_s = ms_to_s(now_ms);
        let cfg = self.reasonableness;
        let state = self.aircraft.entry(icao24).or_insert_with(|| PerAircraftDecoderState::new(icao24, now_s));
        state.last_seen_s = now_s;
        apply(state, &msg, now_s, &cfg);
        Ok(msg)
    }

    /// Feed a position report directly, bypassing message decoding. Useful
    /// when a caller has already pulled a position out of a [`Message`] and
    /// wants to drive the CPR pairing/reasonableness pipeline on its own
    /// schedule (e.g. replaying archived reports with their own clock).
    pub fn decode_position(
        &mut self,
        icao24: [u8; 3],
        t_ms: i64,
        pos_msg: PositionReport<'_>,
        receiver: Option<(f64, f64)>,
    ) -> Result<Option<Position>, Error> {
        let now_s = ms_to_s(t_ms);
        let cfg = self.reasonableness;
        let state = self.aircraft.entry(icao24).or_insert_with(|| PerAircraftDecoderState::new(icao24, now_s));
        state.last_seen_s = now_s;
        apply_position(state, pos_msg, now_s, receiver, &cfg)
    }

    /// Remove every aircraft not heard from in the last `max_age_s`
    /// seconds (relative to `now_s`).
    pub fn gc(&mut self, now_s: f64, max_age_s: f64) {
        let before = self.aircraft.len();
        self.aircraft.retain(|_, state| now_s - state.last_seen_s <= max_age_s);
        let dropped = before - self.aircraft.len();
        if dropped > 0 {
            debug!(dropped, remaining = self.aircraft.len(), "gc dropped stale aircraft");
        }
    }

    /// All currently tracked ICAO24 addresses.
    pub fn icaos(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.aircraft.keys().copied()
    }

    /// Last accepted position for an aircraft, if any.
    #[must_use]
    pub fn position(&self, icao24: [u8; 3]) -> Option<Position> {
        self.aircraft.get(&icao24).and_then(|s| s.position.last_position())
    }
}

fn ms_to_s(t_ms: i64) -> f64 {
    t_ms as f64 / 1_000.0
}

fn apply(state: &mut PerAircraftDecoderState, msg: &Message, now_s: f64, cfg: &ReasonablenessConfig) {
    match msg {
        Message::AltitudeReply { altitude_ft, .. }
        | Message::CommBAltitudeReply { altitude_ft, .. }
        | Message::ShortAcas { altitude_ft, .. }
        | Message::LongAcas { altitude_ft, .. } => {
            if altitude_ft.is_some() {
                state.altitude_ft = *altitude_ft;
            }
        }
        Message::ExtendedSquitter { me, .. } => apply_me(state, me, now_s, cfg),
        _ => {}
    }
}

fn apply_me(state: &mut PerAircraftDecoderState, me: &Me, now_s: f64, cfg: &ReasonablenessConfig) {
    match me {
        Me::AircraftIdentification(id) => {
            state.callsign = Some(id.callsign.clone());
        }
        Me::AirbornePosition(pos) => {
            if pos.altitude_ft.is_some() {
                state.altitude_ft = pos.altitude_ft;
            }
            if let Err(err) = apply_position(state, PositionReport::Airborne(pos), now_s, None, cfg) {
                debug!(%err, "airborne CPR decode failed");
            }
        }
        Me::SurfacePosition(pos) => {
            let receiver = state.position.last_position().map(|p| (p.lat, p.lon));
            if let Err(err) = apply_position(state, PositionReport::Surface(pos), now_s, receiver, cfg) {
                debug!(%err, "surface CPR decode failed");
            }
        }
        Me::AirborneVelocity(AirborneVelocity::GroundSpeed(v)) => {
            if v.gnss_baro_diff_ft.is_some() {
                state.geo_minus_baro_ft = v.gnss_baro_diff_ft;
            }
        }
        Me::AirborneVelocity(AirborneVelocity::AirspeedHeading(_)) => {}
        Me::OperationalStatus(status) => {
            state.adsb_version = Some(status.version);
            state.nic_suppl_a = Some(status.nic_supplement_a);
            state.nic_suppl_c = Some(status.nic_supplement_c);
        }
        _ => {}
    }
}

fn apply_position(
    state: &mut PerAircraftDecoderState,
    pos_msg: PositionReport<'_>,
    now_s: f64,
    receiver: Option<(f64, f64)>,
    cfg: &ReasonablenessConfig,
) -> Result<Option<Position>, Error> {
    match pos_msg {
        PositionReport::Airborne(pos) => {
            let cpr = pos.cpr_frame(now_s);
            let resolved = state.position.accept_airborne(cpr, cfg)?;
            if let Some(p) = resolved {
                trace!(lat = p.lat, lon = p.lon, "airborne position resolved");
            }
            Ok(resolved)
        }
        PositionReport::Surface(pos) => {
            let cpr = pos.cpr_frame(now_s);
            let reference = receiver
                .or_else(|| state.position.last_position().map(|p| (p.lat, p.lon)))
                .unwrap_or((0.0, 0.0));
            let resolved = state.position.accept_surface(cpr, reference, cfg)?;
            if let Some(p) = resolved {
                trace!(lat = p.lat, lon = p.lon, "surface position resolved");
            }
            Ok(resolved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_drops_stale_aircraft() {
        let mut session = SessionDecoder::new(ReasonablenessConfig::default());
        session.aircraft.insert([1, 2, 3], PerAircraftDecoderState::new([1, 2, 3], 0.0));
        session.gc(1000.0, 60.0);
        assert!(session.is_empty());
    }
}
