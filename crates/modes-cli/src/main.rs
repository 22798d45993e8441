//! Demo CLI: decodes a stream of hex-encoded Mode S / ADS-B frames (one per
//! line, read from a file or stdin) and prints each aircraft's resolved
//! state as JSON.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use modes::frame::Frame;
use modes_session::{ReasonablenessConfig, SessionDecoder};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// File of hex-encoded frames, one per line. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Treat every input frame as CRC-clean (skip parity recovery).
    #[arg(long)]
    no_crc: bool,

    /// Seconds of silence after which an aircraft is dropped.
    #[arg(long, default_value_t = 300.0)]
    max_age_s: f64,
}

const CLOCK_STEP_MS: i64 = 1_000;

#[derive(Serialize)]
struct AircraftReport<'a> {
    icao24: String,
    callsign: Option<&'a str>,
    altitude_ft: Option<i32>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut session = SessionDecoder::new(ReasonablenessConfig::default());
    let mut clock_ms = 0_i64;

    for line in reader.lines() {
        let line = line?;
        let hex = line.trim();
        if hex.is_empty() {
            continue;
        }
        clock_ms += CLOCK_STEP_MS;
        match Frame::from_hex(hex, args.no_crc) {
            Ok(frame) => {
                let icao24 = frame.icao24;
                match session.decode(frame, clock_ms) {
                    Ok(_msg) => {
                        let state = session.aircraft(icao24).expect("decode() just inserted this aircraft");
                        debug!(icao24 = %hex_icao(&state.icao24), "decoded");
                        let report = AircraftReport {
                            icao24: hex_icao(&state.icao24),
                            callsign: state.callsign.as_deref(),
                            altitude_ft: state.altitude_ft,
                            lat: state.position.last_position().map(|p| p.lat),
                            lon: state.position.last_position().map(|p| p.lon),
                        };
                        println!("{}", serde_json::to_string(&report)?);
                    }
                    Err(err) => warn!(%err, frame = hex, "message decode failed"),
                }
            }
            Err(err) => warn!(%err, frame = hex, "frame parse failed"),
        }
        session.gc(clock_ms as f64 / 1_000.0, args.max_age_s);
    }

    Ok(())
}

fn hex_icao(icao: &[u8; 3]) -> String {
    modes::bits::bytes_to_hex(icao)
}
