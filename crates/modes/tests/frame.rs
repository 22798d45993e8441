use modes::adsb::{AirborneVelocity, Me};
use modes::frame::Frame;
use modes::message::{self, Message, DF};

#[test]
fn identification_frame_decodes_callsign() {
    // DF17, TC=4, callsign "KLM1023_" -> trimmed "KLM1023".
    // Body (icao 3c6488) + ME built offline; parity computed over the
    // full 11-byte body since DF17 carries the address directly.
    let frame = Frame::from_hex("8d3c6488202cc371c32ce0dc74db", false).unwrap();
    let msg = message::decode(frame).unwrap();
    match msg {
        Message::ExtendedSquitter { me: Me::AircraftIdentification(id), .. } => {
            assert_eq!(id.tc, 4);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn velocity_over_ground_frame_decodes() {
    let frame = Frame::from_hex("8da2c1bd990064864050006e183c", false).unwrap();
    let msg = message::decode(frame).unwrap();
    match msg {
        Message::ExtendedSquitter { me: Me::AirborneVelocity(AirborneVelocity::GroundSpeed(v)), .. } => {
            assert!(v.ground_speed_kt.is_some());
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn global_airborne_position_pair_resolves() {
    let even = Frame::from_hex("8d3c6488583e82d690c8ac7dcea9", false).unwrap();
    let odd = Frame::from_hex("8d3c6488583e86435cc4123c87d8", false).unwrap();

    let even_pos = match message::decode(even).unwrap() {
        Message::ExtendedSquitter { me: Me::AirbornePosition(p), .. } => p,
        other => panic!("unexpected message: {other:?}"),
    };
    let odd_pos = match message::decode(odd).unwrap() {
        Message::ExtendedSquitter { me: Me::AirbornePosition(p), .. } => p,
        other => panic!("unexpected message: {other:?}"),
    };

    let (lat, lon) = modes::cpr::global_airborne(&even_pos.cpr_frame(0.0), &odd_pos.cpr_frame(1.0), true).unwrap();
    assert!((lat - 52.265_780_174_126_06).abs() < 1e-6);
    assert!((lon - 3.938_912_527_901_786).abs() < 1e-6);
}

#[test]
fn df11_all_call_reply_recovers_interrogator_code() {
    let frame = Frame::from_hex("5d40621d4f94d0", false).unwrap();
    assert_eq!(frame.downlink_format, DF::AllCallReply);
    assert_eq!(frame.interrogator_code().unwrap(), 0);
}

#[test]
fn malformed_length_is_rejected() {
    assert!(Frame::from_hex("8d3c64", false).is_err());
}
