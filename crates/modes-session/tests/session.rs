use modes::frame::Frame;
use modes_session::{ReasonablenessConfig, SessionDecoder};

#[test]
fn position_is_suppressed_until_three_consecutive_good_fixes() {
    let mut session = SessionDecoder::new(ReasonablenessConfig::default());
    let icao24 = [0x3c, 0x64, 0x88];

    let even = Frame::from_hex("8d3c6488583e82d690c8ac7dcea9", false).unwrap();
    let odd = Frame::from_hex("8d3c6488583e86435cc4123c87d8", false).unwrap();

    session.decode(even.clone(), 0).unwrap();
    session.decode(odd.clone(), 1_000).unwrap();
    assert_eq!(session.position(icao24), None, "first pair is not yet confirmed");

    session.decode(even.clone(), 2_000).unwrap();
    assert_eq!(session.position(icao24), None, "second pair is not yet confirmed");

    session.decode(odd, 3_000).unwrap();
    let pos = session.position(icao24).expect("position after three consecutive consistent pairs");
    assert!((pos.lat - 52.265_780_174_126_06).abs() < 1e-6);
    assert!((pos.lon - 3.938_912_527_901_786).abs() < 1e-6);
}

#[test]
fn unknown_aircraft_has_no_position() {
    let session = SessionDecoder::new(ReasonablenessConfig::default());
    assert_eq!(session.position([0, 0, 0]), None);
}

#[test]
fn gc_removes_aircraft_past_max_age() {
    let mut session = SessionDecoder::new(ReasonablenessConfig::default());
    let frame = Frame::from_hex("8d3c6488583e82d690c8ac7dcea9", false).unwrap();
    session.decode(frame, 0).unwrap();
    assert_eq!(session.len(), 1);

    session.gc(30.0, 60.0);
    assert_eq!(session.len(), 1, "not yet stale");

    session.gc(1000.0, 60.0);
    assert_eq!(session.len(), 0, "stale aircraft dropped");
}
