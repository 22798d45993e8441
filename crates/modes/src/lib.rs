//! Decoder for Mode S / ADS-B (1090 MHz) downlink messages.
//!
//! `modes` is a pure, stateless decoding library: it turns a 7- or 14-byte
//! downlink frame into a typed [`message::Message`], with no knowledge of
//! time or of other messages from the same aircraft. Position decoding
//! that spans multiple messages (global/local CPR, reasonableness testing)
//! lives in the separate `modes-session` crate.
//!
//! ```
//! use modes::frame::Frame;
//! use modes::message;
//!
//! let frame = Frame::from_hex("8d40621d58c382d690c8ac2863a7", false).unwrap();
//! let msg = message::decode(frame).unwrap();
//! assert!(matches!(msg, message::Message::ExtendedSquitter { .. }));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod adsb;
pub mod altitude;
pub mod bds;
pub mod bits;
pub mod cpr;
pub mod crc;
pub mod error;
pub mod frame;
pub mod message;
pub mod mode_ac;

pub use error::{Error, Result};
pub use frame::Frame;
pub use message::{decode, Message, DF};
