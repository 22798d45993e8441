//! Stateful per-aircraft session decoder: pairs even/odd CPR frames into
//! positions, rejects implausible position jumps, and ages out aircraft
//! that have gone quiet.
//!
//! Built on top of the stateless `modes` crate's [`modes::message::decode`].

pub mod aircraft;
pub mod position;
pub mod session;

pub use aircraft::{PerAircraftDecoderState, PositionDecoder, ReasonablenessConfig};
pub use position::Position;
pub use session::{PositionReport, SessionDecoder};
