//! Error taxonomy for frame parsing and message dispatch
//!
//! reference: spec §7

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use core::fmt;
#[cfg(not(feature = "alloc"))]
use std::fmt;

/// Four kinds of decode failure, each carrying a human reason.
///
/// `BadFormat` and `UnspecifiedFormat` are raised at parse time and are not
/// retried. `MissingInformation` is returned by field getters whose
/// availability flag is false. `PositionStraddle` is recoverable: the
/// caller should wait for a later even/odd pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// A frame or ME field violates an invariant: wrong length, wrong type
    /// code for the claimed subtype, non-zero reserved bits.
    BadFormat {
        reason: String,
        original_message: String,
    },
    /// A reserved subtype was encountered (e.g. operational status subtype
    /// >= 2). The raw frame should be retained for diagnostics.
    UnspecifiedFormat { reason: String },
    /// A getter was called on a field whose availability flag is false.
    MissingInformation { field: String },
    /// Global CPR cannot complete because the even/odd pair spans a
    /// latitude at which `NL` changes.
    PositionStraddle { reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFormat { reason, original_message } => {
                write!(f, "bad format: {reason} (message: {original_message})")
            }
            Self::UnspecifiedFormat { reason } => write!(f, "unspecified format: {reason}"),
            Self::MissingInformation { field } => write!(f, "missing information: {field}"),
            Self::PositionStraddle { reason } => write!(f, "position straddle: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
