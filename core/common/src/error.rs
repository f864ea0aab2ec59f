//! Common error types for primkit.

use thiserror::Error;

use crate::status::{self, OsStatus, Status};

/// Failure reported by a primitive provider.
///
/// Every variant is built from a numeric provider status by
/// [`Error::classify`] or [`Error::classify_os`]. Codes outside the known
/// table are preserved in [`Error::UnknownProviderError`] and
/// [`Error::UnknownStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// A parameter was rejected.
    #[error("Illegal parameter")]
    IllegalParameter,

    /// The output buffer was too small for the result.
    #[error("Buffer too small")]
    BufferTooSmall,

    /// The provider could not allocate memory.
    #[error("Memory failure")]
    MemoryFailure,

    /// Input was not aligned to the algorithm's block size.
    #[error("Alignment error")]
    AlignmentError,

    /// Input could not be decoded (padding or integrity check failed).
    #[error("Decode error")]
    DecodeError,

    /// A length computation overflowed.
    #[error("Overflow")]
    Overflow,

    /// The random number generator failed.
    #[error("Random number generator failure")]
    RngFailure,

    /// Provider calls were made out of order.
    #[error("Call sequence error")]
    CallSequenceError,

    /// The key size is not supported by the algorithm.
    #[error("Key size error")]
    KeySizeError,

    /// The provider does not implement the requested function.
    #[error("Unimplemented")]
    Unimplemented,

    /// Unspecified provider failure.
    #[error("Unspecified error")]
    UnspecifiedError,

    /// A primitive provider status outside the known table.
    #[error("Unknown provider error: {0}")]
    UnknownProviderError(Status),

    /// A non-success status from the operating-system random source.
    #[error("Unknown status: {0}")]
    UnknownStatus(OsStatus),
}

impl Error {
    /// Classify a primitive provider status.
    ///
    /// Returns `None` for [`status::SUCCESS`].
    pub fn classify(code: Status) -> Option<Self> {
        let error = match code {
            status::SUCCESS => return None,
            status::PARAM_ERROR => Error::IllegalParameter,
            status::BUFFER_TOO_SMALL => Error::BufferTooSmall,
            status::MEMORY_FAILURE => Error::MemoryFailure,
            status::ALIGNMENT_ERROR => Error::AlignmentError,
            status::DECODE_ERROR => Error::DecodeError,
            status::OVERFLOW => Error::Overflow,
            status::RNG_FAILURE => Error::RngFailure,
            status::CALL_SEQUENCE_ERROR => Error::CallSequenceError,
            status::KEY_SIZE_ERROR => Error::KeySizeError,
            status::UNIMPLEMENTED => Error::Unimplemented,
            status::UNSPECIFIED_ERROR => Error::UnspecifiedError,
            other => Error::UnknownProviderError(other),
        };
        Some(error)
    }

    /// Classify a status from the operating-system random source.
    ///
    /// This status space is disjoint from the primitive one: anything but
    /// [`status::OS_SUCCESS`] becomes [`Error::UnknownStatus`].
    pub fn classify_os(code: OsStatus) -> Option<Self> {
        if code == status::OS_SUCCESS {
            None
        } else {
            Some(Error::UnknownStatus(code))
        }
    }

    /// Convert a primitive status into a `Result`.
    pub fn check(code: Status) -> Result<()> {
        match Self::classify(code) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// The provider status this error was classified from.
    pub fn status(&self) -> Status {
        match self {
            Error::IllegalParameter => status::PARAM_ERROR,
            Error::BufferTooSmall => status::BUFFER_TOO_SMALL,
            Error::MemoryFailure => status::MEMORY_FAILURE,
            Error::AlignmentError => status::ALIGNMENT_ERROR,
            Error::DecodeError => status::DECODE_ERROR,
            Error::Overflow => status::OVERFLOW,
            Error::RngFailure => status::RNG_FAILURE,
            Error::CallSequenceError => status::CALL_SEQUENCE_ERROR,
            Error::KeySizeError => status::KEY_SIZE_ERROR,
            Error::Unimplemented => status::UNIMPLEMENTED,
            Error::UnspecifiedError => status::UNSPECIFIED_ERROR,
            Error::UnknownProviderError(code) | Error::UnknownStatus(code) => *code,
        }
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KNOWN: [(Status, Error); 11] = [
        (status::PARAM_ERROR, Error::IllegalParameter),
        (status::BUFFER_TOO_SMALL, Error::BufferTooSmall),
        (status::MEMORY_FAILURE, Error::MemoryFailure),
        (status::ALIGNMENT_ERROR, Error::AlignmentError),
        (status::DECODE_ERROR, Error::DecodeError),
        (status::UNIMPLEMENTED, Error::Unimplemented),
        (status::OVERFLOW, Error::Overflow),
        (status::RNG_FAILURE, Error::RngFailure),
        (status::UNSPECIFIED_ERROR, Error::UnspecifiedError),
        (status::CALL_SEQUENCE_ERROR, Error::CallSequenceError),
        (status::KEY_SIZE_ERROR, Error::KeySizeError),
    ];

    #[test]
    fn test_success_is_not_an_error() {
        assert_eq!(Error::classify(status::SUCCESS), None);
        assert_eq!(Error::classify_os(status::OS_SUCCESS), None);
        assert!(Error::check(status::SUCCESS).is_ok());
    }

    #[test]
    fn test_known_statuses() {
        for (code, expected) in KNOWN {
            assert_eq!(Error::classify(code), Some(expected));
            assert_eq!(expected.status(), code);
        }
    }

    #[test]
    fn test_unknown_status_keeps_code() {
        assert_eq!(
            Error::classify(-4399),
            Some(Error::UnknownProviderError(-4399))
        );
        assert_eq!(Error::check(17), Err(Error::UnknownProviderError(17)));
    }

    #[test]
    fn test_os_status_space_is_separate() {
        // A primitive-space code read as an OS status is not reinterpreted.
        assert_eq!(
            Error::classify_os(status::PARAM_ERROR),
            Some(Error::UnknownStatus(status::PARAM_ERROR))
        );
        assert_ne!(
            Error::UnknownStatus(-25300),
            Error::UnknownProviderError(-25300)
        );
    }

    #[test]
    fn test_unknown_variants_compare_by_code() {
        assert_eq!(Error::UnknownProviderError(1), Error::UnknownProviderError(1));
        assert_ne!(Error::UnknownProviderError(1), Error::UnknownProviderError(2));
        assert_eq!(Error::UnknownStatus(-50), Error::UnknownStatus(-50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::KeySizeError.to_string(), "Key size error");
        assert_eq!(
            Error::UnknownProviderError(-1).to_string(),
            "Unknown provider error: -1"
        );
    }

    proptest! {
        #[test]
        fn classify_then_status_returns_same_code(code in any::<i32>()) {
            match Error::classify(code) {
                None => prop_assert_eq!(code, status::SUCCESS),
                Some(err) => prop_assert_eq!(err.status(), code),
            }
        }

        #[test]
        fn os_failures_preserve_code(code in any::<i32>().prop_filter("non-success", |c| *c != 0)) {
            prop_assert_eq!(Error::classify_os(code), Some(Error::UnknownStatus(code)));
        }
    }
}
