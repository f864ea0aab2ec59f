//! Numeric status codes returned by primitive providers.
//!
//! The primitive status space follows the CommonCrypto numbering so that a
//! native provider can hand its codes through unchanged.

/// Status returned by a primitive provider call.
pub type Status = i32;

/// Status returned by an operating-system random source.
pub type OsStatus = i32;

/// The call completed.
pub const SUCCESS: Status = 0;
/// A parameter was invalid.
pub const PARAM_ERROR: Status = -4300;
/// The output buffer cannot hold the result.
pub const BUFFER_TOO_SMALL: Status = -4301;
/// Memory allocation failed.
pub const MEMORY_FAILURE: Status = -4302;
/// Input size was not aligned to the block size.
pub const ALIGNMENT_ERROR: Status = -4303;
/// Input could not be decoded (bad padding, failed integrity check).
pub const DECODE_ERROR: Status = -4304;
/// The requested function is not implemented.
pub const UNIMPLEMENTED: Status = -4305;
/// An internal length computation overflowed.
pub const OVERFLOW: Status = -4306;
/// The random generator failed.
pub const RNG_FAILURE: Status = -4307;
/// Unspecified failure.
pub const UNSPECIFIED_ERROR: Status = -4308;
/// Calls were made in the wrong order.
pub const CALL_SEQUENCE_ERROR: Status = -4309;
/// The key has an unsupported size.
pub const KEY_SIZE_ERROR: Status = -4310;

/// Success code of the operating-system random source.
pub const OS_SUCCESS: OsStatus = 0;
