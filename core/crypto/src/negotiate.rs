//! Output buffer negotiation.
//!
//! A provider call gets a zeroed buffer sized to an upper bound and reports
//! how many bytes it wrote. The buffer is truncated to that length before it
//! is handed back. Scratch buffers are [`Zeroizing`], so the buffer of a
//! failed attempt is wiped when it is dropped.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use primkit_common::{Error, Result, Status};

/// Result of one attempt at a variable-output call.
enum Attempt {
    /// The call succeeded; the buffer is truncated to the written length.
    Done(Vec<u8>),
    /// The provider asked for a buffer of the given size.
    TooSmall(usize),
}

fn attempt<F>(capacity: usize, call: &mut F) -> Result<Attempt>
where
    F: FnMut(&mut [u8], &mut usize) -> Status,
{
    let mut buffer = Zeroizing::new(vec![0u8; capacity]);
    let mut written = 0usize;
    let status = call(buffer.as_mut_slice(), &mut written);

    match Error::classify(status) {
        None if written > capacity => {
            warn!(capacity, written, "provider reported more output than the buffer holds");
            Err(Error::Overflow)
        }
        None => {
            buffer.truncate(written);
            Ok(Attempt::Done(std::mem::take(&mut *buffer)))
        }
        Some(Error::BufferTooSmall) => Ok(Attempt::TooSmall(written)),
        Some(err) => Err(err),
    }
}

/// Run a variable-output call, retrying once if the estimate was too small.
///
/// The first attempt uses `estimate`. If the provider answers
/// `BUFFER_TOO_SMALL`, the call is issued again with the size it reported.
/// A second `BUFFER_TOO_SMALL` is returned as [`Error::BufferTooSmall`].
pub(crate) fn negotiate<F>(estimate: usize, mut call: F) -> Result<Vec<u8>>
where
    F: FnMut(&mut [u8], &mut usize) -> Status,
{
    let required = match attempt(estimate, &mut call)? {
        Attempt::Done(output) => return Ok(output),
        Attempt::TooSmall(required) => required,
    };

    debug!(estimate, required, "output buffer too small, retrying with reported size");

    match attempt(required, &mut call)? {
        Attempt::Done(output) => Ok(output),
        Attempt::TooSmall(again) => {
            warn!(required, again, "provider rejected the size it reported");
            Err(Error::BufferTooSmall)
        }
    }
}

/// Run a variable-output call once against a buffer of exactly `capacity`.
pub(crate) fn call_once<F>(capacity: usize, mut call: F) -> Result<Vec<u8>>
where
    F: FnMut(&mut [u8], &mut usize) -> Status,
{
    match attempt(capacity, &mut call)? {
        Attempt::Done(output) => Ok(output),
        Attempt::TooSmall(_) => Err(Error::BufferTooSmall),
    }
}

/// Run a call whose output length is fixed by the algorithm.
pub(crate) fn fixed_output<F>(length: usize, call: F) -> Vec<u8>
where
    F: FnOnce(&mut [u8]),
{
    let mut buffer = vec![0u8; length];
    call(&mut buffer);
    buffer
}

/// Like [`fixed_output`], for calls that return a status.
pub(crate) fn fixed_output_checked<F>(length: usize, call: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut [u8]) -> Status,
{
    let mut buffer = Zeroizing::new(vec![0u8; length]);
    Error::check(call(buffer.as_mut_slice()))?;
    Ok(std::mem::take(&mut *buffer))
}
