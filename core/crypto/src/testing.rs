//! Scripted providers for exercising the status and negotiation paths.

use std::sync::atomic::{AtomicUsize, Ordering};

use primkit_common::status::{self, OsStatus, Status};
use primkit_common::Operation;

use crate::provider::{NativeId, PrimitiveProvider, SystemRandom};

/// A provider that answers every call from a fixed script.
///
/// Variable-output calls report `required` bytes. If the buffer is shorter
/// they answer `BUFFER_TOO_SMALL`; with `stubborn` set they answer it every
/// time. Otherwise they return `status`, filling the output on success.
pub(crate) struct MockProvider {
    pub status: Status,
    pub required: usize,
    pub stubborn: bool,
    pub calibration: u32,
    pub calls: AtomicUsize,
    pub capacities: std::sync::Mutex<Vec<usize>>,
}

impl MockProvider {
    pub fn returning(status: Status) -> Self {
        Self {
            status,
            required: 0,
            stubborn: false,
            calibration: 0,
            calls: AtomicUsize::new(0),
            capacities: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn requiring(required: usize) -> Self {
        Self {
            required,
            ..Self::returning(status::SUCCESS)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn capacities(&self) -> Vec<usize> {
        self.capacities.lock().unwrap().clone()
    }

    fn variable(&self, output: &mut [u8], written: &mut usize) -> Status {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.capacities.lock().unwrap().push(output.len());
        if self.stubborn || output.len() < self.required {
            *written = self.required;
            return status::BUFFER_TOO_SMALL;
        }
        if self.status == status::SUCCESS {
            output[..self.required].fill(0xAB);
            *written = self.required;
        }
        self.status
    }

    fn fixed(&self, output: &mut [u8]) -> Status {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.status == status::SUCCESS {
            output.fill(0xCD);
        }
        self.status
    }
}

impl PrimitiveProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn crypt(
        &self,
        _op: Operation,
        _algorithm: NativeId,
        _options: u32,
        _key: &[u8],
        _key_len: usize,
        _iv: &[u8],
        _input: &[u8],
        output: &mut [u8],
        moved: &mut usize,
    ) -> Status {
        self.variable(output, moved)
    }

    fn digest(&self, _algorithm: NativeId, _message: &[u8], output: &mut [u8]) {
        self.fixed(output);
    }

    fn hmac(&self, _algorithm: NativeId, _key: &[u8], _message: &[u8], output: &mut [u8]) {
        self.fixed(output);
    }

    fn derive_pbkdf(
        &self,
        _algorithm: NativeId,
        _prf: NativeId,
        _password: &[u8],
        _salt: &[u8],
        _rounds: u32,
        output: &mut [u8],
    ) -> Status {
        self.fixed(output)
    }

    fn calibrate_pbkdf(
        &self,
        _algorithm: NativeId,
        _password_len: usize,
        _salt_len: usize,
        _prf: NativeId,
        _derived_key_len: usize,
        _msec: u32,
    ) -> u32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.calibration
    }

    fn key_wrap(
        &self,
        _algorithm: NativeId,
        _iv: &[u8],
        _kek: &[u8],
        _raw_key: &[u8],
        output: &mut [u8],
        written: &mut usize,
    ) -> Status {
        self.variable(output, written)
    }

    fn key_unwrap(
        &self,
        _algorithm: NativeId,
        _iv: &[u8],
        _kek: &[u8],
        _wrapped_key: &[u8],
        output: &mut [u8],
        written: &mut usize,
    ) -> Status {
        self.variable(output, written)
    }

    fn random_bytes(&self, output: &mut [u8]) -> Status {
        self.fixed(output)
    }
}

/// An OS random source that always returns `status`.
pub(crate) struct MockSystemRandom {
    pub status: OsStatus,
}

impl SystemRandom for MockSystemRandom {
    fn copy_bytes(&self, output: &mut [u8]) -> OsStatus {
        if self.status == status::OS_SUCCESS {
            output.fill(0xEF);
        }
        self.status
    }
}
