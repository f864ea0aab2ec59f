//! Types passed across the provider boundary.

use std::fmt;

/// Direction of a symmetric cipher call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Turn plaintext into ciphertext.
    Encrypt,
    /// Turn ciphertext back into plaintext.
    Decrypt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Encrypt => write!(f, "encrypt"),
            Operation::Decrypt => write!(f, "decrypt"),
        }
    }
}
