//! Password handling for the shop.
//!
//! Passwords are stored and compared in plaintext. That is a known defect
//! carried over for compatibility; swapping in a hashing policy only needs a
//! new `CredentialPolicy` implementation.

/// How passwords are stored and checked
pub trait CredentialPolicy: Send + Sync {
    /// Value to persist for a freshly registered password
    fn seal(&self, password: &str) -> String;

    /// Whether `candidate` matches the stored value
    fn verify(&self, stored: &str, candidate: &str) -> bool;
}

/// Stores the password verbatim and compares by exact string equality
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialPolicy for PlaintextCredentials {
    fn seal(&self, password: &str) -> String {
        password.to_string()
    }

    fn verify(&self, stored: &str, candidate: &str) -> bool {
        stored == candidate
    }
}
