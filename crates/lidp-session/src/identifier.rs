//! Opaque identifier generation.
//!
//! Session and request-state cookies carry nothing but an identifier that
//! keys into the store, so the identifier must be unguessable. The managers
//! take any [`IdentifierSource`]; [`RandomIdentifiers`] is the default.

use rand::distr::{Alphanumeric, SampleString};

/// Length of identifiers produced by [`RandomIdentifiers`].
pub const IDENTIFIER_LEN: usize = 32;

/// Produces fresh opaque identifiers.
///
/// Implementations must return cryptographically random values that are
/// unique for all practical purposes.
pub trait IdentifierSource: Send + Sync {
    /// Returns a new identifier.
    fn generate(&self) -> String;
}

/// Alphanumeric identifiers from the thread-local CSPRNG.
///
/// 32 characters from a 62-symbol alphabet give about 190 bits of entropy.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentifiers;

impl IdentifierSource for RandomIdentifiers {
    fn generate(&self) -> String {
        Alphanumeric.sample_string(&mut rand::rng(), IDENTIFIER_LEN)
    }
}
