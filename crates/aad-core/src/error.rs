//! Error kinds for the append-only authenticated dictionary.
//!
//! Construction-side operations (append, merge, proof generation) return
//! `Result<T, AadError>`; these are meant to be fatal, never retried, since
//! they signal a violated internal invariant or a caller-side parameter
//! mistake. Verification never returns one of these: a malformed or
//! cryptographically-rejected proof simply makes `verify()` return `false`.

use thiserror::Error;

/// Errors raised by construction-side operations of the dictionary.
#[derive(Debug, Error)]
pub enum AadError {
    /// A commitment was attempted against a polynomial whose degree exceeds
    /// the loaded q-SDH parameters.
    #[error("polynomial of degree {degree} exceeds q-PKE bound q={q}")]
    ParameterInsufficient {
        /// Degree of the polynomial that was rejected.
        degree: usize,
        /// Highest supported degree.
        q: usize,
    },

    /// The forest or tree was found in a state the algorithm did not expect
    /// (empty when it should not be, a missing child during a copy, a
    /// non-zero remainder from what should have been exact division, ...).
    #[error("protocol invariant violated: {0}")]
    ProtocolViolation(String),

    /// The trapdoor or q-SDH parameter file was missing, truncated, or
    /// failed a self-check at load time.
    #[error("failed to load public parameters: {0}")]
    ParameterLoad(String),

    /// `getOldRoots`/`getDigest` was asked for a version outside `[1, n]`.
    #[error("version {version} is out of range for a forest of size {size}")]
    VersionOutOfRange {
        /// Requested version.
        version: usize,
        /// Current forest size.
        size: usize,
    },

    /// Underlying I/O failure while reading or writing a parameters file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AadError>;
