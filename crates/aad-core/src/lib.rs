//! An append-only authenticated dictionary: a persistent key to
//! multi-value map whose digests carry cryptographic proofs of complete
//! membership, non-membership, and append-only evolution.
//!
//! The public surface is [`aad::Aad`]; most other modules are building
//! blocks (bit strings, polynomial commitments, the accumulated-tree and
//! frontier authenticated structures) that `Aad` composes.

pub mod aad;
pub mod accumulated_tree;
pub mod append_only;
pub mod bitstring;
pub mod commit;
pub mod curve;
pub mod digest;
pub mod error;
pub mod frontier;
pub mod hashing;
pub mod membership;
pub mod params;
pub mod poly;
pub mod proof;
pub mod tree;

pub use aad::Aad;
pub use error::{AadError, Result};
pub use params::{CryptoContext, PublicParameters};
