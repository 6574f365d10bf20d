//! Sidetree operations: construction, verification and submission.
//!
//! A method plugs in through [`Sidetree`]; hashing and encoding are the same
//! for every method (see [`hash`]).
use didsuite_crypto::AlgorithmId;
use didsuite_jwk::{Algorithm, JWK};

mod builder;
mod client;
mod commitment;
mod did;
mod document;
mod error;
mod finite;
pub mod hash;
mod operation;
mod resolution;
mod validation;
mod verification_method;

pub use builder::*;
pub use client::*;
pub use commitment::*;
pub use did::*;
pub use document::*;
pub use error::*;
pub use operation::*;
pub use resolution::*;
pub use validation::*;
pub use verification_method::*;

/// Per-method parameters ([Sidetree §5][params]).
///
/// [params]: https://identity.foundation/sidetree/spec/v1.0.0/#default-parameters
pub trait Sidetree {
    /// Algorithm of update, recovery and default verification keys.
    const KEY_ALGORITHM: AlgorithmId;

    /// JWS `alg` of signed operation data.
    const SIGNATURE_ALGORITHM: Algorithm;

    /// `<method>` in `did:<method>:<suffix>`.
    const METHOD: &'static str;

    /// Optional network segment between the method and the suffix, such as
    /// `test`.
    const NETWORK: Option<&'static str> = None;

    /// Whether `key` may be used for the update and recovery chains.
    fn validate_key(key: &JWK) -> bool;
}
