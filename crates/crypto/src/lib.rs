//! Algorithm-dispatched cryptography.
//!
//! A [`CryptoRegistry`] maps an [`AlgorithmId`] to the [`KeyGenerator`] and
//! [`Signer`] implementing it, and multicodec prefixes back to generators.
//! Private keys live behind a [`KeyManager`] and are referred to by alias.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod algorithm;
pub use algorithm::AlgorithmId;

mod error;
pub use error::CryptoError;

pub mod hashes;
pub mod jws;

pub mod key;
pub use key::{KeyGenOptions, KeyGenerator, Signer};

mod key_manager;
pub use key_manager::{InMemoryKeyManager, KeyManager};

pub mod multicodec;

mod registry;
pub use registry::CryptoRegistry;

#[cfg(feature = "secp256k1")]
mod secp256k1;
#[cfg(feature = "secp256k1")]
pub use secp256k1::Secp256k1;

#[cfg(feature = "ed25519")]
mod ed25519;
#[cfg(feature = "ed25519")]
pub use ed25519::Ed25519;

pub use didsuite_jwk::{self, Algorithm, JWK};
