//! Decentralized Identifier operations over an algorithm-dispatched
//! cryptography layer.
//!
//! - [`ion`] builds, verifies and submits [Sidetree][sidetree] operations for
//!   `did:ion`: create, update, recover and deactivate, chained by
//!   commitment/reveal values.
//! - [`dht`] derives `did:dht` identifiers from Ed25519 identity keys.
//! - [`crypto`] dispatches key generation, signing and verification on an
//!   [`AlgorithmId`](crypto::AlgorithmId) through a
//!   [`CryptoRegistry`](crypto::CryptoRegistry). Private keys stay behind a
//!   [`KeyManager`](crypto::KeyManager) and are only referred to by alias.
//!
//! [sidetree]: <https://identity.foundation/sidetree/spec/v1.0.0/>
//!
//! # Basic Usage
//!
//! ```
//! use std::sync::Arc;
//! use didsuite::{
//!     crypto::{CryptoRegistry, InMemoryKeyManager},
//!     ion::{sidetree::OperationBuilder, ION},
//! };
//!
//! let registry = Arc::new(CryptoRegistry::with_defaults());
//! let key_manager = InMemoryKeyManager::new(registry.clone());
//!
//! let create = OperationBuilder::<ION>::new(&registry, &key_manager)
//!     .create(vec![], vec![])
//!     .unwrap();
//! assert!(create.long_form_did.starts_with(&create.short_form_did));
//! ```
//!
//! # Features
//!
//! - `ion` (default): the `did:ion` method.
//! - `dht` (default): the `did:dht` method.
#![cfg_attr(docsrs, feature(doc_auto_cfg), feature(doc_cfg))]

/// Algorithm-dispatched cryptography.
#[doc(inline)]
pub use didsuite_crypto as crypto;

/// JSON Web Key (JWK).
///
/// See: <https://www.rfc-editor.org/rfc/rfc7517>
#[doc(inline)]
pub use didsuite_jwk as jwk;

/// JSON Web Key (JWK).
#[doc(inline)]
pub use jwk::JWK;

/// The `did:ion` method.
#[cfg(feature = "ion")]
#[doc(inline)]
pub use did_ion as ion;

/// The `did:dht` method.
#[cfg(feature = "dht")]
#[doc(inline)]
pub use did_dht as dht;
