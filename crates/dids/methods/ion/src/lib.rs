//! `did:ion` DID method: Sidetree operation construction and verification, and
//! a client for the Sidetree REST API.
use sidetree::SidetreeClient;

mod ion;
pub mod sidetree;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub use ion::{is_secp256k1, ION};

/// did:ion Method
pub type DIDION = SidetreeClient<ION>;
