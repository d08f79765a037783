//! Keyferry - hybrid key transport for peer-to-peer sessions
//!
//! Application data between peers travels through an untrusted relay, so
//! each participant generates an AES-128 session key locally and RSA-2048
//! (OAEP-SHA256) is used only to carry that key to the other side. The
//! relay never observes plaintext or the session key.
//!
//! Everything here is ephemeral by policy: keys live in memory for one
//! collaboration session and are discarded by the caller afterwards. No
//! keychain, no disk, no CLI surface.

pub mod constants;

mod codec;
mod error;
mod keys;
mod symmetric;

pub use error::{Error, Result};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use symmetric::SymmetricKey;

#[cfg(any(test, debug_assertions))]
pub use symmetric::debug_access;
